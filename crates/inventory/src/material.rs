use estoque_core::{DomainError, DomainResult, Entity, MaterialId};

/// Stock ledger entry: a stocked material and its available quantity.
///
/// # Invariants
/// - `available_quantity >= 0` after every operation. The ledger refuses any
///   withdrawal that would go below zero (stock is never oversold).
/// - `name` is non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Material {
    id: MaterialId,
    name: String,
    description: String,
    available_quantity: i64,
    image: Option<String>,
}

impl Material {
    /// Create a new material with an initial stock count.
    pub fn new(
        id: MaterialId,
        name: impl Into<String>,
        description: impl Into<String>,
        available_quantity: i64,
        image: Option<String>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if available_quantity < 0 {
            return Err(DomainError::validation(
                "available_quantity cannot be negative",
            ));
        }
        Ok(Self {
            id,
            name,
            description: description.into(),
            available_quantity,
            image,
        })
    }

    /// Rehydrate a material from stored fields.
    ///
    /// The storage layer is trusted to hand back values that satisfied the
    /// invariants when they were persisted.
    pub fn from_parts(
        id: MaterialId,
        name: String,
        description: String,
        available_quantity: i64,
        image: Option<String>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            available_quantity,
            image,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn available_quantity(&self) -> i64 {
        self.available_quantity
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Withdraw `quantity` units from stock.
    ///
    /// `quantity` must be positive and must not exceed the available count;
    /// the ledger never goes negative.
    pub fn withdraw(&mut self, quantity: i64) -> DomainResult<()> {
        if quantity <= 0 {
            return Err(DomainError::validation(
                "quantity must be a positive integer",
            ));
        }
        if quantity > self.available_quantity {
            return Err(DomainError::invariant(format!(
                "insufficient stock: requested {quantity}, available {}",
                self.available_quantity
            )));
        }
        self.available_quantity -= quantity;
        Ok(())
    }

    /// Replenish stock by `amount` units (administrative path).
    ///
    /// `amount` must be positive and the resulting count must fit in the
    /// ledger; an increment that would overflow is rejected unchanged.
    pub fn replenish(&mut self, amount: i64) -> DomainResult<()> {
        if amount <= 0 {
            return Err(DomainError::validation(
                "amount must be a positive integer",
            ));
        }
        self.available_quantity = self
            .available_quantity
            .checked_add(amount)
            .ok_or_else(|| DomainError::invariant("stock count overflow"))?;
        Ok(())
    }
}

impl Entity for Material {
    type Id = MaterialId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
