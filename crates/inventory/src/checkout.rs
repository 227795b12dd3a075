use chrono::{DateTime, Utc};

use estoque_core::{CheckoutId, DomainError, DomainResult, Entity, MaterialId, UserId};

/// One act of a user taking a quantity of a material (retirada).
///
/// # Invariants
/// - `quantity` is strictly positive.
/// - `checkout_time` is set at creation and never changes.
/// - `return_time` transitions at most once from `None` to `Some`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkout {
    id: CheckoutId,
    user_id: UserId,
    material_id: MaterialId,
    quantity: i64,
    checkout_time: DateTime<Utc>,
    return_time: Option<DateTime<Utc>>,
}

impl Checkout {
    /// Create a new, open checkout.
    pub fn new(
        id: CheckoutId,
        user_id: UserId,
        material_id: MaterialId,
        quantity: i64,
        checkout_time: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if quantity <= 0 {
            return Err(DomainError::validation(
                "quantity must be a positive integer",
            ));
        }
        Ok(Self {
            id,
            user_id,
            material_id,
            quantity,
            checkout_time,
            return_time: None,
        })
    }

    /// Rehydrate a checkout from stored fields.
    pub fn from_parts(
        id: CheckoutId,
        user_id: UserId,
        material_id: MaterialId,
        quantity: i64,
        checkout_time: DateTime<Utc>,
        return_time: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            user_id,
            material_id,
            quantity,
            checkout_time,
            return_time,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn material_id(&self) -> MaterialId {
        self.material_id
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn checkout_time(&self) -> DateTime<Utc> {
        self.checkout_time
    }

    pub fn return_time(&self) -> Option<DateTime<Utc>> {
        self.return_time
    }

    /// An open checkout is an outstanding debt: not yet returned.
    pub fn is_open(&self) -> bool {
        self.return_time.is_none()
    }

    /// Mark the checkout as returned (administrative bookkeeping).
    ///
    /// The transition happens at most once.
    pub fn mark_returned(&mut self, at: DateTime<Utc>) -> DomainResult<()> {
        if self.return_time.is_some() {
            return Err(DomainError::conflict("checkout already returned"));
        }
        self.return_time = Some(at);
        Ok(())
    }
}

impl Entity for Checkout {
    type Id = CheckoutId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
