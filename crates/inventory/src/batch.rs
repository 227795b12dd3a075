//! Field-level validation for a checkout batch submission.
//!
//! Models the multi-row form boundary: a submission carries several rows,
//! some of which may be blank (untouched extra rows). Blank rows are skipped
//! silently; rows with data must be fully valid or the whole batch is
//! rejected with per-row errors and nothing is applied.

use serde::Serialize;

use estoque_core::MaterialId;

/// One raw row of a checkout submission, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub material_id: Option<MaterialId>,
    pub quantity: Option<i64>,
}

impl CheckoutRequest {
    /// A blank row carries no submitted data at all.
    pub fn is_blank(&self) -> bool {
        self.material_id.is_none() && self.quantity.is_none()
    }
}

/// A validated row, ready to apply. Keeps the original row index so later
/// stages (e.g. the existence check) can still report against the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutLine {
    pub row: usize,
    pub material_id: MaterialId,
    pub quantity: i64,
}

/// A field-level error on one row of the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    pub row: usize,
    pub field: String,
    pub message: String,
}

impl RowError {
    pub fn new(row: usize, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            row,
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validate every row of a batch.
///
/// Returns the non-blank, valid lines, or every field error found — the
/// caller must not apply anything when errors are present.
pub fn validate_batch(rows: &[CheckoutRequest]) -> Result<Vec<CheckoutLine>, Vec<RowError>> {
    let mut lines = Vec::new();
    let mut errors = Vec::new();

    for (row, request) in rows.iter().enumerate() {
        if request.is_blank() {
            continue;
        }

        let material_id = match request.material_id {
            Some(id) => Some(id),
            None => {
                errors.push(RowError::new(row, "material", "material is required"));
                None
            }
        };

        let quantity = match request.quantity {
            Some(q) if q > 0 => Some(q),
            Some(_) => {
                errors.push(RowError::new(
                    row,
                    "quantity",
                    "quantity must be a positive integer",
                ));
                None
            }
            None => {
                errors.push(RowError::new(row, "quantity", "quantity is required"));
                None
            }
        };

        if let (Some(material_id), Some(quantity)) = (material_id, quantity) {
            lines.push(CheckoutLine {
                row,
                material_id,
                quantity,
            });
        }
    }

    if errors.is_empty() {
        Ok(lines)
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank() -> CheckoutRequest {
        CheckoutRequest {
            material_id: None,
            quantity: None,
        }
    }

    fn row(material_id: Option<MaterialId>, quantity: Option<i64>) -> CheckoutRequest {
        CheckoutRequest {
            material_id,
            quantity,
        }
    }

    #[test]
    fn blank_rows_are_skipped() {
        let m = MaterialId::new();
        let lines = validate_batch(&[blank(), row(Some(m), Some(3)), blank()]).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].row, 1);
        assert_eq!(lines[0].material_id, m);
        assert_eq!(lines[0].quantity, 3);
    }

    #[test]
    fn all_blank_batch_yields_no_lines() {
        let lines = validate_batch(&[blank(), blank()]).unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn zero_quantity_is_a_field_error() {
        let errors = validate_batch(&[row(Some(MaterialId::new()), Some(0))]).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].row, 0);
        assert_eq!(errors[0].field, "quantity");
    }

    #[test]
    fn missing_material_on_non_blank_row_is_an_error() {
        let errors = validate_batch(&[row(None, Some(2))]).unwrap_err();
        assert_eq!(errors[0].field, "material");
    }

    #[test]
    fn missing_quantity_on_non_blank_row_is_an_error() {
        let errors = validate_batch(&[row(Some(MaterialId::new()), None)]).unwrap_err();
        assert_eq!(errors[0].field, "quantity");
    }

    #[test]
    fn one_bad_row_rejects_the_whole_batch() {
        let m = MaterialId::new();
        let errors = validate_batch(&[
            row(Some(m), Some(1)),
            row(Some(m), Some(-4)),
            row(Some(m), Some(2)),
        ])
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].row, 1);
    }

    #[test]
    fn errors_accumulate_across_rows() {
        let errors = validate_batch(&[row(None, Some(0)), row(Some(MaterialId::new()), None)])
            .unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn arb_request() -> impl Strategy<Value = CheckoutRequest> {
            (
                proptest::option::of(Just(MaterialId::new())),
                proptest::option::of(-5i64..50),
            )
                .prop_map(|(material_id, quantity)| CheckoutRequest {
                    material_id,
                    quantity,
                })
        }

        proptest! {
            #[test]
            fn accepted_lines_always_carry_positive_quantities(
                rows in proptest::collection::vec(arb_request(), 0..16),
            ) {
                if let Ok(lines) = validate_batch(&rows) {
                    for line in lines {
                        prop_assert!(line.quantity > 0);
                        prop_assert!(!rows[line.row].is_blank());
                    }
                }
            }
        }
    }
}
