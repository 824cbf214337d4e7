//! ID type definitions.

use uuid::Uuid;

/// Alias for the integer type used for category IDs.
pub type CategoryId = i64;
/// Alias for the integer type used for payment method IDs.
pub type PaymentMethodId = i64;
/// Projections are identified by an opaque string, a UUID when generated.
pub type ProjectionId = String;
/// Materialized records are identified by an opaque string, a UUID when generated.
pub type RecordId = String;

/// Generate a new random ID for a projection or record.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::generate_id;

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(generate_id(), generate_id());
    }
}
