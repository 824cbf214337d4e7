//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/v1/income/{record_id}', use [format_endpoint].

/// The route to create and list income projections.
pub const INCOME_PROJECTIONS: &str = "/v1/income-projection";
/// The route to access a single income projection.
pub const INCOME_PROJECTION: &str = "/v1/income-projection/{projection_id}";
/// The route to turn an income projection into an income record.
pub const MATERIALIZE_INCOME_PROJECTION: &str = "/v1/income-projection/{projection_id}/materialize";
/// The route to create and list expense projections.
pub const EXPENSE_PROJECTIONS: &str = "/v1/expense-projection";
/// The route to access a single expense projection.
pub const EXPENSE_PROJECTION: &str = "/v1/expense-projection/{projection_id}";
/// The route to turn an expense projection into an expense record.
pub const MATERIALIZE_EXPENSE_PROJECTION: &str =
    "/v1/expense-projection/{projection_id}/materialize";

/// The route to create and list income records.
pub const INCOMES: &str = "/v1/income";
/// The route to access a single income record.
pub const INCOME: &str = "/v1/income/{record_id}";
/// The route to create and list expense records.
pub const EXPENSES: &str = "/v1/expense";
/// The route to access a single expense record.
pub const EXPENSE: &str = "/v1/expense/{record_id}";

/// The route to list income categories.
pub const INCOME_CATEGORIES: &str = "/v1/income-category";
/// The route to list expense categories.
pub const EXPENSE_CATEGORIES: &str = "/v1/expense-category";
/// The route to list payment methods.
pub const PAYMENT_METHODS: &str = "/v1/payment-method";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/v1/income/{record_id}', '{record_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and that the first parameter is the one to replace.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: &str) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let Some(param_length) = endpoint_path[param_start..].find('}') else {
        return endpoint_path.to_owned();
    };
    let param_end = param_start + param_length;

    let param = &endpoint_path[param_start + 1..param_end];

    if param.is_empty() || !param.chars().all(|c| c.is_ascii_lowercase() || c == '_') {
        return endpoint_path.to_owned();
    }

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end + 1..]
    )
}

#[cfg(test)]
mod format_endpoint_tests {
    use super::{MATERIALIZE_INCOME_PROJECTION, format_endpoint};

    #[test]
    fn replaces_parameter() {
        assert_eq!(format_endpoint("/v1/income/{record_id}", "abc"), "/v1/income/abc");
    }

    #[test]
    fn replaces_parameter_in_middle_of_path() {
        assert_eq!(
            format_endpoint(MATERIALIZE_INCOME_PROJECTION, "abc"),
            "/v1/income-projection/abc/materialize"
        );
    }

    #[test]
    fn returns_path_without_parameter_unchanged() {
        assert_eq!(format_endpoint("/v1/income", "abc"), "/v1/income");
    }

    #[test]
    fn ignores_malformed_parameter() {
        assert_eq!(format_endpoint("/v1/{Bad}", "abc"), "/v1/{Bad}");
        assert_eq!(format_endpoint("/v1/{unclosed", "abc"), "/v1/{unclosed");
        assert_eq!(format_endpoint("/v1/{}", "abc"), "/v1/{}");
    }
}
