//! The two families of entries: income and expense.

use std::fmt::Display;

use crate::endpoints;

/// Which family a projection, record or category belongs to.
///
/// Both families share the same behaviour. They live in separate tables and
/// only expenses can name a payment method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// Money coming in, e.g. salary.
    Income,
    /// Money going out, e.g. rent.
    Expense,
}

impl Family {
    /// Both families, income first.
    pub const ALL: [Family; 2] = [Family::Income, Family::Expense];

    /// Whether entries in this family can reference a payment method.
    pub fn supports_payment_method(self) -> bool {
        matches!(self, Family::Expense)
    }

    pub(crate) fn category_table(self) -> &'static str {
        match self {
            Family::Income => "income_category",
            Family::Expense => "expense_category",
        }
    }

    pub(crate) fn projection_table(self) -> &'static str {
        match self {
            Family::Income => "income_projection",
            Family::Expense => "expense_projection",
        }
    }

    pub(crate) fn record_table(self) -> &'static str {
        match self {
            Family::Income => "income_record",
            Family::Expense => "expense_record",
        }
    }

    pub(crate) fn projections_endpoint(self) -> &'static str {
        match self {
            Family::Income => endpoints::INCOME_PROJECTIONS,
            Family::Expense => endpoints::EXPENSE_PROJECTIONS,
        }
    }

    pub(crate) fn projection_endpoint(self) -> &'static str {
        match self {
            Family::Income => endpoints::INCOME_PROJECTION,
            Family::Expense => endpoints::EXPENSE_PROJECTION,
        }
    }

    pub(crate) fn materialize_endpoint(self) -> &'static str {
        match self {
            Family::Income => endpoints::MATERIALIZE_INCOME_PROJECTION,
            Family::Expense => endpoints::MATERIALIZE_EXPENSE_PROJECTION,
        }
    }

    pub(crate) fn records_endpoint(self) -> &'static str {
        match self {
            Family::Income => endpoints::INCOMES,
            Family::Expense => endpoints::EXPENSES,
        }
    }

    pub(crate) fn record_endpoint(self) -> &'static str {
        match self {
            Family::Income => endpoints::INCOME,
            Family::Expense => endpoints::EXPENSE,
        }
    }

    pub(crate) fn categories_endpoint(self) -> &'static str {
        match self {
            Family::Income => endpoints::INCOME_CATEGORIES,
            Family::Expense => endpoints::EXPENSE_CATEGORIES,
        }
    }
}

impl Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Family::Income => f.write_str("income"),
            Family::Expense => f.write_str("expense"),
        }
    }
}
