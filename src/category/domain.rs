//! Reference data types: categories, payment methods and references to them.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    database_id::{CategoryId, PaymentMethodId},
};

/// A validated, non-empty label for a category or payment method.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Label(String);

impl Label {
    /// Create a label.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyLabel] if `label` is empty or only whitespace.
    pub fn new(label: &str) -> Result<Self, Error> {
        let label = label.trim();

        if label.is_empty() {
            Err(Error::EmptyLabel)
        } else {
            Ok(Self(label.to_string()))
        }
    }

    /// Create a label without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(label: &str) -> Self {
        Self(label.to_string())
    }
}

impl AsRef<str> for Label {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A category that projections and records of one family are grouped by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The name shown for the category.
    pub label: Label,
}

/// How an expense is paid, e.g. "Credit card".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PaymentMethod {
    /// The ID of the payment method.
    pub id: PaymentMethodId,
    /// The name shown for the payment method.
    pub label: Label,
}

/// A reference from a projection or record to a category or payment method.
///
/// The label is only filled in when the entry is read back from a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    /// The ID of the referenced row.
    pub id: i64,
    /// The label of the referenced row, if it has been looked up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Reference {
    /// A reference to `id` whose label has not been looked up yet.
    pub fn to(id: i64) -> Self {
        Self { id, label: None }
    }
}

#[cfg(test)]
mod label_tests {
    use crate::Error;

    use super::Label;

    #[test]
    fn new_fails_on_empty_string() {
        assert_eq!(Label::new(""), Err(Error::EmptyLabel));
    }

    #[test]
    fn new_fails_on_just_whitespace() {
        assert_eq!(Label::new("\n\t \r"), Err(Error::EmptyLabel));
    }

    #[test]
    fn new_trims_whitespace() {
        assert_eq!(Label::new("  Salary "), Ok(Label::new_unchecked("Salary")));
    }
}
