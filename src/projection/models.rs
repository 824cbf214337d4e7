//! Request and response bodies for the projection endpoints.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    database_id::{CategoryId, PaymentMethodId, ProjectionId},
    projection::Projection,
};

/// The body of a request to create one or more projections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateProjectionRequest {
    /// The date the expected income or expense applies to.
    pub scheduled_date: Date,
    /// When the income will be earned or the expense bought, defaults to `scheduled_date`.
    #[serde(default)]
    pub incurred_date: Option<Date>,
    /// A text description of the projection.
    pub description: String,
    /// The expected amount of money.
    pub value: f64,
    /// Whether the income is passive.
    #[serde(default)]
    pub is_passive: bool,
    /// How many monthly projections to create, 0 and 1 both create one.
    #[serde(default)]
    pub recurrence: u32,
    /// The category to group the projection under.
    pub category_id: CategoryId,
    /// How an expense will be paid. Ignored for income.
    #[serde(default)]
    pub payment_method_id: Option<PaymentMethodId>,
}

/// The body of a request to change a projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateProjectionRequest {
    /// The date the expected income or expense applies to.
    pub scheduled_date: Date,
    /// When the income will be earned or the expense bought, defaults to `scheduled_date`.
    #[serde(default)]
    pub incurred_date: Option<Date>,
    /// A text description of the projection.
    pub description: String,
    /// The expected amount of money.
    pub value: f64,
    /// Whether the income is passive.
    #[serde(default)]
    pub is_passive: bool,
    /// The category to group the projection under.
    pub category_id: CategoryId,
    /// How an expense will be paid. Ignored for income.
    #[serde(default)]
    pub payment_method_id: Option<PaymentMethodId>,
}

/// A projection as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResponse {
    pub id: ProjectionId,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub scheduled_date: Date,
    pub incurred_date: Date,
    pub description: String,
    pub value: f64,
    pub is_passive: bool,
    pub is_materialized: bool,
    pub category_id: CategoryId,
    pub category: Option<String>,
    pub payment_method_id: Option<PaymentMethodId>,
    pub payment_method: Option<String>,
    /// How many projections a create request produced. Only set on create responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<u32>,
}

impl From<Projection> for ProjectionResponse {
    fn from(projection: Projection) -> Self {
        let (payment_method_id, payment_method) = match projection.payment_method {
            Some(method) => (Some(method.id), method.label),
            None => (None, None),
        };

        Self {
            id: projection.id,
            created_at: projection.created_at,
            scheduled_date: projection.scheduled_date,
            incurred_date: projection.incurred_date,
            description: projection.description,
            value: projection.value,
            is_passive: projection.is_passive,
            is_materialized: projection.is_materialized,
            category_id: projection.category.id,
            category: projection.category.label,
            payment_method_id,
            payment_method,
            recurrence: None,
        }
    }
}
