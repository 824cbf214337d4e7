//! Request and response bodies for the record endpoints.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    database_id::{CategoryId, PaymentMethodId, ProjectionId, RecordId},
    record::MaterializedRecord,
};

/// The body of a request to create a record directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRecordRequest {
    /// The date the record applies to, defaults to today.
    #[serde(default)]
    pub scheduled_date: Option<Date>,
    /// When the income was earned or the expense bought, defaults to the scheduled date.
    #[serde(default)]
    pub incurred_date: Option<Date>,
    /// A text description of the record.
    pub description: String,
    /// The amount of money.
    pub value: f64,
    /// Whether the income is passive.
    #[serde(default)]
    pub is_passive: bool,
    /// The category to group the record under.
    pub category_id: CategoryId,
    /// How an expense was paid. Ignored for income.
    #[serde(default)]
    pub payment_method_id: Option<PaymentMethodId>,
}

/// The body of a request to change a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRecordRequest {
    /// The date the record applies to.
    pub scheduled_date: Date,
    /// When the income was earned or the expense bought, defaults to `scheduled_date`.
    #[serde(default)]
    pub incurred_date: Option<Date>,
    /// A text description of the record.
    pub description: String,
    /// The amount of money.
    pub value: f64,
    /// Whether the income is passive.
    #[serde(default)]
    pub is_passive: bool,
    /// The category to group the record under.
    pub category_id: CategoryId,
    /// How an expense was paid. Ignored for income.
    #[serde(default)]
    pub payment_method_id: Option<PaymentMethodId>,
}

/// A record as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordResponse {
    pub id: RecordId,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub scheduled_date: Date,
    pub incurred_date: Date,
    pub description: String,
    pub value: f64,
    pub is_passive: bool,
    pub category_id: CategoryId,
    pub category: Option<String>,
    pub payment_method_id: Option<PaymentMethodId>,
    pub payment_method: Option<String>,
    /// The projection the record was materialized from, if any.
    pub projection_id: Option<ProjectionId>,
}

impl From<MaterializedRecord> for RecordResponse {
    fn from(record: MaterializedRecord) -> Self {
        let (payment_method_id, payment_method) = match record.payment_method {
            Some(method) => (Some(method.id), method.label),
            None => (None, None),
        };

        Self {
            id: record.id,
            created_at: record.created_at,
            scheduled_date: record.scheduled_date,
            incurred_date: record.incurred_date,
            description: record.description,
            value: record.value,
            is_passive: record.is_passive,
            category_id: record.category.id,
            category: record.category.label,
            payment_method_id,
            payment_method,
            projection_id: record.projection_id,
        }
    }
}
