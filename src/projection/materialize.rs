//! Turns a pending projection into a materialized record, at most once.

use serde::Deserialize;
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    database_id::generate_id,
    owner::OwnerId,
    projection::{Projection, ProjectionStore},
    record::MaterializedRecord,
};

/// Values that replace the ones copied from the projection when it is materialized.
///
/// A zero value or a missing date means "keep the projection's own".
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MaterializeOverride {
    /// The amount actually earned or spent.
    #[serde(default)]
    pub value: f64,
    /// The date the record applies to.
    #[serde(default)]
    pub scheduled_date: Option<Date>,
    /// When the income was actually earned or the expense bought.
    #[serde(default)]
    pub incurred_date: Option<Date>,
}

/// The outcome of [materialize].
#[derive(Debug, Clone, PartialEq)]
pub enum Materialization {
    /// There is no such projection for the owner. Nothing was written.
    NotFound,
    /// The projection was materialized before. Nothing was written.
    AlreadyDone,
    /// The record was saved and the projection is now marked as materialized.
    Created(MaterializedRecord),
}

/// Build the record for `projection`, applying `override_values`.
pub fn build_record(
    projection: &Projection,
    override_values: &MaterializeOverride,
    created_at: OffsetDateTime,
) -> MaterializedRecord {
    let value = if override_values.value != 0.0 {
        override_values.value
    } else {
        projection.value
    };

    MaterializedRecord {
        id: generate_id(),
        created_at,
        scheduled_date: override_values
            .scheduled_date
            .unwrap_or(projection.scheduled_date),
        incurred_date: override_values
            .incurred_date
            .unwrap_or(projection.incurred_date),
        description: projection.description.clone(),
        value,
        is_passive: projection.is_passive,
        owner: projection.owner.clone(),
        category: projection.category.clone(),
        payment_method: projection.payment_method.clone(),
        projection_id: Some(projection.id.clone()),
    }
}

/// Materialize the projection `id` belonging to `owner`.
///
/// The record copies the projection's fields, with any non-zero values in
/// `override_values` taking their place. The record and the projection's flag
/// are saved together, so a projection is never materialized twice even when
/// two calls race.
///
/// # Errors
/// Returns any error from the store other than the ones reported as
/// [Materialization::NotFound] or [Materialization::AlreadyDone].
pub fn materialize(
    id: &str,
    owner: &OwnerId,
    override_values: &MaterializeOverride,
    store: &dyn ProjectionStore,
) -> Result<Materialization, Error> {
    let Some(projection) = store.get_by_id(id, owner)? else {
        return Ok(Materialization::NotFound);
    };

    if projection.is_materialized {
        return Ok(Materialization::AlreadyDone);
    }

    let record = build_record(&projection, override_values, OffsetDateTime::now_utc());

    match store.save_materialized(record) {
        Ok(record) => {
            tracing::info!(
                "Materialized {} projection {} as record {}",
                store.family(),
                projection.id,
                record.id
            );
            Ok(Materialization::Created(record))
        }
        Err(Error::AlreadyMaterialized(_)) => Ok(Materialization::AlreadyDone),
        Err(Error::NotFound) => Ok(Materialization::NotFound),
        Err(error) => Err(error),
    }
}
