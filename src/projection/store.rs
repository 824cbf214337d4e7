//! Defines the projection store trait.

use std::fmt::Debug;

use crate::{
    Error,
    family::Family,
    owner::OwnerId,
    period::{MonthPeriod, PeriodQuery},
    projection::Projection,
    record::MaterializedRecord,
};

/// Handles the persistence of one family's projections.
///
/// Every lookup and change is scoped to an owner: a projection belonging to
/// someone else behaves the same as one that does not exist.
pub trait ProjectionStore: Debug + Send + Sync {
    /// The family of the projections in this store.
    fn family(&self) -> Family;

    /// Add a new projection to the store.
    ///
    /// # Errors
    /// Returns [Error::InvalidReference] if the category or payment method does not exist.
    fn save(&self, projection: Projection) -> Result<Projection, Error>;

    /// Retrieve the projection `id` belonging to `owner`, or `None` if there is no such projection.
    fn get_by_id(&self, id: &str, owner: &OwnerId) -> Result<Option<Projection>, Error>;

    /// Overwrite the stored projection with the same ID and owner as `projection`.
    ///
    /// The materialization flag is left as it is in the store, only
    /// [ProjectionStore::save_materialized] may change it.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no such projection, or
    /// [Error::InvalidReference] if the category or payment method does not exist.
    fn edit(&self, projection: Projection) -> Result<Projection, Error>;

    /// Delete the projection `id` belonging to `owner`.
    ///
    /// A record already materialized from the projection is kept and loses its
    /// back-reference.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no such projection.
    fn remove(&self, id: &str, owner: &OwnerId) -> Result<(), Error>;

    /// Count the projections of `owner` scheduled within `period`.
    fn get_total_records(&self, period: MonthPeriod, owner: &OwnerId) -> Result<u64, Error>;

    /// Retrieve the slice of projections described by `query`, ordered by
    /// scheduled date, then creation time, then ID.
    fn get_all(&self, query: &PeriodQuery) -> Result<Vec<Projection>, Error>;

    /// Save `record` and mark the projection it references as materialized,
    /// as one atomic step.
    ///
    /// Either both changes happen or neither does.
    ///
    /// # Errors
    /// Returns:
    /// - [Error::MissingProjectionReference] if `record` has no projection ID,
    /// - [Error::NotFound] if the projection does not exist or belongs to someone else,
    /// - [Error::AlreadyMaterialized] if the projection is already materialized,
    ///   including when a concurrent call got there first.
    fn save_materialized(&self, record: MaterializedRecord) -> Result<MaterializedRecord, Error>;
}
