//! Defines the record store trait.

use std::fmt::Debug;

use crate::{
    Error,
    family::Family,
    owner::OwnerId,
    period::{MonthPeriod, PeriodQuery},
    record::MaterializedRecord,
};

/// Handles the persistence of one family's materialized records.
///
/// Every lookup and change is scoped to an owner.
pub trait RecordStore: Debug + Send + Sync {
    /// The family of the records in this store.
    fn family(&self) -> Family;

    /// Add a new record to the store.
    ///
    /// # Errors
    /// Returns [Error::InvalidReference] if the category or payment method does not exist.
    fn save(&self, record: MaterializedRecord) -> Result<MaterializedRecord, Error>;

    /// Retrieve the record `id` belonging to `owner`, or `None` if there is no such record.
    fn get_by_id(&self, id: &str, owner: &OwnerId) -> Result<Option<MaterializedRecord>, Error>;

    /// Overwrite the stored record with the same ID and owner as `record`.
    ///
    /// The creation time and the projection the record came from are left as
    /// they are in the store.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no such record, or
    /// [Error::InvalidReference] if the category or payment method does not exist.
    fn edit(&self, record: MaterializedRecord) -> Result<MaterializedRecord, Error>;

    /// Delete the record `id` belonging to `owner`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no such record.
    fn remove(&self, id: &str, owner: &OwnerId) -> Result<(), Error>;

    /// Count the records of `owner` scheduled within `period`.
    fn get_total_records(&self, period: MonthPeriod, owner: &OwnerId) -> Result<u64, Error>;

    /// Retrieve the slice of records described by `query`, ordered by
    /// scheduled date, then creation time, then ID.
    fn get_all(&self, query: &PeriodQuery) -> Result<Vec<MaterializedRecord>, Error>;
}
