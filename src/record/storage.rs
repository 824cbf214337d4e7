//! Creating, changing, deleting and reading materialized records.

use time::{Date, OffsetDateTime};

use crate::{
    Error,
    category::Reference,
    database_id::generate_id,
    owner::OwnerId,
    pagination::{Page, PageFilter, read_page},
    record::{
        CreateRecordRequest, MaterializedRecord, RecordResponse, RecordStore,
        UpdateRecordRequest,
    },
};

/// Create a record from `request` for `owner` that does not come from a projection.
///
/// The scheduled date defaults to `today` and the incurred date to the
/// scheduled date.
///
/// # Errors
/// Returns [Error::InvalidReference] for an unknown category or payment
/// method, or any other error from the store.
pub fn create_record(
    request: CreateRecordRequest,
    owner: &OwnerId,
    today: Date,
    store: &dyn RecordStore,
) -> Result<RecordResponse, Error> {
    let scheduled_date = request.scheduled_date.unwrap_or(today);
    let payment_method = request
        .payment_method_id
        .filter(|_| store.family().supports_payment_method())
        .map(Reference::to);

    let record = store.save(MaterializedRecord {
        id: generate_id(),
        created_at: OffsetDateTime::now_utc(),
        scheduled_date,
        incurred_date: request.incurred_date.unwrap_or(scheduled_date),
        description: request.description,
        value: request.value,
        is_passive: request.is_passive,
        owner: owner.clone(),
        category: Reference::to(request.category_id),
        payment_method,
        projection_id: None,
    })?;

    store
        .get_by_id(&record.id, owner)?
        .map(RecordResponse::from)
        .ok_or(Error::NotFound)
}

/// Replace the fields of the record `id` belonging to `owner` with those in `request`.
///
/// The owner, creation time and the projection the record came from are
/// kept. Returns `None` if there is no such record.
///
/// # Errors
/// Returns [Error::InvalidReference] for an unknown category or payment
/// method, or any other error from the store.
pub fn update_record(
    id: &str,
    request: UpdateRecordRequest,
    owner: &OwnerId,
    store: &dyn RecordStore,
) -> Result<Option<RecordResponse>, Error> {
    let Some(existing) = store.get_by_id(id, owner)? else {
        return Ok(None);
    };

    let payment_method = request
        .payment_method_id
        .filter(|_| store.family().supports_payment_method())
        .map(Reference::to);

    let record = MaterializedRecord {
        id: existing.id,
        created_at: existing.created_at,
        scheduled_date: request.scheduled_date,
        incurred_date: request.incurred_date.unwrap_or(request.scheduled_date),
        description: request.description,
        value: request.value,
        is_passive: request.is_passive,
        owner: existing.owner,
        category: Reference::to(request.category_id),
        payment_method,
        projection_id: existing.projection_id,
    };

    match store.edit(record) {
        Ok(_) => {}
        Err(Error::NotFound) => return Ok(None),
        Err(error) => return Err(error),
    }

    Ok(store.get_by_id(id, owner)?.map(RecordResponse::from))
}

/// Delete the record `id` belonging to `owner`.
///
/// # Errors
/// Returns [Error::NotFound] if there is no such record, or any other error from the store.
pub fn delete_record(id: &str, owner: &OwnerId, store: &dyn RecordStore) -> Result<(), Error> {
    store.remove(id, owner)
}

/// Get the record `id` belonging to `owner`, or `None` if there is no such record.
pub fn get_record(
    id: &str,
    owner: &OwnerId,
    store: &dyn RecordStore,
) -> Result<Option<RecordResponse>, Error> {
    Ok(store.get_by_id(id, owner)?.map(RecordResponse::from))
}

/// Get one page of the records matching `filter`.
pub fn get_record_page(
    filter: &PageFilter,
    store: &dyn RecordStore,
) -> Result<Page<RecordResponse>, Error> {
    read_page(
        filter,
        |period, owner| store.get_total_records(period, owner),
        |query| store.get_all(query),
        RecordResponse::from,
    )
}
