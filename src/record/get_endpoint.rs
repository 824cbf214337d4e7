//! Endpoints for reading one record or a page of records.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    database_id::RecordId,
    owner::OwnerId,
    pagination::PageQueryParams,
    record::{RecordState, get_record, get_record_page},
};

/// Respond with the record in the path, or 404 if the caller has no such record.
pub async fn get_record_endpoint(
    Path(record_id): Path<RecordId>,
    State(state): State<RecordState>,
    Extension(owner): Extension<OwnerId>,
) -> Result<Response, Error> {
    get_record(&record_id, &owner, state.store.as_ref())?
        .map(|record| Json(record).into_response())
        .ok_or(Error::NotFound)
}

/// Respond with one page of the caller's records for a month.
pub async fn list_records_endpoint(
    State(state): State<RecordState>,
    Extension(owner): Extension<OwnerId>,
    Query(params): Query<PageQueryParams>,
) -> Result<Response, Error> {
    let filter = params.into_filter(owner, &state.pagination_config)?;

    let page = get_record_page(&filter, state.store.as_ref()).inspect_err(|error| {
        tracing::error!("Could not read {} records: {error}", state.store.family())
    })?;

    Ok(Json(page).into_response())
}
