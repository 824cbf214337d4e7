//! Record creation endpoint.

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use time::OffsetDateTime;

use crate::{
    Error,
    owner::OwnerId,
    record::{CreateRecordRequest, RecordState, create_record},
    timezone::get_local_offset,
};

/// Handle a request to create a record that does not come from a projection.
pub async fn create_record_endpoint(
    State(state): State<RecordState>,
    Extension(owner): Extension<OwnerId>,
    Json(request): Json<CreateRecordRequest>,
) -> Result<Response, Error> {
    let local_offset = get_local_offset(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;
    let today = OffsetDateTime::now_utc().to_offset(local_offset).date();

    let record = create_record(request, &owner, today, state.store.as_ref()).inspect_err(|error| {
        tracing::warn!("Could not create {} record: {error}", state.store.family())
    })?;

    Ok((StatusCode::CREATED, Json(record)).into_response())
}
