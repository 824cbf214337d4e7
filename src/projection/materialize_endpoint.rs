//! Endpoint for turning a projection into a record.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    database_id::ProjectionId,
    owner::OwnerId,
    projection::{MaterializeOverride, Materialization, ProjectionState, materialize},
    record::RecordResponse,
    render_message,
};

/// Materialize the projection in the path.
///
/// The body is optional. Responds with 201 and the new record, 404 if the
/// caller has no such projection, or 409 if it was already materialized.
pub async fn materialize_projection_endpoint(
    Path(projection_id): Path<ProjectionId>,
    State(state): State<ProjectionState>,
    Extension(owner): Extension<OwnerId>,
    body: Option<Json<MaterializeOverride>>,
) -> Result<Response, Error> {
    let override_values = body.map(|Json(values)| values).unwrap_or_default();
    let family = state.store.family();

    let outcome = materialize(
        &projection_id,
        &owner,
        &override_values,
        state.store.as_ref(),
    )
    .inspect_err(|error| {
        tracing::error!("Could not materialize {family} projection {projection_id}: {error}")
    })?;

    match outcome {
        Materialization::Created(record) => {
            Ok((StatusCode::CREATED, Json(RecordResponse::from(record))).into_response())
        }
        Materialization::NotFound => Ok(render_message(
            StatusCode::NOT_FOUND,
            &format!("The {family} projection could not be found"),
        )),
        Materialization::AlreadyDone => Ok(render_message(
            StatusCode::CONFLICT,
            &format!("A {family} record was already created from this projection"),
        )),
    }
}
