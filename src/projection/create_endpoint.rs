//! Projection creation endpoint.

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    owner::OwnerId,
    projection::{CreateProjectionRequest, ProjectionState, create_projection},
};

/// Handle a request to create projections, responding with the first one.
pub async fn create_projection_endpoint(
    State(state): State<ProjectionState>,
    Extension(owner): Extension<OwnerId>,
    Json(request): Json<CreateProjectionRequest>,
) -> Result<Response, Error> {
    let projection = create_projection(request, &owner, state.store.as_ref()).inspect_err(|error| {
        tracing::warn!("Could not create {} projection: {error}", state.store.family())
    })?;

    Ok((StatusCode::CREATED, Json(projection)).into_response())
}

#[cfg(test)]
mod create_projection_endpoint_tests {
    use std::sync::Arc;

    use axum::{Extension, Router, http::StatusCode, routing::post};
    use axum_test::TestServer;
    use serde_json::json;
    use time::macros::date;

    use crate::{
        endpoints, family::Family, memory_store::InMemoryStore, owner::OwnerId,
        pagination::PaginationConfig,
        projection::{ProjectionResponse, ProjectionState},
    };

    use super::create_projection_endpoint;

    fn get_test_server(store: &InMemoryStore) -> TestServer {
        let app = Router::new()
            .route(endpoints::EXPENSE_PROJECTIONS, post(create_projection_endpoint))
            .layer(Extension(OwnerId::new("alice")))
            .with_state(ProjectionState {
                store: Arc::new(store.projection_store()),
                pagination_config: PaginationConfig::default(),
            });

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn creates_recurring_projections() {
        let store = InMemoryStore::new(Family::Expense);
        store.add_category(1, "Rent");
        let server = get_test_server(&store);

        let response = server
            .post(endpoints::EXPENSE_PROJECTIONS)
            .json(&json!({
                "scheduled_date": "2024-01-15",
                "description": "Rent",
                "value": 450.0,
                "recurrence": 3,
                "category_id": 1,
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let projection = response.json::<ProjectionResponse>();
        assert_eq!(projection.recurrence, Some(3));
        assert_eq!(projection.scheduled_date, date!(2024 - 01 - 15));
        assert_eq!(projection.category.as_deref(), Some("Rent"));
        assert_eq!(store.projections().len(), 3);
    }

    #[tokio::test]
    async fn unknown_category_is_bad_request() {
        let store = InMemoryStore::new(Family::Expense);
        let server = get_test_server(&store);

        let response = server
            .post(endpoints::EXPENSE_PROJECTIONS)
            .json(&json!({
                "scheduled_date": "2024-01-15",
                "description": "Rent",
                "value": 450.0,
                "category_id": 7,
            }))
            .await;

        response.assert_status_bad_request();
        assert_eq!(response.json::<serde_json::Value>()["status"], 400);
        assert!(store.projections().is_empty());
    }
}
