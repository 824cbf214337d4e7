//! Middleware that resolves the caller's owner ID before a request reaches a handler.

use std::sync::Arc;

use axum::{
    extract::{FromRef, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{AppState, Error, auth::IdentityProvider};

/// The header that carries the caller's access token.
pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";

/// The state needed for the owner guard.
#[derive(Debug, Clone)]
pub struct OwnerGuardState {
    /// Resolves access tokens to owners.
    pub identity_provider: Arc<dyn IdentityProvider>,
}

impl FromRef<AppState> for OwnerGuardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            identity_provider: state.identity_provider.clone(),
        }
    }
}

/// Middleware function that resolves the access token header to an owner.
///
/// The owner ID is placed into the request extensions and the request
/// executed normally if the token is valid, otherwise a 401 response is
/// returned.
///
/// **Note**: Route handlers can use the function argument `Extension(owner): Extension<OwnerId>` to receive the owner ID.
pub async fn owner_guard(
    State(state): State<OwnerGuardState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match request.headers().get(ACCESS_TOKEN_HEADER) {
        Some(value) => match value.to_str() {
            Ok(token) if !token.trim().is_empty() => token.trim().to_owned(),
            Ok(_) => return Error::MissingAccessToken.into_response(),
            Err(_) => {
                return Error::InvalidAccessToken("header is not visible ASCII".to_owned())
                    .into_response();
            }
        },
        None => return Error::MissingAccessToken.into_response(),
    };

    let owner = match state.identity_provider.resolve_owner(&token) {
        Ok(owner) => owner,
        Err(error) => {
            tracing::debug!("Rejected access token: {error}");
            return error.into_response();
        }
    };

    request.extensions_mut().insert(owner);
    next.run(request).await
}

#[cfg(test)]
mod owner_guard_tests {
    use std::sync::Arc;

    use axum::{Extension, Router, middleware, routing::get};
    use axum_test::TestServer;

    use crate::{auth::StaticIdentityProvider, owner::OwnerId};

    use super::{ACCESS_TOKEN_HEADER, OwnerGuardState, owner_guard};

    async fn whoami(Extension(owner): Extension<OwnerId>) -> String {
        owner.to_string()
    }

    fn get_test_server() -> TestServer {
        let state = OwnerGuardState {
            identity_provider: Arc::new(StaticIdentityProvider::new().with_token("t0k3n", "alice")),
        };
        let app = Router::new()
            .route("/whoami", get(whoami))
            .layer(middleware::from_fn_with_state(state, owner_guard));

        TestServer::try_new(app).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn valid_token_passes_owner_to_handler() {
        let server = get_test_server();

        let response = server
            .get("/whoami")
            .add_header(ACCESS_TOKEN_HEADER, "t0k3n")
            .await;

        response.assert_status_ok();
        response.assert_text("alice");
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let server = get_test_server();

        server.get("/whoami").await.assert_status_unauthorized();
    }

    #[tokio::test]
    async fn blank_token_is_unauthorized() {
        let server = get_test_server();

        server
            .get("/whoami")
            .add_header(ACCESS_TOKEN_HEADER, "  ")
            .await
            .assert_status_unauthorized();
    }

    #[tokio::test]
    async fn unknown_token_is_unauthorized() {
        let server = get_test_server();

        let response = server
            .get("/whoami")
            .add_header(ACCESS_TOKEN_HEADER, "nope")
            .await;

        response.assert_status_unauthorized();
        assert_eq!(response.json::<serde_json::Value>()["status"], 401);
    }
}
