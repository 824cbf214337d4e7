//! Resolves callers to owners from their access tokens.

mod identity;
mod middleware;

pub use identity::{ClaimsIdentityProvider, IdentityProvider, StaticIdentityProvider};
pub use middleware::{ACCESS_TOKEN_HEADER, OwnerGuardState, owner_guard};
