//! Resolves the access token on a request to the owner it was issued to.

use std::{collections::HashMap, fmt::Debug};

use base64::{
    Engine,
    engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD},
};
use serde::Deserialize;

use crate::{Error, owner::OwnerId};

/// Resolves an opaque access token to an owner ID.
pub trait IdentityProvider: Debug + Send + Sync {
    /// Get the owner that `token` was issued to.
    ///
    /// # Errors
    /// Returns [Error::InvalidAccessToken] if `token` does not identify an owner.
    fn resolve_owner(&self, token: &str) -> Result<OwnerId, Error>;
}

/// The claims of an access token that this service cares about.
#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
}

/// Reads the owner from the `sub` claim of a JSON web token.
///
/// The token signature is not checked here. Tokens are verified by the
/// gateway in front of this service before they reach it.
#[derive(Debug, Clone, Default)]
pub struct ClaimsIdentityProvider;

impl IdentityProvider for ClaimsIdentityProvider {
    fn resolve_owner(&self, token: &str) -> Result<OwnerId, Error> {
        let mut segments = token.split('.');
        let payload = match (segments.next(), segments.next(), segments.next()) {
            (Some(_), Some(payload), Some(_)) if segments.next().is_none() => payload,
            _ => {
                return Err(Error::InvalidAccessToken(
                    "expected three dot separated segments".to_owned(),
                ));
            }
        };
        let payload = payload.trim_end_matches('=');

        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .or_else(|_| STANDARD_NO_PAD.decode(payload))
            .map_err(|error| Error::InvalidAccessToken(format!("bad payload encoding: {error}")))?;
        let claims: Claims = serde_json::from_slice(&bytes)
            .map_err(|error| Error::InvalidAccessToken(format!("bad claims: {error}")))?;

        let subject = claims.sub.trim();
        if subject.is_empty() {
            return Err(Error::InvalidAccessToken("empty subject".to_owned()));
        }

        Ok(OwnerId::new(subject))
    }
}

/// Resolves a fixed set of tokens, for tests and local development.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityProvider {
    owners: HashMap<String, OwnerId>,
}

impl StaticIdentityProvider {
    /// Create a provider that knows no tokens.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `token` to `owner` from now on.
    pub fn with_token(mut self, token: &str, owner: &str) -> Self {
        self.owners.insert(token.to_owned(), OwnerId::new(owner));
        self
    }
}

impl IdentityProvider for StaticIdentityProvider {
    fn resolve_owner(&self, token: &str) -> Result<OwnerId, Error> {
        self.owners
            .get(token)
            .cloned()
            .ok_or_else(|| Error::InvalidAccessToken("unknown token".to_owned()))
    }
}

#[cfg(test)]
mod identity_provider_tests {
    use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

    use crate::{Error, owner::OwnerId};

    use super::{ClaimsIdentityProvider, IdentityProvider, StaticIdentityProvider};

    fn token_with_payload(payload: &str) -> String {
        format!(
            "{}.{}.signature",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn claims_provider_reads_subject() {
        let token = token_with_payload(r#"{"sub":"user-42","exp":1700000000}"#);

        let got = ClaimsIdentityProvider.resolve_owner(&token);

        assert_eq!(got, Ok(OwnerId::new("user-42")));
    }

    #[test]
    fn claims_provider_accepts_padded_payload() {
        let token = format!(
            "header.{}.signature",
            base64::engine::general_purpose::STANDARD.encode(r#"{"sub":"ab"}"#)
        );

        let got = ClaimsIdentityProvider.resolve_owner(&token);

        assert_eq!(got, Ok(OwnerId::new("ab")));
    }

    #[test]
    fn claims_provider_rejects_wrong_segment_count() {
        for token in ["", "abc", "a.b", "a.b.c.d"] {
            let got = ClaimsIdentityProvider.resolve_owner(token);

            assert!(
                matches!(got, Err(Error::InvalidAccessToken(_))),
                "want invalid token error for {token:?}, got {got:?}"
            );
        }
    }

    #[test]
    fn claims_provider_rejects_missing_subject() {
        let token = token_with_payload(r#"{"exp":1700000000}"#);

        let got = ClaimsIdentityProvider.resolve_owner(&token);

        assert!(matches!(got, Err(Error::InvalidAccessToken(_))));
    }

    #[test]
    fn claims_provider_rejects_empty_subject() {
        let token = token_with_payload(r#"{"sub":"  "}"#);

        let got = ClaimsIdentityProvider.resolve_owner(&token);

        assert!(matches!(got, Err(Error::InvalidAccessToken(_))));
    }

    #[test]
    fn claims_provider_rejects_garbage_payload() {
        let got = ClaimsIdentityProvider.resolve_owner("header.!!!.signature");

        assert!(matches!(got, Err(Error::InvalidAccessToken(_))));
    }

    #[test]
    fn static_provider_resolves_known_tokens_only() {
        let provider = StaticIdentityProvider::new().with_token("secret", "alice");

        assert_eq!(provider.resolve_owner("secret"), Ok(OwnerId::new("alice")));
        assert!(matches!(
            provider.resolve_owner("other"),
            Err(Error::InvalidAccessToken(_))
        ));
    }
}
