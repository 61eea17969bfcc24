use base64::engine::general_purpose;
use base64::Engine;
use thiserror::Error;

use crate::session::SessionStore;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("No session token stored")]
    MissingToken,

    #[error("Session token is malformed")]
    MalformedToken,

    #[error("No user id in token or storage")]
    MissingUserId,

    #[error("Credential storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

/// Claims the backend puts in the token payload. Decoded without
/// signature verification; the token is only mined for display
/// attribution here, never trusted for authorization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenClaims {
    pub user_id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// The acting user, resolved for comment attribution.
#[derive(Debug, Clone, PartialEq)]
pub struct CommenterIdentity {
    pub user_id: i64,
    pub display_name: String,
}

/// Decode the payload segment of a JWT-style token.
pub fn decode_claims(token: &str) -> Result<TokenClaims, AuthError> {
    let payload = token.split('.').nth(1).ok_or(AuthError::MalformedToken)?;

    let bytes = general_purpose::URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|_| AuthError::MalformedToken)?;

    let value: serde_json::Value =
        serde_json::from_slice(&bytes).map_err(|_| AuthError::MalformedToken)?;

    // Some issuers write numeric claims as strings
    let user_id = value
        .get("userId")
        .and_then(|v| v.as_i64().or_else(|| v.as_str().and_then(|s| s.parse().ok())));

    let name_claim = |key: &str| {
        value
            .get(key)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    };

    Ok(TokenClaims {
        user_id,
        first_name: name_claim("firstName"),
        last_name: name_claim("lastName"),
    })
}

/// Resolve the acting user from the stored credentials: the token's
/// claims first, the stored user-id file as fallback for the id.
pub fn resolve_identity(store: &SessionStore) -> Result<CommenterIdentity, AuthError> {
    let token = store.load_token()?.ok_or(AuthError::MissingToken)?;
    let claims = decode_claims(&token)?;

    let user_id = match claims.user_id {
        Some(id) => id,
        None => store
            .load_user_id()?
            .and_then(|s| s.parse().ok())
            .ok_or(AuthError::MissingUserId)?,
    };

    let display_name = format!(
        "{} {}",
        claims.first_name.unwrap_or_default(),
        claims.last_name.unwrap_or_default()
    )
    .trim()
    .to_string();

    Ok(CommenterIdentity {
        user_id,
        display_name,
    })
}
