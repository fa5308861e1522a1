use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};

use crate::error::TokenError;
use crate::types::Role;

/// Claims carried by a login token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthClaims {
    /// Row id of the customer or chef.
    pub sub: i64,
    pub role: Role,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds.
    pub exp: i64,
}

impl AuthClaims {
    /// Claims valid for `ttl_secs` from `issued_at`. A lifetime that pushes
    /// the expiry past chrono's range is [`TokenError::TtlOutOfRange`].
    pub fn new(
        sub: i64,
        role: Role,
        issued_at: DateTime<Utc>,
        ttl_secs: i64,
    ) -> Result<Self, TokenError> {
        let expires_at = Duration::try_seconds(ttl_secs)
            .and_then(|ttl| issued_at.checked_add_signed(ttl))
            .ok_or(TokenError::TtlOutOfRange(ttl_secs))?;

        Ok(Self {
            sub,
            role,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        })
    }
}

// token = base64url(claims json) || "." || base64url(ed25519 signature over the json)
pub fn issue_token(claims: &AuthClaims, signing_key: &SigningKey) -> Result<String, TokenError> {
    let payload =
        serde_json::to_vec(claims).map_err(|e| TokenError::Serialization(e.to_string()))?;
    let signature = signing_key.sign(&payload);

    Ok(format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(&payload),
        URL_SAFE_NO_PAD.encode(signature.to_bytes())
    ))
}

pub fn verify_token(token: &str, verifying_key: &VerifyingKey) -> Result<AuthClaims, TokenError> {
    verify_token_at(token, verifying_key, Utc::now())
}

pub fn verify_token_at(
    token: &str,
    verifying_key: &VerifyingKey,
    now: DateTime<Utc>,
) -> Result<AuthClaims, TokenError> {
    let (payload_b64, signature_b64) = token.split_once('.').ok_or(TokenError::Malformed)?;

    let payload = URL_SAFE_NO_PAD
        .decode(payload_b64)
        .map_err(|_| TokenError::Malformed)?;
    let signature_bytes = URL_SAFE_NO_PAD
        .decode(signature_b64)
        .map_err(|_| TokenError::Malformed)?;
    let signature = Signature::from_slice(&signature_bytes).map_err(|_| TokenError::Malformed)?;

    verifying_key
        .verify(&payload, &signature)
        .map_err(|_| TokenError::BadSignature)?;

    let claims: AuthClaims =
        serde_json::from_slice(&payload).map_err(|_| TokenError::Malformed)?;

    if now.timestamp() >= claims.exp {
        return Err(TokenError::Expired);
    }

    Ok(claims)
}
