use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use super::error::AuthError;
use super::types::{AuthContext, TokenClaims};

/// Folds the caller's `enabled` flag with token presence.
///
/// This is the gate that decides whether a declared query may execute at
/// all. Presence is enough here; expiry is checked separately by
/// [`token_valid`] to decide whether to treat the session as dead.
pub fn query_enabled(auth: &AuthContext, caller_enabled: bool) -> bool {
    caller_enabled && auth.has_token()
}

/// Decodes the claims of a bearer token without verifying its signature.
///
/// Gating is a UX decision made with whatever the token says about itself;
/// the server re-checks authorization on every request.
pub fn decode_claims(token: &str) -> Result<TokenClaims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map_err(|err| AuthError::MalformedToken(err.to_string()))?;

    Ok(data.claims)
}

/// Whether the session's token is present, decodable, and unexpired.
///
/// A token without an `exp` claim is treated as not valid: there is no way
/// to tell a live session from a stale one.
pub fn token_valid(auth: &AuthContext, now: DateTime<Utc>) -> bool {
    let Some(token) = auth.token() else {
        return false;
    };

    match decode_claims(token) {
        Ok(claims) => claims.exp.is_some_and(|exp| exp > now.timestamp()),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn make_token(claims: &TokenClaims) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap()
    }

    fn context_with(claims: &TokenClaims) -> AuthContext {
        AuthContext::new(Some(make_token(claims)))
    }

    #[test]
    fn query_enabled_requires_both_flag_and_token() {
        let with_token = AuthContext::new(Some("tok".to_string()));

        assert!(query_enabled(&with_token, true));
        assert!(!query_enabled(&with_token, false));
        assert!(!query_enabled(&AuthContext::anonymous(), true));
    }

    #[test]
    fn decode_claims_reads_sub_and_exp() {
        let claims = TokenClaims {
            sub: Some("admin".to_string()),
            exp: Some(4_102_444_800),
        };
        let token = make_token(&claims);

        assert_eq!(decode_claims(&token).unwrap(), claims);
    }

    #[test]
    fn decode_claims_rejects_garbage() {
        assert!(decode_claims("not-a-jwt").is_err());
    }

    #[test]
    fn future_expiry_is_valid() {
        let now = Utc::now();
        let context = context_with(&TokenClaims {
            sub: None,
            exp: Some((now + Duration::hours(1)).timestamp()),
        });

        assert!(token_valid(&context, now));
    }

    #[test]
    fn past_expiry_is_not_valid() {
        let now = Utc::now();
        let context = context_with(&TokenClaims {
            sub: None,
            exp: Some((now - Duration::hours(1)).timestamp()),
        });

        assert!(!token_valid(&context, now));
    }

    #[test]
    fn missing_expiry_is_not_valid() {
        let now = Utc::now();
        let context = context_with(&TokenClaims {
            sub: Some("admin".to_string()),
            exp: None,
        });

        assert!(!token_valid(&context, now));
    }

    #[test]
    fn absent_or_malformed_token_is_not_valid() {
        let now = Utc::now();

        assert!(!token_valid(&AuthContext::anonymous(), now));
        assert!(!token_valid(
            &AuthContext::new(Some("garbage".to_string())),
            now
        ));
    }
}
