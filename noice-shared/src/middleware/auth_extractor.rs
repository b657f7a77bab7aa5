use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum_extra::extract::CookieJar;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::errors::{AppError, ErrorCode};
use crate::types::auth::{AuthUser, Claims, SESSION_COOKIE};

/// Verification half of the session secret. Built once at startup and
/// reached through router state, never from the process environment.
#[derive(Clone)]
pub struct SessionKeys {
    decoding: DecodingKey,
}

impl SessionKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    SessionKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = SessionKeys::from_ref(state);
        let token = extract_session_token(&parts.headers)?;
        let claims = decode_session_token(&token, &keys)?;

        Ok(AuthUser::from(claims))
    }
}

/// Session cookie first; `Authorization: Bearer` as the fallback transport.
fn extract_session_token(headers: &HeaderMap) -> Result<String, AppError> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        return Ok(cookie.value().to_string());
    }

    let auth_header = headers
        .get("Authorization")
        .ok_or_else(|| AppError::new(ErrorCode::Unauthorized, "missing session credential"))?
        .to_str()
        .map_err(|_| AppError::new(ErrorCode::Unauthorized, "invalid authorization header"))?;

    if !auth_header.starts_with("Bearer ") {
        return Err(AppError::new(
            ErrorCode::Unauthorized,
            "authorization header must use Bearer scheme",
        ));
    }

    Ok(auth_header[7..].to_string())
}

fn decode_session_token(token: &str, keys: &SessionKeys) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let token_data =
        decode::<Claims>(token, &keys.decoding, &validation).map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::new(ErrorCode::TokenExpired, "session has expired")
            }
            _ => AppError::new(ErrorCode::TokenInvalid, "invalid session token"),
        })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use uuid::Uuid;

    const SECRET: &str = "test-secret";

    fn sign(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn parts_with_header(name: &str, value: String) -> Parts {
        let request = Request::builder()
            .uri("/auth/update")
            .header(name, value)
            .body(())
            .unwrap();
        request.into_parts().0
    }

    fn error_code(err: AppError) -> ErrorCode {
        match err {
            AppError::Known { code, .. } => code,
            other => panic!("unexpected error variant: {other}"),
        }
    }

    #[tokio::test]
    async fn cookie_token_authenticates() {
        let keys = SessionKeys::new(SECRET);
        let id = Uuid::new_v4();
        let token = sign(&Claims::new(id, 3600), SECRET);
        let mut parts = parts_with_header("Cookie", format!("{SESSION_COOKIE}={token}"));

        let user = AuthUser::from_request_parts(&mut parts, &keys).await.unwrap();
        assert_eq!(user.id, id);
    }

    #[tokio::test]
    async fn bearer_token_authenticates() {
        let keys = SessionKeys::new(SECRET);
        let id = Uuid::new_v4();
        let token = sign(&Claims::new(id, 3600), SECRET);
        let mut parts = parts_with_header("Authorization", format!("Bearer {token}"));

        let user = AuthUser::from_request_parts(&mut parts, &keys).await.unwrap();
        assert_eq!(user.id, id);
    }

    #[tokio::test]
    async fn missing_credential_is_rejected() {
        let keys = SessionKeys::new(SECRET);
        let mut parts = Request::builder().uri("/").body(()).unwrap().into_parts().0;

        let err = AuthUser::from_request_parts(&mut parts, &keys).await.unwrap_err();
        assert_eq!(error_code(err), ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn tampered_token_fails_closed() {
        let keys = SessionKeys::new(SECRET);
        let token = sign(&Claims::new(Uuid::new_v4(), 3600), "other-secret");
        let mut parts = parts_with_header("Cookie", format!("{SESSION_COOKIE}={token}"));

        let err = AuthUser::from_request_parts(&mut parts, &keys).await.unwrap_err();
        assert_eq!(error_code(err), ErrorCode::TokenInvalid);
    }

    #[tokio::test]
    async fn expired_token_fails_closed() {
        let keys = SessionKeys::new(SECRET);
        // Past the decoder's default leeway.
        let token = sign(&Claims::new(Uuid::new_v4(), -7200), SECRET);
        let mut parts = parts_with_header("Cookie", format!("{SESSION_COOKIE}={token}"));

        let err = AuthUser::from_request_parts(&mut parts, &keys).await.unwrap_err();
        assert_eq!(error_code(err), ErrorCode::TokenExpired);
    }
}
