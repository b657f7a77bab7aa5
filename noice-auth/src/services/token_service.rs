use axum_extra::extract::cookie::{Cookie, SameSite};
use jsonwebtoken::{encode, EncodingKey, Header};
use time::Duration;
use uuid::Uuid;

use noice_shared::errors::AppError;
use noice_shared::types::auth::{Claims, SESSION_COOKIE};

pub fn create_session_token(user_id: Uuid, secret: &str, ttl_secs: i64) -> Result<String, AppError> {
    let claims = Claims::new(user_id, ttl_secs);
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(format!("JWT encoding failed: {e}")))
}

/// Session cookie: HTTP-only, SameSite=Strict, `Secure` outside development.
pub fn session_cookie(token: String, ttl_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .max_age(Duration::seconds(ttl_secs))
        .build()
}

pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = session_cookie(String::new(), 0, false);
    cookie.make_removal();
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, DecodingKey, Validation};

    const SECRET: &str = "test-secret";
    const WEEK: i64 = 7 * 24 * 60 * 60;

    #[test]
    fn token_round_trip() {
        let id = Uuid::new_v4();
        let token = create_session_token(id, SECRET, WEEK).unwrap();
        assert_eq!(token.split('.').count(), 3);

        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(SECRET.as_bytes()),
            &Validation::default(),
        )
        .unwrap();
        assert_eq!(data.claims.sub, id);
        assert_eq!(data.claims.exp - data.claims.iat, WEEK);
    }

    #[test]
    fn bad_secret_rejects() {
        let token = create_session_token(Uuid::new_v4(), "secret-a", WEEK).unwrap();
        let result = decode::<Claims>(
            &token,
            &DecodingKey::from_secret("secret-b".as_bytes()),
            &Validation::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn session_cookie_attributes() {
        let cookie = session_cookie("abc".into(), WEEK, true);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.max_age(), Some(Duration::days(7)));
    }

    #[test]
    fn development_cookie_is_not_secure() {
        let cookie = session_cookie("abc".into(), WEEK, false);
        assert_eq!(cookie.secure(), Some(false));
    }

    #[test]
    fn removal_cookie_expires_immediately() {
        let cookie = removal_cookie();
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    }
}
