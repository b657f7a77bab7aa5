use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of the HTTP-only session cookie.
pub const SESSION_COOKIE: &str = "token";

/// Session token claims. The identity id is the only claim beyond the
/// timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, duration_secs: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id,
            iat: now,
            exp: now + duration_secs,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// Identity extracted from a presented session credential.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self { id: claims.sub }
    }
}

/// Projection safe to return to the client; never carries the hash.
#[derive(Debug, Serialize, Deserialize)]
pub struct PublicUser {
    pub name: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_claims_are_not_expired() {
        let claims = Claims::new(Uuid::new_v4(), 3600);
        assert!(!claims.is_expired());
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn past_claims_are_expired() {
        let claims = Claims::new(Uuid::new_v4(), -10);
        assert!(claims.is_expired());
    }

    #[test]
    fn auth_user_carries_the_subject() {
        let id = Uuid::new_v4();
        let user = AuthUser::from(Claims::new(id, 60));
        assert_eq!(user.id, id);
    }
}
