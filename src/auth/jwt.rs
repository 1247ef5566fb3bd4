use std::time::{SystemTime, UNIX_EPOCH};

use crate::{model::role::Role, models::Claims};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::Error};
use uuid::Uuid;

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as usize)
        .unwrap_or_default()
}

pub fn generate_token(
    employee_id: u64,
    username: String,
    role: Role,
    secret: &str,
    ttl: usize,
) -> Result<String, Error> {
    let issued_at = now();
    let claims = Claims {
        sub: username,
        employee_id,
        role,
        iat: issued_at,
        exp: issued_at + ttl,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::errors::ErrorKind;

    #[test]
    fn token_round_trips_id_and_role() {
        let token = generate_token(42, "jane_doe".into(), Role::Admin, "secret", 60).unwrap();
        let claims = verify_token(&token, "secret").unwrap();

        assert_eq!(claims.employee_id, 42);
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.sub, "jane_doe");
        assert_eq!(claims.exp, claims.iat + 60);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = generate_token(1, "bob".into(), Role::User, "secret", 60).unwrap();
        let err = verify_token(&token, "other").unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::InvalidSignature);
    }

    #[test]
    fn expired_token_is_rejected() {
        let claims = Claims {
            sub: "bob".into(),
            employee_id: 1,
            role: Role::User,
            iat: 1_000,
            exp: 2_000,
            jti: "x".into(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        let err = verify_token(&token, "secret").unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::ExpiredSignature);
    }
}
