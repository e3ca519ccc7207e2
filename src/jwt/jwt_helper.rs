// src/jwt/jwt_helper.rs
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::Result as JwtResult, DecodingKey, EncodingKey, Header, Validation};

use crate::jwt::claims::Claims;
use crate::models::identity::Identity;

pub fn create_token(identity: &Identity, secret: &str, valid_hours: i64) -> JwtResult<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: identity.id.to_hex(),
        role: identity.role,
        name: identity.first_name_or_display().to_string(),
        exp: (now + Duration::hours(valid_hours)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
}

pub fn verify_token(token: &str, secret: &str) -> JwtResult<Claims> {
    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &Validation::default())
        .map(|data| data.claims)
}
