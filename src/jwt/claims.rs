// src/jwt/claims.rs
use serde::{Deserialize, Serialize};

use crate::models::identity::Role;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,  // identity ObjectId, hex
    pub role: Role,
    pub name: String, // display name shown in the header
    pub exp: usize,
    pub iat: usize,
}
