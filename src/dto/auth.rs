use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::User;

#[derive(Deserialize, Debug, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub exp: usize,
    pub role: String,
    pub sub: String,
    pub token_type: String,
}

/// Account shape exposed to clients; the password hash never leaves the store.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserPublic {
    pub created_at: DateTime<Utc>,
    pub email: String,
    pub first_name: String,
    pub id: Uuid,
    pub last_name: String,
    pub role: String,
    pub username: String,
}

impl From<User> for UserPublic {
    fn from(user: User) -> Self {
        Self {
            created_at: user.created_at,
            email: user.email,
            first_name: user.first_name,
            id: user.id,
            last_name: user.last_name,
            role: user.role,
            username: user.username,
        }
    }
}
