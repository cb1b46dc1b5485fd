//! Authentication wire types

use serde::{Deserialize, Serialize};

/// `POST /api/auth/login` and `POST /api/auth/register` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub username: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserHolder {
    pub user: User,
}

/// `{status, data: {user}}` reply used by register and users/me
#[derive(Debug, Clone, Deserialize)]
pub struct UserResponse {
    pub data: UserHolder,
}
