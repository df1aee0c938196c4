//! User accounts and authentication payloads

use serde::{Deserialize, Serialize};

use super::envelope::{impl_envelope, ResponseCode};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email_address: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub cell_phone: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub response_code: Option<ResponseCode>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub token: Option<String>,
    pub user: Option<User>,
}

/// Account creation returns only a status/description, never a user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub response_code: Option<ResponseCode>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub uuid: String,
    pub username: Option<String>,
    pub name: String,
    pub surname: String,
    pub cell_phone: String,
    pub email: String,
    pub status_type: Option<UserStatus>,
    pub user_type: Option<UserType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatus {
    #[serde(rename = "ENABLED")]
    Enabled,
    #[serde(rename = "DISABLED")]
    Disabled,
    #[serde(rename = "VERIFY_EMAIL")]
    VerifyEmail,
    #[serde(rename = "RESET")]
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    #[serde(rename = "USER")]
    User,
    #[serde(rename = "ADMIN")]
    Admin,
}

impl_envelope!(UserResponse, StatusResponse);
