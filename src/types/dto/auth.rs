use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::user;
use crate::types::internal::{DashboardRoute, Role};

/// Request model for user login
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Username for authentication
    pub username: String,

    /// Password for authentication
    pub password: String,
}

/// Public view of a user account
#[derive(Object, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    /// One of teacher, inspector, founder, admin, sg
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub hourly_rate: Option<f64>,
}

impl UserResponse {
    pub fn role(&self) -> Option<Role> {
        self.role.parse().ok()
    }

    pub fn dashboard(&self) -> DashboardRoute {
        DashboardRoute::for_role_str(&self.role)
    }
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            role: model.role,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            hourly_rate: model.hourly_rate,
        }
    }
}

/// Login response: the user fields plus the bearer token
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub id: String,
    pub username: String,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub hourly_rate: Option<f64>,
    /// Bearer token for the Authorization header
    pub token: String,
}

impl LoginResponse {
    pub fn new(user: UserResponse, token: String) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            hourly_rate: user.hourly_rate,
            token,
        }
    }

    /// Split into the user part and the token
    pub fn into_parts(self) -> (UserResponse, String) {
        (
            UserResponse {
                id: self.id,
                username: self.username,
                role: self.role,
                first_name: self.first_name,
                last_name: self.last_name,
                email: self.email,
                hourly_rate: self.hourly_rate,
            },
            self.token,
        )
    }
}

/// Request model for account registration
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    #[oai(default)]
    #[serde(default)]
    pub hourly_rate: Option<f64>,
}
