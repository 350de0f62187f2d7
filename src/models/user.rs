use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::store::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Client,
    Admin,
    Employee,
}

impl UserRole {
    pub fn is_staff(self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Employee)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: u32,
    pub email: String,
    pub role: UserRole,
    #[serde(skip_serializing)]
    pub password_hash: String, // Always hashed
    pub client_id: Option<u32>,
    pub employee_id: Option<u32>,
}

impl Entity for User {
    const NAME: &'static str = "User";

    fn id(&self) -> u32 {
        self.id
    }

    fn set_id(&mut self, id: u32) {
        self.id = id;
    }
}

#[derive(Debug, Deserialize)]
pub struct SigninInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SignupInput {
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    pub phone: String,
    pub birth_date: NaiveDate,
    pub license_number: String,
    pub address: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub auth_token: String,
    pub role: UserRole,
}

#[derive(Debug, Serialize)]
pub struct UserSession {
    pub id: u32,
    pub email: String,
    pub role: UserRole,
    pub client_id: Option<u32>,
    pub employee_id: Option<u32>,
}

impl From<User> for UserSession {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
            client_id: user.client_id,
            employee_id: user.employee_id,
        }
    }
}
