use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    entities::users::UserEntity, value_objects::enums::user_roles::UserRole,
};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserModel {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: UserRole,
}

impl From<UserEntity> for UserModel {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            username: entity.username,
            phone: entity.phone,
            address: entity.address,
            role: UserRole::from_str(&entity.role),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUserModel {
    pub email: String,
    pub password: String,
    pub username: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginModel {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserModel,
}
