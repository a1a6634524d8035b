use crates::domain::{
    entities::users::InsertUserEntity,
    repositories::users::UserRepository,
    value_objects::{
        enums::user_roles::UserRole,
        users::{AuthResponse, LoginModel, RegisterUserModel, UserModel},
    },
};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    auth::{issue_token, password},
    axum_http::error_responses::{AppError, AppResult},
    config::config_model::JwtSecret,
};

pub const MIN_PASSWORD_LEN: usize = 8;

pub struct UserUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    user_repository: Arc<U>,
    jwt: JwtSecret,
}

impl<U> UserUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(user_repository: Arc<U>, jwt: JwtSecret) -> Self {
        Self {
            user_repository,
            jwt,
        }
    }

    pub async fn register(&self, register_user_model: RegisterUserModel) -> AppResult<AuthResponse> {
        let email = register_user_model.email.trim().to_lowercase();
        let username = register_user_model.username.trim().to_string();

        if !email.contains('@') {
            return Err(AppError::BadRequest("A valid email is required".to_string()));
        }
        if username.is_empty() {
            return Err(AppError::BadRequest("username is required".to_string()));
        }
        if register_user_model.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::BadRequest(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let password_hash = password::hash_password(&register_user_model.password)?;

        let insert_user_entity = InsertUserEntity {
            email,
            password_hash,
            username,
            phone: register_user_model.phone,
            address: register_user_model.address,
            role: UserRole::Client.to_string(),
        };

        let user = self
            .user_repository
            .register(insert_user_entity)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "users: failed to register user");
                err
            })?
            .ok_or_else(|| {
                warn!(
                    status = axum::http::StatusCode::CONFLICT.as_u16(),
                    "users: email already registered"
                );
                AppError::Conflict("Email already registered".to_string())
            })?;

        info!(user_id = %user.id, "users: registered");

        self.auth_response(user.into())
    }

    pub async fn login(&self, login_model: LoginModel) -> AppResult<AuthResponse> {
        let email = login_model.email.trim().to_lowercase();
        let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

        let user = self
            .user_repository
            .find_by_email(&email)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "users: failed to load user for login");
                err
            })?
            .ok_or_else(invalid)?;

        if !password::verify_password(&login_model.password, &user.password_hash) {
            warn!(user_id = %user.id, "users: login with wrong password");
            return Err(invalid());
        }

        info!(user_id = %user.id, "users: logged in");

        self.auth_response(user.into())
    }

    pub async fn profile(&self, user_id: Uuid) -> AppResult<UserModel> {
        let user = self
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(user.into())
    }

    fn auth_response(&self, user: UserModel) -> AppResult<AuthResponse> {
        let token = issue_token(user.id, user.role, &self.jwt).map_err(|err| {
            error!(user_id = %user.id, error = ?err, "users: failed to sign token");
            err
        })?;

        Ok(AuthResponse { token, user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::validate_token;
    use chrono::Utc;
    use crates::domain::{entities::users::UserEntity, repositories::users::MockUserRepository};
    use mockall::predicate::eq;

    const SECRET: &str = "users-usecase-test-secret";

    fn jwt() -> JwtSecret {
        JwtSecret {
            secret: SECRET.to_string(),
            ttl_seconds: 3600,
        }
    }

    fn stored_user(email: &str, password: &str) -> UserEntity {
        let now = Utc::now();
        UserEntity {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password::hash_password(password).unwrap(),
            username: "alice".to_string(),
            phone: None,
            address: None,
            role: "client".to_string(),
            stripe_customer_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn register_model(email: &str, password: &str) -> RegisterUserModel {
        RegisterUserModel {
            email: email.to_string(),
            password: password.to_string(),
            username: "alice".to_string(),
            phone: None,
            address: None,
        }
    }

    #[tokio::test]
    async fn register_creates_client_and_returns_token() {
        let mut user_repository = MockUserRepository::new();
        user_repository
            .expect_register()
            .withf(|entity| {
                entity.email == "alice@example.com"
                    && entity.role == "client"
                    && entity.password_hash.starts_with("$argon2")
            })
            .returning(|entity| {
                let now = Utc::now();
                let user = UserEntity {
                    id: Uuid::new_v4(),
                    email: entity.email,
                    password_hash: entity.password_hash,
                    username: entity.username,
                    phone: entity.phone,
                    address: entity.address,
                    role: entity.role,
                    stripe_customer_id: None,
                    created_at: now,
                    updated_at: now,
                };
                Box::pin(async move { Ok(Some(user)) })
            });

        let usecase = UserUseCase::new(Arc::new(user_repository), jwt());
        let response = usecase
            .register(register_model(" Alice@Example.com ", "password123"))
            .await
            .unwrap();

        let claims = validate_token(&response.token, SECRET).unwrap();
        assert_eq!(claims.sub, response.user.id.to_string());
        assert_eq!(response.user.role, UserRole::Client);
    }

    #[tokio::test]
    async fn register_duplicate_email_conflicts() {
        let mut user_repository = MockUserRepository::new();
        user_repository
            .expect_register()
            .returning(|_| Box::pin(async { Ok(None) }));

        let usecase = UserUseCase::new(Arc::new(user_repository), jwt());
        let result = usecase
            .register(register_model("alice@example.com", "password123"))
            .await;

        assert!(matches!(result, Err(AppError::Conflict(message)) if message == "Email already registered"));
    }

    #[tokio::test]
    async fn register_rejects_short_password_before_storage() {
        let user_repository = MockUserRepository::new();
        let usecase = UserUseCase::new(Arc::new(user_repository), jwt());

        let result = usecase.register(register_model("alice@example.com", "short")).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn login_checks_password() {
        let user = stored_user("alice@example.com", "password123");
        let mut user_repository = MockUserRepository::new();
        user_repository
            .expect_find_by_email()
            .with(eq("alice@example.com"))
            .returning(move |_| {
                let user = user.clone();
                Box::pin(async move { Ok(Some(user)) })
            });

        let usecase = UserUseCase::new(Arc::new(user_repository), jwt());

        let ok = usecase
            .login(LoginModel {
                email: "alice@example.com".to_string(),
                password: "password123".to_string(),
            })
            .await;
        let wrong = usecase
            .login(LoginModel {
                email: "alice@example.com".to_string(),
                password: "password124".to_string(),
            })
            .await;

        assert!(ok.is_ok());
        assert!(matches!(wrong, Err(AppError::Unauthorized(message)) if message == "Invalid email or password"));
    }

    #[tokio::test]
    async fn login_unknown_email_is_unauthorized() {
        let mut user_repository = MockUserRepository::new();
        user_repository
            .expect_find_by_email()
            .returning(|_| Box::pin(async { Ok(None) }));

        let usecase = UserUseCase::new(Arc::new(user_repository), jwt());
        let result = usecase
            .login(LoginModel {
                email: "nobody@example.com".to_string(),
                password: "password123".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
}
