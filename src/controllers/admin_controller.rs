use bcrypt::{hash, verify, DEFAULT_COST};
use sqlx::PgPool;
use tracing::info;
use validator::Validate;

use crate::dto::auth_dto::{LoginRequest, LoginResponse, RegisterRequest};
use crate::models::user::AdminUser;
use crate::repositories::user_repository::UserRepository;
use crate::utils::errors::{conflict_error, not_found_error, AppError};
use crate::utils::jwt::{generate_token, JwtClaims, JwtConfig};
use crate::utils::validation::{required, RequiredFields};

pub struct AdminController {
    repository: UserRepository,
    jwt: JwtConfig,
}

impl AdminController {
    pub fn new(pool: PgPool, jwt: JwtConfig) -> Self {
        Self {
            repository: UserRepository::new(pool),
            jwt,
        }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<LoginResponse, AppError> {
        RequiredFields::new()
            .check("username", &request.username)
            .check("email", &request.email)
            .check("password", &request.password)
            .finish("The following fields are required")?;

        request.validate()?;

        let username = required(request.username, "username")?.trim().to_string();
        let email = required(request.email, "email")?.trim().to_lowercase();
        let password = required(request.password, "password")?;

        if self.repository.username_exists(&username).await? {
            return Err(conflict_error("Username is already taken", "username", &username));
        }
        if self.repository.email_exists(&email).await? {
            return Err(conflict_error("Email is already registered", "email", &email));
        }

        let password_hash = hash(&password, DEFAULT_COST)
            .map_err(|e| AppError::Hash(format!("Error hashing password: {}", e)))?;

        let user = self
            .repository
            .create(&AdminUser::new(username, email, password_hash))
            .await?;
        info!("🔐 Admin {} registered", user.username);

        self.session(user, "Admin registered successfully")
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        let identifier = request.identifier().map(str::to_string);
        RequiredFields::new()
            .require("email", identifier.is_some())
            .check("password", &request.password)
            .finish("Please provide email and password")?;

        let identifier = required(identifier, "email")?;
        let password = required(request.password, "password")?;

        let user = self
            .repository
            .find_by_login(&identifier)
            .await?
            .ok_or_else(invalid_credentials)?;

        let valid = verify(&password, &user.password_hash)
            .map_err(|e| AppError::Hash(format!("Error verifying password: {}", e)))?;
        if !valid {
            return Err(invalid_credentials());
        }

        info!("🔐 Admin {} logged in", user.username);
        self.session(user, "Login successful")
    }

    pub async fn current(&self, claims: &JwtClaims) -> Result<AdminUser, AppError> {
        let user_id = claims.user_id()?;
        self.repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| not_found_error("User"))
    }

    fn session(&self, user: AdminUser, message: &str) -> Result<LoginResponse, AppError> {
        let token = generate_token(user.id, &user.username, &self.jwt)?;
        Ok(LoginResponse {
            message: message.to_string(),
            token,
            expires_in: self.jwt.expiration,
            user,
        })
    }
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid credentials".to_string())
}
