use std::sync::OnceLock;

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use regex::Regex;

use crate::config::AppConfig;
use crate::db::store::Store;
use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::Claims;
use crate::models::client::Client;
use crate::models::user::{SigninInput, SignupInput, TokenResponse, User, UserRole, UserSession};

pub const MIN_PASSWORD_LEN: usize = 6;

pub fn hash_password(password: &str, cost: u32) -> ApiResult<String> {
    bcrypt::hash(password, cost).map_err(|e| ApiError::Internal(format!("hashing failed: {}", e)))
}

pub fn is_valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL
        .get_or_init(|| {
            Regex::new(
                r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?)*$",
            )
            .expect("email pattern is valid")
        })
        .is_match(email)
}

/// Checks a new password and its confirmation.
pub fn validate_password(password: &str, confirmation: &str) -> ApiResult<()> {
    if password != confirmation {
        return Err(ApiError::validation("Passwords do not match"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::validation(format!(
            "Password must contain at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

pub fn generate_token(user: &User, config: &AppConfig) -> ApiResult<String> {
    let now = Utc::now();

    let claims = Claims {
        sub: user.email.clone(),
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(config.token_ttl_hours)).timestamp() as usize,
        user_id: user.id,
        role: user.role,
        client_id: user.client_id,
        employee_id: user.employee_id,
    };

    let header = Header::new(Algorithm::HS256);
    encode(
        &header,
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("token generation failed: {}", e)))
}

pub struct AccountService;

impl AccountService {
    pub async fn find_by_email(store: &Store, email: &str) -> ApiResult<Option<User>> {
        let email = email.trim().to_lowercase();
        let matches = store
            .users
            .find(&move |user: &User| user.email.to_lowercase() == email)
            .await?;
        Ok(matches.into_iter().next())
    }

    pub async fn signin(
        store: &Store,
        config: &AppConfig,
        input: SigninInput,
    ) -> ApiResult<TokenResponse> {
        let user = Self::find_by_email(store, &input.email).await?;

        // same answer for unknown email and wrong password
        let user = match user {
            Some(user) if bcrypt::verify(&input.password, &user.password_hash).unwrap_or(false) => {
                user
            }
            _ => {
                log::info!("Rejected sign-in for {}", input.email);
                return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
            }
        };

        log::info!("User {} signed in as {:?}", user.id, user.role);
        Ok(TokenResponse {
            auth_token: generate_token(&user, config)?,
            role: user.role,
        })
    }

    /// Registers a client together with its user account.
    pub async fn signup(
        store: &Store,
        config: &AppConfig,
        input: SignupInput,
    ) -> ApiResult<TokenResponse> {
        let email = input.email.trim().to_lowercase();
        if !is_valid_email(&email) {
            return Err(ApiError::validation("Invalid email address"));
        }
        validate_password(&input.password, &input.confirm_password)?;
        if Self::find_by_email(store, &email).await?.is_some() {
            return Err(ApiError::Conflict("Email already in use".to_string()));
        }

        let client = store
            .clients
            .insert(Client {
                id: 0,
                last_name: input.last_name,
                first_name: input.first_name,
                email: email.clone(),
                phone: input.phone,
                birth_date: input.birth_date,
                license_number: input.license_number,
                address: input.address,
                loyalty_points: 0,
                registered_on: Utc::now().date_naive(),
            })
            .await?;

        let user = store
            .users
            .insert(User {
                id: 0,
                email,
                role: UserRole::Client,
                password_hash: hash_password(&input.password, config.bcrypt_cost)?,
                client_id: Some(client.id),
                employee_id: None,
            })
            .await?;

        log::info!("Registered client {} (user {})", client.id, user.id);
        Ok(TokenResponse {
            auth_token: generate_token(&user, config)?,
            role: user.role,
        })
    }

    pub async fn session(store: &Store, user_id: u32) -> ApiResult<UserSession> {
        store
            .users
            .get(user_id)
            .await?
            .map(UserSession::from)
            .ok_or_else(|| ApiError::not_found("User"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("jean.dupont@email.com"));
        assert!(is_valid_email("a+b@sub.example.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@"));
        assert!(!is_valid_email("@example.com"));
    }

    #[test]
    fn test_password_rules() {
        assert!(validate_password("secret1", "secret1").is_ok());
        assert!(matches!(
            validate_password("secret1", "secret2"),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            validate_password("abc", "abc"),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn test_hash_roundtrip() {
        let hash = hash_password("client123", 4).unwrap();
        assert_ne!(hash, "client123");
        assert!(bcrypt::verify("client123", &hash).unwrap());
        assert!(!bcrypt::verify("client124", &hash).unwrap());
    }
}
