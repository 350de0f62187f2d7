#![allow(dead_code)]

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    http::StatusCode,
    web, App,
};

use car_rental_api::config::AppConfig;
use car_rental_api::db::memory::create_store;
use car_rental_api::models::user::{User, UserRole};
use car_rental_api::routes;
use car_rental_api::services::account_service::generate_token;
use car_rental_api::state::AppState;

pub const ADMIN_EMAIL: &str = "admin@agence.com";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const CLIENT_EMAIL: &str = "jean.dupont@email.com";
pub const CLIENT_PASSWORD: &str = "client123";

pub struct TestApp {
    pub state: web::Data<AppState>,
}

impl TestApp {
    /// A fresh app over the seeded demo data.
    pub async fn new() -> Self {
        let config = AppConfig::for_tests();
        let store = create_store(&config).await.expect("seeded store");
        Self {
            state: web::Data::new(AppState::new(store, config)),
        }
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(self.state.clone())
            .configure(routes::configure)
    }

    fn token(&self, role: UserRole, client_id: Option<u32>, employee_id: Option<u32>) -> String {
        let user = User {
            id: 99,
            email: "test@agence.com".to_string(),
            role,
            password_hash: String::new(),
            client_id,
            employee_id,
        };
        let token = generate_token(&user, &self.state.config).expect("token");
        format!("Bearer {}", token)
    }

    pub fn admin_token(&self) -> String {
        self.token(UserRole::Admin, None, Some(1))
    }

    pub fn employee_token(&self) -> String {
        self.token(UserRole::Employee, None, Some(2))
    }

    /// Token for the first demo client, Jean Dupont.
    pub fn client_token(&self) -> String {
        self.token(UserRole::Client, Some(1), None)
    }
}

/// Status of a call that may have been refused by a middleware before
/// reaching a handler.
pub fn status_of<B: MessageBody>(
    result: Result<ServiceResponse<B>, actix_web::Error>,
) -> StatusCode {
    match result {
        Ok(resp) => resp.status(),
        Err(err) => err.as_response_error().status_code(),
    }
}
