use actix_web::web;

use crate::middleware::auth::AuthMiddleware;
use crate::middleware::role_auth::RequireRole;
use crate::models::user::UserRole;
use crate::services::wizard_forms::{AgencyForm, EmployeeForm, VehicleForm};

pub mod clients;
pub mod fleet;
pub mod payments;
pub mod reports;
pub mod reservations;
pub mod staff;
pub mod wizards;

/// Back-office routes. Employees and admins share the fleet, bookings and
/// billing screens; staff and agency management is admin only.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .wrap(RequireRole::staff())
            .wrap(AuthMiddleware)
            .route("/dashboard", web::get().to(reports::dashboard))
            .route("/reports", web::get().to(reports::report))
            .route("/vehicles", web::get().to(fleet::list_vehicles))
            .route("/vehicles/{id}", web::get().to(fleet::get_vehicle))
            .route("/vehicles/{id}", web::put().to(fleet::update_vehicle))
            .route("/vehicles/{id}", web::delete().to(fleet::delete_vehicle))
            .route("/clients", web::get().to(clients::list_clients))
            .route("/clients/{id}", web::get().to(clients::get_client))
            .route("/reservations", web::get().to(reservations::list_reservations))
            .route(
                "/reservations/{id}/status",
                web::put().to(reservations::update_status),
            )
            .route("/payments", web::get().to(payments::list_payments))
            .route("/payments", web::post().to(payments::create_payment))
            .route("/payments/{id}/status", web::put().to(payments::update_status))
            .service(web::scope("/wizards/vehicle").configure(wizards::routes::<VehicleForm>))
            .service(
                web::scope("/wizards/employee")
                    .wrap(RequireRole::new(UserRole::Admin))
                    .configure(wizards::routes::<EmployeeForm>),
            )
            .service(
                web::scope("/wizards/agency")
                    .wrap(RequireRole::new(UserRole::Admin))
                    .configure(wizards::routes::<AgencyForm>),
            )
            .service(
                web::scope("/employees")
                    .wrap(RequireRole::new(UserRole::Admin))
                    .route("", web::get().to(staff::list_employees))
                    .route("/{id}", web::get().to(staff::get_employee))
                    .route("/{id}", web::put().to(staff::update_employee))
                    .route("/{id}", web::delete().to(staff::delete_employee)),
            )
            .service(
                web::scope("/agencies")
                    .wrap(RequireRole::new(UserRole::Admin))
                    .route("", web::get().to(staff::list_agencies))
                    .route("/{id}", web::get().to(staff::get_agency))
                    .route("/{id}", web::put().to(staff::update_agency))
                    .route("/{id}", web::delete().to(staff::delete_agency)),
            ),
    );
}
