//! Demo dataset loaded at startup when `SEED_DEMO_DATA` is enabled.

use chrono::NaiveDate;

use crate::db::store::Store;
use crate::error::ApiResult;
use crate::models::{
    agency::Agency,
    client::Client,
    employee::{Employee, StaffRole},
    payment::{Payment, PaymentMethod, PaymentStatus},
    reservation::{RentalOptions, Reservation, ReservationStatus},
    review::Review,
    user::{User, UserRole},
    vehicle::{FuelType, Transmission, Vehicle, VehicleCategory},
};
use crate::services::account_service::hash_password;

const PLACEHOLDER_IMAGE: &str = "/placeholder.svg?height=200&width=300";

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

pub fn demo_vehicles() -> Vec<Vehicle> {
    vec![
        Vehicle {
            id: 0,
            make: "Toyota".to_string(),
            model: "Yaris".to_string(),
            category: VehicleCategory::Economy,
            daily_rate: 25.0,
            available: true,
            fuel: FuelType::Petrol,
            transmission: Transmission::Manual,
            seats: 5,
            image: PLACEHOLDER_IMAGE.to_string(),
            description: "Economical car, perfect for the city".to_string(),
            equipment: strings(&["Air conditioning", "Radio", "Bluetooth"]),
            mileage: 45000,
            year: 2022,
        },
        Vehicle {
            id: 0,
            make: "Renault".to_string(),
            model: "Clio".to_string(),
            category: VehicleCategory::Compact,
            daily_rate: 30.0,
            available: true,
            fuel: FuelType::Diesel,
            transmission: Transmission::Automatic,
            seats: 5,
            image: PLACEHOLDER_IMAGE.to_string(),
            description: "Comfortable compact with modern equipment".to_string(),
            equipment: strings(&["GPS", "Air conditioning", "Reversing camera"]),
            mileage: 32000,
            year: 2023,
        },
        Vehicle {
            id: 0,
            make: "BMW".to_string(),
            model: "Série 3".to_string(),
            category: VehicleCategory::Sedan,
            daily_rate: 65.0,
            available: false,
            fuel: FuelType::Petrol,
            transmission: Transmission::Automatic,
            seats: 5,
            image: PLACEHOLDER_IMAGE.to_string(),
            description: "Premium sedan for optimal comfort".to_string(),
            equipment: strings(&["GPS", "Leather", "Sunroof", "Premium audio"]),
            mileage: 28000,
            year: 2023,
        },
        Vehicle {
            id: 0,
            make: "Tesla".to_string(),
            model: "Model 3".to_string(),
            category: VehicleCategory::Luxury,
            daily_rate: 85.0,
            available: true,
            fuel: FuelType::Electric,
            transmission: Transmission::Automatic,
            seats: 5,
            image: PLACEHOLDER_IMAGE.to_string(),
            description: "High-end electric vehicle".to_string(),
            equipment: strings(&["Autopilot", "Touchscreen", "Supercharger"]),
            mileage: 15000,
            year: 2024,
        },
    ]
}

pub fn demo_clients() -> Vec<Client> {
    vec![
        Client {
            id: 0,
            last_name: "Dupont".to_string(),
            first_name: "Jean".to_string(),
            email: "jean.dupont@email.com".to_string(),
            phone: "0123456789".to_string(),
            birth_date: date(1985, 5, 15),
            license_number: "123456789".to_string(),
            address: "123 Rue de la Paix, Paris".to_string(),
            loyalty_points: 150,
            registered_on: date(2023, 1, 15),
        },
        Client {
            id: 0,
            last_name: "Martin".to_string(),
            first_name: "Marie".to_string(),
            email: "marie.martin@email.com".to_string(),
            phone: "0987654321".to_string(),
            birth_date: date(1990, 8, 22),
            license_number: "987654321".to_string(),
            address: "456 Avenue des Champs, Lyon".to_string(),
            loyalty_points: 75,
            registered_on: date(2023, 3, 10),
        },
    ]
}

pub fn demo_reservations() -> Vec<Reservation> {
    vec![
        Reservation {
            id: 0,
            client_id: 1,
            vehicle_id: 1,
            start_date: date(2024, 1, 20),
            end_date: date(2024, 1, 25),
            status: ReservationStatus::Confirmed,
            total_price: 125.0,
            options: RentalOptions {
                gps: true,
                ..RentalOptions::default()
            },
            booked_on: date(2024, 1, 15),
            qr_code: "QR123456789".to_string(),
        },
        Reservation {
            id: 0,
            client_id: 2,
            vehicle_id: 2,
            start_date: date(2024, 1, 18),
            end_date: date(2024, 1, 22),
            status: ReservationStatus::InProgress,
            total_price: 120.0,
            options: RentalOptions {
                full_insurance: true,
                child_seat: true,
                ..RentalOptions::default()
            },
            booked_on: date(2024, 1, 10),
            qr_code: "QR987654321".to_string(),
        },
    ]
}

pub fn demo_employees() -> Vec<Employee> {
    vec![
        Employee {
            id: 0,
            last_name: "Admin".to_string(),
            first_name: "Super".to_string(),
            email: "admin@agence.com".to_string(),
            role: StaffRole::Admin,
            agency_id: 1,
            hired_on: date(2020, 1, 1),
        },
        Employee {
            id: 0,
            last_name: "Employe".to_string(),
            first_name: "Test".to_string(),
            email: "employe@agence.com".to_string(),
            role: StaffRole::Employee,
            agency_id: 1,
            hired_on: date(2022, 6, 15),
        },
    ]
}

pub fn demo_payments() -> Vec<Payment> {
    vec![
        Payment {
            id: 0,
            reservation_id: 1,
            amount: 125.0,
            status: PaymentStatus::Paid,
            method: PaymentMethod::Card,
            paid_on: date(2024, 1, 15),
        },
        Payment {
            id: 0,
            reservation_id: 2,
            amount: 120.0,
            status: PaymentStatus::Pending,
            method: PaymentMethod::Card,
            paid_on: date(2024, 1, 10),
        },
    ]
}

pub fn demo_reviews() -> Vec<Review> {
    vec![
        Review {
            id: 0,
            client_id: 1,
            vehicle_id: 1,
            rating: 5,
            comment: "Excellent car, very economical and reliable!".to_string(),
            posted_on: date(2024, 1, 26),
        },
        Review {
            id: 0,
            client_id: 2,
            vehicle_id: 2,
            rating: 4,
            comment: "Good car, comfortable for city trips.".to_string(),
            posted_on: date(2024, 1, 23),
        },
    ]
}

pub fn demo_agencies() -> Vec<Agency> {
    vec![
        Agency {
            id: 0,
            name: "Agence Centrale".to_string(),
            address: "100 Boulevard Principal, Paris".to_string(),
            phone: "0145678901".to_string(),
            email: "contact@agence.com".to_string(),
            opening_hours: "8h-18h Monday to Saturday".to_string(),
        },
        Agency {
            id: 0,
            name: "Agence Nord".to_string(),
            address: "25 Avenue du Nord, Lille".to_string(),
            phone: "0320456789".to_string(),
            email: "lille@agence.com".to_string(),
            opening_hours: "9h-19h Monday to Sunday".to_string(),
        },
        Agency {
            id: 0,
            name: "Agence Sud".to_string(),
            address: "50 Boulevard de la Méditerranée, Marseille".to_string(),
            phone: "0491234567".to_string(),
            email: "marseille@agence.com".to_string(),
            opening_hours: "8h-20h Monday to Saturday".to_string(),
        },
    ]
}

/// Demo accounts: (email, password, role, client id, employee id).
pub const DEMO_ACCOUNTS: [(&str, &str, UserRole, Option<u32>, Option<u32>); 3] = [
    ("admin@agence.com", "admin123", UserRole::Admin, None, Some(1)),
    ("jean.dupont@email.com", "client123", UserRole::Client, Some(1), None),
    ("marie.martin@email.com", "client123", UserRole::Client, Some(2), None),
];

pub async fn seed_demo_data(store: &Store, bcrypt_cost: u32) -> ApiResult<()> {
    for vehicle in demo_vehicles() {
        store.vehicles.insert(vehicle).await?;
    }
    for client in demo_clients() {
        store.clients.insert(client).await?;
    }
    for reservation in demo_reservations() {
        store.reservations.insert(reservation).await?;
    }
    for employee in demo_employees() {
        store.employees.insert(employee).await?;
    }
    for payment in demo_payments() {
        store.payments.insert(payment).await?;
    }
    for review in demo_reviews() {
        store.reviews.insert(review).await?;
    }
    for agency in demo_agencies() {
        store.agencies.insert(agency).await?;
    }
    for (email, password, role, client_id, employee_id) in DEMO_ACCOUNTS {
        store
            .users
            .insert(User {
                id: 0,
                email: email.to_string(),
                role,
                password_hash: hash_password(password, bcrypt_cost)?,
                client_id,
                employee_id,
            })
            .await?;
    }
    Ok(())
}
