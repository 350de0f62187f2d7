use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::store::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    pub const ALL: [ReservationStatus; 4] = [
        ReservationStatus::Confirmed,
        ReservationStatus::InProgress,
        ReservationStatus::Completed,
        ReservationStatus::Cancelled,
    ];

    /// Confirmed and in-progress rentals still hold their vehicle.
    pub fn is_active(self) -> bool {
        matches!(self, ReservationStatus::Confirmed | ReservationStatus::InProgress)
    }

    /// Legal back-office transitions. Re-applying the current status is allowed.
    pub fn can_transition_to(self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;

        if self == next {
            return true;
        }
        matches!(
            (self, next),
            (Confirmed, InProgress)
                | (Confirmed, Completed)
                | (Confirmed, Cancelled)
                | (InProgress, Completed)
                | (InProgress, Cancelled)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::InProgress => "in_progress",
            ReservationStatus::Completed => "completed",
            ReservationStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean add-ons a client can attach to a rental.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RentalOptions {
    pub gps: bool,
    pub full_insurance: bool,
    pub child_seat: bool,
    pub extra_driver: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    #[serde(default)]
    pub id: u32,
    pub client_id: u32,
    pub vehicle_id: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: ReservationStatus,
    pub total_price: f64,
    pub options: RentalOptions,
    pub booked_on: NaiveDate,
    pub qr_code: String,
}

impl Entity for Reservation {
    const NAME: &'static str = "Reservation";

    fn id(&self) -> u32 {
        self.id
    }

    fn set_id(&mut self, id: u32) {
        self.id = id;
    }
}

/// Body of a booking request.
#[derive(Debug, Clone, Deserialize)]
pub struct ReservationInput {
    pub vehicle_id: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub options: RentalOptions,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: ReservationStatus,
}
