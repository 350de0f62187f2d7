use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::store::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    Cash,
    Transfer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    #[serde(default)]
    pub id: u32,
    pub reservation_id: u32,
    pub amount: f64,
    pub status: PaymentStatus,
    pub method: PaymentMethod,
    pub paid_on: NaiveDate,
}

impl Entity for Payment {
    const NAME: &'static str = "Payment";

    fn id(&self) -> u32 {
        self.id
    }

    fn set_id(&mut self, id: u32) {
        self.id = id;
    }
}

#[derive(Debug, Deserialize)]
pub struct PaymentStatusUpdate {
    pub status: PaymentStatus,
}
