use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::store::Entity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    #[serde(default)]
    pub id: u32,
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    pub phone: String,
    pub birth_date: NaiveDate,
    pub license_number: String,
    pub address: String,
    pub loyalty_points: u32,
    pub registered_on: NaiveDate,
}

impl Client {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn loyalty_tier(&self) -> LoyaltyTier {
        LoyaltyTier::from_points(self.loyalty_points)
    }
}

impl Entity for Client {
    const NAME: &'static str = "Client";

    fn id(&self) -> u32 {
        self.id
    }

    fn set_id(&mut self, id: u32) {
        self.id = id;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoyaltyTier {
    Standard,
    Silver,
    Gold,
    Vip,
}

impl LoyaltyTier {
    pub fn from_points(points: u32) -> Self {
        match points {
            500.. => LoyaltyTier::Vip,
            200..=499 => LoyaltyTier::Gold,
            100..=199 => LoyaltyTier::Silver,
            _ => LoyaltyTier::Standard,
        }
    }
}

/// Fields a client may change on their own profile.
#[derive(Debug, Default, Deserialize)]
pub struct ClientProfileUpdate {
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub license_number: Option<String>,
    pub address: Option<String>,
}

impl ClientProfileUpdate {
    pub fn apply(self, client: &mut Client) {
        if let Some(last_name) = self.last_name {
            client.last_name = last_name;
        }
        if let Some(first_name) = self.first_name {
            client.first_name = first_name;
        }
        if let Some(phone) = self.phone {
            client.phone = phone;
        }
        if let Some(birth_date) = self.birth_date {
            client.birth_date = birth_date;
        }
        if let Some(license_number) = self.license_number {
            client.license_number = license_number;
        }
        if let Some(address) = self.address {
            client.address = address;
        }
    }
}
