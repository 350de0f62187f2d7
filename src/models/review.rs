use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::store::Entity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(default)]
    pub id: u32,
    pub client_id: u32,
    pub vehicle_id: u32,
    pub rating: u8,
    pub comment: String,
    pub posted_on: NaiveDate,
}

impl Entity for Review {
    const NAME: &'static str = "Review";

    fn id(&self) -> u32 {
        self.id
    }

    fn set_id(&mut self, id: u32) {
        self.id = id;
    }
}

#[derive(Debug, Deserialize)]
pub struct ReviewInput {
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
}
