use serde::{Deserialize, Serialize};

use crate::db::store::Entity;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agency {
    #[serde(default)]
    pub id: u32,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub opening_hours: String,
}

impl Entity for Agency {
    const NAME: &'static str = "Agency";

    fn id(&self) -> u32 {
        self.id
    }

    fn set_id(&mut self, id: u32) {
        self.id = id;
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AgencyUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub opening_hours: Option<String>,
}

impl AgencyUpdate {
    pub fn apply(self, agency: &mut Agency) {
        if let Some(name) = self.name {
            agency.name = name;
        }
        if let Some(address) = self.address {
            agency.address = address;
        }
        if let Some(phone) = self.phone {
            agency.phone = phone;
        }
        if let Some(email) = self.email {
            agency.email = email;
        }
        if let Some(opening_hours) = self.opening_hours {
            agency.opening_hours = opening_hours;
        }
    }
}
