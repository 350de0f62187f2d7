use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::store::Entity;
use crate::models::user::UserRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    Admin,
    Employee,
}

impl From<StaffRole> for UserRole {
    fn from(role: StaffRole) -> Self {
        match role {
            StaffRole::Admin => UserRole::Admin,
            StaffRole::Employee => UserRole::Employee,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(default)]
    pub id: u32,
    pub last_name: String,
    pub first_name: String,
    pub email: String,
    pub role: StaffRole,
    pub agency_id: u32,
    pub hired_on: NaiveDate,
}

impl Entity for Employee {
    const NAME: &'static str = "Employee";

    fn id(&self) -> u32 {
        self.id
    }

    fn set_id(&mut self, id: u32) {
        self.id = id;
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct EmployeeUpdate {
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<StaffRole>,
    pub agency_id: Option<u32>,
    pub hired_on: Option<NaiveDate>,
}

impl EmployeeUpdate {
    pub fn apply(self, employee: &mut Employee) {
        if let Some(last_name) = self.last_name {
            employee.last_name = last_name;
        }
        if let Some(first_name) = self.first_name {
            employee.first_name = first_name;
        }
        if let Some(email) = self.email {
            employee.email = email;
        }
        if let Some(role) = self.role {
            employee.role = role;
        }
        if let Some(agency_id) = self.agency_id {
            employee.agency_id = agency_id;
        }
        if let Some(hired_on) = self.hired_on {
            employee.hired_on = hired_on;
        }
    }
}
