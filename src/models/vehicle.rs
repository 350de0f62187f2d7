use serde::{Deserialize, Serialize};

use crate::db::store::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleCategory {
    Economy,
    Compact,
    Sedan,
    Suv,
    Luxury,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelType {
    Petrol,
    Diesel,
    Electric,
    Hybrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transmission {
    Manual,
    Automatic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    #[serde(default)]
    pub id: u32,
    pub make: String,
    pub model: String,
    pub category: VehicleCategory,
    pub daily_rate: f64,
    pub available: bool,
    pub fuel: FuelType,
    pub transmission: Transmission,
    pub seats: u8,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub equipment: Vec<String>,
    pub mileage: u32,
    pub year: u16,
}

impl Vehicle {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.make, self.model)
    }
}

impl Entity for Vehicle {
    const NAME: &'static str = "Vehicle";

    fn id(&self) -> u32 {
        self.id
    }

    fn set_id(&mut self, id: u32) {
        self.id = id;
    }
}

/// Partial update sent by the back office; absent fields are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct VehicleUpdate {
    pub make: Option<String>,
    pub model: Option<String>,
    pub category: Option<VehicleCategory>,
    pub daily_rate: Option<f64>,
    pub available: Option<bool>,
    pub fuel: Option<FuelType>,
    pub transmission: Option<Transmission>,
    pub seats: Option<u8>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub equipment: Option<Vec<String>>,
    pub mileage: Option<u32>,
    pub year: Option<u16>,
}

impl VehicleUpdate {
    pub fn apply(self, vehicle: &mut Vehicle) {
        if let Some(make) = self.make {
            vehicle.make = make;
        }
        if let Some(model) = self.model {
            vehicle.model = model;
        }
        if let Some(category) = self.category {
            vehicle.category = category;
        }
        if let Some(daily_rate) = self.daily_rate {
            vehicle.daily_rate = daily_rate;
        }
        if let Some(available) = self.available {
            vehicle.available = available;
        }
        if let Some(fuel) = self.fuel {
            vehicle.fuel = fuel;
        }
        if let Some(transmission) = self.transmission {
            vehicle.transmission = transmission;
        }
        if let Some(seats) = self.seats {
            vehicle.seats = seats;
        }
        if let Some(image) = self.image {
            vehicle.image = image;
        }
        if let Some(description) = self.description {
            vehicle.description = description;
        }
        if let Some(equipment) = self.equipment {
            vehicle.equipment = equipment;
        }
        if let Some(mileage) = self.mileage {
            vehicle.mileage = mileage;
        }
        if let Some(year) = self.year {
            vehicle.year = year;
        }
    }
}
