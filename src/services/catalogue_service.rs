use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::db::store::Store;
use crate::error::{ApiError, ApiResult};
use crate::models::reservation::Reservation;
use crate::models::review::Review;
use crate::models::vehicle::{FuelType, Transmission, Vehicle, VehicleCategory, VehicleUpdate};
use crate::services::filters::{matches_search, mean_rating};

#[derive(Debug, Default, Deserialize)]
pub struct CatalogueFilter {
    pub category: Option<VehicleCategory>,
    pub fuel: Option<FuelType>,
    pub transmission: Option<Transmission>,
    pub max_price: Option<f64>,
    pub search: Option<String>,
    pub available: Option<bool>,
}

impl CatalogueFilter {
    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        self.category.map_or(true, |c| vehicle.category == c)
            && self.fuel.map_or(true, |f| vehicle.fuel == f)
            && self.transmission.map_or(true, |t| vehicle.transmission == t)
            && self.max_price.map_or(true, |max| vehicle.daily_rate <= max)
            && self.available.map_or(true, |a| vehicle.available == a)
            && matches_search(self.search.as_deref(), &[vehicle.make.as_str(), vehicle.model.as_str()])
    }
}

#[derive(Debug, Serialize)]
pub struct VehicleCard {
    #[serde(flatten)]
    pub vehicle: Vehicle,
    pub rating: f64,
    pub review_count: usize,
}

#[derive(Debug, Serialize)]
pub struct VehicleDetails {
    #[serde(flatten)]
    pub card: VehicleCard,
    pub reviews: Vec<Review>,
}

pub struct CatalogueService;

impl CatalogueService {
    pub async fn list(store: &Store, filter: &CatalogueFilter) -> ApiResult<Vec<VehicleCard>> {
        let vehicles = store.vehicles.find(&|v: &Vehicle| filter.matches(v)).await?;
        let reviews = store.reviews.all().await?;

        let mut by_vehicle: HashMap<u32, Vec<u8>> = HashMap::new();
        for review in &reviews {
            by_vehicle
                .entry(review.vehicle_id)
                .or_default()
                .push(review.rating);
        }

        Ok(vehicles
            .into_iter()
            .map(|vehicle| {
                let ratings = by_vehicle.get(&vehicle.id).cloned().unwrap_or_default();
                VehicleCard {
                    review_count: ratings.len(),
                    rating: mean_rating(ratings),
                    vehicle,
                }
            })
            .collect())
    }

    pub async fn details(store: &Store, vehicle_id: u32) -> ApiResult<VehicleDetails> {
        let vehicle = Self::vehicle(store, vehicle_id).await?;
        let reviews = store
            .reviews
            .find(&|r: &Review| r.vehicle_id == vehicle_id)
            .await?;

        Ok(VehicleDetails {
            card: VehicleCard {
                rating: mean_rating(reviews.iter().map(|r| r.rating)),
                review_count: reviews.len(),
                vehicle,
            },
            reviews,
        })
    }

    pub async fn vehicle(store: &Store, vehicle_id: u32) -> ApiResult<Vehicle> {
        store
            .vehicles
            .get(vehicle_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Vehicle"))
    }

    pub async fn update_vehicle(
        store: &Store,
        vehicle_id: u32,
        update: VehicleUpdate,
    ) -> ApiResult<Vehicle> {
        let mut vehicle = Self::vehicle(store, vehicle_id).await?;
        update.apply(&mut vehicle);
        if vehicle.daily_rate <= 0.0 {
            return Err(ApiError::validation("Daily rate must be positive"));
        }
        let vehicle = store
            .vehicles
            .replace(vehicle_id, vehicle)
            .await?
            .ok_or_else(|| ApiError::not_found("Vehicle"))?;
        log::info!(
            "Updated vehicle {} (available: {})",
            vehicle.id,
            vehicle.available
        );
        Ok(vehicle)
    }

    /// Refused while a confirmed or in-progress reservation holds the vehicle.
    pub async fn delete_vehicle(store: &Store, vehicle_id: u32) -> ApiResult<()> {
        let holding = store
            .reservations
            .find(&|r: &Reservation| r.vehicle_id == vehicle_id && r.status.is_active())
            .await?;
        if !holding.is_empty() {
            return Err(ApiError::Conflict(
                "Vehicle has active reservations".to_string(),
            ));
        }
        if !store.vehicles.delete(vehicle_id).await? {
            return Err(ApiError::not_found("Vehicle"));
        }
        log::info!("Deleted vehicle {}", vehicle_id);
        Ok(())
    }
}
