use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::store::Store;
use crate::error::{ApiError, ApiResult};
use crate::models::reservation::ReservationStatus;
use crate::models::review::{Review, ReviewInput};
use crate::services::filters::mean_rating;

#[derive(Debug, Default, Deserialize)]
pub struct ReviewFilter {
    pub rating: Option<u8>,
    pub vehicle_id: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ReviewView {
    #[serde(flatten)]
    pub review: Review,
    pub client_name: Option<String>,
    pub vehicle_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReviewListing {
    pub reviews: Vec<ReviewView>,
    pub average_rating: f64,
    pub total: usize,
}

pub struct ReviewService;

impl ReviewService {
    pub async fn list(store: &Store, filter: &ReviewFilter) -> ApiResult<ReviewListing> {
        let clients: HashMap<u32, String> = store
            .clients
            .all()
            .await?
            .into_iter()
            .map(|c| (c.id, c.full_name()))
            .collect();
        let vehicles: HashMap<u32, String> = store
            .vehicles
            .all()
            .await?
            .into_iter()
            .map(|v| (v.id, v.display_name()))
            .collect();

        let mut reviews = store
            .reviews
            .find(&|r: &Review| {
                filter.rating.map_or(true, |rating| r.rating == rating)
                    && filter.vehicle_id.map_or(true, |id| r.vehicle_id == id)
            })
            .await?;
        reviews.sort_by(|a, b| b.posted_on.cmp(&a.posted_on));

        let average_rating = mean_rating(reviews.iter().map(|r| r.rating));
        let reviews: Vec<ReviewView> = reviews
            .into_iter()
            .map(|review| ReviewView {
                client_name: clients.get(&review.client_id).cloned(),
                vehicle_name: vehicles.get(&review.vehicle_id).cloned(),
                review,
            })
            .collect();

        Ok(ReviewListing {
            total: reviews.len(),
            average_rating,
            reviews,
        })
    }

    /// Reviews the vehicle of one of the client's completed reservations.
    pub async fn add(
        store: &Store,
        client_id: u32,
        reservation_id: u32,
        input: ReviewInput,
        today: NaiveDate,
    ) -> ApiResult<Review> {
        if !(1..=5).contains(&input.rating) {
            return Err(ApiError::validation("Rating must be between 1 and 5"));
        }

        let reservation = store
            .reservations
            .get(reservation_id)
            .await?
            .filter(|r| r.client_id == client_id)
            .ok_or_else(|| ApiError::not_found("Reservation"))?;
        if reservation.status != ReservationStatus::Completed {
            return Err(ApiError::Conflict(
                "Only completed reservations can be reviewed".to_string(),
            ));
        }

        let review = store
            .reviews
            .insert(Review {
                id: 0,
                client_id,
                vehicle_id: reservation.vehicle_id,
                rating: input.rating,
                comment: input.comment.trim().to_string(),
                posted_on: today,
            })
            .await?;
        log::info!(
            "Client {} rated vehicle {} {}/5",
            client_id,
            review.vehicle_id,
            review.rating
        );
        Ok(review)
    }
}
