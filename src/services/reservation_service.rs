use std::collections::HashMap;

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::db::store::Store;
use crate::error::{ApiError, ApiResult};
use crate::models::client::Client;
use crate::models::reservation::{Reservation, ReservationInput, ReservationStatus};
use crate::models::vehicle::Vehicle;
use crate::services::filters::{matches_search, Period};
use crate::services::pricing_service::{PriceQuote, PricingService};

const QR_PREFIX: &str = "QR";
const QR_LEN: usize = 9;
const QR_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub fn generate_qr_code() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..QR_LEN)
        .map(|_| QR_CHARSET[rng.gen_range(0..QR_CHARSET.len())] as char)
        .collect();
    format!("{}{}", QR_PREFIX, suffix)
}

/// Payload encoded in the QR image shown at vehicle pick-up.
pub fn qr_payload(reservation: &Reservation) -> String {
    format!("RESERVATION:{}:{}", reservation.id, reservation.qr_code)
}

#[derive(Debug, Serialize)]
pub struct ReservationView {
    #[serde(flatten)]
    pub reservation: Reservation,
    pub client_name: Option<String>,
    pub vehicle_name: Option<String>,
    pub vehicle_image: Option<String>,
}

impl ReservationView {
    fn new(reservation: Reservation, client: Option<&Client>, vehicle: Option<&Vehicle>) -> Self {
        Self {
            client_name: client.map(Client::full_name),
            vehicle_name: vehicle.map(Vehicle::display_name),
            vehicle_image: vehicle.map(|v| v.image.clone()),
            reservation,
        }
    }

    fn matches_search(&self, needle: Option<&str>) -> bool {
        let id = self.reservation.id.to_string();
        matches_search(
            needle,
            &[
                id.as_str(),
                self.client_name.as_deref().unwrap_or_default(),
                self.vehicle_name.as_deref().unwrap_or_default(),
            ],
        )
    }
}

#[derive(Debug, Serialize)]
pub struct ReservationDetails {
    #[serde(flatten)]
    pub view: ReservationView,
    pub qr_payload: String,
    pub quote: Option<PriceQuote>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReservationFilter {
    pub search: Option<String>,
    pub status: Option<ReservationStatus>,
    #[serde(default)]
    pub period: Period,
}

#[derive(Debug, Default, Deserialize)]
pub struct ClientReservationFilter {
    pub status: Option<ReservationStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Default, PartialEq, Serialize)]
pub struct ReservationStats {
    pub total: usize,
    pub confirmed: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub cancelled: usize,
    /// Sum of completed reservation prices.
    pub revenue: f64,
}

impl ReservationStats {
    pub fn from_views(views: &[ReservationView]) -> Self {
        let mut stats = Self {
            total: views.len(),
            ..Default::default()
        };
        for view in views {
            match view.reservation.status {
                ReservationStatus::Confirmed => stats.confirmed += 1,
                ReservationStatus::InProgress => stats.in_progress += 1,
                ReservationStatus::Completed => {
                    stats.completed += 1;
                    stats.revenue += view.reservation.total_price;
                }
                ReservationStatus::Cancelled => stats.cancelled += 1,
            }
        }
        stats
    }
}

#[derive(Debug, Serialize)]
pub struct ReservationListing {
    pub reservations: Vec<ReservationView>,
    pub stats: ReservationStats,
}

/// Checks booking dates against `today`.
pub fn validate_dates(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> ApiResult<()> {
    if start < today {
        return Err(ApiError::validation("Start date cannot be in the past"));
    }
    if end <= start {
        return Err(ApiError::validation("End date must be after start date"));
    }
    Ok(())
}

pub struct ReservationService;

impl ReservationService {
    /// Books a vehicle for a client at the calculated price.
    pub async fn create(
        store: &Store,
        client_id: u32,
        input: ReservationInput,
        today: NaiveDate,
    ) -> ApiResult<Reservation> {
        if store.clients.get(client_id).await?.is_none() {
            return Err(ApiError::not_found("Client"));
        }
        let vehicle = store
            .vehicles
            .get(input.vehicle_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Vehicle"))?;
        if !vehicle.available {
            return Err(ApiError::Conflict(format!(
                "{} is not available",
                vehicle.display_name()
            )));
        }

        validate_dates(input.start_date, input.end_date, today)?;
        let quote = PricingService::quote(
            vehicle.daily_rate,
            input.start_date,
            input.end_date,
            &input.options,
        )?;

        let reservation = store
            .reservations
            .insert(Reservation {
                id: 0,
                client_id,
                vehicle_id: vehicle.id,
                start_date: input.start_date,
                end_date: input.end_date,
                status: ReservationStatus::Confirmed,
                total_price: quote.total,
                options: input.options,
                booked_on: today,
                qr_code: generate_qr_code(),
            })
            .await?;

        log::info!(
            "Client {} booked vehicle {} for {} days ({:.2})",
            client_id,
            vehicle.id,
            quote.days,
            quote.total
        );
        Ok(reservation)
    }

    pub async fn update_status(
        store: &Store,
        reservation_id: u32,
        status: ReservationStatus,
    ) -> ApiResult<Reservation> {
        let mut reservation = store
            .reservations
            .get(reservation_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Reservation"))?;

        if !reservation.status.can_transition_to(status) {
            return Err(ApiError::Conflict(format!(
                "Cannot move a {} reservation to {}",
                reservation.status, status
            )));
        }
        if reservation.status == status {
            return Ok(reservation);
        }

        log::info!(
            "Reservation {}: {} -> {}",
            reservation_id,
            reservation.status,
            status
        );
        reservation.status = status;
        store
            .reservations
            .replace(reservation_id, reservation)
            .await?
            .ok_or_else(|| ApiError::not_found("Reservation"))
    }

    /// Every reservation joined with its client and vehicle, newest first.
    pub async fn enriched(store: &Store) -> ApiResult<Vec<ReservationView>> {
        let clients: HashMap<u32, Client> = store
            .clients
            .all()
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();
        let vehicles: HashMap<u32, Vehicle> = store
            .vehicles
            .all()
            .await?
            .into_iter()
            .map(|v| (v.id, v))
            .collect();

        let mut views: Vec<ReservationView> = store
            .reservations
            .all()
            .await?
            .into_iter()
            .map(|r| {
                let client = clients.get(&r.client_id);
                let vehicle = vehicles.get(&r.vehicle_id);
                ReservationView::new(r, client, vehicle)
            })
            .collect();
        views.sort_by(|a, b| {
            b.reservation
                .booked_on
                .cmp(&a.reservation.booked_on)
                .then(b.reservation.id.cmp(&a.reservation.id))
        });
        Ok(views)
    }

    pub async fn list(
        store: &Store,
        filter: &ReservationFilter,
        today: NaiveDate,
    ) -> ApiResult<ReservationListing> {
        let reservations: Vec<ReservationView> = Self::enriched(store)
            .await?
            .into_iter()
            .filter(|view| {
                view.matches_search(filter.search.as_deref())
                    && filter.status.map_or(true, |s| view.reservation.status == s)
                    && filter.period.contains(view.reservation.booked_on, today)
            })
            .collect();

        Ok(ReservationListing {
            stats: ReservationStats::from_views(&reservations),
            reservations,
        })
    }

    pub async fn list_for_client(
        store: &Store,
        client_id: u32,
        filter: &ClientReservationFilter,
    ) -> ApiResult<Vec<ReservationView>> {
        Ok(Self::enriched(store)
            .await?
            .into_iter()
            .filter(|view| {
                view.reservation.client_id == client_id
                    && filter.status.map_or(true, |s| view.reservation.status == s)
                    && matches_search(
                        filter.search.as_deref(),
                        &[view.vehicle_name.as_deref().unwrap_or_default()],
                    )
            })
            .collect())
    }

    /// A client's own reservation with its price breakdown.
    pub async fn details_for_client(
        store: &Store,
        client_id: u32,
        reservation_id: u32,
    ) -> ApiResult<ReservationDetails> {
        let reservation = store
            .reservations
            .get(reservation_id)
            .await?
            .filter(|r| r.client_id == client_id)
            .ok_or_else(|| ApiError::not_found("Reservation"))?;
        let client = store.clients.get(client_id).await?;
        let vehicle = store.vehicles.get(reservation.vehicle_id).await?;

        let quote = vehicle.as_ref().and_then(|v| {
            PricingService::quote(
                v.daily_rate,
                reservation.start_date,
                reservation.end_date,
                &reservation.options,
            )
            .ok()
        });

        Ok(ReservationDetails {
            qr_payload: qr_payload(&reservation),
            quote,
            view: ReservationView::new(reservation, client.as_ref(), vehicle.as_ref()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed::seed_demo_data;
    use crate::models::reservation::RentalOptions;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn seeded() -> Store {
        let store = Store::in_memory();
        seed_demo_data(&store, 4).await.unwrap();
        store
    }

    #[test]
    fn test_qr_code_shape() {
        let code = generate_qr_code();
        assert_eq!(code.len(), 11);
        assert!(code.starts_with("QR"));
        assert!(code[2..]
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_date_validation() {
        let today = date(2024, 3, 1);
        assert!(validate_dates(date(2024, 3, 1), date(2024, 3, 2), today).is_ok());
        assert!(validate_dates(date(2024, 2, 29), date(2024, 3, 2), today).is_err());
        assert!(validate_dates(date(2024, 3, 5), date(2024, 3, 5), today).is_err());
    }

    #[actix_rt::test]
    async fn test_create_prices_the_booking() {
        let store = seeded().await;
        let input = ReservationInput {
            vehicle_id: 1,
            start_date: date(2024, 1, 20),
            end_date: date(2024, 1, 25),
            options: RentalOptions {
                gps: true,
                ..Default::default()
            },
        };

        let reservation = ReservationService::create(&store, 1, input, date(2024, 1, 10))
            .await
            .unwrap();
        assert_eq!(reservation.id, 3);
        assert_eq!(reservation.total_price, 150.0);
        assert_eq!(reservation.status, ReservationStatus::Confirmed);
        assert_eq!(reservation.booked_on, date(2024, 1, 10));
    }

    #[actix_rt::test]
    async fn test_create_rejects_unavailable_vehicle() {
        let store = seeded().await;
        let input = ReservationInput {
            vehicle_id: 3,
            start_date: date(2024, 1, 20),
            end_date: date(2024, 1, 22),
            options: RentalOptions::default(),
        };
        let result = ReservationService::create(&store, 1, input, date(2024, 1, 10)).await;
        assert!(matches!(result, Err(ApiError::Conflict(_))));
    }

    #[actix_rt::test]
    async fn test_status_machine() {
        let store = seeded().await;
        let updated = ReservationService::update_status(&store, 2, ReservationStatus::Completed)
            .await
            .unwrap();
        assert_eq!(updated.status, ReservationStatus::Completed);

        let reopened =
            ReservationService::update_status(&store, 2, ReservationStatus::Confirmed).await;
        assert!(matches!(reopened, Err(ApiError::Conflict(_))));

        let missing = ReservationService::update_status(&store, 99, ReservationStatus::Cancelled).await;
        assert!(matches!(missing, Err(ApiError::NotFound(_))));
    }

    #[actix_rt::test]
    async fn test_list_filters_and_stats() {
        let store = seeded().await;
        let today = date(2024, 1, 20);

        let all = ReservationService::list(&store, &ReservationFilter::default(), today)
            .await
            .unwrap();
        assert_eq!(all.stats.total, 2);
        assert_eq!(all.stats.confirmed, 1);
        assert_eq!(all.stats.in_progress, 1);
        // newest booking first
        assert_eq!(all.reservations[0].reservation.id, 1);

        let by_client = ReservationFilter {
            search: Some("marie".to_string()),
            ..Default::default()
        };
        let listing = ReservationService::list(&store, &by_client, today).await.unwrap();
        assert_eq!(listing.reservations.len(), 1);
        assert_eq!(listing.reservations[0].vehicle_name.as_deref(), Some("Renault Clio"));

        let last_week = ReservationFilter {
            period: Period::LastWeek,
            ..Default::default()
        };
        let recent = ReservationService::list(&store, &last_week, today).await.unwrap();
        assert_eq!(recent.stats.total, 1);
    }

    #[actix_rt::test]
    async fn test_client_only_sees_own_reservations() {
        let store = seeded().await;
        let own = ReservationService::list_for_client(&store, 1, &Default::default())
            .await
            .unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].reservation.client_id, 1);

        let details = ReservationService::details_for_client(&store, 1, 1).await.unwrap();
        assert_eq!(details.qr_payload, "RESERVATION:1:QR123456789");
        assert_eq!(details.quote.map(|q| q.total), Some(150.0));

        let foreign = ReservationService::details_for_client(&store, 1, 2).await;
        assert!(matches!(foreign, Err(ApiError::NotFound(_))));
    }
}
