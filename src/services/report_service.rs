//! Back-office dashboard and period reports.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::store::Store;
use crate::error::ApiResult;
use crate::models::client::Client;
use crate::models::payment::{Payment, PaymentStatus};
use crate::models::reservation::{Reservation, ReservationStatus};
use crate::models::vehicle::{Vehicle, VehicleCategory};
use crate::services::filters::{mean_rating, Period};
use crate::services::reservation_service::{ReservationService, ReservationView};

const RECENT_RESERVATIONS: usize = 5;
const TOP_VEHICLES: usize = 5;
const HIGH_OCCUPANCY: u32 = 80;
const LOW_RATING: f64 = 4.0;

/// Share of the fleet currently unavailable, in whole percent.
pub fn occupancy_rate(vehicles: &[Vehicle]) -> u32 {
    if vehicles.is_empty() {
        return 0;
    }
    let total = vehicles.len() as f64;
    let rented = vehicles.iter().filter(|v| !v.available).count() as f64;
    (rented / total * 100.0).round() as u32
}

fn paid_revenue<'a>(payments: impl IntoIterator<Item = &'a Payment>) -> f64 {
    payments
        .into_iter()
        .filter(|p| p.status == PaymentStatus::Paid)
        .map(|p| p.amount)
        .sum()
}

#[derive(Debug, Serialize)]
pub struct StatusCount {
    pub status: ReservationStatus,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub total_vehicles: usize,
    pub available_vehicles: usize,
    pub active_reservations: usize,
    pub revenue: f64,
    pub occupancy_rate: u32,
    pub total_clients: usize,
    pub reservations_by_status: Vec<StatusCount>,
    pub recent_reservations: Vec<ReservationView>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub period: Period,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct ReportSummary {
    pub reservations: usize,
    pub revenue: f64,
    pub new_clients: usize,
    pub occupancy_rate: u32,
    pub average_rating: f64,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct TopVehicle {
    pub vehicle_id: u32,
    pub vehicle_name: String,
    pub reservations: usize,
    pub revenue: f64,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct CategoryStats {
    pub category: VehicleCategory,
    pub vehicles: usize,
    pub reservations: usize,
    pub revenue: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    HighOccupancy,
    LowRating,
    PopularVehicle,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub summary: ReportSummary,
    pub top_vehicles: Vec<TopVehicle>,
    pub categories: Vec<CategoryStats>,
    pub recommendations: Vec<Recommendation>,
}

/// Vehicles ranked by reservation count, ties broken by id.
pub fn top_vehicles(vehicles: &[Vehicle], reservations: &[Reservation]) -> Vec<TopVehicle> {
    let mut ranked: Vec<TopVehicle> = vehicles
        .iter()
        .filter_map(|vehicle| {
            let booked: Vec<&Reservation> = reservations
                .iter()
                .filter(|r| r.vehicle_id == vehicle.id)
                .collect();
            if booked.is_empty() {
                return None;
            }
            Some(TopVehicle {
                vehicle_id: vehicle.id,
                vehicle_name: vehicle.display_name(),
                reservations: booked.len(),
                revenue: booked.iter().map(|r| r.total_price).sum(),
            })
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.reservations
            .cmp(&a.reservations)
            .then(a.vehicle_id.cmp(&b.vehicle_id))
    });
    ranked.truncate(TOP_VEHICLES);
    ranked
}

/// Per-category fleet size, bookings and booked revenue, in first-seen order.
pub fn category_stats(vehicles: &[Vehicle], reservations: &[Reservation]) -> Vec<CategoryStats> {
    let mut stats: Vec<CategoryStats> = Vec::new();
    let mut category_of: HashMap<u32, VehicleCategory> = HashMap::new();

    for vehicle in vehicles {
        category_of.insert(vehicle.id, vehicle.category);
        match stats.iter_mut().find(|s| s.category == vehicle.category) {
            Some(entry) => entry.vehicles += 1,
            None => stats.push(CategoryStats {
                category: vehicle.category,
                vehicles: 1,
                reservations: 0,
                revenue: 0.0,
            }),
        }
    }

    for reservation in reservations {
        let Some(category) = category_of.get(&reservation.vehicle_id) else {
            continue;
        };
        if let Some(entry) = stats.iter_mut().find(|s| s.category == *category) {
            entry.reservations += 1;
            entry.revenue += reservation.total_price;
        }
    }
    stats
}

pub fn recommendations(summary: &ReportSummary, top: &[TopVehicle]) -> Vec<Recommendation> {
    let mut out = Vec::new();
    if summary.occupancy_rate > HIGH_OCCUPANCY {
        out.push(Recommendation {
            kind: RecommendationKind::HighOccupancy,
            message: format!(
                "Occupancy is at {}%. Consider adding vehicles to the fleet.",
                summary.occupancy_rate
            ),
        });
    }
    if summary.average_rating < LOW_RATING {
        out.push(Recommendation {
            kind: RecommendationKind::LowRating,
            message: format!(
                "The average rating of {}/5 can be improved. Review recent client feedback.",
                summary.average_rating
            ),
        });
    }
    if let Some(leader) = top.first() {
        out.push(Recommendation {
            kind: RecommendationKind::PopularVehicle,
            message: format!(
                "{} is the most requested vehicle with {} reservations.",
                leader.vehicle_name, leader.reservations
            ),
        });
    }
    out
}

pub struct ReportService;

impl ReportService {
    pub async fn dashboard(store: &Store) -> ApiResult<Dashboard> {
        let vehicles = store.vehicles.all().await?;
        let payments = store.payments.all().await?;
        let views = ReservationService::enriched(store).await?;

        let reservations_by_status = ReservationStatus::ALL
            .into_iter()
            .map(|status| StatusCount {
                status,
                count: views
                    .iter()
                    .filter(|v| v.reservation.status == status)
                    .count(),
            })
            .collect();

        Ok(Dashboard {
            total_vehicles: vehicles.len(),
            available_vehicles: vehicles.iter().filter(|v| v.available).count(),
            active_reservations: views
                .iter()
                .filter(|v| v.reservation.status.is_active())
                .count(),
            revenue: paid_revenue(&payments),
            occupancy_rate: occupancy_rate(&vehicles),
            total_clients: store.clients.count().await?,
            reservations_by_status,
            recent_reservations: views.into_iter().take(RECENT_RESERVATIONS).collect(),
        })
    }

    /// Activity booked inside `period`; occupancy is a current snapshot.
    pub async fn report(store: &Store, period: Period, today: NaiveDate) -> ApiResult<Report> {
        let vehicles = store.vehicles.all().await?;
        let reservations = store
            .reservations
            .find(&|r: &Reservation| period.contains(r.booked_on, today))
            .await?;
        let payments = store
            .payments
            .find(&|p: &Payment| period.contains(p.paid_on, today))
            .await?;
        let new_clients = store
            .clients
            .find(&|c: &Client| period.contains(c.registered_on, today))
            .await?
            .len();
        let ratings = store.reviews.all().await?;

        let summary = ReportSummary {
            reservations: reservations.len(),
            revenue: paid_revenue(&payments),
            new_clients,
            occupancy_rate: occupancy_rate(&vehicles),
            average_rating: mean_rating(ratings.iter().map(|r| r.rating)),
        };
        let top = top_vehicles(&vehicles, &reservations);

        log::debug!(
            "Report for {:?}: {} reservations, {:.2} revenue",
            period,
            summary.reservations,
            summary.revenue
        );
        Ok(Report {
            recommendations: recommendations(&summary, &top),
            categories: category_stats(&vehicles, &reservations),
            top_vehicles: top,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed::{demo_reservations, demo_vehicles, seed_demo_data};

    fn numbered<T>(items: Vec<T>, set_id: impl Fn(&mut T, u32)) -> Vec<T> {
        items
            .into_iter()
            .enumerate()
            .map(|(i, mut item)| {
                set_id(&mut item, i as u32 + 1);
                item
            })
            .collect()
    }

    fn fleet() -> Vec<Vehicle> {
        numbered(demo_vehicles(), |v, id| v.id = id)
    }

    fn bookings() -> Vec<Reservation> {
        numbered(demo_reservations(), |r, id| r.id = id)
    }

    #[test]
    fn test_occupancy_rate() {
        assert_eq!(occupancy_rate(&fleet()), 25);
        assert_eq!(occupancy_rate(&[]), 0);
    }

    #[test]
    fn test_top_vehicles_ranking() {
        let mut reservations = bookings();
        let mut extra = reservations[1].clone();
        extra.id = 3;
        extra.total_price = 60.0;
        reservations.push(extra);

        let top = top_vehicles(&fleet(), &reservations);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].vehicle_name, "Renault Clio");
        assert_eq!(top[0].reservations, 2);
        assert_eq!(top[0].revenue, 180.0);
        assert_eq!(top[1].vehicle_id, 1);
    }

    #[test]
    fn test_category_stats_cover_whole_fleet() {
        let stats = category_stats(&fleet(), &bookings());
        assert_eq!(stats.len(), 4);
        let economy = &stats[0];
        assert_eq!(economy.category, VehicleCategory::Economy);
        assert_eq!(economy.reservations, 1);
        assert_eq!(economy.revenue, 125.0);
        let luxury = stats
            .iter()
            .find(|s| s.category == VehicleCategory::Luxury)
            .unwrap();
        assert_eq!(luxury.reservations, 0);
    }

    #[test]
    fn test_recommendations() {
        let busy = ReportSummary {
            reservations: 10,
            revenue: 0.0,
            new_clients: 0,
            occupancy_rate: 85,
            average_rating: 3.5,
        };
        let kinds: Vec<_> = recommendations(&busy, &[])
            .into_iter()
            .map(|r| r.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![RecommendationKind::HighOccupancy, RecommendationKind::LowRating]
        );

        let calm = ReportSummary {
            occupancy_rate: 80,
            average_rating: 4.0,
            ..busy
        };
        let top = top_vehicles(&fleet(), &bookings());
        let recs = recommendations(&calm, &top);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].kind, RecommendationKind::PopularVehicle);
    }

    #[actix_rt::test]
    async fn test_dashboard_over_demo_data() {
        let store = Store::in_memory();
        seed_demo_data(&store, 4).await.unwrap();

        let dashboard = ReportService::dashboard(&store).await.unwrap();
        assert_eq!(dashboard.available_vehicles, 3);
        assert_eq!(dashboard.active_reservations, 2);
        assert_eq!(dashboard.revenue, 125.0);
        assert_eq!(dashboard.occupancy_rate, 25);
        assert_eq!(dashboard.reservations_by_status.len(), 4);
        assert_eq!(dashboard.recent_reservations.len(), 2);
    }

    #[actix_rt::test]
    async fn test_report_respects_period() {
        let store = Store::in_memory();
        seed_demo_data(&store, 4).await.unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();

        let week = ReportService::report(&store, Period::LastWeek, today)
            .await
            .unwrap();
        assert_eq!(week.summary.reservations, 1);
        assert_eq!(week.summary.revenue, 125.0);
        assert_eq!(week.summary.new_clients, 0);
        assert_eq!(week.summary.average_rating, 4.5);

        let all = ReportService::report(&store, Period::All, today).await.unwrap();
        assert_eq!(all.summary.reservations, 2);
        assert_eq!(all.summary.new_clients, 2);
        assert_eq!(all.top_vehicles.len(), 2);
    }
}
