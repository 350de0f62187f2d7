use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::db::store::Store;
use crate::error::{ApiError, ApiResult};
use crate::models::client::Client;
use crate::models::payment::{Payment, PaymentMethod, PaymentStatus};
use crate::models::reservation::Reservation;
use crate::models::vehicle::Vehicle;
use crate::services::filters::{matches_search, Period};

#[derive(Debug, Serialize)]
pub struct PaymentView {
    #[serde(flatten)]
    pub payment: Payment,
    pub client_name: Option<String>,
    pub vehicle_name: Option<String>,
    pub rental_start: Option<NaiveDate>,
    pub rental_end: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PaymentFilter {
    pub search: Option<String>,
    pub status: Option<PaymentStatus>,
    pub method: Option<PaymentMethod>,
    #[serde(default)]
    pub period: Period,
}

#[derive(Debug, Default, PartialEq, Serialize)]
pub struct PaymentStats {
    pub total: usize,
    pub paid: usize,
    pub pending: usize,
    pub amount_paid: f64,
    pub amount_pending: f64,
    pub amount_refunded: f64,
}

impl PaymentStats {
    fn from_views(views: &[PaymentView]) -> Self {
        let mut stats = Self {
            total: views.len(),
            ..Default::default()
        };
        for view in views {
            let amount = view.payment.amount;
            match view.payment.status {
                PaymentStatus::Paid => {
                    stats.paid += 1;
                    stats.amount_paid += amount;
                }
                PaymentStatus::Pending => {
                    stats.pending += 1;
                    stats.amount_pending += amount;
                }
                PaymentStatus::Refunded => stats.amount_refunded += amount,
            }
        }
        stats
    }
}

#[derive(Debug, Serialize)]
pub struct PaymentListing {
    pub payments: Vec<PaymentView>,
    pub stats: PaymentStats,
}

/// Manual payment entry from the back office.
#[derive(Debug, Deserialize)]
pub struct PaymentInput {
    pub reservation_id: u32,
    /// Defaults to the reservation price.
    pub amount: Option<f64>,
    pub method: PaymentMethod,
    #[serde(default = "pending")]
    pub status: PaymentStatus,
}

fn pending() -> PaymentStatus {
    PaymentStatus::Pending
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invoice {
    pub reservation_id: u32,
    pub number: String,
    pub issued_on: NaiveDate,
    pub amount: f64,
    pub status: PaymentStatus,
    pub vehicle_name: Option<String>,
    pub payment: Option<Payment>,
}

#[derive(Debug, Default, Deserialize)]
pub struct InvoiceFilter {
    pub status: Option<PaymentStatus>,
    pub search: Option<String>,
    pub year: Option<i32>,
}

impl InvoiceFilter {
    pub fn matches(&self, invoice: &Invoice) -> bool {
        self.status.map_or(true, |s| invoice.status == s)
            && self.year.map_or(true, |y| invoice.issued_on.year() == y)
            && matches_search(
                self.search.as_deref(),
                &[
                    invoice.number.as_str(),
                    invoice.vehicle_name.as_deref().unwrap_or_default(),
                ],
            )
    }
}

pub fn invoice_number(reservation_id: u32) -> String {
    format!("FAC-{:04}", reservation_id)
}

pub struct BillingService;

impl BillingService {
    pub async fn list_payments(
        store: &Store,
        filter: &PaymentFilter,
        today: NaiveDate,
    ) -> ApiResult<PaymentListing> {
        let reservations: HashMap<u32, Reservation> = store
            .reservations
            .all()
            .await?
            .into_iter()
            .map(|r| (r.id, r))
            .collect();
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

        let mut payments = store.payments.all().await?;
        payments.sort_by(|a, b| b.paid_on.cmp(&a.paid_on).then(b.id.cmp(&a.id)));

        let payments: Vec<PaymentView> = payments
            .into_iter()
            .map(|payment| {
                let reservation = reservations.get(&payment.reservation_id);
                let client = reservation.and_then(|r| clients.get(&r.client_id));
                let vehicle = reservation.and_then(|r| vehicles.get(&r.vehicle_id));
                PaymentView {
                    client_name: client.map(Client::full_name),
                    vehicle_name: vehicle.map(Vehicle::display_name),
                    rental_start: reservation.map(|r| r.start_date),
                    rental_end: reservation.map(|r| r.end_date),
                    payment,
                }
            })
            .filter(|view| {
                let id = view.payment.id.to_string();
                matches_search(
                    filter.search.as_deref(),
                    &[
                        id.as_str(),
                        view.client_name.as_deref().unwrap_or_default(),
                        view.vehicle_name.as_deref().unwrap_or_default(),
                    ],
                ) && filter.status.map_or(true, |s| view.payment.status == s)
                    && filter.method.map_or(true, |m| view.payment.method == m)
                    && filter.period.contains(view.payment.paid_on, today)
            })
            .collect();

        Ok(PaymentListing {
            stats: PaymentStats::from_views(&payments),
            payments,
        })
    }

    pub async fn update_payment_status(
        store: &Store,
        payment_id: u32,
        status: PaymentStatus,
    ) -> ApiResult<Payment> {
        let mut payment = store
            .payments
            .get(payment_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Payment"))?;
        log::info!("Payment {}: {:?} -> {:?}", payment_id, payment.status, status);
        payment.status = status;
        store
            .payments
            .replace(payment_id, payment)
            .await?
            .ok_or_else(|| ApiError::not_found("Payment"))
    }

    pub async fn create_payment(
        store: &Store,
        input: PaymentInput,
        today: NaiveDate,
    ) -> ApiResult<Payment> {
        let reservation = store
            .reservations
            .get(input.reservation_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Reservation"))?;
        let amount = input.amount.unwrap_or(reservation.total_price);
        if !amount.is_finite() || amount < 0.0 {
            return Err(ApiError::validation("Amount must be a positive number"));
        }

        let payment = store
            .payments
            .insert(Payment {
                id: 0,
                reservation_id: reservation.id,
                amount,
                status: input.status,
                method: input.method,
                paid_on: today,
            })
            .await?;
        log::info!(
            "Recorded payment {} of {:.2} for reservation {}",
            payment.id,
            amount,
            reservation.id
        );
        Ok(payment)
    }

    /// One invoice per reservation of the client, newest first.
    pub async fn invoices_for_client(
        store: &Store,
        client_id: u32,
        filter: &InvoiceFilter,
    ) -> ApiResult<Vec<Invoice>> {
        let mut reservations = store
            .reservations
            .find(&|r: &Reservation| r.client_id == client_id)
            .await?;
        reservations.sort_by(|a, b| b.booked_on.cmp(&a.booked_on).then(b.id.cmp(&a.id)));

        let payments = store.payments.all().await?;
        let vehicles: HashMap<u32, String> = store
            .vehicles
            .all()
            .await?
            .into_iter()
            .map(|v| (v.id, v.display_name()))
            .collect();

        Ok(reservations
            .into_iter()
            .map(|reservation| {
                let payment = payments
                    .iter()
                    .find(|p| p.reservation_id == reservation.id)
                    .cloned();
                Invoice {
                    reservation_id: reservation.id,
                    number: invoice_number(reservation.id),
                    issued_on: reservation.booked_on,
                    amount: reservation.total_price,
                    status: payment
                        .as_ref()
                        .map_or(PaymentStatus::Pending, |p| p.status),
                    vehicle_name: vehicles.get(&reservation.vehicle_id).cloned(),
                    payment,
                }
            })
            .filter(|invoice| filter.matches(invoice))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed::seed_demo_data;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn seeded() -> Store {
        let store = Store::in_memory();
        seed_demo_data(&store, 4).await.unwrap();
        store
    }

    #[test]
    fn test_invoice_number_padding() {
        assert_eq!(invoice_number(1), "FAC-0001");
        assert_eq!(invoice_number(42), "FAC-0042");
        assert_eq!(invoice_number(12345), "FAC-12345");
    }

    #[actix_rt::test]
    async fn test_payment_listing_is_enriched_and_filtered() {
        let store = seeded().await;
        let today = date(2024, 1, 16);

        let all = BillingService::list_payments(&store, &PaymentFilter::default(), today)
            .await
            .unwrap();
        assert_eq!(all.stats.total, 2);
        assert_eq!(all.stats.amount_paid, 125.0);
        assert_eq!(all.stats.amount_pending, 120.0);
        assert_eq!(all.payments[0].client_name.as_deref(), Some("Jean Dupont"));

        let pending = PaymentFilter {
            status: Some(PaymentStatus::Pending),
            ..Default::default()
        };
        let listing = BillingService::list_payments(&store, &pending, today).await.unwrap();
        assert_eq!(listing.payments.len(), 1);
        assert_eq!(listing.payments[0].vehicle_name.as_deref(), Some("Renault Clio"));

        let by_vehicle = PaymentFilter {
            search: Some("yaris".to_string()),
            method: Some(PaymentMethod::Card),
            ..Default::default()
        };
        let listing = BillingService::list_payments(&store, &by_vehicle, today).await.unwrap();
        assert_eq!(listing.payments.len(), 1);
        assert_eq!(listing.payments[0].payment.reservation_id, 1);
    }

    #[actix_rt::test]
    async fn test_create_and_settle_payment() {
        let store = seeded().await;
        let input = PaymentInput {
            reservation_id: 2,
            amount: None,
            method: PaymentMethod::Cash,
            status: PaymentStatus::Pending,
        };
        let payment = BillingService::create_payment(&store, input, date(2024, 1, 22))
            .await
            .unwrap();
        assert_eq!(payment.id, 3);
        assert_eq!(payment.amount, 120.0);

        let settled = BillingService::update_payment_status(&store, 3, PaymentStatus::Paid)
            .await
            .unwrap();
        assert_eq!(settled.status, PaymentStatus::Paid);

        let orphan = PaymentInput {
            reservation_id: 77,
            amount: Some(10.0),
            method: PaymentMethod::Card,
            status: PaymentStatus::Paid,
        };
        let result = BillingService::create_payment(&store, orphan, date(2024, 1, 22)).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[actix_rt::test]
    async fn test_client_invoices() {
        let store = seeded().await;
        let invoices = BillingService::invoices_for_client(&store, 2, &InvoiceFilter::default())
            .await
            .unwrap();
        assert_eq!(invoices.len(), 1);
        assert_eq!(invoices[0].number, "FAC-0002");
        assert_eq!(invoices[0].status, PaymentStatus::Pending);
        assert_eq!(invoices[0].amount, 120.0);

        let other_year = InvoiceFilter {
            year: Some(2023),
            ..Default::default()
        };
        let none = BillingService::invoices_for_client(&store, 2, &other_year)
            .await
            .unwrap();
        assert!(none.is_empty());

        let by_number = InvoiceFilter {
            search: Some("fac-0001".to_string()),
            ..Default::default()
        };
        let found = BillingService::invoices_for_client(&store, 1, &by_number)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].status, PaymentStatus::Paid);
    }
}
