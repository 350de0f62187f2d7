use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::db::store::Store;
use crate::error::{ApiError, ApiResult};
use crate::models::client::{Client, ClientProfileUpdate, LoyaltyTier};
use crate::models::reservation::{Reservation, ReservationStatus};
use crate::services::filters::matches_search;
use crate::services::reservation_service::{ClientReservationFilter, ReservationService, ReservationView};

const DASHBOARD_RESERVATIONS: usize = 3;

#[derive(Debug, Serialize)]
pub struct ClientView {
    #[serde(flatten)]
    pub client: Client,
    pub loyalty_tier: LoyaltyTier,
}

impl From<Client> for ClientView {
    fn from(client: Client) -> Self {
        Self {
            loyalty_tier: client.loyalty_tier(),
            client,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ClientFilter {
    pub search: Option<String>,
    pub tier: Option<LoyaltyTier>,
}

impl ClientFilter {
    pub fn matches(&self, client: &Client) -> bool {
        self.tier.map_or(true, |tier| client.loyalty_tier() == tier)
            && matches_search(
                self.search.as_deref(),
                &[
                    client.last_name.as_str(),
                    client.first_name.as_str(),
                    client.email.as_str(),
                ],
            )
    }
}

#[derive(Debug, Default, PartialEq, Serialize)]
pub struct ClientStats {
    pub total: usize,
    pub vip: usize,
    pub gold: usize,
    /// Registered during the current calendar month.
    pub new_this_month: usize,
}

#[derive(Debug, Serialize)]
pub struct ClientListing {
    pub clients: Vec<ClientView>,
    pub stats: ClientStats,
}

#[derive(Debug, Serialize)]
pub struct ClientDashboard {
    pub client: ClientView,
    pub total_reservations: usize,
    pub active_reservations: usize,
    pub completed_reservations: usize,
    pub loyalty_points: u32,
    pub recent_reservations: Vec<ReservationView>,
}

pub struct ClientService;

impl ClientService {
    pub async fn profile(store: &Store, client_id: u32) -> ApiResult<Client> {
        store
            .clients
            .get(client_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Client"))
    }

    pub async fn update_profile(
        store: &Store,
        client_id: u32,
        update: ClientProfileUpdate,
    ) -> ApiResult<Client> {
        let mut client = Self::profile(store, client_id).await?;
        update.apply(&mut client);
        if client.first_name.trim().is_empty() || client.last_name.trim().is_empty() {
            return Err(ApiError::validation("Name cannot be empty"));
        }
        store
            .clients
            .replace(client_id, client)
            .await?
            .ok_or_else(|| ApiError::not_found("Client"))
    }

    pub async fn dashboard(store: &Store, client_id: u32) -> ApiResult<ClientDashboard> {
        let client = Self::profile(store, client_id).await?;
        let reservations = store
            .reservations
            .find(&|r: &Reservation| r.client_id == client_id)
            .await?;
        let recent = ReservationService::list_for_client(
            store,
            client_id,
            &ClientReservationFilter::default(),
        )
        .await?;

        Ok(ClientDashboard {
            total_reservations: reservations.len(),
            active_reservations: reservations.iter().filter(|r| r.status.is_active()).count(),
            completed_reservations: reservations
                .iter()
                .filter(|r| r.status == ReservationStatus::Completed)
                .count(),
            loyalty_points: client.loyalty_points,
            client: ClientView::from(client),
            recent_reservations: recent.into_iter().take(DASHBOARD_RESERVATIONS).collect(),
        })
    }

    pub async fn list(
        store: &Store,
        filter: &ClientFilter,
        today: NaiveDate,
    ) -> ApiResult<ClientListing> {
        let all = store.clients.all().await?;
        let stats = ClientStats {
            total: all.len(),
            vip: all
                .iter()
                .filter(|c| c.loyalty_tier() == LoyaltyTier::Vip)
                .count(),
            gold: all
                .iter()
                .filter(|c| c.loyalty_tier() == LoyaltyTier::Gold)
                .count(),
            new_this_month: all
                .iter()
                .filter(|c| {
                    c.registered_on.year() == today.year()
                        && c.registered_on.month() == today.month()
                })
                .count(),
        };

        Ok(ClientListing {
            clients: all
                .into_iter()
                .filter(|c| filter.matches(c))
                .map(ClientView::from)
                .collect(),
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed::seed_demo_data;

    async fn seeded() -> Store {
        let store = Store::in_memory();
        seed_demo_data(&store, 4).await.unwrap();
        store
    }

    #[actix_rt::test]
    async fn test_tier_filter() {
        let store = seeded().await;
        let today = NaiveDate::from_ymd_opt(2023, 3, 20).unwrap();

        let silver = ClientFilter {
            tier: Some(LoyaltyTier::Silver),
            ..Default::default()
        };
        let listing = ClientService::list(&store, &silver, today).await.unwrap();
        assert_eq!(listing.clients.len(), 1);
        assert_eq!(listing.clients[0].client.last_name, "Dupont");
        assert_eq!(listing.stats.total, 2);
        assert_eq!(listing.stats.new_this_month, 1);

        let by_email = ClientFilter {
            search: Some("MARIE.martin".to_string()),
            ..Default::default()
        };
        let listing = ClientService::list(&store, &by_email, today).await.unwrap();
        assert_eq!(listing.clients[0].loyalty_tier, LoyaltyTier::Standard);
    }

    #[actix_rt::test]
    async fn test_profile_update() {
        let store = seeded().await;
        let update = ClientProfileUpdate {
            phone: Some("0600000000".to_string()),
            ..Default::default()
        };
        let client = ClientService::update_profile(&store, 1, update).await.unwrap();
        assert_eq!(client.phone, "0600000000");
        assert_eq!(client.email, "jean.dupont@email.com");

        let blank = ClientProfileUpdate {
            first_name: Some("  ".to_string()),
            ..Default::default()
        };
        let result = ClientService::update_profile(&store, 1, blank).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[actix_rt::test]
    async fn test_dashboard_counts() {
        let store = seeded().await;
        let dashboard = ClientService::dashboard(&store, 2).await.unwrap();
        assert_eq!(dashboard.total_reservations, 1);
        assert_eq!(dashboard.active_reservations, 1);
        assert_eq!(dashboard.completed_reservations, 0);
        assert_eq!(dashboard.loyalty_points, 75);
        assert_eq!(dashboard.recent_reservations.len(), 1);
    }
}
