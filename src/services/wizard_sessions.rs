use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use serde_json::Value;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::services::wizard::{StepState, Wizard, WizardError, WizardStatus};
use crate::services::wizard_forms::{AgencyForm, EmployeeForm, VehicleForm, WizardForm};

#[derive(Debug, Serialize)]
pub struct StepView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub state: StepState,
}

/// Everything a client needs to render one wizard screen.
#[derive(Debug, Serialize)]
pub struct WizardView {
    pub id: Uuid,
    pub kind: &'static str,
    pub title: String,
    pub description: String,
    pub status: WizardStatus,
    pub current_step: usize,
    pub step_number: usize,
    pub total_steps: usize,
    pub progress: u8,
    pub can_proceed: bool,
    pub is_first_step: bool,
    pub is_last_step: bool,
    pub steps: Vec<StepView>,
    pub form: Value,
}

impl WizardView {
    pub fn of<F: WizardForm>(id: Uuid, wizard: &Wizard<F>) -> Self {
        let config = wizard.config();
        Self {
            id,
            kind: F::KIND,
            title: config.title.clone(),
            description: config.description.clone(),
            status: wizard.status(),
            current_step: wizard.current_index(),
            step_number: wizard.current_index() + 1,
            total_steps: wizard.total_steps(),
            progress: wizard.progress_percent(),
            can_proceed: wizard.can_proceed(),
            is_first_step: wizard.is_first_step(),
            is_last_step: wizard.is_last_step(),
            steps: config
                .steps
                .iter()
                .enumerate()
                .map(|(index, step)| StepView {
                    id: step.id.clone(),
                    title: step.title.clone(),
                    description: step.description.clone(),
                    state: wizard.step_state(index),
                })
                .collect(),
            form: wizard.handler().to_view(),
        }
    }
}

/// Idle time after which an abandoned session is dropped.
pub const SESSION_TTL: Duration = Duration::from_secs(30 * 60);

type Session<F> = Arc<Mutex<Wizard<F>>>;

struct Entry<F> {
    wizard: Session<F>,
    touched: Instant,
}

/// Open wizards of one kind, keyed by session id.
///
/// Each session has its own lock; a request that finds it held while a
/// submission is running gets [`WizardError::Busy`]. Sessions left idle for
/// longer than the ttl are swept when a new one starts.
pub struct WizardSessions<F> {
    sessions: Mutex<HashMap<Uuid, Entry<F>>>,
    ttl: Duration,
}

impl<F: WizardForm> Default for WizardSessions<F> {
    fn default() -> Self {
        Self::with_ttl(SESSION_TTL)
    }
}

impl<F: WizardForm> WizardSessions<F> {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub async fn start(&self) -> ApiResult<WizardView> {
        let wizard = Wizard::new(F::config(), F::default())?;
        let id = Uuid::new_v4();
        let view = WizardView::of(id, &wizard);

        let mut sessions = self.sessions.lock().await;
        self.sweep(&mut sessions);
        sessions.insert(
            id,
            Entry {
                wizard: Arc::new(Mutex::new(wizard)),
                touched: Instant::now(),
            },
        );
        log::debug!("Started {} wizard {}", F::KIND, id);
        Ok(view)
    }

    /// Drops idle sessions. A session whose lock is held is in use and stays.
    fn sweep(&self, sessions: &mut HashMap<Uuid, Entry<F>>) {
        let before = sessions.len();
        sessions.retain(|_, entry| {
            entry.touched.elapsed() < self.ttl || entry.wizard.try_lock().is_err()
        });
        let expired = before - sessions.len();
        if expired > 0 {
            log::info!("Expired {} idle {} wizard(s)", expired, F::KIND);
        }
    }

    async fn session(&self, id: Uuid) -> ApiResult<Session<F>> {
        let mut sessions = self.sessions.lock().await;
        let entry = sessions
            .get_mut(&id)
            .ok_or_else(|| ApiError::not_found("Wizard session"))?;
        entry.touched = Instant::now();
        Ok(entry.wizard.clone())
    }

    /// Exclusive access to a session, refused while it is submitting.
    pub async fn lock(&self, id: Uuid) -> ApiResult<OwnedWizard<F>> {
        let session = self.session(id).await?;
        let guard = session.try_lock_owned().map_err(|_| WizardError::Busy)?;
        Ok(OwnedWizard { guard })
    }

    /// Drops a closed session.
    pub async fn remove(&self, id: Uuid) {
        if self.sessions.lock().await.remove(&id).is_some() {
            log::debug!("Closed {} wizard {}", F::KIND, id);
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// A locked session.
pub struct OwnedWizard<F> {
    guard: OwnedMutexGuard<Wizard<F>>,
}

impl<F> std::ops::Deref for OwnedWizard<F> {
    type Target = Wizard<F>;

    fn deref(&self) -> &Wizard<F> {
        &self.guard
    }
}

impl<F> std::ops::DerefMut for OwnedWizard<F> {
    fn deref_mut(&mut self) -> &mut Wizard<F> {
        &mut self.guard
    }
}

/// One session table per form kind.
pub struct WizardRegistry {
    pub vehicles: WizardSessions<VehicleForm>,
    pub employees: WizardSessions<EmployeeForm>,
    pub agencies: WizardSessions<AgencyForm>,
}

impl WizardRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            vehicles: WizardSessions::with_ttl(ttl),
            employees: WizardSessions::with_ttl(ttl),
            agencies: WizardSessions::with_ttl(ttl),
        }
    }
}

/// Selects a form kind's session table from the registry.
pub trait RegisteredForm: WizardForm {
    fn sessions(registry: &WizardRegistry) -> &WizardSessions<Self>;
}

impl RegisteredForm for VehicleForm {
    fn sessions(registry: &WizardRegistry) -> &WizardSessions<Self> {
        &registry.vehicles
    }
}

impl RegisteredForm for EmployeeForm {
    fn sessions(registry: &WizardRegistry) -> &WizardSessions<Self> {
        &registry.employees
    }
}

impl RegisteredForm for AgencyForm {
    fn sessions(registry: &WizardRegistry) -> &WizardSessions<Self> {
        &registry.agencies
    }
}
