//! Linear multi-step form controller.
//!
//! A [`Wizard`] owns only the position within an ordered list of steps and
//! whether it is still open. Field state, the per-step "can proceed" predicate
//! and the final submission live in the form behind [`StepHandler`].

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Step {
    pub id: String,
    pub title: String,
    pub description: String,
}

impl Step {
    pub fn new(id: &str, title: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardConfig {
    pub title: String,
    pub description: String,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStatus {
    Active,
    Submitting,
    Submitted,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    Done,
    Current,
    Upcoming,
}

/// Outcome of a navigation action. Only `Moved` and `Cancelled` change state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Navigation {
    Moved { from: usize, to: usize },
    Blocked { step: String },
    AtBoundary,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("a wizard needs at least one step")]
    NoSteps,

    #[error("a submission is in progress")]
    Busy,

    #[error("the wizard is already {0:?}")]
    Closed(WizardStatus),

    #[error("submission is only possible from the last step")]
    NotOnLastStep,

    #[error("step '{0}' is incomplete")]
    Incomplete(String),
}

/// Failure of [`Wizard::submit`]: either the wizard refused, or the form did.
#[derive(Debug)]
pub enum SubmitError<E> {
    Wizard(WizardError),
    Handler(E),
}

impl<E> From<WizardError> for SubmitError<E> {
    fn from(err: WizardError) -> Self {
        SubmitError::Wizard(err)
    }
}

/// The form a wizard drives.
#[allow(async_fn_in_trait)]
pub trait StepHandler {
    type Context: ?Sized;
    type Output;
    type Error;

    fn can_proceed(&self, step_id: &str) -> bool;

    async fn submit(&self, ctx: &Self::Context) -> Result<Self::Output, Self::Error>;

    fn on_cancel(&mut self) {}
}

pub struct Wizard<H> {
    config: WizardConfig,
    handler: H,
    current: usize,
    status: WizardStatus,
}

impl<H: StepHandler> Wizard<H> {
    pub fn new(config: WizardConfig, handler: H) -> Result<Self, WizardError> {
        if config.steps.is_empty() {
            return Err(WizardError::NoSteps);
        }
        Ok(Self {
            config,
            handler,
            current: 0,
            status: WizardStatus::Active,
        })
    }

    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> Result<&mut H, WizardError> {
        self.ensure_active()?;
        Ok(&mut self.handler)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_step(&self) -> &Step {
        &self.config.steps[self.current]
    }

    pub fn total_steps(&self) -> usize {
        self.config.steps.len()
    }

    pub fn step_state(&self, index: usize) -> StepState {
        match index.cmp(&self.current) {
            std::cmp::Ordering::Less => StepState::Done,
            std::cmp::Ordering::Equal => StepState::Current,
            std::cmp::Ordering::Greater => StepState::Upcoming,
        }
    }

    pub fn status(&self) -> WizardStatus {
        self.status
    }

    pub fn is_submitting(&self) -> bool {
        self.status == WizardStatus::Submitting
    }

    pub fn is_first_step(&self) -> bool {
        self.current == 0
    }

    pub fn is_last_step(&self) -> bool {
        self.current + 1 == self.config.steps.len()
    }

    pub fn can_proceed(&self) -> bool {
        self.handler.can_proceed(&self.current_step().id)
    }

    /// Completion percentage counting the current step as reached.
    pub fn progress_percent(&self) -> u8 {
        let total = self.config.steps.len() as f64;
        (((self.current + 1) as f64 / total) * 100.0).round() as u8
    }

    fn ensure_active(&self) -> Result<(), WizardError> {
        match self.status {
            WizardStatus::Active => Ok(()),
            WizardStatus::Submitting => Err(WizardError::Busy),
            closed => Err(WizardError::Closed(closed)),
        }
    }

    pub fn next(&mut self) -> Result<Navigation, WizardError> {
        self.ensure_active()?;
        if self.is_last_step() {
            return Ok(Navigation::AtBoundary);
        }
        if !self.can_proceed() {
            return Ok(Navigation::Blocked {
                step: self.current_step().id.clone(),
            });
        }
        let from = self.current;
        self.current += 1;
        Ok(Navigation::Moved {
            from,
            to: self.current,
        })
    }

    pub fn previous(&mut self) -> Result<Navigation, WizardError> {
        self.ensure_active()?;
        if self.is_first_step() {
            return Ok(Navigation::AtBoundary);
        }
        let from = self.current;
        self.current -= 1;
        Ok(Navigation::Moved {
            from,
            to: self.current,
        })
    }

    pub fn cancel(&mut self) -> Result<Navigation, WizardError> {
        self.ensure_active()?;
        self.handler.on_cancel();
        self.status = WizardStatus::Cancelled;
        Ok(Navigation::Cancelled)
    }

    /// The single "back" button: cancels on the first step, steps back otherwise.
    pub fn back(&mut self) -> Result<Navigation, WizardError> {
        if self.is_first_step() {
            self.cancel()
        } else {
            self.previous()
        }
    }

    /// Runs the form's submission from the last step.
    ///
    /// Every step's predicate is checked again, since fields of earlier steps
    /// may have been edited after the wizard moved past them. A handler
    /// failure, or dropping the returned future, leaves the wizard open on the
    /// last step.
    pub async fn submit(&mut self, ctx: &H::Context) -> Result<H::Output, SubmitError<H::Error>> {
        self.ensure_active()?;
        if !self.is_last_step() {
            return Err(WizardError::NotOnLastStep.into());
        }
        if let Some(step) = self
            .config
            .steps
            .iter()
            .find(|step| !self.handler.can_proceed(&step.id))
        {
            return Err(WizardError::Incomplete(step.id.clone()).into());
        }

        let Wizard {
            handler, status, ..
        } = self;
        let mut guard = SubmittingGuard::new(status);
        let result = handler.submit(ctx).await;
        if result.is_ok() {
            guard.finish(WizardStatus::Submitted);
        }
        result.map_err(SubmitError::Handler)
    }
}

/// Marks a wizard as submitting and reopens it unless finished otherwise.
struct SubmittingGuard<'a> {
    status: &'a mut WizardStatus,
}

impl<'a> SubmittingGuard<'a> {
    fn new(status: &'a mut WizardStatus) -> Self {
        *status = WizardStatus::Submitting;
        Self { status }
    }

    fn finish(&mut self, status: WizardStatus) {
        *self.status = status;
    }
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        if *self.status == WizardStatus::Submitting {
            *self.status = WizardStatus::Active;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    struct Checklist {
        ready: Vec<&'static str>,
        cancelled: bool,
        fail_submit: bool,
        stall_submit: bool,
    }

    impl StepHandler for Checklist {
        type Context = Cell<u32>;
        type Output = u32;
        type Error = String;

        fn can_proceed(&self, step_id: &str) -> bool {
            self.ready.iter().any(|ready| *ready == step_id)
        }

        async fn submit(&self, ctx: &Cell<u32>) -> Result<u32, String> {
            if self.fail_submit {
                return Err("rejected".to_string());
            }
            if self.stall_submit {
                std::future::pending::<()>().await;
            }
            ctx.set(ctx.get() + 1);
            Ok(ctx.get())
        }

        fn on_cancel(&mut self) {
            self.cancelled = true;
        }
    }

    fn config() -> WizardConfig {
        WizardConfig {
            title: "New thing".to_string(),
            description: "Three steps".to_string(),
            steps: vec![
                Step::new("basic", "Basic", "First"),
                Step::new("details", "Details", "Second"),
                Step::new("review", "Review", "Last"),
            ],
        }
    }

    fn open_wizard() -> Wizard<Checklist> {
        let handler = Checklist {
            ready: vec!["basic", "details", "review"],
            ..Default::default()
        };
        Wizard::new(config(), handler).unwrap()
    }

    #[test]
    fn test_empty_step_list_is_rejected() {
        let empty = WizardConfig {
            steps: Vec::new(),
            ..config()
        };
        assert_eq!(
            Wizard::new(empty, Checklist::default()).err(),
            Some(WizardError::NoSteps)
        );
    }

    #[test]
    fn test_next_walks_to_last_step_then_stops() {
        let mut wizard = open_wizard();
        assert_eq!(wizard.next().unwrap(), Navigation::Moved { from: 0, to: 1 });
        assert_eq!(wizard.next().unwrap(), Navigation::Moved { from: 1, to: 2 });
        assert!(wizard.is_last_step());

        assert_eq!(wizard.next().unwrap(), Navigation::AtBoundary);
        assert_eq!(wizard.current_index(), 2);
    }

    #[test]
    fn test_next_is_blocked_by_predicate() {
        let handler = Checklist {
            ready: vec!["details"],
            ..Default::default()
        };
        let mut wizard = Wizard::new(config(), handler).unwrap();

        assert_eq!(
            wizard.next().unwrap(),
            Navigation::Blocked {
                step: "basic".to_string()
            }
        );
        assert_eq!(wizard.current_index(), 0);
    }

    #[test]
    fn test_previous_on_first_step_is_noop() {
        let mut wizard = open_wizard();
        assert_eq!(wizard.previous().unwrap(), Navigation::AtBoundary);
        assert_eq!(wizard.status(), WizardStatus::Active);
        assert!(!wizard.handler().cancelled);
    }

    #[test]
    fn test_back_on_first_step_cancels() {
        let mut wizard = open_wizard();
        assert_eq!(wizard.back().unwrap(), Navigation::Cancelled);
        assert!(wizard.handler().cancelled);
        assert_eq!(wizard.status(), WizardStatus::Cancelled);
        assert_eq!(
            wizard.next(),
            Err(WizardError::Closed(WizardStatus::Cancelled))
        );
    }

    #[test]
    fn test_back_after_first_step_decrements() {
        let mut wizard = open_wizard();
        wizard.next().unwrap();
        assert_eq!(wizard.back().unwrap(), Navigation::Moved { from: 1, to: 0 });
        assert!(!wizard.handler().cancelled);
    }

    #[test]
    fn test_progress_percent() {
        let mut wizard = open_wizard();
        assert_eq!(wizard.progress_percent(), 33);
        wizard.next().unwrap();
        assert_eq!(wizard.progress_percent(), 67);
        wizard.next().unwrap();
        assert_eq!(wizard.progress_percent(), 100);
    }

    #[test]
    fn test_step_states_follow_position() {
        let mut wizard = open_wizard();
        wizard.next().unwrap();
        let states: Vec<StepState> = (0..wizard.total_steps())
            .map(|i| wizard.step_state(i))
            .collect();
        assert_eq!(
            states,
            vec![StepState::Done, StepState::Current, StepState::Upcoming]
        );
    }

    #[test]
    fn test_submit_requires_last_step() {
        let mut wizard = open_wizard();
        let counter = Cell::new(0);
        let result = tokio_test::block_on(wizard.submit(&counter));
        assert!(matches!(
            result,
            Err(SubmitError::Wizard(WizardError::NotOnLastStep))
        ));
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn test_submit_closes_wizard() {
        let mut wizard = open_wizard();
        wizard.next().unwrap();
        wizard.next().unwrap();

        let counter = Cell::new(0);
        let output = tokio_test::block_on(wizard.submit(&counter)).unwrap();
        assert_eq!(output, 1);
        assert_eq!(wizard.status(), WizardStatus::Submitted);
        assert_eq!(
            wizard.previous(),
            Err(WizardError::Closed(WizardStatus::Submitted))
        );
    }

    #[test]
    fn test_failed_submit_keeps_wizard_open() {
        let handler = Checklist {
            ready: vec!["basic", "details", "review"],
            fail_submit: true,
            ..Default::default()
        };
        let mut wizard = Wizard::new(config(), handler).unwrap();
        wizard.next().unwrap();
        wizard.next().unwrap();

        let counter = Cell::new(0);
        let result = tokio_test::block_on(wizard.submit(&counter));
        assert!(matches!(result, Err(SubmitError::Handler(ref msg)) if msg == "rejected"));
        assert_eq!(wizard.status(), WizardStatus::Active);
        assert_eq!(wizard.current_index(), 2);
    }

    #[test]
    fn test_submit_checks_last_step_predicate() {
        let handler = Checklist {
            ready: vec!["basic", "details"],
            ..Default::default()
        };
        let mut wizard = Wizard::new(config(), handler).unwrap();
        wizard.next().unwrap();
        wizard.next().unwrap();

        let result = tokio_test::block_on(wizard.submit(&Cell::new(0)));
        assert!(matches!(
            result,
            Err(SubmitError::Wizard(WizardError::Incomplete(ref step))) if step == "review"
        ));
    }

    #[test]
    fn test_submit_rechecks_earlier_steps() {
        let mut wizard = open_wizard();
        wizard.next().unwrap();
        wizard.next().unwrap();
        wizard.handler_mut().unwrap().ready = vec!["basic", "review"];

        let counter = Cell::new(0);
        let result = tokio_test::block_on(wizard.submit(&counter));
        assert!(matches!(
            result,
            Err(SubmitError::Wizard(WizardError::Incomplete(ref step))) if step == "details"
        ));
        assert_eq!(counter.get(), 0);
        assert_eq!(wizard.status(), WizardStatus::Active);
    }

    #[test]
    fn test_dropped_submit_reopens_wizard() {
        let handler = Checklist {
            ready: vec!["basic", "details", "review"],
            stall_submit: true,
            ..Default::default()
        };
        let mut wizard = Wizard::new(config(), handler).unwrap();
        wizard.next().unwrap();
        wizard.next().unwrap();

        let counter = Cell::new(0);
        let mut pending = tokio_test::task::spawn(wizard.submit(&counter));
        tokio_test::assert_pending!(pending.poll());
        drop(pending);

        assert_eq!(wizard.status(), WizardStatus::Active);
        assert!(!wizard.is_submitting());
        assert_eq!(wizard.current_index(), 2);
    }
}
