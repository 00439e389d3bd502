//! Run-control coordinator
//!
//! Owns the authoritative run state. The console never moves between Idle
//! and Running on its own: every transition comes from a runner status push.
//! Local flags only track which controls are busy while a command is out.

use ferry_core::domain::config::JobConfiguration;
use ferry_core::domain::run::RunState;
use ferry_core::dto::event::StatusUpdate;
use std::fmt;
use thiserror::Error;

/// External system a connection test targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Connection {
    Magento,
    Medusa,
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Connection::Magento => f.write_str("Magento"),
            Connection::Medusa => f.write_str("Medusa"),
        }
    }
}

/// Missing prerequisite configuration, detected before any network call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please configure Magento Connection first.")]
    MagentoNotConfigured,
    #[error("Please configure Medusa Connection first.")]
    MedusaNotConfigured,
}

/// Checks that both connections name an endpoint and a principal
pub fn validate_ready(config: &JobConfiguration) -> Result<(), ValidationError> {
    if !config.magento.is_ready() {
        return Err(ValidationError::MagentoNotConfigured);
    }
    if !config.medusa.is_ready() {
        return Err(ValidationError::MedusaNotConfigured);
    }
    Ok(())
}

/// A run-control command the current state does not allow
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlError {
    #[error(transparent)]
    NotReady(#[from] ValidationError),
    #[error("A start request is already in flight")]
    StartInFlight,
    #[error("Migration is already running")]
    AlreadyRunning,
    #[error("No migration is running")]
    NotRunning,
    #[error("Migration is already paused")]
    AlreadyPaused,
    #[error("Migration is not paused")]
    NotPaused,
    #[error("{0} connection test is already in flight")]
    TestInFlight(Connection),
}

/// Rendered state of the run controls
///
/// A pure function of the coordinator's state and flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlsView {
    pub state: RunState,
    pub paused: bool,
    pub start_visible: bool,
    pub start_enabled: bool,
    pub stop_visible: bool,
    pub pause_visible: bool,
    pub resume_visible: bool,
    pub magento_test_busy: bool,
    pub medusa_test_busy: bool,
}

#[derive(Debug, Default)]
pub struct RunControl {
    state: RunState,
    paused: bool,
    start_in_flight: bool,
    start_accepted: bool,
    magento_test: bool,
    medusa_test: bool,
}

impl RunControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn start_in_flight(&self) -> bool {
        self.start_in_flight
    }

    // =============================================================================
    // Start
    // =============================================================================

    /// Arms a start attempt
    ///
    /// On success the Start control is disabled and the caller must issue
    /// exactly one start command. On error nothing changed.
    pub fn begin_start(&mut self, config: &JobConfiguration) -> Result<(), ControlError> {
        if self.state.is_running() {
            return Err(ControlError::AlreadyRunning);
        }
        if self.start_in_flight {
            return Err(ControlError::StartInFlight);
        }
        validate_ready(config)?;

        self.start_in_flight = true;
        Ok(())
    }

    /// Records the outcome of the start command
    ///
    /// An accepted start keeps the control disabled until the runner's
    /// next status push. A rejected or failed one re-enables it.
    pub fn settle_start(&mut self, accepted: bool) {
        if accepted {
            self.start_accepted = true;
        } else {
            self.start_in_flight = false;
        }
    }

    /// Running per the last push, or started by us and not yet reported
    fn live(&self) -> bool {
        self.state.is_running() || self.start_accepted
    }

    // =============================================================================
    // Stop / Pause / Resume
    // =============================================================================

    pub fn request_stop(&self) -> Result<(), ControlError> {
        if !self.live() {
            return Err(ControlError::NotRunning);
        }
        Ok(())
    }

    pub fn request_pause(&self) -> Result<(), ControlError> {
        if !self.live() {
            return Err(ControlError::NotRunning);
        }
        if self.paused {
            return Err(ControlError::AlreadyPaused);
        }
        Ok(())
    }

    pub fn request_resume(&self) -> Result<(), ControlError> {
        if !self.state.is_running() {
            return Err(ControlError::NotRunning);
        }
        if !self.paused {
            return Err(ControlError::NotPaused);
        }
        Ok(())
    }

    // =============================================================================
    // Status pushes
    // =============================================================================

    /// Applies an authoritative status push, returning whether state changed
    ///
    /// Always clears the pending start. The push's message and error
    /// text are the caller's to log.
    pub fn apply_status(&mut self, update: &StatusUpdate) -> bool {
        let state = RunState::from_running(update.running);
        let paused = update.running && update.paused;
        let changed = state != self.state || paused != self.paused;

        if changed {
            tracing::info!("Run state {} -> {} (paused: {})", self.state, state, paused);
        }

        self.state = state;
        self.paused = paused;
        self.start_in_flight = false;
        self.start_accepted = false;
        changed
    }

    // =============================================================================
    // Connection tests
    // =============================================================================

    pub fn begin_test(&mut self, connection: Connection) -> Result<(), ControlError> {
        let busy = self.test_flag(connection);
        if *busy {
            return Err(ControlError::TestInFlight(connection));
        }
        *busy = true;
        Ok(())
    }

    pub fn finish_test(&mut self, connection: Connection) {
        *self.test_flag(connection) = false;
    }

    fn test_flag(&mut self, connection: Connection) -> &mut bool {
        match connection {
            Connection::Magento => &mut self.magento_test,
            Connection::Medusa => &mut self.medusa_test,
        }
    }

    pub fn controls(&self) -> ControlsView {
        let running = self.state.is_running();
        let live = self.live();
        ControlsView {
            state: self.state,
            paused: self.paused,
            start_visible: !running,
            start_enabled: !running && !self.start_in_flight,
            stop_visible: live,
            pause_visible: live && !self.paused,
            resume_visible: running && self.paused,
            magento_test_busy: self.magento_test,
            medusa_test_busy: self.medusa_test,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferry_core::domain::config::{MAX_WORKERS, MagentoConnection, MedusaConnection};

    fn config() -> JobConfiguration {
        JobConfiguration {
            magento: MagentoConnection {
                base_url: "https://magento.test".to_string(),
                username: "admin".to_string(),
                password: "pw".to_string(),
                verify_ssl: true,
            },
            medusa: MedusaConnection {
                base_url: "http://localhost:9000".to_string(),
                email: "admin@example.com".to_string(),
                password: "pw".to_string(),
            },
            entities: Vec::new(),
            limit: "0".to_string(),
            product_ids: String::new(),
            category_ids: String::new(),
            customer_ids: String::new(),
            order_ids: String::new(),
            dry_run: false,
            finalize_orders: true,
            migrate_invoices: false,
            migrate_payments: false,
            rollback_on_finalize_fail: false,
            delta_migration: false,
            delta_from_date: None,
            max_workers: MAX_WORKERS,
        }
    }

    fn status(running: bool) -> StatusUpdate {
        StatusUpdate {
            running,
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_ready() {
        assert_eq!(validate_ready(&config()), Ok(()));

        let mut missing_user = config();
        missing_user.magento.username.clear();
        assert_eq!(
            validate_ready(&missing_user),
            Err(ValidationError::MagentoNotConfigured)
        );

        let mut missing_email = config();
        missing_email.medusa.email = "   ".to_string();
        assert_eq!(
            validate_ready(&missing_email),
            Err(ValidationError::MedusaNotConfigured)
        );
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::MagentoNotConfigured.to_string(),
            "Please configure Magento Connection first."
        );
        assert_eq!(
            ControlError::from(ValidationError::MedusaNotConfigured).to_string(),
            "Please configure Medusa Connection first."
        );
    }

    #[test]
    fn test_initial_controls() {
        let view = RunControl::new().controls();

        assert_eq!(view.state, RunState::Idle);
        assert!(view.start_visible && view.start_enabled);
        assert!(!view.stop_visible && !view.pause_visible && !view.resume_visible);
    }

    #[test]
    fn test_begin_start_failed_validation_changes_nothing() {
        let mut control = RunControl::new();
        let mut invalid = config();
        invalid.magento.username.clear();

        let result = control.begin_start(&invalid);

        assert_eq!(
            result,
            Err(ControlError::NotReady(ValidationError::MagentoNotConfigured))
        );
        assert!(control.controls().start_enabled);
    }

    #[test]
    fn test_start_in_flight_blocks_second_start() {
        let mut control = RunControl::new();
        control.begin_start(&config()).unwrap();

        assert!(!control.controls().start_enabled);
        assert_eq!(
            control.begin_start(&config()),
            Err(ControlError::StartInFlight)
        );
    }

    #[test]
    fn test_accepted_start_waits_for_push() {
        let mut control = RunControl::new();
        control.begin_start(&config()).unwrap();
        control.settle_start(true);

        assert_eq!(control.state(), RunState::Idle);
        assert!(!control.controls().start_enabled);

        assert!(control.apply_status(&status(true)));
        let view = control.controls();
        assert_eq!(view.state, RunState::Running);
        assert!(!view.start_visible);
        assert!(view.stop_visible && view.pause_visible);
    }

    #[test]
    fn test_accepted_start_allows_stop_before_push() {
        let mut control = RunControl::new();
        control.begin_start(&config()).unwrap();
        assert_eq!(control.request_stop(), Err(ControlError::NotRunning));

        control.settle_start(true);
        assert_eq!(control.state(), RunState::Idle);
        assert_eq!(control.request_stop(), Ok(()));
        assert_eq!(control.request_pause(), Ok(()));
        assert_eq!(control.request_resume(), Err(ControlError::NotRunning));
        let view = control.controls();
        assert!(view.stop_visible && view.pause_visible);
        assert!(!view.start_enabled);

        control.apply_status(&status(false));
        assert_eq!(control.request_stop(), Err(ControlError::NotRunning));
        assert!(!control.controls().stop_visible);
    }

    #[test]
    fn test_rejected_start_reenables_control() {
        let mut control = RunControl::new();
        control.begin_start(&config()).unwrap();
        control.settle_start(false);

        assert_eq!(control.state(), RunState::Idle);
        assert!(control.controls().start_enabled);
    }

    #[test]
    fn test_status_push_last_write_wins() {
        let mut control = RunControl::new();

        control.apply_status(&status(true));
        control.apply_status(&status(false));
        assert_eq!(control.state(), RunState::Idle);

        control.apply_status(&status(false));
        control.apply_status(&status(true));
        assert_eq!(control.state(), RunState::Running);
    }

    #[test]
    fn test_status_push_is_idempotent() {
        let mut control = RunControl::new();

        assert!(control.apply_status(&status(true)));
        let before = control.controls();
        assert!(!control.apply_status(&status(true)));
        assert_eq!(control.controls(), before);
    }

    #[test]
    fn test_status_push_clears_start_in_flight() {
        let mut control = RunControl::new();
        control.begin_start(&config()).unwrap();
        control.settle_start(true);

        control.apply_status(&status(false));
        assert!(!control.start_in_flight());
        assert!(control.controls().start_enabled);
    }

    #[test]
    fn test_external_start_reaches_running() {
        let mut control = RunControl::new();

        control.apply_status(&status(true));
        assert_eq!(control.begin_start(&config()), Err(ControlError::AlreadyRunning));
    }

    #[test]
    fn test_paused_controls() {
        let mut control = RunControl::new();
        control.apply_status(&StatusUpdate {
            running: true,
            paused: true,
            ..Default::default()
        });

        let view = control.controls();
        assert!(view.paused);
        assert!(!view.pause_visible && view.resume_visible && view.stop_visible);
        assert_eq!(control.request_pause(), Err(ControlError::AlreadyPaused));
        assert_eq!(control.request_resume(), Ok(()));
    }

    #[test]
    fn test_paused_ignored_when_idle() {
        let mut control = RunControl::new();
        control.apply_status(&StatusUpdate {
            running: false,
            paused: true,
            ..Default::default()
        });

        assert!(!control.is_paused());
        assert!(!control.controls().resume_visible);
    }

    #[test]
    fn test_stop_pause_resume_require_running() {
        let control = RunControl::new();

        assert_eq!(control.request_stop(), Err(ControlError::NotRunning));
        assert_eq!(control.request_pause(), Err(ControlError::NotRunning));
        assert_eq!(control.request_resume(), Err(ControlError::NotRunning));
    }

    #[test]
    fn test_resume_requires_paused() {
        let mut control = RunControl::new();
        control.apply_status(&status(true));

        assert_eq!(control.request_stop(), Ok(()));
        assert_eq!(control.request_resume(), Err(ControlError::NotPaused));
    }

    #[test]
    fn test_connection_test_busy_flags() {
        let mut control = RunControl::new();

        control.begin_test(Connection::Magento).unwrap();
        assert!(control.controls().magento_test_busy);
        assert!(!control.controls().medusa_test_busy);
        assert_eq!(
            control.begin_test(Connection::Magento),
            Err(ControlError::TestInFlight(Connection::Magento))
        );

        control.finish_test(Connection::Magento);
        assert!(!control.controls().magento_test_busy);
    }
}
