//! Console event loop
//!
//! A single task owns every piece of console state and applies events one at
//! a time, so handlers never race each other. Network commands run as
//! spawned tasks and report back on the outcome channel; the loop itself
//! never awaits a request.

use crate::backend::Backend;
use crate::event::{CommandOutcome, OperatorCommand, PushMessage};
use crate::form::ConsoleForm;
use crate::log_sink::LogSink;
use crate::picker::{Picker, PickerError};
use crate::render::Renderer;
use crate::run_control::{Connection, RunControl};
use ferry_core::domain::entity::EntityType;
use ferry_core::domain::log::Severity;
use ferry_core::dto::command::CommandResponse;
use ferry_core::dto::entity::FetchEntitiesRequest;
use ferry_core::dto::event::{PushEvent, StatusUpdate};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

const MISSING_BASE_URL: &str = "Please enter Magento Base URL first";

pub struct Console<R: Renderer> {
    backend: Arc<dyn Backend>,
    renderer: R,
    form: ConsoleForm,
    run: RunControl,
    log: LogSink,
    picker: Picker,
    outcome_tx: UnboundedSender<CommandOutcome>,
    outcome_rx: UnboundedReceiver<CommandOutcome>,
}

impl<R: Renderer> Console<R> {
    pub fn new(backend: Arc<dyn Backend>, form: ConsoleForm, renderer: R) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            backend,
            renderer,
            form,
            run: RunControl::new(),
            log: LogSink::new(),
            picker: Picker::new(),
            outcome_tx,
            outcome_rx,
        }
    }

    pub fn form(&self) -> &ConsoleForm {
        &self.form
    }

    pub fn run_control(&self) -> &RunControl {
        &self.run
    }

    pub fn log(&self) -> &LogSink {
        &self.log
    }

    pub fn picker(&self) -> &Picker {
        &self.picker
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Runs until the operator quits or the input channel closes
    pub async fn run(
        mut self,
        mut commands: UnboundedReceiver<OperatorCommand>,
        mut pushes: UnboundedReceiver<PushMessage>,
    ) {
        tracing::info!("Console started");
        self.renderer.controls_changed(&self.run.controls());

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(OperatorCommand::Quit) | None => break,
                    Some(command) => self.handle_command(command),
                },
                Some(message) = pushes.recv() => self.handle_push(message),
                Some(outcome) = self.outcome_rx.recv() => self.handle_outcome(outcome),
            }
        }

        tracing::info!("Console stopped");
    }

    // =============================================================================
    // Operator commands
    // =============================================================================

    pub fn handle_command(&mut self, command: OperatorCommand) {
        tracing::debug!("Operator command: {:?}", command);
        match command {
            OperatorCommand::Set { field, value } => self.set_field(&field, &value),
            OperatorCommand::Show => self.renderer.show_form(&self.form.fields()),
            OperatorCommand::TestConnection(connection) => self.test_connection(connection),
            OperatorCommand::Start => self.start(),
            OperatorCommand::Stop => self.stop(),
            OperatorCommand::Pause => self.pause(),
            OperatorCommand::Resume => self.resume(),
            OperatorCommand::OpenPicker(entity) => self.open_picker(entity),
            OperatorCommand::Filter(term) => {
                let result = self.picker.filter(&term);
                self.picker_result(result);
            }
            OperatorCommand::Toggle(id) => {
                let result = self.picker.toggle(&id).map(|_| ());
                self.picker_result(result);
            }
            OperatorCommand::SelectAll => {
                let result = self.picker.select_all();
                self.picker_result(result);
            }
            OperatorCommand::DeselectAll => {
                let result = self.picker.deselect_all();
                self.picker_result(result);
            }
            OperatorCommand::Confirm => self.confirm_picker(),
            OperatorCommand::Cancel => {
                if self.picker.cancel() {
                    self.renderer.picker_changed(&self.picker.view());
                }
            }
            OperatorCommand::ClearLog => {
                let discarded = self.log.clear();
                tracing::debug!("Cleared {} log entries", discarded);
                self.renderer.log_cleared();
            }
            OperatorCommand::Quit => {}
        }
    }

    fn set_field(&mut self, field: &str, value: &str) {
        match self.form.set(field, value) {
            Ok(()) => {
                let shown = self.form.field_value(field).unwrap_or_default();
                self.renderer.field_changed(field, &shown);
            }
            Err(e) => self.renderer.notice(&e.to_string()),
        }
    }

    fn test_connection(&mut self, connection: Connection) {
        if let Err(e) = self.run.begin_test(connection) {
            self.renderer.notice(&e.to_string());
            return;
        }
        self.renderer.controls_changed(&self.run.controls());

        let backend = Arc::clone(&self.backend);
        match connection {
            Connection::Magento => {
                let record = self.form.magento.clone();
                self.dispatch(async move {
                    CommandOutcome::ConnectionTested {
                        connection,
                        result: backend.test_magento(&record).await,
                    }
                });
            }
            Connection::Medusa => {
                let record = self.form.medusa.clone();
                self.dispatch(async move {
                    CommandOutcome::ConnectionTested {
                        connection,
                        result: backend.test_medusa(&record).await,
                    }
                });
            }
        }
    }

    fn start(&mut self) {
        let config = self.form.gather();
        if let Err(e) = self.run.begin_start(&config) {
            self.renderer.notice(&e.to_string());
            return;
        }
        self.renderer.controls_changed(&self.run.controls());

        tracing::info!("Requesting start for {:?}", config.entities);
        let backend = Arc::clone(&self.backend);
        self.dispatch(async move { CommandOutcome::Started(backend.start(&config).await) });
    }

    fn stop(&mut self) {
        if let Err(e) = self.run.request_stop() {
            self.renderer.notice(&e.to_string());
            return;
        }

        let backend = Arc::clone(&self.backend);
        self.dispatch(async move { CommandOutcome::Stopped(backend.stop().await) });
        self.system_log("Stop command sent...", Severity::Warning);
    }

    fn pause(&mut self) {
        if let Err(e) = self.run.request_pause() {
            self.renderer.notice(&e.to_string());
            return;
        }

        let backend = Arc::clone(&self.backend);
        self.dispatch(async move { CommandOutcome::Paused(backend.pause().await) });
        self.system_log("Pause command sent...", Severity::Warning);
    }

    fn resume(&mut self) {
        if let Err(e) = self.run.request_resume() {
            self.renderer.notice(&e.to_string());
            return;
        }

        let backend = Arc::clone(&self.backend);
        self.dispatch(async move { CommandOutcome::Resumed(backend.resume().await) });
        self.system_log("Resume command sent...", Severity::Info);
    }

    fn open_picker(&mut self, entity: EntityType) {
        if self.form.magento.base_url.trim().is_empty() {
            self.renderer.notice(MISSING_BASE_URL);
            return;
        }

        let session = self.picker.open(entity, self.form.ids(entity));
        self.renderer.picker_changed(&self.picker.view());

        let request = FetchEntitiesRequest {
            entity_type: entity,
            magento_config: self.form.magento.clone(),
        };
        let backend = Arc::clone(&self.backend);
        self.dispatch(async move {
            CommandOutcome::EntitiesFetched {
                session,
                result: backend.fetch_entities(&request).await,
            }
        });
    }

    fn picker_result(&mut self, result: Result<(), PickerError>) {
        match result {
            Ok(()) => self.renderer.picker_changed(&self.picker.view()),
            Err(e) => self.renderer.notice(&e.to_string()),
        }
    }

    fn confirm_picker(&mut self) {
        match self.picker.confirm() {
            Ok(selection) => {
                self.form.set_ids(selection.entity_type, selection.value.clone());
                self.renderer
                    .field_changed(&format!("ids.{}", selection.entity_type), &selection.value);
                self.renderer.picker_changed(&self.picker.view());
            }
            Err(e) => self.renderer.notice(&e.to_string()),
        }
    }

    /// Runs `task` off the loop and feeds its outcome back in
    fn dispatch<F>(&self, task: F)
    where
        F: Future<Output = CommandOutcome> + Send + 'static,
    {
        let tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            if tx.send(task.await).is_err() {
                tracing::debug!("Console closed before a command outcome arrived");
            }
        });
    }

    // =============================================================================
    // Command outcomes
    // =============================================================================

    pub fn handle_outcome(&mut self, outcome: CommandOutcome) {
        match outcome {
            CommandOutcome::ConnectionTested { connection, result } => {
                self.run.finish_test(connection);
                self.renderer.controls_changed(&self.run.controls());

                match result {
                    Ok(response) if response.success => self.system_log(
                        &format!(
                            "{} Authentication successful! Token: {}...",
                            connection,
                            response.token_preview()
                        ),
                        Severity::Success,
                    ),
                    Ok(response) => {
                        let reason = response.error.as_deref().unwrap_or("Unknown error");
                        self.system_log(&format!("Authentication failed: {}", reason), Severity::Error);
                        self.renderer.notice(&format!("Error: {}", reason));
                    }
                    Err(e) => self.system_log(&format!("Network error: {}", e), Severity::Error),
                }
            }
            CommandOutcome::Started(result) => {
                match result {
                    Ok(response) => match response.rejection() {
                        None => {
                            tracing::info!("Start accepted, waiting for runner status");
                            self.run.settle_start(true);
                        }
                        Some(reason) => {
                            self.run.settle_start(false);
                            self.renderer.notice(reason);
                            self.system_log(reason, Severity::Error);
                        }
                    },
                    Err(e) => {
                        if e.is_timeout() {
                            tracing::warn!("Start request timed out; the runner may still report a run");
                        }
                        self.run.settle_start(false);
                        let message = e.to_string();
                        self.renderer.notice(&message);
                        self.system_log(&format!("Network error: {}", message), Severity::Error);
                    }
                }
                self.renderer.controls_changed(&self.run.controls());
            }
            CommandOutcome::Stopped(result) => {
                if let Err(e) = result {
                    self.system_log(&format!("Stop failed: {}", e), Severity::Error);
                }
            }
            CommandOutcome::Paused(result) => self.command_acknowledged("Pause", result),
            CommandOutcome::Resumed(result) => self.command_acknowledged("Resume", result),
            CommandOutcome::EntitiesFetched { session, result } => {
                let result = result
                    .map_err(|e| e.to_string())
                    .and_then(|response| response.into_result());
                if self.picker.apply_fetch(session, result) {
                    self.renderer.picker_changed(&self.picker.view());
                }
            }
        }
    }

    fn command_acknowledged(&mut self, name: &str, result: ferry_client::Result<CommandResponse>) {
        match result {
            Ok(response) => {
                if let Some(reason) = response.rejection() {
                    self.system_log(&format!("{} failed: {}", name, reason), Severity::Error);
                }
            }
            Err(e) => self.system_log(&format!("{} failed: {}", name, e), Severity::Error),
        }
    }

    // =============================================================================
    // Push messages
    // =============================================================================

    pub fn handle_push(&mut self, message: PushMessage) {
        match message {
            PushMessage::Connected => {
                self.system_log("Connected to job runner event stream.", Severity::System)
            }
            PushMessage::Event(PushEvent::Log(event)) => {
                if let Some(entry) = self.log.ingest(event.data.as_deref()) {
                    self.renderer.log_appended(entry);
                }
            }
            PushMessage::Event(PushEvent::StatusUpdate(update)) => self.apply_status(update),
            PushMessage::Disconnected(reason) => self.system_log(
                &format!("Lost job runner event stream ({}), reconnecting...", reason),
                Severity::Warning,
            ),
            PushMessage::Unavailable(reason) => self.system_log(
                &format!("Job runner event stream unavailable ({}), retrying...", reason),
                Severity::Warning,
            ),
        }
    }

    fn apply_status(&mut self, update: StatusUpdate) {
        self.run.apply_status(&update);
        self.renderer.controls_changed(&self.run.controls());

        if let Some(message) = update.message.as_deref() {
            self.system_log(message, Severity::Success);
        }
        if let Some(error) = update.error.as_deref() {
            self.system_log(error, Severity::Error);
        }
    }

    fn system_log(&mut self, text: &str, severity: Severity) {
        let entry = self.log.system_notice(text, severity);
        self.renderer.log_appended(entry);
    }
}
