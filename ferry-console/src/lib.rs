//! Ferry Console
//!
//! The operator console for the migration job runner, independent of any
//! particular terminal or UI toolkit.
//!
//! Architecture:
//! - Run control: Idle/Running state machine driven only by runner status pushes
//! - Log sink: ordered, classified operator log
//! - Picker: remote-backed multi-select with session supersession
//! - Form: the operator's editable input, gathered into a job configuration on demand
//! - Console: single-threaded event loop over operator input, push events and
//!   command outcomes, rendering through the [`Renderer`] trait
//!
//! Network calls go through the [`Backend`] trait so the loop can be driven
//! without a runner in tests.

mod backend;
mod console;
mod event;
mod form;
mod log_sink;
mod picker;
mod push;
mod render;
mod run_control;

pub use backend::Backend;
pub use console::Console;
pub use event::{CommandOutcome, OperatorCommand, PushMessage};
pub use form::{ConsoleForm, FormError};
pub use log_sink::{LogSink, classify, strip_decorations};
pub use picker::{Picker, PickerError, PickerRow, PickerView, Selection, SessionId};
pub use push::spawn_push_listener;
pub use render::Renderer;
pub use run_control::{Connection, ControlError, ControlsView, RunControl, ValidationError, validate_ready};
