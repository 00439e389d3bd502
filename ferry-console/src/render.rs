//! Rendering seam
//!
//! The console never draws anything itself. Every visible change is pushed
//! to a [`Renderer`] right after the state it reflects has changed.

use crate::picker::PickerView;
use crate::run_control::ControlsView;
use ferry_core::domain::log::LogEntry;

pub trait Renderer: Send {
    /// One entry was appended to the operator log; show it and scroll to it
    fn log_appended(&mut self, entry: &LogEntry);

    fn log_cleared(&mut self);

    fn controls_changed(&mut self, controls: &ControlsView);

    fn picker_changed(&mut self, picker: &PickerView);

    /// A form field now holds `value`
    fn field_changed(&mut self, field: &str, value: &str);

    /// Blocking notice the operator must acknowledge
    fn notice(&mut self, message: &str);

    /// Full form listing, in field order
    fn show_form(&mut self, fields: &[(String, String)]);
}
