//! Core domain types
//!
//! These types describe what the console edits and observes: the job
//! configuration sent on start, the authoritative run state, the operator
//! log, and the remote entities offered by the picker.

pub mod config;
pub mod entity;
pub mod log;
pub mod run;
