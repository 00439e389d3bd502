//! Data Transfer Objects exchanged with the job runner
//!
//! Request and response bodies for the runner's command endpoints, plus the
//! envelopes of the events it pushes to the console.

pub mod auth;
pub mod command;
pub mod entity;
pub mod event;
