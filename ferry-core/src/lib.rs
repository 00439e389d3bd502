//! Ferry Core
//!
//! Core types shared by the Ferry migration console and its runner client.
//!
//! This crate contains:
//! - Domain types: job configuration, run state, log entries, remote entities
//! - DTOs: command request/response bodies and push event envelopes

pub mod domain;
pub mod dto;
