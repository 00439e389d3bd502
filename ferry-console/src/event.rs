//! Event loop messages
//!
//! Everything that can change console state arrives as one of these, on one
//! of three channels: operator input, runner pushes, and the outcomes of
//! commands the console dispatched.

use crate::picker::SessionId;
use crate::run_control::Connection;
use ferry_client::ClientError;
use ferry_core::domain::entity::EntityType;
use ferry_core::dto::auth::AuthResponse;
use ferry_core::dto::command::CommandResponse;
use ferry_core::dto::entity::FetchEntitiesResponse;
use ferry_core::dto::event::PushEvent;

/// Operator input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorCommand {
    Set { field: String, value: String },
    Show,
    TestConnection(Connection),
    Start,
    Stop,
    Pause,
    Resume,
    OpenPicker(EntityType),
    Filter(String),
    Toggle(String),
    SelectAll,
    DeselectAll,
    Confirm,
    Cancel,
    ClearLog,
    Quit,
}

/// Result of a dispatched command, delivered back to the event loop
#[derive(Debug)]
pub enum CommandOutcome {
    ConnectionTested {
        connection: Connection,
        result: Result<AuthResponse, ClientError>,
    },
    Started(Result<CommandResponse, ClientError>),
    Stopped(Result<(), ClientError>),
    Paused(Result<CommandResponse, ClientError>),
    Resumed(Result<CommandResponse, ClientError>),
    EntitiesFetched {
        session: SessionId,
        result: Result<FetchEntitiesResponse, ClientError>,
    },
}

/// Push channel traffic, in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushMessage {
    Connected,
    Event(PushEvent),
    /// The stream ended or broke after having been connected
    Disconnected(String),
    /// The runner could not be reached; sent once per failure streak
    Unavailable(String),
}
