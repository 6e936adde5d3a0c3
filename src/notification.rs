use crate::{gateway::GatewayError, retry::RetryError};
use once_cell::sync::Lazy;
use std::collections::HashMap;

pub const UNKNOWN_ERROR: &str = "An unknown error occurred";

/// Kind of object a failed request was about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Demand,
    CapacityGroup,
    Alert,
    TriggeredAlert,
    /// Creating an alert, as opposed to loading the configured ones
    AlertCreation,
}

impl ObjectType {
    fn noun(&self) -> &'static str {
        match self {
            ObjectType::Demand => "demands",
            ObjectType::CapacityGroup => "capacity groups",
            ObjectType::Alert => "alerts",
            ObjectType::TriggeredAlert => "triggered alerts",
            ObjectType::AlertCreation => "the new alert",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Timeout,
    /// 4xx
    Client,
    /// 5xx
    Server,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

/// User-facing message for a failed remote call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

type CatalogKey = (ObjectType, ErrorCode, u16);

static CATALOG: Lazy<HashMap<CatalogKey, String>> = Lazy::new(|| {
    let objects = [
        ObjectType::Demand,
        ObjectType::CapacityGroup,
        ObjectType::Alert,
        ObjectType::TriggeredAlert,
    ];

    let mut catalog = HashMap::new();

    for object in objects {
        let noun = object.noun();

        catalog.insert(
            (object, ErrorCode::Timeout, 0),
            format!("Loading {noun} timed out, please try again later"),
        );
        catalog.insert(
            (object, ErrorCode::Client, 0),
            format!("The request for {noun} was rejected"),
        );
        catalog.insert(
            (object, ErrorCode::Client, 1),
            "Your session has expired, please sign in again".to_string(),
        );
        catalog.insert(
            (object, ErrorCode::Client, 3),
            format!("You are not allowed to access {noun}"),
        );
        catalog.insert(
            (object, ErrorCode::Client, 4),
            format!("No {noun} could be found"),
        );
        catalog.insert(
            (object, ErrorCode::Server, 0),
            format!("The server failed to process {noun}"),
        );
        catalog.insert(
            (object, ErrorCode::Server, 3),
            format!("The {noun} service is currently unavailable"),
        );
    }

    let create = ObjectType::AlertCreation;
    for (key, message) in [
        (
            (create, ErrorCode::Timeout, 0),
            "Creating the alert timed out, it may still have been saved",
        ),
        ((create, ErrorCode::Client, 0), "The alert could not be created"),
        (
            (create, ErrorCode::Client, 1),
            "Your session has expired, please sign in again",
        ),
        ((create, ErrorCode::Client, 3), "You are not allowed to create alerts"),
        ((create, ErrorCode::Client, 9), "An alert with this name already exists"),
        (
            (create, ErrorCode::Client, 22),
            "The alert configuration was rejected by the server",
        ),
        ((create, ErrorCode::Server, 0), "The server failed to create the alert"),
        (
            (create, ErrorCode::Server, 3),
            "Alerts cannot be created right now, please try again later",
        ),
    ] {
        catalog.insert(key, message.to_string());
    }

    catalog
});

/// Catalog key parts for an error, `None` when it cannot be classified
pub fn classify(error: &GatewayError) -> Option<(ErrorCode, u16)> {
    match error {
        GatewayError::Timeout => Some((ErrorCode::Timeout, 0)),
        GatewayError::Status { status, .. } => match *status {
            400..=499 => Some((ErrorCode::Client, status % 100)),
            500..=599 => Some((ErrorCode::Server, status % 100)),
            _ => None,
        },
        GatewayError::Transport(_) | GatewayError::Decode(_) => None,
    }
}

/// Look up the message for a failed call on `object`
pub fn for_error(object: ObjectType, error: &GatewayError) -> Notification {
    let message = classify(error)
        .and_then(|(code, last_digits)| CATALOG.get(&(object, code, last_digits)))
        .cloned()
        .unwrap_or_else(|| UNKNOWN_ERROR.to_string());

    Notification {
        level: Level::Error,
        message,
    }
}

/// Message for a fetch that gave up or was cancelled
pub fn for_retry_error(object: ObjectType, error: &RetryError<GatewayError>) -> Notification {
    match error {
        RetryError::Exhausted { last, .. } => for_error(object, last),
        RetryError::Cancelled => Notification {
            level: Level::Info,
            message: format!("Loading {} was cancelled", object.noun()),
        },
    }
}
