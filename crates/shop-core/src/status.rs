//! Payment Confirmation Status
//!
//! Tri-state status shown by the confirmation view. The failure kinds carry
//! their own user-facing text, so a failed status cannot hold a success
//! message or vice versa.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CHECKING_MESSAGE: &str = "Checking payment status...";
pub const PROCESSING_MESSAGE: &str = "Processing payment...";
pub const SUCCESS_MESSAGE: &str = "Payment successful! Thank you for your purchase.";

/// Terminal failures of the confirmation poller
#[derive(Error, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum PollFailure {
    /// No session reference on entry
    #[error("No payment session found")]
    MissingSession,

    /// Provider reports the checkout session expired
    #[error("Payment session expired. Please try again.")]
    Expired,

    /// Attempt budget exhausted while still pending
    #[error("Payment verification timed out. Please contact support.")]
    Timeout,

    /// The status query failed or returned an unreadable body.
    ///
    /// The detail is kept for logs; users only see the generic message.
    #[error("Error checking payment status. Please contact support.")]
    Transport(String),
}

impl PollFailure {
    /// Message shown to the user, verbatim
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// View status of the payment confirmation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum UiStatus {
    Loading { message: String },
    Success { message: String },
    #[serde(rename = "error")]
    Failed(PollFailure),
}

impl UiStatus {
    pub fn checking() -> Self {
        Self::Loading {
            message: CHECKING_MESSAGE.into(),
        }
    }

    pub fn processing() -> Self {
        Self::Loading {
            message: PROCESSING_MESSAGE.into(),
        }
    }

    pub fn paid() -> Self {
        Self::Success {
            message: SUCCESS_MESSAGE.into(),
        }
    }

    pub const fn failed(failure: PollFailure) -> Self {
        Self::Failed(failure)
    }

    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// No further queries follow a terminal status
    pub const fn is_terminal(&self) -> bool {
        !self.is_loading()
    }

    pub const fn failure(&self) -> Option<&PollFailure> {
        match self {
            Self::Failed(f) => Some(f),
            _ => None,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Loading { message } | Self::Success { message } => message.clone(),
            Self::Failed(failure) => failure.user_message(),
        }
    }

    /// Short label used for CSS classes and logs
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Loading { .. } => "loading",
            Self::Success { .. } => "success",
            Self::Failed(_) => "error",
        }
    }
}

impl Default for UiStatus {
    fn default() -> Self {
        Self::checking()
    }
}

impl std::fmt::Display for UiStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.label(), self.message())
    }
}
