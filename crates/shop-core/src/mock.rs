//! Scripted Status Source
//!
//! For tests and demos. Replays a fixed sequence of status replies, then
//! keeps answering with the fallback (pending by default).

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tokio::time::Instant;

use crate::api::PaymentStatusSource;
use crate::error::{Result, ShopError};
use crate::model::PaymentStatusReport;
use crate::session::SessionRef;

/// One scripted answer
#[derive(Clone, Debug)]
pub enum ScriptedReply {
    Report(PaymentStatusReport),
    Failure(String),
}

impl ScriptedReply {
    pub fn pending() -> Self {
        Self::Report(PaymentStatusReport::new("open", "unpaid"))
    }

    pub fn paid() -> Self {
        Self::Report(PaymentStatusReport::new("complete", "paid"))
    }

    pub fn expired() -> Self {
        Self::Report(PaymentStatusReport::new("expired", "unpaid"))
    }

    fn into_result(self) -> Result<PaymentStatusReport> {
        match self {
            Self::Report(report) => Ok(report),
            Self::Failure(msg) => Err(ShopError::Http(msg)),
        }
    }
}

/// Status source answering from a script
#[derive(Debug)]
pub struct ScriptedStatusSource {
    script: Mutex<VecDeque<ScriptedReply>>,
    fallback: ScriptedReply,
    queries: Mutex<Vec<Instant>>,
}

impl Default for ScriptedStatusSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedStatusSource {
    /// Source that reports pending forever
    pub fn new() -> Self {
        Self::with_fallback(ScriptedReply::pending())
    }

    /// Source answering `fallback` once the script is used up
    pub fn with_fallback(fallback: ScriptedReply) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn then(self, reply: ScriptedReply) -> Self {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
        self
    }

    pub fn then_pending(mut self, times: usize) -> Self {
        for _ in 0..times {
            self = self.then(ScriptedReply::pending());
        }
        self
    }

    pub fn then_paid(self) -> Self {
        self.then(ScriptedReply::paid())
    }

    pub fn then_expired(self) -> Self {
        self.then(ScriptedReply::expired())
    }

    pub fn then_failure(self, msg: impl Into<String>) -> Self {
        self.then(ScriptedReply::Failure(msg.into()))
    }

    /// Number of status queries received
    pub fn query_count(&self) -> usize {
        self.queries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// When each query was received
    pub fn query_times(&self) -> Vec<Instant> {
        self.queries.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl PaymentStatusSource for ScriptedStatusSource {
    async fn payment_status(&self, session: &SessionRef) -> Result<PaymentStatusReport> {
        tracing::trace!(session = %session, "Scripted status query");
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Instant::now());

        let reply = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        reply.into_result()
    }
}
