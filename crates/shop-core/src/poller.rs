//! Payment Confirmation Poller
//!
//! After the hosted checkout redirects back with a session reference, the
//! confirmation view asks the status endpoint until the payment is paid, the
//! session expires, or the attempt budget runs out.
//!
//! ```text
//!   query ──▶ classify ──┬─ paid ─────────▶ Success          (stop)
//!     ▲                  ├─ expired ──────▶ Failed(Expired)  (stop)
//!     │                  ├─ request error ▶ Failed(Transport)(stop)
//!     │                  └─ pending ──┬─ retries < max ─▶ wait 2s ─┐
//!     │                               └─ otherwise ─────▶ Failed(Timeout)
//!     └────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`PollState`] is the pure transition function. [`PaymentPoller`] drives it
//! on a tokio runtime; the WASM view drives the same state with browser
//! timers.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::api::PaymentStatusSource;
use crate::error::Result;
use crate::model::PaymentStatusReport;
use crate::session::SessionRef;
use crate::status::{PollFailure, UiStatus};

/// Retries after the initial query
pub const MAX_RETRIES: u32 = 10;

/// Delay between two queries
pub const RETRY_DELAY: Duration = Duration::from_millis(2000);

const PAID: &str = "paid";
const EXPIRED: &str = "expired";

/// Attempt budget and spacing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_retries: MAX_RETRIES,
            retry_delay: RETRY_DELAY,
        }
    }
}

/// Classification of a single status report
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PaymentOutcome {
    Paid,
    Expired,
    Pending,
}

/// Classify a status report. Paid wins over expired.
pub fn classify(report: &PaymentStatusReport) -> PaymentOutcome {
    if report.payment_status == PAID {
        PaymentOutcome::Paid
    } else if report.status == EXPIRED {
        PaymentOutcome::Expired
    } else {
        PaymentOutcome::Pending
    }
}

/// What to do after a query resolved
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PollStep {
    /// Terminal; no further queries
    Finish(UiStatus),

    /// Show `status` and query again after `after`
    Retry { status: UiStatus, after: Duration },
}

/// Attempt counter and transition function of one confirmation view
#[derive(Clone, Debug)]
pub struct PollState {
    policy: PollPolicy,
    retries: u32,
    queries: u32,
    outcome: Option<UiStatus>,
}

impl PollState {
    pub const fn new(policy: PollPolicy) -> Self {
        Self {
            policy,
            retries: 0,
            queries: 0,
            outcome: None,
        }
    }

    /// Retries scheduled so far
    pub const fn retries(&self) -> u32 {
        self.retries
    }

    /// Queries resolved so far
    pub const fn queries(&self) -> u32 {
        self.queries
    }

    pub const fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Feed the result of one status query.
    ///
    /// Once finished, the terminal status is returned again and nothing is
    /// counted.
    pub fn advance(&mut self, result: Result<PaymentStatusReport>) -> PollStep {
        if let Some(done) = &self.outcome {
            return PollStep::Finish(done.clone());
        }
        self.queries += 1;

        let step = match result {
            Err(e) => PollStep::Finish(UiStatus::failed(PollFailure::Transport(e.to_string()))),
            Ok(report) => match classify(&report) {
                PaymentOutcome::Paid => PollStep::Finish(UiStatus::paid()),
                PaymentOutcome::Expired => PollStep::Finish(UiStatus::failed(PollFailure::Expired)),
                PaymentOutcome::Pending if self.retries < self.policy.max_retries => {
                    self.retries += 1;
                    PollStep::Retry {
                        status: UiStatus::processing(),
                        after: self.policy.retry_delay,
                    }
                }
                PaymentOutcome::Pending => PollStep::Finish(UiStatus::failed(PollFailure::Timeout)),
            },
        };

        if let PollStep::Finish(status) = &step {
            self.outcome = Some(status.clone());
        }
        step
    }
}

/// Spawns confirmation pollers against a status source
#[derive(Clone)]
pub struct PaymentPoller {
    source: Arc<dyn PaymentStatusSource>,
}

impl PaymentPoller {
    pub fn new(source: Arc<dyn PaymentStatusSource>) -> Self {
        Self { source }
    }

    /// Start polling on the current tokio runtime.
    ///
    /// `session` is the reference captured when the view mounted; `None`
    /// finishes immediately with [`PollFailure::MissingSession`] and issues
    /// no query.
    pub fn spawn(&self, session: Option<SessionRef>) -> PollHandle {
        let (status_tx, status_rx) = watch::channel(UiStatus::checking());
        let (cancel_tx, cancel_rx) = watch::channel(false);

        let task = tokio::spawn(drive(
            self.source.clone(),
            session,
            PollPolicy::default(),
            status_tx,
            cancel_rx,
        ));

        PollHandle {
            cancel: cancel_tx,
            status: status_rx,
            task: Some(task),
        }
    }
}

/// Owner-side handle of a running poller.
///
/// Dropping the handle cancels the poller: a pending retry never fires and
/// a response still in flight is discarded.
#[derive(Debug)]
pub struct PollHandle {
    cancel: watch::Sender<bool>,
    status: watch::Receiver<UiStatus>,
    task: Option<JoinHandle<Option<UiStatus>>>,
}

impl PollHandle {
    /// Receiver of every published status
    pub fn subscribe(&self) -> watch::Receiver<UiStatus> {
        self.status.clone()
    }

    pub fn cancel(&self) {
        self.cancel.send_replace(true);
    }

    /// Wait for the poller to stop.
    ///
    /// Returns the terminal status, or `None` if the poller was cancelled
    /// first.
    pub async fn join(mut self) -> Option<UiStatus> {
        let task = self.task.take()?;
        match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "Payment poller task failed");
                None
            }
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel.send_replace(true);
    }
}

async fn drive(
    source: Arc<dyn PaymentStatusSource>,
    session: Option<SessionRef>,
    policy: PollPolicy,
    status: watch::Sender<UiStatus>,
    mut cancel: watch::Receiver<bool>,
) -> Option<UiStatus> {
    let Some(session) = session else {
        tracing::warn!("Confirmation view opened without a payment session");
        return publish(&status, &cancel, UiStatus::failed(PollFailure::MissingSession));
    };

    let mut state = PollState::new(policy);

    loop {
        let result = tokio::select! {
            biased;
            () = cancelled(&mut cancel) => {
                tracing::debug!(session = %session, "Poller cancelled during status query");
                return None;
            }
            result = source.payment_status(&session) => result,
        };

        if let Err(e) = &result {
            tracing::warn!(session = %session, attempt = state.queries() + 1, error = %e, "Payment status query failed");
        }

        match state.advance(result) {
            PollStep::Finish(outcome) => {
                tracing::info!(
                    session = %session,
                    queries = state.queries(),
                    outcome = outcome.label(),
                    "Payment confirmation finished"
                );
                return publish(&status, &cancel, outcome);
            }
            PollStep::Retry { status: pending, after } => {
                tracing::debug!(
                    session = %session,
                    retry = state.retries(),
                    delay_ms = after.as_millis(),
                    "Payment still pending"
                );
                publish(&status, &cancel, pending)?;

                tokio::select! {
                    biased;
                    () = cancelled(&mut cancel) => {
                        tracing::debug!(session = %session, "Poller cancelled before retry");
                        return None;
                    }
                    () = tokio::time::sleep(after) => {}
                }
            }
        }
    }
}

/// Resolves once the owner cancels or drops its handle
async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    let _ = cancel.wait_for(|&c| c).await;
}

fn is_cancelled(cancel: &watch::Receiver<bool>) -> bool {
    cancel.has_changed().is_err() || *cancel.borrow()
}

fn publish(
    status: &watch::Sender<UiStatus>,
    cancel: &watch::Receiver<bool>,
    next: UiStatus,
) -> Option<UiStatus> {
    if is_cancelled(cancel) {
        return None;
    }
    status.send_replace(next.clone());
    Some(next)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::error::ShopError;
    use crate::mock::ScriptedStatusSource;

    fn session() -> Option<SessionRef> {
        SessionRef::new("cs_test_123")
    }

    fn poller(source: &Arc<ScriptedStatusSource>) -> PaymentPoller {
        PaymentPoller::new(source.clone())
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(&PaymentStatusReport::new("complete", "paid")), PaymentOutcome::Paid);
        assert_eq!(classify(&PaymentStatusReport::new("expired", "unpaid")), PaymentOutcome::Expired);
        assert_eq!(classify(&PaymentStatusReport::new("open", "unpaid")), PaymentOutcome::Pending);
        assert_eq!(classify(&PaymentStatusReport::new("expired", "paid")), PaymentOutcome::Paid);
    }

    #[test]
    fn test_state_budget() {
        let mut state = PollState::new(PollPolicy::default());
        let pending = || Ok(PaymentStatusReport::new("open", "unpaid"));

        for retry in 1..=MAX_RETRIES {
            let step = state.advance(pending());
            assert_eq!(
                step,
                PollStep::Retry {
                    status: UiStatus::processing(),
                    after: RETRY_DELAY,
                }
            );
            assert_eq!(state.retries(), retry);
        }

        assert_eq!(
            state.advance(pending()),
            PollStep::Finish(UiStatus::failed(PollFailure::Timeout))
        );
        assert_eq!(state.queries(), 11);
        assert!(state.is_finished());

        // Finished state does not count further results
        let _ = state.advance(Ok(PaymentStatusReport::new("complete", "paid")));
        assert_eq!(state.queries(), 11);
    }

    #[test]
    fn test_state_transport_error() {
        let mut state = PollState::new(PollPolicy::default());
        let step = state.advance(Err(ShopError::Decode("expected value".into())));
        assert!(matches!(
            step,
            PollStep::Finish(UiStatus::Failed(PollFailure::Transport(_)))
        ));
    }

    #[test]
    fn test_unbounded_budget_keeps_retrying() {
        let mut state = PollState::new(PollPolicy {
            max_retries: u32::MAX,
            retry_delay: RETRY_DELAY,
        });
        for _ in 0..1000 {
            let step = state.advance(Ok(PaymentStatusReport::new("open", "unpaid")));
            assert!(matches!(step, PollStep::Retry { .. }));
        }
        assert_eq!(state.queries(), 1000);
        assert!(!state.is_finished());
    }

    #[test]
    fn test_zero_retry_policy() {
        let policy = PollPolicy {
            max_retries: 0,
            retry_delay: RETRY_DELAY,
        };
        let mut state = PollState::new(policy);
        assert_eq!(
            state.advance(Ok(PaymentStatusReport::new("open", "unpaid"))),
            PollStep::Finish(UiStatus::failed(PollFailure::Timeout))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_session_issues_no_query() {
        let source = Arc::new(ScriptedStatusSource::new());
        let handle = poller(&source).spawn(None);
        let status = handle.subscribe();

        let outcome = handle.join().await;

        assert_eq!(outcome, Some(UiStatus::failed(PollFailure::MissingSession)));
        assert_eq!(*status.borrow(), UiStatus::failed(PollFailure::MissingSession));
        assert_eq!(source.query_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_paid_on_first_query() {
        let source = Arc::new(ScriptedStatusSource::new().then_paid());
        let outcome = poller(&source).spawn(session()).join().await;

        assert_eq!(outcome, Some(UiStatus::paid()));
        assert_eq!(source.query_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_pending_times_out_after_eleven_queries() {
        let source = Arc::new(ScriptedStatusSource::new());
        let outcome = poller(&source).spawn(session()).join().await;

        assert_eq!(outcome, Some(UiStatus::failed(PollFailure::Timeout)));
        assert_eq!(source.query_count(), 11);

        let times = source.query_times();
        for pair in times.windows(2) {
            let gap = pair[1] - pair[0];
            assert!(gap >= RETRY_DELAY, "queries spaced {gap:?}");
            assert!(gap < RETRY_DELAY + Duration::from_millis(5), "queries spaced {gap:?}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_stops_at_that_attempt() {
        for n in [1_usize, 4, 11] {
            let source = Arc::new(ScriptedStatusSource::new().then_pending(n - 1).then_expired());
            let outcome = poller(&source).spawn(session()).join().await;

            assert_eq!(outcome, Some(UiStatus::failed(PollFailure::Expired)), "attempt {n}");
            assert_eq!(source.query_count(), n);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_failure_is_terminal() {
        let source = Arc::new(
            ScriptedStatusSource::new()
                .then_pending(2)
                .then_failure("connection reset by peer"),
        );
        let outcome = poller(&source).spawn(session()).join().await;

        assert!(matches!(
            outcome,
            Some(UiStatus::Failed(PollFailure::Transport(_)))
        ));
        assert_eq!(source.query_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_processing_status_published_while_pending() {
        let source = Arc::new(ScriptedStatusSource::new().then_pending(1).then_paid());
        let handle = poller(&source).spawn(session());
        let mut status = handle.subscribe();

        assert_eq!(*status.borrow_and_update(), UiStatus::checking());
        status.changed().await.unwrap();
        assert_eq!(*status.borrow_and_update(), UiStatus::processing());

        assert_eq!(handle.join().await, Some(UiStatus::paid()));
        assert_eq!(*status.borrow(), UiStatus::paid());
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_cancels_pending_retry() {
        let source = Arc::new(ScriptedStatusSource::new());
        let handle = poller(&source).spawn(session());
        let status = handle.subscribe();

        // Queries at 0s and 2s; the next one is scheduled for 4s
        tokio::time::sleep(Duration::from_millis(3000)).await;
        assert_eq!(source.query_count(), 2);
        assert_eq!(*status.borrow(), UiStatus::processing());

        drop(handle);
        tokio::time::sleep(Duration::from_secs(60)).await;

        assert_eq!(source.query_count(), 2);
        assert_eq!(*status.borrow(), UiStatus::processing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_join_returns_none() {
        let source = Arc::new(ScriptedStatusSource::new());
        let handle = poller(&source).spawn(session());

        tokio::time::sleep(Duration::from_millis(500)).await;
        handle.cancel();

        assert_eq!(handle.join().await, None);
        assert_eq!(source.query_count(), 1);
    }

    struct GatedSource {
        gate: Notify,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PaymentStatusSource for GatedSource {
        async fn payment_status(&self, _session: &SessionRef) -> Result<PaymentStatusReport> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.gate.notified().await;
            Ok(PaymentStatusReport::new("complete", "paid"))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_response_after_teardown_is_ignored() {
        let source = Arc::new(GatedSource {
            gate: Notify::new(),
            calls: AtomicUsize::new(0),
        });
        let handle = PaymentPoller::new(source.clone()).spawn(session());
        let status = handle.subscribe();

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        handle.cancel();
        source.gate.notify_one();

        assert_eq!(handle.join().await, None);
        assert_eq!(*status.borrow(), UiStatus::checking());
    }
}
