//! Payment Pages
//!
//! The success page confirms a checkout by querying the payment status on
//! a fixed cadence. Browser timers stand in for tokio here; the attempt
//! budget and classification come from [`PollState`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_query_map;

use shop_core::{PollFailure, PollPolicy, PollState, PollStep, SessionRef, UiStatus};
use shop_core::session::SESSION_QUERY_PARAM;

use crate::api;
use crate::auth::use_auth;
use crate::components::StatusPanel;

/// Shared between the view and its in-flight query and timer
#[derive(Clone)]
struct PollContext {
    token: Option<String>,
    set_status: WriteSignal<UiStatus>,
    alive: Arc<AtomicBool>,
    timer: Arc<Mutex<Option<TimeoutHandle>>>,
}

impl PollContext {
    fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Stop publishing and drop any pending retry
    fn teardown(&self) {
        self.alive.store(false, Ordering::Release);
        let pending = self.timer.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(handle) = pending {
            handle.clear();
        }
    }
}

/// Issue one status query and act on the result
fn poll_once(ctx: PollContext, session: SessionRef, mut state: PollState) {
    leptos::task::spawn_local(async move {
        let result = api::payment_status(ctx.token.as_deref(), &session).await;
        if !ctx.is_alive() {
            return;
        }

        match state.advance(result) {
            PollStep::Finish(status) => ctx.set_status.set(status),
            PollStep::Retry { status, after } => {
                ctx.set_status.set(status);
                let next = ctx.clone();
                match set_timeout_with_handle(move || poll_once(next, session, state), after) {
                    Ok(handle) => {
                        *ctx.timer.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
                    }
                    Err(e) => {
                        leptos::logging::error!("failed to schedule payment status retry: {e:?}");
                        ctx.set_status.set(UiStatus::failed(PollFailure::Transport(
                            "timer unavailable".into(),
                        )));
                    }
                }
            }
        }
    });
}

/// Landing page after the hosted checkout redirects back
#[component]
pub fn PaymentSuccessPage() -> impl IntoView {
    let auth = use_auth();
    let query = use_query_map();
    let (status, set_status) = signal(UiStatus::checking());

    let session = SessionRef::from_query(query.with_untracked(|q| q.get(SESSION_QUERY_PARAM)));

    let ctx = PollContext {
        token: auth.token(),
        set_status,
        alive: Arc::new(AtomicBool::new(true)),
        timer: Arc::new(Mutex::new(None)),
    };

    match session {
        None => set_status.set(UiStatus::failed(PollFailure::MissingSession)),
        Some(session) => poll_once(ctx.clone(), session, PollState::new(PollPolicy::default())),
    }

    on_cleanup(move || ctx.teardown());

    view! {
        <div class="payment">
            <h1>"Payment"</h1>
            <StatusPanel status />
        </div>
    }
}

/// Landing page when the shopper backs out of checkout
#[component]
pub fn PaymentCancelPage() -> impl IntoView {
    view! {
        <div class="payment">
            <h1>"Payment cancelled"</h1>
            <div class="status status-error">
                <p class="status-message">"Your payment was cancelled. Your cart has been kept."</p>
                <A href="/cart" attr:class="btn btn-primary">"Back to cart"</A>
            </div>
        </div>
    }
}
