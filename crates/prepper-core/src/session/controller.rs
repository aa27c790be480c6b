//! Session controller: wires activity, countdown and sign-out together
//!
//! The controller is single-owner. Every operation except the identity
//! revoke completes synchronously, so a reset always replaces deadlines
//! that have not fired yet.

use std::fmt;
use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::identity::{IdentityProvider, Navigator};
use crate::session::{
    ActivityMonitor, Interaction, SessionClock, SessionEvent, SessionTimer, SignOutReason,
    TimerEvent,
};
use crate::store::KeyValueStore;
use crate::LANDING_ROUTE;

/// Capacity of the event broadcast channel
const EVENT_CHANNEL_CAPACITY: usize = 32;

/// User's answer to the expiry warning
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WarningChoice {
    /// Keep the session (same as a refresh)
    StaySignedIn,
    /// End the session now
    SignOutNow,
}

/// Orchestrates the session lifecycle for one client
pub struct SessionController {
    clock: Arc<dyn Clock>,
    store: Arc<dyn KeyValueStore>,
    identity: Arc<dyn IdentityProvider>,
    navigator: Arc<dyn Navigator>,
    timer: SessionTimer,
    monitor: ActivityMonitor,
    landing_route: String,
    authenticated: bool,
    warning_open: bool,
    events: broadcast::Sender<SessionEvent>,
}

impl fmt::Debug for SessionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionController")
            .field("authenticated", &self.authenticated)
            .field("warning_open", &self.warning_open)
            .field("next_deadline", &self.timer.next_deadline())
            .field("landing_route", &self.landing_route)
            .finish_non_exhaustive()
    }
}

impl SessionController {
    /// Create a controller in the signed-out state
    pub fn new(
        clock: Arc<dyn Clock>,
        store: Arc<dyn KeyValueStore>,
        identity: Arc<dyn IdentityProvider>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let timer = SessionTimer::new(Arc::clone(&clock), Arc::clone(&store));

        Self {
            clock,
            store,
            identity,
            navigator,
            timer,
            monitor: ActivityMonitor::new(),
            landing_route: LANDING_ROUTE.to_string(),
            authenticated: false,
            warning_open: false,
            events,
        }
    }

    /// Use a different unauthenticated entry point
    pub fn with_landing_route(mut self, route: impl Into<String>) -> Self {
        self.landing_route = route.into();
        self
    }

    /// Subscribe to lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub(crate) fn events_sender(&self) -> broadcast::Sender<SessionEvent> {
        self.events.clone()
    }

    /// Whether the controller has an active timed session
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    /// Whether a warning is waiting for an answer
    pub fn is_warning_open(&self) -> bool {
        self.warning_open
    }

    /// Milliseconds left on the persisted countdown
    pub fn remaining(&self) -> u64 {
        self.timer.remaining()
    }

    /// Earliest pending deadline, for whoever drives [`Self::poll`]
    pub fn next_deadline(&self) -> Option<i64> {
        self.timer.next_deadline()
    }

    /// Current wall-clock time as seen by this controller
    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    /// Activity monitor state
    pub fn activity_monitor(&self) -> &ActivityMonitor {
        &self.monitor
    }

    /// Adopt the identity provider's current state
    pub async fn initialize(&mut self) {
        let authenticated = self.identity.is_authenticated();
        self.set_authenticated(authenticated).await;
    }

    /// Handle an authentication transition observed from the provider
    pub async fn set_authenticated(&mut self, authenticated: bool) {
        match (self.authenticated, authenticated) {
            (false, true) => self.on_sign_in().await,
            (true, false) => self.on_provider_sign_out(),
            (false, false) => {
                // Leftover clock from an earlier run
                SessionClock::clear(self.store.as_ref());
            }
            (true, true) => {}
        }
    }

    /// Feed one raw interaction; returns true when it reset the countdown
    pub fn on_interaction(&mut self, kind: Interaction) -> bool {
        if !self.authenticated {
            return false;
        }

        match self.monitor.observe(kind, self.clock.now_millis()) {
            Some(signal) => {
                debug!("Activity ({:?}) resets session", signal.kind);
                self.reset();
                true
            }
            None => false,
        }
    }

    /// Explicit user refresh; bypasses the activity throttle
    pub fn refresh_session(&mut self) -> bool {
        if !self.authenticated {
            return false;
        }
        info!("Session refreshed by user");
        self.reset();
        true
    }

    /// Fire whichever deadline is due now
    pub async fn poll(&mut self) -> Option<TimerEvent> {
        let event = self.timer.fire_due(self.clock.now_millis())?;

        match event {
            TimerEvent::Warning => {
                let remaining_ms = self.timer.remaining();
                info!("Session expires in {} ms, warning user", remaining_ms);
                self.warning_open = true;
                self.emit(SessionEvent::WarningRaised { remaining_ms });
            }
            TimerEvent::Expired => {
                info!("Session idle timeout reached");
                self.end_session(SignOutReason::Expired).await;
            }
        }

        Some(event)
    }

    /// Apply the user's answer to an open warning
    ///
    /// Answers to a warning that was already superseded are ignored.
    pub async fn answer_warning(&mut self, choice: WarningChoice) {
        if !self.warning_open {
            debug!("Ignoring {:?} for a warning that is no longer open", choice);
            return;
        }

        match choice {
            WarningChoice::StaySignedIn => {
                info!("User chose to stay signed in");
                self.reset();
            }
            WarningChoice::SignOutNow => {
                self.warning_open = false;
                self.end_session(SignOutReason::UserRequested).await;
            }
        }
    }

    /// Voluntary sign-out
    pub async fn sign_out(&mut self) {
        if !self.authenticated {
            return;
        }
        self.end_session(SignOutReason::UserRequested).await;
    }

    /// Stop timers and listeners without ending the session
    ///
    /// The persisted clock is kept so the next start resumes it.
    pub fn teardown(&mut self) {
        self.timer.cancel_pending();
        self.monitor.detach();
        self.authenticated = false;
        self.warning_open = false;
    }

    async fn on_sign_in(&mut self) {
        let now = self.clock.now_millis();
        self.authenticated = true;

        match SessionClock::load(self.store.as_ref()) {
            Some(clock) if clock.is_stale(now) => {
                info!(
                    "Stored session clock is {} ms old, signing out",
                    clock.elapsed(now)
                );
                self.end_session(SignOutReason::StaleOnLoad).await;
                return;
            }
            Some(clock) if clock.is_future(now) => {
                warn!(
                    "Stored session clock {} is ahead of now ({}), restarting",
                    clock.start_epoch_millis, now
                );
                let clock = self.timer.start();
                self.emit(SessionEvent::Started {
                    start_epoch_millis: clock.start_epoch_millis,
                });
            }
            Some(clock) => {
                info!("Resuming session started at {}", clock.start_epoch_millis);
                self.timer.resume(clock);
                self.emit(SessionEvent::Resumed {
                    start_epoch_millis: clock.start_epoch_millis,
                });
            }
            None => {
                let clock = self.timer.start();
                info!("Session started at {}", clock.start_epoch_millis);
                self.emit(SessionEvent::Started {
                    start_epoch_millis: clock.start_epoch_millis,
                });
            }
        }

        self.monitor.attach();
    }

    fn on_provider_sign_out(&mut self) {
        info!("Identity provider reports signed out");
        self.clear_local_state();
    }

    fn reset(&mut self) {
        let clock = self.timer.reset();
        if self.warning_open {
            self.warning_open = false;
            self.emit(SessionEvent::WarningDismissed);
        }
        self.emit(SessionEvent::Reset {
            start_epoch_millis: clock.start_epoch_millis,
        });
    }

    fn clear_local_state(&mut self) {
        self.timer.cancel();
        self.monitor.detach();
        self.authenticated = false;
        self.warning_open = false;
    }

    /// Local cleanup first, then best-effort revoke, then navigation
    async fn end_session(&mut self, reason: SignOutReason) {
        info!("Ending session ({:?})", reason);
        self.clear_local_state();

        if let Err(e) = self.identity.sign_out().await {
            warn!("Identity provider sign-out failed: {}", e);
        }

        self.navigator.navigate_to(&self.landing_route);
        self.emit(SessionEvent::SignedOut { reason });
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}
