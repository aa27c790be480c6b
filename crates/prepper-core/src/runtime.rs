//! Async driver for a [`SessionController`]
//!
//! The driver owns the controller on a single task. Inputs arrive over an
//! unbounded channel; between inputs the task sleeps until the controller's
//! next deadline, so deadline handling and input handling never interleave
//! mid-operation.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info};

use crate::error::{PrepperError, Result};
use crate::session::{Interaction, SessionController, SessionEvent, WarningChoice};

/// Input accepted by the driver
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionInput {
    /// Raw interaction from the UI
    Interaction(Interaction),
    /// Explicit refresh (e.g. clicking the countdown)
    Refresh,
    /// Authentication state observed from the identity provider
    AuthChanged(bool),
    /// Answer to an open warning
    WarningAnswer(WarningChoice),
    /// Voluntary sign-out
    SignOut,
}

/// Cloneable handle for feeding a running driver
#[derive(Clone, Debug)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<SessionInput>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionHandle {
    /// Send a raw input
    pub fn send(&self, input: SessionInput) -> Result<()> {
        self.tx.send(input).map_err(|_| PrepperError::DriverClosed)
    }

    /// Report an interaction
    pub fn interaction(&self, kind: Interaction) -> Result<()> {
        self.send(SessionInput::Interaction(kind))
    }

    /// Explicit refresh
    pub fn refresh(&self) -> Result<()> {
        self.send(SessionInput::Refresh)
    }

    /// Report an authentication transition
    pub fn set_authenticated(&self, authenticated: bool) -> Result<()> {
        self.send(SessionInput::AuthChanged(authenticated))
    }

    /// Answer the current warning
    pub fn answer_warning(&self, choice: WarningChoice) -> Result<()> {
        self.send(SessionInput::WarningAnswer(choice))
    }

    /// Voluntary sign-out
    pub fn sign_out(&self) -> Result<()> {
        self.send(SessionInput::SignOut)
    }

    /// Subscribe to the controller's lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

/// Runs a controller until every handle is dropped
pub struct SessionDriver {
    controller: SessionController,
    rx: mpsc::UnboundedReceiver<SessionInput>,
}

impl SessionDriver {
    /// Wrap a controller, returning the handle used to feed it
    pub fn new(controller: SessionController) -> (SessionHandle, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        let events = controller.events_sender();
        (SessionHandle { tx, events }, Self { controller, rx })
    }

    /// Drive the controller
    ///
    /// The controller adopts the identity provider's state first. On exit
    /// pending deadlines are cancelled; the persisted clock stays so the next
    /// run resumes it.
    pub async fn run(mut self) -> SessionController {
        info!("Session driver started");
        self.controller.initialize().await;

        loop {
            let sleep = self.time_until_deadline();

            tokio::select! {
                input = self.rx.recv() => {
                    match input {
                        Some(input) => self.handle(input).await,
                        None => break,
                    }
                }
                _ = sleep_for(sleep), if sleep.is_some() => {
                    self.controller.poll().await;
                }
            }
        }

        self.controller.teardown();
        info!("Session driver stopped");
        self.controller
    }

    async fn handle(&mut self, input: SessionInput) {
        debug!("Session input: {:?}", input);
        match input {
            SessionInput::Interaction(kind) => {
                self.controller.on_interaction(kind);
            }
            SessionInput::Refresh => {
                self.controller.refresh_session();
            }
            SessionInput::AuthChanged(authenticated) => {
                self.controller.set_authenticated(authenticated).await;
            }
            SessionInput::WarningAnswer(choice) => {
                self.controller.answer_warning(choice).await;
            }
            SessionInput::SignOut => {
                self.controller.sign_out().await;
            }
        }
    }

    fn time_until_deadline(&self) -> Option<Duration> {
        let deadline = self.controller.next_deadline()?;
        let wait = deadline.saturating_sub(self.controller.now_millis()).max(0);
        Some(Duration::from_millis(wait as u64))
    }
}

async fn sleep_for(duration: Option<Duration>) {
    match duration {
        Some(duration) => tokio::time::sleep(duration).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::identity::{IdentityProvider, Navigator};
    use crate::store::{KeyValueStore, MemoryStore};
    use crate::SESSION_STORAGE_KEY;
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio_test::{assert_pending, assert_ready, task};

    struct SignedOut;

    #[async_trait]
    impl IdentityProvider for SignedOut {
        fn is_authenticated(&self) -> bool {
            false
        }

        async fn sign_out(&self) -> Result<()> {
            Ok(())
        }
    }

    struct Nowhere;

    impl Navigator for Nowhere {
        fn navigate_to(&self, _path: &str) {}
    }

    fn driver(store: &MemoryStore) -> (SessionHandle, SessionDriver) {
        let controller = SessionController::new(
            Arc::new(ManualClock::new(1_700_000_000_000)),
            Arc::new(store.clone()),
            Arc::new(SignedOut),
            Arc::new(Nowhere),
        );
        SessionDriver::new(controller)
    }

    #[test]
    fn test_handle_reports_closed_driver() {
        let (handle, driver) = driver(&MemoryStore::new());
        drop(driver);

        assert!(matches!(handle.refresh(), Err(PrepperError::DriverClosed)));
        assert!(matches!(
            handle.interaction(Interaction::Click),
            Err(PrepperError::DriverClosed)
        ));
    }

    #[tokio::test]
    async fn test_driver_runs_until_handles_drop() {
        let store = MemoryStore::new();
        let (handle, driver) = driver(&store);
        let mut events = handle.subscribe();
        let mut run = task::spawn(driver.run());

        assert_pending!(run.poll());

        handle.set_authenticated(true).unwrap();
        assert!(run.is_woken());
        assert_pending!(run.poll());
        assert!(matches!(
            events.try_recv(),
            Ok(SessionEvent::Started { .. })
        ));

        let second = handle.clone();
        drop(handle);
        assert_pending!(run.poll());

        drop(second);
        let controller = assert_ready!(run.poll());
        assert!(!controller.is_authenticated());
        // Teardown keeps the clock for the next run
        assert!(store.get(SESSION_STORAGE_KEY).unwrap().is_some());
    }
}
