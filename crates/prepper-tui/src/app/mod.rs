//! Application state and event handling

pub mod config;
pub mod events;
pub mod router;
mod state;

pub use config::{ClientConfig, ConfigError};
pub use router::Router;
pub use state::{AppState, Screen};

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::prelude::*;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, warn};

use prepper_core::{
    get_remaining, Clock, Interaction, KeyValueStore, SessionEvent, SessionHandle, WarningChoice,
};

use crate::identity::LocalIdentity;
use crate::ui;

/// Redraw cadence for the header clock
const TICK_RATE: Duration = Duration::from_millis(250);

/// What a terminal event asks the app to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Forward as user activity
    Interaction(Interaction),
    /// Sign in with the local identity
    SignIn,
    /// Explicit session refresh
    Refresh,
    /// Voluntary sign-out
    SignOut,
    /// Answer the open warning
    AnswerWarning(WarningChoice),
    /// Leave the application
    Quit,
}

/// Main application struct
pub struct App {
    /// Application state
    pub state: AppState,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Tick counter
    pub tick: u64,

    session: SessionHandle,
    identity: Arc<LocalIdentity>,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    router: Router,
    events: broadcast::Receiver<SessionEvent>,
    routes: mpsc::UnboundedReceiver<String>,
    countdown_refresh: Duration,
    user_name: String,
}

impl App {
    /// Create a new application instance
    ///
    /// Subscribes to session events immediately, so create the app before
    /// the driver starts to see its initial transition.
    pub fn new(
        session: SessionHandle,
        identity: Arc<LocalIdentity>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        routes: mpsc::UnboundedReceiver<String>,
        config: &ClientConfig,
    ) -> Self {
        let events = session.subscribe();
        let user_name = std::env::var("USER").unwrap_or_else(|_| "candidate".to_string());

        Self {
            state: AppState::new(),
            should_quit: false,
            tick: 0,
            session,
            identity,
            store,
            clock,
            router: Router::new(config.landing_route.clone()),
            events,
            routes,
            countdown_refresh: Duration::from_secs(config.countdown_refresh_secs.max(1)),
            user_name,
        }
    }

    /// Run the application main loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        let mut terminal_events = EventStream::new();
        let mut tick = tokio::time::interval(TICK_RATE);
        let mut countdown = tokio::time::interval(self.countdown_refresh);

        while !self.should_quit {
            terminal.draw(|frame| ui::render(frame, &self.state))?;

            tokio::select! {
                maybe_event = terminal_events.next() => match maybe_event {
                    Some(Ok(event)) => self.on_terminal_event(&event),
                    Some(Err(e)) => return Err(e.into()),
                    None => self.should_quit = true,
                },
                event = self.events.recv() => match event {
                    Ok(event) => self.handle_session_event(event),
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        warn!("Missed {} session events", missed);
                        self.refresh_countdown();
                    }
                    Err(broadcast::error::RecvError::Closed) => self.should_quit = true,
                },
                Some(route) = self.routes.recv() => self.handle_route(&route),
                _ = countdown.tick() => self.refresh_countdown(),
                _ = tick.tick() => self.tick = self.tick.wrapping_add(1),
            }
        }

        Ok(())
    }

    /// Handle a terminal event, surfacing failures in the status bar
    ///
    /// A failed action leaves the client running.
    pub fn on_terminal_event(&mut self, event: &Event) {
        if let Err(e) = self.handle_terminal_event(event) {
            warn!("Terminal action failed: {}", e);
            self.state.error_message = Some(e.to_string());
        }
    }

    /// Translate a terminal event and apply the resulting actions
    pub fn handle_terminal_event(&mut self, event: &Event) -> prepper_core::Result<()> {
        for action in self.actions_for_event(event) {
            self.apply(action)?;
        }
        Ok(())
    }

    /// Actions a terminal event maps to in the current state
    ///
    /// While the warning is open only its answers get through; anything else
    /// would count as activity and silently dismiss it.
    pub fn actions_for_event(&self, event: &Event) -> Vec<Action> {
        let key = match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => Some(key),
            _ => None,
        };

        if let Some(key) = key {
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return vec![Action::Quit];
            }
        }

        if self.state.is_warning_open() {
            return match key.map(|k| k.code) {
                Some(KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter) => {
                    vec![Action::AnswerWarning(WarningChoice::StaySignedIn)]
                }
                Some(KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc) => {
                    vec![Action::AnswerWarning(WarningChoice::SignOutNow)]
                }
                _ => Vec::new(),
            };
        }

        let mut actions = Vec::new();
        if self.state.current_screen == Screen::Dashboard {
            if let Some(kind) = events::interaction_for(event) {
                actions.push(Action::Interaction(kind));
            }
        }

        if let Some(key) = key {
            match (self.state.current_screen, key.code) {
                (_, KeyCode::Char('q')) => actions.push(Action::Quit),
                (Screen::Landing, KeyCode::Enter) => actions.push(Action::SignIn),
                (Screen::Dashboard, KeyCode::Char('r')) => actions.push(Action::Refresh),
                (Screen::Dashboard, KeyCode::Char('s')) => actions.push(Action::SignOut),
                _ => {}
            }
        }

        actions
    }

    fn apply(&mut self, action: Action) -> prepper_core::Result<()> {
        match action {
            Action::Interaction(kind) => self.session.interaction(kind),
            Action::SignIn => {
                self.state.clear_messages();
                self.identity.sign_in(&self.user_name)?;
                self.session.set_authenticated(true)
            }
            Action::Refresh => self.session.refresh(),
            Action::SignOut => self.session.sign_out(),
            Action::AnswerWarning(choice) => self.session.answer_warning(choice),
            Action::Quit => {
                self.should_quit = true;
                Ok(())
            }
        }
    }

    /// Update the view from a lifecycle event
    pub fn handle_session_event(&mut self, event: SessionEvent) {
        debug!("Session event: {:?}", event);
        match event {
            SessionEvent::Started { .. } | SessionEvent::Resumed { .. } => {
                self.state.user = self.identity.user();
                self.handle_route(router::DASHBOARD_ROUTE);
                self.refresh_countdown();
            }
            SessionEvent::Reset { .. } => self.refresh_countdown(),
            SessionEvent::WarningRaised { remaining_ms } => {
                self.state.warning = Some(remaining_ms);
                self.state.remaining_ms = remaining_ms;
            }
            SessionEvent::WarningDismissed => {
                self.state.warning = None;
                self.state.status_message = Some("Session extended".to_string());
            }
            SessionEvent::SignedOut { reason } => self.state.signed_out(reason),
        }
    }

    /// Show the screen a route resolves to
    pub fn handle_route(&mut self, route: &str) {
        self.state.current_screen = self.router.push(route);
    }

    /// Re-read the countdown from the store
    pub fn refresh_countdown(&mut self) {
        self.state.remaining_ms = get_remaining(self.store.as_ref(), self.clock.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
    use prepper_core::{
        ManualClock, MemoryStore, SessionController, SessionDriver, SignOutReason,
    };

    use crate::identity::ChannelNavigator;

    struct Harness {
        app: App,
        store: Arc<MemoryStore>,
        clock: Arc<ManualClock>,
        driver: SessionDriver,
    }

    fn harness() -> Harness {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let identity = Arc::new(LocalIdentity::new(store.clone(), false));
        let (navigator, routes) = ChannelNavigator::new();

        let controller = SessionController::new(
            clock.clone(),
            store.clone(),
            identity.clone(),
            Arc::new(navigator),
        );
        let (handle, driver) = SessionDriver::new(controller);
        let app = App::new(
            handle,
            identity,
            store.clone(),
            clock.clone(),
            routes,
            &ClientConfig::default(),
        );

        Harness {
            app,
            store,
            clock,
            driver,
        }
    }

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    fn enter() -> Event {
        Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE))
    }

    #[test]
    fn test_landing_keys() {
        let h = harness();
        assert_eq!(h.app.actions_for_event(&enter()), vec![Action::SignIn]);
        assert_eq!(h.app.actions_for_event(&key('q')), vec![Action::Quit]);
        // Nobody to reset while signed out
        assert!(h.app.actions_for_event(&key('x')).is_empty());
    }

    #[test]
    fn test_dashboard_keys_count_as_activity() {
        let mut h = harness();
        h.app.state.current_screen = Screen::Dashboard;

        assert_eq!(
            h.app.actions_for_event(&key('r')),
            vec![Action::Interaction(Interaction::KeyPress), Action::Refresh]
        );
        assert_eq!(
            h.app.actions_for_event(&key('s')),
            vec![Action::Interaction(Interaction::KeyPress), Action::SignOut]
        );

        let scroll = Event::Mouse(MouseEvent {
            kind: MouseEventKind::ScrollDown,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(
            h.app.actions_for_event(&scroll),
            vec![Action::Interaction(Interaction::Scroll)]
        );
    }

    #[test]
    fn test_warning_is_modal() {
        let mut h = harness();
        h.app.state.current_screen = Screen::Dashboard;
        h.app.state.warning = Some(120_000);

        assert_eq!(
            h.app.actions_for_event(&key('y')),
            vec![Action::AnswerWarning(WarningChoice::StaySignedIn)]
        );
        assert_eq!(
            h.app.actions_for_event(&key('n')),
            vec![Action::AnswerWarning(WarningChoice::SignOutNow)]
        );
        assert!(h.app.actions_for_event(&key('r')).is_empty());

        let click = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        });
        assert!(h.app.actions_for_event(&click).is_empty());

        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(h.app.actions_for_event(&ctrl_c), vec![Action::Quit]);
    }

    #[tokio::test]
    async fn test_sign_in_starts_session() {
        let Harness { mut app, driver, .. } = harness();
        let driver_task = tokio::spawn(driver.run());

        app.handle_terminal_event(&enter()).unwrap();
        assert!(app.identity.user().is_some());

        let event = app.events.recv().await.unwrap();
        assert!(matches!(event, SessionEvent::Started { .. }));
        app.handle_session_event(event);
        assert_eq!(app.state.current_screen, Screen::Dashboard);
        assert_eq!(app.state.remaining_ms, prepper_core::SESSION_TIMEOUT_MS);

        // Dropping the app closes the driver's input channel
        drop(app);
        let controller = driver_task.await.unwrap();
        assert!(!controller.is_authenticated());
    }

    #[tokio::test]
    async fn test_session_events_drive_the_view() {
        let mut h = harness();
        h.app.identity.sign_in("ada").unwrap();
        let start = h.clock.now_millis();
        h.store
            .set(prepper_core::SESSION_STORAGE_KEY, &start.to_string())
            .unwrap();
        h.clock.advance(60_000);

        h.app.handle_session_event(SessionEvent::Started {
            start_epoch_millis: start,
        });
        assert_eq!(h.app.state.current_screen, Screen::Dashboard);
        assert_eq!(h.app.state.user.as_deref(), Some("ada"));
        assert_eq!(h.app.state.remaining_ms, 14 * 60_000);

        h.app
            .handle_session_event(SessionEvent::WarningRaised { remaining_ms: 120_000 });
        assert!(h.app.state.is_warning_open());

        h.app.handle_session_event(SessionEvent::WarningDismissed);
        assert!(!h.app.state.is_warning_open());

        h.app.handle_session_event(SessionEvent::SignedOut {
            reason: SignOutReason::Expired,
        });
        assert_eq!(h.app.state.current_screen, Screen::Landing);
        assert_eq!(h.app.state.remaining_ms, 0);
    }

    #[test]
    fn test_routes_select_screens() {
        let mut h = harness();
        h.app.handle_route("/app");
        assert_eq!(h.app.state.current_screen, Screen::Dashboard);
        h.app.handle_route("/");
        assert_eq!(h.app.state.current_screen, Screen::Landing);
    }

    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> prepper_core::Result<Option<String>> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> prepper_core::Result<()> {
            Err(prepper_core::PrepperError::Store("read-only".to_string()))
        }

        fn remove(&self, _key: &str) -> prepper_core::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_sign_in_is_reported_not_fatal() {
        let store: Arc<dyn KeyValueStore> = Arc::new(ReadOnlyStore);
        let clock: Arc<dyn Clock> = Arc::new(ManualClock::new(0));
        let identity = Arc::new(LocalIdentity::new(store.clone(), false));
        let (navigator, routes) = ChannelNavigator::new();
        let controller = SessionController::new(
            clock.clone(),
            store.clone(),
            identity.clone(),
            Arc::new(navigator),
        );
        let (handle, _driver) = SessionDriver::new(controller);
        let mut app = App::new(handle, identity, store, clock, routes, &ClientConfig::default());

        app.on_terminal_event(&enter());
        assert!(!app.should_quit);
        assert_eq!(app.state.current_screen, Screen::Landing);
        assert_eq!(
            app.state.error_message.as_deref(),
            Some("Store error: read-only")
        );
    }

    #[test]
    fn test_closed_driver_is_reported() {
        let Harness { mut app, driver, .. } = harness();
        drop(driver);
        app.state.current_screen = Screen::Dashboard;

        app.on_terminal_event(&key('r'));
        assert!(!app.should_quit);
        assert_eq!(
            app.state.error_message.as_deref(),
            Some("Session driver is no longer running")
        );
    }

    #[test]
    fn test_quit() {
        let mut h = harness();
        h.app.handle_terminal_event(&key('q')).unwrap();
        assert!(h.app.should_quit);
    }
}
