//! Route-to-screen resolution and navigation history

use super::state::Screen;

/// Route of the signed-in home
pub const DASHBOARD_ROUTE: &str = "/app";

/// Route represents a navigation path
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    /// Path as requested
    pub path: String,
    /// The screen to display
    pub screen: Screen,
}

/// Router maps paths to screens and keeps a short history
pub struct Router {
    landing_route: String,
    /// Navigation history stack
    history: Vec<Route>,
    /// Maximum history depth
    max_depth: usize,
}

impl Router {
    /// Create a router whose unauthenticated entry point is `landing_route`
    pub fn new(landing_route: impl Into<String>) -> Self {
        Self {
            landing_route: landing_route.into(),
            history: Vec::new(),
            max_depth: 20,
        }
    }

    /// Screen a path resolves to
    pub fn resolve(&self, path: &str) -> Option<Screen> {
        if path == self.landing_route {
            return Some(Screen::Landing);
        }
        match path {
            DASHBOARD_ROUTE => Some(Screen::Dashboard),
            _ => None,
        }
    }

    /// Record navigation to `path`; unknown paths fall back to the landing screen
    pub fn push(&mut self, path: &str) -> Screen {
        let screen = self.resolve(path).unwrap_or_else(|| {
            tracing::warn!("Unknown route {}, showing landing screen", path);
            Screen::Landing
        });

        // Limit history depth
        if self.history.len() >= self.max_depth {
            self.history.remove(0);
        }

        self.history.push(Route {
            path: path.to_string(),
            screen,
        });
        screen
    }

    /// Get title for a screen
    pub fn screen_title(screen: Screen) -> &'static str {
        match screen {
            Screen::Landing => "Welcome",
            Screen::Dashboard => "Dashboard",
        }
    }
}
