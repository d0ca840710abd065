//! Tri-state auth gate.
//!
//! # Invariants
//! - `Loading` always wins over a known user.
//! - The protected shell is shown only for `Authenticated`.

use log::debug;
use serde::{Deserialize, Serialize};

/// Message shown under the spinner while auth state resolves.
pub const LOADING_MESSAGE: &str = "Loading...";

/// Signed-in user as reported by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Loading,
    Authenticated(AuthUser),
    Unauthenticated,
}

impl AuthState {
    /// Builds the state from the provider's `(user, loading)` pair.
    pub fn from_parts(user: Option<AuthUser>, loading: bool) -> Self {
        match (loading, user) {
            (true, _) => Self::Loading,
            (false, Some(user)) => Self::Authenticated(user),
            (false, None) => Self::Unauthenticated,
        }
    }
}

/// Supplies the current auth state.
pub trait AuthProvider {
    fn auth_state(&self) -> AuthState;
}

/// Which top-level view the shell renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ShellView {
    Spinner { message: &'static str },
    Protected { user: AuthUser },
    Login,
}

impl From<AuthState> for ShellView {
    fn from(value: AuthState) -> Self {
        match value {
            AuthState::Loading => Self::Spinner {
                message: LOADING_MESSAGE,
            },
            AuthState::Authenticated(user) => Self::Protected { user },
            AuthState::Unauthenticated => Self::Login,
        }
    }
}

/// Resolves the shell view from an auth provider.
pub struct AuthGate<P: AuthProvider> {
    provider: P,
}

impl<P: AuthProvider> AuthGate<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn view(&self) -> ShellView {
        let view = ShellView::from(self.provider.auth_state());
        let label = match &view {
            ShellView::Spinner { .. } => "spinner",
            ShellView::Protected { .. } => "protected",
            ShellView::Login => "login",
        };
        debug!("event=auth_gate module=auth status=ok view={label}");
        view
    }
}
