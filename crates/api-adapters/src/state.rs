//! Shared handler state.

use std::sync::Arc;

use secrecy::SecretString;
use services::Showcase;

#[derive(Clone)]
pub struct AppState {
    pub showcase: Arc<Showcase>,
    /// `None` leaves the admin routes open.
    pub admin_token: Option<SecretString>,
}

impl AppState {
    pub fn new(showcase: Arc<Showcase>, admin_token: Option<SecretString>) -> Self {
        Self {
            showcase,
            admin_token,
        }
    }
}
