pub mod api;
pub mod config;
pub mod models;
pub mod services;
pub mod session;
pub mod utils;

use crate::services::youtube::YouTubeClient;
use crate::session::SessionState;
use tokio::sync::Mutex;

pub struct AppState {
    pub youtube: YouTubeClient,
    pub session: Mutex<SessionState>,
}
