#[macro_use]
extern crate rocket;

use backend::config::{create_cors, init_logger, load_environment};
use backend::services::youtube::YouTubeClient;
use backend::session::SessionState;
use backend::{api, AppState};
use tokio::sync::Mutex;

#[launch]
fn rocket() -> _ {
    load_environment();
    init_logger();

    let state = AppState {
        youtube: YouTubeClient::new(),
        session: Mutex::new(SessionState::new()),
    };

    let cors = create_cors().expect("Failed to create CORS options");

    rocket::build()
        .manage(state)
        .mount(
            "/api/search",
            routes![api::search_creators, api::search_next, api::search_prev],
        )
        .mount(
            "/api/download",
            routes![
                api::run_download,
                api::get_results,
                api::clear_results,
                api::add_dataset,
                api::remove_dataset
            ],
        )
        .attach(cors)
}
