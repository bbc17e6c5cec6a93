use crate::config::REGION_CODE;
use crate::models::{CreatorRow, ErrorResponse, SearchRequest, SearchResponse};
use crate::services::discovery::find_top_creators;
use crate::services::youtube::YouTubeClient;
use crate::session::SessionState;
use crate::utils::{channel_link, extract_email, format_number};
use crate::AppState;
use log::{error, info};
use rocket::serde::json::Json;
use rocket::{post, State};

/// Start a new search. Any previous pagination state is forgotten.
#[post("/", data = "<request>")]
pub async fn search_creators(
    request: Json<SearchRequest>,
    state: &State<AppState>,
) -> Result<Json<SearchResponse>, ErrorResponse> {
    let mut session = state.session.lock().await;

    session.search.reset();
    if let Some(per_page) = request.results_per_page {
        session.results_per_page = per_page;
    }

    run_search(&state.youtube, &request, &mut session).await
}

#[post("/next", data = "<request>")]
pub async fn search_next(
    request: Json<SearchRequest>,
    state: &State<AppState>,
) -> Result<Json<SearchResponse>, ErrorResponse> {
    let mut session = state.session.lock().await;

    session.search.advance()?;
    info!("Pagination: moved to page {}", session.search.current_page);

    run_search(&state.youtube, &request, &mut session).await
}

#[post("/prev", data = "<request>")]
pub async fn search_prev(
    request: Json<SearchRequest>,
    state: &State<AppState>,
) -> Result<Json<SearchResponse>, ErrorResponse> {
    let mut session = state.session.lock().await;

    session.search.retreat()?;
    info!("Pagination: moved to page {}", session.search.current_page);

    run_search(&state.youtube, &request, &mut session).await
}

async fn run_search(
    youtube: &YouTubeClient,
    request: &SearchRequest,
    session: &mut SessionState,
) -> Result<Json<SearchResponse>, ErrorResponse> {
    if request.query.trim().is_empty() {
        return Err(ErrorResponse::bad_request(
            "EmptyQuery",
            "Please enter a query".to_string(),
        ));
    }

    let search_type = request.search_type.as_deref().unwrap_or("channel");
    let region_code = request
        .region_code
        .clone()
        .unwrap_or_else(|| REGION_CODE.clone());
    let results_per_page = session.results_per_page;

    let page = find_top_creators(
        youtube,
        &request.query,
        search_type,
        results_per_page,
        session.search.page_token.as_deref(),
        &region_code,
        session.search.current_page,
    )
    .await
    .map_err(|e| {
        error!("Search failed: {e}");
        ErrorResponse::from(e)
    })?;

    session.search.apply_page(page.window, page.tokens.clone());

    let index_base = page.window.start_index - 1;
    let creators = page
        .creators
        .into_iter()
        .enumerate()
        .map(|(i, (channel_id, info))| CreatorRow {
            index: index_base + i as u64 + 1,
            link: channel_link(&channel_id),
            email: extract_email(&info.description),
            subscribers: format_number(info.subscribers),
            videos: format_number(info.video_count),
            views: format_number(info.view_count),
            title: info.title,
            owner_name: info.owner_name,
            updated: info.latest_video_updated_at,
            created: info.created_at,
            country: info.country,
            channel_id,
        })
        .collect();

    Ok(Json(SearchResponse {
        creators,
        page: page.window,
        has_next: session.search.tokens.next.is_some(),
        has_prev: session.search.tokens.prev.is_some(),
    }))
}
