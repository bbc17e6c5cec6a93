use crate::config::REGION_CODE;
use crate::models::{
    DatasetResponse, DatasetUpload, DownloadRequest, DownloadResponse, DownloadResultsResponse,
    ErrorResponse, StatusResponse,
};
use crate::services::download::{download_creators, DedupLedger, DownloadOutcome, LogProgress};
use crate::AppState;
use chrono::Utc;
use log::{error, info};
use rocket::serde::json::Json;
use rocket::{delete, get, post, State};

/// Run the accumulation loop against the session's download state. Records
/// accepted before a failure survive in the session and stay exportable.
#[post("/", data = "<request>")]
pub async fn run_download(
    request: Json<DownloadRequest>,
    state: &State<AppState>,
) -> Result<Json<DownloadResponse>, ErrorResponse> {
    if request.query.trim().is_empty() {
        return Err(ErrorResponse::bad_request(
            "EmptyQuery",
            "Please enter a query".to_string(),
        ));
    }

    let mut session = state.session.lock().await;

    if let Some(per_page) = request.results_per_page {
        session.results_per_page = per_page;
    }
    if let Some(target) = request.target_count {
        session.download.target_count = target;
    }

    let search_type = request.search_type.as_deref().unwrap_or("channel");
    let region_code = request
        .region_code
        .clone()
        .unwrap_or_else(|| REGION_CODE.clone());
    let results_per_page = session.results_per_page;

    // Known emails: the uploaded datasets plus anything accepted earlier in
    // this run, so a resumed run cannot re-accept a creator.
    let mut ledger = DedupLedger::seeded_from(session.download.dataset_emails());
    for record in &session.download.accepted {
        ledger.record(&record.email);
    }

    info!("Download progress started.");
    let started_at = Utc::now().to_rfc3339();

    let outcome = download_creators(
        &state.youtube,
        &request.query,
        search_type,
        &region_code,
        results_per_page,
        &mut ledger,
        &mut session.download,
        &LogProgress,
    )
    .await
    .map_err(|e| {
        error!("Download failed: {e}");
        ErrorResponse::from(e)
    })?;

    let finished_at = Utc::now().to_rfc3339();
    info!(
        "Download completed. Total results: {}",
        session.download.accepted.len()
    );

    Ok(Json(DownloadResponse {
        outcome: match outcome {
            DownloadOutcome::TargetReached => "target_reached",
            DownloadOutcome::Exhausted => "exhausted",
        }
        .to_string(),
        accepted: session.download.accepted.len(),
        target: session.download.target_count,
        started_at,
        finished_at,
        results: session.download.accepted.clone(),
    }))
}

#[get("/results")]
pub async fn get_results(state: &State<AppState>) -> Json<DownloadResultsResponse> {
    let session = state.session.lock().await;
    Json(DownloadResultsResponse {
        count: session.download.accepted.len(),
        results: session.download.accepted.clone(),
    })
}

#[delete("/results")]
pub async fn clear_results(state: &State<AppState>) -> Json<StatusResponse> {
    let mut session = state.session.lock().await;
    session.download.clear_results();
    Json(StatusResponse {
        success: true,
        message: "Download results cleared".to_string(),
    })
}

/// Register a previously exported dataset whose emails should be skipped.
#[post("/datasets", data = "<upload>")]
pub async fn add_dataset(
    upload: Json<DatasetUpload>,
    state: &State<AppState>,
) -> Json<DatasetResponse> {
    let mut session = state.session.lock().await;
    let upload = upload.into_inner();

    session.download.add_dataset(&upload.name, upload.records);
    let known_emails = session.download.dataset_emails().count();
    info!("Dataset {} registered, {known_emails} known emails", upload.name);

    Json(DatasetResponse {
        success: true,
        message: format!("Total {known_emails} emails uploaded"),
        known_emails,
    })
}

#[delete("/datasets/<name>")]
pub async fn remove_dataset(
    name: &str,
    state: &State<AppState>,
) -> Result<Json<StatusResponse>, ErrorResponse> {
    let mut session = state.session.lock().await;

    if session.download.remove_dataset(name) {
        Ok(Json(StatusResponse {
            success: true,
            message: format!("Removed dataset {name}"),
        }))
    } else {
        Err(ErrorResponse::bad_request(
            "UnknownDataset",
            format!("No dataset named {name}"),
        ))
    }
}
