use rocket::http::{ContentType, Status};
use rocket::request::Request;
use rocket::response::Responder;
use rocket::serde::{Deserialize, Serialize};
use rocket::{response, Response};
use std::io::Cursor;

/// Sentinel returned when a channel description carries no address.
pub const EMAIL_NOT_FOUND: &str = "Not found";

/// Sentinel for channels without an accessible upload playlist.
pub const NO_LATEST_VIDEO: &str = "None";

/// One raw match returned by a keyword search. Identity is the channel id;
/// the snippet is carried opaquely and never inspected beyond that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub channel_id: String,
    pub snippet: serde_json::Value,
}

/// Opaque forward/backward cursors issued by the platform.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageTokens {
    pub next: Option<String>,
    pub prev: Option<String>,
}

/// The visible range of the current results page.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageWindow {
    pub total_results: u64,
    pub results_per_page: u32,
    pub current_page: u32,
    pub start_index: u64,
    pub end_index: u64,
}

impl PageWindow {
    /// `start_index > end_index` only when there are no results at all.
    pub fn from_page(total_results: u64, results_per_page: u32, current_page: u32) -> Self {
        let start_index = (current_page as u64).saturating_sub(1) * results_per_page as u64 + 1;
        let end_index = (start_index + results_per_page as u64 - 1).min(total_results);

        PageWindow {
            total_results,
            results_per_page,
            current_page,
            start_index,
            end_index,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub title: String,
    pub owner_name: String,
    pub country: String,
    pub description: String,
    pub created_at: String,
    pub subscribers: u64,
    pub video_count: u64,
    pub view_count: u64,
    pub latest_video_updated_at: String,
}

/// A fully-enriched creator accepted in download mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatorRecord {
    pub channel_id: String,
    pub email: String,
    pub info: ChannelInfo,
}

/// One row of a previously exported dataset. Only the `Email` column is
/// consumed; values are taken verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedRecord {
    #[serde(rename = "Email")]
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub search_type: Option<String>,
    pub region_code: Option<String>,
    pub results_per_page: Option<u32>,
}

/// One display row of the search table.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatorRow {
    pub index: u64,
    pub channel_id: String,
    pub title: String,
    pub owner_name: String,
    pub subscribers: String,
    pub videos: String,
    pub views: String,
    pub email: String,
    pub updated: String,
    pub created: String,
    pub country: String,
    pub link: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub creators: Vec<CreatorRow>,
    pub page: PageWindow,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub query: String,
    pub search_type: Option<String>,
    pub region_code: Option<String>,
    pub results_per_page: Option<u32>,
    pub target_count: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DownloadResponse {
    pub outcome: String,
    pub accepted: usize,
    pub target: usize,
    pub started_at: String,
    pub finished_at: String,
    pub results: Vec<CreatorRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DownloadResultsResponse {
    pub count: usize,
    pub results: Vec<CreatorRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatasetUpload {
    pub name: String,
    pub records: Vec<UploadedRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatasetResponse {
    pub success: bool,
    pub message: String,
    pub known_emails: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip)]
    pub status: Status,
}

impl ErrorResponse {
    pub fn bad_request(error: &str, message: String) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message,
            status: Status::BadRequest,
        }
    }

    pub fn bad_gateway(error: &str, message: String) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message,
            status: Status::BadGateway,
        }
    }
}

impl<'r> Responder<'r, 'static> for ErrorResponse {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let json = serde_json::to_string(&self).unwrap();
        Response::build()
            .status(self.status)
            .header(ContentType::JSON)
            .sized_body(json.len(), Cursor::new(json))
            .ok()
    }
}
