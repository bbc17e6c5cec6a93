pub mod download;
pub mod search;

pub use download::*;
pub use search::*;

use crate::models::ErrorResponse;
use crate::services::youtube::PlatformError;
use crate::session::PageNavError;

impl From<PlatformError> for ErrorResponse {
    fn from(error: PlatformError) -> Self {
        ErrorResponse::bad_gateway("TransportError", error.to_string())
    }
}

impl From<PageNavError> for ErrorResponse {
    fn from(error: PageNavError) -> Self {
        let name = match error {
            PageNavError::NoNextPage => "NoNextPage",
            PageNavError::NoPrevPage => "NoPrevPage",
        };
        ErrorResponse::bad_request(name, error.to_string())
    }
}
