use crate::config::{DOWNLOAD_MAX_RESULTS, RESULTS_PER_PAGE};
use crate::models::{CreatorRecord, PageTokens, PageWindow, UploadedRecord};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageNavError {
    #[error("no next page available")]
    NoNextPage,
    #[error("no previous page available")]
    NoPrevPage,
}

/// Cursor state of the single-page search mode. Holds the tokens reported by
/// the last response and the active cursor for the next request. Performs no
/// I/O itself; the caller re-issues the search after `advance`/`retreat`.
#[derive(Debug)]
pub struct SearchState {
    pub page_info: Option<PageWindow>,
    pub tokens: PageTokens,
    pub page_token: Option<String>,
    pub current_page: u32,
}

impl SearchState {
    pub fn new() -> Self {
        SearchState {
            page_info: None,
            tokens: PageTokens::default(),
            page_token: None,
            current_page: 1,
        }
    }

    /// Forget all cursors, e.g. when a new query is issued.
    pub fn reset(&mut self) {
        *self = SearchState::new();
    }

    pub fn apply_page(&mut self, window: PageWindow, tokens: PageTokens) {
        self.page_info = Some(window);
        self.tokens = tokens;
    }

    pub fn advance(&mut self) -> Result<(), PageNavError> {
        match self.tokens.next.clone() {
            Some(token) => {
                self.page_token = Some(token);
                self.current_page += 1;
                Ok(())
            }
            None => Err(PageNavError::NoNextPage),
        }
    }

    pub fn retreat(&mut self) -> Result<(), PageNavError> {
        match self.tokens.prev.clone() {
            Some(token) => {
                self.page_token = Some(token);
                self.current_page -= 1;
                Ok(())
            }
            None => Err(PageNavError::NoPrevPage),
        }
    }
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new()
    }
}

/// State of an accumulation run. Mutated in place by the download loop and
/// left resumable after every page.
#[derive(Debug)]
pub struct DownloadState {
    pub target_count: usize,
    pub page_token: Option<String>,
    pub accepted: Vec<CreatorRecord>,
    pub datasets: HashMap<String, Vec<UploadedRecord>>,
}

impl DownloadState {
    pub fn new(target_count: usize) -> Self {
        DownloadState {
            target_count,
            page_token: None,
            accepted: Vec::new(),
            datasets: HashMap::new(),
        }
    }

    /// Register a previously exported dataset. Re-registering an existing
    /// name is a no-op.
    pub fn add_dataset(&mut self, name: &str, records: Vec<UploadedRecord>) {
        self.datasets.entry(name.to_string()).or_insert(records);
    }

    pub fn remove_dataset(&mut self, name: &str) -> bool {
        self.datasets.remove(name).is_some()
    }

    pub fn dataset_emails(&self) -> impl Iterator<Item = &str> {
        self.datasets
            .values()
            .flatten()
            .map(|record| record.email.as_str())
    }

    pub fn clear_results(&mut self) {
        self.accepted.clear();
    }
}

pub struct SessionState {
    pub results_per_page: u32,
    pub search: SearchState,
    pub download: DownloadState,
}

impl SessionState {
    pub fn new() -> Self {
        SessionState {
            results_per_page: *RESULTS_PER_PAGE,
            search: SearchState::new(),
            download: DownloadState::new(*DOWNLOAD_MAX_RESULTS),
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
