use crate::models::{CreatorRecord, EMAIL_NOT_FOUND};
use crate::services::discovery::enrich_and_rank;
use crate::services::youtube::{ChannelLookup, CreatorSearch, PlatformError};
use crate::session::DownloadState;
use crate::utils::extract_email;
use log::info;
use std::collections::HashSet;

/// Emails already tied to a creator, across uploaded datasets and the
/// current run. The `"Not found"` sentinel is never stored and never counts
/// as a duplicate.
#[derive(Debug, Default)]
pub struct DedupLedger {
    emails: HashSet<String>,
}

impl DedupLedger {
    pub fn new() -> Self {
        DedupLedger {
            emails: HashSet::new(),
        }
    }

    pub fn seeded_from<'a, I>(emails: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut ledger = DedupLedger::new();
        for email in emails {
            ledger.record(email);
        }
        ledger
    }

    pub fn seen(&self, email: &str) -> bool {
        self.emails.contains(email)
    }

    pub fn record(&mut self, email: &str) {
        if email != EMAIL_NOT_FOUND {
            self.emails.insert(email.to_string());
        }
    }

    pub fn is_acceptable(&self, email: &str) -> bool {
        email != EMAIL_NOT_FOUND && !self.seen(email)
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

/// Invoked after every accepted record. Must return promptly; it gates the
/// loop's forward progress.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, accepted: usize, target: usize);
}

/// Reports progress to the application log.
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn report(&self, accepted: usize, target: usize) {
        info!("Downloaded {accepted} out of {target} results");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The target count was met; no further pages were requested.
    TargetReached,
    /// The platform ran out of pages before the target was met.
    Exhausted,
}

/// Accumulate creators with extractable contact emails until the target
/// count is met or the platform runs out of pages.
///
/// `state` is mutated in place and stays resumable after every page: the
/// next-page cursor is threaded into it before the loop decides whether to
/// continue, and a failed page commits nothing.
#[allow(clippy::too_many_arguments)]
pub async fn download_creators<C>(
    client: &C,
    query: &str,
    search_type: &str,
    region_code: &str,
    results_per_page: u32,
    ledger: &mut DedupLedger,
    state: &mut DownloadState,
    reporter: &dyn ProgressReporter,
) -> Result<DownloadOutcome, PlatformError>
where
    C: CreatorSearch + ChannelLookup,
{
    loop {
        if state.accepted.len() >= state.target_count {
            return Ok(DownloadOutcome::TargetReached);
        }

        let page = client
            .search(
                query,
                search_type,
                results_per_page,
                state.page_token.as_deref(),
                region_code,
            )
            .await?;

        let ranked = enrich_and_rank(&page.hits, client).await?;

        for (channel_id, info) in ranked {
            let email = extract_email(&info.description);
            if !ledger.is_acceptable(&email) {
                continue;
            }

            ledger.record(&email);
            state.accepted.push(CreatorRecord {
                channel_id,
                email,
                info,
            });
            reporter.report(state.accepted.len(), state.target_count);

            if state.accepted.len() >= state.target_count {
                break;
            }
        }

        state.page_token = page.tokens.next.clone();

        if state.accepted.len() >= state.target_count {
            return Ok(DownloadOutcome::TargetReached);
        }
        if state.page_token.is_none() {
            return Ok(DownloadOutcome::Exhausted);
        }
    }
}
