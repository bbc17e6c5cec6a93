use async_trait::async_trait;
use backend::models::{ChannelInfo, PageTokens, SearchHit};
use backend::services::download::{
    download_creators, DedupLedger, DownloadOutcome, ProgressReporter,
};
use backend::services::youtube::{ChannelLookup, CreatorSearch, PlatformError, SearchPage};
use backend::session::DownloadState;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

struct ScriptedPage {
    hits: Vec<&'static str>,
    next: Option<&'static str>,
    fail: bool,
}

/// In-memory platform client scripted with a fixed sequence of pages keyed
/// by the cursor used to request them. Fetching an unscripted page panics,
/// which doubles as the "no further page requests" assertion.
struct ScriptedPlatform {
    pages: HashMap<Option<String>, ScriptedPage>,
    channels: HashMap<String, ChannelInfo>,
    search_calls: Mutex<usize>,
    lookups: Mutex<Vec<String>>,
}

impl ScriptedPlatform {
    fn new(
        pages: Vec<(Option<&'static str>, ScriptedPage)>,
        channels: Vec<(&'static str, ChannelInfo)>,
    ) -> Self {
        ScriptedPlatform {
            pages: pages
                .into_iter()
                .map(|(token, page)| (token.map(String::from), page))
                .collect(),
            channels: channels
                .into_iter()
                .map(|(id, info)| (id.to_string(), info))
                .collect(),
            search_calls: Mutex::new(0),
            lookups: Mutex::new(Vec::new()),
        }
    }

    fn search_calls(&self) -> usize {
        *self.search_calls.lock().unwrap()
    }
}

#[async_trait]
impl CreatorSearch for ScriptedPlatform {
    async fn search(
        &self,
        _query: &str,
        _search_type: &str,
        _results_per_page: u32,
        page_token: Option<&str>,
        _region_code: &str,
    ) -> Result<SearchPage, PlatformError> {
        *self.search_calls.lock().unwrap() += 1;

        let key = page_token.map(String::from);
        let page = self
            .pages
            .get(&key)
            .unwrap_or_else(|| panic!("unexpected fetch with cursor {key:?}"));

        if page.fail {
            return Err(PlatformError::Api {
                status: 403,
                message: "quota exceeded".to_string(),
            });
        }

        Ok(SearchPage {
            hits: page
                .hits
                .iter()
                .map(|id| SearchHit {
                    channel_id: id.to_string(),
                    snippet: serde_json::Value::Null,
                })
                .collect(),
            total_results: self.channels.len() as u64,
            results_per_page: Some(page.hits.len() as u32),
            tokens: PageTokens {
                next: page.next.map(String::from),
                prev: None,
            },
        })
    }
}

#[async_trait]
impl ChannelLookup for ScriptedPlatform {
    async fn get_channel_info(
        &self,
        channel_id: &str,
    ) -> Result<Option<ChannelInfo>, PlatformError> {
        self.lookups.lock().unwrap().push(channel_id.to_string());
        Ok(self.channels.get(channel_id).cloned())
    }
}

#[derive(Default)]
struct CountingReporter {
    calls: Mutex<Vec<(usize, usize)>>,
}

impl ProgressReporter for CountingReporter {
    fn report(&self, accepted: usize, target: usize) {
        self.calls.lock().unwrap().push((accepted, target));
    }
}

fn channel(description: &str, subscribers: u64) -> ChannelInfo {
    ChannelInfo {
        title: String::new(),
        owner_name: "Unknown".to_string(),
        country: "Unknown".to_string(),
        description: description.to_string(),
        created_at: String::new(),
        subscribers,
        video_count: 0,
        view_count: 0,
        latest_video_updated_at: "None".to_string(),
    }
}

async fn run(
    platform: &ScriptedPlatform,
    ledger: &mut DedupLedger,
    state: &mut DownloadState,
    reporter: &CountingReporter,
) -> Result<DownloadOutcome, PlatformError> {
    download_creators(platform, "vlog", "channel", "KR", 3, ledger, state, reporter).await
}

#[tokio::test]
async fn reaches_target_across_two_pages_without_a_third_fetch() {
    // One channel repeats across the pages, one has no extractable email.
    let platform = ScriptedPlatform::new(
        vec![
            (
                None,
                ScriptedPage {
                    hits: vec!["alpha", "beta", "gamma"],
                    next: Some("p2"),
                    fail: false,
                },
            ),
            (
                Some("p2"),
                ScriptedPage {
                    hits: vec!["gamma", "delta", "epsilon"],
                    next: Some("p3"),
                    fail: false,
                },
            ),
        ],
        vec![
            ("alpha", channel("mail me: alpha@example.com", 100)),
            ("beta", channel("no contact info here", 90)),
            ("gamma", channel("biz: gamma@example.com", 80)),
            ("delta", channel("delta@example.com", 70)),
            ("epsilon", channel("epsilon@example.com", 60)),
        ],
    );

    let mut ledger = DedupLedger::new();
    let mut state = DownloadState::new(4);
    let reporter = CountingReporter::default();

    let outcome = run(&platform, &mut ledger, &mut state, &reporter)
        .await
        .unwrap();

    assert_eq!(outcome, DownloadOutcome::TargetReached);
    assert_eq!(state.accepted.len(), 4);
    assert_eq!(platform.search_calls(), 2);

    let emails: HashSet<&str> = state.accepted.iter().map(|r| r.email.as_str()).collect();
    assert_eq!(emails.len(), 4, "accepted records must not share emails");

    // Three distinct channels per page; the repeat across pages is looked up
    // again because enrichment never caches across calls.
    assert_eq!(platform.lookups.lock().unwrap().len(), 6);

    assert_eq!(
        reporter.calls.lock().unwrap().as_slice(),
        &[(1, 4), (2, 4), (3, 4), (4, 4)]
    );
}

#[tokio::test]
async fn stops_scanning_mid_page_once_target_is_met() {
    let platform = ScriptedPlatform::new(
        vec![(
            None,
            ScriptedPage {
                hits: vec!["alpha", "beta", "gamma"],
                next: Some("p2"),
                fail: false,
            },
        )],
        vec![
            ("alpha", channel("alpha@example.com", 100)),
            ("beta", channel("beta@example.com", 90)),
            ("gamma", channel("gamma@example.com", 80)),
        ],
    );

    let mut ledger = DedupLedger::new();
    let mut state = DownloadState::new(2);
    let reporter = CountingReporter::default();

    let outcome = run(&platform, &mut ledger, &mut state, &reporter)
        .await
        .unwrap();

    assert_eq!(outcome, DownloadOutcome::TargetReached);
    assert_eq!(state.accepted.len(), 2);
    assert_eq!(platform.search_calls(), 1);
    assert_eq!(platform.lookups.lock().unwrap().len(), 3);
    assert_eq!(state.accepted[0].email, "alpha@example.com");
    assert_eq!(state.accepted[1].email, "beta@example.com");
}

#[tokio::test]
async fn exhausts_when_no_next_token_is_issued() {
    let platform = ScriptedPlatform::new(
        vec![(
            None,
            ScriptedPage {
                hits: vec!["alpha", "beta"],
                next: None,
                fail: false,
            },
        )],
        vec![
            ("alpha", channel("alpha@example.com", 100)),
            ("beta", channel("nothing to extract", 90)),
        ],
    );

    let mut ledger = DedupLedger::new();
    let mut state = DownloadState::new(5);
    let reporter = CountingReporter::default();

    let outcome = run(&platform, &mut ledger, &mut state, &reporter)
        .await
        .unwrap();

    assert_eq!(outcome, DownloadOutcome::Exhausted);
    assert_eq!(state.accepted.len(), 1);
    assert!(state.page_token.is_none());
}

#[tokio::test]
async fn failed_page_commits_nothing_and_stays_resumable() {
    let platform = ScriptedPlatform::new(
        vec![
            (
                None,
                ScriptedPage {
                    hits: vec!["alpha", "beta"],
                    next: Some("p2"),
                    fail: false,
                },
            ),
            (
                Some("p2"),
                ScriptedPage {
                    hits: vec![],
                    next: None,
                    fail: true,
                },
            ),
        ],
        vec![
            ("alpha", channel("alpha@example.com", 100)),
            ("beta", channel("beta@example.com", 90)),
        ],
    );

    let mut ledger = DedupLedger::new();
    let mut state = DownloadState::new(5);
    let reporter = CountingReporter::default();

    let result = run(&platform, &mut ledger, &mut state, &reporter).await;

    assert!(result.is_err());
    assert_eq!(state.accepted.len(), 2, "page one results survive the failure");
    assert_eq!(
        state.page_token.as_deref(),
        Some("p2"),
        "the failed page can be retried"
    );
}

#[tokio::test]
async fn seeded_emails_are_never_accepted_again() {
    let platform = ScriptedPlatform::new(
        vec![(
            None,
            ScriptedPage {
                hits: vec!["alpha", "gamma"],
                next: None,
                fail: false,
            },
        )],
        vec![
            ("alpha", channel("alpha@example.com", 100)),
            ("gamma", channel("gamma@example.com", 80)),
        ],
    );

    let mut ledger = DedupLedger::seeded_from(["alpha@example.com"]);
    let mut state = DownloadState::new(5);
    let reporter = CountingReporter::default();

    let outcome = run(&platform, &mut ledger, &mut state, &reporter)
        .await
        .unwrap();

    assert_eq!(outcome, DownloadOutcome::Exhausted);
    assert_eq!(state.accepted.len(), 1);
    assert_eq!(state.accepted[0].email, "gamma@example.com");
}

#[tokio::test]
async fn already_met_target_issues_no_requests() {
    let platform = ScriptedPlatform::new(vec![], vec![]);

    let mut ledger = DedupLedger::new();
    let mut state = DownloadState::new(0);
    let reporter = CountingReporter::default();

    let outcome = run(&platform, &mut ledger, &mut state, &reporter)
        .await
        .unwrap();

    assert_eq!(outcome, DownloadOutcome::TargetReached);
    assert_eq!(platform.search_calls(), 0);
}
