use crate::models::{ChannelInfo, PageTokens, PageWindow, SearchHit};
use crate::services::youtube::{ChannelLookup, CreatorSearch, PlatformError};
use log::info;
use std::collections::HashSet;

/// A ranked page of creators together with its pagination envelope.
#[derive(Debug)]
pub struct RankedPage {
    pub creators: Vec<(String, ChannelInfo)>,
    pub window: PageWindow,
    pub tokens: PageTokens,
}

/// Enrich one page of search hits and order it by audience size.
///
/// Hits are deduplicated by channel id before any lookup, so the number of
/// detail calls equals the number of distinct channels on the page. Channels
/// the platform no longer knows contribute no record; any other lookup
/// failure abandons the whole batch.
pub async fn enrich_and_rank<L>(
    hits: &[SearchHit],
    lookup: &L,
) -> Result<Vec<(String, ChannelInfo)>, PlatformError>
where
    L: ChannelLookup + ?Sized,
{
    let mut seen = HashSet::new();
    let mut creators: Vec<(String, ChannelInfo)> = Vec::new();

    for hit in hits {
        if !seen.insert(hit.channel_id.clone()) {
            continue;
        }
        if let Some(info) = lookup.get_channel_info(&hit.channel_id).await? {
            creators.push((hit.channel_id.clone(), info));
        }
    }

    // Stable sort: equal subscriber counts keep their encounter order.
    creators.sort_by(|a, b| b.1.subscribers.cmp(&a.1.subscribers));

    Ok(creators)
}

/// Single-page search: fetch one page, derive its display window and
/// cursors, then enrich and rank the hits.
pub async fn find_top_creators<C>(
    client: &C,
    query: &str,
    search_type: &str,
    results_per_page: u32,
    page_token: Option<&str>,
    region_code: &str,
    current_page: u32,
) -> Result<RankedPage, PlatformError>
where
    C: CreatorSearch + ChannelLookup,
{
    let page = client
        .search(query, search_type, results_per_page, page_token, region_code)
        .await?;

    let window = PageWindow::from_page(
        page.total_results,
        page.results_per_page.unwrap_or(results_per_page),
        current_page,
    );
    info!(
        "total_results: {}, results_per_page: {}, start_index: {}, end_index: {}",
        window.total_results, window.results_per_page, window.start_index, window.end_index
    );

    let creators = enrich_and_rank(&page.hits, client).await?;

    Ok(RankedPage {
        creators,
        window,
        tokens: page.tokens,
    })
}
