use chrono::Utc;

use crate::error::Result;
use crate::github::events::EVENTS_PER_PAGE;
use crate::github::repos::REPOS_PER_PAGE;
use crate::github::{contributions, events, profile, repos, GitHubClient};
use crate::models::{
    BasicStats, FlexStats, ResponseMeta, RoastStats, Timeline, WrappedResponse,
};
use crate::stats::{compute_fame_score, compute_temporal_stats, count_keywords, DEFAULT_KEYWORDS};

/// Builds one year-in-review report: four independent fetches issued
/// concurrently, then the pure reducers over the merged data. The first
/// fetch failure fails the whole request; there is no partial result.
pub async fn build_wrapped(
    gh: &GitHubClient,
    username: &str,
    year: i32,
    events_max_pages: u32,
    repos_max_pages: u32,
) -> Result<WrappedResponse> {
    tracing::info!(username, year, "building wrapped report");

    let (profile, calendar, events, repos) = tokio::try_join!(
        profile::fetch_user_profile(gh, username),
        contributions::fetch_contribution_calendar(gh, username, year),
        events::fetch_user_events(gh, username, year, events_max_pages),
        repos::fetch_repo_aggregates(gh, username, repos_max_pages),
    )?;

    let temporal = compute_temporal_stats(&events.event_timestamps);
    let keywords = count_keywords(&events.commit_messages, &DEFAULT_KEYWORDS);
    let fame_score = compute_fame_score(
        repos.stars_earned,
        repos.forks_received,
        calendar.total_contributions,
    );

    let message_count = events.commit_messages.len();
    let merge_mentions = events
        .commit_messages
        .iter()
        .filter(|m| m.to_lowercase().contains("merge"))
        .count() as u32;
    let refactor_mentions = events
        .commit_messages
        .iter()
        .filter(|m| m.to_lowercase().contains("refactor"))
        .count();
    let refactor_ratio = if message_count == 0 {
        0
    } else {
        (refactor_mentions as f64 / message_count as f64 * 100.0).round() as u32
    };

    let mut notes = vec![format!(
        "Event-derived stats cover at most the {} most recent public events.",
        events_max_pages * EVENTS_PER_PAGE
    )];
    if repos.repos_analyzed >= REPOS_PER_PAGE * repos_max_pages {
        notes.push(format!(
            "Language and star totals cover the {} most-starred repositories.",
            repos.repos_analyzed
        ));
    }

    tracing::info!(
        username,
        total_contributions = calendar.total_contributions,
        repos_analyzed = repos.repos_analyzed,
        events_seen = events.event_timestamps.len(),
        "report assembled"
    );

    Ok(WrappedResponse {
        username: profile.login,
        name: profile.name,
        avatar_url: profile.avatar_url,
        generated_at: Utc::now(),
        meta: ResponseMeta {
            cache_age_seconds: None,
            from_cache: false,
            year,
        },
        basic_stats: BasicStats {
            total_contributions: calendar.total_contributions,
            commit_count: events.commit_count,
            pr_opened: events.pr_opened,
            pr_merged: events.pr_merged,
            issues_opened: events.issues_opened,
            issues_closed: events.issues_closed,
            reviews_given: events.reviews_given,
            repos_contributed_to: events.repos_contributed_to(),
            stars_earned: repos.stars_earned,
            top_languages: repos.top_languages,
            longest_streak: calendar.longest_streak,
        },
        flex_stats: FlexStats {
            percentile: fame_score.min(99),
            fame_score,
            // Elite badge derivation never shipped upstream; emitted empty
            // rather than guessing a threshold.
            elite_badges: Vec::new(),
            forks_received: repos.forks_received,
            collab_count: events.repos_contributed_to(),
        },
        roast_stats: RoastStats {
            night_owl_pct: temporal.night_owl_pct,
            weekend_pct: temporal.weekend_pct,
            commit_message_words: keywords,
            merge_conflict_survivor: merge_mentions,
            refactor_ratio,
        },
        timeline: Timeline {
            activity_by_day: calendar.activity_by_day,
            language_by_month: Vec::new(),
        },
        notes,
    })
}
