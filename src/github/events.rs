use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::github::GitHubClient;

pub const EVENTS_PER_PAGE: u32 = 100;

/// One entry from the public-events feed. `payload` fields are all optional
/// because each event type populates a different subset.
#[derive(Debug, Deserialize)]
pub struct UserEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub created_at: DateTime<Utc>,
    pub repo: Option<EventRepo>,
    #[serde(default)]
    pub payload: EventPayload,
}

#[derive(Debug, Deserialize)]
pub struct EventRepo {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct EventPayload {
    pub action: Option<String>,
    pub commits: Option<Vec<PushCommit>>,
    pub pull_request: Option<PullRequestRef>,
}

#[derive(Debug, Deserialize)]
pub struct PushCommit {
    /// Kept as a raw value: the feed occasionally carries non-string
    /// messages, which count toward the commit total but are not collected.
    #[serde(default)]
    pub message: Value,
}

#[derive(Debug, Deserialize)]
pub struct PullRequestRef {
    #[serde(default)]
    pub merged: bool,
}

/// Accumulated counters over one year's worth of the event feed.
#[derive(Debug, Default)]
pub struct EventStats {
    pub commit_count: u32,
    pub pr_opened: u32,
    pub pr_merged: u32,
    pub issues_opened: u32,
    pub issues_closed: u32,
    pub reviews_given: u32,
    pub repos: HashSet<String>,
    pub event_timestamps: Vec<DateTime<Utc>>,
    pub commit_messages: Vec<String>,
}

impl EventStats {
    pub fn repos_contributed_to(&self) -> u32 {
        self.repos.len() as u32
    }

    /// Classifies one in-window event. Unrecognized types still contribute
    /// to the repo set and timestamp sequence.
    fn record(&mut self, event: &UserEvent) {
        self.event_timestamps.push(event.created_at);
        if let Some(repo) = &event.repo {
            self.repos.insert(repo.name.clone());
        }

        match event.kind.as_str() {
            "PushEvent" => {
                if let Some(commits) = &event.payload.commits {
                    self.commit_count += commits.len() as u32;
                    for commit in commits {
                        if let Some(message) = commit.message.as_str() {
                            self.commit_messages.push(message.to_string());
                        }
                    }
                }
            }
            "PullRequestEvent" => match event.payload.action.as_deref() {
                Some("opened") => self.pr_opened += 1,
                Some("closed") => {
                    if event.payload.pull_request.as_ref().is_some_and(|pr| pr.merged) {
                        self.pr_merged += 1;
                    }
                }
                _ => {}
            },
            "IssuesEvent" => match event.payload.action.as_deref() {
                Some("opened") => self.issues_opened += 1,
                Some("closed") => self.issues_closed += 1,
                _ => {}
            },
            "PullRequestReviewEvent" => {
                if event.payload.action.as_deref() == Some("submitted") {
                    self.reviews_given += 1;
                }
            }
            "PullRequestReviewCommentEvent" => self.reviews_given += 1,
            _ => {}
        }
    }
}

pub fn year_window(year: i32) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let start = Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single();
    let end = Utc.with_ymd_and_hms(year, 12, 31, 23, 59, 59).single();
    match (start, end) {
        (Some(start), Some(end)) => Ok((start, end)),
        _ => Err(Error::InvalidYear(year)),
    }
}

/// Pages through the reverse-chronological public-event feed, classifying
/// in-window events, up to `max_pages` pages of 100.
///
/// The feed's ordering makes the first event before the year start a proof
/// that everything after it is out of window too, so the scan returns right
/// there. Future-dated events are skipped without breaking pagination. Note
/// the feed itself retains only the most recent events, so the accumulator
/// may under-count a very active year regardless of the page budget.
pub async fn fetch_user_events(
    gh: &GitHubClient,
    username: &str,
    year: i32,
    max_pages: u32,
) -> Result<EventStats> {
    let (year_start, year_end) = year_window(year)?;
    let mut stats = EventStats::default();

    tracing::info!(username, year, max_pages, "fetching public events");
    for page in 1..=max_pages {
        let events: Vec<UserEvent> = gh
            .get_json(&format!(
                "/users/{username}/events/public?per_page={EVENTS_PER_PAGE}&page={page}"
            ))
            .await?;
        if events.is_empty() {
            break;
        }

        for event in &events {
            if event.created_at < year_start {
                return Ok(stats);
            }
            if event.created_at > year_end {
                continue;
            }
            stats.record(event);
        }
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(value: Value) -> UserEvent {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn push_event_counts_commits_and_collects_messages() {
        let mut stats = EventStats::default();
        stats.record(&event(json!({
            "type": "PushEvent",
            "created_at": "2024-03-02T12:00:00Z",
            "repo": { "name": "octocat/hello" },
            "payload": {
                "commits": [
                    { "message": "fix parser" },
                    { "message": "add tests" },
                    { "message": "tidy up" }
                ]
            }
        })));

        assert_eq!(stats.commit_count, 3);
        assert_eq!(stats.commit_messages.len(), 3);
        assert_eq!(stats.repos_contributed_to(), 1);
        assert_eq!(stats.event_timestamps.len(), 1);
    }

    #[test]
    fn non_string_commit_message_is_skipped_but_still_counted() {
        let mut stats = EventStats::default();
        stats.record(&event(json!({
            "type": "PushEvent",
            "created_at": "2024-03-02T12:00:00Z",
            "repo": { "name": "octocat/hello" },
            "payload": {
                "commits": [
                    { "message": "real message" },
                    { "message": 42 },
                    {}
                ]
            }
        })));

        assert_eq!(stats.commit_count, 3);
        assert_eq!(stats.commit_messages, vec!["real message".to_string()]);
    }

    #[test]
    fn pull_request_classification() {
        let mut stats = EventStats::default();
        stats.record(&event(json!({
            "type": "PullRequestEvent",
            "created_at": "2024-03-02T12:00:00Z",
            "repo": { "name": "octocat/hello" },
            "payload": { "action": "opened" }
        })));
        stats.record(&event(json!({
            "type": "PullRequestEvent",
            "created_at": "2024-03-03T12:00:00Z",
            "repo": { "name": "octocat/hello" },
            "payload": { "action": "closed", "pull_request": { "merged": true } }
        })));
        stats.record(&event(json!({
            "type": "PullRequestEvent",
            "created_at": "2024-03-04T12:00:00Z",
            "repo": { "name": "octocat/hello" },
            "payload": { "action": "closed", "pull_request": { "merged": false } }
        })));

        assert_eq!(stats.pr_opened, 1);
        assert_eq!(stats.pr_merged, 1);
    }

    #[test]
    fn review_events() {
        let mut stats = EventStats::default();
        stats.record(&event(json!({
            "type": "PullRequestReviewEvent",
            "created_at": "2024-03-02T12:00:00Z",
            "repo": { "name": "octocat/hello" },
            "payload": { "action": "submitted" }
        })));
        stats.record(&event(json!({
            "type": "PullRequestReviewEvent",
            "created_at": "2024-03-02T13:00:00Z",
            "repo": { "name": "octocat/hello" },
            "payload": { "action": "dismissed" }
        })));
        stats.record(&event(json!({
            "type": "PullRequestReviewCommentEvent",
            "created_at": "2024-03-02T14:00:00Z",
            "repo": { "name": "octocat/hello" },
            "payload": { "action": "created" }
        })));

        assert_eq!(stats.reviews_given, 2);
    }

    #[test]
    fn issues_classification() {
        let mut stats = EventStats::default();
        stats.record(&event(json!({
            "type": "IssuesEvent",
            "created_at": "2024-05-01T09:00:00Z",
            "repo": { "name": "octocat/hello" },
            "payload": { "action": "opened" }
        })));
        stats.record(&event(json!({
            "type": "IssuesEvent",
            "created_at": "2024-05-02T09:00:00Z",
            "repo": { "name": "octocat/hello" },
            "payload": { "action": "closed" }
        })));

        assert_eq!(stats.issues_opened, 1);
        assert_eq!(stats.issues_closed, 1);
    }

    #[test]
    fn unrecognized_type_still_tracks_repo_and_timestamp() {
        let mut stats = EventStats::default();
        stats.record(&event(json!({
            "type": "WatchEvent",
            "created_at": "2024-03-02T12:00:00Z",
            "repo": { "name": "octocat/watched" },
            "payload": { "action": "started" }
        })));

        assert_eq!(stats.commit_count, 0);
        assert_eq!(stats.reviews_given, 0);
        assert_eq!(stats.repos_contributed_to(), 1);
        assert_eq!(stats.event_timestamps.len(), 1);
    }

    #[test]
    fn year_window_bounds() {
        let (start, end) = year_window(2024).unwrap();
        assert_eq!(start.to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2024-12-31T23:59:59+00:00");
    }
}
