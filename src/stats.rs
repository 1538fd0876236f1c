//! Pure stat reducers: no I/O, plain functions over collected data.

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};

use crate::models::KeywordCount;

/// Keywords scanned in commit messages, in tie-break priority order.
pub const DEFAULT_KEYWORDS: [&str; 7] = ["fix", "bug", "wip", "hack", "temp", "hotfix", "refactor"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TemporalStats {
    pub night_owl_pct: u32,
    pub weekend_pct: u32,
}

fn is_night_owl(ts: &DateTime<Utc>) -> bool {
    ts.hour() < 6
}

fn is_weekend(ts: &DateTime<Utc>) -> bool {
    matches!(ts.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Share of events that happened between midnight and 6am UTC, and on
/// weekends, as integer-rounded percentages. Empty input yields 0/0.
pub fn compute_temporal_stats(timestamps: &[DateTime<Utc>]) -> TemporalStats {
    if timestamps.is_empty() {
        return TemporalStats::default();
    }

    let night = timestamps.iter().filter(|ts| is_night_owl(ts)).count();
    let weekend = timestamps.iter().filter(|ts| is_weekend(ts)).count();
    let total = timestamps.len() as f64;

    TemporalStats {
        night_owl_pct: (night as f64 / total * 100.0).round() as u32,
        weekend_pct: (weekend as f64 / total * 100.0).round() as u32,
    }
}

/// Case-insensitive substring counts over commit messages: each keyword is
/// counted at most once per message, however often it appears inside it.
/// Returns the top 5 by count descending; ties keep keyword-list order.
pub fn count_keywords(messages: &[String], keywords: &[&str]) -> Vec<KeywordCount> {
    let lowered: Vec<String> = messages.iter().map(|m| m.to_lowercase()).collect();

    let mut counts: Vec<KeywordCount> = keywords
        .iter()
        .map(|keyword| KeywordCount {
            word: keyword.to_string(),
            count: lowered.iter().filter(|m| m.contains(keyword)).count() as u32,
        })
        .filter(|k| k.count > 0)
        .collect();

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(5);
    counts
}

/// Bounded, log-damped popularity signal:
/// `round(min(100, log10(1 + stars*2 + forks*3 + contributions) * 20))`.
/// Monotonically non-decreasing in every input, always in [0, 100].
pub fn compute_fame_score(stars: u64, forks: u64, total_contributions: u64) -> u8 {
    let signal = 1.0 + (stars * 2 + forks * 3 + total_contributions) as f64;
    (signal.log10() * 20.0).min(100.0).round() as u8
}
