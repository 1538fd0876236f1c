use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Root aggregate returned by `GET /api/wrapped/{username}`.
///
/// Built fresh per request and never cached; `meta.from_cache` exists for
/// clients but is always `false` in this stateless server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrappedResponse {
    pub username: String,
    pub name: Option<String>,
    pub avatar_url: String,
    pub generated_at: DateTime<Utc>,
    pub meta: ResponseMeta,
    pub basic_stats: BasicStats,
    pub flex_stats: FlexStats,
    pub roast_stats: RoastStats,
    pub timeline: Timeline,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_age_seconds: Option<u64>,
    pub from_cache: bool,
    pub year: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicStats {
    pub total_contributions: u64,
    pub commit_count: u32,
    pub pr_opened: u32,
    pub pr_merged: u32,
    pub issues_opened: u32,
    pub issues_closed: u32,
    pub reviews_given: u32,
    pub repos_contributed_to: u32,
    pub stars_earned: u64,
    pub top_languages: Vec<LanguageStat>,
    pub longest_streak: StreakStat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlexStats {
    pub percentile: u8,
    pub fame_score: u8,
    pub elite_badges: Vec<String>,
    pub forks_received: u64,
    pub collab_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoastStats {
    pub night_owl_pct: u32,
    pub weekend_pct: u32,
    pub commit_message_words: Vec<KeywordCount>,
    pub merge_conflict_survivor: u32,
    pub refactor_ratio: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub activity_by_day: Vec<DayActivity>,
    /// Declared extension point; no collector populates it yet.
    pub language_by_month: Vec<MonthlyLanguage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyLanguage {
    pub month: String,
    pub languages: Vec<LanguageStat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayActivity {
    pub date: NaiveDate,
    pub count: u32,
}

/// Longest contiguous run of days with non-zero activity.
/// `start`/`end` are `None` exactly when `length == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakStat {
    pub length: u32,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageStat {
    pub name: String,
    /// 0–100, one decimal of precision.
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub word: String,
    pub count: u32,
}
