use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::github::GitHubClient;
use crate::models::{DayActivity, StreakStat};

const CALENDAR_QUERY: &str = r#"
query($username: String!, $from: DateTime!, $to: DateTime!) {
  user(login: $username) {
    contributionsCollection(from: $from, to: $to) {
      contributionCalendar {
        weeks {
          contributionDays {
            date
            contributionCount
          }
        }
      }
    }
  }
}
"#;

#[derive(Debug, Deserialize)]
struct CalendarData {
    user: Option<CalendarUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalendarUser {
    contributions_collection: ContributionsCollection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContributionsCollection {
    contribution_calendar: ContributionCalendar,
}

#[derive(Debug, Deserialize)]
struct ContributionCalendar {
    weeks: Vec<ContributionWeek>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContributionWeek {
    contribution_days: Vec<ContributionDay>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContributionDay {
    date: NaiveDate,
    contribution_count: u32,
}

#[derive(Debug, Clone)]
pub struct CalendarStats {
    pub activity_by_day: Vec<DayActivity>,
    pub longest_streak: StreakStat,
    pub total_contributions: u64,
}

/// Fetches the full-year daily contribution calendar in one GraphQL call.
pub async fn fetch_contribution_calendar(
    gh: &GitHubClient,
    username: &str,
    year: i32,
) -> Result<CalendarStats> {
    let from = format!("{year}-01-01T00:00:00Z");
    let to = format!("{year}-12-31T23:59:59Z");

    tracing::info!(username, year, "fetching contribution calendar");
    let data: CalendarData = gh
        .graphql(
            CALENDAR_QUERY,
            serde_json::json!({ "username": username, "from": from, "to": to }),
        )
        .await?;

    let user = data
        .user
        .ok_or_else(|| Error::UserNotFound(username.to_string()))?;

    let mut days: Vec<DayActivity> = user
        .contributions_collection
        .contribution_calendar
        .weeks
        .into_iter()
        .flat_map(|week| week.contribution_days)
        .map(|day| DayActivity {
            date: day.date,
            count: day.contribution_count,
        })
        .collect();

    // The remote returns weeks chronologically, but the streak scan must not
    // depend on that.
    days.sort_by_key(|day| day.date);

    let longest_streak = compute_streak(&days);
    let total_contributions = days.iter().map(|day| day.count as u64).sum();

    Ok(CalendarStats {
        activity_by_day: days,
        longest_streak,
        total_contributions,
    })
}

/// Longest contiguous run of days with `count > 0`, in one scan. A zero-count
/// day resets the current run without clearing the best one seen so far.
pub fn compute_streak(days: &[DayActivity]) -> StreakStat {
    let mut longest = 0u32;
    let mut current = 0u32;
    let mut current_start: Option<NaiveDate> = None;
    let mut best: Option<(NaiveDate, NaiveDate)> = None;

    for day in days {
        if day.count > 0 {
            if current == 0 {
                current_start = Some(day.date);
            }
            current += 1;
            if current > longest {
                longest = current;
                best = current_start.map(|start| (start, day.date));
            }
        } else {
            current = 0;
            current_start = None;
        }
    }

    StreakStat {
        length: longest,
        start: best.map(|(start, _)| start),
        end: best.map(|(_, end)| end),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(date: &str, count: u32) -> DayActivity {
        DayActivity {
            date: date.parse().unwrap(),
            count,
        }
    }

    #[test]
    fn all_zero_days_yield_empty_streak() {
        let days = vec![day("2024-01-01", 0), day("2024-01-02", 0)];
        let streak = compute_streak(&days);
        assert_eq!(
            streak,
            StreakStat {
                length: 0,
                start: None,
                end: None
            }
        );
    }

    #[test]
    fn empty_input_yields_empty_streak() {
        assert_eq!(compute_streak(&[]).length, 0);
    }

    #[test]
    fn single_run_tracks_bounds() {
        let days = vec![
            day("2024-01-01", 0),
            day("2024-01-02", 3),
            day("2024-01-03", 1),
            day("2024-01-04", 0),
        ];
        let streak = compute_streak(&days);
        assert_eq!(streak.length, 2);
        assert_eq!(streak.start, Some("2024-01-02".parse().unwrap()));
        assert_eq!(streak.end, Some("2024-01-03".parse().unwrap()));
    }

    #[test]
    fn later_longer_run_replaces_earlier_one() {
        let days = vec![
            day("2024-01-01", 1),
            day("2024-01-02", 0),
            day("2024-03-01", 2),
            day("2024-03-02", 2),
            day("2024-03-03", 5),
        ];
        let streak = compute_streak(&days);
        assert_eq!(streak.length, 3);
        assert_eq!(streak.start, Some("2024-03-01".parse().unwrap()));
        assert_eq!(streak.end, Some("2024-03-03".parse().unwrap()));
    }

    #[test]
    fn earlier_run_wins_ties() {
        let days = vec![
            day("2024-01-01", 1),
            day("2024-01-02", 1),
            day("2024-01-03", 0),
            day("2024-02-01", 1),
            day("2024-02-02", 1),
        ];
        let streak = compute_streak(&days);
        assert_eq!(streak.length, 2);
        assert_eq!(streak.start, Some("2024-01-01".parse().unwrap()));
    }

    #[test]
    fn streak_never_exceeds_active_day_count() {
        let days = vec![
            day("2024-01-01", 1),
            day("2024-01-02", 0),
            day("2024-01-03", 1),
            day("2024-01-04", 1),
        ];
        let active = days.iter().filter(|d| d.count > 0).count() as u32;
        let streak = compute_streak(&days);
        assert!(streak.length <= active);
        assert!(streak.start.unwrap() <= streak.end.unwrap());
    }
}
