use serde::Deserialize;
use std::cmp::Ordering;

use crate::error::{Error, Result};
use crate::github::GitHubClient;
use crate::models::LanguageStat;

pub const REPOS_PER_PAGE: u32 = 50;

const REPOS_QUERY: &str = r#"
query($username: String!, $first: Int!, $after: String) {
  user(login: $username) {
    repositories(first: $first, after: $after, ownerAffiliations: OWNER, isFork: false, privacy: PUBLIC, orderBy: {field: STARGAZERS, direction: DESC}) {
      nodes {
        name
        stargazerCount
        forkCount
        languages(first: 5, orderBy: {field: SIZE, direction: DESC}) {
          edges {
            size
            node { name }
          }
        }
      }
      pageInfo {
        hasNextPage
        endCursor
      }
    }
  }
}
"#;

#[derive(Debug, Deserialize)]
struct ReposData {
    user: Option<ReposUser>,
}

#[derive(Debug, Deserialize)]
struct ReposUser {
    repositories: RepositoryPage,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryPage {
    nodes: Vec<RepoNode>,
    page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepoNode {
    stargazer_count: u64,
    fork_count: u64,
    languages: LanguageConnection,
}

#[derive(Debug, Deserialize)]
struct LanguageConnection {
    edges: Vec<LanguageEdge>,
}

#[derive(Debug, Deserialize)]
struct LanguageEdge {
    size: u64,
    node: LanguageNode,
}

#[derive(Debug, Deserialize)]
struct LanguageNode {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RepoAggregates {
    pub top_languages: Vec<LanguageStat>,
    pub repos_analyzed: u32,
    pub stars_earned: u64,
    pub forks_received: u64,
}

/// Cursor-pages through the user's owned, non-fork, public repositories in
/// star order, accumulating per-language byte totals plus star and fork
/// sums. Stops when the remote has no next page or the cumulative repository
/// count reaches `REPOS_PER_PAGE * max_pages`.
pub async fn fetch_repo_aggregates(
    gh: &GitHubClient,
    username: &str,
    max_pages: u32,
) -> Result<RepoAggregates> {
    let budget = REPOS_PER_PAGE * max_pages;
    let mut cursor: Option<String> = None;
    // Vec keeps first-seen order so percentage ties resolve by encounter.
    let mut language_totals: Vec<(String, u64)> = Vec::new();
    let mut stars_earned = 0u64;
    let mut forks_received = 0u64;
    let mut repos_analyzed = 0u32;

    tracing::info!(username, max_pages, "fetching repositories");
    loop {
        let data: ReposData = gh
            .graphql(
                REPOS_QUERY,
                serde_json::json!({
                    "username": username,
                    "first": REPOS_PER_PAGE,
                    "after": cursor,
                }),
            )
            .await?;

        let user = data
            .user
            .ok_or_else(|| Error::UserNotFound(username.to_string()))?;
        let page = user.repositories;

        repos_analyzed += page.nodes.len() as u32;
        for repo in page.nodes {
            stars_earned += repo.stargazer_count;
            forks_received += repo.fork_count;
            for edge in repo.languages.edges {
                match language_totals.iter_mut().find(|(name, _)| *name == edge.node.name) {
                    Some((_, total)) => *total += edge.size,
                    None => language_totals.push((edge.node.name, edge.size)),
                }
            }
        }

        if !page.page_info.has_next_page || repos_analyzed >= budget {
            break;
        }
        cursor = page.page_info.end_cursor;
    }

    Ok(RepoAggregates {
        top_languages: summarize_languages(&language_totals),
        repos_analyzed,
        stars_earned,
        forks_received,
    })
}

/// Reduces per-language byte totals into the top-5 percentage mix, one
/// decimal of precision. Ties keep first-seen order (the sort is stable).
pub fn summarize_languages(totals: &[(String, u64)]) -> Vec<LanguageStat> {
    let grand_total: u64 = totals.iter().map(|(_, size)| size).sum();
    let grand_total = grand_total.max(1);

    let mut stats: Vec<LanguageStat> = totals
        .iter()
        .map(|(name, size)| LanguageStat {
            name: name.clone(),
            percent: (*size as f64 / grand_total as f64 * 1000.0).round() / 10.0,
        })
        .collect();

    stats.sort_by(|a, b| b.percent.partial_cmp(&a.percent).unwrap_or(Ordering::Equal));
    stats.truncate(5);
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(entries: &[(&str, u64)]) -> Vec<(String, u64)> {
        entries.iter().map(|(n, s)| (n.to_string(), *s)).collect()
    }

    #[test]
    fn two_repo_language_mix() {
        // Repo one: {A:300, B:100}; repo two: {A:100, C:100}.
        let merged = totals(&[("A", 400), ("B", 100), ("C", 100)]);
        let stats = summarize_languages(&merged);

        assert_eq!(stats.len(), 3);
        assert_eq!(stats[0], LanguageStat { name: "A".into(), percent: 66.7 });
        assert_eq!(stats[1], LanguageStat { name: "B".into(), percent: 16.7 });
        assert_eq!(stats[2], LanguageStat { name: "C".into(), percent: 16.7 });
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let stats = summarize_languages(&totals(&[("Zig", 100), ("Ada", 100)]));
        assert_eq!(stats[0].name, "Zig");
        assert_eq!(stats[1].name, "Ada");
    }

    #[test]
    fn truncates_to_top_five() {
        let merged = totals(&[
            ("A", 600),
            ("B", 500),
            ("C", 400),
            ("D", 300),
            ("E", 200),
            ("F", 100),
        ]);
        let stats = summarize_languages(&merged);
        assert_eq!(stats.len(), 5);
        assert!(stats.iter().all(|s| s.name != "F"));
    }

    #[test]
    fn empty_totals_produce_no_stats() {
        assert!(summarize_languages(&[]).is_empty());
    }

    #[test]
    fn percentages_stay_bounded() {
        let stats = summarize_languages(&totals(&[("Rust", 123_456)]));
        assert_eq!(stats[0].percent, 100.0);
    }
}
