use std::env;

pub const GITHUB_API_URL: &str = "https://api.github.com";

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_RETRIES: u32 = 2;
const DEFAULT_RETRY_DELAY_MS: u64 = 500;
const DEFAULT_EVENTS_MAX_PAGES: u32 = 5;
const DEFAULT_REPOS_MAX_PAGES: u32 = 4;

#[derive(Debug, Clone)]
pub struct Config {
    /// Optional bearer token. Absent means unauthenticated requests with
    /// much lower rate limits.
    pub github_token: Option<String>,
    pub api_url: String,
    pub port: u16,
    pub retries: u32,
    pub retry_delay_ms: u64,
    pub events_max_pages: u32,
    pub repos_max_pages: u32,
}

impl Config {
    pub fn from_env() -> Self {
        let github_token = env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty());

        let api_url = env::var("GITHUB_API_URL")
            .ok()
            .unwrap_or_else(|| GITHUB_API_URL.to_string());

        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let retries = env::var("GITHUB_RETRIES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_RETRIES);

        let retry_delay_ms = env::var("GITHUB_RETRY_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_RETRY_DELAY_MS);

        let events_max_pages = env::var("EVENTS_MAX_PAGES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_EVENTS_MAX_PAGES);

        let repos_max_pages = env::var("REPOS_MAX_PAGES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_REPOS_MAX_PAGES);

        Self {
            github_token,
            api_url,
            port,
            retries,
            retry_delay_ms,
            events_max_pages,
            repos_max_pages,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_token: None,
            api_url: GITHUB_API_URL.to_string(),
            port: DEFAULT_PORT,
            retries: DEFAULT_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            events_max_pages: DEFAULT_EVENTS_MAX_PAGES,
            repos_max_pages: DEFAULT_REPOS_MAX_PAGES,
        }
    }
}
