use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("GitHub rate limit reached{}", reset_suffix(.0))]
    RateLimited(Option<DateTime<Utc>>),

    #[error("GitHub GET failed {status}: {body}")]
    Api { status: u16, body: String },

    #[error("GitHub GraphQL failed {status}: {body}")]
    GraphQlApi { status: u16, body: String },

    #[error("GitHub GraphQL errors: {0}")]
    GraphQl(String),

    #[error("GitHub GraphQL: no data in response")]
    NoData,

    #[error("invalid year: {0}")]
    InvalidYear(i32),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

pub type Result<T> = std::result::Result<T, Error>;

fn reset_suffix(reset_at: &Option<DateTime<Utc>>) -> String {
    match reset_at {
        Some(at) => format!("; resets at {}", at.to_rfc3339()),
        None => String::new(),
    }
}

impl Error {
    /// Single classification step used when mapping a failed request to an
    /// HTTP status. GraphQL collectors surface a typed `UserNotFound`; the
    /// REST profile path surfaces a 404 whose body text says "Not Found".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::UserNotFound(_))
            || self.to_string().to_lowercase().contains("not found")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn rate_limited_message_embeds_reset_instant() {
        let reset = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let msg = Error::RateLimited(Some(reset)).to_string();
        assert!(msg.contains("resets at 2024-06-01T12:00:00"), "{msg}");

        let msg = Error::RateLimited(None).to_string();
        assert_eq!(msg, "GitHub rate limit reached");
    }

    #[test]
    fn not_found_classification() {
        assert!(Error::UserNotFound("ghost".into()).is_not_found());
        assert!(Error::Api {
            status: 404,
            body: r#"{"message":"Not Found"}"#.into()
        }
        .is_not_found());
        assert!(!Error::NoData.is_not_found());
        assert!(!Error::Api {
            status: 500,
            body: "boom".into()
        }
        .is_not_found());
    }
}
