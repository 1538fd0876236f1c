use crate::error::Result;
use crate::github::GitHubClient;
use crate::models::UserProfile;

pub async fn fetch_user_profile(gh: &GitHubClient, username: &str) -> Result<UserProfile> {
    tracing::info!(username, "fetching profile");
    gh.get_json(&format!("/users/{}", username)).await
}
