use sha2::{Digest, Sha256};
use std::sync::LazyLock;

/// Where users go to change the image associated with their email
pub const GRAVATAR_EMAILS_URL: &str = "http://gravatar.com/emails";

static GRAVATAR_BASE_URL: LazyLock<String> = LazyLock::new(|| {
    std::env::var("GRAVATAR_BASE_URL")
        .map(|url| url.trim_end_matches('/').to_string())
        .unwrap_or_else(|_| "https://secure.gravatar.com".to_string())
});

fn email_hash(email: &str) -> String {
    format!("{:x}", Sha256::digest(email.trim().to_lowercase().as_bytes()))
}

/// Avatar image URL for an email address
pub fn gravatar_url(email: &str, size: u32) -> String {
    format!(
        "{}/avatar/{}?s={}",
        GRAVATAR_BASE_URL.as_str(),
        email_hash(email),
        size
    )
}
