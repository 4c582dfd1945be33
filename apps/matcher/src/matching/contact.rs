//! Contact extraction: email address and professional profile URL from resume text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::candidate::{ContactInfo, EMAIL_NOT_FOUND};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());

// A URL runs until whitespace or a closing paren / bracket.
static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://[^\s\)\]]+").unwrap());

const LINKEDIN_MARKER: &str = "linkedin.com/in";
const GITHUB_MARKER: &str = "github.com";

pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_string())
}

/// First LinkedIn profile URL, else first GitHub URL.
pub fn extract_profile_url(text: &str) -> Option<String> {
    let urls: Vec<&str> = URL_RE.find_iter(text).map(|m| m.as_str()).collect();

    urls.iter()
        .find(|url| url.contains(LINKEDIN_MARKER))
        .or_else(|| urls.iter().find(|url| url.contains(GITHUB_MARKER)))
        .map(|url| url.to_string())
}

pub fn extract_contact(text: &str) -> ContactInfo {
    ContactInfo {
        email: extract_email(text).unwrap_or_else(|| EMAIL_NOT_FOUND.to_string()),
        profile_url: extract_profile_url(text).unwrap_or_default(),
    }
}
