//! Common validation utilities for event and group submissions.

use url::Url;
use validator::ValidationError;

/// Maximum number of tags accepted on a single submission.
pub const MAX_TAGS: usize = 20;

/// Maximum length of a single tag, in characters.
pub const MAX_TAG_LENGTH: usize = 50;

/// Validates a tag list: bounded count, each tag non-blank and bounded length.
pub fn validate_tags(tags: &[String]) -> Result<(), ValidationError> {
    if tags.len() > MAX_TAGS {
        let mut err = ValidationError::new("tags_count");
        err.message = Some(format!("At most {} tags are allowed", MAX_TAGS).into());
        return Err(err);
    }

    for tag in tags {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            let mut err = ValidationError::new("tag_blank");
            err.message = Some("Tags cannot be blank".into());
            return Err(err);
        }
        if trimmed.chars().count() > MAX_TAG_LENGTH {
            let mut err = ValidationError::new("tag_length");
            err.message =
                Some(format!("Tags must be at most {} characters", MAX_TAG_LENGTH).into());
            return Err(err);
        }
        if trimmed.contains(',') {
            let mut err = ValidationError::new("tag_comma");
            err.message = Some("Tags cannot contain commas".into());
            return Err(err);
        }
    }

    Ok(())
}

/// Validates that a link is an http(s) URL on meetup.com or a subdomain of it.
pub fn validate_meetup_link(link: &str) -> Result<(), ValidationError> {
    let is_meetup = Url::parse(link)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .and_then(|url| url.host_str().map(|h| h.to_ascii_lowercase()))
        .map(|host| host == "meetup.com" || host.ends_with(".meetup.com"))
        .unwrap_or(false);

    if is_meetup {
        Ok(())
    } else {
        let mut err = ValidationError::new("meetup_link");
        err.message = Some("Meetup link must be a meetup.com URL".into());
        Err(err)
    }
}

/// Validates that a link is an absolute http(s) URL.
pub fn validate_http_url(link: &str) -> Result<(), ValidationError> {
    match Url::parse(link) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => {
            let mut err = ValidationError::new("http_url");
            err.message = Some("Link must be an http or https URL".into());
            Err(err)
        }
    }
}
