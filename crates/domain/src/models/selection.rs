//! Filter selection value object.
//!
//! A selection is the combination of group ids, tags and an optional single
//! day that a visitor (or a feed URL) asks for. It is immutable once built.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;
use thiserror::Error;
use url::form_urlencoded;
use uuid::Uuid;

/// Errors raised while reading a selection from query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Invalid group id: {0}")]
    InvalidGroupId(String),
}

/// Groups, tags and date chosen by the user. Empty sets mean "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    group_ids: BTreeSet<Uuid>,
    tags: BTreeSet<String>,
    date: Option<NaiveDate>,
}

impl FilterSelection {
    pub fn new(
        group_ids: impl IntoIterator<Item = Uuid>,
        tags: impl IntoIterator<Item = impl Into<String>>,
        date: Option<NaiveDate>,
    ) -> Self {
        Self {
            group_ids: group_ids.into_iter().collect(),
            tags: tags.into_iter().map(Into::into).collect(),
            date,
        }
    }

    /// Builds a selection from comma-separated `groups` and `tags` values.
    ///
    /// Empty segments are dropped and segments are trimmed. Every remaining
    /// group segment must be a UUID.
    pub fn from_params(
        groups: Option<&str>,
        tags: Option<&str>,
        date: Option<NaiveDate>,
    ) -> Result<Self, SelectionError> {
        let group_ids = split_list(groups)
            .map(|raw| {
                Uuid::parse_str(raw).map_err(|_| SelectionError::InvalidGroupId(raw.to_string()))
            })
            .collect::<Result<BTreeSet<_>, _>>()?;
        let tags = split_list(tags).map(str::to_string).collect();

        Ok(Self {
            group_ids,
            tags,
            date,
        })
    }

    pub fn group_ids(&self) -> &BTreeSet<Uuid> {
        &self.group_ids
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Returns a copy without the date constraint, as used by feeds.
    pub fn without_date(&self) -> Self {
        Self {
            date: None,
            ..self.clone()
        }
    }

    /// True when neither groups nor tags are selected.
    pub fn has_no_category_filters(&self) -> bool {
        self.group_ids.is_empty() && self.tags.is_empty()
    }

    /// Encodes the group and tag parts as `groups=a,b&tags=x,y`.
    ///
    /// Empty categories are omitted; the date is never encoded.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if !self.group_ids.is_empty() {
            let joined = self
                .group_ids
                .iter()
                .map(Uuid::to_string)
                .collect::<Vec<_>>()
                .join(",");
            serializer.append_pair("groups", &joined);
        }
        if !self.tags.is_empty() {
            let joined = self.tags.iter().cloned().collect::<Vec<_>>().join(",");
            serializer.append_pair("tags", &joined);
        }
        serializer.finish()
    }
}

fn split_list(raw: Option<&str>) -> impl Iterator<Item = &str> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
