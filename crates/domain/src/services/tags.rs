//! Tag aggregation across groups and events.

use std::collections::BTreeSet;

use crate::models::{EventWithGroup, Group};

/// Union of every tag on the given groups, events and extra tag list.
///
/// The result is deduplicated and sorted lexicographically, so it does not
/// depend on input order and aggregating twice yields the same list.
pub fn aggregate_tags<'a>(
    groups: impl IntoIterator<Item = &'a Group>,
    events: impl IntoIterator<Item = &'a EventWithGroup>,
    extra_tags: impl IntoIterator<Item = &'a str>,
) -> Vec<String> {
    let mut tags: BTreeSet<&str> = BTreeSet::new();
    tags.extend(
        groups
            .into_iter()
            .flat_map(|g| g.tags.iter().map(String::as_str)),
    );
    tags.extend(
        events
            .into_iter()
            .flat_map(|e| e.event.tags.iter().map(String::as_str)),
    );
    tags.extend(extra_tags);
    tags.into_iter()
        .filter(|t| !t.trim().is_empty())
        .map(str::to_string)
        .collect()
}
