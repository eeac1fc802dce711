//! Selection predicate engine.
//!
//! Group and tag filters combine with OR: an event passes if it matches any
//! selected group or any selected tag. The date filter is an AND on top.

use crate::models::{EventWithGroup, FilterSelection};

/// Decides whether an already-visible event matches the selection.
pub fn matches_selection(item: &EventWithGroup, selection: &FilterSelection) -> bool {
    if let Some(day) = selection.date() {
        if item.event.event_date != day {
            return false;
        }
    }

    if selection.has_no_category_filters() {
        return true;
    }

    let group_ids = selection.group_ids();
    let tags = selection.tags();

    let matches_group = !group_ids.is_empty()
        && item
            .event
            .group_id
            .map_or(false, |id| group_ids.contains(&id));

    let matches_tag = !tags.is_empty()
        && item
            .effective_tags()
            .iter()
            .any(|tag| tags.contains(tag.as_str()));

    match (group_ids.is_empty(), tags.is_empty()) {
        (false, false) => matches_group || matches_tag,
        (false, true) => matches_group,
        (true, false) => matches_tag,
        (true, true) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::fixtures::{date, event, group, in_group, with_tags};
    use crate::models::ModerationStatus;
    use uuid::Uuid;

    fn none() -> Vec<Uuid> {
        Vec::new()
    }

    fn no_tags() -> Vec<&'static str> {
        Vec::new()
    }

    #[test]
    fn test_empty_selection_accepts_everything() {
        let selection = FilterSelection::default();
        let g = group("g", ModerationStatus::Approved, &["rust"]);
        assert!(matches_selection(&event("a", date(2025, 6, 10)), &selection));
        assert!(matches_selection(
            &in_group(event("b", date(2030, 1, 1)), &g),
            &selection
        ));
    }

    #[test]
    fn test_group_or_tag_semantics() {
        let g1 = group("G1", ModerationStatus::Approved, &[]);
        let g2 = group("G2", ModerationStatus::Approved, &[]);
        let selection = FilterSelection::new([g1.id], ["T1"], None);

        let only_group = in_group(event("only group", date(2025, 6, 10)), &g1);
        let only_tag = with_tags(in_group(event("only tag", date(2025, 6, 10)), &g2), &["T1"]);
        let neither = with_tags(in_group(event("neither", date(2025, 6, 10)), &g2), &["T2"]);

        assert!(matches_selection(&only_group, &selection));
        assert!(matches_selection(&only_tag, &selection));
        assert!(!matches_selection(&neither, &selection));
    }

    #[test]
    fn test_date_is_and_with_categories() {
        let g1 = group("G1", ModerationStatus::Approved, &[]);
        let selection = FilterSelection::new([g1.id], ["T1"], Some(date(2025, 6, 10)));

        let wrong_day = with_tags(in_group(event("x", date(2025, 6, 11)), &g1), &["T1"]);
        let right_day = in_group(event("y", date(2025, 6, 10)), &g1);

        assert!(!matches_selection(&wrong_day, &selection));
        assert!(matches_selection(&right_day, &selection));
    }

    #[test]
    fn test_date_only_selection() {
        let selection = FilterSelection::new(none(), no_tags(), Some(date(2025, 6, 10)));
        assert!(matches_selection(&event("a", date(2025, 6, 10)), &selection));
        assert!(!matches_selection(&event("b", date(2025, 6, 9)), &selection));
    }

    #[test]
    fn test_only_group_filter() {
        let g1 = group("G1", ModerationStatus::Approved, &["rust"]);
        let selection = FilterSelection::new([g1.id], no_tags(), None);
        assert!(matches_selection(&in_group(event("a", date(2025, 6, 10)), &g1), &selection));
        assert!(!matches_selection(&event("unlisted", date(2025, 6, 10)), &selection));
    }

    #[test]
    fn test_only_tag_filter_uses_group_tag_fallback() {
        let g = group("G", ModerationStatus::Approved, &["rust"]);
        let selection = FilterSelection::new(none(), ["rust"], None);
        let untagged = in_group(event("a", date(2025, 6, 10)), &g);
        assert!(matches_selection(&untagged, &selection));
    }

    #[test]
    fn test_event_tags_replace_group_tags() {
        // Group tags only apply when the event has none of its own.
        let g = group("G", ModerationStatus::Approved, &["rust"]);
        let selection = FilterSelection::new(none(), ["rust"], None);
        let tagged = with_tags(in_group(event("a", date(2025, 6, 10)), &g), &["go"]);
        assert!(!matches_selection(&tagged, &selection));
    }

    #[test]
    fn test_unlisted_untagged_event_with_tag_filter() {
        let selection = FilterSelection::new(none(), ["rust"], None);
        assert!(!matches_selection(&event("a", date(2025, 6, 10)), &selection));
    }

    #[test]
    fn test_group_id_without_resolved_group() {
        let mut item = event("a", date(2025, 6, 10));
        let id = Uuid::new_v4();
        item.event.group_id = Some(id);
        let selection = FilterSelection::new([id], no_tags(), None);
        assert!(matches_selection(&item, &selection));
    }
}
