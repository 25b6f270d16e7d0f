//! Item discovery over live board snapshots
//!
//! Stored item ids are hints, not truth: humans delete and recreate board
//! items freely, and a fresh engine starts with no memory at all. Every
//! lookup here therefore runs an ordered list of strategies against a listed
//! snapshot, and the first strategy that matches anything wins. Earlier
//! strategies are the more trustworthy ones (exact text, identity tags);
//! later ones (geometry, content shape) only fire when everything better
//! has been wiped out.

use easel_canvas::CanvasItem;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::project::ProjectId;
use crate::tag;

/// Title of the timeline frame; the cold-recovery key for the whole board
pub(crate) const TIMELINE_TITLE: &str = "Project Timeline";

static VERSION_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/ v(\d+)\s*$").expect("version pattern"));

/// Badge contents that look like a workflow status
pub(crate) static STATUS_CONTENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(To Do|In Progress|Review|Overdue|Done)\s*$").expect("status pattern")
});

/// Badge contents that look like a rendered due date
pub(crate) static DUE_CONTENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)\b\s*\d{1,2}|^\s*No due date\s*$")
        .expect("due pattern")
});

/// One resolver step: a predicate over a board item
pub(crate) type Strategy<'a> = Box<dyn Fn(&CanvasItem) -> bool + 'a>;

/// Run strategies in order; the first that matches anything wins
pub(crate) fn first_match<'a>(
    items: &'a [CanvasItem],
    strategies: &[Strategy<'_>],
) -> Option<&'a CanvasItem> {
    strategies
        .iter()
        .find_map(|hits| items.iter().find(|item| hits(item)))
}

/// Strategy: title equals `want`
pub(crate) fn exact_title(want: &str) -> Strategy<'_> {
    Box::new(move |item| item.title == want)
}

/// Strategy: title contains `fragment`, case-insensitive
pub(crate) fn title_contains(fragment: &str) -> Strategy<'static> {
    let needle = fragment.to_lowercase();
    Box::new(move |item| item.title.to_lowercase().contains(&needle))
}

/// The timeline frame, by exact then partial title
pub(crate) fn find_timeline_frame(frames: &[CanvasItem]) -> Option<&CanvasItem> {
    first_match(
        frames,
        &[exact_title(TIMELINE_TITLE), title_contains("timeline")],
    )
}

/// A project's card, preferring the tag in content over a legacy title tag
pub(crate) fn find_card<'a>(cards: &'a [CanvasItem], id: &ProjectId) -> Option<&'a CanvasItem> {
    let by_content: Strategy<'_> = {
        let id = id.clone();
        Box::new(move |item: &CanvasItem| tag::matches(&item.content, &id))
    };
    let by_title: Strategy<'_> = {
        let id = id.clone();
        Box::new(move |item: &CanvasItem| tag::matches(&item.title, &id))
    };
    first_match(cards, &[by_content, by_title])
}

/// Canonical briefing frame title for a project
pub(crate) fn briefing_title(name: &str) -> String {
    format!("Briefing: {name}")
}

/// Canonical version frame title
pub(crate) fn version_title(name: &str, number: u32) -> String {
    format!("{name} / v{number}")
}

/// Project name as carried by a briefing frame title
pub(crate) fn briefing_name(title: &str) -> String {
    title
        .strip_prefix("Briefing: ")
        .unwrap_or(title)
        .to_string()
}

/// A project's briefing frame, by exact then fuzzy title
pub(crate) fn find_briefing_frame<'a>(
    frames: &'a [CanvasItem],
    name: &str,
) -> Option<&'a CanvasItem> {
    let want = briefing_title(name);
    let exact: Strategy<'_> = Box::new(move |item: &CanvasItem| item.title == want);
    let fuzzy: Strategy<'static> = {
        let needle = name.to_lowercase();
        Box::new(move |item: &CanvasItem| {
            let title = item.title.to_lowercase();
            title.starts_with("briefing") && title.contains(&needle)
        })
    };
    first_match(frames, &[exact, fuzzy])
}

/// A project's version frames, ordered by board position
///
/// Position is truth for ordering. Numbers come from the title suffix and
/// may disagree after heavy manual rearranging; callers that need "the
/// latest" want the rightmost frame, not the highest number.
pub(crate) fn version_frames<'a>(
    frames: &'a [CanvasItem],
    name: &str,
) -> Vec<(u32, &'a CanvasItem)> {
    let prefix = format!("{name} / v");
    let mut found: Vec<(u32, &CanvasItem)> = frames
        .iter()
        .filter(|f| f.title.starts_with(&prefix))
        .filter_map(|f| {
            let number = VERSION_SUFFIX.captures(&f.title)?.get(1)?.as_str().parse().ok()?;
            Some((number, f))
        })
        .collect();
    found.sort_by(|a, b| a.1.x.total_cmp(&b.1.x));
    found
}

/// What a badge lookup is searching for
pub(crate) struct BadgeQuery<'a> {
    /// Canonical badge title, e.g. `Status`
    pub(crate) title: &'a str,
    /// Center x of the slot this badge was created in
    pub(crate) expected_x: f64,
    /// Center y of the badge row
    pub(crate) band_y: f64,
    /// Vertical slack around the badge row
    pub(crate) band_tolerance: f64,
    /// Content shape that identifies this badge once titles are gone
    pub(crate) content: &'a Regex,
}

/// A badge inside `frame`: exact title, partial title, geometry, content
pub(crate) fn find_badge<'a>(
    shapes: &'a [CanvasItem],
    frame: &CanvasItem,
    query: &BadgeQuery<'_>,
) -> Option<&'a CanvasItem> {
    let contained: Vec<&CanvasItem> = shapes
        .iter()
        .filter(|s| frame.contains_center_of(s))
        .collect();

    // 1. exact title
    if let Some(hit) = contained.iter().find(|s| s.title == query.title) {
        return Some(*hit);
    }

    // 2. partial title
    let needle = query.title.to_lowercase();
    if let Some(hit) = contained
        .iter()
        .find(|s| s.title.to_lowercase().contains(&needle))
    {
        return Some(*hit);
    }

    // 3. badge row geometry, nearest to the expected slot
    if let Some(hit) = contained
        .iter()
        .filter(|s| (s.y - query.band_y).abs() <= query.band_tolerance)
        .min_by(|a, b| {
            (a.x - query.expected_x)
                .abs()
                .total_cmp(&(b.x - query.expected_x).abs())
        })
    {
        return Some(*hit);
    }

    // 4. content shape
    contained.into_iter().find(|s| query.content.is_match(&s.content))
}

/// The done overlay veiling `frame`, by marker then by look
pub(crate) fn find_overlay<'a>(
    shapes: &'a [CanvasItem],
    frame: &CanvasItem,
) -> Option<&'a CanvasItem> {
    if let Some(hit) = shapes
        .iter()
        .find(|s| tag::is_furniture(&s.content, "overlay") && frame.contains_center_of(s))
    {
        return Some(hit);
    }
    shapes.iter().find(|s| {
        frame.contains_center_of(s)
            && s.width >= frame.width * 0.8
            && s.height >= frame.height * 0.8
            && s.style.opacity.is_some_and(|o| o < 1.0)
    })
}

/// All items carrying the furniture marker for `kind`
pub(crate) fn furniture_items<'a>(items: &'a [CanvasItem], kind: &str) -> Vec<&'a CanvasItem> {
    items
        .iter()
        .filter(|i| tag::is_furniture(&i.content, kind))
        .collect()
}

/// The project a card claims to mirror, content tag before legacy title tag
pub(crate) fn card_identity(item: &CanvasItem) -> Option<ProjectId> {
    tag::extract(&item.content).or_else(|| tag::extract(&item.title))
}

#[cfg(test)]
mod tests {
    use super::*;
    use easel_canvas::{ItemId, ItemKind, ItemStyle};

    fn item(title: &str, content: &str, x: f64, y: f64) -> CanvasItem {
        CanvasItem {
            id: ItemId::new(format!("{title}-{x}-{y}")),
            kind: ItemKind::Shape,
            title: title.to_string(),
            content: content.to_string(),
            x,
            y,
            width: 132.0,
            height: 36.0,
            style: ItemStyle::default(),
            card_due: None,
            card_theme: None,
        }
    }

    fn frame(title: &str, x: f64, y: f64, width: f64, height: f64) -> CanvasItem {
        let mut f = item(title, "", x, y);
        f.kind = ItemKind::Frame;
        f.width = width;
        f.height = height;
        f
    }

    #[test]
    fn exact_title_beats_partial_even_when_listed_later() {
        let frames = vec![
            frame("Old Timeline copy", 0.0, 0.0, 100.0, 100.0),
            frame(TIMELINE_TITLE, 500.0, 0.0, 100.0, 100.0),
        ];
        let hit = find_timeline_frame(&frames).unwrap();
        assert_eq!(hit.title, TIMELINE_TITLE);
    }

    #[test]
    fn partial_title_is_the_fallback() {
        let frames = vec![frame("Q3 timeline (old)", 0.0, 0.0, 100.0, 100.0)];
        assert!(find_timeline_frame(&frames).is_some());
        assert!(find_timeline_frame(&[frame("Moodboard", 0.0, 0.0, 1.0, 1.0)]).is_none());
    }

    #[test]
    fn content_tag_beats_legacy_title_tag() {
        let id = ProjectId::new("p1");
        let cards = vec![
            item("Nova projectId:p1", "", 0.0, 0.0),
            item("Nova", "projectId:p1", 100.0, 0.0),
        ];
        let hit = find_card(&cards, &id).unwrap();
        assert_eq!(hit.x, 100.0);
    }

    #[test]
    fn legacy_title_tag_still_resolves() {
        let id = ProjectId::new("p1");
        let cards = vec![item("Nova projectId:p1", "", 0.0, 0.0)];
        assert!(find_card(&cards, &id).is_some());
        assert!(find_card(&cards, &ProjectId::new("p2")).is_none());
    }

    #[test]
    fn briefing_falls_back_to_fuzzy_title() {
        let frames = vec![frame("Briefing - Nova Site (archived)", 0.0, 0.0, 640.0, 760.0)];
        assert!(find_briefing_frame(&frames, "Nova Site").is_some());
        assert!(find_briefing_frame(&frames, "Other").is_none());
    }

    #[test]
    fn version_frames_order_by_position_not_number() {
        let frames = vec![
            frame("Nova / v2", 600.0, 0.0, 480.0, 560.0),
            frame("Nova / v1", 100.0, 0.0, 480.0, 560.0),
            frame("Other / v1", 300.0, 0.0, 480.0, 560.0),
        ];
        let versions = version_frames(&frames, "Nova");
        assert_eq!(versions.len(), 2);
        assert_eq!(versions[0].0, 1);
        assert_eq!(versions[1].0, 2);

        // manual rearranging flips the order; position still wins
        let frames = vec![
            frame("Nova / v1", 900.0, 0.0, 480.0, 560.0),
            frame("Nova / v2", 100.0, 0.0, 480.0, 560.0),
        ];
        let versions = version_frames(&frames, "Nova");
        assert_eq!(versions[0].0, 2);
        assert_eq!(versions[1].0, 1);
    }

    fn badge_query<'a>(expected_x: f64, content: &'a Regex) -> BadgeQuery<'a> {
        BadgeQuery {
            title: "Status",
            expected_x,
            band_y: 50.0,
            band_tolerance: 36.0,
            content,
        }
    }

    #[test]
    fn badge_exact_title_wins() {
        let holder = frame("Briefing: Nova", 0.0, 0.0, 640.0, 760.0);
        let shapes = vec![
            item("Status", "Review", -100.0, 50.0),
            item("Old status", "Done", 100.0, 50.0),
        ];
        let hit = find_badge(&shapes, &holder, &badge_query(100.0, &STATUS_CONTENT)).unwrap();
        assert_eq!(hit.title, "Status");
    }

    #[test]
    fn badge_geometry_picks_nearest_slot_when_titles_are_gone() {
        let holder = frame("Briefing: Nova", 0.0, 0.0, 640.0, 760.0);
        let shapes = vec![
            item("", "Acme", -120.0, 50.0),
            item("", "Review", 40.0, 50.0),
            item("", "off band", 40.0, 300.0),
        ];
        let hit = find_badge(&shapes, &holder, &badge_query(50.0, &STATUS_CONTENT)).unwrap();
        assert_eq!(hit.x, 40.0);
    }

    #[test]
    fn badge_content_shape_is_the_last_resort() {
        let holder = frame("Briefing: Nova", 0.0, 0.0, 640.0, 760.0);
        // badge dragged far from its row, title wiped
        let shapes = vec![
            item("", "meeting notes", -120.0, 300.0),
            item("", "In Progress", 40.0, 310.0),
        ];
        let hit = find_badge(&shapes, &holder, &badge_query(50.0, &STATUS_CONTENT)).unwrap();
        assert_eq!(hit.content, "In Progress");
    }

    #[test]
    fn badge_outside_the_frame_is_invisible() {
        let holder = frame("Briefing: Nova", 0.0, 0.0, 640.0, 760.0);
        let shapes = vec![item("Status", "Review", 5000.0, 50.0)];
        assert!(find_badge(&shapes, &holder, &badge_query(0.0, &STATUS_CONTENT)).is_none());
    }

    #[test]
    fn overlay_found_by_marker_then_by_look() {
        let holder = frame("Briefing: Nova", 0.0, 0.0, 640.0, 760.0);
        let marked = {
            let mut s = item("Done", "easel:overlay", 0.0, 0.0);
            s.width = 640.0;
            s.height = 760.0;
            s
        };
        assert!(find_overlay(std::slice::from_ref(&marked), &holder).is_some());

        let unmarked = {
            let mut s = item("", "", 0.0, 0.0);
            s.width = 600.0;
            s.height = 700.0;
            s.style.opacity = Some(0.45);
            s
        };
        assert!(find_overlay(std::slice::from_ref(&unmarked), &holder).is_some());

        let opaque = {
            let mut s = unmarked.clone();
            s.style.opacity = Some(1.0);
            s
        };
        assert!(find_overlay(std::slice::from_ref(&opaque), &holder).is_none());
    }

    #[test]
    fn due_content_accepts_both_renderings() {
        assert!(DUE_CONTENT.is_match("Mar 5"));
        assert!(DUE_CONTENT.is_match("Mar 5, 17:00 (tbc)"));
        assert!(DUE_CONTENT.is_match("No due date"));
        assert!(!DUE_CONTENT.is_match("Acme"));
    }

    #[test]
    fn furniture_items_filter_by_kind() {
        let items = vec![
            item("", "easel:separator:1", 0.0, 0.0),
            item("", "easel:aux", 10.0, 0.0),
            item("note", "plain", 20.0, 0.0),
        ];
        assert_eq!(furniture_items(&items, "separator").len(), 1);
        assert_eq!(furniture_items(&items, "aux").len(), 1);
    }
}
