//! Routing between the list view and detail views.
//!
//! The URL query string is the only navigation state: `?skill=<id>` selects
//! a detail view, anything else the list. [`RenderGeneration`] replaces
//! cancellation: a render that resolves after a newer navigation started is
//! discarded instead of overwriting the page.

use std::borrow::Cow;
use std::cell::Cell;

use crate::html::Escaped;

/// Label of the root breadcrumb.
pub const HOME_LABEL: &str = "All Skills";

/// Which view the URL selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    List,
    Skill(String),
}

impl Route {
    /// Route selected by a `location.search` string (leading `?` optional).
    #[must_use]
    pub fn from_query(query: &str, param: &str) -> Self {
        parse_query(query)
            .into_iter()
            .rev()
            .find(|(k, _)| k == param)
            .map(|(_, v)| v)
            .filter(|v| !v.trim().is_empty())
            .map_or(Self::List, Self::Skill)
    }

    /// Query string for this route: empty for the list, `?param=<id>` otherwise.
    #[must_use]
    pub fn to_query(&self, param: &str) -> String {
        match self {
            Self::List => String::new(),
            Self::Skill(id) => format!(
                "?{}={}",
                urlencoding::encode(param),
                urlencoding::encode(id)
            ),
        }
    }

    /// Relative link usable as an `href`, so links work without scripting.
    #[must_use]
    pub fn href(&self, param: &str) -> String {
        format!("./{}", self.to_query(param))
    }

    #[must_use]
    pub fn skill_id(&self) -> Option<&str> {
        match self {
            Self::List => None,
            Self::Skill(id) => Some(id),
        }
    }
}

/// Decode `key=value` pairs. Pairs without `=` or with an empty key are
/// skipped; undecodable escapes are kept verbatim.
#[must_use]
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    let query = query.strip_prefix('?').unwrap_or(query);
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .filter(|(k, _)| !k.is_empty())
        .map(|(k, v)| (decode(k), decode(v)))
        .collect()
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_owned())
}

/// What triggered a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOrigin {
    /// First render after page load; the URL already matches.
    Initial,
    /// User clicked a link or control inside the page.
    Link,
    /// Browser back/forward; the browser already moved the URL.
    History,
}

impl NavOrigin {
    /// History change to apply after rendering `route`.
    #[must_use]
    pub fn history_for(self, route: &Route, param: &str) -> HistoryUpdate {
        match self {
            Self::Link => HistoryUpdate::Push(route.to_query(param)),
            Self::Initial | Self::History => HistoryUpdate::None,
        }
    }
}

/// Change to the browser history, expressed as the new query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryUpdate {
    None,
    Push(String),
    Replace(String),
}

/// Breadcrumb trail: "All Skills" alone on the list, linked above a skill.
///
/// The active crumb is never a link.
#[must_use]
pub fn breadcrumb(current: Option<&str>) -> String {
    match current {
        None => format!(
            r#"<ul><li class="is-active"><span aria-current="page">{HOME_LABEL}</span></li></ul>"#
        ),
        Some(name) => format!(
            r#"<ul><li><a href="./" data-action="home">{HOME_LABEL}</a></li><li class="is-active"><span aria-current="page">{}</span></li></ul>"#,
            Escaped(name)
        ),
    }
}

/// Ticket identifying one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RenderTicket(u64);

/// Monotonic render counter.
#[derive(Debug, Default)]
pub struct RenderGeneration {
    current: Cell<u64>,
}

impl RenderGeneration {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: Cell::new(0),
        }
    }

    /// Start a render, superseding every earlier ticket.
    pub fn begin(&self) -> RenderTicket {
        let next = self.current.get().wrapping_add(1);
        self.current.set(next);
        RenderTicket(next)
    }

    #[must_use]
    pub fn is_current(&self, ticket: RenderTicket) -> bool {
        self.current.get() == ticket.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn query_selects_route() {
        assert_eq!(Route::from_query("", "skill"), Route::List);
        assert_eq!(Route::from_query("?skill=", "skill"), Route::List);
        assert_eq!(Route::from_query("?other=1", "skill"), Route::List);
        assert_eq!(
            Route::from_query("?skill=fireball", "skill"),
            Route::Skill("fireball".into())
        );
        assert_eq!(
            Route::from_query("a=1&skill=town%20portal&b", "skill"),
            Route::Skill("town portal".into())
        );
        assert_eq!(
            Route::from_query("?skill=a&skill=b", "skill"),
            Route::Skill("b".into())
        );
    }

    #[test]
    fn malformed_pairs_are_skipped() {
        let pairs = parse_query("?=x&flag&k=%E0%A4%A&ok=1");
        assert_eq!(
            pairs,
            vec![
                ("k".to_string(), "%E0%A4%A".to_string()),
                ("ok".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn links_encode_ids() {
        let route = Route::Skill("a&b c".into());
        assert_eq!(route.to_query("skill"), "?skill=a%26b%20c");
        assert_eq!(route.href("skill"), "./?skill=a%26b%20c");
        assert_eq!(Route::List.href("skill"), "./");
        assert_eq!(Route::List.skill_id(), None);
    }

    #[test]
    fn history_depends_on_origin() {
        let route = Route::Skill("blink".into());
        assert_eq!(
            NavOrigin::Link.history_for(&route, "skill"),
            HistoryUpdate::Push("?skill=blink".into())
        );
        assert_eq!(
            NavOrigin::Link.history_for(&Route::List, "skill"),
            HistoryUpdate::Push(String::new())
        );
        assert_eq!(NavOrigin::History.history_for(&route, "skill"), HistoryUpdate::None);
        assert_eq!(NavOrigin::Initial.history_for(&route, "skill"), HistoryUpdate::None);
    }

    #[test]
    fn breadcrumb_links_home_only_from_a_skill() {
        assert_eq!(
            breadcrumb(None),
            r#"<ul><li class="is-active"><span aria-current="page">All Skills</span></li></ul>"#
        );

        let crumbs = breadcrumb(Some("Fire & Ice"));
        assert!(crumbs.contains(r#"<a href="./" data-action="home">All Skills</a>"#));
        assert!(crumbs.contains(r#"<span aria-current="page">Fire &amp; Ice</span>"#));
        // Every link in the trail is handled in-app.
        assert_eq!(crumbs.matches("<a ").count(), 1);
        assert_eq!(crumbs.matches("data-action=").count(), 1);
    }

    #[test]
    fn newer_ticket_supersedes_older() {
        let generation = RenderGeneration::new();
        let first = generation.begin();
        assert!(generation.is_current(first));

        let second = generation.begin();
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
        assert!(second > first);
    }

    proptest! {
        #[test]
        fn skill_routes_round_trip(id in "\\PC{1,24}") {
            prop_assume!(!id.trim().is_empty());
            let route = Route::Skill(id);
            let query = route.to_query("skill");
            prop_assert_eq!(Route::from_query(&query, "skill"), route);
        }
    }
}
