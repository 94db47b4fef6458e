//! User interactions, decoded from `data-*` attributes.
//!
//! Rendered markup tags every interactive element with `data-action`; the
//! host installs one delegated listener per event type and maps the clicked
//! element's attributes to an [`Action`].

use skilldex_core::list_view::Column;

/// Attribute naming the action of an element.
pub const ACTION_ATTR: &str = "data-action";
pub const SKILL_ID_ATTR: &str = "data-skill-id";
pub const COLUMN_ATTR: &str = "data-column";

/// Selector matching any element carrying an action.
pub const ACTION_SELECTOR: &str = "[data-action]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Open a skill's detail page.
    ShowSkill(String),
    /// Breadcrumb link back to the list.
    Home,
    Sort(Column),
    ToggleScaling,
    /// Filter checkbox changed to the given state.
    ToggleFilter(bool),
}

impl Action {
    /// Decode an element's attributes. Unknown actions and missing
    /// arguments yield `None`.
    #[must_use]
    pub fn parse(action: &str, skill_id: Option<&str>, column: Option<&str>, checked: bool) -> Option<Self> {
        match action {
            "show-skill" => skill_id
                .filter(|id| !id.trim().is_empty())
                .map(|id| Self::ShowSkill(id.to_owned())),
            "home" => Some(Self::Home),
            "sort" => column.and_then(Column::from_key).map(Self::Sort),
            "toggle-scaling" => Some(Self::ToggleScaling),
            "toggle-filter" => Some(Self::ToggleFilter(checked)),
            _ => None,
        }
    }

    /// Whether the browser's own handling (following the link) must be
    /// suppressed.
    #[must_use]
    pub fn is_navigation(&self) -> bool {
        matches!(self, Self::ShowSkill(_) | Self::Home)
    }

    /// DOM event type that triggers this action.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ToggleFilter(_) => "change",
            _ => "click",
        }
    }
}

/// URL for a history entry: the current path plus the route's query.
#[must_use]
pub fn history_url(pathname: &str, query: &str) -> String {
    format!("{pathname}{query}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_known_actions() {
        assert_eq!(
            Action::parse("show-skill", Some("fireball"), None, false),
            Some(Action::ShowSkill("fireball".into()))
        );
        assert_eq!(Action::parse("home", None, None, false), Some(Action::Home));
        assert_eq!(
            Action::parse("sort", None, Some("class"), false),
            Some(Action::Sort(Column::Class))
        );
        assert_eq!(
            Action::parse("toggle-scaling", None, None, false),
            Some(Action::ToggleScaling)
        );
        assert_eq!(
            Action::parse("toggle-filter", None, None, true),
            Some(Action::ToggleFilter(true))
        );
    }

    #[test]
    fn rejects_incomplete_or_unknown_actions() {
        assert_eq!(Action::parse("show-skill", None, None, false), None);
        assert_eq!(Action::parse("show-skill", Some(" "), None, false), None);
        assert_eq!(Action::parse("sort", None, Some("level"), false), None);
        assert_eq!(Action::parse("sort", None, None, false), None);
        assert_eq!(Action::parse("explode", None, None, false), None);
    }

    #[test]
    fn only_links_are_navigation() {
        assert!(Action::ShowSkill("x".into()).is_navigation());
        assert!(Action::Home.is_navigation());
        assert!(!Action::ToggleScaling.is_navigation());
        assert_eq!(Action::ToggleFilter(false).event_type(), "change");
        assert_eq!(Action::Home.event_type(), "click");
    }

    #[test]
    fn history_urls_keep_the_path() {
        assert_eq!(history_url("/skills/", "?skill=a%20b"), "/skills/?skill=a%20b");
        assert_eq!(history_url("/skills/", ""), "/skills/");
    }
}
