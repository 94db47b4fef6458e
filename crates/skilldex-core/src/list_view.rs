//! The sortable, filterable table of all skills.
//!
//! Every row is always built; the "details only" filter and the sort order
//! are applied when rendering, so toggling either is a cheap redraw without
//! refetching anything. There is no pagination.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt::Write;

use crate::config::SkilldexConfig;
use crate::html::Escaped;
use crate::model::SkillSummary;
use crate::nav::Route;

/// Shown when the list loaded but contains nothing.
pub const NO_SKILLS_MESSAGE: &str = "No skills found.";
/// Shown when the list resource could not be loaded.
pub const LOAD_ERROR_MESSAGE: &str = "Error loading skills. Please try again later.";
/// Shown when the filter hides every row.
pub const NO_MATCHES_MESSAGE: &str = "No skills with details yet.";
/// Label of the filter checkbox.
pub const FILTER_LABEL: &str = "Show skills with details";

/// Table columns, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Image,
    Name,
    Category,
    Class,
    Tab,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::Image,
        Column::Name,
        Column::Category,
        Column::Class,
        Column::Tab,
    ];

    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::Image => "Image",
            Self::Name => "Name",
            Self::Category => "Category",
            Self::Class => "Class",
            Self::Tab => "Tab",
        }
    }

    /// Stable identifier used in `data-column` attributes.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Name => "name",
            Self::Category => "category",
            Self::Class => "class",
            Self::Tab => "tab",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }

    /// The image column never sorts.
    #[must_use]
    pub const fn is_sortable(self) -> bool {
        !matches!(self, Self::Image)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Value for the `aria-sort` attribute.
    #[must_use]
    pub const fn aria(self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub column: Column,
    pub direction: SortDirection,
}

impl Default for SortOrder {
    fn default() -> Self {
        Self {
            column: Column::Name,
            direction: SortDirection::Ascending,
        }
    }
}

/// View state that survives redraws within a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListState {
    pub sort: SortOrder,
    /// Only rows with a detail page are visible.
    pub only_detailed: bool,
}

impl ListState {
    /// Sort by `column`; the active column flips direction instead.
    /// Returns `false` when the column is not sortable.
    pub fn sort_by(&mut self, column: Column) -> bool {
        if !column.is_sortable() {
            return false;
        }
        self.sort = if self.sort.column == column {
            SortOrder {
                column,
                direction: self.sort.direction.flipped(),
            }
        } else {
            SortOrder {
                column,
                direction: SortDirection::Ascending,
            }
        };
        true
    }
}

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub category: String,
    pub class_name: &'static str,
    pub tab_label: &'static str,
    pub has_page: bool,
}

impl ListRow {
    fn from_summary(skill: &SkillSummary, available: &BTreeSet<String>, config: &SkilldexConfig) -> Self {
        Self {
            id: skill.id.clone(),
            name: skill.name.clone(),
            icon: config.icon_path(skill.image.as_deref()),
            category: skill.tag.join(", "),
            class_name: skill.class_name(),
            tab_label: skill.tab_label(),
            has_page: skill.has_id() && available.contains(&skill.id),
        }
    }

    fn sort_text(&self, column: Column) -> &str {
        match column {
            Column::Image => "",
            Column::Name => &self.name,
            Column::Category => &self.category,
            Column::Class => self.class_name,
            Column::Tab => self.tab_label,
        }
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// The list view for one render.
#[derive(Debug, Clone)]
pub struct ListView {
    rows: Vec<ListRow>,
    state: ListState,
}

impl ListView {
    /// Build rows for `skills`, sorted per `state`.
    #[must_use]
    pub fn build(
        skills: &[SkillSummary],
        available: &BTreeSet<String>,
        state: ListState,
        config: &SkilldexConfig,
    ) -> Self {
        let rows = skills
            .iter()
            .map(|s| ListRow::from_summary(s, available, config))
            .collect();
        let mut view = Self { rows, state };
        view.sort();
        view
    }

    fn sort(&mut self) {
        let SortOrder { column, direction } = self.state.sort;
        // `sort_by` is stable: ties keep source order in both directions.
        self.rows.sort_by(|a, b| {
            let ord = compare_text(a.sort_text(column), b.sort_text(column));
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
    }

    /// Apply a new state, re-sorting if needed.
    pub fn set_state(&mut self, state: ListState) {
        let resort = state.sort != self.state.sort;
        self.state = state;
        if resort {
            self.sort();
        }
    }

    #[must_use]
    pub fn state(&self) -> ListState {
        self.state
    }

    /// All rows in sort order.
    #[must_use]
    pub fn rows(&self) -> &[ListRow] {
        &self.rows
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Rows passing the filter, in sort order.
    pub fn visible_rows(&self) -> impl Iterator<Item = &ListRow> {
        let only_detailed = self.state.only_detailed;
        self.rows.iter().filter(move |r| !only_detailed || r.has_page)
    }

    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.visible_rows().count()
    }

    /// Full list markup: filter control plus table.
    #[must_use]
    pub fn render(&self, config: &SkilldexConfig) -> String {
        let mut out = String::with_capacity(256 + self.rows.len() * 320);
        let checked = if self.state.only_detailed { " checked" } else { "" };
        let _ = write!(
            out,
            r#"<div class="field"><input id="toggle-filter" type="checkbox" data-action="toggle-filter"{checked}><label for="toggle-filter">{FILTER_LABEL}</label></div>"#
        );
        out.push_str(r#"<div class="skills-table-container"><table id="skills-table" class="table is-hoverable is-fullwidth"><thead><tr>"#);
        for column in Column::ALL {
            self.render_header(&mut out, column);
        }
        out.push_str("</tr></thead><tbody>");

        let mut any = false;
        for row in self.visible_rows() {
            any = true;
            render_row(&mut out, row, &config.query_param);
        }
        if !any {
            let _ = write!(
                out,
                r#"<tr class="is-empty"><td colspan="{}">{NO_MATCHES_MESSAGE}</td></tr>"#,
                Column::ALL.len()
            );
        }
        out.push_str("</tbody></table></div>");
        out
    }

    fn render_header(&self, out: &mut String, column: Column) {
        if !column.is_sortable() {
            let _ = write!(out, "<th>{}</th>", column.header());
            return;
        }
        let sort = self.state.sort;
        if sort.column == column {
            let class = match sort.direction {
                SortDirection::Ascending => "is-sortable is-sorted-asc",
                SortDirection::Descending => "is-sortable is-sorted-desc",
            };
            let _ = write!(
                out,
                r#"<th class="{class}" data-action="sort" data-column="{}" aria-sort="{}">{}</th>"#,
                column.key(),
                sort.direction.aria(),
                column.header()
            );
        } else {
            let _ = write!(
                out,
                r#"<th class="is-sortable" data-action="sort" data-column="{}">{}</th>"#,
                column.key(),
                column.header()
            );
        }
    }
}

fn render_row(out: &mut String, row: &ListRow, query_param: &str) {
    let _ = write!(
        out,
        r#"<tr data-skill-id="{}" data-has-page="{}"><td><img src="{}" alt="{}" class="image is-48x48"></td><td>"#,
        Escaped(&row.id),
        row.has_page,
        Escaped(&row.icon),
        Escaped(&row.name)
    );
    if row.has_page {
        let href = Route::Skill(row.id.clone()).href(query_param);
        let _ = write!(
            out,
            r#"<a href="{}" class="view-skill-btn" data-action="show-skill" data-skill-id="{}">{}</a>"#,
            Escaped(&href),
            Escaped(&row.id),
            Escaped(&row.name)
        );
    } else {
        let _ = write!(out, "{}", Escaped(&row.name));
    }
    let _ = write!(
        out,
        "</td><td>{}</td><td>{}</td><td>{}</td></tr>",
        Escaped(&row.category),
        row.class_name,
        Escaped(row.tab_label)
    );
}

/// Markup for the list page when there is no table to show.
#[must_use]
pub fn render_message(message: &str) -> String {
    format!("<p>{}</p>", Escaped(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SkillRegistry;
    use pretty_assertions::assert_eq;

    const LIST: &str = r#"{"skills":[
        {"id":"fireball","name":"Fireball","class":1,"tab":2,"tag":["Fire"]},
        {"id":"","name":"anvil","class":4,"tab":7,"tag":["Melee","Physical"]},
        {"id":"blink","name":"Blink","class":1,"tab":1,"tag":"Arcane","image":"1/blink.png"},
        {"id":"zeal","name":"Zeal","class":3,"tab":2,"tag":["Melee"]}
    ]}"#;

    fn skills() -> Vec<SkillSummary> {
        SkillRegistry::parse("skills.json", LIST).unwrap()
    }

    fn available(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| (*s).to_owned()).collect()
    }

    fn names(view: &ListView) -> Vec<&str> {
        view.visible_rows().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn default_sort_is_name_ascending_case_insensitive() {
        let config = SkilldexConfig::default();
        let view = ListView::build(&skills(), &available(&[]), ListState::default(), &config);
        assert_eq!(names(&view), vec!["anvil", "Blink", "Fireball", "Zeal"]);
        assert_eq!(view.row_count(), 4);
    }

    #[test]
    fn rows_carry_taxonomy_and_fallback_icon() {
        let config = SkilldexConfig::default();
        let view = ListView::build(&skills(), &available(&["blink"]), ListState::default(), &config);
        let anvil = &view.rows()[0];
        assert_eq!(anvil.category, "Melee, Physical");
        assert_eq!(anvil.class_name, "Barbarian");
        assert_eq!(anvil.tab_label, "Mastery");
        assert_eq!(anvil.icon, "icons/-1/icons-shared_missing.png");
        assert!(!anvil.has_page);

        let blink = &view.rows()[1];
        assert_eq!(blink.icon, "icons/1/blink.png");
        assert!(blink.has_page);
    }

    #[test]
    fn filter_shows_only_available_rows() {
        let config = SkilldexConfig::default();
        let mut view = ListView::build(
            &skills(),
            &available(&["fireball", "zeal"]),
            ListState::default(),
            &config,
        );
        assert_eq!(view.visible_count(), 4);

        view.set_state(ListState {
            only_detailed: true,
            ..view.state()
        });
        assert_eq!(view.row_count(), 4);
        assert_eq!(names(&view), vec!["Fireball", "Zeal"]);

        let html = view.render(&config);
        assert_eq!(html.matches("<tr data-skill-id=").count(), 2);
        assert!(html.contains(r#"data-action="toggle-filter" checked>"#));
    }

    #[test]
    fn filter_with_no_matches_renders_placeholder() {
        let config = SkilldexConfig::default();
        let state = ListState {
            only_detailed: true,
            ..ListState::default()
        };
        let view = ListView::build(&skills(), &available(&[]), state, &config);
        let html = view.render(&config);
        assert_eq!(html.matches("<tr data-skill-id=").count(), 0);
        assert!(html.contains(NO_MATCHES_MESSAGE));
    }

    #[test]
    fn sort_toggles_direction_on_same_column() {
        let mut state = ListState::default();
        assert!(state.sort_by(Column::Name));
        assert_eq!(state.sort.direction, SortDirection::Descending);

        assert!(state.sort_by(Column::Class));
        assert_eq!(
            state.sort,
            SortOrder {
                column: Column::Class,
                direction: SortDirection::Ascending
            }
        );

        assert!(!state.sort_by(Column::Image));
        assert_eq!(state.sort.column, Column::Class);
    }

    #[test]
    fn sort_by_class_is_stable() {
        let config = SkilldexConfig::default();
        let mut state = ListState::default();
        state.sort_by(Column::Class);
        let view = ListView::build(&skills(), &available(&[]), state, &config);
        // Barbarian < Paladin < Sorceress; the two Sorceress rows keep source
        // order (Fireball before Blink).
        assert_eq!(names(&view), vec!["anvil", "Zeal", "Fireball", "Blink"]);

        state.sort_by(Column::Class);
        let view = ListView::build(&skills(), &available(&[]), state, &config);
        assert_eq!(names(&view), vec!["Fireball", "Blink", "Zeal", "anvil"]);
    }

    #[test]
    fn only_available_names_are_links() {
        let config = SkilldexConfig::default();
        let view = ListView::build(&skills(), &available(&["blink"]), ListState::default(), &config);
        let html = view.render(&config);
        assert!(html.contains(
            r#"<a href="./?skill=blink" class="view-skill-btn" data-action="show-skill" data-skill-id="blink">Blink</a>"#
        ));
        assert!(!html.contains(r#"data-skill-id="fireball">Fireball</a>"#));
        assert!(html.contains(r#"<tr data-skill-id="fireball" data-has-page="false">"#));
    }

    #[test]
    fn headers_mark_active_sort_and_skip_image() {
        let config = SkilldexConfig::default();
        let view = ListView::build(&skills(), &available(&[]), ListState::default(), &config);
        let html = view.render(&config);
        assert!(html.contains("<th>Image</th>"));
        assert!(html.contains(
            r#"<th class="is-sortable is-sorted-asc" data-action="sort" data-column="name" aria-sort="ascending">Name</th>"#
        ));
        assert!(html.contains(r#"<th class="is-sortable" data-action="sort" data-column="tab">Tab</th>"#));
        assert!(!html.contains(r#"data-column="image""#));
    }

    #[test]
    fn names_are_escaped() {
        let config = SkilldexConfig::default();
        let skills: Vec<SkillSummary> = SkillRegistry::parse(
            "skills.json",
            r#"{"skills":[{"id":"x","name":"<script>","class":1,"tab":1}]}"#,
        )
        .unwrap();
        let view = ListView::build(&skills, &available(&["x"]), ListState::default(), &config);
        let html = view.render(&config);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn column_keys_round_trip() {
        for column in Column::ALL {
            assert_eq!(Column::from_key(column.key()), Some(column));
        }
        assert_eq!(Column::from_key("level"), None);
    }
}
