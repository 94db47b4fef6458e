//! Detail page of a single skill.
//!
//! # Scaling section
//!
//! | Skill | Section content |
//! |-------|-----------------|
//! | Orange text (class Other, tab 2) | fixed notice, never a table |
//! | no scaling entries | "does not scale" notice |
//! | otherwise | Level column plus one column per stat of the first entry |
//!
//! The section starts hidden behind a toggle button; the toggle state lives
//! on the view so a redraw keeps it.

use std::fmt::Write;

use crate::config::SkilldexConfig;
use crate::html::{Escaped, paragraphs};
use crate::model::{SkillDetail, SkillSummary};

pub const ORANGE_TEXT_NOTICE: &str = "Skills coming from Orange text do not scale with skill levels :(";
pub const NO_SCALING_NOTICE: &str = "This skill does not scale with skill levels";
pub const LOAD_ERROR_MESSAGE: &str =
    "There was an error while loading skill data (or there isn't any data to load)";

/// CSS class that hides the scaling container.
pub const HIDDEN_CLASS: &str = "is-hidden";
pub const SCALING_TOGGLE_ID: &str = "toggle-scaling";
pub const SCALING_CONTAINER_ID: &str = "scaling-container";

/// Header text for a stat key: `fire_damage` becomes `Fire Damage`.
#[must_use]
pub fn format_stat_name(stat: &str) -> String {
    stat.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Resolved content of the scaling section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scaling {
    OrangeText,
    None,
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
}

/// State of the scaling toggle after a click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScalingToggle {
    pub hidden: bool,
    pub label: &'static str,
}

#[derive(Debug, Clone)]
pub struct DetailView {
    id: String,
    name: String,
    image: Option<String>,
    orange_text: bool,
    detail: SkillDetail,
    scaling_hidden: bool,
}

impl DetailView {
    #[must_use]
    pub fn new(summary: &SkillSummary, detail: SkillDetail, config: &SkilldexConfig) -> Self {
        let image = summary
            .image
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| config.icon_path(Some(s)));
        Self {
            id: summary.id.clone(),
            name: summary.name.clone(),
            image,
            orange_text: summary.is_orange_text(),
            detail,
            scaling_hidden: true,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn detail(&self) -> &SkillDetail {
        &self.detail
    }

    #[must_use]
    pub fn is_orange_text(&self) -> bool {
        self.orange_text
    }

    #[must_use]
    pub fn scaling_hidden(&self) -> bool {
        self.scaling_hidden
    }

    /// Button label for the current toggle state.
    #[must_use]
    pub fn scaling_label(&self) -> &'static str {
        if self.scaling_hidden { "Show" } else { "Hide" }
    }

    pub fn toggle_scaling(&mut self) -> ScalingToggle {
        self.scaling_hidden = !self.scaling_hidden;
        ScalingToggle {
            hidden: self.scaling_hidden,
            label: self.scaling_label(),
        }
    }

    #[must_use]
    pub fn scaling(&self) -> Scaling {
        if self.orange_text {
            return Scaling::OrangeText;
        }
        if self.detail.scaling.is_empty() {
            return Scaling::None;
        }
        let columns = self.detail.stat_columns();
        let headers = std::iter::once("Level".to_owned())
            .chain(columns.iter().map(|c| format_stat_name(c)))
            .collect();
        let rows = self
            .detail
            .scaling
            .iter()
            .map(|row| {
                std::iter::once(row.level_text())
                    .chain(columns.iter().map(|c| row.stat_text(c)))
                    .collect()
            })
            .collect();
        Scaling::Table { headers, rows }
    }

    #[must_use]
    pub fn render(&self) -> String {
        let detail = &self.detail;
        let mut out = String::with_capacity(1024 + detail.scaling.len() * 128);
        out.push_str(r#"<div class="skill-detail"><div class="skill-info">"#);

        if let Some(image) = &self.image {
            let _ = write!(
                out,
                r#"<img src="{}" alt="{}" class="skill-image">"#,
                Escaped(image),
                Escaped(&self.name)
            );
        }
        if !detail.category.trim().is_empty() {
            section_heading(&mut out, "Category");
            let _ = write!(out, "<p>{}</p><br>", Escaped(&detail.category));
        }
        if let Some(damage_type) = detail.damage_type.as_deref()
            && !damage_type.trim().is_empty()
        {
            section_heading(&mut out, "Damage type");
            let _ = write!(out, "<p>{}</p><br>", Escaped(damage_type));
        }
        if !detail.restriction.is_empty() {
            section_heading(&mut out, "Restriction");
            for item in detail.restriction.iter() {
                let _ = write!(out, r#"<p><span class="has-text-danger">{}</span></p>"#, Escaped(item));
            }
            out.push_str("<br>");
        }
        if !detail.description.is_empty() {
            section_heading(&mut out, "Description");
            let class = self.orange_text.then_some("has-text-warning");
            paragraphs(&mut out, detail.description.iter(), class);
            out.push_str("<br>");
        }
        if !detail.synergies.is_empty() {
            section_heading(&mut out, "Synergies");
            paragraphs(&mut out, detail.synergies.iter(), None);
            out.push_str("<br>");
        }
        out.push_str("</div>");

        self.render_scaling(&mut out);
        out.push_str("</div>");
        out
    }

    fn render_scaling(&self, out: &mut String) {
        let hidden = if self.scaling_hidden {
            format!(" class=\"{HIDDEN_CLASS}\"")
        } else {
            String::new()
        };
        let _ = write!(
            out,
            r#"<p class="is-size-4"><strong>Skill Scaling (only soft points):</strong> <button class="button is-primary is-outlined" id="{SCALING_TOGGLE_ID}" data-action="toggle-scaling">{}</button></p><div id="{SCALING_CONTAINER_ID}"{hidden}>"#,
            self.scaling_label()
        );
        match self.scaling() {
            Scaling::OrangeText => {
                let _ = write!(out, r#"<p class="has-text-danger">{}</p>"#, Escaped(ORANGE_TEXT_NOTICE));
            }
            Scaling::None => {
                let _ = write!(out, r#"<p class="has-text-danger">{NO_SCALING_NOTICE}</p>"#);
            }
            Scaling::Table { headers, rows } => {
                out.push_str(r#"<table class="table is-hoverable is-fullwidth"><thead><tr>"#);
                for header in &headers {
                    let _ = write!(out, "<th>{}</th>", Escaped(header));
                }
                out.push_str("</tr></thead><tbody>");
                for row in &rows {
                    out.push_str("<tr>");
                    for cell in row {
                        let _ = write!(out, "<td>{}</td>", Escaped(cell));
                    }
                    out.push_str("</tr>");
                }
                out.push_str("</tbody></table>");
            }
        }
        out.push_str("</div>");
    }
}

fn section_heading(out: &mut String, label: &str) {
    let _ = write!(out, r#"<p class="is-size-5"><strong>{label}:</strong></p>"#);
}

/// Content shown when a detail record cannot be fetched or parsed.
#[must_use]
pub fn render_error() -> String {
    format!("<p>{}</p>", Escaped(LOAD_ERROR_MESSAGE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn summary(json: &str) -> SkillSummary {
        serde_json::from_str(json).unwrap()
    }

    fn detail(json: &str) -> SkillDetail {
        serde_json::from_str(json).unwrap()
    }

    fn fireball() -> DetailView {
        DetailView::new(
            &summary(r#"{"id":"fireball","name":"Fireball","class":1,"tab":2,"tag":["Fire"],"image":"1/fireball.png"}"#),
            detail(
                r#"{"category":"Fire","description":["Deals damage."],
                    "scaling":[{"level":1,"fire_damage":10},{"level":2,"fire_damage":20}]}"#,
            ),
            &SkilldexConfig::default(),
        )
    }

    #[test]
    fn stat_names_are_title_cased() {
        assert_eq!(format_stat_name("fire_damage"), "Fire Damage");
        assert_eq!(format_stat_name("radius"), "Radius");
        assert_eq!(format_stat_name("mana_cost_per_second"), "Mana Cost Per Second");
        assert_eq!(format_stat_name("ÿes_no"), "Ÿes No");
        assert_eq!(format_stat_name(""), "");
    }

    #[test]
    fn scaling_table_uses_first_entry_columns() {
        let view = fireball();
        assert_eq!(
            view.scaling(),
            Scaling::Table {
                headers: vec!["Level".into(), "Fire Damage".into()],
                rows: vec![
                    vec!["1".into(), "10".into()],
                    vec!["2".into(), "20".into()],
                ],
            }
        );
    }

    #[test]
    fn missing_stats_render_as_empty_cells() {
        let view = DetailView::new(
            &summary(r#"{"id":"nova","name":"Nova","class":1,"tab":3}"#),
            detail(r#"{"scaling":[{"level":1,"a":1,"b":"x"},{"level":2,"a":2}]}"#),
            &SkilldexConfig::default(),
        );
        let Scaling::Table { rows, .. } = view.scaling() else {
            panic!("expected a table");
        };
        assert_eq!(rows[1], vec!["2".to_string(), "2".to_string(), String::new()]);
        assert_eq!(rows[0][2], "x");
    }

    #[test]
    fn float_levels_and_stats_render_as_written() {
        let view = DetailView::new(
            &summary(r#"{"id":"nova","name":"Nova","class":1,"tab":3}"#),
            detail(r#"{"scaling":[{"level":1.0,"damage":10.0,"radius":1.5}]}"#),
            &SkilldexConfig::default(),
        );
        let Scaling::Table { rows, .. } = view.scaling() else {
            panic!("expected a table");
        };
        assert_eq!(rows[0], vec!["1".to_string(), "10".to_string(), "1.5".to_string()]);
        assert!(view.render().contains("<td>10</td>"));
    }

    #[test]
    fn orange_text_never_shows_a_table() {
        let view = DetailView::new(
            &summary(r#"{"id":"ot","name":"Glow","class":-1,"tab":2}"#),
            detail(r#"{"description":"Shines.","scaling":[{"level":1,"light":3}]}"#),
            &SkilldexConfig::default(),
        );
        assert!(view.is_orange_text());
        assert_eq!(view.scaling(), Scaling::OrangeText);
        let html = view.render();
        assert!(html.contains(ORANGE_TEXT_NOTICE));
        assert!(!html.contains("<table"));
        assert!(html.contains(r#"<p class="has-text-warning">Shines.</p>"#));
    }

    #[test]
    fn empty_scaling_shows_notice() {
        let view = DetailView::new(
            &summary(r#"{"id":"x","name":"X","class":2,"tab":1}"#),
            detail(r#"{"category":"Curse","scaling":[]}"#),
            &SkilldexConfig::default(),
        );
        assert_eq!(view.scaling(), Scaling::None);
        assert!(view.render().contains(NO_SCALING_NOTICE));
    }

    #[test]
    fn render_includes_present_sections_only() {
        let html = fireball().render();
        assert!(html.contains(r#"<img src="icons/1/fireball.png" alt="Fireball" class="skill-image">"#));
        assert!(html.contains("<strong>Category:</strong></p><p>Fire</p>"));
        assert!(html.contains("<strong>Description:</strong></p><p>Deals damage.</p>"));
        assert!(!html.contains("Damage type"));
        assert!(!html.contains("Restriction"));
        assert!(!html.contains("Synergies"));
        assert!(html.contains("<th>Fire Damage</th>"));
        assert_eq!(html.matches("<tr>").count(), 3);
    }

    #[test]
    fn restriction_lines_are_danger_styled() {
        let view = DetailView::new(
            &summary(r#"{"id":"x","name":"X","class":4,"tab":1}"#),
            detail(r#"{"restriction":["Requires a shield","<b>Melee</b>"],"synergies":["A","B"]}"#),
            &SkilldexConfig::default(),
        );
        let html = view.render();
        assert!(html.contains(r#"<p><span class="has-text-danger">Requires a shield</span></p>"#));
        assert!(html.contains("&lt;b&gt;Melee&lt;/b&gt;"));
        assert!(html.contains("<strong>Synergies:</strong></p><p>A</p><p>B</p>"));
    }

    #[test]
    fn scaling_toggle_flips_label_and_visibility() {
        let mut view = fireball();
        assert!(view.scaling_hidden());
        assert!(view.render().contains(r#"<div id="scaling-container" class="is-hidden">"#));

        assert_eq!(
            view.toggle_scaling(),
            ScalingToggle {
                hidden: false,
                label: "Hide"
            }
        );
        let html = view.render();
        assert!(html.contains(r#"<div id="scaling-container">"#));
        assert!(html.contains(r#"data-action="toggle-scaling">Hide</button>"#));

        assert_eq!(view.toggle_scaling().label, "Show");
    }

    #[test]
    fn error_page_message() {
        assert_eq!(
            render_error(),
            "<p>There was an error while loading skill data (or there isn&#39;t any data to load)</p>"
        );
    }
}
