//! Data model for `skills.json` and `skill_data/<id>.json`.
//!
//! Several fields in the source data are either a single string or a list of
//! strings depending on who authored the record. They are normalized into
//! [`TextList`] at deserialization time so the renderers only ever see an
//! ordered sequence.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Number, Value};

/// Ordered list of text items (tags, paragraphs, restriction lines).
///
/// Deserializes from a string, a list of strings, or `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "OneOrMany")]
pub struct TextList(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Null,
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for TextList {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::Null => Self(Vec::new()),
            OneOrMany::One(s) => Self(vec![s]),
            OneOrMany::Many(v) => Self(v),
        }
    }
}

impl TextList {
    #[must_use]
    pub fn new(items: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self(items.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|s| s.trim().is_empty())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Join non-blank items with `sep`.
    #[must_use]
    pub fn join(&self, sep: &str) -> String {
        self.iter()
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(sep)
    }
}

impl<'a> IntoIterator for &'a TextList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One entry of the skill list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SkillSummary {
    /// Empty when the skill has no detail page.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    pub name: String,
    /// Icon path relative to the icon directory.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, alias = "category")]
    pub tag: TextList,
    #[serde(rename = "class")]
    pub class_id: i32,
    pub tab: i32,
}

impl SkillSummary {
    /// Whether the skill could ever be linked to a detail page.
    #[must_use]
    pub fn has_id(&self) -> bool {
        !self.id.trim().is_empty()
    }

    #[must_use]
    pub fn class_name(&self) -> &'static str {
        crate::taxonomy::class_name(self.class_id)
    }

    #[must_use]
    pub fn tab_label(&self) -> &'static str {
        crate::taxonomy::tab_label(self.class_id, self.tab)
    }

    #[must_use]
    pub fn is_orange_text(&self) -> bool {
        crate::taxonomy::is_orange_text(self.class_id, self.tab)
    }
}

/// Body of `skills.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkillList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<SkillSummary>,
}

/// Per-level stats of a skill; `stats` keeps the source key order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScalingRow {
    pub level: Number,
    #[serde(flatten)]
    pub stats: Map<String, Value>,
}

impl ScalingRow {
    #[must_use]
    pub fn level_text(&self) -> String {
        number_text(&self.level)
    }

    /// Cell text for a stat: strings unquoted, numbers as written, missing empty.
    #[must_use]
    pub fn stat_text(&self, key: &str) -> String {
        match self.stats.get(key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => number_text(n),
            Some(other) => other.to_string(),
        }
    }
}

/// Shortest text for a number, with integral floats printed without a
/// fraction (`10.0` is `10`, `1e3` is `1000`).
#[must_use]
pub fn number_text(n: &Number) -> String {
    if n.is_f64()
        && let Some(f) = n.as_f64()
        && f.is_finite()
        && f.fract() == 0.0
        && f.abs() < 1e21
    {
        if f == 0.0 {
            return "0".to_owned();
        }
        return format!("{f:.0}");
    }
    n.to_string()
}

/// Body of `skill_data/<id>.json`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SkillDetail {
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default)]
    pub damage_type: Option<String>,
    #[serde(default)]
    pub description: TextList,
    #[serde(default)]
    pub restriction: TextList,
    #[serde(default)]
    pub synergies: TextList,
    #[serde(default, deserialize_with = "null_as_default")]
    pub scaling: Vec<ScalingRow>,
}

impl SkillDetail {
    /// Stat columns, taken from the first scaling entry.
    #[must_use]
    pub fn stat_columns(&self) -> Vec<&str> {
        self.scaling
            .first()
            .map(|row| row.stats.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn text_list_accepts_string_list_or_null() {
        let one: TextList = serde_json::from_str(r#""Deals damage.""#).unwrap();
        assert_eq!(one, TextList::new(["Deals damage."]));

        let many: TextList = serde_json::from_str(r#"["a", "b"]"#).unwrap();
        assert_eq!(many.len(), 2);
        assert_eq!(many.join(" | "), "a | b");

        let none: TextList = serde_json::from_str("null").unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn summary_parses_class_keyword_and_tag_shapes() {
        let json = r#"{"id":"fireball","name":"Fireball","class":1,"tab":2,"tag":["Fire"]}"#;
        let skill: SkillSummary = serde_json::from_str(json).unwrap();
        assert_eq!(skill.class_id, 1);
        assert_eq!(skill.tag.first(), Some("Fire"));
        assert_eq!(skill.class_name(), "Sorceress");
        assert_eq!(skill.tab_label(), "Fire");
        assert!(skill.has_id());
        assert!(skill.image.is_none());

        let json = r#"{"id":null,"name":"Mystery","class":9,"tab":0,"category":"Misc"}"#;
        let skill: SkillSummary = serde_json::from_str(json).unwrap();
        assert!(!skill.has_id());
        assert_eq!(skill.tag.first(), Some("Misc"));
        assert_eq!(skill.class_name(), "Unknown");
    }

    #[test]
    fn detail_keeps_stat_order_and_defaults() {
        let json = r#"{
            "category": "Fire",
            "description": "Deals damage.",
            "scaling": [
                {"level": 1, "fire_damage": 10, "mana_cost": 3.5, "radius": "2 yards"},
                {"level": 2, "fire_damage": 20}
            ]
        }"#;
        let detail: SkillDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.stat_columns(), vec!["fire_damage", "mana_cost", "radius"]);
        assert_eq!(detail.scaling[0].stat_text("mana_cost"), "3.5");
        assert_eq!(detail.scaling[0].stat_text("radius"), "2 yards");
        assert_eq!(detail.scaling[1].stat_text("radius"), "");
        assert!(detail.restriction.is_empty());
        assert!(detail.synergies.is_empty());
        assert!(detail.damage_type.is_none());
    }

    #[test]
    fn scaling_numbers_render_without_float_noise() {
        let json = r#"{"scaling": [
            {"level": 1.0, "damage": 10.0, "radius": 1.50, "big": 1e3, "count": 7, "zero": -0.0}
        ]}"#;
        let detail: SkillDetail = serde_json::from_str(json).unwrap();
        let row = &detail.scaling[0];
        assert_eq!(row.level_text(), "1");
        assert_eq!(row.stat_text("damage"), "10");
        assert_eq!(row.stat_text("radius"), "1.5");
        assert_eq!(row.stat_text("big"), "1000");
        assert_eq!(row.stat_text("count"), "7");
        assert_eq!(row.stat_text("zero"), "0");
    }

    #[test]
    fn detail_with_null_scaling_is_empty() {
        let detail: SkillDetail =
            serde_json::from_str(r#"{"category":"Cold","scaling":null,"restriction":"Melee only"}"#)
                .unwrap();
        assert!(detail.scaling.is_empty());
        assert!(detail.stat_columns().is_empty());
        assert_eq!(detail.restriction.first(), Some("Melee only"));
    }

    #[test]
    fn skill_list_requires_known_shape() {
        let list: SkillList = serde_json::from_str(r#"{"skills":[]}"#).unwrap();
        assert!(list.skills.is_empty());
        assert!(serde_json::from_str::<SkillList>(r#"{"skills":[{"name":1}]}"#).is_err());
    }
}
