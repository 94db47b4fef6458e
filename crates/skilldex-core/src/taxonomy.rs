#![forbid(unsafe_code)]

//! Static class and skill-tab taxonomy.
//!
//! Every lookup is total: unknown classes or tabs resolve to [`UNKNOWN`]
//! instead of failing, so renderers never need an error path for bad data.

/// Sentinel returned for any class or tab that is not in the table.
pub const UNKNOWN: &str = "Unknown";

/// Tab index shared by the "Orange text" category of [`SkillClass::Other`].
pub const ORANGE_TEXT_TAB: i32 = 2;

/// Character classes, keyed by the integer ids used in `skills.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SkillClass {
    Other,
    Amazon,
    Sorceress,
    Necromancer,
    Paladin,
    Barbarian,
    Druid,
    Assassin,
}

impl SkillClass {
    /// All classes in id order.
    pub const ALL: [SkillClass; 8] = [
        SkillClass::Other,
        SkillClass::Amazon,
        SkillClass::Sorceress,
        SkillClass::Necromancer,
        SkillClass::Paladin,
        SkillClass::Barbarian,
        SkillClass::Druid,
        SkillClass::Assassin,
    ];

    /// Resolve a raw class id.
    #[must_use]
    pub const fn from_id(id: i32) -> Option<Self> {
        match id {
            -1 => Some(Self::Other),
            0 => Some(Self::Amazon),
            1 => Some(Self::Sorceress),
            2 => Some(Self::Necromancer),
            3 => Some(Self::Paladin),
            4 => Some(Self::Barbarian),
            5 => Some(Self::Druid),
            6 => Some(Self::Assassin),
            _ => None,
        }
    }

    /// Raw id as stored in the data files.
    #[must_use]
    pub const fn id(self) -> i32 {
        match self {
            Self::Other => -1,
            Self::Amazon => 0,
            Self::Sorceress => 1,
            Self::Necromancer => 2,
            Self::Paladin => 3,
            Self::Barbarian => 4,
            Self::Druid => 5,
            Self::Assassin => 6,
        }
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Other => "Other",
            Self::Amazon => "Amazon",
            Self::Sorceress => "Sorceress",
            Self::Necromancer => "Necromancer",
            Self::Paladin => "Paladin",
            Self::Barbarian => "Barbarian",
            Self::Druid => "Druid",
            Self::Assassin => "Assassin",
        }
    }

    /// Ordered tab descriptors for this class.
    #[must_use]
    pub const fn tabs(self) -> &'static [TabDescriptor] {
        match self {
            Self::Other => OTHER_TABS,
            Self::Amazon => AMAZON_TABS,
            Self::Sorceress => SORCERESS_TABS,
            Self::Necromancer => NECROMANCER_TABS,
            Self::Paladin => PALADIN_TABS,
            Self::Barbarian => BARBARIAN_TABS,
            Self::Druid => DRUID_TABS,
            Self::Assassin => ASSASSIN_TABS,
        }
    }
}

/// One skill tab of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabDescriptor {
    pub index: i32,
    pub name: &'static str,
}

const fn tab(index: i32, name: &'static str) -> TabDescriptor {
    TabDescriptor { index, name }
}

const OTHER_TABS: &[TabDescriptor] = &[
    tab(0, "oSkill"),
    tab(1, "Proc"),
    tab(ORANGE_TEXT_TAB, "Orange text"),
    tab(3, "Passive"),
];

const AMAZON_TABS: &[TabDescriptor] = &[
    tab(1, "Divine"),
    tab(2, "Bow"),
    tab(3, "Javelin"),
    tab(4, "Spear"),
    tab(5, "Storm"),
    tab(6, "Blood"),
    tab(7, "Mastery"),
    tab(8, "Reward"),
    tab(99, "Innate"),
];

const SORCERESS_TABS: &[TabDescriptor] = &[
    tab(1, "Arcane"),
    tab(2, "Fire"),
    tab(3, "Lightning"),
    tab(4, "Cold"),
    tab(5, "Poison"),
    tab(6, "Melee"),
    tab(7, "Mastery"),
    tab(8, "Coven"),
    tab(9, "Reward"),
    tab(99, "Innate"),
];

const NECROMANCER_TABS: &[TabDescriptor] = &[
    tab(1, "Deathspeaker"),
    tab(2, "Summon"),
    tab(3, "Melee"),
    tab(4, "Crossbow"),
    tab(5, "Malice"),
    tab(6, "Totem"),
    tab(7, "Mastery"),
    tab(8, "Reward"),
    tab(99, "Innate"),
];

const PALADIN_TABS: &[TabDescriptor] = &[
    tab(1, "Aspects"),
    tab(2, "Templar"),
    tab(3, "Incarnation"),
    tab(4, "Nephalem"),
    tab(5, "Ritualist"),
    tab(6, "Warlock"),
    tab(7, "Mastery"),
    tab(8, "Reward"),
    tab(99, "Innate"),
];

const BARBARIAN_TABS: &[TabDescriptor] = &[
    tab(1, "Nomad"),
    tab(2, "Earthshaker"),
    tab(3, "Windcarver"),
    tab(4, "Elementalist"),
    tab(5, "Warmonger"),
    tab(6, "Shaman"),
    tab(7, "Mastery"),
    tab(8, "Reward"),
    tab(99, "Innate"),
];

const DRUID_TABS: &[TabDescriptor] = &[
    tab(1, "Nature"),
    tab(2, "Werebear"),
    tab(3, "Werewolf"),
    tab(4, "Wereowl"),
    tab(5, "Hunter"),
    tab(6, "Seer"),
    tab(7, "Mastery"),
    tab(8, "Reward"),
    tab(99, "Innate"),
];

const ASSASSIN_TABS: &[TabDescriptor] = &[
    tab(1, "Ninja"),
    tab(2, "Throwing"),
    tab(3, "Claw"),
    tab(4, "Naginata"),
    tab(5, "Traps"),
    tab(6, "Psionic"),
    tab(7, "Mastery"),
    tab(8, "Reward"),
    tab(99, "Innate"),
];

/// Display name for a class id, or [`UNKNOWN`].
#[must_use]
pub fn class_name(class_id: i32) -> &'static str {
    SkillClass::from_id(class_id).map_or(UNKNOWN, SkillClass::name)
}

/// Tab label for a (class, tab) pair, or [`UNKNOWN`] if either is unrecognized.
#[must_use]
pub fn tab_label(class_id: i32, tab_id: i32) -> &'static str {
    tabs_for_class(class_id)
        .iter()
        .find(|t| t.index == tab_id)
        .map_or(UNKNOWN, |t| t.name)
}

/// Ordered tabs for a class id; empty for unknown classes.
#[must_use]
pub fn tabs_for_class(class_id: i32) -> &'static [TabDescriptor] {
    SkillClass::from_id(class_id).map_or(&[], SkillClass::tabs)
}

/// Tab indices for a class id, in table order.
#[must_use]
pub fn tab_indices(class_id: i32) -> Vec<i32> {
    tabs_for_class(class_id).iter().map(|t| t.index).collect()
}

/// Orange-text skills come from item affixes and never scale with level.
#[must_use]
pub fn is_orange_text(class_id: i32, tab_id: i32) -> bool {
    class_id == SkillClass::Other.id() && tab_id == ORANGE_TEXT_TAB
}
