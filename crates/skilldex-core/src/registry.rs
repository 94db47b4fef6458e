//! The loaded skill list.

use tracing::{error, info};

use crate::error::{SkilldexError, SkilldexResult};
use crate::model::{SkillList, SkillSummary};
use crate::source::SkillSource;

/// Load progress of the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loaded,
    /// Last attempt failed; the message is suitable for logs, not users.
    Failed(String),
}

/// Ordered skill summaries from the list resource.
///
/// Written once per successful load and read-only afterwards.
#[derive(Debug, Clone)]
pub struct SkillRegistry {
    skills: Vec<SkillSummary>,
    state: LoadState,
}

impl Default for SkillRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SkillRegistry {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            skills: Vec::new(),
            state: LoadState::Unloaded,
        }
    }

    /// Registry pre-populated with `skills`, marked as loaded.
    #[must_use]
    pub fn from_skills(skills: Vec<SkillSummary>) -> Self {
        Self {
            skills,
            state: LoadState::Loaded,
        }
    }

    /// Parse the body of the list resource.
    pub fn parse(path: &str, body: &str) -> SkilldexResult<Vec<SkillSummary>> {
        serde_json::from_str::<SkillList>(body)
            .map(|list| list.skills)
            .map_err(|source| SkilldexError::Parse {
                path: path.to_owned(),
                source,
            })
    }

    /// Fetch the list resource from `source` at `path`.
    ///
    /// This never touches a registry, so callers can fetch without holding a
    /// borrow across the await and then [`apply`](Self::apply) the result.
    pub async fn fetch<S: SkillSource>(source: &S, path: &str) -> SkilldexResult<Vec<SkillSummary>> {
        let body = source
            .get_text(path)
            .await
            .map_err(|source| SkilldexError::Fetch {
                path: path.to_owned(),
                source,
            })?;
        Self::parse(path, &body)
    }

    /// Record the outcome of a fetch.
    pub fn apply(&mut self, result: SkilldexResult<Vec<SkillSummary>>) -> SkilldexResult<usize> {
        match result {
            Ok(skills) => {
                let count = skills.len();
                self.skills = skills;
                self.state = LoadState::Loaded;
                info!(count, "skill list loaded");
                Ok(count)
            }
            Err(e) => {
                error!(error = %e, "error loading skills");
                self.skills.clear();
                self.state = LoadState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    #[must_use]
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.state == LoadState::Loaded
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self.state, LoadState::Failed(_))
    }

    /// Summary with the given id. Empty ids never match.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&SkillSummary> {
        if id.trim().is_empty() {
            return None;
        }
        self.skills.iter().find(|s| s.id == id)
    }

    /// Non-empty ids in list order.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.skills
            .iter()
            .filter(|s| s.has_id())
            .map(|s| s.id.as_str())
            .collect()
    }

    #[must_use]
    pub fn skills(&self) -> &[SkillSummary] {
        &self.skills
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.skills.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}
