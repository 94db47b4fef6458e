//! Application state.
//!
//! [`Skilldex`] owns everything a page needs: configuration, the skill
//! source, the registry, the availability cache and the per-view UI state.
//! It is driven by the host, which calls an operation, awaits the
//! [`RenderOutcome`] and presents the resulting [`Page`].
//!
//! # Design Invariants
//!
//! 1. **Latest navigation wins**: every navigation takes a ticket from the
//!    render generation; an operation whose ticket is superseded by the time
//!    its awaits resolve returns [`RenderOutcome::Stale`] and touches no view
//!    state.
//!
//! 2. **No borrow across awaits**: registry and view state live in `RefCell`s
//!    that are only borrowed between awaits, so the host may share the state
//!    through an `Rc` and start a new navigation while another is pending.
//!
//! 3. **Redraws never fetch**: filter, sort and scaling toggles operate on the
//!    last rendered view.
//!
//! # Failure Modes
//!
//! | Failure | Page |
//! |---------|------|
//! | Skill list fetch/parse | list error notice |
//! | Unknown skill id | list, URL replaced |
//! | Detail fetch/parse | detail error notice, titled with the skill name |

use std::cell::{Cell, Ref, RefCell};

use tracing::{debug, error, info, warn};

use crate::availability::AvailabilityCache;
use crate::clock::Clock;
use crate::config::SkilldexConfig;
use crate::detail_view::{self, DetailView, ScalingToggle};
use crate::error::SkilldexError;
use crate::list_view::{self, Column, ListState, ListView};
use crate::model::SkillDetail;
use crate::nav::{self, HistoryUpdate, NavOrigin, RenderGeneration, RenderTicket, Route};
use crate::registry::SkillRegistry;
use crate::source::SkillSource;
use crate::storage::StorageBackend;

/// Title of the list page.
pub const LIST_TITLE: &str = "All Skills";

/// What the page currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum View {
    /// Nothing rendered yet.
    #[default]
    Blank,
    List,
    Detail { id: String },
    DetailError { id: String },
}

/// Everything the host needs to update the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub view: View,
    pub title: String,
    pub breadcrumb_html: String,
    pub content_html: String,
    pub history: HistoryUpdate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Rendered(Page),
    /// A newer navigation started while this one was loading.
    Stale,
}

impl RenderOutcome {
    #[must_use]
    pub fn page(&self) -> Option<&Page> {
        match self {
            Self::Rendered(page) => Some(page),
            Self::Stale => None,
        }
    }

    #[must_use]
    pub fn into_page(self) -> Option<Page> {
        match self {
            Self::Rendered(page) => Some(page),
            Self::Stale => None,
        }
    }
}

/// The skill browser.
pub struct Skilldex<S, B, C> {
    config: SkilldexConfig,
    source: S,
    registry: RefCell<SkillRegistry>,
    availability: AvailabilityCache<B, C>,
    list_state: Cell<ListState>,
    list: RefCell<Option<ListView>>,
    detail: RefCell<Option<DetailView>>,
    view: RefCell<View>,
    generation: RenderGeneration,
}

impl<S: SkillSource, B: StorageBackend, C: Clock> Skilldex<S, B, C> {
    pub fn new(config: SkilldexConfig, source: S, storage: B, clock: C) -> Self {
        let availability = AvailabilityCache::new(
            storage,
            clock,
            config.cache_key.clone(),
            config.cache_ttl_ms(),
        )
        .with_policy(config.availability.clone());
        Self {
            config,
            source,
            registry: RefCell::new(SkillRegistry::new()),
            availability,
            list_state: Cell::new(ListState::default()),
            list: RefCell::new(None),
            detail: RefCell::new(None),
            view: RefCell::new(View::Blank),
            generation: RenderGeneration::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &SkilldexConfig {
        &self.config
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    #[must_use]
    pub fn registry(&self) -> Ref<'_, SkillRegistry> {
        self.registry.borrow()
    }

    #[must_use]
    pub fn availability(&self) -> &AvailabilityCache<B, C> {
        &self.availability
    }

    #[must_use]
    pub fn current_view(&self) -> View {
        self.view.borrow().clone()
    }

    #[must_use]
    pub fn list_state(&self) -> ListState {
        self.list_state.get()
    }

    /// Initial render for the page's `location.search`.
    pub async fn start(&self, query: &str) -> RenderOutcome {
        let route = Route::from_query(query, &self.config.query_param);
        info!(?route, "starting");
        self.navigate(route, NavOrigin::Initial).await
    }

    pub async fn navigate(&self, route: Route, origin: NavOrigin) -> RenderOutcome {
        let history = origin.history_for(&route, &self.config.query_param);
        debug!(?route, ?origin, "navigate");
        match route {
            Route::List => self.show_list(history).await,
            Route::Skill(id) => self.show_detail(&id, history).await,
        }
    }

    /// Render the skill table.
    pub async fn show_list(&self, history: HistoryUpdate) -> RenderOutcome {
        let ticket = self.generation.begin();
        self.ensure_loaded().await;
        if !self.is_current(ticket) {
            return RenderOutcome::Stale;
        }

        let (failed, ids) = {
            let registry = self.registry.borrow();
            let ids: Vec<String> = registry.ids().into_iter().map(str::to_owned).collect();
            (registry.is_failed(), ids)
        };
        if failed {
            return RenderOutcome::Rendered(self.list_message_page(list_view::LOAD_ERROR_MESSAGE, history));
        }
        if self.registry.borrow().is_empty() {
            return RenderOutcome::Rendered(self.list_message_page(list_view::NO_SKILLS_MESSAGE, history));
        }

        let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let available = self
            .availability
            .available_ids(&self.source, &id_refs, |id| self.config.detail_path(id))
            .await;
        if !self.is_current(ticket) {
            return RenderOutcome::Stale;
        }

        let view = ListView::build(
            self.registry.borrow().skills(),
            &available,
            self.list_state.get(),
            &self.config,
        );
        *self.list.borrow_mut() = Some(view);
        self.detail.borrow_mut().take();
        *self.view.borrow_mut() = View::List;
        match self.list_page(history) {
            Some(page) => RenderOutcome::Rendered(page),
            None => RenderOutcome::Stale,
        }
    }

    /// Render the detail page of `id`, or fall back to the list.
    pub async fn show_detail(&self, id: &str, history: HistoryUpdate) -> RenderOutcome {
        let ticket = self.generation.begin();
        self.ensure_loaded().await;
        if !self.is_current(ticket) {
            return RenderOutcome::Stale;
        }

        let found = self.registry.borrow().find(id).cloned();
        let Some(summary) = found else {
            warn!(id, "unknown skill, showing list");
            let replace = HistoryUpdate::Replace(Route::List.to_query(&self.config.query_param));
            return self.show_list(replace).await;
        };

        let path = self.config.detail_path(&summary.id);
        let result = self.fetch_detail(&path).await;
        if !self.is_current(ticket) {
            debug!(id, "discarding stale detail render");
            return RenderOutcome::Stale;
        }

        let breadcrumb_html = nav::breadcrumb(Some(&summary.name));
        match result {
            Ok(detail) => {
                let view = DetailView::new(&summary, detail, &self.config);
                let content_html = view.render();
                *self.detail.borrow_mut() = Some(view);
                *self.view.borrow_mut() = View::Detail { id: summary.id.clone() };
                RenderOutcome::Rendered(Page {
                    view: View::Detail { id: summary.id },
                    title: summary.name,
                    breadcrumb_html,
                    content_html,
                    history,
                })
            }
            Err(e) => {
                error!(id, error = %e, "error loading skill data");
                self.detail.borrow_mut().take();
                *self.view.borrow_mut() = View::DetailError { id: summary.id.clone() };
                RenderOutcome::Rendered(Page {
                    view: View::DetailError { id: summary.id },
                    title: summary.name,
                    breadcrumb_html,
                    content_html: detail_view::render_error(),
                    history,
                })
            }
        }
    }

    /// Set the "details only" filter. Returns the redrawn list if it is shown.
    pub fn set_filter(&self, only_detailed: bool) -> Option<Page> {
        let mut state = self.list_state.get();
        state.only_detailed = only_detailed;
        self.update_list_state(state)
    }

    /// Sort by `column`. Returns the redrawn list if the sort changed and the
    /// list is shown.
    pub fn sort_by(&self, column: Column) -> Option<Page> {
        let mut state = self.list_state.get();
        if !state.sort_by(column) {
            return None;
        }
        self.update_list_state(state)
    }

    /// Flip the scaling section of the shown detail page.
    pub fn toggle_scaling(&self) -> Option<ScalingToggle> {
        self.detail.borrow_mut().as_mut().map(DetailView::toggle_scaling)
    }

    /// Forget the availability set; the next list render probes again.
    pub fn refresh_availability(&self) {
        self.availability.invalidate();
    }

    fn update_list_state(&self, state: ListState) -> Option<Page> {
        self.list_state.set(state);
        if let Some(list) = self.list.borrow_mut().as_mut() {
            list.set_state(state);
        }
        if *self.view.borrow() != View::List {
            return None;
        }
        self.list_page(HistoryUpdate::None)
    }

    fn list_page(&self, history: HistoryUpdate) -> Option<Page> {
        let list = self.list.borrow();
        let list = list.as_ref()?;
        Some(Page {
            view: View::List,
            title: LIST_TITLE.to_owned(),
            breadcrumb_html: nav::breadcrumb(None),
            content_html: list.render(&self.config),
            history,
        })
    }

    fn list_message_page(&self, message: &str, history: HistoryUpdate) -> Page {
        self.list.borrow_mut().take();
        self.detail.borrow_mut().take();
        *self.view.borrow_mut() = View::List;
        Page {
            view: View::List,
            title: LIST_TITLE.to_owned(),
            breadcrumb_html: nav::breadcrumb(None),
            content_html: list_view::render_message(message),
            history,
        }
    }

    async fn ensure_loaded(&self) {
        if self.registry.borrow().is_loaded() {
            return;
        }
        let result = SkillRegistry::fetch(&self.source, &self.config.skills_path).await;
        // Error already logged by the registry.
        let _ = self.registry.borrow_mut().apply(result);
    }

    async fn fetch_detail(&self, path: &str) -> Result<SkillDetail, SkilldexError> {
        let body = self
            .source
            .get_text(path)
            .await
            .map_err(|source| SkilldexError::Fetch {
                path: path.to_owned(),
                source,
            })?;
        serde_json::from_str(&body).map_err(|source| SkilldexError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    fn is_current(&self, ticket: RenderTicket) -> bool {
        self.generation.is_current(ticket)
    }
}

impl<S, B, C> std::fmt::Debug for Skilldex<S, B, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Skilldex")
            .field("view", &self.view.borrow())
            .field("list_state", &self.list_state.get())
            .field("skills", &self.registry.borrow().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::source::MemorySource;
    use crate::storage::MemoryStorage;
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use std::future::Future;
    use std::pin::pin;
    use std::task::{Context, Poll};

    const LIST: &str = r#"{"skills":[
        {"id":"fireball","name":"Fireball","class":1,"tab":2,"tag":["Fire"]},
        {"id":"blink","name":"Blink","class":1,"tab":1,"tag":["Arcane"]},
        {"id":"","name":"Anvil","class":4,"tab":7,"tag":"Melee"}
    ]}"#;

    const FIREBALL: &str = r#"{"category":"Fire","description":["Deals damage."],
        "scaling":[{"level":1,"damage":10},{"level":2,"damage":20}]}"#;

    type App = Skilldex<MemorySource, MemoryStorage, ManualClock>;

    fn app(source: MemorySource) -> App {
        Skilldex::new(
            SkilldexConfig::default(),
            source,
            MemoryStorage::new(),
            ManualClock::new(1_000),
        )
    }

    fn seeded() -> App {
        app(MemorySource::new()
            .with_file("skills.json", LIST)
            .with_file("skill_data/fireball.json", FIREBALL))
    }

    fn rendered(outcome: RenderOutcome) -> Page {
        outcome.into_page().expect("rendered page")
    }

    #[test]
    fn start_without_query_renders_list() {
        let app = seeded();
        let page = rendered(block_on(app.start("")));
        assert_eq!(page.view, View::List);
        assert_eq!(page.title, "All Skills");
        assert_eq!(page.history, HistoryUpdate::None);
        assert_eq!(page.content_html.matches("<tr data-skill-id=").count(), 3);
        assert!(page.content_html.contains(r#"data-skill-id="fireball">Fireball</a>"#));
        assert!(!page.content_html.contains(r#"data-skill-id="blink">Blink</a>"#));
        assert_eq!(app.current_view(), View::List);
    }

    #[test]
    fn start_with_query_renders_detail() {
        let app = seeded();
        let page = rendered(block_on(app.start("?skill=fireball")));
        assert_eq!(page.view, View::Detail { id: "fireball".into() });
        assert_eq!(page.title, "Fireball");
        assert!(page.breadcrumb_html.contains("Fireball"));
        assert!(page.content_html.contains("<th>Damage</th>"));
    }

    #[test]
    fn unknown_id_falls_back_to_list_and_replaces_url() {
        let app = seeded();
        let page = rendered(block_on(app.start("?skill=nope")));
        assert_eq!(page.view, View::List);
        assert_eq!(page.history, HistoryUpdate::Replace(String::new()));
    }

    #[test]
    fn failed_detail_fetch_shows_error_page() {
        let app = seeded();
        let page = rendered(block_on(
            app.navigate(Route::Skill("blink".into()), NavOrigin::Link),
        ));
        assert_eq!(page.view, View::DetailError { id: "blink".into() });
        assert_eq!(page.title, "Blink");
        assert_eq!(page.content_html, detail_view::render_error());
        assert_eq!(page.history, HistoryUpdate::Push("?skill=blink".into()));
        assert_eq!(app.toggle_scaling(), None);
    }

    #[test]
    fn failed_list_load_shows_error_notice_then_recovers() {
        let source = MemorySource::new();
        let app = app(source);
        let page = rendered(block_on(app.start("")));
        assert_eq!(page.content_html, "<p>Error loading skills. Please try again later.</p>");

        app.source().insert("skills.json", r#"{"skills":[]}"#);
        let page = rendered(block_on(app.show_list(HistoryUpdate::None)));
        assert_eq!(page.content_html, "<p>No skills found.</p>");
    }

    #[test]
    fn filter_and_sort_redraw_without_fetching() {
        let app = seeded();
        block_on(app.start(""));
        let gets = app.source().get_count();
        let probes = app.source().probe_count();

        let page = app.set_filter(true).expect("list redraw");
        assert_eq!(page.history, HistoryUpdate::None);
        assert_eq!(page.content_html.matches("<tr data-skill-id=").count(), 1);

        let page = app.sort_by(Column::Name).expect("list redraw");
        assert!(page.content_html.contains(r#"aria-sort="descending""#));
        assert_eq!(app.sort_by(Column::Image), None);

        assert_eq!(app.source().get_count(), gets);
        assert_eq!(app.source().probe_count(), probes);
        assert!(app.list_state().only_detailed);
    }

    #[test]
    fn filter_survives_a_detail_round_trip() {
        let app = seeded();
        block_on(app.start("?skill=fireball"));
        assert_eq!(app.set_filter(true), None);

        let page = rendered(block_on(app.navigate(Route::List, NavOrigin::Link)));
        assert_eq!(page.history, HistoryUpdate::Push(String::new()));
        assert!(page.content_html.contains("checked"));
        assert_eq!(page.content_html.matches("<tr data-skill-id=").count(), 1);
    }

    #[test]
    fn scaling_toggle_applies_to_detail_only() {
        let app = seeded();
        block_on(app.start(""));
        assert_eq!(app.toggle_scaling(), None);

        block_on(app.start("?skill=fireball"));
        assert_eq!(app.toggle_scaling().map(|t| t.label), Some("Hide"));
        assert_eq!(app.toggle_scaling().map(|t| t.hidden), Some(true));
    }

    #[test]
    fn superseded_render_is_stale() {
        let app = seeded();
        block_on(app.start(""));
        app.source().set_yields(1);

        let waker = futures::task::noop_waker();
        let mut cx = Context::from_waker(&waker);
        let mut detail = pin!(app.show_detail("fireball", HistoryUpdate::None));
        assert!(detail.as_mut().poll(&mut cx).is_pending());

        let list = block_on(app.show_list(HistoryUpdate::None));
        assert!(list.page().is_some());

        assert_eq!(detail.as_mut().poll(&mut cx), Poll::Ready(RenderOutcome::Stale));
        assert_eq!(app.current_view(), View::List);
        assert_eq!(app.toggle_scaling(), None);
    }
}
