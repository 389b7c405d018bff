//! src/controller/view_controller.rs
//! ============================================================================
//! # ViewStateController
//!
//! Single authority for what is visible. It owns the browsing state and
//! reconciles three inputs against it: user actions, navigation locations
//! (startup + back/forward), and fetch completions delivered as
//! [`TaskResult`]s.
//!
//! Fetches and the debounce timer run as spawned tasks that only send
//! messages back; every state transition happens synchronously inside this
//! type, one message at a time.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use clipr::ClipboardSink;
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace, warn};

use crate::{
    api::client::DirectoryApi,
    cache::list_cache::{ListCache, UsernameList},
    config::UiConfig,
    controller::actions::{Action, Effect, TaskResult},
    model::{
        category::{Category, SearchResult, find_by_name, profile_url},
        location::{History, Location},
        notification::Toast,
        pager::Pager,
        theme_mode::ThemeMode,
        view_mode::{ViewMode, messages},
    },
    prefs::{PreferenceStore, THEME_KEY, resolve_theme},
    util::debounce::{DebounceConfig, Debouncer},
    view::view_model::{
        Body, PaginationView, SearchBoxView, SearchCard, TabView, UserCard, ViewModel,
        match_ranges,
    },
};

/// Tunables taken from the `[ui]` config section.
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub page_size: usize,
    pub search_debounce: Duration,
    pub notification_duration: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self::from(&UiConfig::default())
    }
}

impl From<&UiConfig> for ControllerSettings {
    fn from(ui: &UiConfig) -> Self {
        Self {
            page_size: ui.page_size,
            search_debounce: ui.search_debounce,
            notification_duration: ui.notification_duration,
        }
    }
}

/// Collaborators the controller talks to.
pub struct Collaborators {
    pub api: Arc<dyn DirectoryApi>,
    pub clipboard: Box<dyn ClipboardSink>,
    pub prefs: Box<dyn PreferenceStore>,
}

#[derive(Debug, Clone)]
struct CategoryLoad {
    file: String,
    push_location: bool,
}

pub struct ViewStateController {
    api: Arc<dyn DirectoryApi>,
    clipboard: Box<dyn ClipboardSink>,
    prefs: Box<dyn PreferenceStore>,
    task_tx: mpsc::UnboundedSender<TaskResult>,
    settings: ControllerSettings,

    categories: Vec<Category>,
    lists: ListCache,
    mode: ViewMode,
    /// Category implied when no search is active.
    selected: Option<Category>,
    /// Re-entrancy latch for category loads.
    category_loading: Option<CategoryLoad>,

    /// Raw text of the search input.
    search_input: String,
    /// Last executed (trimmed) query; empty when no search is active.
    search_query: String,
    search_seq: u64,
    /// Sequence number of the search still awaiting its response.
    search_in_flight: Option<u64>,
    /// Whether the in-flight search should push a history entry.
    search_push_location: bool,
    debouncer: Debouncer,

    history: History,
    /// Location to apply once categories arrive.
    pending_location: Option<Location>,

    toast: Toast,
    theme: ThemeMode,
    scroll_requested: bool,

    input_focused: bool,
    cursor: usize,
    tab_cursor: usize,
}

impl ViewStateController {
    pub fn new(
        collaborators: Collaborators,
        settings: ControllerSettings,
        task_tx: mpsc::UnboundedSender<TaskResult>,
    ) -> Self {
        let debouncer = Debouncer::new(DebounceConfig {
            delay: settings.search_debounce,
        });
        let toast = Toast::new(settings.notification_duration);

        Self {
            api: collaborators.api,
            clipboard: collaborators.clipboard,
            prefs: collaborators.prefs,
            task_tx,
            settings,
            categories: Vec::new(),
            lists: ListCache::new(),
            mode: ViewMode::Loading,
            selected: None,
            category_loading: None,
            search_input: String::new(),
            search_query: String::new(),
            search_seq: 0,
            search_in_flight: None,
            search_push_location: false,
            debouncer,
            history: History::default(),
            pending_location: None,
            toast,
            theme: ThemeMode::default(),
            scroll_requested: false,
            input_focused: false,
            cursor: 0,
            tab_cursor: 0,
        }
    }

    /* ========================== lifecycle ============================ */

    /// Resolve the theme, start the category fetch, and remember `initial`
    /// so it is applied once categories are known.
    pub fn initialize(&mut self, initial: Location, system_theme: Option<ThemeMode>) {
        self.theme = resolve_theme(self.prefs.as_mut(), system_theme);
        info!(theme = %self.theme, location = %initial, "Initializing directory browser");

        self.mode = ViewMode::Loading;
        self.history = History::new(initial.clone());
        self.pending_location = Some(initial);

        let api = Arc::clone(&self.api);
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let started = Instant::now();
            let result = api.categories().await;
            let _ = tx.send(TaskResult::CategoriesLoaded {
                result,
                took: started.elapsed(),
            });
        });
    }

    /// Apply one background completion.
    pub fn apply(&mut self, task: TaskResult) {
        debug!(kind = task.kind(), mode = self.mode.name(), "Applying task result");

        match task {
            TaskResult::CategoriesLoaded { result, took } => self.on_categories(result, took),
            TaskResult::ListLoaded {
                category,
                result,
                took,
            } => self.on_list(category, result, took),
            TaskResult::SearchCompleted { seq, query, result } => {
                self.on_search(seq, query, result)
            }
            TaskResult::SearchInputSettled { generation } => {
                if self.debouncer.is_current(generation) {
                    self.run_settled_input();
                } else {
                    debug!(generation, "Ignoring superseded search input");
                }
            }
        }
    }

    /// Housekeeping on every loop tick. Returns true when a redraw is due.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.toast.expire(now)
    }

    fn on_categories(&mut self, result: Result<Vec<Category>, crate::AppError>, took: Duration) {
        match result {
            Ok(categories) => {
                info!(
                    count = categories.len(),
                    took_ms = took.as_millis() as u64,
                    "Categories loaded"
                );
                self.categories = categories;
                let location = self.pending_location.take().unwrap_or_default();
                self.apply_location(location);
            }
            Err(e) => {
                error!(remote = e.is_remote(), "Error fetching categories: {e}");
                self.pending_location = None;
                self.mode = ViewMode::empty(messages::CATEGORIES_FAILED, messages::RETRY_LATER);
            }
        }
    }

    /* ====================== location reconciliation ================== */

    /// Re-derive state from a location without recording a new entry.
    fn apply_location(&mut self, location: Location) {
        debug!(%location, "Applying location");

        match location {
            Location::Search(query) if !query.trim().is_empty() => {
                self.search_input = query.clone();
                self.start_search(query.trim().to_string(), false);
            }
            Location::Category(name) => match find_by_name(&self.categories, &name).cloned() {
                Some(category) => self.select_category_inner(category, false),
                None => {
                    debug!(%name, "Location names an unknown category, showing welcome");
                    self.reset_search_state();
                    self.show_welcome();
                }
            },
            Location::Search(_) | Location::Root => {
                self.reset_search_state();
                self.show_welcome();
            }
        }
    }

    fn show_welcome(&mut self) {
        self.selected = None;
        self.mode = ViewMode::Welcome;
        self.cursor = 0;
    }

    /// Location implied by the current state.
    pub fn current_location(&self) -> Location {
        if !self.search_query.is_empty() {
            Location::Search(self.search_query.clone())
        } else if let ViewMode::Category { category, .. } = &self.mode {
            Location::Category(category.name.clone())
        } else {
            Location::Root
        }
    }

    fn push_location(&mut self) {
        let location = self.current_location();
        debug!(%location, "Pushing history entry");
        self.history.push(location);
    }

    pub fn history_back(&mut self) {
        let Some(location) = self.history.peek_back().cloned() else {
            return;
        };
        if self.blocks_navigation(&location) {
            return;
        }
        self.history.back();
        self.apply_location(location);
    }

    pub fn history_forward(&mut self) {
        let Some(location) = self.history.peek_forward().cloned() else {
            return;
        };
        if self.blocks_navigation(&location) {
            return;
        }
        self.history.forward();
        self.apply_location(location);
    }

    /// A category entry whose list is not cached can't be shown while
    /// another load holds the latch; the history cursor stays put.
    fn blocks_navigation(&self, location: &Location) -> bool {
        let (Some(load), Location::Category(name)) = (&self.category_loading, location) else {
            return false;
        };
        let blocked = find_by_name(&self.categories, name)
            .is_some_and(|category| !self.lists.contains(&category.file));
        if blocked {
            debug!(%location, in_flight = %load.file, "Category load in flight, refusing navigation");
        }
        blocked
    }

    /* ============================ categories ========================= */

    pub fn select_category(&mut self, category: Category) {
        self.select_category_inner(category, true);
    }

    /// Selections made while a load is in flight are dropped, except
    /// re-applied locations whose list is already cached.
    fn select_category_inner(&mut self, category: Category, push_location: bool) {
        if let Some(load) = &self.category_loading {
            if push_location || !self.lists.contains(&category.file) {
                debug!(
                    requested = %category.file,
                    in_flight = %load.file,
                    "Category load in flight, dropping selection"
                );
                return;
            }
        }

        self.reset_search_state();
        if let Some(idx) = self.categories.iter().position(|c| c == &category) {
            self.tab_cursor = idx;
        }
        self.selected = Some(category.clone());
        self.mode = ViewMode::Category {
            category: category.clone(),
            pager: Pager::new(self.settings.page_size),
        };
        self.cursor = 0;

        if self.lists.lookup(&category.file).is_some() {
            if push_location {
                self.push_location();
            }
            return;
        }

        self.category_loading = Some(CategoryLoad {
            file: category.file.clone(),
            push_location,
        });

        let api = Arc::clone(&self.api);
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let started = Instant::now();
            let result = api.list(&category.file).await;
            let _ = tx.send(TaskResult::ListLoaded {
                category,
                result,
                took: started.elapsed(),
            });
        });
    }

    fn on_list(
        &mut self,
        category: Category,
        result: Result<Vec<String>, crate::AppError>,
        took: Duration,
    ) {
        let load = self.category_loading.take();
        let push_location = load
            .as_ref()
            .is_some_and(|l| l.file == category.file && l.push_location);
        let showing = matches!(
            &self.mode,
            ViewMode::Category { category: shown, .. } if shown.file == category.file
        );

        match result {
            Ok(usernames) => {
                info!(
                    file = %category.file,
                    count = usernames.len(),
                    took_ms = took.as_millis() as u64,
                    "Category list loaded"
                );
                self.lists.insert(category.file.clone(), usernames, took);
                if showing && push_location {
                    self.push_location();
                }
            }
            Err(e) => {
                error!(remote = e.is_remote(), "Error selecting category {}: {e}", category.name);
                self.lists.record_failure(took);
                if self.selected.as_ref().is_some_and(|c| c.file == category.file) {
                    self.selected = None;
                }
                if showing {
                    self.mode =
                        ViewMode::empty(messages::CATEGORY_FAILED, messages::RETRY_LATER);
                }
            }
        }
    }

    pub fn is_category_loading(&self) -> bool {
        self.category_loading.is_some()
    }

    /* ============================== search =========================== */

    /// Record new input text; the search runs once typing pauses.
    pub fn handle_search_input(&mut self, raw: impl Into<String>) {
        self.search_input = raw.into();
        trace!(
            delay_ms = self.debouncer.delay().as_millis() as u64,
            "Search input changed"
        );
        self.debouncer
            .schedule(&self.task_tx, |generation| TaskResult::SearchInputSettled {
                generation,
            });
    }

    fn run_settled_input(&mut self) {
        let query = self.search_input.trim().to_string();
        if query == self.search_query {
            return;
        }
        if query.is_empty() {
            self.clear_search();
            return;
        }
        self.search(&query);
    }

    /// Run a search immediately and record it in history on success.
    pub fn search(&mut self, query: &str) {
        self.start_search(query.trim().to_string(), true);
    }

    fn start_search(&mut self, query: String, push_location: bool) {
        if query.is_empty() {
            return;
        }

        self.search_query = query.clone();
        self.search_seq += 1;
        self.search_in_flight = Some(self.search_seq);
        self.search_push_location = push_location;
        self.cursor = 0;

        let seq = self.search_seq;
        debug!(seq, %query, "Dispatching search");

        let api = Arc::clone(&self.api);
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let result = api.search(&query).await;
            let _ = tx.send(TaskResult::SearchCompleted { seq, query, result });
        });
    }

    fn on_search(
        &mut self,
        seq: u64,
        query: String,
        result: Result<Vec<SearchResult>, crate::AppError>,
    ) {
        if self.search_in_flight != Some(seq) {
            debug!(seq, latest = self.search_seq, %query, "Discarding stale search response");
            return;
        }
        self.search_in_flight = None;

        match result {
            Ok(results) => {
                info!(%query, count = results.len(), "Search completed");
                self.mode = ViewMode::Search {
                    query,
                    results,
                    pager: Pager::new(self.settings.page_size),
                };
                self.cursor = 0;
                if self.search_push_location {
                    self.push_location();
                }
            }
            Err(e) => {
                error!(remote = e.is_remote(), "Search error: {e}");
                self.mode = ViewMode::empty(messages::SEARCH_FAILED, messages::RETRY_LATER);
            }
        }
    }

    fn search_active(&self) -> bool {
        !self.search_query.is_empty() || self.mode.is_search()
    }

    /// Drop query, results and any pending input without touching history.
    fn reset_search_state(&mut self) {
        self.debouncer.cancel();
        self.search_input.clear();
        self.search_query.clear();
        self.search_in_flight = None;
    }

    /// Leave search and return to the category or welcome view.
    pub fn clear_search(&mut self) {
        let was_active = self.search_active();
        self.reset_search_state();
        if !was_active {
            return;
        }

        self.mode = match &self.selected {
            Some(category)
                if self.lists.contains(&category.file)
                    || self
                        .category_loading
                        .as_ref()
                        .is_some_and(|l| l.file == category.file) =>
            {
                ViewMode::Category {
                    category: category.clone(),
                    pager: Pager::new(self.settings.page_size),
                }
            }
            _ => ViewMode::Welcome,
        };
        self.cursor = 0;
        self.push_location();
    }

    /* ============================ pagination ========================= */

    fn active_len(&self) -> Option<usize> {
        match &self.mode {
            ViewMode::Category { category, .. } => {
                Some(self.lists.peek(&category.file).map_or(0, |l| l.len()))
            }
            ViewMode::Search { results, .. } => Some(results.len()),
            _ => None,
        }
    }

    pub fn go_to_next_page(&mut self) {
        let Some(len) = self.active_len() else {
            return;
        };
        let moved = self.mode.pager_mut().is_some_and(|p| {
            p.clamp(len);
            p.next(len)
        });
        if moved {
            self.cursor = 0;
            self.scroll_requested = true;
        }
    }

    pub fn go_to_prev_page(&mut self) {
        if self.mode.pager_mut().is_some_and(Pager::prev) {
            self.cursor = 0;
            self.scroll_requested = true;
        }
    }

    /// Whether the result area should be scrolled back into view. Reading
    /// the flag clears it.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_requested)
    }

    /* ============================ clipboard ========================== */

    pub fn copy_username(&mut self, username: &str) {
        self.copy_text(username, format!("Copied @{username}"));
    }

    pub fn copy_all_in_category(&mut self) {
        let Some(list) = self.selected_list() else {
            return;
        };
        if list.is_empty() {
            return;
        }
        let text = list.join("\n");
        self.copy_text(&text, format!("Copied all {} usernames", list.len()));
    }

    pub fn copy_search_results(&mut self) {
        let ViewMode::Search { results, .. } = &self.mode else {
            return;
        };
        if results.is_empty() {
            return;
        }
        let text = results
            .iter()
            .map(|r| r.username.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let count = results.len();
        self.copy_text(&text, format!("Copied all {count} usernames"));
    }

    fn copy_text(&mut self, text: &str, confirmation: String) {
        let now = Instant::now();
        match self.clipboard.set_text(text) {
            Ok(()) => self.toast.success(confirmation, now),
            Err(e) => {
                error!(
                    backend = self.clipboard.backend_name(),
                    transient = e.is_transient(),
                    "Could not copy text: {e}"
                );
                self.toast.error(messages::COPY_FAILED, now);
            }
        }
    }

    fn selected_list(&self) -> Option<UsernameList> {
        let category = self.selected.as_ref()?;
        self.lists.peek(&category.file).cloned()
    }

    /* ====================== theme & interaction ====================== */

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        if let Err(e) = self.prefs.set(THEME_KEY, self.theme.as_str()) {
            warn!("Failed to persist theme preference: {e}");
        }
    }

    /// Usernames on the visible page, in order.
    fn visible_usernames(&self) -> Vec<&str> {
        match &self.mode {
            ViewMode::Category { category, pager } => self
                .lists
                .peek(&category.file)
                .map(|list| pager.slice(list).iter().map(String::as_str).collect())
                .unwrap_or_default(),
            ViewMode::Search { results, pager, .. } => pager
                .slice(results)
                .iter()
                .map(|r| r.username.as_str())
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn selected_username(&self) -> Option<String> {
        self.visible_usernames()
            .get(self.cursor)
            .map(|name| (*name).to_string())
    }

    fn move_cursor(&mut self, down: bool) {
        let visible = self.visible_usernames().len();
        if visible == 0 {
            self.cursor = 0;
        } else if down {
            self.cursor = (self.cursor + 1).min(visible - 1);
        } else {
            self.cursor = self.cursor.saturating_sub(1);
        }
    }

    fn move_tab_cursor(&mut self, forward: bool) {
        let count = self.categories.len();
        if count == 0 {
            return;
        }
        self.tab_cursor = if forward {
            (self.tab_cursor + 1) % count
        } else {
            (self.tab_cursor + count - 1) % count
        };
    }

    fn select_category_at(&mut self, idx: usize) {
        if let Some(category) = self.categories.get(idx).cloned() {
            self.tab_cursor = idx;
            self.select_category(category);
        }
    }

    /// Dispatch a user action.
    pub fn handle_action(&mut self, action: Action) -> Effect {
        debug!(?action, "Handling action");

        match action {
            Action::Quit => return Effect::Quit,
            Action::FocusSearch => self.input_focused = true,
            Action::BlurSearch => self.input_focused = false,
            Action::SearchInsert(ch) => {
                let mut text = self.search_input.clone();
                text.push(ch);
                self.handle_search_input(text);
            }
            Action::SearchBackspace => {
                let mut text = self.search_input.clone();
                if text.pop().is_some() {
                    self.handle_search_input(text);
                }
            }
            Action::ClearSearch => {
                self.input_focused = false;
                self.clear_search();
            }
            Action::NextTab => self.move_tab_cursor(true),
            Action::PrevTab => self.move_tab_cursor(false),
            Action::SelectTab => self.select_category_at(self.tab_cursor),
            Action::SelectCategoryAt(idx) => self.select_category_at(idx),
            Action::NextPage => self.go_to_next_page(),
            Action::PrevPage => self.go_to_prev_page(),
            Action::MoveCursorUp => self.move_cursor(false),
            Action::MoveCursorDown => self.move_cursor(true),
            Action::CopySelected => {
                if let Some(name) = self.selected_username() {
                    self.copy_username(&name);
                }
            }
            Action::CopyAll => {
                if self.mode.is_search() {
                    self.copy_search_results();
                } else {
                    self.copy_all_in_category();
                }
            }
            Action::OpenSelected => {
                if let Some(name) = self.selected_username() {
                    return Effect::OpenUrl(profile_url(&name));
                }
            }
            Action::ToggleTheme => self.toggle_theme(),
            Action::HistoryBack => self.history_back(),
            Action::HistoryForward => self.history_forward(),
            Action::DismissNotification => self.toast.dismiss(),
            Action::Resize(..) | Action::NoOp => {}
        }

        Effect::None
    }

    /* ============================ accessors ========================== */

    pub fn mode(&self) -> &ViewMode {
        &self.mode
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn theme(&self) -> ThemeMode {
        self.theme
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn input_focused(&self) -> bool {
        self.input_focused
    }

    pub fn lists(&self) -> &ListCache {
        &self.lists
    }

    /// Report a failure that happened outside the controller (e.g. the
    /// opener command).
    pub fn notify_error(&mut self, message: &str) {
        self.toast.error(message.to_string(), Instant::now());
    }

    /* ========================== view model =========================== */

    pub fn view_model(&self) -> ViewModel {
        let active_file = match &self.mode {
            ViewMode::Category { category, .. } => Some(category.file.as_str()),
            _ => None,
        };

        let tabs = self
            .categories
            .iter()
            .enumerate()
            .map(|(idx, category)| TabView {
                name: category.name.clone(),
                active: active_file == Some(category.file.as_str()),
                focused: idx == self.tab_cursor,
            })
            .collect();

        let search = SearchBoxView {
            text: self.search_input.clone(),
            focused: self.input_focused,
            clear_visible: !self.search_input.is_empty() || !self.search_query.is_empty(),
            searching: self.search_in_flight.is_some(),
        };

        let (body, pagination) = self.derive_body();

        ViewModel {
            theme: self.theme,
            location: self.history.current().to_string(),
            tabs,
            search,
            body,
            pagination,
            notification: self.toast.current().cloned(),
        }
    }

    fn derive_body(&self) -> (Body, Option<PaginationView>) {
        if self.search_in_flight.is_some() {
            return (Body::Loading { label: "Searching…" }, None);
        }

        match &self.mode {
            ViewMode::Loading => (Body::Loading { label: "Loading…" }, None),
            ViewMode::Welcome => (
                Body::Welcome {
                    category_count: self.categories.len(),
                },
                None,
            ),
            ViewMode::Empty { title, message } => (
                Body::Empty {
                    title: title.clone(),
                    message: message.clone(),
                },
                None,
            ),
            ViewMode::Category { category, pager } => {
                let Some(list) = self.lists.peek(&category.file) else {
                    return (
                        Body::Loading {
                            label: "Loading category…",
                        },
                        None,
                    );
                };
                if list.is_empty() {
                    return (
                        Body::Empty {
                            title: messages::EMPTY_CATEGORY_TITLE.to_string(),
                            message: messages::EMPTY_CATEGORY_MESSAGE.to_string(),
                        },
                        None,
                    );
                }

                let cards = pager
                    .slice(list)
                    .iter()
                    .map(|username| UserCard {
                        username: username.clone(),
                        profile_url: profile_url(username),
                    })
                    .collect();
                let body = Body::Usernames {
                    title: category.name.clone(),
                    count_label: format!("{} usernames", list.len()),
                    cards,
                    cursor: self.cursor,
                };
                (body, pagination_view(pager, list.len()))
            }
            ViewMode::Search {
                query,
                results,
                pager,
            } => {
                if results.is_empty() {
                    return (
                        Body::Empty {
                            title: messages::NO_MATCHES_TITLE.to_string(),
                            message: messages::NO_MATCHES_MESSAGE.to_string(),
                        },
                        None,
                    );
                }

                let cards = pager
                    .slice(results)
                    .iter()
                    .map(|result| SearchCard {
                        username: result.username.clone(),
                        category: result.category.clone(),
                        profile_url: profile_url(&result.username),
                        highlights: match_ranges(&result.username, query),
                    })
                    .collect();
                let body = Body::SearchResults {
                    count_label: format!("{} matches found", results.len()),
                    cards,
                    cursor: self.cursor,
                };
                (body, pagination_view(pager, results.len()))
            }
        }
    }
}

fn pagination_view(pager: &Pager, len: usize) -> Option<PaginationView> {
    let total_pages = pager.total_pages(len);
    (total_pages > 1).then(|| PaginationView {
        page: pager.page(),
        total_pages,
        prev_enabled: pager.has_prev(),
        next_enabled: pager.has_next(len),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::stub::StubApi;
    use crate::prefs::MemoryPreferenceStore;
    use clipr::MemoryClipboard;

    struct Harness {
        ctl: ViewStateController,
        rx: mpsc::UnboundedReceiver<TaskResult>,
        api: Arc<StubApi>,
        clipboard: MemoryClipboard,
    }

    impl Harness {
        fn new(api: StubApi) -> Self {
            Self::with_clipboard(api, MemoryClipboard::new(8))
        }

        fn with_clipboard(api: StubApi, clipboard: MemoryClipboard) -> Self {
            let api = Arc::new(api);
            let (tx, rx) = mpsc::unbounded_channel();
            let ctl = ViewStateController::new(
                Collaborators {
                    api: api.clone(),
                    clipboard: Box::new(clipboard.clone()),
                    prefs: Box::new(MemoryPreferenceStore::default()),
                },
                ControllerSettings::default(),
                tx,
            );
            Self {
                ctl,
                rx,
                api,
                clipboard,
            }
        }

        /// Initialize at `query` and apply the categories response.
        async fn start(api: StubApi, query: &str) -> Self {
            let mut h = Self::new(api);
            h.ctl.initialize(Location::parse(query), Some(ThemeMode::Dark));
            h.pump().await;
            h
        }

        async fn pump(&mut self) {
            let task = self.rx.recv().await.expect("task result");
            self.ctl.apply(task);
        }

        fn category(&self, name: &str) -> Category {
            find_by_name(self.ctl.categories(), name).cloned().unwrap()
        }
    }

    fn artists_api() -> StubApi {
        StubApi::new()
            .with_category("Artists", "a")
            .with_category("foo", "f")
            .with_list("a", StubApi::usernames("artist", 20))
            .with_list("f", vec!["a".into(), "b".into(), "c".into()])
    }

    fn current_page(ctl: &ViewStateController) -> usize {
        ctl.mode().pager().map(Pager::page).unwrap_or(0)
    }

    #[tokio::test]
    async fn test_initialize_shows_welcome_without_location() {
        let h = Harness::start(artists_api(), "").await;

        assert_eq!(h.ctl.mode(), &ViewMode::Welcome);
        assert_eq!(h.ctl.categories().len(), 2);
        assert_eq!(h.ctl.history().current(), &Location::Root);
    }

    #[tokio::test]
    async fn test_initialize_failure_shows_empty_state() {
        let mut h = Harness::new(StubApi::new().failing_categories(503));
        h.ctl.initialize(Location::parse("?category=foo"), None);
        h.pump().await;

        assert_eq!(
            h.ctl.mode(),
            &ViewMode::empty(messages::CATEGORIES_FAILED, messages::RETRY_LATER)
        );
        assert_eq!(h.api.list_calls(), 0);
    }

    #[tokio::test]
    async fn test_initial_search_location() {
        let api = artists_api().with_search("abc", StubApi::results("abc", 3));
        let mut h = Harness::start(api, "?search=abc").await;
        h.pump().await;

        match h.ctl.mode() {
            ViewMode::Search { query, results, .. } => {
                assert_eq!(query, "abc");
                assert_eq!(results.len(), 3);
            }
            other => panic!("expected search view, got {other:?}"),
        }
        assert_eq!(h.ctl.current_location(), Location::Search("abc".into()));
        assert_eq!(h.ctl.history().current(), &Location::Search("abc".into()));
        assert!(!h.ctl.history().current().to_query().contains("category"));
        assert_eq!(h.ctl.search_input(), "abc");
    }

    #[tokio::test]
    async fn test_initial_category_location_is_case_insensitive() {
        let mut h = Harness::start(artists_api(), "?category=Foo").await;
        h.pump().await;

        match h.ctl.mode() {
            ViewMode::Category { category, pager } => {
                assert_eq!(category.name, "foo");
                assert_eq!(pager.page(), 1);
            }
            other => panic!("expected category view, got {other:?}"),
        }
        // Applying a location never records a new entry.
        assert_eq!(h.ctl.history().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_category_location_falls_back_to_welcome() {
        let h = Harness::start(artists_api(), "?category=nope").await;
        assert_eq!(h.ctl.mode(), &ViewMode::Welcome);
        assert_eq!(h.api.list_calls(), 0);
    }

    #[tokio::test]
    async fn test_double_selection_in_flight_fetches_once() {
        let mut h = Harness::start(artists_api(), "").await;
        let artists = h.category("Artists");

        h.ctl.select_category(artists.clone());
        h.ctl.select_category(artists);
        assert!(h.ctl.is_category_loading());
        h.pump().await;

        assert_eq!(h.api.list_calls(), 1);
        assert!(!h.ctl.is_category_loading());
        assert!(h.rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_second_selection_is_a_cache_hit() {
        let mut h = Harness::start(artists_api(), "").await;
        let artists = h.category("Artists");

        h.ctl.select_category(artists.clone());
        h.pump().await;
        h.ctl.select_category(artists);

        assert_eq!(h.api.list_calls(), 1);
        assert_eq!(h.ctl.lists().stats().hits(), 1);
        assert_eq!(
            h.ctl.history().current(),
            &Location::Category("Artists".into())
        );
    }

    #[tokio::test]
    async fn test_failed_category_is_retried() {
        let mut h = Harness::start(artists_api().with_category("Broken", "x"), "").await;
        let broken = h.category("Broken");

        h.ctl.select_category(broken.clone());
        h.pump().await;
        assert_eq!(
            h.ctl.mode(),
            &ViewMode::empty(messages::CATEGORY_FAILED, messages::RETRY_LATER)
        );
        assert!(!h.ctl.lists().contains("x"));
        assert_eq!(h.ctl.history().len(), 1);

        h.api.set_list("x", vec!["zed".into()]);
        h.ctl.select_category(broken);
        h.pump().await;

        assert_eq!(h.api.list_calls(), 2);
        assert!(h.ctl.lists().contains("x"));
        assert!(matches!(h.ctl.mode(), ViewMode::Category { .. }));
    }

    #[tokio::test]
    async fn test_exactly_one_page_next_is_a_no_op() {
        let mut h = Harness::start(artists_api(), "").await;
        h.ctl.select_category(h.category("Artists"));
        h.pump().await;

        h.ctl.go_to_next_page();
        assert_eq!(current_page(&h.ctl), 1);
        assert!(!h.ctl.take_scroll_request());

        let vm = h.ctl.view_model();
        assert!(vm.pagination.is_none());
        match vm.body {
            Body::Usernames {
                cards, count_label, ..
            } => {
                assert_eq!(cards.len(), 20);
                assert_eq!(count_label, "20 usernames");
            }
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_search_pagination_reaches_last_page() {
        let api = artists_api().with_search("xyz", StubApi::results("xyz", 45));
        let mut h = Harness::start(api, "").await;

        h.ctl.search("xyz");
        h.pump().await;

        h.ctl.go_to_next_page();
        assert!(h.ctl.take_scroll_request());
        h.ctl.go_to_next_page();
        assert_eq!(current_page(&h.ctl), 3);

        let vm = h.ctl.view_model();
        let pagination = vm.pagination.clone().unwrap();
        assert_eq!(pagination.total_pages, 3);
        assert_eq!(pagination.label(), "Page 3 of 3");
        assert!(!pagination.next_enabled);
        match vm.body {
            Body::SearchResults { cards, .. } => {
                let names: Vec<_> = cards.iter().map(|c| c.username.clone()).collect();
                let expected: Vec<_> = (40..45).map(|i| format!("xyz{i}")).collect();
                assert_eq!(names, expected);
            }
            other => panic!("unexpected body {other:?}"),
        }

        h.ctl.go_to_next_page();
        assert_eq!(current_page(&h.ctl), 3);
        assert!(!h.ctl.take_scroll_request());

        h.ctl.go_to_prev_page();
        assert_eq!(current_page(&h.ctl), 2);
    }

    #[tokio::test]
    async fn test_clear_search_without_search_is_a_no_op() {
        let mut h = Harness::start(artists_api(), "").await;
        h.ctl.select_category(h.category("Artists"));
        h.pump().await;
        let before = h.ctl.mode().clone();
        let entries = h.ctl.history().len();

        h.ctl.clear_search();

        assert_eq!(h.ctl.mode(), &before);
        assert_eq!(h.ctl.history().len(), entries);
    }

    #[tokio::test]
    async fn test_clear_search_restores_category() {
        let api = artists_api().with_search("bob", StubApi::results("bob", 2));
        let mut h = Harness::start(api, "").await;
        h.ctl.select_category(h.category("Artists"));
        h.pump().await;

        h.ctl.search("bob");
        h.pump().await;
        assert!(h.ctl.mode().is_search());

        h.ctl.clear_search();
        assert!(matches!(
            h.ctl.mode(),
            ViewMode::Category { category, pager } if category.name == "Artists" && pager.page() == 1
        ));
        assert_eq!(
            h.ctl.history().current(),
            &Location::Category("Artists".into())
        );
    }

    #[tokio::test]
    async fn test_clear_search_from_welcome_returns_to_welcome() {
        let api = artists_api().with_search("bob", StubApi::results("bob", 2));
        let mut h = Harness::start(api, "").await;
        h.ctl.search("bob");
        h.pump().await;

        h.ctl.clear_search();
        assert_eq!(h.ctl.mode(), &ViewMode::Welcome);
        assert_eq!(h.ctl.history().current(), &Location::Root);
    }

    #[tokio::test]
    async fn test_search_failure_shows_empty_state() {
        let api = artists_api().failing_search("boom");
        let mut h = Harness::start(api, "").await;
        h.ctl.search("boom");
        h.pump().await;

        assert_eq!(
            h.ctl.mode(),
            &ViewMode::empty(messages::SEARCH_FAILED, messages::RETRY_LATER)
        );
    }

    #[tokio::test]
    async fn test_stale_search_response_is_ignored() {
        let api = artists_api()
            .with_search("old", StubApi::results("old", 5))
            .with_search("new", StubApi::results("new", 2));
        let mut h = Harness::start(api, "").await;

        h.ctl.search("old");
        h.ctl.search("new");
        h.pump().await;
        h.pump().await;

        match h.ctl.mode() {
            ViewMode::Search { query, results, .. } => {
                assert_eq!(query, "new");
                assert_eq!(results.len(), 2);
            }
            other => panic!("expected search view, got {other:?}"),
        }
        assert_eq!(h.ctl.history().current(), &Location::Search("new".into()));
    }

    #[tokio::test]
    async fn test_response_after_clear_is_ignored() {
        let api = artists_api().with_search("bob", StubApi::results("bob", 2));
        let mut h = Harness::start(api, "").await;

        h.ctl.search("bob");
        h.ctl.clear_search();
        h.pump().await;

        assert_eq!(h.ctl.mode(), &ViewMode::Welcome);
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_input_is_debounced() {
        let api = artists_api().with_search("bob", StubApi::results("bob", 1));
        let mut h = Harness::start(api, "").await;

        for text in ["b", "bo", "bob "] {
            h.ctl.handle_search_input(text);
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        // Only the settled input runs, then its search response arrives.
        h.pump().await;
        h.pump().await;

        assert_eq!(h.api.search_queries(), vec!["bob".to_string()]);
        assert!(h.ctl.mode().is_search());

        // Same trimmed text again is a no-op.
        h.ctl.handle_search_input("bob");
        h.pump().await;
        assert_eq!(h.api.search_queries().len(), 1);

        // Emptying the input clears the search.
        h.ctl.handle_search_input("  ");
        h.pump().await;
        assert_eq!(h.ctl.mode(), &ViewMode::Welcome);
    }

    #[tokio::test]
    async fn test_copy_all_in_category_joins_with_newlines() {
        let mut h = Harness::start(artists_api(), "").await;
        h.ctl.select_category(h.category("foo"));
        h.pump().await;

        h.ctl.copy_all_in_category();

        assert_eq!(h.clipboard.last().as_deref(), Some("a\nb\nc"));
        let vm = h.ctl.view_model();
        assert_eq!(
            vm.notification.map(|n| n.message.to_string()).as_deref(),
            Some("Copied all 3 usernames")
        );
    }

    #[tokio::test]
    async fn test_copy_search_results_and_single_username() {
        let api = artists_api().with_search("q", StubApi::results("q", 2));
        let mut h = Harness::start(api, "").await;
        h.ctl.search("q");
        h.pump().await;

        h.ctl.handle_action(Action::CopyAll);
        assert_eq!(h.clipboard.last().as_deref(), Some("q0\nq1"));

        h.ctl.handle_action(Action::MoveCursorDown);
        h.ctl.handle_action(Action::CopySelected);
        assert_eq!(h.clipboard.last().as_deref(), Some("q1"));
        assert_eq!(
            h.ctl.view_model().notification.map(|n| n.message.to_string()),
            Some("Copied @q1".to_string())
        );
    }

    #[tokio::test]
    async fn test_copy_failure_surfaces_error_toast() {
        let mut h = Harness::with_clipboard(artists_api(), MemoryClipboard::rejecting());
        h.ctl.initialize(Location::Root, None);
        h.pump().await;

        h.ctl.copy_username("alice");

        let notification = h.ctl.view_model().notification.unwrap();
        assert_eq!(notification.message, messages::COPY_FAILED);
        assert!(h.ctl.tick(Instant::now() + Duration::from_secs(3)));
        assert!(h.ctl.view_model().notification.is_none());
    }

    #[tokio::test]
    async fn test_newer_notification_replaces_current() {
        let mut h = Harness::start(artists_api(), "").await;

        h.ctl.copy_username("alice");
        let first = h.ctl.view_model().notification.unwrap();
        h.ctl.copy_username("bob");
        let second = h.ctl.view_model().notification.unwrap();

        assert_eq!(second.message, "Copied @bob");
        assert!(second.timestamp >= first.timestamp);
        assert!(!h.ctl.tick(second.timestamp + Duration::from_millis(1999)));
        assert!(h.ctl.tick(second.timestamp + Duration::from_secs(2)));
        assert_eq!(h.clipboard.len(), 2);
    }

    #[tokio::test]
    async fn test_copy_all_on_empty_collection_is_a_no_op() {
        let api = artists_api().with_search("none", Vec::new());
        let mut h = Harness::start(api, "").await;
        h.ctl.search("none");
        h.pump().await;

        h.ctl.copy_search_results();
        assert!(h.clipboard.is_empty());
        assert!(matches!(
            h.ctl.view_model().body,
            Body::Empty { ref title, .. } if title == messages::NO_MATCHES_TITLE
        ));
    }

    #[tokio::test]
    async fn test_history_back_and_forward_rederive_state() {
        let api = artists_api().with_search("bob", StubApi::results("bob", 2));
        let mut h = Harness::start(api, "").await;
        h.ctl.select_category(h.category("Artists"));
        h.pump().await;
        h.ctl.search("bob");
        h.pump().await;
        assert_eq!(h.ctl.history().len(), 3);

        h.ctl.history_back();
        assert!(matches!(h.ctl.mode(), ViewMode::Category { .. }));
        assert_eq!(h.api.list_calls(), 1);

        h.ctl.history_back();
        assert_eq!(h.ctl.mode(), &ViewMode::Welcome);

        h.ctl.history_forward();
        h.ctl.history_forward();
        h.pump().await;
        assert!(h.ctl.mode().is_search());
        assert_eq!(h.ctl.history().len(), 3);
    }

    #[tokio::test]
    async fn test_blank_search_location_shows_welcome() {
        let h = Harness::start(artists_api(), "?search=%20").await;
        assert_eq!(h.ctl.mode(), &ViewMode::Welcome);
        assert!(h.api.search_queries().is_empty());

        let mut h = Harness::new(artists_api());
        h.ctl.initialize(Location::Search("  ".into()), None);
        h.pump().await;
        assert_eq!(h.ctl.mode(), &ViewMode::Welcome);
        assert_eq!(h.ctl.current_location(), Location::Root);
        assert!(h.api.search_queries().is_empty());
    }

    #[tokio::test]
    async fn test_direct_search_trims_query() {
        let api = artists_api().with_search("bob", StubApi::results("bob", 2));
        let mut h = Harness::start(api, "").await;

        h.ctl.search("  bob ");
        h.pump().await;

        assert_eq!(h.api.search_queries(), vec!["bob".to_string()]);
        assert_eq!(h.ctl.history().current(), &Location::Search("bob".into()));

        h.ctl.search("   ");
        assert_eq!(h.api.search_queries().len(), 1);
    }

    #[tokio::test]
    async fn test_history_to_cached_category_during_load() {
        let api = artists_api()
            .with_category("Slow", "s")
            .with_list("s", vec!["slow".into()]);
        let mut h = Harness::start(api, "").await;
        h.ctl.select_category(h.category("Artists"));
        h.pump().await;

        h.ctl.select_category(h.category("Slow"));
        assert!(h.ctl.is_category_loading());

        h.ctl.history_back();
        assert_eq!(h.ctl.history().current(), &Location::Root);
        assert_eq!(h.ctl.mode(), &ViewMode::Welcome);

        h.ctl.history_forward();
        assert_eq!(
            h.ctl.history().current(),
            &Location::Category("Artists".into())
        );
        assert!(matches!(
            h.ctl.mode(),
            ViewMode::Category { category, .. } if category.name == "Artists"
        ));

        // The superseded load only fills the cache.
        h.pump().await;
        assert!(h.ctl.lists().contains("s"));
        assert_eq!(h.ctl.current_location(), Location::Category("Artists".into()));
        assert_eq!(h.ctl.history().len(), 2);
    }

    #[tokio::test]
    async fn test_history_to_uncached_category_waits_for_load() {
        let api = artists_api()
            .with_category("Broken", "x")
            .with_category("Slow", "s")
            .with_list("s", vec!["slow".into()]);
        let mut h = Harness::start(api, "?category=Broken").await;
        h.pump().await;
        assert!(!h.ctl.lists().contains("x"));

        h.ctl.select_category(h.category("Artists"));
        h.pump().await;
        assert_eq!(h.ctl.history().len(), 2);

        h.ctl.select_category(h.category("Slow"));
        h.ctl.history_back();
        assert_eq!(
            h.ctl.history().current(),
            &Location::Category("Artists".into())
        );
        assert!(matches!(
            h.ctl.mode(),
            ViewMode::Category { category, .. } if category.name == "Slow"
        ));

        h.pump().await;
        assert_eq!(h.ctl.history().current(), &Location::Category("Slow".into()));

        h.ctl.history_back();
        assert_eq!(h.ctl.current_location(), Location::Category("Artists".into()));
        assert_eq!(
            h.ctl.history().current(),
            &Location::Category("Artists".into())
        );
    }

    #[tokio::test]
    async fn test_selecting_category_leaves_search() {
        let api = artists_api().with_search("bob", StubApi::results("bob", 2));
        let mut h = Harness::start(api, "").await;
        h.ctl.search("bob");
        h.pump().await;

        h.ctl.handle_action(Action::SelectCategoryAt(1));
        h.pump().await;

        assert_eq!(h.ctl.search_input(), "");
        assert_eq!(h.ctl.history().current(), &Location::Category("foo".into()));
        let vm = h.ctl.view_model();
        assert!(vm.tabs[1].active);
        assert!(!vm.search.clear_visible);
    }

    #[tokio::test]
    async fn test_open_selected_returns_profile_link() {
        let mut h = Harness::start(artists_api(), "").await;
        h.ctl.select_category(h.category("foo"));
        h.pump().await;

        assert_eq!(
            h.ctl.handle_action(Action::OpenSelected),
            Effect::OpenUrl("https://x.com/a".to_string())
        );
        assert_eq!(h.ctl.handle_action(Action::Quit), Effect::Quit);
    }

    #[tokio::test]
    async fn test_toggle_theme_flips_mode() {
        let mut h = Harness::start(artists_api(), "").await;
        assert_eq!(h.ctl.theme(), ThemeMode::Dark);
        h.ctl.handle_action(Action::ToggleTheme);
        assert_eq!(h.ctl.theme(), ThemeMode::Light);
    }
}
