//! src/view/ui.rs
//! ============================================================
//! Frame renderer that draws the whole screen from an immutable
//! [`ViewModel`]. The renderer only keeps layout caches, the list
//! scroll state and timing stats.

use std::time::{Duration, Instant};

use ratatui::{prelude::*, widgets::ListState};
use tracing::{instrument, trace};

use crate::view::{
    components::{
        empty_state::EmptyState, notification_overlay::NotificationOverlay,
        pagination_bar::PaginationBar, search_bar::SearchBar, status_bar::StatusBar,
        tab_bar::TabBar, username_grid::UsernameGrid,
    },
    theme::Palette,
    view_model::{Body, ViewModel},
};

/// ---------------------------------------------------------------------------
/// Renderer struct (caches + stats)
/// ---------------------------------------------------------------------------
pub struct UIRenderer {
    cache: LayoutCache,
    list_state: ListState,
    stats: RenderStats,
}

#[derive(Default)]
struct LayoutCache {
    screen: Rect,
    has_pagination: bool,
    areas: Option<ScreenAreas>,
    hit: u64,
    miss: u64,
}

#[derive(Debug, Clone, Copy)]
struct ScreenAreas {
    tabs: Rect,
    search: Rect,
    body: Rect,
    pagination: Rect,
    status: Rect,
}

#[derive(Debug, Default)]
pub struct RenderStats {
    pub frames: u64,
    pub slow: u64,
    pub total: Duration,
}

impl Default for UIRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// ---------------------------------------------------------------------------
/// public API
/// ---------------------------------------------------------------------------
impl UIRenderer {
    pub fn new() -> Self {
        Self {
            cache: LayoutCache::default(),
            list_state: ListState::default(),
            stats: RenderStats::default(),
        }
    }

    /// Scroll the result list back to its first row on the next frame.
    pub fn reset_scroll(&mut self) {
        *self.list_state.offset_mut() = 0;
    }

    pub fn stats(&self) -> &RenderStats {
        &self.stats
    }

    #[instrument(level = "trace", skip_all)]
    pub fn render(&mut self, f: &mut Frame<'_>, vm: &ViewModel) {
        let start = Instant::now();
        let palette = Palette::for_mode(vm.theme);
        let areas = self.layout(f.area(), vm.pagination.is_some());

        f.render_widget(
            ratatui::widgets::Block::default().style(palette.base()),
            f.area(),
        );

        TabBar::new().render(f, &vm.tabs, &palette, areas.tabs);
        SearchBar::new().render(f, &vm.search, &palette, areas.search);
        self.draw_body(f, &vm.body, &palette, areas.body);
        if let Some(pagination) = &vm.pagination {
            PaginationBar::new().render(f, pagination, &palette, areas.pagination);
        }
        StatusBar::new().render(f, &vm.location, vm.theme, &palette, areas.status);

        if let Some(notification) = &vm.notification {
            let rect = NotificationOverlay::area_for(f.area(), &notification.message);
            NotificationOverlay::new().render_notification(f, notification, &palette, rect);
        }

        let took = start.elapsed();
        self.stats.total += took;
        self.stats.frames += 1;
        if took.as_millis() > 16 {
            self.stats.slow += 1;
        }
        trace!(frame = self.stats.frames, took_us = took.as_micros() as u64, "Frame rendered");
    }
}

/// ---------------------------------------------------------------------------
/// main components
/// ---------------------------------------------------------------------------
impl UIRenderer {
    fn draw_body(&mut self, f: &mut Frame<'_>, body: &Body, palette: &Palette, area: Rect) {
        let placeholder = EmptyState::new();
        match body {
            Body::Loading { label } => placeholder.render_loading(f, label, palette, area),
            Body::Welcome { category_count } => {
                placeholder.render_welcome(f, *category_count, palette, area)
            }
            Body::Empty { title, message } => {
                placeholder.render_message(f, title, message, palette, area)
            }
            Body::Usernames {
                title,
                count_label,
                cards,
                cursor,
            } => {
                self.list_state.select(Some(*cursor));
                UsernameGrid::new().render_category(
                    f,
                    title,
                    count_label,
                    cards,
                    &mut self.list_state,
                    palette,
                    area,
                );
            }
            Body::SearchResults {
                count_label,
                cards,
                cursor,
            } => {
                self.list_state.select(Some(*cursor));
                UsernameGrid::new().render_search(
                    f,
                    count_label,
                    cards,
                    &mut self.list_state,
                    palette,
                    area,
                );
            }
        }
    }
}

/// ---------------------------------------------------------------------------
/// util: layout
/// ---------------------------------------------------------------------------
impl UIRenderer {
    fn layout(&mut self, screen: Rect, has_pagination: bool) -> ScreenAreas {
        if let Some(areas) = self.cache.areas {
            if self.cache.screen == screen && self.cache.has_pagination == has_pagination {
                self.cache.hit += 1;
                return areas;
            }
        }

        self.cache.miss += 1;
        let pagination_height = u16::from(has_pagination);
        let [tabs, search, body, pagination, status] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(pagination_height),
            Constraint::Length(1),
        ])
        .areas(screen);

        let areas = ScreenAreas {
            tabs,
            search,
            body,
            pagination,
            status,
        };
        self.cache.screen = screen;
        self.cache.has_pagination = has_pagination;
        self.cache.areas = Some(areas);
        areas
    }
}
