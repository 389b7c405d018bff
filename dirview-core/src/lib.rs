pub mod error;

pub mod config;

pub mod api {
    pub mod client;
    pub use client::{DirectoryApi, HttpDirectoryApi};

    #[cfg(test)]
    pub mod stub;
}

pub mod cache {
    pub mod list_cache;
    pub use list_cache::{ListCache, ListCacheStats, UsernameList};
}

pub mod controller {
    pub mod actions;
    pub use actions::{Action, Effect, TaskResult};

    pub mod keymap;
    pub use keymap::KeyMap;

    pub mod event_loop;
    pub use event_loop::{EventLoop, LoopEvent, Step};

    pub mod view_controller;
    pub use view_controller::{Collaborators, ControllerSettings, ViewStateController};
}

pub mod model {
    pub mod category;
    pub use category::{Category, SearchResult};

    pub mod location;
    pub use location::{History, Location};

    pub mod notification;
    pub use notification::{Notification, NotificationLevel, Toast};

    pub mod pager;
    pub use pager::Pager;

    pub mod theme_mode;
    pub use theme_mode::ThemeMode;

    pub mod view_mode;
    pub use view_mode::ViewMode;
}

pub mod view {
    pub mod theme;

    pub mod ui;

    pub mod view_model;
    pub use view_model::ViewModel;

    pub mod components {
        pub mod empty_state;
        pub use empty_state::EmptyState;
        pub mod notification_overlay;
        pub use notification_overlay::NotificationOverlay;
        pub mod pagination_bar;
        pub use pagination_bar::PaginationBar;
        pub mod search_bar;
        pub use search_bar::SearchBar;
        pub mod status_bar;
        pub use status_bar::StatusBar;
        pub mod tab_bar;
        pub use tab_bar::TabBar;
        pub mod username_grid;
        pub use username_grid::UsernameGrid;
    }
}

pub mod logging;
pub use logging::Logger;

pub mod prefs;

pub mod util {
    pub mod debounce;
}

pub use error::AppError;
