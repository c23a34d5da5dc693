//! # Crew Deck: Crew Roster Operations Dashboard
//!
//! A desktop dashboard over a crew-rostering REST API. Every page (crew,
//! flights, rosters, approvals, availability) is the same generic list view:
//! paginated, filterable, kept in sync with navigation state, and able to
//! apply optimistic mutations that roll back when the server refuses them.
//!
//! ## Architecture
//!
//! - **List**: [`list::ListController`] is a synchronous state machine;
//!   [`list::ListView`] executes its fetch plans on tokio
//! - **Navigation**: [`navigation::NavigationStore`] holds page, limit and
//!   filters as query-string parameters, with back/forward history
//! - **Sources**: [`source::RosterApi`] talks to the server over reqwest, or
//!   to an in-memory demo data set
//! - **Frontend**: eframe/egui pages that emit actions instead of mutating state
//! - **Communication**: Crossbeam channels carry completions back to the UI thread
//!
//! ## Configuration
//!
//! Configuration and app state are stored in the platform-appropriate data
//! directory under `dev.crewdeck.dashboard`:
//!
//! - **Linux**: `~/.local/share/dev.crewdeck.dashboard/`
//! - **macOS**: `~/Library/Application Support/dev.crewdeck.dashboard/`
//! - **Windows**: `%APPDATA%\dev.crewdeck.dashboard\`
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use crewdeck::{
//!     config::{AppConfig, AppState},
//!     frontend::CrewDeckApp,
//!     source::HttpDataSource,
//! };
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::load_or_default();
//!     let runtime = tokio::runtime::Runtime::new()?;
//!     let api = Arc::new(HttpDataSource::new(&config.api)?);
//!
//!     eframe::run_native(
//!         "Crew Deck",
//!         eframe::NativeOptions::default(),
//!         Box::new(|cc| {
//!             Ok(Box::new(CrewDeckApp::new(
//!                 cc,
//!                 api,
//!                 runtime.handle().clone(),
//!                 config,
//!                 AppState::load_or_default(),
//!             )))
//!         }),
//!     )?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod frontend;
pub mod list;
pub mod navigation;
pub mod resources;
pub mod source;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, AppState};
pub use error::{DashboardError, Result};
pub use frontend::CrewDeckApp;
pub use list::{ListController, ListView};
pub use navigation::{HistoryNavigationStore, NavigationStore};
pub use resources::Resource;
pub use source::{DataSource, HttpDataSource, InMemoryDataSource, RosterApi};
pub use types::{Record, ResourcePage};
