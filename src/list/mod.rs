//! Generic list-view machinery
//!
//! Every resource page of the dashboard (crew, flights, rosters, approvals,
//! availability) is the same list view parameterized by a
//! [`ResourceProfile`]:
//!
//! - [`ListController`] - synchronous state machine (query state, loaded
//!   page, loading/error flags, pending mutations)
//! - [`ListView`] - runs the controller's fetch plans on tokio and feeds
//!   completions back on the UI thread
//! - [`RequestTracker`] - latest-wins request tokens
//! - [`ClientFilter`] - search and dropdown filtering of the loaded page
//! - [`MutationLedger`] - optimistic updates with original-snapshot rollback
//!
//! # Example
//!
//! ```ignore
//! use crewdeck::list::{ListController, ListOptions, QueryDefaults};
//! use crewdeck::navigation::HistoryNavigationStore;
//!
//! let mut controller = ListController::new(
//!     crewdeck::resources::crew::profile(),
//!     QueryDefaults::new(50),
//!     ListOptions::default(),
//!     Box::new(HistoryNavigationStore::new()),
//! );
//! let plan = controller.mount();
//! // ... execute plan.request, then:
//! controller.apply(plan.token, Ok(page));
//! ```

pub mod controller;
pub mod fetch_all;
pub mod filter;
pub mod normalize;
pub mod optimistic;
pub mod query;
pub mod request;
pub mod view;

pub use controller::{
    ApplyOutcome, FetchPlan, FetchRequest, ListController, ListOptions, ListState,
    PaginationSummary,
};
pub use fetch_all::{fetch_all_pages, FetchAllPolicy, FetchAllResult};
pub use filter::{derive_options, ClientFilter, ALL};
pub use normalize::{initials_from, FilterField, MatchMode, ResourceProfile, StatusRule};
pub use optimistic::{MutationLedger, MutationTicket, PendingMutation};
pub use query::{QueryDefaults, QueryState};
pub use request::{RequestToken, RequestTracker};
pub use view::{with_timeout, ListView, Waker};
