//! Page modules for the frontend
//!
//! One page per resource. Each page implements the [`Page`] trait, reading
//! the active list view through [`SharedState`] and returning actions
//! instead of mutating it directly.

mod approvals;
mod availability;
mod crew;
mod flights;
mod rosters;

pub use approvals::{ApprovalsPage, ApprovalsPageState};
pub use availability::{AvailabilityPage, AvailabilityPageState};
pub use crew::{CrewPage, CrewPageState};
pub use flights::{FlightsPage, FlightsPageState};
pub use rosters::{RostersPage, RostersPageState};

use crate::frontend::state::{AppAction, SharedState};
use egui::Ui;

/// Trait for page components
///
/// Pages receive shared state via `SharedState` and return actions
/// instead of mutating the main app directly.
pub trait Page {
    /// Page-specific state (form inputs, search text)
    ///
    /// Owned by the main app and passed to the page on every frame.
    type State: Default;

    /// Render the page and return any actions to perform
    ///
    /// Actions are processed after the page finishes rendering.
    fn render(state: &mut Self::State, shared: &SharedState<'_>, ui: &mut Ui) -> Vec<AppAction>;
}
