//! Shared state types for the frontend
//!
//! Pages borrow a [`SharedState`] for the active view and return
//! [`AppAction`]s instead of mutating the controller directly. The app
//! applies those actions after the page finished rendering.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::config::AppConfig;
use crate::list::{FetchPlan, ListController, ListView};
use crate::resources::approvals::Decision;
use crate::resources::rosters::AssignRequest;
use crate::resources::Resource;
use crate::types::RecordId;

/// State a page may read while rendering (borrowed, not owned)
pub struct SharedState<'a> {
    pub view: &'a ListView,
    pub config: &'a AppConfig,
}

/// Operations on one list view
#[derive(Debug, Clone, PartialEq)]
pub enum ListAction {
    Refresh,
    PreviousPage,
    NextPage,
    SetPage(u32),
    SetPageSize(u32),
    /// Change one server-side filter
    SetFilter { key: String, value: String },
    /// Replace every server-side filter
    SetFilters(BTreeMap<String, String>),
    /// Load every page for the given filters
    FetchAll(BTreeMap<String, String>),
    SubmitPayload(Value),
    Back,
    Forward,
    /// Client-side search text
    SetSearch(String),
    /// Client-side dropdown selection
    SelectOption { key: String, value: String },
    ClearClientFilters,
    DismissMessages,
}

impl ListAction {
    /// Run the action against a controller
    ///
    /// Returns the fetch the controller asked for, if any.
    pub fn apply(self, controller: &mut ListController) -> Option<FetchPlan> {
        match self {
            ListAction::Refresh => controller.refresh(),
            ListAction::PreviousPage => controller.go_to_previous_page(),
            ListAction::NextPage => controller.go_to_next_page(),
            ListAction::SetPage(page) => controller.set_page(page),
            ListAction::SetPageSize(limit) => controller.set_page_size(limit),
            ListAction::SetFilter { key, value } => controller.set_filter(&key, &value),
            ListAction::SetFilters(filters) => controller.set_filters(filters),
            ListAction::FetchAll(filters) => controller.fetch_all(filters),
            ListAction::SubmitPayload(payload) => controller.submit_payload(payload),
            ListAction::Back => controller.back(),
            ListAction::Forward => controller.forward(),
            ListAction::SetSearch(text) => {
                controller.client_filter_mut().set_search(text);
                None
            }
            ListAction::SelectOption { key, value } => {
                controller.client_filter_mut().select(&key, value);
                None
            }
            ListAction::ClearClientFilters => {
                controller.client_filter_mut().clear();
                None
            }
            ListAction::DismissMessages => {
                controller.dismiss_mutation_error();
                controller.dismiss_notice();
                None
            }
        }
    }
}

/// Actions that any page can emit
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// Switch the central page
    ShowResource(Resource),
    /// Operate on a resource's list view
    List(Resource, ListAction),
    /// Flip a crew member's active status (optimistic)
    ToggleCrewStatus(RecordId),
    /// Approve or reject a request (optimistic)
    Decide { id: RecordId, decision: Decision },
    AssignRoster(AssignRequest),
    CreateRoster { base: String, flight_id: String },
    ToggleDarkMode,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list::{ListOptions, QueryDefaults, ResourceProfile};
    use crate::navigation::HistoryNavigationStore;

    fn controller() -> ListController {
        let mut controller = ListController::new(
            ResourceProfile::new("crew").with_search(&["full_name"]),
            QueryDefaults::default(),
            ListOptions::default(),
            Box::new(HistoryNavigationStore::from_query_string("page=2")),
        );
        controller.mount();
        controller
    }

    #[test]
    fn test_paging_actions_issue_fetches() {
        let mut controller = controller();
        assert!(ListAction::NextPage.apply(&mut controller).is_some());
        assert_eq!(controller.query().page, 3);
        assert!(ListAction::Back.apply(&mut controller).is_some());
        assert_eq!(controller.query().page, 2);
    }

    #[test]
    fn test_client_filter_actions_do_not_fetch() {
        let mut controller = controller();
        assert!(ListAction::SetSearch("asha".to_string())
            .apply(&mut controller)
            .is_none());
        assert_eq!(controller.client_filter().search(), "asha");

        ListAction::ClearClientFilters.apply(&mut controller);
        assert!(!controller.client_filter().is_active());
    }
}
