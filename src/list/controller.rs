//! The list-view controller state machine
//!
//! [`ListController`] owns everything one list view knows: the loaded page,
//! loading/error flags, client-side filters, pending optimistic mutations
//! and the request tracker. It never performs I/O itself. Operations that
//! need data return a [`FetchPlan`]; whoever executes the plan reports the
//! result back through [`ListController::apply`], which only lets the
//! latest issued request through.
//!
//! The navigation store is the source of truth for `page`, `limit` and
//! server-side filters. Parameter changes are written to the store first
//! and the fetch is derived from what the store then holds.

use std::collections::BTreeMap;

use serde_json::Value;

use super::fetch_all::FetchAllPolicy;
use super::filter::{derive_options, ClientFilter};
use super::normalize::ResourceProfile;
use super::optimistic::{MutationLedger, MutationTicket, PendingMutation, Settled};
use super::query::{QueryDefaults, QueryState};
use super::request::{RequestToken, RequestTracker};
use crate::error::{DashboardError, ErrorCategory, Result};
use crate::navigation::{NavigationStore, SetOptions};
use crate::types::{Record, ResourcePage};

/// Behavior switches of a list controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ListOptions {
    /// Keep the previously shown items when a fetch fails
    pub keep_stale_on_error: bool,
    pub fetch_all: FetchAllPolicy,
}

/// What a fetch should retrieve
#[derive(Debug, Clone, PartialEq)]
pub enum FetchRequest {
    /// One page of the current query
    Page(QueryState),
    /// Every page for the given filters
    All {
        filters: BTreeMap<String, String>,
        policy: FetchAllPolicy,
    },
    /// A payload-style query
    Payload(Value),
}

/// A fetch the caller must execute and report back
#[derive(Debug, Clone, PartialEq)]
pub struct FetchPlan {
    pub token: RequestToken,
    pub request: FetchRequest,
}

/// Whether a completion changed controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// The completion belonged to a superseded request, an unmounted view,
    /// or a mutation that no longer decides the record state
    Discarded,
}

/// Pagination line shown under a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationSummary {
    pub page: u32,
    pub limit: u32,
    /// Server total, or the loaded count when the server reports none
    pub total: u64,
    pub page_count: u64,
    /// Items currently visible after client filtering
    pub shown: usize,
}

impl PaginationSummary {
    pub fn label(&self) -> String {
        format!(
            "Page {} of {} · {} total",
            self.page, self.page_count, self.total
        )
    }
}

/// Snapshot of what the renderer shows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListState {
    pub page: ResourcePage,
    pub loading: bool,
    /// Message of the last failed fetch
    pub error: Option<String>,
    /// Kind of the last failed fetch
    pub error_category: Option<ErrorCategory>,
    /// Message of the last failed mutation (shown next to the rollback)
    pub mutation_error: Option<String>,
    /// Confirmation of the last completed action
    pub notice: Option<String>,
    /// Whether `page` holds a fetch-all result
    pub fetched_all: bool,
}

/// Generic controller of one list view
pub struct ListController {
    profile: ResourceProfile,
    defaults: QueryDefaults,
    options: ListOptions,
    navigation: Box<dyn NavigationStore>,
    /// Parameters of the last fetch derived from navigation
    active: QueryState,
    last_request: Option<FetchRequest>,
    in_flight: Option<FetchRequest>,
    state: ListState,
    tracker: RequestTracker,
    ledger: MutationLedger,
    filter: ClientFilter,
    mounted: bool,
}

impl ListController {
    pub fn new(
        profile: ResourceProfile,
        defaults: QueryDefaults,
        options: ListOptions,
        navigation: Box<dyn NavigationStore>,
    ) -> Self {
        let active = QueryState::from_navigation(navigation.as_ref(), &defaults);
        Self {
            profile,
            defaults,
            options,
            navigation,
            active,
            last_request: None,
            in_flight: None,
            state: ListState::default(),
            tracker: RequestTracker::new(),
            ledger: MutationLedger::new(),
            filter: ClientFilter::new(),
            mounted: false,
        }
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Start the view and fetch the page described by navigation state
    pub fn mount(&mut self) -> FetchPlan {
        self.mounted = true;
        self.active = self.query();
        tracing::debug!("Mounting {} list at {:?}", self.profile.name, self.active);
        self.issue(FetchRequest::Page(self.active.clone()))
    }

    /// Tear the view down; late completions become no-ops
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.tracker.invalidate_all();
        self.ledger.clear();
        self.in_flight = None;
        self.state.loading = false;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    // ------------------------------------------------------------------
    // Query parameters
    // ------------------------------------------------------------------

    /// Current query, read from the navigation store
    pub fn query(&self) -> QueryState {
        QueryState::from_navigation(self.navigation.as_ref(), &self.defaults)
    }

    /// Replace page, limit and filters
    ///
    /// Returns `None` when nothing changed or the view is not mounted.
    pub fn set_parameters(&mut self, query: QueryState) -> Option<FetchPlan> {
        let query = self.defaults.normalize(query);
        if query == self.query() && query == self.active {
            return None;
        }
        self.navigation
            .set(query.to_navigation(&self.defaults), SetOptions::push());
        self.fetch_current()
    }

    /// Re-issue the last request, or the current page if nothing ran yet
    pub fn refresh(&mut self) -> Option<FetchPlan> {
        if !self.mounted {
            return None;
        }
        let request = match self.last_request.clone() {
            Some(FetchRequest::Page(_)) | None => {
                self.active = self.query();
                FetchRequest::Page(self.active.clone())
            }
            Some(other) => other,
        };
        Some(self.issue(request))
    }

    pub fn go_to_previous_page(&mut self) -> Option<FetchPlan> {
        let mut query = self.query();
        if query.page <= 1 {
            return None;
        }
        query.page -= 1;
        self.set_parameters(query)
    }

    /// Advance one page without knowing the total; an empty page means
    /// the view went past the end
    pub fn go_to_next_page(&mut self) -> Option<FetchPlan> {
        let mut query = self.query();
        query.page = query.page.saturating_add(1);
        self.set_parameters(query)
    }

    pub fn set_page(&mut self, page: u32) -> Option<FetchPlan> {
        let mut query = self.query();
        query.page = page.max(1);
        self.set_parameters(query)
    }

    /// Change the page size, returning to page 1
    pub fn set_page_size(&mut self, limit: u32) -> Option<FetchPlan> {
        let mut query = self.query();
        if query.limit == limit.max(1) {
            return None;
        }
        query.limit = limit.max(1);
        query.page = 1;
        self.set_parameters(query)
    }

    /// Change one server-side filter, returning to page 1
    ///
    /// Keys the view does not read from navigation are refused.
    pub fn set_filter(&mut self, key: &str, value: &str) -> Option<FetchPlan> {
        if !self.defaults.accepts_filter(key) {
            tracing::warn!("{} list has no '{}' filter", self.profile.name, key);
            return None;
        }
        let current = self.query();
        let mut query = current.clone();
        query.set_filter(key, value);
        let mut query = self.defaults.normalize(query);
        if query.filters == current.filters {
            return None;
        }
        query.page = 1;
        self.set_parameters(query)
    }

    /// Replace every server-side filter, returning to page 1
    pub fn set_filters(&mut self, filters: BTreeMap<String, String>) -> Option<FetchPlan> {
        let current = self.query();
        let mut query = self.defaults.normalize(current.clone().with_filters(filters));
        if query.filters == current.filters {
            return None;
        }
        query.page = 1;
        self.set_parameters(query)
    }

    /// Fetch every page for `filters`
    ///
    /// The filters are written to navigation (page 1) so the address keeps
    /// describing what is shown.
    pub fn fetch_all(&mut self, filters: BTreeMap<String, String>) -> Option<FetchPlan> {
        let query = self
            .defaults
            .normalize(QueryState::new(1, self.query().limit).with_filters(filters));
        self.navigation
            .set(query.to_navigation(&self.defaults), SetOptions::replace());
        if !self.mounted {
            return None;
        }
        self.active = self.query();
        let request = FetchRequest::All {
            filters: self.active.filters.clone(),
            policy: self.options.fetch_all,
        };
        Some(self.issue(request))
    }

    /// Run a payload-style query
    pub fn submit_payload(&mut self, payload: Value) -> Option<FetchPlan> {
        if !self.mounted {
            return None;
        }
        Some(self.issue(FetchRequest::Payload(payload)))
    }

    /// Re-read navigation state and fetch if it diverged from the active query
    pub fn sync_from_navigation(&mut self) -> Option<FetchPlan> {
        if self.query() == self.active {
            return None;
        }
        self.fetch_current()
    }

    /// Navigate back in history and re-sync
    pub fn back(&mut self) -> Option<FetchPlan> {
        if !self.navigation.back() {
            return None;
        }
        self.sync_from_navigation()
    }

    /// Navigate forward in history and re-sync
    pub fn forward(&mut self) -> Option<FetchPlan> {
        if !self.navigation.forward() {
            return None;
        }
        self.sync_from_navigation()
    }

    pub fn navigation(&self) -> &dyn NavigationStore {
        self.navigation.as_ref()
    }

    fn fetch_current(&mut self) -> Option<FetchPlan> {
        self.active = self.query();
        if !self.mounted {
            return None;
        }
        Some(self.issue(FetchRequest::Page(self.active.clone())))
    }

    fn issue(&mut self, request: FetchRequest) -> FetchPlan {
        let token = self.tracker.issue();
        tracing::info!("Fetching {} {}: {:?}", self.profile.name, token, request);
        self.state.loading = true;
        self.state.error = None;
        self.state.error_category = None;
        self.in_flight = Some(request.clone());
        self.last_request = Some(request.clone());
        FetchPlan { token, request }
    }

    // ------------------------------------------------------------------
    // Completions
    // ------------------------------------------------------------------

    /// Apply the result of a fetch
    ///
    /// Only the latest issued token of a mounted view is applied; anything
    /// else is discarded without touching state.
    pub fn apply(&mut self, token: RequestToken, result: Result<ResourcePage>) -> ApplyOutcome {
        if !self.mounted || !self.tracker.resolve(token) {
            tracing::debug!("Discarding stale {} response {}", self.profile.name, token);
            return ApplyOutcome::Discarded;
        }

        let fetched_all = matches!(self.in_flight.take(), Some(FetchRequest::All { .. }));
        self.state.loading = false;
        match result {
            Ok(page) => {
                tracing::info!(
                    "Loaded {} {} ({} items)",
                    self.profile.name,
                    token,
                    page.items.len()
                );
                self.ledger.clear();
                self.state.page = page;
                self.state.error = None;
                self.state.error_category = None;
                self.state.fetched_all = fetched_all;
            }
            Err(err) => {
                tracing::warn!("Fetching {} failed: {}", self.profile.name, err);
                self.state.error = Some(err.user_message());
                self.state.error_category = Some(err.category());
                if !self.options.keep_stale_on_error {
                    self.ledger.clear();
                    self.state.page = ResourcePage::default();
                    self.state.fetched_all = false;
                }
            }
        }
        ApplyOutcome::Applied
    }

    // ------------------------------------------------------------------
    // Optimistic mutations
    // ------------------------------------------------------------------

    /// Show `transform(record)` immediately, remembering the original
    ///
    /// Returns `None` if the record is not on the loaded page.
    pub fn apply_optimistic<F>(&mut self, record_id: &str, transform: F) -> Option<MutationTicket>
    where
        F: FnOnce(&Record) -> Record,
    {
        let index = self.position(record_id)?;
        let current = &self.state.page.items[index];
        let optimistic = transform(current);
        let ticket = self
            .ledger
            .begin(record_id.to_string(), current, optimistic.clone());
        self.state.page.items[index] = optimistic;
        self.state.mutation_error = None;
        tracing::debug!(
            "Optimistic update of {} {} (generation {})",
            self.profile.name,
            record_id,
            ticket.generation
        );
        Some(ticket)
    }

    /// Make a mutation permanent
    ///
    /// `returned` fields from the server are merged into the record; with
    /// `remove` the record is dropped from the page instead.
    pub fn confirm_succeeded(
        &mut self,
        ticket: &MutationTicket,
        returned: Option<Record>,
        remove: bool,
    ) -> ApplyOutcome {
        if !self.mounted {
            return ApplyOutcome::Discarded;
        }
        match self.ledger.settle(ticket) {
            Settled::Cleared(_) => {
                if let Some(index) = self.position(&ticket.record_id) {
                    if remove {
                        self.state.page.items.remove(index);
                        if let Some(total) = self.state.page.total_count.as_mut() {
                            *total = total.saturating_sub(1);
                        }
                    } else if let Some(returned) = returned {
                        self.state.page.items[index].merge(&returned);
                    }
                }
                ApplyOutcome::Applied
            }
            Settled::Superseded | Settled::Unknown => {
                tracing::debug!(
                    "Ignoring confirmation of {} {} generation {}",
                    self.profile.name,
                    ticket.record_id,
                    ticket.generation
                );
                ApplyOutcome::Discarded
            }
        }
    }

    /// Roll a failed mutation back and surface the error
    ///
    /// When a newer mutation of the same record is still pending, only the
    /// error is surfaced; the newer mutation's own outcome decides the state.
    pub fn confirm_failed(&mut self, ticket: &MutationTicket, error: &DashboardError) -> ApplyOutcome {
        if !self.mounted {
            return ApplyOutcome::Discarded;
        }
        self.state.mutation_error = Some(error.user_message());
        if let Settled::Cleared(pending) = self.ledger.settle(ticket) {
            tracing::warn!(
                "Rolling back {} {}: {}",
                self.profile.name,
                ticket.record_id,
                error
            );
            if let Some(index) = self.position(&ticket.record_id) {
                self.state.page.items[index] = pending.previous;
            }
        } else {
            tracing::warn!(
                "Mutation of {} {} failed: {}",
                self.profile.name,
                ticket.record_id,
                error
            );
        }
        ApplyOutcome::Applied
    }

    // ------------------------------------------------------------------
    // Non-optimistic actions
    // ------------------------------------------------------------------

    /// Record a completed action and reload the list to show its effect
    pub fn action_succeeded(&mut self, message: String) -> Option<FetchPlan> {
        if !self.mounted {
            return None;
        }
        tracing::info!("{}: {}", self.profile.name, message);
        self.state.notice = Some(message);
        self.state.mutation_error = None;
        self.refresh()
    }

    /// Surface a failed action; the list itself is untouched
    pub fn action_failed(&mut self, error: &DashboardError) -> ApplyOutcome {
        if !self.mounted {
            return ApplyOutcome::Discarded;
        }
        tracing::warn!("{} action failed: {}", self.profile.name, error);
        self.state.notice = None;
        self.state.mutation_error = Some(error.user_message());
        ApplyOutcome::Applied
    }

    pub fn dismiss_notice(&mut self) {
        self.state.notice = None;
    }

    pub fn pending_mutation(&self, record_id: &str) -> Option<&PendingMutation> {
        self.ledger.get(record_id)
    }

    pub fn dismiss_mutation_error(&mut self) {
        self.state.mutation_error = None;
    }

    fn position(&self, record_id: &str) -> Option<usize> {
        self.state
            .page
            .items
            .iter()
            .position(|r| self.profile.record_id(r).as_deref() == Some(record_id))
    }

    // ------------------------------------------------------------------
    // Read access
    // ------------------------------------------------------------------

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn profile(&self) -> &ResourceProfile {
        &self.profile
    }

    pub fn defaults(&self) -> &QueryDefaults {
        &self.defaults
    }

    pub fn items(&self) -> &[Record] {
        &self.state.page.items
    }

    pub fn is_loading(&self) -> bool {
        self.state.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    /// Whether the loaded page is empty because it lies past the last page
    pub fn is_past_end(&self) -> bool {
        !self.state.loading && self.state.page.items.is_empty() && self.query().page > 1
    }

    pub fn client_filter(&self) -> &ClientFilter {
        &self.filter
    }

    pub fn client_filter_mut(&mut self) -> &mut ClientFilter {
        &mut self.filter
    }

    /// Loaded items passing the client filter
    pub fn visible_items(&self) -> Vec<&Record> {
        self.filter.apply(&self.profile, &self.state.page.items)
    }

    /// Selectable values of a dropdown filter, derived from the loaded page
    pub fn filter_options(&self, key: &str) -> Vec<String> {
        derive_options(&self.profile, &self.state.page.items, key)
    }

    pub fn summary(&self) -> PaginationSummary {
        let page = &self.state.page;
        let total = page.total_count.unwrap_or(page.items.len() as u64);
        let (page_number, limit) = if self.state.fetched_all || page.unpaginated {
            (1, page.page_size.max(1))
        } else {
            let query = self.query();
            (query.page, query.limit)
        };
        let page_count = total.div_ceil(u64::from(limit)).max(1);
        PaginationSummary {
            page: page_number,
            limit,
            total,
            page_count,
            shown: self.visible_items().len(),
        }
    }
}
