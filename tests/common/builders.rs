//! Test data builders for creating test objects

use crewdeck::list::{ListController, ListOptions, QueryDefaults, ResourceProfile};
use crewdeck::navigation::HistoryNavigationStore;
use crewdeck::{Record, ResourcePage};

/// Builder for approval records
pub struct ApprovalBuilder {
    record: Record,
}

impl ApprovalBuilder {
    pub fn new(id: u64) -> Self {
        Self {
            record: Record::new()
                .with("id", id)
                .with("requester", format!("Requester {}", id))
                .with("type", "Leave")
                .with("status", "pending"),
        }
    }

    pub fn status(mut self, status: &str) -> Self {
        self.record.set("status", status);
        self
    }

    pub fn build(self) -> Record {
        self.record
    }
}

/// A page of records with ids `prefix-0`, `prefix-1`, ...
pub fn page_of(prefix: &str, count: usize, page: u32, limit: u32) -> ResourcePage {
    let items = (0..count)
        .map(|i| Record::new().with("id", format!("{}-{}", prefix, i)))
        .collect();
    ResourcePage::new(items, page, limit)
}

/// Builder for list controllers over an in-memory history
pub struct ControllerBuilder {
    profile: ResourceProfile,
    defaults: QueryDefaults,
    options: ListOptions,
    query: String,
}

impl ControllerBuilder {
    pub fn new(profile: ResourceProfile) -> Self {
        Self {
            profile,
            defaults: QueryDefaults::default(),
            options: ListOptions::default(),
            query: String::new(),
        }
    }

    pub fn query(mut self, query: &str) -> Self {
        self.query = query.to_string();
        self
    }

    pub fn defaults(mut self, defaults: QueryDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn keep_stale_on_error(mut self) -> Self {
        self.options.keep_stale_on_error = true;
        self
    }

    pub fn build(self) -> ListController {
        ListController::new(
            self.profile,
            self.defaults,
            self.options,
            Box::new(HistoryNavigationStore::from_query_string(&self.query)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approval_builder() {
        let approval = ApprovalBuilder::new(4).status("approved").build();
        assert_eq!(approval.text("id").as_deref(), Some("4"));
        assert_eq!(approval.text("status").as_deref(), Some("approved"));
    }
}
