//! Data source whose responses are released by the test
//!
//! Each page fetch blocks until the test opens the gate for that page,
//! which makes response ordering fully deterministic.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use crewdeck::list::QueryState;
use crewdeck::{DashboardError, DataSource, ResourcePage, Result};
use tokio::sync::oneshot;

use super::builders::page_of;

pub struct GatedSource {
    gates: Mutex<HashMap<u32, oneshot::Receiver<()>>>,
}

/// Test-side handles opening the gates
pub struct Gates {
    senders: HashMap<u32, oneshot::Sender<()>>,
}

impl Gates {
    /// Let the pending fetch of `page` complete
    pub fn release(&mut self, page: u32) {
        if let Some(sender) = self.senders.remove(&page) {
            let _ = sender.send(());
        }
    }
}

impl GatedSource {
    /// A source with one gate per page in `pages`
    pub fn new(pages: &[u32]) -> (Self, Gates) {
        let mut gates = HashMap::new();
        let mut senders = HashMap::new();
        for &page in pages {
            let (tx, rx) = oneshot::channel();
            gates.insert(page, rx);
            senders.insert(page, tx);
        }
        (
            Self {
                gates: Mutex::new(gates),
            },
            Gates { senders },
        )
    }
}

#[async_trait]
impl DataSource for GatedSource {
    async fn fetch_page(&self, query: &QueryState) -> Result<ResourcePage> {
        let gate = self.gates.lock().unwrap().remove(&query.page);
        let Some(gate) = gate else {
            return Err(DashboardError::Validation(format!(
                "no gate for page {}",
                query.page
            )));
        };
        gate.await
            .map_err(|_| DashboardError::Network("gate dropped".to_string()))?;
        Ok(page_of(&format!("p{}", query.page), 3, query.page, query.limit))
    }
}
