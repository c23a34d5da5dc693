//! Async execution of list-controller plans
//!
//! [`ListView`] pairs a [`ListController`] with a data source and a tokio
//! runtime handle. Fetches and mutation confirmations run as spawned tasks
//! and report back over a crossbeam channel; [`ListView::poll`] drains that
//! channel on the UI thread and applies completions to the controller, so
//! controller state is only ever touched from one place.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use serde_json::Value;
use tokio::runtime::Handle;

use super::controller::{ApplyOutcome, FetchPlan, FetchRequest, ListController};
use super::fetch_all::fetch_all_pages;
use super::optimistic::MutationTicket;
use super::query::QueryState;
use super::request::RequestToken;
use crate::error::{DashboardError, Result};
use crate::source::DataSource;
use crate::types::{Record, ResourcePage};

/// Callback used to wake the renderer when a completion arrives
pub type Waker = Arc<dyn Fn() + Send + Sync>;

enum Completion {
    Fetched {
        token: RequestToken,
        result: Result<ResourcePage>,
    },
    Confirmed {
        ticket: MutationTicket,
        result: Result<Option<Record>>,
        remove: bool,
    },
    Action {
        result: Result<String>,
    },
}

/// Run `future` with a deadline, mapping expiry to [`DashboardError::Timeout`]
pub async fn with_timeout<T, F>(timeout: Duration, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, future).await {
        Ok(result) => result,
        Err(_) => Err(DashboardError::Timeout(timeout)),
    }
}

/// Data source decorator applying a per-call timeout
struct TimedSource {
    inner: Arc<dyn DataSource>,
    timeout: Duration,
}

#[async_trait]
impl DataSource for TimedSource {
    async fn fetch_page(&self, query: &QueryState) -> Result<ResourcePage> {
        with_timeout(self.timeout, self.inner.fetch_page(query)).await
    }

    async fn submit_payload(&self, payload: &Value) -> Result<ResourcePage> {
        with_timeout(self.timeout, self.inner.submit_payload(payload)).await
    }
}

/// A list controller wired to a data source
pub struct ListView {
    controller: ListController,
    source: Arc<TimedSource>,
    runtime: Handle,
    timeout: Duration,
    completion_tx: Sender<Completion>,
    completion_rx: Receiver<Completion>,
    waker: Option<Waker>,
}

impl ListView {
    pub fn new(
        controller: ListController,
        source: Arc<dyn DataSource>,
        runtime: Handle,
        timeout: Duration,
    ) -> Self {
        let (completion_tx, completion_rx) = unbounded();
        Self {
            controller,
            source: Arc::new(TimedSource {
                inner: source,
                timeout,
            }),
            runtime,
            timeout,
            completion_tx,
            completion_rx,
            waker: None,
        }
    }

    /// Wake the renderer whenever a completion is queued
    pub fn set_waker(&mut self, waker: Waker) {
        self.waker = Some(waker);
    }

    pub fn controller(&self) -> &ListController {
        &self.controller
    }

    /// Run a controller operation and execute the plan it returns
    ///
    /// Returns `true` if a fetch was started.
    pub fn update<F>(&mut self, operation: F) -> bool
    where
        F: FnOnce(&mut ListController) -> Option<FetchPlan>,
    {
        match operation(&mut self.controller) {
            Some(plan) => {
                self.execute(plan);
                true
            }
            None => false,
        }
    }

    /// Mount the controller and start the initial fetch
    pub fn mount(&mut self) {
        let plan = self.controller.mount();
        self.execute(plan);
    }

    pub fn unmount(&mut self) {
        self.controller.unmount();
    }

    pub fn refresh(&mut self) -> bool {
        self.update(ListController::refresh)
    }

    /// Show a mutation immediately and confirm it in the background
    ///
    /// `call` performs the remote mutation and may return fields to merge
    /// into the record. Returns `false` if the record is not loaded.
    pub fn mutate<T, C>(&mut self, record_id: &str, transform: T, call: C, remove_on_success: bool) -> bool
    where
        T: FnOnce(&Record) -> Record,
        C: Future<Output = Result<Option<Record>>> + Send + 'static,
    {
        match self.controller.apply_optimistic(record_id, transform) {
            Some(ticket) => {
                self.confirm(ticket, call, remove_on_success);
                true
            }
            None => false,
        }
    }

    /// Confirm an already applied optimistic mutation
    pub fn confirm<C>(&mut self, ticket: MutationTicket, call: C, remove_on_success: bool)
    where
        C: Future<Output = Result<Option<Record>>> + Send + 'static,
    {
        let tx = self.completion_tx.clone();
        let waker = self.waker.clone();
        let timeout = self.timeout;
        self.runtime.spawn(async move {
            let result = with_timeout(timeout, call).await;
            let _ = tx.send(Completion::Confirmed {
                ticket,
                result,
                remove: remove_on_success,
            });
            if let Some(wake) = waker {
                wake();
            }
        });
    }

    /// Run a non-optimistic action and reload the list once it succeeds
    ///
    /// `call` resolves to the message shown to the user.
    pub fn perform<C>(&mut self, call: C)
    where
        C: Future<Output = Result<String>> + Send + 'static,
    {
        let tx = self.completion_tx.clone();
        let waker = self.waker.clone();
        let timeout = self.timeout;
        self.runtime.spawn(async move {
            let result = with_timeout(timeout, call).await;
            let _ = tx.send(Completion::Action { result });
            if let Some(wake) = waker {
                wake();
            }
        });
    }

    /// Apply every queued completion
    ///
    /// Returns `true` if any of them changed controller state.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(completion) = self.completion_rx.try_recv() {
            changed |= self.apply(completion) == ApplyOutcome::Applied;
        }
        changed
    }

    /// Block until one completion arrives (or `timeout` elapses) and apply it
    ///
    /// Intended for headless use and tests; the UI uses [`ListView::poll`].
    pub fn wait(&mut self, timeout: Duration) -> Option<ApplyOutcome> {
        match self.completion_rx.recv_timeout(timeout) {
            Ok(completion) => Some(self.apply(completion)),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    fn apply(&mut self, completion: Completion) -> ApplyOutcome {
        match completion {
            Completion::Fetched { token, result } => self.controller.apply(token, result),
            Completion::Confirmed {
                ticket,
                result: Ok(returned),
                remove,
            } => self.controller.confirm_succeeded(&ticket, returned, remove),
            Completion::Confirmed {
                ticket,
                result: Err(err),
                ..
            } => self.controller.confirm_failed(&ticket, &err),
            Completion::Action { result: Ok(message) } => {
                match self.controller.action_succeeded(message) {
                    Some(plan) => {
                        self.execute(plan);
                        ApplyOutcome::Applied
                    }
                    None => ApplyOutcome::Discarded,
                }
            }
            Completion::Action { result: Err(err) } => self.controller.action_failed(&err),
        }
    }

    fn execute(&self, plan: FetchPlan) {
        let FetchPlan { token, request } = plan;
        let source = Arc::clone(&self.source);
        let tx = self.completion_tx.clone();
        let waker = self.waker.clone();

        self.runtime.spawn(async move {
            let result = match request {
                FetchRequest::Page(query) => source.fetch_page(&query).await,
                FetchRequest::All { filters, policy } => {
                    fetch_all_pages(source.as_ref(), &filters, policy)
                        .await
                        .map(|all| all.into_page())
                }
                FetchRequest::Payload(payload) => source.submit_payload(&payload).await,
            };
            // The view may be gone; its completions are simply dropped.
            let _ = tx.send(Completion::Fetched { token, result });
            if let Some(wake) = waker {
                wake();
            }
        });
    }
}
