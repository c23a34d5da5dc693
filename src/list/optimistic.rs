//! Optimistic mutation ledger
//!
//! A mutation is shown immediately and confirmed against the server
//! afterwards. The ledger keeps, per record, the snapshot taken before the
//! *first* unconfirmed mutation so that a rollback always restores the true
//! original state, never an intermediate optimistic value.

use std::collections::HashMap;

use crate::types::{Record, RecordId};

/// Handle returned by [`MutationLedger::begin`], used to settle a mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationTicket {
    pub record_id: RecordId,
    pub generation: u64,
}

/// An unconfirmed mutation of one record
#[derive(Debug, Clone, PartialEq)]
pub struct PendingMutation {
    pub record_id: RecordId,
    /// State before the first unconfirmed mutation
    pub previous: Record,
    /// Currently displayed optimistic state
    pub optimistic: Record,
    /// Generation of the latest mutation stacked on this record
    pub generation: u64,
}

/// Result of settling a ticket
#[derive(Debug, Clone, PartialEq)]
pub enum Settled {
    /// The ticket was the latest mutation of its record and is now cleared
    Cleared(PendingMutation),
    /// A newer mutation of the same record is still pending
    Superseded,
    /// Nothing is pending for the record (e.g. the page was reloaded)
    Unknown,
}

/// At most one [`PendingMutation`] per record
#[derive(Debug, Default)]
pub struct MutationLedger {
    pending: HashMap<RecordId, PendingMutation>,
    generation: u64,
}

impl MutationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a mutation of `current` into `optimistic`
    ///
    /// If the record already has a pending mutation its original snapshot
    /// is kept and only the optimistic state and generation move forward.
    pub fn begin(&mut self, record_id: RecordId, current: &Record, optimistic: Record) -> MutationTicket {
        self.generation += 1;
        let generation = self.generation;
        self.pending
            .entry(record_id.clone())
            .and_modify(|pending| {
                pending.optimistic = optimistic.clone();
                pending.generation = generation;
            })
            .or_insert_with(|| PendingMutation {
                record_id: record_id.clone(),
                previous: current.clone(),
                optimistic,
                generation,
            });
        MutationTicket {
            record_id,
            generation,
        }
    }

    /// Settle a ticket, clearing the pending entry if it is the latest
    pub fn settle(&mut self, ticket: &MutationTicket) -> Settled {
        match self.pending.get(&ticket.record_id) {
            None => Settled::Unknown,
            Some(pending) if pending.generation != ticket.generation => Settled::Superseded,
            Some(_) => match self.pending.remove(&ticket.record_id) {
                Some(pending) => Settled::Cleared(pending),
                None => Settled::Unknown,
            },
        }
    }

    pub fn get(&self, record_id: &str) -> Option<&PendingMutation> {
        self.pending.get(record_id)
    }

    pub fn is_pending(&self, record_id: &str) -> bool {
        self.pending.contains_key(record_id)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Forget every pending mutation
    pub fn clear(&mut self) {
        if !self.pending.is_empty() {
            tracing::debug!("Dropping {} pending mutations", self.pending.len());
        }
        self.pending.clear();
    }
}
