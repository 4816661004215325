// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Schemadraft and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Debounced background persistence.
//!
//! Each open session owns a write slot. Scheduling a model into a slot replaces whatever was
//! pending there and pushes its deadline out by the debounce interval, so a burst of edits
//! becomes one write. A single worker thread performs the writes, one at a time, and records
//! the outcome per slot for [`PersistScheduler::status`].

use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{trace, warn};

use super::gateway::{PersistenceGateway, StoreError};
use crate::model::{DiagramId, Model};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistStatus {
    /// Everything scheduled so far has been written.
    Idle,
    /// A write is waiting for its deadline or running right now.
    Pending,
    /// The last write failed; the in-memory model is still authoritative.
    Failed { message: String, attempts: u32 },
}

#[derive(Debug)]
struct PendingWrite {
    model: Arc<Model>,
    due: Instant,
}

#[derive(Debug)]
struct SlotState {
    diagram_id: DiagramId,
    pending: Option<PendingWrite>,
    failure: Option<String>,
    failed_attempts: u32,
}

#[derive(Debug, Default)]
struct PersistState {
    next_slot: u64,
    slots: HashMap<SlotId, SlotState>,
    in_flight: Option<(SlotId, DiagramId)>,
    shutdown: bool,
}

impl PersistState {
    fn earliest_due(&self) -> Option<(SlotId, Instant)> {
        self.slots
            .iter()
            .filter_map(|(slot, state)| state.pending.as_ref().map(|p| (*slot, p.due)))
            .min_by_key(|(slot, due)| (*due, *slot))
    }

    fn is_busy(&self, slot: SlotId) -> bool {
        self.in_flight.as_ref().is_some_and(|(active, _)| *active == slot)
            || self
                .slots
                .get(&slot)
                .is_some_and(|state| state.pending.is_some())
    }

    fn is_writing_diagram(&self, diagram_id: &DiagramId) -> bool {
        self.in_flight
            .as_ref()
            .is_some_and(|(_, active)| active == diagram_id)
    }
}

struct PersistInner {
    state: Mutex<PersistState>,
    cv: Condvar,
    gateway: Arc<dyn PersistenceGateway>,
    debounce: Duration,
}

impl PersistInner {
    fn lock(&self) -> MutexGuard<'_, PersistState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn wait<'a>(&self, guard: MutexGuard<'a, PersistState>) -> MutexGuard<'a, PersistState> {
        self.cv.wait(guard).unwrap_or_else(PoisonError::into_inner)
    }
}

struct SchedulerHandle {
    inner: Arc<PersistInner>,
    worker: Option<JoinHandle<()>>,
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        self.inner.lock().shutdown = true;
        self.inner.cv.notify_all();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

/// Cloneable handle to the persistence worker. The worker stops once the last clone is dropped;
/// a write already in progress finishes first, pending ones are discarded.
#[derive(Clone)]
pub struct PersistScheduler {
    handle: Arc<SchedulerHandle>,
}

impl std::fmt::Debug for PersistScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistScheduler")
            .field("debounce", &self.handle.inner.debounce)
            .finish_non_exhaustive()
    }
}

impl PersistScheduler {
    pub fn new(
        gateway: Arc<dyn PersistenceGateway>,
        debounce: Duration,
    ) -> Result<Self, StoreError> {
        let inner = Arc::new(PersistInner {
            state: Mutex::new(PersistState::default()),
            cv: Condvar::new(),
            gateway,
            debounce,
        });

        let worker = std::thread::Builder::new()
            .name("schemadraft-persist".to_owned())
            .spawn({
                let inner = inner.clone();
                move || run_worker(&inner)
            })
            .map_err(|source| StoreError::Worker { source })?;

        Ok(Self {
            handle: Arc::new(SchedulerHandle {
                inner,
                worker: Some(worker),
            }),
        })
    }

    fn inner(&self) -> &PersistInner {
        &self.handle.inner
    }

    pub fn debounce(&self) -> Duration {
        self.inner().debounce
    }

    pub fn register_slot(&self, diagram_id: DiagramId) -> SlotId {
        let mut state = self.inner().lock();
        let slot = SlotId(state.next_slot);
        state.next_slot += 1;
        state.slots.insert(
            slot,
            SlotState {
                diagram_id,
                pending: None,
                failure: None,
                failed_attempts: 0,
            },
        );
        slot
    }

    /// Replaces the slot's pending payload and restarts its debounce deadline.
    pub fn schedule(&self, slot: SlotId, model: Arc<Model>) {
        let inner = self.inner();
        let mut state = inner.lock();
        let Some(slot_state) = state.slots.get_mut(&slot) else {
            return;
        };
        let replaced = slot_state
            .pending
            .replace(PendingWrite {
                model,
                due: Instant::now() + inner.debounce,
            })
            .is_some();
        trace!(slot = slot.0, replaced, "scheduled write");
        inner.cv.notify_all();
    }

    /// Drops the slot's pending payload. A write already running is not interrupted.
    pub fn cancel(&self, slot: SlotId) -> bool {
        let mut state = self.inner().lock();
        state
            .slots
            .get_mut(&slot)
            .and_then(|slot_state| slot_state.pending.take())
            .is_some()
    }

    /// Drops every pending payload for `diagram_id` and waits out a write to it that is already
    /// running, so nothing reaches the gateway for this diagram afterwards unless rescheduled.
    pub fn cancel_diagram(&self, diagram_id: &DiagramId) -> usize {
        let inner = self.inner();
        let mut state = inner.lock();
        let mut cancelled = 0;
        for slot_state in state.slots.values_mut() {
            if slot_state.diagram_id == *diagram_id && slot_state.pending.take().is_some() {
                cancelled += 1;
            }
        }
        while state.is_writing_diagram(diagram_id) && !state.shutdown {
            state = inner.wait(state);
        }
        cancelled
    }

    /// Makes the slot's pending payload due now and blocks until it (and any write already
    /// running for the slot) has been attempted.
    pub fn flush(&self, slot: SlotId) -> PersistStatus {
        let inner = self.inner();
        let mut state = inner.lock();
        if let Some(pending) = state
            .slots
            .get_mut(&slot)
            .and_then(|slot_state| slot_state.pending.as_mut())
        {
            pending.due = Instant::now();
            inner.cv.notify_all();
        }
        while state.is_busy(slot) && !state.shutdown {
            state = inner.wait(state);
        }
        slot_status(&state, slot)
    }

    pub fn status(&self, slot: SlotId) -> PersistStatus {
        slot_status(&self.inner().lock(), slot)
    }

    /// Forgets the slot. Its pending payload is dropped; a running write still completes.
    pub fn release(&self, slot: SlotId) {
        let mut state = self.inner().lock();
        state.slots.remove(&slot);
    }
}

fn slot_status(state: &PersistState, slot: SlotId) -> PersistStatus {
    if state.is_busy(slot) {
        return PersistStatus::Pending;
    }
    match state.slots.get(&slot) {
        Some(SlotState {
            failure: Some(message),
            failed_attempts,
            ..
        }) => PersistStatus::Failed {
            message: message.clone(),
            attempts: *failed_attempts,
        },
        _ => PersistStatus::Idle,
    }
}

fn run_worker(inner: &PersistInner) {
    loop {
        let (slot, diagram_id, model) = {
            let mut state = inner.lock();
            loop {
                if state.shutdown {
                    return;
                }
                let now = Instant::now();
                match state.earliest_due() {
                    Some((slot, due)) if due <= now => {
                        let Some(slot_state) = state.slots.get_mut(&slot) else {
                            continue;
                        };
                        let Some(pending) = slot_state.pending.take() else {
                            continue;
                        };
                        let diagram_id = slot_state.diagram_id.clone();
                        state.in_flight = Some((slot, diagram_id.clone()));
                        break (slot, diagram_id, pending.model);
                    }
                    Some((_, due)) => {
                        state = inner
                            .cv
                            .wait_timeout(state, due - now)
                            .map(|(guard, _)| guard)
                            .unwrap_or_else(|poisoned| poisoned.into_inner().0);
                    }
                    None => state = inner.wait(state),
                }
            }
        };

        trace!(slot = slot.0, diagram_id = %diagram_id, "writing model");
        let result = inner.gateway.save(&diagram_id, &model);

        let mut state = inner.lock();
        state.in_flight = None;
        if let Some(slot_state) = state.slots.get_mut(&slot) {
            match result {
                Ok(()) => {
                    slot_state.failure = None;
                    slot_state.failed_attempts = 0;
                }
                Err(err) => {
                    slot_state.failed_attempts = slot_state.failed_attempts.saturating_add(1);
                    warn!(
                        diagram_id = %diagram_id,
                        attempts = slot_state.failed_attempts,
                        error = %err,
                        "persisting diagram failed"
                    );
                    slot_state.failure = Some(err.to_string());
                }
            }
        } else if let Err(err) = result {
            warn!(diagram_id = %diagram_id, error = %err, "write for a released slot failed");
        }
        inner.cv.notify_all();
    }
}
