//! Region State Machine
//!
//! Owns hunt progress and decides which single region the backend should
//! watch. Two asynchronous origins drive it: lifecycle triggers
//! (`ensure_active`, `deactivate_all`) and backend transition events
//! (`on_transition_event`). They cannot be serialized by the caller, so
//! there is no lock held across a backend call. Instead:
//!
//! - every backend call is preceded by a state check under a short lock
//! - an in-flight activation is tagged with an attempt number, and its
//!   completion only commits if the machine is still waiting for it
//! - a superseded activation blocks new ones until it has withdrawn its
//!   own registration, because removal is keyed by handle
//! - removal is idempotent, and only the confirmed active region can
//!   advance progress
//!
//! Progress is written to the store before the in-memory copy changes and
//! before the user is notified.

use std::sync::{Arc, Mutex, MutexGuard};

use super::errors::{HuntError, HuntResult};
use super::gate::{GateBlock, LocationGate};
use super::observability::HuntEvent;
use super::outcome::{ActivationOutcome, DiscardReason, TransitionOutcome};
use super::state::HuntState;
use crate::catalog::{Landmark, LandmarkCatalog};
use crate::crash_point::{maybe_crash, points};
use crate::monitor::{
    MonitorError, MonitorResult, MonitoringRequest, PendingHandle, RegionMonitorPort,
    TransitionEvent, TransitionType,
};
use crate::notification::{NotificationKind, NotificationPort};
use crate::progress::{ProgressState, ProgressStore};

#[derive(Debug)]
struct MachineInner {
    state: HuntState,
    progress: ProgressState,
    next_attempt: u64,
}

/// What an activation call decided to do while holding the lock.
enum ActivationPlan {
    Skip(ActivationOutcome),
    Finish,
    Activate {
        index: usize,
        landmark: Landmark,
        attempt: u64,
    },
}

/// Result of committing a confirmed add.
enum Commit {
    Confirmed,
    Superseded,
    NotDurable(HuntError),
}

/// Outcome for states where no activation should be issued.
fn settled_outcome(state: &HuntState) -> Option<ActivationOutcome> {
    match state {
        HuntState::Idle => None,
        HuntState::Activating { .. } | HuntState::Cancelling { .. } => {
            Some(ActivationOutcome::InFlight)
        }
        HuntState::Active { index, region_id } => Some(ActivationOutcome::AlreadyActive {
            index: *index,
            region_id: region_id.clone(),
        }),
        HuntState::Completed => Some(ActivationOutcome::HuntFinished),
    }
}

/// Removal outcome with `NotRegistered` folded into success.
fn idempotent_remove(result: MonitorResult<()>) -> MonitorResult<()> {
    match result {
        Ok(()) | Err(MonitorError::NotRegistered(_)) => Ok(()),
        Err(e) => Err(e),
    }
}

/// The single-active-region hunt controller.
pub struct RegionStateMachine {
    catalog: LandmarkCatalog,
    handle: PendingHandle,
    monitor: Arc<dyn RegionMonitorPort>,
    notifier: Arc<dyn NotificationPort>,
    store: Arc<dyn ProgressStore>,
    inner: Mutex<MachineInner>,
}

impl RegionStateMachine {
    /// Construct from durable progress.
    ///
    /// A persisted index beyond the catalog is rejected rather than
    /// clamped. A persisted active region is forgotten: the backend may or
    /// may not still hold it, so the next `ensure_active` re-registers.
    pub fn recover(
        catalog: LandmarkCatalog,
        handle: PendingHandle,
        monitor: Arc<dyn RegionMonitorPort>,
        notifier: Arc<dyn NotificationPort>,
        store: Arc<dyn ProgressStore>,
    ) -> HuntResult<Self> {
        let persisted = store.load()?;
        let landmark_count = catalog.len();

        if persisted.next_index > landmark_count {
            return Err(HuntError::InvalidProgress {
                next_index: persisted.next_index,
                landmark_count,
            });
        }

        HuntEvent::ProgressRecovered {
            next_index: persisted.next_index,
            landmark_count,
            forgotten_region_id: persisted.active_region_id.clone(),
        }
        .emit();

        Ok(Self {
            inner: Mutex::new(MachineInner {
                state: HuntState::recover(persisted.next_index, landmark_count),
                progress: persisted.cleared(),
                next_attempt: 1,
            }),
            catalog,
            handle,
            monitor,
            notifier,
            store,
        })
    }

    fn lock(&self) -> MutexGuard<'_, MachineInner> {
        // State is only replaced wholesale, so a poisoned guard is consistent.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn catalog(&self) -> &LandmarkCatalog {
        &self.catalog
    }

    pub fn handle(&self) -> &PendingHandle {
        &self.handle
    }

    pub fn state(&self) -> HuntState {
        self.lock().state.clone()
    }

    /// In-memory copy of the last durable progress.
    pub fn progress(&self) -> ProgressState {
        self.lock().progress.clone()
    }

    pub fn active_region_id(&self) -> Option<String> {
        self.lock().progress.active_region_id.clone()
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.lock().state, HuntState::Completed)
    }

    /// Landmark that the next activation targets, if the hunt is not over.
    pub fn current_target(&self) -> Option<&Landmark> {
        let next_index = self.lock().progress.next_index;
        self.catalog.get(next_index)
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Activate the current target unless a region is already active, in
    /// flight, or the hunt is over.
    ///
    /// The gate is consulted only when an activation would actually be
    /// issued. A closed gate issues nothing.
    pub async fn ensure_active(&self, gate: &dyn LocationGate) -> HuntResult<ActivationOutcome> {
        let settled = settled_outcome(&self.lock().state);
        if let Some(outcome) = settled {
            return Ok(outcome);
        }

        if let Some(block) = GateBlock::check(gate) {
            tracing::debug!(?block, "activation blocked by location gate");
            return Ok(ActivationOutcome::Blocked(block));
        }

        self.activate_next().await
    }

    /// Register `catalog[next_index]` as the single monitored region, or
    /// complete the hunt if every landmark was found.
    ///
    /// Issues remove-then-add. A failed add leaves the machine Idle with
    /// nothing active; retrying is up to the caller.
    pub async fn activate_next(&self) -> HuntResult<ActivationOutcome> {
        match self.plan_activation()? {
            ActivationPlan::Skip(outcome) => Ok(outcome),
            ActivationPlan::Finish => Ok(self.finish().await),
            ActivationPlan::Activate {
                index,
                landmark,
                attempt,
            } => self.activate(index, landmark, attempt).await,
        }
    }

    fn plan_activation(&self) -> HuntResult<ActivationPlan> {
        let mut inner = self.lock();

        if let Some(outcome) = settled_outcome(&inner.state) {
            return Ok(ActivationPlan::Skip(outcome));
        }

        let index = inner.progress.next_index;
        let Some(landmark) = self.catalog.get(index).cloned() else {
            inner.state = std::mem::take(&mut inner.state).complete()?;
            return Ok(ActivationPlan::Finish);
        };

        let attempt = inner.next_attempt;
        inner.next_attempt += 1;
        inner.state =
            std::mem::take(&mut inner.state).begin_activation(index, landmark.id.clone(), attempt)?;

        Ok(ActivationPlan::Activate {
            index,
            landmark,
            attempt,
        })
    }

    /// Tear down whatever the last found landmark left registered and
    /// announce completion.
    async fn finish(&self) -> ActivationOutcome {
        if let Err(e) = idempotent_remove(self.monitor.remove_region(&self.handle).await) {
            tracing::warn!(error = %e, "failed to remove region on hunt completion");
            self.notifier.notify(NotificationKind::RegionsRemoveFailed);
        }

        HuntEvent::Completed {
            landmark_count: self.catalog.len(),
        }
        .emit();
        self.notifier.notify(NotificationKind::HuntCompleted);

        ActivationOutcome::HuntFinished
    }

    async fn activate(
        &self,
        index: usize,
        landmark: Landmark,
        attempt: u64,
    ) -> HuntResult<ActivationOutcome> {
        let region_id = landmark.id.clone();
        HuntEvent::ActivationStarted {
            index,
            region_id: region_id.clone(),
        }
        .emit();

        // Remove strictly before add: the backend never holds two regions.
        if let Err(e) = idempotent_remove(self.monitor.remove_region(&self.handle).await) {
            self.abort_attempt(index, &region_id, attempt);
            self.notifier.notify(NotificationKind::RegionsRemoveFailed);
            HuntEvent::ActivationFailed {
                index,
                region_id,
                reason: e.to_string(),
            }
            .emit();
            return Err(HuntError::backend("remove region", e));
        }

        let request = MonitoringRequest::for_landmark(&self.handle, &landmark);
        if let Err(e) = self.monitor.add_region(&request).await {
            self.abort_attempt(index, &region_id, attempt);
            self.notifier.notify(NotificationKind::RegionAddFailed);
            HuntEvent::ActivationFailed {
                index,
                region_id,
                reason: e.to_string(),
            }
            .emit();
            return Err(HuntError::backend("add region", e));
        }

        maybe_crash(points::HUNT_AFTER_ADD_BEFORE_PERSIST);

        match self.commit_activation(index, &region_id, attempt) {
            Commit::Confirmed => {
                self.notifier.notify(NotificationKind::RegionAdded);
                HuntEvent::ActivationConfirmed {
                    index,
                    region_id: region_id.clone(),
                }
                .emit();
                Ok(ActivationOutcome::Activated { index, region_id })
            }
            Commit::Superseded => {
                // Deactivated while the add was in flight: cancel it. Nothing
                // newer can be registered under the handle until finish_cancel.
                if let Err(e) = idempotent_remove(self.monitor.remove_region(&self.handle).await) {
                    tracing::warn!(error = %e, region_id = %region_id, "failed to cancel superseded region");
                    self.notifier.notify(NotificationKind::RegionsRemoveFailed);
                }
                self.finish_cancel(index, &region_id, attempt);
                HuntEvent::ActivationSuperseded {
                    index,
                    region_id: region_id.clone(),
                }
                .emit();
                Ok(ActivationOutcome::Superseded { index, region_id })
            }
            Commit::NotDurable(err) => {
                // Treat as never activated; do not leave an untracked region.
                if let Err(e) = idempotent_remove(self.monitor.remove_region(&self.handle).await) {
                    tracing::warn!(error = %e, region_id = %region_id, "failed to withdraw non-durable region");
                    self.notifier.notify(NotificationKind::RegionsRemoveFailed);
                }
                self.notifier.notify(NotificationKind::RegionAddFailed);
                HuntEvent::ActivationFailed {
                    index,
                    region_id,
                    reason: err.to_string(),
                }
                .emit();
                Err(err)
            }
        }
    }

    fn commit_activation(&self, index: usize, region_id: &str, attempt: u64) -> Commit {
        let mut inner = self.lock();

        if !inner.state.is_attempt(index, region_id, attempt) {
            return Commit::Superseded;
        }

        // The save runs under the lock so that the durable record and the
        // in-memory state change together. It is synchronous and never spans
        // an await; a store with slow I/O must not be used from a
        // latency-sensitive executor thread.
        let next = inner.progress.with_active(region_id);
        if let Err(e) = self.store.save(&next) {
            inner.state = std::mem::take(&mut inner.state)
                .abort_activation()
                .unwrap_or_default();
            return Commit::NotDurable(e.into());
        }

        inner.progress = next;
        inner.state = match std::mem::take(&mut inner.state).confirm_activation() {
            Ok(state) => state,
            Err(e) => return Commit::NotDurable(e),
        };
        Commit::Confirmed
    }

    /// Return to Idle if the machine is still waiting on this attempt,
    /// whether to confirm it or to see it cancelled.
    fn abort_attempt(&self, index: usize, region_id: &str, attempt: u64) {
        let mut inner = self.lock();
        if inner.state.is_attempt(index, region_id, attempt)
            || inner.state.is_cancelled_attempt(index, region_id, attempt)
        {
            inner.state = std::mem::take(&mut inner.state)
                .abort_activation()
                .unwrap_or_default();
        }
    }

    /// Release the Cancelling block once the superseded add is withdrawn.
    fn finish_cancel(&self, index: usize, region_id: &str, attempt: u64) {
        let mut inner = self.lock();
        if inner.state.is_cancelled_attempt(index, region_id, attempt) {
            inner.state = std::mem::take(&mut inner.state)
                .finish_cancel()
                .unwrap_or_default();
        }
    }

    // =========================================================================
    // TRANSITION EVENTS
    // =========================================================================

    /// Apply one backend transition event.
    ///
    /// Only an error-free Enter for the confirmed active region advances
    /// progress, by exactly one. Progress is durable before the in-memory
    /// state changes; the chained activation runs after that commit, so an
    /// error from it leaves the advance in place.
    pub async fn on_transition_event(&self, event: TransitionEvent) -> HuntResult<TransitionOutcome> {
        let found_index = match self.validate_event(&event) {
            Ok(index) => index,
            Err(reason) => return Ok(self.discard(event.region_id, reason)),
        };

        if !self.commit_found(found_index, &event.region_id)? {
            let reason = DiscardReason::NotActiveRegion(event.region_id.clone());
            return Ok(self.discard(event.region_id, reason));
        }

        HuntEvent::LandmarkFound {
            index: found_index,
            region_id: event.region_id,
        }
        .emit();
        self.notifier
            .notify(NotificationKind::LandmarkFound(found_index));

        let next = self.activate_next().await?;
        Ok(TransitionOutcome::Advanced { found_index, next })
    }

    fn discard(&self, region_id: String, reason: DiscardReason) -> TransitionOutcome {
        HuntEvent::EventDiscarded {
            region_id,
            reason: reason.clone(),
        }
        .emit();
        TransitionOutcome::Discarded(reason)
    }

    fn validate_event(&self, event: &TransitionEvent) -> Result<usize, DiscardReason> {
        if event.had_error {
            return Err(DiscardReason::BackendReported {
                detail: event.error_detail.clone(),
            });
        }
        if event.transition_type != TransitionType::Enter {
            return Err(DiscardReason::NotEnter(event.transition_type));
        }

        let index = self
            .catalog
            .position_of(&event.region_id)
            .ok_or_else(|| DiscardReason::UnknownRegion(event.region_id.clone()))?;

        if !self.lock().state.is_active_region(index, &event.region_id) {
            return Err(DiscardReason::NotActiveRegion(event.region_id.clone()));
        }

        Ok(index)
    }

    /// Durably advance past `found_index`. Returns false if a concurrent
    /// duplicate already consumed the active region.
    fn commit_found(&self, found_index: usize, region_id: &str) -> HuntResult<bool> {
        let mut inner = self.lock();

        if !inner.state.is_active_region(found_index, region_id) {
            return Ok(false);
        }

        // Saved under the lock: a concurrent duplicate Enter must observe
        // either the old record and state or the new ones, never a mix.
        let next = inner.progress.advanced();
        self.store.save(&next)?;

        inner.progress = next;
        inner.state = std::mem::take(&mut inner.state).landmark_found()?;
        Ok(true)
    }

    // =========================================================================
    // TEARDOWN
    // =========================================================================

    /// Remove the active region, if any, and persist that nothing is active.
    ///
    /// An in-flight activation is superseded and cancels itself when its
    /// add completes; until then activation requests report `InFlight`.
    /// A failed remove is reported but the active region is
    /// still cleared; the next activation removes again before adding.
    pub async fn deactivate_all(&self) -> HuntResult<()> {
        let active = {
            let mut inner = self.lock();
            if inner.state.is_in_flight() {
                inner.state = std::mem::take(&mut inner.state).deactivate();
            }
            inner.progress.active_region_id.clone()
        };

        let Some(region_id) = active else {
            HuntEvent::Deactivated { region_id: None }.emit();
            return Ok(());
        };

        let removal = idempotent_remove(self.monitor.remove_region(&self.handle).await);
        match &removal {
            Ok(()) => self.notifier.notify(NotificationKind::RegionsRemoved),
            Err(_) => self.notifier.notify(NotificationKind::RegionsRemoveFailed),
        }

        {
            let mut inner = self.lock();
            if inner.progress.active_region_id.as_deref() == Some(region_id.as_str()) {
                // Same lock discipline as commit_activation.
                let cleared = inner.progress.cleared();
                self.store.save(&cleared)?;
                inner.progress = cleared;
                inner.state = std::mem::take(&mut inner.state).deactivate();
            }
        }

        HuntEvent::Deactivated {
            region_id: Some(region_id),
        }
        .emit();

        removal.map_err(|e| HuntError::backend("remove region", e))
    }
}
