//! In-process monitoring backend double
//!
//! Not a geofencing implementation. It holds at most one region per
//! handle, records every command in order, and turns simulated positions
//! into transition events. Adds can be held open to reproduce the
//! in-flight window between issuing an add and its completion.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::{mpsc, Semaphore};

use super::errors::{MonitorError, MonitorResult};
use super::event::{TransitionEvent, TransitionType};
use super::port::{RegionMonitorPort, TransitionReceiver, TransitionSender};
use super::request::{MonitoringRequest, PendingHandle};

/// A command as observed by the backend, in issue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorCommand {
    Remove(PendingHandle),
    Add(String),
}

#[derive(Debug)]
struct Registration {
    request: MonitoringRequest,
    inside: bool,
}

#[derive(Debug, Default)]
struct SimState {
    registered: HashMap<PendingHandle, Registration>,
    commands: Vec<MonitorCommand>,
    subscribers: Vec<TransitionSender>,
    position: Option<(f64, f64)>,
    fail_adds: bool,
    fail_removes: bool,
    add_gate: Option<Arc<Semaphore>>,
}

impl SimState {
    fn publish(&mut self, event: TransitionEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

/// Simulated region monitor.
#[derive(Debug, Default)]
pub struct SimulatedMonitor {
    state: Mutex<SimState>,
}

impl SimulatedMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SimState> {
        // Poisoning only happens if a test panicked mid-call; keep going.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make subsequent adds fail with `Unavailable`.
    pub fn set_fail_adds(&self, fail: bool) {
        self.lock().fail_adds = fail;
    }

    /// Make subsequent removes of a registered handle fail with `Unavailable`.
    pub fn set_fail_removes(&self, fail: bool) {
        self.lock().fail_removes = fail;
    }

    /// Hold every subsequent add open until `release_adds` is called.
    pub fn hold_adds(&self) {
        self.lock().add_gate = Some(Arc::new(Semaphore::new(0)));
    }

    /// Let `count` held adds complete.
    pub fn release_adds(&self, count: usize) {
        if let Some(gate) = self.lock().add_gate.as_ref() {
            gate.add_permits(count);
        }
    }

    /// Ordered log of every add and remove issued.
    pub fn commands(&self) -> Vec<MonitorCommand> {
        self.lock().commands.clone()
    }

    /// Region ids currently registered, across all handles.
    pub fn registered_regions(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .lock()
            .registered
            .values()
            .map(|r| r.request.region_id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Push an arbitrary event to subscribers, as a backend might for a
    /// stale or failed registration.
    pub fn inject(&self, event: TransitionEvent) {
        self.lock().publish(event);
    }

    /// Move the simulated device, emitting transitions for registered
    /// regions whose containment changed.
    pub fn move_to(&self, latitude: f64, longitude: f64) {
        let mut state = self.lock();
        state.position = Some((latitude, longitude));

        let mut events = Vec::new();
        for reg in state.registered.values_mut() {
            let now_inside = reg.request.contains(latitude, longitude);
            if now_inside == reg.inside {
                continue;
            }
            reg.inside = now_inside;

            let transition = if now_inside {
                TransitionType::Enter
            } else {
                TransitionType::Exit
            };
            if reg.request.triggers_on(transition) {
                events.push(TransitionEvent::new(reg.request.region_id.clone(), transition));
            }
        }

        for event in events {
            state.publish(event);
        }
    }
}

#[async_trait]
impl RegionMonitorPort for SimulatedMonitor {
    async fn add_region(&self, request: &MonitoringRequest) -> MonitorResult<()> {
        let gate = {
            let mut state = self.lock();
            state.commands.push(MonitorCommand::Add(request.region_id.clone()));
            state.add_gate.clone()
        };

        if let Some(gate) = gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|_| MonitorError::Unavailable("add gate closed".to_string()))?;
            permit.forget();
        }

        let mut state = self.lock();
        if state.fail_adds {
            return Err(MonitorError::Unavailable("simulated add failure".to_string()));
        }

        // Initial trigger: report Enter if the device already sits inside.
        let inside = state
            .position
            .map(|(lat, lon)| request.contains(lat, lon))
            .unwrap_or(false);

        state.registered.insert(
            request.handle.clone(),
            Registration {
                request: request.clone(),
                inside,
            },
        );

        if inside && request.triggers_on(TransitionType::Enter) {
            state.publish(TransitionEvent::enter(request.region_id.clone()));
        }

        Ok(())
    }

    async fn remove_region(&self, handle: &PendingHandle) -> MonitorResult<()> {
        let mut state = self.lock();
        state.commands.push(MonitorCommand::Remove(handle.clone()));

        if !state.registered.contains_key(handle) {
            return Err(MonitorError::NotRegistered(handle.to_string()));
        }
        if state.fail_removes {
            return Err(MonitorError::Unavailable("simulated remove failure".to_string()));
        }

        state.registered.remove(handle);
        Ok(())
    }

    fn subscribe(&self) -> TransitionReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().subscribers.push(tx);
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Landmark;

    fn request(id: &str, lat: f64, lon: f64) -> MonitoringRequest {
        MonitoringRequest::for_landmark(
            &PendingHandle::new("hunt"),
            &Landmark::new(id, lat, lon, 100.0),
        )
    }

    #[tokio::test]
    async fn test_add_replaces_under_same_handle() {
        let sim = SimulatedMonitor::new();

        sim.add_region(&request("a", 0.0, 0.0)).await.unwrap();
        sim.add_region(&request("b", 1.0, 1.0)).await.unwrap();

        assert_eq!(sim.registered_regions(), vec!["b".to_string()]);
    }

    #[tokio::test]
    async fn test_remove_unregistered_is_not_registered() {
        let sim = SimulatedMonitor::new();

        let result = sim.remove_region(&PendingHandle::new("hunt")).await;
        assert_eq!(result, Err(MonitorError::NotRegistered("hunt".to_string())));
        assert_eq!(
            sim.commands(),
            vec![MonitorCommand::Remove(PendingHandle::new("hunt"))]
        );
    }

    #[tokio::test]
    async fn test_move_emits_enter_once() {
        let sim = SimulatedMonitor::new();
        let mut rx = sim.subscribe();
        sim.add_region(&request("a", 10.0, 10.0)).await.unwrap();

        sim.move_to(0.0, 0.0);
        sim.move_to(10.0, 10.0);
        sim.move_to(10.0001, 10.0);
        // Exit is not a requested trigger
        sim.move_to(0.0, 0.0);

        assert_eq!(rx.recv().await.unwrap(), TransitionEvent::enter("a"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_initial_trigger_when_already_inside() {
        let sim = SimulatedMonitor::new();
        let mut rx = sim.subscribe();
        sim.move_to(5.0, 5.0);

        sim.add_region(&request("a", 5.0, 5.0)).await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), TransitionEvent::enter("a"));
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let sim = SimulatedMonitor::new();
        sim.set_fail_adds(true);
        assert!(matches!(
            sim.add_region(&request("a", 0.0, 0.0)).await,
            Err(MonitorError::Unavailable(_))
        ));
        assert!(sim.registered_regions().is_empty());

        sim.set_fail_adds(false);
        sim.add_region(&request("a", 0.0, 0.0)).await.unwrap();
        sim.set_fail_removes(true);
        assert!(matches!(
            sim.remove_region(&PendingHandle::new("hunt")).await,
            Err(MonitorError::Unavailable(_))
        ));
        assert_eq!(sim.registered_regions(), vec!["a".to_string()]);
    }
}
