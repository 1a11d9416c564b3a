use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::notify::{NotificationPermission, Notifier};

use super::machine::{Tick, TimerMachine, TimerState};

/// (recipe id, ingredient id): timers are independent per ingredient.
pub type TimerKey = (Uuid, Uuid);

#[derive(Debug, Clone, Copy)]
pub struct TimerSnapshot {
    pub state: TimerState,
    pub remaining_secs: u64,
    pub duration_secs: u64,
}

fn snapshot(machine: &TimerMachine) -> TimerSnapshot {
    TimerSnapshot {
        state: machine.state(),
        remaining_secs: machine.remaining_secs(),
        duration_secs: machine.duration_secs(),
    }
}

struct TimerEntry {
    machine: Arc<Mutex<TimerMachine>>,
    /// Live handle to the 1 Hz wake-up. Must be aborted on pause/reset and
    /// when the owning recipe is mutated, so no stale tick can fire against
    /// replaced state.
    ticker: Option<JoinHandle<()>>,
}

impl TimerEntry {
    fn stop_ticker(&mut self) {
        if let Some(task) = self.ticker.take() {
            task.abort();
        }
    }
}

/// Owns every live countdown. Machines hold the state; this registry holds
/// the tick tasks and the lazy permission handshake.
#[derive(Default)]
pub struct TimerRegistry {
    timers: Mutex<HashMap<TimerKey, TimerEntry>>,
    permission_requested: AtomicBool,
}

impl TimerRegistry {
    /// Start (or resume) the countdown for one ingredient. Any previous tick
    /// task for the slot is aborted before a fresh one is spawned.
    pub async fn start(
        &self,
        key: TimerKey,
        duration_secs: u64,
        ingredient_name: &str,
        alerts_enabled: bool,
        notifier: Arc<dyn Notifier>,
    ) -> TimerSnapshot {
        // The permission handshake happens once, on the first start overall.
        if !self.permission_requested.swap(true, Ordering::SeqCst)
            && notifier.permission() == NotificationPermission::Unset
        {
            notifier.request_permission().await;
        }

        let mut timers = self.timers.lock().await;
        let entry = timers.entry(key).or_insert_with(|| TimerEntry {
            machine: Arc::new(Mutex::new(TimerMachine::new(duration_secs))),
            ticker: None,
        });
        entry.stop_ticker();

        let machine = entry.machine.clone();
        machine.lock().await.start();

        let name = ingredient_name.to_string();
        let tick_machine = machine.clone();
        entry.ticker = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            // First tick completes immediately; the countdown advances one
            // second after start.
            interval.tick().await;
            loop {
                interval.tick().await;
                let outcome = tick_machine.lock().await.tick();
                match outcome {
                    Tick::Advanced => {}
                    Tick::Expired => {
                        if alerts_enabled {
                            notifier.success(&format!("{name} is ready!")).await;
                        }
                        break;
                    }
                    Tick::Ignored => break,
                }
            }
        }));

        let snap = snapshot(&*machine.lock().await);
        snap
    }

    /// Freeze the countdown and release its tick task.
    pub async fn pause(&self, key: TimerKey) -> Option<TimerSnapshot> {
        let mut timers = self.timers.lock().await;
        let entry = timers.get_mut(&key)?;
        entry.stop_ticker();
        let mut machine = entry.machine.lock().await;
        machine.pause();
        Some(snapshot(&machine))
    }

    /// Back to Idle at the full duration; the tick task is released.
    pub async fn reset(&self, key: TimerKey) -> Option<TimerSnapshot> {
        let mut timers = self.timers.lock().await;
        let entry = timers.get_mut(&key)?;
        entry.stop_ticker();
        let mut machine = entry.machine.lock().await;
        machine.reset();
        Some(snapshot(&machine))
    }

    pub async fn status(&self, key: TimerKey) -> Option<TimerSnapshot> {
        let timers = self.timers.lock().await;
        let entry = timers.get(&key)?;
        let snap = snapshot(&*entry.machine.lock().await);
        Some(snap)
    }

    /// Cancel and drop every timer belonging to a recipe. Called when the
    /// recipe is deleted or its ingredients are replaced by an edit.
    pub async fn cancel_for_recipe(&self, recipe_id: Uuid) {
        let mut timers = self.timers.lock().await;
        timers.retain(|(owner, _), entry| {
            if *owner == recipe_id {
                entry.stop_ticker();
                false
            } else {
                true
            }
        });
    }
}
