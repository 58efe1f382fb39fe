//! Fixed-rate simulation thread
//!
//! The game, pending input and latest snapshot sit behind one mutex. The
//! thread steps the game at `tick_rate` Hz using an accumulator; callers
//! queue shots and read snapshots from any thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use glam::Vec3;

use crate::consts::MAX_SUBSTEPS;
use crate::settings::Settings;
use crate::sim::game::EventQueue;
use crate::sim::{Game, GameEvent, Snapshot, TickInput, step};

/// Longest frame the accumulator will catch up on
const MAX_FRAME_TIME: f32 = 0.1;

struct Shared {
    game: Game,
    pending: TickInput,
    snapshot: Snapshot,
    events: EventQueue,
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle to a running simulation thread
pub struct SimulationHandle {
    shared: Arc<Mutex<Shared>>,
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl SimulationHandle {
    /// Start stepping `game` on a dedicated thread
    pub fn spawn(game: Game, settings: Settings) -> Self {
        let snapshot = game.snapshot(&settings.debug);
        let shared = Arc::new(Mutex::new(Shared {
            game,
            pending: TickInput::default(),
            snapshot,
            events: EventQueue::default(),
        }));
        let running = Arc::new(AtomicBool::new(true));

        let thread = {
            let shared = Arc::clone(&shared);
            let running = Arc::clone(&running);
            thread::spawn(move || run(&shared, &running, &settings))
        };
        log::info!("Simulation thread started");

        Self {
            shared,
            running,
            thread: Some(thread),
        }
    }

    /// Queue a shot for the next tick
    pub fn shoot(&self, velocity: Vec3) {
        lock(&self.shared).pending.shot = Some(velocity);
    }

    /// Latest snapshot taken at a tick boundary
    pub fn snapshot(&self) -> Snapshot {
        lock(&self.shared).snapshot.clone()
    }

    /// Take all events reported since the last call
    ///
    /// Undrained events are capped at `MAX_PENDING_EVENTS`, oldest dropped first.
    pub fn drain_events(&self) -> Vec<GameEvent> {
        lock(&self.shared).events.drain()
    }

    /// Run `f` against the game under the lock
    pub fn with_game<R>(&self, f: impl FnOnce(&Game) -> R) -> R {
        f(&lock(&self.shared).game)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stop the thread and wait for it to exit
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("Simulation thread panicked");
            }
            log::info!("Simulation thread stopped");
        }
    }
}

impl Drop for SimulationHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run(shared: &Mutex<Shared>, running: &AtomicBool, settings: &Settings) {
    let dt = settings.physics.delta_time();
    let period = Duration::from_secs_f32(dt);
    let mut accumulator = 0.0;
    let mut last = Instant::now();

    while running.load(Ordering::Acquire) {
        let now = Instant::now();
        accumulator += now.duration_since(last).as_secs_f32().min(MAX_FRAME_TIME);
        last = now;

        let mut substeps = 0;
        while accumulator >= dt && substeps < MAX_SUBSTEPS {
            let mut guard = lock(shared);
            let state = &mut *guard;
            let input = std::mem::take(&mut state.pending);
            step(&mut state.game, &input, &settings.physics, dt);
            state.events.extend(state.game.drain_events());
            state.snapshot = state.game.snapshot(&settings.debug);
            drop(guard);

            accumulator -= dt;
            substeps += 1;
        }

        thread::sleep(period.saturating_sub(now.elapsed()));
    }
}
