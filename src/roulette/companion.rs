use std::sync::{Arc, Mutex, MutexGuard};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use crate::models::companion::{Companion, CompanionPool, RevealFrame};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RevealVariant {
    /// Full passes over a freshly shuffled pool
    Shuffled,
    /// Walks the pool in order from a random offset, sized by a wall-clock budget
    Sequential,
}

#[derive(Clone, Debug)]
pub struct RevealTiming {
    pub variant: RevealVariant,
    pub tick: Duration,
    pub rounds: usize,
    pub min_spin: Duration,
    pub spin_budget: Duration,
    pub near_miss: bool,
    pub fake_hold: Duration,
    pub final_hold: Duration,
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self {
            variant: RevealVariant::Shuffled,
            tick: Duration::from_millis(80),
            rounds: 3,
            min_spin: Duration::from_millis(2000),
            spin_budget: Duration::from_millis(3000),
            near_miss: true,
            fake_hold: Duration::from_millis(1200),
            final_hold: Duration::from_millis(1500),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RevealStep {
    pub frame: RevealFrame,
    pub hold: Duration,
}

/// Builds the full reveal sequence up front. Only the intermediate frames
/// depend on `rng`; the last step always shows the first pool entry.
pub fn plan_reveal<R: Rng + ?Sized>(
    pool: &CompanionPool,
    timing: &RevealTiming,
    rng: &mut R,
) -> Vec<RevealStep> {
    let companions = pool.as_slice();
    let len = companions.len();
    let tick = timing.tick.max(Duration::from_millis(1));
    let tick_ms = tick.as_millis();

    let floor_ticks = timing.min_spin.as_millis().div_ceil(tick_ms) as usize;
    let wanted_ticks = match timing.variant {
        RevealVariant::Shuffled => timing.rounds.max(1) * len,
        RevealVariant::Sequential => (timing.spin_budget.as_millis() / tick_ms) as usize,
    };
    let spin_ticks = wanted_ticks.max(floor_ticks).max(1);

    let order: Vec<usize> = match timing.variant {
        RevealVariant::Shuffled => {
            let mut order = Vec::with_capacity(spin_ticks + len);
            while order.len() < spin_ticks {
                let mut pass: Vec<usize> = (0..len).collect();
                pass.shuffle(rng);
                order.extend(pass);
            }
            order.truncate(spin_ticks);
            order
        }
        RevealVariant::Sequential => {
            let start = rng.gen_range(0..len);
            (0..spin_ticks).map(|i| (start + i) % len).collect()
        }
    };

    let mut steps: Vec<RevealStep> = order
        .into_iter()
        .map(|i| RevealStep {
            frame: RevealFrame::spinning(&companions[i]),
            hold: tick,
        })
        .collect();

    if timing.near_miss {
        if let Some(decoy) = pool.runners_up().choose(rng) {
            steps.push(RevealStep {
                frame: RevealFrame::fake_reveal(decoy),
                hold: timing.fake_hold,
            });
        }
    }

    steps.push(RevealStep {
        frame: RevealFrame::final_reveal(pool.final_companion()),
        hold: timing.final_hold,
    });

    steps
}

struct LiveReveal {
    run_id: u64,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl LiveReveal {
    fn stop(self) {
        self.cancel.cancel();
        self.task.abort();
    }
}

/// Runs the companion reveal as a single cancellable background task.
///
/// Starting a new reveal always stops the previous one first, so at most one
/// timer loop is alive and a superseded receiver never yields a companion.
pub struct CompanionReveal {
    pool: CompanionPool,
    timing: RevealTiming,
    frames: Arc<watch::Sender<RevealFrame>>,
    live: Arc<Mutex<Option<LiveReveal>>>,
    next_run: AtomicU64,
}

impl CompanionReveal {
    pub fn new(pool: CompanionPool, timing: RevealTiming) -> Self {
        let (frames, _) = watch::channel(RevealFrame::idle());
        Self {
            pool,
            timing,
            frames: Arc::new(frames),
            live: Arc::new(Mutex::new(None)),
            next_run: AtomicU64::new(1),
        }
    }

    pub fn pool(&self) -> &CompanionPool {
        &self.pool
    }

    /// Starts a new reveal with cosmetic randomness from the thread rng.
    pub fn start(&self) -> oneshot::Receiver<Companion> {
        let plan = plan_reveal(&self.pool, &self.timing, &mut rand::thread_rng());
        self.start_with_plan(plan)
    }

    pub fn start_with_plan(&self, plan: Vec<RevealStep>) -> oneshot::Receiver<Companion> {
        let mut live = lock(&self.live);
        if let Some(previous) = live.take() {
            debug!("Stopping companion reveal run {} before starting a new one", previous.run_id);
            previous.stop();
        }
        self.frames.send_replace(RevealFrame::idle());

        let run_id = self.next_run.fetch_add(1, Ordering::Relaxed);
        let (result_tx, result_rx) = oneshot::channel();
        let cancel = CancellationToken::new();
        let winner = self.pool.final_companion().clone();

        let token = cancel.clone();
        let frames = Arc::clone(&self.frames);
        let live_slot = Arc::clone(&self.live);
        let task = tokio::spawn(async move {
            for step in plan {
                if token.is_cancelled() {
                    return;
                }
                frames.send_replace(step.frame);
                tokio::select! {
                    _ = token.cancelled() => return,
                    _ = tokio::time::sleep(step.hold) => {}
                }
            }

            {
                let mut live = lock(&live_slot);
                if live.as_ref().map(|l| l.run_id) != Some(run_id) {
                    return;
                }
                live.take();
            }
            info!("Companion reveal run {} decided on {}", run_id, winner.name);
            let _ = result_tx.send(winner);
        });

        *live = Some(LiveReveal { run_id, cancel, task });
        result_rx
    }

    /// Stops the live reveal, if any, and resets the display. Safe to call repeatedly.
    pub fn cancel(&self) {
        if let Some(previous) = lock(&self.live).take() {
            debug!("Cancelled companion reveal run {}", previous.run_id);
            previous.stop();
        }
        self.frames.send_replace(RevealFrame::idle());
    }

    pub fn is_live(&self) -> bool {
        lock(&self.live).is_some()
    }

    pub fn current_frame(&self) -> RevealFrame {
        self.frames.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<RevealFrame> {
        self.frames.subscribe()
    }
}

impl Drop for CompanionReveal {
    fn drop(&mut self) {
        if let Some(previous) = lock(&self.live).take() {
            previous.stop();
        }
    }
}

fn lock(live: &Mutex<Option<LiveReveal>>) -> MutexGuard<'_, Option<LiveReveal>> {
    live.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
