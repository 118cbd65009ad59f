//! Acquisition scheduler: the owner of the polling cadence and the only
//! writer of pipeline state.
//!
//! A single tokio task drives a two-state machine:
//! - **Idle**: a 1-second ticker decrements the countdown and republishes
//!   the current snapshot with the updated `cycleState`.
//! - **Analyzing**: when the countdown reaches zero (and once immediately
//!   at start), the task awaits the simulated acquisition latency, then
//!   runs generate -> validate -> history append -> score -> grid sample
//!   and publishes the result as one atomic snapshot.
//!
//! The countdown is frozen while a cycle is in flight; the cycle is awaited
//! inline by the same task, so overlapping cycles are impossible by
//! construction. Publication goes through a `tokio::sync::watch` channel:
//! readers only ever observe complete snapshots, never a half-updated one.
//! A shutdown flag is re-checked after the latency await so that a cycle
//! in flight when `stop` is called discards its result instead of
//! publishing into a torn-down session.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Local;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::generator::ReadingGenerator;
use crate::history::{self, MetricHistory};
use crate::models::{
    CycleState, FeedStatus, Reading, Regime, RiskAssessment, RiskTier, Snapshot, TelemetrySample,
};
use crate::risk;
use crate::satellite::{GridSampler, SiteCoordinates};
use crate::Config;

// ---

/// Result of the last successfully applied cycle, retained so a rejected
/// acquisition can republish prior state instead of garbage.
struct CycleResult {
    // ---
    reading: Reading,
    assessment: RiskAssessment,
    samples: Vec<TelemetrySample>,
}

/// The pipeline stages plus the only cross-cycle state (rolling history),
/// owned by the scheduler task for the lifetime of one session.
struct Pipeline {
    // ---
    generator: ReadingGenerator,
    sampler: GridSampler,
    history: MetricHistory,
    last: Option<CycleResult>,
}

impl Pipeline {
    fn new(config: &Config) -> Self {
        // ---
        let mut generator = ReadingGenerator::new(config.severe_probability, config.rng_seed);

        let history = MetricHistory::seeded(
            config.history_capacity,
            config.cycle_length_secs,
            generator.rng_mut(),
        );

        let site = SiteCoordinates {
            latitude: config.site_latitude,
            longitude: config.site_longitude,
        };
        let sampler = GridSampler::new(
            site,
            config.grid_batch_size,
            config.rng_seed.map(|seed| seed.wrapping_add(1)),
        );

        Self {
            generator,
            sampler,
            history,
            last: None,
        }
    }

    /// One full acquisition pass: generate a reading and fold it in.
    fn run_cycle(&mut self, cycle_state: CycleState) -> Snapshot {
        // ---
        let (regime, reading) = self.generator.generate();
        self.apply(regime, reading, cycle_state)
    }

    /// Fold an acquired reading into pipeline state.
    ///
    /// A reading that fails boundary validation never reaches the history
    /// buffer or the scorer: the prior results are republished with the
    /// feed marked degraded, and the next cycle retries.
    fn apply(&mut self, regime: Regime, reading: Reading, cycle_state: CycleState) -> Snapshot {
        // ---
        let feed = match reading.validate() {
            Ok(()) => {
                self.history.record(&reading, history::clock_stamp(0));

                let assessment = risk::score(&reading);
                let grid_stamp = Local::now().format("%H:%M").to_string();
                let samples = self.sampler.sample(regime, &grid_stamp);

                self.last = Some(CycleResult {
                    reading,
                    assessment,
                    samples,
                });
                FeedStatus::Live
            }
            Err(e) => {
                warn!("Rejected reading at acquisition boundary: {}", e);
                FeedStatus::Degraded
            }
        };

        let (reading, assessment, samples) = match &self.last {
            Some(last) => (last.reading.clone(), last.assessment, last.samples.clone()),
            None => (
                Reading::default(),
                RiskAssessment {
                    score: 0,
                    tier: RiskTier::Low,
                },
                Vec::new(),
            ),
        };

        Snapshot {
            reading,
            history: self.history.windows(),
            assessment,
            telemetry_samples: samples,
            cycle_state,
            feed,
        }
    }
}

// ---

/// Owns the scheduler task and the published-state channel.
///
/// `start` and `stop` bracket one session; downstream consumers hold
/// [`watch::Receiver`]s obtained from [`AcquisitionScheduler::subscribe`]
/// and re-render on change.
pub struct AcquisitionScheduler {
    // ---
    config: Config,
    snapshot_tx: watch::Sender<Option<Snapshot>>,
    shutdown_tx: watch::Sender<bool>,
    cycles: Arc<AtomicU64>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl AcquisitionScheduler {
    pub fn new(config: Config) -> Self {
        // ---
        let (snapshot_tx, _) = watch::channel(None);
        let (shutdown_tx, _) = watch::channel(false);

        Self {
            config,
            snapshot_tx,
            shutdown_tx,
            cycles: Arc::new(AtomicU64::new(0)),
            task: Mutex::new(None),
        }
    }

    /// Observe published snapshots. The receiver starts at the current
    /// value: `None` until the first cycle of a session completes.
    pub fn subscribe(&self) -> watch::Receiver<Option<Snapshot>> {
        self.snapshot_tx.subscribe()
    }

    /// Begin the acquisition loop. Idempotent: a no-op while already
    /// running, and a no-op when the session is not active.
    pub fn start(&self, session_active: bool) {
        // ---
        if !session_active {
            debug!("Session inactive, scheduler left stopped");
            return;
        }

        let mut task = self.task.lock().unwrap();
        if task.as_ref().is_some_and(|handle| !handle.is_finished()) {
            debug!("Scheduler already running, start request ignored");
            return;
        }

        self.shutdown_tx.send_replace(false);

        let pipeline = Pipeline::new(&self.config);
        let cycle_secs = self.config.cycle_length_secs;
        let latency = Duration::from_millis(self.config.acquisition_latency_ms);

        info!(
            "Acquisition scheduler started: cycle {}s, latency {}ms, history {} points",
            cycle_secs, self.config.acquisition_latency_ms, self.config.history_capacity
        );

        *task = Some(tokio::spawn(run(
            pipeline,
            cycle_secs,
            latency,
            self.snapshot_tx.clone(),
            self.shutdown_tx.subscribe(),
            Arc::clone(&self.cycles),
        )));
    }

    /// Halt the scheduler and cancel any in-flight cycle's downstream
    /// effects. When this returns, no further snapshot will be published
    /// and the session state has been cleared.
    pub async fn stop(&self) {
        // ---
        let handle = self.task.lock().unwrap().take();
        let Some(handle) = handle else {
            debug!("Stop requested but scheduler is not running");
            return;
        };

        self.shutdown_tx.send_replace(true);
        if let Err(e) = handle.await {
            warn!("Scheduler task ended abnormally: {}", e);
        }

        // Session state does not outlive the scheduler
        self.snapshot_tx.send_replace(None);
        info!("Acquisition scheduler stopped");
    }

    pub fn is_running(&self) -> bool {
        // ---
        self.task
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Completed-cycle count across the scheduler's lifetime.
    pub fn cycles_completed(&self) -> u64 {
        self.cycles.load(Ordering::Relaxed)
    }
}

// ---

async fn run(
    mut pipeline: Pipeline,
    cycle_secs: u32,
    latency: Duration,
    snapshot_tx: watch::Sender<Option<Snapshot>>,
    mut shutdown_rx: watch::Receiver<bool>,
    cycles: Arc<AtomicU64>,
) {
    // ---
    // First cycle fires immediately; it does not wait out a full countdown
    if !run_cycle(
        &mut pipeline,
        cycle_secs,
        latency,
        &snapshot_tx,
        &mut shutdown_rx,
        &cycles,
    )
    .await
    {
        return;
    }

    let mut seconds_left = cycle_secs;
    let second = Duration::from_secs(1);
    let mut ticker = time::interval_at(Instant::now() + second, second);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => {
                debug!("Scheduler shutting down");
                return;
            }
            _ = ticker.tick() => {
                if seconds_left <= 1 {
                    let completed = run_cycle(
                        &mut pipeline,
                        cycle_secs,
                        latency,
                        &snapshot_tx,
                        &mut shutdown_rx,
                        &cycles,
                    )
                    .await;
                    if !completed {
                        return;
                    }
                    seconds_left = cycle_secs;
                    // Countdown resumes a full second after the cycle ends
                    ticker.reset();
                } else {
                    seconds_left -= 1;
                    publish_tick(&snapshot_tx, seconds_left);
                }
            }
        }
    }
}

/// Run one acquisition cycle. Returns false if shutdown interrupted the
/// cycle, in which case nothing was published.
async fn run_cycle(
    pipeline: &mut Pipeline,
    cycle_secs: u32,
    latency: Duration,
    snapshot_tx: &watch::Sender<Option<Snapshot>>,
    shutdown_rx: &mut watch::Receiver<bool>,
    cycles: &AtomicU64,
) -> bool {
    // ---
    debug!("Acquisition cycle starting");
    snapshot_tx.send_modify(|current| {
        if let Some(snapshot) = current {
            snapshot.cycle_state.is_analyzing = true;
            snapshot.cycle_state.seconds_until_next_cycle = 0;
        }
    });

    // Simulated feed latency; a stop() mid-flight discards the cycle
    tokio::select! {
        _ = time::sleep(latency) => {}
        _ = shutdown_rx.changed() => {
            debug!("Cycle cancelled during acquisition");
            return false;
        }
    }
    if *shutdown_rx.borrow() {
        debug!("Cycle result discarded after shutdown");
        return false;
    }

    let snapshot = pipeline.run_cycle(CycleState {
        is_analyzing: false,
        seconds_until_next_cycle: cycle_secs,
    });

    let count = cycles.fetch_add(1, Ordering::Relaxed) + 1;
    info!(
        "Cycle {} complete: score {} ({:?} tier, {:?} feed), {} grid rows",
        count,
        snapshot.assessment.score,
        snapshot.assessment.tier,
        snapshot.feed,
        snapshot.telemetry_samples.len()
    );

    snapshot_tx.send_replace(Some(snapshot));
    true
}

fn publish_tick(snapshot_tx: &watch::Sender<Option<Snapshot>>, seconds_left: u32) {
    // ---
    snapshot_tx.send_modify(|current| {
        if let Some(snapshot) = current {
            snapshot.cycle_state.is_analyzing = false;
            snapshot.cycle_state.seconds_until_next_cycle = seconds_left;
        }
    });
}
