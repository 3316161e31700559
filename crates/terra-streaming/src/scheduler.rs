//! Frame-side handle and worker thread for streaming cycles.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use glam::Vec3;
use terra_config::Config;
use terra_elevation::ElevationSource;
use terra_mesh::RenderAttachment;
use terra_tiles::TileCoord;
use tracing::{debug, error, info, warn};

use crate::cycle::{CycleReport, TerrainState, run_cycle};
use crate::error::StreamingError;
use crate::status::{CycleStatus, StatusCell};

struct CycleJob {
    state: TerrainState,
    observer: TileCoord,
}

struct CycleResult {
    state: TerrainState,
    report: CycleReport,
}

/// What one [`StreamingTerrain::update`] call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// No cycle running and the observer is still in the last cell.
    Unchanged,
    /// A cycle was handed to the worker for this cell.
    Triggered(TileCoord),
    /// A cycle is still running.
    Busy,
    /// A finished cycle's composites were attached.
    Attached { composites: usize },
}

/// Streams terrain around a moving observer, one background cycle at a time.
///
/// The terrain state lives either here (between cycles) or with the worker
/// (during one). Triggers arriving while a cycle runs are dropped; the next
/// idle frame compares against the last triggered cell again.
pub struct StreamingTerrain {
    status: Arc<StatusCell>,
    stop: Arc<AtomicBool>,
    job_sender: Option<Sender<CycleJob>>,
    result_receiver: Receiver<CycleResult>,
    worker: Option<JoinHandle<()>>,
    state: Option<TerrainState>,
    last_cell: Option<TileCoord>,
    last_report: Option<CycleReport>,
    tile_size: f32,
    cycles_started: u64,
    cycles_completed: u64,
}

impl StreamingTerrain {
    /// Validate `config`, initialise `source` with its seed and world size,
    /// and start the worker thread.
    pub fn new(config: &Config, mut source: Box<dyn ElevationSource>) -> Result<Self, StreamingError> {
        config.validate()?;
        let terrain = &config.terrain;
        source.init(terrain.seed, terrain.world_size);
        let state = TerrainState::new(terrain, source);

        let status = Arc::new(StatusCell::new(CycleStatus::Idle));
        let stop = Arc::new(AtomicBool::new(false));
        let (job_sender, job_receiver) = crossbeam_channel::bounded::<CycleJob>(1);
        let (result_sender, result_receiver) = crossbeam_channel::bounded::<CycleResult>(1);
        let poll = Duration::from_millis(config.streaming.idle_poll_ms.max(1));

        let worker = {
            let status = Arc::clone(&status);
            let stop = Arc::clone(&stop);
            std::thread::Builder::new()
                .name("terrain-streamer".into())
                .spawn(move || worker_loop(job_receiver, result_sender, &status, &stop, poll))
                .map_err(StreamingError::Spawn)?
        };

        info!(
            tiles = terrain.tile_count,
            resolution = terrain.tile_resolution,
            rings = terrain.lod_count(),
            "terrain streamer started"
        );

        Ok(Self {
            status,
            stop,
            job_sender: Some(job_sender),
            result_receiver,
            worker: Some(worker),
            state: Some(state),
            last_cell: None,
            last_report: None,
            tile_size: terrain.tile_size(),
            cycles_started: 0,
            cycles_completed: 0,
        })
    }

    /// Advance the streamer by one frame for an observer at `observer`
    /// (world space). Finished composites are handed to `attachment`.
    pub fn update(&mut self, observer: Vec3, attachment: &mut impl RenderAttachment) -> FrameOutcome {
        match self.status.load() {
            CycleStatus::Idle => self.try_trigger(TileCoord::containing(observer, self.tile_size)),
            CycleStatus::Updating => FrameOutcome::Busy,
            CycleStatus::Finished => self.attach_finished(attachment),
        }
    }

    fn try_trigger(&mut self, cell: TileCoord) -> FrameOutcome {
        if self.last_cell == Some(cell) {
            return FrameOutcome::Unchanged;
        }
        let Some(sender) = self.job_sender.as_ref() else {
            return FrameOutcome::Unchanged;
        };
        let Some(state) = self.state.take() else {
            return FrameOutcome::Unchanged;
        };

        self.status.store(CycleStatus::Updating);
        if let Err(err) = sender.send(CycleJob {
            state,
            observer: cell,
        }) {
            warn!(%cell, "terrain worker is gone, cycle not started");
            self.state = Some(err.into_inner().state);
            self.status.store(CycleStatus::Idle);
            return FrameOutcome::Unchanged;
        }

        debug!(%cell, "observer entered new tile, cycle started");
        self.last_cell = Some(cell);
        self.cycles_started += 1;
        FrameOutcome::Triggered(cell)
    }

    fn attach_finished(&mut self, attachment: &mut impl RenderAttachment) -> FrameOutcome {
        // The worker sends before flagging Finished, so the result is waiting.
        let Ok(CycleResult { state, report }) = self.result_receiver.try_recv() else {
            return FrameOutcome::Busy;
        };

        for composite in state.composites() {
            attachment.attach(composite);
        }
        let composites = state.composites().len();

        self.state = Some(state);
        self.last_report = Some(report);
        self.cycles_completed += 1;
        let previous = self.status.swap(CycleStatus::Idle);
        debug_assert_eq!(previous, CycleStatus::Finished);
        FrameOutcome::Attached { composites }
    }

    pub fn status(&self) -> CycleStatus {
        self.status.load()
    }

    /// The terrain state, while no cycle is running.
    pub fn state(&self) -> Option<&TerrainState> {
        self.state.as_ref()
    }

    /// The report of the most recently attached cycle.
    pub fn last_report(&self) -> Option<&CycleReport> {
        self.last_report.as_ref()
    }

    /// The tile cell of the most recent trigger.
    pub fn observer_cell(&self) -> Option<TileCoord> {
        self.last_cell
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    pub fn cycles_started(&self) -> u64 {
        self.cycles_started
    }

    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }

    /// Stop the worker and wait for it. A cycle already running completes
    /// first; its result is discarded.
    pub fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Release);
        self.job_sender.take();
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                error!("terrain worker panicked");
            }
            info!(
                started = self.cycles_started,
                completed = self.cycles_completed,
                "terrain streamer stopped"
            );
        }
    }
}

impl Drop for StreamingTerrain {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(
    jobs: Receiver<CycleJob>,
    results: Sender<CycleResult>,
    status: &StatusCell,
    stop: &AtomicBool,
    poll: Duration,
) {
    while !stop.load(Ordering::Acquire) {
        let CycleJob { mut state, observer } = match jobs.recv_timeout(poll) {
            Ok(job) => job,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        };

        let report = run_cycle(&mut state, observer);
        if results.send(CycleResult { state, report }).is_err() {
            break;
        }
        status.store(CycleStatus::Finished);
    }
}
