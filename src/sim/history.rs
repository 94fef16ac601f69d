use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::debug;

use crate::dynamics::state::{State, THETA, X, Y};
use crate::error::Result;

/// Pose sample recorded once per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time: f64,
    pub x: f64,
    pub y: f64,
    pub theta: f64,
}

/// Pose history owned by the simulation.
///
/// Unbounded by default. With a limit, reaching it drops every other sample
/// and halves the recording rate, so the whole run stays covered at a
/// coarser resolution.
#[derive(Debug, Clone)]
pub struct TrajectoryHistory {
    samples: Vec<Sample>,
    limit: Option<usize>,
    stride: usize,
    pushed: usize,
}

impl Default for TrajectoryHistory {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl TrajectoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
            limit: None,
            stride: 1,
            pushed: 0,
        }
    }

    /// Bound the number of stored samples; values below 2 are raised to 2.
    pub fn set_limit(&mut self, limit: usize) {
        let limit = limit.max(2);
        self.limit = Some(limit);
        while self.samples.len() >= limit {
            self.compact();
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Ticks per stored sample; grows by 2x on every compaction.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn push(&mut self, time: f64, state: &State) {
        let index = self.pushed;
        self.pushed += 1;
        if index % self.stride != 0 {
            return;
        }
        self.samples.push(Sample {
            time,
            x: state[X],
            y: state[Y],
            theta: state[THETA],
        });
        if self.limit.is_some_and(|limit| self.samples.len() >= limit) {
            self.compact();
        }
    }

    fn compact(&mut self) {
        let mut index = 0;
        self.samples.retain(|_| {
            let keep = index % 2 == 0;
            index += 1;
            keep
        });
        self.stride *= 2;
        debug!(
            "History compacted to {} samples, recording every {} ticks",
            self.samples.len(),
            self.stride
        );
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.stride = 1;
        self.pushed = 0;
    }

    /// Copy the history into an immutable snapshot that can cross threads.
    pub fn snapshot(&self) -> TrajectorySnapshot {
        TrajectorySnapshot {
            samples: Arc::from(self.samples.as_slice()),
        }
    }
}

/// Frozen copy of a [`TrajectoryHistory`]; later ticks never touch it.
#[derive(Debug, Clone)]
pub struct TrajectorySnapshot {
    samples: Arc<[Sample]>,
}

impl TrajectorySnapshot {
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn xy(&self) -> Vec<[f64; 2]> {
        self.samples.iter().map(|s| [s.x, s.y]).collect()
    }

    pub fn theta_over_time(&self) -> Vec<[f64; 2]> {
        self.samples.iter().map(|s| [s.time, s.theta]).collect()
    }

    /// Every n-th sample, keeping the last one, so the result has at most
    /// about `max_points` entries.
    pub fn decimated(&self, max_points: usize) -> Vec<Sample> {
        let step = (self.samples.len() / max_points.max(1)).max(1);
        let mut out: Vec<Sample> = self.samples.iter().step_by(step).copied().collect();
        if let (Some(last), Some(kept)) = (self.samples.last(), out.last()) {
            if last != kept {
                out.push(*last);
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Background plot worker
// ---------------------------------------------------------------------------

/// Runs a plotting job on its own thread.
///
/// Snapshots go in over a channel, results come back over another. At most
/// one job is in flight; [`PlotWorker::poll`] never blocks. Dropping the
/// worker closes the request channel and waits for the current job.
pub struct PlotWorker<T> {
    requests: Option<Sender<TrajectorySnapshot>>,
    results: Receiver<T>,
    handle: Option<JoinHandle<()>>,
    in_flight: bool,
}

impl<T: Send + 'static> PlotWorker<T> {
    pub fn spawn<F>(mut job: F) -> Result<Self>
    where
        F: FnMut(&TrajectorySnapshot) -> T + Send + 'static,
    {
        let (request_tx, request_rx) = mpsc::channel::<TrajectorySnapshot>();
        let (result_tx, result_rx) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("plot-worker".into())
            .spawn(move || {
                for snapshot in request_rx {
                    debug!("Plotting {} samples", snapshot.len());
                    if result_tx.send(job(&snapshot)).is_err() {
                        break;
                    }
                }
            })?;

        Ok(Self {
            requests: Some(request_tx),
            results: result_rx,
            handle: Some(handle),
            in_flight: false,
        })
    }

    /// Hand a snapshot to the worker. Returns `false` if a job is already
    /// running or the worker has stopped.
    pub fn request(&mut self, snapshot: TrajectorySnapshot) -> bool {
        if self.in_flight {
            return false;
        }
        let sent = self
            .requests
            .as_ref()
            .is_some_and(|tx| tx.send(snapshot).is_ok());
        self.in_flight = sent;
        sent
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    /// Result of the finished job, if any.
    pub fn poll(&mut self) -> Option<T> {
        match self.results.try_recv() {
            Ok(result) => {
                self.in_flight = false;
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.in_flight = false;
                None
            }
        }
    }
}

impl<T> Drop for PlotWorker<T> {
    fn drop(&mut self) {
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
