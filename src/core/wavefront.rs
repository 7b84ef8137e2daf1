// Copyright @yucwang 2026

//! Wavefront scheduling of path lanes.
//!
//! Paths terminate at different depths. Instead of running every lane for
//! the full bounce budget, the active lanes live in one dense buffer: each
//! iteration runs a kernel over that buffer in parallel, then compacts away
//! the lanes that reported [`LaneStatus::Terminate`], handing each of them
//! to a `retire` callback exactly once. The scheduler carries no transport
//! logic of its own.

use std::thread;

/// Lanes below this count are stepped on the calling thread.
const MIN_LANES_PER_WORKER: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneStatus {
    Continue,
    Terminate,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WavefrontStats {
    /// Kernel launches over the active buffer.
    pub iterations: usize,
    /// Total (lane, iteration) pairs executed.
    pub lane_visits: usize,
    /// Lanes handed to the retire callback.
    pub retired: usize,
    pub peak_active: usize,
}

impl WavefrontStats {
    pub fn merge(&mut self, other: &WavefrontStats) {
        self.iterations += other.iterations;
        self.lane_visits += other.lane_visits;
        self.retired += other.retired;
        self.peak_active = self.peak_active.max(other.peak_active);
    }
}

pub struct Wavefront<T> {
    lanes: Vec<T>,
    status: Vec<LaneStatus>,
    workers: usize,
}

impl<T: Send> Wavefront<T> {
    /// `workers == 0` picks the available hardware parallelism.
    pub fn new(workers: usize) -> Self {
        let workers = if workers == 0 {
            thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
        } else {
            workers
        };
        Self { lanes: Vec::new(), status: Vec::new(), workers }
    }

    pub fn with_capacity(workers: usize, capacity: usize) -> Self {
        let mut wavefront = Self::new(workers);
        wavefront.lanes.reserve(capacity);
        wavefront.status.reserve(capacity);
        wavefront
    }

    pub fn push(&mut self, lane: T) {
        self.lanes.push(lane);
        self.status.push(LaneStatus::Continue);
    }

    pub fn extend<I: IntoIterator<Item = T>>(&mut self, lanes: I) {
        for lane in lanes {
            self.push(lane);
        }
    }

    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    pub fn active(&self) -> &[T] {
        &self.lanes
    }

    /// Runs `kernel` once on every active lane and records whether each one
    /// continues. Returns the number of lanes visited.
    pub fn step<F>(&mut self, kernel: F) -> usize
        where F: Fn(&mut T) -> LaneStatus + Sync
    {
        let n = self.lanes.len();
        if n == 0 {
            return 0;
        }

        let workers = self.workers.min((n + MIN_LANES_PER_WORKER - 1) / MIN_LANES_PER_WORKER).max(1);
        if workers == 1 {
            for (lane, status) in self.lanes.iter_mut().zip(self.status.iter_mut()) {
                *status = kernel(lane);
            }
            return n;
        }

        let chunk = (n + workers - 1) / workers;
        let kernel = &kernel;
        thread::scope(|scope| {
            for (lanes, status) in self.lanes.chunks_mut(chunk).zip(self.status.chunks_mut(chunk)) {
                scope.spawn(move || {
                    for (lane, s) in lanes.iter_mut().zip(status.iter_mut()) {
                        *s = kernel(lane);
                    }
                });
            }
        });
        n
    }

    /// Removes every lane marked terminated by the last [`Wavefront::step`]
    /// and passes it to `retire`. Order of the survivors is not preserved.
    pub fn compact<R>(&mut self, mut retire: R) -> usize
        where R: FnMut(T)
    {
        let mut removed = 0;
        let mut i = 0;
        while i < self.lanes.len() {
            if self.status[i] == LaneStatus::Terminate {
                self.status.swap_remove(i);
                retire(self.lanes.swap_remove(i));
                removed += 1;
            } else {
                i += 1;
            }
        }
        removed
    }

    /// Retires every remaining lane regardless of its status.
    pub fn drain<R>(&mut self, mut retire: R) -> usize
        where R: FnMut(T)
    {
        let removed = self.lanes.len();
        self.status.clear();
        for lane in self.lanes.drain(..) {
            retire(lane);
        }
        removed
    }

    /// Steps and compacts until the buffer is empty or `max_iterations`
    /// kernel launches have run; lanes left at the cap are retired too.
    pub fn run<F, R>(&mut self, max_iterations: usize, kernel: F, mut retire: R) -> WavefrontStats
        where F: Fn(&mut T) -> LaneStatus + Sync,
              R: FnMut(T)
    {
        let mut stats = WavefrontStats { peak_active: self.len(), ..WavefrontStats::default() };
        while !self.is_empty() && stats.iterations < max_iterations {
            stats.lane_visits += self.step(&kernel);
            stats.iterations += 1;
            stats.retired += self.compact(&mut retire);
            log::trace!("wavefront iteration {}: {} lanes active", stats.iterations, self.len());
        }
        stats.retired += self.drain(&mut retire);
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountedLane {
        id: usize,
        depth: usize,
        visits: usize,
    }

    fn depth_schedule(n: usize) -> Vec<usize> {
        (0..n).map(|i| 1 + (i * 7919) % 13).collect()
    }

    fn run_schedule(workers: usize, n: usize) {
        let depths = depth_schedule(n);
        let mut wavefront = Wavefront::new(workers);
        wavefront.extend((0..n).map(|id| CountedLane { id, depth: depths[id], visits: 0 }));

        let mut retired = vec![0usize; n];
        let stats = wavefront.run(
            100,
            |lane: &mut CountedLane| {
                assert!(lane.visits < lane.depth, "lane {} visited after termination", lane.id);
                lane.visits += 1;
                if lane.visits == lane.depth { LaneStatus::Terminate } else { LaneStatus::Continue }
            },
            |lane: CountedLane| {
                assert_eq!(lane.visits, lane.depth);
                retired[lane.id] += 1;
            },
        );

        assert_eq!(stats.lane_visits, depths.iter().sum::<usize>());
        assert_eq!(stats.iterations, *depths.iter().max().unwrap());
        assert_eq!(stats.retired, n);
        assert_eq!(stats.peak_active, n);
        assert!(retired.iter().all(|&r| r == 1));
        assert!(wavefront.is_empty());
    }

    #[test]
    fn test_visits_match_termination_depths_serial() {
        run_schedule(1, 100);
    }

    #[test]
    fn test_visits_match_termination_depths_parallel() {
        run_schedule(4, 5000);
    }

    #[test]
    fn test_iteration_cap_drains_remaining_lanes() {
        let mut wavefront = Wavefront::new(2);
        wavefront.extend(0..10usize);
        let mut retired = Vec::new();
        let stats = wavefront.run(3, |_| LaneStatus::Continue, |lane| retired.push(lane));
        assert_eq!(stats.iterations, 3);
        assert_eq!(stats.lane_visits, 30);
        retired.sort();
        assert_eq!(retired, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_wavefront_is_exhausted() {
        let mut wavefront: Wavefront<u32> = Wavefront::new(1);
        let stats = wavefront.run(8, |_| LaneStatus::Continue, |_| panic!("nothing to retire"));
        assert_eq!(stats, WavefrontStats::default());
    }

    #[test]
    fn test_compact_keeps_only_continuing_lanes() {
        let mut wavefront = Wavefront::new(1);
        wavefront.extend(0..8u32);
        wavefront.step(|lane| if *lane % 2 == 0 { LaneStatus::Terminate } else { LaneStatus::Continue });
        let mut removed = Vec::new();
        assert_eq!(wavefront.compact(|lane| removed.push(lane)), 4);
        removed.sort();
        assert_eq!(removed, vec![0, 2, 4, 6]);
        let mut left = wavefront.active().to_vec();
        left.sort();
        assert_eq!(left, vec![1, 3, 5, 7]);
    }
}
