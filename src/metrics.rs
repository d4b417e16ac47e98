//! Passive counters and per-layer timings.
//!
//! [`Counters`] is shared by every thread of a search and only ever
//! incremented. At the end of each layer the orchestrator takes a snapshot
//! and stores the difference to the previous one as [`LayerMetrics`].

use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(usize)]
pub enum Counter {
    FileReads,
    FileWrites,
    Generated,
    /// Extension skipped because it repeats the last comparator.
    RedundantQuick,
    /// Extension skipped because it leaves the output set unchanged.
    RedundantFull,
    PrunedWithinFile,
    PrunedWithinCluster,
    PrunedAcrossClusters,
    St1Calls,
    St1Passed,
    St2Calls,
    St2Passed,
    St3Calls,
    St3Passed,
    ValidFastCalls,
    ValidFastPassed,
    GeneratorCalls,
    PermutationsTried,
    Subsumptions,
    /// Pairs passing every cheap test without a subsuming permutation.
    NoPermutation,
}

impl Counter {
    pub const COUNT: usize = 20;

    pub const ALL: [Counter; Counter::COUNT] = [
        Counter::FileReads,
        Counter::FileWrites,
        Counter::Generated,
        Counter::RedundantQuick,
        Counter::RedundantFull,
        Counter::PrunedWithinFile,
        Counter::PrunedWithinCluster,
        Counter::PrunedAcrossClusters,
        Counter::St1Calls,
        Counter::St1Passed,
        Counter::St2Calls,
        Counter::St2Passed,
        Counter::St3Calls,
        Counter::St3Passed,
        Counter::ValidFastCalls,
        Counter::ValidFastPassed,
        Counter::GeneratorCalls,
        Counter::PermutationsTried,
        Counter::Subsumptions,
        Counter::NoPermutation,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Counter::FileReads => "file reads",
            Counter::FileWrites => "file writes",
            Counter::Generated => "generated",
            Counter::RedundantQuick => "redundant (last comparator)",
            Counter::RedundantFull => "redundant (unchanged set)",
            Counter::PrunedWithinFile => "pruned within files",
            Counter::PrunedWithinCluster => "pruned within clusters",
            Counter::PrunedAcrossClusters => "pruned across clusters",
            Counter::St1Calls => "ST1 calls",
            Counter::St1Passed => "ST1 passed",
            Counter::St2Calls => "ST2 calls",
            Counter::St2Passed => "ST2 passed",
            Counter::St3Calls => "ST3 calls",
            Counter::St3Passed => "ST3 passed",
            Counter::ValidFastCalls => "ST4 calls",
            Counter::ValidFastPassed => "ST4 passed",
            Counter::GeneratorCalls => "permutation searches",
            Counter::PermutationsTried => "permutations tried",
            Counter::Subsumptions => "subsumptions",
            Counter::NoPermutation => "no permutation",
        }
    }
}

#[derive(Debug, Default)]
pub struct Counters {
    values: [AtomicU64; Counter::COUNT],
}

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn add(&self, counter: Counter, n: u64) {
        self.values[counter as usize].fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub fn increment(&self, counter: Counter) {
        self.add(counter, 1);
    }

    pub fn get(&self, counter: Counter) -> u64 {
        self.values[counter as usize].load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> Snapshot {
        let mut values = [0; Counter::COUNT];
        for (v, a) in values.iter_mut().zip(self.values.iter()) {
            *v = a.load(Ordering::Relaxed);
        }
        Snapshot { values }
    }
}

/// Counter values at one point in time.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    values: [u64; Counter::COUNT],
}

impl Snapshot {
    pub fn get(&self, counter: Counter) -> u64 {
        self.values[counter as usize]
    }

    /// Counts accumulated since `earlier`.
    pub fn since(&self, earlier: &Snapshot) -> Snapshot {
        let mut values = [0; Counter::COUNT];
        for (i, v) in values.iter_mut().enumerate() {
            *v = self.values[i] - earlier.values[i];
        }
        Snapshot { values }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(usize)]
pub enum Phase {
    Generate,
    Sort,
    WithinFile,
    WithinCluster,
    AcrossClusters,
    Fragment,
}

impl Phase {
    pub const COUNT: usize = 6;

    pub const ALL: [Phase; Phase::COUNT] = [
        Phase::Generate,
        Phase::Sort,
        Phase::WithinFile,
        Phase::WithinCluster,
        Phase::AcrossClusters,
        Phase::Fragment,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Phase::Generate => "generate",
            Phase::Sort => "sort",
            Phase::WithinFile => "within files",
            Phase::WithinCluster => "within clusters",
            Phase::AcrossClusters => "across clusters",
            Phase::Fragment => "fragment",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LayerMetrics {
    pub layer: u8,
    pub counters: Snapshot,
    pub durations: [Duration; Phase::COUNT],
    pub size_clusters: usize,
    pub files_before_fragmenting: usize,
    pub files_after_fragmenting: usize,
    /// Networks left after pruning.
    pub survivors: usize,
    /// Across-cluster pruning ran before the other phases.
    pub reversed: bool,
}

impl LayerMetrics {
    pub fn new(layer: u8) -> Self {
        Self {
            layer,
            ..Default::default()
        }
    }

    pub fn duration(&self, phase: Phase) -> Duration {
        self.durations[phase as usize]
    }

    pub fn add_duration(&mut self, phase: Phase, d: Duration) {
        self.durations[phase as usize] += d;
    }

    pub fn total_duration(&self) -> Duration {
        self.durations.iter().sum()
    }

    /// Networks that passed the generation filters.
    pub fn filters(&self) -> u64 {
        self.counters.get(Counter::Generated)
    }

    pub fn pruned(&self) -> u64 {
        self.counters.get(Counter::PrunedWithinFile)
            + self.counters.get(Counter::PrunedWithinCluster)
            + self.counters.get(Counter::PrunedAcrossClusters)
    }
}

impl Display for LayerMetrics {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "layer {}: {} survivors, {} size clusters, files {} -> {}{}",
            self.layer,
            self.survivors,
            self.size_clusters,
            self.files_before_fragmenting,
            self.files_after_fragmenting,
            if self.reversed { ", reversed order" } else { "" }
        )?;
        for counter in Counter::ALL {
            let v = self.counters.get(counter);
            if v > 0 {
                writeln!(f, "  {:<28} {}", counter.name(), v)?;
            }
        }
        for phase in Phase::ALL {
            writeln!(f, "  {:<28} {:.3?}", phase.name(), self.duration(phase))?;
        }
        Ok(())
    }
}

/// Metrics of all completed layers of a search.
#[derive(Debug, Clone, Default)]
pub struct Metrics {
    pub layers: Vec<LayerMetrics>,
}

impl Metrics {
    pub fn push(&mut self, layer: LayerMetrics) {
        self.layers.push(layer);
    }

    pub fn last(&self) -> Option<&LayerMetrics> {
        self.layers.last()
    }

    pub fn total(&self, counter: Counter) -> u64 {
        self.layers.iter().map(|l| l.counters.get(counter)).sum()
    }

    pub fn total_duration(&self) -> Duration {
        self.layers.iter().map(LayerMetrics::total_duration).sum()
    }
}

impl Display for Metrics {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for layer in &self.layers {
            write!(f, "{}", layer)?;
        }
        write!(
            f,
            "total: {} generated, {} pruned, {} subsumptions in {:.3?}",
            self.total(Counter::Generated),
            self.layers.iter().map(LayerMetrics::pruned).sum::<u64>(),
            self.total(Counter::Subsumptions),
            self.total_duration()
        )
    }
}
