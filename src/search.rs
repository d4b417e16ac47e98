//! The generate-and-prune search.
//!
//! The search proceeds one layer (comparator count) at a time. Every network
//! of the previous layer is extended by every comparator that changes its
//! output set, and the candidates are written to segment files grouped by
//! output set size. Redundant candidates are then pruned in three phases:
//!
//! - **within files**: every pair of sets in one segment,
//! - **within clusters**: every pair of segments with equal set sizes,
//! - **across clusters**: every segment against the segments of all larger
//!   clusters. A set can only be subsumed by a set at least as large, so
//!   this direction suffices.
//!
//! Sets are pruned in their files only; networks stay in their companion
//! files and are found by id when the next layer is generated.
//!
//! Two heuristics keep the work balanced. Once the file count passes a
//! threshold, clusters are *fragmented*: their survivors are rewritten into
//! densely packed segments. Once the number of candidates stops growing, or
//! within-cluster pruning becomes slower than across-cluster pruning, the
//! cheaper across-cluster phase runs first.
//!
//! The search stops when a single network survives and it sorts.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::bitset::BitSet;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::metrics::{Counter, Counters, LayerMetrics, Metrics, Phase};
use crate::network::Network;
use crate::pool::{Buffer, BufferPool};
use crate::prune::{self, Subsumption};
use crate::sequence::Domain;
use crate::set::OutputSet;
use crate::storage::{Handle, Storage};

/// Result of a search.
#[derive(Debug, Clone)]
pub struct Outcome {
    /// The sorting network found, if any within the configured size.
    pub found: Option<Network>,
    /// Last layer processed.
    pub layers: u8,
    pub metrics: Metrics,
}

/// A network file and its companion set file.
#[derive(Debug, Clone)]
struct Segment {
    nets: Handle,
    sets: Handle,
}

/// Segments whose sets all have the same size.
#[derive(Debug, Clone)]
struct Cluster {
    size: usize,
    segments: Vec<Segment>,
}

/// Buffers (network, set) pairs per set size and flushes full segments.
struct ClusterWriter<'a> {
    storage: &'a Storage,
    layer: u8,
    fragment: bool,
    capacity: usize,
    pending: BTreeMap<usize, (Vec<Network>, Vec<OutputSet>)>,
    clusters: BTreeMap<usize, Vec<Segment>>,
    next_id: u64,
}

impl<'a> ClusterWriter<'a> {
    fn new(storage: &'a Storage, layer: u8, fragment: bool, capacity: usize) -> Self {
        Self {
            storage,
            layer,
            fragment,
            capacity,
            pending: BTreeMap::new(),
            clusters: BTreeMap::new(),
            next_id: 1,
        }
    }

    fn push(&mut self, network: &Network, set: &OutputSet) -> Result<()> {
        let key = set.len();
        let (nets, sets) = self.pending.entry(key).or_default();
        nets.push(network.clone());
        sets.push(set.clone());
        if sets.len() >= self.capacity {
            self.flush(key)?;
        }
        Ok(())
    }

    /// Assigns ids to the pending pairs of one size and writes them out.
    fn flush(&mut self, key: usize) -> Result<()> {
        let Some((nets, sets)) = self.pending.get_mut(&key) else {
            return Ok(());
        };
        if sets.is_empty() {
            return Ok(());
        }
        for (network, set) in nets.iter_mut().zip(sets.iter_mut()) {
            network.id = self.next_id;
            set.set_net_id(self.next_id);
            self.next_id += 1;
        }
        let (nets_handle, sets_handle) = self.storage.new_pair(self.layer, self.fragment);
        self.storage.save(&nets_handle, &nets[..])?;
        self.storage.save(&sets_handle, &sets[..])?;
        nets.clear();
        sets.clear();
        self.clusters.entry(key).or_default().push(Segment {
            nets: nets_handle,
            sets: sets_handle,
        });
        Ok(())
    }

    /// Flushes what is left and returns the clusters by ascending set size.
    fn finish(mut self) -> Result<Vec<Cluster>> {
        let keys: Vec<usize> = self.pending.keys().copied().collect();
        for key in keys {
            self.flush(key)?;
        }
        Ok(self
            .clusters
            .into_iter()
            .map(|(size, segments)| Cluster { size, segments })
            .collect())
    }
}

pub struct GenerateAndPrune {
    config: Config,
    domain: Domain,
    counters: Arc<Counters>,
    storage: Storage,
    buffers: BufferPool,
    threads: ThreadPool,
    frontier: Vec<Cluster>,
    metrics: Metrics,
    reversed: bool,
    prev_filters: u64,
}

impl GenerateAndPrune {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let domain = Domain::new(config.n)?;
        let counters = Arc::new(Counters::new());
        let storage = Storage::open(
            &config.directory,
            config.n,
            config.keep_files,
            Arc::clone(&counters),
        )?;
        let workers = config.workers();
        let buffers = BufferPool::new(config.n, config.k, config.segment_capacity, 0);
        let threads = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("prune-{}", i))
            .build()?;

        debug!(
            "search for n = {}, k = {} with {} workers in {}",
            config.n,
            config.k,
            workers,
            storage.root().display()
        );

        Ok(Self {
            config,
            domain,
            counters,
            storage,
            buffers,
            threads,
            frontier: Vec::new(),
            metrics: Metrics::default(),
            reversed: false,
            prev_filters: 0,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Runs layers until a sorting network is found or `k` is exhausted.
    ///
    /// On error the segment files stay on disk, holding the last completed
    /// layer.
    pub fn run(mut self) -> Result<Outcome> {
        let (found, layers) = self.search()?;
        self.storage.finish();
        Ok(Outcome {
            found,
            layers,
            metrics: std::mem::take(&mut self.metrics),
        })
    }

    fn search(&mut self) -> Result<(Option<Network>, u8)> {
        self.seed()?;

        for layer in 1..=self.config.k {
            let found = self.layer(layer)?;
            if found.is_some() {
                return Ok((found, layer));
            }
            if self.frontier.is_empty() {
                warn!("layer {} left no networks", layer);
                return Ok((None, layer));
            }
        }

        info!("no sorting network with at most {} comparators", self.config.k);
        Ok((None, self.config.k))
    }

    /// Layer 0: the empty network and the full output set.
    fn seed(&mut self) -> Result<()> {
        let mut network = Network::new(self.config.n, self.config.k);
        let mut set = OutputSet::full(&self.domain);
        network.id = 1;
        set.set_net_id(1);

        let (nets, sets) = self.storage.new_pair(0, false);
        self.storage.save(&nets, &[network])?;
        self.storage.save(&sets, &[set.clone()])?;
        self.frontier = vec![Cluster {
            size: set.len(),
            segments: vec![Segment { nets, sets }],
        }];
        Ok(())
    }

    /// Runs one layer. Returns the sorting network if it is the only survivor.
    fn layer(&mut self, layer: u8) -> Result<Option<Network>> {
        let before = self.counters.snapshot();
        let mut lm = LayerMetrics::new(layer);
        lm.reversed = self.reversed;

        let generated = self.timed(&mut lm, Phase::Generate, |s| s.generate(layer))?;
        lm.size_clusters = self.frontier.len();
        info!(
            "layer {}: generated {} networks in {} size clusters",
            layer, generated, lm.size_clusters
        );

        self.timed(&mut lm, Phase::Sort, |s| s.sort_segments())?;

        if !self.reversed {
            self.timed(&mut lm, Phase::WithinFile, |s| s.prune_within_files())?;
            self.timed(&mut lm, Phase::WithinCluster, |s| s.prune_within_clusters())?;
        } else {
            self.timed(&mut lm, Phase::AcrossClusters, |s| s.prune_across_clusters())?;
        }

        lm.files_before_fragmenting = self.file_count();
        if lm.files_before_fragmenting > self.config.fragment_threshold || self.reversed {
            self.timed(&mut lm, Phase::Fragment, |s| s.fragment(layer))?;
            self.timed(&mut lm, Phase::Sort, |s| s.sort_segments())?;
        }
        lm.files_after_fragmenting = self.file_count();

        if !self.reversed {
            self.timed(&mut lm, Phase::AcrossClusters, |s| s.prune_across_clusters())?;
        } else {
            self.timed(&mut lm, Phase::WithinFile, |s| s.prune_within_files())?;
            self.timed(&mut lm, Phase::WithinCluster, |s| s.prune_within_clusters())?;
            self.timed(&mut lm, Phase::Fragment, |s| s.fragment(layer))?;
        }

        lm.counters = self.counters.snapshot().since(&before);
        lm.survivors = self.survivors()?;

        let filters = generated.saturating_sub(lm.pruned());
        if !self.reversed
            && (self.prev_filters >= filters
                || (layer > self.config.reorder_after_layer
                    && lm.duration(Phase::WithinCluster) > lm.duration(Phase::AcrossClusters)))
        {
            info!("layer {}: pruning across clusters first from now on", layer);
            self.reversed = true;
        }
        self.prev_filters = filters;

        info!(
            "layer {}: pruned {}, {} networks left in {} files ({:.3?})",
            layer,
            lm.pruned(),
            lm.survivors,
            lm.files_after_fragmenting,
            lm.total_duration()
        );

        let found = if lm.survivors == 1 {
            self.sorting_survivor()?
        } else {
            None
        };
        self.metrics.push(lm);

        if let Some(network) = &found {
            info!("found sorting network of size {}: {}", network.len(), network);
        }
        Ok(found)
    }

    fn timed<T>(
        &mut self,
        lm: &mut LayerMetrics,
        phase: Phase,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let start = Instant::now();
        let result = f(self)?;
        let elapsed: Duration = start.elapsed();
        lm.add_duration(phase, elapsed);
        debug!("{} took {:.3?}", phase.name(), elapsed);
        Ok(result)
    }

    fn segments(&self) -> impl Iterator<Item = &Segment> + '_ {
        self.frontier.iter().flat_map(|c| c.segments.iter())
    }

    fn file_count(&self) -> usize {
        self.segments().count()
    }

    fn survivors(&self) -> Result<usize> {
        self.segments()
            .map(|seg| self.storage.count(&seg.sets))
            .sum()
    }

    /// Loads a segment and pairs every set with its network.
    ///
    /// Returns `(set index, network index)` pairs into the buffer.
    fn load_pairs(&self, segment: &Segment, buffer: &mut Buffer) -> Result<Vec<(usize, usize)>> {
        let sets = self.storage.load(&segment.sets, &mut buffer.sets[..])?;
        if sets == 0 {
            return Ok(Vec::new());
        }
        let nets = self.storage.load(&segment.nets, &mut buffer.nets[..])?;
        let index: HashMap<u64, usize> = buffer.nets[..nets]
            .iter()
            .enumerate()
            .map(|(i, network)| (network.id, i))
            .collect();

        buffer.sets[..sets]
            .iter()
            .enumerate()
            .map(|(i, set)| match index.get(&set.net_id()) {
                Some(&j) => Ok((i, j)),
                None => Err(Error::NetworkNotFound {
                    id: set.net_id(),
                    handle: segment.nets.name(),
                }),
            })
            .collect()
    }

    fn retire(&self, clusters: &[Cluster]) -> Result<()> {
        for seg in clusters.iter().flat_map(|c| c.segments.iter()) {
            self.storage.remove(&seg.nets)?;
            self.storage.remove(&seg.sets)?;
        }
        Ok(())
    }

    /// Extends every surviving network by every useful comparator.
    fn generate(&mut self, layer: u8) -> Result<u64> {
        let previous = std::mem::take(&mut self.frontier);
        let n = self.config.n;
        let mut writer =
            ClusterWriter::new(&self.storage, layer, false, self.config.segment_capacity);
        let mut network = Network::new(n, self.config.k);
        let mut next = OutputSet::with_capacity(&self.domain);
        let mut seen = BitSet::new(1 << n);
        let mut generated = 0;

        for segment in previous.iter().flat_map(|c| c.segments.iter()) {
            let mut buffer = self.buffers.get();
            let pairs = self.load_pairs(segment, &mut buffer)?;
            debug!("extending {} networks of {}", pairs.len(), segment.sets);

            for (i, j) in pairs {
                let set = &buffer.sets[i];
                network.clone_from(&buffer.nets[j]);

                for &c in self.domain.comparators() {
                    if c == network.last() {
                        self.counters.increment(Counter::RedundantQuick);
                        continue;
                    }
                    if set.is_fixed_by(c) {
                        self.counters.increment(Counter::RedundantFull);
                        continue;
                    }
                    set.apply_into(c, &mut next, &mut seen);
                    if self.config.safety {
                        network.push_back(c)?;
                    } else {
                        network.push_back_unchecked(c);
                    }
                    writer.push(&network, &next)?;
                    network.pop_back();
                    generated += 1;
                }
            }
        }

        let clusters = writer.finish()?;
        self.retire(&previous)?;
        self.frontier = clusters;
        self.counters.add(Counter::Generated, generated);
        Ok(generated)
    }

    /// Rewrites the surviving pairs into densely packed segments.
    fn fragment(&mut self, layer: u8) -> Result<()> {
        let previous = std::mem::take(&mut self.frontier);
        let mut writer =
            ClusterWriter::new(&self.storage, layer, true, self.config.segment_capacity);

        for segment in previous.iter().flat_map(|c| c.segments.iter()) {
            let mut buffer = self.buffers.get();
            for (i, j) in self.load_pairs(segment, &mut buffer)? {
                writer.push(&buffer.nets[j], &buffer.sets[i])?;
            }
        }

        let clusters = writer.finish()?;
        self.retire(&previous)?;
        self.frontier = clusters;
        debug!("fragmented into {} files", self.file_count());
        Ok(())
    }

    /// Orders the sets of every segment by their metadata.
    fn sort_segments(&mut self) -> Result<()> {
        let segments: Vec<&Segment> = self.segments().collect();
        self.threads.install(|| {
            segments
                .par_iter()
                .map(|seg| {
                    let mut buffer = self.buffers.get();
                    let count = self.storage.load(&seg.sets, &mut buffer.sets[..])?;
                    prune::sort_by_metadata(&mut buffer.sets[..count]);
                    self.storage.save(&seg.sets, &buffer.sets[..count])
                })
                .collect::<Result<Vec<()>>>()
        })?;
        Ok(())
    }

    fn prune_within_files(&mut self) -> Result<()> {
        let tester = Subsumption::new(&self.counters);
        let segments: Vec<&Segment> = self.segments().collect();
        let pruned: usize = self
            .threads
            .install(|| {
                segments
                    .par_iter()
                    .map(|seg| {
                        let mut buffer = self.buffers.get();
                        let sets = &mut buffer.sets;
                        let count = self.storage.load(&seg.sets, &mut sets[..])?;
                        prune::mark_within(tester, &mut sets[..count]);
                        let kept = prune::shift_redundant(&mut sets[..count]);
                        if kept < count {
                            self.storage.save(&seg.sets, &sets[..kept])?;
                            debug!("{}: pruned {} of {}", seg.sets, count - kept, count);
                        }
                        Ok(count - kept)
                    })
                    .collect::<Result<Vec<usize>>>()
            })?
            .into_iter()
            .sum();

        self.counters.add(Counter::PrunedWithinFile, pruned as u64);
        Ok(())
    }

    /// Prunes one loaded segment `a` against the segment `b`. Returns the
    /// number of sets pruned from `b` and the positions of `a` found
    /// redundant.
    fn prune_pair(
        &self,
        tester: Subsumption<'_>,
        a: &[OutputSet],
        b: &Segment,
    ) -> Result<(usize, BitSet)> {
        let mut buffer = self.buffers.get();
        let sets = &mut buffer.sets;
        let count = self.storage.load(&b.sets, &mut sets[..])?;
        let mut a_marks = BitSet::new(a.len());
        if count == 0 {
            return Ok((0, a_marks));
        }

        let marked = prune::mark_between(tester, a, &mut a_marks, &mut sets[..count]);
        if marked > 0 {
            let kept = prune::shift_redundant(&mut sets[..count]);
            self.storage.save(&b.sets, &sets[..kept])?;
        }
        Ok((marked, a_marks))
    }

    fn prune_within_clusters(&mut self) -> Result<()> {
        let tester = Subsumption::new(&self.counters);
        let mut pruned = 0;

        for cluster in &self.frontier {
            for (i, seg_a) in cluster.segments.iter().enumerate() {
                let rest = &cluster.segments[i + 1..];
                if rest.is_empty() {
                    break;
                }

                let mut buffer = self.buffers.get();
                let count = self.storage.load(&seg_a.sets, &mut buffer.sets[..])?;
                if count == 0 {
                    continue;
                }

                let a = &buffer.sets[..count];
                let results = self.threads.install(|| {
                    rest.par_iter()
                        .map(|seg_b| self.prune_pair(tester, a, seg_b))
                        .collect::<Result<Vec<_>>>()
                })?;

                let mut a_marks = BitSet::new(count);
                for (marked, marks) in results {
                    pruned += marked;
                    a_marks.union_with(&marks);
                }
                if a_marks.is_empty() {
                    continue;
                }

                for pos in a_marks.iter() {
                    buffer.sets[pos].mark();
                }
                let kept = prune::shift_redundant(&mut buffer.sets[..count]);
                pruned += count - kept;
                self.storage.save(&seg_a.sets, &buffer.sets[..kept])?;
                debug!(
                    "cluster {}: {} pruned {} of its own",
                    cluster.size,
                    seg_a.sets,
                    count - kept
                );
            }
        }

        self.counters
            .add(Counter::PrunedWithinCluster, pruned as u64);
        Ok(())
    }

    /// Prunes the segment `b` with the sets of `a`. Returns the number of
    /// sets pruned.
    fn prune_against(&self, tester: Subsumption<'_>, a: &[OutputSet], b: &Segment) -> Result<usize> {
        let mut buffer = self.buffers.get();
        let sets = &mut buffer.sets;
        let count = self.storage.load(&b.sets, &mut sets[..])?;
        if count == 0 {
            return Ok(0);
        }

        let marked = prune::mark_across(tester, a, &mut sets[..count]);
        if marked > 0 {
            let kept = prune::shift_redundant(&mut sets[..count]);
            self.storage.save(&b.sets, &sets[..kept])?;
        }
        Ok(marked)
    }

    fn prune_across_clusters(&mut self) -> Result<()> {
        let tester = Subsumption::new(&self.counters);
        let mut pruned = 0;

        for (ci, cluster) in self.frontier.iter().enumerate() {
            let larger: Vec<&Segment> = self.frontier[ci + 1..]
                .iter()
                .inspect(|next| debug_assert!(next.size > cluster.size))
                .flat_map(|c| c.segments.iter())
                .collect();
            if larger.is_empty() {
                break;
            }

            for seg_a in &cluster.segments {
                let mut buffer = self.buffers.get();
                let count = self.storage.load(&seg_a.sets, &mut buffer.sets[..])?;
                if count == 0 {
                    continue;
                }

                let a = &buffer.sets[..count];
                let results = self.threads.install(|| {
                    larger
                        .par_iter()
                        .map(|seg_b| self.prune_against(tester, a, seg_b))
                        .collect::<Result<Vec<usize>>>()
                })?;
                pruned += results.into_iter().sum::<usize>();
            }
        }

        self.counters
            .add(Counter::PrunedAcrossClusters, pruned as u64);
        Ok(())
    }

    /// The only surviving network, if it sorts.
    fn sorting_survivor(&self) -> Result<Option<Network>> {
        let sorted_size = self.domain.clusters();
        for segment in self.segments() {
            let mut buffer = self.buffers.get();
            let pairs = self.load_pairs(segment, &mut buffer)?;
            if let Some(&(i, j)) = pairs.first() {
                if buffer.sets[i].len() != sorted_size {
                    return Ok(None);
                }
                let network = buffer.nets[j].clone();
                debug_assert!(network.is_sorting(&self.domain));
                return Ok(Some(network));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn search(n: u8, dir: &std::path::Path) -> GenerateAndPrune {
        let config = Config::new(n)
            .with_cores(2)
            .with_segment_capacity(4)
            .with_fragment_threshold(3)
            .with_directory(dir);
        GenerateAndPrune::new(config).unwrap()
    }

    #[test]
    fn test_seed() {
        let dir = tempfile::tempdir().unwrap();
        let mut gnp = search(3, dir.path());
        gnp.seed().unwrap();
        assert_eq!(gnp.file_count(), 1);
        assert_eq!(gnp.survivors().unwrap(), 1);
        assert_eq!(gnp.frontier[0].size, 6);
    }

    #[test]
    fn test_generate_layer_one() {
        let dir = tempfile::tempdir().unwrap();
        let mut gnp = search(4, dir.path());
        gnp.seed().unwrap();
        let generated = gnp.generate(1).unwrap();
        // Every comparator changes the full set.
        assert_eq!(generated, 6);
        // Each comparator moves the four sequences with a one on its upper
        // wire and a zero on its lower wire onto existing sequences.
        assert_eq!(gnp.frontier.len(), 1);
        assert_eq!(gnp.frontier[0].size, 10);
        assert_eq!(gnp.survivors().unwrap(), 6);
        // Segments hold at most four records.
        assert_eq!(gnp.file_count(), 2);
    }

    #[test]
    fn test_layer_one_prunes_to_single_network() {
        let dir = tempfile::tempdir().unwrap();
        let mut gnp = search(3, dir.path());
        gnp.seed().unwrap();
        let found = gnp.layer(1).unwrap();
        assert!(found.is_none());
        assert_eq!(gnp.survivors().unwrap(), 1);
        let lm = gnp.metrics.last().unwrap();
        assert_eq!(lm.filters(), 3);
        assert_eq!(lm.pruned(), 2);
    }

    #[test]
    fn test_fragment_packs_segments() {
        let dir = tempfile::tempdir().unwrap();
        let mut gnp = search(4, dir.path());
        gnp.seed().unwrap();
        gnp.generate(1).unwrap();
        gnp.generate(2).unwrap();
        let survivors = gnp.survivors().unwrap();
        gnp.prune_within_files().unwrap();
        gnp.fragment(2).unwrap();
        assert!(gnp.survivors().unwrap() <= survivors);
        for seg in gnp.segments() {
            assert!(seg.sets.name().starts_with("fo4-002-"));
        }
        let names: Vec<String> = std::fs::read_dir(gnp.storage.root())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert!(names.iter().all(|name| name.starts_with('f')));
    }

    #[test]
    fn test_network_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut gnp = search(3, dir.path());
        gnp.seed().unwrap();
        let segment = gnp.frontier[0].segments[0].clone();
        let mut orphan = OutputSet::full(&gnp.domain);
        orphan.set_net_id(99);
        gnp.storage.save(&segment.sets, &[orphan]).unwrap();
        assert!(matches!(
            gnp.generate(1),
            Err(Error::NetworkNotFound { id: 99, .. })
        ));
    }

    #[test]
    fn test_reversed_order_after_filters_stop_growing() {
        let dir = tempfile::tempdir().unwrap();
        let mut gnp = search(4, dir.path());
        gnp.seed().unwrap();
        gnp.prev_filters = u64::MAX;

        assert!(gnp.layer(1).unwrap().is_none());
        assert!(gnp.reversed);
        assert!(!gnp.metrics.layers[0].reversed);

        let mut found = None;
        for layer in 2..=5 {
            found = gnp.layer(layer).unwrap();
            assert!(gnp.metrics.last().unwrap().reversed);
        }
        let network = found.unwrap();
        assert_eq!(network.len(), 5);
        assert!(network.is_sorting(&gnp.domain));
    }

    #[test]
    fn test_failed_layer_leaves_segments_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut gnp = search(3, dir.path());
        gnp.seed().unwrap();
        let segment = gnp.frontier[0].segments[0].clone();
        let mut orphan = OutputSet::full(&gnp.domain);
        orphan.set_net_id(99);
        gnp.storage.save(&segment.sets, &[orphan]).unwrap();

        assert!(gnp.layer(1).is_err());
        let root = gnp.storage.root().to_path_buf();
        drop(gnp);

        assert!(root.exists());
        assert!(segment.nets.path().exists());
        assert!(segment.sets.path().exists());
    }
}
