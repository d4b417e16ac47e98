//! Runtime configuration of a search.
//!
//! The problem size (`n` inputs, at most `k` comparators) is chosen at
//! construction time; everything else has defaults matching the values the
//! search was tuned with.

use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::sequence::MAX_INPUTS;

/// Upper bound on the size of an optimal sorting network for `n` inputs.
///
/// Values up to 10 inputs are the proven optimal sizes; above that the best
/// known size plus a growing margin.
///
/// ```
/// use sortnet_gnp::config::network_size_upper_bound;
///
/// assert_eq!(network_size_upper_bound(4), Some(5));
/// assert_eq!(network_size_upper_bound(9), Some(25));
/// assert_eq!(network_size_upper_bound(18), None);
/// ```
pub fn network_size_upper_bound(n: u8) -> Option<u8> {
    const MARGIN: u8 = 3;
    let size = match n {
        2 => 1,
        3 => 3,
        4 => 5,
        5 => 9,
        6 => 12,
        7 => 16,
        8 => 19,
        9 => 25,
        10 => 29,
        11 => 35 + MARGIN,
        12 => 39 + MARGIN * 2,
        13 => 45 + MARGIN * 3,
        14 => 51 + MARGIN * 4,
        15 => 56 + MARGIN * 5,
        16 => 60 + MARGIN * 6,
        17 => 71 + MARGIN * 7,
        _ => return None,
    };
    Some(size)
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Number of inputs (wires).
    pub n: u8,
    /// Maximum number of comparators, i.e. the last layer considered.
    pub k: u8,
    /// Cores available; one is reserved for orchestration.
    pub cores: usize,
    /// Maximum number of records per segment file.
    pub segment_capacity: usize,
    /// Number of live files above which clusters are fragmented.
    pub fragment_threshold: usize,
    /// Directory under which the working directory `network{n}` is created.
    pub directory: PathBuf,
    /// Validate every comparator appended while generating.
    pub safety: bool,
    /// Layer after which pruning order may switch because of timings.
    pub reorder_after_layer: u8,
    /// Keep segment files on disk after a successful search. A failed search
    /// always leaves them.
    pub keep_files: bool,
}

impl Config {
    /// Default configuration for `n` inputs, with `k` set to
    /// [`network_size_upper_bound`].
    ///
    /// An `n` outside `2..=17` is reported by [`Config::validate`].
    pub fn new(n: u8) -> Self {
        let k = network_size_upper_bound(n).unwrap_or(0);
        Self {
            n,
            k,
            cores: num_cpus::get(),
            segment_capacity: 5000,
            fragment_threshold: 200,
            directory: PathBuf::from("."),
            safety: true,
            reorder_after_layer: 9,
            keep_files: false,
        }
    }

    pub fn with_k(mut self, k: u8) -> Self {
        self.k = k;
        self
    }
    pub fn with_cores(mut self, cores: usize) -> Self {
        self.cores = cores;
        self
    }
    pub fn with_segment_capacity(mut self, capacity: usize) -> Self {
        self.segment_capacity = capacity;
        self
    }
    pub fn with_fragment_threshold(mut self, threshold: usize) -> Self {
        self.fragment_threshold = threshold;
        self
    }
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }
    pub fn with_safety(mut self, safety: bool) -> Self {
        self.safety = safety;
        self
    }
    pub fn with_keep_files(mut self, keep: bool) -> Self {
        self.keep_files = keep;
        self
    }
    pub fn with_reorder_after_layer(mut self, layer: u8) -> Self {
        self.reorder_after_layer = layer;
        self
    }

    /// Number of pruning workers: all cores but the orchestrating one.
    pub fn workers(&self) -> usize {
        self.cores.saturating_sub(1).max(1)
    }

    pub fn validate(&self) -> Result<()> {
        if self.n < 2 || self.n as usize > MAX_INPUTS {
            return Err(Error::UnsupportedSize(self.n));
        }
        if self.k == 0 {
            return Err(Error::InvalidConfig("k must be positive".to_owned()));
        }
        if self.segment_capacity == 0 {
            return Err(Error::InvalidConfig(
                "segment capacity must be positive".to_owned(),
            ));
        }
        if self.segment_capacity > i32::MAX as usize {
            return Err(Error::InvalidConfig(format!(
                "segment capacity {} does not fit the record count header",
                self.segment_capacity
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upper_bound_known_sizes() {
        assert_eq!(network_size_upper_bound(2), Some(1));
        assert_eq!(network_size_upper_bound(3), Some(3));
        assert_eq!(network_size_upper_bound(8), Some(19));
        assert_eq!(network_size_upper_bound(11), Some(38));
        assert_eq!(network_size_upper_bound(17), Some(92));
        assert_eq!(network_size_upper_bound(1), None);
        assert_eq!(network_size_upper_bound(0), None);
    }

    #[test]
    fn test_new_derives_k() {
        let config = Config::new(5);
        assert_eq!(config.k, 9);
        assert!(config.safety);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unsupported_inputs_fail_validation() {
        for n in [0, 1, 18, 30] {
            let config = Config::new(n);
            assert_eq!(config.k, 0);
            assert!(matches!(config.validate(), Err(Error::UnsupportedSize(m)) if m == n));
        }
        // A custom `k` does not make the size supported.
        assert!(matches!(
            Config::new(30).with_k(100).validate(),
            Err(Error::UnsupportedSize(30))
        ));
    }

    #[test]
    fn test_validate() {
        let config = Config::new(4).with_segment_capacity(0);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let config = Config::new(4).with_k(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_workers_reserve_one_core() {
        assert_eq!(Config::new(4).with_cores(8).workers(), 7);
        assert_eq!(Config::new(4).with_cores(1).workers(), 1);
    }
}
