//! # sortnet-gnp: minimum-size sorting networks by generate-and-prune
//!
//! **`sortnet-gnp`** searches for sorting networks with the fewest comparators
//! for a given number of inputs `n`. It builds all networks layer by layer,
//! one comparator at a time, and discards every network whose behaviour is
//! reproduced by another one up to a relabeling of wires.
//!
//! ## How it works
//!
//! By the 0-1 principle a network sorts iff it sorts every binary input, so a
//! network is characterised by its **output set**: the binary sequences it can
//! still produce. If some relabeling of wires maps the output set of network A
//! into that of network B, then A is at least as close to sorting as B and B
//! can be dropped (A *subsumes* B).
//!
//! Testing subsumption means searching permutations of `n` wires. Cheap
//! counting tests reject most pairs, per-wire constraint masks cut down the
//! rest, and only then is a backtracking search run.
//!
//! The number of networks per layer quickly outgrows memory, so candidates
//! live in binary segment files grouped by output set size, and pruning
//! streams pairs of segments through a pool of worker threads.
//!
//! ## Basic Usage
//!
//! ```no_run
//! use sortnet_gnp::config::Config;
//! use sortnet_gnp::search::GenerateAndPrune;
//!
//! # fn main() -> sortnet_gnp::error::Result<()> {
//! let config = Config::new(4).with_directory("/tmp");
//! let outcome = GenerateAndPrune::new(config)?.run()?;
//!
//! let network = outcome.found.expect("a 4-input sorter has 5 comparators");
//! assert_eq!(network.len(), 5);
//! println!("{}", network);
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Components
//!
//! - **[`search`]**: the [`GenerateAndPrune`][crate::search::GenerateAndPrune] orchestrator.
//! - **[`permutation`]**: constraint derivation and the permutation search.
//! - **[`prune`]**: marking and compaction of redundant output sets.
//! - **[`storage`]**: segment files and their binary [`record`] layout.
//!
//! Wires are numbered from the least significant bit internally. Everything
//! printed uses the paper convention, where wire 0 is the top wire.

pub mod bitset;
pub mod comparator;
pub mod config;
pub mod error;
pub mod metadata;
pub mod metrics;
pub mod network;
pub mod permutation;
pub mod pool;
pub mod prune;
pub mod record;
pub mod search;
pub mod sequence;
pub mod set;
pub mod storage;
