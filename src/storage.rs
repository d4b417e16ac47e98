//! Segment files on disk.
//!
//! A segment is one file holding an `i32` record count followed by that many
//! [`Record`]s. Networks and their output sets are stored in companion files
//! sharing a serial number, named `{prefix}{n}-{layer:03}-{serial:07}.gnp`
//! with prefix `n` for networks and `o` for output sets (`fn`/`fo` for
//! segments written while fragmenting).
//!
//! All files live in `{directory}/network{n}/`, which is emptied when the
//! storage is opened. It is removed on drop only after [`Storage::finish`]
//! and unless asked to keep it, so a failed search leaves the segments of
//! its last completed layer behind.

use std::fmt::{Display, Formatter};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::metrics::{Counter, Counters};
use crate::record::{self, Record};

const EXTENSION: &str = "gnp";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Kind {
    Network,
    Set,
}

impl Kind {
    fn prefix(self) -> &'static str {
        match self {
            Kind::Network => "n",
            Kind::Set => "o",
        }
    }
}

/// Opaque reference to a segment file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Handle {
    path: PathBuf,
    kind: Kind,
    layer: u8,
}

impl Handle {
    pub fn kind(&self) -> Kind {
        self.kind
    }
    pub fn layer(&self) -> u8 {
        self.layer
    }
    pub fn path(&self) -> &Path {
        &self.path
    }
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl Display for Handle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

pub struct Storage {
    root: PathBuf,
    n: u8,
    serial: AtomicU64,
    keep: bool,
    finished: bool,
    counters: Arc<Counters>,
}

impl Storage {
    /// Prepares an empty working directory `{directory}/network{n}`.
    pub fn open(directory: &Path, n: u8, keep: bool, counters: Arc<Counters>) -> Result<Self> {
        let root = directory.join(format!("network{}", n));
        if root.exists() {
            debug!("clearing {}", root.display());
            fs::remove_dir_all(&root).map_err(|e| Error::io(&root, e))?;
        }
        fs::create_dir_all(&root).map_err(|e| Error::io(&root, e))?;
        Ok(Self {
            root,
            n,
            serial: AtomicU64::new(0),
            keep,
            finished: false,
            counters,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Marks the search as complete, allowing the directory to be removed.
    pub fn finish(&mut self) {
        self.finished = true;
    }

    fn handle(&self, kind: Kind, layer: u8, serial: u64, fragment: bool) -> Handle {
        let name = format!(
            "{}{}{}-{:03}-{:07}.{}",
            if fragment { "f" } else { "" },
            kind.prefix(),
            self.n,
            layer,
            serial,
            EXTENSION
        );
        Handle {
            path: self.root.join(name),
            kind,
            layer,
        }
    }

    fn next_serial(&self) -> u64 {
        self.serial.fetch_add(1, Ordering::Relaxed)
    }

    /// Reserves a network handle and its companion set handle.
    pub fn new_pair(&self, layer: u8, fragment: bool) -> (Handle, Handle) {
        let serial = self.next_serial();
        (
            self.handle(Kind::Network, layer, serial, fragment),
            self.handle(Kind::Set, layer, serial, fragment),
        )
    }

    /// Writes `records` to a new segment file.
    pub fn save_new<T: Record>(&self, layer: u8, kind: Kind, records: &[T]) -> Result<Handle> {
        let handle = self.handle(kind, layer, self.next_serial(), false);
        self.save(&handle, records)?;
        Ok(handle)
    }

    /// Writes `records` to the segment, replacing its previous content.
    pub fn save<T: Record>(&self, handle: &Handle, records: &[T]) -> Result<()> {
        let count = i32::try_from(records.len()).map_err(|_| Error::Corrupt {
            handle: handle.name(),
            reason: format!("{} records do not fit the count header", records.len()),
        })?;

        let io_err = |e: io::Error| Error::io(&handle.path, e);
        let file = File::create(&handle.path).map_err(io_err)?;
        let mut w = BufWriter::new(file);
        w.write_all(&count.to_le_bytes()).map_err(io_err)?;
        for r in records {
            r.write_to(&mut w).map_err(io_err)?;
        }
        w.flush().map_err(io_err)?;

        self.counters.increment(Counter::FileWrites);
        debug!("saved {} records to {}", count, handle);
        Ok(())
    }

    /// Reads the segment into the front of `dest` and returns the number of
    /// records read.
    pub fn load<T: Record>(&self, handle: &Handle, dest: &mut [T]) -> Result<usize> {
        let file = File::open(&handle.path).map_err(|e| Error::io(&handle.path, e))?;
        let mut r = BufReader::new(file);

        let count = record::read_i32(&mut r).map_err(|e| self.read_error(handle, e))?;
        let count = usize::try_from(count).map_err(|_| Error::Corrupt {
            handle: handle.name(),
            reason: format!("negative record count {}", count),
        })?;
        if count > dest.len() {
            return Err(Error::Corrupt {
                handle: handle.name(),
                reason: format!("{} records exceed buffer capacity {}", count, dest.len()),
            });
        }
        for slot in dest[..count].iter_mut() {
            slot.read_from(&mut r).map_err(|e| self.read_error(handle, e))?;
        }

        self.counters.increment(Counter::FileReads);
        Ok(count)
    }

    /// Number of records in the segment, read from its header.
    pub fn count(&self, handle: &Handle) -> Result<usize> {
        let file = File::open(&handle.path).map_err(|e| Error::io(&handle.path, e))?;
        let count = record::read_i32(&mut BufReader::new(file))
            .map_err(|e| self.read_error(handle, e))?;
        usize::try_from(count).map_err(|_| Error::Corrupt {
            handle: handle.name(),
            reason: format!("negative record count {}", count),
        })
    }

    pub fn remove(&self, handle: &Handle) -> Result<()> {
        fs::remove_file(&handle.path).map_err(|e| Error::io(&handle.path, e))
    }

    fn read_error(&self, handle: &Handle, e: io::Error) -> Error {
        match e.kind() {
            io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => Error::Corrupt {
                handle: handle.name(),
                reason: e.to_string(),
            },
            _ => Error::io(&handle.path, e),
        }
    }
}

impl Drop for Storage {
    fn drop(&mut self) {
        if !self.finished {
            warn!("leaving {} for recovery", self.root.display());
            return;
        }
        if self.keep {
            return;
        }
        if let Err(e) = fs::remove_dir_all(&self.root) {
            warn!("could not remove {}: {}", self.root.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::Comparator;
    use crate::network::Network;
    use crate::sequence::Domain;
    use crate::set::OutputSet;

    fn open(dir: &Path, n: u8) -> Storage {
        Storage::open(dir, n, false, Arc::new(Counters::new())).unwrap()
    }

    fn networks(n: u8, count: usize) -> Vec<Network> {
        (0..count)
            .map(|i| {
                let mut network = Network::new(n, 2);
                network.id = i as u64 + 1;
                network.push_back(Comparator::new(1, 0)).unwrap();
                network
            })
            .collect()
    }

    #[test]
    fn test_file_names() {
        let dir = tempfile::tempdir().unwrap();
        let storage = open(dir.path(), 4);
        let (nets, sets) = storage.new_pair(3, false);
        assert_eq!(nets.name(), "n4-003-0000000.gnp");
        assert_eq!(sets.name(), "o4-003-0000000.gnp");
        let (nets, _) = storage.new_pair(12, true);
        assert_eq!(nets.name(), "fn4-012-0000001.gnp");
        assert_eq!(nets.layer(), 12);
        assert_eq!(nets.kind(), Kind::Network);
    }

    #[test]
    fn test_save_load_networks() {
        let dir = tempfile::tempdir().unwrap();
        let storage = open(dir.path(), 3);
        let written = networks(3, 5);
        let handle = storage.save_new(1, Kind::Network, &written).unwrap();
        assert_eq!(storage.count(&handle).unwrap(), 5);

        let mut dest = vec![Network::new(3, 2); 8];
        let count = storage.load(&handle, &mut dest).unwrap();
        assert_eq!(count, 5);
        assert_eq!(&dest[..5], &written[..]);
        assert_eq!(storage.counters.get(Counter::FileReads), 1);
        assert_eq!(storage.counters.get(Counter::FileWrites), 1);
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let storage = open(dir.path(), 4);
        let domain = Domain::new(4).unwrap();
        let (_, handle) = storage.new_pair(0, false);

        let full = OutputSet::full(&domain);
        storage.save(&handle, &[full.clone(), full.clone()]).unwrap();
        storage.save(&handle, &[full.clone()]).unwrap();

        let mut dest = vec![OutputSet::new(4); 2];
        assert_eq!(storage.load(&handle, &mut dest).unwrap(), 1);
        assert_eq!(dest[0], full);
    }

    #[test]
    fn test_load_rejects_small_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let storage = open(dir.path(), 3);
        let handle = storage.save_new(1, Kind::Network, &networks(3, 4)).unwrap();
        let mut dest = vec![Network::new(3, 2); 2];
        assert!(matches!(
            storage.load(&handle, &mut dest),
            Err(Error::Corrupt { .. })
        ));
    }

    #[test]
    fn test_load_truncated_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let storage = open(dir.path(), 3);
        let handle = storage.save_new(1, Kind::Network, &networks(3, 2)).unwrap();
        let bytes = fs::read(handle.path()).unwrap();
        fs::write(handle.path(), &bytes[..bytes.len() - 3]).unwrap();

        let mut dest = vec![Network::new(3, 2); 2];
        assert!(matches!(
            storage.load(&handle, &mut dest),
            Err(Error::Corrupt { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = open(dir.path(), 3);
        let handle = storage.save_new(1, Kind::Network, &networks(3, 1)).unwrap();
        storage.remove(&handle).unwrap();
        assert!(matches!(storage.count(&handle), Err(Error::Io { .. })));
    }

    #[test]
    fn test_open_clears_and_finished_drop_removes() {
        let dir = tempfile::tempdir().unwrap();
        let root = {
            let storage = open(dir.path(), 3);
            storage.save_new(1, Kind::Network, &networks(3, 1)).unwrap();
            let mut again = open(dir.path(), 3);
            assert_eq!(fs::read_dir(again.root()).unwrap().count(), 0);
            again.finish();
            again.root().to_path_buf()
        };
        assert!(!root.exists());
    }

    #[test]
    fn test_unfinished_drop_keeps_segments() {
        let dir = tempfile::tempdir().unwrap();
        let handle = {
            let storage = open(dir.path(), 3);
            storage.save_new(2, Kind::Network, &networks(3, 2)).unwrap()
        };
        assert!(handle.path().exists());

        let reopened = open(dir.path(), 3);
        assert!(!handle.path().exists());
        drop(reopened);
    }
}
