//! Fixed-layout binary encoding of segment records.
//!
//! All integers are little-endian.
//!
//! Network: `u64 id`, `u64 count`, then `count` pairs of `u8 from, u8 to`.
//!
//! Output set, with `c = n - 1` clusters: `u64 net_id`, `c × u32 ones`,
//! `c × u8 ones_count`, `c × u32 zeros`, `c × u8 zeros_count`,
//! `c × u32 sizes`, then `u64 count` and `count × u32` sequences.
//!
//! Records are decoded in place so that pooled buffers keep their allocations.

use std::io::{self, Read, Write};

use crate::comparator::Comparator;
use crate::metadata::Metadata;
use crate::network::Network;
use crate::sequence::{self, Sequence};
use crate::set::OutputSet;

pub trait Record {
    fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()>;

    /// Overwrites `self` with the next record of `r`.
    fn read_from<R: Read>(&mut self, r: &mut R) -> io::Result<()>;
}

fn invalid(msg: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg)
}

pub(crate) fn read_u8<R: Read>(r: &mut R) -> io::Result<u8> {
    let mut buf = [0; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

pub(crate) fn read_u32<R: Read>(r: &mut R) -> io::Result<u32> {
    let mut buf = [0; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

pub(crate) fn read_i32<R: Read>(r: &mut R) -> io::Result<i32> {
    let mut buf = [0; 4];
    r.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

pub(crate) fn read_u64<R: Read>(r: &mut R) -> io::Result<u64> {
    let mut buf = [0; 8];
    r.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

impl Record for Network {
    fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.id.to_le_bytes())?;
        w.write_all(&(self.len() as u64).to_le_bytes())?;
        for c in self.comparators() {
            w.write_all(&[c.from(), c.to()])?;
        }
        Ok(())
    }

    fn read_from<R: Read>(&mut self, r: &mut R) -> io::Result<()> {
        self.clear();
        self.id = read_u64(r)?;
        let count = read_u64(r)?;
        if count > self.capacity() as u64 {
            return Err(invalid(format!(
                "network {} has {} comparators, capacity is {}",
                self.id,
                count,
                self.capacity()
            )));
        }
        for _ in 0..count {
            let from = read_u8(r)?;
            let to = read_u8(r)?;
            self.push_back(Comparator::new(from, to))
                .map_err(|e| invalid(e.to_string()))?;
        }
        Ok(())
    }
}

impl Record for OutputSet {
    fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let meta = self.meta();
        w.write_all(&meta.net_id.to_le_bytes())?;
        for &v in &meta.ones {
            w.write_all(&v.to_le_bytes())?;
        }
        w.write_all(&meta.ones_count)?;
        for &v in &meta.zeros {
            w.write_all(&v.to_le_bytes())?;
        }
        w.write_all(&meta.zeros_count)?;
        for &v in &meta.sizes {
            w.write_all(&v.to_le_bytes())?;
        }
        w.write_all(&(self.len() as u64).to_le_bytes())?;
        for s in self.iter() {
            w.write_all(&s.to_le_bytes())?;
        }
        Ok(())
    }

    fn read_from<R: Read>(&mut self, r: &mut R) -> io::Result<()> {
        let clusters = self.n() as usize - 1;
        let mask = sequence::mask(self.n());
        let mut meta = Metadata::new(clusters);

        meta.net_id = read_u64(r)?;
        for v in meta.ones.iter_mut() {
            *v = read_u32(r)?;
        }
        r.read_exact(&mut meta.ones_count)?;
        for v in meta.zeros.iter_mut() {
            *v = read_u32(r)?;
        }
        r.read_exact(&mut meta.zeros_count)?;
        for v in meta.sizes.iter_mut() {
            *v = read_u32(r)?;
        }

        let count = read_u64(r)?;
        if count != meta.total() as u64 {
            return Err(invalid(format!(
                "set of network {} holds {} sequences, cluster sizes sum to {}",
                meta.net_id,
                count,
                meta.total()
            )));
        }
        let mut sequences: Vec<Sequence> = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let s = read_u32(r)?;
            if s == 0 || s >= mask {
                return Err(invalid(format!("sequence {:#b} out of range", s)));
            }
            sequences.push(s);
        }

        self.refill(meta, &sequences);
        Ok(())
    }
}
