//! Contiguous byte storage untuk ring buffer
//!
//! Dua backing:
//! - Heap: alokasi fallible via `try_reserve_exact`, gagal jadi `Error::Allocation`
//! - Anonymous: mapping anonim via mmap, di luar heap allocator
//!
//! Storage hanya dialokasi saat create dan resize, tidak pernah di hot path.

use memmap2::MmapMut;
use std::io;
use std::ops::{Deref, DerefMut};

use crate::{Error, Result};

/// Asal memory untuk storage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Backing {
    #[default]
    Heap,
    /// Anonymous private memory mapping (MAP_ANONYMOUS | MAP_PRIVATE)
    Anonymous,
}

impl std::str::FromStr for Backing {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "heap" => Ok(Backing::Heap),
            "mmap" | "anon" | "anonymous" => Ok(Backing::Anonymous),
            other => Err(Error::invalid(format!("unknown backing `{other}`"))),
        }
    }
}

enum Region {
    Heap(Box<[u8]>),
    Mapped(MmapMut),
}

/// Byte region dengan panjang tetap
pub struct Storage {
    region: Region,
}

impl Storage {
    /// Alokasi region sebesar `len` bytes
    pub fn allocate(len: usize, backing: Backing) -> Result<Self> {
        let region = match backing {
            Backing::Heap => {
                let mut buf = Vec::new();
                buf.try_reserve_exact(len).map_err(|e| Error::Allocation {
                    requested: len,
                    source: io::Error::new(io::ErrorKind::OutOfMemory, e),
                })?;
                buf.resize(len, 0u8);
                Region::Heap(buf.into_boxed_slice())
            }
            Backing::Anonymous => {
                let mmap = MmapMut::map_anon(len).map_err(|source| Error::Allocation {
                    requested: len,
                    source,
                })?;
                Region::Mapped(mmap)
            }
        };

        Ok(Self { region })
    }

    #[inline(always)]
    pub fn backing(&self) -> Backing {
        match self.region {
            Region::Heap(_) => Backing::Heap,
            Region::Mapped(_) => Backing::Anonymous,
        }
    }
}

impl Deref for Storage {
    type Target = [u8];

    #[inline(always)]
    fn deref(&self) -> &[u8] {
        match &self.region {
            Region::Heap(buf) => &buf[..],
            Region::Mapped(mmap) => &mmap[..],
        }
    }
}

impl DerefMut for Storage {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut [u8] {
        match &mut self.region {
            Region::Heap(buf) => &mut buf[..],
            Region::Mapped(mmap) => &mut mmap[..],
        }
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("backing", &self.backing())
            .field("len", &self.len())
            .finish()
    }
}
