//! Bounded Byte Ring Buffer
//!
//! Circular byte store dengan kapasitas tetap. Enqueue/dequeue bersifat
//! bulk dan all-or-nothing terhadap fault: jika copy dari/ke buffer caller
//! gagal, posisi baca/tulis tidak berubah.
//!
//! Struktur ini sendiri tidak thread-safe. Eksklusi (satu lock untuk
//! storage, kapasitas, dan occupancy) disediakan oleh device adapter.

use super::copy::{CopySink, CopySource};
use super::storage::{Backing, Storage};
use crate::{Error, Result};

/// Fixed-capacity FIFO byte ring
pub struct RingBuffer {
    storage: Storage,
    // Posisi byte tertua yang belum dibaca
    head: usize,
    // Occupancy, selalu dalam [0, capacity]
    len: usize,
}

impl RingBuffer {
    /// Membuat ring buffer baru di heap
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_backing(capacity, Backing::Heap)
    }

    /// Membuat ring buffer dengan backing tertentu.
    ///
    /// Kapasitas dipakai persis seperti diminta, tidak dibulatkan
    /// ke power of 2.
    pub fn with_backing(capacity: usize, backing: Backing) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::invalid("capacity must be positive"));
        }

        Ok(Self {
            storage: Storage::allocate(capacity, backing)?,
            head: 0,
            len: 0,
        })
    }

    /// Buang semua data tanpa membebaskan storage
    #[inline]
    pub fn reset(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    /// Tulis `min(max_len, src.len(), available())` bytes dari `src`.
    ///
    /// Tidak pernah block. Returns 0 jika buffer penuh.
    pub fn enqueue<S: CopySource + ?Sized>(&mut self, src: &S, max_len: usize) -> Result<usize> {
        let n = max_len.min(src.len()).min(self.available());
        if n == 0 {
            return Ok(0);
        }

        let capacity = self.capacity();
        let tail = (self.head + self.len) % capacity;

        // Handle wraparound
        let first = n.min(capacity - tail);
        src.copy_out(0, &mut self.storage[tail..tail + first])?;
        if first < n {
            src.copy_out(first, &mut self.storage[..n - first])?;
        }

        // Commit hanya setelah seluruh copy sukses
        self.len += n;
        Ok(n)
    }

    /// Baca `min(max_len, dst.len(), occupied())` bytes ke `dst`.
    ///
    /// Tidak pernah block. Returns 0 jika buffer kosong.
    pub fn dequeue<D: CopySink + ?Sized>(&mut self, dst: &mut D, max_len: usize) -> Result<usize> {
        let n = max_len.min(dst.len()).min(self.len);
        if n == 0 {
            return Ok(0);
        }

        let capacity = self.capacity();
        let head = self.head;

        let first = n.min(capacity - head);
        dst.copy_in(0, &self.storage[head..head + first])?;
        if first < n {
            dst.copy_in(first, &self.storage[..n - first])?;
        }

        self.head = (head + n) % capacity;
        self.len -= n;
        Ok(n)
    }

    /// Jumlah bytes yang tersimpan
    #[inline(always)]
    pub fn occupied(&self) -> usize {
        self.len
    }

    /// Sisa ruang kosong
    #[inline(always)]
    pub fn available(&self) -> usize {
        self.capacity() - self.len
    }

    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    #[inline(always)]
    pub fn backing(&self) -> Backing {
        self.storage.backing()
    }

    /// Bebaskan storage. Ownership menjamin tidak ada operasi yang
    /// sedang berjalan saat ini dipanggil.
    pub fn destroy(self) {
        tracing::trace!(capacity = self.capacity(), "ring buffer storage released");
        drop(self);
    }
}

impl std::fmt::Debug for RingBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RingBuffer")
            .field("capacity", &self.capacity())
            .field("occupied", &self.len)
            .field("head", &self.head)
            .field("backing", &self.backing())
            .finish()
    }
}
