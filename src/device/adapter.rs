//! Device Adapter
//!
//! Memetakan read/write/control ke ring buffer:
//! - Read: non-blocking, bangunkan writer jika ada bytes yang terbaca
//! - Write: suspend selama buffer penuh (interruptible), lalu tulis sebanyak ruang tersedia
//! - Control: clear, query info, resize (drain, reallocate, refill)
//!
//! Storage, kapasitas, dan occupancy berada dalam satu critical section
//! (`Mutex<RingBuffer>`). Resize memegang lock itu dari awal sampai akhir,
//! jadi reader/writer hanya melihat buffer sebelum atau sesudah resize.

use parking_lot::{Condvar, Mutex, MutexGuard};
use std::sync::Arc;

use super::control::{ControlRequest, ControlResponse, InfoReport};
use super::interrupt::{Interrupt, WakeAll};
use super::stats::{DeviceStats, StatsSnapshot};
use crate::config::DeviceConfig;
use crate::core::{CopySink, CopySource, RingBuffer};
use crate::{Error, Result};

struct Shared {
    ring: Mutex<RingBuffer>,
    // Wait set untuk predicate "buffer tidak penuh"
    not_full: Condvar,
    stats: DeviceStats,
}

impl WakeAll for Shared {
    fn wake_all(&self) {
        // Ambil lock supaya notify tidak jatuh di antara cek predicate dan wait
        let _ring = self.ring.lock();
        self.not_full.notify_all();
    }
}

/// Handle ke satu device instance.
///
/// Clone murah (Arc), semua clone berbagi buffer yang sama.
/// Diasumsikan satu writer dan satu reader logis; dengan banyak writer
/// tidak ada jaminan fairness, writer bisa kalah terus selama reader
/// tidak drain cukup cepat.
#[derive(Clone)]
pub struct Device {
    name: Arc<str>,
    shared: Arc<Shared>,
}

impl Device {
    /// Inisialisasi device. Jika alokasi buffer gagal, device tidak pernah ada.
    pub fn new(config: DeviceConfig) -> Result<Self> {
        config.validate()?;

        let ring = RingBuffer::with_backing(config.capacity, config.backing).map_err(|e| {
            tracing::error!(device = %config.name, error = %e, "ring buffer allocation failed");
            e
        })?;

        tracing::info!(
            device = %config.name,
            capacity = config.capacity,
            backing = ?config.backing,
            "device initialized"
        );

        Ok(Self {
            name: Arc::from(config.name),
            shared: Arc::new(Shared {
                ring: Mutex::new(ring),
                not_full: Condvar::new(),
                stats: DeviceStats::default(),
            }),
        })
    }

    /// Device dengan config default dan kapasitas tertentu
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::new(DeviceConfig::default().with_capacity(capacity))
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.shared.stats.snapshot()
    }

    /// Baca hingga `max_len` bytes ke `dst`. Tidak pernah block;
    /// returns 0 jika buffer kosong.
    pub fn read<D: CopySink + ?Sized>(&self, dst: &mut D, max_len: usize) -> Result<usize> {
        let result = self.shared.ring.lock().dequeue(dst, max_len);

        let n = match result {
            Ok(n) => n,
            Err(e) => {
                self.shared.stats.record_fault();
                tracing::error!(device = %self.name, error = %e, "read failed to copy to caller");
                return Err(e);
            }
        };

        self.shared.stats.record_read(n);
        tracing::debug!(device = %self.name, bytes = n, "read");

        if n > 0 {
            // Ada ruang baru, writer harus cek ulang predicate
            self.shared.not_full.notify_all();
        }
        Ok(n)
    }

    /// Tulis hingga `max_len` bytes dari `src`.
    ///
    /// Suspend selama buffer penuh. `interrupt.raise()` membatalkan wait dengan
    /// `Error::Interrupted` tanpa menulis apapun. Setelah bangun, jumlah yang
    /// ditulis dibatasi ruang yang tersedia saat itu.
    pub fn write<S: CopySource + ?Sized>(
        &self,
        src: &S,
        max_len: usize,
        interrupt: &Interrupt,
    ) -> Result<usize> {
        if max_len.min(src.len()) == 0 {
            return Ok(0);
        }

        let mut ring = self.shared.ring.lock();

        if ring.is_full() {
            let waiters: Arc<dyn WakeAll> = self.shared.clone();
            interrupt.park(waiters);
            let waited = self.wait_not_full(&mut ring, interrupt);
            interrupt.unpark();
            waited?;
            tracing::debug!(
                device = %self.name,
                available = ring.available(),
                "writer woken, space available"
            );
        }

        let n = match ring.enqueue(src, max_len) {
            Ok(n) => n,
            Err(e) => {
                self.shared.stats.record_fault();
                tracing::error!(device = %self.name, error = %e, "write failed to copy from caller");
                return Err(e);
            }
        };
        drop(ring);

        self.shared.stats.record_write(n);
        tracing::debug!(device = %self.name, bytes = n, "write");
        Ok(n)
    }

    // Wake hanya advisory: predicate selalu dicek ulang di bawah lock.
    fn wait_not_full(
        &self,
        ring: &mut MutexGuard<'_, RingBuffer>,
        interrupt: &Interrupt,
    ) -> Result<()> {
        while ring.is_full() {
            if interrupt.is_raised() {
                self.shared.stats.record_interrupt();
                tracing::warn!(device = %self.name, "write woken by interrupt");
                return Err(Error::Interrupted);
            }

            self.shared.stats.record_wait();
            tracing::trace!(device = %self.name, "writer suspended, buffer full");
            self.shared.not_full.wait(ring);
        }
        Ok(())
    }

    /// Dispatch control request
    pub fn control(&self, request: ControlRequest) -> Result<ControlResponse> {
        match request {
            ControlRequest::Clear => {
                self.clear();
                Ok(ControlResponse::Cleared)
            }
            ControlRequest::QueryInfo => Ok(ControlResponse::Info(self.info())),
            ControlRequest::Resize(new_capacity) => self.resize(new_capacity),
        }
    }

    /// Control call dengan command code mentah
    pub fn ioctl(&self, cmd: u32, arg: i64) -> Result<ControlResponse> {
        let request = ControlRequest::from_raw(cmd, arg).map_err(|e| {
            tracing::error!(device = %self.name, cmd, "unsupported control command");
            e
        })?;
        self.control(request)
    }

    /// Buang semua data. Selalu sukses.
    pub fn clear(&self) {
        self.shared.ring.lock().reset();
        self.shared.stats.record_clear();
        tracing::info!(device = %self.name, "buffer cleared");

        self.shared.not_full.notify_all();
    }

    /// Snapshot `{size, length, avail}`
    pub fn info(&self) -> InfoReport {
        let ring = self.shared.ring.lock();
        let info = InfoReport {
            size: ring.capacity(),
            length: ring.occupied(),
            avail: ring.available(),
        };
        drop(ring);

        tracing::info!(device = %self.name, %info, "buffer info");
        info
    }

    /// Ganti kapasitas dengan mempertahankan data.
    ///
    /// Jika `new_capacity` lebih kecil dari occupancy, hanya `new_capacity`
    /// bytes tertua yang dipertahankan; sisanya dibuang permanen dan
    /// dilaporkan di `ControlResponse::Resized::discarded`.
    ///
    /// Gagal dengan `InvalidArgument` untuk kapasitas <= 0, atau
    /// `Allocation` jika storage baru tidak bisa dialokasi. Pada kedua kasus
    /// buffer lama tidak berubah.
    pub fn resize(&self, new_capacity: i64) -> Result<ControlResponse> {
        let capacity = usize::try_from(new_capacity)
            .ok()
            .filter(|&c| c > 0)
            .ok_or_else(|| {
                tracing::error!(device = %self.name, new_capacity, "invalid resize capacity");
                Error::invalid(format!(
                    "resize capacity must be positive, got {new_capacity}"
                ))
            })?;

        let mut ring = self.shared.ring.lock();

        // Storage baru dialokasi sebelum buffer lama disentuh
        let mut fresh = RingBuffer::with_backing(capacity, ring.backing())?;

        let old_len = ring.occupied();
        let mut holding = Vec::new();
        holding
            .try_reserve_exact(old_len)
            .map_err(|e| Error::Allocation {
                requested: old_len,
                source: std::io::Error::new(std::io::ErrorKind::OutOfMemory, e),
            })?;
        holding.resize(old_len, 0u8);

        // Full drain, all-or-nothing
        let drained = ring.dequeue(&mut holding[..], old_len)?;
        if drained != old_len {
            return Err(Error::IoFault { offset: drained });
        }

        // Enqueue hanya menulis yang muat, sisanya terbuang
        let retained = fresh.enqueue(&holding[..], old_len)?;
        let discarded = old_len - retained;

        let old = std::mem::replace(&mut *ring, fresh);
        drop(ring);
        old.destroy();

        self.shared.stats.record_resize(discarded);
        if discarded > 0 {
            tracing::warn!(
                device = %self.name,
                capacity,
                discarded,
                "resize truncated buffered data"
            );
        }
        tracing::info!(device = %self.name, capacity, retained, "buffer resized");

        self.shared.not_full.notify_all();

        Ok(ControlResponse::Resized {
            capacity,
            retained,
            discarded,
        })
    }

    /// Teardown device. Storage dibebaskan saat handle terakhir dilepas.
    pub fn teardown(self) {
        let name = self.name;
        match Arc::try_unwrap(self.shared) {
            Ok(shared) => {
                shared.ring.into_inner().destroy();
                tracing::info!(device = %name, "device destroyed");
            }
            Err(_) => {
                tracing::debug!(device = %name, "handle released, device still in use");
            }
        }
    }
}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device")
            .field("name", &self.name)
            .field("ring", &*self.shared.ring.lock())
            .finish()
    }
}
