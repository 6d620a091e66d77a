//! Device statistics
//!
//! Counter atomic Relaxed, tidak ikut critical section buffer.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct DeviceStats {
    reads: AtomicU64,
    writes: AtomicU64,
    bytes_read: AtomicU64,
    bytes_written: AtomicU64,
    writer_waits: AtomicU64,
    interrupts: AtomicU64,
    faults: AtomicU64,
    clears: AtomicU64,
    resizes: AtomicU64,
    bytes_discarded: AtomicU64,
}

/// Salinan counter pada satu titik waktu
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub reads: u64,
    pub writes: u64,
    pub bytes_read: u64,
    pub bytes_written: u64,
    pub writer_waits: u64,
    pub interrupts: u64,
    pub faults: u64,
    pub clears: u64,
    pub resizes: u64,
    pub bytes_discarded: u64,
}

impl DeviceStats {
    #[inline]
    pub(crate) fn record_read(&self, bytes: usize) {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.bytes_read.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_write(&self, bytes: usize) {
        self.writes.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_wait(&self) {
        self.writer_waits.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_interrupt(&self) {
        self.interrupts.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_fault(&self) {
        self.faults.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_clear(&self) {
        self.clears.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_resize(&self, discarded: usize) {
        self.resizes.fetch_add(1, Ordering::Relaxed);
        self.bytes_discarded.fetch_add(discarded as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            reads: self.reads.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
            writer_waits: self.writer_waits.load(Ordering::Relaxed),
            interrupts: self.interrupts.load(Ordering::Relaxed),
            faults: self.faults.load(Ordering::Relaxed),
            clears: self.clears.load(Ordering::Relaxed),
            resizes: self.resizes.load(Ordering::Relaxed),
            bytes_discarded: self.bytes_discarded.load(Ordering::Relaxed),
        }
    }
}

impl StatsSnapshot {
    pub fn print_stats(&self) {
        println!("\n📊 Device Stats");
        println!("   Reads:         {} ({} bytes)", self.reads, self.bytes_read);
        println!(
            "   Writes:        {} ({} bytes)",
            self.writes, self.bytes_written
        );
        println!("   Writer waits:  {}", self.writer_waits);
        println!("   Control:       {} clears, {} resizes", self.clears, self.resizes);
        if self.bytes_discarded > 0 {
            println!("   Discarded:     {} bytes ⚠️", self.bytes_discarded);
        }
        if self.interrupts > 0 || self.faults > 0 {
            println!(
                "   Errors:        {} interrupts, {} faults ⚠️",
                self.interrupts, self.faults
            );
        }
    }
}
