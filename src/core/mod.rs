//! Core module: Bounded byte ring buffer
//!
//! Prinsip desain:
//! - Bulk copy: enqueue/dequeue memindahkan sebanyak mungkin bytes sekaligus
//! - All-or-nothing: copy yang fault tidak mengubah state buffer
//! - No-Allocation: storage hanya dialokasi saat create dan resize

pub mod copy;
mod ring_buffer;
mod storage;

pub use copy::{CopySink, CopySource, Fault};
pub use ring_buffer::RingBuffer;
pub use storage::{Backing, Storage};
