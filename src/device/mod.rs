//! Device layer: read/write/control di atas ring buffer
//!
//! Fitur:
//! - Writer block selama buffer penuh, dibangunkan oleh read yang sukses
//! - Interruptible wait via `Interrupt`
//! - Control channel: clear, info, resize

mod adapter;
pub mod control;
mod interrupt;
mod stats;

pub use adapter::Device;
pub use control::{ControlRequest, ControlResponse, InfoReport};
pub use interrupt::Interrupt;
pub use stats::{DeviceStats, StatsSnapshot};
