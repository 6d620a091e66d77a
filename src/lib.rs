//! ringdev - Bounded byte FIFO dengan device-style interface
//!
//! Arsitektur:
//! - `core`: ring buffer kapasitas tetap, heap atau mmap backing
//! - `device`: blocking writer, non-blocking reader, control channel
//!
//! ```no_run
//! use ringdev::{Device, Interrupt};
//!
//! let device = Device::with_capacity(32)?;
//! device.write(&[0xAAu8; 32][..], 32, &Interrupt::new())?;
//!
//! let mut out = [0u8; 10];
//! let n = device.read(&mut out[..], 10)?;
//! assert_eq!(n, 10);
//! # Ok::<(), ringdev::Error>(())
//! ```

pub mod config;
pub mod core;
pub mod device;
mod error;

pub use config::DeviceConfig;
pub use device::{ControlRequest, ControlResponse, Device, InfoReport, Interrupt};
pub use error::{Error, Result};
