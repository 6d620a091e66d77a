//! Control channel: request out-of-band di luar read/write

use crate::{Error, Result};

// Command codes: magic di byte kedua, nomor perintah di byte pertama
const CMD_MAGIC: u32 = b'x' as u32;

pub const CMD_CLEAR: u32 = (CMD_MAGIC << 8) | 0x01;
pub const CMD_INFO: u32 = (CMD_MAGIC << 8) | 0x02;
pub const CMD_RESIZE: u32 = (CMD_MAGIC << 8) | 0x03;

/// Request yang dikonsumsi secara sinkron oleh device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlRequest {
    /// Buang semua data, occupancy jadi 0
    Clear,
    /// Snapshot kapasitas dan occupancy
    QueryInfo,
    /// Ganti kapasitas. Argumen signed sesuai yang datang dari caller,
    /// validasi (> 0) dilakukan oleh device.
    Resize(i64),
}

impl ControlRequest {
    /// Decode command code + argumen mentah.
    ///
    /// Argumen hanya dipakai oleh `CMD_RESIZE`.
    pub fn from_raw(cmd: u32, arg: i64) -> Result<Self> {
        match cmd {
            CMD_CLEAR => Ok(ControlRequest::Clear),
            CMD_INFO => Ok(ControlRequest::QueryInfo),
            CMD_RESIZE => Ok(ControlRequest::Resize(arg)),
            other => Err(Error::invalid(format!(
                "unsupported control command {other:#06x}"
            ))),
        }
    }

    #[inline]
    pub fn command(&self) -> u32 {
        match self {
            ControlRequest::Clear => CMD_CLEAR,
            ControlRequest::QueryInfo => CMD_INFO,
            ControlRequest::Resize(_) => CMD_RESIZE,
        }
    }
}

/// Point-in-time snapshot dari buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfoReport {
    /// Kapasitas
    pub size: usize,
    /// Occupancy
    pub length: usize,
    pub avail: usize,
}

impl std::fmt::Display for InfoReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "size={}, filled={}, empty={}",
            self.size, self.length, self.avail
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlResponse {
    Cleared,
    Info(InfoReport),
    /// `discarded` > 0 berarti kapasitas baru lebih kecil dari occupancy
    /// lama dan bytes terbaru dibuang.
    Resized {
        capacity: usize,
        retained: usize,
        discarded: usize,
    },
}
