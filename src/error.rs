//! Error taxonomy untuk ring buffer dan device adapter
//!
//! Semua error diteruskan ke caller langsung, tidak ada retry internal.

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Alokasi storage gagal (create atau resize).
    /// Buffer lama, jika ada, tetap valid.
    #[error("failed to allocate {requested} bytes of storage: {source}")]
    Allocation {
        requested: usize,
        #[source]
        source: io::Error,
    },

    /// Kapasitas tidak valid atau control request tidak dikenal.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Akses ke buffer caller gagal di tengah copy.
    /// State buffer tidak berubah.
    #[error("caller buffer fault at offset {offset}")]
    IoFault { offset: usize },

    /// Writer yang sedang suspend dibatalkan oleh sinyal eksternal.
    #[error("interrupted while waiting for space, retry")]
    Interrupted,
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Hanya `Interrupted` yang aman di-retry tanpa mengubah request.
    #[inline]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Interrupted)
    }

    /// Negative errno yang akan dikembalikan oleh device ke syscall layer.
    #[cfg(unix)]
    pub fn errno(&self) -> i32 {
        match self {
            Error::Allocation { .. } => -libc::ENOMEM,
            Error::InvalidArgument(_) => -libc::EINVAL,
            Error::IoFault { .. } => -libc::EFAULT,
            // ERESTARTSYS is kernel-internal; EINTR is what user space sees.
            Error::Interrupted => -libc::EINTR,
        }
    }
}
