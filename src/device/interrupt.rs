//! External cancellation signal untuk writer yang sedang suspend

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Sesuatu yang bisa membangunkan semua writer yang menunggu di dalamnya
pub(crate) trait WakeAll: Send + Sync {
    fn wake_all(&self);
}

struct State {
    raised: AtomicBool,
    // Wait set tempat writer pemilik handle ini sedang parkir
    parked: Mutex<Option<Arc<dyn WakeAll>>>,
}

/// Interrupt handle untuk satu writer.
///
/// `raise()` membatalkan wait yang sedang berjalan (atau wait berikutnya)
/// dengan `Error::Interrupted`. Handle bisa di-clone dan di-raise dari
/// thread lain. Satu handle hanya memarkir satu writer pada satu waktu.
#[derive(Clone)]
pub struct Interrupt {
    state: Arc<State>,
}

impl Default for Interrupt {
    fn default() -> Self {
        Self::new()
    }
}

impl Interrupt {
    pub fn new() -> Self {
        Self {
            state: Arc::new(State {
                raised: AtomicBool::new(false),
                parked: Mutex::new(None),
            }),
        }
    }

    /// Tandai pending dan bangunkan writer yang sedang parkir
    pub fn raise(&self) {
        self.state.raised.store(true, Ordering::SeqCst);

        // Clone dulu, lock `parked` dilepas sebelum wake_all mengambil lock buffer
        let parked = self.state.parked.lock().clone();
        if let Some(waiters) = parked {
            waiters.wake_all();
        }
    }

    #[inline]
    pub fn is_raised(&self) -> bool {
        self.state.raised.load(Ordering::SeqCst)
    }

    /// Re-arm handle sebelum retry
    #[inline]
    pub fn clear(&self) {
        self.state.raised.store(false, Ordering::SeqCst);
    }

    // Harus dipanggil sebelum cek `is_raised()` pertama, supaya raise()
    // yang terjadi di antaranya tidak hilang.
    pub(crate) fn park(&self, waiters: Arc<dyn WakeAll>) {
        *self.state.parked.lock() = Some(waiters);
    }

    pub(crate) fn unpark(&self) {
        self.state.parked.lock().take();
    }
}

impl std::fmt::Debug for Interrupt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interrupt")
            .field("raised", &self.is_raised())
            .finish()
    }
}
