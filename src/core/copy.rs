//! Copy primitive antara ring buffer dan buffer milik caller
//!
//! Buffer caller diperlakukan opaque: bisa berupa slice biasa,
//! atau region yang aksesnya bisa gagal di tengah jalan.

/// Akses ke buffer caller gagal pada offset tertentu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fault {
    pub offset: usize,
}

impl From<Fault> for crate::Error {
    fn from(fault: Fault) -> Self {
        crate::Error::IoFault {
            offset: fault.offset,
        }
    }
}

/// Sumber bytes untuk enqueue (sisi writer)
pub trait CopySource {
    /// Jumlah bytes yang bisa dibaca dari sumber
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy `dst.len()` bytes mulai dari `offset` ke `dst`
    fn copy_out(&self, offset: usize, dst: &mut [u8]) -> Result<(), Fault>;
}

/// Tujuan bytes untuk dequeue (sisi reader)
pub trait CopySink {
    /// Jumlah bytes yang bisa ditulis ke tujuan
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy `src` ke tujuan mulai dari `offset`
    fn copy_in(&mut self, offset: usize, src: &[u8]) -> Result<(), Fault>;
}

impl CopySource for [u8] {
    #[inline(always)]
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }

    #[inline(always)]
    fn copy_out(&self, offset: usize, dst: &mut [u8]) -> Result<(), Fault> {
        let end = offset + dst.len();
        let src = self.get(offset..end).ok_or(Fault {
            offset: offset.min(<[u8]>::len(self)),
        })?;
        dst.copy_from_slice(src);
        Ok(())
    }
}

impl CopySource for Vec<u8> {
    #[inline(always)]
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    #[inline(always)]
    fn copy_out(&self, offset: usize, dst: &mut [u8]) -> Result<(), Fault> {
        self.as_slice().copy_out(offset, dst)
    }
}

impl CopySink for [u8] {
    #[inline(always)]
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }

    #[inline(always)]
    fn copy_in(&mut self, offset: usize, src: &[u8]) -> Result<(), Fault> {
        let total = <[u8]>::len(self);
        let dst = self.get_mut(offset..offset + src.len()).ok_or(Fault {
            offset: offset.min(total),
        })?;
        dst.copy_from_slice(src);
        Ok(())
    }
}

impl CopySink for Vec<u8> {
    #[inline(always)]
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    #[inline(always)]
    fn copy_in(&mut self, offset: usize, src: &[u8]) -> Result<(), Fault> {
        self.as_mut_slice().copy_in(offset, src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_source_bounds() {
        let src = [1u8, 2, 3, 4];
        let mut dst = [0u8; 2];
        src[..].copy_out(1, &mut dst).unwrap();
        assert_eq!(dst, [2, 3]);

        let mut big = [0u8; 3];
        assert_eq!(src[..].copy_out(2, &mut big), Err(Fault { offset: 2 }));
    }

    #[test]
    fn test_slice_sink_bounds() {
        let mut dst = [0u8; 4];
        dst[..].copy_in(2, &[9, 9]).unwrap();
        assert_eq!(dst, [0, 0, 9, 9]);
        assert!(dst[..].copy_in(3, &[1, 1]).is_err());
    }

    #[test]
    fn test_fault_into_error() {
        let err: crate::Error = Fault { offset: 5 }.into();
        assert!(matches!(err, crate::Error::IoFault { offset: 5 }));
    }
}
