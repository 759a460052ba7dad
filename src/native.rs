//! Status codes in the convention of the native Unicode library.
//!
//! Zero is success, negative values are warnings and positive values are
//! failures. A `BUFFER_OVERFLOW` failure carries the length the caller needs,
//! and `read_utf16_with_retry` grows the buffer and calls again.

use crate::error::{Error, Result};

/// A status code reported by a Unicode property provider call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NativeStatus(pub i32);

impl NativeStatus {
    /// No error.
    pub const ZERO_ERROR: NativeStatus = NativeStatus(0);
    /// An argument was out of range or otherwise unusable.
    pub const ILLEGAL_ARGUMENT: NativeStatus = NativeStatus(1);
    /// The requested data was not found.
    pub const MISSING_RESOURCE: NativeStatus = NativeStatus(2);
    /// The output buffer was too small; the reported length is the one needed.
    pub const BUFFER_OVERFLOW: NativeStatus = NativeStatus(15);
    /// The output exactly filled the buffer and has no terminator.
    pub const STRING_NOT_TERMINATED: NativeStatus = NativeStatus(-124);

    /// Whether this code signals failure.
    pub fn is_failure(self) -> bool {
        self.0 > 0
    }

    /// Converts a failure code into `Error::NativeLibrary`.
    pub fn check(self) -> Result<()> {
        if self.is_failure() {
            Err(Error::NativeLibrary(self.0))
        } else {
            Ok(())
        }
    }
}

/// Reads a UTF-16 string out of `fill`, growing the buffer once the callee
/// reports `BUFFER_OVERFLOW`.
///
/// `fill` writes into the buffer it is given and returns the full length of
/// the result together with a status.
pub fn read_utf16_with_retry<F>(initial_capacity: usize, mut fill: F) -> Result<String>
where
    F: FnMut(&mut [u16]) -> (usize, NativeStatus),
{
    let mut buf = vec![0u16; initial_capacity];
    loop {
        let (len, status) = fill(&mut buf);
        if status == NativeStatus::BUFFER_OVERFLOW && len > buf.len() {
            log::trace!("buffer of {} too small, retrying with {}", buf.len(), len);
            buf.resize(len, 0);
            continue;
        }
        status.check()?;
        return Ok(String::from_utf16_lossy(&buf[..len.min(buf.len())]));
    }
}

/// Copies `src` into `dst` as UTF-16, reporting overflow the way the native
/// library does.
pub fn copy_utf16_out(src: &str, dst: &mut [u16]) -> (usize, NativeStatus) {
    let units = src.encode_utf16().collect::<Vec<u16>>();
    if units.len() > dst.len() {
        return (units.len(), NativeStatus::BUFFER_OVERFLOW);
    }
    dst[..units.len()].copy_from_slice(&units);
    let status = if units.len() == dst.len() {
        NativeStatus::STRING_NOT_TERMINATED
    } else {
        NativeStatus::ZERO_ERROR
    };
    (units.len(), status)
}
