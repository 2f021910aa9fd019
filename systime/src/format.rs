//! Rendering of elapsed time as `HHH:MM:SS.mmm`.


use core::fmt;
use core::ops::Deref;

use crate::tick::Millis;


/// The number of visible characters in a [`Timestamp`].
pub const TIMESTAMP_LEN: usize = 13;

const MS_PER_SECOND: Millis = 1_000;
const MS_PER_MINUTE: Millis = 60 * MS_PER_SECOND;
const MS_PER_HOUR: Millis = 60 * MS_PER_MINUTE;


/// Elapsed time rendered as `HHH:MM:SS.mmm`.
///
/// Every field is zero-padded to its width. The hour field only has room for three digits; from
/// 1000 hours onward, it shows the hour count modulo 1000 (the 32-bit millisecond counter itself
/// wraps at 1193 hours).
///
/// The text is followed by a NUL byte for transports that expect C strings; see
/// [`as_bytes_with_nul`](Timestamp::as_bytes_with_nul).
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Timestamp {
    // always ASCII
    text: [u8; TIMESTAMP_LEN + 1],
}
impl Timestamp {
    /// Renders the given number of milliseconds.
    pub const fn from_millis(elapsed_ms: Millis) -> Self {
        let milliseconds = elapsed_ms % MS_PER_SECOND;
        let seconds = (elapsed_ms / MS_PER_SECOND) % 60;
        let minutes = (elapsed_ms / MS_PER_MINUTE) % 60;
        let hours = elapsed_ms / MS_PER_HOUR;

        // HHH:MM:SS.mmm\0
        // 0123456789abc
        let text = [
            digit(hours, 100),
            digit(hours, 10),
            digit(hours, 1),
            b':',
            digit(minutes, 10),
            digit(minutes, 1),
            b':',
            digit(seconds, 10),
            digit(seconds, 1),
            b'.',
            digit(milliseconds, 100),
            digit(milliseconds, 10),
            digit(milliseconds, 1),
            0,
        ];
        Self { text }
    }

    /// The rendered text.
    pub fn as_str(&self) -> &str {
        // SAFETY: the buffer is built exclusively from ASCII digits and separators
        unsafe { core::str::from_utf8_unchecked(self.as_bytes()) }
    }

    /// The rendered text as bytes, without the terminating NUL.
    pub fn as_bytes(&self) -> &[u8] {
        &self.text[..TIMESTAMP_LEN]
    }

    /// The rendered text as bytes, including the terminating NUL.
    pub fn as_bytes_with_nul(&self) -> &[u8; TIMESTAMP_LEN + 1] {
        &self.text
    }
}
impl Deref for Timestamp {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}
impl AsRef<str> for Timestamp {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Timestamp")
            .field(&self.as_str())
            .finish()
    }
}
impl PartialEq<str> for Timestamp {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}
impl PartialEq<&str> for Timestamp {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}
impl From<Millis> for Timestamp {
    fn from(elapsed_ms: Millis) -> Self {
        Self::from_millis(elapsed_ms)
    }
}
#[cfg(feature = "defmt")]
impl defmt::Format for Timestamp {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{=str}", self.as_str());
    }
}


/// The decimal digit of `value` at position `place` (1, 10, 100, ...) as an ASCII character.
#[inline]
const fn digit(value: u32, place: u32) -> u8 {
    b'0' + ((value / place) % 10) as u8
}


/// Renders elapsed milliseconds as `HHH:MM:SS.mmm`.
///
/// Every call returns an independent value.
#[inline]
pub const fn format(elapsed_ms: Millis) -> Timestamp {
    Timestamp::from_millis(elapsed_ms)
}
