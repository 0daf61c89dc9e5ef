//! PCM data-path abstraction
//!
//! The data path carries bulk audio between host and codec (I2S, TDM, …),
//! separate from the low-bandwidth register control bus. An input-capable
//! device needs [`DataCaps::READ`], an output-capable one [`DataCaps::WRITE`].

use crate::audio_types::SampleInfo;
use crate::error::CodecError;

/// Set of operations implemented by a [`DataPath`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DataCaps(u8);

impl DataCaps {
    /// [`DataPath::read`]
    pub const READ: Self = Self(1 << 0);
    /// [`DataPath::write`]
    pub const WRITE: Self = Self(1 << 1);
    /// [`DataPath::set_format`]
    pub const SET_FORMAT: Self = Self(1 << 2);

    /// No operation.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// `true` if every flag in `other` is set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl core::ops::BitOr for DataCaps {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Bulk PCM transport between host and codec.
///
/// `read`/`write` block for as long as the transport blocks and return the
/// number of bytes transferred. Partial transfers are reported, not retried.
pub trait DataPath {
    /// Transport-specific configuration passed to [`DataPath::open`].
    type Config;

    /// Operations this transport implements.
    fn capabilities(&self) -> DataCaps;

    /// Claim the transport.
    fn open(&mut self, config: &Self::Config) -> Result<(), CodecError>;

    /// Whether the transport is usable.
    fn is_open(&self) -> bool {
        true
    }

    /// Reconfigure clocks/slots for a sample format.
    fn set_format(&mut self, _info: &SampleInfo) -> Result<(), CodecError> {
        Err(CodecError::NotSupported)
    }

    /// Receive PCM bytes into `buf`.
    fn read(&mut self, _buf: &mut [u8]) -> Result<usize, CodecError> {
        Err(CodecError::NotSupported)
    }

    /// Transmit PCM bytes from `buf`.
    fn write(&mut self, _buf: &[u8]) -> Result<usize, CodecError> {
        Err(CodecError::NotSupported)
    }

    /// Release the transport.
    fn close(&mut self) -> Result<(), CodecError> {
        Ok(())
    }
}

impl<T: DataPath + ?Sized> DataPath for &mut T {
    type Config = T::Config;

    fn capabilities(&self) -> DataCaps {
        T::capabilities(self)
    }

    fn open(&mut self, config: &Self::Config) -> Result<(), CodecError> {
        T::open(self, config)
    }

    fn is_open(&self) -> bool {
        T::is_open(self)
    }

    fn set_format(&mut self, info: &SampleInfo) -> Result<(), CodecError> {
        T::set_format(self, info)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, CodecError> {
        T::read(self, buf)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize, CodecError> {
        T::write(self, buf)
    }

    fn close(&mut self) -> Result<(), CodecError> {
        T::close(self)
    }
}

// ── embedded-io adapter ──────────────────────────────────────────────────────

/// [`DataPath`] over any blocking `embedded_io` byte stream.
///
/// Serial audio peripherals that expose `embedded_io::Read + Write`
/// (or a DMA ring wrapped as such) plug straight into a codec device.
pub struct IoDataPath<T> {
    io: T,
    open: bool,
    format: Option<SampleInfo>,
}

impl<T> IoDataPath<T>
where
    T: embedded_io::Read + embedded_io::Write,
{
    /// Wrap a transport. The path starts closed.
    pub fn new(io: T) -> Self {
        Self {
            io,
            open: false,
            format: None,
        }
    }

    /// Last format applied through [`DataPath::set_format`].
    pub fn format(&self) -> Option<SampleInfo> {
        self.format
    }

    /// Borrow the wrapped transport.
    pub fn inner(&self) -> &T {
        &self.io
    }

    /// Unwrap the transport.
    pub fn into_inner(self) -> T {
        self.io
    }
}

impl<T> DataPath for IoDataPath<T>
where
    T: embedded_io::Read + embedded_io::Write,
{
    type Config = ();

    fn capabilities(&self) -> DataCaps {
        DataCaps::READ | DataCaps::WRITE | DataCaps::SET_FORMAT
    }

    fn open(&mut self, _config: &()) -> Result<(), CodecError> {
        self.open = true;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn set_format(&mut self, info: &SampleInfo) -> Result<(), CodecError> {
        if !self.open {
            return Err(CodecError::WrongState);
        }
        self.format = Some(*info);
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, CodecError> {
        if !self.open {
            return Err(CodecError::WrongState);
        }
        self.io.read(buf).map_err(|_| CodecError::ReadFail)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize, CodecError> {
        if !self.open {
            return Err(CodecError::WrongState);
        }
        self.io.write(buf).map_err(|_| CodecError::WriteFail)
    }

    fn close(&mut self) -> Result<(), CodecError> {
        self.format = None;
        self.open = false;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;

    /// Fixed-size loopback: bytes written are read back in order.
    struct Loopback {
        buf: heapless::Deque<u8, 64>,
    }

    impl embedded_io::ErrorType for Loopback {
        type Error = embedded_io::ErrorKind;
    }

    impl embedded_io::Read for Loopback {
        fn read(&mut self, out: &mut [u8]) -> Result<usize, Self::Error> {
            let mut n = 0;
            for slot in out.iter_mut() {
                match self.buf.pop_front() {
                    Some(b) => {
                        *slot = b;
                        n += 1;
                    }
                    None => break,
                }
            }
            Ok(n)
        }
    }

    impl embedded_io::Write for Loopback {
        fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
            if self.buf.is_full() {
                return Err(embedded_io::ErrorKind::OutOfMemory);
            }
            let mut n = 0;
            for &b in data {
                if self.buf.push_back(b).is_err() {
                    break;
                }
                n += 1;
            }
            Ok(n)
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    fn loopback() -> IoDataPath<Loopback> {
        IoDataPath::new(Loopback {
            buf: heapless::Deque::new(),
        })
    }

    #[test]
    fn closed_path_rejects_io() {
        let mut path = loopback();
        assert!(!path.is_open());
        assert_eq!(path.write(&[1, 2]), Err(CodecError::WrongState));
        assert_eq!(path.read(&mut [0; 2]), Err(CodecError::WrongState));
    }

    #[test]
    fn write_then_read_round_trips_bytes() {
        let mut path = loopback();
        path.open(&()).unwrap();
        assert_eq!(path.write(&[10, 20, 30]).unwrap(), 3);
        let mut out = [0u8; 8];
        assert_eq!(path.read(&mut out).unwrap(), 3);
        assert_eq!(&out[..3], &[10, 20, 30]);
    }

    #[test]
    fn partial_write_is_reported() {
        let mut path = loopback();
        path.open(&()).unwrap();
        assert_eq!(path.write(&[0u8; 100]).unwrap(), 64);
    }

    #[test]
    fn transport_error_maps_to_write_fail() {
        let mut path = loopback();
        path.open(&()).unwrap();
        path.write(&[0u8; 64]).unwrap();
        assert_eq!(path.write(&[1]), Err(CodecError::WriteFail));
    }

    #[test]
    fn format_is_remembered_until_close() {
        let mut path = loopback();
        path.open(&()).unwrap();
        let info = SampleInfo::new(16, 1, 16_000);
        path.set_format(&info).unwrap();
        assert_eq!(path.format(), Some(info));
        path.close().unwrap();
        assert_eq!(path.format(), None);
        assert!(!path.is_open());
    }
}
