//! Error taxonomy shared by codec devices and their drivers.
//!
//! Every fallible operation in this workspace returns `Result<T, CodecError>`.
//! Driver errors are passed through unchanged, so a caller can always tell
//! "try again after opening" ([`CodecError::WrongState`]) apart from "this
//! device will never do that" ([`CodecError::NotSupported`]).

/// Codec device error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodecError {
    /// Generic failure reported by a hardware or data-path driver.
    Driver,
    /// Invalid argument (empty buffer, malformed curve, bad format).
    InvalidArg,
    /// Storage for the request could not be reserved.
    NoMemory,
    /// Direction or capability is absent on this device.
    NotSupported,
    /// Operation requires an open/not-open precondition that is unmet.
    WrongState,
    /// Bus or transport write failed.
    WriteFail,
    /// Bus or transport read failed.
    ReadFail,
}

impl CodecError {
    /// Negative status code for C-style callers.
    ///
    /// | Variant        | Code |
    /// |----------------|------|
    /// | `Driver`       | -1   |
    /// | `InvalidArg`   | -2   |
    /// | `NoMemory`     | -3   |
    /// | `NotSupported` | -4   |
    /// | `WrongState`   | -6   |
    /// | `WriteFail`    | -7   |
    /// | `ReadFail`     | -8   |
    pub const fn code(self) -> i32 {
        match self {
            Self::Driver => -1,
            Self::InvalidArg => -2,
            Self::NoMemory => -3,
            Self::NotSupported => -4,
            Self::WrongState => -6,
            Self::WriteFail => -7,
            Self::ReadFail => -8,
        }
    }

    /// Map a status code back to an error.
    ///
    /// Returns `None` for non-negative codes (success). Unknown negative codes
    /// collapse to [`CodecError::Driver`].
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            c if c >= 0 => None,
            -2 => Some(Self::InvalidArg),
            -3 => Some(Self::NoMemory),
            -4 => Some(Self::NotSupported),
            -6 => Some(Self::WrongState),
            -7 => Some(Self::WriteFail),
            -8 => Some(Self::ReadFail),
            _ => Some(Self::Driver),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CodecError {}

impl core::fmt::Display for CodecError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Driver => write!(f, "Codec driver error"),
            Self::InvalidArg => write!(f, "Invalid argument"),
            Self::NoMemory => write!(f, "Out of memory"),
            Self::NotSupported => write!(f, "Operation not supported by this device"),
            Self::WrongState => write!(f, "Device in wrong state for this operation"),
            Self::WriteFail => write!(f, "Write to codec failed"),
            Self::ReadFail => write!(f, "Read from codec failed"),
        }
    }
}
