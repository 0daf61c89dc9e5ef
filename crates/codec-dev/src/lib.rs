//! Codec devices - session state machine, software volume, chip drivers
//!
//! # Example
//!
//! ```
//! use codec_dev::CodecDevice;
//! use codec_platform::{mocks::MockDataPath, DeviceType, SampleInfo};
//!
//! let mut dev = CodecDevice::without_codec(DeviceType::OUT, MockDataPath::new())?;
//! dev.open(&SampleInfo::default())?;
//! dev.set_out_volume(60)?;
//! let mut pcm = [0u8; 256];
//! assert_eq!(dev.write(&mut pcm)?, 256);
//! # Ok::<(), codec_platform::CodecError>(())
//! ```
//!
//! # Features
//!
//! - `std`: `std` support in `codec-platform`
//! - `defmt`: log through `defmt`
//! - `tracing`: log through `tracing`

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(unused_must_use)]
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

#[cfg(feature = "std")]
extern crate std;

pub(crate) mod log;

pub mod device;
pub mod drivers;
pub mod sw_volume;

pub use device::{CodecDevice, HwGain, DEFAULT_DAC_VOLTAGE, DEFAULT_PA_VOLTAGE};
pub use drivers::es8156::{Es8156, Es8156Config};
pub use sw_volume::{gain_from_db, SoftwareGain, DEFAULT_RAMP_MS, GAIN_SHIFT, UNITY_GAIN};
