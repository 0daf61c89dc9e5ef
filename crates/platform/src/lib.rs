//! Driver traits and shared types for audio codec devices
//!
//! This crate is the layer every codec driver and every codec session
//! builds on. It has no opinion about which chip or bus is in use.
//!
//! # Architecture Layers
//!
//! ```text
//! Application
//!         ↓
//! codec-dev (CodecDevice session, SoftwareGain, chip drivers)
//!         ↓
//! codec-platform (this crate - traits, types, volume math)
//!         ↓
//! Bus HAL (embedded-hal I2C, embedded-io PCM transport)
//! ```
//!
//! # Contents
//!
//! - [`AudioCodec`] - Codec chip control (capability-based)
//! - [`DataPath`] - PCM transport between host and codec
//! - [`GpioProvider`] - Pin control for PA power gating
//! - [`volume`] - Volume curve and dB/register conversion
//! - [`CodecError`] - Error taxonomy shared by all of the above
//!
//! # Features
//!
//! - `std`: `std::error::Error` impls and the [`mocks`] module
//! - `defmt`: `defmt::Format` derives on all public types
//!
//! # Example
//!
//! ```
//! use codec_platform::{VolumeCurve, SILENCE_DB};
//!
//! let curve = VolumeCurve::default();
//! assert_eq!(curve.db_from_volume(0), SILENCE_DB);
//! assert_eq!(curve.db_from_volume(100), 0.0);
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
// Pedantic lints suppressed for this HAL crate:
#![allow(clippy::doc_markdown)] // hex addresses and register names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors - callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

#[cfg(feature = "std")]
extern crate std;

pub mod audio_types;
pub mod codec;
pub mod data_path;
pub mod error;
pub mod gpio;
pub mod volume;

#[cfg(any(test, feature = "std"))]
pub mod mocks;

pub use audio_types::{DeviceType, I2cAddr, SampleInfo};
pub use codec::{AudioCodec, CodecCaps, NoCodec};
pub use data_path::{DataCaps, DataPath, IoDataPath};
pub use error::CodecError;
pub use gpio::{set_pa_power, GpioDirection, GpioMode, GpioProvider, NoGpio};
pub use volume::{VolMapPoint, VolRange, VolumeCurve, MAX_CURVE_POINTS, SILENCE_DB};
