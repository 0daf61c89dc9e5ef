//! ES8156 DAC driver module (Everest Semiconductor)
//!
//! Output-only stereo DAC with 0.5 dB-step digital volume and a mute bit.

pub mod registers;

mod driver;

pub use driver::{Es8156, Es8156Config};
