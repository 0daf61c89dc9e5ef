//! Codec chip drivers
//!
//! Each driver implements [`AudioCodec`](codec_platform::AudioCodec) over a
//! register bus and advertises the subset of operations its chip supports.

pub mod es8156;
