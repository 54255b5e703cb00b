//! `.wav` → interleaved signed 16-bit samples.
//!
//! `count` is the number of frames, not samples. For multi-channel files the
//! literal list is `channels` times longer than `count`; consumers size their
//! buffers from the frame count, so this is kept as is.

use std::path::Path;

use hound::{SampleFormat, WavReader};

use super::int_literals;
use crate::error::Result;
use crate::model::DecodedArray;

pub fn decode(path: &Path) -> Result<DecodedArray> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(hound::Error::Unsupported.into());
    }

    let frames = reader.duration() as usize;
    let samples = reader
        .samples::<i16>()
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(DecodedArray {
        count: frames,
        literals: int_literals(&samples),
    })
}
