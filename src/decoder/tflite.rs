//! Raw `.tflite` flatbuffer, embedded byte for byte.

use std::fs;
use std::path::Path;

use super::hex_literals;
use crate::error::Result;
use crate::model::DecodedArray;

pub fn decode(path: &Path) -> Result<DecodedArray> {
    let buffer = fs::read(path)?;
    Ok(DecodedArray {
        count: buffer.len(),
        literals: hex_literals(&buffer),
    })
}
