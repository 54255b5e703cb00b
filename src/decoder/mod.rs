//! Turns one input file into a flat `DecodedArray`.
//!
//! Dispatch happens once on `InputKind`; each submodule owns one container
//! format and nothing else.
pub mod csv;
pub mod npy;
pub mod png;
pub mod tflite;
pub mod wav;

use std::path::Path;

use crate::error::Result;
use crate::model::{DecodedArray, InputKind};

pub fn decode(path: &Path) -> Result<DecodedArray> {
    let kind = InputKind::from_path(path)?;
    decode_as(kind, path)
}

pub fn decode_as(kind: InputKind, path: &Path) -> Result<DecodedArray> {
    let decoded = match kind {
        InputKind::Model => tflite::decode(path)?,
        InputKind::Image => png::decode(path)?,
        InputKind::Audio => wav::decode(path)?,
        InputKind::Csv => csv::decode(path)?,
        InputKind::Npy => npy::decode(path)?,
    };
    tracing::debug!(
        input = %path.display(),
        ?kind,
        count = decoded.count,
        "decoded input"
    );
    Ok(decoded)
}

/// `0x<hex>` for every byte, lowercase, no padding.
pub fn hex_literals(bytes: &[u8]) -> String {
    join(bytes.iter().map(|b| format!("{b:#x}")))
}

/// Shortest round-tripping `f32` text with a `.0` or an exponent (`1.0`,
/// `0.003921569`). Exponents carry no zero padding, so `1e-5` comes out where
/// numpy prints `1e-05`; both are valid C++ float literals.
pub fn float_literals(values: &[f32]) -> String {
    join(values.iter().map(|v| format!("{v:?}")))
}

pub fn int_literals<T: ToString>(values: &[T]) -> String {
    join(values.iter().map(ToString::to_string))
}

fn join<I: Iterator<Item = String>>(items: I) -> String {
    items.collect::<Vec<_>>().join(",")
}
