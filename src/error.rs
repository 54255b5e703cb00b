use std::path::PathBuf;

use thiserror::Error;

use crate::decoder::npy::NpyError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("input file must be .tflite, .png, .wav, .npy or .csv: {}", .0.display())]
    UnsupportedInputFormat(PathBuf),

    /// A `.csv` whose stem carries none of `_int32`, `_int16`, `_int8`, `_float`.
    #[error("csv input must end with _int32, _int16, _int8 or _float: {}", .0.display())]
    UntypedCsv(PathBuf),

    #[error("generated file must end with .cc or .h: {}", .0.display())]
    InvalidOutputExtension(PathBuf),

    #[error("a single .cc or .h output takes exactly one input, got {0}")]
    SingleOutputNeedsOneInput(usize),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Wav(#[from] hound::Error),

    #[error(transparent)]
    Npy(#[from] NpyError),
}

pub type Result<T> = std::result::Result<T, Error>;
