use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

// side length of the square grid every image is resampled to
pub const IMAGE_SIDE: u32 = 28;
pub const IMAGE_LEN: usize = (IMAGE_SIDE * IMAGE_SIDE) as usize; // 784

/// One (input, output) pair as handed over by the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Flat array produced by a decoder.
///
/// `count` is what ends up in the `<name>_size` constant; `literals` is the
/// comma-joined text placed between the braces of the definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedArray {
    pub count: usize,
    pub literals: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    Byte,
    Float32,
    Int16,
    Int32,
    Int8,
}

impl ElementType {
    /// Spelling used in the generated C++.
    pub fn c_type(self) -> &'static str {
        match self {
            ElementType::Byte => "unsigned char",
            ElementType::Float32 => "float",
            ElementType::Int16 => "int16_t",
            ElementType::Int32 => "int32_t",
            ElementType::Int8 => "int8_t",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.c_type())
    }
}

/// Symbol name and element type of one generated array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayIdentity {
    pub symbol: String,
    pub element: ElementType,
}

/// ─────────────────────────────────────────────────────
/// Input categories, one per recognised extension
/// ─────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// `.tflite` flatbuffer model
    Model,
    /// `.png`
    Image,
    /// `.wav`
    Audio,
    /// `.csv` test vector, first line only
    Csv,
    /// `.npy` numpy array
    Npy,
}

impl InputKind {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("tflite") => Ok(InputKind::Model),
            Some("png") => Ok(InputKind::Image),
            Some("wav") => Ok(InputKind::Audio),
            Some("csv") => Ok(InputKind::Csv),
            Some("npy") => Ok(InputKind::Npy),
            _ => Err(Error::UnsupportedInputFormat(path.to_path_buf())),
        }
    }

    /// Suffix appended to both the symbol and the directory-mode file name.
    pub fn suffix(self) -> &'static str {
        match self {
            InputKind::Model => "_model_data",
            InputKind::Image => "_image_data",
            InputKind::Audio => "_audio_data",
            InputKind::Csv | InputKind::Npy => "_test_data",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// `.cc` holding the initialised storage
    Definition,
    /// `.h` holding the size constant and the extern declaration
    Declaration,
}

impl ArtifactKind {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = path.to_string_lossy();
        if text.ends_with(".cc") {
            Ok(ArtifactKind::Definition)
        } else if text.ends_with(".h") {
            Ok(ArtifactKind::Declaration)
        } else {
            Err(Error::InvalidOutputExtension(path.to_path_buf()))
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ArtifactKind::Definition => "cc",
            ArtifactKind::Declaration => "h",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_kind_dispatch() {
        assert_eq!(InputKind::from_path(Path::new("a/b.tflite")).unwrap(), InputKind::Model);
        assert_eq!(InputKind::from_path(Path::new("x.png")).unwrap(), InputKind::Image);
        assert_eq!(InputKind::from_path(Path::new("x.wav")).unwrap(), InputKind::Audio);
        assert_eq!(InputKind::from_path(Path::new("x_int8.csv")).unwrap(), InputKind::Csv);
        assert_eq!(InputKind::from_path(Path::new("x.npy")).unwrap(), InputKind::Npy);

        let err = InputKind::from_path(Path::new("notes.txt")).unwrap_err();
        assert!(matches!(err, Error::UnsupportedInputFormat(_)), "got {err}");
        assert!(InputKind::from_path(Path::new("no_extension")).is_err());
    }

    #[test]
    fn test_artifact_kind_from_suffix() {
        assert_eq!(
            ArtifactKind::from_path(Path::new("out/genfiles/a.cc")).unwrap(),
            ArtifactKind::Definition
        );
        assert_eq!(ArtifactKind::from_path(Path::new("a.h")).unwrap(), ArtifactKind::Declaration);

        let err = ArtifactKind::from_path(Path::new("a.cpp")).unwrap_err();
        assert!(matches!(err, Error::InvalidOutputExtension(_)), "got {err}");
    }

    #[test]
    fn test_c_type_spellings() {
        assert_eq!(ElementType::Byte.to_string(), "unsigned char");
        assert_eq!(ElementType::Float32.c_type(), "float");
        assert_eq!(ElementType::Int8.c_type(), "int8_t");
    }
}
