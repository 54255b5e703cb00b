//! Symbol names, element types and directory-mode output paths, all derived
//! from the input path alone.

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::{ArrayIdentity, ElementType, InputKind};

const SYMBOL_PREFIX: &str = "g_";

/// `.csv` stems are typed by their trailing marker.
const CSV_TYPES: [(&str, ElementType); 4] = [
    ("_int32", ElementType::Int32),
    ("_int16", ElementType::Int16),
    ("_int8", ElementType::Int8),
    ("_float", ElementType::Float32),
];

pub fn resolve_identity(path: &Path) -> Result<ArrayIdentity> {
    let kind = InputKind::from_path(path)?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let element = match kind {
        InputKind::Model => ElementType::Byte,
        InputKind::Image | InputKind::Npy => ElementType::Float32,
        InputKind::Audio => ElementType::Int16,
        InputKind::Csv => CSV_TYPES
            .iter()
            .find(|(marker, _)| stem.ends_with(marker))
            .map(|(_, ty)| *ty)
            .ok_or_else(|| Error::UntypedCsv(path.to_path_buf()))?,
    };

    Ok(ArrayIdentity {
        symbol: format!("{SYMBOL_PREFIX}{stem}{}", kind.suffix()),
        element,
    })
}

/// `out_dir/<input without extension><suffix>`, the common stem of the
/// `.cc`/`.h` pair written in directory mode.
///
/// Only normal components of `input` are kept, so absolute or `..` inputs
/// still land below `out_dir`.
pub fn output_base(out_dir: &Path, input: &Path) -> Result<PathBuf> {
    let kind = InputKind::from_path(input)?;

    let mut base = out_dir.to_path_buf();
    for part in input.with_extension("").components() {
        if let Component::Normal(part) = part {
            base.push(part);
        }
    }

    let mut name = base.into_os_string();
    name.push(kind.suffix());
    Ok(PathBuf::from(name))
}
