//! Emit the C++ definition (`.cc`) / declaration (`.h`) pair for one array.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::model::{ArrayIdentity, ArtifactKind, DecodedArray};

/// Include paths in generated sources are taken relative to this fragment.
pub const GENFILES_MARKER: &str = "genfiles/";

/// Write one artifact; the kind is picked from the suffix of `out_path`.
pub fn emit(
    out_path: &Path,
    identity: &ArrayIdentity,
    array: &DecodedArray,
    genfiles_marker: &str,
) -> Result<()> {
    let kind = ArtifactKind::from_path(out_path)?;

    if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut out = BufWriter::new(File::create(out_path)?);

    match kind {
        ArtifactKind::Definition => {
            let header = header_include(out_path, genfiles_marker);
            writeln!(out, "#include <cstdint>\n")?;
            writeln!(out, "#include \"{header}\"\n")?;
            writeln!(
                out,
                "alignas(16) const {ty} {name}[] = {{{body}}};",
                ty = identity.element,
                name = identity.symbol,
                body = array.literals
            )?;
        }
        ArtifactKind::Declaration => {
            writeln!(out, "#include <cstdint>\n")?;
            writeln!(
                out,
                "constexpr unsigned int {name}_size = {count};",
                name = identity.symbol,
                count = array.count
            )?;
            writeln!(
                out,
                "extern const {ty} {name}[];",
                ty = identity.element,
                name = identity.symbol
            )?;
        }
    }

    out.flush()?;
    tracing::info!(output = %out_path.display(), symbol = %identity.symbol, "wrote artifact");
    Ok(())
}

/// Header path as seen from the generated-files root: everything after the
/// last `marker`, with `.cc` swapped for `.h`.
pub fn header_include(cc_path: &Path, marker: &str) -> String {
    let text = cc_path.to_string_lossy().replace('\\', "/");
    let relative = match text.rfind(marker) {
        Some(pos) if !marker.is_empty() => &text[pos + marker.len()..],
        _ => text.as_str(),
    };
    match relative.strip_suffix(".cc") {
        Some(stem) => format!("{stem}.h"),
        None => relative.to_string(),
    }
}
