//! Drives decode → name → emit for the two command-line modes.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::decoder;
use crate::error::{Error, Result};
use crate::model::{ArtifactKind, ConversionRequest, InputKind};
use crate::naming;
use crate::writer;

/// True when `output` names a single `.cc`/`.h` file rather than a directory.
pub fn is_single_output(output: &Path) -> bool {
    ArtifactKind::from_path(output).is_ok()
}

/// Convert one input into exactly the artifact `request.output` names.
pub fn convert_single(request: &ConversionRequest, genfiles_marker: &str) -> Result<()> {
    ArtifactKind::from_path(&request.output)?;
    let identity = naming::resolve_identity(&request.input)?;
    let array = decoder::decode(&request.input)?;
    writer::cc::emit(&request.output, &identity, &array, genfiles_marker)
}

/// Convert every input into a `.cc`/`.h` pair under `out_dir`.
///
/// Duplicate inputs are dropped, keeping the first occurrence, so no
/// artifact is written twice. `on_generated` sees each `.cc` path once its
/// pair is on disk. The first failure stops the run; pairs already written
/// stay where they are.
pub fn convert_into_dir<F>(
    out_dir: &Path,
    inputs: &[PathBuf],
    genfiles_marker: &str,
    mut on_generated: F,
) -> Result<Vec<PathBuf>>
where
    F: FnMut(&Path),
{
    let mut generated = Vec::new();

    for input in dedup(inputs) {
        let kind = InputKind::from_path(input)?;
        let base = naming::output_base(out_dir, input)?;
        let identity = naming::resolve_identity(input)?;
        let array = decoder::decode_as(kind, input)?;

        let cc_path = with_suffix(&base, ArtifactKind::Definition);
        let h_path = with_suffix(&base, ArtifactKind::Declaration);
        writer::cc::emit(&cc_path, &identity, &array, genfiles_marker)?;
        writer::cc::emit(&h_path, &identity, &array, genfiles_marker)?;

        on_generated(&cc_path);
        generated.push(cc_path);
    }

    Ok(generated)
}

/// Dispatch on the shape of `output`, as the command line does.
pub fn convert(
    output: &Path,
    inputs: &[PathBuf],
    genfiles_marker: &str,
    on_generated: impl FnMut(&Path),
) -> Result<Vec<PathBuf>> {
    if is_single_output(output) {
        let [input] = inputs else {
            return Err(Error::SingleOutputNeedsOneInput(inputs.len()));
        };
        let request = ConversionRequest {
            input: input.clone(),
            output: output.to_path_buf(),
        };
        convert_single(&request, genfiles_marker)?;
        Ok(vec![request.output])
    } else {
        convert_into_dir(output, inputs, genfiles_marker, on_generated)
    }
}

/// Order-preserving dedup.
fn dedup(inputs: &[PathBuf]) -> Vec<&PathBuf> {
    let mut seen = HashSet::new();
    inputs.iter().filter(|p| seen.insert(*p)).collect()
}

fn with_suffix(base: &Path, kind: ArtifactKind) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(".");
    name.push(kind.extension());
    PathBuf::from(name)
}
