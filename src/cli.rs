use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Base output directory, or a single .cc / .h file to generate
    pub output: PathBuf,
    /// Input .tflite, .png, .wav, .csv or .npy files. Only one input may be
    /// given when `output` is a .cc or .h file.
    #[arg(required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,
    /// Path fragment after which the generated header include path starts
    #[arg(long, default_value = crate::writer::cc::GENFILES_MARKER)]
    pub genfiles_marker: String,
}
