//! `.csv` test vector. One array per file: only the first line is read and
//! it is embedded verbatim, trailing newline included.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::Result;
use crate::model::DecodedArray;

pub fn decode(path: &Path) -> Result<DecodedArray> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut line = String::new();
    reader.read_line(&mut line)?;

    // text-mode newlines: `\r\n` and a lone `\r` both end the line as `\n`
    if let Some(cr) = line.find('\r') {
        line.truncate(cr);
        line.push('\n');
    }

    Ok(DecodedArray {
        count: line.split(',').count(),
        literals: line,
    })
}
