//! Minimal reader for the NumPy `.npy` container.
//!
//! Layout: `\x93NUMPY`, major, minor, header length (u16 for 1.x, u32 for
//! 2.x/3.x, little-endian), a Python dict literal describing `descr`,
//! `fortran_order` and `shape`, then the raw element data. Every element is
//! cast to `f32` and returned in row-major order.

use std::fs;
use std::path::Path;

use thiserror::Error;

use super::float_literals;
use crate::error::Result;
use crate::model::DecodedArray;

const MAGIC: &[u8] = b"\x93NUMPY";

#[derive(Debug, Error)]
pub enum NpyError {
    #[error("not a .npy file (bad magic)")]
    BadMagic,
    #[error("unsupported .npy version {0}.{1}")]
    UnsupportedVersion(u8, u8),
    #[error("malformed .npy header: {0}")]
    MalformedHeader(String),
    #[error("unsupported .npy dtype `{0}`")]
    UnsupportedDtype(String),
    #[error(".npy data truncated: expected {expected} bytes, found {actual}")]
    Truncated { expected: usize, actual: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endian {
    Little,
    Big,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Bool,
    Int,
    Uint,
    Float,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Dtype {
    endian: Endian,
    kind: Kind,
    size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Header {
    dtype: Dtype,
    fortran_order: bool,
    shape: Vec<usize>,
}

pub fn decode(path: &Path) -> Result<DecodedArray> {
    let bytes = fs::read(path)?;
    let values = read_f32(&bytes)?;
    Ok(DecodedArray {
        count: values.len(),
        literals: float_literals(&values),
    })
}

/// Parse a whole `.npy` image and return its elements as row-major `f32`.
pub fn read_f32(bytes: &[u8]) -> std::result::Result<Vec<f32>, NpyError> {
    let (header, data) = split_header(bytes)?;
    let needed = header
        .shape
        .iter()
        .try_fold(header.dtype.size, |acc, dim| acc.checked_mul(*dim))
        .ok_or_else(|| {
            NpyError::MalformedHeader(format!("shape {:?} overflows the address space", header.shape))
        })?;
    if data.len() < needed {
        return Err(NpyError::Truncated {
            expected: needed,
            actual: data.len(),
        });
    }

    let values: Vec<f32> = data[..needed]
        .chunks_exact(header.dtype.size)
        .map(|raw| element_to_f32(header.dtype, raw))
        .collect();

    if header.fortran_order && header.shape.len() > 1 {
        Ok(fortran_to_row_major(&values, &header.shape))
    } else {
        Ok(values)
    }
}

fn split_header(bytes: &[u8]) -> std::result::Result<(Header, &[u8]), NpyError> {
    if bytes.len() < MAGIC.len() + 2 || &bytes[..MAGIC.len()] != MAGIC {
        return Err(NpyError::BadMagic);
    }
    let (major, minor) = (bytes[6], bytes[7]);

    let (header_len, start) = match major {
        1 => {
            let raw = bytes
                .get(8..10)
                .ok_or_else(|| NpyError::MalformedHeader("missing header length".into()))?;
            (u16::from_le_bytes([raw[0], raw[1]]) as usize, 10)
        }
        2 | 3 => {
            let raw = bytes
                .get(8..12)
                .ok_or_else(|| NpyError::MalformedHeader("missing header length".into()))?;
            (u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]) as usize, 12)
        }
        _ => return Err(NpyError::UnsupportedVersion(major, minor)),
    };

    let text = bytes
        .get(start..start + header_len)
        .ok_or_else(|| NpyError::MalformedHeader("header runs past end of file".into()))?;
    let text = std::str::from_utf8(text)
        .map_err(|_| NpyError::MalformedHeader("header is not valid text".into()))?;

    Ok((parse_header(text)?, &bytes[start + header_len..]))
}

fn parse_header(text: &str) -> std::result::Result<Header, NpyError> {
    let descr = value_after(text, "descr")?;
    let quote = descr
        .chars()
        .next()
        .filter(|c| *c == '\'' || *c == '"')
        // structured dtypes are lists, not strings
        .ok_or_else(|| NpyError::UnsupportedDtype(descr.chars().take(16).collect()))?;
    let descr = descr[1..]
        .split(quote)
        .next()
        .ok_or_else(|| NpyError::MalformedHeader("unterminated descr".into()))?;
    let dtype = parse_dtype(descr)?;

    let fortran = value_after(text, "fortran_order")?;
    let fortran_order = if fortran.starts_with("True") {
        true
    } else if fortran.starts_with("False") {
        false
    } else {
        return Err(NpyError::MalformedHeader("bad fortran_order".into()));
    };

    let shape = value_after(text, "shape")?;
    let inner = shape
        .strip_prefix('(')
        .and_then(|s| s.split(')').next())
        .ok_or_else(|| NpyError::MalformedHeader("shape is not a tuple".into()))?;
    let shape = inner
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.trim_end_matches('L')
                .parse::<usize>()
                .map_err(|_| NpyError::MalformedHeader(format!("bad dimension `{s}`")))
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(Header {
        dtype,
        fortran_order,
        shape,
    })
}

/// Text following `'key':` (or `"key":`), leading whitespace removed.
fn value_after<'a>(text: &'a str, key: &str) -> std::result::Result<&'a str, NpyError> {
    for quoted in [format!("'{key}'"), format!("\"{key}\"")] {
        if let Some(pos) = text.find(&quoted) {
            let rest = text[pos + quoted.len()..].trim_start();
            if let Some(rest) = rest.strip_prefix(':') {
                return Ok(rest.trim_start());
            }
        }
    }
    Err(NpyError::MalformedHeader(format!("missing `{key}`")))
}

fn parse_dtype(descr: &str) -> std::result::Result<Dtype, NpyError> {
    let unsupported = || NpyError::UnsupportedDtype(descr.to_string());

    let (endian, rest) = match descr.chars().next() {
        Some('<') | Some('|') => (Endian::Little, &descr[1..]),
        Some('>') => (Endian::Big, &descr[1..]),
        Some('=') => (native_endian(), &descr[1..]),
        Some(_) => (native_endian(), descr),
        None => return Err(unsupported()),
    };

    let mut rest_chars = rest.chars();
    let kind = match rest_chars.next() {
        Some('b') => Kind::Bool,
        Some('i') => Kind::Int,
        Some('u') => Kind::Uint,
        Some('f') => Kind::Float,
        _ => return Err(unsupported()),
    };
    let size: usize = rest_chars.as_str().parse().map_err(|_| unsupported())?;

    let supported = match kind {
        Kind::Bool => size == 1,
        Kind::Int | Kind::Uint => matches!(size, 1 | 2 | 4 | 8),
        Kind::Float => matches!(size, 2 | 4 | 8),
    };
    if !supported {
        return Err(unsupported());
    }

    Ok(Dtype { endian, kind, size })
}

fn native_endian() -> Endian {
    if cfg!(target_endian = "big") {
        Endian::Big
    } else {
        Endian::Little
    }
}

/// Copy `raw` into an N-byte array honouring the byte order.
fn ordered<const N: usize>(endian: Endian, raw: &[u8]) -> [u8; N] {
    let mut buf = [0u8; N];
    buf.copy_from_slice(raw);
    if endian == Endian::Big {
        buf.reverse();
    }
    buf
}

fn element_to_f32(dtype: Dtype, raw: &[u8]) -> f32 {
    let e = dtype.endian;
    match (dtype.kind, dtype.size) {
        (Kind::Bool, _) => (raw[0] != 0) as u8 as f32,
        (Kind::Int, 1) => raw[0] as i8 as f32,
        (Kind::Uint, 1) => raw[0] as f32,
        (Kind::Int, 2) => i16::from_le_bytes(ordered(e, raw)) as f32,
        (Kind::Uint, 2) => u16::from_le_bytes(ordered(e, raw)) as f32,
        (Kind::Int, 4) => i32::from_le_bytes(ordered(e, raw)) as f32,
        (Kind::Uint, 4) => u32::from_le_bytes(ordered(e, raw)) as f32,
        (Kind::Int, 8) => i64::from_le_bytes(ordered(e, raw)) as f32,
        (Kind::Uint, 8) => u64::from_le_bytes(ordered(e, raw)) as f32,
        (Kind::Float, 2) => f16_to_f32(u16::from_le_bytes(ordered(e, raw))),
        (Kind::Float, 4) => f32::from_le_bytes(ordered(e, raw)),
        (Kind::Float, 8) => f64::from_le_bytes(ordered(e, raw)) as f32,
        // parse_dtype only lets the combinations above through
        _ => unreachable!("unsupported dtype {dtype:?}"),
    }
}

/// IEEE 754 half → single. Every half value is exactly representable.
fn f16_to_f32(bits: u16) -> f32 {
    let sign = ((bits >> 15) as u32) << 31;
    let exp = ((bits >> 10) & 0x1f) as u32;
    let frac = (bits & 0x3ff) as u32;

    let out = match (exp, frac) {
        (0, 0) => sign,
        (0, _) => {
            // subnormal: frac × 2^-24
            let magnitude = frac as f32 * f32::from_bits(0x3380_0000);
            return if sign == 0 { magnitude } else { -magnitude };
        }
        (0x1f, _) => sign | 0x7f80_0000 | (frac << 13),
        _ => sign | ((exp + 127 - 15) << 23) | (frac << 13),
    };
    f32::from_bits(out)
}

fn fortran_to_row_major(values: &[f32], shape: &[usize]) -> Vec<f32> {
    // column-major strides: first axis varies fastest
    let mut strides = Vec::with_capacity(shape.len());
    let mut acc = 1;
    for dim in shape {
        strides.push(acc);
        acc *= dim;
    }

    let mut index = vec![0usize; shape.len()];
    let mut out = Vec::with_capacity(values.len());
    for _ in 0..values.len() {
        let offset: usize = index.iter().zip(&strides).map(|(i, s)| i * s).sum();
        out.push(values[offset]);

        // advance the row-major counter, last axis fastest
        for axis in (0..shape.len()).rev() {
            index[axis] += 1;
            if index[axis] < shape[axis] {
                break;
            }
            index[axis] = 0;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a version 1.0 file the way numpy lays it out.
    fn npy(descr: &str, fortran: bool, shape: &str, data: &[u8]) -> Vec<u8> {
        let fortran = if fortran { "True" } else { "False" };
        let mut header =
            format!("{{'descr': '{descr}', 'fortran_order': {fortran}, 'shape': {shape}, }}");
        while (MAGIC.len() + 4 + header.len() + 1) % 64 != 0 {
            header.push(' ');
        }
        header.push('\n');

        let mut out = MAGIC.to_vec();
        out.extend_from_slice(&[1, 0]);
        out.extend_from_slice(&(header.len() as u16).to_le_bytes());
        out.extend_from_slice(header.as_bytes());
        out.extend_from_slice(data);
        out
    }

    fn le_f32(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn test_float32_vector() {
        let bytes = npy("<f4", false, "(3,)", &le_f32(&[1.0, -0.5, 2.25]));
        assert_eq!(read_f32(&bytes).unwrap(), vec![1.0, -0.5, 2.25]);
    }

    #[test]
    fn test_float64_is_cast() {
        let data: Vec<u8> = [0.1f64, 3.0].iter().flat_map(|v| v.to_le_bytes()).collect();
        let bytes = npy("<f8", false, "(2,)", &data);
        assert_eq!(read_f32(&bytes).unwrap(), vec![0.1f32, 3.0]);
    }

    #[test]
    fn test_big_endian_int16() {
        let data: Vec<u8> = [-2i16, 300].iter().flat_map(|v| v.to_be_bytes()).collect();
        let bytes = npy(">i2", false, "(2,)", &data);
        assert_eq!(read_f32(&bytes).unwrap(), vec![-2.0, 300.0]);
    }

    #[test]
    fn test_int8_and_bool() {
        let bytes = npy("|i1", false, "(3,)", &[0xff, 0x00, 0x7f]);
        assert_eq!(read_f32(&bytes).unwrap(), vec![-1.0, 0.0, 127.0]);

        let bytes = npy("|b1", false, "(2,)", &[1, 0]);
        assert_eq!(read_f32(&bytes).unwrap(), vec![1.0, 0.0]);
    }

    #[test]
    fn test_scalar_shape() {
        let bytes = npy("<f4", false, "()", &le_f32(&[7.5]));
        assert_eq!(read_f32(&bytes).unwrap(), vec![7.5]);
    }

    #[test]
    fn test_fortran_order_is_flattened_row_major() {
        // [[1, 2, 3], [4, 5, 6]] stored column by column
        let bytes = npy("<f4", true, "(2, 3)", &le_f32(&[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]));
        assert_eq!(read_f32(&bytes).unwrap(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_c_order_matrix() {
        let bytes = npy("<f4", false, "(2, 2)", &le_f32(&[1.0, 2.0, 3.0, 4.0]));
        assert_eq!(read_f32(&bytes).unwrap(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_rejects_bad_magic() {
        assert!(matches!(read_f32(b"PK\x03\x04 zip"), Err(NpyError::BadMagic)));
    }

    #[test]
    fn test_rejects_object_arrays() {
        let bytes = npy("|O", false, "(1,)", &[0; 8]);
        assert!(matches!(read_f32(&bytes), Err(NpyError::UnsupportedDtype(_))));
    }

    #[test]
    fn test_rejects_truncated_data() {
        let bytes = npy("<f4", false, "(4,)", &le_f32(&[1.0]));
        assert!(matches!(
            read_f32(&bytes),
            Err(NpyError::Truncated {
                expected: 16,
                actual: 4
            })
        ));
    }

    #[test]
    fn test_float16_is_widened() {
        let data: Vec<u8> = [0x3c00u16, 0xc000, 0x3555, 0x0001]
            .iter()
            .flat_map(|v| v.to_le_bytes())
            .collect();
        let bytes = npy("<f2", false, "(4,)", &data);
        let values = read_f32(&bytes).unwrap();
        assert_eq!(values[0], 1.0);
        assert_eq!(values[1], -2.0);
        assert_eq!(values[2], 0.33325195);
        assert_eq!(values[3], 2f32.powi(-24));
    }

    #[test]
    fn test_half_specials() {
        assert_eq!(f16_to_f32(0x7c00), f32::INFINITY);
        assert_eq!(f16_to_f32(0xfc00), f32::NEG_INFINITY);
        assert!(f16_to_f32(0x7e00).is_nan());
        assert_eq!(f16_to_f32(0x8000).to_bits(), (-0.0f32).to_bits());
        assert_eq!(f16_to_f32(0x7bff), 65504.0);
    }

    #[test]
    fn test_overflowing_shape_is_an_error() {
        let bytes = npy("<f4", false, "(18446744073709551615, 2)", &le_f32(&[1.0]));
        assert!(matches!(read_f32(&bytes), Err(NpyError::MalformedHeader(_))));

        let bytes = npy("<f8", false, "(4611686018427387904,)", &[]);
        assert!(matches!(read_f32(&bytes), Err(NpyError::MalformedHeader(_))));
    }

    #[test]
    fn test_decode_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.npy");
        fs::write(&path, npy("<f4", false, "(2,)", &le_f32(&[1.0, 0.25]))).unwrap();

        let decoded = decode(&path).unwrap();
        assert_eq!(decoded.count, 2);
        assert_eq!(decoded.literals, "1.0,0.25");
    }
}
