//! Input Encoding Detection and Conversion
//!
//! Documents are parsed as Rust strings. Raw input is sniffed for a byte
//! order mark (or the `<`/NUL pattern of BOM-less UTF-16) and converted to
//! UTF-8 before parsing.

use crate::error::ReadError;

/// Encoding of raw document bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmlEncoding {
    Utf8,
    Utf16Le,
    Utf16Be,
}

impl XmlEncoding {
    /// Detect encoding from byte order mark or initial bytes
    pub fn detect(input: &[u8]) -> Self {
        match input {
            [0xFF, 0xFE, ..] | [b'<', 0x00, ..] => XmlEncoding::Utf16Le,
            [0xFE, 0xFF, ..] | [0x00, b'<', ..] => XmlEncoding::Utf16Be,
            _ => XmlEncoding::Utf8,
        }
    }

    /// Length of the byte order mark for this encoding at the start of `input`
    fn bom_len(self, input: &[u8]) -> usize {
        let bom: &[u8] = match self {
            XmlEncoding::Utf8 => &[0xEF, 0xBB, 0xBF],
            XmlEncoding::Utf16Le => &[0xFF, 0xFE],
            XmlEncoding::Utf16Be => &[0xFE, 0xFF],
        };
        if input.starts_with(bom) {
            bom.len()
        } else {
            0
        }
    }
}

/// Convert raw document bytes into a `String`, dropping any BOM
///
/// UTF-8 input without a BOM is reused without copying.
///
/// # Errors
///
/// `ReadError::Encoding` if the bytes are not valid in the detected encoding.
pub fn decode_to_string(input: Vec<u8>) -> Result<String, ReadError> {
    let encoding = XmlEncoding::detect(&input);
    let skip = encoding.bom_len(&input);

    match encoding {
        XmlEncoding::Utf8 => {
            let mut input = input;
            if skip > 0 {
                input.drain(..skip);
            }
            String::from_utf8(input).map_err(|e| ReadError::Encoding {
                reason: format!("invalid UTF-8: {}", e.utf8_error()),
            })
        }
        XmlEncoding::Utf16Le => decode_utf16(&input[skip..], u16::from_le_bytes, "UTF-16 LE"),
        XmlEncoding::Utf16Be => decode_utf16(&input[skip..], u16::from_be_bytes, "UTF-16 BE"),
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16, label: &str) -> Result<String, ReadError> {
    if bytes.len() % 2 != 0 {
        return Err(ReadError::Encoding {
            reason: format!("invalid {label}: odd number of bytes"),
        });
    }

    let code_units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|chunk| unit([chunk[0], chunk[1]]))
        .collect();

    String::from_utf16(&code_units).map_err(|e| ReadError::Encoding {
        reason: format!("invalid {label}: {e}"),
    })
}
