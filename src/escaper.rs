//! Escaping and unescaping of scalar contents.
//!
//! Both directions allocate only when rewriting is actually needed; the
//! borrowed input is returned untouched otherwise.

use std::borrow::Cow;

use crate::tokenizer::chars::{as_hex, decode_utf8, encode_utf8};

/// A malformed escape sequence, positioned relative to the raw scalar
/// passed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeError {
    pub offset: usize,
    pub message: &'static str,
}

/// Decode a raw scalar (exact input bytes, quotes included) into its value:
/// double-quoted escapes resolved and line breaks folded, single-quoted
/// `''` collapsed, anything else returned as-is.
pub fn decode_scalar(raw: &[u8]) -> Result<Cow<'_, [u8]>, DecodeError> {
    match raw.first() {
        Some(b'"') if raw.len() >= 2 => {
            decode_double_quoted(&raw[1..raw.len() - 1]).map_err(|err| DecodeError {
                offset: err.offset + 1,
                message: err.message,
            })
        }
        Some(b'\'') if raw.len() >= 2 => Ok(decode_single_quoted(&raw[1..raw.len() - 1])),
        _ => Ok(Cow::Borrowed(raw)),
    }
}

/// Decode the contents of a double-quoted scalar (without the quotes).
pub fn decode_double_quoted(content: &[u8]) -> Result<Cow<'_, [u8]>, DecodeError> {
    let first = match content
        .iter()
        .position(|&b| matches!(b, b'\\' | b'\r' | b'\n'))
    {
        Some(first) => first,
        None => return Ok(Cow::Borrowed(content)),
    };

    let mut storage = Vec::with_capacity(content.len());
    storage.extend_from_slice(&content[..first]);
    let mut pos = first;

    while pos < content.len() {
        match content[pos] {
            b'\r' | b'\n' => {
                // An unescaped break folds to a single newline; a CR LF
                // pair counts as one break.
                storage.push(b'\n');
                pos += 1;
                if matches!(content.get(pos), Some(b'\r') | Some(b'\n')) {
                    pos += 1;
                }
            }
            b'\\' => {
                let escaped = match content.get(pos + 1) {
                    Some(&b) => b,
                    None => {
                        return Err(DecodeError {
                            offset: pos,
                            message: "Unrecognized escape code!",
                        })
                    }
                };
                let after = pos + 2;
                pos = after;
                match escaped {
                    // An escaped line break is elided entirely.
                    b'\r' | b'\n' => {
                        if matches!(content.get(after), Some(b'\r') | Some(b'\n')) {
                            pos = after + 1;
                        }
                    }
                    b'0' => storage.push(0x00),
                    b'a' => storage.push(0x07),
                    b'b' => storage.push(0x08),
                    b't' | 0x09 => storage.push(0x09),
                    b'n' => storage.push(0x0A),
                    b'v' => storage.push(0x0B),
                    b'f' => storage.push(0x0C),
                    b'r' => storage.push(0x0D),
                    b'e' => storage.push(0x1B),
                    b' ' => storage.push(0x20),
                    b'"' => storage.push(0x22),
                    b'/' => storage.push(0x2F),
                    b'\\' => storage.push(0x5C),
                    // Next line, non-breaking space, line separator,
                    // paragraph separator.
                    b'N' => encode_utf8(0x85, &mut storage),
                    b'_' => encode_utf8(0xA0, &mut storage),
                    b'L' => encode_utf8(0x2028, &mut storage),
                    b'P' => encode_utf8(0x2029, &mut storage),
                    b'x' => pos = hex_escape(content, after, 2, &mut storage)?,
                    b'u' => pos = hex_escape(content, after, 4, &mut storage)?,
                    b'U' => pos = hex_escape(content, after, 8, &mut storage)?,
                    _ => {
                        return Err(DecodeError {
                            offset: pos - 1,
                            message: "Unrecognized escape code!",
                        })
                    }
                }
            }
            byte => {
                storage.push(byte);
                pos += 1;
            }
        }
    }
    Ok(Cow::Owned(storage))
}

fn hex_escape(
    content: &[u8],
    start: usize,
    digits: usize,
    storage: &mut Vec<u8>,
) -> Result<usize, DecodeError> {
    let end = start + digits;
    if end > content.len() || !content[start..end].iter().all(u8::is_ascii_hexdigit) {
        return Err(DecodeError {
            offset: start,
            message: "Invalid hex escape code!",
        });
    }
    let mut value = 0u32;
    for &digit in &content[start..end] {
        value = (value << 4) + as_hex(digit);
    }
    encode_utf8(value, storage);
    Ok(end)
}

/// Decode the contents of a single-quoted scalar (without the quotes):
/// a doubled `''` is a single `'`.
pub fn decode_single_quoted(content: &[u8]) -> Cow<'_, [u8]> {
    let first = match content.iter().position(|&b| b == b'\'') {
        Some(first) => first,
        None => return Cow::Borrowed(content),
    };

    let mut storage = Vec::with_capacity(content.len());
    storage.extend_from_slice(&content[..first]);
    let mut pos = first;
    while pos < content.len() {
        if content[pos] == b'\'' {
            storage.push(b'\'');
            // The scanner only lets quotes through in pairs.
            pos += 2;
        } else {
            storage.push(content[pos]);
            pos += 1;
        }
    }
    Cow::Owned(storage)
}

/// Escape `input` so it can be embedded in a double-quoted scalar. Control
/// characters get their named or `\xHH` escapes; multi-byte sequences are
/// decoded and re-emitted as `\N`, `\_`, `\L`, `\P` or `\xHH`/`\uHHHH`/
/// `\UHHHHHHHH`; invalid UTF-8 becomes U+FFFD and ends the output.
pub fn escape(input: &[u8]) -> Cow<'_, [u8]> {
    let first = match input
        .iter()
        .position(|&b| b == b'\\' || b == b'"' || b < 0x20 || b & 0x80 != 0)
    {
        Some(first) => first,
        None => return Cow::Borrowed(input),
    };

    let mut out = Vec::with_capacity(input.len() + 8);
    out.extend_from_slice(&input[..first]);
    let mut pos = first;
    while pos < input.len() {
        let byte = input[pos];
        if byte & 0x80 != 0 {
            let (scalar, width) = decode_utf8(&input[pos..]);
            if width == 0 {
                encode_utf8(0xFFFD, &mut out);
                return Cow::Owned(out);
            }
            match scalar {
                0x85 => out.extend_from_slice(b"\\N"),
                0xA0 => out.extend_from_slice(b"\\_"),
                0x2028 => out.extend_from_slice(b"\\L"),
                0x2029 => out.extend_from_slice(b"\\P"),
                s if s <= 0xFF => push_hex(&mut out, b"\\x", s, 2),
                s if s <= 0xFFFF => push_hex(&mut out, b"\\u", s, 4),
                s => push_hex(&mut out, b"\\U", s, 8),
            }
            pos += width;
            continue;
        }
        match byte {
            b'\\' => out.extend_from_slice(b"\\\\"),
            b'"' => out.extend_from_slice(b"\\\""),
            0x00 => out.extend_from_slice(b"\\0"),
            0x07 => out.extend_from_slice(b"\\a"),
            0x08 => out.extend_from_slice(b"\\b"),
            0x09 => out.extend_from_slice(b"\\t"),
            0x0A => out.extend_from_slice(b"\\n"),
            0x0B => out.extend_from_slice(b"\\v"),
            0x0C => out.extend_from_slice(b"\\f"),
            0x0D => out.extend_from_slice(b"\\r"),
            0x1B => out.extend_from_slice(b"\\e"),
            b if b < 0x20 => push_hex(&mut out, b"\\x", b as u32, 2),
            b => out.push(b),
        }
        pos += 1;
    }
    Cow::Owned(out)
}

fn push_hex(out: &mut Vec<u8>, prefix: &[u8], value: u32, digits: usize) {
    out.extend_from_slice(prefix);
    for shift in (0..digits).rev() {
        let nibble = (value >> (shift * 4)) & 0xF;
        out.push(b"0123456789ABCDEF"[nibble as usize]);
    }
}
