/// Unicode encoding form of a byte stream, as far as the reader cares:
/// everything but UTF-8 is detected and then rejected during tokenization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf32Le,
    Utf32Be,
    Utf16Le,
    Utf16Be,
    Utf8,
    Unknown,
}

/// Inspect up to four leading bytes and return the detected encoding and
/// the byte order mark length, which is one of {0, 2, 3, 4}.
pub fn detect_encoding(input: &[u8]) -> (Encoding, usize) {
    match input {
        [] => (Encoding::Unknown, 0),
        [0x00, 0x00, 0xFE, 0xFF, ..] => (Encoding::Utf32Be, 4),
        [0x00, 0x00, 0x00, x, ..] if *x != 0 => (Encoding::Utf32Be, 0),
        [0x00, x, ..] if *x != 0 => (Encoding::Utf16Be, 0),
        [0x00, ..] => (Encoding::Unknown, 0),
        [0xFF, 0xFE, 0x00, 0x00, ..] => (Encoding::Utf32Le, 4),
        [0xFF, 0xFE, ..] => (Encoding::Utf16Le, 2),
        [0xFF, ..] => (Encoding::Unknown, 0),
        [0xFE, 0xFF, ..] => (Encoding::Utf16Be, 2),
        [0xFE, ..] => (Encoding::Unknown, 0),
        [0xEF, 0xBB, 0xBF, ..] => (Encoding::Utf8, 3),
        [0xEF, ..] => (Encoding::Unknown, 0),
        [_, 0x00, 0x00, 0x00, ..] => (Encoding::Utf32Le, 0),
        [_, 0x00, ..] => (Encoding::Utf16Le, 0),
        _ => (Encoding::Utf8, 0),
    }
}
