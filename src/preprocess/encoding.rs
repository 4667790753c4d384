//! Byte → text decoding
//!
//! Fallback chain: BOM sniff → strict UTF-8 → Latin-1 → Windows-1252.
//! Windows-1252 maps every byte, so decoding never fails.

use serde::Serialize;
use std::fmt;

/// The encoding a document was decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DetectedEncoding {
    Utf8,
    Utf8Bom,
    Utf16Le,
    Utf16Be,
    Latin1,
    Windows1252,
}

impl DetectedEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectedEncoding::Utf8 => "utf-8",
            DetectedEncoding::Utf8Bom => "utf-8-sig",
            DetectedEncoding::Utf16Le => "utf-16-le",
            DetectedEncoding::Utf16Be => "utf-16-be",
            DetectedEncoding::Latin1 => "latin-1",
            DetectedEncoding::Windows1252 => "windows-1252",
        }
    }

    /// UTF-8 with or without a byte-order mark.
    pub fn is_utf8(&self) -> bool {
        matches!(self, DetectedEncoding::Utf8 | DetectedEncoding::Utf8Bom)
    }
}

impl fmt::Display for DetectedEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16_BE_BOM: &[u8] = &[0xFE, 0xFF];

/// Windows-1252 code points for bytes 0x80–0x9F. Undefined slots keep their
/// C1 control code point.
const CP1252_HIGH: [char; 32] = [
    '\u{20AC}', '\u{0081}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{008D}', '\u{017D}', '\u{008F}',
    '\u{0090}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}',
    '\u{02DC}', '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{009D}', '\u{017E}', '\u{0178}',
];

fn decode_utf16(bytes: &[u8], little_endian: bool) -> String {
    let units: Vec<u16> = bytes
        .chunks(2)
        .map(|pair| match pair {
            [a, b] if little_endian => u16::from_le_bytes([*a, *b]),
            [a, b] => u16::from_be_bytes([*a, *b]),
            _ => 0xFFFD,
        })
        .collect();
    String::from_utf16_lossy(&units)
}

fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

fn decode_cp1252(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| match b {
            0x80..=0x9F => CP1252_HIGH[(b - 0x80) as usize],
            _ => b as char,
        })
        .collect()
}

/// Decode `bytes`. A transport-declared UTF-16 charset is honored when no
/// BOM is present; other declarations defer to the fallback chain.
pub fn decode(bytes: &[u8], declared_charset: Option<&str>) -> (String, DetectedEncoding) {
    if let Some(rest) = bytes.strip_prefix(UTF8_BOM) {
        if let Ok(text) = std::str::from_utf8(rest) {
            return (text.to_string(), DetectedEncoding::Utf8Bom);
        }
    }
    if let Some(rest) = bytes.strip_prefix(UTF16_LE_BOM) {
        return (decode_utf16(rest, true), DetectedEncoding::Utf16Le);
    }
    if let Some(rest) = bytes.strip_prefix(UTF16_BE_BOM) {
        return (decode_utf16(rest, false), DetectedEncoding::Utf16Be);
    }

    match declared_charset.map(str::to_ascii_lowercase).as_deref() {
        Some("utf-16le") | Some("utf-16-le") => {
            return (decode_utf16(bytes, true), DetectedEncoding::Utf16Le)
        }
        Some("utf-16be") | Some("utf-16-be") => {
            return (decode_utf16(bytes, false), DetectedEncoding::Utf16Be)
        }
        _ => {}
    }

    if let Ok(text) = std::str::from_utf8(bytes) {
        return (text.to_string(), DetectedEncoding::Utf8);
    }
    if !bytes.iter().any(|b| (0x80..=0x9F).contains(b)) {
        return (decode_latin1(bytes), DetectedEncoding::Latin1);
    }
    (decode_cp1252(bytes), DetectedEncoding::Windows1252)
}
