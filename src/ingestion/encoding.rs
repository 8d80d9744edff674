//! Text decoding and delimiter sniffing used by the fallback loader.

use std::borrow::Cow;

use encoding_rs::{UTF_8, WINDOWS_1252};

/// Delimiters tried by [`sniff_delimiter`], in tie-break order.
pub const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

const SNIFF_LINES: usize = 20;

/// Decode bytes as strict UTF-8 (a leading BOM is dropped).
///
/// Returns `None` if the input is not valid UTF-8.
pub fn decode_utf8(bytes: &[u8]) -> Option<Cow<'_, str>> {
    UTF_8.decode_without_bom_handling_and_without_replacement(strip_utf8_bom(bytes))
}

/// Decode bytes as Latin-1 (Windows-1252). Never fails: every byte maps to a character.
pub fn decode_latin1(bytes: &[u8]) -> Cow<'_, str> {
    let (text, _had_errors) = WINDOWS_1252.decode_without_bom_handling(bytes);
    text
}

fn strip_utf8_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes)
}

/// Guess the field delimiter of CSV text.
///
/// For each candidate the per-line count (outside double quotes) is taken over the first
/// non-empty lines. The candidate whose most common non-zero count appears on the most lines
/// wins; ties prefer the larger count, then [`CANDIDATE_DELIMITERS`] order. Defaults to `,`.
pub fn sniff_delimiter(text: &str) -> u8 {
    let lines: Vec<&str> = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(SNIFF_LINES)
        .collect();

    let mut best: Option<(usize, usize, u8)> = None;
    for &candidate in &CANDIDATE_DELIMITERS {
        let counts: Vec<usize> = lines.iter().map(|l| count_unquoted(l, candidate)).collect();
        let Some((mode, hits)) = mode_of_nonzero(&counts) else {
            continue;
        };
        let better = match best {
            None => true,
            Some((best_hits, best_mode, _)) => (hits, mode) > (best_hits, best_mode),
        };
        if better {
            best = Some((hits, mode, candidate));
        }
    }

    best.map(|(_, _, d)| d).unwrap_or(b',')
}

fn count_unquoted(line: &str, delimiter: u8) -> usize {
    let mut in_quotes = false;
    let mut n = 0;
    for &b in line.as_bytes() {
        if b == b'"' {
            in_quotes = !in_quotes;
        } else if b == delimiter && !in_quotes {
            n += 1;
        }
    }
    n
}

/// Most frequent non-zero value and how often it occurs. Ties prefer the larger value.
fn mode_of_nonzero(counts: &[usize]) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    for &c in counts.iter().filter(|c| **c > 0) {
        let hits = counts.iter().filter(|x| **x == c).count();
        let better = match best {
            None => true,
            Some((m, h)) => (hits, c) > (h, m),
        };
        if better {
            best = Some((c, hits));
        }
    }
    best
}
