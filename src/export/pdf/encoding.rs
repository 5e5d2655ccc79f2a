//! WinAnsi encoding and Helvetica metrics for the standard-font fallback.

/// Advance widths (1/1000 em) of Helvetica for ASCII 32..=126.
#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Advance widths (1/1000 em) of Helvetica-Bold for ASCII 32..=126.
#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Characters in the 0x80..=0x9F block of WinAnsiEncoding.
const WIN_ANSI_HIGH: [(char, u8); 27] = [
    ('\u{20AC}', 0x80),
    ('\u{201A}', 0x82),
    ('\u{0192}', 0x83),
    ('\u{201E}', 0x84),
    ('\u{2026}', 0x85),
    ('\u{2020}', 0x86),
    ('\u{2021}', 0x87),
    ('\u{02C6}', 0x88),
    ('\u{2030}', 0x89),
    ('\u{0160}', 0x8A),
    ('\u{2039}', 0x8B),
    ('\u{0152}', 0x8C),
    ('\u{017D}', 0x8E),
    ('\u{2018}', 0x91),
    ('\u{2019}', 0x92),
    ('\u{201C}', 0x93),
    ('\u{201D}', 0x94),
    ('\u{2022}', 0x95),
    ('\u{2013}', 0x96),
    ('\u{2014}', 0x97),
    ('\u{02DC}', 0x98),
    ('\u{2122}', 0x99),
    ('\u{0161}', 0x9A),
    ('\u{203A}', 0x9B),
    ('\u{0153}', 0x9C),
    ('\u{017E}', 0x9E),
    ('\u{0178}', 0x9F),
];

const REPLACEMENT: u8 = b'?';

/// The WinAnsi code for `c`, if it has one.
pub fn win_ansi_byte(c: char) -> Option<u8> {
    match c {
        ' '..='~' => Some(c as u8),
        '\u{A0}'..='\u{FF}' => Some(c as u32 as u8),
        _ => WIN_ANSI_HIGH
            .iter()
            .find(|(ch, _)| *ch == c)
            .map(|&(_, byte)| byte),
    }
}

/// Encode text as WinAnsi bytes. Unencodable characters become `?`; the
/// flag reports whether that happened.
pub fn encode_win_ansi(text: &str) -> (Vec<u8>, bool) {
    let mut lossy = false;
    let bytes = text
        .chars()
        .map(|c| {
            win_ansi_byte(c).unwrap_or_else(|| {
                lossy = true;
                REPLACEMENT
            })
        })
        .collect();
    (bytes, lossy)
}

/// Advance width of `c` in 1/1000 em, as drawn after WinAnsi encoding.
pub fn helvetica_width(c: char, bold: bool) -> u16 {
    let table = if bold { &HELVETICA_BOLD } else { &HELVETICA };
    match win_ansi_byte(c) {
        Some(byte @ 32..=126) => table[(byte - 32) as usize],
        Some(0x95) => 350,
        Some(0x96) => 556,
        Some(0x97) => 1000,
        Some(_) => 556,
        None => table[(REPLACEMENT - 32) as usize],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_widths() {
        assert_eq!(helvetica_width(' ', false), 278);
        assert_eq!(helvetica_width('W', false), 944);
        assert_eq!(helvetica_width('i', false), 222);
        assert_eq!(helvetica_width('i', true), 278);
        assert_eq!(helvetica_width('~', true), 584);
    }

    #[test]
    fn test_win_ansi_specials() {
        assert_eq!(win_ansi_byte('\u{2022}'), Some(0x95));
        assert_eq!(win_ansi_byte('\u{2013}'), Some(0x96));
        assert_eq!(win_ansi_byte('é'), Some(0xE9));
        assert_eq!(win_ansi_byte('\u{4E2D}'), None);
    }

    #[test]
    fn test_encode_reports_loss() {
        assert_eq!(encode_win_ansi("Zoë"), (b"Zo\xEB".to_vec(), false));
        let (bytes, lossy) = encode_win_ansi("李");
        assert_eq!(bytes, b"?");
        assert!(lossy);
    }
}
