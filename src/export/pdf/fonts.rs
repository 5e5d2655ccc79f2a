//! Font lookup, measurement and embedding.
//!
//! Style fonts are located through `fontdb` and embedded whole as
//! Type0/CIDFontType2 fonts with Identity-H encoding, so any character the
//! font covers can be drawn and extracted again. When a font cannot be found
//! the standard Helvetica faces are used instead.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use fontdb::{Database, Family, Query, Weight};
use pdf_writer::types::{CidFontType, FontFlags, SystemInfo};
use pdf_writer::{Filter, Finish, Name, Pdf, Rect, Ref, Str};
use ttf_parser::{Face, GlyphId};

use super::PdfConfig;
use super::encoding::{encode_win_ansi, helvetica_width};
use crate::error::{Error, Result};
use crate::style::{FontRole, FontWeight};

/// Text measurement, in points.
pub trait Measure {
    fn width(&self, role: FontRole, text: &str, size: f32) -> f32;
}

/// A font that text is shown with.
#[derive(Debug)]
pub enum PdfFont {
    Standard(StandardFont),
    Embedded(EmbeddedFont),
}

impl PdfFont {
    fn width(&self, text: &str, size: f32) -> f32 {
        match self {
            PdfFont::Standard(font) => font.width(text, size),
            PdfFont::Embedded(font) => font.width(text, size),
        }
    }
}

/// One of the base-14 Helvetica faces.
#[derive(Debug, Clone, Copy)]
pub struct StandardFont {
    bold: bool,
}

impl StandardFont {
    pub fn for_weight(weight: FontWeight) -> Self {
        Self {
            bold: weight.is_bold(),
        }
    }

    pub fn base_name(self) -> &'static str {
        if self.bold { "Helvetica-Bold" } else { "Helvetica" }
    }

    fn width(self, text: &str, size: f32) -> f32 {
        let units: u32 = text
            .chars()
            .map(|c| u32::from(helvetica_width(c, self.bold)))
            .sum();
        units as f32 * size / 1000.0
    }
}

/// A TrueType font embedded in full.
#[derive(Debug)]
pub struct EmbeddedFont {
    data: Vec<u8>,
    post_script_name: String,
    units_per_em: f32,
    ascender: f32,
    descender: f32,
    cap_height: f32,
    bbox: [f32; 4],
    /// Glyphs shown so far: id to (first character, advance in font units).
    used: BTreeMap<u16, (char, u16)>,
}

impl EmbeddedFont {
    /// Parse font file data. Collections and CFF-flavored fonts are rejected
    /// since they cannot be embedded as a plain `FontFile2`.
    pub fn from_data(data: Vec<u8>, post_script_name: String) -> Option<Self> {
        if data.starts_with(b"ttcf") {
            return None;
        }
        let face = Face::parse(&data, 0).ok()?;
        face.tables().glyf?;

        let units_per_em = f32::from(face.units_per_em());
        let bbox = face.global_bounding_box();
        let metrics = (
            units_per_em,
            f32::from(face.ascender()),
            f32::from(face.descender()),
            f32::from(face.capital_height().unwrap_or(face.ascender())),
            [
                f32::from(bbox.x_min),
                f32::from(bbox.y_min),
                f32::from(bbox.x_max),
                f32::from(bbox.y_max),
            ],
        );
        drop(face);

        let (units_per_em, ascender, descender, cap_height, bbox) = metrics;
        Some(Self {
            data,
            post_script_name,
            units_per_em,
            ascender,
            descender,
            cap_height,
            bbox,
            used: BTreeMap::new(),
        })
    }

    fn face(&self) -> Option<Face<'_>> {
        Face::parse(&self.data, 0).ok()
    }

    fn width(&self, text: &str, size: f32) -> f32 {
        let Some(face) = self.face() else {
            return 0.0;
        };
        let units: u32 = text
            .chars()
            .map(|c| {
                let glyph = face.glyph_index(c).unwrap_or(GlyphId(0));
                u32::from(face.glyph_hor_advance(glyph).unwrap_or(0))
            })
            .sum();
        units as f32 * size / self.units_per_em
    }

    /// Two-byte glyph ids for `text`, recording each glyph for the width
    /// array and the ToUnicode map. Characters the font has no glyph for are
    /// drawn as `.notdef` and make the result lossy.
    fn encode(&mut self, text: &str) -> Encoded {
        let Some(face) = self.face() else {
            return Encoded {
                bytes: Vec::new(),
                lossy: !text.is_empty(),
            };
        };
        let mut lossy = false;
        let glyphs: Vec<(char, u16, u16)> = text
            .chars()
            .map(|c| {
                let glyph = face.glyph_index(c).unwrap_or_else(|| {
                    lossy = true;
                    GlyphId(0)
                });
                (c, glyph.0, face.glyph_hor_advance(glyph).unwrap_or(0))
            })
            .collect();
        drop(face);

        let mut bytes = Vec::with_capacity(glyphs.len() * 2);
        for (c, glyph, advance) in glyphs {
            bytes.extend_from_slice(&glyph.to_be_bytes());
            self.used.entry(glyph).or_insert((c, advance));
        }
        Encoded { bytes, lossy }
    }

    /// Scale font units to PDF glyph space (1/1000 em).
    fn to_glyph_space(&self, units: f32) -> f32 {
        units * 1000.0 / self.units_per_em
    }
}

/// Encoded text ready for a `Tj` operator.
pub struct Encoded {
    pub bytes: Vec<u8>,
    /// Some characters could not be drawn and were replaced.
    pub lossy: bool,
}

/// The fonts of one document, keyed by style font role.
#[derive(Debug)]
pub struct FontSet {
    fonts: Vec<(FontRole, PdfFont)>,
}

impl FontSet {
    /// Resolve every role, substituting Helvetica for fonts that cannot be
    /// located.
    pub fn load(config: &PdfConfig, roles: impl IntoIterator<Item = FontRole>) -> Self {
        let db = font_database(config);
        let mut fonts: Vec<(FontRole, PdfFont)> = Vec::new();
        for role in roles {
            if fonts.iter().any(|(r, _)| *r == role) {
                continue;
            }
            let font = match locate(&db, role) {
                Ok(font) => {
                    log::debug!("embedding {} for {} ({})", font.post_script_name, role.family, role.weight);
                    PdfFont::Embedded(font)
                }
                Err(err) => {
                    let fallback = StandardFont::for_weight(role.weight);
                    log::warn!("{err}; using {} instead", fallback.base_name());
                    PdfFont::Standard(fallback)
                }
            };
            fonts.push((role, font));
        }
        Self { fonts }
    }

    /// Index of the font for `role`, used to name it in page resources.
    pub fn index(&self, role: FontRole) -> Option<usize> {
        self.fonts.iter().position(|(r, _)| *r == role)
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn encode(&mut self, index: usize, text: &str) -> Encoded {
        match &mut self.fonts[index].1 {
            PdfFont::Standard(_) => {
                let (bytes, lossy) = encode_win_ansi(text);
                Encoded { bytes, lossy }
            }
            PdfFont::Embedded(font) => font.encode(text),
        }
    }

    /// Write every font dictionary. `ids[i]` is the object already referenced
    /// from page resources for font `i`.
    pub fn write(&self, pdf: &mut Pdf, ids: &[Ref], alloc: &mut Ref, compress: bool) {
        for ((_, font), &id) in self.fonts.iter().zip(ids) {
            match font {
                PdfFont::Standard(font) => {
                    pdf.type1_font(id)
                        .base_font(Name(font.base_name().as_bytes()))
                        .encoding_predefined(Name(b"WinAnsiEncoding"));
                }
                PdfFont::Embedded(font) => write_embedded(pdf, id, font, alloc, compress),
            }
        }
    }
}

impl Measure for FontSet {
    fn width(&self, role: FontRole, text: &str, size: f32) -> f32 {
        match self.fonts.iter().find(|(r, _)| *r == role) {
            Some((_, font)) => font.width(text, size),
            None => StandardFont::for_weight(role.weight).width(text, size),
        }
    }
}

fn font_database(config: &PdfConfig) -> Database {
    let mut db = Database::new();
    if config.system_fonts {
        db.load_system_fonts();
    }
    for dir in &config.font_dirs {
        db.load_fonts_dir(dir);
    }
    db
}

fn locate(db: &Database, role: FontRole) -> Result<EmbeddedFont> {
    let unavailable = || Error::FontUnavailable {
        family: role.family.to_string(),
        weight: role.weight,
    };

    let weight = match role.weight {
        FontWeight::Regular => Weight::NORMAL,
        FontWeight::Bold => Weight::BOLD,
    };
    let query = Query {
        families: &[Family::Name(role.family)],
        weight,
        ..Query::default()
    };
    let id = db.query(&query).ok_or_else(unavailable)?;
    let face = db.face(id).ok_or_else(unavailable)?;
    if face.index != 0 {
        return Err(unavailable());
    }
    let post_script_name = face.post_script_name.clone();
    let data = db
        .with_face_data(id, |data, _| data.to_vec())
        .ok_or_else(unavailable)?;
    EmbeddedFont::from_data(data, post_script_name).ok_or_else(unavailable)
}

fn write_embedded(pdf: &mut Pdf, id: Ref, font: &EmbeddedFont, alloc: &mut Ref, compress: bool) {
    let cid_id = alloc.bump();
    let descriptor_id = alloc.bump();
    let file_id = alloc.bump();
    let cmap_id = alloc.bump();
    let base_font = Name(font.post_script_name.as_bytes());

    pdf.type0_font(id)
        .base_font(base_font)
        .encoding_predefined(Name(b"Identity-H"))
        .descendant_font(cid_id)
        .to_unicode(cmap_id);

    let mut cid = pdf.cid_font(cid_id);
    cid.subtype(CidFontType::Type2)
        .base_font(base_font)
        .system_info(SystemInfo {
            registry: Str(b"Adobe"),
            ordering: Str(b"Identity"),
            supplement: 0,
        })
        .font_descriptor(descriptor_id)
        .default_width(0.0)
        .cid_to_gid_map_predefined(Name(b"Identity"));
    let mut widths = cid.widths();
    for (&glyph, &(_, advance)) in &font.used {
        widths.consecutive(glyph, [font.to_glyph_space(f32::from(advance))]);
    }
    widths.finish();
    cid.finish();

    let [x_min, y_min, x_max, y_max] = font.bbox.map(|v| font.to_glyph_space(v));
    pdf.font_descriptor(descriptor_id)
        .name(base_font)
        .flags(FontFlags::NON_SYMBOLIC)
        .bbox(Rect::new(x_min, y_min, x_max, y_max))
        .italic_angle(0.0)
        .ascent(font.to_glyph_space(font.ascender))
        .descent(font.to_glyph_space(font.descender))
        .cap_height(font.to_glyph_space(font.cap_height))
        .stem_v(80.0)
        .font_file2(file_id);

    let (data, filtered) = super::maybe_deflate(&font.data, compress);
    let mut file = pdf.stream(file_id, &data);
    file.pair(Name(b"Length1"), font.data.len() as i32);
    if filtered {
        file.filter(Filter::FlateDecode);
    }
    file.finish();

    let cmap = to_unicode_cmap(&font.used);
    let (data, filtered) = super::maybe_deflate(cmap.as_bytes(), compress);
    let mut stream = pdf.stream(cmap_id, &data);
    if filtered {
        stream.filter(Filter::FlateDecode);
    }
}

/// ToUnicode CMap mapping each used glyph id back to its character.
fn to_unicode_cmap(used: &BTreeMap<u16, (char, u16)>) -> String {
    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n\
         <0000> <FFFF>\n\
         endcodespacerange\n",
    );

    // .notdef maps to nothing.
    let entries: Vec<(u16, char)> = used
        .iter()
        .filter(|&(&glyph, _)| glyph != 0)
        .map(|(&glyph, &(c, _))| (glyph, c))
        .collect();

    // At most 100 entries per bfchar block.
    for chunk in entries.chunks(100) {
        let _ = writeln!(cmap, "{} beginbfchar", chunk.len());
        for &(glyph, c) in chunk {
            let mut units = [0u16; 2];
            let hex: String = c
                .encode_utf16(&mut units)
                .iter()
                .map(|u| format!("{u:04X}"))
                .collect();
            let _ = writeln!(cmap, "<{glyph:04X}> <{hex}>");
        }
        cmap.push_str("endbfchar\n");
    }

    cmap.push_str(
        "endcmap\n\
         CMapName currentdict /CMap defineresource pop\n\
         end\n\
         end\n",
    );
    cmap
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::{Mutex, Once};

    use log::{Level, LevelFilter, Log, Metadata, Record};

    use super::*;

    static WARNINGS: Mutex<Vec<String>> = Mutex::new(Vec::new());

    struct CaptureWarnings;

    impl Log for CaptureWarnings {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= Level::Warn
        }

        fn log(&self, record: &Record) {
            if self.enabled(record.metadata()) {
                WARNINGS.lock().unwrap().push(record.args().to_string());
            }
        }

        fn flush(&self) {}
    }

    fn capture_warnings() {
        static INIT: Once = Once::new();
        static LOGGER: CaptureWarnings = CaptureWarnings;
        INIT.call_once(|| {
            log::set_logger(&LOGGER).unwrap();
            log::set_max_level(LevelFilter::Warn);
        });
    }

    fn fixture_fonts() -> PdfConfig {
        PdfConfig {
            system_fonts: false,
            font_dirs: vec![PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/fonts"))],
            ..PdfConfig::default()
        }
    }

    fn fallback_only() -> FontSet {
        let config = PdfConfig {
            system_fonts: false,
            ..PdfConfig::default()
        };
        FontSet::load(
            &config,
            [
                FontRole::regular("Liberation Sans"),
                FontRole::bold("Liberation Sans"),
                FontRole::regular("Liberation Sans"),
            ],
        )
    }

    #[test]
    fn test_missing_fonts_fall_back_to_helvetica() {
        let fonts = fallback_only();
        assert_eq!(fonts.len(), 2);
        assert!(matches!(fonts.fonts[0].1, PdfFont::Standard(StandardFont { bold: false })));
        assert!(matches!(fonts.fonts[1].1, PdfFont::Standard(StandardFont { bold: true })));
        assert_eq!(fonts.index(FontRole::bold("Liberation Sans")), Some(1));
    }

    #[test]
    fn test_fallback_is_logged() {
        capture_warnings();
        let config = PdfConfig {
            system_fonts: false,
            ..PdfConfig::default()
        };
        let fonts = FontSet::load(&config, [FontRole::bold("Vita Missing Family")]);
        assert!(matches!(fonts.fonts[0].1, PdfFont::Standard(StandardFont { bold: true })));

        let warnings = WARNINGS.lock().unwrap();
        let warning = warnings
            .iter()
            .find(|w| w.contains("Vita Missing Family"))
            .expect("fallback warning");
        assert!(warning.contains("Helvetica-Bold"), "{warning}");
    }

    #[test]
    fn test_fixture_font_is_embedded() {
        capture_warnings();
        let regular = FontRole::regular("Tuffy");
        let bold = FontRole::bold("Tuffy");
        let mut fonts = FontSet::load(&fixture_fonts(), [regular, bold]);
        assert_eq!(fonts.len(), 2);
        assert!(fonts.fonts.iter().all(|(_, f)| matches!(f, PdfFont::Embedded(_))));
        assert!(!WARNINGS.lock().unwrap().iter().any(|w| w.contains("Tuffy")));

        let latin = fonts.encode(0, "Zo");
        assert!(!latin.lossy);
        assert_eq!(latin.bytes.len(), 4);
        assert!(latin.bytes.iter().any(|&b| b != 0));

        // No CJK coverage: the glyph becomes .notdef and the run is lossy.
        let cjk = fonts.encode(0, "Z\u{5F20}");
        assert!(cjk.lossy);
        assert_eq!(&cjk.bytes[2..], &[0, 0]);

        assert!(fonts.width(regular, "Zo", 10.0) > 0.0);
    }

    #[test]
    fn test_standard_measurement() {
        let fonts = fallback_only();
        let regular = FontRole::regular("Liberation Sans");
        let bold = FontRole::bold("Liberation Sans");
        // "Hi": 722 + 222
        assert!((fonts.width(regular, "Hi", 10.0) - 9.44).abs() < 1e-4);
        assert!(fonts.width(bold, "Hi", 10.0) > fonts.width(regular, "Hi", 10.0));
    }

    #[test]
    fn test_cmap_entries() {
        let mut used = BTreeMap::new();
        used.insert(0, ('?', 500));
        used.insert(36, ('A', 1366));
        used.insert(900, ('\u{1F600}', 2048));
        let cmap = to_unicode_cmap(&used);
        assert!(cmap.contains("2 beginbfchar"));
        assert!(cmap.contains("<0024> <0041>"));
        assert!(cmap.contains("<0384> <D83DDE00>"));
        assert!(!cmap.contains("<0000> <003F>"));
    }
}
