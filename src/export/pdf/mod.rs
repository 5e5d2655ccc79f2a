//! PDF exporter.
//!
//! Lays blocks out into fixed-size pages and writes them with `pdf-writer`.
//! Style fonts are embedded when they can be found; otherwise Helvetica is
//! substituted and a warning is logged.

mod encoding;
mod fonts;
mod layout;

use std::io::{Seek, Write};
use std::path::PathBuf;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use pdf_writer::types::{ActionType, AnnotationType};
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::blocks::Block;
use crate::error::Result;
use crate::page::{PAGE_MARGINS, PageSize};
use crate::style::{FontRole, Style};

use super::{Exporter, document_title};
use fonts::FontSet;
use layout::{Fragment, Layouter, PageLayout, Rule};

/// Shear applied to italic runs, which have no dedicated face.
const OBLIQUE_SKEW: f32 = 0.2;

/// Bytes escaped in link targets; everything outside ASCII is escaped too.
const URI_ESCAPES: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'<').add(b'>');

/// Configuration for PDF export.
#[derive(Debug, Clone)]
pub struct PdfConfig {
    pub page_size: PageSize,
    /// Search the system font directories for style fonts.
    ///
    /// Located fonts are embedded whole, without subsetting, so each one
    /// adds the size of its font file to the output (several hundred KB for
    /// typical Liberation or DejaVu faces). Disable this and leave
    /// `font_dirs` empty to get small files drawn with Helvetica.
    pub system_fonts: bool,
    /// Extra directories searched for style fonts.
    pub font_dirs: Vec<PathBuf>,
    /// Deflate content and font streams.
    pub compress: bool,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::default(),
            system_fonts: true,
            font_dirs: Vec::new(),
            compress: true,
        }
    }
}

/// PDF format exporter.
///
/// # Example
///
/// ```no_run
/// use vita::export::{Exporter, PdfConfig, PdfExporter};
/// use vita::{PageSize, StyleRegistry};
/// use std::fs::File;
///
/// let styles = StyleRegistry::builtin();
/// let style = styles.resolve("professional")?;
/// let exporter = PdfExporter::new().with_config(PdfConfig {
///     page_size: PageSize::A4,
///     ..PdfConfig::default()
/// });
/// let mut file = File::create("resume.pdf")?;
/// exporter.export(&[], style, &mut file)?;
/// # Ok::<(), vita::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct PdfExporter {
    config: PdfConfig,
}

impl PdfExporter {
    /// Create a new exporter with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the exporter with custom settings.
    pub fn with_config(mut self, config: PdfConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &PdfConfig {
        &self.config
    }

    /// Build the complete file in memory.
    pub fn render(&self, blocks: &[Block], style: &Style) -> Vec<u8> {
        let mut fonts = FontSet::load(&self.config, font_roles(blocks, style));
        let size = self.config.page_size.dimensions_pt();
        let pages = Layouter::new(&fonts, size, PAGE_MARGINS).layout(blocks);
        log::debug!("laid out {} page(s)", pages.len());

        let mut alloc = Ref::new(1);
        let catalog_id = alloc.bump();
        let tree_id = alloc.bump();
        let info_id = alloc.bump();
        let font_ids: Vec<Ref> = (0..fonts.len()).map(|_| alloc.bump()).collect();

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(tree_id);

        let mut page_ids = Vec::with_capacity(pages.len());
        for page in &pages {
            let page_id = alloc.bump();
            let content_id = alloc.bump();
            page_ids.push(page_id);

            let content = draw_page(page, &mut fonts);
            let (data, filtered) = maybe_deflate(&content, self.config.compress);
            let mut stream = pdf.stream(content_id, &data);
            if filtered {
                stream.filter(Filter::FlateDecode);
            }
            stream.finish();

            let annotation_ids = write_links(&mut pdf, page, &mut alloc);

            let mut page_writer = pdf.page(page_id);
            page_writer
                .media_box(Rect::new(0.0, 0.0, size.0, size.1))
                .parent(tree_id)
                .contents(content_id);
            if !annotation_ids.is_empty() {
                page_writer.annotations(annotation_ids.iter().copied());
            }
            let mut resources = page_writer.resources();
            let mut font_dict = resources.fonts();
            for (i, &id) in font_ids.iter().enumerate() {
                font_dict.pair(Name(font_resource(i).as_bytes()), id);
            }
            font_dict.finish();
            resources.finish();
            page_writer.finish();
        }

        pdf.pages(tree_id)
            .kids(page_ids.iter().copied())
            .count(page_ids.len() as i32);

        fonts.write(&mut pdf, &font_ids, &mut alloc, self.config.compress);

        let mut info = pdf.document_info(info_id);
        info.producer(TextStr(concat!("vita ", env!("CARGO_PKG_VERSION"))));
        if let Some(title) = document_title(blocks) {
            info.title(TextStr(title));
        }
        info.finish();

        pdf.finish()
    }
}

impl Exporter for PdfExporter {
    fn export<W: Write + Seek>(&self, blocks: &[Block], style: &Style, writer: &mut W) -> Result<()> {
        writer.write_all(&self.render(blocks, style))?;
        Ok(())
    }
}

/// Fonts referenced by the blocks, style fonts first.
fn font_roles(blocks: &[Block], style: &Style) -> Vec<FontRole> {
    let mut roles = vec![style.body_font, style.bold_font];
    for block in blocks {
        match block {
            Block::Heading(heading) => roles.push(heading.font),
            Block::Paragraph(paragraph) => roles.extend(paragraph.runs.iter().map(|r| r.font)),
            Block::Spacer(_) | Block::Divider(_) => {}
        }
    }
    let mut unique: Vec<FontRole> = Vec::with_capacity(roles.len());
    for role in roles {
        if !unique.contains(&role) {
            unique.push(role);
        }
    }
    unique
}

fn font_resource(index: usize) -> String {
    format!("F{}", index + 1)
}

fn draw_page(page: &PageLayout, fonts: &mut FontSet) -> Vec<u8> {
    let mut content = Content::new();
    for rule in &page.rules {
        draw_rule(&mut content, rule);
    }
    for fragment in &page.fragments {
        draw_fragment(&mut content, fragment, fonts);
    }
    content.finish().to_vec()
}

fn draw_rule(content: &mut Content, rule: &Rule) {
    let (r, g, b) = rule.color.to_unit_rgb();
    content.save_state();
    content.set_stroke_rgb(r, g, b);
    content.set_line_width(rule.thickness);
    content.move_to(rule.x1, rule.y);
    content.line_to(rule.x2, rule.y);
    content.stroke();
    content.restore_state();
}

fn draw_fragment(content: &mut Content, fragment: &Fragment, fonts: &mut FontSet) {
    let Some(index) = fonts.index(fragment.font) else {
        return;
    };
    let encoded = fonts.encode(index, &fragment.text);
    let (r, g, b) = fragment.color.to_unit_rgb();
    let skew = if fragment.italic { OBLIQUE_SKEW } else { 0.0 };

    // Replaced characters keep their real text for extraction.
    if encoded.lossy {
        content
            .begin_marked_content_with_properties(Name(b"Span"))
            .properties()
            .actual_text(TextStr(&fragment.text));
    }
    content.begin_text();
    content.set_font(Name(font_resource(index).as_bytes()), fragment.size);
    content.set_fill_rgb(r, g, b);
    content.set_text_matrix([1.0, 0.0, skew, 1.0, fragment.x, fragment.baseline]);
    content.show(Str(&encoded.bytes));
    content.end_text();
    if encoded.lossy {
        content.end_marked_content();
    }
}

/// Write a `/Link` annotation for every linked fragment on the page.
fn write_links(pdf: &mut Pdf, page: &PageLayout, alloc: &mut Ref) -> Vec<Ref> {
    let mut ids = Vec::new();
    for fragment in &page.fragments {
        let Some(url) = &fragment.link else {
            continue;
        };
        let id = alloc.bump();
        let [x1, y1, x2, y2] = fragment.link_rect();
        let mut annotation = pdf.annotation(id);
        annotation.subtype(AnnotationType::Link);
        annotation.rect(Rect::new(x1, y1, x2, y2));
        annotation.insert(Name(b"Border")).array().items([0, 0, 0]);
        annotation
            .action()
            .action_type(ActionType::Uri)
            .uri(Str(uri_ascii(url).as_bytes()));
        annotation.finish();
        ids.push(id);
    }
    ids
}

/// PDF URI strings are 7-bit ASCII, so non-ASCII characters are
/// percent-encoded as UTF-8.
fn uri_ascii(url: &str) -> String {
    utf8_percent_encode(url, URI_ESCAPES).to_string()
}

/// Deflate `data` when compression is enabled. Returns the bytes and whether
/// they need a `FlateDecode` filter.
fn maybe_deflate(data: &[u8], compress: bool) -> (Vec<u8>, bool) {
    if !compress {
        return (data.to_vec(), false);
    }
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(6));
    match encoder.write_all(data).and_then(|()| encoder.finish()) {
        Ok(compressed) => (compressed, true),
        Err(_) => (data.to_vec(), false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use crate::blocks::{Paragraph, ParagraphKind, Run};
    use crate::style::{Color, StyleRegistry};

    fn exporter() -> PdfExporter {
        PdfExporter::new().with_config(PdfConfig {
            system_fonts: false,
            compress: false,
            ..PdfConfig::default()
        })
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_uncompressed_output_structure() {
        let styles = StyleRegistry::builtin();
        let style = styles.resolve("professional").unwrap();
        let mut link = Run::new("example.com", style.accent, style.body_font);
        link.link = Some("https://example.com".to_string());
        let blocks = vec![Block::Paragraph(Paragraph::new(ParagraphKind::Contact, vec![link]))];

        let bytes = exporter().render(&blocks, style);
        assert!(bytes.starts_with(b"%PDF-"));
        assert!(contains(&bytes, b"/Helvetica"));
        assert!(contains(&bytes, b"/WinAnsiEncoding"));
        assert!(contains(&bytes, b"/URI (https://example.com)"));
        assert!(contains(&bytes, b"(example.com) Tj"));
    }

    #[test]
    fn test_unencodable_text_gets_actual_text() {
        let styles = StyleRegistry::builtin();
        let style = styles.resolve("minimal").unwrap();
        let blocks = vec![Block::Paragraph(Paragraph::new(
            ParagraphKind::Body,
            vec![Run::new("\u{674E}", style.primary, style.body_font)],
        ))];
        let bytes = exporter().render(&blocks, style);
        assert!(contains(&bytes, b"/ActualText"));
    }

    #[test]
    fn test_deflate_round_trip() {
        use std::io::Read;

        let (compressed, filtered) = maybe_deflate(b"BT ET", true);
        assert!(filtered);
        let mut decoded = Vec::new();
        flate2::read::ZlibDecoder::new(&compressed[..])
            .read_to_end(&mut decoded)
            .unwrap();
        assert_eq!(decoded, b"BT ET");
        assert_eq!(maybe_deflate(b"x", false), (b"x".to_vec(), false));
    }

    #[test]
    fn test_link_targets_are_ascii() {
        assert_eq!(uri_ascii("https://example.com/a?b=c"), "https://example.com/a?b=c");
        assert_eq!(
            uri_ascii("https://example.com/Budi\u{161}i\u{107} cv"),
            "https://example.com/Budi%C5%A1i%C4%87%20cv"
        );

        let styles = StyleRegistry::builtin();
        let style = styles.resolve("minimal").unwrap();
        let mut link = Run::new("blog", style.accent, style.body_font);
        link.link = Some("https://\u{65E5}\u{672C}.example/".to_string());
        let blocks = vec![Block::Paragraph(Paragraph::new(ParagraphKind::Contact, vec![link]))];
        let bytes = exporter().render(&blocks, style);
        assert!(contains(&bytes, b"/URI (https://%E6%97%A5%E6%9C%AC.example/)"));
    }

    const TUFFY: Style = Style {
        name: "tuffy",
        description: "fixture font",
        primary: Color::BLACK,
        secondary: Color::BLACK,
        accent: Color::BLACK,
        body_font: FontRole::regular("Tuffy"),
        bold_font: FontRole::bold("Tuffy"),
    };

    fn fixture_fonts() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/fonts")
    }

    #[test]
    fn test_located_font_is_embedded() {
        let exporter = PdfExporter::new().with_config(PdfConfig {
            system_fonts: false,
            font_dirs: vec![fixture_fonts()],
            compress: false,
            ..PdfConfig::default()
        });
        // Tuffy has Latin glyphs but no CJK.
        let blocks = vec![Block::Paragraph(Paragraph::new(
            ParagraphKind::Body,
            vec![Run::new("Zo\u{eb} \u{5F20}\u{4E09}", TUFFY.primary, TUFFY.body_font)],
        ))];
        let bytes = exporter.render(&blocks, &TUFFY);

        for needle in [
            b"/Subtype /Type0".as_slice(),
            b"/CIDFontType2",
            b"/Identity-H",
            b"/BaseFont /Tuffy",
            b"/FontFile2",
            b"/ToUnicode",
            b"/W [",
            b"> <005A>",
            b"/ActualText",
        ] {
            assert!(contains(&bytes, needle), "missing {}", String::from_utf8_lossy(needle));
        }
        assert!(!contains(&bytes, b"/WinAnsiEncoding"));
    }

    #[test]
    fn test_font_roles_are_unique() {
        let styles = StyleRegistry::builtin();
        let style = styles.resolve("modern").unwrap();
        let roles = font_roles(&[], style);
        assert_eq!(roles, [style.body_font, style.bold_font]);
    }
}
