//! DOCX exporter.
//!
//! Writes a minimal WordprocessingML package. Every block becomes one
//! paragraph; hyperlinks are `w:hyperlink` elements pointing at external
//! relationships.

use std::fmt::Write as _;
use std::io::{Seek, Write};

use quick_xml::escape::escape;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use crate::blocks::{
    Align, Block, Divider, Heading, HeadingLevel, Paragraph, ParagraphKind, Run, Spacer,
};
use crate::error::Result;
use crate::page::{PAGE_MARGINS, PageSize, pt_to_twips};
use crate::style::{Color, FontRole, Style};

use super::{Exporter, document_title};

/// Configuration for DOCX export.
#[derive(Debug, Clone, Default)]
pub struct DocxConfig {
    pub page_size: PageSize,
    /// Compression level for deflate (0-9, default 6).
    pub compression_level: Option<i64>,
}

/// DOCX format exporter.
#[derive(Debug, Clone, Default)]
pub struct DocxExporter {
    config: DocxConfig,
}

impl DocxExporter {
    /// Create a new exporter with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the exporter with custom settings.
    pub fn with_config(mut self, config: DocxConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &DocxConfig {
        &self.config
    }
}

impl Exporter for DocxExporter {
    fn export<W: Write + Seek>(&self, blocks: &[Block], style: &Style, writer: &mut W) -> Result<()> {
        let mut body = BodyWriter::default();
        for block in blocks {
            body.block(block);
        }
        let document = body.finish(self.config.page_size);
        let title = document_title(blocks).unwrap_or_default();

        // Fixed timestamps keep repeated renders byte-identical.
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(self.config.compression_level.unwrap_or(6)))
            .last_modified_time(DateTime::default());

        let mut zip = ZipWriter::new(writer);
        let parts: [(&str, String); 7] = [
            ("[Content_Types].xml", CONTENT_TYPES.to_string()),
            ("_rels/.rels", PACKAGE_RELS.to_string()),
            ("docProps/core.xml", core_properties(title)),
            ("docProps/app.xml", APP_PROPERTIES.to_string()),
            ("word/document.xml", document.xml),
            ("word/styles.xml", styles_xml(style)),
            ("word/_rels/document.xml.rels", document_rels(&document.links)),
        ];
        for (name, content) in parts {
            zip.start_file(name, options)?;
            zip.write_all(content.as_bytes())?;
        }
        zip.finish()?;
        Ok(())
    }
}

const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const HYPERLINK_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";
const STYLES_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";

/// Relationship ids of hyperlinks start after the styles part.
const FIRST_LINK_REL: usize = 2;

/// `word/document.xml` plus the hyperlink targets it references, in order.
struct Document {
    xml: String,
    links: Vec<String>,
}

#[derive(Default)]
struct BodyWriter {
    xml: String,
    links: Vec<String>,
}

impl BodyWriter {
    fn block(&mut self, block: &Block) {
        match block {
            Block::Heading(heading) => self.heading(heading),
            Block::Paragraph(paragraph) => self.paragraph(paragraph),
            Block::Spacer(spacer) => self.spacer(spacer),
            Block::Divider(divider) => self.divider(divider),
        }
    }

    fn heading(&mut self, heading: &Heading) {
        let level = heading.level;
        self.xml.push_str("<w:p><w:pPr>");
        if level == HeadingLevel::Section {
            self.xml.push_str("<w:keepNext/>");
        }
        push_spacing(&mut self.xml, level.space_before_pt(), level.space_after_pt());
        push_align(&mut self.xml, heading.align);
        self.xml.push_str("</w:pPr>");
        push_run(
            &mut self.xml,
            &heading.text,
            heading.font,
            heading.color,
            level.size_pt(),
            false,
        );
        self.xml.push_str("</w:p>");
    }

    fn paragraph(&mut self, paragraph: &Paragraph) {
        let kind = paragraph.kind;
        let size = kind.size_pt();
        self.xml.push_str("<w:p><w:pPr>");
        push_spacing(&mut self.xml, 0.0, kind.space_after_pt());
        let indent = pt_to_twips(kind.indent_pt());
        if indent > 0 {
            let _ = write!(self.xml, r#"<w:ind w:left="{}" w:hanging="{}"/>"#, indent * 2, indent);
        }
        push_align(&mut self.xml, paragraph.align);
        self.xml.push_str("</w:pPr>");

        if let (Some(marker), Some(first)) = (kind.marker(), paragraph.runs.first()) {
            push_run(&mut self.xml, marker, first.font, first.color, size, false);
        }
        for run in &paragraph.runs {
            self.run(run, size);
        }
        self.xml.push_str("</w:p>");
    }

    fn run(&mut self, run: &Run, size: f32) {
        match &run.link {
            Some(target) => {
                self.links.push(target.clone());
                let id = FIRST_LINK_REL + self.links.len() - 1;
                let _ = write!(self.xml, r#"<w:hyperlink r:id="rId{id}" w:history="1">"#);
                push_run(&mut self.xml, &run.text, run.font, run.color, size, run.italic);
                self.xml.push_str("</w:hyperlink>");
            }
            None => push_run(&mut self.xml, &run.text, run.font, run.color, size, run.italic),
        }
    }

    fn spacer(&mut self, spacer: &Spacer) {
        let _ = write!(
            self.xml,
            r#"<w:p><w:pPr><w:spacing w:before="0" w:after="0" w:line="{}" w:lineRule="exact"/></w:pPr></w:p>"#,
            pt_to_twips(spacer.points).max(1)
        );
    }

    fn divider(&mut self, divider: &Divider) {
        let margin = pt_to_twips(Divider::MARGIN_PT);
        // Border widths are in eighths of a point.
        let _ = write!(
            self.xml,
            r#"<w:p><w:pPr><w:pBdr><w:bottom w:val="single" w:sz="{}" w:space="1" w:color="{}"/></w:pBdr><w:spacing w:before="{margin}" w:after="{margin}"/></w:pPr></w:p>"#,
            (divider.thickness * 8.0).round() as u32,
            divider.color.to_hex(),
        );
    }

    fn finish(self, page_size: PageSize) -> Document {
        let (width, height) = page_size.dimensions_twips();
        let mut xml = String::with_capacity(self.xml.len() + 512);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        let _ = write!(xml, r#"<w:document xmlns:w="{NS_W}" xmlns:r="{NS_R}"><w:body>"#);
        xml.push_str(&self.xml);
        let _ = write!(
            xml,
            r#"<w:sectPr><w:pgSz w:w="{width}" w:h="{height}"/><w:pgMar w:top="{}" w:right="{}" w:bottom="{}" w:left="{}" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr>"#,
            pt_to_twips(PAGE_MARGINS.top),
            pt_to_twips(PAGE_MARGINS.right),
            pt_to_twips(PAGE_MARGINS.bottom),
            pt_to_twips(PAGE_MARGINS.left),
        );
        xml.push_str("</w:body></w:document>");
        Document {
            xml,
            links: self.links,
        }
    }
}

fn push_spacing(xml: &mut String, before: f32, after: f32) {
    let _ = write!(
        xml,
        r#"<w:spacing w:before="{}" w:after="{}"/>"#,
        pt_to_twips(before),
        pt_to_twips(after)
    );
}

fn push_align(xml: &mut String, align: Align) {
    if align == Align::Center {
        xml.push_str(r#"<w:jc w:val="center"/>"#);
    }
}

fn push_run(xml: &mut String, text: &str, font: FontRole, color: Color, size: f32, italic: bool) {
    let family = escape(font.family);
    let _ = write!(
        xml,
        r#"<w:r><w:rPr><w:rFonts w:ascii="{family}" w:hAnsi="{family}" w:cs="{family}"/>"#
    );
    if font.weight.is_bold() {
        xml.push_str("<w:b/>");
    }
    if italic {
        xml.push_str("<w:i/>");
    }
    // Sizes are in half-points.
    let half_points = (size * 2.0).round() as u32;
    let _ = write!(
        xml,
        r#"<w:color w:val="{}"/><w:sz w:val="{half_points}"/><w:szCs w:val="{half_points}"/></w:rPr>"#,
        color.to_hex()
    );
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            xml.push_str("<w:br/>");
        }
        let _ = write!(
            xml,
            r#"<w:t xml:space="preserve">{}</w:t>"#,
            escape(&xml_chars(line))
        );
    }
    xml.push_str("</w:r>");
}

/// Drop characters XML 1.0 cannot carry.
fn xml_chars(text: &str) -> String {
    text.chars()
        .filter(|&c| (c >= ' ' || matches!(c, '\t' | '\r')) && !matches!(c, '\u{FFFE}' | '\u{FFFF}'))
        .collect()
}

fn styles_xml(style: &Style) -> String {
    let family = escape(style.body_font.family);
    let size = (ParagraphKind::Body.size_pt() * 2.0).round() as u32;
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:styles xmlns:w="{NS_W}"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="{family}" w:hAnsi="{family}" w:cs="{family}"/><w:color w:val="{}"/><w:sz w:val="{size}"/><w:szCs w:val="{size}"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="0" w:line="240" w:lineRule="auto"/></w:pPr></w:pPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style><w:style w:type="character" w:styleId="Hyperlink"><w:name w:val="Hyperlink"/><w:rPr><w:u w:val="single"/></w:rPr></w:style></w:styles>"#,
        style.primary.to_hex()
    )
}

fn document_rels(links: &[String]) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    let _ = write!(
        xml,
        r#"<Relationship Id="rId1" Type="{STYLES_REL}" Target="styles.xml"/>"#
    );
    for (i, target) in links.iter().enumerate() {
        let _ = write!(
            xml,
            r#"<Relationship Id="rId{}" Type="{HYPERLINK_REL}" Target="{}" TargetMode="External"/>"#,
            FIRST_LINK_REL + i,
            escape(target.as_str())
        );
    }
    xml.push_str("</Relationships>");
    xml
}

fn core_properties(title: &str) -> String {
    let title = escape(title);
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>{title}</dc:title><dc:creator>{title}</dc:creator></cp:coreProperties>"#
    )
}

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
  <Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/>
  <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
  <Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>
</Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>
</Relationships>"#;

const APP_PROPERTIES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties">
  <Application>vita</Application>
</Properties>"#;
