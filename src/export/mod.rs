//! Export module for writing rendered resumes to document formats.
//!
//! Provides the `Exporter` trait and the two format-specific implementations.
//!
//! # Architecture
//!
//! Exporters follow a builder pattern:
//! - `new()` creates an exporter with default configuration
//! - `with_config()` allows customization
//! - `export()` writes to any `Write + Seek` destination
//!
//! [`Backend`] is the closed set of exporters, selected by [`Format`].
//!
//! # Example
//!
//! ```no_run
//! use vita::export::{DocxExporter, Exporter};
//! use vita::{BuildContext, ProfileUrlTable, Resume, StyleRegistry, build_blocks};
//! use std::fs::File;
//!
//! let resume = Resume::from_path("resume.json")?;
//! let styles = StyleRegistry::builtin();
//! let style = styles.resolve("modern")?;
//! let profiles = ProfileUrlTable::builtin();
//! let blocks = build_blocks(&resume, &BuildContext { style, profiles: &profiles })?;
//!
//! let mut file = File::create("resume.docx")?;
//! DocxExporter::new().export(&blocks, style, &mut file)?;
//! # Ok::<(), vita::Error>(())
//! ```

use std::fmt;
use std::io::{Cursor, Seek, Write};
use std::path::Path;
use std::str::FromStr;

use tempfile::NamedTempFile;

use crate::blocks::{Block, HeadingLevel};
use crate::error::{Error, Result};
use crate::page::PageSize;
use crate::style::Style;

mod docx;
mod pdf;

pub use docx::{DocxConfig, DocxExporter};
pub use pdf::{PdfConfig, PdfExporter};

/// Output document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Paginated PDF (the flow-document backend)
    Pdf,
    /// Office Open XML word-processing document
    Docx,
}

impl Format {
    pub const ALL: [Format; 2] = [Format::Pdf, Format::Docx];

    /// Conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Pdf => "pdf",
            Format::Docx => "docx",
        }
    }

    /// Infer the format from a path's extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| Error::UnsupportedFormat(path.display().to_string()))?;
        ext.parse()
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(Format::Pdf),
            "docx" => Ok(Format::Docx),
            _ => Err(Error::UnsupportedFormat(s.to_string())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Trait for exporting a block sequence to a specific format.
///
/// Exporters hold their configuration and write a complete document to any
/// `Write + Seek` destination:
/// - `std::fs::File` for disk output
/// - `std::io::Cursor<Vec<u8>>` for in-memory output
///
/// Blocks are written in the order given.
pub trait Exporter {
    fn export<W: Write + Seek>(&self, blocks: &[Block], style: &Style, writer: &mut W)
    -> Result<()>;
}

/// The closed set of backends.
#[derive(Debug, Clone)]
pub enum Backend {
    Pdf(PdfExporter),
    Docx(DocxExporter),
}

impl Backend {
    /// Build the exporter for `format`, applying `page_size` to its config.
    pub fn for_format(format: Format, page_size: PageSize, pdf: &PdfConfig, docx: &DocxConfig) -> Self {
        match format {
            Format::Pdf => Backend::Pdf(PdfExporter::new().with_config(PdfConfig {
                page_size,
                ..pdf.clone()
            })),
            Format::Docx => Backend::Docx(DocxExporter::new().with_config(DocxConfig {
                page_size,
                ..docx.clone()
            })),
        }
    }

    pub fn format(&self) -> Format {
        match self {
            Backend::Pdf(_) => Format::Pdf,
            Backend::Docx(_) => Format::Docx,
        }
    }
}

impl Exporter for Backend {
    fn export<W: Write + Seek>(&self, blocks: &[Block], style: &Style, writer: &mut W) -> Result<()> {
        match self {
            Backend::Pdf(exporter) => exporter.export(blocks, style, writer),
            Backend::Docx(exporter) => exporter.export(blocks, style, writer),
        }
    }
}

/// Render a whole document into memory, then move it into place at `path`.
///
/// The bytes go to a temporary file in the destination directory which is
/// renamed over `path` only once complete, so a failed render never leaves a
/// partial file behind.
pub fn write_atomic<E: Exporter>(
    exporter: &E,
    blocks: &[Block],
    style: &Style,
    path: impl AsRef<Path>,
) -> Result<()> {
    let path = path.as_ref();
    let mut buffer = Cursor::new(Vec::new());
    exporter.export(blocks, style, &mut buffer)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(buffer.get_ref())?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| Error::Render(e.error))?;

    log::debug!("wrote {} bytes to {}", buffer.get_ref().len(), path.display());
    Ok(())
}

/// The resume owner's name, taken from the name heading.
pub(crate) fn document_title(blocks: &[Block]) -> Option<&str> {
    blocks
        .iter()
        .filter_map(Block::as_heading)
        .find(|h| h.level == HeadingLevel::Name)
        .map(|h| h.text.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::StyleRegistry;

    #[test]
    fn test_format_from_str() {
        assert_eq!("PDF".parse::<Format>().unwrap(), Format::Pdf);
        assert_eq!("docx".parse::<Format>().unwrap(), Format::Docx);
        let err = "odt".parse::<Format>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(ref f) if f == "odt"));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path("out/resume.PDF").unwrap(), Format::Pdf);
        assert_eq!(Format::from_path("resume.docx").unwrap(), Format::Docx);
        assert!(Format::from_path("resume").is_err());
        assert!(Format::from_path("resume.html").is_err());
    }

    #[test]
    fn test_backend_matches_format() {
        for format in Format::ALL {
            let backend = Backend::for_format(
                format,
                PageSize::A4,
                &PdfConfig::default(),
                &DocxConfig::default(),
            );
            assert_eq!(backend.format(), format);
        }
    }

    struct Failing;

    impl Exporter for Failing {
        fn export<W: Write + Seek>(&self, _: &[Block], _: &Style, writer: &mut W) -> Result<()> {
            writer.write_all(b"partial")?;
            Err(std::io::Error::other("disk full").into())
        }
    }

    #[test]
    fn test_failed_export_leaves_no_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("resume.pdf");
        let styles = StyleRegistry::builtin();
        let style = styles.resolve("minimal").unwrap();

        let err = write_atomic(&Failing, &[], style, &path).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Render);
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
