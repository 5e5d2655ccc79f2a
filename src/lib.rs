//! # vita
//!
//! Render a [JSON Resume](https://jsonresume.org/schema) document to PDF or
//! DOCX with a named style.
//!
//! ## Features
//!
//! - Four built-in styles (professional, modern, elegant, minimal)
//! - One section pipeline shared by both output formats, so section order,
//!   colors and links are identical in each
//! - Profile URLs generated from network + username for common networks
//! - Deterministic output: the same input always renders to the same bytes
//!
//! ## Quick Start
//!
//! ```no_run
//! use vita::{Format, Resume};
//!
//! let resume = Resume::from_path("resume.json")?;
//! vita::render(&resume, "modern", Format::Pdf, "resume.pdf")?;
//! vita::render(&resume, "modern", Format::Docx, "resume.docx")?;
//! # Ok::<(), vita::Error>(())
//! ```
//!
//! ## Pipeline
//!
//! A render resolves the style, runs every section builder over the resume
//! to produce backend-agnostic [`Block`]s, then hands the blocks to the
//! selected exporter:
//!
//! ```
//! use vita::{BuildContext, ProfileUrlTable, Resume, StyleRegistry, build_blocks};
//!
//! let resume = Resume::from_json_str(r#"{"basics": {"name": "Ada Lovelace"}}"#)?;
//! let styles = StyleRegistry::builtin();
//! let profiles = ProfileUrlTable::builtin();
//! let ctx = BuildContext { style: styles.resolve("elegant")?, profiles: &profiles };
//!
//! let blocks = build_blocks(&resume, &ctx)?;
//! assert_eq!(blocks[0].text(), "Ada Lovelace");
//! # Ok::<(), vita::Error>(())
//! ```

use std::io::{Seek, Write};
use std::path::Path;

pub mod blocks;
pub mod error;
pub mod export;
pub mod page;
pub mod profile;
pub mod resume;
pub mod sections;
pub mod style;
pub mod text;
pub(crate) mod util;

pub use blocks::{Align, Block, Divider, Heading, HeadingLevel, Paragraph, ParagraphKind, Run, Spacer};
pub use error::{Error, ErrorKind, Result};
pub use export::{Backend, DocxConfig, DocxExporter, Exporter, Format, PdfConfig, PdfExporter};
pub use page::{Margins, PAGE_MARGINS, PageSize};
pub use profile::ProfileUrlTable;
pub use resume::Resume;
pub use sections::{BuildContext, SECTIONS, SectionId, build_blocks};
pub use style::{Color, FontRole, FontWeight, Style, StyleRegistry};
pub use text::{PartialDate, format_date, format_date_range, hyperlink_run};

/// Options applied to every render of a [`Renderer`].
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Paper size for both formats; overrides the size in the backend configs.
    pub page_size: PageSize,
    pub pdf: PdfConfig,
    pub docx: DocxConfig,
}

/// Owns the style registry and profile table shared by every render.
#[derive(Debug, Clone)]
pub struct Renderer {
    styles: StyleRegistry,
    profiles: ProfileUrlTable,
    options: RenderOptions,
}

impl Renderer {
    /// Renderer with the built-in styles and profile templates.
    pub fn new() -> Self {
        Self {
            styles: StyleRegistry::builtin(),
            profiles: ProfileUrlTable::builtin(),
            options: RenderOptions::default(),
        }
    }

    pub fn with_styles(mut self, styles: StyleRegistry) -> Self {
        self.styles = styles;
        self
    }

    pub fn with_profiles(mut self, profiles: ProfileUrlTable) -> Self {
        self.profiles = profiles;
        self
    }

    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    pub fn profiles(&self) -> &ProfileUrlTable {
        &self.profiles
    }

    /// Build the block sequence for `resume` in the named style.
    pub fn build(&self, resume: &Resume, style_name: &str) -> Result<(&Style, Vec<Block>)> {
        let style = self.styles.resolve(style_name)?;
        let ctx = BuildContext {
            style,
            profiles: &self.profiles,
        };
        Ok((style, build_blocks(resume, &ctx)?))
    }

    fn backend(&self, format: Format) -> Backend {
        Backend::for_format(
            format,
            self.options.page_size,
            &self.options.pdf,
            &self.options.docx,
        )
    }

    /// Render into any seekable writer.
    pub fn render_to<W: Write + Seek>(
        &self,
        resume: &Resume,
        style_name: &str,
        format: Format,
        writer: &mut W,
    ) -> Result<()> {
        let (style, blocks) = self.build(resume, style_name)?;
        self.backend(format).export(&blocks, style, writer)
    }

    /// Render to a file at `path`.
    ///
    /// The style is resolved and every section built before the file system
    /// is touched; the file then appears complete or not at all.
    pub fn render(
        &self,
        resume: &Resume,
        style_name: &str,
        format: Format,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let (style, blocks) = self.build(resume, style_name)?;
        export::write_atomic(&self.backend(format), &blocks, style, path)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Render `resume` to `path` with the built-in styles and default options.
pub fn render(
    resume: &Resume,
    style_name: &str,
    format: Format,
    path: impl AsRef<Path>,
) -> Result<()> {
    Renderer::new().render(resume, style_name, format, path)
}

/// Names of the built-in styles, in presentation order.
pub fn list_styles() -> Vec<&'static str> {
    StyleRegistry::builtin().names().collect()
}
