//! Backend-agnostic renderable blocks.
//!
//! The section pipeline produces a flat `Vec<Block>`; each exporter walks it in
//! order and maps every block onto its own document model. Blocks only carry
//! semantic intent (text, emphasis, link targets, spacing) plus the colors and
//! font roles resolved from the active [`Style`](crate::style::Style).
//!
//! Type sizes and paragraph spacing live here rather than in the exporters so
//! both output formats agree on them.

use crate::style::{Color, FontRole};

/// One unit of document content.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading(Heading),
    Paragraph(Paragraph),
    Spacer(Spacer),
    Divider(Divider),
}

impl Block {
    /// Plain text of the block (empty for spacers and dividers).
    pub fn text(&self) -> String {
        match self {
            Block::Heading(h) => h.text.clone(),
            Block::Paragraph(p) => p.text(),
            Block::Spacer(_) | Block::Divider(_) => String::new(),
        }
    }

    pub fn as_heading(&self) -> Option<&Heading> {
        match self {
            Block::Heading(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            Block::Paragraph(p) => Some(p),
            _ => None,
        }
    }
}

/// Horizontal alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
}

/// Heading levels, from the person's name down to an entry title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadingLevel {
    /// The resume owner's name.
    Name,
    /// A section title such as EXPERIENCE.
    Section,
    /// The title line of one entry in a section.
    Entry,
}

impl HeadingLevel {
    pub fn size_pt(self) -> f32 {
        match self {
            HeadingLevel::Name => 24.0,
            HeadingLevel::Section => 12.0,
            HeadingLevel::Entry => 11.0,
        }
    }

    pub fn space_before_pt(self) -> f32 {
        match self {
            HeadingLevel::Section => 12.0,
            HeadingLevel::Name | HeadingLevel::Entry => 0.0,
        }
    }

    pub fn space_after_pt(self) -> f32 {
        match self {
            HeadingLevel::Name => 4.0,
            HeadingLevel::Section => 6.0,
            HeadingLevel::Entry => 2.0,
        }
    }
}

/// A single-line bold heading.
#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    pub level: HeadingLevel,
    pub text: String,
    pub color: Color,
    pub font: FontRole,
    pub align: Align,
}

/// What a paragraph is for; decides its size and spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParagraphKind {
    /// Professional label under the name.
    Label,
    /// Contact details and profile links in the header.
    Contact,
    /// Organization, dates and other secondary entry details.
    Subtitle,
    Body,
    /// A highlight rendered with a bullet and a hanging indent.
    Bullet,
}

impl ParagraphKind {
    pub fn size_pt(self) -> f32 {
        match self {
            ParagraphKind::Label => 14.0,
            _ => 10.0,
        }
    }

    pub fn space_after_pt(self) -> f32 {
        match self {
            ParagraphKind::Label => 8.0,
            ParagraphKind::Contact => 8.0,
            ParagraphKind::Subtitle => 4.0,
            ParagraphKind::Body => 6.0,
            ParagraphKind::Bullet => 2.0,
        }
    }

    /// Left indent in points.
    pub fn indent_pt(self) -> f32 {
        match self {
            ParagraphKind::Bullet => 12.0,
            _ => 0.0,
        }
    }

    /// Marker drawn before the first run.
    pub fn marker(self) -> Option<&'static str> {
        match self {
            ParagraphKind::Bullet => Some("\u{2022} "),
            _ => None,
        }
    }
}

/// Inline text runs laid out as one wrapped paragraph.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub kind: ParagraphKind,
    pub runs: Vec<Run>,
    pub align: Align,
}

impl Paragraph {
    pub fn new(kind: ParagraphKind, runs: Vec<Run>) -> Self {
        Self {
            kind,
            runs,
            align: Align::Left,
        }
    }

    pub fn centered(mut self) -> Self {
        self.align = Align::Center;
        self
    }

    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    pub fn links(&self) -> impl Iterator<Item = &str> {
        self.runs.iter().filter_map(|r| r.link.as_deref())
    }
}

/// A span of text sharing one font, color and optional link target.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub text: String,
    pub color: Color,
    pub font: FontRole,
    pub italic: bool,
    /// Absolute URL (`https:`, `mailto:`, `tel:`) the run links to.
    pub link: Option<String>,
}

impl Run {
    pub fn new(text: impl Into<String>, color: Color, font: FontRole) -> Self {
        Self {
            text: text.into(),
            color,
            font,
            italic: false,
            link: None,
        }
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn is_link(&self) -> bool {
        self.link.is_some()
    }
}

/// Vertical whitespace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spacer {
    pub points: f32,
}

/// A full-width horizontal rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Divider {
    pub color: Color,
    pub thickness: f32,
}

impl Divider {
    /// Space kept above and below the rule.
    pub const MARGIN_PT: f32 = 8.0;
}
