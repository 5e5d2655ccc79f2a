//! Page geometry shared by both exporters.

use std::fmt;
use std::str::FromStr;

/// Points per inch.
pub const PT_PER_INCH: f32 = 72.0;

/// Paper size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PageSize {
    #[default]
    Letter,
    A4,
}

impl PageSize {
    /// Width and height in points.
    pub fn dimensions_pt(self) -> (f32, f32) {
        match self {
            PageSize::Letter => (612.0, 792.0),
            PageSize::A4 => (595.28, 841.89),
        }
    }

    /// Width and height in twentieths of a point, as WordprocessingML uses.
    pub fn dimensions_twips(self) -> (u32, u32) {
        match self {
            PageSize::Letter => (12240, 15840),
            PageSize::A4 => (11906, 16838),
        }
    }
}

impl FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "letter" => Ok(PageSize::Letter),
            "a4" => Ok(PageSize::A4),
            other => Err(format!("unknown page size '{other}' (expected letter or a4)")),
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PageSize::Letter => "letter",
            PageSize::A4 => "a4",
        })
    }
}

/// Page margins in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

/// 0.5in top and bottom, 0.75in left and right.
pub const PAGE_MARGINS: Margins = Margins {
    top: 0.5 * PT_PER_INCH,
    right: 0.75 * PT_PER_INCH,
    bottom: 0.5 * PT_PER_INCH,
    left: 0.75 * PT_PER_INCH,
};

/// Convert points to twips.
pub fn pt_to_twips(pt: f32) -> u32 {
    (pt * 20.0).round() as u32
}
