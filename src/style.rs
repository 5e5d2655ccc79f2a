//! Named styles: color roles and font roles applied uniformly across a render.
//!
//! Styles are static data. A [`StyleRegistry`] is built once (usually via
//! [`StyleRegistry::builtin`]) and passed by reference into the section
//! pipeline and the exporters.

use std::fmt;

use crate::error::{Error, Result};

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    /// Create a new color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Upper-case hex without a leading `#` (`2C3E50`), as WordprocessingML wants it.
    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Components scaled to `0.0..=1.0` for PDF color operators.
    pub fn to_unit_rgb(self) -> (f32, f32, f32) {
        (
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Font weight of a font role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

impl FontWeight {
    pub fn is_bold(self) -> bool {
        self == FontWeight::Bold
    }
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FontWeight::Regular => "regular",
            FontWeight::Bold => "bold",
        })
    }
}

/// A font family at a specific weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontRole {
    pub family: &'static str,
    pub weight: FontWeight,
}

impl FontRole {
    pub const fn regular(family: &'static str) -> Self {
        Self {
            family,
            weight: FontWeight::Regular,
        }
    }

    pub const fn bold(family: &'static str) -> Self {
        Self {
            family,
            weight: FontWeight::Bold,
        }
    }
}

/// A complete bundle of colors and fonts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    pub name: &'static str,
    /// One-line summary shown by `vita styles`.
    pub description: &'static str,
    /// Name, entry titles and body text.
    pub primary: Color,
    /// Section headings, subtitles, contact details and the header rule.
    pub secondary: Color,
    /// Hyperlinks.
    pub accent: Color,
    pub body_font: FontRole,
    pub bold_font: FontRole,
}

const SANS: &str = "Liberation Sans";
const SERIF: &str = "Liberation Serif";

const BUILTIN_STYLES: [Style; 4] = [
    Style {
        name: "professional",
        description: "Clean and traditional - ideal for corporate roles",
        primary: Color::rgb(0x2c, 0x3e, 0x50),
        secondary: Color::rgb(0x7f, 0x8c, 0x8d),
        accent: Color::rgb(0x34, 0x98, 0xdb),
        body_font: FontRole::regular(SANS),
        bold_font: FontRole::bold(SANS),
    },
    Style {
        name: "modern",
        description: "Bold colors and contemporary layout - for creative industries",
        primary: Color::rgb(0x1a, 0x1a, 0x2e),
        secondary: Color::rgb(0x4a, 0x4a, 0x4a),
        accent: Color::rgb(0xe9, 0x45, 0x60),
        body_font: FontRole::regular(SANS),
        bold_font: FontRole::bold(SANS),
    },
    Style {
        name: "elegant",
        description: "Refined typography with subtle accents - for executive positions",
        primary: Color::rgb(0x2d, 0x34, 0x36),
        secondary: Color::rgb(0x63, 0x6e, 0x72),
        accent: Color::rgb(0x6c, 0x5c, 0xe7),
        body_font: FontRole::regular(SERIF),
        bold_font: FontRole::bold(SERIF),
    },
    Style {
        name: "minimal",
        description: "Simple black and white - maximum readability",
        primary: Color::BLACK,
        secondary: Color::rgb(0x55, 0x55, 0x55),
        accent: Color::BLACK,
        body_font: FontRole::regular(SANS),
        bold_font: FontRole::bold(SANS),
    },
];

/// Ordered set of named styles.
#[derive(Debug, Clone)]
pub struct StyleRegistry {
    styles: Vec<Style>,
}

impl StyleRegistry {
    /// The styles shipped with vita, in presentation order.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_STYLES.to_vec())
    }

    pub fn new(styles: Vec<Style>) -> Self {
        Self { styles }
    }

    /// Look up a style by name.
    ///
    /// Exact matches win; otherwise the name is compared ignoring ASCII case.
    pub fn resolve(&self, name: &str) -> Result<&Style> {
        self.styles
            .iter()
            .find(|s| s.name == name)
            .or_else(|| self.styles.iter().find(|s| s.name.eq_ignore_ascii_case(name)))
            .ok_or_else(|| Error::UnknownStyle {
                name: name.to_string(),
                available: self.names().map(str::to_string).collect(),
            })
    }

    /// Style names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.styles.iter().map(|s| s.name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Style> {
        self.styles.iter()
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names_in_order() {
        let registry = StyleRegistry::builtin();
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, ["professional", "modern", "elegant", "minimal"]);
    }

    #[test]
    fn test_resolve_is_case_insensitive_fallback() {
        let registry = StyleRegistry::builtin();
        assert_eq!(registry.resolve("Modern").unwrap().name, "modern");
        assert_eq!(registry.resolve("elegant").unwrap().body_font.family, SERIF);
    }

    #[test]
    fn test_resolve_unknown() {
        let registry = StyleRegistry::builtin();
        let err = registry.resolve("baroque").unwrap_err();
        match err {
            Error::UnknownStyle { name, available } => {
                assert_eq!(name, "baroque");
                assert_eq!(available.len(), 4);
            }
            other => panic!("expected UnknownStyle, got {other:?}"),
        }
    }

    #[test]
    fn test_every_style_has_bold_and_regular_roles() {
        for style in StyleRegistry::builtin().iter() {
            assert_eq!(style.body_font.weight, FontWeight::Regular, "{}", style.name);
            assert_eq!(style.bold_font.weight, FontWeight::Bold, "{}", style.name);
        }
    }

    #[test]
    fn test_color_formats() {
        let color = Color::rgb(0x2c, 0x3e, 0x50);
        assert_eq!(color.to_hex(), "2C3E50");
        assert_eq!(color.to_string(), "#2c3e50");
        assert_eq!(Color::BLACK.to_unit_rgb(), (0.0, 0.0, 0.0));
    }
}
