//! Line breaking and pagination.
//!
//! Blocks are flowed top to bottom into fixed-size pages. Coordinates are PDF
//! user space: points, origin at the bottom-left corner.

use crate::blocks::{Align, Block, Divider, Heading, HeadingLevel, Paragraph, Run};
use crate::page::Margins;
use crate::style::{Color, FontRole};

use super::fonts::Measure;

/// Line height as a multiple of font size.
const LEADING: f32 = 1.2;

/// A span of uniformly styled text on one line.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub text: String,
    pub font: FontRole,
    pub size: f32,
    pub color: Color,
    pub italic: bool,
    pub link: Option<String>,
    /// Left edge of the fragment.
    pub x: f32,
    pub baseline: f32,
    pub width: f32,
}

impl Fragment {
    fn same_style(&self, run: &Run, size: f32) -> bool {
        self.font == run.font
            && self.size == size
            && self.color == run.color
            && self.italic == run.italic
            && self.link == run.link
    }

    /// Clickable area: from below the descender to above the cap height.
    pub fn link_rect(&self) -> [f32; 4] {
        [
            self.x,
            self.baseline - self.size * 0.25,
            self.x + self.width,
            self.baseline + self.size * 0.85,
        ]
    }
}

/// A horizontal rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub x1: f32,
    pub x2: f32,
    pub y: f32,
    pub color: Color,
    pub thickness: f32,
}

/// Everything drawn on one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub fragments: Vec<Fragment>,
    pub rules: Vec<Rule>,
}

/// One wrapped line, positioned horizontally but not yet vertically.
#[derive(Debug, Default)]
struct Line {
    fragments: Vec<Fragment>,
    /// Pen position after the last fragment.
    end: f32,
    /// Width of trailing whitespace, ignored when centering.
    trailing: f32,
}

pub struct Layouter<'a, M: Measure> {
    measure: &'a M,
    width: f32,
    height: f32,
    margins: Margins,
    pages: Vec<PageLayout>,
    current: PageLayout,
    /// Top of the next line.
    cursor: f32,
}

impl<'a, M: Measure> Layouter<'a, M> {
    pub fn new(measure: &'a M, (width, height): (f32, f32), margins: Margins) -> Self {
        Self {
            measure,
            width,
            height,
            margins,
            pages: Vec::new(),
            current: PageLayout::default(),
            cursor: height - margins.top,
        }
    }

    /// Lay out all blocks. Always yields at least one page.
    pub fn layout(mut self, blocks: &[Block]) -> Vec<PageLayout> {
        for (i, block) in blocks.iter().enumerate() {
            match block {
                Block::Heading(heading) => {
                    let keep_with = blocks.get(i + 1).map_or(0.0, first_line_height);
                    self.heading(heading, keep_with);
                }
                Block::Paragraph(paragraph) => self.paragraph(paragraph),
                Block::Spacer(spacer) => self.advance(spacer.points),
                Block::Divider(divider) => self.divider(divider),
            }
        }
        self.pages.push(self.current);
        self.pages
    }

    fn top(&self) -> f32 {
        self.height - self.margins.top
    }

    fn at_page_top(&self) -> bool {
        self.cursor >= self.top()
    }

    fn content_width(&self) -> f32 {
        self.width - self.margins.left - self.margins.right
    }

    fn new_page(&mut self) {
        let finished = std::mem::take(&mut self.current);
        self.pages.push(finished);
        self.cursor = self.top();
    }

    /// Make sure `needed` points fit below the cursor.
    fn reserve(&mut self, needed: f32) {
        if self.cursor - needed < self.margins.bottom && !self.at_page_top() {
            self.new_page();
        }
    }

    /// Move down, without carrying whitespace onto a new page.
    fn advance(&mut self, points: f32) {
        if self.at_page_top() {
            return;
        }
        self.cursor -= points;
        if self.cursor < self.margins.bottom {
            self.new_page();
        }
    }

    fn heading(&mut self, heading: &Heading, keep_with: f32) {
        let size = heading.level.size_pt();
        self.advance(heading.level.space_before_pt());
        let run = Run::new(heading.text.clone(), heading.color, heading.font);
        let lines = self.wrap(std::slice::from_ref(&run), size, 0.0);

        if heading.level == HeadingLevel::Section {
            let height = lines.len() as f32 * size * LEADING;
            self.reserve(height + keep_with);
        }
        self.place(lines, size, heading.align, 0.0);
        self.advance(heading.level.space_after_pt());
    }

    fn paragraph(&mut self, paragraph: &Paragraph) {
        let kind = paragraph.kind;
        let size = kind.size_pt();
        let indent = kind.indent_pt();

        let marker = kind.marker().and_then(|marker| {
            let font = paragraph.runs.first()?.font;
            let color = paragraph.runs.first()?.color;
            Some(Run::new(marker, color, font))
        });
        let marker_width = marker
            .as_ref()
            .map_or(0.0, |m| self.measure.width(m.font, &m.text, size));

        let lines = self.wrap(&paragraph.runs, size, indent + marker_width);
        if lines.is_empty() {
            return;
        }

        let (page, baseline) = self.place(lines, size, paragraph.align, indent + marker_width);
        if let Some(marker) = marker {
            let fragment = Fragment {
                text: marker.text,
                font: marker.font,
                size,
                color: marker.color,
                italic: false,
                link: None,
                x: self.margins.left + indent,
                baseline,
                width: marker_width,
            };
            // The first line may sit on a page that is already finished.
            match self.pages.get_mut(page) {
                Some(finished) => finished.fragments.push(fragment),
                None => self.current.fragments.push(fragment),
            }
        }
        self.advance(kind.space_after_pt());
    }

    fn divider(&mut self, divider: &Divider) {
        self.advance(Divider::MARGIN_PT);
        self.reserve(divider.thickness);
        let y = self.cursor - divider.thickness / 2.0;
        self.current.rules.push(Rule {
            x1: self.margins.left,
            x2: self.width - self.margins.right,
            y,
            color: divider.color,
            thickness: divider.thickness,
        });
        self.cursor -= divider.thickness;
        self.advance(Divider::MARGIN_PT);
    }

    /// Break runs into lines no wider than the content width minus `indent`.
    fn wrap(&self, runs: &[Run], size: f32, indent: f32) -> Vec<Line> {
        let available = self.content_width() - indent;
        let mut lines = Vec::new();
        let mut line = Line::default();

        for run in runs {
            for (i, segment) in run.text.split('\n').enumerate() {
                if i > 0 {
                    lines.push(std::mem::take(&mut line));
                }
                for whole in segment.split_inclusive(' ') {
                    for word in self.split_oversized(run.font, whole, size, available) {
                        let width = self.measure.width(run.font, word, size);
                        let trimmed = word.trim_end_matches(' ');
                        let visible = self.measure.width(run.font, trimmed, size);
                        if line.end + visible > available && !line.fragments.is_empty() {
                            lines.push(std::mem::take(&mut line));
                        }
                        push_word(&mut line, run, word, size, width);
                        line.trailing = width - visible;
                    }
                }
            }
        }
        if !line.fragments.is_empty() {
            lines.push(line);
        }
        lines
    }

    /// Cut a word wider than a whole line at character boundaries, so long
    /// URLs and unspaced CJK text still wrap. Trailing spaces stay on the
    /// last piece.
    fn split_oversized<'w>(&self, font: FontRole, word: &'w str, size: f32, available: f32) -> Vec<&'w str> {
        let visible = word.trim_end_matches(' ');
        if self.measure.width(font, visible, size) <= available {
            return vec![word];
        }
        let mut pieces = Vec::new();
        let mut start = 0;
        for (i, c) in visible.char_indices() {
            let end = i + c.len_utf8();
            if i > start && self.measure.width(font, &visible[start..end], size) > available {
                pieces.push(&word[start..i]);
                start = i;
            }
        }
        pieces.push(&word[start..]);
        pieces
    }

    /// Position lines below the cursor, breaking pages as needed. Returns the
    /// page index and baseline of the first line.
    fn place(&mut self, lines: Vec<Line>, size: f32, align: Align, indent: f32) -> (usize, f32) {
        let line_height = size * LEADING;
        let mut first = None;
        for line in lines {
            self.reserve(line_height);
            let baseline = self.cursor - size;
            let offset = match align {
                Align::Left => indent,
                Align::Center => {
                    let used = line.end - line.trailing;
                    indent + ((self.content_width() - indent - used) / 2.0).max(0.0)
                }
            };
            let left = self.margins.left + offset;
            for mut fragment in line.fragments {
                fragment.x += left;
                fragment.baseline = baseline;
                self.current.fragments.push(fragment);
            }
            first.get_or_insert((self.pages.len(), baseline));
            self.cursor -= line_height;
        }
        first.unwrap_or((self.pages.len(), self.cursor))
    }
}

fn push_word(line: &mut Line, run: &Run, word: &str, size: f32, width: f32) {
    match line.fragments.last_mut() {
        Some(last) if last.same_style(run, size) => {
            last.text.push_str(word);
            last.width += width;
        }
        _ => line.fragments.push(Fragment {
            text: word.to_string(),
            font: run.font,
            size,
            color: run.color,
            italic: run.italic,
            link: run.link.clone(),
            x: line.end,
            baseline: 0.0,
            width,
        }),
    }
    line.end += width;
}

/// Height of the first line of a block, for keep-with-next.
fn first_line_height(block: &Block) -> f32 {
    match block {
        Block::Heading(h) => h.level.size_pt() * LEADING,
        Block::Paragraph(p) => p.kind.size_pt() * LEADING,
        Block::Spacer(_) | Block::Divider(_) => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{ParagraphKind, Spacer};
    use crate::page::PAGE_MARGINS;

    /// Every character is half the font size wide.
    struct Fixed;

    impl Measure for Fixed {
        fn width(&self, _: FontRole, text: &str, size: f32) -> f32 {
            text.chars().count() as f32 * size * 0.5
        }
    }

    const FONT: FontRole = FontRole::regular("Test Sans");
    const LETTER: (f32, f32) = (612.0, 792.0);

    fn body(text: &str) -> Block {
        Block::Paragraph(Paragraph::new(
            ParagraphKind::Body,
            vec![Run::new(text, Color::BLACK, FONT)],
        ))
    }

    fn layout(blocks: &[Block]) -> Vec<PageLayout> {
        Layouter::new(&Fixed, LETTER, PAGE_MARGINS).layout(blocks)
    }

    fn page_text(page: &PageLayout) -> String {
        page.fragments.iter().map(|f| f.text.as_str()).collect()
    }

    #[test]
    fn test_unicode_text_is_preserved() {
        let text = "Zoë Ødegaard, 李小龍, Ελληνικά, n\u{0303}o\u{0308}";
        let pages = layout(&[body(text)]);
        assert_eq!(pages.len(), 1);
        assert_eq!(page_text(&pages[0]), text);
    }

    #[test]
    fn test_long_paragraph_wraps_within_margins() {
        let text = "word ".repeat(200);
        let pages = layout(&[body(text.trim_end())]);
        let right = LETTER.0 - PAGE_MARGINS.right;
        let fragments = &pages[0].fragments;
        let mut baselines: Vec<f32> = fragments.iter().map(|f| f.baseline).collect();
        baselines.dedup();
        assert!(baselines.len() > 1);
        for fragment in fragments {
            let visible = fragment.text.trim_end().chars().count() as f32 * 5.0;
            assert!(fragment.x + visible <= right + 0.01, "{fragment:?}");
        }
        assert_eq!(page_text(&pages[0]), text.trim_end());
    }

    #[test]
    fn test_oversized_word_is_split() {
        let right = LETTER.0 - PAGE_MARGINS.right;
        // 504pt of content width holds 100 characters at 5pt each.
        for text in ["x".repeat(250), format!("see {}", "\u{674E}".repeat(150))] {
            let pages = layout(&[body(&text)]);
            let fragments = &pages[0].fragments;
            let mut baselines: Vec<f32> = fragments.iter().map(|f| f.baseline).collect();
            baselines.dedup();
            assert!(baselines.len() >= 2, "{text}");
            for fragment in fragments {
                let visible = fragment.text.trim_end().chars().count() as f32 * 5.0;
                assert!(fragment.x + visible <= right + 0.01, "{fragment:?}");
            }
            assert_eq!(page_text(&pages[0]), text);
        }

        let pages = layout(&[body(&"x".repeat(250))]);
        let lengths: Vec<usize> = pages[0].fragments.iter().map(|f| f.text.len()).collect();
        assert_eq!(lengths, [100, 100, 50]);
    }

    #[test]
    fn test_overflow_starts_a_new_page() {
        let blocks: Vec<Block> = (0..80).map(|i| body(&format!("line {i}"))).collect();
        let pages = layout(&blocks);
        assert!(pages.len() > 1);
        for page in &pages {
            for fragment in &page.fragments {
                assert!(fragment.baseline >= PAGE_MARGINS.bottom);
            }
        }
    }

    #[test]
    fn test_centered_line() {
        let para = Paragraph::new(
            ParagraphKind::Body,
            vec![Run::new("abcd", Color::BLACK, FONT)],
        )
        .centered();
        let pages = layout(&[Block::Paragraph(para)]);
        let fragment = &pages[0].fragments[0];
        let center = fragment.x + fragment.width / 2.0;
        assert!((center - LETTER.0 / 2.0).abs() < 0.01);
    }

    #[test]
    fn test_bullet_marker_and_hanging_indent() {
        let para = Paragraph::new(
            ParagraphKind::Bullet,
            vec![Run::new("Shipped it", Color::BLACK, FONT)],
        );
        let pages = layout(&[Block::Paragraph(para)]);
        let fragments = &pages[0].fragments;
        let marker = fragments.iter().find(|f| f.text == "\u{2022} ").unwrap();
        let text = fragments.iter().find(|f| f.text == "Shipped it").unwrap();
        assert_eq!(marker.x, PAGE_MARGINS.left + ParagraphKind::Bullet.indent_pt());
        assert_eq!(marker.baseline, text.baseline);
        assert!(text.x > marker.x);
    }

    #[test]
    fn test_section_heading_keeps_with_next() {
        let mut blocks: Vec<Block> = Vec::new();
        // Leave room for the heading but not for the line after it.
        let line = ParagraphKind::Body.size_pt() * LEADING + ParagraphKind::Body.space_after_pt();
        let room = LETTER.1 - PAGE_MARGINS.top - PAGE_MARGINS.bottom;
        let count = ((room - 30.0) / line) as usize;
        blocks.extend((0..count).map(|_| body("filler")));
        let remaining = room - count as f32 * line;
        blocks.push(Block::Spacer(Spacer {
            points: remaining - 30.0,
        }));
        blocks.push(Block::Heading(Heading {
            level: HeadingLevel::Section,
            text: "EXPERIENCE".to_string(),
            color: Color::BLACK,
            font: FontRole::bold("Test Sans"),
            align: Align::Left,
        }));
        blocks.push(body("Engineer"));

        let pages = layout(&blocks);
        assert_eq!(pages.len(), 2);
        assert_eq!(page_text(&pages[1]), "EXPERIENCEEngineer");
    }

    #[test]
    fn test_divider_spans_content_width() {
        let pages = layout(&[
            body("above"),
            Block::Divider(Divider {
                color: Color::BLACK,
                thickness: 1.0,
            }),
        ]);
        let rule = &pages[0].rules[0];
        assert_eq!(rule.x1, PAGE_MARGINS.left);
        assert_eq!(rule.x2, LETTER.0 - PAGE_MARGINS.right);
        assert!(rule.y < pages[0].fragments[0].baseline);
    }

    #[test]
    fn test_links_keep_their_target() {
        let mut run = Run::new("site", Color::BLACK, FONT);
        run.link = Some("https://example.com".to_string());
        let para = Paragraph::new(
            ParagraphKind::Contact,
            vec![Run::new("Web: ", Color::BLACK, FONT), run],
        );
        let pages = layout(&[Block::Paragraph(para)]);
        let link = pages[0].fragments.iter().find(|f| f.link.is_some()).unwrap();
        assert_eq!(link.text, "site");
        let [x1, y1, x2, y2] = link.link_rect();
        assert!(x2 - x1 > 0.0 && y2 - y1 > 0.0);
    }

    #[test]
    fn test_empty_document_has_one_page() {
        assert_eq!(layout(&[]).len(), 1);
    }
}
