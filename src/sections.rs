//! The section pipeline: resume data plus a style in, ordered blocks out.
//!
//! [`SECTIONS`] is the single source of section order. Each builder is a pure
//! function of the resume and the [`BuildContext`]; a section with no content
//! contributes no blocks at all.

use std::fmt;

use crate::blocks::{
    Align, Block, Divider, Heading, HeadingLevel, Paragraph, ParagraphKind, Run, Spacer,
};
use crate::error::Result;
use crate::profile::ProfileUrlTable;
use crate::resume::{Basics, Profile, Resume};
use crate::style::Style;
use crate::text::{format_date, format_date_range, hyperlink_run, mailto, tel};

/// Resume sections, in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionId {
    Basics,
    Work,
    Education,
    Skills,
    Projects,
    Certificates,
    Awards,
    Publications,
    Volunteer,
    Languages,
    Interests,
    References,
}

impl SectionId {
    pub const ALL: [SectionId; 12] = [
        SectionId::Basics,
        SectionId::Work,
        SectionId::Education,
        SectionId::Skills,
        SectionId::Projects,
        SectionId::Certificates,
        SectionId::Awards,
        SectionId::Publications,
        SectionId::Volunteer,
        SectionId::Languages,
        SectionId::Interests,
        SectionId::References,
    ];

    /// JSON Resume key of the section.
    pub fn key(self) -> &'static str {
        match self {
            SectionId::Basics => "basics",
            SectionId::Work => "work",
            SectionId::Education => "education",
            SectionId::Skills => "skills",
            SectionId::Projects => "projects",
            SectionId::Certificates => "certificates",
            SectionId::Awards => "awards",
            SectionId::Publications => "publications",
            SectionId::Volunteer => "volunteer",
            SectionId::Languages => "languages",
            SectionId::Interests => "interests",
            SectionId::References => "references",
        }
    }

    /// Heading text; the basics header has none.
    pub fn title(self) -> Option<&'static str> {
        Some(match self {
            SectionId::Basics => return None,
            SectionId::Work => "EXPERIENCE",
            SectionId::Education => "EDUCATION",
            SectionId::Skills => "SKILLS",
            SectionId::Projects => "PROJECTS",
            SectionId::Certificates => "CERTIFICATES",
            SectionId::Awards => "AWARDS",
            SectionId::Publications => "PUBLICATIONS",
            SectionId::Volunteer => "VOLUNTEER",
            SectionId::Languages => "LANGUAGES",
            SectionId::Interests => "INTERESTS",
            SectionId::References => "REFERENCES",
        })
    }

    pub fn description(self) -> &'static str {
        match self {
            SectionId::Basics => "Name, contact info, summary, and social profiles",
            SectionId::Work => "Work experience history",
            SectionId::Education => "Educational background",
            SectionId::Skills => "Technical and professional skills",
            SectionId::Projects => "Personal or professional projects",
            SectionId::Certificates => "Professional certifications",
            SectionId::Awards => "Awards and honors",
            SectionId::Publications => "Published works",
            SectionId::Volunteer => "Volunteer experience",
            SectionId::Languages => "Language proficiencies",
            SectionId::Interests => "Personal interests",
            SectionId::References => "Professional references",
        }
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Read-only inputs shared by every builder.
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    pub style: &'a Style,
    pub profiles: &'a ProfileUrlTable,
}

/// A section builder.
pub type SectionBuilder = fn(&Resume, &BuildContext<'_>) -> Result<Vec<Block>>;

/// Every section and its builder, in render order.
pub const SECTIONS: [(SectionId, SectionBuilder); 12] = [
    (SectionId::Basics, build_basics),
    (SectionId::Work, build_work),
    (SectionId::Education, build_education),
    (SectionId::Skills, build_skills),
    (SectionId::Projects, build_projects),
    (SectionId::Certificates, build_certificates),
    (SectionId::Awards, build_awards),
    (SectionId::Publications, build_publications),
    (SectionId::Volunteer, build_volunteer),
    (SectionId::Languages, build_languages),
    (SectionId::Interests, build_interests),
    (SectionId::References, build_references),
];

/// Run every section builder in order and concatenate their blocks.
pub fn build_blocks(resume: &Resume, ctx: &BuildContext<'_>) -> Result<Vec<Block>> {
    let mut blocks = Vec::new();
    for (_, builder) in &SECTIONS {
        blocks.extend(builder(resume, ctx)?);
    }
    Ok(blocks)
}

const SEPARATOR: &str = " | ";
const ENTRY_GAP_PT: f32 = 6.0;

/// Trimmed, non-empty contents of an optional field.
fn filled(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn filled_items(items: &[String]) -> Vec<&str> {
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect()
}

impl BuildContext<'_> {
    fn heading(&self, level: HeadingLevel, text: &str) -> Block {
        let (color, align) = match level {
            HeadingLevel::Name => (self.style.primary, Align::Center),
            HeadingLevel::Section => (self.style.secondary, Align::Left),
            HeadingLevel::Entry => (self.style.primary, Align::Left),
        };
        Block::Heading(Heading {
            level,
            text: text.to_string(),
            color,
            font: self.style.bold_font,
            align,
        })
    }

    fn plain(&self, text: &str) -> Run {
        Run::new(text, self.style.primary, self.style.body_font)
    }

    fn muted(&self, text: &str) -> Run {
        Run::new(text, self.style.secondary, self.style.body_font)
    }

    fn strong(&self, text: &str) -> Run {
        Run::new(text, self.style.primary, self.style.bold_font)
    }

    fn link(&self, text: &str, target: &str) -> Run {
        hyperlink_run(text, target, self.style)
    }

    /// Join runs with muted `" | "` separators.
    fn joined(&self, pieces: Vec<Run>) -> Vec<Run> {
        let mut runs = Vec::with_capacity(pieces.len() * 2);
        for piece in pieces {
            if !runs.is_empty() {
                runs.push(self.muted(SEPARATOR));
            }
            runs.push(piece);
        }
        runs
    }

    fn paragraph(&self, kind: ParagraphKind, runs: Vec<Run>) -> Option<Block> {
        (!runs.is_empty()).then(|| Block::Paragraph(Paragraph::new(kind, runs)))
    }

    fn body(&self, text: Option<&str>) -> Option<Block> {
        text.map(|t| Block::Paragraph(Paragraph::new(ParagraphKind::Body, vec![self.plain(t)])))
    }

    fn bullets<'a>(&'a self, items: &'a [String]) -> impl Iterator<Item = Block> + 'a {
        filled_items(items).into_iter().map(|item| {
            Block::Paragraph(Paragraph::new(ParagraphKind::Bullet, vec![self.plain(item)]))
        })
    }

    /// Subtitle line: optional organization (linked when a URL is known),
    /// then extra pieces such as dates.
    fn subtitle(&self, org: Option<&str>, url: Option<&str>, extra: Vec<Run>) -> Option<Block> {
        let mut pieces = Vec::new();
        match (org, url) {
            (Some(org), Some(url)) => pieces.push(self.link(org, url)),
            (Some(org), None) => pieces.push(self.muted(org)),
            (None, Some(url)) => pieces.push(self.link(url, url)),
            (None, None) => {}
        }
        pieces.extend(extra);
        self.paragraph(ParagraphKind::Subtitle, self.joined(pieces))
    }

    fn dates(&self, start: &Option<String>, end: &Option<String>) -> Result<Option<Run>> {
        let range = format_date_range(start.as_deref(), end.as_deref())?;
        Ok((!range.is_empty()).then(|| self.muted(&range)))
    }

    fn date(&self, date: &Option<String>) -> Result<Option<Run>> {
        let Some(date) = filled(date) else {
            return Ok(None);
        };
        Ok(Some(self.muted(&format_date(date)?)))
    }
}

/// How entries in a section are separated.
#[derive(Clone, Copy, PartialEq)]
enum Spacing {
    /// A gap after every entry.
    Spaced,
    /// Entries run together with one gap closing the section.
    Compact,
}

/// Wrap entry groups under a section heading, or emit nothing when every
/// group is empty.
fn section(ctx: &BuildContext<'_>, id: SectionId, groups: Vec<Vec<Block>>, spacing: Spacing) -> Vec<Block> {
    let groups: Vec<_> = groups.into_iter().filter(|g| !g.is_empty()).collect();
    let Some(title) = id.title() else {
        return groups.into_iter().flatten().collect();
    };
    if groups.is_empty() {
        return Vec::new();
    }

    let gap = Block::Spacer(Spacer {
        points: ENTRY_GAP_PT,
    });
    let mut blocks = vec![ctx.heading(HeadingLevel::Section, title)];
    for group in groups {
        blocks.extend(group);
        if spacing == Spacing::Spaced {
            blocks.push(gap.clone());
        }
    }
    if spacing == Spacing::Compact {
        blocks.push(gap);
    }
    blocks
}

fn build_basics(resume: &Resume, ctx: &BuildContext<'_>) -> Result<Vec<Block>> {
    let Some(basics) = &resume.basics else {
        return Ok(Vec::new());
    };

    let mut blocks = Vec::new();
    if let Some(name) = filled(&basics.name) {
        blocks.push(ctx.heading(HeadingLevel::Name, name));
    }
    if let Some(label) = filled(&basics.label) {
        blocks.push(Block::Paragraph(
            Paragraph::new(ParagraphKind::Label, vec![ctx.muted(label)]).centered(),
        ));
    }
    if let Some(contact) = contact_line(basics, ctx) {
        blocks.push(Block::Paragraph(contact.centered()));
    }
    if let Some(profiles) = profile_line(&basics.profiles, ctx) {
        blocks.push(Block::Paragraph(profiles.centered()));
    }
    blocks.extend(ctx.body(filled(&basics.summary)));

    if !blocks.is_empty() {
        blocks.push(Block::Divider(Divider {
            color: ctx.style.secondary,
            thickness: 1.0,
        }));
    }
    Ok(blocks)
}

fn contact_line(basics: &Basics, ctx: &BuildContext<'_>) -> Option<Paragraph> {
    let mut pieces = Vec::new();
    if let Some(email) = filled(&basics.email) {
        pieces.push(ctx.link(email, &mailto(email)));
    }
    if let Some(phone) = filled(&basics.phone) {
        pieces.push(ctx.link(phone, &tel(phone)));
    }
    if let Some(url) = filled(&basics.url) {
        pieces.push(ctx.link(url, url));
    }
    if let Some(location) = basics.location.as_ref().and_then(|l| l.display()) {
        pieces.push(ctx.muted(&location));
    }
    (!pieces.is_empty()).then(|| Paragraph::new(ParagraphKind::Contact, ctx.joined(pieces)))
}

fn profile_line(profiles: &[Profile], ctx: &BuildContext<'_>) -> Option<Paragraph> {
    let pieces: Vec<Run> = profiles
        .iter()
        .filter_map(|profile| {
            let url = filled(&profile.url);
            match (filled(&profile.network), filled(&profile.username)) {
                (Some(network), Some(username)) => {
                    let display = format!("{network}: {username}");
                    Some(match ctx.profiles.resolve(network, username, url) {
                        Some(target) => ctx.link(&display, &target),
                        None => ctx.muted(&display),
                    })
                }
                _ => url.map(|url| ctx.link(url, url)),
            }
        })
        .collect();
    (!pieces.is_empty()).then(|| Paragraph::new(ParagraphKind::Contact, ctx.joined(pieces)))
}

fn build_work(resume: &Resume, ctx: &BuildContext<'_>) -> Result<Vec<Block>> {
    let mut groups = Vec::with_capacity(resume.work.len());
    for job in &resume.work {
        groups.push(role_entry(
            ctx,
            filled(&job.position),
            filled(&job.name),
            filled(&job.url),
            ctx.dates(&job.start_date, &job.end_date)?,
            filled(&job.summary),
            &job.highlights,
        ));
    }
    Ok(section(ctx, SectionId::Work, groups, Spacing::Spaced))
}

fn build_volunteer(resume: &Resume, ctx: &BuildContext<'_>) -> Result<Vec<Block>> {
    let mut groups = Vec::with_capacity(resume.volunteer.len());
    for role in &resume.volunteer {
        groups.push(role_entry(
            ctx,
            filled(&role.position),
            filled(&role.organization),
            filled(&role.url),
            ctx.dates(&role.start_date, &role.end_date)?,
            filled(&role.summary),
            &role.highlights,
        ));
    }
    Ok(section(ctx, SectionId::Volunteer, groups, Spacing::Spaced))
}

/// Work and volunteer entries: role title, organization line, summary, highlights.
fn role_entry(
    ctx: &BuildContext<'_>,
    position: Option<&str>,
    org: Option<&str>,
    url: Option<&str>,
    dates: Option<Run>,
    summary: Option<&str>,
    highlights: &[String],
) -> Vec<Block> {
    let mut blocks = Vec::new();
    // Without a position the organization becomes the title.
    let org_line = match (position, org) {
        (Some(position), _) => {
            blocks.push(ctx.heading(HeadingLevel::Entry, position));
            org
        }
        (None, Some(org)) => {
            blocks.push(ctx.heading(HeadingLevel::Entry, org));
            None
        }
        (None, None) => None,
    };
    blocks.extend(ctx.subtitle(org_line, url, dates.into_iter().collect()));
    blocks.extend(ctx.body(summary));
    blocks.extend(ctx.bullets(highlights));
    blocks
}

fn build_education(resume: &Resume, ctx: &BuildContext<'_>) -> Result<Vec<Block>> {
    let mut groups = Vec::with_capacity(resume.education.len());
    for edu in &resume.education {
        let mut blocks = Vec::new();
        let title = match (filled(&edu.study_type), filled(&edu.area)) {
            (Some(kind), Some(area)) => Some(format!("{kind} in {area}")),
            (Some(only), None) | (None, Some(only)) => Some(only.to_string()),
            (None, None) => None,
        };
        let institution = filled(&edu.institution);
        let org_line = match (&title, institution) {
            (Some(title), _) => {
                blocks.push(ctx.heading(HeadingLevel::Entry, title));
                institution
            }
            (None, Some(institution)) => {
                blocks.push(ctx.heading(HeadingLevel::Entry, institution));
                None
            }
            (None, None) => None,
        };

        let mut extra = Vec::new();
        if let Some(score) = filled(&edu.score) {
            extra.push(ctx.muted(&format!("GPA: {score}")));
        }
        extra.extend(ctx.dates(&edu.start_date, &edu.end_date)?);
        blocks.extend(ctx.subtitle(org_line, filled(&edu.url), extra));

        let courses = filled_items(&edu.courses);
        if !courses.is_empty() {
            let text = format!("Courses: {}", courses.join(", "));
            blocks.extend(ctx.body(Some(&text)));
        }
        groups.push(blocks);
    }
    Ok(section(ctx, SectionId::Education, groups, Spacing::Spaced))
}

/// `name (level): keyword, keyword` with the name in bold.
fn keyword_line(ctx: &BuildContext<'_>, name: Option<&str>, level: Option<&str>, keywords: &[String]) -> Vec<Block> {
    let keywords = filled_items(keywords).join(", ");
    let mut runs = Vec::new();
    match name {
        Some(name) => {
            runs.push(ctx.strong(name));
            if let Some(level) = level {
                runs.push(ctx.plain(&format!(" ({level})")));
            }
            if !keywords.is_empty() {
                runs.push(ctx.plain(&format!(": {keywords}")));
            }
        }
        None if !keywords.is_empty() => runs.push(ctx.plain(&keywords)),
        None => {}
    }
    ctx.paragraph(ParagraphKind::Body, runs).into_iter().collect()
}

fn build_skills(resume: &Resume, ctx: &BuildContext<'_>) -> Result<Vec<Block>> {
    let groups = resume
        .skills
        .iter()
        .map(|skill| keyword_line(ctx, filled(&skill.name), filled(&skill.level), &skill.keywords))
        .collect();
    Ok(section(ctx, SectionId::Skills, groups, Spacing::Compact))
}

fn build_projects(resume: &Resume, ctx: &BuildContext<'_>) -> Result<Vec<Block>> {
    let mut groups = Vec::with_capacity(resume.projects.len());
    for project in &resume.projects {
        let mut blocks = Vec::new();
        if let Some(name) = filled(&project.name) {
            blocks.push(ctx.heading(HeadingLevel::Entry, name));
        }
        let dates = ctx.dates(&project.start_date, &project.end_date)?;
        let url = filled(&project.url);
        let mut pieces: Vec<Run> = dates.into_iter().collect();
        pieces.extend(url.map(|u| ctx.link(u, u)));
        blocks.extend(ctx.paragraph(ParagraphKind::Subtitle, ctx.joined(pieces)));
        blocks.extend(ctx.body(filled(&project.description)));
        blocks.extend(ctx.bullets(&project.highlights));
        groups.push(blocks);
    }
    Ok(section(ctx, SectionId::Projects, groups, Spacing::Spaced))
}

fn build_certificates(resume: &Resume, ctx: &BuildContext<'_>) -> Result<Vec<Block>> {
    let mut groups = Vec::with_capacity(resume.certificates.len());
    for cert in &resume.certificates {
        let mut blocks = Vec::new();
        if let Some(name) = filled(&cert.name) {
            blocks.push(ctx.heading(HeadingLevel::Entry, name));
        }
        let date: Vec<Run> = ctx.date(&cert.date)?.into_iter().collect();
        blocks.extend(ctx.subtitle(filled(&cert.issuer), filled(&cert.url), date));
        groups.push(blocks);
    }
    Ok(section(ctx, SectionId::Certificates, groups, Spacing::Spaced))
}

fn build_awards(resume: &Resume, ctx: &BuildContext<'_>) -> Result<Vec<Block>> {
    let mut groups = Vec::with_capacity(resume.awards.len());
    for award in &resume.awards {
        let mut blocks = Vec::new();
        if let Some(title) = filled(&award.title) {
            blocks.push(ctx.heading(HeadingLevel::Entry, title));
        }
        let date: Vec<Run> = ctx.date(&award.date)?.into_iter().collect();
        blocks.extend(ctx.subtitle(filled(&award.awarder), None, date));
        blocks.extend(ctx.body(filled(&award.summary)));
        groups.push(blocks);
    }
    Ok(section(ctx, SectionId::Awards, groups, Spacing::Spaced))
}

fn build_publications(resume: &Resume, ctx: &BuildContext<'_>) -> Result<Vec<Block>> {
    let mut groups = Vec::with_capacity(resume.publications.len());
    for publication in &resume.publications {
        let mut blocks = Vec::new();
        if let Some(name) = filled(&publication.name) {
            blocks.push(ctx.heading(HeadingLevel::Entry, name));
        }
        let date: Vec<Run> = ctx.date(&publication.release_date)?.into_iter().collect();
        blocks.extend(ctx.subtitle(filled(&publication.publisher), filled(&publication.url), date));
        blocks.extend(ctx.body(filled(&publication.summary)));
        groups.push(blocks);
    }
    Ok(section(ctx, SectionId::Publications, groups, Spacing::Spaced))
}

fn build_languages(resume: &Resume, ctx: &BuildContext<'_>) -> Result<Vec<Block>> {
    let entries: Vec<String> = resume
        .languages
        .iter()
        .filter_map(|lang| {
            let language = filled(&lang.language)?;
            Some(match filled(&lang.fluency) {
                Some(fluency) => format!("{language} ({fluency})"),
                None => language.to_string(),
            })
        })
        .collect();
    let group = if entries.is_empty() {
        Vec::new()
    } else {
        ctx.body(Some(&entries.join(", "))).into_iter().collect()
    };
    Ok(section(ctx, SectionId::Languages, vec![group], Spacing::Compact))
}

fn build_interests(resume: &Resume, ctx: &BuildContext<'_>) -> Result<Vec<Block>> {
    let groups = resume
        .interests
        .iter()
        .map(|interest| keyword_line(ctx, filled(&interest.name), None, &interest.keywords))
        .collect();
    Ok(section(ctx, SectionId::Interests, groups, Spacing::Compact))
}

fn build_references(resume: &Resume, ctx: &BuildContext<'_>) -> Result<Vec<Block>> {
    let groups = resume
        .references
        .iter()
        .map(|reference| {
            let mut blocks = Vec::new();
            if let Some(name) = filled(&reference.name) {
                blocks.push(ctx.heading(HeadingLevel::Entry, name));
            }
            if let Some(text) = filled(&reference.reference) {
                let quote = ctx.plain(&format!("\u{201c}{text}\u{201d}")).italic();
                blocks.extend(ctx.paragraph(ParagraphKind::Body, vec![quote]));
            }
            blocks
        })
        .collect();
    Ok(section(ctx, SectionId::References, groups, Spacing::Spaced))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::{Certificate, Skill, Work};
    use crate::style::StyleRegistry;

    fn with_ctx<T>(f: impl FnOnce(&BuildContext<'_>) -> T) -> T {
        let styles = StyleRegistry::builtin();
        let profiles = ProfileUrlTable::builtin();
        let ctx = BuildContext {
            style: styles.resolve("professional").unwrap(),
            profiles: &profiles,
        };
        f(&ctx)
    }

    fn section_titles(blocks: &[Block]) -> Vec<String> {
        blocks
            .iter()
            .filter_map(Block::as_heading)
            .filter(|h| h.level == HeadingLevel::Section)
            .map(|h| h.text.clone())
            .collect()
    }

    fn sample() -> Resume {
        Resume::from_json_str(
            r#"{
                "references": [{"name": "R. Ref", "reference": "Great"}],
                "skills": [{"name": "Rust", "level": "Expert", "keywords": ["async", "FFI"]}],
                "basics": {
                    "name": "Jo Doe",
                    "email": "jo@example.com",
                    "profiles": [
                        {"network": "LinkedIn", "username": "jdoe"},
                        {"network": "Blog", "username": "jo", "url": "https://jo.example"},
                        {"network": "Fediverse", "username": "jo"}
                    ]
                },
                "work": [
                    {"name": "Acme", "position": "Engineer", "url": "https://acme.example", "startDate": "2020-01"},
                    {"name": "Globex", "position": "Intern", "startDate": "2018", "endDate": "2019"}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_canonical_section_order() {
        let blocks = with_ctx(|ctx| build_blocks(&sample(), ctx)).unwrap();
        assert_eq!(section_titles(&blocks), ["EXPERIENCE", "SKILLS", "REFERENCES"]);
        assert_eq!(blocks[0].as_heading().unwrap().level, HeadingLevel::Name);
    }

    #[test]
    fn test_sections_table_matches_ids() {
        let ids: Vec<_> = SECTIONS.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, SectionId::ALL);
    }

    #[test]
    fn test_empty_resume_builds_nothing() {
        let blocks = with_ctx(|ctx| build_blocks(&Resume::default(), ctx)).unwrap();
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_entries_without_content_drop_the_section() {
        let resume = Resume {
            work: vec![Work::default(), Work::default()],
            skills: vec![Skill::default()],
            certificates: vec![Certificate::default()],
            ..Resume::default()
        };
        let blocks = with_ctx(|ctx| build_blocks(&resume, ctx)).unwrap();
        assert!(blocks.is_empty(), "{blocks:?}");
    }

    #[test]
    fn test_section_heading_uses_secondary_color() {
        with_ctx(|ctx| {
            let blocks = build_work(&sample(), ctx).unwrap();
            let heading = blocks[0].as_heading().unwrap();
            assert_eq!(heading.text, "EXPERIENCE");
            assert_eq!(heading.color, ctx.style.secondary);
            assert_eq!(heading.font, ctx.style.bold_font);
        });
    }

    #[test]
    fn test_work_preserves_source_order_and_formats_dates() {
        let blocks = with_ctx(|ctx| build_work(&sample(), ctx)).unwrap();
        let text: Vec<String> = blocks.iter().map(Block::text).filter(|t| !t.is_empty()).collect();
        assert_eq!(
            text,
            [
                "EXPERIENCE",
                "Engineer",
                "Acme | Jan 2020 \u{2013} Present",
                "Intern",
                "Globex | 2018 \u{2013} 2019",
            ]
        );
        let subtitle = blocks[2].as_paragraph().unwrap();
        assert_eq!(subtitle.links().collect::<Vec<_>>(), ["https://acme.example"]);
    }

    #[test]
    fn test_header_links() {
        with_ctx(|ctx| {
            let blocks = build_basics(&sample(), ctx).unwrap();
            let links: Vec<String> = blocks
                .iter()
                .filter_map(Block::as_paragraph)
                .flat_map(|p| p.links().map(str::to_string).collect::<Vec<_>>())
                .collect();
            assert_eq!(
                links,
                [
                    "mailto:jo@example.com",
                    "https://www.linkedin.com/in/jdoe",
                    "https://jo.example",
                ]
            );

            let profiles = blocks[2].as_paragraph().unwrap();
            assert_eq!(
                profiles.text(),
                "LinkedIn: jdoe | Blog: jo | Fediverse: jo"
            );
            // Unresolvable profile stays as plain text.
            let last = profiles.runs.last().unwrap();
            assert!(!last.is_link());
            assert_eq!(profiles.runs[0].color, ctx.style.accent);
            assert!(matches!(blocks.last(), Some(Block::Divider(_))));
        });
    }

    #[test]
    fn test_skills_line() {
        let blocks = with_ctx(|ctx| build_skills(&sample(), ctx)).unwrap();
        let para = blocks[1].as_paragraph().unwrap();
        assert_eq!(para.text(), "Rust (Expert): async, FFI");
        assert!(para.runs[0].font.weight.is_bold());
        assert!(matches!(blocks.last(), Some(Block::Spacer(_))));
    }

    #[test]
    fn test_malformed_date_surfaces() {
        let mut resume = sample();
        resume.work[0].start_date = Some("January".to_string());
        let err = with_ctx(|ctx| build_blocks(&resume, ctx)).unwrap_err();
        assert!(matches!(err, crate::Error::DateFormat { .. }));
    }

    #[test]
    fn test_builders_are_idempotent() {
        let resume = sample();
        let first = with_ctx(|ctx| build_blocks(&resume, ctx)).unwrap();
        let second = with_ctx(|ctx| build_blocks(&resume, ctx)).unwrap();
        assert_eq!(first, second);
    }
}
