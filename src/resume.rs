//! The JSON Resume data model.
//!
//! See <https://jsonresume.org/schema>. Every field is optional and every list
//! defaults to empty; unknown keys are ignored. A parsed [`Resume`] is never
//! mutated by the renderer.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::sections::SectionId;
use crate::util::decode_text;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Location {
    pub address: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub country_code: Option<String>,
    pub region: Option<String>,
}

impl Location {
    /// `"city, region, countryCode"` with missing parts skipped.
    pub fn display(&self) -> Option<String> {
        let parts: Vec<&str> = [&self.city, &self.region, &self.country_code]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        (!parts.is_empty()).then(|| parts.join(", "))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub network: Option<String>,
    pub username: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Basics {
    pub name: Option<String>,
    pub label: Option<String>,
    pub image: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub url: Option<String>,
    pub summary: Option<String>,
    pub location: Option<Location>,
    pub profiles: Vec<Profile>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Work {
    pub name: Option<String>,
    pub position: Option<String>,
    pub url: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub summary: Option<String>,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Volunteer {
    pub organization: Option<String>,
    pub position: Option<String>,
    pub url: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub summary: Option<String>,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Education {
    pub institution: Option<String>,
    pub url: Option<String>,
    pub area: Option<String>,
    pub study_type: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub score: Option<String>,
    pub courses: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Award {
    pub title: Option<String>,
    pub date: Option<String>,
    pub awarder: Option<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Certificate {
    pub name: Option<String>,
    pub date: Option<String>,
    pub issuer: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Publication {
    pub name: Option<String>,
    pub publisher: Option<String>,
    pub release_date: Option<String>,
    pub url: Option<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skill {
    pub name: Option<String>,
    pub level: Option<String>,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Language {
    pub language: Option<String>,
    pub fluency: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Interest {
    pub name: Option<String>,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reference {
    pub name: Option<String>,
    pub reference: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
    pub name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub highlights: Vec<String>,
    pub url: Option<String>,
}

/// A complete resume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resume {
    pub basics: Option<Basics>,
    pub work: Vec<Work>,
    pub volunteer: Vec<Volunteer>,
    pub education: Vec<Education>,
    pub awards: Vec<Award>,
    pub certificates: Vec<Certificate>,
    pub publications: Vec<Publication>,
    pub skills: Vec<Skill>,
    pub languages: Vec<Language>,
    pub interests: Vec<Interest>,
    pub references: Vec<Reference>,
    pub projects: Vec<Project>,
}

impl Resume {
    /// Parse a resume from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a resume from raw bytes, tolerating a BOM and legacy encodings.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Self::from_json_str(&decode_text(bytes))
    }

    /// Read and parse a resume file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_slice(&bytes)
    }

    /// The resume owner's name, if given.
    pub fn name(&self) -> Option<&str> {
        self.basics
            .as_ref()
            .and_then(|b| b.name.as_deref())
            .map(str::trim)
            .filter(|n| !n.is_empty())
    }

    /// Number of entries in a section (`basics` counts as one when present).
    pub fn entry_count(&self, section: SectionId) -> usize {
        match section {
            SectionId::Basics => usize::from(self.basics.is_some()),
            SectionId::Work => self.work.len(),
            SectionId::Education => self.education.len(),
            SectionId::Skills => self.skills.len(),
            SectionId::Projects => self.projects.len(),
            SectionId::Certificates => self.certificates.len(),
            SectionId::Awards => self.awards.len(),
            SectionId::Publications => self.publications.len(),
            SectionId::Volunteer => self.volunteer.len(),
            SectionId::Languages => self.languages.len(),
            SectionId::Interests => self.interests.len(),
            SectionId::References => self.references.len(),
        }
    }

    /// Sections that are present, with entry counts, in render order.
    pub fn section_counts(&self) -> Vec<(SectionId, usize)> {
        SectionId::ALL
            .iter()
            .map(|&id| (id, self.entry_count(id)))
            .filter(|&(_, count)| count > 0)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_camel_case_fields() {
        let resume = Resume::from_json_str(
            r#"{
                "basics": {"name": "Ada", "location": {"city": "London", "countryCode": "GB"}},
                "work": [{"name": "Analytical Engines", "startDate": "1842-01", "highlights": ["Notes"]}],
                "education": [{"studyType": "Private tutoring", "area": "Mathematics"}],
                "x-custom": true
            }"#,
        )
        .unwrap();

        assert_eq!(resume.name(), Some("Ada"));
        assert_eq!(resume.work[0].start_date.as_deref(), Some("1842-01"));
        assert_eq!(resume.work[0].highlights, ["Notes"]);
        assert_eq!(resume.education[0].study_type.as_deref(), Some("Private tutoring"));
        let location = resume.basics.unwrap().location.unwrap();
        assert_eq!(location.display().as_deref(), Some("London, GB"));
    }

    #[test]
    fn test_empty_document() {
        let resume = Resume::from_json_str("{}").unwrap();
        assert_eq!(resume, Resume::default());
        assert!(resume.section_counts().is_empty());
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        assert!(Resume::from_json_str(r#"{"work": "everywhere"}"#).is_err());
    }

    #[test]
    fn test_section_counts_follow_render_order() {
        let resume = Resume::from_json_str(
            r#"{"skills": [{"name": "Rust"}], "basics": {"name": "A"}, "work": [{}, {}]}"#,
        )
        .unwrap();
        assert_eq!(
            resume.section_counts(),
            [(SectionId::Basics, 1), (SectionId::Work, 2), (SectionId::Skills, 1)]
        );
    }

    #[test]
    fn test_from_slice_with_bom() {
        let resume = Resume::from_slice(b"\xEF\xBB\xBF{\"basics\": {\"name\": \"Bo\"}}").unwrap();
        assert_eq!(resume.name(), Some("Bo"));
    }
}
