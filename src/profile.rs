//! Profile URL resolution: `(network, username)` to a canonical profile URL.

use std::collections::BTreeMap;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

/// Placeholder substituted with the username in a template.
pub const USERNAME_PLACEHOLDER: &str = "{username}";

/// Characters escaped when a username is placed in a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    ("behance", "https://www.behance.net/{username}"),
    ("bitbucket", "https://bitbucket.org/{username}"),
    ("codepen", "https://codepen.io/{username}"),
    ("dev.to", "https://dev.to/{username}"),
    ("dribbble", "https://dribbble.com/{username}"),
    ("facebook", "https://www.facebook.com/{username}"),
    ("github", "https://github.com/{username}"),
    ("gitlab", "https://gitlab.com/{username}"),
    ("hackerrank", "https://www.hackerrank.com/profile/{username}"),
    ("instagram", "https://www.instagram.com/{username}"),
    ("keybase", "https://keybase.io/{username}"),
    ("leetcode", "https://leetcode.com/u/{username}"),
    ("linkedin", "https://www.linkedin.com/in/{username}"),
    ("medium", "https://medium.com/@{username}"),
    ("reddit", "https://www.reddit.com/user/{username}"),
    ("soundcloud", "https://soundcloud.com/{username}"),
    ("stackoverflow", "https://stackoverflow.com/users/{username}"),
    ("twitch", "https://www.twitch.tv/{username}"),
    ("twitter", "https://twitter.com/{username}"),
    ("x", "https://x.com/{username}"),
    ("youtube", "https://www.youtube.com/@{username}"),
];

/// Lookup table from lower-cased network name to URL template.
#[derive(Debug, Clone, Default)]
pub struct ProfileUrlTable {
    templates: BTreeMap<String, String>,
}

impl ProfileUrlTable {
    /// Table with no templates; only explicit URLs resolve.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Templates for common professional and social networks.
    pub fn builtin() -> Self {
        BUILTIN_TEMPLATES
            .iter()
            .fold(Self::empty(), |table, (network, pattern)| {
                table.with_template(network, pattern)
            })
    }

    /// Add or replace the template for `network`.
    ///
    /// `pattern` should contain [`USERNAME_PLACEHOLDER`].
    pub fn with_template(mut self, network: &str, pattern: &str) -> Self {
        self.templates
            .insert(network.trim().to_lowercase(), pattern.to_string());
        self
    }

    /// Template registered for `network`, compared case-insensitively.
    pub fn template(&self, network: &str) -> Option<&str> {
        self.templates
            .get(&network.trim().to_lowercase())
            .map(String::as_str)
    }

    /// Resolve the URL for a profile.
    ///
    /// A non-empty `provided_url` is returned unchanged. Otherwise the
    /// network's template is filled with the username. Unknown networks and
    /// missing usernames resolve to `None`.
    pub fn resolve(
        &self,
        network: &str,
        username: &str,
        provided_url: Option<&str>,
    ) -> Option<String> {
        if let Some(url) = provided_url.filter(|u| !u.trim().is_empty()) {
            return Some(url.to_string());
        }

        let username = username.trim().trim_start_matches('@');
        if username.is_empty() {
            return None;
        }

        let pattern = self.template(network)?;
        let encoded = utf8_percent_encode(username, PATH_SEGMENT).to_string();
        Some(pattern.replace(USERNAME_PLACEHOLDER, &encoded))
    }

    pub fn networks(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }
}
