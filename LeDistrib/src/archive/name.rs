//! Track file name decomposition
//!
//! Custom track files follow a loose naming convention:
//!
//! ```text
//! ++SNES Mario Circuit 3 v1.2 (Author) {Editor} [head=MC3,order=4] beta.szs
//! ^^ ^^^^ ^^^^^^^^^^^^^^ ^^^^ ^^^^^^^^ ^^^^^^^^ ^^^^^^^^^^^^^^^^^^ ^^^^
//! plus game  pure name    ver  authors  editors     attributes     extra
//! ```
//!
//! Every part except the pure name is optional.

use std::path::Path;

/// Recognized game prefixes; the ordering key is `1 + index`.
pub const GAME_PREFIXES: [&str; 10] = [
    "Wii", "DS", "GCN", "GBA", "N64", "SNES", "3DS", "GP", "Tour", "Switch",
];

/// Decomposed track file name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameParts {
    pub directory: String,
    /// File name without extension
    pub stem: String,
    pub extension: String,
    /// Leading `+` characters
    pub plus: String,
    pub game: String,
    pub name: String,
    pub version: String,
    pub authors: String,
    pub editors: String,
    pub attributes: Vec<String>,
    pub extra: String,
}

impl NameParts {
    /// Decompose a path or bare file name
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let path = Path::new(path);
        let directory = path
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file_name = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();

        let (stem, extension) = split_extension(&file_name);
        let mut parts = Self {
            directory,
            stem: stem.to_string(),
            extension: extension.to_string(),
            ..Self::default()
        };

        let mut rest = stem.to_string();
        if let Some((before, inner, after)) = take_last_group(&rest, '[', ']') {
            parts.attributes = inner
                .split(',')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string)
                .collect();
            parts.extra = after.trim().to_string();
            rest = before;
        }
        if let Some((before, inner, after)) = take_last_group(&rest, '{', '}') {
            parts.editors = inner.trim().to_string();
            rest = format!("{before} {after}");
        }
        if let Some((before, inner, after)) = take_last_group(&rest, '(', ')') {
            parts.authors = inner.trim().to_string();
            rest = format!("{before} {after}");
        }

        let trimmed = rest.trim_start();
        let plus_len = trimmed.chars().take_while(|&c| c == '+').count();
        parts.plus = "+".repeat(plus_len);

        let mut tokens: Vec<&str> = trimmed[plus_len..].split_whitespace().collect();
        if tokens.len() > 1 && GAME_PREFIXES.contains(&tokens[0]) {
            parts.game = tokens.remove(0).to_string();
        }
        if tokens.len() > 1 && tokens.last().is_some_and(|t| is_version(t)) {
            parts.version = tokens.pop().map(|t| t[1..].to_string()).unwrap_or_default();
        }
        parts.name = tokens.join(" ");
        parts
    }

    /// Number of leading `+`
    #[must_use]
    pub fn plus_order(&self) -> u32 {
        self.plus.len() as u32
    }

    /// `1 + index` of the game prefix, 0 without one
    #[must_use]
    pub fn game_order(&self) -> u32 {
        GAME_PREFIXES
            .iter()
            .position(|&g| g == self.game)
            .map_or(0, |i| i as u32 + 1)
    }

    /// Game prefix, name and version joined for display
    #[must_use]
    pub fn display_name(&self) -> String {
        let mut out = String::new();
        if !self.game.is_empty() {
            out.push_str(&self.game);
            out.push(' ');
        }
        out.push_str(&self.name);
        if !self.version.is_empty() {
            out.push_str(" v");
            out.push_str(&self.version);
        }
        out
    }

    /// Value of a `key=value` attribute
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.iter().find_map(|a| {
            a.split_once('=')
                .filter(|(k, _)| k.trim().eq_ignore_ascii_case(key))
                .map(|(_, v)| v.trim())
        })
    }

    /// Whether a bare attribute is present
    #[must_use]
    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.iter().any(|a| a.eq_ignore_ascii_case(key))
    }
}

fn split_extension(file_name: &str) -> (&str, &str) {
    match file_name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && !ext.is_empty()
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
                && ext.chars().any(|c| c.is_ascii_alphabetic()) =>
        {
            (stem, ext)
        }
        _ => (file_name, ""),
    }
}

/// Split `s` around its last `open ... close` group
fn take_last_group(s: &str, open: char, close: char) -> Option<(String, String, String)> {
    let start = s.rfind(open)?;
    let end = start + s[start..].find(close)?;
    Some((
        s[..start].trim_end().to_string(),
        s[start + open.len_utf8()..end].to_string(),
        s[end + close.len_utf8()..].to_string(),
    ))
}

fn is_version(token: &str) -> bool {
    let mut chars = token.chars();
    matches!(chars.next(), Some('v' | 'V')) && chars.next().is_some_and(|c| c.is_ascii_digit())
}
