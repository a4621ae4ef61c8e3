use crate::error::ConfigError;
use regex::Regex;

/// Uppercase and collapse runs of whitespace to a single space
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// One declarative text pattern.
///
/// `Exact` and `Contains` hold an already normalized needle and are compared
/// against normalized text. `Regex` runs on the trimmed original text.
#[derive(Debug, Clone)]
pub enum StructuralPattern {
    Exact(String),
    Contains(String),
    Regex(Regex),
}

impl StructuralPattern {
    pub fn exact(needle: &str) -> Self {
        StructuralPattern::Exact(normalize(needle))
    }

    pub fn contains(needle: &str) -> Self {
        StructuralPattern::Contains(normalize(needle))
    }

    pub fn regex(pattern: &str) -> Result<Self, ConfigError> {
        Regex::new(pattern)
            .map(StructuralPattern::Regex)
            .map_err(|source| ConfigError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    /// `normalized` must be `normalize(text)`; passed in so a set normalizes once
    fn is_match(&self, text: &str, normalized: &str) -> bool {
        match self {
            StructuralPattern::Exact(needle) => !needle.is_empty() && normalized == needle,
            StructuralPattern::Contains(needle) => {
                !needle.is_empty() && normalized.contains(needle.as_str())
            }
            StructuralPattern::Regex(regex) => regex.is_match(text.trim()),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            StructuralPattern::Exact(needle) => format!("exact '{needle}'"),
            StructuralPattern::Contains(needle) => format!("contains '{needle}'"),
            StructuralPattern::Regex(regex) => format!("regex '{}'", regex.as_str()),
        }
    }
}

/// Ordered group of patterns; matches when any member matches
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<StructuralPattern>,
}

impl PatternSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exact<S: AsRef<str>>(needles: &[S]) -> Self {
        Self {
            patterns: needles.iter().map(|n| StructuralPattern::exact(n.as_ref())).collect(),
        }
    }

    pub fn contains<S: AsRef<str>>(needles: &[S]) -> Self {
        Self {
            patterns: needles
                .iter()
                .map(|n| StructuralPattern::contains(n.as_ref()))
                .collect(),
        }
    }

    pub fn regex<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ConfigError> {
        let patterns = patterns
            .iter()
            .map(|p| StructuralPattern::regex(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn with(mut self, other: PatternSet) -> Self {
        self.patterns.extend(other.patterns);
        self
    }

    pub fn push(&mut self, pattern: StructuralPattern) {
        self.patterns.push(pattern);
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn matches(&self, text: &str) -> bool {
        self.first_match(text).is_some()
    }

    /// First member that matches, for debug tracing
    pub fn first_match(&self, text: &str) -> Option<&StructuralPattern> {
        if text.trim().is_empty() {
            return None;
        }
        let normalized = normalize(text);
        self.patterns
            .iter()
            .find(|pattern| pattern.is_match(text, &normalized))
    }
}
