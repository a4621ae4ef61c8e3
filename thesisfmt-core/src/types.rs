use serde::{Deserialize, Serialize};
use std::fmt;

// ===== DOCUMENT MODEL =====
// The paragraph/run model the pipeline works on. Containers (see containers/)
// convert their native representation to and from these types. Every style
// attribute is optional: `None` means "inherited from the paragraph style".

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub paragraphs: Vec<Paragraph>,
    #[serde(default)]
    pub page_setup: PageSetup,
}

impl Document {
    pub fn new(paragraphs: Vec<Paragraph>) -> Self {
        Self {
            paragraphs,
            page_setup: PageSetup::default(),
        }
    }

    /// Build a document with one unstyled run per line of text
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(lines.into_iter().map(Paragraph::from_text).collect())
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    #[serde(default)]
    pub runs: Vec<Run>,
    #[serde(default)]
    pub format: ParagraphFormat,
    /// Named paragraph style from the source document (e.g. "Heading 1")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_name: Option<String>,
    /// Locked region in the source document; any style mutation is rejected
    #[serde(default, skip_serializing_if = "is_false")]
    pub protected: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Paragraph {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            runs: vec![Run::new(text)],
            ..Self::default()
        }
    }

    pub fn with_style(mut self, style_name: impl Into<String>) -> Self {
        self.style_name = Some(style_name.into());
        self
    }

    /// Concatenated text of all runs
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    pub fn is_blank(&self) -> bool {
        self.runs.iter().all(|run| run.text.trim().is_empty())
    }

    /// Short single-line preview for log messages
    pub fn preview(&self, max_chars: usize) -> String {
        preview(&self.text(), max_chars)
    }
}

pub fn preview(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() > max_chars {
        let cut: String = trimmed.chars().take(max_chars).collect();
        format!("{cut}...")
    } else {
        trimmed.to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub text: String,
    #[serde(default)]
    pub font: FontAttributes,
}

impl Run {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: FontAttributes::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FontAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_pt: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParagraphFormat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
    /// Negative values are a hanging indent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_line_indent_cm: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_indent_cm: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_indent_cm: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_before_pt: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_after_pt: Option<f32>,
    /// Multiple of single line spacing (1.0, 1.5, 2.0, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_spacing: Option<f32>,
    /// Outline (heading) level, 1-based
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_break_before: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "justify",
        };
        f.write_str(name)
    }
}

// ===== PAGE SETUP =====

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageSetup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margins: Option<Margins>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_numbering: Option<PageNumbering>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top_cm: f32,
    pub bottom_cm: f32,
    pub left_cm: f32,
    pub right_cm: f32,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top_cm: 2.0,
            bottom_cm: 2.0,
            left_cm: 3.0,
            right_cm: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageNumbering {
    pub style: NumberingStyle,
    pub position: NumberPosition,
    pub start_from: u32,
    /// Title page carries no visible number
    pub exclude_title_page: bool,
}

impl Default for PageNumbering {
    fn default() -> Self {
        Self {
            style: NumberingStyle::Arabic,
            position: NumberPosition::BottomCenter,
            start_from: 1,
            exclude_title_page: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberingStyle {
    Arabic,
    Roman,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberPosition {
    BottomCenter,
    BottomRight,
    TopCenter,
    TopRight,
}

// ===== CLASSIFICATION TYPES =====

/// Structural role assigned to every paragraph. Closed set: new roles are
/// added as new variants, never by overloading an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParagraphRole {
    Skip,
    Heading1,
    Heading2,
    ListItem,
    RegularText,
}

impl ParagraphRole {
    /// Roles that must carry an entry in the formatting rules
    pub const FORMATTED: [ParagraphRole; 4] = [
        ParagraphRole::Heading1,
        ParagraphRole::Heading2,
        ParagraphRole::ListItem,
        ParagraphRole::RegularText,
    ];

    pub fn outline_level(&self) -> Option<u8> {
        match self {
            ParagraphRole::Heading1 => Some(1),
            ParagraphRole::Heading2 => Some(2),
            _ => None,
        }
    }

    pub fn is_heading(&self) -> bool {
        self.outline_level().is_some()
    }
}

impl fmt::Display for ParagraphRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParagraphRole::Skip => "skip",
            ParagraphRole::Heading1 => "heading1",
            ParagraphRole::Heading2 => "heading2",
            ParagraphRole::ListItem => "list_item",
            ParagraphRole::RegularText => "regular_text",
        };
        f.write_str(name)
    }
}
