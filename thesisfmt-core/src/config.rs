use crate::error::ConfigError;
use crate::rules::detection::ContentDetector;
use crate::types::{Alignment, Margins, PageNumbering, ParagraphRole};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_font_name() -> String {
    "Times New Roman".to_string()
}

fn default_font_size() -> f32 {
    14.0
}

fn default_line_spacing() -> f32 {
    1.5
}

/// Complete formatting requirements for one request.
///
/// Built once (from `FormattingRules::default()`, a rules file, or a
/// `RequirementsExtractor`) and only read afterwards. Every role in
/// `ParagraphRole::FORMATTED` must have an entry in `roles`; `Skip` never
/// consults the rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattingRules {
    /// Style to apply per structural role
    pub roles: BTreeMap<ParagraphRole, RoleRule>,
    /// Page-level settings applied once before the traversal
    #[serde(default)]
    pub document: DocumentSettings,
    /// Landmark and heading detection configuration
    #[serde(default)]
    pub detection: DetectionConfig,
}

/// Rule entry for one role: a style to apply, or an explicit "leave as is".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleRule {
    NoOp(NoOpMarker),
    Format(StyleSpec),
}

/// Serialized as the plain string `noop`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoOpMarker {
    Noop,
}

impl RoleRule {
    pub fn noop() -> Self {
        RoleRule::NoOp(NoOpMarker::Noop)
    }

    pub fn style(&self) -> Option<&StyleSpec> {
        match self {
            RoleRule::Format(spec) => Some(spec),
            RoleRule::NoOp(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTransform {
    None,
    Uppercase,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleSpec {
    pub font_name: String,
    pub font_size_pt: f32,
    /// `None` leaves the run's own weight alone
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    pub alignment: Alignment,
    /// Negative values produce a hanging indent
    pub first_line_indent_cm: f32,
    pub left_indent_cm: f32,
    pub right_indent_cm: f32,
    pub space_before_pt: f32,
    pub space_after_pt: f32,
    /// Multiple of single line spacing
    pub line_spacing: f32,
    pub page_break_before: bool,
    /// Only text mutation the formatter performs; off unless requested
    pub text_transform: TextTransform,
}

impl Default for StyleSpec {
    fn default() -> Self {
        // Body text of a GOST 7.32 style thesis
        Self {
            font_name: default_font_name(),
            font_size_pt: default_font_size(),
            bold: None,
            italic: None,
            alignment: Alignment::Justify,
            first_line_indent_cm: 1.25,
            left_indent_cm: 0.0,
            right_indent_cm: 0.0,
            space_before_pt: 0.0,
            space_after_pt: 0.0,
            line_spacing: default_line_spacing(),
            page_break_before: false,
            text_transform: TextTransform::None,
        }
    }
}

impl StyleSpec {
    fn validate(&self, role: ParagraphRole) -> std::result::Result<(), ConfigError> {
        let field = |name: &str| format!("roles.{role}.{name}");

        if self.font_name.trim().is_empty() {
            return Err(ConfigError::invalid(field("font_name"), "font name is empty"));
        }
        if !self.font_size_pt.is_finite() || self.font_size_pt <= 0.0 {
            return Err(ConfigError::invalid(
                field("font_size_pt"),
                format!("must be positive, got {}", self.font_size_pt),
            ));
        }
        if !self.line_spacing.is_finite() || self.line_spacing <= 0.0 {
            return Err(ConfigError::invalid(
                field("line_spacing"),
                format!("must be positive, got {}", self.line_spacing),
            ));
        }
        if !self.first_line_indent_cm.is_finite() {
            return Err(ConfigError::invalid(field("first_line_indent_cm"), "not a number"));
        }
        // Uppercased body text would read as a level-1 heading on the next run
        if self.text_transform == TextTransform::Uppercase && role != ParagraphRole::Heading1 {
            return Err(ConfigError::invalid(
                field("text_transform"),
                "uppercase is only allowed for level-1 headings",
            ));
        }

        let non_negative = [
            ("left_indent_cm", self.left_indent_cm),
            ("right_indent_cm", self.right_indent_cm),
            ("space_before_pt", self.space_before_pt),
            ("space_after_pt", self.space_after_pt),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(
                    field(name),
                    format!("must be zero or positive, got {value}"),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentSettings {
    #[serde(default)]
    pub margins: Margins,
    #[serde(default)]
    pub page_numbering: PageNumbering,
}

/// Landmark and heading detection. Marker lists are compared against
/// uppercased, whitespace-collapsed text; `*_patterns` are regular
/// expressions run against the trimmed paragraph text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Phrases that only appear on the title page (substring match)
    pub title_page_markers: Vec<String>,
    /// Title page line shapes, e.g. author names with initials
    pub title_page_patterns: Vec<String>,
    /// Phrases that disqualify a line from being a title page marker
    pub title_page_exclusions: Vec<String>,
    /// Whole-line table of contents headers
    pub table_of_contents_headers: Vec<String>,
    /// Whole-line markers of the first body heading (leading numbering ignored)
    pub main_content_markers: Vec<String>,
    pub main_content_patterns: Vec<String>,
    pub heading1_patterns: Vec<String>,
    pub heading2_patterns: Vec<String>,
    pub list_patterns: Vec<String>,
    pub uppercase_heading: UppercaseHeuristic,
    pub style_hints: StyleHints,
}

/// Short, mostly-uppercase lines are treated as level-1 headings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UppercaseHeuristic {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub max_chars: usize,
    pub min_letters: usize,
    pub min_ratio: f32,
}

impl Default for UppercaseHeuristic {
    fn default() -> Self {
        Self {
            enabled: true,
            max_chars: 100,
            min_letters: 2,
            min_ratio: 0.7,
        }
    }
}

/// Named paragraph styles that decide the role before any text pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleHints {
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub heading1_styles: Vec<String>,
    pub heading2_styles: Vec<String>,
    pub list_styles: Vec<String>,
}

impl Default for StyleHints {
    fn default() -> Self {
        Self {
            enabled: true,
            heading1_styles: to_strings(&["Heading 1", "Заголовок 1", "Title", "Название"]),
            heading2_styles: to_strings(&["Heading 2", "Заголовок 2", "Subtitle", "Подзаголовок"]),
            list_styles: to_strings(&[
                "List Paragraph",
                "List Bullet",
                "List Number",
                "Абзац списка",
                "Маркированный список",
                "Нумерованный список",
            ]),
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            title_page_markers: to_strings(&[
                "GRADUATE QUALIFICATION WORK",
                "BACHELOR'S THESIS",
                "MASTER'S THESIS",
                "MINISTRY OF",
                "FACULTY OF",
                "DEPARTMENT OF",
                "FIELD OF STUDY",
                "SCIENTIFIC ADVISOR",
                "SUPERVISOR",
                "SUBMITTED BY",
                "ADMITTED TO DEFENSE",
                "ВЫПУСКНАЯ КВАЛИФИКАЦИОННАЯ РАБОТА",
                "ДИПЛОМНАЯ РАБОТА",
                "МИНИСТЕРСТВО ОБРАЗОВАНИЯ",
                "МИНИСТЕРСТВО НАУКИ",
                "ФЕДЕРАЛЬНОЕ ГОСУДАРСТВЕННОЕ",
                "ОБРАЗОВАТЕЛЬНОЕ УЧРЕЖДЕНИЕ",
                "ВЫСШЕГО ОБРАЗОВАНИЯ",
                "ФАКУЛЬТЕТ",
                "КАФЕДРА",
                "НАПРАВЛЕНИЕ ПОДГОТОВКИ",
                "ВЫПОЛНИЛ:",
                "НАУЧНЫЙ РУКОВОДИТЕЛЬ",
                "ДОПУЩЕН К ЗАЩИТЕ",
            ]),
            title_page_patterns: vec![
                // "Ivanov I.I." / "Иванов И.И."
                r"\p{Lu}\p{Ll}+\s+\p{Lu}\.\s?\p{Lu}\.".to_string(),
            ],
            title_page_exclusions: to_strings(&[
                "REFERENCES",
                "BIBLIOGRAPHY",
                "СПИСОК ИСПОЛЬЗОВАННЫХ ИСТОЧНИКОВ",
                "СПИСОК ЛИТЕРАТУРЫ",
                "БИБЛИОГРАФИЧЕСКИЙ СПИСОК",
            ]),
            table_of_contents_headers: to_strings(&[
                "CONTENTS",
                "TABLE OF CONTENTS",
                "СОДЕРЖАНИЕ",
                "ОГЛАВЛЕНИЕ",
            ]),
            main_content_markers: to_strings(&[
                "INTRODUCTION",
                "ABSTRACT",
                "ANNOTATION",
                "ВВЕДЕНИЕ",
                "РЕФЕРАТ",
                "АННОТАЦИЯ",
            ]),
            main_content_patterns: vec![
                r"(?i)^(CHAPTER|ГЛАВА)\s+1\.?$".to_string(),
                // Numbered first chapter without a page number: "1 ОБЗОР ЛИТЕРАТУРЫ"
                r"^\d+\.?\s*\p{Lu}[\p{L}\s]*$".to_string(),
            ],
            heading1_patterns: vec![
                // "1 INTRODUCTION", "2. Methods"
                r"(?i)^\d+\.?\s+\p{L}[\p{L}\s,\-–]*$".to_string(),
                // "CHAPTER 2", "ГЛАВА 3. Обзор"
                r"(?i)^(CHAPTER|ГЛАВА)\s+\d+".to_string(),
                // "II. RELATED WORK"
                r"^[IVX]+\.\s*\p{Lu}[\p{Lu}\s]*$".to_string(),
                r"(?i)^(INTRODUCTION|CONCLUSION|REFERENCES|BIBLIOGRAPHY|ABSTRACT|APPENDIX(\s+\p{L})?|ВВЕДЕНИЕ|ЗАКЛЮЧЕНИЕ|РЕФЕРАТ|СПИСОК ЛИТЕРАТУРЫ|СПИСОК ИСПОЛЬЗОВАННЫХ ИСТОЧНИКОВ|ПРИЛОЖЕНИЕ(\s+\p{L})?)$".to_string(),
            ],
            heading2_patterns: vec![
                // "1.1 Subtitle", "1.1. Подраздел"
                r"^\d+\.\d+\.?\s+\p{L}".to_string(),
            ],
            list_patterns: vec![
                r"^\s*[-–—•*·]\s+".to_string(),
                r"^\s*\d+\)\s+".to_string(),
                r"^\s*\p{Ll}\)\s+".to_string(),
            ],
            uppercase_heading: UppercaseHeuristic::default(),
            style_hints: StyleHints::default(),
        }
    }
}

impl Default for FormattingRules {
    fn default() -> Self {
        let mut roles = BTreeMap::new();

        roles.insert(
            ParagraphRole::Heading1,
            RoleRule::Format(StyleSpec {
                font_size_pt: 16.0,
                bold: Some(true),
                alignment: Alignment::Center,
                first_line_indent_cm: 0.0,
                space_after_pt: 18.0,
                line_spacing: 1.0,
                page_break_before: true,
                ..StyleSpec::default()
            }),
        );
        roles.insert(
            ParagraphRole::Heading2,
            RoleRule::Format(StyleSpec {
                bold: Some(true),
                alignment: Alignment::Left,
                first_line_indent_cm: 0.0,
                left_indent_cm: 2.0,
                space_before_pt: 12.0,
                space_after_pt: 6.0,
                line_spacing: 1.0,
                ..StyleSpec::default()
            }),
        );
        roles.insert(
            ParagraphRole::ListItem,
            RoleRule::Format(StyleSpec {
                first_line_indent_cm: 0.0,
                left_indent_cm: 1.25,
                ..StyleSpec::default()
            }),
        );
        roles.insert(ParagraphRole::RegularText, RoleRule::Format(StyleSpec::default()));

        Self {
            roles,
            document: DocumentSettings::default(),
            detection: DetectionConfig::default(),
        }
    }
}

impl FormattingRules {
    /// Rule entry for a role; `None` for `Skip` and for missing entries
    pub fn rule_for(&self, role: ParagraphRole) -> Option<&RoleRule> {
        if role == ParagraphRole::Skip {
            return None;
        }
        self.roles.get(&role)
    }

    /// Check the schema invariants: every formatted role is covered, every
    /// value is in range, every detection pattern compiles.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        for role in ParagraphRole::FORMATTED {
            match self.roles.get(&role) {
                None => return Err(ConfigError::MissingRole(role)),
                Some(RoleRule::Format(spec)) => spec.validate(role)?,
                Some(RoleRule::NoOp(_)) => {}
            }
        }

        let margins = &self.document.margins;
        let sides = [
            ("top_cm", margins.top_cm),
            ("bottom_cm", margins.bottom_cm),
            ("left_cm", margins.left_cm),
            ("right_cm", margins.right_cm),
        ];
        for (name, value) in sides {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::invalid(
                    format!("document.margins.{name}"),
                    format!("must be positive, got {value}"),
                ));
            }
        }
        if self.document.page_numbering.start_from == 0 {
            return Err(ConfigError::invalid(
                "document.page_numbering.start_from",
                "page numbers start at 1",
            ));
        }

        let heuristic = &self.detection.uppercase_heading;
        if heuristic.enabled && !(0.0..=1.0).contains(&heuristic.min_ratio) {
            return Err(ConfigError::invalid(
                "detection.uppercase_heading.min_ratio",
                format!("must be within 0..=1, got {}", heuristic.min_ratio),
            ));
        }

        ContentDetector::new(&self.detection)?;
        Ok(())
    }

    pub fn from_yaml_str(content: &str) -> std::result::Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn from_json_str(content: &str) -> std::result::Result<Self, ConfigError> {
        serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Load rules from a YAML (`.yaml`/`.yml`) or JSON file
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read rules file {path}"))?;
        let is_json = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        let rules = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_yaml_str(&content)?
        };
        Ok(rules)
    }

    /// Load rules with fallback to the built-in defaults
    pub fn load_with_fallback(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|e| {
                log::warn!("⚠️  Failed to load rules from {p} ({e:#}), using defaults");
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// SHA-256 of the canonical JSON form, for tracing output back to its rules
    pub fn fingerprint(&self) -> Result<String> {
        let canonical = serde_json::to_string(self)?;
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        Ok(format!("{:x}", hasher.finalize()))
    }
}
