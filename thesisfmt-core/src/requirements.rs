// Requirements extraction boundary
//
// Turns a free-form requirements document into `FormattingRules`. The
// production extractor is an external service; the implementations here
// cover the built-in rule set and rules written directly as YAML.

use crate::config::FormattingRules;
use anyhow::Result;

pub trait RequirementsExtractor {
    fn extract(&self, requirements_text: &str) -> Result<FormattingRules>;

    /// Extractor name for logging
    fn name(&self) -> &str;
}

/// Ignores the requirements text and returns the built-in GOST-style rules
#[derive(Debug, Clone, Default)]
pub struct BuiltinRequirements;

impl RequirementsExtractor for BuiltinRequirements {
    fn extract(&self, requirements_text: &str) -> Result<FormattingRules> {
        if !requirements_text.trim().is_empty() {
            log::debug!(
                "📋 Built-in requirements ignore {} chars of requirements text",
                requirements_text.len()
            );
        }
        Ok(FormattingRules::default())
    }

    fn name(&self) -> &str {
        "BuiltinRequirements"
    }
}

/// Requirements already written as a YAML rules document
#[derive(Debug, Clone, Default)]
pub struct StructuredRequirements;

impl RequirementsExtractor for StructuredRequirements {
    fn extract(&self, requirements_text: &str) -> Result<FormattingRules> {
        Ok(FormattingRules::from_yaml_str(requirements_text)?)
    }

    fn name(&self) -> &str {
        "StructuredRequirements"
    }
}

/// Extract rules and check them, so a bad extraction is reported before
/// any document is touched
pub fn extract_rules(
    extractor: &dyn RequirementsExtractor,
    requirements_text: &str,
) -> Result<FormattingRules> {
    log::info!("📋 Extracting formatting rules with {}", extractor.name());
    let rules = extractor.extract(requirements_text)?;
    rules.validate()?;
    log::info!("✅ Formatting rules extracted and validated");
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::types::ParagraphRole;

    #[test]
    fn test_builtin_returns_defaults() {
        let rules = extract_rules(&BuiltinRequirements, "Шрифт Times New Roman, 14 пт").unwrap();
        assert_eq!(rules, FormattingRules::default());
    }

    #[test]
    fn test_structured_round_trips_default_rules() {
        let yaml = FormattingRules::default().to_yaml_string().unwrap();
        let rules = extract_rules(&StructuredRequirements, &yaml).unwrap();
        assert_eq!(rules, FormattingRules::default());
    }

    #[test]
    fn test_structured_missing_role_is_config_error() {
        let yaml = r#"
roles:
  heading1: {}
  heading2: {}
  regular_text: {}
"#;
        let err = extract_rules(&StructuredRequirements, yaml).unwrap_err();
        match err.downcast_ref::<ConfigError>() {
            Some(ConfigError::MissingRole(role)) => assert_eq!(*role, ParagraphRole::ListItem),
            other => panic!("expected MissingRole, got {other:?}"),
        }
    }

    #[test]
    fn test_structured_rejects_bad_enum_value() {
        let yaml = "roles:\n  heading1: { text_transform: shout }\n";
        let err = extract_rules(&StructuredRequirements, yaml).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Parse(_))
        ));
    }
}
