//! Metadata decoders and body renderers injected into a collection

use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use super::error::RenderError;
use super::markdown::MarkdownRenderer;

/// Structured metadata of a page or post
pub type Meta = serde_yaml::Mapping;

/// Turns the raw metadata section of a source file into a mapping
pub trait MetadataDecoder: Send + Sync {
    fn decode(&self, text: &str) -> Result<Meta, RenderError>;
}

/// Turns the raw body section of a source file into its final content
pub trait BodyRenderer: Send + Sync {
    fn render(&self, text: &str) -> Result<String, RenderError>;
}

impl<F> MetadataDecoder for F
where
    F: Fn(&str) -> Result<Meta, RenderError> + Send + Sync,
{
    fn decode(&self, text: &str) -> Result<Meta, RenderError> {
        self(text)
    }
}

impl<F> BodyRenderer for F
where
    F: Fn(&str) -> Result<String, RenderError> + Send + Sync,
{
    fn render(&self, text: &str) -> Result<String, RenderError> {
        self(text)
    }
}

/// Accept an empty value or a mapping, reject everything else
pub fn validate_metadata(value: serde_yaml::Value) -> Result<Meta, RenderError> {
    match value {
        serde_yaml::Value::Null => Ok(Meta::new()),
        serde_yaml::Value::Mapping(mapping) => Ok(mapping),
        serde_yaml::Value::Tagged(tagged) => validate_metadata(tagged.value),
        other => Err(RenderError::NotAMapping(describe(&other))),
    }
}

fn describe(value: &serde_yaml::Value) -> String {
    serde_yaml::to_string(value)
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|_| format!("{:?}", value))
}

/// YAML metadata, the default decoder
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlMetadata;

impl MetadataDecoder for YamlMetadata {
    fn decode(&self, text: &str) -> Result<Meta, RenderError> {
        if text.trim().is_empty() {
            return Ok(Meta::new());
        }
        let value: serde_yaml::Value = serde_yaml::from_str(text)?;
        validate_metadata(value)
    }
}

/// JSON metadata
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonMetadata;

impl MetadataDecoder for JsonMetadata {
    fn decode(&self, text: &str) -> Result<Meta, RenderError> {
        if text.trim().is_empty() {
            return Ok(Meta::new());
        }
        let value: serde_json::Value = serde_json::from_str(text)?;
        validate_metadata(serde_yaml::to_value(value)?)
    }
}

/// Body passed through unchanged, the default for pages
#[derive(Debug, Clone, Copy, Default)]
pub struct Verbatim;

impl BodyRenderer for Verbatim {
    fn render(&self, text: &str) -> Result<String, RenderError> {
        Ok(text.to_string())
    }
}

/// Metadata decoder selectable by name in the configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetaRendererKind {
    #[default]
    Yaml,
    Json,
}

impl MetaRendererKind {
    pub fn build(self) -> Arc<dyn MetadataDecoder> {
        match self {
            MetaRendererKind::Yaml => Arc::new(YamlMetadata),
            MetaRendererKind::Json => Arc::new(JsonMetadata),
        }
    }
}

/// Body renderer selectable by name in the configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyRendererKind {
    #[serde(alias = "none", alias = "identity")]
    Verbatim,
    Markdown,
}

/// Options for the markdown body renderer
#[derive(Debug, Clone)]
pub struct HighlightOptions {
    pub theme: String,
    pub line_numbers: bool,
}

impl BodyRendererKind {
    pub fn build(self, highlight: &HighlightOptions) -> Arc<dyn BodyRenderer> {
        match self {
            BodyRendererKind::Verbatim => Arc::new(Verbatim),
            BodyRendererKind::Markdown => Arc::new(MarkdownRenderer::with_options(
                &highlight.theme,
                highlight.line_numbers,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_mapping() {
        let meta = YamlMetadata
            .decode("title: Hello\ndate: 2024-01-15\ntags: [rust, blog]\n")
            .unwrap();
        assert_eq!(meta.get("title").and_then(|v| v.as_str()), Some("Hello"));
        assert_eq!(
            meta.get("date").and_then(|v| v.as_str()),
            Some("2024-01-15")
        );
        assert_eq!(
            meta.get("tags").and_then(|v| v.as_sequence()).map(|s| s.len()),
            Some(2)
        );
    }

    #[test]
    fn test_yaml_empty_is_empty_mapping() {
        assert!(YamlMetadata.decode("").unwrap().is_empty());
        assert!(YamlMetadata.decode("  \n\n").unwrap().is_empty());
        assert!(YamlMetadata.decode("~\n").unwrap().is_empty());
    }

    #[test]
    fn test_yaml_not_a_mapping() {
        let err = YamlMetadata.decode("just a string").unwrap_err();
        assert!(matches!(err, RenderError::NotAMapping(_)));

        let err = YamlMetadata.decode("- a\n- b\n").unwrap_err();
        assert!(matches!(err, RenderError::NotAMapping(_)));
    }

    #[test]
    fn test_yaml_syntax_error() {
        let err = YamlMetadata.decode("title: [unclosed\n").unwrap_err();
        assert!(matches!(err, RenderError::Yaml(_)));
    }

    #[test]
    fn test_json_metadata() {
        let meta = JsonMetadata
            .decode(r#"{"title": "Test Post", "tags": ["a", "b"]}"#)
            .unwrap();
        assert_eq!(
            meta.get("title").and_then(|v| v.as_str()),
            Some("Test Post")
        );

        let err = JsonMetadata.decode("[1, 2]").unwrap_err();
        assert!(matches!(err, RenderError::NotAMapping(_)));
    }

    #[test]
    fn test_verbatim() {
        assert_eq!(Verbatim.render("<b>x</b>\n").unwrap(), "<b>x</b>\n");
    }

    #[test]
    fn test_kinds_from_config_names() {
        let kind: BodyRendererKind = serde_yaml::from_str("none").unwrap();
        assert_eq!(kind, BodyRendererKind::Verbatim);
        let kind: BodyRendererKind = serde_yaml::from_str("markdown").unwrap();
        assert_eq!(kind, BodyRendererKind::Markdown);
        let kind: MetaRendererKind = serde_yaml::from_str("json").unwrap();
        assert_eq!(kind, MetaRendererKind::Json);
        assert!(serde_yaml::from_str::<BodyRendererKind>("textile").is_err());
    }
}
