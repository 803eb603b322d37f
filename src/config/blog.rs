//! Blog configuration (blog.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::content::{
    BodyRendererKind, MetaRendererKind, TextEncoding, DEFAULT_HIGHLIGHT_THEME, DEFAULT_TAG,
};

/// Main configuration file
pub const CONFIG_FILE: &str = "blog.yml";

/// Overrides layered on top of [`CONFIG_FILE`] when freezing
pub const FREEZING_FILE: &str = "freezing.yml";

/// Custom deserializer that handles both a single string and a list of strings
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![value.to_string()])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(vec)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Flat key/value blog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    /// Development mode: reload content before every view request
    pub debug: bool,

    // Pages
    pub page_root: String,
    #[serde(deserialize_with = "string_or_vec")]
    pub page_extensions: Vec<String>,
    pub page_encoding: TextEncoding,
    pub page_meta_renderer: MetaRendererKind,
    pub page_body_renderer: BodyRendererKind,

    // Posts
    pub post_root: String,
    #[serde(deserialize_with = "string_or_vec")]
    pub post_extensions: Vec<String>,
    pub post_encoding: TextEncoding,
    pub post_meta_renderer: MetaRendererKind,
    pub post_body_renderer: BodyRendererKind,
    pub post_default_tag: String,

    // Display
    pub per_page: usize,
    pub highlight_theme: String,
    pub line_numbers: bool,

    // Freezing
    pub freezer_base_url: String,
    pub freezer_destination: String,
    #[serde(deserialize_with = "string_or_vec")]
    pub freezer_destination_ignore: Vec<String>,
    pub freezer_relative_urls: bool,
    pub freezer_remove_extra_files: bool,

    // Local server
    pub www_host: String,
    pub www_port: u16,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            debug: true,

            page_root: "page".to_string(),
            page_extensions: vec![".html".to_string()],
            page_encoding: TextEncoding::Utf8Sig,
            page_meta_renderer: MetaRendererKind::Yaml,
            page_body_renderer: BodyRendererKind::Verbatim,

            post_root: "post".to_string(),
            post_extensions: vec![".markdown".to_string()],
            post_encoding: TextEncoding::Utf8Sig,
            post_meta_renderer: MetaRendererKind::Yaml,
            post_body_renderer: BodyRendererKind::Markdown,
            post_default_tag: DEFAULT_TAG.to_string(),

            per_page: 10,
            highlight_theme: DEFAULT_HIGHLIGHT_THEME.to_string(),
            line_numbers: false,

            freezer_base_url: "http://localhost/".to_string(),
            freezer_destination: "build".to_string(),
            freezer_destination_ignore: vec![".*".to_string()],
            freezer_relative_urls: false,
            freezer_remove_extra_files: true,

            www_host: "127.0.0.1".to_string(),
            www_port: 8000,

            extra: HashMap::new(),
        }
    }
}

impl BlogConfig {
    /// Parse configuration text; an empty document yields the defaults
    pub fn parse(content: &str) -> Result<Self> {
        let value: serde_yaml::Value = serde_yaml::from_str(content)?;
        if value.is_null() {
            return Ok(Self::default());
        }
        Self::from_value(value)
    }

    /// Load the configuration found in a blog's base directory.
    ///
    /// Missing files fall back to defaults. With `freezing` set, keys from
    /// [`FREEZING_FILE`] override those from [`CONFIG_FILE`].
    pub fn load_layered<P: AsRef<Path>>(base_dir: P, freezing: bool) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        let mut merged = serde_yaml::Mapping::new();

        let mut files = vec![base_dir.join(CONFIG_FILE)];
        if freezing {
            files.push(base_dir.join(FREEZING_FILE));
        }

        for path in files.iter().filter(|p| p.exists()) {
            let content =
                fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
            let layer: serde_yaml::Value = serde_yaml::from_str(&content)
                .with_context(|| format!("Invalid YAML in {:?}", path))?;
            match layer {
                serde_yaml::Value::Mapping(layer) => merged.extend(layer),
                serde_yaml::Value::Null => {}
                _ => anyhow::bail!("{:?} must contain a mapping of settings", path),
            }
            tracing::debug!("Loaded configuration from {:?}", path);
        }

        Self::from_value(serde_yaml::Value::Mapping(merged)).context("Invalid configuration")
    }

    /// Deserialize and validate a settings mapping
    fn from_value(value: serde_yaml::Value) -> Result<Self> {
        let config: BlogConfig = serde_yaml::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.per_page == 0 {
            anyhow::bail!("per_page must be at least 1");
        }
        Ok(())
    }
}
