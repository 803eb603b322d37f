//! Target - one addressable page or post

use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use serde_yaml::Value;

use super::render::Meta;
use super::source::SourceRecord;

/// A rendered source file together with its canonical path
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Target {
    /// Path relative to the collection root, without extension, `/`-separated
    pub path: String,

    /// Decoded metadata
    pub meta: Meta,

    /// Rendered body
    pub body: String,

    /// Source file the target was loaded from
    #[serde(skip)]
    pub source: PathBuf,
}

impl Target {
    /// Wrap a source record, deriving its path from the collection root
    pub fn from_record(record: SourceRecord, root: &Path) -> Self {
        let path = derive_path(&record.file, root);
        Self {
            path,
            meta: record.meta,
            body: record.body,
            source: record.file,
        }
    }

    /// Look up a metadata value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.meta.get(key)
    }

    /// Look up a string metadata value
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn title(&self) -> Option<&str> {
        self.get_str("title")
    }

    /// Tags as listed in the metadata, empty when none are set
    pub fn tags(&self) -> Vec<String> {
        self.get("tags")
            .and_then(tag_list)
            .unwrap_or_default()
    }
}

/// Canonical path of `file` under `root`.
///
/// The last extension is dropped and components are joined with `/`, so
/// `post/2014/hello.markdown` under `post` becomes `2014/hello`.
pub fn derive_path(file: &Path, root: &Path) -> String {
    let relative = file.strip_prefix(root).unwrap_or(file);
    let without_ext = relative.with_extension("");

    without_ext
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Read a `tags` value: a list of scalars, a single string, or null.
///
/// Returns `None` for any other shape.
pub(crate) fn tag_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Null => Some(Vec::new()),
        Value::String(s) => Some(vec![s.clone()]),
        Value::Sequence(items) => items.iter().map(scalar_tag).collect(),
        Value::Tagged(tagged) => tag_list(&tagged.value),
        _ => None,
    }
}

fn scalar_tag(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_path() {
        assert_eq!(
            derive_path(Path::new("post/2014/hello.markdown"), Path::new("post")),
            "2014/hello"
        );
        assert_eq!(
            derive_path(Path::new("page/about.html"), Path::new("page")),
            "about"
        );
    }

    #[test]
    fn test_derive_path_strips_only_last_extension() {
        assert_eq!(
            derive_path(Path::new("page/notes.v2.html"), Path::new("page")),
            "notes.v2"
        );
    }

    #[test]
    fn test_derive_path_absolute_root() {
        let root = std::env::temp_dir().join("blog").join("post");
        let file = root.join("a").join("b").join("c.md");
        assert_eq!(derive_path(&file, &root), "a/b/c");
    }

    #[test]
    fn test_from_record() {
        let mut meta = Meta::new();
        meta.insert("title".into(), "Hello".into());
        let record = SourceRecord {
            meta,
            body: "<p>hi</p>".to_string(),
            file: PathBuf::from("post/2024/hello.markdown"),
        };

        let target = Target::from_record(record, Path::new("post"));
        assert_eq!(target.path, "2024/hello");
        assert_eq!(target.title(), Some("Hello"));
        assert_eq!(target.body, "<p>hi</p>");
        assert_eq!(target.source, PathBuf::from("post/2024/hello.markdown"));
    }

    #[test]
    fn test_tag_list_shapes() {
        let list: Value = serde_yaml::from_str("[rust, 2024]").unwrap();
        assert_eq!(tag_list(&list).unwrap(), vec!["rust", "2024"]);

        let single: Value = serde_yaml::from_str("Notes").unwrap();
        assert_eq!(tag_list(&single).unwrap(), vec!["Notes"]);

        assert!(tag_list(&Value::Null).unwrap().is_empty());

        let nested: Value = serde_yaml::from_str("[[a]]").unwrap();
        assert!(tag_list(&nested).is_none());
        let mapping: Value = serde_yaml::from_str("{a: b}").unwrap();
        assert!(tag_list(&mapping).is_none());
    }
}
