//! Content loading errors

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use super::source::TextEncoding;

/// Failure of a metadata decoder or body renderer
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid metadata, not a mapping: {0}")]
    NotAMapping(String),

    #[error("Invalid YAML metadata: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid JSON metadata: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Body render error: {0}")]
    Body(String),
}

/// Two source files that derive the same canonical path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathCollision {
    pub path: String,
    pub first: PathBuf,
    pub second: PathBuf,
}

impl fmt::Display for PathCollision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' is derived from both {:?} and {:?}",
            self.path, self.first, self.second
        )
    }
}

/// Failure of a single collection load.
///
/// Any of these aborts the whole load pass; the collection keeps serving its
/// previous generation.
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to scan {root:?}: {source}")]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("{path:?} is not valid {encoding} text")]
    Decode { path: PathBuf, encoding: TextEncoding },

    #[error("{path:?}: metadata block opened with '---' is never closed")]
    UnterminatedMetadata { path: PathBuf },

    #[error("{path:?}: {source}")]
    Render {
        path: PathBuf,
        #[source]
        source: RenderError,
    },

    #[error("{path:?}: unsupported date value ({reason})")]
    InvalidDate { path: PathBuf, reason: String },

    #[error("{path:?}: date is a {found}, but other posts (e.g. {other:?}) use a {expected}")]
    MixedDateTypes {
        path: PathBuf,
        found: &'static str,
        other: PathBuf,
        expected: &'static str,
    },

    #[error("{path:?}: tags must be a string or a list of strings")]
    InvalidTags { path: PathBuf },

    #[error("Path collisions: {}", join_collisions(.0))]
    PathCollisions(Vec<PathCollision>),
}

fn join_collisions(collisions: &[PathCollision]) -> String {
    collisions
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Aggregate failure of [`Repository::load`](super::Repository::load).
///
/// Each entry names the collection that failed; collections not listed were
/// reloaded successfully.
#[derive(Error, Debug)]
#[error("{}", describe(.failures))]
pub struct LoadError {
    pub failures: Vec<(&'static str, ContentError)>,
}

fn describe(failures: &[(&'static str, ContentError)]) -> String {
    failures
        .iter()
        .map(|(name, err)| format!("failed to load {}: {}", name, err))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collisions_are_enumerated() {
        let err = ContentError::PathCollisions(vec![
            PathCollision {
                path: "foo".to_string(),
                first: PathBuf::from("page/foo.html"),
                second: PathBuf::from("page/foo.htm"),
            },
            PathCollision {
                path: "bar".to_string(),
                first: PathBuf::from("page/bar.html"),
                second: PathBuf::from("page/bar.htm"),
            },
        ]);
        let message = err.to_string();
        assert!(message.contains("'foo'"));
        assert!(message.contains("'bar'"));
    }

    #[test]
    fn test_load_error_names_collection() {
        let err = LoadError {
            failures: vec![(
                "posts",
                ContentError::InvalidTags {
                    path: PathBuf::from("post/a.markdown"),
                },
            )],
        };
        assert!(err.to_string().starts_with("failed to load posts:"));
    }
}
