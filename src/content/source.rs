//! Source record loader - scans a collection root and renders every file

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use walkdir::WalkDir;

use super::error::ContentError;
use super::render::{BodyRenderer, Meta, MetadataDecoder, Verbatim, YamlMetadata};

/// Metadata block delimiter
const DELIMITER: &str = "---";

/// Byte order mark, ignored before a metadata block
const BOM: char = '\u{feff}';

/// Text encoding used to read source files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TextEncoding {
    /// Strict UTF-8
    Utf8,
    /// UTF-8 with an optional leading byte order mark
    Utf8Sig,
    /// ISO-8859-1, every byte maps to the code point of the same value
    Latin1,
    /// 7-bit ASCII
    Ascii,
}

#[derive(Error, Debug)]
#[error("Unknown text encoding: {0}")]
pub struct UnknownEncoding(String);

impl TextEncoding {
    /// Decode raw bytes, returning `None` when they are not valid text
    pub fn decode(&self, bytes: Vec<u8>) -> Option<String> {
        match self {
            TextEncoding::Utf8 => String::from_utf8(bytes).ok(),
            TextEncoding::Utf8Sig => String::from_utf8(bytes)
                .ok()
                .map(|s| match s.strip_prefix(BOM) {
                    Some(rest) => rest.to_string(),
                    None => s,
                }),
            TextEncoding::Latin1 => Some(bytes.into_iter().map(char::from).collect()),
            TextEncoding::Ascii => {
                if bytes.is_ascii() {
                    String::from_utf8(bytes).ok()
                } else {
                    None
                }
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Utf8Sig => "utf-8-sig",
            TextEncoding::Latin1 => "latin-1",
            TextEncoding::Ascii => "ascii",
        }
    }
}

impl Default for TextEncoding {
    fn default() -> Self {
        TextEncoding::Utf8Sig
    }
}

impl FromStr for TextEncoding {
    type Err = UnknownEncoding;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "utf-8" | "utf8" => Ok(TextEncoding::Utf8),
            "utf-8-sig" | "utf8-sig" => Ok(TextEncoding::Utf8Sig),
            "latin-1" | "latin1" | "iso-8859-1" => Ok(TextEncoding::Latin1),
            "ascii" | "us-ascii" => Ok(TextEncoding::Ascii),
            _ => Err(UnknownEncoding(s.to_string())),
        }
    }
}

impl TryFrom<String> for TextEncoding {
    type Error = UnknownEncoding;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TextEncoding> for String {
    fn from(encoding: TextEncoding) -> Self {
        encoding.name().to_string()
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One rendered source file
#[derive(Debug, Clone)]
pub struct SourceRecord {
    pub meta: Meta,
    pub body: String,
    pub file: PathBuf,
}

/// Split text into its metadata and body sections.
///
/// Returns `None` when an opening delimiter line has no closing one.
pub fn split_source(text: &str) -> Option<(&str, &str)> {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let Some(rest) = strip_delimiter_line(text) else {
        return Some(("", text));
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\n', '\r']) == DELIMITER {
            let meta = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((meta, body));
        }
        offset += line.len();
    }

    None
}

/// Strip a leading `---` line, returning what follows it
fn strip_delimiter_line(text: &str) -> Option<&str> {
    let rest = text.strip_prefix(DELIMITER)?;
    if rest.is_empty() {
        return Some(rest);
    }
    rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))
}

/// Files of one content type under a common root.
///
/// Holds everything needed to produce a fresh set of [`SourceRecord`]s on
/// every load; nothing is cached between loads.
#[derive(Clone)]
pub struct SourceFiles {
    root: PathBuf,
    extensions: Vec<String>,
    encoding: TextEncoding,
    meta_decoder: Arc<dyn MetadataDecoder>,
    body_renderer: Arc<dyn BodyRenderer>,
}

impl SourceFiles {
    /// Files under `root`, decoded as UTF-8 with YAML metadata and verbatim bodies
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            extensions: Vec::new(),
            encoding: TextEncoding::default(),
            meta_decoder: Arc::new(YamlMetadata),
            body_renderer: Arc::new(Verbatim),
        }
    }

    /// Accept files with these extensions (leading dots are ignored)
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_string())
            .filter(|e| !e.is_empty())
            .collect();
        self
    }

    pub fn encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn meta_decoder(mut self, decoder: Arc<dyn MetadataDecoder>) -> Self {
        self.meta_decoder = decoder;
        self
    }

    pub fn body_renderer(mut self, renderer: Arc<dyn BodyRenderer>) -> Self {
        self.body_renderer = renderer;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check whether a file has one of the accepted extensions
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.iter().any(|accepted| accepted == e))
            .unwrap_or(false)
    }

    /// Scan the root and render every accepted file.
    ///
    /// Files are visited in file-name order so that repeated loads discover
    /// them in the same sequence. The first failure aborts the scan.
    pub fn load(&self) -> Result<Vec<SourceRecord>, ContentError> {
        if !self.root.exists() {
            tracing::debug!("Content root {:?} does not exist, nothing to load", self.root);
            return Ok(Vec::new());
        }

        let mut records = Vec::new();

        for entry in WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|source| ContentError::Walk {
                root: self.root.clone(),
                source,
            })?;

            let path = entry.path();
            if entry.file_type().is_file() && self.accepts(path) {
                records.push(self.load_file(path)?);
            }
        }

        tracing::debug!("Scanned {} files under {:?}", records.len(), self.root);

        Ok(records)
    }

    /// Read, split and render a single file
    fn load_file(&self, path: &Path) -> Result<SourceRecord, ContentError> {
        let bytes = fs::read(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let text = self
            .encoding
            .decode(bytes)
            .ok_or_else(|| ContentError::Decode {
                path: path.to_path_buf(),
                encoding: self.encoding,
            })?;

        let (meta_text, body_text) =
            split_source(&text).ok_or_else(|| ContentError::UnterminatedMetadata {
                path: path.to_path_buf(),
            })?;

        let render_error = |source| ContentError::Render {
            path: path.to_path_buf(),
            source,
        };
        let meta = self.meta_decoder.decode(meta_text).map_err(render_error)?;
        let body = self.body_renderer.render(body_text).map_err(render_error)?;

        Ok(SourceRecord {
            meta,
            body,
            file: path.to_path_buf(),
        })
    }
}

impl fmt::Debug for SourceFiles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceFiles")
            .field("root", &self.root)
            .field("extensions", &self.extensions)
            .field("encoding", &self.encoding)
            .finish_non_exhaustive()
    }
}
