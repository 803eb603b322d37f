//! Content module - loads, validates and indexes pages and posts

mod collection;
pub mod date;
mod error;
mod markdown;
pub mod reload;
pub mod render;
mod repository;
pub mod source;
mod target;

pub use collection::{CollectionKind, Generation, TargetCollection, DEFAULT_TAG};
pub use error::{ContentError, LoadError, PathCollision, RenderError};
pub use markdown::{MarkdownRenderer, DEFAULT_HIGHLIGHT_THEME};
pub use reload::{Endpoint, ReloadHook};
pub use render::{BodyRenderer, BodyRendererKind, Meta, MetaRendererKind, MetadataDecoder};
pub use repository::{Repository, Snapshot};
pub use source::{SourceFiles, SourceRecord, TextEncoding};
pub use target::{derive_path, Target};
