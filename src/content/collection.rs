//! Target collections - ordered, path-indexed and atomically reloadable
//!
//! A collection never mutates its current [`Generation`] in place. Every
//! [`TargetCollection::load`] builds a complete new generation off to the side
//! and only swaps it in once every step succeeded, so readers see either the
//! previous generation or the new one, and a broken source file leaves the
//! previous generation serving.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;
use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_yaml::Value;

use super::date::DateKey;
use super::error::{ContentError, PathCollision};
use super::source::{SourceFiles, SourceRecord};
use super::target::{tag_list, Target};

/// Tag assigned to posts without a `tags` key
pub const DEFAULT_TAG: &str = "untagged";

/// Post-load pipeline applied to a collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionKind {
    /// Every record, in discovery order
    Pages,
    /// Dated records only, newest first, grouped by tag
    Posts { default_tag: String },
}

impl CollectionKind {
    pub fn posts() -> Self {
        CollectionKind::Posts {
            default_tag: DEFAULT_TAG.to_string(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CollectionKind::Pages => "pages",
            CollectionKind::Posts { .. } => "posts",
        }
    }
}

/// One complete, internally consistent load result
#[derive(Debug, Default, PartialEq)]
pub struct Generation {
    targets: Vec<Arc<Target>>,
    by_path: HashMap<String, Arc<Target>>,
    by_tag: IndexMap<String, Vec<Arc<Target>>>,
}

impl Generation {
    /// Build a generation from freshly loaded records
    pub fn build(
        kind: &CollectionKind,
        root: &Path,
        records: Vec<SourceRecord>,
    ) -> Result<Self, ContentError> {
        let targets: Vec<Target> = records
            .into_iter()
            .map(|record| Target::from_record(record, root))
            .collect();

        match kind {
            CollectionKind::Pages => Self::index(targets.into_iter().map(Arc::new).collect()),
            CollectionKind::Posts { default_tag } => Self::build_posts(targets, default_tag),
        }
    }

    /// Drop drafts, sort by date descending, default tags, then group by tag
    fn build_posts(targets: Vec<Target>, default_tag: &str) -> Result<Self, ContentError> {
        let mut dated = Vec::with_capacity(targets.len());
        for target in targets {
            let Some(value) = target.get("date") else {
                tracing::debug!("Skipping draft {:?} (no date)", target.source);
                continue;
            };
            let key = DateKey::from_value(value).map_err(|reason| ContentError::InvalidDate {
                path: target.source.clone(),
                reason,
            })?;
            dated.push((key, target));
        }

        if let Some(expected) = prevailing_kind(&dated) {
            if let Some((key, target)) = dated.iter().find(|(key, _)| key.kind() != expected) {
                let other = dated
                    .iter()
                    .find(|(key, _)| key.kind() == expected)
                    .map(|(_, t)| t.source.clone())
                    .unwrap_or_default();
                return Err(ContentError::MixedDateTypes {
                    path: target.source.clone(),
                    found: key.kind(),
                    other,
                    expected,
                });
            }
        }

        // Stable sort, so equal dates keep discovery order
        dated.sort_by(|(a, _), (b, _)| b.compare(a).unwrap_or(std::cmp::Ordering::Equal));

        let mut posts = Vec::with_capacity(dated.len());
        for (_, mut post) in dated {
            if !post.meta.contains_key("tags") {
                post.meta.insert(
                    Value::from("tags"),
                    Value::Sequence(vec![Value::from(default_tag)]),
                );
            }
            posts.push(Arc::new(post));
        }

        let mut generation = Self::index(posts)?;

        for post in &generation.targets {
            let tags = post
                .get("tags")
                .and_then(tag_list)
                .ok_or_else(|| ContentError::InvalidTags {
                    path: post.source.clone(),
                })?;

            let mut seen: Vec<&str> = Vec::with_capacity(tags.len());
            for tag in &tags {
                if seen.contains(&tag.as_str()) {
                    continue;
                }
                seen.push(tag);
                generation
                    .by_tag
                    .entry(tag.clone())
                    .or_default()
                    .push(Arc::clone(post));
            }
        }

        Ok(generation)
    }

    /// Index targets by path, rejecting collisions
    fn index(targets: Vec<Arc<Target>>) -> Result<Self, ContentError> {
        let mut by_path: HashMap<String, Arc<Target>> = HashMap::with_capacity(targets.len());
        let mut collisions = Vec::new();

        for target in &targets {
            match by_path.entry(target.path.clone()) {
                Entry::Occupied(existing) => collisions.push(PathCollision {
                    path: target.path.clone(),
                    first: existing.get().source.clone(),
                    second: target.source.clone(),
                }),
                Entry::Vacant(slot) => {
                    slot.insert(Arc::clone(target));
                }
            }
        }

        if !collisions.is_empty() {
            return Err(ContentError::PathCollisions(collisions));
        }

        Ok(Self {
            targets,
            by_path,
            by_tag: IndexMap::new(),
        })
    }

    /// Targets in display order
    pub fn targets(&self) -> &[Arc<Target>] {
        &self.targets
    }

    /// Look up a target by canonical path
    pub fn get(&self, path: &str) -> Option<&Arc<Target>> {
        self.by_path.get(path)
    }

    /// Posts carrying `tag`, newest first
    pub fn tagged(&self, tag: &str) -> Option<&[Arc<Target>]> {
        self.by_tag.get(tag).map(Vec::as_slice)
    }

    /// Tags in order of first appearance
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.by_tag.keys().map(String::as_str)
    }

    pub fn by_path(&self) -> &HashMap<String, Arc<Target>> {
        &self.by_path
    }

    pub fn by_tag(&self) -> &IndexMap<String, Vec<Arc<Target>>> {
        &self.by_tag
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

/// Serializes as the target list; the indexes are exposed separately
impl Serialize for Generation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.targets.serialize(serializer)
    }
}

/// Most common key kind; ties go to dates, then numbers, then free text
fn prevailing_kind(dated: &[(DateKey, Target)]) -> Option<&'static str> {
    const RANK: [&str; 3] = ["string", "number", "date"];

    RANK.iter()
        .map(|kind| {
            let count = dated.iter().filter(|(key, _)| key.kind() == *kind).count();
            (count, *kind)
        })
        .filter(|(count, _)| *count > 0)
        .max_by_key(|(count, kind)| (*count, RANK.iter().position(|k| k == kind)))
        .map(|(_, kind)| kind)
}

/// Path index serialized in display order
pub(crate) struct PathIndex<'a>(pub &'a Generation);

impl Serialize for PathIndex<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.targets.len()))?;
        for target in &self.0.targets {
            map.serialize_entry(&target.path, target)?;
        }
        map.end()
    }
}

/// A reloadable collection of pages or posts
pub struct TargetCollection {
    kind: CollectionKind,
    source: SourceFiles,
    current: ArcSwap<Generation>,
    reload_lock: Mutex<()>,
}

impl TargetCollection {
    /// Bind a collection to its source files without loading anything
    pub fn new(kind: CollectionKind, source: SourceFiles) -> Self {
        Self {
            kind,
            source,
            current: ArcSwap::from_pointee(Generation::default()),
            reload_lock: Mutex::new(()),
        }
    }

    pub fn kind(&self) -> &CollectionKind {
        &self.kind
    }

    pub fn source(&self) -> &SourceFiles {
        &self.source
    }

    /// Load a fresh generation and swap it in.
    ///
    /// On error the current generation is left untouched.
    pub fn load(&self) -> Result<(), ContentError> {
        let _guard = self
            .reload_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let records = self.source.load()?;
        let generation = Generation::build(&self.kind, self.source.root(), records)?;

        tracing::info!(
            "Loaded {} {} from {:?}",
            generation.len(),
            self.kind.name(),
            self.source.root()
        );
        self.current.store(Arc::new(generation));

        Ok(())
    }

    /// Current generation; stays valid even if a reload happens meanwhile
    pub fn snapshot(&self) -> Arc<Generation> {
        self.current.load_full()
    }

    pub fn get(&self, path: &str) -> Option<Arc<Target>> {
        self.current.load().get(path).cloned()
    }

    pub fn tagged(&self, tag: &str) -> Option<Vec<Arc<Target>>> {
        self.current.load().tagged(tag).map(<[_]>::to_vec)
    }
}
