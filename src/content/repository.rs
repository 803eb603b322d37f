//! Content repository - pages and posts behind one read API

use std::path::Path;
use std::sync::Arc;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::collection::{CollectionKind, Generation, PathIndex, TargetCollection};
use super::error::LoadError;
use super::render::HighlightOptions;
use super::source::SourceFiles;
use super::target::Target;
use crate::config::BlogConfig;

/// Pages and posts of a blog
pub struct Repository {
    pages: TargetCollection,
    posts: TargetCollection,
}

impl Repository {
    /// Compose a repository from already configured source files
    pub fn new(pages: SourceFiles, posts: SourceFiles) -> Self {
        Self::with_default_tag(pages, posts, super::collection::DEFAULT_TAG)
    }

    pub fn with_default_tag(pages: SourceFiles, posts: SourceFiles, default_tag: &str) -> Self {
        Self {
            pages: TargetCollection::new(CollectionKind::Pages, pages),
            posts: TargetCollection::new(
                CollectionKind::Posts {
                    default_tag: default_tag.to_string(),
                },
                posts,
            ),
        }
    }

    /// Bind both collections to the configured roots, without loading
    pub fn from_config(config: &BlogConfig, base_dir: &Path) -> Self {
        let highlight = HighlightOptions {
            theme: config.highlight_theme.clone(),
            line_numbers: config.line_numbers,
        };

        let pages = SourceFiles::new(base_dir.join(&config.page_root))
            .extensions(&config.page_extensions)
            .encoding(config.page_encoding)
            .meta_decoder(config.page_meta_renderer.build())
            .body_renderer(config.page_body_renderer.build(&highlight));

        let posts = SourceFiles::new(base_dir.join(&config.post_root))
            .extensions(&config.post_extensions)
            .encoding(config.post_encoding)
            .meta_decoder(config.post_meta_renderer.build())
            .body_renderer(config.post_body_renderer.build(&highlight));

        Self::with_default_tag(pages, posts, &config.post_default_tag)
    }

    /// Reload pages, then posts.
    ///
    /// A collection that fails keeps its previous generation and does not
    /// stop the other one from reloading. Every failure is logged and
    /// returned together.
    pub fn load(&self) -> Result<(), LoadError> {
        let mut failures = Vec::new();

        for collection in [&self.pages, &self.posts] {
            if let Err(e) = collection.load() {
                tracing::error!(
                    "Failed to reload {}, keeping previous content: {}",
                    collection.kind().name(),
                    e
                );
                failures.push((collection.kind().name(), e));
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(LoadError { failures })
        }
    }

    pub fn pages(&self) -> Arc<Generation> {
        self.pages.snapshot()
    }

    pub fn posts(&self) -> Arc<Generation> {
        self.posts.snapshot()
    }

    pub fn page(&self, path: &str) -> Option<Arc<Target>> {
        self.pages.get(path)
    }

    pub fn post(&self, path: &str) -> Option<Arc<Target>> {
        self.posts.get(path)
    }

    /// Posts carrying `tag`, newest first
    pub fn posts_tagged(&self, tag: &str) -> Option<Vec<Arc<Target>>> {
        self.posts.tagged(tag)
    }

    /// All tags, in order of first appearance
    pub fn tags(&self) -> Vec<String> {
        self.posts.snapshot().tags().map(str::to_string).collect()
    }

    /// Current generations of both collections.
    ///
    /// Each generation is internally consistent, but the two are captured
    /// separately, so a reload running meanwhile may be reflected in one and
    /// not the other.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            pages: self.pages.snapshot(),
            posts: self.posts.snapshot(),
        }
    }
}

/// Pages and posts generations held for one render.
///
/// Serializes into the template environment: `pages`, `pages_by_path`,
/// `posts`, `posts_by_path` and `posts_by_tag`.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub pages: Arc<Generation>,
    pub posts: Arc<Generation>,
}

impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(5))?;
        map.serialize_entry("pages", &*self.pages)?;
        map.serialize_entry("pages_by_path", &PathIndex(&self.pages))?;
        map.serialize_entry("posts", &*self.posts)?;
        map.serialize_entry("posts_by_path", &PathIndex(&self.posts))?;
        map.serialize_entry("posts_by_tag", self.posts.by_tag())?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentError;
    use std::fs;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn site() -> (TempDir, Repository) {
        let dir = TempDir::new().unwrap();
        let base = dir.path();
        write(&base.join("page/about.html"), "---\ntitle: About\n---\n<p>About me</p>");
        write(
            &base.join("post/2014/hello.markdown"),
            "---\ntitle: Hello\ndate: 2014-02-01\ntags: [intro]\n---\n# Hello\n",
        );
        write(
            &base.join("post/2014/second.markdown"),
            "---\ntitle: Second\ndate: 2014-03-01\n---\nMore *words*.\n",
        );

        let repository = Repository::from_config(&BlogConfig::default(), base);
        (dir, repository)
    }

    #[test]
    fn test_initialize_does_not_load() {
        let (_dir, repository) = site();
        assert!(repository.pages().is_empty());
        assert!(repository.posts().is_empty());
    }

    #[test]
    fn test_load_and_lookup() {
        let (_dir, repository) = site();
        repository.load().unwrap();

        let about = repository.page("about").unwrap();
        assert_eq!(about.body, "<p>About me</p>");

        let hello = repository.post("2014/hello").unwrap();
        assert!(hello.body.contains("<h1>Hello</h1>"));

        let posts = repository.posts();
        assert_eq!(posts.targets()[0].path, "2014/second");
        assert_eq!(repository.tags(), vec!["untagged", "intro"]);
        assert_eq!(repository.posts_tagged("intro").unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_lookups_are_none() {
        let (_dir, repository) = site();
        repository.load().unwrap();

        assert!(repository.page("nope").is_none());
        assert!(repository.post("about").is_none());
        assert!(repository.posts_tagged("nope").is_none());
    }

    #[test]
    fn test_failures_are_isolated_per_collection() {
        let (dir, repository) = site();
        repository.load().unwrap();

        // Break posts, add a page: pages still reload
        write(
            &dir.path().join("post/bad.markdown"),
            "---\ndate: 2014-04-01\ntags: {a: 1}\n---\n",
        );
        write(&dir.path().join("page/contact.html"), "<p>Contact</p>");

        let err = repository.load().unwrap_err();
        assert_eq!(err.failures.len(), 1);
        assert_eq!(err.failures[0].0, "posts");

        assert!(repository.page("contact").is_some());
        assert_eq!(repository.posts().len(), 2);
        assert!(repository.post("bad").is_none());
    }

    #[test]
    fn test_mixed_dates_keep_previous_posts() {
        let (dir, repository) = site();
        repository.load().unwrap();

        write(
            &dir.path().join("post/2014/third.markdown"),
            "---\ntitle: Third\ndate: 1396310400\n---\nEpoch dated.\n",
        );
        write(&dir.path().join("page/contact.html"), "<p>Contact</p>");

        let err = repository.load().unwrap_err();
        assert_eq!(err.failures.len(), 1);
        assert_eq!(err.failures[0].0, "posts");
        assert!(matches!(
            err.failures[0].1,
            ContentError::MixedDateTypes { found: "number", .. }
        ));

        assert!(repository.page("contact").is_some());
        let posts = repository.posts();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts.targets()[0].path, "2014/second");
        assert!(repository.post("2014/third").is_none());
    }

    #[test]
    fn test_both_failures_reported() {
        let (dir, repository) = site();
        write(&dir.path().join("page/bad.html"), "---\nunterminated\n");
        write(&dir.path().join("post/bad.markdown"), "---\n[1]\n---\n");

        let err = repository.load().unwrap_err();
        let names: Vec<_> = err.failures.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["pages", "posts"]);
    }

    #[test]
    fn test_snapshot_environment() {
        let (_dir, repository) = site();
        repository.load().unwrap();

        let env = serde_json::to_value(repository.snapshot()).unwrap();
        assert_eq!(env["pages"][0]["path"], "about");
        assert_eq!(env["pages_by_path"]["about"]["meta"]["title"], "About");
        assert_eq!(env["posts"][0]["path"], "2014/second");
        assert_eq!(env["posts_by_path"]["2014/hello"]["meta"]["title"], "Hello");
        assert_eq!(env["posts_by_tag"]["intro"][0]["path"], "2014/hello");
    }

    #[test]
    fn test_snapshot_survives_reload() {
        let (dir, repository) = site();
        repository.load().unwrap();
        let snapshot = repository.snapshot();

        fs::remove_file(dir.path().join("page/about.html")).unwrap();
        repository.load().unwrap();

        assert!(snapshot.pages.get("about").is_some());
        assert!(repository.page("about").is_none());
    }
}
