//! frozen-blog: the content layer of a small static blog
//!
//! Pages and posts are loaded from source files with a metadata header,
//! indexed by path and tag, and exposed read-only to views. Reloads swap
//! in a whole new generation of content at once.

pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;
pub mod pagination;
pub mod routes;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::{ReloadHook, Repository};
use helpers::Urls;

/// The main blog application
pub struct Blog {
    /// Blog configuration
    pub config: config::BlogConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Whether the blog was opened for freezing
    pub freezing: bool,
    /// Pages and posts
    pub repository: Repository,
}

impl Blog {
    /// Open a blog from a directory, without loading any content.
    ///
    /// With `freezing` set, `freezing.yml` overrides `blog.yml`.
    pub fn new<P: AsRef<Path>>(base_dir: P, freezing: bool) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config = config::BlogConfig::load_layered(&base_dir, freezing)?;
        let repository = Repository::from_config(&config, &base_dir);

        Ok(Self {
            config,
            base_dir,
            freezing,
            repository,
        })
    }

    /// Load pages and posts, failing if either collection fails
    pub fn load(&self) -> Result<()> {
        self.repository.load()?;
        Ok(())
    }

    /// Per-request reload hook, active only while developing
    pub fn reload_hook(&self) -> ReloadHook {
        ReloadHook::new(self.config.debug && !self.freezing)
    }

    /// Link builder for the configured base URL
    pub fn urls(&self) -> Urls {
        Urls::from_config(&self.config)
    }

    /// Directory frozen output is written to
    pub fn destination(&self) -> PathBuf {
        self.base_dir.join(&self.config.freezer_destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_open_and_load() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("post")).unwrap();
        fs::write(
            dir.path().join("post/hello.markdown"),
            "---\ndate: 2024-05-01\n---\nhi\n",
        )
        .unwrap();

        let blog = Blog::new(dir.path(), false).unwrap();
        assert!(blog.repository.posts().is_empty());
        blog.load().unwrap();
        assert!(blog.repository.post("hello").is_some());
        assert_eq!(blog.destination(), dir.path().join("build"));
    }

    #[test]
    fn test_reload_hook_disabled_when_freezing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("freezing.yml"), "debug: false\n").unwrap();

        assert!(Blog::new(dir.path(), false).unwrap().reload_hook().is_enabled());
        assert!(!Blog::new(dir.path(), true).unwrap().reload_hook().is_enabled());
    }

    #[test]
    fn test_load_failure_is_fatal() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("post")).unwrap();
        fs::write(
            dir.path().join("post/broken.markdown"),
            "---\ndate: 2024-05-01\n",
        )
        .unwrap();

        let blog = Blog::new(dir.path(), true).unwrap();
        assert!(blog.load().is_err());
    }
}
