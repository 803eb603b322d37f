//! Addressable routes of a blog
//!
//! Every page, post and tag the repository holds maps to exactly one route.
//! [`enumerate`] lists all of them so a crawler can write one output file per
//! route.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::content::Snapshot;
use crate::helpers::encode_path;
use crate::pagination::{Pagination, PaginationError};

/// File written for routes that end in a directory
const INDEX_FILE: &str = "index.html";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// Paginated list of posts, 1-based
    Index(usize),
    Archive,
    Page(String),
    Post(String),
    Tag(String),
    Static(String),
}

impl Route {
    /// URL path relative to the site root, percent-encoded, starting with `/`
    pub fn url_path(&self) -> String {
        match self {
            Route::Index(page) if *page <= 1 => "/".to_string(),
            Route::Index(page) => format!("/{}/", page),
            Route::Archive => "/archive/".to_string(),
            Route::Page(path) => format!("/page/{}/", encode_path(path)),
            Route::Post(path) => format!("/post/{}/", encode_path(path)),
            Route::Tag(tag) => format!("/tag/{}/", encode_path(tag)),
            Route::Static(file) => format!("/static/{}", encode_path(file)),
        }
    }

    /// File the route is written to under `destination`
    pub fn output_file(&self, destination: &Path) -> PathBuf {
        let relative = match self {
            Route::Index(page) if *page > 1 => page.to_string(),
            Route::Index(_) => String::new(),
            Route::Archive => "archive".to_string(),
            Route::Page(path) => format!("page/{}", path),
            Route::Post(path) => format!("post/{}", path),
            Route::Tag(tag) => format!("tag/{}", tag),
            Route::Static(name) => format!("static/{}", name),
        };

        let mut file = destination.to_path_buf();
        file.extend(
            relative
                .split('/')
                .filter(|s| !s.is_empty() && *s != "." && *s != ".."),
        );
        if !matches!(self, Route::Static(_)) {
            file.push(INDEX_FILE);
        }
        file
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url_path())
    }
}

/// Every route exposed by a snapshot.
///
/// Index pages come first (at least one, even without posts), then the
/// archive, pages, posts and tags, each in collection order.
pub fn enumerate(snapshot: &Snapshot, per_page: usize) -> Result<Vec<Route>, PaginationError> {
    let index_pages = Pagination::new(snapshot.posts.targets(), 1, per_page)?
        .total_pages()
        .max(1);

    let mut routes: Vec<Route> = (1..=index_pages).map(Route::Index).collect();
    routes.push(Route::Archive);
    routes.extend(
        snapshot
            .pages
            .targets()
            .iter()
            .map(|page| Route::Page(page.path.clone())),
    );
    routes.extend(
        snapshot
            .posts
            .targets()
            .iter()
            .map(|post| Route::Post(post.path.clone())),
    );
    routes.extend(snapshot.posts.tags().map(|tag| Route::Tag(tag.to_string())));

    Ok(routes)
}
