//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::config::BlogConfig;
use crate::content::Target;
use crate::routes::Route;

/// Characters escaped inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Percent-encode a `/`-separated path, keeping the separators
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for("/blog/", "/post/hello/") // -> "/blog/post/hello/"
/// ```
pub fn url_for(root: &str, path: &str) -> String {
    let root = root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for("https://example.com/blog/", "/about/") // -> "https://example.com/blog/about/"
/// ```
pub fn full_url_for(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{}/{}", base, path)
}

/// Path component of a base URL, always ending in `/`
///
/// # Examples
/// ```ignore
/// root_of("http://example.com/blog") // -> "/blog/"
/// ```
pub fn root_of(base_url: &str) -> String {
    let without_scheme = base_url
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(base_url);
    let path = without_scheme
        .find('/')
        .map(|i| &without_scheme[i..])
        .unwrap_or("/");
    let path = path.trim_matches('/');

    if path.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", path)
    }
}

/// Calculate relative URL from one path to another
///
/// # Examples
/// ```ignore
/// relative_url("/foo/bar/", "/css/style.css") // -> "../../css/style.css"
/// ```
pub fn relative_url(from: &str, to: &str) -> String {
    let from_parts: Vec<&str> = from.split('/').filter(|p| !p.is_empty()).collect();
    let to_parts: Vec<&str> = to.split('/').filter(|p| !p.is_empty()).collect();

    // Find common prefix
    let common = from_parts
        .iter()
        .zip(&to_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = vec![".."; from_parts.len() - common];
    parts.extend(&to_parts[common..]);

    let mut result = parts.join("/");
    if to.ends_with('/') && !result.is_empty() {
        result.push('/');
    }

    if result.is_empty() {
        "./".to_string()
    } else {
        result
    }
}

/// Link builder for templates and the freeze crawler.
///
/// Links are root-relative under the path of the configured base URL, or
/// relative to the route being rendered when relative URLs are enabled.
#[derive(Debug, Clone)]
pub struct Urls {
    base_url: String,
    root: String,
    relative: bool,
}

impl Urls {
    pub fn new(base_url: &str, relative: bool) -> Self {
        Self {
            base_url: base_url.to_string(),
            root: root_of(base_url),
            relative,
        }
    }

    pub fn from_config(config: &BlogConfig) -> Self {
        Self::new(&config.freezer_base_url, config.freezer_relative_urls)
    }

    /// Link to `route` from a document rendered at `current`
    pub fn link(&self, route: &Route, current: &Route) -> String {
        if self.relative {
            relative_url(&current.url_path(), &route.url_path())
        } else {
            url_for(&self.root, &route.url_path())
        }
    }

    /// Absolute URL of `route`, including the domain
    pub fn absolute(&self, route: &Route) -> String {
        full_url_for(&self.base_url, &route.url_path())
    }

    pub fn index(&self, page: usize, current: &Route) -> String {
        self.link(&Route::Index(page), current)
    }

    pub fn archive(&self, current: &Route) -> String {
        self.link(&Route::Archive, current)
    }

    pub fn page(&self, page: &Target, current: &Route) -> String {
        self.page_by_path(&page.path, current)
    }

    pub fn page_by_path(&self, path: &str, current: &Route) -> String {
        self.link(&Route::Page(path.to_string()), current)
    }

    pub fn post(&self, post: &Target, current: &Route) -> String {
        self.post_by_path(&post.path, current)
    }

    pub fn post_by_path(&self, path: &str, current: &Route) -> String {
        self.link(&Route::Post(path.to_string()), current)
    }

    pub fn tag(&self, tag: &str, current: &Route) -> String {
        self.link(&Route::Tag(tag.to_string()), current)
    }

    pub fn static_file(&self, filename: &str, current: &Route) -> String {
        self.link(&Route::Static(filename.to_string()), current)
    }
}
