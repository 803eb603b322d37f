//! Helper functions for templates
//!
//! URL generation shared by views and the freeze crawler.

mod url;

pub use url::*;
