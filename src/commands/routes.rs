//! Print the crawl plan of a frozen build

use anyhow::Result;

use crate::routes::{enumerate, Route};
use crate::Blog;

/// Every route of a blog opened in freeze mode, with its URL and output file
pub fn plan(blog: &Blog) -> Result<Vec<(Route, String, std::path::PathBuf)>> {
    blog.load()?;

    let urls = blog.urls();
    let destination = blog.destination();
    let routes = enumerate(&blog.repository.snapshot(), blog.config.per_page)?;

    Ok(routes
        .into_iter()
        .map(|route| {
            let url = urls.absolute(&route);
            let file = route.output_file(&destination);
            (route, url, file)
        })
        .collect())
}

pub fn run(blog: &Blog) -> Result<()> {
    let plan = plan(blog)?;
    tracing::debug!("{} routes", plan.len());
    for (_, url, file) in plan {
        println!("{} -> {}", url, file.display());
    }
    Ok(())
}
