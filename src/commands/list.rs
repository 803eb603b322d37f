//! List site content

use anyhow::Result;

use crate::content::Target;
use crate::Blog;

/// Sort key shown next to a post
fn display_date(post: &Target) -> String {
    match post.get("date") {
        Some(serde_yaml::Value::String(s)) => s.clone(),
        Some(serde_yaml::Value::Number(n)) => n.to_string(),
        _ => "-".to_string(),
    }
}

/// List site content by type
pub fn run(blog: &Blog, content_type: &str) -> Result<()> {
    blog.load()?;
    let repository = &blog.repository;

    match content_type {
        "post" | "posts" => {
            let posts = repository.posts();
            println!("Posts ({}):", posts.len());
            for post in posts.targets() {
                println!("  {} - {}", display_date(post), post.path);
            }
        }
        "page" | "pages" => {
            let pages = repository.pages();
            println!("Pages ({}):", pages.len());
            for page in pages.targets() {
                println!("  {}", page.path);
            }
        }
        "tag" | "tags" => {
            let posts = repository.posts();
            let mut tags: Vec<(&str, usize)> = posts
                .by_tag()
                .iter()
                .map(|(tag, posts)| (tag.as_str(), posts.len()))
                .collect();
            println!("Tags ({}):", tags.len());
            tags.sort_by(|a, b| b.1.cmp(&a.1));
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, page, tag", content_type);
        }
    }

    Ok(())
}
