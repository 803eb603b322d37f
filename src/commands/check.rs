//! One-shot load of every collection

use anyhow::Result;

use crate::Blog;

/// Load pages and posts, reporting every failing collection
pub fn run(blog: &Blog) -> Result<()> {
    if let Err(e) = blog.repository.load() {
        for (collection, failure) in &e.failures {
            eprintln!("{}: {}", collection, failure);
        }
        anyhow::bail!("{} collection(s) failed to load", e.failures.len());
    }

    let snapshot = blog.repository.snapshot();
    println!(
        "OK: {} pages, {} posts, {} tags",
        snapshot.pages.len(),
        snapshot.posts.len(),
        snapshot.posts.by_tag().len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_check_reports_failure() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("post")).unwrap();
        fs::write(dir.path().join("post/a.markdown"), "---\ndate: 2024-01-01\n---\n").unwrap();
        let blog = Blog::new(dir.path(), false).unwrap();
        run(&blog).unwrap();

        fs::write(dir.path().join("post/b.markdown"), "---\ndate: 7\n---\n").unwrap();
        assert!(run(&blog).is_err());
    }
}
