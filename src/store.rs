//! Per-group persistence: a bounded active list plus an unbounded archive,
//! each a whole-file JSON document replaced on save.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::article::Article;

/// Target size of the active list; entries beyond it rotate into the archive.
pub const ACTIVE_CAP: usize = 500;

/// Handle on one group's pair of store files under a data directory:
/// `{group}-news.json` and `archive-{group}-news.json`.
pub struct ArticleStore {
    dir: PathBuf,
    group: String,
}

impl ArticleStore {
    pub fn new(dir: impl Into<PathBuf>, group: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            group: group.into(),
        }
    }

    fn active_path(&self) -> PathBuf {
        self.dir.join(format!("{}-news.json", self.group))
    }

    fn archive_path(&self) -> PathBuf {
        self.dir.join(format!("archive-{}-news.json", self.group))
    }

    /// Load the active list. A missing file is an empty list; a file that
    /// exists but cannot be read or parsed is an error, never silently empty.
    pub fn load(&self) -> Result<Vec<Article>> {
        read_list(&self.active_path())
    }

    pub fn save(&self, articles: &[Article]) -> Result<()> {
        write_list(&self.active_path(), articles)
    }

    pub fn load_archive(&self) -> Result<Vec<Article>> {
        read_list(&self.archive_path())
    }

    pub fn save_archive(&self, articles: &[Article]) -> Result<()> {
        write_list(&self.archive_path(), articles)
    }
}

/// Truncate `active` to [`ACTIVE_CAP`] and return the demoted tail in its
/// original relative order. The caller prepends that tail to the archive, so
/// the most recently demoted entries sit at the archive's front.
pub fn rotate(active: &mut Vec<Article>) -> Vec<Article> {
    if active.len() <= ACTIVE_CAP {
        return Vec::new();
    }
    active.split_off(ACTIVE_CAP)
}

fn read_list(path: &Path) -> Result<Vec<Article>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e).with_context(|| format!("reading store {}", path.display())),
    };
    serde_json::from_str(&raw).with_context(|| format!("parsing store {}", path.display()))
}

/// Whole-file replacement via a sibling temp file and rename, so a crash
/// mid-write never leaves a torn store behind.
fn write_list(path: &Path, articles: &[Article]) -> Result<()> {
    let raw = serde_json::to_string(articles).context("serializing store")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, raw).with_context(|| format!("writing store {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("replacing store {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_follow_the_group_key() {
        let store = ArticleStore::new("/data", "tech");
        assert!(store.active_path().ends_with("tech-news.json"));
        assert!(store.archive_path().ends_with("archive-tech-news.json"));
    }

    #[test]
    fn rotate_below_cap_is_a_noop() {
        let mut active = vec![Article::default(); 3];
        assert!(rotate(&mut active).is_empty());
        assert_eq!(active.len(), 3);
    }
}
