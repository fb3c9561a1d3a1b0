//! Identity and ordering of script files found in a style directory.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use tracing::warn;

/// A script file as discovered on disk, before any host turns it into code.
///
/// File names follow `[<order>.]<name>[.<ext>]`:
///
/// | File name                  | order        | name        | extension |
/// |----------------------------|--------------|-------------|-----------|
/// | `1700000000.add_email.json`| `1700000000` | `add_email` | `json`    |
/// | `add_email.json`           | none         | `add_email` | `json`    |
/// | `1.json`                   | `1`          | `1`         | `json`    |
/// | `projects`                 | none         | `projects`  | none      |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptFile {
    /// Path relative to the script directory.
    pub relative: PathBuf,
    pub name: String,
    pub order: Option<u64>,
    pub extension: Option<String>,
    pub source: String,
}

impl ScriptFile {
    pub fn new(relative: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        let relative = relative.into();
        let file_name = relative
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let (order, rest) = match file_name.split_once('.') {
            Some((prefix, rest))
                if !prefix.is_empty() && prefix.bytes().all(|b| b.is_ascii_digit()) =>
            {
                match prefix.parse::<u64>() {
                    Ok(order) => (Some(order), rest.to_owned()),
                    Err(_) => {
                        warn!(file = %relative.display(), "Order prefix too large, script runs unnumbered");
                        (None, file_name.clone())
                    }
                }
            }
            _ => (None, file_name.clone()),
        };

        let (name, extension) = match rest.rsplit_once('.') {
            Some((name, ext)) if !name.is_empty() => (name.to_owned(), Some(ext.to_owned())),
            // `<order>.<ext>`: the number doubles as the name.
            None if order.is_some() => {
                let prefix = file_name.len() - rest.len() - 1;
                (file_name[..prefix].to_owned(), Some(rest))
            }
            _ => (rest, None),
        };

        Self {
            relative,
            name,
            order,
            extension,
            source: source.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.relative
    }

    pub fn has_extension(&self, ext: &str) -> bool {
        self.extension
            .as_deref()
            .is_some_and(|own| own.eq_ignore_ascii_case(ext))
    }

    /// Migration order: numbered files ascending, then unnumbered by path.
    pub fn migration_order(&self, other: &Self) -> Ordering {
        match (self.order, other.order) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.relative.cmp(&other.relative)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.relative.cmp(&other.relative),
        }
    }
}

/// Sort scripts into the order migrations run in.
pub fn sort_migrations(scripts: &mut [ScriptFile]) {
    scripts.sort_by(ScriptFile::migration_order);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_name() {
        let script = ScriptFile::new("1700000000.add_email.json", "");
        assert_eq!(script.order, Some(1_700_000_000));
        assert_eq!(script.name, "add_email");
        assert!(script.has_extension("JSON"));
    }

    #[test]
    fn test_unnumbered_and_bare_names() {
        let script = ScriptFile::new("sub/add_email.json", "");
        assert_eq!((script.order, script.name.as_str()), (None, "add_email"));

        let bare = ScriptFile::new("projects", "");
        assert_eq!(bare.name, "projects");
        assert_eq!(bare.extension, None);

        let numbered_only = ScriptFile::new("1.json", "");
        assert_eq!(numbered_only.order, Some(1));
        assert_eq!(numbered_only.name, "1");
        assert!(numbered_only.has_extension("json"));
    }

    #[test]
    fn test_oversized_prefix_stays_in_the_name() {
        let script = ScriptFile::new("99999999999999999999999.x.json", "");
        assert_eq!(script.order, None);
        assert_eq!(script.name, "99999999999999999999999.x");
        assert!(script.has_extension("json"));

        let mut scripts = vec![script, ScriptFile::new("5.five.json", "")];
        sort_migrations(&mut scripts);
        assert_eq!(scripts[0].name, "five");
    }

    #[test]
    fn test_migration_ordering() {
        let mut scripts: Vec<_> = ["b.json", "20.second.json", "3.first.json", "a.json"]
            .into_iter()
            .map(|name| ScriptFile::new(name, ""))
            .collect();
        sort_migrations(&mut scripts);
        let names: Vec<_> = scripts.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "a", "b"]);
    }
}
