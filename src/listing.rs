use crate::diagnostics::Diagnostics;
use crate::elide::{elide, truncate_middle};
use crate::file_entry::FileEntry;
use anyhow::{anyhow, Context, Result};
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default)]
pub struct ListOptions {
    pub recursive: bool,
    pub follow_symlinks: bool,
}

/// Collect the regular files under `root` as entries, sorted by path.
pub fn collect_entries(
    root: &Path,
    opts: ListOptions,
    diag: &dyn Diagnostics,
) -> Result<Vec<FileEntry>> {
    if !root.is_dir() {
        return Err(anyhow!("not a directory: {}", root.display()));
    }

    let mut out = Vec::new();

    if opts.recursive {
        let mut visited_dirs: HashSet<(u64, u64)> = HashSet::new();
        let walker = walkdir::WalkDir::new(root)
            .follow_links(opts.follow_symlinks)
            .into_iter()
            .filter_entry(|e| filter_dir_entry(e, &mut visited_dirs));

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::debug!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if entry.file_type().is_file() {
                out.push(FileEntry::from_path_with(entry.path(), diag));
            }
        }
    } else {
        let rd = std::fs::read_dir(root)
            .with_context(|| format!("Failed to read directory {}", root.display()))?;
        for e in rd.flatten() {
            let p = e.path();
            let is_file = if opts.follow_symlinks {
                p.is_file()
            } else {
                e.file_type().is_ok_and(|t| t.is_file())
            };
            if is_file {
                out.push(FileEntry::from_path_with(&p, diag));
            }
        }
    }

    out.sort_by(|a, b| a.full_path().cmp(b.full_path()));
    tracing::debug!(root = %root.display(), count = out.len(), "listing finished");
    Ok(out)
}

// Symlinked directory loops would otherwise be walked forever.
fn filter_dir_entry(e: &walkdir::DirEntry, visited_dirs: &mut HashSet<(u64, u64)>) -> bool {
    if e.file_type().is_dir() {
        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;
            if let Ok(md) = e.metadata() {
                return visited_dirs.insert((md.dev(), md.ino()));
            }
        }
        #[cfg(not(unix))]
        let _ = visited_dirs;
    }
    true
}

/// One table line: check mark, middle-truncated name padded to
/// `name_width`, extension and the fixed-width size column.
pub fn format_row(entry: &FileEntry, name_width: usize) -> String {
    let mark = if entry.is_checked() { "[x]" } else { "[ ]" };
    let name = truncate_middle(entry.filename(), name_width);
    format!(
        "{mark} {name:<name_width$} {ext:<6} {size}",
        ext = elide(entry.extension(), 6),
        size = entry.human_readable_size(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::NullDiagnostics;

    #[test]
    fn row_layout() {
        let e = FileEntry::new("/p/holiday_photo_0001.jpeg", "", "jpeg")
            .with_size(2048)
            .with_checked(true);
        assert_eq!(
            format_row(&e, 15),
            "[x] holi...001.jpeg jpeg       2.0 KB"
        );

        let short = FileEntry::new("a.md", "a.md", "md");
        assert_eq!(format_row(&short, 8), "[ ] a.md     md       0 B     ");
    }

    #[test]
    fn missing_root_is_an_error() {
        let r = collect_entries(
            Path::new("/definitely/not/here"),
            ListOptions::default(),
            &NullDiagnostics,
        );
        assert!(r.is_err());
    }
}
