use std::path::Path;

/// Split a file name at its last dot: `"a.tar.gz"` -> `("a.tar", Some("gz"))`.
///
/// A leading dot does not start an extension (`".bashrc"` has none), and a
/// trailing dot yields no extension either.
pub fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(i) if i > 0 && i + 1 < name.len() => (&name[..i], Some(&name[i + 1..])),
        _ => (name, None),
    }
}

/// Lowercase, no leading dot.
pub fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

/// Last path component as a string (lossy). Empty for paths like `/` or `..`.
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_last_dot() {
        assert_eq!(split_extension("a.tar.gz"), ("a.tar", Some("gz")));
        assert_eq!(split_extension("photo.JPG"), ("photo", Some("JPG")));
        assert_eq!(split_extension("README"), ("README", None));
        assert_eq!(split_extension(".bashrc"), (".bashrc", None));
        assert_eq!(split_extension("weird."), ("weird.", None));
    }

    #[test]
    fn normalizes_extension() {
        assert_eq!(normalize_extension(".TXT"), "txt");
        assert_eq!(normalize_extension("Jpeg"), "jpeg");
        assert_eq!(normalize_extension(""), "");
    }

    #[test]
    fn base_name_of_paths() {
        assert_eq!(base_name(Path::new("/p/file.TXT")), "file.TXT");
        assert_eq!(base_name(Path::new("relative/x")), "x");
        assert_eq!(base_name(Path::new("/")), "");
    }
}
