use crate::error::{AppError, AppResult};
use std::path::{Component, Path, PathBuf};

pub const CACHE_CONTROL_IMMUTABLE: &str = "public, max-age=31536000, immutable";

const DEFAULT_MIME: &str = "application/octet-stream";

/// Extension (lower case) to MIME type. Anything else is served as `application/octet-stream`.
pub const MIME_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
    ("avif", "image/avif"),
    ("pdf", "application/pdf"),
    ("mp4", "video/mp4"),
    ("webm", "video/webm"),
    ("mp3", "audio/mpeg"),
    ("txt", "text/plain; charset=utf-8"),
    ("json", "application/json"),
    ("css", "text/css; charset=utf-8"),
    ("js", "text/javascript; charset=utf-8"),
];

pub fn content_type_for(path: &Path) -> &'static str {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return DEFAULT_MIME;
    };
    let ext = ext.to_ascii_lowercase();
    MIME_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
        .unwrap_or(DEFAULT_MIME)
}

/// Lexically joins `segments` under `base`, resolving `.` and `..` without touching the disk.
/// Absolute segments and anything that climbs out of `base` are rejected with `Forbidden`.
pub fn resolve_under(base: &Path, segments: &[&str]) -> AppResult<PathBuf> {
    let base = normalize(base);
    let mut resolved = base.clone();

    for segment in segments {
        for component in Path::new(segment).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::ParentDir => {
                    if !resolved.pop() {
                        return Err(AppError::Forbidden);
                    }
                }
                Component::RootDir | Component::Prefix(_) => return Err(AppError::Forbidden),
            }
        }
    }

    if !resolved.starts_with(&base) {
        return Err(AppError::Forbidden);
    }
    Ok(resolved)
}

/// After the file is known to exist, symlinks must not lead outside the upload root either.
pub fn ensure_canonical_within(base: &Path, file: &Path) -> AppResult<PathBuf> {
    let canonical_base = base.canonicalize()?;
    let canonical_file = file.canonicalize()?;
    if !canonical_file.starts_with(&canonical_base) {
        return Err(AppError::Forbidden);
    }
    Ok(canonical_file)
}

/// Keeps `[A-Za-z0-9._-]`, collapses everything else to `-`; never returns a dot-only name.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();
    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '-');
    if trimmed.is_empty() {
        "file".to_string()
    } else {
        trimmed.to_string()
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            // a leading ".." is part of where the base lives and must be kept
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_table() {
        assert_eq!(content_type_for(Path::new("a/logo.png")), "image/png");
        assert_eq!(content_type_for(Path::new("photo.JPG")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("qris.svg")), "image/svg+xml");
        assert_eq!(content_type_for(Path::new("archive.tar.gz")), DEFAULT_MIME);
        assert_eq!(content_type_for(Path::new("README")), DEFAULT_MIME);
    }

    #[test]
    fn test_resolve_inside_base() {
        let base = Path::new("/srv/uploads");
        let path = resolve_under(base, &["campaigns", "banner.png"]).unwrap();
        assert_eq!(path, PathBuf::from("/srv/uploads/campaigns/banner.png"));

        let path = resolve_under(base, &["campaigns", "..", "qris.png"]).unwrap();
        assert_eq!(path, PathBuf::from("/srv/uploads/qris.png"));
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let base = Path::new("/srv/uploads");
        assert!(matches!(
            resolve_under(base, &["..", "secret.txt"]),
            Err(AppError::Forbidden)
        ));
        assert!(matches!(
            resolve_under(base, &["a", "..", "..", "etc", "passwd"]),
            Err(AppError::Forbidden)
        ));
        assert!(matches!(
            resolve_under(base, &["/etc/passwd"]),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn test_resolve_relative_base() {
        let base = Path::new("./uploads");
        let path = resolve_under(base, &["x.png"]).unwrap();
        assert_eq!(path, PathBuf::from("uploads/x.png"));
        assert!(resolve_under(base, &["../x.png"]).is_err());
    }

    #[test]
    fn test_resolve_parent_relative_base() {
        let base = Path::new("../shared/uploads");
        let path = resolve_under(base, &["a.png"]).unwrap();
        assert_eq!(path, PathBuf::from("../shared/uploads/a.png"));
        assert!(matches!(
            resolve_under(base, &["..", "a.png"]),
            Err(AppError::Forbidden)
        ));
        assert_eq!(normalize(Path::new("../../a/./b/../c")), PathBuf::from("../../a/c"));
        assert_eq!(normalize(Path::new("/../srv")), PathBuf::from("/srv"));
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("QRIS Masjid.png"), "QRIS-Masjid.png");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "etc-passwd");
        assert_eq!(sanitize_file_name(".."), "file");
    }
}
