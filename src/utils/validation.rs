use crate::error::{AppError, AppResult};
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").expect("valid email regex")
});

/// Lower-cased, trimmed address if it looks like an email.
pub fn normalize_email(email: &str) -> AppResult<String> {
    let email = email.trim().to_lowercase();
    if email.len() > 255 || !EMAIL_RE.is_match(&email) {
        return Err(AppError::ValidationError("Invalid email address".to_string()));
    }
    Ok(email)
}

pub fn require_text(field: &str, value: &str, max_len: usize) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::ValidationError(format!("{field} is required")));
    }
    if value.chars().count() > max_len {
        return Err(AppError::ValidationError(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(value.to_string())
}

/// "Renovasi Tempat Wudhu!" -> "renovasi-tempat-wudhu"
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_dash = false;
    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

pub fn validate_slug(slug: &str) -> AppResult<String> {
    let slug = slug.trim();
    if slug.is_empty() || slug != slugify(slug) {
        return Err(AppError::ValidationError(
            "Slug may only contain lower case letters, digits and dashes".to_string(),
        ));
    }
    Ok(slug.to_string())
}

/// `#rgb` or `#rrggbb`
pub fn validate_color(color: &str) -> AppResult<String> {
    let color = color.trim();
    let hex = color.strip_prefix('#').unwrap_or("");
    if (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        Ok(color.to_string())
    } else {
        Err(AppError::ValidationError(format!("Invalid color: {color}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(
            normalize_email("  Ahmad@Example.COM ").unwrap(),
            "ahmad@example.com"
        );
        assert!(normalize_email("not-an-email").is_err());
        assert!(normalize_email("a@b").is_err());
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Renovasi Tempat Wudhu!"), "renovasi-tempat-wudhu");
        assert_eq!(slugify("  Zakat -- Fitrah 2026 "), "zakat-fitrah-2026");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("infaq-jumat").is_ok());
        assert!(validate_slug("Infaq Jumat").is_err());
        assert!(validate_slug("").is_err());
    }

    #[test]
    fn test_validate_color() {
        assert!(validate_color("#0f766e").is_ok());
        assert!(validate_color("#abc").is_ok());
        assert!(validate_color("teal").is_err());
    }

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("Title", "  Kajian ", 10).unwrap(), "Kajian");
        assert!(require_text("Title", "   ", 10).is_err());
        assert!(require_text("Title", "abcdefghijk", 10).is_err());
    }
}
