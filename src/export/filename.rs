use chrono::Local;
use regex::Regex;

/// Longest stem we keep, leaving room for the date suffix and extension.
const MAX_STEM_LEN: usize = 200;

/// Sanitize an export stem for cross-platform use.
/// Replaces characters that are invalid on Windows, macOS, or Linux.
pub fn sanitize_filename(name: &str) -> String {
    // Invalid on Windows: < > : " / \ | ? *  plus control characters.
    let invalid_chars = Regex::new(r#"[<>:"/\\|?*\x00-\x1F]"#).unwrap();
    let sanitized = invalid_chars.replace_all(name, "_");

    // Leading/trailing spaces and dots trip up Windows.
    let sanitized = sanitized.trim_matches(|c| c == ' ' || c == '.');

    // Reserved Windows device names (CON, PRN, AUX, NUL, COM1-9, LPT1-9).
    let reserved = Regex::new(r"(?i)^(CON|PRN|AUX|NUL|COM[1-9]|LPT[1-9])$").unwrap();
    if reserved.is_match(sanitized) {
        return format!("_{}", sanitized);
    }

    // Cap the length on a character boundary.
    let sanitized = match sanitized.char_indices().nth(MAX_STEM_LEN) {
        Some((idx, _)) => &sanitized[..idx],
        None => sanitized,
    };

    if sanitized.is_empty() {
        "untitled".to_string()
    } else {
        sanitized.to_string()
    }
}

/// Dated default name for an exported page, e.g. `seite-2024-03-17.pdf`.
pub fn default_export_name(stem: &str, extension: &str) -> String {
    format!(
        "{}-{}.{}",
        sanitize_filename(stem),
        Local::now().format("%Y-%m-%d"),
        extension
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_basic() {
        assert_eq!(sanitize_filename("Dresden Post"), "Dresden Post");
        assert_eq!(sanitize_filename("Seite: Eins"), "Seite_ Eins");
        assert_eq!(sanitize_filename("post/seite"), "post_seite");
        assert_eq!(sanitize_filename("post\\seite"), "post_seite");
        assert_eq!(sanitize_filename("post|seite"), "post_seite");
    }

    #[test]
    fn test_sanitize_special_chars() {
        assert_eq!(sanitize_filename("post<>seite"), "post__seite");
        assert_eq!(sanitize_filename("post?*seite"), "post__seite");
        assert_eq!(sanitize_filename("post\"seite"), "post_seite");
    }

    #[test]
    fn test_sanitize_reserved() {
        assert_eq!(sanitize_filename("CON"), "_CON");
        assert_eq!(sanitize_filename("con"), "_con");
        assert_eq!(sanitize_filename("COM1"), "_COM1");
        assert_eq!(sanitize_filename("LPT9"), "_LPT9");
        assert_eq!(sanitize_filename("NUL"), "_NUL");
    }

    #[test]
    fn test_sanitize_empty() {
        assert_eq!(sanitize_filename(""), "untitled");
        assert_eq!(sanitize_filename("..."), "untitled");
        assert_eq!(sanitize_filename("   "), "untitled");
        assert_eq!(sanitize_filename(" . "), "untitled");
    }

    #[test]
    fn test_sanitize_trim() {
        assert_eq!(sanitize_filename("  seite  "), "seite");
        assert_eq!(sanitize_filename("..seite.."), "seite");
    }

    #[test]
    fn test_sanitize_long_name() {
        let long_name = "a".repeat(250);
        assert_eq!(sanitize_filename(&long_name).len(), 200);
    }

    #[test]
    fn test_sanitize_long_name_multibyte() {
        let long_name = "ü".repeat(250);
        let result = sanitize_filename(&long_name);
        assert_eq!(result.chars().count(), 200);
    }

    #[test]
    fn test_sanitize_control_chars() {
        assert_eq!(sanitize_filename("post\x00seite"), "post_seite");
        assert_eq!(sanitize_filename("post\x1Fseite"), "post_seite");
    }

    #[test]
    fn test_default_export_name_shape() {
        let name = default_export_name("seite", "pdf");
        assert!(name.starts_with("seite-"));
        assert!(name.ends_with(".pdf"));
        assert_eq!(name.matches('-').count(), 3);
    }
}
