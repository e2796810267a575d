// src/utils.rs
use anyhow::Result;

/// Get file extension in lowercase
pub fn get_file_extension(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Validate file extension against allowed types. Names without an
/// extension pass; the content check decides for those.
pub fn validate_file_extension(filename: &str, allowed: &[&str]) -> Result<()> {
    let Some(ext) = get_file_extension(filename) else {
        return Ok(());
    };

    if !allowed.contains(&ext.as_str()) {
        anyhow::bail!(
            "Unsupported file extension: {}. Allowed: {:?}",
            ext,
            allowed
        );
    }

    Ok(())
}

/// Strip any client-side directory components from an uploaded file name
pub fn display_file_name(raw: &str) -> String {
    raw.rsplit(['/', '\\'])
        .next()
        .unwrap_or(raw)
        .trim()
        .to_string()
}

/// Escape text for HTML element content and attribute values
pub fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Human readable byte size for error messages
pub fn format_size(bytes: u64) -> String {
    const MB: u64 = 1024 * 1024;
    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else {
        format!("{} KB", bytes.div_ceil(1024))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_file_extension() {
        assert_eq!(get_file_extension("resume.pdf"), Some("pdf".to_string()));
        assert_eq!(get_file_extension("CV.PDF"), Some("pdf".to_string()));
        assert_eq!(get_file_extension("noext"), None);
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension("test.pdf", &["pdf"]).is_ok());
        assert!(validate_file_extension("test.docx", &["pdf"]).is_err());
        assert!(validate_file_extension("noext", &["pdf"]).is_ok());
    }

    #[test]
    fn test_display_file_name() {
        assert_eq!(display_file_name("C:\\Users\\me\\cv.pdf"), "cv.pdf");
        assert_eq!(display_file_name("/tmp/dir/cv.pdf"), "cv.pdf");
        assert_eq!(display_file_name("cv.pdf"), "cv.pdf");
        assert_eq!(display_file_name(""), "");
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape("<b>\"Tom\" & 'Jerry'</b>"),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "1 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }
}
