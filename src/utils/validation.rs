/// Extensions accepted by the upload gateway (compared lowercase)
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf"];

/// Longest filename written to the upload directory, in bytes
pub const MAX_FILENAME_LEN: usize = 255;

/// Names Windows reserves for devices; on Windows a sanitized stem matching one is prefixed with `_`
const WINDOWS_DEVICE_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// A client input problem. `message` is what the client sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub code: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(code: &'static str, message: &str) -> Self {
        Self {
            code,
            message: message.to_string(),
        }
    }

    pub fn missing_file_part() -> Self {
        Self::new("MISSING_FILE_PART", "No file part")
    }

    pub fn no_file_selected() -> Self {
        Self::new("NO_FILE_SELECTED", "No file selected")
    }

    pub fn disallowed_type() -> Self {
        Self::new("DISALLOWED_TYPE", "Only PDF files are allowed")
    }

    pub fn invalid_filename() -> Self {
        Self::new("INVALID_FILENAME", "Invalid filename")
    }

    pub fn no_pdf_uploaded() -> Self {
        Self::new("NO_PDF_UPLOADED", "No PDF file uploaded")
    }

    pub fn no_html_content() -> Self {
        Self::new("NO_HTML_CONTENT", "No HTML content provided")
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Checks that the filename has a `.` and that the suffix after the last one
/// is an allowed extension, ignoring case. This looks at the name only, never
/// at the content.
pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| {
            let ext = ext.to_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Reduces a client-supplied filename to a safe, flat ASCII name.
///
/// Path separators become word breaks, whitespace runs become `_`, anything
/// outside `[A-Za-z0-9_.-]` is dropped and leading/trailing `.`/`_` are
/// trimmed, so `../../etc/passwd` ends up as `etc_passwd`. A name with nothing
/// left is rejected.
pub fn sanitize_filename(filename: &str) -> Result<String, ValidationError> {
    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        tracing::warn!("Path traversal attempt detected: {}", filename);
    }

    let spaced: String = filename
        .chars()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");

    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    let mut sanitized = kept.trim_matches(|c| c == '.' || c == '_').to_string();

    if sanitized.is_empty() {
        return Err(ValidationError::invalid_filename());
    }

    let stem = sanitized.split('.').next().unwrap_or("").to_uppercase();
    if cfg!(windows) && WINDOWS_DEVICE_NAMES.contains(&stem.as_str()) {
        sanitized.insert(0, '_');
    }

    Ok(truncate_filename(sanitized))
}

// Input is ASCII at this point, so byte slicing is safe
fn truncate_filename(name: String) -> String {
    if name.len() <= MAX_FILENAME_LEN {
        return name;
    }

    match name.rsplit_once('.') {
        Some((stem, ext)) if ext.len() + 1 < MAX_FILENAME_LEN => {
            let keep = MAX_FILENAME_LEN - ext.len() - 1;
            format!("{}.{}", &stem[..keep.min(stem.len())], ext)
        }
        _ => name[..MAX_FILENAME_LEN].to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_file() {
        assert!(allowed_file("report.pdf"));
        assert!(allowed_file("REPORT.PDF"));
        assert!(allowed_file("Report.Pdf"));
        assert!(allowed_file("archive.tar.pdf"));

        assert!(!allowed_file("report"));
        assert!(!allowed_file("pdf"));
        assert!(!allowed_file("notes.txt"));
        assert!(!allowed_file("report.pdf.exe"));
        assert!(!allowed_file("report.pdfx"));
        assert!(!allowed_file("report."));
        assert!(!allowed_file(""));
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("report.pdf").unwrap(), "report.pdf");
        assert_eq!(sanitize_filename("my report.pdf").unwrap(), "my_report.pdf");
        assert_eq!(
            sanitize_filename("  quarterly   results .pdf").unwrap(),
            "quarterly_results_.pdf"
        );
        assert_eq!(
            sanitize_filename("test<script>.pdf").unwrap(),
            "testscript.pdf"
        );
        assert_eq!(sanitize_filename("résumé.pdf").unwrap(), "rsum.pdf");
    }

    #[test]
    fn test_sanitize_filename_path_traversal() {
        assert_eq!(
            sanitize_filename("../../../etc/passwd").unwrap(),
            "etc_passwd"
        );
        assert_eq!(
            sanitize_filename("..\\..\\windows\\evil.pdf").unwrap(),
            "windows_evil.pdf"
        );
        assert_eq!(sanitize_filename("/abs/path/doc.pdf").unwrap(), "abs_path_doc.pdf");
    }

    #[test]
    fn test_sanitize_filename_rejects_empty_result() {
        assert_eq!(
            sanitize_filename("../..").unwrap_err(),
            ValidationError::invalid_filename()
        );
        assert!(sanitize_filename("测试").is_err());
        assert!(sanitize_filename("").is_err());
    }

    #[test]
    fn test_sanitize_filename_hidden_names() {
        assert_eq!(sanitize_filename(".hidden.pdf").unwrap(), "hidden.pdf");
    }

    #[test]
    #[cfg(windows)]
    fn test_sanitize_filename_device_names_on_windows() {
        assert_eq!(sanitize_filename("con.pdf").unwrap(), "_con.pdf");
        assert_eq!(sanitize_filename("LPT1").unwrap(), "_LPT1");
    }

    #[test]
    #[cfg(not(windows))]
    fn test_sanitize_filename_device_names_kept_elsewhere() {
        assert_eq!(sanitize_filename("con.pdf").unwrap(), "con.pdf");
        assert_eq!(sanitize_filename("LPT1").unwrap(), "LPT1");
    }

    #[test]
    fn test_sanitize_filename_truncates_keeping_extension() {
        let long = format!("{}.pdf", "a".repeat(400));
        let sanitized = sanitize_filename(&long).unwrap();
        assert_eq!(sanitized.len(), MAX_FILENAME_LEN);
        assert!(sanitized.ends_with(".pdf"));
    }
}
