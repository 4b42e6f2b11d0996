//! Lexical path cleaning.

/// Returns the canonical form of a URL path.
///
/// - a leading `/` is ensured
/// - duplicate `/` are collapsed
/// - `.` segments are removed and `..` segments remove their parent
/// - a trailing `/` (or trailing `.` segment) is kept as a trailing `/`
///
/// ```rust
/// use hermes_eigenkey::clean_path;
///
/// assert_eq!(clean_path("ws//xxxsdk/./login/"), "/ws/xxxsdk/login/");
/// assert_eq!(clean_path("/ws/xxxsdk/../login"), "/ws/login");
/// ```
#[must_use]
pub fn clean_path(path: &str) -> String {
    if path.is_empty() {
        return "/".to_string();
    }
    let trailing = path.len() > 1 && (path.ends_with('/') || path.ends_with("/."));

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            segment => segments.push(segment),
        }
    }

    if segments.is_empty() {
        return "/".to_string();
    }
    let mut cleaned = String::with_capacity(path.len() + 1);
    for segment in segments {
        cleaned.push('/');
        cleaned.push_str(segment);
    }
    if trailing {
        cleaned.push('/');
    }
    cleaned
}
