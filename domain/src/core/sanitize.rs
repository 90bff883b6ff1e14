//! Character filter for text interpolated into prompts, file names and
//! exported identifiers.

/// Punctuation kept by [`sanitize`] in addition to ASCII alphanumerics and whitespace.
const ALLOWED_PUNCTUATION: &[char] = &['.', ',', '!', '?', ':', ';', '\'', '"', '-'];

/// Returns `true` if `c` survives [`sanitize`].
pub fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || c.is_ascii_whitespace() || ALLOWED_PUNCTUATION.contains(&c)
}

/// Strip every character that is not ASCII alphanumeric, ASCII whitespace
/// or one of `. , ! ? : ; ' " -`.
///
/// Idempotent: `sanitize(&sanitize(s)) == sanitize(s)`.
pub fn sanitize(text: &str) -> String {
    text.chars().filter(|c| is_allowed(*c)).collect()
}

/// [`sanitize`] for optional input; `None` yields an empty string.
pub fn sanitize_opt(text: Option<&str>) -> String {
    text.map(sanitize).unwrap_or_default()
}

/// Lowercase `snake_case` identifier safe for file names.
///
/// Underscores and punctuation act as word separators.
pub fn file_stem(raw: &str) -> String {
    sanitize(&raw.replace('_', " "))
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_disallowed() {
        assert_eq!(sanitize("Code <Developer>!"), "Code Developer!");
        assert_eq!(sanitize("héllo wörld"), "hllo wrld");
        assert_eq!(sanitize("a/b\\c*d"), "abcd");
        assert_eq!(sanitize("emoji 🚀 rocket"), "emoji  rocket");
    }

    #[test]
    fn test_keeps_allowed_punctuation() {
        let text = "Hi, there! Ready? Yes: no; 'single' \"double\" - dash.";
        assert_eq!(sanitize(text), text);
    }

    #[test]
    fn test_empty_and_none() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize_opt(None), "");
        assert_eq!(sanitize_opt(Some("ok_go")), "okgo");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "plain",
            "Ünïcödé & <tags>",
            "tabs\tand\nnewlines",
            "{\"json\": [1, 2]}",
            "",
        ];
        for s in samples {
            let once = sanitize(s);
            assert_eq!(sanitize(&once), once);
            assert!(once.chars().all(is_allowed));
        }
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("Login API!"), "login_api");
        assert_eq!(file_stem("Fetch Web-Content"), "fetch_web_content");
        assert_eq!(file_stem("get_weather"), "get_weather");
        assert_eq!(file_stem("***"), "");
    }
}
