//! Post-processing of raw model output into the final letter text.

use std::sync::OnceLock;

use regex::Regex;

fn get_regex(re: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    re.get_or_init(|| Regex::new(pattern).expect("Invalid regex pattern defined in code"))
}

/// Strips code fences around the whole response, placeholder artifacts like
/// `[Phone - omit]` or `[Address not provided]`, runs of blank lines and
/// doubled commas. Interior backticks are left alone.
pub fn clean_response(text: &str) -> String {
    static LEADING_FENCE: OnceLock<Regex> = OnceLock::new();
    static TRAILING_FENCE: OnceLock<Regex> = OnceLock::new();
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    static BLANK_RUNS: OnceLock<Regex> = OnceLock::new();
    static DOUBLE_COMMA: OnceLock<Regex> = OnceLock::new();

    let text = text.trim();
    let text = get_regex(&LEADING_FENCE, r"(?i)\A```(?:markdown|md|html)?[ \t]*\r?\n?")
        .replace(text, "");
    let text = get_regex(&TRAILING_FENCE, r"\r?\n?```\s*\z").replace(&text, "");
    let text = get_regex(&PLACEHOLDER, r"(?i)\[[^\]]*?(?:omit|not provided)[^\]]*?\]")
        .replace_all(&text, "");
    let text = get_regex(&BLANK_RUNS, r"\n\s*\n\s*\n+").replace_all(&text, "\n\n");
    let text = get_regex(&DOUBLE_COMMA, r",\s*,").replace_all(&text, ",");

    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_markdown_fence() {
        assert_eq!(clean_response("```markdown\nText\n```"), "Text");
    }

    #[test]
    fn test_strips_bare_and_inline_fences() {
        assert_eq!(clean_response("```\nTest\n```"), "Test");
        assert_eq!(clean_response("```Test```"), "Test");
        assert_eq!(clean_response("```MD\nTest\n```"), "Test");
        assert_eq!(clean_response("```html\n<p>Hi</p>\n```"), "<p>Hi</p>");
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(clean_response("  Text  "), "Text");
    }

    #[test]
    fn test_interior_backticks_survive() {
        let text = "Dear team,\n\nI wrote `tokio` code and ```inline``` snippets.\n\nBest";
        assert_eq!(clean_response(text), text);
    }

    #[test]
    fn test_removes_placeholders_case_insensitively() {
        assert_eq!(
            clean_response("Jane Doe\n[Phone - OMIT]\n[LinkedIn not provided]\njane@x.dev"),
            "Jane Doe\n\njane@x.dev"
        );
    }

    #[test]
    fn test_collapses_blank_line_runs() {
        assert_eq!(clean_response("a\n\n\n\nb\n \n\t\nc"), "a\n\nb\n\nc");
    }

    #[test]
    fn test_collapses_doubled_commas() {
        assert_eq!(clean_response("Toronto, , ON"), "Toronto, ON");
    }
}
