//! Job description cleaner: turns scraped job-posting HTML into plain prompt text.
//!
//! Pipeline:
//! 1. allow-list tags and attributes (script/style content and comments dropped)
//! 2. strip any surviving script/style blocks
//! 3. strip `{...}` inline-CSS fragments
//! 4. `<div>` → `<p>`, `<b>` → `<strong>`
//! 5. strip every attribute
//! 6. extract text (block tags become line breaks, entities decoded)
//! 7. normalize whitespace
//!
//! Step 1 runs on a parsed DOM; the later steps are regex passes over its
//! re-serialized, escaped output. Malformed markup degrades to best-effort text
//! instead of failing. The output never contains `<` or `>` and re-cleaning
//! it is a no-op.

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use scraper::{ElementRef, Html, Node};

const ALLOWED_TAGS: &[&str] = &[
    "a", "body", "h1", "h2", "h3", "h4", "h5", "h6", "p", "strong", "i", "ul", "li", "ol",
    "table", "tbody", "tr", "td", "th", "hr",
];

const ALLOWED_ATTRIBUTES: &[&str] = &[
    "href", "src", "alt", "width", "height", "colspan", "rowspan", "title",
];

/// Disallowed tags that still separate lines of text when stripped.
const LINE_BREAKING_TAGS: &[&str] = &[
    "div", "br", "section", "article", "header", "footer", "nav", "main", "aside",
    "blockquote", "pre", "dl", "dt", "dd", "figure", "figcaption", "thead", "tfoot", "caption",
];

fn get_regex(re: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    re.get_or_init(|| Regex::new(pattern).expect("Invalid regex pattern defined in code"))
}

fn script_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    get_regex(&RE, r"(?is)<\s*script\b[^>]*>.*?(?:</\s*script\s*>|\z)")
}

fn style_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    get_regex(&RE, r"(?is)<\s*style\b[^>]*>.*?(?:</\s*style\s*>|\z)")
}

fn brace_fragment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    get_regex(&RE, r"\{[\s\S]*?\}")
}

fn div_open_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    get_regex(&RE, r"(?i)<div[^>]*>")
}

fn div_close_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    get_regex(&RE, r"(?i)</div>")
}

fn tag_attributes_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    get_regex(&RE, r"<(\w+)[^>]*>")
}

fn bare_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    get_regex(&RE, r"<(/?)([a-zA-Z0-9]+)>")
}

fn any_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    get_regex(&RE, r"<[^>]*>")
}

/// Sanitizes job-posting HTML and returns normalized plain text.
pub fn sanitize_and_extract_text(raw_html: &str) -> String {
    let clean = sanitize_html(raw_html);
    let text = html_to_text(&clean);
    normalize_whitespace(&text)
}

/// Steps 1–5: reduces arbitrary HTML to attribute-free allow-listed tags.
pub fn sanitize_html(html: &str) -> String {
    let clean = allow_list(html);
    let clean = script_block_re().replace_all(&clean, "");
    let clean = style_block_re().replace_all(&clean, "");
    let clean = brace_fragment_re().replace_all(&clean, "");
    let clean = div_open_re().replace_all(&clean, "<p>");
    let clean = div_close_re().replace_all(&clean, "</p>");
    let clean = clean.replace("<b>", "<strong>").replace("</b>", "</strong>");
    tag_attributes_re()
        .replace_all(&clean, "<${1}>")
        .into_owned()
}

/// Step 1. Parses the input with html5ever and re-serializes it, so quoting
/// inside attribute values can never end a tag early. Text and kept attribute
/// values come out entity-escaped.
fn allow_list(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut out = String::with_capacity(html.len());
    write_allowed(fragment.root_element(), &mut out);
    out
}

fn write_allowed(parent: ElementRef<'_>, out: &mut String) {
    for child in parent.children() {
        if let Node::Text(text) = child.value() {
            out.push_str(&html_escape::encode_text(&**text));
            continue;
        }
        let Some(element) = ElementRef::wrap(child) else {
            // comments, doctypes, processing instructions
            continue;
        };

        let name = element.value().name();
        match name {
            "script" | "style" | "template" => {}
            "hr" => out.push_str("<hr>"),
            "br" => out.push('\n'),
            _ if ALLOWED_TAGS.contains(&name) => {
                out.push('<');
                out.push_str(name);
                for attribute in ALLOWED_ATTRIBUTES {
                    if let Some(value) = element.value().attr(attribute) {
                        out.push_str(&format!(
                            " {attribute}=\"{}\"",
                            html_escape::encode_double_quoted_attribute(value)
                        ));
                    }
                }
                out.push('>');
                write_allowed(element, out);
                out.push_str(&format!("</{name}>"));
            }
            _ if LINE_BREAKING_TAGS.contains(&name) => {
                out.push('\n');
                write_allowed(element, out);
                out.push('\n');
            }
            _ => write_allowed(element, out),
        }
    }
}

/// Step 6. Expects the output of [`sanitize_html`]; any other markup is dropped.
fn html_to_text(html: &str) -> String {
    let text = bare_tag_re().replace_all(html, |caps: &Captures| {
        let closing = !caps[1].is_empty();
        match (caps[2].to_ascii_lowercase().as_str(), closing) {
            ("p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "ul" | "ol" | "table" | "body", true) => {
                "\n\n"
            }
            ("hr", _) => "\n\n",
            ("p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "ul" | "ol" | "table" | "tbody"
            | "body" | "li" | "tr", false) => "\n",
            ("td" | "th", _) => " ",
            _ => "",
        }
    });
    let text = any_tag_re().replace_all(&text, "");
    decode_to_plain_text(&text)
}

/// Decodes entities until nothing changes, so escaped markup like
/// `&amp;lt;` cannot resurface on a second pass.
fn decode_to_plain_text(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let decoded = html_escape::decode_html_entities(&current);
        let without_braces = brace_fragment_re().replace_all(&decoded, "");
        let next = without_braces.replace(|c| c == '<' || c == '>', "");
        if next == current {
            return next;
        }
        current = next;
    }
}

/// Step 7: single spaces within lines, trimmed lines, at most one blank line
/// between blocks, no leading or trailing blank lines.
pub fn normalize_whitespace(text: &str) -> String {
    let mut lines: Vec<Cow<'_, str>> = Vec::new();
    let mut previous_blank = true;

    for line in text.lines() {
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            if !previous_blank {
                lines.push(Cow::Borrowed(""));
            }
            previous_blank = true;
        } else {
            lines.push(Cow::Owned(collapsed));
            previous_blank = false;
        }
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINKEDIN_LIKE: &str = r#"
        <html><head><style>.job { color: red; }</style></head>
        <body>
          <div class="show-more-less-html__markup" style="display:block">
            <h2 class="title">About the job</h2>
            <div>We are hiring a <b>Senior Rust Engineer</b> to build &amp; scale our platform.</div>
            <br><br><br>
            <ul>
              <li>5+ years of <span>systems</span> programming</li>
              <li>Experience with <a href="https://tokio.rs" onclick="track()">tokio</a></li>
            </ul>
            <script>window.analytics = { id: 42 };</script>
            <table><tr><td>Location</td><td>Remote</td></tr></table>
          </div>
        </body></html>
    "#;

    const MESSY_INPUTS: &[&str] = &[
        "",
        "plain text only",
        "<p>unclosed <b>bold <div",
        "<<<>>>",
        "a < b and c > d",
        "<p>one</p>\n\n\n\n<p>two</p>",
        "<!-- hidden --><p>shown</p><!-- never closed",
        "<scr<script>ipt>alert(1)</script>",
        r#"<p title="a > b">attr</p><div data-x='1>0'>quoted</div>"#,
        "&amp;lt;p&amp;gt;escaped twice&amp;lt;/p&amp;gt;",
        "<p>&#123;not css&#125; but text</p>",
        "<STYLE>p{x:y}</STYLE><P CLASS='x'>Upper</P>",
        "<td>cell</td><th>head</th>\r\n\r\n\r\n<hr/>tail",
        "\u{a0}\u{a0}nbsp\u{a0}padded\u{a0}",
        LINKEDIN_LIKE,
    ];

    #[test]
    fn test_linkedin_like_markup_becomes_clean_text() {
        let text = sanitize_and_extract_text(LINKEDIN_LIKE);
        assert!(text.starts_with("About the job"));
        assert!(text.contains("We are hiring a Senior Rust Engineer to build & scale our platform."));
        assert!(text.contains("5+ years of systems programming\nExperience with tokio"));
        assert!(text.contains("Location Remote"));
        assert!(!text.contains("analytics"));
        assert!(!text.contains("color"));
    }

    #[test]
    fn test_script_and_style_content_is_dropped() {
        let text = sanitize_and_extract_text(
            "<p>Keep</p><script>var x = 1;</script><style>p { margin: 0 }</style><p>Me</p>",
        );
        assert_eq!(text, "Keep\n\nMe");
    }

    #[test]
    fn test_inline_css_fragments_are_dropped() {
        let text = sanitize_and_extract_text("<p>Before .cls{color:red;} After</p>");
        assert_eq!(text, "Before .cls After");
    }

    #[test]
    fn test_divs_become_paragraphs() {
        assert_eq!(
            sanitize_and_extract_text("<div>One</div><div>Two</div>"),
            "One\n\nTwo"
        );
    }

    #[test]
    fn test_headings_and_paragraphs_are_separated_by_one_blank_line() {
        assert_eq!(
            sanitize_and_extract_text("<h1>Title</h1><p>Body</p>"),
            "Title\n\nBody"
        );
    }

    #[test]
    fn test_list_items_are_separate_lines() {
        assert_eq!(
            sanitize_and_extract_text("<ul><li>Rust</li><li>Go</li></ul>"),
            "Rust\nGo"
        );
    }

    #[test]
    fn test_entities_are_decoded() {
        assert_eq!(
            sanitize_and_extract_text("<p>R&amp;D &ndash; caf&eacute;</p>"),
            "R&D – café"
        );
    }

    #[test]
    fn test_malformed_markup_degrades_gracefully() {
        assert_eq!(
            sanitize_and_extract_text("<p>unclosed <b>bold <div"),
            "unclosed bold"
        );
    }

    #[test]
    fn test_allow_list_keeps_only_allowed_attributes() {
        let html = allow_list(r#"<a href="https://x.dev" onclick="evil()" title='t'>x</a>"#);
        assert_eq!(html, r#"<a href="https://x.dev" title="t">x</a>"#);
    }

    #[test]
    fn test_allow_list_escapes_kept_attribute_values() {
        let html = allow_list(r#"<a title="x > y" href="https://a.dev?q=1&r=2">Link</a>"#);
        assert_eq!(
            html,
            r#"<a href="https://a.dev?q=1&amp;r=2" title="x &gt; y">Link</a>"#
        );
    }

    #[test]
    fn test_angle_brackets_inside_attributes_do_not_leak_into_text() {
        assert_eq!(
            sanitize_and_extract_text(
                r#"<p><a title="x > y" href="https://a.dev">Link</a> text</p>"#
            ),
            "Link text"
        );
        assert_eq!(
            sanitize_and_extract_text(r#"<div data-x="a>b" class="c">Hello</div>"#),
            "Hello"
        );
        assert_eq!(
            sanitize_and_extract_text(r#"<button onclick="if(a>b){go()}">Apply</button>"#),
            "Apply"
        );
    }

    #[test]
    fn test_allow_list_strips_disallowed_tags_but_keeps_text() {
        assert_eq!(allow_list("<span>kept</span><em>too</em>"), "kepttoo");
    }

    #[test]
    fn test_sanitize_html_strips_all_attributes() {
        assert_eq!(
            sanitize_html(r#"<p class="a"><a href="https://x.dev">x</a></p>"#),
            "<p><a>x</a></p>"
        );
    }

    #[test]
    fn test_output_never_contains_angle_brackets_or_double_blank_lines() {
        for input in MESSY_INPUTS {
            let out = sanitize_and_extract_text(input);
            assert!(!out.contains('<'), "{input:?} -> {out:?}");
            assert!(!out.contains('>'), "{input:?} -> {out:?}");
            assert!(!out.contains("\n\n\n"), "{input:?} -> {out:?}");
            assert_eq!(out, out.trim(), "{input:?} -> {out:?}");
        }
    }

    #[test]
    fn test_cleaning_is_idempotent() {
        for input in MESSY_INPUTS {
            let once = sanitize_and_extract_text(input);
            let twice = sanitize_and_extract_text(&once);
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_normalize_whitespace_collapses_runs() {
        assert_eq!(
            normalize_whitespace("  a \t b  \n\n\n\n   c  \n \n"),
            "a b\n\nc"
        );
    }

    #[test]
    fn test_normalize_whitespace_handles_crlf() {
        assert_eq!(normalize_whitespace("a\r\n\r\n\r\nb"), "a\n\nb");
    }
}
