//! String template rendering.
//!
//! Templates are plain HTML files with `{{name}}` placeholders. Rendering is a
//! single left-to-right pass: each placeholder whose name is in the
//! substitution map is replaced by its value, and substituted text is never
//! scanned again. A value that itself contains `{{url}}` therefore comes out
//! literally. Placeholders with no substitution are left as they are.
//!
//! The renderer does no escaping of its own. Callers escape each value for
//! the context it lands in:
//!
//! | Context | Function |
//! |---------|----------|
//! | HTML text or attribute | [`escape_html`] |
//! | JSON inlined into an HTML document | [`escape_json_for_html`] |

use std::collections::BTreeMap;

/// Placeholder name to already-escaped value.
pub type Substitutions<'a> = BTreeMap<&'a str, String>;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Replace every `{{key}}` in `template` whose key is in `substitutions`.
pub fn render(template: &str, substitutions: &Substitutions<'_>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + OPEN.len()..];
        let value = after_open
            .find(CLOSE)
            .and_then(|end| substitutions.get(&after_open[..end]).map(|v| (end, v)));
        match value {
            Some((end, value)) => {
                out.push_str(value);
                rest = &after_open[end + CLOSE.len()..];
            }
            None => {
                // Not a known placeholder: keep the braces and resume right
                // after them, so `{{{{url}}` still finds the inner token.
                out.push_str(OPEN);
                rest = after_open;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Escape text for an HTML text node or a quoted attribute value.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Make serialized JSON safe to place inside an HTML `<script>` element.
///
/// `<\/` is an equivalent JSON escape of `</`, so the document still parses
/// to the same value.
pub fn escape_json_for_html(json: &str) -> String {
    json.replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subs<'a>(pairs: &[(&'a str, &str)]) -> Substitutions<'a> {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn replaces_every_occurrence() {
        let out = render("{{a}}-{{b}}-{{a}}", &subs(&[("a", "1"), ("b", "2")]));
        assert_eq!(out, "1-2-1");
    }

    #[test]
    fn unknown_placeholders_pass_through() {
        let out = render("<p>{{title}} {{missing}}</p>", &subs(&[("title", "Hi")]));
        assert_eq!(out, "<p>Hi {{missing}}</p>");
    }

    #[test]
    fn unterminated_placeholder_passes_through() {
        let out = render("before {{url and after", &subs(&[("url", "x")]));
        assert_eq!(out, "before {{url and after");
    }

    #[test]
    fn substituted_values_are_not_rescanned() {
        let out = render(
            "{{title}}|{{url}}",
            &subs(&[("title", "{{url}}"), ("url", "https://example.com")]),
        );
        assert_eq!(out, "{{url}}|https://example.com");
    }

    #[test]
    fn nested_braces_still_find_token() {
        let out = render("{{{{url}}}}", &subs(&[("url", "x")]));
        assert_eq!(out, "{{x}}");
    }

    #[test]
    fn spaced_placeholder_is_not_a_token() {
        let out = render("{{ url }}", &subs(&[("url", "x")]));
        assert_eq!(out, "{{ url }}");
    }

    #[test]
    fn template_without_placeholders_is_unchanged() {
        let template = "<!doctype html><p>static</p>";
        assert_eq!(render(template, &Substitutions::new()), template);
    }

    #[test]
    fn rendering_is_deterministic() {
        let s = subs(&[("a", "1"), ("b", "2"), ("c", "3")]);
        let template = "{{c}}{{b}}{{a}}{{c}}";
        assert_eq!(render(template, &s), render(template, &s));
    }

    #[test]
    fn escapes_ampersand_in_attribute_and_text() {
        let s = subs(&[
            ("url", escape_html("http://a/?x=1&y=2").as_str()),
            ("title", escape_html("A&B").as_str()),
        ]);
        let out = render("<a href=\"{{url}}\">{{title}}</a>", &s);
        assert_eq!(out, "<a href=\"http://a/?x=1&amp;y=2\">A&amp;B</a>");
        assert!(!out.replace("&amp;", "").contains('&'));
    }

    #[test]
    fn escape_html_covers_all_special_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;/a&gt;"
        );
    }

    #[test]
    fn escape_html_leaves_plain_text() {
        assert_eq!(escape_html("Café: ünïcode"), "Café: ünïcode");
    }

    #[test]
    fn escape_json_for_html_breaks_closing_tags() {
        let json = r#"{"x":{"url":"https://e.test/</script><script>alert(1)</script>"}}"#;
        let escaped = escape_json_for_html(json);
        assert!(!escaped.contains("</script"));
        assert!(escaped.contains("<\\/script"));
    }

    #[test]
    fn escape_json_for_html_keeps_json_value() {
        let json = serde_json::to_string(&serde_json::json!({"u": "a</b"})).unwrap();
        let escaped = escape_json_for_html(&json);
        let back: serde_json::Value = serde_json::from_str(&escaped).unwrap();
        assert_eq!(back["u"], "a</b");
    }
}
