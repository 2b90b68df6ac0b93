//! Escaping of user text embedded in generated files.

/// Escape text for use inside a regular C# string literal.
///
/// Backslashes are replaced first so later substitutions are not escaped twice.
///
/// ```
/// use questforge_codegen::escape::escape_string;
///
/// assert_eq!(escape_string(Some("say \"hi\"\n")), "say \\\"hi\\\"\\n");
/// assert_eq!(escape_string(None), "");
/// ```
pub fn escape_string(text: Option<&str>) -> String {
    let Some(text) = text else {
        return String::new();
    };
    text.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\r', "\\r")
        .replace('\n', "\\n")
}

/// Shorthand for the common case of a present value.
pub fn lit(text: &str) -> String {
    escape_string(Some(text))
}

/// Escape text for XML element content and attribute values.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Flatten free text into a single-line `//` comment body.
pub fn comment_text(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backslash_is_escaped_before_quotes() {
        assert_eq!(lit(r#"a\"b"#), r#"a\\\"b"#);
    }

    #[test]
    fn line_breaks_become_two_char_escapes() {
        assert_eq!(lit("one\r\ntwo"), "one\\r\\ntwo");
    }

    #[test]
    fn null_input_is_empty() {
        assert_eq!(escape_string(None), "");
    }

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(lit("Deliver the package"), "Deliver the package");
    }

    #[test]
    fn xml_special_characters_are_escaped() {
        assert_eq!(escape_xml("Tom & Jerry's <Mod>"), "Tom &amp; Jerry&apos;s &lt;Mod&gt;");
    }

    #[test]
    fn comment_text_is_single_line() {
        assert_eq!(comment_text("a\nb\r\nc"), "a b  c");
    }
}
