//! Line and field splitting for uploaded CSV text
//!
//! Quoting is handled per line: a quoted field cannot span lines. Unbalanced
//! quotes never fail; whatever was accumulated is emitted as the last field.

/// One non-blank line of the file with its 1-based line number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    pub number: usize,
    pub text: &'a str,
}

/// Split file text into non-blank lines
///
/// Strips a leading byte-order mark and the `\r` of CRLF line endings.
pub fn split_lines(text: &str) -> Vec<SourceLine<'_>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    text.split('\n')
        .enumerate()
        .map(|(i, line)| SourceLine {
            number: i + 1,
            text: line.strip_suffix('\r').unwrap_or(line),
        })
        .filter(|line| !line.text.trim().is_empty())
        .collect()
}

/// Split one line into fields
///
/// `""` inside a quoted field is a literal quote. A comma outside quotes ends
/// the current field. The final field is always emitted, so `a,` yields two
/// fields.
pub fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_fields() {
        assert_eq!(split_fields("a,b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_quoted_comma() {
        assert_eq!(split_fields(r#"a,"b,c",d"#), vec!["a", "b,c", "d"]);
    }

    #[test]
    fn test_escaped_quote() {
        assert_eq!(split_fields(r#"a,"b""c",d"#), vec!["a", "b\"c", "d"]);
    }

    #[test]
    fn test_trailing_comma_emits_empty_field() {
        assert_eq!(split_fields("a,b,"), vec!["a", "b", ""]);
    }

    #[test]
    fn test_empty_line_is_one_empty_field() {
        assert_eq!(split_fields(""), vec![""]);
    }

    #[test]
    fn test_unbalanced_quote_keeps_remainder() {
        assert_eq!(split_fields(r#"a,"b,c"#), vec!["a", "b,c"]);
    }

    #[test]
    fn test_quotes_mid_field_toggle() {
        // Quotes need not start the field; they only toggle comma handling
        assert_eq!(split_fields(r#"ab"c,d"e,f"#), vec!["abc,de", "f"]);
    }

    #[test]
    fn test_whitespace_is_preserved() {
        assert_eq!(split_fields(" a , b "), vec![" a ", " b "]);
    }

    #[test]
    fn test_split_lines_skips_blank_and_strips_cr() {
        let lines = split_lines("h1,h2\r\n\r\n1,2\r\n   \n3,4");
        assert_eq!(
            lines,
            vec![
                SourceLine { number: 1, text: "h1,h2" },
                SourceLine { number: 3, text: "1,2" },
                SourceLine { number: 5, text: "3,4" },
            ]
        );
    }

    #[test]
    fn test_split_lines_strips_bom() {
        let lines = split_lines("\u{feff}parcel_id\nA1\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "parcel_id");
    }
}
