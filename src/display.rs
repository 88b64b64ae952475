/// Text formatting for rendered storage values
use serde_json::{Number, Value};

/// Markup substitutions, in the order `unescape_html` tries them
const ENTITIES: [(char, &str); 8] = [
    ('&', "&amp;"),
    ('<', "&lt;"),
    ('>', "&gt;"),
    ('"', "&quot;"),
    ('\'', "&#039;"),
    ('\n', "<br>"),
    (' ', "&nbsp;"),
    ('\t', "&#9;"),
];

/// Escape a literal string into markup that displays it verbatim
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match ENTITIES.iter().find(|(ch, _)| *ch == c) {
            Some((_, entity)) => out.push_str(entity),
            None => out.push(c),
        }
    }
    out
}

/// Reverse `escape_html`
///
/// Single pass, so an escaped literal like `&amp;nbsp;` comes back as `&nbsp;`
/// rather than a space.
pub fn unescape_html(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    let mut rest = markup;

    while let Some(c) = rest.chars().next() {
        match ENTITIES.iter().find(|(_, entity)| rest.starts_with(entity)) {
            Some((ch, entity)) => {
                out.push(*ch);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    out
}

/// Pretty-print a value as JSON with 2-space indentation, keeping key order
///
/// Returns `None` when the value isn't JSON.
pub fn format_json(value: &str) -> Option<String> {
    let mut parsed: Value = serde_json::from_str(value).ok()?;
    integralize_numbers(&mut parsed);
    serde_json::to_string_pretty(&parsed).ok()
}

/// Write whole floats as integers (`1.0` -> `1`, `1e2` -> `100`, `-0` -> `0`),
/// the way a browser prints them
fn integralize_numbers(value: &mut Value) {
    match value {
        Value::Number(n) if n.is_f64() => {
            if let Some(whole) = n.as_f64().and_then(whole_number) {
                *n = whole;
            }
        }
        Value::Array(items) => items.iter_mut().for_each(integralize_numbers),
        Value::Object(fields) => fields.values_mut().for_each(integralize_numbers),
        _ => {}
    }
}

fn whole_number(f: f64) -> Option<Number> {
    if f.fract() != 0.0 || f.abs() >= 1e21 {
        return None;
    }
    if f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(Number::from(f as i64))
    } else if f >= 0.0 && f < u64::MAX as f64 {
        Some(Number::from(f as u64))
    } else {
        None
    }
}

/// Markup for a value, pretty-printed when `as_json` is set and the value parses
pub fn rendered_value(value: &str, as_json: bool) -> String {
    if as_json {
        if let Some(pretty) = format_json(value) {
            return escape_html(&pretty);
        }
    }
    escape_html(value)
}

/// Human readable byte count: "0 Bytes", "500 Bytes", "1.5 KB"
pub fn format_bytes(bytes: usize) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let fixed = format!("{:.2}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<b>\"hi\" & 'bye'</b>"),
            "&lt;b&gt;&quot;hi&quot;&nbsp;&amp;&nbsp;&#039;bye&#039;&lt;/b&gt;"
        );
        assert_eq!(escape_html("a\nb\tc"), "a<br>b&#9;c");
        assert_eq!(escape_html(""), "");
    }

    #[test]
    fn test_unescape_html() {
        assert_eq!(unescape_html("&lt;script&gt;"), "<script>");
        assert_eq!(unescape_html("a<br>b&nbsp;c"), "a\nb c");
        assert_eq!(unescape_html("plain"), "plain");
        assert_eq!(unescape_html("&unknown;"), "&unknown;");
    }

    #[test]
    fn test_escape_round_trip() {
        let samples = [
            "",
            "hello",
            "two words",
            "<img src=x onerror=alert(1)>",
            "&nbsp; is not a space",
            "&amp;lt;",
            "line1\nline2\r\n\tindented",
            "quotes \" and ' mixed",
            "unicode: héllo 世界 🎉",
            "{\"x\": [1, 2, {\"y\": \"<z>\"}]}",
            "<br> literal",
        ];

        for sample in samples {
            assert_eq!(unescape_html(&escape_html(sample)), sample, "sample: {:?}", sample);
        }
    }

    #[test]
    fn test_format_json_object() {
        assert_eq!(format_json("{\"x\":2}"), Some("{\n  \"x\": 2\n}".to_string()));
    }

    #[test]
    fn test_format_json_keeps_key_order() {
        assert_eq!(
            format_json("{\"b\":1,\"a\":[true,null]}"),
            Some("{\n  \"b\": 1,\n  \"a\": [\n    true,\n    null\n  ]\n}".to_string())
        );
    }

    #[test]
    fn test_format_json_scalars() {
        assert_eq!(format_json("1"), Some("1".to_string()));
        assert_eq!(format_json("\"s\""), Some("\"s\"".to_string()));
    }

    #[test]
    fn test_format_json_prints_whole_floats_as_integers() {
        assert_eq!(format_json("{\"x\":1.0}"), Some("{\n  \"x\": 1\n}".to_string()));
        assert_eq!(format_json("[1e2, -0, 2.5]"), Some("[\n  100,\n  0,\n  2.5\n]".to_string()));
        assert_eq!(format_json("{\"a\":{\"b\":[-3.0]}}"), Some("{\n  \"a\": {\n    \"b\": [\n      -3\n    ]\n  }\n}".to_string()));
        assert_eq!(format_json("-0.0"), Some("0".to_string()));
    }

    #[test]
    fn test_format_json_rejects_non_json() {
        assert_eq!(format_json("hello"), None);
        assert_eq!(format_json("{broken"), None);
        assert_eq!(format_json(""), None);
    }

    #[test]
    fn test_rendered_value_falls_back_to_raw() {
        assert_eq!(rendered_value("not json", true), "not&nbsp;json");
        assert_eq!(rendered_value("1", true), "1");
    }

    #[test]
    fn test_rendered_value_pretty_prints() {
        assert_eq!(
            unescape_html(&rendered_value("{\"x\":2}", true)),
            "{\n  \"x\": 2\n}"
        );
        assert_eq!(rendered_value("{\"x\":2}", false), escape_html("{\"x\":2}"));
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 Bytes");
        assert_eq!(format_bytes(500), "500 Bytes");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1_048_576), "1 MB");
        assert_eq!(format_bytes(1_288_490_189), "1.2 GB");
    }
}
