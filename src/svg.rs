/// Format a number with k suffix for thousands
pub fn format_number(n: u64) -> String {
    if n >= 1000 {
        format!("{:.1}k", n as f64 / 1000.0)
    } else {
        n.to_string()
    }
}

/// Escape text for use inside SVG elements and double-quoted attribute values
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_thousands() {
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1.0k");
        assert_eq!(format_number(15_340), "15.3k");
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape("C++ & <Rust>"), "C++ &amp; &lt;Rust&gt;");
        assert_eq!(escape(r#"Bob's "repo""#), "Bob's &quot;repo&quot;");
    }
}
