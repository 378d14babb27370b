//! Utility functions and helpers

/// Escape text for interpolation into HTML markup (element content or a
/// quoted attribute value)
pub fn escape_html(content: &str) -> String {
    let mut escaped = String::with_capacity(content.len());
    for c in content.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Left-pad a number with zeros to two digits
pub fn pad2(n: u32) -> String {
    format!("{:02}", n)
}

/// True when the value carries something usable as an identifier
pub fn is_present(value: Option<&str>) -> bool {
    value.map(|v| !v.trim().is_empty()).unwrap_or(false)
}

// ==================== Tests ====================
