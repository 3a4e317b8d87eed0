//! Shared formatting helpers reused across dialect implementations: quoting,
//! escaping, and boolean/bytes literal spelling. Each dialect picks the
//! helpers matching its syntax rather than reimplementing them.

/// Double-quote identifier style (PostgreSQL, DuckDB, SQLite), doubling any
/// embedded quote character.
pub fn quote_double(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('"');
    for c in name.chars() {
        if c == '"' {
            out.push('"');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Backtick identifier style (MySQL, BigQuery), doubling any embedded backtick.
pub fn quote_backtick(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('`');
    for c in name.chars() {
        if c == '`' {
            out.push('`');
        }
        out.push(c);
    }
    out.push('`');
    out
}

/// Single-quoted string literal, doubling embedded single quotes. This is the
/// ANSI-standard string-escaping rule shared by all five target dialects.
pub fn quote_string_single(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if c == '\'' {
            out.push('\'');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

/// `TRUE`/`FALSE` keyword spelling (PostgreSQL, DuckDB, BigQuery).
pub fn format_bool_keyword(b: bool) -> &'static str {
    if b {
        "TRUE"
    } else {
        "FALSE"
    }
}

/// `1`/`0` numeric spelling (MySQL, SQLite — neither has a native boolean type).
pub fn format_bool_numeric(b: bool) -> &'static str {
    if b {
        "1"
    } else {
        "0"
    }
}

/// Hex-encoded bytes literal: `x'48656c6c6f'` (PostgreSQL, DuckDB).
pub fn format_bytes_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2 + 3);
    out.push_str("x'");
    for b in bytes {
        out.push_str(&format!("{b:02x}"));
    }
    out.push('\'');
    out
}

/// `X'48656C6C6F'` bytes literal (MySQL, SQLite).
pub fn format_bytes_x_quote(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2 + 3);
    out.push_str("X'");
    for b in bytes {
        out.push_str(&format!("{b:02X}"));
    }
    out.push('\'');
    out
}

/// `b"..."` bytes literal (BigQuery); non-printable bytes are hex-escaped.
pub fn format_bytes_b_string(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() + 3);
    out.push_str("b\"");
    for &b in bytes {
        if b.is_ascii_graphic() || b == b' ' {
            if b == b'"' || b == b'\\' {
                out.push('\\');
            }
            out.push(b as char);
        } else {
            out.push_str(&format!("\\x{b:02x}"));
        }
    }
    out.push('"');
    out
}
