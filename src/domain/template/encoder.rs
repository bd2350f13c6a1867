// Percent-encoding tables for expanded values

/// RFC 3986 `reserved` characters (`gen-delims` and `sub-delims`)
const RESERVED: &str = ":/?#[]@!$&'()*+,;=";

fn is_unreserved(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '-' | '.' | '_' | '~')
}

fn is_reserved(ch: char) -> bool {
    RESERVED.contains(ch)
}

/// True when `value[index..]` starts with a `%XX` triplet
fn is_pct_triplet(value: &str, index: usize) -> bool {
    let bytes = value.as_bytes();
    bytes.len() >= index + 3
        && bytes[index] == b'%'
        && bytes[index + 1].is_ascii_hexdigit()
        && bytes[index + 2].is_ascii_hexdigit()
}

/// Percent-encode a value for substitution into a URI.
///
/// Unreserved characters are always kept. With `allow_reserved` the RFC 3986
/// reserved set is kept as well. Existing `%XX` triplets are copied through,
/// so encoding an already-encoded value is stable.
pub fn encode(value: &str, allow_reserved: bool) -> String {
    let mut out = String::with_capacity(value.len());
    let mut buf = [0u8; 4];

    for (index, ch) in value.char_indices() {
        let keep = is_unreserved(ch)
            || (allow_reserved && is_reserved(ch))
            || (ch == '%' && is_pct_triplet(value, index));

        if keep {
            out.push(ch);
        } else {
            out.push_str(&urlencoding::encode(ch.encode_utf8(&mut buf)));
        }
    }

    out
}

/// First `length` Unicode scalar values of `value`
pub fn truncate(value: &str, length: usize) -> &str {
    match value.char_indices().nth(length) {
        Some((index, _)) => &value[..index],
        None => value,
    }
}
