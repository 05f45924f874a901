//! Struct tag lookup, following the conventional `key:"value" key2:"value2"` format.

/// Looks up `key` in the tag content, returning its unquoted value.
///
/// Parsing stops at the first malformed pair, the same way Go's `reflect.StructTag` does.
pub(super) fn lookup(tag: &str, key: &str) -> Option<String> {
    let mut rest = tag;
    loop {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            return None;
        }

        // Keys are any run of non-control, non-space characters other than quote and colon.
        let key_len = rest
            .find(|c: char| c <= ' ' || c == ':' || c == '"' || c == '\x7f')
            .unwrap_or(rest.len());
        if key_len == 0 || !rest[key_len..].starts_with(":\"") {
            return None;
        }
        let name = &rest[..key_len];
        rest = &rest[key_len + 1..];

        let (quoted, tail) = split_quoted(rest)?;
        rest = tail;
        if name == key {
            return unquote(quoted);
        }
    }
}

/// Splits a leading `"..."` (escapes allowed) off `input`.
fn split_quoted(input: &str) -> Option<(&str, &str)> {
    let mut escaped = false;
    for (i, c) in input.char_indices().skip(1) {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '"' => return Some((&input[..=i], &input[i + 1..])),
            _ => (),
        }
    }

    None
}

fn unquote(quoted: &str) -> Option<String> {
    let inner = quoted.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            other => out.push(other),
        }
    }

    Some(out)
}
