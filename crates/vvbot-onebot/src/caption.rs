//! Image captions derived from picture URLs.
//!
//! The caption is the last element of the URL's percent-decoded path.
//! Relative references such as `//cdn/a.png`, `/a.png` and `a.png` are
//! accepted. The query and fragment never contribute. An opaque URL like
//! `mailto:a@b` has no path, so its caption is `.`.
//!
//! ```text
//! https://img.example/quotes/%E7%8C%AB.png?s=1  →  猫.png
//! https://img.example                           →  .
//! https://img.example/                          →  /
//! https://img.example/%zz.png                   →  DEFAULT_IMAGE_SUMMARY
//! ```

/// Caption used when an image URL is malformed.
pub const DEFAULT_IMAGE_SUMMARY: &str = "我们的网民有很多创意";

/// Derives an image caption from the last path element of `url`.
///
/// Falls back to [`DEFAULT_IMAGE_SUMMARY`] when `url` is malformed.
pub fn image_summary(url: &str) -> String {
    match url_path(url) {
        Some(path) => path_base(&path).to_string(),
        None => DEFAULT_IMAGE_SUMMARY.to_string(),
    }
}

/// Splits a URL reference and returns its percent-decoded path.
fn url_path(raw: &str) -> Option<String> {
    if raw.bytes().any(|b| b < 0x20 || b == 0x7f) {
        return None;
    }

    let (rest, fragment) = raw.split_once('#').unwrap_or((raw, ""));
    unescape(fragment, false)?;

    let (scheme, rest) = split_scheme(rest)?;
    let rest = rest.split_once('?').map_or(rest, |(r, _)| r);

    if !rest.starts_with('/') {
        if scheme.is_some() {
            return Some(String::new());
        }
        let first = rest.split('/').next().unwrap_or_default();
        if first.contains(':') {
            return None;
        }
    }

    let path = if rest.starts_with("//") && (scheme.is_some() || !rest.starts_with("///")) {
        let after = &rest[2..];
        let (authority, path) = match after.find('/') {
            Some(i) => after.split_at(i),
            None => (after, ""),
        };
        check_authority(authority)?;
        path
    } else {
        rest
    };

    let decoded = unescape(path, false)?;
    Some(String::from_utf8_lossy(&decoded).into_owned())
}

/// Separates a leading `scheme:` from the rest.
///
/// A string that merely starts with `:` is rejected. One whose prefix
/// contains a character not allowed in a scheme has no scheme at all.
fn split_scheme(s: &str) -> Option<(Option<&str>, &str)> {
    for (i, b) in s.bytes().enumerate() {
        match b {
            b'a'..=b'z' | b'A'..=b'Z' => {}
            b'0'..=b'9' | b'+' | b'-' | b'.' if i > 0 => {}
            b':' if i == 0 => return None,
            b':' => return Some((Some(&s[..i]), &s[i + 1..])),
            _ => return Some((None, s)),
        }
    }
    Some((None, s))
}

fn check_authority(authority: &str) -> Option<()> {
    let host = match authority.rfind('@') {
        Some(i) => {
            let userinfo = &authority[..i];
            if !userinfo.bytes().all(is_userinfo_byte) {
                return None;
            }
            unescape(userinfo, false)?;
            &authority[i + 1..]
        }
        None => authority,
    };
    check_host(host)
}

fn check_host(host: &str) -> Option<()> {
    let port = if host.starts_with('[') {
        let close = host.rfind(']')?;
        &host[close + 1..]
    } else {
        host.rfind(':').map_or("", |i| &host[i..])
    };
    if !is_optional_port(port) {
        return None;
    }
    if host
        .bytes()
        .any(|b| b != b'%' && b.is_ascii() && !is_host_byte(b))
    {
        return None;
    }
    unescape(host, true).map(|_| ())
}

/// Accepts `""` or `:` followed only by digits.
fn is_optional_port(port: &str) -> bool {
    match port.strip_prefix(':') {
        Some(digits) => digits.bytes().all(|b| b.is_ascii_digit()),
        None => port.is_empty(),
    }
}

fn is_host_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!$&'()*+,;=:[]<>\"-_.~".contains(&b)
}

fn is_userinfo_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"-._:~!$&'()*+,;=%@".contains(&b)
}

/// Percent-decodes `s`, rejecting malformed escapes.
///
/// Inside a host only escapes of non-ASCII bytes and `%25` are allowed.
fn unescape(s: &str, host: bool) -> Option<Vec<u8>> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape = bytes.get(i + 1..i + 3)?;
            if !escape.iter().all(u8::is_ascii_hexdigit) {
                return None;
            }
            if host && escape[0] < b'8' && escape != b"25" {
                return None;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Some(urlencoding::decode_binary(bytes).into_owned())
}

/// Returns the last element of a slash-separated path.
///
/// Trailing slashes are ignored; an all-slash path yields `/` and an empty
/// path yields `.`.
fn path_base(path: &str) -> &str {
    if path.is_empty() {
        return ".";
    }
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/";
    }
    match trimmed.rfind('/') {
        Some(i) => &trimmed[i + 1..],
        None => trimmed,
    }
}
