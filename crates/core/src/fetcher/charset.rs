//! Body decoding by apparent encoding.
//!
//! Tracker pages are not reliably UTF-8. The encoding is taken from the
//! `Content-Type` charset, then from a `<meta>` declaration near the top of
//! the document, then UTF-8 if the bytes validate, and GB18030 otherwise. A
//! declared charset the bytes do not decode cleanly in is not trusted.

use encoding_rs::{Encoding, GB18030, UTF_8};
use once_cell::sync::Lazy;
use regex_lite::Regex;

/// How far into the document a `<meta charset>` declaration is looked for.
const META_SNIFF_LEN: usize = 1024;

static CHARSET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)charset\s*=\s*["']?([a-z0-9._:-]+)"#).expect("valid charset pattern")
});

fn charset_label(text: &str) -> Option<&'static Encoding> {
    CHARSET
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|label| Encoding::for_label(label.as_str().as_bytes()))
}

/// Encoding declared by the `Content-Type` header or a `<meta>` tag.
fn declared_encoding(bytes: &[u8], content_type: Option<&str>) -> Option<&'static Encoding> {
    if let Some(encoding) = content_type.and_then(charset_label) {
        return Some(encoding);
    }

    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(META_SNIFF_LEN)]);
    charset_label(&head)
}

/// Encoding guessed from the bytes alone.
fn sniff_encoding(bytes: &[u8]) -> &'static Encoding {
    if std::str::from_utf8(bytes).is_ok() {
        UTF_8
    } else {
        GB18030
    }
}

/// Pick the encoding a page body should be decoded with.
pub fn detect_encoding(bytes: &[u8], content_type: Option<&str>) -> &'static Encoding {
    declared_encoding(bytes, content_type).unwrap_or_else(|| sniff_encoding(bytes))
}

/// Decode a page body, returning the text and the encoding actually used
/// (a byte order mark wins over the detected encoding).
///
/// A declared charset that the bytes are not valid in is ignored in favour
/// of the sniffed one.
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> (String, &'static Encoding) {
    if let Some(declared) = declared_encoding(bytes, content_type) {
        let (text, used, had_errors) = declared.decode(bytes);
        if !had_errors {
            return (text.into_owned(), used);
        }
        tracing::debug!(
            declared = declared.name(),
            "Body is not valid in its declared charset, sniffing instead"
        );
    }

    let (text, used, _) = sniff_encoding(bytes).decode(bytes);
    (text.into_owned(), used)
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::GBK;

    #[test]
    fn test_header_charset_wins() {
        let (bytes, _, _) = GBK.encode("你好 alice");
        let encoding = detect_encoding(&bytes, Some("text/html; charset=GBK"));
        assert_eq!(encoding, GBK);
    }

    #[test]
    fn test_meta_charset() {
        let html = br#"<html><head><meta http-equiv="Content-Type" content="text/html; charset=gb2312"></head>"#;
        assert_eq!(detect_encoding(html, Some("text/html")), GBK);

        let html = br#"<html><head><meta charset="utf-8"></head>"#;
        assert_eq!(detect_encoding(html, None), UTF_8);
    }

    #[test]
    fn test_meta_beyond_sniff_window_is_ignored() {
        let mut html = vec![b' '; META_SNIFF_LEN + 10];
        html.extend_from_slice(br#"<meta charset="gbk">"#);
        assert_eq!(detect_encoding(&html, None), UTF_8);
    }

    #[test]
    fn test_unknown_label_falls_through() {
        let html = "plain ascii".as_bytes();
        assert_eq!(detect_encoding(html, Some("text/html; charset=klingon")), UTF_8);
    }

    #[test]
    fn test_invalid_utf8_falls_back_to_gb18030() {
        let (bytes, _, _) = GBK.encode("没有该ID的种子 alice");
        assert!(std::str::from_utf8(&bytes).is_err());

        let (text, used) = decode_body(&bytes, None);
        assert_eq!(used, GB18030);
        assert_eq!(text, "没有该ID的种子 alice");
    }

    #[test]
    fn test_wrong_header_charset_falls_back_to_sniff() {
        let (bytes, _, _) = GBK.encode("欢迎回来, 种子用户 没有该ID的种子");
        let (text, used) = decode_body(&bytes, Some("text/html; charset=utf-8"));
        assert_eq!(used, GB18030);
        assert!(text.contains("种子用户"));
    }

    #[test]
    fn test_wrong_meta_charset_falls_back_to_sniff() {
        let (body, _, _) = GBK.encode("<b>种子用户</b>");
        let mut html = br#"<html><head><meta charset="utf-8"></head><body>"#.to_vec();
        html.extend_from_slice(&body);

        let (text, used) = decode_body(&html, None);
        assert_eq!(used, GB18030);
        assert!(text.contains("<b>种子用户</b>"));
    }

    #[test]
    fn test_valid_declared_charset_is_kept() {
        let (bytes, _, _) = GBK.encode("你好 alice");
        let (text, used) = decode_body(&bytes, Some("text/html; charset=gbk"));
        assert_eq!(used, GBK);
        assert_eq!(text, "你好 alice");
    }

    #[test]
    fn test_decode_utf8_body() {
        let (text, used) = decode_body("你没有该权限！".as_bytes(), Some("text/html"));
        assert_eq!(used, UTF_8);
        assert_eq!(text, "你没有该权限！");
        assert_eq!(used.name(), "UTF-8");
    }
}
