//! Shared helpers for SSDP header parsing, description field extraction and
//! SOAP payload handling.

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use reqwest::Url;

// ─────────────────────────────────────────────────────────────────────────────
// ASCII Case-Insensitive Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Checks if `s` starts with `prefix` (ASCII case-insensitive, no allocation).
#[inline]
pub(crate) fn starts_with_ignore_ascii_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len() && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// Extracts a header value from an HTTP-style message (SSDP response).
///
/// The header name is matched case-insensitively at the start of a line and
/// must be followed directly by a colon. The value is the remainder of the
/// line after the first colon, trimmed, so colons inside URLs survive.
pub fn extract_header<'a>(message: &'a str, header: &str) -> Option<&'a str> {
    message.lines().find_map(|line| {
        let line = line.trim_end_matches('\r');
        if !starts_with_ignore_ascii_case(line, header) {
            return None;
        }
        let rest = &line[header.len()..];
        rest.strip_prefix(':').map(str::trim)
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Device Description Extraction
// ─────────────────────────────────────────────────────────────────────────────

/// Extracts the text between the first `<tag>` and the first `</tag>`.
///
/// This is a plain substring search, not an XML parse: it is case-sensitive,
/// ignores namespaces, does not match tags carrying attributes, and the first
/// occurrence wins even when the same tag appears in several service blocks.
/// Device descriptions in the wild are not reliably well-formed, so a strict
/// parser would reject documents renderers happily serve.
///
/// Returns the trimmed inner text, or `None` when either tag is missing or
/// the closing tag precedes the opening one.
pub fn extract_tag(xml: &str, tag: &str) -> Option<String> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = xml.find(&open)?;
    let end = xml.find(&close)?;
    let inner_start = start + open.len();
    if end < inner_start {
        return None;
    }
    Some(xml[inner_start..end].trim().to_string())
}

/// Resolves a `controlURL` against the description document's location.
///
/// Absolute URLs are returned unchanged, absolute paths resolve against the
/// location's origin and relative paths against the location's directory
/// (the location truncated at its last `/`).
///
/// Returns `None` if `location` is not an absolute URL.
pub fn resolve_control_url(location: &str, control_url: &str) -> Option<String> {
    let base = Url::parse(location).ok()?;
    base.join(control_url).ok().map(String::from)
}

// ─────────────────────────────────────────────────────────────────────────────
// SOAP Payload Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Escapes XML special characters for embedding in XML content.
///
/// This escapes all five XML special characters:
/// - `&` → `&amp;`
/// - `<` → `&lt;`
/// - `>` → `&gt;`
/// - `"` → `&quot;`
/// - `'` → `&apos;`
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Extracts text content from the first occurrence of an XML element.
///
/// Unlike [`extract_tag`], this searches by local name (ignoring namespace
/// prefixes) and decodes entities. Used on SOAP fault bodies, which renderers
/// produce with arbitrary prefixes (`s:`, `soap:`, none).
pub fn extract_xml_text(xml: &str, element_name: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let target = element_name.as_bytes();
    let mut content_start: Option<usize> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if content_start.is_none() && e.local_name().as_ref() == target => {
                content_start = Some(reader.buffer_position() as usize);
            }
            Ok(Event::End(ref e)) if e.local_name().as_ref() == target => {
                if let Some(start) = content_start {
                    // buffer_position() now points past `</name>`
                    let end_tag_len = e.name().as_ref().len() + 3;
                    let end = (reader.buffer_position() as usize).checked_sub(end_tag_len)?;
                    let raw = xml.get(start..end)?;
                    return Some(html_escape::decode_html_entities(raw.trim()).to_string());
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_with_ignore_ascii_case() {
        assert!(starts_with_ignore_ascii_case("Location: http://...", "location"));
        assert!(starts_with_ignore_ascii_case("LOCATION: http://...", "location"));
        assert!(!starts_with_ignore_ascii_case("X-Custom: value", "location"));
        assert!(!starts_with_ignore_ascii_case("loc", "location"));
    }

    #[test]
    fn extract_header_keeps_url_colons() {
        let msg = "HTTP/1.1 200 OK\r\nlocation: http://192.168.1.5:49152/desc.xml \r\n\r\n";
        assert_eq!(
            extract_header(msg, "LOCATION"),
            Some("http://192.168.1.5:49152/desc.xml")
        );
    }

    #[test]
    fn extract_header_requires_colon_after_name() {
        let msg = "HTTP/1.1 200 OK\r\nLOCATIONX: nope\r\n";
        assert_eq!(extract_header(msg, "LOCATION"), None);
    }

    #[test]
    fn extract_tag_takes_first_match() {
        let xml = "<root><a> first </a><a>second</a></root>";
        assert_eq!(extract_tag(xml, "a"), Some("first".to_string()));
    }

    #[test]
    fn extract_tag_is_not_namespace_aware() {
        let xml = "<d:friendlyName>TV</d:friendlyName>";
        assert_eq!(extract_tag(xml, "friendlyName"), None);
    }

    #[test]
    fn extract_tag_rejects_close_before_open() {
        let xml = "</UDN><UDN>uuid:1";
        assert_eq!(extract_tag(xml, "UDN"), None);
    }

    #[test]
    fn resolve_control_url_variants() {
        let loc = "http://host/dev/desc.xml";
        assert_eq!(
            resolve_control_url(loc, "/ctl").as_deref(),
            Some("http://host/ctl")
        );
        assert_eq!(
            resolve_control_url(loc, "ctl").as_deref(),
            Some("http://host/dev/ctl")
        );
        assert_eq!(
            resolve_control_url(loc, "http://other/ctl").as_deref(),
            Some("http://other/ctl")
        );
        assert_eq!(resolve_control_url("not a url", "/ctl"), None);
    }

    #[test]
    fn escape_xml_escapes_all_five() {
        assert_eq!(
            escape_xml(r#"a&b<c>"d"'e'"#),
            "a&amp;b&lt;c&gt;&quot;d&quot;&apos;e&apos;"
        );
    }

    #[test]
    fn extract_xml_text_ignores_prefix_and_decodes() {
        let xml = r#"<s:Envelope><s:Body><s:Fault><faultstring>UPnP &amp; Error</faultstring></s:Fault></s:Body></s:Envelope>"#;
        assert_eq!(
            extract_xml_text(xml, "faultstring"),
            Some("UPnP & Error".to_string())
        );
        assert_eq!(extract_xml_text(xml, "errorCode"), None);
    }
}
