//! Storage-key derivation from the host page location.
//!
//! A journal belongs to one course deployment, identified by the page URL
//! with the trailing file name removed. The key format must stay compatible
//! with existing saved journals: prefix + `encodeURIComponent` of
//! origin-plus-directory.

use url::Url;

const STORAGE_KEY_PREFIX: &str = "LearningJournal_";

/// Derives the namespaced storage key for a page location.
///
/// Falls back to encoding the raw input when it is not an absolute URL, so
/// file-based and test hosts still get a stable key.
pub fn storage_key(page_url: &str) -> String {
    let scope = match Url::parse(page_url) {
        Ok(url) => {
            let origin = url.origin().ascii_serialization();
            let directory = match url.path().rfind('/') {
                Some(last_slash) => &url.path()[..last_slash],
                None => url.path(),
            };
            format!("{origin}{directory}")
        }
        Err(_) => page_url.to_string(),
    };
    format!("{STORAGE_KEY_PREFIX}{}", encode_uri_component(&scope))
}

/// `encodeURIComponent`-compatible percent encoding.
///
/// Unreserved set: ASCII alphanumerics plus `- _ . ! ~ * ' ( )`. Everything
/// else, per UTF-8 byte, becomes `%XX` with uppercase hex.
fn encode_uri_component(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => encoded.push(byte as char),
            other => {
                encoded.push('%');
                encoded.push_str(&format!("{other:02X}"));
            }
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::{encode_uri_component, storage_key};

    #[test]
    fn key_scopes_to_directory_not_file() {
        let a = storage_key("https://lms.example.org/courses/safety/index.html");
        let b = storage_key("https://lms.example.org/courses/safety/lesson2.html");
        let c = storage_key("https://lms.example.org/courses/other/index.html");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with("LearningJournal_"));
    }

    #[test]
    fn encoding_matches_encode_uri_component() {
        assert_eq!(
            encode_uri_component("https://a.b/c d"),
            "https%3A%2F%2Fa.b%2Fc%20d"
        );
        assert_eq!(encode_uri_component("A-z0_9.!~*'()"), "A-z0_9.!~*'()");
        assert_eq!(encode_uri_component("é"), "%C3%A9");
    }

    #[test]
    fn non_url_input_still_yields_a_stable_key() {
        assert_eq!(
            storage_key("local-test"),
            format!("LearningJournal_{}", "local-test")
        );
    }
}
