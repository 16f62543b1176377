//! Request signing for the eSign open platform.
//!
//! Every API request carries an HMAC-SHA256 signature over a canonical
//! string built from the method, a handful of headers and the request path.
//! The vendor recomputes the same string, so field order, separators and
//! query sorting must match byte for byte.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Prefix of headers that take part in the signature.
pub const CUSTOM_HEADER_PREFIX: &str = "x-tsign-open-";

/// The inputs of one request signature.
#[derive(Debug, Clone, Default)]
pub struct StringToSign<'a> {
    /// HTTP method (any case).
    pub method: &'a str,
    /// `Accept` header value.
    pub accept: &'a str,
    /// `Content-MD5` header value, empty for bodiless requests.
    pub content_md5: &'a str,
    /// `Content-Type` header value.
    pub content_type: &'a str,
    /// `Date` header value.
    pub date: &'a str,
    /// Custom headers, already formatted with [`format_custom_headers`].
    pub headers: &'a str,
    /// Path plus sorted query, from [`path_and_parameters`].
    pub path_and_parameters: &'a str,
}

impl StringToSign<'_> {
    /// Assemble the canonical string.
    pub fn build(&self) -> String {
        let mut s = String::with_capacity(128 + self.path_and_parameters.len());
        s.push_str(&self.method.to_ascii_uppercase());
        s.push('\n');
        s.push_str(self.accept);
        s.push('\n');
        s.push_str(self.content_md5);
        s.push('\n');
        s.push_str(self.content_type);
        s.push('\n');
        s.push_str(self.date);
        s.push('\n');
        if !self.headers.is_empty() {
            s.push_str(self.headers);
            s.push('\n');
        }
        s.push_str(self.path_and_parameters);
        s
    }

    /// Sign the canonical string with the app secret.
    pub fn sign(&self, app_secret: &str) -> String {
        sign_string(app_secret, &self.build())
    }
}

/// Base64-encoded HMAC-SHA256 of `string_to_sign`.
pub fn sign_string(app_secret: &str, string_to_sign: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(app_secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(string_to_sign.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

/// Base64-encoded MD5 of a request body; empty for an empty body.
pub fn content_md5(body: &[u8]) -> String {
    if body.is_empty() {
        return String::new();
    }
    BASE64.encode(Md5::digest(body))
}

/// RFC 1123 date in GMT, the format the `Date` header must use.
pub fn gmt_date(at: chrono::DateTime<chrono::Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Select the `x-tsign-open-*` headers, lower-case their names, trim their
/// values, sort by name and join as `name:value` lines.
pub fn format_custom_headers<'a, I>(headers: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut selected: Vec<(String, &str)> = headers
        .into_iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), value.trim()))
        .filter(|(name, _)| name.starts_with(CUSTOM_HEADER_PREFIX))
        .collect();
    selected.sort_by(|a, b| a.0.cmp(&b.0));
    selected.dedup_by(|later, earlier| later.0 == earlier.0);

    selected
        .iter()
        .map(|(name, value)| format!("{name}:{value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Path with its query parameters sorted by key.
///
/// Accepts a bare path (`/v3/files/1?b=2&a=1`) or a full URL; scheme and host
/// are dropped. Parameters are decoded and re-encoded as
/// `application/x-www-form-urlencoded`, so equivalent encodings sign the same.
pub fn path_and_parameters(uri: &str) -> String {
    let without_origin = match uri.find("://") {
        Some(idx) => {
            let rest = &uri[idx + 3..];
            rest.find(['/', '?']).map_or("/", |p| &rest[p..])
        }
        None => uri,
    };
    let without_fragment = without_origin.split('#').next().unwrap_or_default();

    let (path, query) = match without_fragment.split_once('?') {
        Some((path, query)) => (path, query),
        None => (without_fragment, ""),
    };
    let path = if path.is_empty() { "/" } else { path };

    if query.is_empty() {
        return path.to_string();
    }

    let mut params: Vec<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();
    // stable: repeated keys keep their relative order
    params.sort_by(|a, b| a.0.cmp(&b.0));

    let sorted = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish();
    format!("{path}?{sorted}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_string_to_sign_layout() {
        let s = StringToSign {
            method: "post",
            accept: "application/json",
            content_md5: "abc==",
            content_type: "application/json; charset=UTF-8",
            date: "Tue, 01 Jan 2030 00:00:00 GMT",
            headers: "",
            path_and_parameters: "/v3/sign-flow/create-by-file",
        };
        assert_eq!(
            s.build(),
            "POST\napplication/json\nabc==\napplication/json; charset=UTF-8\n\
             Tue, 01 Jan 2030 00:00:00 GMT\n/v3/sign-flow/create-by-file"
        );
    }

    #[test]
    fn test_string_to_sign_with_headers() {
        let s = StringToSign {
            method: "GET",
            accept: "application/json",
            headers: "x-tsign-open-a:1\nx-tsign-open-b:2",
            path_and_parameters: "/v3/files/f1",
            ..Default::default()
        };
        assert_eq!(
            s.build(),
            "GET\napplication/json\n\n\n\nx-tsign-open-a:1\nx-tsign-open-b:2\n/v3/files/f1"
        );
    }

    #[test]
    fn test_signature_known_vector() {
        // RFC 4231 test case 2
        let sig = sign_string("Jefe", "what do ya want for nothing?");
        assert_eq!(sig, "W9zBRr9gdU5qBCQmCJV1x1oAPwidJzmDnexYuWTsOEM=");
    }

    #[test]
    fn test_signature_is_deterministic() {
        let s = StringToSign {
            method: "GET",
            accept: "application/json",
            path_and_parameters: "/v3/files/f1",
            ..Default::default()
        };
        assert_eq!(s.sign("secret"), s.sign("secret"));
        assert_ne!(s.sign("secret"), s.sign("other"));
    }

    #[test]
    fn test_query_order_does_not_change_signature() {
        let a = path_and_parameters("/v3/persons/identity-info?psnAccount=138&psnId=p1");
        let b = path_and_parameters("/v3/persons/identity-info?psnId=p1&psnAccount=138");
        assert_eq!(a, "/v3/persons/identity-info?psnAccount=138&psnId=p1");
        assert_eq!(a, b);

        let sign = |p: &str| {
            StringToSign {
                method: "GET",
                accept: "application/json",
                path_and_parameters: p,
                ..Default::default()
            }
            .sign("secret")
        };
        assert_eq!(sign(&a), sign(&b));
    }

    #[test]
    fn test_path_and_parameters_variants() {
        assert_eq!(path_and_parameters("/v3/files/f1"), "/v3/files/f1");
        assert_eq!(
            path_and_parameters("https://openapi.esign.cn/v3/files?z=1&a=2"),
            "/v3/files?a=2&z=1"
        );
        assert_eq!(path_and_parameters("https://openapi.esign.cn"), "/");
        assert_eq!(path_and_parameters("/p?name=a b&x="), "/p?name=a+b&x=");
        assert_eq!(path_and_parameters("/p?name=a%20b"), "/p?name=a+b");
    }

    #[test]
    fn test_content_md5() {
        assert_eq!(content_md5(b""), "");
        // md5("hello") = 5d41402abc4b2a76b9719d911017c592
        assert_eq!(content_md5(b"hello"), "XUFAKrxLKna5cZ2REBfFkg==");
    }

    #[test]
    fn test_gmt_date() {
        let at = chrono::Utc.with_ymd_and_hms(2030, 1, 1, 8, 5, 9).unwrap();
        assert_eq!(gmt_date(at), "Tue, 01 Jan 2030 08:05:09 GMT");
    }

    #[test]
    fn test_format_custom_headers() {
        let headers = [
            ("X-Tsign-Open-Version", " 2 "),
            ("Accept", "application/json"),
            ("x-tsign-open-biz", "flow"),
        ];
        assert_eq!(
            format_custom_headers(headers),
            "x-tsign-open-biz:flow\nx-tsign-open-version:2"
        );
        assert_eq!(format_custom_headers([("Accept", "x")]), "");
    }
}
