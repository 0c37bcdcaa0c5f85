//! Push credentials and credential-bearing remote URLs.

use std::fmt;

const HTTPS_SCHEME: &str = "https://";

/// Username and secret used to authenticate the push
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    secret: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, secret: impl Into<String>) -> Self {
        Credentials {
            username: username.into(),
            secret: secret.into(),
        }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Returns `url` with the percent-encoded credentials inserted after `https://`.
    ///
    /// Existing user-info in the URL is replaced. Returns `None` for URLs that
    /// are not https, which are pushed as they are.
    pub fn inject_into(&self, url: &str) -> Option<String> {
        let rest = url.strip_prefix(HTTPS_SCHEME)?;
        let host_and_path = strip_userinfo(rest);

        Some(format!(
            "{}{}:{}@{}",
            HTTPS_SCHEME,
            percent_encode(&self.username),
            percent_encode(&self.secret),
            host_and_path
        ))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Hides any user-info in a URL so it can be logged.
pub fn redact_url(url: &str) -> String {
    match url.split_once("://") {
        Some((scheme, rest)) => {
            let host_and_path = strip_userinfo(rest);
            if host_and_path.len() == rest.len() {
                url.to_string()
            } else {
                format!("{}://***@{}", scheme, host_and_path)
            }
        }
        None => url.to_string(),
    }
}

fn strip_userinfo(authority_and_path: &str) -> &str {
    let authority_end = authority_and_path
        .find(['/', '?', '#'])
        .unwrap_or(authority_and_path.len());

    match authority_and_path[..authority_end].rfind('@') {
        Some(at) => &authority_and_path[at + 1..],
        None => authority_and_path,
    }
}

/// Percent-encodes everything outside the RFC 3986 unreserved set.
fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
