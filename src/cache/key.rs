// Cache key derivation.
// A key names the operation and every parameter that shapes the response, page number included.

use std::fmt::Display;

use url::form_urlencoded::byte_serialize;

/// Builder for deterministic cache keys.
///
/// Keys look like
/// `get_issues?owner=rust-lang&repo=rust&state=open&per_page=25&page=2&base_url=https%3A%2F%2Fapi.github.com`.
/// Values are form-encoded, and an absent optional parameter is written as a
/// bare name, so `since` absent and `since` empty produce different keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKey {
    method: &'static str,
    parts: Vec<String>,
}

impl CacheKey {
    pub fn new(method: &'static str) -> Self {
        Self {
            method,
            parts: Vec::new(),
        }
    }

    pub fn param(mut self, name: &str, value: impl Display) -> Self {
        self.parts
            .push(format!("{}={}", name, encode(&value.to_string())));
        self
    }

    pub fn opt_param(mut self, name: &str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.param(name, value),
            None => {
                self.parts.push(name.to_string());
                self
            }
        }
    }

    pub fn build(&self) -> String {
        if self.parts.is_empty() {
            self.method.to_string()
        } else {
            format!("{}?{}", self.method, self.parts.join("&"))
        }
    }
}

fn encode(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect()
}
