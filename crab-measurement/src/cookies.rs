//! Cookie access for identity resolution

use std::collections::HashMap;

/// Read access to the cookies of the current request
pub trait CookieSource {
    fn get_cookie(&self, name: &str) -> Option<String>;
}

impl CookieSource for HashMap<String, String> {
    fn get_cookie(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Cookies parsed from a raw `Cookie:` request header
///
/// Pairs are separated by `;`, name and value by the first `=`. Pairs without
/// `=` are ignored; for duplicate names the first occurrence wins.
#[derive(Debug, Clone, Default)]
pub struct RequestCookies {
    cookies: HashMap<String, String>,
}

impl RequestCookies {
    pub fn parse(header: &str) -> Self {
        let mut cookies = HashMap::new();
        for pair in header.split(';') {
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            let value = value.trim().trim_matches('"');
            cookies
                .entry(name.to_string())
                .or_insert_with(|| value.to_string());
        }
        Self { cookies }
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

impl CookieSource for RequestCookies {
    fn get_cookie(&self, name: &str) -> Option<String> {
        self.cookies.get(name).cloned()
    }
}
