//! Namespaced key layout
//!
//! Every key an adapter writes starts with its namespace prefix, so one store
//! can host independent crawls and each can be cleared on its own:
//!
//! | Purpose        | Key                      |
//! |----------------|--------------------------|
//! | Cache entry    | `<prefix>:<key>`         |
//! | Visited marker | `<prefix>:request:<id>`  |
//! | Cookie record  | `<prefix>:cookie:<host>` |
//! | Request queue  | `<prefix>:queue`         |

/// Builds store keys under a namespace prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySpace {
    prefix: String,
}

impl KeySpace {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Key of a cache entry
    pub fn entry(&self, key: &str) -> String {
        format!("{}:{}", self.prefix, key)
    }

    /// Key of a visited marker
    pub fn request(&self, request_id: u64) -> String {
        format!("{}:request:{}", self.prefix, request_id)
    }

    /// Key of the cookie record for a host
    pub fn cookie(&self, host: &str) -> String {
        format!("{}:cookie:{}", self.prefix, host)
    }

    /// Key of the request queue
    pub fn queue(&self) -> String {
        format!("{}:queue", self.prefix)
    }

    /// Pattern matching every cookie record in this namespace
    pub fn cookie_pattern(&self) -> String {
        format!("{}:cookie:*", escape_glob(&self.prefix))
    }

    /// Pattern matching every visited marker in this namespace
    pub fn request_pattern(&self) -> String {
        format!("{}:request:*", escape_glob(&self.prefix))
    }
}

/// Escapes glob metacharacters so `text` only matches itself
fn escape_glob(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
