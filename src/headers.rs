use crate::constants::header;
use indexmap::IndexMap;

/// Response headers computed for a request, in emission order. Names are the
/// canonically-cased constants from [`crate::constants::header`].
pub type Headers = IndexMap<&'static str, String>;

/// Accumulates response headers during a single check. `Vary` entries are
/// merged into one comma-separated value and deduplicated.
#[derive(Debug, Default, Clone)]
pub(crate) struct ResponseHeaders {
    headers: Headers,
}

impl ResponseHeaders {
    pub(crate) fn new() -> Self {
        Self {
            headers: IndexMap::with_capacity(8),
        }
    }

    pub(crate) fn set(&mut self, name: &'static str, value: impl Into<String>) {
        self.headers.insert(name, value.into());
    }

    pub(crate) fn add_vary(&mut self, entry: &str) {
        match self.headers.get_mut(header::VARY) {
            Some(existing) => {
                let already_present = existing
                    .split(',')
                    .any(|part| part.trim().eq_ignore_ascii_case(entry));
                if !already_present {
                    existing.push_str(", ");
                    existing.push_str(entry);
                }
            }
            None => {
                self.headers.insert(header::VARY, entry.to_owned());
            }
        }
    }

    pub(crate) fn into_headers(self) -> Headers {
        self.headers
    }
}

#[cfg(test)]
#[path = "headers_test.rs"]
mod headers_test;
