//! The corpus: a trie over allowed origins, keyed by scheme, then DNS labels
//! right-to-left, with a port set at every node.

use crate::origin::{Origin, Scheme};
use crate::pattern::{HostKind, Pattern, PortPattern};
use indexmap::{IndexMap, IndexSet};

/// Edge label standing for "one or more arbitrary subdomain labels here".
const WILDCARD_LABEL: &str = "*";

#[derive(Debug, Default)]
pub(crate) struct Corpus {
    schemes: IndexMap<Scheme, Node>,
}

#[derive(Debug, Default)]
struct Node {
    edges: IndexMap<String, Node>,
    ports: PortSet,
}

/// Set of acceptable origin ports, where `None` stands for "no explicit
/// port". The any-port sentinel subsumes all other entries; the two are
/// never stored jointly.
#[derive(Debug, Default)]
struct PortSet {
    any: bool,
    ports: IndexSet<Option<u16>>,
}

impl PortSet {
    fn add(&mut self, port: PortPattern) {
        match port {
            PortPattern::Any => {
                self.any = true;
                self.ports.clear();
            }
            PortPattern::None if !self.any => {
                self.ports.insert(None);
            }
            PortPattern::Exact(value) if !self.any => {
                self.ports.insert(Some(value));
            }
            _ => {}
        }
    }

    fn matches(&self, port: Option<u16>) -> bool {
        self.any || self.ports.contains(&port)
    }
}

impl Corpus {
    pub(crate) fn add(&mut self, pattern: &Pattern) {
        let mut node = self.schemes.entry(pattern.scheme).or_default();
        match pattern.kind {
            HostKind::LoopbackIp | HostKind::NonLoopbackIp => {
                node = node.edges.entry(pattern.host.clone()).or_default();
            }
            HostKind::Domain | HostKind::Subdomains => {
                // Rightmost label nearest the root; a trailing dot yields an
                // empty-string edge.
                for label in pattern.concrete_host().split('.').rev() {
                    node = node.edges.entry(label.to_owned()).or_default();
                }
                if pattern.kind == HostKind::Subdomains {
                    node = node.edges.entry(WILDCARD_LABEL.to_owned()).or_default();
                }
            }
        }
        node.ports.add(pattern.port);
    }

    pub(crate) fn contains(&self, origin: &Origin<'_>) -> bool {
        let Some(mut node) = self.schemes.get(&origin.scheme) else {
            return false;
        };

        if origin.host_is_ip {
            return node
                .edges
                .get(origin.host)
                .is_some_and(|leaf| leaf.ports.matches(origin.port));
        }

        for label in origin.host.split('.').rev() {
            // Wildcard short-circuit: checked before descending, while at
            // least one label remains to the wildcard's left.
            if let Some(wildcard) = node.edges.get(WILDCARD_LABEL)
                && wildcard.ports.matches(origin.port)
            {
                return true;
            }
            match node.edges.get(label) {
                Some(next) => node = next,
                None => return false,
            }
        }
        node.ports.matches(origin.port)
    }
}

#[cfg(test)]
#[path = "corpus_test.rs"]
mod corpus_test;
