//! Finding query sites in host documents
//!
//! Locators cut [`EmbeddedQuerySnippet`]s out of a document. How a host
//! language marks its queries is the locator's business; analysis only sees
//! snippet text and the offset where it starts.

pub mod properties;

use std::sync::Arc;

use tracing::{debug, trace};

use crate::analysis::EmbeddedQuerySnippet;

pub use properties::NamedQueryPropertiesLocator;

/// Finds the embedded queries of one kind of host document.
pub trait QuerySiteLocator: Send + Sync {
    fn name(&self) -> &str;

    /// Whether documents at `path` can hold query sites for this locator.
    fn applies_to(&self, path: &str) -> bool;

    /// Snippets in document order. Snippet text has exactly the byte length
    /// of the host range it was cut from.
    fn locate(&self, document: &str) -> Vec<EmbeddedQuerySnippet>;
}

/// Locators by host document kind.
#[derive(Default)]
pub struct LocatorRegistry {
    locators: Vec<Arc<dyn QuerySiteLocator>>,
}

impl LocatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(NamedQueryPropertiesLocator));
        registry
    }

    pub fn register(&mut self, locator: Arc<dyn QuerySiteLocator>) {
        debug!("Registered query site locator '{}'", locator.name());
        self.locators.push(locator);
    }

    pub fn locators(&self) -> &[Arc<dyn QuerySiteLocator>] {
        &self.locators
    }

    /// Snippets from every locator that applies to `path`, sorted by offset.
    pub fn locate(&self, path: &str, document: &str) -> Vec<EmbeddedQuerySnippet> {
        let mut snippets: Vec<EmbeddedQuerySnippet> = self
            .locators
            .iter()
            .filter(|l| l.applies_to(path))
            .flat_map(|l| {
                let found = l.locate(document);
                trace!("{} found {} query site(s) in {}", l.name(), found.len(), path);
                found
            })
            .collect();
        snippets.sort_by_key(|s| s.host_start_offset);
        snippets
    }
}
