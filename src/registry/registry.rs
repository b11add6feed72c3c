use std::time::Duration;

use crate::page::document::Document;
use crate::page::element_model::ElementKind;
use crate::registry::binding::{Binding, BindingDecl};

/// Ordered set of bindings plus the polling interval.
///
/// Read responses are matched to bindings by position, so the order
/// given to `initialize` is kept for the lifetime of the registry.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    bindings: Vec<Binding>,
    interval: Duration,
    polling_enabled: bool,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the bindings and enable polling.
    ///
    /// An empty list leaves the registry untouched and returns false.
    pub fn initialize<I>(&mut self, bindings: I, interval_ms: u64) -> bool
    where
        I: IntoIterator<Item = BindingDecl>,
    {
        let bindings: Vec<Binding> = bindings.into_iter().map(Binding::from).collect();
        if bindings.is_empty() {
            return false;
        }

        self.bindings = bindings;
        self.interval = Duration::from_millis(interval_ms);
        self.polling_enabled = true;
        true
    }

    pub fn polling_enabled(&self) -> bool {
        self.polling_enabled
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn get(&self, index: usize) -> Option<&Binding> {
        self.bindings.get(index)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.id == id)
    }

    /// All bindings for an element id, in declaration order.
    pub fn bindings_for<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Binding> + 'a {
        self.bindings.iter().filter(move |b| b.id == id)
    }

    /// Set the focus-busy flag on every binding with this id.
    /// Returns false when no binding matches.
    pub fn set_busy(&mut self, id: &str, busy: bool) -> bool {
        let mut matched = false;
        for b in self.bindings.iter_mut().filter(|b| b.id == id) {
            b.set_busy(busy);
            matched = true;
        }
        matched
    }

    /// Set the pointer-drag flag on every binding with this id.
    pub fn set_dragging(&mut self, id: &str, dragging: bool) -> bool {
        let mut matched = false;
        for b in self.bindings.iter_mut().filter(|b| b.id == id) {
            b.set_dragging(dragging);
            matched = true;
        }
        matched
    }

    /// Variable names for a read request, in registry order.
    ///
    /// With `deduplicate`, repeats of an earlier name are dropped. The
    /// read cycle never asks for this: it needs one entry per binding.
    pub fn variables_for_read(&self, deduplicate: bool) -> Vec<String> {
        let mut list: Vec<String> = Vec::with_capacity(self.bindings.len());
        for b in &self.bindings {
            if deduplicate && list.iter().any(|v| *v == b.variable) {
                continue;
            }
            list.push(b.variable.clone());
        }
        list
    }

    /// Resolve each binding's element kind against the page.
    pub fn resolve_kinds(&mut self, document: &dyn Document) {
        for b in &mut self.bindings {
            b.set_kind(document.kind_of(&b.id));
        }
    }

    /// Re-read the kind of every binding of `id`. The page may have gained,
    /// lost or replaced the element since the last resolve.
    pub fn refresh_kinds_for(&mut self, id: &str, document: &dyn Document) -> Option<ElementKind> {
        let kind = document.kind_of(id);
        for b in self.bindings.iter_mut().filter(|b| b.id == id) {
            b.set_kind(kind);
        }
        kind
    }
}
