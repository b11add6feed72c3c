use std::sync::Arc;

use crate::page::document::Document;
use crate::page::element_model::ElementKind;
use crate::protocol::message::{ReadRequest, ReadResponse, WriteRequest};
use crate::registry::binding::{Binding, BindingDecl};
use crate::registry::registry::Registry;
use crate::sync::events::{UiEvent, UiEventKind, UserAction};
use crate::trace::logger::TraceLogger;
use crate::trace::trace::{SyncTraceEvent, TraceKind};
use crate::transport::error::BridgeError;
use crate::transport::http::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// Binding is busy, the user's edit wins
    Suppressed,
    /// Element missing, binding unknown or value rejected by the control
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Applied {
        applied: usize,
        suppressed: usize,
        skipped: usize,
    },
    Discarded {
        expected: usize,
        received: Option<usize>,
    },
    Failed(String),
    /// Polling is not enabled, nothing was requested
    Idle,
}

/// Reconciles page elements with server variables.
///
/// Owns the registry and the page. Network I/O happens elsewhere: the
/// engine builds requests and consumes their results.
pub struct SyncEngine<D: Document> {
    registry: Registry,
    document: D,
    trace: Arc<TraceLogger>,
    cycle: u64,
}

impl<D: Document> SyncEngine<D> {
    pub fn new(mut registry: Registry, document: D, trace: Arc<TraceLogger>) -> Self {
        registry.resolve_kinds(&document);
        Self {
            registry,
            document,
            trace,
            cycle: 0,
        }
    }

    /// Replace the bindings. Returns false (and changes nothing) for an empty list.
    pub fn initialize<I>(&mut self, bindings: I, interval_ms: u64) -> bool
    where
        I: IntoIterator<Item = BindingDecl>,
    {
        if !self.registry.initialize(bindings, interval_ms) {
            return false;
        }
        self.registry.resolve_kinds(&self.document);
        true
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    pub fn trace(&self) -> &Arc<TraceLogger> {
        &self.trace
    }

    /// Completed read cycles, successful or not.
    pub fn cycles(&self) -> u64 {
        self.cycle
    }

    // ========================================================================
    // Read cycle
    // ========================================================================

    /// One entry per binding, in registry order. None while polling is disabled.
    pub fn read_request(&self) -> Option<ReadRequest> {
        if !self.registry.polling_enabled() || self.registry.is_empty() {
            return None;
        }
        Some(ReadRequest::new(self.registry.variables_for_read(false)))
    }

    /// Apply the result of a read request that asked for `requested` variables.
    ///
    /// Either every value is offered to its binding or nothing is touched.
    pub fn reconcile(
        &mut self,
        requested: usize,
        result: Result<ReadResponse, BridgeError>,
    ) -> ReadOutcome {
        self.cycle += 1;

        let response = match result {
            Ok(r) => r,
            Err(e) => {
                self.trace
                    .log(&SyncTraceEvent::now(self.cycle, TraceKind::ReadFailed).with_error(&e));
                return ReadOutcome::Failed(e.to_string());
            }
        };

        let received = response.read.as_ref().map(|r| r.len());
        let values = match response.values_for(requested) {
            Some(v) if requested == self.registry.len() => v,
            _ => {
                self.trace.log(
                    &SyncTraceEvent::now(self.cycle, TraceKind::ReadDiscarded).with_detail(
                        format!("expected {} entries, got {:?}", requested, received),
                    ),
                );
                return ReadOutcome::Discarded {
                    expected: requested,
                    received,
                };
            }
        };

        let (mut applied, mut suppressed, mut skipped) = (0, 0, 0);
        for (index, value) in values.into_iter().enumerate() {
            match self.apply_update(index, value) {
                ApplyOutcome::Applied => applied += 1,
                ApplyOutcome::Suppressed => suppressed += 1,
                ApplyOutcome::Skipped => skipped += 1,
            }
        }

        self.trace.log(
            &SyncTraceEvent::now(self.cycle, TraceKind::ReadApplied).with_detail(format!(
                "applied={} suppressed={} skipped={}",
                applied, suppressed, skipped
            )),
        );

        ReadOutcome::Applied {
            applied,
            suppressed,
            skipped,
        }
    }

    /// Build the request, send it, reconcile. Blocks for the duration of the call.
    pub fn run_read_cycle(&mut self, transport: &dyn Transport) -> ReadOutcome {
        let request = match self.read_request() {
            Some(r) => r,
            None => return ReadOutcome::Idle,
        };
        let result = transport.read(&request);
        self.reconcile(request.len(), result)
    }

    // ========================================================================
    // Apply-Update
    // ========================================================================

    /// Write a server value into the element of the binding at `index`.
    pub fn apply_update(&mut self, index: usize, value: &str) -> ApplyOutcome {
        let id = match self.registry.get(index) {
            Some(b) => b.id.clone(),
            None => return ApplyOutcome::Skipped,
        };
        let live_kind = self.registry.refresh_kinds_for(&id, &self.document);
        let binding = match self.registry.get(index) {
            Some(b) => b,
            None => return ApplyOutcome::Skipped,
        };

        let outcome = apply_to_element(&mut self.document, binding, value);

        match outcome {
            ApplyOutcome::Suppressed => self.trace.log(
                &SyncTraceEvent::now(self.cycle, TraceKind::UpdateSuppressed)
                    .with_element(&binding.id)
                    .with_variable(&binding.variable)
                    .with_value(value),
            ),
            ApplyOutcome::Skipped => {
                let event = SyncTraceEvent::now(self.cycle, TraceKind::UpdateSkipped)
                    .with_element(&binding.id)
                    .with_variable(&binding.variable)
                    .with_value(value);
                let event = match live_kind {
                    Some(kind) => event.with_detail(format!("rejected by {} control", kind.label())),
                    None => event.with_error(&BridgeError::UnknownElement(id)),
                };
                self.trace.log(&event);
            }
            ApplyOutcome::Applied => {}
        }

        outcome
    }

    // ========================================================================
    // Write path and busy tracking
    // ========================================================================

    /// Handle one element event. Returns the writes to send.
    pub fn handle_event(&mut self, event: &UiEvent) -> Vec<WriteRequest> {
        match event.kind {
            UiEventKind::Focus => {
                self.mark_busy(&event.id, true);
                vec![]
            }
            UiEventKind::Blur => {
                self.mark_busy(&event.id, false);
                vec![]
            }
            UiEventKind::PointerDown => {
                self.mark_dragging(&event.id, true);
                vec![]
            }
            UiEventKind::PointerUp => {
                self.mark_dragging(&event.id, false);
                vec![]
            }
            UiEventKind::Change => {
                self.registry.refresh_kinds_for(&event.id, &self.document);
                self.write_requests_for(&event.id)
            }
            // Sliders push every intermediate position
            UiEventKind::Input => {
                let kind = self.registry.refresh_kinds_for(&event.id, &self.document);
                if kind == Some(ElementKind::RangeLike) {
                    self.write_requests_for(&event.id)
                } else {
                    vec![]
                }
            }
        }
    }

    /// Apply a user action to the page and fire its events.
    pub fn perform(&mut self, action: &UserAction) -> Vec<WriteRequest> {
        let (before, after) = action.events();
        let mut writes = Vec::new();

        for event in &before {
            writes.extend(self.handle_event(event));
        }

        if let Some(edit) = action.edit() {
            if !self.document.edit(action.element(), &edit) {
                return writes;
            }
        }

        for event in &after {
            writes.extend(self.handle_event(event));
        }

        writes
    }

    /// One write request per binding of this element, with its current value.
    pub fn write_requests_for(&self, id: &str) -> Vec<WriteRequest> {
        let mut requests = Vec::new();

        for binding in self.registry.bindings_for(id) {
            match extract_value(&self.document, binding) {
                Some(value) => requests.push(WriteRequest::single(&binding.variable, &value)),
                None => self.trace.log(
                    &SyncTraceEvent::now(self.cycle, TraceKind::WriteFailed)
                        .with_element(id)
                        .with_variable(&binding.variable)
                        .with_error(&BridgeError::UnknownElement(id.to_string())),
                ),
            }
        }

        requests
    }

    fn mark_busy(&mut self, id: &str, busy: bool) {
        if self.registry.set_busy(id, busy) {
            self.trace.log(
                &SyncTraceEvent::now(self.cycle, TraceKind::BusyChanged)
                    .with_element(id)
                    .with_detail(format!("busy={}", busy)),
            );
        }
    }

    fn mark_dragging(&mut self, id: &str, dragging: bool) {
        if self.registry.set_dragging(id, dragging) {
            self.trace.log(
                &SyncTraceEvent::now(self.cycle, TraceKind::BusyChanged)
                    .with_element(id)
                    .with_detail(format!("dragging={}", dragging)),
            );
        }
    }
}

// ============================================================================
// Capability dispatch
// ============================================================================

fn apply_to_element<D: Document>(document: &mut D, binding: &Binding, value: &str) -> ApplyOutcome {
    if binding.is_busy() {
        return ApplyOutcome::Suppressed;
    }

    let written = match binding.kind() {
        Some(ElementKind::TextLike) | Some(ElementKind::RangeLike) => {
            document.set_value(&binding.id, value)
        }
        Some(ElementKind::BooleanLike) => document.set_checked(&binding.id, value != "0"),
        Some(ElementKind::Generic) => document.set_text_content(&binding.id, value),
        None => false,
    };

    if written {
        ApplyOutcome::Applied
    } else {
        ApplyOutcome::Skipped
    }
}

/// Reads by the page's current kind, the cached one may predate an insert.
fn extract_value<D: Document>(document: &D, binding: &Binding) -> Option<String> {
    match document.kind_of(&binding.id)? {
        ElementKind::TextLike | ElementKind::RangeLike => document.value(&binding.id),
        ElementKind::BooleanLike => document
            .checked(&binding.id)
            .map(|c| if c { "1" } else { "0" }.to_string()),
        ElementKind::Generic => document.text_content(&binding.id),
    }
}
