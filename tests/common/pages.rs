use std::sync::Arc;

use webgate_sync::page::document::MemoryDocument;
use webgate_sync::page::element_model::ElementDecl;
use webgate_sync::registry::binding::BindingDecl;
use webgate_sync::registry::registry::Registry;
use webgate_sync::sync::engine::SyncEngine;
use webgate_sync::trace::logger::TraceLogger;

pub fn decl(id: &str, tag: &str, input_type: Option<&str>, value: Option<&str>) -> ElementDecl {
    ElementDecl {
        id: id.into(),
        tag: tag.into(),
        r#type: input_type.map(str::to_string),
        value: value.map(str::to_string),
        min: None,
        max: None,
    }
}

pub fn text(id: &str, value: &str) -> ElementDecl {
    decl(id, "input", Some("text"), Some(value))
}

pub fn checkbox(id: &str, checked: bool) -> ElementDecl {
    decl(id, "input", Some("checkbox"), Some(if checked { "1" } else { "0" }))
}

pub fn range(id: &str, value: &str) -> ElementDecl {
    decl(id, "input", Some("range"), Some(value))
}

pub fn output(id: &str, text: &str) -> ElementDecl {
    decl(id, "span", None, Some(text))
}

/// Engine over an in-memory page with the given bindings `(id, variable)`.
pub fn engine(elements: &[ElementDecl], bindings: &[(&str, &str)]) -> SyncEngine<MemoryDocument> {
    engine_with_interval(elements, bindings, 1000)
}

pub fn engine_with_interval(
    elements: &[ElementDecl],
    bindings: &[(&str, &str)],
    interval_ms: u64,
) -> SyncEngine<MemoryDocument> {
    let mut registry = Registry::new();
    registry.initialize(
        bindings.iter().map(|(id, var)| BindingDecl::new(id, var)),
        interval_ms,
    );
    SyncEngine::new(
        registry,
        MemoryDocument::from_decls(elements),
        Arc::new(TraceLogger::disabled()),
    )
}
