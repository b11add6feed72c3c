use serde::{Deserialize, Serialize};

use crate::page::element_model::ElementKind;

/// Binding as declared in configuration: `{id, variable}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingDecl {
    pub id: String,
    pub variable: String,
}

impl BindingDecl {
    pub fn new(id: &str, variable: &str) -> Self {
        Self {
            id: id.to_string(),
            variable: variable.to_string(),
        }
    }
}

/// Association between one page element and one server variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub id: String,
    pub variable: String,
    busy: bool,
    dragging: bool,
    kind: Option<ElementKind>,
}

impl Binding {
    pub fn new(id: &str, variable: &str) -> Self {
        Self {
            id: id.to_string(),
            variable: variable.to_string(),
            busy: false,
            dragging: false,
            kind: None,
        }
    }

    /// True while the user holds focus on the element or drags it.
    pub fn is_busy(&self) -> bool {
        self.busy || self.dragging
    }

    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    /// Element capability, resolved once against the page.
    pub fn kind(&self) -> Option<ElementKind> {
        self.kind
    }

    pub fn set_kind(&mut self, kind: Option<ElementKind>) {
        self.kind = kind;
    }
}

impl From<BindingDecl> for Binding {
    fn from(decl: BindingDecl) -> Self {
        Binding::new(&decl.id, &decl.variable)
    }
}
