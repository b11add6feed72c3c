use crate::page::classifier::build_element;
use crate::page::element_model::{Element, ElementDecl, ElementKind, UserEdit};

/// The page the bridge keeps in sync.
///
/// Every call can miss: setters return false and getters return None
/// when the element is absent or does not have that capability.
pub trait Document {
    fn kind_of(&self, id: &str) -> Option<ElementKind>;

    fn value(&self, id: &str) -> Option<String>;
    fn set_value(&mut self, id: &str, value: &str) -> bool;

    fn checked(&self, id: &str) -> Option<bool>;
    fn set_checked(&mut self, id: &str, checked: bool) -> bool;

    fn text_content(&self, id: &str) -> Option<String>;
    fn set_text_content(&mut self, id: &str, text: &str) -> bool;

    /// Mutation made by the person using the page.
    fn edit(&mut self, id: &str, edit: &UserEdit) -> bool;
}

// ============================================================================
// In-memory page
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    elements: Vec<Element>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_decls(decls: &[ElementDecl]) -> Self {
        let mut doc = Self::new();
        for decl in decls {
            doc.insert(build_element(decl));
        }
        doc
    }

    /// Add an element, replacing any element with the same id.
    pub fn insert(&mut self, element: Element) {
        match self.elements.iter_mut().find(|e| e.id == element.id) {
            Some(existing) => *existing = element,
            None => self.elements.push(element),
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Element> {
        let pos = self.elements.iter().position(|e| e.id == id)?;
        Some(self.elements.remove(pos))
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.elements.iter_mut().find(|e| e.id == id)
    }
}

impl Document for MemoryDocument {
    fn kind_of(&self, id: &str) -> Option<ElementKind> {
        self.get(id).map(Element::kind)
    }

    fn value(&self, id: &str) -> Option<String> {
        self.get(id)?.value().map(str::to_string)
    }

    fn set_value(&mut self, id: &str, value: &str) -> bool {
        self.get_mut(id).map(|el| el.set_value(value)).unwrap_or(false)
    }

    fn checked(&self, id: &str) -> Option<bool> {
        self.get(id)?.checked()
    }

    fn set_checked(&mut self, id: &str, checked: bool) -> bool {
        self.get_mut(id).map(|el| el.set_checked(checked)).unwrap_or(false)
    }

    fn text_content(&self, id: &str) -> Option<String> {
        self.get(id)?.text_content().map(str::to_string)
    }

    fn set_text_content(&mut self, id: &str, text: &str) -> bool {
        self.get_mut(id).map(|el| el.set_text_content(text)).unwrap_or(false)
    }

    fn edit(&mut self, id: &str, edit: &UserEdit) -> bool {
        self.get_mut(id).map(|el| el.edit(edit)).unwrap_or(false)
    }
}
