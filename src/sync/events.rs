use crate::page::element_model::UserEdit;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEventKind {
    Focus,
    Blur,
    Change,
    Input,
    PointerDown,
    PointerUp,
}

/// An event fired by a page element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiEvent {
    pub id: String,
    pub kind: UiEventKind,
}

impl UiEvent {
    pub fn new(id: &str, kind: UiEventKind) -> Self {
        Self {
            id: id.to_string(),
            kind,
        }
    }
}

/// Something the person at the page does.
///
/// Each action expands into the edit and the events a browser would
/// produce for it.
#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
    Focus(String),
    Blur(String),
    Set { id: String, value: String },
    Check { id: String, checked: bool },
    Toggle(String),
    Drag { id: String, value: String },
    Release(String),
}

impl UserAction {
    pub fn element(&self) -> &str {
        match self {
            UserAction::Focus(id)
            | UserAction::Blur(id)
            | UserAction::Toggle(id)
            | UserAction::Release(id) => id,
            UserAction::Set { id, .. }
            | UserAction::Check { id, .. }
            | UserAction::Drag { id, .. } => id,
        }
    }

    pub fn edit(&self) -> Option<UserEdit> {
        match self {
            UserAction::Set { value, .. } | UserAction::Drag { value, .. } => {
                Some(UserEdit::Value(value.clone()))
            }
            UserAction::Check { checked, .. } => Some(UserEdit::Checked(*checked)),
            UserAction::Toggle(_) => Some(UserEdit::Toggle),
            _ => None,
        }
    }

    /// Events fired around the edit: `(before, after)`.
    pub fn events(&self) -> (Vec<UiEvent>, Vec<UiEvent>) {
        let id = self.element();
        match self {
            UserAction::Focus(_) => (vec![UiEvent::new(id, UiEventKind::Focus)], vec![]),
            UserAction::Blur(_) => (vec![UiEvent::new(id, UiEventKind::Blur)], vec![]),
            UserAction::Set { .. } | UserAction::Check { .. } | UserAction::Toggle(_) => {
                (vec![], vec![UiEvent::new(id, UiEventKind::Change)])
            }
            UserAction::Drag { .. } => (
                vec![UiEvent::new(id, UiEventKind::PointerDown)],
                vec![UiEvent::new(id, UiEventKind::Input)],
            ),
            UserAction::Release(_) => (
                vec![],
                vec![
                    UiEvent::new(id, UiEventKind::PointerUp),
                    UiEvent::new(id, UiEventKind::Change),
                ],
            ),
        }
    }
}
