use crate::page::element_model::{Control, Element, ElementDecl, ElementKind, format_number};

pub const DEFAULT_RANGE_MIN: f64 = 0.0;
pub const DEFAULT_RANGE_MAX: f64 = 100.0;

pub fn classify(decl: &ElementDecl) -> ElementKind {
    let tag = decl.tag.to_lowercase();
    let input_type = decl.r#type.as_deref().map(str::to_lowercase);

    match tag.as_str() {
        "input" => match input_type.as_deref() {
            Some("checkbox") => ElementKind::BooleanLike,
            Some("range") => ElementKind::RangeLike,
            // Browsers treat a missing or unknown input type as text
            _ => ElementKind::TextLike,
        },
        "textarea" => ElementKind::TextLike,
        _ => ElementKind::Generic,
    }
}

/// Build the live element for a declaration.
pub fn build_element(decl: &ElementDecl) -> Element {
    let initial = decl.value.clone().unwrap_or_default();

    let control = match classify(decl) {
        ElementKind::TextLike => Control::Text { value: initial },
        ElementKind::BooleanLike => Control::Checkbox {
            checked: !initial.is_empty() && initial != "0",
        },
        ElementKind::RangeLike => {
            let min = decl.min.unwrap_or(DEFAULT_RANGE_MIN);
            let max = decl.max.unwrap_or(DEFAULT_RANGE_MAX).max(min);
            let mut element = Element {
                id: decl.id.clone(),
                control: Control::Range {
                    value: midpoint(min, max),
                    min,
                    max,
                },
            };
            if !initial.is_empty() {
                element.set_value(&initial);
            }
            return element;
        }
        ElementKind::Generic => Control::Generic { text: initial },
    };

    Element {
        id: decl.id.clone(),
        control,
    }
}

/// Browsers start a range input halfway between its bounds.
fn midpoint(min: f64, max: f64) -> String {
    format_number(min + (max - min) / 2.0)
}
