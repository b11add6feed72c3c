use crate::page::element_model::{Control, Element};
use crate::registry::registry::Registry;

// ============================================================================
// Console view of the page
// ============================================================================

/// Format the page for terminal output.
///
/// Produces output like:
/// ```text
/// === Page (3 elements) ===
///   t1       text      "10"
///   c1       checkbox  [x]         (busy)
///   r1       range     40 [0..100]
/// ```
pub fn format_page(elements: &[Element], registry: &Registry) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== Page ({} elements) ===\n", elements.len()));

    for el in elements {
        let shown = match &el.control {
            Control::Text { value } => format!("{:?}", value),
            Control::Checkbox { checked } => {
                if *checked { "[x]".to_string() } else { "[ ]".to_string() }
            }
            Control::Range { value, min, max } => format!("{} [{}..{}]", value, min, max),
            Control::Generic { text } => text.clone(),
        };

        let busy = registry
            .bindings_for(&el.id)
            .any(|b| b.is_busy());

        out.push_str(&format!("  {:<8} {:<9} {}", el.id, el.kind().label(), shown));
        if busy {
            out.push_str("  (busy)");
        }
        out.push('\n');
    }

    out
}

/// Fingerprint of the rendered page, used to skip redundant redraws.
pub fn page_fingerprint(rendered: &str) -> String {
    use sha1::{Digest, Sha1};

    let mut hasher = Sha1::new();
    hasher.update(rendered.as_bytes());
    format!("{:x}", hasher.finalize())
}
