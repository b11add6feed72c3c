use serde::Deserialize;

/// Element as declared in the page configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ElementDecl {
    pub id: String,
    #[serde(default = "default_tag")]
    pub tag: String,
    #[serde(default)]
    pub r#type: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

fn default_tag() -> String {
    "input".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    TextLike,
    BooleanLike,
    RangeLike,
    Generic,
}

impl ElementKind {
    pub fn label(&self) -> &'static str {
        match self {
            ElementKind::TextLike => "text",
            ElementKind::BooleanLike => "checkbox",
            ElementKind::RangeLike => "range",
            ElementKind::Generic => "generic",
        }
    }
}

/// Live state of one page element.
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    Text { value: String },
    Checkbox { checked: bool },
    Range { value: String, min: f64, max: f64 },
    Generic { text: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: String,
    pub control: Control,
}

/// Mutation performed by the person using the page.
#[derive(Debug, Clone, PartialEq)]
pub enum UserEdit {
    Value(String),
    Checked(bool),
    Toggle,
}

impl Element {
    pub fn kind(&self) -> ElementKind {
        match self.control {
            Control::Text { .. } => ElementKind::TextLike,
            Control::Checkbox { .. } => ElementKind::BooleanLike,
            Control::Range { .. } => ElementKind::RangeLike,
            Control::Generic { .. } => ElementKind::Generic,
        }
    }

    /// Displayed value of a text or range input.
    pub fn value(&self) -> Option<&str> {
        match &self.control {
            Control::Text { value } | Control::Range { value, .. } => Some(value.as_str()),
            _ => None,
        }
    }

    /// Returns false when the control has no value or, for a range, when
    /// the input is not a number and the control keeps its position.
    pub fn set_value(&mut self, new_value: &str) -> bool {
        match &mut self.control {
            Control::Text { value } => {
                *value = new_value.to_string();
                true
            }
            Control::Range { value, min, max } => match clamp_range(new_value, *min, *max) {
                Some(v) => {
                    *value = v;
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    pub fn checked(&self) -> Option<bool> {
        match self.control {
            Control::Checkbox { checked } => Some(checked),
            _ => None,
        }
    }

    pub fn set_checked(&mut self, new_checked: bool) -> bool {
        match &mut self.control {
            Control::Checkbox { checked } => {
                *checked = new_checked;
                true
            }
            _ => false,
        }
    }

    pub fn text_content(&self) -> Option<&str> {
        match &self.control {
            Control::Generic { text } => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn set_text_content(&mut self, new_text: &str) -> bool {
        match &mut self.control {
            Control::Generic { text } => {
                *text = new_text.to_string();
                true
            }
            _ => false,
        }
    }

    /// Apply a user-side edit. Returns false when the edit does not fit the control.
    pub fn edit(&mut self, edit: &UserEdit) -> bool {
        match edit {
            UserEdit::Value(v) => match self.kind() {
                ElementKind::Generic => self.set_text_content(v),
                ElementKind::BooleanLike => self.set_checked(v != "0"),
                _ => self.set_value(v),
            },
            UserEdit::Checked(c) => self.set_checked(*c),
            UserEdit::Toggle => match self.checked() {
                Some(c) => self.set_checked(!c),
                None => false,
            },
        }
    }
}

/// Range inputs keep numeric values inside `[min, max]` and ignore
/// anything that is not a number.
fn clamp_range(raw: &str, min: f64, max: f64) -> Option<String> {
    let parsed: f64 = raw.trim().parse().ok()?;
    if !parsed.is_finite() {
        return None;
    }

    if parsed < min {
        Some(format_number(min))
    } else if parsed > max {
        Some(format_number(max))
    } else {
        Some(raw.trim().to_string())
    }
}

pub(crate) fn format_number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
