//! # Form Validation
//!
//! Rule-based validation for the screen's text forms (login, product edit,
//! user admin). The adapter calls [`FormValidator::validate_field`] on input
//! (debounced) and on blur, and [`FormValidator::validate_form`] on submit.
//!
//! ## Field States
//! ```text
//! value empty            → Neutral   (no visual mark, may still block submit)
//! every rule passes      → Valid     (green mark)
//! first failing rule     → Invalid   (red mark + that rule's message)
//! ```
//!
//! Only the first failing rule's message is shown.

use std::collections::BTreeMap;

/// Field name → current text.
pub type FormValues = BTreeMap<String, String>;

const SPECIAL_CHARS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?";

// =============================================================================
// Rules
// =============================================================================

/// A single validation rule.
///
/// Every rule except `Required` and `Matches` accepts an empty value, so
/// optional fields only complain once something is typed.
#[derive(Debug, Clone)]
pub enum Rule {
    Required,
    Email,
    MinLength(usize),
    MaxLength(usize),
    /// 8+ characters with an uppercase letter, a digit and a symbol.
    StrongPassword,
    /// Value must equal the named field's value.
    Matches(String),
    /// Custom predicate with its own message.
    Pattern {
        check: fn(&str) -> bool,
        message: String,
    },
}

impl Rule {
    /// Checks `value`; `values` gives access to sibling fields.
    pub fn check(&self, value: &str, values: &FormValues) -> Result<(), String> {
        match self {
            Rule::Required => {
                if value.is_empty() {
                    return Err("Este campo es obligatorio".to_string());
                }
            }
            Rule::Email => {
                if !value.is_empty() && !is_email(value) {
                    return Err("Por favor ingresa un email válido".to_string());
                }
            }
            Rule::MinLength(min) => {
                let len = value.chars().count();
                if len > 0 && len < *min {
                    return Err(format!("Mínimo {} caracteres", min));
                }
            }
            Rule::MaxLength(max) => {
                if value.chars().count() > *max {
                    return Err(format!("Máximo {} caracteres", max));
                }
            }
            Rule::StrongPassword => {
                if !value.is_empty() {
                    let missing = missing_password_traits(value);
                    if !missing.is_empty() {
                        return Err(format!(
                            "Contraseña débil. Necesita: {}",
                            missing.join(", ")
                        ));
                    }
                }
            }
            Rule::Matches(other) => {
                let other_value = values.get(other).map(String::as_str).unwrap_or("");
                if value != other_value {
                    return Err("Los campos no coinciden".to_string());
                }
            }
            Rule::Pattern { check, message } => {
                if !value.is_empty() && !check(value) {
                    return Err(if message.is_empty() {
                        "Formato inválido".to_string()
                    } else {
                        message.clone()
                    });
                }
            }
        }

        Ok(())
    }
}

/// `local@domain.tld` with no whitespace and a single `@`.
fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = value.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    !local.is_empty()
        && domain
            .char_indices()
            .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

fn missing_password_traits(value: &str) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if value.chars().count() < 8 {
        missing.push("8+ caracteres");
    }
    if !value.chars().any(|c| c.is_ascii_uppercase()) {
        missing.push("mayúscula");
    }
    if !value.chars().any(|c| c.is_ascii_digit()) {
        missing.push("número");
    }
    if !value.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        missing.push("carácter especial");
    }
    missing
}

// =============================================================================
// Field / Form Results
// =============================================================================

/// Visual state of a field after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldState {
    Neutral,
    Valid,
    Invalid(String),
}

/// Validity of a field plus how it should be displayed.
///
/// An empty required field is `valid: false` but displayed `Neutral`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCheck {
    pub valid: bool,
    pub state: FieldState,
}

/// Result of validating every field with rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormReport {
    pub fields: BTreeMap<String, FieldCheck>,
}

impl FormReport {
    pub fn is_valid(&self) -> bool {
        self.fields.values().all(|f| f.valid)
    }

    /// Messages of the invalid fields, keyed by field name.
    pub fn errors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().filter_map(|(name, check)| match &check.state {
            FieldState::Invalid(message) => Some((name.as_str(), message.as_str())),
            _ => None,
        })
    }
}

// =============================================================================
// Validator
// =============================================================================

/// Per-field rule sets.
///
/// ```rust
/// use caja_core::form::{FormValidator, FormValues, Rule};
///
/// let validator = FormValidator::new()
///     .rule("email", vec![Rule::Required, Rule::Email]);
///
/// let mut values = FormValues::new();
/// values.insert("email".into(), "caja@example.com".into());
/// assert!(validator.validate_form(&values).is_valid());
/// ```
#[derive(Debug, Clone, Default)]
pub struct FormValidator {
    rules: BTreeMap<String, Vec<Rule>>,
}

impl FormValidator {
    pub fn new() -> Self {
        FormValidator::default()
    }

    /// Sets the rules for a field, replacing any previous ones.
    pub fn rule(mut self, field: impl Into<String>, rules: Vec<Rule>) -> Self {
        self.rules.insert(field.into(), rules);
        self
    }

    /// Validates one field. Fields without rules are always valid.
    pub fn validate_field(&self, field: &str, values: &FormValues) -> FieldCheck {
        let value = values.get(field).map(|v| v.trim()).unwrap_or("");

        let Some(rules) = self.rules.get(field) else {
            return FieldCheck {
                valid: true,
                state: FieldState::Neutral,
            };
        };

        let failure = rules.iter().find_map(|rule| rule.check(value, values).err());
        let valid = failure.is_none();

        let state = if value.is_empty() {
            FieldState::Neutral
        } else {
            match failure {
                None => FieldState::Valid,
                Some(message) => FieldState::Invalid(message),
            }
        };

        FieldCheck { valid, state }
    }

    /// Validates every field that has rules.
    pub fn validate_form(&self, values: &FormValues) -> FormReport {
        FormReport {
            fields: self
                .rules
                .keys()
                .map(|field| (field.clone(), self.validate_field(field, values)))
                .collect(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
