use serde::{Deserialize, Serialize};

/// Input widget the workflow editor renders for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    /// Product search box.
    Product {
        /// Offer individual variations in the results.
        allow_variations: bool,
        /// Offer variable (parent) products in the results.
        allow_variable: bool,
    },
}

/// A configurable option of an action; its value arrives in
/// [`WorkflowContext::options`](crate::WorkflowContext) under `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    pub title: String,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldDefinition {
    pub fn product(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            kind: FieldKind::Product {
                allow_variations: false,
                allow_variable: false,
            },
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn allow_variations(mut self, allow: bool) -> Self {
        let FieldKind::Product {
            allow_variations, ..
        } = &mut self.kind;
        *allow_variations = allow;
        self
    }

    pub fn allow_variable(mut self, allow: bool) -> Self {
        let FieldKind::Product { allow_variable, .. } = &mut self.kind;
        *allow_variable = allow;
        self
    }
}
