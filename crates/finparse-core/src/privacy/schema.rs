use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::Field;

/// Which fields of a statement format are sensitive, and how much.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivacyPolicy {
    pub name: String,
    /// Statement format the policy was written for (informational).
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Field name -> weight. Weight 1 removes the field when masking; any
    /// higher weight masks its value instead.
    pub fields: BTreeMap<String, u32>,
}

/// What the `masked` level does to one sensitive field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldHandling {
    Drop,
    Mask,
}

impl FieldHandling {
    pub fn from_weight(weight: u32) -> FieldHandling {
        if weight == 1 {
            FieldHandling::Drop
        } else {
            FieldHandling::Mask
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldHandling::Drop => "drop",
            FieldHandling::Mask => "mask",
        }
    }
}

impl PrivacyPolicy {
    /// Sensitive fields in canonical order. Names that are not fields are
    /// skipped; `validate_policy` rejects them up front.
    pub fn sensitive_fields(&self) -> Vec<(Field, FieldHandling)> {
        let mut fields: Vec<(Field, FieldHandling)> = self
            .fields
            .iter()
            .filter_map(|(name, weight)| {
                Field::from_name(name).map(|f| (f, FieldHandling::from_weight(*weight)))
            })
            .collect();
        fields.sort_by_key(|(f, _)| *f);
        fields
    }
}
