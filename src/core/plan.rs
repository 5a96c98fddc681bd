//! Change planning for the single declared resource
//!
//! Compares the persisted state with the declared binding. The immutable
//! fields (`app_service_name`, `resource_group_name`, `relay_id`) force a
//! replacement; ARM names are case-insensitive, so they are compared that way.

use crate::core::state::ResourceState;
use crate::domain::HybridConnectionBinding;
use std::fmt;

/// Action `apply` takes for the declared resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// No identifier is persisted
    Create,
    /// The persisted object is updated in place
    Update { id: String },
    /// An immutable field changed: delete `id`, then create
    Replace { id: String, reasons: Vec<String> },
}

impl Plan {
    /// Plans the next apply
    pub fn for_binding(state: Option<&ResourceState>, binding: &HybridConnectionBinding) -> Self {
        let Some(state) = state else {
            return Plan::Create;
        };

        let observed = &state.attributes;
        let mut reasons = Vec::new();
        push_change(
            &mut reasons,
            "app_service_name",
            Some(&observed.app_service_name),
            &binding.app_service_name,
        );
        push_change(
            &mut reasons,
            "resource_group_name",
            Some(&observed.resource_group_name),
            &binding.resource_group_name,
        );
        push_change(
            &mut reasons,
            "relay_id",
            observed.relay_id.as_ref(),
            &binding.relay_id,
        );

        if reasons.is_empty() {
            Plan::Update {
                id: state.id.clone(),
            }
        } else {
            Plan::Replace {
                id: state.id.clone(),
                reasons,
            }
        }
    }
}

/// An unknown observed value never forces a replacement
fn push_change(reasons: &mut Vec<String>, field: &str, observed: Option<&String>, declared: &str) {
    if let Some(observed) = observed {
        if !observed.eq_ignore_ascii_case(declared) {
            reasons.push(format!("{field} changed from {observed:?} to {declared:?}"));
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Plan::Create => write!(f, "create"),
            Plan::Update { id } => write!(f, "update {id}"),
            Plan::Replace { id, reasons } => {
                write!(f, "replace {id} ({})", reasons.join(", "))
            }
        }
    }
}
