use serde_json::Value;
use std::collections::HashMap;

use crate::models::kind::ResourceKind;

use super::creator::{Action, ActionCreator};
use super::transition::{Operation, Phase, Transition, TransitionMap};

/// The fifteen action creators of one resource kind.
#[derive(Debug, Clone)]
pub struct ResourceActions {
    kind: ResourceKind,
    creators: HashMap<Transition, ActionCreator>,
}

impl ResourceActions {
    pub fn for_kind(kind: ResourceKind) -> Self {
        let creators = Transition::all()
            .map(|t| (t, ActionCreator::new(kind.action_type(t), &fields_for(kind, t))))
            .collect();
        Self { kind, creators }
    }

    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    #[must_use]
    pub fn creator(&self, transition: Transition) -> &ActionCreator {
        // Populated for every variant in `for_kind`.
        &self.creators[&transition]
    }

    /// Build the action for `transition` from positional field values.
    pub fn create<I>(&self, transition: Transition, values: I) -> Action
    where
        I: IntoIterator<Item = Value>,
    {
        self.creator(transition).create(values)
    }

    /// Action-type tag → transition, the table a CRUD reducer dispatches on.
    #[must_use]
    pub fn transition_map(&self) -> TransitionMap {
        self.creators
            .iter()
            .map(|(t, creator)| (creator.action_type().to_string(), *t))
            .collect()
    }
}

/// Payload field names per transition.
///
/// Nested kinds carry their parent (`transaction`) on collection actions.
fn fields_for(kind: ResourceKind, transition: Transition) -> Vec<&'static str> {
    let resource = kind.resource_key();
    let mut fields = Vec::new();

    match transition.operation() {
        Operation::GetCollection => {
            if kind.is_nested() {
                fields.push("transaction");
            }
            match transition.phase() {
                Phase::Request => {}
                Phase::Response => fields.push("json"),
                Phase::Failed => fields.push("errors"),
            }
        }
        Operation::GetResource => {
            fields.push(resource);
            match transition.phase() {
                Phase::Request => {}
                Phase::Response => fields.push("json"),
                Phase::Failed => fields.push("errors"),
            }
        }
        Operation::CreateResource => match transition.phase() {
            Phase::Request => fields.push("payload"),
            Phase::Response => fields.push("json"),
            Phase::Failed => fields.extend(["payload", "errors"]),
        },
        Operation::EditResource => {
            fields.push(resource);
            match transition.phase() {
                Phase::Request => fields.push("payload"),
                Phase::Response => fields.push("json"),
                Phase::Failed => fields.extend(["payload", "errors"]),
            }
        }
        Operation::RemoveResource => {
            fields.push(resource);
            if transition.phase() == Phase::Failed {
                fields.push("errors");
            }
        }
    }

    fields
}
