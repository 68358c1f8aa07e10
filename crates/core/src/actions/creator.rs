use serde_json::{Map, Value};

/// An immutable description of an intended state transition: a type tag
/// plus named payload fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    action_type: String,
    fields: Map<String, Value>,
}

impl Action {
    pub fn new(action_type: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
            fields: Map::new(),
        }
    }

    /// An action no reducer recognizes; `reduce(None, &Action::empty())`
    /// yields the initial state.
    pub fn empty() -> Self {
        Self::new("")
    }

    /// Builder-style field setter. A field named `type` is ignored.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        let field = field.into();
        if field != "type" {
            self.fields.insert(field, value.into());
        }
        self
    }

    #[must_use]
    pub fn action_type(&self) -> &str {
        &self.action_type
    }

    #[must_use]
    pub fn is(&self, action_type: &str) -> bool {
        self.action_type == action_type
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Nested lookup: `action.path(&["json", "accounts"])`.
    #[must_use]
    pub fn path(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        rest.iter()
            .try_fold(self.fields.get(*first)?, |value, key| value.get(*key))
    }

    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// `{"type": tag, field: value, ...}`
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut object = self.fields.clone();
        object.insert("type".to_string(), Value::String(self.action_type.clone()));
        Value::Object(object)
    }
}

/// Builds [`Action`]s of one type from positional values.
///
/// `ActionCreator::new("EDIT_ACCOUNT_REQUEST", &["account", "payload"])`
/// turns `[a, p]` into `{type: "EDIT_ACCOUNT_REQUEST", account: a, payload: p}`.
/// No validation: missing values become `null`, extra values are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionCreator {
    action_type: String,
    fields: Vec<&'static str>,
}

impl ActionCreator {
    pub fn new(action_type: impl Into<String>, fields: &[&'static str]) -> Self {
        Self {
            action_type: action_type.into(),
            fields: fields.to_vec(),
        }
    }

    #[must_use]
    pub fn action_type(&self) -> &str {
        &self.action_type
    }

    #[must_use]
    pub fn field_names(&self) -> &[&'static str] {
        &self.fields
    }

    pub fn create<I>(&self, values: I) -> Action
    where
        I: IntoIterator<Item = Value>,
    {
        let mut values = values.into_iter();
        self.fields.iter().fold(Action::new(self.action_type.clone()), |action, field| {
            action.with(*field, values.next().unwrap_or(Value::Null))
        })
    }
}
