use serde::{Deserialize, Serialize};

/// Lifecycle phase of a resource collection.
///
/// Reflects only the most recently initiated operation. It is not a queue:
/// two operations on the same collection overwrite each other's status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    /// Nothing requested yet
    #[default]
    Initial,
    Fetching,
    FetchDone,
    Creating,
    CreateDone,
    Editing,
    EditDone,
    Removing,
    RemoveDone,
    /// The last operation was rejected; see the collection's `errors`
    Failed,
}

impl Status {
    /// True while a request is on the wire.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            Status::Fetching | Status::Creating | Status::Editing | Status::Removing
        )
    }

    /// True for the `*_DONE` phases.
    #[must_use]
    pub fn is_done(&self) -> bool {
        matches!(
            self,
            Status::FetchDone | Status::CreateDone | Status::EditDone | Status::RemoveDone
        )
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Initial => "INITIAL",
            Status::Fetching => "FETCHING",
            Status::FetchDone => "FETCH_DONE",
            Status::Creating => "CREATING",
            Status::CreateDone => "CREATE_DONE",
            Status::Editing => "EDITING",
            Status::EditDone => "EDIT_DONE",
            Status::Removing => "REMOVING",
            Status::RemoveDone => "REMOVE_DONE",
            Status::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
