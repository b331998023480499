use serde::Serialize;

/// Result of fetching a list from the store. Unlike an empty list, `Failed`
/// means the data could not be read at all.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Fetched(Vec<T>),
    Failed(String),
}

impl<T, E: std::fmt::Display> From<Result<Vec<T>, E>> for FetchOutcome<T> {
    fn from(result: Result<Vec<T>, E>) -> Self {
        match result {
            Ok(items) => FetchOutcome::Fetched(items),
            Err(e) => FetchOutcome::Failed(e.to_string()),
        }
    }
}

/// Lifecycle of a list view: `Idle -> Loading -> Populated | Empty | Error`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "items", rename_all = "lowercase")]
pub enum ListState<T> {
    Idle,
    Loading,
    Populated(Vec<T>),
    Empty,
    Error(String),
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        ListState::Idle
    }
}

impl<T> ListState<T> {
    /// `Idle -> Loading` when a fetch is issued
    pub fn start(self) -> Self {
        match self {
            ListState::Idle => ListState::Loading,
            other => {
                tracing::warn!("ignoring start on list in state {}", other.name());
                other
            }
        }
    }

    /// Settle a loading list with the (already filtered) fetch outcome
    pub fn resolve(self, outcome: FetchOutcome<T>) -> Self {
        match self {
            ListState::Loading => match outcome {
                FetchOutcome::Fetched(items) if items.is_empty() => ListState::Empty,
                FetchOutcome::Fetched(items) => ListState::Populated(items),
                FetchOutcome::Failed(reason) => ListState::Error(reason),
            },
            other => {
                tracing::warn!("ignoring fetch result on list in state {}", other.name());
                other
            }
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ListState::Populated(_) | ListState::Empty | ListState::Error(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            ListState::Idle => "idle",
            ListState::Loading => "loading",
            ListState::Populated(_) => "populated",
            ListState::Empty => "empty",
            ListState::Error(_) => "error",
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            ListState::Populated(items) => items,
            _ => &[],
        }
    }
}
