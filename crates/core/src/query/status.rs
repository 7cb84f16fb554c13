use serde_json::Value;

use super::error::QueryError;

/// Lifecycle position of a single query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Idle,
    Loading,
    Error,
    Success,
}

/// The current snapshot of one registered query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState {
    /// Registered but not allowed to execute.
    Idle,
    /// The authoritative fetch is in flight.
    Loading,
    Success(Value),
    Error(QueryError),
}

impl QueryState {
    pub fn status(&self) -> QueryStatus {
        match self {
            Self::Idle => QueryStatus::Idle,
            Self::Loading => QueryStatus::Loading,
            Self::Success(_) => QueryStatus::Success,
            Self::Error(_) => QueryStatus::Error,
        }
    }

    pub fn data(&self) -> Option<&Value> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn into_data(self) -> Option<Value> {
        match self {
            Self::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&QueryError> {
        match self {
            Self::Error(error) => Some(error),
            _ => None,
        }
    }
}

/// The combined view over several independent query states.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateState {
    pub status: QueryStatus,
    /// Every individual error, in input order. Never reduced to the first
    /// one; a consumer may need to report on more than one failed resource.
    pub errors: Vec<QueryError>,
}

/// Combines independent query states into one status.
///
/// Precedence: any error wins, then all-success, then any-loading, then
/// idle. A mix like `[Success, Idle]` therefore aggregates to `Idle` - the
/// combined view only settles once every member has resolved.
pub fn aggregate(states: &[QueryState]) -> AggregateState {
    let errors: Vec<QueryError> = states
        .iter()
        .filter_map(|state| state.error().cloned())
        .collect();

    let status = if !errors.is_empty() {
        QueryStatus::Error
    } else if states
        .iter()
        .all(|state| state.status() == QueryStatus::Success)
    {
        QueryStatus::Success
    } else if states
        .iter()
        .any(|state| state.status() == QueryStatus::Loading)
    {
        QueryStatus::Loading
    } else {
        QueryStatus::Idle
    };

    AggregateState { status, errors }
}
