use serde::{Deserialize, Serialize};
use serde_json::Value;

use repertoire_core::query::QueryKey;

/// One resolved cache slot in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DehydratedQuery {
    pub key: QueryKey,
    pub data: Value,
}

/// A serializable snapshot of every resolved cache slot.
///
/// Produced on the server after prefetching, shipped in the page payload,
/// and adopted by the client cache before first use. Only successful
/// results are captured; failed prefetches leave their slot empty so the
/// client retries them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DehydratedState {
    pub queries: Vec<DehydratedQuery>,
}

impl DehydratedState {
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repertoire_core::query::{derive_key, Arguments, BaseKey};
    use serde_json::json;

    #[test]
    fn snapshot_round_trips_through_serde() {
        let key = derive_key(
            &BaseKey::from("events"),
            Some(&Arguments::new().set("page", 1)),
        );
        let state = DehydratedState {
            queries: vec![DehydratedQuery {
                key,
                data: json!({"events": []}),
            }],
        };

        let payload = serde_json::to_string(&state).unwrap();
        let restored: DehydratedState = serde_json::from_str(&payload).unwrap();

        assert_eq!(state, restored);
    }

    #[test]
    fn uuid_shaped_text_argument_survives_the_snapshot_payload() {
        // The client derives its key from the same string-typed argument
        // the server saw; the shipped payload must preserve that identity
        // so the hydrated slot is actually hit.
        let key = derive_key(
            &BaseKey::from("events"),
            Some(&Arguments::new().set("id", "550e8400-e29b-41d4-a716-446655440000")),
        );
        let state = DehydratedState {
            queries: vec![DehydratedQuery {
                key: key.clone(),
                data: json!({"id": 7}),
            }],
        };

        let payload = serde_json::to_string(&state).unwrap();
        let restored: DehydratedState = serde_json::from_str(&payload).unwrap();

        assert_eq!(restored.queries[0].key, key);
    }

    #[test]
    fn empty_snapshot_reports_empty() {
        assert!(DehydratedState::default().is_empty());
        assert_eq!(DehydratedState::default().len(), 0);
    }
}
