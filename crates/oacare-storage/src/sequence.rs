//! Monotonic code allocation.
//!
//! All counters live in one small JSON object updated with compare-and-swap
//! on its ETag, so concurrent writers (several Lambda instances included)
//! never hand out the same code twice.

use std::collections::BTreeMap;

use oacare_core::ids::CodeKind;
use oacare_core::keys;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StorageError;
use crate::state::{create_state, load_state, save_state_if_match};
use crate::store::ObjectStore;

const MAX_ATTEMPTS: usize = 16;

#[derive(Debug, Default, Serialize, Deserialize)]
struct Sequences {
    #[serde(flatten)]
    counters: BTreeMap<String, u64>,
}

impl Sequences {
    fn bump(&mut self, name: &str) -> u64 {
        let counter = self.counters.entry(name.to_string()).or_default();
        *counter += 1;
        *counter
    }
}

/// Allocate the next number for `kind`, starting at 1.
pub async fn next_number(store: &dyn ObjectStore, kind: CodeKind) -> Result<u64, StorageError> {
    let name = kind.sequence_name();

    for attempt in 1..=MAX_ATTEMPTS {
        let outcome = match load_state::<Sequences>(store, keys::SEQUENCES).await {
            Ok((mut sequences, etag)) => {
                let n = sequences.bump(name);
                save_state_if_match(store, keys::SEQUENCES, &sequences, &etag)
                    .await
                    .map(|_| n)
            }
            Err(StorageError::NotFound { .. }) => {
                let mut sequences = Sequences::default();
                let n = sequences.bump(name);
                create_state(store, keys::SEQUENCES, &sequences).await.map(|_| n)
            }
            Err(e) => return Err(e),
        };

        match outcome {
            Ok(n) => return Ok(n),
            Err(StorageError::PreconditionFailed { .. }) => {
                debug!(sequence = name, attempt, "sequence write raced, retrying");
            }
            Err(e) => return Err(e),
        }
    }

    Err(StorageError::SequenceContention {
        name,
        attempts: MAX_ATTEMPTS,
    })
}

/// Allocate the next formatted code, e.g. `ELD007`.
pub async fn next_code(store: &dyn ObjectStore, kind: CodeKind) -> Result<String, StorageError> {
    next_number(store, kind).await.map(|n| kind.format(n))
}
