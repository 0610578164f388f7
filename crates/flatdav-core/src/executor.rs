//! Storage execution
//!
//! Runs a parsed [`Operation`] against an [`ObjectStore`]. MOVE is a copy
//! followed by a delete and is not atomic: if the delete fails, the copy
//! stays in place and the delete's error is returned.

use crate::op::Operation;
use crate::store::{ObjectStore, StoreOutput, StoreResult};
use tracing::debug;

/// Status reported for a completed MOVE
pub const MOVE_STATUS: u16 = 201;

/// Execute one operation
pub async fn execute<S>(store: &S, op: Operation) -> StoreResult
where
    S: ObjectStore + ?Sized,
{
    match op {
        Operation::Get { key } => store.get(&key).await,
        Operation::Delete { key } => {
            let out = store.delete(&key).await?;
            Ok(StoreOutput { body: None, ..out })
        }
        Operation::Put { key, body } => {
            let out = store.put(&key, body).await?;
            Ok(StoreOutput { body: None, ..out })
        }
        Operation::Move { from, to } => {
            store.copy(&from, &to).await?;
            debug!(from = %from, to = %to, "copied, removing source");
            store.delete(&from).await?;
            Ok(StoreOutput::status(MOVE_STATUS))
        }
    }
}
