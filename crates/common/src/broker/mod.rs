pub mod keys;
pub mod redis_broker;

use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::Stream;

use crate::error::Result;

pub type PayloadStream = Pin<Box<dyn Stream<Item = String> + Send>>;

/// The minimal substrate (§4.2) the rest of the system is built on: atomic
/// list push/blocking pop, pub/sub, and string keys with TTL plus pattern
/// scan. `RedisBroker` is the only implementation shipped, but the
/// dispatcher, worker runtime and merger only ever depend on this trait,
/// so tests can substitute an in-process fake.
#[async_trait]
pub trait BrokerClient: Send + Sync {
    async fn enqueue_task(&self, worker_id: &str, payload: &str) -> Result<()>;

    /// Blocking pop with a timeout; `Ok(None)` means the timeout elapsed
    /// with nothing to dequeue, not an error.
    async fn blocking_dequeue(&self, worker_id: &str, timeout: Duration) -> Result<Option<String>>;

    async fn queue_length(&self, worker_id: &str) -> Result<u64>;

    async fn publish(&self, channel: &str, payload: &str) -> Result<()>;

    async fn subscribe(&self, channel: &str) -> Result<PayloadStream>;

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn keys_matching(&self, pattern: &str) -> Result<Vec<String>>;

    /// Remaining time-to-live in seconds; `None` if the key is absent or
    /// carries no TTL.
    async fn ttl(&self, key: &str) -> Result<Option<i64>>;
}
