use std::time::Duration;

use futures_util::StreamExt;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::error::{Error, Result};

use super::{BrokerClient, PayloadStream};

/// Typed wrapper over a Redis-compatible broker. This is the only place in
/// the crate that touches the `redis` client directly; every other
/// component talks to [`BrokerClient`].
pub struct RedisBroker {
    client: redis::Client,
    conn: ConnectionManager,
}

impl RedisBroker {
    pub async fn connect(host: &str, port: u16) -> Result<Self> {
        let url = format!("redis://{host}:{port}");
        let client = redis::Client::open(url)?;
        let conn = client.get_connection_manager().await?;
        Ok(RedisBroker { client, conn })
    }

    /// Connects with exponential backoff up to `max_attempts`, per the
    /// Coordinator boot sequence (§4.9): the process does not start
    /// serving requests until the broker is reachable.
    pub async fn connect_with_backoff(host: &str, port: u16, max_attempts: u32) -> Result<Self> {
        let mut attempt = 0u32;
        loop {
            match Self::connect(host, port).await {
                Ok(broker) => return Ok(broker),
                Err(err) if attempt + 1 >= max_attempts => return Err(err),
                Err(err) => {
                    let backoff = Duration::from_millis(200 * 2u64.pow(attempt.min(8)));
                    tracing::warn!(
                        attempt,
                        error = %err,
                        backoff_ms = backoff.as_millis() as u64,
                        "broker unreachable, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl BrokerClient for RedisBroker {
    async fn enqueue_task(&self, worker_id: &str, payload: &str) -> Result<()> {
        let key = super::keys::task_queue_key(worker_id);
        let mut conn = self.conn.clone();
        conn.rpush::<_, _, ()>(key, payload).await?;
        Ok(())
    }

    async fn blocking_dequeue(&self, worker_id: &str, timeout: Duration) -> Result<Option<String>> {
        let key = super::keys::task_queue_key(worker_id);
        let mut conn = self.conn.clone();
        let reply: Option<(String, String)> = redis::cmd("BLPOP")
            .arg(key)
            .arg(timeout.as_secs_f64())
            .query_async(&mut conn)
            .await?;
        Ok(reply.map(|(_key, payload)| payload))
    }

    async fn queue_length(&self, worker_id: &str) -> Result<u64> {
        let key = super::keys::task_queue_key(worker_id);
        let mut conn = self.conn.clone();
        let len: u64 = conn.llen(key).await?;
        Ok(len)
    }

    async fn publish(&self, channel: &str, payload: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.publish::<_, _, ()>(channel, payload).await?;
        Ok(())
    }

    async fn subscribe(&self, channel: &str) -> Result<PayloadStream> {
        let mut pubsub = self.client.get_async_pubsub().await?;
        pubsub.subscribe(channel).await?;

        let stream = pubsub
            .into_on_message()
            .filter_map(|msg| async move { msg.get_payload::<String>().ok() });

        Ok(Box::pin(stream))
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl.as_secs().max(1))
            .await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn keys_matching(&self, pattern: &str) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        let mut found = Vec::new();
        let mut iter: redis::AsyncIter<'_, String> = conn.scan_match(pattern).await?;
        while let Some(key) = iter.next_item().await {
            found.push(key.map_err(Error::from)?);
        }
        Ok(found)
    }

    async fn ttl(&self, key: &str) -> Result<Option<i64>> {
        let mut conn = self.conn.clone();
        let seconds: i64 = conn.ttl(key).await?;
        // Redis reports -2 for "key absent" and -1 for "no expiry set".
        Ok(if seconds >= 0 { Some(seconds) } else { None })
    }
}
