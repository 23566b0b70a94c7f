use anyhow::Result;
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::Client as RedisClient;

/// Tells the presentation layer that data behind `path` changed.
#[async_trait]
pub trait Invalidator: Send + Sync {
    async fn invalidate(&self, path: &str) -> Result<()>;
}

/// Publishes invalidated paths on a Redis pub/sub channel for the web tier to refetch.
/// One multiplexed connection is opened at startup and shared by every call.
pub struct RedisInvalidator {
    conn: MultiplexedConnection,
    channel: String,
}

impl RedisInvalidator {
    pub async fn connect(client: &RedisClient, channel: impl Into<String>) -> Result<Self> {
        let conn = client.get_multiplexed_async_connection().await?;
        Ok(Self {
            conn,
            channel: channel.into(),
        })
    }
}

#[async_trait]
impl Invalidator for RedisInvalidator {
    async fn invalidate(&self, path: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        redis::cmd("PUBLISH")
            .arg(&self.channel)
            .arg(path)
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }
}
