//! Redis ephemeral store implementation.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;

use flock_core::error::{AppError, ErrorKind};
use flock_core::result::AppResult;
use flock_core::traits::store::EphemeralStore;

use super::client::RedisClient;

/// Redis-backed ephemeral store.
#[derive(Debug, Clone)]
pub struct RedisStore {
    /// Redis client.
    client: RedisClient,
}

impl RedisStore {
    /// Create a new Redis store.
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    /// Map a Redis error to an AppError.
    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::Cache, format!("Redis error: {e}"), e)
    }
}

#[async_trait]
impl EphemeralStore for RedisStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let result: Option<String> = conn.get(&full_key).await.map_err(Self::map_err)?;
        Ok(result)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> AppResult<()> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        match ttl {
            Some(ttl) => {
                let _: () = conn
                    .set_ex(&full_key, value, ttl.as_secs())
                    .await
                    .map_err(Self::map_err)?;
            }
            None => {
                let _: () = conn.set(&full_key, value).await.map_err(Self::map_err)?;
            }
        }
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let _: () = conn.del(&full_key).await.map_err(Self::map_err)?;
        Ok(())
    }

    async fn incr(&self, key: &str) -> AppResult<i64> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let result: i64 = conn.incr(&full_key, 1i64).await.map_err(Self::map_err)?;
        Ok(result)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let result: bool = conn
            .expire(&full_key, ttl.as_secs() as i64)
            .await
            .map_err(Self::map_err)?;
        Ok(result)
    }

    async fn list_push_front(&self, key: &str, value: &str) -> AppResult<i64> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let len: i64 = conn.lpush(&full_key, value).await.map_err(Self::map_err)?;
        Ok(len)
    }

    async fn list_pop_back(&self, key: &str) -> AppResult<Option<String>> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let popped: Option<String> = conn.rpop(&full_key, None).await.map_err(Self::map_err)?;
        Ok(popped)
    }

    async fn list_remove(&self, key: &str, value: &str) -> AppResult<i64> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        // count = 0 removes every occurrence.
        let removed: i64 = conn
            .lrem(&full_key, 0, value)
            .await
            .map_err(Self::map_err)?;
        Ok(removed)
    }

    async fn list_trim(&self, key: &str, start: i64, stop: i64) -> AppResult<()> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let _: () = conn
            .ltrim(&full_key, start as isize, stop as isize)
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn list_range(&self, key: &str, start: i64, stop: i64) -> AppResult<Vec<String>> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let items: Vec<String> = conn
            .lrange(&full_key, start as isize, stop as isize)
            .await
            .map_err(Self::map_err)?;
        Ok(items)
    }

    async fn list_len(&self, key: &str) -> AppResult<i64> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let len: i64 = conn.llen(&full_key).await.map_err(Self::map_err)?;
        Ok(len)
    }

    async fn set_add(&self, key: &str, member: &str) -> AppResult<bool> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let added: bool = conn.sadd(&full_key, member).await.map_err(Self::map_err)?;
        Ok(added)
    }

    async fn set_remove(&self, key: &str, member: &str) -> AppResult<bool> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let removed: bool = conn.srem(&full_key, member).await.map_err(Self::map_err)?;
        Ok(removed)
    }

    async fn set_members(&self, key: &str) -> AppResult<Vec<String>> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let members: Vec<String> = conn.smembers(&full_key).await.map_err(Self::map_err)?;
        Ok(members)
    }

    async fn set_contains(&self, key: &str, member: &str) -> AppResult<bool> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let is_member: bool = conn
            .sismember(&full_key, member)
            .await
            .map_err(Self::map_err)?;
        Ok(is_member)
    }

    async fn hash_set(&self, key: &str, field: &str, value: &str) -> AppResult<()> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let _: i64 = conn
            .hset(&full_key, field, value)
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn hash_get(&self, key: &str, fields: &[String]) -> AppResult<Vec<Option<String>>> {
        if fields.is_empty() {
            return Ok(Vec::new());
        }
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let values: Vec<Option<String>> = redis::cmd("HMGET")
            .arg(&full_key)
            .arg(fields)
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(values)
    }

    async fn hash_remove(&self, key: &str, field: &str) -> AppResult<()> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let _: i64 = conn.hdel(&full_key, field).await.map_err(Self::map_err)?;
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.conn_mut();
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(Self::map_err)?;
        Ok(pong == "PONG")
    }
}
