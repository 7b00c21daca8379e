//! In-memory ephemeral store implementation.
//!
//! Entries live in a `DashMap`; each key holds one typed value (scalar,
//! list, set, or hash) plus an optional expiry instant. Expired entries are
//! treated as absent and purged lazily on access. Shard locking in the map
//! makes every single-key operation atomic.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use flock_core::error::AppError;
use flock_core::result::AppResult;
use flock_core::traits::store::EphemeralStore;

/// In-memory ephemeral store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<DashMap<String, Entry>>,
}

#[derive(Debug)]
struct Entry {
    value: Value,
    expires_at: Option<Instant>,
}

#[derive(Debug)]
enum Value {
    Scalar(String),
    List(VecDeque<String>),
    Set(HashSet<String>),
    Hash(HashMap<String, String>),
}

impl Entry {
    fn new(value: Value) -> Self {
        Self {
            value,
            expires_at: None,
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Instant::now())
    }
}

impl Value {
    fn is_empty_collection(&self) -> bool {
        match self {
            Value::Scalar(_) => false,
            Value::List(l) => l.is_empty(),
            Value::Set(s) => s.is_empty(),
            Value::Hash(h) => h.is_empty(),
        }
    }
}

fn wrong_type(key: &str) -> AppError {
    AppError::cache(format!(
        "Operation against key '{key}' holding the wrong kind of value"
    ))
}

/// Normalize a possibly-negative index against a list length.
fn resolve_index(index: i64, len: usize) -> i64 {
    if index < 0 { len as i64 + index } else { index }
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` against a live (present, unexpired) entry.
    fn with_live<R>(&self, key: &str, f: impl FnOnce(&Value) -> R) -> Option<R> {
        let guard = self.entries.get(key)?;
        if guard.is_expired() {
            drop(guard);
            self.entries.remove_if(key, |_, e| e.is_expired());
            return None;
        }
        Some(f(&guard.value))
    }

    /// Run `f` against a mutable entry, creating it with `make` when absent
    /// or expired.
    fn with_mut<R>(
        &self,
        key: &str,
        make: impl Fn() -> Value,
        f: impl FnOnce(&mut Entry) -> AppResult<R>,
    ) -> AppResult<R> {
        let mut guard = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Entry::new(make()));
        if guard.is_expired() {
            *guard = Entry::new(make());
        }
        f(&mut guard)
    }

    /// Drop a key whose collection became empty, matching Redis semantics.
    fn drop_if_empty(&self, key: &str) {
        self.entries
            .remove_if(key, |_, e| e.value.is_empty_collection());
    }
}

#[async_trait]
impl EphemeralStore for MemoryStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self
            .with_live(key, |v| match v {
                Value::Scalar(s) => Ok(s.clone()),
                _ => Err(wrong_type(key)),
            })
            .transpose()?)
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> AppResult<()> {
        self.entries.insert(
            key.to_string(),
            Entry {
                value: Value::Scalar(value.to_string()),
                expires_at: ttl.map(|d| Instant::now() + d),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    async fn incr(&self, key: &str) -> AppResult<i64> {
        self.with_mut(
            key,
            || Value::Scalar("0".to_string()),
            |entry| match &mut entry.value {
                Value::Scalar(s) => {
                    let current: i64 = s.parse().map_err(|_| {
                        AppError::cache(format!("Value at '{key}' is not an integer"))
                    })?;
                    let next = current + 1;
                    *s = next.to_string();
                    Ok(next)
                }
                _ => Err(wrong_type(key)),
            },
        )
    }

    async fn expire(&self, key: &str, ttl: Duration) -> AppResult<bool> {
        match self.entries.get_mut(key) {
            Some(mut guard) if !guard.is_expired() => {
                guard.expires_at = Some(Instant::now() + ttl);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_push_front(&self, key: &str, value: &str) -> AppResult<i64> {
        self.with_mut(
            key,
            || Value::List(VecDeque::new()),
            |entry| match &mut entry.value {
                Value::List(list) => {
                    list.push_front(value.to_string());
                    Ok(list.len() as i64)
                }
                _ => Err(wrong_type(key)),
            },
        )
    }

    async fn list_pop_back(&self, key: &str) -> AppResult<Option<String>> {
        let popped = match self.entries.get_mut(key) {
            Some(mut guard) if !guard.is_expired() => match &mut guard.value {
                Value::List(list) => list.pop_back(),
                _ => return Err(wrong_type(key)),
            },
            _ => None,
        };
        self.drop_if_empty(key);
        Ok(popped)
    }

    async fn list_remove(&self, key: &str, value: &str) -> AppResult<i64> {
        let removed = match self.entries.get_mut(key) {
            Some(mut guard) if !guard.is_expired() => match &mut guard.value {
                Value::List(list) => {
                    let before = list.len();
                    list.retain(|v| v != value);
                    (before - list.len()) as i64
                }
                _ => return Err(wrong_type(key)),
            },
            _ => 0,
        };
        self.drop_if_empty(key);
        Ok(removed)
    }

    async fn list_trim(&self, key: &str, start: i64, stop: i64) -> AppResult<()> {
        if let Some(mut guard) = self.entries.get_mut(key) {
            if !guard.is_expired() {
                match &mut guard.value {
                    Value::List(list) => {
                        let len = list.len();
                        let start = resolve_index(start, len).max(0) as usize;
                        let stop = resolve_index(stop, len);
                        if stop < start as i64 {
                            list.clear();
                        } else {
                            let stop = (stop as usize).min(len.saturating_sub(1));
                            list.truncate(stop + 1);
                            for _ in 0..start {
                                list.pop_front();
                            }
                        }
                    }
                    _ => return Err(wrong_type(key)),
                }
            }
        }
        self.drop_if_empty(key);
        Ok(())
    }

    async fn list_range(&self, key: &str, start: i64, stop: i64) -> AppResult<Vec<String>> {
        Ok(self
            .with_live(key, |v| match v {
                Value::List(list) => {
                    let len = list.len();
                    let start = resolve_index(start, len).max(0) as usize;
                    let stop = resolve_index(stop, len);
                    if len == 0 || start >= len || stop < start as i64 {
                        return Ok(Vec::new());
                    }
                    let stop = (stop as usize).min(len - 1);
                    Ok(list.iter().skip(start).take(stop + 1 - start).cloned().collect())
                }
                _ => Err(wrong_type(key)),
            })
            .transpose()?
            .unwrap_or_default())
    }

    async fn list_len(&self, key: &str) -> AppResult<i64> {
        Ok(self
            .with_live(key, |v| match v {
                Value::List(list) => Ok(list.len() as i64),
                _ => Err(wrong_type(key)),
            })
            .transpose()?
            .unwrap_or(0))
    }

    async fn set_add(&self, key: &str, member: &str) -> AppResult<bool> {
        self.with_mut(
            key,
            || Value::Set(HashSet::new()),
            |entry| match &mut entry.value {
                Value::Set(set) => Ok(set.insert(member.to_string())),
                _ => Err(wrong_type(key)),
            },
        )
    }

    async fn set_remove(&self, key: &str, member: &str) -> AppResult<bool> {
        let removed = match self.entries.get_mut(key) {
            Some(mut guard) if !guard.is_expired() => match &mut guard.value {
                Value::Set(set) => set.remove(member),
                _ => return Err(wrong_type(key)),
            },
            _ => false,
        };
        self.drop_if_empty(key);
        Ok(removed)
    }

    async fn set_members(&self, key: &str) -> AppResult<Vec<String>> {
        Ok(self
            .with_live(key, |v| match v {
                Value::Set(set) => Ok(set.iter().cloned().collect()),
                _ => Err(wrong_type(key)),
            })
            .transpose()?
            .unwrap_or_default())
    }

    async fn set_contains(&self, key: &str, member: &str) -> AppResult<bool> {
        Ok(self
            .with_live(key, |v| match v {
                Value::Set(set) => Ok(set.contains(member)),
                _ => Err(wrong_type(key)),
            })
            .transpose()?
            .unwrap_or(false))
    }

    async fn hash_set(&self, key: &str, field: &str, value: &str) -> AppResult<()> {
        self.with_mut(
            key,
            || Value::Hash(HashMap::new()),
            |entry| match &mut entry.value {
                Value::Hash(hash) => {
                    hash.insert(field.to_string(), value.to_string());
                    Ok(())
                }
                _ => Err(wrong_type(key)),
            },
        )
    }

    async fn hash_get(&self, key: &str, fields: &[String]) -> AppResult<Vec<Option<String>>> {
        Ok(self
            .with_live(key, |v| match v {
                Value::Hash(hash) => Ok(fields.iter().map(|f| hash.get(f).cloned()).collect()),
                _ => Err(wrong_type(key)),
            })
            .transpose()?
            .unwrap_or_else(|| vec![None; fields.len()]))
    }

    async fn hash_remove(&self, key: &str, field: &str) -> AppResult<()> {
        if let Some(mut guard) = self.entries.get_mut(key) {
            if !guard.is_expired() {
                match &mut guard.value {
                    Value::Hash(hash) => {
                        hash.remove(field);
                    }
                    _ => return Err(wrong_type(key)),
                }
            }
        }
        self.drop_if_empty(key);
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
