//! Query cache between the commands and the server.
//!
//! Every read is stored under a query key (`entity/param/...`) together with
//! the time it was fetched. A read younger than its entity's stale time is
//! answered from the cache. A successful mutation drops every key of the
//! entity it touched. The cache is kept in a JSON file so consecutive
//! invocations share it.

use std::collections::BTreeMap;
use std::future::Future;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Employees,
    Absences,
    CostCenters,
    Crews,
    Assignments,
    Timeline,
    Health,
}

impl Entity {
    /// First segment of every query key of this entity.
    pub fn prefix(&self) -> &'static str {
        match self {
            Entity::Employees => "mitarbeiter",
            Entity::Absences => "abwesenheiten",
            Entity::CostCenters => "kostenstellen",
            Entity::Crews => "kolonnen",
            Entity::Assignments => "zuweisungen",
            Entity::Timeline => "gantt",
            Entity::Health => "health",
        }
    }

    pub fn stale_time(&self) -> Duration {
        match self {
            Entity::Employees => Duration::minutes(5),
            Entity::Absences => Duration::minutes(2),
            Entity::CostCenters => Duration::minutes(10),
            Entity::Crews => Duration::minutes(5),
            Entity::Assignments => Duration::minutes(5),
            Entity::Timeline => Duration::minutes(5),
            Entity::Health => Duration::seconds(30),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryKey {
    pub entity: Entity,
    params: Vec<String>,
}

impl QueryKey {
    pub fn new(entity: Entity) -> Self {
        QueryKey {
            entity,
            params: Vec::new(),
        }
    }

    pub fn param(mut self, param: impl ToString) -> Self {
        self.params.push(param.to_string());
        self
    }

    fn as_string(&self) -> String {
        let mut key = self.entity.prefix().to_string();
        for param in &self.params {
            key.push('/');
            key.push_str(param);
        }
        key
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry {
    fetched_at: DateTime<Utc>,
    value: Value,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct QueryCache {
    entries: BTreeMap<String, Entry>,
    #[serde(skip)]
    path: Option<PathBuf>,
    #[serde(skip)]
    dirty: bool,
}

impl QueryCache {
    /// A cache that is never written to disk.
    pub fn in_memory() -> Self {
        QueryCache::default()
    }

    /// Load the cache file. A missing or unreadable file starts empty.
    pub fn load(path: &Path) -> Self {
        let mut cache = match std::fs::read_to_string(path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Discarding unreadable query cache");
                QueryCache::default()
            }),
            Err(_) => QueryCache::default(),
        };
        cache.path = Some(path.to_path_buf());
        cache
    }

    /// The cached value for `key` if it is still fresh at `now`.
    pub fn get<T: DeserializeOwned>(&self, key: &QueryKey, now: DateTime<Utc>) -> Option<T> {
        let entry = self.entries.get(&key.as_string())?;
        if now - entry.fetched_at >= key.entity.stale_time() {
            return None;
        }
        serde_json::from_value(entry.value.clone()).ok()
    }

    pub fn put<T: Serialize>(&mut self, key: &QueryKey, value: &T, now: DateTime<Utc>) {
        match serde_json::to_value(value) {
            Ok(value) => {
                self.entries.insert(
                    key.as_string(),
                    Entry {
                        fetched_at: now,
                        value,
                    },
                );
                self.dirty = true;
            }
            Err(e) => warn!(key = %key.as_string(), error = %e, "Not caching query"),
        }
    }

    /// Drop every key of `entity`. Returns how many were dropped.
    pub fn invalidate(&mut self, entity: Entity) -> usize {
        let prefix = entity.prefix();
        let before = self.entries.len();
        self.entries.retain(|key, _| {
            key.split('/').next() != Some(prefix)
        });

        let dropped = before - self.entries.len();
        if dropped > 0 {
            self.dirty = true;
            debug!(entity = prefix, dropped, "Invalidated queries");
        }
        dropped
    }

    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            self.entries.clear();
            self.dirty = true;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Write the cache back if anything changed and it has a file.
    pub fn save(&mut self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if !self.dirty {
            return Ok(());
        }

        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        let text = serde_json::to_string(self)?;
        std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;

        self.dirty = false;
        Ok(())
    }
}

/// Answer `key` from the cache, or run `fetch` and remember its result.
pub async fn cached<T, F, Fut>(
    cache: &mut QueryCache,
    key: QueryKey,
    now: DateTime<Utc>,
    fetch: F,
) -> Result<T>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    if let Some(value) = cache.get(&key, now) {
        debug!(key = %key.as_string(), "Cache hit");
        return Ok(value);
    }

    let value = fetch().await?;
    cache.put(&key, &value, now);
    Ok(value)
}
