//! In-memory data source
//!
//! Keeps every user's entries, foods and tags in process memory behind a
//! Tokio `RwLock`. Ids come from one counter per user, so they increase
//! with insertion across all of that user's collections.
//!
//! Used by the demo binary, the API server and tests; nothing is persisted.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::metric::TrackedMetric;
use crate::pagination::CursorKey;
use crate::range::DateRange;
use crate::series::RawMetricRecord;
use crate::source::types::{FoodItem, LogEntry, NewEntry, NewFood, Tag};
use crate::source::{DataSource, SourceError, SourceResult};

/// Everything one user has recorded
#[derive(Debug, Default)]
struct UserData {
    last_id: i64,
    entries: Vec<LogEntry>,
    foods: Vec<FoodItem>,
    tags: Vec<Tag>,
}

impl UserData {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

/// Summary counts across all users
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub users: usize,
    pub entries: usize,
    pub foods: usize,
    pub tags: usize,
}

impl std::fmt::Display for StoreStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "users={}, entries={}, foods={}, tags={}",
            self.users, self.entries, self.foods, self.tags
        )
    }
}

/// Process-local `DataSource`
#[derive(Debug, Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<String, UserData>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn stats(&self) -> StoreStats {
        let users = self.users.read().await;
        users.values().fold(
            StoreStats {
                users: users.len(),
                ..Default::default()
            },
            |mut stats, data| {
                stats.entries += data.entries.len();
                stats.foods += data.foods.len();
                stats.tags += data.tags.len();
                stats
            },
        )
    }
}

fn validate_entry(entry: &NewEntry) -> SourceResult<()> {
    if !entry.value.is_finite() || entry.value < 0.0 {
        return Err(SourceError::InvalidInput(format!(
            "{} value must be a non-negative number, got {}",
            entry.metric, entry.value
        )));
    }
    if entry.metric == TrackedMetric::Weight && entry.value == 0.0 {
        return Err(SourceError::InvalidInput(
            "weight must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

fn validate_name(kind: &str, name: &str) -> SourceResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(SourceError::InvalidInput(format!(
            "{} name cannot be empty",
            kind
        )));
    }
    if name.chars().count() > 100 {
        return Err(SourceError::InvalidInput(format!(
            "{} name exceeds maximum length of 100 characters",
            kind
        )));
    }
    Ok(name.to_string())
}

/// Id bound from an id cursor; other key kinds mean "from the start"
fn id_bound(after: Option<CursorKey>) -> Option<i64> {
    match after {
        Some(CursorKey::Id(id)) => Some(id),
        _ => None,
    }
}

#[async_trait]
impl DataSource for InMemoryStore {
    async fn metric_records(
        &self,
        user_id: &str,
        metric: TrackedMetric,
        range: &DateRange,
    ) -> SourceResult<Vec<RawMetricRecord>> {
        let users = self.users.read().await;
        let records = users
            .get(user_id)
            .map(|data| {
                data.entries
                    .iter()
                    .filter(|e| e.metric == metric && range.contains(e.date))
                    .map(LogEntry::to_record)
                    .collect()
            })
            .unwrap_or_default();
        Ok(records)
    }

    async fn foods_after(
        &self,
        user_id: &str,
        after: Option<CursorKey>,
        fetch: usize,
    ) -> SourceResult<Vec<FoodItem>> {
        let bound = id_bound(after);
        let users = self.users.read().await;
        let foods = users
            .get(user_id)
            .map(|data| {
                data.foods
                    .iter()
                    .rev()
                    .filter(|f| bound.map_or(true, |b| f.id < b))
                    .take(fetch)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(foods)
    }

    async fn tags_after(
        &self,
        user_id: &str,
        after: Option<CursorKey>,
        fetch: usize,
    ) -> SourceResult<Vec<Tag>> {
        let bound = id_bound(after);
        let users = self.users.read().await;
        let tags = users
            .get(user_id)
            .map(|data| {
                data.tags
                    .iter()
                    .filter(|t| bound.map_or(true, |b| t.id > b))
                    .take(fetch)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(tags)
    }

    async fn entries_after(
        &self,
        user_id: &str,
        after: Option<CursorKey>,
        fetch: usize,
    ) -> SourceResult<Vec<LogEntry>> {
        let bound = match after {
            Some(key @ CursorKey::Timestamped { .. }) => Some(key),
            _ => None,
        };

        let users = self.users.read().await;
        let Some(data) = users.get(user_id) else {
            return Ok(Vec::new());
        };

        // recorded_at is client-supplied, so insertion order is not feed order
        let mut entries: Vec<&LogEntry> = data
            .entries
            .iter()
            .filter(|e| bound.map_or(true, |b| e.cursor_key() < b))
            .collect();
        entries.sort_by(|a, b| b.cursor_key().cmp(&a.cursor_key()));

        Ok(entries.into_iter().take(fetch).cloned().collect())
    }

    async fn log_metric(&self, user_id: &str, entry: NewEntry) -> SourceResult<LogEntry> {
        validate_entry(&entry)?;

        let mut users = self.users.write().await;
        let data = users.entry(user_id.to_string()).or_default();
        let logged = LogEntry {
            id: data.next_id(),
            metric: entry.metric,
            date: entry.date,
            value: entry.value,
            recorded_at: entry.recorded_at,
        };
        data.entries.push(logged.clone());

        tracing::debug!(user_id, metric = %logged.metric, id = logged.id, "Logged metric value");
        Ok(logged)
    }

    async fn create_food(&self, user_id: &str, food: NewFood) -> SourceResult<FoodItem> {
        let name = validate_name("food", &food.name)?;
        if !food.kcal_per_serving.is_finite() || food.kcal_per_serving < 0.0 {
            return Err(SourceError::InvalidInput(format!(
                "kcalPerServing must be a non-negative number, got {}",
                food.kcal_per_serving
            )));
        }

        let mut users = self.users.write().await;
        let data = users.entry(user_id.to_string()).or_default();
        let item = FoodItem {
            id: data.next_id(),
            name,
            kcal_per_serving: food.kcal_per_serving,
            serving_size: food.serving_size,
            created_at: Utc::now().timestamp_millis(),
        };
        data.foods.push(item.clone());

        tracing::debug!(user_id, id = item.id, "Created food");
        Ok(item)
    }

    async fn create_tag(&self, user_id: &str, name: &str) -> SourceResult<Tag> {
        let name = validate_name("tag", name)?;

        let mut users = self.users.write().await;
        let data = users.entry(user_id.to_string()).or_default();
        if data
            .tags
            .iter()
            .any(|t| t.name.to_lowercase() == name.to_lowercase())
        {
            return Err(SourceError::Conflict(format!("tag '{}' already exists", name)));
        }

        let tag = Tag {
            id: data.next_id(),
            name,
            created_at: Utc::now().timestamp_millis(),
        };
        data.tags.push(tag.clone());

        tracing::debug!(user_id, id = tag.id, "Created tag");
        Ok(tag)
    }

    async fn ping(&self) -> SourceResult<()> {
        let _users = self.users.read().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn food(name: &str) -> NewFood {
        NewFood {
            name: name.to_string(),
            kcal_per_serving: 100.0,
            serving_size: None,
        }
    }

    #[tokio::test]
    async fn test_metric_records_filtered_by_metric_and_range() {
        let store = InMemoryStore::new();
        store
            .log_metric("u", NewEntry::new(TrackedMetric::Water, date(1), 250.0, 1))
            .await
            .unwrap();
        store
            .log_metric("u", NewEntry::new(TrackedMetric::Water, date(5), 250.0, 2))
            .await
            .unwrap();
        store
            .log_metric("u", NewEntry::new(TrackedMetric::Weight, date(1), 70.0, 3))
            .await
            .unwrap();
        store
            .log_metric("other", NewEntry::new(TrackedMetric::Water, date(1), 999.0, 4))
            .await
            .unwrap();

        let range = DateRange::try_new(date(1), date(3)).unwrap();
        let records = store
            .metric_records("u", TrackedMetric::Water, &range)
            .await
            .unwrap();

        assert_eq!(records, vec![RawMetricRecord::new(date(1), 250.0, 1)]);

        let none = store
            .metric_records("nobody", TrackedMetric::Water, &range)
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_ids_increase_across_collections() {
        let store = InMemoryStore::new();
        let a = store.create_food("u", food("oats")).await.unwrap();
        let b = store.create_tag("u", "breakfast").await.unwrap();
        let c = store
            .log_metric("u", NewEntry::new(TrackedMetric::Water, date(1), 1.0, 1))
            .await
            .unwrap();

        assert_eq!((a.id, b.id, c.id), (1, 2, 3));
    }

    #[tokio::test]
    async fn test_foods_newest_first_after_cursor() {
        let store = InMemoryStore::new();
        for name in ["a", "b", "c", "d"] {
            store.create_food("u", food(name)).await.unwrap();
        }

        let first: Vec<_> = store
            .foods_after("u", None, 2)
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.id)
            .collect();
        assert_eq!(first, vec![4, 3]);

        let next: Vec<_> = store
            .foods_after("u", Some(CursorKey::Id(3)), 10)
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.id)
            .collect();
        assert_eq!(next, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_tags_oldest_first_after_cursor() {
        let store = InMemoryStore::new();
        for name in ["a", "b", "c"] {
            store.create_tag("u", name).await.unwrap();
        }

        let after: Vec<_> = store
            .tags_after("u", Some(CursorKey::Id(1)), 10)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(after, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn test_entries_ordered_by_recorded_at_then_id() {
        let store = InMemoryStore::new();
        // Same timestamp for ids 2 and 3; id 1 is newest by time
        for (value, ts) in [(1.0, 300), (2.0, 100), (3.0, 100)] {
            store
                .log_metric("u", NewEntry::new(TrackedMetric::Water, date(1), value, ts))
                .await
                .unwrap();
        }

        let ids: Vec<_> = store
            .entries_after("u", None, 10)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![1, 3, 2]);

        let after = CursorKey::Timestamped {
            timestamp: 100,
            id: 3,
        };
        let ids: Vec<_> = store
            .entries_after("u", Some(after), 10)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![2]);
    }

    #[tokio::test]
    async fn test_validation() {
        let store = InMemoryStore::new();

        let negative = NewEntry::new(TrackedMetric::Water, date(1), -1.0, 1);
        assert!(matches!(
            store.log_metric("u", negative).await,
            Err(SourceError::InvalidInput(_))
        ));

        let nan = NewEntry::new(TrackedMetric::Exercise, date(1), f64::NAN, 1);
        assert!(store.log_metric("u", nan).await.is_err());

        let zero_weight = NewEntry::new(TrackedMetric::Weight, date(1), 0.0, 1);
        assert!(store.log_metric("u", zero_weight).await.is_err());

        assert!(store.create_food("u", food("  ")).await.is_err());
        assert!(store.create_tag("u", "").await.is_err());
    }

    #[tokio::test]
    async fn test_duplicate_tag_conflicts() {
        let store = InMemoryStore::new();
        store.create_tag("u", "Morning").await.unwrap();

        assert!(matches!(
            store.create_tag("u", " morning ").await,
            Err(SourceError::Conflict(_))
        ));
        // Another user may reuse the name
        assert!(store.create_tag("v", "morning").await.is_ok());
    }

    #[tokio::test]
    async fn test_stats() {
        let store = InMemoryStore::new();
        store.create_tag("u", "a").await.unwrap();
        store.create_food("v", food("b")).await.unwrap();

        let stats = store.stats().await;
        assert_eq!(
            stats,
            StoreStats {
                users: 2,
                entries: 0,
                foods: 1,
                tags: 1
            }
        );
        assert!(store.ping().await.is_ok());
    }
}
