//! Memory Store
//!
//! Per-agent log of observations and the ratings derived from them.

use town_events::{Hour, MemoryRecord, RatedMemory, Recollection};

/// Default number of memories kept in a recollection
pub const DEFAULT_MEMORY_LIMIT: usize = 10;

/// Ordered observations plus the latest rating pass.
///
/// Records are append-only. Ratings are replaced wholesale by each pass.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<MemoryRecord>,
    ratings: Vec<RatedMemory>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an observation
    pub fn record(&mut self, record: MemoryRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[MemoryRecord] {
        &self.records
    }

    pub fn ratings(&self) -> &[RatedMemory] {
        &self.ratings
    }

    /// Replace the ratings with a fresh pass
    pub fn replace_ratings(&mut self, ratings: Vec<RatedMemory>) {
        self.ratings = ratings;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records formed from `source`'s actions
    pub fn about<'a>(&'a self, source: &'a str) -> impl Iterator<Item = &'a MemoryRecord> + 'a {
        self.records.iter().filter(move |r| r.source == source)
    }

    /// Keep the `limit` best-rated memories and join them into one string.
    ///
    /// Ties keep their rating-pass order. Pure: reads the ratings only.
    pub fn compress(&self, time: Hour, limit: usize) -> Recollection {
        let mut ranked: Vec<&RatedMemory> = self.ratings.iter().collect();
        ranked.sort_by(|a, b| b.rating.cmp(&a.rating));
        ranked.truncate(limit);

        let text = ranked
            .iter()
            .map(|m| m.memory.as_str())
            .collect::<Vec<_>>()
            .join(".");

        Recollection {
            time,
            text,
            memory_count: ranked.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use town_events::Rating;

    fn rated(memory: &str, rating: u64) -> RatedMemory {
        RatedMemory {
            memory: memory.to_string(),
            rating: Rating::clamped(rating),
            response: rating.to_string(),
        }
    }

    #[test]
    fn test_records_are_appended_in_order() {
        let mut store = MemoryStore::new();
        store.record(MemoryRecord::new(Hour(8), "Ann", "waves"));
        store.record(MemoryRecord::new(Hour(9), "Bob", "sings"));
        store.record(MemoryRecord::new(Hour(9), "Ann", "leaves"));

        assert_eq!(store.len(), 3);
        assert_eq!(store.records()[1].source, "Bob");
        assert_eq!(store.about("Ann").count(), 2);
    }

    #[test]
    fn test_compress_keeps_top_rated_with_stable_ties() {
        let mut store = MemoryStore::new();
        store.replace_ratings(vec![
            rated("a", 2),
            rated("b", 5),
            rated("c", 3),
            rated("d", 5),
            rated("e", 3),
        ]);

        let recollection = store.compress(Hour(10), 3);
        assert_eq!(recollection.text, "b.d.c");
        assert_eq!(recollection.memory_count, 3);
        assert_eq!(recollection.to_string(), "[Recollection at Time 10:00: b.d.c]");
    }

    #[test]
    fn test_compress_with_fewer_than_limit() {
        let mut store = MemoryStore::new();
        store.replace_ratings(vec![rated("only", 1), rated("two", 4)]);

        let recollection = store.compress(Hour(8), DEFAULT_MEMORY_LIMIT);
        assert_eq!(recollection.text, "two.only");
        assert_eq!(recollection.memory_count, 2);
    }

    #[test]
    fn test_compress_is_pure() {
        let mut store = MemoryStore::new();
        store.replace_ratings(vec![rated("x", 3), rated("y", 4)]);

        let first = store.compress(Hour(8), 1);
        let second = store.compress(Hour(9), 1);
        assert_eq!(first.text, second.text);
        assert_eq!(store.ratings().len(), 2);
    }

    #[test]
    fn test_compress_empty() {
        let store = MemoryStore::new();
        let recollection = store.compress(Hour(8), 10);
        assert_eq!(recollection.text, "");
        assert_eq!(recollection.memory_count, 0);
    }
}
