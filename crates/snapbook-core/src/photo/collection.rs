use crate::photo::{PhotoId, PhotoRecord};

use serde::{Deserialize, Serialize};

/// Ordered list of photo records. Insertion order is chronological order.
///
/// Serialized as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoCollection {
    records: Vec<PhotoRecord>,
}

impl PhotoCollection {
    /// An empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collection with `record` pushed to the end.
    pub fn with_appended(mut self, record: PhotoRecord) -> Self {
        self.records.push(record);
        self
    }

    /// Collection without any record whose id equals `id`, order preserved.
    pub fn without(mut self, id: PhotoId) -> Self {
        self.records.retain(|record| record.id != id);
        self
    }

    /// Id for a record captured at `now_ms`.
    ///
    /// Wall-clock milliseconds, bumped past the newest stored id so two
    /// captures within one millisecond still get distinct keys.
    pub fn next_id(&self, now_ms: PhotoId) -> PhotoId {
        match self.records.iter().map(|record| record.id).max() {
            Some(newest) if newest >= now_ms => newest + 1,
            _ => now_ms,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether a record with `id` exists.
    pub fn contains(&self, id: PhotoId) -> bool {
        self.records.iter().any(|record| record.id == id)
    }

    /// Most recently appended record.
    pub fn last(&self) -> Option<&PhotoRecord> {
        self.records.last()
    }

    /// Record at 0-based `index`.
    pub fn get(&self, index: usize) -> Option<&PhotoRecord> {
        self.records.get(index)
    }

    /// Records in stored order.
    pub fn iter(&self) -> std::slice::Iter<'_, PhotoRecord> {
        self.records.iter()
    }

    /// Records as a slice, oldest first.
    pub fn as_slice(&self) -> &[PhotoRecord] {
        &self.records
    }
}

impl From<Vec<PhotoRecord>> for PhotoCollection {
    fn from(records: Vec<PhotoRecord>) -> Self {
        Self { records }
    }
}

impl FromIterator<PhotoRecord> for PhotoCollection {
    fn from_iter<I: IntoIterator<Item = PhotoRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PhotoCollection {
    type Item = &'a PhotoRecord;
    type IntoIter = std::slice::Iter<'a, PhotoRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
