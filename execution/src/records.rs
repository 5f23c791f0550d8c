//! Bounded round history.

use std::collections::VecDeque;

use bytes::BufMut;
use commonware_codec::{Error, ReadRangeExt, Write};
use luckyeight_types::{RoundRecord, MAX_HISTORY_CAPACITY};

/// Ring buffer of settled rounds; the oldest record is evicted once capacity is reached.
#[derive(Clone, Debug)]
pub struct RecordStore {
    capacity: usize,
    records: VecDeque<RoundRecord>,
}

impl RecordStore {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, MAX_HISTORY_CAPACITY);
        Self {
            capacity,
            records: VecDeque::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn push(&mut self, record: RoundRecord) {
        while self.records.len() >= self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    pub fn latest(&self) -> Option<&RoundRecord> {
        self.records.back()
    }

    /// Records oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &RoundRecord> {
        self.records.iter()
    }

    pub fn to_vec(&self) -> Vec<RoundRecord> {
        self.records.iter().cloned().collect()
    }

    /// Encode every retained record, oldest first.
    pub fn encode_all(&self, writer: &mut impl BufMut) {
        self.to_vec().write(writer);
    }

    /// Rebuild a store from [`RecordStore::encode_all`] output.
    ///
    /// When more records were encoded than `capacity` holds, the newest are kept.
    pub fn decode_all(capacity: usize, mut bytes: &[u8]) -> Result<Self, Error> {
        let records = Vec::<RoundRecord>::read_range(&mut bytes, 0..=MAX_HISTORY_CAPACITY)?;
        let mut store = Self::new(capacity);
        for record in records {
            store.push(record);
        }
        Ok(store)
    }
}
