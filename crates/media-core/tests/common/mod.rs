//! In-memory collection service used by the integration tests.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use media_core::{AudioChannel, Record, RecordId, RecordStore, StoreError, SubtitleChannel};

pub fn record(id: RecordId) -> Record {
    Record {
        id,
        filepath: format!("/srv/media/title-{:03}.mkv", id),
        filename: format!("title-{:03}.mkv", id),
        file_extension: ".mkv".to_string(),
        file_size: 700 * 1024 * 1024,
        video_codec: Some("h264".to_string()),
        video_resolution: Some("1920x1080".to_string()),
        audio_channels: vec![AudioChannel {
            id: id * 10,
            name: Some("Stereo".to_string()),
            channel: Some("eng".to_string()),
            codec: Some("aac".to_string()),
        }],
        subtitle_channels: vec![SubtitleChannel {
            id: id * 10 + 1,
            name: Some("Full".to_string()),
            subtitle: Some("eng".to_string()),
            codec: Some("subrip".to_string()),
        }],
    }
}

pub fn records(ids: impl IntoIterator<Item = RecordId>) -> Vec<Record> {
    ids.into_iter().map(record).collect()
}

/// Fake service that keeps its records in memory and logs every call.
#[derive(Default)]
pub struct FakeStore {
    records: Mutex<Vec<Record>>,
    list_calls: Mutex<Vec<(usize, usize)>>,
    delete_calls: Mutex<Vec<RecordId>>,
    failing_deletes: Mutex<HashSet<RecordId>>,
    failing_list_offset: Mutex<Option<usize>>,
    delete_delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeStore {
    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    pub fn with_ids(ids: impl IntoIterator<Item = RecordId>) -> Self {
        Self::with_records(records(ids))
    }

    /// Every delete sleeps this long before answering.
    pub fn delete_delay(mut self, delay: Duration) -> Self {
        self.delete_delay = delay;
        self
    }

    /// Deletes of `id` fail with a network error.
    pub fn fail_delete(&self, id: RecordId) {
        self.failing_deletes.lock().unwrap().insert(id);
    }

    /// The page request at `offset` fails with a network error.
    pub fn fail_list_at(&self, offset: usize) {
        *self.failing_list_offset.lock().unwrap() = Some(offset);
    }

    pub fn insert(&self, record: Record) {
        self.records.lock().unwrap().push(record);
    }

    pub fn ids(&self) -> Vec<RecordId> {
        self.records.lock().unwrap().iter().map(|r| r.id).collect()
    }

    pub fn list_calls(&self) -> Vec<(usize, usize)> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn delete_calls(&self) -> Vec<RecordId> {
        self.delete_calls.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl RecordStore for FakeStore {
    async fn list_page(&self, skip: usize, limit: usize) -> Result<Vec<Record>, StoreError> {
        self.list_calls.lock().unwrap().push((skip, limit));
        if *self.failing_list_offset.lock().unwrap() == Some(skip) {
            return Err(StoreError::NetworkFailure("connection reset".to_string()));
        }
        let records = self.records.lock().unwrap();
        Ok(records.iter().skip(skip).take(limit).cloned().collect())
    }

    async fn get_one(&self, id: RecordId) -> Result<Record, StoreError> {
        let records = self.records.lock().unwrap();
        records
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn delete_one(&self, id: RecordId) -> Result<(), StoreError> {
        self.delete_calls.lock().unwrap().push(id);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.delete_delay.is_zero() {
            tokio::time::sleep(self.delete_delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing_deletes.lock().unwrap().contains(&id) {
            return Err(StoreError::NetworkFailure("timed out".to_string()));
        }
        let mut records = self.records.lock().unwrap();
        match records.iter().position(|r| r.id == id) {
            Some(pos) => {
                records.remove(pos);
                Ok(())
            }
            None => Err(StoreError::NotFound(id)),
        }
    }
}
