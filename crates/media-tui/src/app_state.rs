//! AppState: shared read-only data passed to components during render/event.
//!
//! Components read this, but never mutate it. The App event loop is the only
//! thing that writes to AppState.

use media_core::{FileManager, HttpRecordStore, Record, RecordId};

use crate::action::View;
use crate::widgets::status_bar::InputMode;

/// Remote work the App is waiting on. Deletes are not overlapped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Busy {
    Deleting(usize),
    DeletingAll,
    DeletingRecord(RecordId),
}

impl Busy {
    pub fn describe(&self) -> String {
        match self {
            Self::Deleting(n) => format!("deleting {} files…", n),
            Self::DeletingAll => "deleting every file…".to_string(),
            Self::DeletingRecord(id) => format!("deleting file #{}…", id),
        }
    }
}

/// What the detail screen is showing.
#[derive(Debug, Clone)]
pub struct DetailState {
    pub id: RecordId,
    /// Last known copy; the collection's copy until the fetch lands.
    pub record: Option<Record>,
    pub fetching: bool,
    pub error: Option<String>,
}

impl DetailState {
    pub fn new(id: RecordId, cached: Option<Record>) -> Self {
        Self {
            id,
            record: cached,
            fetching: true,
            error: None,
        }
    }
}

pub struct AppState {
    pub files: FileManager<HttpRecordStore>,
    pub server_url: String,
    pub view: View,
    pub input_mode: InputMode,
    pub busy: Option<Busy>,
    pub detail: Option<DetailState>,
}

impl AppState {
    pub fn new(files: FileManager<HttpRecordStore>, server_url: String) -> Self {
        Self {
            files,
            server_url,
            view: View::List,
            input_mode: InputMode::Normal,
            busy: None,
            detail: None,
        }
    }

    pub fn collection(&self) -> &[Record] {
        self.files.session().collection()
    }

    pub fn is_checked(&self, id: RecordId) -> bool {
        self.files.session().selection().contains(id)
    }

    pub fn selected_count(&self) -> usize {
        self.files.session().selection().len()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use media_core::config::{CollectionConfig, ServiceConfig};
    use media_core::{AudioChannel, SubtitleChannel};

    use super::*;

    pub fn record(id: RecordId, ext: &str) -> Record {
        Record {
            id,
            filepath: format!("/srv/media/clip-{}{}", id, ext),
            filename: format!("clip-{}{}", id, ext),
            file_extension: ext.to_string(),
            file_size: 1_500_000 * id as u64,
            video_codec: Some("hevc".to_string()),
            video_resolution: Some("3840x2160".to_string()),
            audio_channels: vec![AudioChannel {
                id: id * 10,
                name: Some("Surround".to_string()),
                channel: Some("eng".to_string()),
                codec: Some("ac3".to_string()),
            }],
            subtitle_channels: vec![SubtitleChannel {
                id: id * 10 + 1,
                name: Some("Forced".to_string()),
                subtitle: Some("fre".to_string()),
                codec: Some("ass".to_string()),
            }],
        }
    }

    /// State with `ids` loaded and nothing in flight. No request is made.
    pub fn state_with(ids: &[RecordId]) -> AppState {
        let service = ServiceConfig::default();
        let store = HttpRecordStore::new(&service).unwrap();
        let mut files = FileManager::new(std::sync::Arc::new(store), &CollectionConfig::default());
        assert!(files.session_mut().begin_load());
        files
            .session_mut()
            .finish_load(Ok(ids.iter().map(|&id| record(id, ".mkv")).collect()));
        AppState::new(files, service.base_url)
    }
}
