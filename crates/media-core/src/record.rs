use serde::{Deserialize, Serialize};

/// Identifier assigned by the collection service.
pub type RecordId = i64;

/// One media file as described by the collection service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub id: RecordId,
    pub filepath: String,
    pub filename: String,
    pub file_extension: String,
    /// Size in bytes.
    pub file_size: u64,
    #[serde(default)]
    pub video_codec: Option<String>,
    #[serde(default)]
    pub video_resolution: Option<String>,
    #[serde(default)]
    pub audio_channels: Vec<AudioChannel>,
    #[serde(default)]
    pub subtitle_channels: Vec<SubtitleChannel>,
}

/// Track descriptors come from a scanner that leaves fields unset when the
/// container does not carry them; any of them may be null or missing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AudioChannel {
    pub id: RecordId,
    #[serde(default)]
    pub name: Option<String>,
    /// Language tag reported by the scanner (e.g. "eng").
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub codec: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubtitleChannel {
    pub id: RecordId,
    #[serde(default)]
    pub name: Option<String>,
    /// Language tag reported by the scanner (e.g. "eng").
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub codec: Option<String>,
}

impl Record {
    /// File size rendered with binary units ("1.4 GiB").
    pub fn human_size(&self) -> String {
        format_bytes(self.file_size)
    }
}

pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_service_payload() {
        let json = r#"{
            "id": 7,
            "filepath": "/media/movies/Heat (1995).mkv",
            "filename": "Heat (1995).mkv",
            "file_extension": ".mkv",
            "file_size": 4294967296,
            "video_codec": "hevc",
            "video_resolution": "1920x800",
            "audio_channels": [{"id": 1, "name": "Surround", "channel": "eng", "codec": "dts"}],
            "subtitle_channels": [{"id": 2, "name": "Full", "subtitle": "spa", "codec": "subrip"}]
        }"#;

        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, 7);
        assert_eq!(record.video_codec.as_deref(), Some("hevc"));
        assert_eq!(record.audio_channels[0].channel.as_deref(), Some("eng"));
        assert_eq!(record.subtitle_channels[0].subtitle.as_deref(), Some("spa"));
        assert_eq!(record.human_size(), "4.0 GiB");
    }

    #[test]
    fn missing_optional_fields_decode_as_empty() {
        let json = r#"{
            "id": 3,
            "filepath": "/media/clip.avi",
            "filename": "clip.avi",
            "file_extension": ".avi",
            "file_size": 512,
            "video_codec": null
        }"#;

        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.video_codec, None);
        assert_eq!(record.video_resolution, None);
        assert!(record.audio_channels.is_empty());
        assert!(record.subtitle_channels.is_empty());
    }

    #[test]
    fn tracks_with_unset_fields_still_decode() {
        let json = r#"[{
            "id": 9,
            "filepath": "/media/raw.ts",
            "filename": "raw.ts",
            "file_extension": ".ts",
            "file_size": 2048,
            "audio_channels": [{"id": 1, "name": null, "channel": "eng", "codec": "aac"}],
            "subtitle_channels": [{"id": 2, "subtitle": "ger"}]
        }]"#;

        let records: Vec<Record> = serde_json::from_str(json).unwrap();
        let audio = &records[0].audio_channels[0];
        assert_eq!(audio.name, None);
        assert_eq!(audio.codec.as_deref(), Some("aac"));
        let sub = &records[0].subtitle_channels[0];
        assert_eq!(sub.name, None);
        assert_eq!(sub.codec, None);
        assert_eq!(sub.subtitle.as_deref(), Some("ger"));
    }

    #[test]
    fn formats_sizes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1536), "1.5 KiB");
        assert_eq!(format_bytes(10 * 1024 * 1024), "10.0 MiB");
    }
}
