//! Categorical value counts over the collection.
//!
//! Keys keep first-observation order; chart segments are drawn in that
//! order, so two scans of the same collection always render identically.

use std::collections::HashMap;

use crate::record::{AudioChannel, Record, SubtitleChannel};

/// Flat record fields that can be tallied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    FileExtension,
    VideoCodec,
    VideoResolution,
}

impl RecordField {
    pub fn read(self, record: &Record) -> Option<&str> {
        match self {
            Self::FileExtension => Some(record.file_extension.as_str()),
            Self::VideoCodec => record.video_codec.as_deref(),
            Self::VideoResolution => record.video_resolution.as_deref(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::FileExtension => "extension",
            Self::VideoCodec => "video codec",
            Self::VideoResolution => "resolution",
        }
    }
}

/// List-valued record fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelList {
    Audio,
    Subtitle,
}

impl ChannelList {
    pub fn label(self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Subtitle => "subtitle",
        }
    }
}

/// Field of an audio or subtitle sub-record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelField {
    Name,
    /// `channel` on audio tracks, `subtitle` on subtitle tracks.
    Label,
    Codec,
}

impl ChannelField {
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Label => "language",
            Self::Codec => "codec",
        }
    }
}

trait Channel {
    fn field(&self, field: ChannelField) -> Option<&str>;
}

impl Channel for AudioChannel {
    fn field(&self, field: ChannelField) -> Option<&str> {
        match field {
            ChannelField::Name => self.name.as_deref(),
            ChannelField::Label => self.channel.as_deref(),
            ChannelField::Codec => self.codec.as_deref(),
        }
    }
}

impl Channel for SubtitleChannel {
    fn field(&self, field: ChannelField) -> Option<&str> {
        match field {
            ChannelField::Name => self.name.as_deref(),
            ChannelField::Label => self.subtitle.as_deref(),
            ChannelField::Codec => self.codec.as_deref(),
        }
    }
}

/// Value → count table with insertion-ordered keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Distribution {
    entries: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl Distribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one observation. Absent and empty values are not tallied.
    pub fn observe(&mut self, value: Option<&str>) {
        let Some(value) = value.filter(|v| !v.is_empty()) else {
            return;
        };
        match self.index.get(value) {
            Some(&slot) => self.entries[slot].1 += 1,
            None => {
                self.index.insert(value.to_string(), self.entries.len());
                self.entries.push((value.to_string(), 1));
            }
        }
    }

    pub fn get(&self, value: &str) -> usize {
        self.index
            .get(value)
            .map(|&slot| self.entries[slot].1)
            .unwrap_or(0)
    }

    /// Keys in first-observation order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(k, c)| (k.as_str(), *c))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, c)| c).sum()
    }

    /// The `n` most frequent keys, still in first-observation order, with
    /// everything else folded into a trailing `"other"` bucket.
    pub fn top(&self, n: usize) -> Vec<(String, usize)> {
        if self.entries.len() <= n {
            return self.entries.clone();
        }

        let mut ranked: Vec<usize> = (0..self.entries.len()).collect();
        // Stable sort keeps earlier keys ahead on ties.
        ranked.sort_by(|&a, &b| self.entries[b].1.cmp(&self.entries[a].1));
        let mut keep = ranked[..n].to_vec();
        keep.sort_unstable();

        let mut out: Vec<(String, usize)> =
            keep.iter().map(|&slot| self.entries[slot].clone()).collect();
        let kept: usize = out.iter().map(|(_, c)| c).sum();
        out.push(("other".to_string(), self.total() - kept));
        out
    }
}

/// Tally a flat field over every record.
pub fn distribution(records: &[Record], field: RecordField) -> Distribution {
    distribution_by(records, |r| field.read(r))
}

/// Tally an arbitrary per-record value.
pub fn distribution_by<F>(records: &[Record], mut read: F) -> Distribution
where
    F: FnMut(&Record) -> Option<&str>,
{
    let mut dist = Distribution::new();
    for record in records {
        dist.observe(read(record));
    }
    dist
}

/// Tally one field of every audio or subtitle track, scanning records in
/// order and each record's tracks in order.
pub fn nested_distribution(
    records: &[Record],
    list: ChannelList,
    field: ChannelField,
) -> Distribution {
    let mut dist = Distribution::new();
    for record in records {
        match list {
            ChannelList::Audio => tally_channels(&mut dist, &record.audio_channels, field),
            ChannelList::Subtitle => tally_channels(&mut dist, &record.subtitle_channels, field),
        }
    }
    dist
}

fn tally_channels<C: Channel>(dist: &mut Distribution, channels: &[C], field: ChannelField) {
    for channel in channels {
        dist.observe(channel.field(field));
    }
}
