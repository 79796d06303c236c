//! Command-line surface and the headless subcommands.

use std::fmt::Write as _;

use anyhow::Context;
use clap::{Parser, Subcommand};
use media_core::distribution::{ChannelField, ChannelList, Distribution, RecordField};
use media_core::{BatchOutcome, CollectionError, FileManager, Record, RecordId, RecordStore};

use crate::widgets::text::{fit, fit_right};

#[derive(Parser, Debug)]
#[command(name = "mediadex", version, about = "Browse and prune a remote media-file collection")]
pub struct Cli {
    /// Collection endpoint for this run (overrides service.base_url)
    #[arg(long, global = true)]
    pub server_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Print every record as a table
    List,
    /// Print one record with its audio and subtitle tracks
    Show { id: RecordId },
    /// Delete records by id, or every record with --all
    Delete {
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        ids: Vec<RecordId>,
        /// Delete everything the service holds, shown or not
        #[arg(long)]
        all: bool,
    },
    /// Print value counts per field
    Stats,
}

pub async fn run<S: RecordStore + 'static>(
    command: Command,
    files: &mut FileManager<S>,
) -> anyhow::Result<()> {
    match command {
        Command::List => {
            files.initialize().await.context("loading the collection")?;
            print!("{}", format_table(files.session().collection()));
        }
        Command::Show { id } => {
            let record = files
                .fetch_one(id)
                .await
                .with_context(|| format!("fetching file #{}", id))?;
            print!("{}", format_record(&record));
        }
        Command::Delete { all: true, .. } => {
            let result = files.delete_all().await;
            report_batch(result)?;
        }
        Command::Delete { ids, .. } => {
            let result = files.delete_many(&ids).await;
            report_batch(result)?;
        }
        Command::Stats => {
            files.initialize().await.context("loading the collection")?;
            print!("{}", format_stats(files));
        }
    }
    Ok(())
}

fn report_batch(result: Result<BatchOutcome, CollectionError>) -> anyhow::Result<()> {
    match result {
        Ok(outcome) => {
            println!("{}", format_outcome(&outcome));
            Ok(())
        }
        Err(err @ CollectionError::PartialBatchFailure { .. }) => {
            for id in err.unconfirmed_ids() {
                eprintln!("  #{} not confirmed", id);
            }
            Err(err.into())
        }
        Err(err) => Err(err).context("deleting"),
    }
}

pub fn format_outcome(outcome: &BatchOutcome) -> String {
    let mut line = format!("deleted {}", outcome.deleted.len());
    if !outcome.already_gone.is_empty() {
        let _ = write!(line, ", {} already gone", outcome.already_gone.len());
    }
    if !outcome.failed.is_empty() {
        let _ = write!(line, ", {} failed", outcome.failed.len());
    }
    line
}

pub fn format_table(records: &[Record]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {} {} {} {} {}",
        fit_right("id", 6),
        fit("filename", 40),
        fit("ext", 6),
        fit_right("size", 10),
        fit("video", 8),
        "resolution"
    );
    for r in records {
        let _ = writeln!(
            out,
            "{} {} {} {} {} {}",
            fit_right(&r.id.to_string(), 6),
            fit(&r.filename, 40),
            fit(&r.file_extension, 6),
            fit_right(&r.human_size(), 10),
            fit(r.video_codec.as_deref().unwrap_or("-"), 8),
            r.video_resolution.as_deref().unwrap_or("-"),
        );
    }
    let _ = writeln!(out, "{} files", records.len());
    out
}

pub fn format_record(r: &Record) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#{} {}", r.id, r.filename);
    let _ = writeln!(out, "  path        {}", r.filepath);
    let _ = writeln!(out, "  extension   {}", r.file_extension);
    let _ = writeln!(out, "  size        {} ({} bytes)", r.human_size(), r.file_size);
    let _ = writeln!(out, "  video       {}", r.video_codec.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "  resolution  {}", r.video_resolution.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "audio ({})", r.audio_channels.len());
    for a in &r.audio_channels {
        let _ = writeln!(
            out,
            "  #{} {} [{}] {}",
            a.id,
            or_dash(a.name.as_deref()),
            or_dash(a.channel.as_deref()),
            or_dash(a.codec.as_deref())
        );
    }
    let _ = writeln!(out, "subtitles ({})", r.subtitle_channels.len());
    for s in &r.subtitle_channels {
        let _ = writeln!(
            out,
            "  #{} {} [{}] {}",
            s.id,
            or_dash(s.name.as_deref()),
            or_dash(s.subtitle.as_deref()),
            or_dash(s.codec.as_deref())
        );
    }
    out
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

fn write_distribution(out: &mut String, title: &str, dist: &Distribution) {
    let _ = writeln!(out, "{} ({} values)", title, dist.total());
    for (value, count) in dist.iter() {
        let _ = writeln!(out, "  {} {}", fit(value, 24), count);
    }
}

pub fn format_stats<S: RecordStore + 'static>(files: &FileManager<S>) -> String {
    let mut out = String::new();
    for field in [
        RecordField::FileExtension,
        RecordField::VideoCodec,
        RecordField::VideoResolution,
    ] {
        write_distribution(&mut out, field.label(), &files.distribution(field));
    }
    for list in [ChannelList::Audio, ChannelList::Subtitle] {
        for field in [ChannelField::Label, ChannelField::Codec] {
            let title = format!("{} {}", list.label(), field.label());
            write_distribution(&mut out, &title, &files.nested_distribution(list, field));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::fixtures::record;
    use media_core::{FailedDeletion, StoreError};

    #[test]
    fn no_subcommand_means_tui() {
        let cli = Cli::try_parse_from(["mediadex"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.server_url.is_none());
    }

    #[test]
    fn delete_takes_ids_or_all_but_not_both() {
        let cli = Cli::try_parse_from(["mediadex", "delete", "3", "9"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Delete {
                ids: vec![3, 9],
                all: false
            })
        );

        let cli = Cli::try_parse_from(["mediadex", "delete", "--all"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Delete {
                ids: vec![],
                all: true
            })
        );

        assert!(Cli::try_parse_from(["mediadex", "delete"]).is_err());
        assert!(Cli::try_parse_from(["mediadex", "delete", "3", "--all"]).is_err());
    }

    #[test]
    fn server_url_is_global() {
        let cli =
            Cli::try_parse_from(["mediadex", "list", "--server-url", "http://nas:8000/files"])
                .unwrap();
        assert_eq!(cli.server_url.as_deref(), Some("http://nas:8000/files"));
        assert_eq!(cli.command, Some(Command::List));
    }

    #[test]
    fn table_has_a_row_per_record_and_a_total() {
        let table = format_table(&[record(1, ".mkv"), record(2, ".mp4")]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].contains("clip-1.mkv"));
        assert!(lines[2].contains(".mp4"));
        assert_eq!(lines[3], "2 files");
    }

    #[test]
    fn record_lists_tracks() {
        let text = format_record(&record(4, ".mkv"));
        assert!(text.starts_with("#4 clip-4.mkv"));
        assert!(text.contains("  #40 Surround [eng] ac3"));
        assert!(text.contains("  #41 Forced [fre] ass"));
    }

    #[test]
    fn unset_track_fields_print_as_dashes() {
        let mut r = record(4, ".mkv");
        r.subtitle_channels[0].name = None;
        r.subtitle_channels[0].codec = None;
        assert!(format_record(&r).contains("  #41 - [fre] -"));
    }

    #[test]
    fn outcome_summary_mentions_every_bucket() {
        let outcome = BatchOutcome {
            requested: vec![1, 2, 3],
            deleted: vec![1],
            already_gone: vec![2],
            failed: vec![FailedDeletion {
                id: 3,
                reason: StoreError::NetworkFailure("timed out".into()),
            }],
        };
        assert_eq!(format_outcome(&outcome), "deleted 1, 1 already gone, 1 failed");
    }
}
