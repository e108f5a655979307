//! Interactive session: a simulated player ticks every 500 ms while commands
//! are read from stdin. Both arms of the loop run to completion before the
//! next is polled, so a tick never overlaps another tick or a command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use console::style;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use videotutor_core::{
    InitScope, JsonFilePreferenceStore, PlaybackControl, PlaybackSync, Preferences,
    SessionState, SystemClock, TickUpdate, build_context_snippet, build_export_document,
    build_init_message, format_timestamp, parse_timestamp,
    paths::get_export_path,
    playback::{seek_to_chapter, seek_to_entry, seek_to_note},
    playback_interval,
};

use crate::{copy_or_print, player::SimulatedPlayer, report_copy};

const HELP: &str = "\
commands:
  note TEXT       add a note at the current position
  del N           delete note N
  notes           list notes
  goto N          seek to where note N was taken
  seek T          seek to a time (m:ss, h:mm:ss or seconds)
  entry N         seek to transcript entry N
  chapter N       seek to chapter N
  chapters        list chapters
  pause | play    control playback
  scroll          pretend to scroll the transcript by hand
  ctx             copy the context line for a question
  init            copy the initialization message
  scope S         use `timestamped` or `plain` transcript
  export [PATH]   write notes as markdown
  quit";

enum Flow {
    Continue,
    Quit,
}

struct Watch {
    session: SessionState,
    player: SimulatedPlayer,
    sync: PlaybackSync<SystemClock>,
    prefs: Preferences,
    store: JsonFilePreferenceStore,
}

pub async fn run(
    session: SessionState,
    start_seconds: f64,
    prefs: Preferences,
    store: JsonFilePreferenceStore,
) -> Result<()> {
    let mut watch = Watch {
        session,
        player: SimulatedPlayer::new(start_seconds),
        sync: PlaybackSync::new(SystemClock::new()),
        prefs,
        store,
    };

    println!("{}", style(HELP).dim());
    let mut ticks = playback_interval();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            _ = ticks.tick() => {
                let seconds = watch.player.current_time();
                let update = watch.sync.tick(&mut watch.session, seconds);
                watch.render_tick(&update);
            }
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                if let Flow::Quit = watch.handle(line.trim()).await? {
                    break;
                }
            }
        }
    }

    info!(notes = watch.session.notebook().len(), "Watch session ended");
    Ok(())
}

fn parse_position(arg: &str) -> Option<usize> {
    arg.trim().parse::<usize>().ok()?.checked_sub(1)
}

impl Watch {
    fn render_tick(&self, update: &TickUpdate) {
        if update.chapter_changed {
            if let Some(chapter) = update.active_chapter.and_then(|i| self.session.chapters().get(i)) {
                println!(
                    "\n{} {}",
                    style(format!("[{}]", chapter.display_timestamp)).cyan(),
                    style(&chapter.title).cyan().bold()
                );
            }
        }
        if let Some(entry) = update.scroll_to.and_then(|i| self.session.entries().get(i)) {
            println!(
                "{} {}",
                style(format!("[{}]", entry.timestamp())).dim(),
                entry.text
            );
        }
    }

    async fn handle(&mut self, line: &str) -> Result<Flow> {
        let (command, arg) = line.split_once(' ').unwrap_or((line, ""));
        let arg = arg.trim();

        match command {
            "" => {}
            "help" => println!("{}", HELP),
            "quit" | "exit" => return Ok(Flow::Quit),
            "note" => match self.sync_time().add_note(arg) {
                Some(note) => println!(
                    "{} noted at {}",
                    style("✓").green().bold(),
                    note.display_timestamp
                ),
                None => println!("{} empty note ignored", style("!").yellow()),
            },
            "del" => match parse_position(arg).and_then(|i| self.session.delete_note(i)) {
                Some(note) => println!("{} deleted: {}", style("✓").green().bold(), note.text),
                None => println!("{} no note {}", style("!").yellow(), arg),
            },
            "notes" => self.print_notes(),
            "goto" => self.seek_with(arg, seek_to_note),
            "entry" => self.seek_with(arg, seek_to_entry),
            "chapter" => self.seek_with(arg, seek_to_chapter),
            "chapters" => {
                for (i, chapter) in self.session.chapters().iter().enumerate() {
                    println!("{:>3}. [{}] {}", i + 1, chapter.display_timestamp, chapter.title);
                }
            }
            "seek" => match parse_timestamp(arg) {
                Some(seconds) => {
                    self.player.seek_to(seconds);
                    self.sync_time();
                    println!("{} {}", style("→").cyan(), format_timestamp(seconds));
                }
                None => println!("{} invalid time: {}", style("!").yellow(), arg),
            },
            "pause" | "play" => {
                if command == "pause" {
                    self.player.pause();
                } else {
                    self.player.play();
                }
                let state = if self.player.is_playing() { "playing" } else { "paused" };
                println!(
                    "{} {} at {}",
                    style("→").cyan(),
                    state,
                    format_timestamp(self.player.current_time())
                );
            }
            "scroll" => {
                self.sync.on_scroll_event();
                println!("{}", style("auto-follow paused").dim());
            }
            "ctx" => {
                self.sync_time();
                let snippet = build_context_snippet(&self.session);
                let outcome = copy_or_print(&snippet).await;
                println!("{}: {}", report_copy(outcome, "Context"), snippet);
            }
            "init" => self.copy_init().await,
            "scope" => self.set_scope(arg),
            "export" => self.export(arg).await?,
            other => println!("{} unknown command {other}; try `help`", style("!").yellow()),
        }
        Ok(Flow::Continue)
    }

    /// Bring the session up to the player's position between ticks.
    fn sync_time(&mut self) -> &mut SessionState {
        self.session.set_current_time(self.player.current_time());
        &mut self.session
    }

    fn seek_with(
        &mut self,
        arg: &str,
        seek: fn(&mut SessionState, &mut SimulatedPlayer, usize) -> bool,
    ) {
        let sought = parse_position(arg)
            .is_some_and(|i| seek(&mut self.session, &mut self.player, i));
        if sought {
            println!(
                "{} {}",
                style("→").cyan(),
                format_timestamp(self.player.current_time())
            );
        } else {
            println!("{} nothing at {}", style("!").yellow(), arg);
        }
    }

    fn print_notes(&self) {
        if self.session.notebook().is_empty() {
            println!("{}", style("no notes yet").dim());
            return;
        }
        for (i, note) in self.session.notebook().notes().iter().enumerate() {
            let chapter = if note.chapter_title.is_empty() {
                String::new()
            } else {
                format!(" | {}", note.chapter_title)
            };
            println!(
                "{:>3}. {} {}",
                i + 1,
                style(format!("[{}{}]", note.display_timestamp, chapter)).dim(),
                note.text
            );
        }
    }

    async fn copy_init(&mut self) {
        if self.session.init_already_copied() {
            println!(
                "{}",
                style("initialization message was already copied; copying again").dim()
            );
        }
        let message = build_init_message(&self.session, &self.prefs.options, &[]);
        let outcome = copy_or_print(&message).await;
        if outcome.delivered() {
            self.session.mark_init_copied();
        }
        println!(
            "{} {}",
            report_copy(outcome, "Initialization message"),
            style(format!("({})", self.session.init_scope().as_str())).dim()
        );
    }

    fn set_scope(&mut self, arg: &str) {
        let scope = InitScope::parse(arg);
        self.session.set_init_scope(scope);
        self.prefs.scope = scope;
        if let Err(err) = self.prefs.save(&mut self.store) {
            warn!("Failed to save preferences: {err}");
        }
        println!("{} scope: {}", style("✓").green().bold(), scope.as_str());
    }

    async fn export(&self, arg: &str) -> Result<()> {
        let doc = build_export_document(&self.session, Local::now().date_naive());
        let path = if arg.is_empty() {
            get_export_path(&PathBuf::from("."), self.session.video_id())
        } else {
            PathBuf::from(arg)
        };
        tokio::fs::write(&path, &doc.markdown)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!(
            "{} {} notes exported to {}",
            style("✓").green().bold(),
            self.session.notebook().len(),
            style(path.display()).cyan()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use videotutor_core::{Chapter, Transcript, TranscriptEntry, TranscriptSource, VideoData};

    use super::*;

    fn loaded_session() -> SessionState {
        let entry = |start: f64, stamp: &str, text: &str| TranscriptEntry {
            start_seconds: start,
            text: text.to_string(),
            display_timestamp: Some(stamp.to_string()),
        };
        let chapter = |title: &str, start: f64, end: f64| Chapter {
            title: title.to_string(),
            start_seconds: start,
            end_seconds: end,
            display_timestamp: format_timestamp(start),
        };
        let mut session = SessionState::new();
        let tag = session.begin_load("dQw4w9WgXcQ");
        session.apply_fetch(
            &tag,
            Ok(VideoData {
                title: "Ownership".to_string(),
                transcript: Some(Transcript::new(
                    vec![entry(0.0, "00:00", "hello"), entry(75.0, "01:15", "later")],
                    None,
                    TranscriptSource::Manual,
                )),
                chapters: vec![chapter("Intro", 0.0, 60.0), chapter("Main", 60.0, 200.0)],
                metadata: None,
            }),
        );
        session
    }

    fn paused_watch(session: SessionState) -> Watch {
        let mut player = SimulatedPlayer::new(0.0);
        player.pause();
        let prefs_path = std::env::temp_dir()
            .join("videotutor-watch-tests")
            .join("preferences.json");
        Watch {
            session,
            player,
            sync: PlaybackSync::new(SystemClock::new()),
            prefs: Preferences::default(),
            store: JsonFilePreferenceStore::open(&prefs_path),
        }
    }

    #[tokio::test]
    async fn test_note_right_after_seek_uses_new_position() {
        let mut watch = paused_watch(loaded_session());

        watch.handle("seek 1:15").await.unwrap();
        assert_eq!(watch.session.current_time(), 75.0);

        watch.handle("note ownership moves").await.unwrap();
        let note = &watch.session.notebook().notes()[0];
        assert_eq!(note.display_timestamp, "01:15");
        assert_eq!(note.chapter_title, "Main");
        assert_eq!(note.time_seconds, 75.0);
    }

    #[tokio::test]
    async fn test_note_between_ticks_reads_player_position() {
        let mut watch = paused_watch(loaded_session());
        watch.player.seek_to(80.0);

        watch.handle("note picked up late").await.unwrap();
        assert_eq!(watch.session.notebook().notes()[0].display_timestamp, "01:15");
    }

    #[test]
    fn test_parse_position_is_one_based() {
        assert_eq!(parse_position("1"), Some(0));
        assert_eq!(parse_position(" 3 "), Some(2));
        assert_eq!(parse_position("0"), None);
        assert_eq!(parse_position("x"), None);
    }
}
