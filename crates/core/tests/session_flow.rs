use std::collections::HashMap;

use chrono::NaiveDate;
use videotutor_core::{
    FetchOutcome, InitScope, ManualClock, MessageOptions, PlaybackSync, Result, SessionState,
    TranscriptProvider, VideoData, VideoTutorError, build_context_snippet, build_export_document,
    build_init_message,
    provider::TranscriptResponse,
};

/// Serves canned JSON bodies keyed by video id.
struct CannedProvider {
    bodies: HashMap<&'static str, &'static str>,
}

impl TranscriptProvider for CannedProvider {
    async fn fetch(&self, video_id: &str) -> Result<VideoData> {
        tokio::task::yield_now().await;
        let body = self.bodies.get(video_id).copied().ok_or_else(|| {
            VideoTutorError::TranscriptUnavailable {
                video_id: video_id.to_string(),
                reason: "No transcript available for this video.".to_string(),
            }
        })?;
        let response: TranscriptResponse = serde_json::from_str(body)?;
        response.into_video_data(video_id)
    }
}

const FIRST: &str = r#"{
    "video_id": "aaaaaaaaaaa",
    "title": "First video",
    "entries": [
        {"time": 0, "timestamp": "00:00", "text": "Hello."},
        {"time": 12.5, "timestamp": "00:12", "text": "Ownership rules."}
    ],
    "chapters": [
        {"title": "Opening", "start_time": 0, "end_time": 10, "timestamp": "00:00"},
        {"title": "Rules", "start_time": 12, "end_time": 120, "timestamp": "00:12"}
    ],
    "metadata": {"channel": "Crab Academy", "transcript_type": "manual"}
}"#;

const SECOND: &str = r#"{
    "video_id": "bbbbbbbbbbb",
    "title": "Second video",
    "entries": [{"time": 0, "timestamp": "00:00", "text": "Different video."}],
    "chapters": [],
    "metadata": {"transcript_type": "auto-generated"}
}"#;

fn provider() -> CannedProvider {
    CannedProvider {
        bodies: HashMap::from([("aaaaaaaaaaa", FIRST), ("bbbbbbbbbbb", SECOND)]),
    }
}

#[tokio::test]
async fn test_late_response_for_superseded_video_is_dropped() {
    let provider = provider();
    let mut session = SessionState::new();

    let first_tag = session.begin_load("aaaaaaaaaaa");
    let second_tag = session.begin_load("bbbbbbbbbbb");

    let (first, second) = tokio::join!(
        provider.fetch(&first_tag.video_id),
        provider.fetch(&second_tag.video_id)
    );

    assert_eq!(session.apply_fetch(&second_tag, second), FetchOutcome::Applied);
    assert_eq!(session.apply_fetch(&first_tag, first), FetchOutcome::Stale);

    assert_eq!(session.video_id(), "bbbbbbbbbbb");
    assert_eq!(session.video_title(), "Second video");
    assert_eq!(session.entries().len(), 1);
}

#[tokio::test]
async fn test_failed_fetch_then_manual_transcript() {
    let provider = provider();
    let mut session = SessionState::new();
    let tag = session.begin_load("ccccccccccc");

    let outcome = session.apply_fetch(&tag, provider.fetch("ccccccccccc").await);
    let FetchOutcome::Failed { message } = outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert!(message.contains("No transcript available"));
    assert!(session.is_manual_entry());

    assert!(session.apply_manual_transcript("Words I typed myself."));
    let timestamped = build_init_message(&session, &MessageOptions::default(), &[]);
    session.set_init_scope(InitScope::Plain);
    let plain = build_init_message(&session, &MessageOptions::default(), &[]);
    assert_eq!(timestamped, plain);
    assert!(plain.contains("## Transcript\nWords I typed myself."));
}

#[tokio::test]
async fn test_watch_take_notes_and_export() {
    let provider = provider();
    let mut session = SessionState::new();
    let tag = session.begin_load("aaaaaaaaaaa");
    let fetched = provider.fetch("aaaaaaaaaaa").await;
    assert_eq!(session.apply_fetch(&tag, fetched), FetchOutcome::Applied);

    let clock = ManualClock::new();
    let mut sync = PlaybackSync::new(&clock);

    let update = sync.tick(&mut session, 3.0);
    assert_eq!(update.active_entry, Some(0));
    session.add_note("greeting");

    clock.advance(500);
    sync.tick(&mut session, 11.0);
    assert_eq!(
        build_context_snippet(&session),
        "[Timestamp: 0:11. Video title: \"First video\".]"
    );
    session.add_note("between chapters");

    clock.advance(500);
    sync.tick(&mut session, 15.0);
    session.add_note("the rules");
    session.add_note("   ");
    session.delete_note(7);

    let doc = build_export_document(&session, NaiveDate::from_ymd_opt(2026, 1, 2).unwrap());
    assert_eq!(
        doc.markdown,
        "# Notes: First video\n\n\
         Video: https://www.youtube.com/watch?v=aaaaaaaaaaa\n\
         Exported: 2026-01-02\n\n\
         [00:00 | Opening]\ngreeting\n\n\
         [00:00]\nbetween chapters\n\n\
         [00:12 | Rules]\nthe rules\n"
    );
    assert_eq!(doc.filename, "videotutor-notes-aaaaaaaaaaa.md");
}
