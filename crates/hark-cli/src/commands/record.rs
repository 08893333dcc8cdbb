//! The default record screen.
//!
//! One loop drives everything at roughly 30 fps: poll the pending
//! transcription, pull a fresh waveform snapshot, draw, then wait up to one
//! frame interval for a key. Stopping a recording hands the clip to a spawned
//! upload task and keeps the loop running, so a new recording can start while
//! the previous upload is still in flight. The loop exits only through the
//! quit flag, checked every frame.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use hark_core::audio::SNAPSHOT_LEN;
use hark_core::{
    Recorder, RecorderConfig, TRANSCRIBE_ERROR_MESSAGE, TranscribeError, TranscriptionClient,
};
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

use crate::app::resolve_session_config;
use crate::args::RecordArgs;
use crate::ui::{AppView, Tui};

/// Frame interval for the render loop (roughly 30 fps).
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

pub async fn run(args: RecordArgs) -> Result<()> {
    let config = resolve_session_config(&args)?;
    let client = TranscriptionClient::new(&config.endpoint, config.timeout)?;

    let mut recorder_config = RecorderConfig::new().with_max_secs(config.max_secs);
    if let Some(device) = &config.device {
        recorder_config = recorder_config.with_device(device.clone());
    }

    let mut app = App::new(recorder_config, client, args.output.clone());

    let mut tui = Tui::enter()?;
    let result = run_loop(&mut tui, &mut app);
    drop(tui);

    // The alternate screen is gone at this point, so repeat the last
    // transcript on stdout where it can be piped or copied.
    if !app.transcript.is_empty() {
        println!("{}", app.transcript);
    }
    result
}

fn run_loop(tui: &mut Tui, app: &mut App) -> Result<()> {
    loop {
        app.poll_transcription();
        app.refresh();
        tui.draw(&app.view())?;

        if event::poll(FRAME_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key.code);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// What a key press should do given the current recorder state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Start,
    Stop,
    Quit,
    None,
}

/// Start and stop are mutually exclusive: while recording only stop applies,
/// while idle only start does. Quit always applies.
fn action_for_key(code: KeyCode, recording: bool) -> Action {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('r') if !recording => Action::Start,
        KeyCode::Char('s') | KeyCode::Char(' ') if recording => Action::Stop,
        _ => Action::None,
    }
}

/// What the observed capture state should do, independent of any key press:
/// a chunk buffer that hit its cap stops the recording on this frame.
fn action_for_capture(full: bool) -> Action {
    if full { Action::Stop } else { Action::None }
}

struct App {
    recorder: Recorder,
    client: Arc<TranscriptionClient>,
    output: Option<PathBuf>,
    transcript: String,
    error: Option<String>,
    pending: Option<oneshot::Receiver<Result<String, TranscribeError>>>,
    snapshot: Vec<u8>,
    should_quit: bool,
}

impl App {
    fn new(
        recorder_config: RecorderConfig,
        client: TranscriptionClient,
        output: Option<PathBuf>,
    ) -> Self {
        Self {
            recorder: Recorder::new(recorder_config),
            client: Arc::new(client),
            output,
            transcript: String::new(),
            error: None,
            pending: None,
            snapshot: vec![128; SNAPSHOT_LEN],
            should_quit: false,
        }
    }

    fn view(&self) -> AppView<'_> {
        AppView {
            snapshot: &self.snapshot,
            transcript: &self.transcript,
            error: self.error.as_deref(),
            device: self.recorder.session().map(|s| s.device_name()),
            elapsed_secs: self
                .recorder
                .session()
                .map(|s| s.elapsed_secs() as u64)
                .unwrap_or(0),
            recording: self.recorder.is_recording(),
            transcribing: self.pending.is_some(),
        }
    }

    /// Pull a fresh waveform snapshot and enforce the recording cap.
    ///
    /// While idle the previous snapshot stays on screen, like a canvas that
    /// simply is not repainted once its draw loop has been cancelled.
    fn refresh(&mut self) {
        let (snapshot, full) = match self.recorder.session() {
            Some(session) => (session.byte_snapshot(), session.is_full()),
            None => return,
        };
        self.apply_capture(snapshot, full);
    }

    /// Fold one frame of capture state into the app: adopt the snapshot,
    /// then stop the recording if the chunk buffer hit its cap.
    fn apply_capture(&mut self, snapshot: Vec<u8>, full: bool) {
        self.snapshot = snapshot;
        if action_for_capture(full) == Action::Stop {
            hark_core::verbose!("recording cap reached, stopping");
            self.stop_recording();
        }
    }

    fn on_key(&mut self, code: KeyCode) {
        match action_for_key(code, self.recorder.is_recording()) {
            Action::Start => self.start_recording(),
            Action::Stop => self.stop_recording(),
            Action::Quit => self.quit(),
            Action::None => {}
        }
    }

    fn start_recording(&mut self) {
        match self.recorder.start() {
            Ok(()) => self.begin_fresh_take(),
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    /// A new take invalidates everything left over from the previous one:
    /// the error line, the transcript pane, and any still-pending upload
    /// result. Dropping the receiver means a stale result can never surface
    /// into the cleared pane later.
    fn begin_fresh_take(&mut self) {
        self.error = None;
        self.transcript.clear();
        self.pending = None;
    }

    /// Stop, optionally save, and kick off the upload without blocking the
    /// frame loop. The start key is usable again as soon as this returns.
    fn stop_recording(&mut self) {
        match self.recorder.stop() {
            Ok(Some(clip)) => {
                self.error = None;
                if let Some(path) = &self.output {
                    if let Err(err) = clip.save(path) {
                        self.error = Some(err.to_string());
                    } else {
                        hark_core::verbose!("saved recording to {}", path.display());
                    }
                }

                let (tx, rx) = oneshot::channel();
                let client = self.client.clone();
                tokio::spawn(async move {
                    let result = client.transcribe(&clip).await;
                    let _ = tx.send(result);
                });
                self.pending = Some(rx);
            }
            Ok(None) => {}
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    /// Check whether the spawned upload has finished, without blocking.
    /// Replacing `pending` on a newer recording drops the old receiver, so a
    /// stale result can never overwrite a newer transcript.
    fn poll_transcription(&mut self) {
        let Some(rx) = &mut self.pending else {
            return;
        };
        match rx.try_recv() {
            Ok(Ok(text)) => {
                self.pending = None;
                self.transcript = text.trim().to_string();
            }
            Ok(Err(err)) => {
                self.pending = None;
                hark_core::verbose!("transcription failed: {err}");
                self.transcript = TRANSCRIBE_ERROR_MESSAGE.to_string();
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Closed) => {
                self.pending = None;
                self.transcript = TRANSCRIBE_ERROR_MESSAGE.to_string();
            }
        }
    }

    /// Stop any live recording (saving it if an output path was given, but
    /// skipping the upload) and leave the loop.
    fn quit(&mut self) {
        if self.recorder.is_recording() {
            if let Ok(Some(clip)) = self.recorder.stop() {
                if let Some(path) = &self.output {
                    if let Err(err) = clip.save(path) {
                        hark_core::verbose!("could not save recording on quit: {err}");
                    }
                }
            }
        }
        self.should_quit = true;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn test_app() -> App {
        let client =
            TranscriptionClient::new("http://127.0.0.1:1/transcribe", Duration::from_secs(1))
                .unwrap();
        App::new(RecorderConfig::default(), client, None)
    }

    #[test]
    fn start_only_applies_while_idle() {
        assert_eq!(action_for_key(KeyCode::Char('r'), false), Action::Start);
        assert_eq!(action_for_key(KeyCode::Char('r'), true), Action::None);
    }

    #[test]
    fn stop_only_applies_while_recording() {
        assert_eq!(action_for_key(KeyCode::Char('s'), true), Action::Stop);
        assert_eq!(action_for_key(KeyCode::Char(' '), true), Action::Stop);
        assert_eq!(action_for_key(KeyCode::Char('s'), false), Action::None);
        assert_eq!(action_for_key(KeyCode::Char(' '), false), Action::None);
    }

    #[test]
    fn quit_applies_in_any_state() {
        assert_eq!(action_for_key(KeyCode::Char('q'), false), Action::Quit);
        assert_eq!(action_for_key(KeyCode::Char('q'), true), Action::Quit);
        assert_eq!(action_for_key(KeyCode::Esc, false), Action::Quit);
        assert_eq!(action_for_key(KeyCode::Esc, true), Action::Quit);
    }

    #[test]
    fn unbound_keys_do_nothing() {
        assert_eq!(action_for_key(KeyCode::Char('x'), false), Action::None);
        assert_eq!(action_for_key(KeyCode::Enter, true), Action::None);
    }

    #[test]
    fn stop_key_while_idle_changes_nothing() {
        let mut app = test_app();
        app.on_key(KeyCode::Char('s'));
        assert!(app.pending.is_none());
        assert!(app.error.is_none());
        assert!(!app.should_quit);
    }

    #[test]
    fn quit_key_sets_the_flag() {
        let mut app = test_app();
        app.on_key(KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn transcript_arrives_trimmed() {
        let mut app = test_app();
        let (tx, rx) = oneshot::channel();
        app.pending = Some(rx);

        tx.send(Ok("  hello world \n".to_string())).unwrap();
        app.poll_transcription();

        assert_eq!(app.transcript, "hello world");
        assert!(app.pending.is_none());
        assert!(!app.view().transcribing);
    }

    #[test]
    fn failed_transcription_shows_the_fixed_message() {
        let mut app = test_app();
        let (tx, rx) = oneshot::channel();
        app.pending = Some(rx);

        tx.send(Err(TranscribeError::InvalidEndpoint("bad".into())))
            .unwrap();
        app.poll_transcription();

        assert_eq!(app.transcript, TRANSCRIBE_ERROR_MESSAGE);
        assert!(app.pending.is_none());
    }

    #[test]
    fn pending_stays_pending_until_the_result_lands() {
        let mut app = test_app();
        let (tx, rx) = oneshot::channel::<Result<String, TranscribeError>>();
        app.pending = Some(rx);

        app.poll_transcription();
        assert!(app.pending.is_some());
        assert!(app.view().transcribing);
        // Start is not blocked by a pending upload.
        assert!(app.view().can_start());

        drop(tx);
    }

    #[test]
    fn dropped_upload_task_degrades_to_the_fixed_message() {
        let mut app = test_app();
        let (tx, rx) = oneshot::channel::<Result<String, TranscribeError>>();
        app.pending = Some(rx);
        drop(tx);

        app.poll_transcription();
        assert_eq!(app.transcript, TRANSCRIBE_ERROR_MESSAGE);
        assert!(app.pending.is_none());
    }

    #[test]
    fn idle_refresh_keeps_the_frozen_snapshot() {
        let mut app = test_app();
        app.snapshot = vec![200; SNAPSHOT_LEN];
        app.refresh();
        assert_eq!(app.snapshot, vec![200; SNAPSHOT_LEN]);
    }

    #[test]
    fn full_buffer_forces_a_stop_on_the_frame_it_is_observed() {
        assert_eq!(action_for_capture(true), Action::Stop);
        assert_eq!(action_for_capture(false), Action::None);
    }

    #[test]
    fn capture_update_adopts_the_snapshot() {
        let mut app = test_app();
        app.apply_capture(vec![150; SNAPSHOT_LEN], false);
        assert_eq!(app.snapshot, vec![150; SNAPSHOT_LEN]);
        assert!(app.pending.is_none());
    }

    #[test]
    fn full_flag_with_no_live_session_is_harmless() {
        // The session can vanish between the full observation and the stop
        // (a stop key racing the cap); the stop must settle as a no-op.
        let mut app = test_app();
        app.apply_capture(vec![150; SNAPSHOT_LEN], true);
        assert_eq!(app.snapshot, vec![150; SNAPSHOT_LEN]);
        assert!(app.pending.is_none());
        assert!(app.error.is_none());
    }

    #[test]
    fn a_new_take_clears_stale_transcript_and_pending_result() {
        let mut app = test_app();
        app.transcript = "old words".to_string();
        app.error = Some("old error".to_string());
        let (_tx, rx) = oneshot::channel::<Result<String, TranscribeError>>();
        app.pending = Some(rx);

        app.begin_fresh_take();
        assert_eq!(app.transcript, "");
        assert!(app.pending.is_none());
        assert!(app.error.is_none());
    }
}
