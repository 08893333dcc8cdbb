//! Terminal setup and frame rendering.
//!
//! [`Tui`] brackets raw mode and the alternate screen, restoring the terminal
//! on drop so a panic or early return cannot leave the shell unusable.
//! [`draw`] renders one frame from an [`AppView`], a plain snapshot of app
//! state with no handles into the recorder, which keeps rendering testable.

pub mod waveform;

use std::io::Stdout;

use anyhow::{Context, Result};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};

use waveform::WaveformWidget;

/// Everything a frame needs to know about the app.
pub struct AppView<'a> {
    pub snapshot: &'a [u8],
    pub transcript: &'a str,
    pub error: Option<&'a str>,
    pub device: Option<&'a str>,
    pub elapsed_secs: u64,
    pub recording: bool,
    pub transcribing: bool,
}

impl AppView<'_> {
    /// Start is available whenever no recording is running, including while
    /// a transcription request is still in flight.
    pub fn can_start(&self) -> bool {
        !self.recording
    }

    pub fn can_stop(&self) -> bool {
        self.recording
    }
}

/// Raw mode + alternate screen, restored on drop.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Tui {
    pub fn enter() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = std::io::stdout();
        crossterm::execute!(stdout, EnterAlternateScreen)
            .context("Failed to enter alternate screen")?;
        let terminal =
            Terminal::new(CrosstermBackend::new(stdout)).context("Failed to create terminal")?;
        Ok(Self { terminal })
    }

    pub fn draw(&mut self, view: &AppView) -> Result<()> {
        self.terminal.draw(|frame| draw(frame, view))?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = crossterm::execute!(std::io::stdout(), LeaveAlternateScreen);
    }
}

/// Render one frame: waveform on top, transcript below, then status and keys.
pub fn draw(frame: &mut Frame, view: &AppView) {
    let chunks = Layout::vertical([
        Constraint::Min(6),
        Constraint::Length(6),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .split(frame.area());

    draw_waveform(frame, view, chunks[0]);
    draw_transcript(frame, view, chunks[1]);
    draw_status(frame, view, chunks[2]);
    draw_footer(frame, view, chunks[3]);
}

fn draw_waveform(frame: &mut Frame, view: &AppView, area: Rect) {
    let block = Block::bordered().title(" hark ");
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(WaveformWidget::new(view.snapshot), inner);
}

fn draw_transcript(frame: &mut Frame, view: &AppView, area: Rect) {
    let block = Block::bordered().title(" transcript ");

    let text: Line = if view.transcript.is_empty() {
        if view.transcribing {
            "Transcribing…".italic().dim().into()
        } else {
            "Transcript will appear here.".dim().into()
        }
    } else {
        Line::from(view.transcript)
    };

    let paragraph = Paragraph::new(text).wrap(Wrap { trim: false }).block(block);
    frame.render_widget(paragraph, area);
}

fn draw_status(frame: &mut Frame, view: &AppView, area: Rect) {
    let line: Line = if let Some(err) = view.error {
        Line::from(vec![" ✗ ".into(), Span::styled(err, Style::new().fg(Color::Red))])
    } else if view.recording {
        let mut spans: Vec<Span> = vec![
            " ".into(),
            "●".fg(Color::Red),
            format!(" recording {}", fmt_elapsed_compact(view.elapsed_secs)).into(),
        ];
        if let Some(device) = view.device {
            spans.push(format!(" on {device}").dim());
        }
        Line::from(spans)
    } else if view.transcribing {
        Line::from(vec![" ".into(), "◌ transcribing…".dim()])
    } else {
        Line::from(vec![" ".into(), "idle".dim()])
    };

    frame.render_widget(Paragraph::new(line), area);
}

fn draw_footer(frame: &mut Frame, view: &AppView, area: Rect) {
    let mut spans: Vec<Span> = vec![" ".into()];
    spans.extend(key_hint("r", "record", view.can_start()));
    spans.extend(key_hint("s", "stop", view.can_stop()));
    spans.extend(key_hint("q", "quit", true));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// One key hint, dimmed out while its action is unavailable.
fn key_hint(key: &'static str, label: &'static str, enabled: bool) -> Vec<Span<'static>> {
    if enabled {
        vec![key.bold(), format!(" {label}   ").into()]
    } else {
        vec![key.dim(), format!(" {label}   ").dim()]
    }
}

// Format elapsed seconds into a compact human-friendly form for the status
// line. Examples: 0s, 59s, 1m 00s, 59m 59s, 1h 00m 00s
pub fn fmt_elapsed_compact(elapsed_secs: u64) -> String {
    if elapsed_secs < 60 {
        return format!("{elapsed_secs}s");
    }
    if elapsed_secs < 3600 {
        let minutes = elapsed_secs / 60;
        let seconds = elapsed_secs % 60;
        return format!("{minutes}m {seconds:02}s");
    }
    let hours = elapsed_secs / 3600;
    let minutes = (elapsed_secs % 3600) / 60;
    let seconds = elapsed_secs % 60;
    format!("{hours}h {minutes:02}m {seconds:02}s")
}
