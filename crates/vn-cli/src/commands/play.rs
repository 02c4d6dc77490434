//! Interactive terminal player.

use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph, Wrap};

use vn_core::{Level, Visibility, Voice};

use super::ConsoleStage;
use crate::voice::Gesture;

/// Longest wait for input, so the screen keeps up with the fades.
const MAX_POLL: Duration = Duration::from_millis(250);

pub fn run(script_path: &Path, config: Option<&Path>, mute_until_key: bool) -> Result<(), String> {
    let script = super::load_script(script_path)?;
    let config = super::load_config(config)?;
    let gesture = if mute_until_key {
        Gesture::pending()
    } else {
        Gesture::granted()
    };
    let mut stage = super::build_stage(script, config, &gesture)?;
    stage.start().map_err(|e| e.to_string())?;

    enable_raw_mode().map_err(|e| format!("terminal error: {e}"))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| format!("terminal error: {e}"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| format!("terminal error: {e}"))?;

    let result = run_loop(&mut terminal, &mut stage, &gesture);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    result
}

/// Virtual time follows the wall clock from the moment the loop starts.
fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    stage: &mut ConsoleStage,
    gesture: &Gesture,
) -> Result<(), String> {
    let origin = Instant::now();
    loop {
        stage.run_until(origin.elapsed());
        terminal
            .draw(|frame| draw(frame, stage, gesture))
            .map_err(|e| format!("draw error: {e}"))?;

        let timeout = stage.next_deadline().map_or(MAX_POLL, |deadline| {
            deadline.saturating_sub(origin.elapsed()).min(MAX_POLL)
        });
        if !event::poll(timeout).map_err(|e| format!("event error: {e}"))? {
            continue;
        }

        let Event::Key(key) = event::read().map_err(|e| format!("event error: {e}"))? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        // Ctrl+C always quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(());
        }

        gesture.grant();
        stage.run_until(origin.elapsed());
        match key.code {
            KeyCode::Char('q') => return Ok(()),
            KeyCode::Char(' ') | KeyCode::Enter => {
                stage.press_continue();
            }
            KeyCode::Char(c) => {
                if let Some(digit) = c.to_digit(10) {
                    choose(stage, digit);
                }
            }
            _ => {}
        }
    }
}

/// Choices are numbered from 1 on screen.
fn choose(stage: &mut ConsoleStage, digit: u32) {
    let Some(index) = (digit as usize).checked_sub(1) else {
        return;
    };
    if let Err(e) = stage.choose(index) {
        tracing::debug!(error = %e, "choice ignored");
    }
}

fn draw(frame: &mut Frame, stage: &ConsoleStage, gesture: &Gesture) {
    let page = stage.page();

    // Hidden controls keep their rows; collapsed ones give them up.
    let continue_rows = match page.continue_control() {
        Some(Visibility::Visible | Visibility::Hidden) => 1,
        Some(Visibility::Collapsed) | None => 0,
    };
    let choice_rows = match page.choices_visibility() {
        Some(Visibility::Visible | Visibility::Hidden) => {
            u16::try_from(page.choices().len()).unwrap_or(u16::MAX)
        }
        Some(Visibility::Collapsed) | None => 0,
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),                // Text
            Constraint::Length(continue_rows), // Continue prompt
            Constraint::Length(choice_rows),   // Choices
            Constraint::Length(1),             // Status bar
        ])
        .split(frame.area());

    let title = format!(" {} ", stage.current_passage_name().unwrap_or_default());
    let text = Paragraph::new(page.text())
        .wrap(Wrap { trim: false })
        .block(Block::bordered().title(title));
    frame.render_widget(text, chunks[0]);

    if page.can_continue() {
        let prompt = Span::styled(
            "▼ space to continue ",
            Style::new().add_modifier(Modifier::DIM),
        );
        frame.render_widget(Paragraph::new(prompt).alignment(Alignment::Right), chunks[1]);
    }

    if page.can_choose() {
        let lines: Vec<Line> = page
            .choices()
            .iter()
            .enumerate()
            .map(|(i, label)| {
                Line::from(vec![
                    Span::styled(
                        format!(" {}. ", i + 1),
                        Style::new().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(label.as_str()),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), chunks[2]);
    }

    frame.render_widget(Paragraph::new(status_line(stage, gesture)), chunks[3]);
}

fn status_line(stage: &ConsoleStage, gesture: &Gesture) -> Line<'static> {
    let channel = stage.music().channel();
    let music = match channel.source() {
        Some(source) if !channel.is_paused() => {
            let level = Level::from_volume(channel.volume());
            let filled = usize::from(level.step());
            let empty = usize::from(Level::FULL.step() - level.step());
            let looping = if channel.is_looping() { " ⟳" } else { "" };
            format!(
                " ♪ {source} {}{}{looping} ",
                "█".repeat(filled),
                "░".repeat(empty)
            )
        }
        _ => " ♪ off ".to_string(),
    };

    let mut spans = vec![Span::raw(music)];
    if !gesture.is_granted() {
        spans.push(Span::styled(
            " sound blocked: press any key ",
            Style::new().fg(Color::Yellow),
        ));
    }
    spans.push(Span::styled(
        " q quit",
        Style::new().add_modifier(Modifier::DIM),
    ));
    Line::from(spans)
}
