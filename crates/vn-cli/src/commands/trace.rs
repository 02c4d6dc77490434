use std::path::Path;
use std::time::Duration;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use vn_core::{Level, Voice};
use vn_stage::{StageEvent, StageEventKind};

use crate::voice::Gesture;

pub fn run(
    script_path: &Path,
    passage: Option<&str>,
    hold_ms: u64,
    config: Option<&Path>,
) -> Result<(), String> {
    let script = super::load_script(script_path)?;
    let config = super::load_config(config)?;
    let mut stage = super::build_stage(script, config, &Gesture::granted())?;

    match passage {
        Some(name) => stage.show(name),
        None => stage.start(),
    }
    .map_err(|e| e.to_string())?;

    // Auto-continue after each hold until the passage is out.
    let hold = Duration::from_millis(hold_ms);
    loop {
        while !stage.page().can_continue() && stage.step().is_some() {}
        if !stage.page().can_continue() {
            break;
        }
        stage.run_for(hold);
        stage.press_continue();
    }

    let summary = format!(
        "({}, {} events, {} ms)",
        stage.script().title,
        stage.journal().len(),
        stage.now().as_millis()
    );
    println!(
        "  {} '{}' {}",
        "Trace".bold(),
        stage.current_passage_name().unwrap_or_default(),
        summary.dimmed()
    );
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Event"]);
    for row in coalesce(stage.journal().events()) {
        table.add_row(vec![row.time, row.text]);
    }
    println!("{table}");
    println!();

    let page = stage.page();
    if page.can_choose() {
        println!("  {}", "Choices".bold().underline());
        for (i, label) in page.choices().iter().enumerate() {
            println!("  {}. {label}", i + 1);
        }
        println!();
    }

    let channel = stage.music().channel();
    match channel.source() {
        Some(source) if !channel.is_paused() => println!(
            "  Music: {source} at {}",
            Level::from_volume(channel.volume())
        ),
        _ => println!("  Music: {}", "off".dimmed()),
    }

    Ok(())
}

struct Row {
    time: String,
    text: String,
}

/// Merge runs of revealed characters into one row each.
fn coalesce(events: &[StageEvent]) -> Vec<Row> {
    let mut rows = Vec::new();
    let mut run: Option<(Duration, Duration, String)> = None;

    for event in events {
        if let StageEventKind::CharRevealed(ch) = event.kind {
            match run.as_mut() {
                Some((_, last, text)) => {
                    *last = event.at;
                    text.push(ch);
                }
                None => run = Some((event.at, event.at, ch.to_string())),
            }
            continue;
        }
        if let Some((first, last, text)) = run.take() {
            rows.push(Row {
                time: format_span(first, last),
                text: format!("revealed {text:?}"),
            });
        }
        rows.push(Row {
            time: format_span(event.at, event.at),
            text: colorize_event(&event.kind, &event.description).to_string(),
        });
    }
    if let Some((first, last, text)) = run {
        rows.push(Row {
            time: format_span(first, last),
            text: format!("revealed {text:?}"),
        });
    }
    rows
}

fn format_span(first: Duration, last: Duration) -> String {
    if first == last {
        format!("{} ms", first.as_millis())
    } else {
        format!("{}-{} ms", first.as_millis(), last.as_millis())
    }
}

fn colorize_event(kind: &StageEventKind, description: &str) -> colored::ColoredString {
    match kind {
        StageEventKind::PassageShown { .. } => description.bold(),
        StageEventKind::ChoiceMade { .. } | StageEventKind::ContinuePressed => {
            description.green()
        }
        StageEventKind::ContinueChanged(_) | StageEventKind::ChoicesChanged(_) => {
            description.cyan()
        }
        StageEventKind::MusicRequested { .. } | StageEventKind::MusicStopRequested => {
            description.magenta()
        }
        StageEventKind::TextCleared | StageEventKind::CharRevealed(_) => description.dimmed(),
    }
}
