use std::path::Path;

use colored::Colorize;

pub fn run(path: &Path) -> Result<(), String> {
    let script = super::load_script(path)?;

    let name = if script.title.is_empty() {
        path.display().to_string()
    } else {
        script.title.clone()
    };
    let choices: usize = script.passages.values().map(|p| p.choices.len()).sum();
    let lines: usize = script.passages.values().map(|p| p.lines.len()).sum();

    println!("  All checks passed for '{name}'.");
    println!(
        "  {} passages, {} choices, {} lines",
        script.passages.len(),
        choices,
        lines
    );
    println!("  Starts at '{}'", script.start);

    let endings = script.endings();
    if !endings.is_empty() {
        println!("  Endings: {}", endings.join(", "));
    }
    for orphan in script.unreachable() {
        println!(
            "  {} passage '{orphan}' is never reached",
            "warning:".yellow().bold()
        );
    }

    Ok(())
}
