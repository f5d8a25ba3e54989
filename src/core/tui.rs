use crate::core::interview::{QUESTIONS, StatusSnapshot};
use crate::core::output::{compact_line, diagnostic_lines};
use crate::core::pipeline::Build;
use std::env;
use std::path::Path;

const MAX_LINE: usize = 160;

pub fn terminal_width() -> usize {
    env::var("COLUMNS")
        .ok()
        .and_then(|c| c.parse().ok())
        .unwrap_or(80)
}

pub fn print_diagnostics(build: &Build) {
    use colored::Colorize;

    let width = terminal_width().clamp(40, MAX_LINE);
    for line in diagnostic_lines(build) {
        println!("  {} {}", "▸".bright_yellow(), compact_line(&line, width - 4));
    }
}

fn print_interview(status: &StatusSnapshot) {
    use colored::Colorize;

    let Some(next) = status.interview.next.as_deref() else {
        return;
    };
    let text = QUESTIONS
        .iter()
        .find(|q| q.id == next)
        .map(|q| q.text)
        .unwrap_or(next);
    let label = if status.interview.is_complete {
        "next".bright_black()
    } else {
        "missing".yellow()
    };
    match status.interview.next_section.as_deref() {
        Some(section) => println!("  {} {} [{}]: {}", "💡", label, section.bright_black(), text),
        None => println!("  {} {}: {}", "💡", label, text),
    }
}

/// End-of-run summary: counts, then where the artifacts went.
pub fn print_summary(build: &Build, out: Option<&Path>) {
    use colored::Colorize;

    let s = build.summary();
    let counts = [
        ("documents", s.documents),
        ("entities", s.entities),
        ("relations", s.relations),
        ("backlinks", s.backlinks),
    ];
    let rendered = counts
        .iter()
        .map(|(label, n)| format!("{} {}", n.to_string().bright_white().bold(), label))
        .collect::<Vec<_>>()
        .join("  ");
    println!("{} {}", "✅".bright_green(), rendered);

    let problems = s.warnings + s.id_collisions + s.parse_failures + s.scan_failures;
    if problems > 0 {
        print!("{} ", "⚠️".bright_yellow());
        print!("{} {}", s.warnings, "WARN".yellow());
        if s.id_collisions > 0 {
            print!("  {} duplicate ids", s.id_collisions);
        }
        if s.parse_failures > 0 {
            print!("  {} unparsed", s.parse_failures);
        }
        if s.scan_failures > 0 {
            print!("  {} unreadable dirs", s.scan_failures);
        }
        println!();
    }

    print_interview(&build.status);
    if let Some(out) = out {
        println!("  {} {}", "→".bright_cyan(), out.display().to_string().bright_white());
    }
}
