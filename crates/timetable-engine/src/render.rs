//! Plain-text rendering of a resolved layout.
//!
//! ```text
//!          Mon           Tue           Wed
//!  8:00 am + Software    + Simulation  + Software
//!  8:45 am |             |             |
//!  9:30 am .             .             .
//! ```
//!
//! `+` marks the row a block starts in, `|` a row it covers, `.` a free cell.

use std::fmt::Write;

use crate::config::GridConfig;
use crate::layout::{Cell, Layout};
use crate::slots;

const COLUMN_WIDTH: usize = 14;
const MAX_TITLE_WORDS: usize = 3;

/// Render `layout` as a fixed-width text table, one line per slot.
pub fn render_grid(layout: &Layout, config: &GridConfig) -> String {
    let labels = slots::labels(config);
    let label_width = labels.iter().map(|l| l.len()).max().unwrap_or(0);

    let mut out = String::new();
    let _ = write!(out, "{:label_width$}", "");
    for day in &config.visible_days {
        let _ = write!(out, " {:<COLUMN_WIDTH$}", day.short_name());
    }
    trim_line(&mut out);

    for (slot, label) in labels.iter().enumerate() {
        let _ = write!(out, "{:>label_width$}", label);
        for &day in &config.visible_days {
            let cell = match layout.cell(day, slot) {
                Cell::Start(block) => format!("+ {}", short_title(&block.title)),
                Cell::Covered(_) => "|".to_string(),
                Cell::Empty => ".".to_string(),
            };
            let _ = write!(out, " {:<COLUMN_WIDTH$}", cell);
        }
        trim_line(&mut out);
    }

    out
}

/// First few words of `title`, cut to fit a column.
fn short_title(title: &str) -> String {
    let words: Vec<&str> = title.split_whitespace().collect();
    let mut short = words
        .iter()
        .take(MAX_TITLE_WORDS)
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    if words.len() > MAX_TITLE_WORDS {
        short.push_str("...");
    }
    // Leave room for the "+ " prefix.
    let room = COLUMN_WIDTH - 2;
    if short.chars().count() > room {
        short = short.chars().take(room - 1).collect();
        short.push('~');
    }
    short
}

fn trim_line(out: &mut String) {
    let trimmed = out.trim_end().len();
    out.truncate(trimmed);
    out.push('\n');
}
