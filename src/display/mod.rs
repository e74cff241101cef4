//! Display hand-off.
//!
//! The engine emits a `PanelSnapshot` after every reconcile. Snapshots are
//! plain values: a renderer on another thread can keep one without seeing
//! later changes. Rendering itself belongs to the host; this module only
//! decides the panel's lines, their text and their tone.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::types::{ValuationMode, ValueUpdate};

const TITLE: &str = "Inventory Value";
const STACK_SUFFIXES: [&str; 5] = ["", "K", "M", "B", "T"];

/// Receiver of value updates (the overlay, a log, a test recorder).
pub trait ValueSink {
    fn on_value_updated(&mut self, snapshot: PanelSnapshot);
}

/// Colour hint for a panel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tone {
    Neutral,
    Gain,
    Loss,
}

impl Tone {
    fn for_profit(value: i64) -> Self {
        if value >= 0 {
            Tone::Gain
        } else {
            Tone::Loss
        }
    }
}

/// One label/value row of the panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelLine {
    pub label: &'static str,
    pub value: String,
    pub tone: Tone,
}

/// Immutable copy of what the panel should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PanelSnapshot {
    pub update: ValueUpdate,
    pub mode: ValuationMode,
    pub display_profit: bool,
    pub emitted_at: DateTime<Utc>,
}

impl PanelSnapshot {
    pub fn new(update: ValueUpdate, mode: ValuationMode, display_profit: bool) -> Self {
        Self {
            update,
            mode,
            display_profit,
            emitted_at: Utc::now(),
        }
    }

    pub fn title(&self) -> &'static str {
        TITLE
    }

    /// Panel rows in display order. Profit rows only when enabled.
    pub fn lines(&self) -> Vec<PanelLine> {
        let mut lines = vec![PanelLine {
            label: self.mode.label(),
            value: format_stack_size(self.update.inventory_value),
            tone: Tone::Neutral,
        }];
        if self.display_profit {
            lines.push(PanelLine {
                label: "Profit (inv):",
                value: format_stack_size(self.update.profit_on_hand),
                tone: Tone::for_profit(self.update.profit_on_hand),
            });
            lines.push(PanelLine {
                label: "Profit (banked):",
                value: format_stack_size(self.update.profit_in_bank),
                tone: Tone::for_profit(self.update.profit_in_bank),
            });
        }
        lines
    }
}

/// Format a gold amount the way item stacks are labelled in game:
/// grouped digits below 10,000, then one decimal and a K/M/B/T suffix.
pub fn format_stack_size(quantity: i64) -> String {
    if quantity < 0 {
        return format!("-{}", format_stack_size_unsigned(quantity.unsigned_abs()));
    }
    format_stack_size_unsigned(quantity.unsigned_abs())
}

fn format_stack_size_unsigned(quantity: u64) -> String {
    if quantity < 10_000 {
        return group_thousands(quantity);
    }

    let mut power = 0usize;
    let mut divisor = 1u64;
    while power + 1 < STACK_SUFFIXES.len() && quantity / divisor >= 1_000 {
        divisor *= 1_000;
        power += 1;
    }

    // Truncate to one decimal place.
    let tenths = (quantity as u128 * 10 / divisor as u128) as u64;
    let (whole, fraction) = (tenths / 10, tenths % 10);
    let suffix = STACK_SUFFIXES[power];
    if fraction == 0 {
        format!("{}{suffix}", group_thousands(whole))
    } else {
        format!("{}.{fraction}{suffix}", group_thousands(whole))
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Sink that writes every snapshot to the log.
#[derive(Debug, Default)]
pub struct LogSink;

impl ValueSink for LogSink {
    fn on_value_updated(&mut self, snapshot: PanelSnapshot) {
        info!(
            mode = %snapshot.mode,
            panel = %render(&snapshot),
            "Inventory value updated"
        );
    }
}

/// Single-line text rendering: the title, then each row as "label value".
pub fn render(snapshot: &PanelSnapshot) -> String {
    let rows: Vec<String> = snapshot
        .lines()
        .iter()
        .map(|line| format!("{} {}", line.label, line.value))
        .collect();
    format!("{} | {}", snapshot.title(), rows.join(" | "))
}
