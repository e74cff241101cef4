//! Chat notification parsing.
//!
//! Turns the game's sub-container "check" messages into registry updates.
//! Parsing fails open: a message that cannot be resolved with certainty is
//! skipped whole, and the reason is returned so callers and tests can see
//! why nothing changed.
//!
//! Recognised shapes (case-sensitive):
//! - `"3 x Grimy ranarr weed"`              herb sack contents
//! - `"5 x Ranarr seed."`                   seed box contents (name must be a seed)
//! - `"Sapphires: 2 / Emeralds: 1 / ..."`   gem bag tally
//! - `"The herb sack is empty."` etc.       sack emptied
//! - `"::resetvalue"`                       profit reset command

use std::fmt;
use tracing::debug;

use super::SackKind;
use crate::prices::PriceSource;
use crate::types::ItemId;

/// Chat command that resets session profit.
pub const RESET_COMMAND: &str = "::resetvalue";

const HERB_MARKER: &str = " x Grimy ";
/// Seed box lines name a seed.
const SEED_MARKER: &str = "seed";
/// Oak tree seed, the only seed without "seed" in its name.
const ACORN: &str = "Acorn";
const GEM_TALLY_MARKERS: [&str; 2] = ["Sapphires:", "Emeralds:"];
/// Letter run left behind by `<br>` line breaks in multi-line messages.
const LINE_BREAK_TOKEN: &str = "br";

/// Gem tally names (plural, as the game prints them) to uncut gem items.
const GEM_NAMES: &[(&str, ItemId)] = &[
    ("Sapphires", ItemId::UNCUT_SAPPHIRE),
    ("Emeralds", ItemId::UNCUT_EMERALD),
    ("Rubies", ItemId::UNCUT_RUBY),
    ("Diamonds", ItemId::UNCUT_DIAMOND),
    ("Dragonstones", ItemId::UNCUT_DRAGONSTONE),
];

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// What a recognised notification means for the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// The sack now holds these quantities (overwrite, not delta).
    Observed {
        container: SackKind,
        entries: Vec<(ItemId, i64)>,
    },
    /// The sack was checked and is empty.
    Emptied(SackKind),
    /// The user asked for a profit reset.
    Reset,
}

/// Why a recognised notification was discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The name search found nothing.
    NoMatch { name: String },
    /// The name search found more than one item.
    Ambiguous { name: String, candidates: Vec<ItemId> },
    /// The quantity was not a base-10 integer.
    BadQuantity { raw: String },
    /// Gem names and counts did not pair up.
    GemTallyMismatch { names: usize, counts: usize },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoMatch { name } => write!(f, "no item named '{name}'"),
            SkipReason::Ambiguous { name, candidates } => {
                write!(f, "'{name}' matches {} items", candidates.len())
            }
            SkipReason::BadQuantity { raw } => write!(f, "bad quantity '{raw}'"),
            SkipReason::GemTallyMismatch { names, counts } => {
                write!(f, "gem tally has {names} names but {counts} counts")
            }
        }
    }
}

/// Result of parsing one chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Applied(Notification),
    Skipped(SkipReason),
    /// Not a message this tracker cares about.
    Unrelated,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a chat message into a tracker notification.
pub fn parse_notification(text: &str, prices: &dyn PriceSource) -> ParseOutcome {
    if text == RESET_COMMAND {
        return ParseOutcome::Applied(Notification::Reset);
    }

    if let Some(kind) = SackKind::ALL.iter().find(|k| k.empty_message() == text) {
        return ParseOutcome::Applied(Notification::Emptied(*kind));
    }

    let outcome = if GEM_TALLY_MARKERS.iter().all(|marker| text.contains(marker)) {
        parse_gem_tally(text)
    } else if text.contains(HERB_MARKER) {
        parse_herb(text, prices)
    } else if let Some(seed) = text.strip_suffix('.') {
        parse_seed(seed, prices)
    } else {
        ParseOutcome::Unrelated
    };

    if let ParseOutcome::Skipped(reason) = &outcome {
        debug!(message = text, reason = %reason, "Notification skipped");
    }
    outcome
}

/// `"<qty> x Grimy <name>"`: the item searched is `Grimy <name>`.
fn parse_herb(text: &str, prices: &dyn PriceSource) -> ParseOutcome {
    let Some((raw_qty, name)) = text.split_once(" x ") else {
        return ParseOutcome::Unrelated;
    };
    let quantity = match parse_quantity(raw_qty) {
        Ok(q) => q,
        Err(reason) => return ParseOutcome::Skipped(reason),
    };
    match resolve_single(name.trim(), prices) {
        Ok(id) => ParseOutcome::Applied(Notification::Observed {
            container: SackKind::HerbSack,
            entries: vec![(id, quantity)],
        }),
        Err(reason) => ParseOutcome::Skipped(reason),
    }
}

/// `"<qty> x <name>"` with the trailing period already removed.
fn parse_seed(text: &str, prices: &dyn PriceSource) -> ParseOutcome {
    let Some((raw_qty, name)) = text.split_once(" x ") else {
        return ParseOutcome::Unrelated;
    };
    let name = name.trim();
    if !is_seed_name(name) {
        return ParseOutcome::Unrelated;
    }
    let raw_qty = raw_qty.trim();
    // Only a leading digit run makes this a seed box line.
    if raw_qty.is_empty() || !raw_qty.chars().all(|c| c.is_ascii_digit()) {
        return ParseOutcome::Unrelated;
    }
    let quantity = match parse_quantity(raw_qty) {
        Ok(q) => q,
        Err(reason) => return ParseOutcome::Skipped(reason),
    };
    match resolve_single(name, prices) {
        Ok(id) => ParseOutcome::Applied(Notification::Observed {
            container: SackKind::SeedBox,
            entries: vec![(id, quantity)],
        }),
        Err(reason) => ParseOutcome::Skipped(reason),
    }
}

fn is_seed_name(name: &str) -> bool {
    name == ACORN || name.to_ascii_lowercase().contains(SEED_MARKER)
}

/// Gem bag tally: letter runs are names, digit runs are counts.
fn parse_gem_tally(text: &str) -> ParseOutcome {
    let names: Vec<&str> = text
        .split(|c: char| !c.is_ascii_alphabetic())
        .filter(|token| !token.is_empty() && *token != LINE_BREAK_TOKEN)
        .collect();
    let counts: Vec<&str> = text
        .split(|c: char| !c.is_ascii_digit())
        .filter(|token| !token.is_empty())
        .collect();

    if names.len() != counts.len() {
        return ParseOutcome::Skipped(SkipReason::GemTallyMismatch {
            names: names.len(),
            counts: counts.len(),
        });
    }

    let mut entries = Vec::with_capacity(names.len());
    for (name, raw_qty) in names.iter().zip(&counts) {
        let quantity = match parse_quantity(raw_qty) {
            Ok(q) => q,
            Err(reason) => return ParseOutcome::Skipped(reason),
        };
        match GEM_NAMES.iter().find(|(gem, _)| gem == name) {
            Some((_, id)) => entries.push((*id, quantity)),
            None => debug!(gem = *name, "Unknown gem in tally, pair skipped"),
        }
    }

    if entries.is_empty() {
        return ParseOutcome::Skipped(SkipReason::NoMatch {
            name: names.join(" "),
        });
    }

    ParseOutcome::Applied(Notification::Observed {
        container: SackKind::GemBag,
        entries,
    })
}

fn parse_quantity(raw: &str) -> Result<i64, SkipReason> {
    raw.trim().parse::<i64>().map_err(|_| SkipReason::BadQuantity {
        raw: raw.trim().to_string(),
    })
}

/// Resolve a name to exactly one item, or explain why not.
fn resolve_single(name: &str, prices: &dyn PriceSource) -> Result<ItemId, SkipReason> {
    let candidates = prices.search(name);
    match candidates.as_slice() {
        [only] => Ok(*only),
        [] => Err(SkipReason::NoMatch {
            name: name.to_string(),
        }),
        _ => Err(SkipReason::Ambiguous {
            name: name.to_string(),
            candidates,
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
