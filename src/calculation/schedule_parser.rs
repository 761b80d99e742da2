//! Slab schedule parsing functionality.
//!
//! Turns user-supplied schedule text into an ordered list of [`Slab`]s.
//! The grammar, one slab per line (blank lines ignored):
//!
//! ```text
//! <min>-<max>=<rate>          fixed rate per transaction, min <= amount <= max
//! ><threshold>=<percent>%     percent of the volume of amounts above threshold
//! ```

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::models::{Schedule, Slab};

const GRAMMAR_HINT: &str = "expected '<min>-<max>=<rate>' or '><threshold>=<percent>%'";

/// How malformed schedule lines are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseMode {
    /// The first malformed line fails the whole parse.
    #[default]
    Strict,
    /// Malformed lines are skipped and reported.
    Lenient,
}

/// A line dropped by a lenient parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedLine {
    /// The 1-based line number.
    pub line_number: usize,
    /// The line, trimmed.
    pub line: String,
    /// Why the line was rejected.
    pub reason: String,
}

/// The result of parsing schedule text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSchedule {
    /// The parsed schedule, slabs in input order.
    pub schedule: Schedule,
    /// Lines skipped in lenient mode. Always empty in strict mode.
    pub skipped_lines: Vec<SkippedLine>,
}

/// Parses schedule text into a named [`Schedule`].
///
/// Slab `i` of the output corresponds to the `i`-th non-blank line of the
/// input. In [`ParseMode::Strict`] the first malformed line fails with
/// `ConfigParseError`; in [`ParseMode::Lenient`] it is skipped and recorded.
/// A schedule left with no slabs is always an error.
///
/// # Examples
///
/// ```
/// use slab_charges::calculation::{parse_schedule, ParseMode};
/// use slab_charges::models::Slab;
/// use rust_decimal::Decimal;
///
/// let parsed = parse_schedule("ours", "100-1000=5\n1001-7000=7\n>7000=1%", ParseMode::Strict).unwrap();
/// assert_eq!(parsed.schedule.slabs.len(), 3);
/// assert_eq!(
///     parsed.schedule.slabs[2],
///     Slab::Percentage { min: Decimal::new(7000, 0), percent: Decimal::new(1, 0) }
/// );
/// ```
///
/// ```
/// use slab_charges::calculation::{parse_schedule, ParseMode};
/// use slab_charges::error::EngineError;
///
/// let err = parse_schedule("ours", "100-1000=5\nabc", ParseMode::Strict).unwrap_err();
/// assert!(matches!(err, EngineError::ConfigParseError { line_number: 2, .. }));
/// ```
pub fn parse_schedule(name: &str, text: &str, mode: ParseMode) -> EngineResult<ParsedSchedule> {
    parse_schedule_lines(name, text.lines(), mode)
}

/// Parses a sequence of schedule lines into a named [`Schedule`].
///
/// Behaves like [`parse_schedule`] with each item treated as one line.
pub fn parse_schedule_lines<'a, I>(name: &str, lines: I, mode: ParseMode) -> EngineResult<ParsedSchedule>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut slabs = Vec::new();
    let mut skipped_lines = Vec::new();

    for (index, raw) in lines.into_iter().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let line_number = index + 1;

        match parse_slab(line) {
            Ok(slab) => slabs.push(slab),
            Err(message) => match mode {
                ParseMode::Strict => {
                    return Err(EngineError::ConfigParseError {
                        line_number,
                        line: line.to_string(),
                        message,
                    });
                }
                ParseMode::Lenient => {
                    warn!(
                        schedule = %name,
                        line_number,
                        line = %line,
                        reason = %message,
                        "Skipping malformed slab line"
                    );
                    skipped_lines.push(SkippedLine {
                        line_number,
                        line: line.to_string(),
                        reason: message,
                    });
                }
            },
        }
    }

    if slabs.is_empty() {
        return Err(EngineError::ConfigParseError {
            line_number: 0,
            line: String::new(),
            message: "schedule contains no slabs".to_string(),
        });
    }

    Ok(ParsedSchedule {
        schedule: Schedule::new(name, slabs),
        skipped_lines,
    })
}

/// Parses one trimmed, non-blank line.
fn parse_slab(line: &str) -> Result<Slab, String> {
    let (lhs, rhs) = line
        .split_once('=')
        .ok_or_else(|| format!("missing '='; {}", GRAMMAR_HINT))?;

    if let Some(threshold) = lhs.trim().strip_prefix('>') {
        let percent = rhs
            .trim()
            .strip_suffix('%')
            .ok_or_else(|| "percentage slab must end with '%'".to_string())?;
        return Ok(Slab::Percentage {
            min: parse_number(threshold, "threshold")?,
            percent: parse_number(percent, "percent")?,
        });
    }

    let (min, max) = lhs
        .split_once('-')
        .ok_or_else(|| format!("missing range; {}", GRAMMAR_HINT))?;
    if rhs.trim().ends_with('%') {
        return Err("percentage rates need a '>' threshold instead of a range".to_string());
    }

    let min = parse_number(min, "min")?;
    let max = parse_number(max, "max")?;
    if min > max {
        return Err(format!(
            "min {} is greater than max {}",
            min.normalize(),
            max.normalize()
        ));
    }

    Ok(Slab::FixedRate {
        min,
        max,
        rate: parse_number(rhs, "rate")?,
    })
}

/// Parses a non-negative decimal field.
fn parse_number(token: &str, field: &str) -> Result<Decimal, String> {
    let token = token.trim();
    if token.is_empty() {
        return Err(format!("{} is missing", field));
    }
    let value =
        Decimal::from_str(token).map_err(|_| format!("{} '{}' is not a number", field, token))?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(format!("{} must not be negative", field));
    }
    Ok(value)
}
