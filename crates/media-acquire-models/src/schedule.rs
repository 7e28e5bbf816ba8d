//! Cron expressions.
//!
//! Schedules are written either in classic 5-field form (minute hour
//! day-of-month month day-of-week, Sunday = 0 or 7) or in the scheduler's
//! native 6-field form with a leading seconds field (Sunday = 1). Both the
//! config validator and the job registry go through [`normalize_cron`], so a
//! schedule that validates is one the registry can install.

use cron::Schedule;
use std::collections::BTreeSet;
use std::str::FromStr;

/// Rewrite `expr` into the 6-field form the scheduler parses, and check that it parses
pub fn normalize_cron(expr: &str) -> Result<String, String> {
    let fields: Vec<&str> = expr.split_whitespace().collect();
    let normalized = match fields.as_slice() {
        [minute, hour, day, month, weekday] => format!(
            "0 {} {} {} {} {}",
            minute,
            hour,
            day,
            month,
            classic_weekdays(weekday)?
        ),
        [_, _, _, _, _, _] => fields.join(" "),
        _ => return Err(format!("expected 5 or 6 fields, found {}", fields.len())),
    };

    Schedule::from_str(&normalized).map_err(|e| e.to_string())?;
    Ok(normalized)
}

/// Map a classic day-of-week field (0-7, Sunday twice) onto 1-7 starting at Sunday
fn classic_weekdays(field: &str) -> Result<String, String> {
    if field == "*" || field == "?" {
        return Ok(field.to_string());
    }

    let mut days = BTreeSet::new();
    let mut named = Vec::new();
    for part in field.split(',') {
        // Names (MON, Fri-Sun) and L/# modifiers mean the same in both dialects
        if part.chars().any(|c| c.is_ascii_alphabetic() || c == '#') {
            named.push(part.to_string());
            continue;
        }
        days.extend(expand_weekday_part(part)?);
    }

    let mut out: Vec<String> = days.iter().map(|day| (day + 1).to_string()).collect();
    out.extend(named);
    Ok(out.join(","))
}

/// Expand one list element (`*/2`, `1-5`, `3`, `1/2`) into classic day numbers 0-6
fn expand_weekday_part(part: &str) -> Result<Vec<u8>, String> {
    let (range, step) = match part.split_once('/') {
        Some((range, step)) => {
            let step: u8 = step
                .parse()
                .map_err(|_| format!("invalid day-of-week step in '{}'", part))?;
            if step == 0 {
                return Err(format!("day-of-week step must be positive in '{}'", part));
            }
            (range, Some(step))
        }
        None => (part, None),
    };

    let (start, end) = if range == "*" {
        (0, 6)
    } else if let Some((start, end)) = range.split_once('-') {
        (weekday_number(start, part)?, weekday_number(end, part)?)
    } else {
        let start = weekday_number(range, part)?;
        // `n/step` runs to Saturday
        (start, if step.is_some() { 6 } else { start })
    };
    if start > end {
        return Err(format!("day-of-week range '{}' runs backwards", part));
    }

    Ok((start..=end)
        .step_by(usize::from(step.unwrap_or(1)))
        .map(|day| day % 7)
        .collect())
}

fn weekday_number(raw: &str, part: &str) -> Result<u8, String> {
    match raw.parse::<u8>() {
        Ok(day) if day <= 7 => Ok(day),
        _ => Err(format!("day-of-week '{}' is not between 0 and 7", part)),
    }
}
