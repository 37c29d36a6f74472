use std::time::Duration;

use crate::{ManifestError, Result};

/// Parse a Go-style duration string such as `90s`, `1h30m` or `1.5h`.
///
/// Accepted units: `ns`, `us`/`µs`, `ms`, `s`, `m`, `h`. A bare `0` is allowed.
pub fn parse_duration(value: &str) -> Result<Duration> {
    let invalid = |reason| ManifestError::InvalidTimeout {
        value: value.to_string(),
        reason,
    };

    let s = value.trim();
    if s.is_empty() {
        return Err(invalid("empty duration"));
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }

    let mut total = 0f64;
    let mut rest = s;
    while !rest.is_empty() {
        let num_end = rest
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .ok_or_else(|| invalid("missing unit"))?;
        if num_end == 0 {
            return Err(invalid("expected a number"));
        }
        let (num_str, tail) = rest.split_at(num_end);
        let num: f64 = num_str.parse().map_err(|_| invalid("malformed number"))?;

        let unit_end = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_end);
        let seconds = match unit {
            "ns" => 1e-9,
            "us" | "µs" => 1e-6,
            "ms" => 1e-3,
            "s" => 1.0,
            "m" => 60.0,
            "h" => 3600.0,
            _ => return Err(invalid("unknown unit")),
        };
        total += num * seconds;
        rest = tail;
    }

    Duration::try_from_secs_f64(total).map_err(|_| invalid("out of range"))
}
