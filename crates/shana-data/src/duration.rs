//! Duration literal formatting and parsing.
//!
//! Durations travel through the generic container as literals such as
//! `"8.321s"`, `"13m20s"` or `"1h0m0s"`: an optional sign followed by one or
//! more `<number><unit>` terms. Units are `ns`, `us` (`µs`, `μs`), `ms`, `s`,
//! `m` and `h`; numbers may carry a fractional part.

use crate::error::{DataError, DataResult};
use std::fmt::Write;
use std::time::Duration;

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SECOND: u128 = 1_000_000_000;
const NANOS_PER_MINUTE: u128 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: u128 = 60 * NANOS_PER_MINUTE;

/// Format a duration as a literal.
///
/// Sub-second durations use the largest fitting unit among `ns`, `µs` and
/// `ms`; longer ones are written as `[<h>h][<m>m]<s>s`, with the hour and
/// minute terms present once a larger term is non-zero. A zero duration is
/// `"0s"`.
pub fn format_duration(d: Duration) -> String {
    let nanos = d.as_nanos();

    if nanos == 0 {
        return "0s".to_string();
    }

    if nanos < NANOS_PER_SECOND {
        if nanos < NANOS_PER_MICRO {
            return format!("{nanos}ns");
        }

        if nanos < NANOS_PER_MILLI {
            return format!("{}µs", fixed_point(nanos, 3));
        }

        return format!("{}ms", fixed_point(nanos, 6));
    }

    let mut out = String::new();
    let hours = nanos / NANOS_PER_HOUR;
    let minutes = nanos % NANOS_PER_HOUR / NANOS_PER_MINUTE;
    let seconds = nanos % NANOS_PER_MINUTE;

    if hours > 0 {
        let _ = write!(out, "{hours}h");
    }

    if hours > 0 || minutes > 0 {
        let _ = write!(out, "{minutes}m");
    }

    let _ = write!(out, "{}s", fixed_point(seconds, 9));
    out
}

/// Render `value / 10^precision` without trailing fractional zeros.
fn fixed_point(value: u128, precision: u32) -> String {
    let scale = 10u128.pow(precision);
    let int = value / scale;
    let frac = value % scale;

    if frac == 0 {
        return int.to_string();
    }

    let digits = format!("{:0width$}", frac, width = precision as usize);
    format!("{int}.{}", digits.trim_end_matches('0'))
}

/// Parse a duration literal.
///
/// `"0"` is accepted without a unit. Negative literals are rejected unless
/// they are zero, since `Duration` is unsigned.
pub fn parse_duration(input: &str) -> DataResult<Duration> {
    let mut s = input;
    let mut negative = false;

    if let Some(rest) = s.strip_prefix('-') {
        negative = true;
        s = rest;
    } else if let Some(rest) = s.strip_prefix('+') {
        s = rest;
    }

    if s == "0" {
        return Ok(Duration::ZERO);
    }

    if s.is_empty() {
        return Err(DataError::invalid_duration(input, "empty literal"));
    }

    let mut total: u128 = 0;

    while !s.is_empty() {
        let (int_digits, rest) = split_digits(s);
        let mut value: u128 = 0;

        for d in int_digits.bytes() {
            value = value * 10 + u128::from(d - b'0');

            if value > u128::from(u64::MAX) {
                return Err(DataError::invalid_duration(input, "out of range"));
            }
        }

        s = rest;

        let mut frac: u128 = 0;
        let mut scale: u128 = 1;
        let mut has_frac = false;

        if let Some(rest) = s.strip_prefix('.') {
            let (frac_digits, rest) = split_digits(rest);
            has_frac = !frac_digits.is_empty();

            for d in frac_digits.bytes() {
                // Digits past nanosecond precision cannot change the result.
                if scale >= NANOS_PER_SECOND * NANOS_PER_HOUR {
                    break;
                }

                frac = frac * 10 + u128::from(d - b'0');
                scale *= 10;
            }

            s = rest;
        }

        if int_digits.is_empty() && !has_frac {
            return Err(DataError::invalid_duration(input, "expected a number"));
        }

        let unit_len = s
            .char_indices()
            .find(|(_, c)| *c == '.' || c.is_ascii_digit())
            .map_or(s.len(), |(i, _)| i);
        let (unit, rest) = s.split_at(unit_len);
        s = rest;

        let unit = match unit {
            "" => return Err(DataError::invalid_duration(input, "missing unit")),
            "ns" => 1,
            "us" | "µs" | "μs" => NANOS_PER_MICRO,
            "ms" => NANOS_PER_MILLI,
            "s" => NANOS_PER_SECOND,
            "m" => NANOS_PER_MINUTE,
            "h" => NANOS_PER_HOUR,
            _ => return Err(DataError::invalid_duration(input, "unknown unit")),
        };

        total += value * unit + frac * unit / scale;

        if total > u128::from(u64::MAX) {
            return Err(DataError::invalid_duration(input, "out of range"));
        }
    }

    if negative && total != 0 {
        return Err(DataError::invalid_duration(input, "negative duration"));
    }

    Ok(Duration::from_nanos(total as u64))
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(s.len());
    s.split_at(end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::ZERO), "0s");
        assert_eq!(format_duration(Duration::from_nanos(999)), "999ns");
        assert_eq!(format_duration(Duration::from_nanos(1500)), "1.5µs");
        assert_eq!(format_duration(Duration::from_millis(300)), "300ms");
        assert_eq!(format_duration(Duration::from_millis(8321)), "8.321s");
        assert_eq!(format_duration(Duration::from_secs(800)), "13m20s");
        assert_eq!(format_duration(Duration::from_secs(3600)), "1h0m0s");
        assert_eq!(format_duration(Duration::from_secs(20 * 60)), "20m0s");
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
        assert_eq!(parse_duration("8.321s").unwrap(), Duration::from_millis(8321));
        assert_eq!(parse_duration("13m20s").unwrap(), Duration::from_secs(800));
        assert_eq!(parse_duration("1.5h").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_duration("1h0m0s").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_duration("300ms").unwrap(), Duration::from_millis(300));
        assert_eq!(parse_duration("1.5µs").unwrap(), Duration::from_nanos(1500));
        assert_eq!(parse_duration("2us").unwrap(), Duration::from_micros(2));
        assert_eq!(parse_duration("+5s").unwrap(), Duration::from_secs(5));
        assert_eq!(parse_duration(".5s").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("-0s").unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_parse_duration_errors() {
        for bad in ["", "-", "1", "s", "1x", "1.s.", "-3s", "99999999999h"] {
            assert!(
                matches!(parse_duration(bad), Err(DataError::InvalidDuration { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_format_parse_agree() {
        for nanos in [1, 1_500, 2_000_000, 8_321_000_000, 3_723_000_000_000] {
            let d = Duration::from_nanos(nanos);
            assert_eq!(parse_duration(&format_duration(d)).unwrap(), d);
        }
    }
}
