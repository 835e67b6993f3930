use crate::config::VideoType;

/// Upper bound (inclusive) for a short video, in seconds.
pub const SHORT_MAX_SECS: f64 = 180.0;
/// Upper bound (inclusive) for a long-form video, in seconds.
pub const LONG_FORM_MAX_SECS: f64 = 3600.0;

/// Parses an ISO-8601 duration such as `PT1H2M3S` or `P1DT30S` into seconds.
///
/// Weeks, days, hours, minutes and (possibly fractional) seconds are
/// supported. Years and months have no fixed length and are rejected, as
/// is anything else that is not a well-formed duration.
///
/// ```
/// use youtube_data_collector::duration::parse_iso8601_duration;
///
/// assert_eq!(parse_iso8601_duration("PT3M"), Some(180.0));
/// assert_eq!(parse_iso8601_duration("P0D"), Some(0.0));
/// assert_eq!(parse_iso8601_duration("3M"), None);
/// ```
pub fn parse_iso8601_duration(value: &str) -> Option<f64> {
    let rest = value.trim().strip_prefix('P')?;
    let (date_part, time_part) = match rest.split_once('T') {
        Some((date, time)) => {
            if time.is_empty() {
                return None;
            }
            (date, Some(time))
        }
        None => (rest, None),
    };
    if date_part.is_empty() && time_part.is_none() {
        return None;
    }

    let mut total = sum_components(date_part, |unit| match unit {
        'W' => Some(7.0 * 86_400.0),
        'D' => Some(86_400.0),
        _ => None,
    })?;
    if let Some(time) = time_part {
        total += sum_components(time, |unit| match unit {
            'H' => Some(3600.0),
            'M' => Some(60.0),
            'S' => Some(1.0),
            _ => None,
        })?;
    }
    Some(total)
}

fn sum_components(part: &str, unit_secs: impl Fn(char) -> Option<f64>) -> Option<f64> {
    let mut total = 0.0;
    let mut number = String::new();

    for ch in part.chars() {
        if ch.is_ascii_digit() || ch == '.' || ch == ',' {
            number.push(if ch == ',' { '.' } else { ch });
            continue;
        }
        let value: f64 = number.parse().ok()?;
        total += value * unit_secs(ch)?;
        number.clear();
    }

    // trailing digits without a unit designator
    if !number.is_empty() {
        return None;
    }
    Some(total)
}

impl VideoType {
    /// Whether a video of `seconds` length belongs to this category.
    ///
    /// Short covers `0..=180`, long-form covers `180 < d <= 3600`. Longer
    /// videos and [`VideoType::Other`] never match.
    pub fn matches(&self, seconds: f64) -> bool {
        match self {
            VideoType::Short => seconds <= SHORT_MAX_SECS,
            VideoType::LongForm => seconds > SHORT_MAX_SECS && seconds <= LONG_FORM_MAX_SECS,
            VideoType::Other(_) => false,
        }
    }
}
