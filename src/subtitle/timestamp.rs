use crate::error::{Result, WhisperBatchError};

/// Format an offset in seconds as `HH:MM:SS<sep>mmm`.
///
/// The offset is rounded to the nearest millisecond (half away from zero).
/// Negative and NaN offsets clamp to zero. The hour field is at least two
/// digits wide and grows past 99 hours.
pub fn format_timestamp(seconds: f64, separator: char) -> String {
    let total_milliseconds = (seconds.max(0.0) * 1000.0).round() as u64;
    let hours = total_milliseconds / 3_600_000;
    let minutes = (total_milliseconds % 3_600_000) / 60_000;
    let secs = (total_milliseconds % 60_000) / 1_000;
    let millis = total_milliseconds % 1_000;

    format!("{:02}:{:02}:{:02}{}{:03}", hours, minutes, secs, separator, millis)
}

/// SRT time format (HH:MM:SS,mmm)
pub fn srt_timestamp(seconds: f64) -> String {
    format_timestamp(seconds, ',')
}

/// WebVTT time format (HH:MM:SS.mmm)
pub fn vtt_timestamp(seconds: f64) -> String {
    format_timestamp(seconds, '.')
}

/// Parse a clock-string written by [`format_timestamp`] back into seconds.
/// Either `,` or `.` is accepted before the millisecond field.
pub fn parse_timestamp(value: &str) -> Result<f64> {
    let invalid = || WhisperBatchError::InvalidTimestamp(value.to_string());

    let (clock, millis) = value
        .rsplit_once(|c: char| c == ',' || c == '.')
        .ok_or_else(invalid)?;
    if millis.len() != 3 {
        return Err(invalid());
    }

    let mut fields = clock.split(':');
    let (Some(hours), Some(minutes), Some(secs), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(invalid());
    };

    let parse = |field: &str| field.parse::<u64>().map_err(|_| invalid());
    let (hours, minutes, secs, millis) = (parse(hours)?, parse(minutes)?, parse(secs)?, parse(millis)?);
    if minutes >= 60 || secs >= 60 {
        return Err(invalid());
    }

    let total_milliseconds = hours
        .checked_mul(3_600_000)
        .and_then(|ms| ms.checked_add(minutes * 60_000 + secs * 1_000 + millis))
        .ok_or_else(invalid)?;
    Ok(total_milliseconds as f64 / 1000.0)
}
