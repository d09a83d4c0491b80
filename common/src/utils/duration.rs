use std::time::Duration;

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

/// Formats a duration using its two most significant units, e.g. `3d4h`,
/// `5h12m`, `7m3s` or `42s`.
pub fn compact(duration: Duration) -> String {
    let secs = duration.as_secs();
    let (days, hours) = (secs / DAY, secs % DAY / HOUR);
    let (minutes, seconds) = (secs % HOUR / MINUTE, secs % MINUTE);

    if days > 0 {
        format!("{days}d{hours}h")
    } else if hours > 0 {
        format!("{hours}h{minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m{seconds}s")
    } else {
        format!("{seconds}s")
    }
}
