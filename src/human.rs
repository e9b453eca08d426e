//! Human-readable sizes and durations for console output.

use std::time::Duration;

const SI_UNITS: [&str; 7] = ["B", "kB", "MB", "GB", "TB", "PB", "EB"];

/// SI (base 1000) size, e.g. `8.2 kB`, `25 kB`, `500 B`
///
/// One decimal below 10 units, none above.
pub fn bytes(n: u64) -> String {
    if n < 10 {
        return format!("{} B", n);
    }

    let mut val = n as f64;
    let mut unit = 0;
    while val >= 1000.0 && unit < SI_UNITS.len() - 1 {
        val /= 1000.0;
        unit += 1;
    }

    let val = (val * 10.0 + 0.5).floor() / 10.0;
    if val < 10.0 {
        format!("{:.1} {}", val, SI_UNITS[unit])
    } else {
        format!("{:.0} {}", val, SI_UNITS[unit])
    }
}

/// Elapsed time, e.g. `350.2ms`, `4.5s`, `2m3.25s`, `1h0m5s`
pub fn duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        return format!("{:?}", d);
    }

    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let rest = Duration::new(secs % 60, d.subsec_nanos()).as_secs_f64();

    if hours > 0 {
        format!("{}h{}m{}s", hours, minutes, rest)
    } else {
        format!("{}m{}s", minutes, rest)
    }
}
