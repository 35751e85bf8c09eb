//! Formatting helpers for the binary's stderr/stdout output.

/// Human-readable byte count.
pub fn format_size(bytes: usize) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[unit])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

/// Microsecond timing with a unit that keeps the number readable.
pub fn format_micros(micros: u128) -> String {
    if micros >= 1_000_000 {
        format!("{:.2} s", micros as f64 / 1_000_000.0)
    } else if micros >= 1_000 {
        format!("{:.2} ms", micros as f64 / 1_000.0)
    } else {
        format!("{} us", micros)
    }
}

/// Dim ANSI styling when stderr is a terminal, plain text otherwise.
pub fn dim(text: &str) -> String {
    if atty::is(atty::Stream::Stderr) {
        format!("\x1b[2m{}\x1b[0m", text)
    } else {
        text.to_string()
    }
}
