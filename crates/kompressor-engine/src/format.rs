// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Presentation helpers for sizes, percentages and durations.

const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Human-readable byte size with one decimal, using 1024-byte steps.
///
/// Sizes beyond the gigabyte range stay in GB.
pub fn file_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{size:.1} {}", UNITS[unit])
}

/// A percentage value (already scaled to 0–100) with one decimal.
pub fn percentage(value: f64) -> String {
    format!("{value:.1}%")
}

/// Milliseconds below one second, seconds with one decimal above.
pub fn duration(ms: f64) -> String {
    if ms < 1000.0 {
        format!("{ms:.0}ms")
    } else {
        format!("{:.1}s", ms / 1000.0)
    }
}
