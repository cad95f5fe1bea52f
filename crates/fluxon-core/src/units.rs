//! Physical constants and SI prefix handling.

use std::f64::consts::PI;

/// Planck constant h (J·s).
pub const PLANCK: f64 = 6.626_070_15e-34;

/// Reduced Planck constant ħ = h/2π (J·s).
pub const HBAR: f64 = PLANCK / (2.0 * PI);

/// Elementary charge e (C).
pub const ELEMENTARY_CHARGE: f64 = 1.602_176_634e-19;

/// Magnetic flux quantum Φ₀ = h/2e (Wb).
pub const FLUX_QUANTUM: f64 = PLANCK / (2.0 * ELEMENTARY_CHARGE);

/// Reduced flux quantum ħ/2e (Wb).
///
/// Converts phase to flux, and phase velocity to voltage.
pub const PHI0_BAR: f64 = HBAR / (2.0 * ELEMENTARY_CHARGE);

/// SI prefixes accepted by [`parse_value`], upper-cased. `MEG` is mega and
/// `M` is milli.
const INPUT_PREFIXES: [(&str, f64); 10] = [
    ("T", 1e12),
    ("G", 1e9),
    ("MEG", 1e6),
    ("K", 1e3),
    ("", 1.0),
    ("M", 1e-3),
    ("U", 1e-6),
    ("N", 1e-9),
    ("P", 1e-12),
    ("F", 1e-15),
];

/// Unit symbols that may follow the prefix, upper-cased.
const UNITS: [&str; 8] = ["OHM", "RAD", "A", "H", "F", "S", "V", "J"];

/// Prefixes used by [`format_value`], largest first.
const OUTPUT_PREFIXES: [(&str, f64); 11] = [
    ("T", 1e12),
    ("G", 1e9),
    ("M", 1e6),
    ("k", 1e3),
    ("", 1.0),
    ("m", 1e-3),
    ("u", 1e-6),
    ("n", 1e-9),
    ("p", 1e-12),
    ("f", 1e-15),
    ("a", 1e-18),
];

fn prefix_multiplier(prefix: &str) -> Option<f64> {
    INPUT_PREFIXES
        .iter()
        .find(|(p, _)| *p == prefix)
        .map(|(_, m)| *m)
}

/// Parse a value with an optional SI prefix and unit symbol, e.g. `1u`,
/// `1uA`, `2.5nH`, `10fF`, `3.14rad`.
///
/// Matching is case-insensitive, so `M` is milli and mega is `MEG`. A lone
/// `F` is femto, as in SPICE; farads need a prefix (`1fF`) or none (`1e-15`).
pub fn parse_value(s: &str) -> Option<f64> {
    let s = s.trim().to_uppercase();

    if let Ok(v) = s.parse::<f64>() {
        return Some(v);
    }

    // Find where the numeric part ends
    let num_end = s
        .find(|c: char| !c.is_ascii_digit() && c != '.' && c != '-' && c != '+' && c != 'E')
        .unwrap_or(s.len());

    if num_end == 0 {
        return None;
    }

    let (num_str, suffix) = s.split_at(num_end);
    let value: f64 = num_str.parse().ok()?;

    let multiplier = prefix_multiplier(suffix).or_else(|| {
        UNITS
            .iter()
            .find_map(|unit| suffix.strip_suffix(unit).and_then(prefix_multiplier))
    })?;

    Some(value * multiplier)
}

/// Format a value with an SI prefix, falling back to scientific notation
/// outside the prefix range.
pub fn format_value(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{:.4}", value);
    }
    let abs_value = value.abs();
    match OUTPUT_PREFIXES.iter().find(|(_, scale)| abs_value >= *scale) {
        Some((prefix, scale)) if abs_value < 1e15 => format!("{:.4}{}", value / scale, prefix),
        _ => format!("{:.4e}", value),
    }
}

/// Format an energy in joules together with its frequency equivalent E/h.
///
/// Circuit energies are around 1e-22 J, far below any SI prefix.
pub fn format_energy(joules: f64) -> String {
    format!("{:.4e} J ({}Hz)", joules, format_value(joules / PLANCK))
}
