//! Resolves human-authored price strings ("₹3.8 Cr", "75 lakhs", "50k") into a
//! single base currency unit so listings can be compared and range-filtered.

pub const CRORE: f64 = 10_000_000.0;
pub const LAKH: f64 = 100_000.0;
pub const THOUSAND: f64 = 1_000.0;

/// Normalize a price string. Strings without any digit yield `f64::NAN`.
pub fn normalize_price(raw: &str) -> f64 {
    parse_mantissa(raw) * unit_scale(raw)
}

/// Multiplier implied by the unit token. Crore wins over lakh, lakh over thousand.
pub fn unit_scale(raw: &str) -> f64 {
    let lowered = raw.to_lowercase();
    if lowered.contains("cr") {
        CRORE
    } else if lowered.contains('l') {
        LAKH
    } else if lowered.contains('k') {
        THOUSAND
    } else {
        1.0
    }
}

fn parse_mantissa(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '.')
        .collect();

    // Lenient prefix parse: stop at a second decimal point.
    let mut end = 0;
    let mut seen_point = false;
    let mut seen_digit = false;
    for (idx, ch) in cleaned.char_indices() {
        if ch == '.' {
            if seen_point {
                break;
            }
            seen_point = true;
        } else {
            seen_digit = true;
        }
        end = idx + ch.len_utf8();
    }

    if !seen_digit {
        return f64::NAN;
    }

    cleaned[..end].parse::<f64>().unwrap_or(f64::NAN)
}
