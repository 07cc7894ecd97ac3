use rust_decimal::Decimal;

/// Statistical median. `None` for an empty slice; the input is left untouched.
pub fn median(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort();

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        return Some(sorted[mid]);
    }

    // Midpoint form stays in range where `low + high` would overflow.
    let (low, high) = (sorted[mid - 1], sorted[mid]);
    Some(low + (high - low) / Decimal::TWO)
}
