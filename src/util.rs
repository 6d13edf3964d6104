pub fn format_timestamp(ts: f64) -> String {
    if ts.fract() == 0.0 && ts.abs() < 1e15 {
        format!("{}", ts as i64)
    } else {
        let formatted = format!("{ts:.3}");
        formatted.trim_end_matches('0').trim_end_matches('.').to_owned()
    }
}

pub fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        return label.to_owned();
    }

    let mut truncated = label
        .chars()
        .take(max_chars.saturating_sub(1))
        .collect::<String>();
    truncated.push('…');
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps() {
        assert_eq!(format_timestamp(42.0), "42");
        assert_eq!(format_timestamp(2.5), "2.5");
        assert_eq!(format_timestamp(0.125), "0.125");
        assert_eq!(format_timestamp(-3.0), "-3");
    }

    #[test]
    fn labels() {
        assert_eq!(truncate_label("short", 8), "short");
        assert_eq!(truncate_label("Since(A, Until(B, C))", 8), "Since(A…");
    }
}
