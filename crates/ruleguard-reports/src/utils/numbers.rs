/// Compact row counts: `2.3M`, `4.5K`, `789`.
pub fn format_numbers(n: usize) -> String {
    match n {
        n if n >= 1_000_000_000 => format!("{:0.1}B", n as f64 / 1_000_000_000.0),
        n if n >= 1_000_000 => format!("{:0.1}M", n as f64 / 1_000_000.0),
        n if n >= 1_000 => format!("{:0.1}K", n as f64 / 1_000.0),
        _ => n.to_string(),
    }
}

/// Share of `part` in `total` as a percentage; an empty total gives 0.
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 / total as f64 * 100.0
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_format_b() {
        assert_eq!(format_numbers(2_736_123_123), "2.7B");
    }

    #[test]
    fn test_format_m() {
        assert_eq!(format_numbers(2_336_123), "2.3M");
    }

    #[test]
    fn test_format_k() {
        assert_eq!(format_numbers(4_536), "4.5K");
        assert_eq!(format_numbers(1_000), "1.0K");
    }

    #[test]
    fn test_format() {
        assert_eq!(format_numbers(789), "789");
        assert_eq!(format_numbers(0), "0");
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(1, 4), 25.0);
        assert_eq!(percentage(3, 0), 0.0);
    }
}
