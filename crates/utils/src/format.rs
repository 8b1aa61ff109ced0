const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Human-readable byte size: the largest unit keeping the value in
/// `[1, 1024)`, rounded to two decimals with trailing zeros dropped.
/// Zero is special-cased as `"0 Bytes"`.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let exponent = (bytes.ilog2() / 10).min(SIZE_UNITS.len() as u32 - 1);
    let value = bytes as f64 / 1024f64.powi(exponent as i32);
    let rounded = (value * 100.0).round() / 100.0;

    let mut text = format!("{rounded:.2}");
    while text.ends_with('0') {
        text.pop();
    }
    if text.ends_with('.') {
        text.pop();
    }

    format!("{text} {}", SIZE_UNITS[exponent as usize])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_special_cased() {
        assert_eq!(format_size(0), "0 Bytes");
    }

    #[test]
    fn unit_boundaries() {
        assert_eq!(format_size(1), "1 Bytes");
        assert_eq!(format_size(1023), "1023 Bytes");
        assert_eq!(format_size(1024), "1 KB");
        assert_eq!(format_size(1024 * 1024), "1 MB");
        assert_eq!(format_size(1024 * 1024 * 1024), "1 GB");
    }

    #[test]
    fn whole_values_drop_trailing_zeros() {
        assert_eq!(format_size(2048), "2 KB");
        assert_eq!(format_size(1536), "1.5 KB");
    }

    #[test]
    fn fractional_values_round_to_two_decimals() {
        // 1.46 MB, the shape shown to users for a typical photo.
        assert_eq!(format_size(1_530_920), "1.46 MB");
        assert_eq!(format_size(1100), "1.07 KB");
    }

    #[test]
    fn values_just_under_a_unit_boundary() {
        // Rounding may display 1024 before the unit steps up.
        assert_eq!(format_size(1024 * 1024 - 1), "1024 KB");
        assert_eq!(format_size(1048064), "1023.5 KB");
    }
}
