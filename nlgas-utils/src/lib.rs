//! Shared utility functions for nlgas crates.

/// Number formatting in the Dutch convention: `.` groups thousands and `,`
/// separates decimals.
pub mod numbers {
    /// Label shown where a value is missing.
    pub const NO_DATA: &str = "no data";

    /// Label shown where a percent change is undefined.
    pub const NOT_AVAILABLE: &str = "n/a";

    fn group_thousands(digits: &str) -> String {
        let mut out = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push('.');
            }
            out.push(c);
        }
        out
    }

    /// Format `value` with `decimals` fraction digits, e.g. "1.234,5".
    pub fn format_decimal(value: f64, decimals: usize) -> String {
        if !value.is_finite() {
            return value.to_string();
        }
        let text = format!("{:.*}", decimals, value.abs());
        let (int_part, frac_part) = match text.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (text.as_str(), None),
        };
        let negative = value < 0.0 && text.chars().any(|c| c.is_ascii_digit() && c != '0');
        let mut out = String::new();
        if negative {
            out.push('-');
        }
        out.push_str(&group_thousands(int_part));
        if let Some(frac) = frac_part {
            out.push(',');
            out.push_str(frac);
        }
        out
    }

    /// Format a rounded integer, e.g. 1234567.4 -> "1.234.567".
    ///
    /// Halves round away from zero, as the national averages do.
    pub fn format_thousands(value: f64) -> String {
        format_decimal(value.round(), 0)
    }

    /// Signed percent change with one decimal, e.g. "+10,0%".
    pub fn format_change(change_pct: Option<f64>) -> String {
        match change_pct {
            Some(pct) if pct.is_finite() => {
                let body = format_decimal(pct, 1);
                if body.starts_with('-') || body == "0,0" {
                    format!("{}%", body)
                } else {
                    format!("+{}%", body)
                }
            }
            _ => NOT_AVAILABLE.to_string(),
        }
    }

    /// Consumption with its unit, or [`NO_DATA`].
    pub fn format_consumption(value: Option<f64>, unit: Option<&str>) -> String {
        match (value, unit) {
            (Some(v), Some(unit)) if !v.is_nan() => format!("{} {}", format_thousands(v), unit),
            (Some(v), None) if !v.is_nan() => format_thousands(v),
            _ => NO_DATA.to_string(),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_format_thousands() {
            assert_eq!(format_thousands(0.0), "0");
            assert_eq!(format_thousands(999.0), "999");
            assert_eq!(format_thousands(1234.0), "1.234");
            assert_eq!(format_thousands(1234567.4), "1.234.567");
            assert_eq!(format_thousands(1500.5), "1.501");
            assert_eq!(format_thousands(-1234.0), "-1.234");
            assert_eq!(format_thousands(-0.2), "0");
        }

        #[test]
        fn test_format_decimal() {
            assert_eq!(format_decimal(1234.5, 1), "1.234,5");
            assert_eq!(format_decimal(0.25, 2), "0,25");
            assert_eq!(format_decimal(-12.345, 1), "-12,3");
        }

        #[test]
        fn test_format_change() {
            assert_eq!(format_change(Some(10.0)), "+10,0%");
            assert_eq!(format_change(Some(-5.26)), "-5,3%");
            assert_eq!(format_change(Some(0.0)), "0,0%");
            assert_eq!(format_change(None), "n/a");
            assert_eq!(format_change(Some(f64::NAN)), "n/a");
        }

        #[test]
        fn test_format_consumption() {
            assert_eq!(format_consumption(Some(1250.0), Some("m³")), "1.250 m³");
            assert_eq!(format_consumption(Some(0.0), None), "0");
            assert_eq!(format_consumption(None, Some("m³")), "no data");
        }
    }
}
