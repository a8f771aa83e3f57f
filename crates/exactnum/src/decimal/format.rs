//! String rendering: plain, scientific and engineering notation.

use std::fmt;

use super::BigDecimal;

impl BigDecimal {
    fn sign_prefix(&self) -> &'static str {
        if self.is_negative() { "-" } else { "" }
    }

    /// All digits with the decimal point placed by the scale; never uses an exponent.
    #[must_use]
    pub fn to_plain_string(&self) -> String {
        let digits = self.digits();
        let sign = self.sign_prefix();
        if self.scale <= 0 {
            let zeros = if self.is_zero() { 0 } else { self.scale.unsigned_abs() as usize };
            return format!("{sign}{digits}{}", "0".repeat(zeros));
        }
        let scale = self.scale.unsigned_abs() as usize;
        if scale < digits.len() {
            let (int_part, frac_part) = digits.split_at(digits.len() - scale);
            format!("{sign}{int_part}.{frac_part}")
        } else {
            format!("{sign}0.{}{digits}", "0".repeat(scale - digits.len()))
        }
    }

    /// One leading digit, the remaining digits after a point, then `marker` and a signed exponent.
    ///
    /// ```
    /// # use exactnum::BigDecimal;
    /// let value: BigDecimal = "-1234.5".parse().unwrap();
    /// assert_eq!(value.to_scientific_notation('e'), "-1.2345e+3");
    /// ```
    #[must_use]
    pub fn to_scientific_notation(&self, marker: char) -> String {
        let mut out = self.scientific_mantissa();
        out.push(marker);
        out.push_str(&format!("{:+}", self.adjusted_exponent()));
        out
    }

    fn scientific_mantissa(&self) -> String {
        let digits = self.digits();
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{}{first}", self.sign_prefix())
        } else {
            format!("{}{first}.{rest}", self.sign_prefix())
        }
    }

    /// Whether the default rendering is plain rather than scientific.
    fn renders_plain(&self) -> bool {
        self.scale >= 0 && self.adjusted_exponent() >= -6
    }

    /// Like `Display`, but any exponent is a multiple of three.
    ///
    /// Zero with an exponent keeps its scale by widening the mantissa
    /// (`0E+4` renders as `0.00E+6`).
    #[must_use]
    pub fn to_engineering_string(&self) -> String {
        if self.renders_plain() {
            return self.to_plain_string();
        }
        let digits = self.digits();
        let mut adjusted = self.adjusted_exponent();
        let leading = adjusted.rem_euclid(3);
        adjusted -= leading;
        let int_digits = (leading + 1) as usize;
        let mut out = self.sign_prefix().to_owned();
        if self.is_zero() {
            match int_digits {
                1 => out.push('0'),
                2 => {
                    out.push_str("0.00");
                    adjusted += 3;
                }
                _ => {
                    out.push_str("0.0");
                    adjusted += 3;
                }
            }
        } else if int_digits >= digits.len() {
            out.push_str(digits);
            out.push_str(&"0".repeat(int_digits - digits.len()));
        } else {
            let (int_part, frac_part) = digits.split_at(int_digits);
            out.push_str(int_part);
            out.push('.');
            out.push_str(frac_part);
        }
        if adjusted != 0 {
            out.push_str(&format!("E{adjusted:+}"));
        }
        out
    }
}

/// Plain when the scale is non-negative and the adjusted exponent is at least
/// `-6`, scientific with `E` otherwise.
impl fmt::Display for BigDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.renders_plain() {
            f.write_str(&self.to_plain_string())
        } else {
            f.write_str(&self.to_scientific_notation('E'))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(text: &str) -> BigDecimal {
        text.parse().unwrap()
    }

    #[test]
    fn display_switches_to_scientific() {
        let cases = [
            ("123", "123"),
            ("-1.23E-10", "-1.23E-10"),
            ("1.23E+3", "1.23E+3"),
            ("0.000001", "0.000001"),
            ("0.0000001", "1E-7"),
            ("0E+3", "0E+3"),
            ("0.00", "0.00"),
            ("-0", "0"),
        ];
        for (input, expected) in cases {
            assert_eq!(dec(input).to_string(), expected, "{input}");
        }
    }

    #[test]
    fn plain_string_never_uses_exponent() {
        assert_eq!(dec("1.23E+3").to_plain_string(), "1230");
        assert_eq!(dec("-1.23E-5").to_plain_string(), "-0.0000123");
        assert_eq!(dec("0E+3").to_plain_string(), "0");
        assert_eq!(dec("0E-3").to_plain_string(), "0.000");
    }

    #[test]
    fn engineering_exponents_are_multiples_of_three() {
        let cases = [
            ("1.23E+4", "12.3E+3"),
            ("1E+5", "100E+3"),
            ("1.2E+2", "120"),
            ("-1.23E-7", "-123E-9"),
            ("0E+4", "0.00E+6"),
            ("0E+5", "0.0E+6"),
            ("0E+3", "0E+3"),
            ("12.5", "12.5"),
        ];
        for (input, expected) in cases {
            assert_eq!(dec(input).to_engineering_string(), expected, "{input}");
        }
    }

    #[test]
    fn exponents_past_the_scale_range_still_render() {
        let value = dec("12.5e9223372036854775807");
        assert_eq!(value.to_string(), "1.25E+9223372036854775808");
        assert_eq!(value.to_engineering_string(), "125E+9223372036854775806");
        assert_eq!(dec("1e-9223372036854775807").to_string(), "1E-9223372036854775807");
        assert!(value > dec("1e9223372036854775807"));
    }

    #[test]
    fn scientific_notation_always_has_exponent() {
        assert_eq!(dec("5").to_scientific_notation('E'), "5E+0");
        assert_eq!(dec("0.00123").to_scientific_notation('E'), "1.23E-3");
    }
}
