//! Rebuilding [`CalibrationCoefficients`] from labeled values instead of a live device, e.g. from a
//! calibration row that was written to a log next to the raw samples.
//!
//! Labels are the datasheet names (`dig_T1` .. `dig_H6`), compared ASCII case-insensitively.
//!
//! ```
//! use bme280_rs::CalibrationCoefficients;
//!
//! let row = "2023-05-01T12:00:00 dig_T1=27504 dig_T2=26435 dig_T3=-1000 \
//!     dig_P1=36477 dig_P2=-10685 dig_P3=3024 dig_P4=2855 dig_P5=140 dig_P6=-7 \
//!     dig_P7=15500 dig_P8=-14600 dig_P9=6000 \
//!     dig_H1=75 dig_H2=375 dig_H3=0 dig_H4=28 dig_H5=0 dig_H6=30";
//!
//! let coefficients = CalibrationCoefficients::from_labeled_row(row).unwrap();
//! assert_eq!(-1000.0, coefficients.temperature()[2]);
//! ```
use alloc::vec::Vec;

use crate::calibration::CalibrationCoefficients;
use crate::error::LabelError;

pub const LABELS: [&str; 18] = [
    "dig_T1", "dig_T2", "dig_T3",
    "dig_P1", "dig_P2", "dig_P3", "dig_P4", "dig_P5", "dig_P6", "dig_P7", "dig_P8", "dig_P9",
    "dig_H1", "dig_H2", "dig_H3", "dig_H4", "dig_H5", "dig_H6",
];

impl CalibrationCoefficients {
    /// Builds coefficients from `(label, value)` pairs.
    ///
    /// Unknown labels are ignored and a later duplicate overrides an earlier one. Every one of the
    /// 18 [`LABELS`] has to be present.
    pub fn from_labeled<I, K>(values: I) -> Result<Self, LabelError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: AsRef<str>,
    {
        let mut slots = [None; LABELS.len()];
        for (label, value) in values {
            let label = label.as_ref();
            if let Some(i) = LABELS.iter().position(|l| l.eq_ignore_ascii_case(label)) {
                slots[i] = Some(value);
            }
        }

        let mut v = [0.0; LABELS.len()];
        for (i, slot) in slots.iter().enumerate() {
            v[i] = slot.ok_or(LabelError::Missing(LABELS[i]))?;
        }

        Ok(Self::new(
            core::array::from_fn(|i| v[i]),
            core::array::from_fn(|i| v[3 + i]),
            core::array::from_fn(|i| v[12 + i]),
        ))
    }

    /// Parses a text row with [`parse_labeled_row`] and builds coefficients from it.
    pub fn from_labeled_row(row: &str) -> Result<Self, LabelError> {
        let pairs = parse_labeled_row(row).collect::<Result<Vec<_>, _>>()?;

        Self::from_labeled(pairs)
    }

    /// The coefficients as `(label, value)` pairs, in datasheet order.
    pub fn labeled(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        LABELS.iter().copied().zip(
            self.temperature()
                .iter()
                .chain(self.pressure())
                .chain(self.humidity())
                .copied(),
        )
    }
}

/// Splits a row into `label=value` pairs.
///
/// Tokens are separated by whitespace or commas, so a pair must not contain spaces. Tokens
/// without `=` (timestamps, tags) are skipped. A token with `=` yields
/// [`LabelError::InvalidValue`] when its label is empty or its value is not a number, which
/// includes a spaced `label = value` (its bare `=` is malformed).
pub fn parse_labeled_row(row: &str) -> impl Iterator<Item = Result<(&str, f64), LabelError>> {
    row.split(|c: char| c.is_whitespace() || c == ',')
        .filter_map(|token| token.split_once('='))
        .map(|(label, value)| {
            if label.is_empty() {
                return Err(LabelError::InvalidValue);
            }

            value
                .parse::<f64>()
                .map(|value| (label, value))
                .map_err(|_| LabelError::InvalidValue)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::golden_coefficients;
    use alloc::format;
    use alloc::string::String;

    #[test]
    fn labeled_round_trip() {
        let golden = golden_coefficients();

        let rebuilt = CalibrationCoefficients::from_labeled(golden.labeled()).unwrap();

        assert_eq!(golden, rebuilt);
    }

    #[test]
    fn row_round_trip() {
        let golden = golden_coefficients();
        let row = golden
            .labeled()
            .map(|(label, value)| format!("{label}={value}"))
            .collect::<Vec<String>>()
            .join(",");

        assert_eq!(golden, CalibrationCoefficients::from_labeled_row(&row).unwrap());
    }

    #[test]
    fn labels_are_case_insensitive_and_unknown_ones_ignored() {
        let golden = golden_coefficients();
        let pairs = golden
            .labeled()
            .map(|(label, value)| (label.to_ascii_uppercase(), value))
            .chain([(String::from("battery_v"), 3.7)]);

        assert_eq!(golden, CalibrationCoefficients::from_labeled(pairs).unwrap());
    }

    #[test]
    fn later_duplicates_win() {
        let golden = golden_coefficients();
        let pairs = golden.labeled().chain([("dig_H6", 12.0)]);

        let coefficients = CalibrationCoefficients::from_labeled(pairs).unwrap();

        assert_eq!(12.0, coefficients.humidity()[5]);
    }

    #[test]
    fn missing_label() {
        let golden = golden_coefficients();
        let pairs = golden.labeled().filter(|(label, _)| *label != "dig_P4");

        assert_eq!(
            Err(LabelError::Missing("dig_P4")),
            CalibrationCoefficients::from_labeled(pairs)
        );
    }

    #[test]
    fn parse_row_tokens() {
        let pairs = parse_labeled_row("12:00:01 dig_T1=27504,,dig_P9=-5.5  tag").collect::<Vec<_>>();
        assert_eq!(vec![Ok(("dig_T1", 27504.0)), Ok(("dig_P9", -5.5))], pairs);

        let pairs = parse_labeled_row("dig_T1=27504, dig_T2=abc").collect::<Vec<_>>();
        assert_eq!(vec![Ok(("dig_T1", 27504.0)), Err(LabelError::InvalidValue)], pairs);
    }

    #[test]
    fn bare_or_empty_sides_are_malformed() {
        // "dig_T2", "=" and "x": only the lone "=" carries a pair, and it has no label
        let pairs = parse_labeled_row("dig_T1=27504,  dig_T2 = x").collect::<Vec<_>>();
        assert_eq!(vec![Ok(("dig_T1", 27504.0)), Err(LabelError::InvalidValue)], pairs);

        assert_eq!(Some(Err(LabelError::InvalidValue)), parse_labeled_row("=5").next());
        assert_eq!(Some(Err(LabelError::InvalidValue)), parse_labeled_row("dig_T1=").next());
        assert_eq!(
            Err(LabelError::InvalidValue),
            CalibrationCoefficients::from_labeled_row("dig_T1 = 27504")
        );
    }
}
