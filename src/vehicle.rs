use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

const DIGITS_WIDTH: usize = 3;
const MAX_NUMBER: u16 = 999;

/// Registration plate identifying a vehicle.
///
/// Plates are plain values: two plates with the same letters, digits and
/// region are the same vehicle. Ordering follows `(letters, digits, region)`.
/// Letters are uppercase ASCII and both numbers are at most 999, so every
/// plate has exactly one text form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VehiclePlate {
    letters: [char; 3],
    digits: u16,
    region: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlateParseError {
    #[error("plate `{0}` has the wrong length; expected a form like AA111A99")]
    WrongLength(String),
    #[error("plate `{input}` has a non-letter at position {position}")]
    ExpectedLetter { input: String, position: usize },
    #[error("plate `{input}` has a non-digit at position {position}")]
    ExpectedDigit { input: String, position: usize },
    #[error("plate `{0}` has a three-digit region starting with 0")]
    PaddedRegion(String),
    #[error("`{0}` is not a Latin letter A-Z")]
    InvalidLetter(char),
    #[error("{field} {value} is outside 0..=999")]
    OutOfRange { field: &'static str, value: u16 },
}

impl VehiclePlate {
    /// Builds a plate from known-good parts, for literals and constants.
    ///
    /// # Panics
    ///
    /// Panics if a letter is not uppercase ASCII or a number exceeds 999; in a
    /// `const` this is a compile error. Use [`VehiclePlate::try_new`] for
    /// untrusted input.
    pub const fn new(l0: char, l1: char, digits: u16, l2: char, region: u16) -> Self {
        assert!(
            l0.is_ascii_uppercase() && l1.is_ascii_uppercase() && l2.is_ascii_uppercase(),
            "plate letters must be uppercase ASCII"
        );
        assert!(
            digits <= MAX_NUMBER && region <= MAX_NUMBER,
            "plate numbers must be at most 999"
        );
        Self {
            letters: [l0, l1, l2],
            digits,
            region,
        }
    }

    /// Checked constructor; lowercase ASCII letters are folded to uppercase.
    pub fn try_new(
        l0: char,
        l1: char,
        digits: u16,
        l2: char,
        region: u16,
    ) -> Result<Self, PlateParseError> {
        let letter = |ch: char| {
            if ch.is_ascii_alphabetic() {
                Ok(ch.to_ascii_uppercase())
            } else {
                Err(PlateParseError::InvalidLetter(ch))
            }
        };
        let number = |field: &'static str, value: u16| {
            if value <= MAX_NUMBER {
                Ok(value)
            } else {
                Err(PlateParseError::OutOfRange { field, value })
            }
        };

        Ok(Self {
            letters: [letter(l0)?, letter(l1)?, letter(l2)?],
            digits: number("digits", digits)?,
            region: number("region", region)?,
        })
    }

    pub fn letters(&self) -> [char; 3] {
        self.letters
    }

    pub fn digits(&self) -> u16 {
        self.digits
    }

    pub fn region(&self) -> u16 {
        self.region
    }
}

impl fmt::Display for VehiclePlate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [l0, l1, l2] = self.letters;
        write!(
            f,
            "{l0}{l1}{:0width$}{l2}{:02}",
            self.digits,
            self.region,
            width = DIGITS_WIDTH
        )
    }
}

impl FromStr for VehiclePlate {
    type Err = PlateParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        let chars: Vec<char> = trimmed.chars().collect();
        // two letters, three digits, one letter, two or three region digits
        if !(8..=9).contains(&chars.len()) {
            return Err(PlateParseError::WrongLength(trimmed.to_string()));
        }

        let letter_at = |position: usize| -> Result<char, PlateParseError> {
            let ch = chars[position];
            if ch.is_ascii_alphabetic() {
                Ok(ch)
            } else {
                Err(PlateParseError::ExpectedLetter {
                    input: trimmed.to_string(),
                    position,
                })
            }
        };
        let number_in = |range: std::ops::Range<usize>| -> Result<u16, PlateParseError> {
            let mut value: u16 = 0;
            for position in range {
                let digit = chars[position].to_digit(10).ok_or_else(|| {
                    PlateParseError::ExpectedDigit {
                        input: trimmed.to_string(),
                        position,
                    }
                })?;
                value = value * 10 + digit as u16;
            }
            Ok(value)
        };

        let l0 = letter_at(0)?;
        let l1 = letter_at(1)?;
        let digits = number_in(2..5)?;
        let l2 = letter_at(5)?;
        let region = number_in(6..chars.len())?;
        if chars.len() == 9 && chars[6] == '0' {
            return Err(PlateParseError::PaddedRegion(trimmed.to_string()));
        }

        Self::try_new(l0, l1, digits, l2, region)
    }
}

impl TryFrom<String> for VehiclePlate {
    type Error = PlateParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<VehiclePlate> for String {
    fn from(plate: VehiclePlate) -> Self {
        plate.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn display_pads_digits_and_region() {
        let plate = VehiclePlate::new('A', 'B', 7, 'C', 5);
        assert_eq!(plate.to_string(), "AB007C05");
        let plate = VehiclePlate::new('A', 'A', 111, 'A', 199);
        assert_eq!(plate.to_string(), "AA111A199");
    }

    #[test]
    fn parse_accepts_lowercase_and_three_digit_regions() {
        let plate: VehiclePlate = "aa111a99".parse().unwrap();
        assert_eq!(plate, VehiclePlate::new('A', 'A', 111, 'A', 99));
        let plate: VehiclePlate = "XY042Z777".parse().unwrap();
        assert_eq!(plate.region(), 777);
        assert_eq!(plate.digits(), 42);
    }

    #[test]
    fn parse_rejects_malformed_plates() {
        assert!(matches!(
            "AA11".parse::<VehiclePlate>(),
            Err(PlateParseError::WrongLength(_))
        ));
        assert!(matches!(
            "1A111A99".parse::<VehiclePlate>(),
            Err(PlateParseError::ExpectedLetter { position: 0, .. })
        ));
        assert!(matches!(
            "AA1X1A99".parse::<VehiclePlate>(),
            Err(PlateParseError::ExpectedDigit { position: 3, .. })
        ));
        assert!(matches!(
            "AA111A9999".parse::<VehiclePlate>(),
            Err(PlateParseError::WrongLength(_))
        ));
    }

    #[test]
    fn non_latin_letters_are_rejected_instead_of_folded() {
        assert!(matches!(
            "\u{df}A111A99".parse::<VehiclePlate>(),
            Err(PlateParseError::ExpectedLetter { position: 0, .. })
        ));
        assert_eq!(
            VehiclePlate::try_new('\u{416}', 'A', 1, 'A', 1),
            Err(PlateParseError::InvalidLetter('\u{416}'))
        );
    }

    #[test]
    fn padded_three_digit_region_is_not_an_alias() {
        assert!(matches!(
            "AA111A099".parse::<VehiclePlate>(),
            Err(PlateParseError::PaddedRegion(_))
        ));
        assert_eq!("AA111A100".parse::<VehiclePlate>().unwrap().region(), 100);
    }

    #[test]
    fn checked_constructor_normalises_and_bounds() {
        let plate = VehiclePlate::try_new('a', 'a', 111, 'a', 99).unwrap();
        assert_eq!(plate, VehiclePlate::new('A', 'A', 111, 'A', 99));
        assert_eq!(
            VehiclePlate::try_new('A', 'A', 1000, 'A', 99),
            Err(PlateParseError::OutOfRange {
                field: "digits",
                value: 1000
            })
        );
        assert_eq!(
            VehiclePlate::try_new('A', 'A', 1, 'A', 1000),
            Err(PlateParseError::OutOfRange {
                field: "region",
                value: 1000
            })
        );
    }

    #[test]
    #[should_panic(expected = "uppercase ASCII")]
    fn literal_constructor_refuses_lowercase() {
        let _ = VehiclePlate::new('a', 'A', 1, 'A', 1);
    }

    #[test]
    fn every_plate_reads_back_from_its_text_form() {
        let plates = [
            VehiclePlate::try_new('a', 'b', 0, 'c', 0).unwrap(),
            VehiclePlate::try_new('Z', 'Z', 999, 'Z', 999).unwrap(),
            VehiclePlate::try_new('M', 'n', 42, 'o', 7).unwrap(),
            VehiclePlate::try_new('Q', 'R', 5, 'S', 100).unwrap(),
        ];
        for plate in plates {
            let json = serde_json::to_string(&plate).unwrap();
            let back: VehiclePlate = serde_json::from_str(&json).unwrap();
            assert_eq!(back, plate, "{json} did not read back");
            assert_eq!(plate.to_string().parse::<VehiclePlate>().unwrap(), plate);
        }
    }

    #[test]
    fn equality_is_field_wise() {
        let a = VehiclePlate::new('A', 'A', 111, 'A', 99);
        let b: VehiclePlate = "AA111A99".parse().unwrap();
        let other_region = VehiclePlate::new('A', 'A', 111, 'A', 98);
        assert_eq!(a, b);
        assert_ne!(a, other_region);

        let set: HashSet<_> = [a, b, other_region].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn ordering_follows_letters_then_digits_then_region() {
        let mut plates = vec![
            VehiclePlate::new('B', 'A', 1, 'A', 1),
            VehiclePlate::new('A', 'A', 2, 'A', 1),
            VehiclePlate::new('A', 'A', 1, 'B', 1),
            VehiclePlate::new('A', 'A', 1, 'A', 2),
        ];
        plates.sort();
        let rendered: Vec<String> = plates.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["AA001A02", "AA002A01", "AA001B01", "BA001A01"]);
    }

    #[test]
    fn serializes_as_display_string() {
        let plate = VehiclePlate::new('C', 'C', 333, 'C', 99);
        let json = serde_json::to_string(&plate).unwrap();
        assert_eq!(json, "\"CC333C99\"");
        let back: VehiclePlate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, plate);
    }
}
