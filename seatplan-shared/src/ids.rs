use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Registry-assigned passenger identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PassengerId(pub u32);

/// Registry-assigned group identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub u32);

impl fmt::Display for PassengerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G{}", self.0)
    }
}

/// Seat position in the cabin.
///
/// Ordering is row-major, then by column letter, which is the enumeration
/// order every placement routine relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeatId {
    pub row: u32,
    pub column: char,
}

impl SeatId {
    pub fn new(row: u32, column: char) -> Self {
        Self { row, column }
    }
}

impl fmt::Display for SeatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseSeatIdError {
    #[error("seat id is empty")]
    Empty,

    #[error("seat id {0:?} has no row number")]
    MissingRow(String),

    #[error("seat id {0:?} has an invalid row number")]
    InvalidRow(String),

    #[error("seat id {0:?} must end with a single letter A-Z")]
    InvalidColumn(String),
}

impl FromStr for SeatId {
    type Err = ParseSeatIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let column = s.chars().last().ok_or(ParseSeatIdError::Empty)?;
        if !column.is_ascii_uppercase() {
            return Err(ParseSeatIdError::InvalidColumn(s.to_string()));
        }

        let digits = &s[..s.len() - column.len_utf8()];
        if digits.is_empty() {
            return Err(ParseSeatIdError::MissingRow(s.to_string()));
        }

        let row: u32 = digits
            .parse()
            .map_err(|_| ParseSeatIdError::InvalidRow(s.to_string()))?;
        if row == 0 {
            return Err(ParseSeatIdError::InvalidRow(s.to_string()));
        }

        Ok(SeatId { row, column })
    }
}

impl Serialize for SeatId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SeatId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_id_parse_and_display() {
        let seat: SeatId = "12C".parse().unwrap();
        assert_eq!(seat, SeatId::new(12, 'C'));
        assert_eq!(seat.to_string(), "12C");
    }

    #[test]
    fn test_seat_id_rejects_malformed_input() {
        assert_eq!("".parse::<SeatId>(), Err(ParseSeatIdError::Empty));
        assert!(matches!("C".parse::<SeatId>(), Err(ParseSeatIdError::MissingRow(_))));
        assert!(matches!("0A".parse::<SeatId>(), Err(ParseSeatIdError::InvalidRow(_))));
        assert!(matches!("12c".parse::<SeatId>(), Err(ParseSeatIdError::InvalidColumn(_))));
        assert!(matches!("1x2A".parse::<SeatId>(), Err(ParseSeatIdError::InvalidRow(_))));
    }

    #[test]
    fn test_seat_order_is_row_major() {
        let mut seats = vec![SeatId::new(2, 'A'), SeatId::new(1, 'F'), SeatId::new(1, 'A')];
        seats.sort();
        assert_eq!(seats, vec![SeatId::new(1, 'A'), SeatId::new(1, 'F'), SeatId::new(2, 'A')]);
    }

    #[test]
    fn test_seat_id_json_is_a_string() {
        let json = serde_json::to_string(&SeatId::new(3, 'D')).unwrap();
        assert_eq!(json, "\"3D\"");
        let back: SeatId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, SeatId::new(3, 'D'));
    }
}
