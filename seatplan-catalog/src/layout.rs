use serde::{Deserialize, Serialize};

use crate::inventory::InventoryError;

/// Cabin classes in the catalog
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatClass {
    First,
    Business,
    Economy,
}

/// Physical seat type, derived from the column's position in the row
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatType {
    Window,
    Aisle,
    Middle,
}

impl SeatType {
    pub fn is_window_or_aisle(self) -> bool {
        matches!(self, SeatType::Window | SeatType::Aisle)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Zone {
    Vip,
    Accessible,
    Quiet,
}

/// A contiguous range of rows sharing a class and a seat configuration.
///
/// `blocks` are the aisle-separated column groups, e.g. `["ABC", "DEF"]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CabinSection {
    pub class: SeatClass,
    pub first_row: u32,
    pub last_row: u32,
    pub blocks: Vec<String>,
}

impl CabinSection {
    pub fn new(class: SeatClass, first_row: u32, last_row: u32, blocks: &[&str]) -> Self {
        Self {
            class,
            first_row,
            last_row,
            blocks: blocks.iter().map(|b| b.to_string()).collect(),
        }
    }

    pub fn contains_row(&self, row: u32) -> bool {
        (self.first_row..=self.last_row).contains(&row)
    }

    /// Columns of one row with their physical type, in column order.
    pub fn columns(&self) -> Vec<(char, SeatType)> {
        let last_block = self.blocks.len().saturating_sub(1);
        let mut columns = Vec::new();

        for (b, block) in self.blocks.iter().enumerate() {
            let letters: Vec<char> = block.chars().collect();
            let last_letter = letters.len().saturating_sub(1);

            for (i, letter) in letters.iter().enumerate() {
                let seat_type = if (b == 0 && i == 0) || (b == last_block && i == last_letter) {
                    SeatType::Window
                } else if i == 0 || i == last_letter {
                    SeatType::Aisle
                } else {
                    SeatType::Middle
                };
                columns.push((*letter, seat_type));
            }
        }

        columns
    }
}

/// Flags a set of seats as VIP, accessible or quiet.
///
/// `columns` and `class` narrow the rule; when absent the rule covers every
/// seat in the row range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ZoneRule {
    pub zone: Zone,
    pub first_row: u32,
    pub last_row: u32,
    #[serde(default)]
    pub columns: Option<String>,
    #[serde(default)]
    pub class: Option<SeatClass>,
}

impl ZoneRule {
    pub fn rows(zone: Zone, first_row: u32, last_row: u32) -> Self {
        Self {
            zone,
            first_row,
            last_row,
            columns: None,
            class: None,
        }
    }

    pub fn with_columns(mut self, columns: &str) -> Self {
        self.columns = Some(columns.to_string());
        self
    }

    pub fn with_class(mut self, class: SeatClass) -> Self {
        self.class = Some(class);
        self
    }

    pub fn matches(&self, class: SeatClass, row: u32, column: char) -> bool {
        if !(self.first_row..=self.last_row).contains(&row) {
            return false;
        }
        if let Some(columns) = &self.columns {
            if !columns.contains(column) {
                return false;
            }
        }
        match self.class {
            Some(c) => c == class,
            None => true,
        }
    }
}

/// Declarative description of a cabin from which the inventory is built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CabinLayout {
    pub sections: Vec<CabinSection>,
    #[serde(default)]
    pub zones: Vec<ZoneRule>,
}

impl CabinLayout {
    /// Thirty rows of six-abreast seating.
    ///
    /// First 1-3, business 4-8, economy 9-30. VIP zone rows 1-5, quiet zone
    /// rows 6-8, accessible seats C and D from row 20 back.
    pub fn standard() -> Self {
        Self {
            sections: vec![
                CabinSection::new(SeatClass::First, 1, 3, &["ABC", "DEF"]),
                CabinSection::new(SeatClass::Business, 4, 8, &["ABC", "DEF"]),
                CabinSection::new(SeatClass::Economy, 9, 30, &["ABC", "DEF"]),
            ],
            zones: vec![
                ZoneRule::rows(Zone::Vip, 1, 5),
                ZoneRule::rows(Zone::Quiet, 6, 8),
                ZoneRule::rows(Zone::Accessible, 20, 30).with_columns("CD"),
            ],
        }
    }

    pub fn section_for(&self, row: u32) -> Option<&CabinSection> {
        self.sections.iter().find(|s| s.contains_row(row))
    }

    pub fn has_zone(&self, zone: Zone, class: SeatClass, row: u32, column: char) -> bool {
        self.zones
            .iter()
            .any(|rule| rule.zone == zone && rule.matches(class, row, column))
    }

    pub fn validate(&self) -> Result<(), InventoryError> {
        if self.sections.is_empty() {
            return Err(invalid("layout has no sections"));
        }

        for (i, section) in self.sections.iter().enumerate() {
            if section.first_row == 0 {
                return Err(invalid("rows are numbered from 1"));
            }
            if section.first_row > section.last_row {
                return Err(invalid(format!(
                    "section rows {}-{} are inverted",
                    section.first_row, section.last_row
                )));
            }
            if section.blocks.is_empty() || section.blocks.iter().any(|b| b.is_empty()) {
                return Err(invalid(format!(
                    "section starting at row {} has an empty seat block",
                    section.first_row
                )));
            }

            let mut previous: Option<char> = None;
            for letter in section.blocks.iter().flat_map(|b| b.chars()) {
                if !letter.is_ascii_uppercase() {
                    return Err(invalid(format!("column {:?} is not a letter A-Z", letter)));
                }
                if previous.is_some_and(|p| p >= letter) {
                    return Err(invalid(format!(
                        "columns must be unique and in ascending order (at {:?})",
                        letter
                    )));
                }
                previous = Some(letter);
            }

            let overlaps = self.sections[..i].iter().any(|other| {
                section.first_row <= other.last_row && other.first_row <= section.last_row
            });
            if overlaps {
                return Err(invalid(format!(
                    "section rows {}-{} overlap another section",
                    section.first_row, section.last_row
                )));
            }
        }

        for rule in &self.zones {
            if rule.first_row > rule.last_row {
                return Err(invalid(format!(
                    "{:?} zone rows {}-{} are inverted",
                    rule.zone, rule.first_row, rule.last_row
                )));
            }
        }

        Ok(())
    }
}

impl Default for CabinLayout {
    fn default() -> Self {
        Self::standard()
    }
}

fn invalid(reason: impl Into<String>) -> InventoryError {
    InventoryError::InvalidLayout(reason.into())
}
