//! Identikit body parts
//!
//! On the wire a part is a single byte in `[0, 13]`: `0..=6` are the male
//! forms and `7..=13` the female forms of the same seven parts. Decoding is
//! gender-neutral, and encoding always writes the male form.

use byteorder::WriteBytesExt;
use serde::Serialize;

use crate::buffer::Buffer;
use crate::error::{ConfigError, Result};

/// Offset between a part's male and female wire ids
pub const FEMALE_ID_OFFSET: u8 = 7;

/// Largest valid wire value
pub const MAX_WIRE_ID: u8 = FEMALE_ID_OFFSET * 2 - 1;

/// The body part an identikit model is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Part {
    /// No part; the default for identikits that do not set one
    #[default]
    None,
    Head,
    Chin,
    Chest,
    Arms,
    Hands,
    Legs,
    Feet,
}

/// Character gender a wire id is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

/// Parts indexed by male id
const PARTS_BY_MALE_ID: [Part; FEMALE_ID_OFFSET as usize] = [
    Part::Head,
    Part::Chin,
    Part::Chest,
    Part::Arms,
    Part::Hands,
    Part::Legs,
    Part::Feet,
];

impl Part {
    /// Every part, including [`Part::None`]
    pub const ALL: [Part; 8] = [
        Part::None,
        Part::Head,
        Part::Chin,
        Part::Chest,
        Part::Arms,
        Part::Hands,
        Part::Legs,
        Part::Feet,
    ];

    /// Male wire id, or `None` for [`Part::None`]
    pub fn male_id(self) -> Option<u8> {
        match self {
            Part::None => None,
            Part::Head => Some(0),
            Part::Chin => Some(1),
            Part::Chest => Some(2),
            Part::Arms => Some(3),
            Part::Hands => Some(4),
            Part::Legs => Some(5),
            Part::Feet => Some(6),
        }
    }

    /// Female wire id, or `None` for [`Part::None`]
    pub fn female_id(self) -> Option<u8> {
        self.wire_id(Gender::Female)
    }

    /// Wire id of this part for the given gender
    pub fn wire_id(self, gender: Gender) -> Option<u8> {
        let male = self.male_id()?;
        Some(match gender {
            Gender::Male => male,
            Gender::Female => male + FEMALE_ID_OFFSET,
        })
    }

    /// Look up the part for a wire value
    ///
    /// Male and female ids of the same part resolve to the same variant.
    pub fn from_id(value: i32) -> Result<Part> {
        let value = u8::try_from(value)
            .ok()
            .filter(|&v| v <= MAX_WIRE_ID)
            .ok_or(ConfigError::OutOfRange {
                what: "body part",
                value: i64::from(value),
                min: 0,
                max: i64::from(MAX_WIRE_ID),
            })?;

        Ok(PARTS_BY_MALE_ID[usize::from(value % FEMALE_ID_OFFSET)])
    }

    /// Gender encoded by a wire value
    pub fn gender_of(value: u8) -> Option<Gender> {
        match value {
            0..FEMALE_ID_OFFSET => Some(Gender::Male),
            FEMALE_ID_OFFSET..=MAX_WIRE_ID => Some(Gender::Female),
            _ => None,
        }
    }

    pub fn decode(buffer: &mut Buffer<'_>) -> Result<Part> {
        Part::from_id(i32::from(buffer.read_u8()?))
    }

    /// Write the male wire id
    ///
    /// [`Part::None`] has no wire form and is rejected.
    pub fn encode(buffer: &mut Vec<u8>, part: &Part) -> Result<()> {
        let id = part.male_id().ok_or(ConfigError::OutOfRange {
            what: "body part",
            value: -1,
            min: 0,
            max: i64::from(MAX_WIRE_ID),
        })?;
        buffer.write_u8(id)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_wire_value_decodes_by_male_id() {
        for value in 0..=MAX_WIRE_ID {
            let part = Part::from_id(i32::from(value)).unwrap();
            assert_eq!(part.male_id(), Some(value % 7));

            let mut out = Vec::new();
            Part::encode(&mut out, &part).unwrap();
            let decoded = Part::decode(&mut Buffer::new(&out)).unwrap();
            assert_eq!(decoded.male_id(), Some(value % 7));
        }
    }

    #[test]
    fn test_male_and_female_ids_share_a_part() {
        for value in 0..FEMALE_ID_OFFSET {
            let male = Part::from_id(i32::from(value)).unwrap();
            let female = Part::from_id(i32::from(value + FEMALE_ID_OFFSET)).unwrap();
            assert_eq!(male, female);
        }
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        for value in [-1, 14, 15, 255, 1000, i32::MIN] {
            assert!(matches!(
                Part::from_id(value),
                Err(ConfigError::OutOfRange { value: v, .. }) if v == i64::from(value)
            ));
        }
        assert!(Part::decode(&mut Buffer::new(&[14])).is_err());
    }

    #[test]
    fn test_encode_writes_male_form() {
        // Female chest (9) comes back out as male chest (2)
        let part = Part::decode(&mut Buffer::new(&[9])).unwrap();
        assert_eq!(part, Part::Chest);

        let mut out = Vec::new();
        Part::encode(&mut out, &part).unwrap();
        assert_eq!(out, [2]);
    }

    #[test]
    fn test_none_has_no_wire_form() {
        assert_eq!(Part::None.male_id(), None);
        assert_eq!(Part::None.female_id(), None);

        let mut out = Vec::new();
        assert!(Part::encode(&mut out, &Part::None).is_err());
        assert!(out.is_empty());
    }

    #[test]
    fn test_gendered_wire_ids() {
        assert_eq!(Part::Head.wire_id(Gender::Male), Some(0));
        assert_eq!(Part::Head.wire_id(Gender::Female), Some(7));
        assert_eq!(Part::Feet.female_id(), Some(13));
        assert_eq!(Part::gender_of(6), Some(Gender::Male));
        assert_eq!(Part::gender_of(7), Some(Gender::Female));
        assert_eq!(Part::gender_of(14), None);
    }
}
