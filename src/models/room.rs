use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Ценовая зона зала: непрерывный диапазон рядов с общим названием.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_tier_rows"))]
pub struct SeatTier {
    #[validate(length(min = 1, message = "Tier name is required"))]
    pub name: String,
    pub from_row: u32,
    pub to_row: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: i64,
    pub name: String,
    pub capacity: i64,
    // Бэкенд про зоны не знает, поэтому поле необязательное
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tiers: Vec<SeatTier>,
}

impl SeatTier {
    pub fn covers(&self, row: u32) -> bool {
        (self.from_row..=self.to_row).contains(&row)
    }
}

impl Room {
    /// Первая зона, в которую попадает ряд.
    pub fn tier_for_row(&self, row: u32) -> Option<&str> {
        self.tiers
            .iter()
            .find(|tier| tier.covers(row))
            .map(|tier| tier.name.as_str())
    }
}

fn validate_tier_rows(tier: &SeatTier) -> Result<(), ValidationError> {
    if tier.from_row == 0 || tier.from_row > tier.to_row {
        let mut err = ValidationError::new("tier_rows");
        err.message = Some("Tier rows must satisfy 1 <= from_row <= to_row".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tier(name: &str, from_row: u32, to_row: u32) -> SeatTier {
        SeatTier { name: name.to_string(), from_row, to_row }
    }

    #[test]
    fn finds_tier_for_row() {
        let room = Room {
            id: 1,
            name: "Sala 1".into(),
            capacity: 50,
            tiers: vec![tier("Front", 1, 2), tier("VIP", 3, 5)],
        };

        assert_eq!(room.tier_for_row(1), Some("Front"));
        assert_eq!(room.tier_for_row(4), Some("VIP"));
        assert_eq!(room.tier_for_row(6), None);
    }

    #[test]
    fn tiers_are_optional_on_the_wire() {
        let room: Room =
            serde_json::from_str(r#"{"id":2,"name":"Sala 2","capacity":30}"#).unwrap();
        assert!(room.tiers.is_empty());

        let json = serde_json::to_value(&room).unwrap();
        assert!(json.get("tiers").is_none());
    }

    #[test]
    fn rejects_inverted_tier_ranges() {
        assert!(tier("VIP", 3, 5).validate().is_ok());
        assert!(tier("VIP", 5, 3).validate().is_err());
        assert!(tier("VIP", 0, 3).validate().is_err());
        assert!(tier("", 1, 1).validate().is_err());
    }
}
