use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What a tariff needs at one end of the shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Door pickup or delivery; available everywhere.
    None,
    Warehouse,
    Locker,
}

/// Directional service combination, `<origin>_<destination>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TariffType {
    OfficeOffice,
    OfficeDoor,
    DoorOffice,
    OfficePostamat,
    DoorPostamat,
    DoorDoor,
}

impl TariffType {
    pub const ALL: [TariffType; 6] = [
        TariffType::OfficeOffice,
        TariffType::OfficeDoor,
        TariffType::DoorOffice,
        TariffType::OfficePostamat,
        TariffType::DoorPostamat,
        TariffType::DoorDoor,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TariffType::OfficeOffice => "OFFICE_OFFICE",
            TariffType::OfficeDoor => "OFFICE_DOOR",
            TariffType::DoorOffice => "DOOR_OFFICE",
            TariffType::OfficePostamat => "OFFICE_POSTAMAT",
            TariffType::DoorPostamat => "DOOR_POSTAMAT",
            TariffType::DoorDoor => "DOOR_DOOR",
        }
    }

    #[must_use]
    pub fn origin_requirement(self) -> Requirement {
        match self {
            TariffType::OfficeOffice | TariffType::OfficeDoor | TariffType::OfficePostamat => {
                Requirement::Warehouse
            }
            TariffType::DoorOffice | TariffType::DoorPostamat | TariffType::DoorDoor => {
                Requirement::None
            }
        }
    }

    #[must_use]
    pub fn destination_requirement(self) -> Requirement {
        match self {
            TariffType::OfficeOffice | TariffType::DoorOffice => Requirement::Warehouse,
            TariffType::OfficePostamat | TariffType::DoorPostamat => Requirement::Locker,
            TariffType::OfficeDoor | TariffType::DoorDoor => Requirement::None,
        }
    }
}

impl fmt::Display for TariffType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TariffType {
    type Err = String;

    /// Accepts `OFFICE_DOOR`, `office-door` and `Office_Door` alike.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase().replace('-', "_");
        TariffType::ALL
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| format!("unknown tariff type '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requirement_table() {
        use Requirement as R;
        let table = [
            (TariffType::OfficeOffice, R::Warehouse, R::Warehouse),
            (TariffType::OfficeDoor, R::Warehouse, R::None),
            (TariffType::DoorOffice, R::None, R::Warehouse),
            (TariffType::OfficePostamat, R::Warehouse, R::Locker),
            (TariffType::DoorPostamat, R::None, R::Locker),
            (TariffType::DoorDoor, R::None, R::None),
        ];
        for (tariff, origin, destination) in table {
            assert_eq!(tariff.origin_requirement(), origin, "{tariff} origin");
            assert_eq!(
                tariff.destination_requirement(),
                destination,
                "{tariff} destination"
            );
        }
    }

    #[test]
    fn parses_loose_spellings() {
        assert_eq!(
            "office-postamat".parse::<TariffType>().unwrap(),
            TariffType::OfficePostamat
        );
        assert_eq!(
            " Door_Door ".parse::<TariffType>().unwrap(),
            TariffType::DoorDoor
        );
        assert!("OFFICE_LOCKER".parse::<TariffType>().is_err());
    }

    #[test]
    fn serializes_as_screaming_snake_case() {
        let json = serde_json::to_string(&TariffType::DoorPostamat).unwrap();
        assert_eq!(json, "\"DOOR_POSTAMAT\"");
        let back: TariffType = serde_json::from_str("\"OFFICE_DOOR\"").unwrap();
        assert_eq!(back, TariffType::OfficeDoor);
    }
}
