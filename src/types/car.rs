//! Static entry-list data: cars and their driver rosters.

use serde::{Deserialize, Serialize};

use super::enums::{CarModel, CupCategory, DriverCategory, Nationality};

/// One driver on a car's roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverInfo {
    pub first_name: String,
    pub last_name: String,
    pub short_name: String,
    pub category: DriverCategory,
    pub nationality: Nationality,
}

impl DriverInfo {
    /// "First Last" display form.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Static information about one entry, delivered once per entry-list cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarInfo {
    pub id: u16,
    pub model: CarModel,
    pub team_name: String,
    pub race_number: i32,
    pub cup_category: CupCategory,
    /// Index into `drivers`; may be out of range when the roster is still
    /// being assembled server-side.
    pub current_driver_id: i8,
    pub nationality: Nationality,
    pub drivers: Vec<DriverInfo>,
}

impl CarInfo {
    /// The driver currently in the car, if `current_driver_id` is a valid
    /// index into the roster.
    pub fn current_driver(&self) -> Option<&DriverInfo> {
        usize::try_from(self.current_driver_id).ok().and_then(|idx| self.drivers.get(idx))
    }
}
