use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// Administrative region covered by the published accident archives.
///
/// Every archive carries one CSV member per region, named by the two-digit
/// code returned from [`Region::csv_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Region {
    Pha,
    Stc,
    Jhc,
    Plk,
    Ulk,
    Hkk,
    Jhm,
    Msk,
    Olk,
    Zlk,
    Vys,
    Pak,
    Lbk,
    Kvk,
}

impl Region {
    pub const ALL: [Region; 14] = [
        Region::Pha,
        Region::Stc,
        Region::Jhc,
        Region::Plk,
        Region::Ulk,
        Region::Hkk,
        Region::Jhm,
        Region::Msk,
        Region::Olk,
        Region::Zlk,
        Region::Vys,
        Region::Pak,
        Region::Lbk,
        Region::Kvk,
    ];

    pub fn abbrev(&self) -> &'static str {
        match self {
            Region::Pha => "PHA",
            Region::Stc => "STC",
            Region::Jhc => "JHC",
            Region::Plk => "PLK",
            Region::Ulk => "ULK",
            Region::Hkk => "HKK",
            Region::Jhm => "JHM",
            Region::Msk => "MSK",
            Region::Olk => "OLK",
            Region::Zlk => "ZLK",
            Region::Vys => "VYS",
            Region::Pak => "PAK",
            Region::Lbk => "LBK",
            Region::Kvk => "KVK",
        }
    }

    /// Two-digit code naming this region's CSV member inside every archive.
    pub fn csv_code(&self) -> &'static str {
        match self {
            Region::Pha => "00",
            Region::Stc => "01",
            Region::Jhc => "02",
            Region::Plk => "03",
            Region::Ulk => "04",
            Region::Hkk => "05",
            Region::Jhm => "06",
            Region::Msk => "07",
            Region::Olk => "14",
            Region::Zlk => "15",
            Region::Vys => "16",
            Region::Pak => "17",
            Region::Lbk => "18",
            Region::Kvk => "19",
        }
    }

    pub fn member_name(&self) -> String {
        format!("{}.csv", self.csv_code())
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbrev())
    }
}

impl FromStr for Region {
    type Err = DataError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_uppercase();
        Region::ALL
            .into_iter()
            .find(|region| region.abbrev() == normalized)
            .ok_or_else(|| DataError::UnknownRegion(value.to_string()))
    }
}
