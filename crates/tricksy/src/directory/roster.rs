//! CSV roster ingestion for onboarding a batch of cleaners at once.
//!
//! Expected columns: `Name`, `Company`, `Vehicle Code`, `Available`. Only the
//! name is mandatory; `Available` accepts yes/no style flags and defaults to
//! available when the cell is empty.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer};

use super::domain::CleanerDraft;

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read roster file: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct RosterImporter;

impl RosterImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<CleanerDraft>, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<CleanerDraft>, RosterImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut drafts = Vec::new();
        for record in csv_reader.deserialize::<RosterRow>() {
            let row = record?;
            drafts.push(CleanerDraft {
                name: row.name,
                company: row.company.unwrap_or_default(),
                vehicle_code: row.vehicle_code.unwrap_or_default(),
                available: row.available.map_or(true, |flag| flag.as_bool()),
            });
        }

        Ok(drafts)
    }
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Company", default, deserialize_with = "empty_string_as_none")]
    company: Option<String>,
    #[serde(
        rename = "Vehicle Code",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    vehicle_code: Option<String>,
    #[serde(
        rename = "Available",
        default,
        deserialize_with = "empty_flag_as_none"
    )]
    available: Option<AvailabilityFlag>,
}

#[derive(Debug, Clone, Copy)]
struct AvailabilityFlag(bool);

impl AvailabilityFlag {
    fn as_bool(self) -> bool {
        self.0
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" | "true" | "1" => Some(Self(true)),
            "no" | "n" | "false" | "0" => Some(Self(false)),
            _ => None,
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn empty_flag_as_none<'de, D>(deserializer: D) -> Result<Option<AvailabilityFlag>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => AvailabilityFlag::parse(value)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognized Available flag '{value}'"))),
    }
}
