use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

use clap::ValueEnum;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::KiraError;

static UNIPROT_ACCESSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([OPQ][0-9][A-Z0-9]{3}[0-9]|[A-NR-Z][0-9]([A-Z][A-Z0-9]{2}[0-9]){1,2})$")
        .expect("static UniProt accession pattern")
});

static PFAM_ACCESSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^PF[0-9]{5}$").expect("static Pfam accession pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Repository {
    Uniprot,
    Rhea,
}

impl Repository {
    pub fn default_endpoint(self) -> &'static str {
        match self {
            Repository::Uniprot => crate::uniprot::URL,
            Repository::Rhea => crate::rhea::URL,
        }
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Repository::Uniprot => write!(f, "uniprot"),
            Repository::Rhea => write!(f, "rhea"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UniprotId(String);

impl UniprotId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UniprotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UniprotId {
    type Err = KiraError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_uppercase();
        if !UNIPROT_ACCESSION.is_match(&normalized) {
            return Err(KiraError::InvalidUniprotId(value.to_string()));
        }
        Ok(Self(normalized))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PfamId(String);

impl PfamId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PfamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PfamId {
    type Err = KiraError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_uppercase();
        if !PFAM_ACCESSION.is_match(&normalized) {
            return Err(KiraError::InvalidPfamId(value.to_string()));
        }
        Ok(Self(normalized))
    }
}

/// Numeric Rhea reaction identifier; accepts `10000` as well as `RHEA:10000`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RheaId(String);

impl RheaId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RheaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RheaId {
    type Err = KiraError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let digits = trimmed
            .strip_prefix("RHEA:")
            .or_else(|| trimmed.strip_prefix("rhea:"))
            .unwrap_or(trimmed);
        if digits.is_empty() || !digits.chars().all(|ch| ch.is_ascii_digit()) {
            return Err(KiraError::InvalidRheaId(value.to_string()));
        }
        Ok(Self(digits.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    Taxa,
    Names,
    Pfams,
    Sequences,
    Reactions,
}

impl Dataset {
    /// Collection order of a full run.
    pub const ALL: [Dataset; 5] = [
        Dataset::Taxa,
        Dataset::Names,
        Dataset::Pfams,
        Dataset::Sequences,
        Dataset::Reactions,
    ];

    pub fn file_stem(self) -> &'static str {
        match self {
            Dataset::Taxa => "taxaNAT",
            Dataset::Names => "namesNAT",
            Dataset::Pfams => "pfams",
            Dataset::Sequences => "sequencesNAT",
            Dataset::Reactions => "reaction_dataNAT",
        }
    }

    pub fn file_name(self, format: OutputFormat) -> String {
        format!("{}.{}", self.file_stem(), format.extension())
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dataset::Taxa => write!(f, "taxa"),
            Dataset::Names => write!(f, "names"),
            Dataset::Pfams => write!(f, "pfams"),
            Dataset::Sequences => write!(f, "sequences"),
            Dataset::Reactions => write!(f, "reactions"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Xlsx,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Xlsx => "xlsx",
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("csv") => Some(OutputFormat::Csv),
            Some("xlsx") => Some(OutputFormat::Xlsx),
            _ => None,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}
