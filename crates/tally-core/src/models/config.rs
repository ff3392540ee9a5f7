//! Configuration structures for the ingestion pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the tally pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TallyConfig {
    /// Catalog matching configuration.
    pub matching: MatchConfig,

    /// Size normalization configuration.
    pub sizes: SizeConfig,

    /// PDF table detection configuration.
    pub pdf: PdfConfig,

    /// Known vendors and the lane their invoices go through.
    pub vendors: VendorRegistry,
}

/// Catalog matcher configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Minimum token-set similarity (0 - 100) to accept a catalog candidate.
    pub min_score: f64,

    /// Lowercase and strip punctuation before comparing descriptions (off by
    /// default).
    pub normalize_text: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            min_score: 85.0,
            normalize_text: false,
        }
    }
}

/// Size normalization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeConfig {
    /// Unitless values above this are milliliters, at or below it liters.
    /// Tuned for bottle sizes; not a general unit conversion rule.
    pub liter_cutoff: f64,
}

impl Default for SizeConfig {
    fn default() -> Self {
        Self { liter_cutoff: 100.0 }
    }
}

/// PDF table detection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum baseline difference (points) for text runs on the same line.
    pub line_tolerance: f32,

    /// Minimum number of cells for a line to be a table row. Shorter lines
    /// inside a table continue the previous row.
    pub min_columns: usize,

    /// Horizontal gap between glyphs, in ems, that starts a new text run.
    pub split_gap_em: f32,

    /// Vertical gap between table lines, in ems, that ends the table.
    pub max_row_gap_em: f32,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            line_tolerance: 2.0,
            min_columns: 2,
            split_gap_em: 2.0,
            max_row_gap_em: 2.5,
        }
    }
}

/// Ingestion lane for a vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lane {
    /// Machine-generated CSV export with a fixed schema.
    Structured,
    /// PDF invoice requiring table extraction and catalog matching.
    Unstructured,
}

impl Lane {
    /// File extension accepted for this lane.
    pub fn extension(&self) -> &'static str {
        match self {
            Lane::Structured => "csv",
            Lane::Unstructured => "pdf",
        }
    }
}

/// A vendor whose invoices can be ingested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorProfile {
    /// Short identifier used on the command line.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Lane the vendor's documents go through.
    pub lane: Lane,

    /// Default master catalog for unstructured vendors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,
}

/// Ordered list of vendor profiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VendorRegistry(pub Vec<VendorProfile>);

impl Default for VendorRegistry {
    fn default() -> Self {
        Self(vec![
            VendorProfile {
                id: "fintech".to_string(),
                name: "Fintech Export (CSV)".to_string(),
                lane: Lane::Structured,
                catalog: None,
            },
            VendorProfile {
                id: "specs".to_string(),
                name: "Spec's (PDF)".to_string(),
                lane: Lane::Unstructured,
                catalog: Some(PathBuf::from("data/master_files/specs_master.csv")),
            },
            VendorProfile {
                id: "wolf".to_string(),
                name: "Wolf Express (PDF)".to_string(),
                lane: Lane::Unstructured,
                catalog: Some(PathBuf::from("data/master_files/wolf_master.csv")),
            },
        ])
    }
}

impl VendorRegistry {
    /// Find a vendor by id (case-insensitive).
    pub fn get(&self, id: &str) -> Option<&VendorProfile> {
        self.0.iter().find(|v| v.id.eq_ignore_ascii_case(id))
    }

    /// Iterate over all vendors.
    pub fn iter(&self) -> impl Iterator<Item = &VendorProfile> {
        self.0.iter()
    }
}

impl TallyConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TallyConfig::default();
        assert_eq!(config.matching.min_score, 85.0);
        assert_eq!(config.sizes.liter_cutoff, 100.0);
        assert_eq!(config.vendors.get("SPECS").map(|v| v.lane), Some(Lane::Unstructured));
        assert!(config.vendors.get("unknown").is_none());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: TallyConfig =
            serde_json::from_str(r#"{"matching": {"min_score": 90}}"#).unwrap();
        assert_eq!(config.matching.min_score, 90.0);
        assert!(!config.matching.normalize_text);
        assert_eq!(config.pdf.min_columns, 2);
        assert_eq!(config.pdf.max_row_gap_em, 2.5);
        assert_eq!(config.vendors.iter().count(), 3);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = TallyConfig::default();
        config.sizes.liter_cutoff = 50.0;
        config.save(&path).unwrap();

        let loaded = TallyConfig::from_file(&path).unwrap();
        assert_eq!(loaded.sizes.liter_cutoff, 50.0);
        assert_eq!(loaded.vendors, config.vendors);
    }
}
