use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::candidates::CandidatesInfo;
use super::types::{normalize, Entity};

const CATALOG_VERSION: u32 = 1;

/// Candidate entities grouped by surface form, as stored on disk.
///
/// Example JSON:
/// ```json
/// {
///   "version": 1,
///   "surface_forms": [
///     { "surface_form": "paris",
///       "candidates": [ { "id": "Q90", "name": "Paris", "link_count": 1200 } ] }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub version: u32,
    #[serde(default)]
    pub surface_forms: Vec<SurfaceFormEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurfaceFormEntry {
    pub surface_form: String,
    pub candidates: Vec<Entity>,
}

impl Catalog {
    /// Candidates for a surface form, matched case- and whitespace-insensitively.
    /// The first matching entry wins if the file lists a form twice.
    pub fn lookup(&self, surface_form: &str) -> Option<&[Entity]> {
        let wanted = normalize(surface_form);
        self.surface_forms
            .iter()
            .find(|entry| normalize(&entry.surface_form) == wanted)
            .map(|entry| entry.candidates.as_slice())
    }

    /// Fresh candidate bundle (with an empty cache slot) for a surface form
    pub fn candidates_for(&self, surface_form: &str) -> Option<CandidatesInfo> {
        self.lookup(surface_form)
            .map(|entities| CandidatesInfo::new(entities.to_vec()))
    }
}

/// Load a candidate catalog from a JSON file
///
/// Returns an error if the file cannot be opened or parsed, or if it
/// declares an unsupported version.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open candidate catalog at {}", path.display()))?;

    let catalog: Catalog = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse candidate catalog {}", path.display()))?;

    if catalog.version != CATALOG_VERSION {
        anyhow::bail!("Unsupported candidate catalog version: {}", catalog.version);
    }

    tracing::debug!(
        path = %path.display(),
        surface_forms = catalog.surface_forms.len(),
        "loaded candidate catalog"
    );

    Ok(catalog)
}
