//! # Location Catalog
//!
//! Read-only index from region code to the descriptive [`Location`] record
//! it belongs to, populated once from a gazetteer CSV at startup.
//!
//! ## Gazetteer format
//!
//! A header row followed by six columns per data row:
//!
//! ```text
//! City Code,Province Code,Country Code,City Name,Province Name,Country Name
//! LA,CA,US,Los Angeles,California,United States
//! ```
//!
//! Each row is indexed under three keys: `LA-CA-US`, `CA-US` and `US`.
//! Several cities share a province and country, so later rows overwrite the
//! province and country entries of earlier ones. Rows with fewer than six
//! fields are skipped.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use crate::error::CatalogError;
use crate::region::SEGMENT_SEPARATOR;

/// Number of fields a gazetteer row must carry.
pub const GAZETTEER_FIELDS: usize = 6;

/// A gazetteer row: codes and names at city, province and country granularity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// City code, e.g. `LA`.
    pub city_code: String,
    /// Province code, e.g. `CA`.
    pub province_code: String,
    /// Country code, e.g. `US`.
    pub country_code: String,
    /// City name.
    pub city_name: String,
    /// Province name.
    pub province_name: String,
    /// Country name.
    pub country_name: String,
}

impl Location {
    /// The `city-province-country` key.
    pub fn city_key(&self) -> String {
        format!(
            "{}{SEGMENT_SEPARATOR}{}{SEGMENT_SEPARATOR}{}",
            self.city_code, self.province_code, self.country_code
        )
    }

    /// The `province-country` key.
    pub fn province_key(&self) -> String {
        format!("{}{SEGMENT_SEPARATOR}{}", self.province_code, self.country_code)
    }

    /// The bare country key.
    pub fn country_key(&self) -> String {
        self.country_code.clone()
    }

    /// Human-readable `City, Province, Country`.
    pub fn describe(&self) -> String {
        format!(
            "{}, {}, {}",
            self.city_name, self.province_name, self.country_name
        )
    }

    fn from_record(record: &csv::StringRecord) -> Option<Self> {
        if record.len() < GAZETTEER_FIELDS {
            return None;
        }
        let field = |i: usize| record.get(i).unwrap_or_default().trim().to_string();
        Some(Self {
            city_code: field(0),
            province_code: field(1),
            country_code: field(2),
            city_name: field(3),
            province_name: field(4),
            country_name: field(5),
        })
    }
}

/// Region code → location index.
#[derive(Debug, Clone, Default)]
pub struct RegionCatalog {
    entries: BTreeMap<String, Location>,
}

impl RegionCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a gazetteer CSV file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be opened, has no header row or a header
    /// with fewer than six columns, or contains undecodable CSV. Short rows are skipped, not errors.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_reader(file)?;
        tracing::debug!(
            path = %path.display(),
            entries = catalog.len(),
            "loaded location catalog"
        );
        Ok(catalog)
    }

    /// Build a catalog from any CSV byte stream.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let fields = csv_reader.headers()?.len();
        if fields == 0 {
            return Err(CatalogError::MissingHeader);
        }
        if fields < GAZETTEER_FIELDS {
            return Err(CatalogError::MalformedHeader { fields });
        }

        let mut catalog = Self::new();
        for (index, record) in csv_reader.records().enumerate() {
            let record = record?;
            match Location::from_record(&record) {
                Some(location) => catalog.insert(location),
                None => tracing::warn!(
                    row = index + 2,
                    fields = record.len(),
                    "skipping gazetteer row with fewer than {GAZETTEER_FIELDS} fields"
                ),
            }
        }
        Ok(catalog)
    }

    /// Index a location under its city, province and country keys.
    pub fn insert(&mut self, location: Location) {
        self.entries.insert(location.city_key(), location.clone());
        self.entries.insert(location.province_key(), location.clone());
        self.entries.insert(location.country_key(), location);
    }

    /// Whether `code` is a known region.
    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    /// The location indexed under `code`.
    pub fn get(&self, code: &str) -> Option<&Location> {
        self.entries.get(code)
    }

    /// Number of indexed keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
