//! Section catalog
//!
//! An in-memory [`SectionSource`] keyed by section name. Catalogs are loaded
//! from CSV exports of the model's frame-section tables, or built in code for
//! tests and demos.
//!
//! ## CSV Format
//!
//! ```text
//! name,shape,t3,t2,tf,tw,t2b,tfb,radius,i33,z33,area,r22,r33,fy,material
//! IPE300,I,300,150,10.7,7.1,150,10.7,15,83560000,628400,5381,33.5,124.6,355,S355
//! ```
//!
//! Empty or non-numeric cells read as zero.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::{SectionGeometry, SectionSource, ShapeKind};
use crate::errors::{CalcError, CalcResult};

/// Status reported when a section exists but is not of the requested shape
pub const STATUS_SHAPE_MISMATCH: i32 = 1;

/// Section catalog indexed by uppercase name
#[derive(Debug, Clone, Default)]
pub struct SectionCatalog {
    sections: HashMap<String, SectionGeometry>,

    /// Names in insertion order, as the user listed them
    names: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    name: String,
    shape: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    t3: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    t2: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    tf: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    tw: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    t2b: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    tfb: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    radius: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    i33: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    z33: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    area: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    r22: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    r33: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    fy: Option<f64>,
    #[serde(default)]
    material: Option<String>,
}

impl CatalogRow {
    fn into_geometry(self, shape: ShapeKind) -> SectionGeometry {
        let fillet = if shape.has_fillet() { self.radius.unwrap_or(0.0) } else { 0.0 };
        SectionGeometry {
            shape,
            material: self.material.filter(|m| !m.trim().is_empty()),
            depth_mm: self.t3.unwrap_or(0.0),
            flange_width_mm: self.t2.unwrap_or(0.0),
            flange_thickness_mm: self.tf.unwrap_or(0.0),
            web_thickness_mm: self.tw.unwrap_or(0.0),
            bottom_flange_width_mm: self.t2b.unwrap_or(0.0),
            bottom_flange_thickness_mm: self.tfb.unwrap_or(0.0),
            fillet_radius_mm: fillet,
            i33_mm4: self.i33.unwrap_or(0.0),
            z33_mm3: self.z33.unwrap_or(0.0),
            area_mm2: self.area.unwrap_or(0.0),
            r22_mm: self.r22.unwrap_or(0.0),
            r33_mm: self.r33.unwrap_or(0.0),
            fy_mpa: self.fy.unwrap_or(0.0),
        }
    }
}

impl SectionCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from a CSV file
    pub fn load_from_csv(path: &Path) -> CalcResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(path)
            .map_err(|e| CalcError::file_error("open", path.display().to_string(), e.to_string()))?;

        let mut catalog = SectionCatalog::new();
        for (index, row) in reader.deserialize::<CatalogRow>().enumerate() {
            let row = row.map_err(|e| CalcError::SerializationError {
                reason: format!("{} row {}: {}", path.display(), index + 2, e),
            })?;
            if row.name.is_empty() {
                continue;
            }
            let shape: ShapeKind = row.shape.parse()?;
            let name = row.name.clone();
            catalog.insert(name, row.into_geometry(shape));
        }

        tracing::info!(path = %path.display(), sections = catalog.len(), "loaded section catalog");
        Ok(catalog)
    }

    /// Insert or replace a section
    pub fn insert(&mut self, name: impl Into<String>, geometry: SectionGeometry) {
        let name = name.into();
        let key = name.to_uppercase();
        if self.sections.insert(key, geometry).is_none() {
            self.names.push(name);
        }
    }

    /// Look up a section by name regardless of shape
    pub fn lookup(&self, name: &str) -> CalcResult<&SectionGeometry> {
        self.sections
            .get(&name.to_uppercase())
            .ok_or_else(|| CalcError::section_not_found(name))
    }

    /// Section names in insertion order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of sections
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// A small set of European rolled sections (S355) for demos and tests.
    pub fn builtin() -> Self {
        let mut catalog = SectionCatalog::new();

        // name, h, b, tw, tf, r, A, Iy, Wpl,y, iy, iz
        let i_sections = [
            ("IPE200", 200.0, 100.0, 5.6, 8.5, 12.0, 2848.0, 19.43e6, 220.6e3, 82.6, 22.4),
            ("IPE300", 300.0, 150.0, 7.1, 10.7, 15.0, 5381.0, 83.56e6, 628.4e3, 124.6, 33.5),
            ("IPE400", 400.0, 180.0, 8.6, 13.5, 21.0, 8446.0, 231.3e6, 1307.0e3, 165.5, 39.5),
            ("HEA200", 190.0, 200.0, 6.5, 10.0, 18.0, 5383.0, 36.92e6, 429.5e3, 82.8, 49.8),
            ("HEA300", 290.0, 300.0, 8.5, 14.0, 27.0, 11250.0, 182.6e6, 1383.0e3, 127.4, 74.9),
            ("HEB300", 300.0, 300.0, 11.0, 19.0, 27.0, 14910.0, 251.7e6, 1869.0e3, 129.9, 75.8),
        ];

        for (name, h, b, tw, tf, r, a, iy, wpl, ry, rz) in i_sections {
            catalog.insert(
                name,
                SectionGeometry {
                    shape: ShapeKind::I,
                    material: Some("S355".to_string()),
                    depth_mm: h,
                    flange_width_mm: b,
                    flange_thickness_mm: tf,
                    web_thickness_mm: tw,
                    bottom_flange_width_mm: b,
                    bottom_flange_thickness_mm: tf,
                    fillet_radius_mm: r,
                    i33_mm4: iy,
                    z33_mm3: wpl,
                    area_mm2: a,
                    r22_mm: rz,
                    r33_mm: ry,
                    fy_mpa: 355.0,
                },
            );
        }

        catalog.insert(
            "UPN200",
            SectionGeometry {
                shape: ShapeKind::Channel,
                material: Some("S355".to_string()),
                depth_mm: 200.0,
                flange_width_mm: 75.0,
                flange_thickness_mm: 11.5,
                web_thickness_mm: 8.5,
                i33_mm4: 19.1e6,
                z33_mm3: 228.0e3,
                area_mm2: 3220.0,
                r22_mm: 21.4,
                r33_mm: 77.0,
                fy_mpa: 355.0,
                ..Default::default()
            },
        );

        catalog.insert(
            "L100X10",
            SectionGeometry {
                shape: ShapeKind::Angle,
                material: Some("S355".to_string()),
                depth_mm: 100.0,
                flange_width_mm: 100.0,
                flange_thickness_mm: 10.0,
                web_thickness_mm: 10.0,
                area_mm2: 1920.0,
                r22_mm: 30.4,
                r33_mm: 30.4,
                fy_mpa: 355.0,
                ..Default::default()
            },
        );

        catalog
    }
}

impl SectionSource for SectionCatalog {
    fn section_properties(&self, name: &str, shape: ShapeKind) -> CalcResult<SectionGeometry> {
        let geometry = self.lookup(name)?;
        if geometry.shape != shape {
            return Err(CalcError::lookup_failed(name, STATUS_SHAPE_MISMATCH));
        }
        Ok(geometry.clone())
    }
}
