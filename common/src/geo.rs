//! Province / canton / parish cascade and stored coordinates.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::catalog::CatalogEntry;
use crate::values::{FichaData, is_filled, numeric_value, value_to_string};

/// Centre of Ecuador, shown when a record has no coordinates.
pub const DEFAULT_CENTER: GeoPoint = GeoPoint {
    lat: -1.8312,
    lng: -78.1834,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeoLevel {
    Province,
    Canton,
    Parish,
}

impl GeoLevel {
    pub const ALL: [GeoLevel; 3] = [GeoLevel::Province, GeoLevel::Canton, GeoLevel::Parish];

    pub fn field_name(&self) -> &'static str {
        match self {
            GeoLevel::Province => "select_provincia",
            GeoLevel::Canton => "select_canton",
            GeoLevel::Parish => "select_parroquia",
        }
    }

    /// Accepts both the `select_*` names and the bare `provincia`/`canton`/`parroquia`
    /// used by older forms.
    pub fn from_field_name(name: &str) -> Option<GeoLevel> {
        match name {
            "select_provincia" | "provincia" => Some(GeoLevel::Province),
            "select_canton" | "canton" => Some(GeoLevel::Canton),
            "select_parroquia" | "parroquia" => Some(GeoLevel::Parish),
            _ => None,
        }
    }

    pub fn parent(&self) -> Option<GeoLevel> {
        match self {
            GeoLevel::Province => None,
            GeoLevel::Canton => Some(GeoLevel::Province),
            GeoLevel::Parish => Some(GeoLevel::Canton),
        }
    }

    pub fn child(&self) -> Option<GeoLevel> {
        match self {
            GeoLevel::Province => Some(GeoLevel::Canton),
            GeoLevel::Canton => Some(GeoLevel::Parish),
            GeoLevel::Parish => None,
        }
    }

    /// API path of this level's catalog. Levels below the province need the
    /// parent id and yield `None` until it is chosen.
    pub fn catalog_path(&self, parent_value: Option<&str>) -> Option<String> {
        let parent = parent_value.map(str::trim).filter(|v| !v.is_empty());
        match (self, parent) {
            (GeoLevel::Province, _) => Some("/geo/provinces".to_string()),
            (GeoLevel::Canton, Some(id)) => Some(format!("/geo/cantons/{}", id)),
            (GeoLevel::Parish, Some(id)) => Some(format!("/geo/parishes/{}", id)),
            _ => None,
        }
    }

    /// Current value of the parent level; always `None` for provinces.
    pub fn parent_value(&self, data: &FichaData) -> Option<String> {
        self.parent()
            .and_then(|p| data.get(p.field_name()))
            .filter(|v| is_filled(Some(v)))
            .map(|v| value_to_string(v).trim().to_string())
    }

    /// Catalog path for this level given the current record data.
    pub fn catalog_path_for(&self, data: &FichaData) -> Option<String> {
        self.catalog_path(self.parent_value(data).as_deref())
    }

    /// Whether a catalog fetched for `parent` still matches the record. A
    /// response for an earlier parent selection is stale.
    pub fn is_current_parent(&self, parent: Option<&str>, data: &FichaData) -> bool {
        self.parent_value(data).as_deref() == parent
    }

    /// Fields to clear after the user changes this level.
    pub fn dependents(&self) -> Vec<GeoLevel> {
        let mut out = Vec::new();
        let mut next = self.child();
        while let Some(level) = next {
            out.push(level);
            next = level.child();
        }
        out
    }
}

/// Loaded catalogs of the three levels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoCatalogs {
    #[serde(default)]
    pub provinces: Vec<CatalogEntry>,
    #[serde(default)]
    pub cantons: Vec<CatalogEntry>,
    #[serde(default)]
    pub parishes: Vec<CatalogEntry>,
}

impl GeoCatalogs {
    pub fn for_level(&self, level: GeoLevel) -> &[CatalogEntry] {
        match level {
            GeoLevel::Province => &self.provinces,
            GeoLevel::Canton => &self.cantons,
            GeoLevel::Parish => &self.parishes,
        }
    }

    pub fn set(&mut self, level: GeoLevel, entries: Vec<CatalogEntry>) {
        match level {
            GeoLevel::Province => self.provinces = entries,
            GeoLevel::Canton => self.cantons = entries,
            GeoLevel::Parish => self.parishes = entries,
        }
    }

    /// Catalog to resolve a field against; empty for non-geographic fields.
    pub fn for_field(&self, field_name: &str) -> &[CatalogEntry] {
        GeoLevel::from_field_name(field_name)
            .map(|level| self.for_level(level))
            .unwrap_or(&[])
    }

    /// Display name of the stored value, falling back to the raw value or `-`.
    pub fn display_name(&self, level: GeoLevel, stored: Option<&Value>) -> String {
        let raw = stored.map(value_to_string).unwrap_or_default();
        if raw.is_empty() {
            return "-".to_string();
        }
        self.for_level(level)
            .iter()
            .find(|e| e.matches(&raw))
            .map(CatalogEntry::display_label)
            .unwrap_or(raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Reads `{lat, lng}` (or `latitude`/`longitude`), also when stored as a JSON string.
    pub fn parse(value: Option<&Value>) -> Option<GeoPoint> {
        match value? {
            Value::Object(map) => {
                let lat = numeric_value(map.get("lat").or_else(|| map.get("latitude")))?;
                let lng = numeric_value(map.get("lng").or_else(|| map.get("longitude")))?;
                Some(GeoPoint { lat, lng })
            }
            Value::String(s) => {
                let parsed: Value = serde_json::from_str(s).ok()?;
                match parsed {
                    Value::Object(_) => GeoPoint::parse(Some(&parsed)),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    pub fn or_default_center(point: Option<GeoPoint>) -> (GeoPoint, bool) {
        match point {
            Some(p) => (p, true),
            None => (DEFAULT_CENTER, false),
        }
    }

    pub fn describe(&self) -> String {
        format!("Lat: {} | Lng: {}", self.lat, self.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn catalogs_for_an_earlier_parent_are_stale() {
        let mut data = FichaData::new();
        data.insert("select_provincia".into(), json!("17"));
        assert!(GeoLevel::Canton.is_current_parent(Some("17"), &data));

        data.insert("select_provincia".into(), json!("9"));
        assert!(!GeoLevel::Canton.is_current_parent(Some("17"), &data));
        assert!(GeoLevel::Canton.is_current_parent(Some("9"), &data));
        assert!(GeoLevel::Province.is_current_parent(None, &data));

        data.insert("select_provincia".into(), json!(""));
        assert!(!GeoLevel::Canton.is_current_parent(Some("9"), &data));
    }

    #[test]
    fn catalog_paths_need_the_parent() {
        let mut data = FichaData::new();
        assert_eq!(
            GeoLevel::Province.catalog_path_for(&data).as_deref(),
            Some("/geo/provinces")
        );
        assert_eq!(GeoLevel::Canton.catalog_path_for(&data), None);

        data.insert("select_provincia".into(), json!(17));
        data.insert("select_canton".into(), json!(""));
        assert_eq!(
            GeoLevel::Canton.catalog_path_for(&data).as_deref(),
            Some("/geo/cantons/17")
        );
        assert_eq!(GeoLevel::Parish.catalog_path_for(&data), None);
    }

    #[test]
    fn province_change_clears_everything_below() {
        assert_eq!(
            GeoLevel::Province.dependents(),
            vec![GeoLevel::Canton, GeoLevel::Parish]
        );
        assert_eq!(GeoLevel::Canton.dependents(), vec![GeoLevel::Parish]);
        assert!(GeoLevel::Parish.dependents().is_empty());
    }

    #[test]
    fn display_names_come_from_catalogs() {
        let catalogs = GeoCatalogs {
            provinces: vec![CatalogEntry::new(17, "Pichincha")],
            ..Default::default()
        };
        assert_eq!(
            catalogs.display_name(GeoLevel::Province, Some(&json!("17"))),
            "Pichincha"
        );
        assert_eq!(catalogs.display_name(GeoLevel::Canton, Some(&json!(5))), "5");
        assert_eq!(catalogs.display_name(GeoLevel::Parish, None), "-");
        assert_eq!(catalogs.for_field("provincia").len(), 1);
        assert!(catalogs.for_field("edad").is_empty());
    }

    #[test]
    fn points_parse_from_objects_and_strings() {
        assert_eq!(
            GeoPoint::parse(Some(&json!({"lat": -0.18, "lng": "-78.47"}))),
            Some(GeoPoint { lat: -0.18, lng: -78.47 })
        );
        assert_eq!(
            GeoPoint::parse(Some(&json!("{\"latitude\": 1, \"longitude\": 2}"))),
            Some(GeoPoint { lat: 1.0, lng: 2.0 })
        );
        assert_eq!(GeoPoint::parse(Some(&json!("no"))), None);
        let (center, found) = GeoPoint::or_default_center(None);
        assert!(!found);
        assert_eq!(center, DEFAULT_CENTER);
    }
}
