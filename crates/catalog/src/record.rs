//! Station records and the wire schema used to read them.
//!
//! Feeds deliver each station as a flat JSON object with a fixed set of
//! descriptive fields plus one `"<prefix><fuel type>"` key per fuel sold.
//! [`StationRecord::from_wire`] maps such an object onto a typed record,
//! moving the variable price keys into [`StationRecord::prices`].

use crate::facets::{strip_price_prefix, FacetField};
use fuelscope_geo::{parse_coordinate, parse_decimal, Coordinate, Locatable};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One fuel station.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    /// Feed-assigned station id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Brand label shown on the canopy
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub municipality: String,
    #[serde(default)]
    pub locality: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    /// Opening hours as published
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
    /// Latitude as published (comma decimal separator)
    #[serde(default)]
    pub latitude: String,
    /// Longitude as published (comma decimal separator)
    #[serde(default)]
    pub longitude: String,
    /// Fuel type label to price. `None` means the fuel is listed without a price.
    #[serde(default)]
    pub prices: BTreeMap<String, Option<f64>>,
    /// Distance to the user in kilometers, set by an annotation pass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_to_user: Option<f64>,
}

impl StationRecord {
    /// Creates a record with the four categorical fields set.
    pub fn new(
        brand: impl Into<String>,
        province: impl Into<String>,
        municipality: impl Into<String>,
        locality: impl Into<String>,
    ) -> Self {
        Self {
            brand: brand.into(),
            province: province.into(),
            municipality: municipality.into(),
            locality: locality.into(),
            ..Self::default()
        }
    }

    /// Builder-style method to set the raw coordinate strings
    #[must_use]
    pub fn with_coordinates(mut self, latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        self.latitude = latitude.into();
        self.longitude = longitude.into();
        self
    }

    /// Builder-style method to add a fuel price
    #[must_use]
    pub fn with_price(mut self, fuel_type: impl Into<String>, price: Option<f64>) -> Self {
        self.prices.insert(fuel_type.into(), price);
        self
    }

    /// Builder-style method to set the station id
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// The raw value of one categorical field.
    pub fn field(&self, field: FacetField) -> &str {
        match field {
            FacetField::Brand => &self.brand,
            FacetField::Province => &self.province,
            FacetField::Municipality => &self.municipality,
            FacetField::Locality => &self.locality,
        }
    }

    /// Fuel type labels this station lists, sorted.
    pub fn fuel_types(&self) -> impl Iterator<Item = &str> {
        self.prices.keys().map(String::as_str)
    }

    /// Returns true if the station lists `fuel_type`, with or without a price.
    pub fn offers(&self, fuel_type: &str) -> bool {
        self.prices.contains_key(fuel_type)
    }

    /// Price of `fuel_type`, if listed and priced.
    pub fn price(&self, fuel_type: &str) -> Option<f64> {
        self.prices.get(fuel_type).copied().flatten()
    }

    /// Reads a record from one feed object.
    ///
    /// Never fails: absent or non-textual fields become empty strings or
    /// `None`, and an unparseable price is kept as a listed-but-unpriced fuel.
    pub fn from_wire(object: &Map<String, Value>, schema: &WireSchema) -> Self {
        let prices = object
            .iter()
            .filter_map(|(key, value)| {
                let label = strip_price_prefix(key, &schema.price_prefix)?;
                let price = value_text(value).and_then(|raw| parse_decimal(&raw).ok());
                Some((label.to_string(), price))
            })
            .collect();

        Self {
            id: optional_text(object, schema.id.as_deref()),
            brand: text(object, &schema.brand),
            province: text(object, &schema.province),
            municipality: text(object, &schema.municipality),
            locality: text(object, &schema.locality),
            address: optional_text(object, schema.address.as_deref()),
            postal_code: optional_text(object, schema.postal_code.as_deref()),
            schedule: optional_text(object, schema.schedule.as_deref()),
            latitude: text(object, &schema.latitude),
            longitude: text(object, &schema.longitude),
            prices,
            distance_to_user: None,
        }
    }
}

fn text(object: &Map<String, Value>, key: &str) -> String {
    object.get(key).and_then(value_text).unwrap_or_default()
}

fn optional_text(object: &Map<String, Value>, key: Option<&str>) -> Option<String> {
    key.and_then(|k| object.get(k))
        .and_then(value_text)
        .filter(|s| !s.is_empty())
}

/// Trimmed text of a JSON scalar. Numbers are rendered with their JSON form.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl Locatable for StationRecord {
    fn coordinate(&self) -> Option<Coordinate> {
        parse_coordinate(&self.latitude, &self.longitude).ok()
    }

    fn distance(&self) -> Option<f64> {
        self.distance_to_user
    }

    fn set_distance(&mut self, distance: Option<f64>) {
        self.distance_to_user = distance;
    }
}

/// Named field layouts understood by [`WireSchema`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaPreset {
    /// English field names with a `"Price "` prefix
    Canonical,
    /// Field names of the Spanish ministry `EstacionesTerrestres` feed
    #[default]
    Minetur,
}

/// Field names used to read a [`StationRecord`] from a feed object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireSchema {
    pub brand: String,
    pub province: String,
    pub municipality: String,
    pub locality: String,
    pub latitude: String,
    pub longitude: String,
    /// Prefix marking fuel price keys, stripped to obtain the fuel type label
    pub price_prefix: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub schedule: Option<String>,
}

impl WireSchema {
    /// `brand label`, `province`, `municipality`, `locality`, `latitude`,
    /// `longitude` and `"Price <fuel>"` keys.
    pub fn canonical() -> Self {
        Self {
            brand: "brand label".to_string(),
            province: "province".to_string(),
            municipality: "municipality".to_string(),
            locality: "locality".to_string(),
            latitude: "latitude".to_string(),
            longitude: "longitude".to_string(),
            price_prefix: "Price ".to_string(),
            id: Some("id".to_string()),
            address: Some("address".to_string()),
            postal_code: Some("postal code".to_string()),
            schedule: Some("schedule".to_string()),
        }
    }

    /// Field names of the `ListaEESSPrecio` entries in the ministry feed.
    pub fn minetur() -> Self {
        Self {
            brand: "Rótulo".to_string(),
            province: "Provincia".to_string(),
            municipality: "Municipio".to_string(),
            locality: "Localidad".to_string(),
            latitude: "Latitud".to_string(),
            longitude: "Longitud (WGS84)".to_string(),
            price_prefix: "Precio ".to_string(),
            id: Some("IDEESS".to_string()),
            address: Some("Dirección".to_string()),
            postal_code: Some("C.P.".to_string()),
            schedule: Some("Horario".to_string()),
        }
    }
}

impl SchemaPreset {
    /// Looks a preset up by its lowercase name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "canonical" => Some(Self::Canonical),
            "minetur" => Some(Self::Minetur),
            _ => None,
        }
    }
}

impl Default for WireSchema {
    fn default() -> Self {
        SchemaPreset::default().into()
    }
}

impl From<SchemaPreset> for WireSchema {
    fn from(preset: SchemaPreset) -> Self {
        match preset {
            SchemaPreset::Canonical => Self::canonical(),
            SchemaPreset::Minetur => Self::minetur(),
        }
    }
}
