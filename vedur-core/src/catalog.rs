//! Static lookup tables shared by all operations.
//!
//! The measurement catalog maps the short parameter codes used by the XML
//! service (`F`, `T`, `RH`, ...) to readable labels in each supported language.
//! The `is` table also fixes the order of the `params=` query value.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::model::Lang;

/// Text bulletin ids accepted by the `txt` query type.
pub const TEXT_TYPES: &[&str] = &[
    "2", "3", "5", "6", "7", "9", "10", "11", "12", "14", "27", "30", "31", "32", "33", "34",
    "35", "36", "37", "38", "39", "42",
];

const MEASUREMENTS_IS: &[(&str, &str)] = &[
    ("F", "Vindhraði (m/s)"),
    ("FX", "Mesti vindhraði (m/s)"),
    ("FG", "Mesta vindhviða (m/s)"),
    ("D", "Vindstefna"),
    ("T", "Hiti (°C)"),
    ("W", "Veðurlýsing"),
    ("V", "Skyggni (km)"),
    ("N", "Skýjahula (%)"),
    ("P", "Loftþrýstingur (hPa)"),
    ("RH", "Rakastig (%)"),
    ("SNC", "Lýsing á snjó"),
    ("SND", "Snjódýpt"),
    ("SED", "Snjólag"),
    ("RTE", "Vegahiti (°C)"),
    ("TD", "Daggarmark (°C)"),
    ("R", "Uppsöfnuð úrkoma (mm/klst) úr sjálfvirkum mælum"),
];

const MEASUREMENTS_EN: &[(&str, &str)] = &[
    ("F", "Wind speed (m/s)"),
    ("FX", "Top wind speed (m/s)"),
    ("FG", "Top wind gust (m/s)"),
    ("D", "Wind direction"),
    ("T", "Air temperature (°C)"),
    ("W", "Weather description"),
    ("V", "Visibility (km)"),
    ("N", "Cloud cover (%)"),
    ("P", "Air pressure"),
    ("RH", "Humidity (%)"),
    ("SNC", "Snow description"),
    ("SND", "Snow depth"),
    ("SED", "Snow type"),
    ("RTE", "Road temperature (°C)"),
    ("TD", "Dew limit (°C)"),
    ("R", "Cumulative precipitation (mm/h) from automatic measuring units"),
];

/// Ordered measurement labels for one language.
///
/// Serializes as a JSON object keeping the catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptions(&'static [(&'static str, &'static str)]);

impl Descriptions {
    pub fn get(&self, code: &str) -> Option<&'static str> {
        self.0.iter().find(|(c, _)| *c == code).map(|(_, label)| *label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.0.iter().copied()
    }
}

impl Serialize for Descriptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (code, label) in self.0 {
            map.serialize_entry(code, label)?;
        }
        map.end()
    }
}

/// Measurement labels for `lang`.
pub fn measurements(lang: Lang) -> Descriptions {
    match lang {
        Lang::Is => Descriptions(MEASUREMENTS_IS),
        Lang::En => Descriptions(MEASUREMENTS_EN),
    }
}

/// Measurement codes in query order, taken from the Icelandic table.
pub fn measurement_codes() -> impl Iterator<Item = &'static str> {
    MEASUREMENTS_IS.iter().map(|(code, _)| *code)
}

/// The `params=` value sent with forecast and observation queries.
pub fn params_value() -> String {
    measurement_codes().collect::<Vec<_>>().join(";")
}

pub fn is_known_text_type(id: &str) -> bool {
    TEXT_TYPES.contains(&id)
}
