//! Wire and domain types shared by the client and the eligibility rules.
//!
//! ## Observed shapes
//!
//! ### Service points
//! Warehouses and lockers share one shape. The id is numeric on some
//! deployments and a string on others; the display name arrives as `name`
//! or `title`; the city as `city`, `city_name` or `cityName`. City labels are
//! free text typed by operators, so casing and spelling drift between the
//! warehouse and locker sources.
//!
//! ### Cities
//! Two representations exist: a flat city (`"name": "Tashkent"`) and a
//! region-scoped city with per-language names
//! (`"name": { "uz": "Toshkent", "ru": "Ташкент", "en": "Tashkent" }`).
//! Coordinates may be numbers or numeric strings and are absent for some
//! cities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Backend identifier, numeric or textual depending on the data source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PointId {
    Number(i64),
    Text(String),
}

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointId::Number(n) => write!(f, "{n}"),
            PointId::Text(s) => f.write_str(s),
        }
    }
}

/// A warehouse (staffed office) or a parcel locker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServicePoint {
    pub id: PointId,
    #[serde(alias = "name", alias = "title", default, deserialize_with = "de_null_as_empty")]
    pub display_name: String,
    /// Empty when the backend sent no city; such points never match.
    #[serde(alias = "city", alias = "cityName", default, deserialize_with = "de_null_as_empty")]
    pub city_name: String,
}

impl ServicePoint {
    #[must_use]
    pub fn new(id: i64, display_name: &str, city_name: &str) -> Self {
        Self {
            id: PointId::Number(id),
            display_name: display_name.to_owned(),
            city_name: city_name.to_owned(),
        }
    }
}

/// Languages city names are published in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Uz,
    Ru,
    #[default]
    En,
}

impl Language {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Uz => "uz",
            Language::Ru => "ru",
            Language::En => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "uz" => Ok(Language::Uz),
            "ru" => Ok(Language::Ru),
            "en" => Ok(Language::En),
            other => Err(format!("unsupported language '{other}' (expected uz, ru or en)")),
        }
    }
}

/// Per-language city names. Any of them may be missing or empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedNames {
    #[serde(default)]
    pub uz: Option<String>,
    #[serde(default)]
    pub ru: Option<String>,
    #[serde(default)]
    pub en: Option<String>,
}

impl LocalizedNames {
    fn get(&self, language: Language) -> Option<&str> {
        let value = match language {
            Language::Uz => self.uz.as_deref(),
            Language::Ru => self.ru.as_deref(),
            Language::En => self.en.as_deref(),
        };
        value.map(str::trim).filter(|s| !s.is_empty())
    }
}

/// City name in either of the two published representations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CityName {
    Plain(String),
    Localized(LocalizedNames),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: PointId,
    pub name: CityName,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(alias = "lat", default, deserialize_with = "de_opt_coordinate")]
    pub latitude: Option<f64>,
    #[serde(alias = "lng", alias = "lon", default, deserialize_with = "de_opt_coordinate")]
    pub longitude: Option<f64>,
}

impl City {
    /// Builds a flat city. Mostly useful for tests and fixtures.
    #[must_use]
    pub fn plain(id: i64, name: &str, coordinates: Option<(f64, f64)>) -> Self {
        Self {
            id: PointId::Number(id),
            name: CityName::Plain(name.to_owned()),
            region: None,
            latitude: coordinates.map(|(lat, _)| lat),
            longitude: coordinates.map(|(_, lng)| lng),
        }
    }

    /// Single display name for the city.
    ///
    /// For localized names the requested language is tried first, then
    /// `en`, `ru`, `uz`. Returns an empty string only when the backend sent
    /// no usable name at all.
    #[must_use]
    pub fn display_name(&self, language: Language) -> &str {
        match &self.name {
            CityName::Plain(name) => name.trim(),
            CityName::Localized(names) => [language, Language::En, Language::Ru, Language::Uz]
                .into_iter()
                .find_map(|lang| names.get(lang))
                .unwrap_or(""),
        }
    }

    /// Every non-empty spelling of the city, without duplicates.
    #[must_use]
    pub fn name_variants(&self) -> Vec<&str> {
        match &self.name {
            CityName::Plain(name) => {
                let name = name.trim();
                if name.is_empty() {
                    Vec::new()
                } else {
                    vec![name]
                }
            }
            CityName::Localized(names) => {
                let mut variants: Vec<&str> = Vec::with_capacity(3);
                for lang in [Language::En, Language::Ru, Language::Uz] {
                    if let Some(name) = names.get(lang) {
                        if !variants.contains(&name) {
                            variants.push(name);
                        }
                    }
                }
                variants
            }
        }
    }

    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

/// Something the user picked as an origin or destination.
///
/// Implemented for bare city names (`str`) and for fetched [`City`] records,
/// which may carry several spellings.
pub trait CitySelection {
    /// Name used in user-facing messages.
    fn label(&self) -> &str;

    /// Spellings tried against the availability index, in order.
    fn spellings(&self) -> Vec<&str> {
        vec![self.label()]
    }
}

impl CitySelection for str {
    fn label(&self) -> &str {
        self.trim()
    }
}

impl CitySelection for String {
    fn label(&self) -> &str {
        self.trim()
    }
}

impl CitySelection for City {
    fn label(&self) -> &str {
        self.display_name(Language::default())
    }

    fn spellings(&self) -> Vec<&str> {
        self.name_variants()
    }
}

/// A [`City`] labelled in a specific display language.
#[derive(Debug, Clone, Copy)]
pub struct LocalizedCity<'a> {
    pub city: &'a City,
    pub language: Language,
}

impl<'a> LocalizedCity<'a> {
    #[must_use]
    pub fn new(city: &'a City, language: Language) -> Self {
        Self { city, language }
    }
}

impl CitySelection for LocalizedCity<'_> {
    fn label(&self) -> &str {
        self.city.display_name(self.language)
    }

    fn spellings(&self) -> Vec<&str> {
        let label = self.label();
        let mut spellings = vec![label];
        spellings.extend(
            self.city
                .name_variants()
                .into_iter()
                .filter(|name| *name != label),
        );
        spellings
    }
}

fn de_null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn de_opt_coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n).filter(|n| n.is_finite())),
        Some(Raw::Text(s)) => Ok(s.trim().parse::<f64>().ok().filter(|n| n.is_finite())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_point_accepts_numeric_and_string_ids() {
        let numeric: ServicePoint =
            serde_json::from_str(r#"{"id": 7, "name": "Chilonzor", "city": "Tashkent"}"#)
                .unwrap();
        assert_eq!(numeric.id, PointId::Number(7));
        assert_eq!(numeric.display_name, "Chilonzor");
        assert_eq!(numeric.city_name, "Tashkent");

        let text: ServicePoint = serde_json::from_str(
            r#"{"id": "wh-7", "title": "Chilonzor", "city_name": "Tashkent"}"#,
        )
        .unwrap();
        assert_eq!(text.id, PointId::Text("wh-7".to_string()));
        assert_eq!(text.id.to_string(), "wh-7");
    }

    #[test]
    fn service_point_without_city_defaults_to_empty() {
        let point: ServicePoint = serde_json::from_str(r#"{"id": 1, "name": "X"}"#).unwrap();
        assert!(point.city_name.is_empty());
    }

    #[test]
    fn service_point_with_null_fields_defaults_to_empty() {
        let point: ServicePoint =
            serde_json::from_str(r#"{"id": 2, "name": null, "city": null}"#).unwrap();
        assert!(point.display_name.is_empty());
        assert!(point.city_name.is_empty());
    }

    #[test]
    fn flat_city_display_name_ignores_language() {
        let city: City = serde_json::from_str(
            r#"{"id": 1, "name": " Samarkand ", "latitude": 39.65, "longitude": 66.96}"#,
        )
        .unwrap();
        assert_eq!(city.display_name(Language::Ru), "Samarkand");
        assert_eq!(city.coordinates(), Some((39.65, 66.96)));
    }

    #[test]
    fn localized_city_prefers_requested_language_then_falls_back() {
        let city: City = serde_json::from_str(
            r#"{"id": 2, "name": {"uz": "Toshkent", "ru": "Ташкент", "en": ""}, "region": "Toshkent"}"#,
        )
        .unwrap();
        assert_eq!(city.display_name(Language::Uz), "Toshkent");
        // en is blank, so the fallback order continues with ru.
        assert_eq!(city.display_name(Language::En), "Ташкент");
        assert_eq!(city.name_variants(), vec!["Ташкент", "Toshkent"]);
        assert_eq!(city.region.as_deref(), Some("Toshkent"));
    }

    #[test]
    fn coordinates_accept_numeric_strings_and_aliases() {
        let city: City =
            serde_json::from_str(r#"{"id": 3, "name": "Bukhara", "lat": "39.77", "lng": "64.42"}"#)
                .unwrap();
        assert_eq!(city.coordinates(), Some((39.77, 64.42)));

        let broken: City =
            serde_json::from_str(r#"{"id": 4, "name": "Nukus", "lat": "n/a", "lng": null}"#)
                .unwrap();
        assert_eq!(broken.coordinates(), None);
    }

    #[test]
    fn localized_city_selection_puts_display_language_first() {
        let city: City = serde_json::from_str(
            r#"{"id": 5, "name": {"uz": "Samarqand", "ru": "Самарканд", "en": "Samarkand"}}"#,
        )
        .unwrap();
        let selection = LocalizedCity::new(&city, Language::Uz);
        assert_eq!(selection.label(), "Samarqand");
        assert_eq!(
            selection.spellings(),
            vec!["Samarqand", "Samarkand", "Самарканд"]
        );
    }

    #[test]
    fn language_parses_case_insensitively() {
        assert_eq!(" UZ ".parse::<Language>().unwrap(), Language::Uz);
        assert!("fr".parse::<Language>().is_err());
    }
}
