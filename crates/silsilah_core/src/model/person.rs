//! Person record model.
//!
//! # Responsibility
//! - Define the flat row shape delivered by data sources.
//! - Normalize loosely typed sheet cells into optional text exactly once.
//!
//! # Invariants
//! - Optional text fields are trimmed and never hold blank or `-` values.
//! - `id` is stored trimmed; blank ids are rejected by the resolver.
//! - Unknown wire fields are ignored.

use reqwest::Url;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Literal cell value used by the source sheet to mean "no value".
pub const ABSENT_SENTINEL: &str = "-";

const MALE_GENDER: &str = "Laki-Laki";
const AVATAR_ENDPOINT: &str = "https://ui-avatars.com/api/";
const AVATAR_MALE_BG: &str = "0D8ABC";
const AVATAR_FEMALE_BG: &str = "E91E63";

/// One flat person row as read from a data source.
///
/// Wire names follow the source sheet columns (`nama`, `bin`, `orang_tua`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    /// Source identifier, compared as text.
    #[serde(default, deserialize_with = "required_text")]
    pub id: String,
    #[serde(
        rename = "nama",
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Free-text patronymic; legacy rows embed the parent id here.
    #[serde(
        rename = "bin",
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub patronymic: Option<String>,
    /// Structured parent id (newer sheet exports).
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Parent reference holding either an id or a name.
    #[serde(
        rename = "orang_tua",
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_ref: Option<String>,
    /// Alternate spelling of `orang_tua` found in older sheets.
    #[serde(
        rename = "orangtua",
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_ref_alt: Option<String>,
    #[serde(
        rename = "tahun_lahir",
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub birth_year: Option<String>,
    #[serde(
        rename = "tahun_wafat",
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub death_year: Option<String>,
    #[serde(
        rename = "tempat_lahir",
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub birth_place: Option<String>,
    #[serde(
        rename = "tempat_wafat",
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub death_place: Option<String>,
    #[serde(
        rename = "alamat",
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub address: Option<String>,
    #[serde(
        rename = "no_hp",
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub phone: Option<String>,
    #[serde(
        rename = "foto",
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub photo: Option<String>,
    #[serde(
        rename = "pasangan",
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub spouse_name: Option<String>,
    #[serde(
        rename = "foto_pasangan",
        default,
        deserialize_with = "optional_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub spouse_photo: Option<String>,
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl PersonRecord {
    /// Creates a record with only `id` and `name` populated.
    ///
    /// Both values go through the same normalization as deserialized rows.
    pub fn new(id: impl Into<String>, name: impl AsRef<str>) -> Self {
        Self {
            id: id.into().trim().to_string(),
            name: normalize_owned(name.as_ref()),
            ..Self::default()
        }
    }

    pub fn with_parent_id(mut self, value: impl AsRef<str>) -> Self {
        self.parent_id = normalize_owned(value.as_ref());
        self
    }

    pub fn with_parent_ref(mut self, value: impl AsRef<str>) -> Self {
        self.parent_ref = normalize_owned(value.as_ref());
        self
    }

    pub fn with_patronymic(mut self, value: impl AsRef<str>) -> Self {
        self.patronymic = normalize_owned(value.as_ref());
        self
    }

    pub fn with_gender(mut self, value: impl AsRef<str>) -> Self {
        self.gender = normalize_owned(value.as_ref());
        self
    }

    pub fn with_death_year(mut self, value: impl AsRef<str>) -> Self {
        self.death_year = normalize_owned(value.as_ref());
        self
    }

    pub fn with_spouse(mut self, name: impl AsRef<str>, photo: Option<&str>) -> Self {
        self.spouse_name = normalize_owned(name.as_ref());
        self.spouse_photo = photo.and_then(normalize_owned);
        self
    }

    /// Returns a copy with every field run through the absent-value rules.
    ///
    /// Deserialized rows are already normalized; this covers rows assembled
    /// field by field.
    pub fn normalized(&self) -> Self {
        let text = |value: &Option<String>| value.as_deref().and_then(normalize_owned);
        Self {
            id: self.id.trim().to_string(),
            name: text(&self.name),
            gender: text(&self.gender),
            patronymic: text(&self.patronymic),
            parent_id: text(&self.parent_id),
            parent_ref: text(&self.parent_ref),
            parent_ref_alt: text(&self.parent_ref_alt),
            birth_year: text(&self.birth_year),
            death_year: text(&self.death_year),
            birth_place: text(&self.birth_place),
            death_place: text(&self.death_place),
            address: text(&self.address),
            phone: text(&self.phone),
            photo: text(&self.photo),
            spouse_name: text(&self.spouse_name),
            spouse_photo: text(&self.spouse_photo),
            bio: text(&self.bio),
        }
    }

    /// Name, or an empty string when the row has none.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Whether the sheet is tagged exactly `Laki-Laki`; any other value counts as female.
    pub fn is_male(&self) -> bool {
        self.gender.as_deref() == Some(MALE_GENDER)
    }

    /// A person counts as deceased once a death year is recorded.
    pub fn is_deceased(&self) -> bool {
        self.death_year.is_some()
    }

    /// Name with the honorific `Alm.`/`Almh.` prefix for deceased persons.
    ///
    /// Names that already carry either honorific are returned untouched.
    pub fn titled_name(&self) -> String {
        let name = self.display_name();
        if !self.is_deceased() {
            return name.to_string();
        }
        let lower = name.to_lowercase();
        if lower.contains("alm.") || lower.contains("almh.") {
            return name.to_string();
        }
        let prefix = if self.is_male() { "Alm. " } else { "Almh. " };
        format!("{prefix}{name}")
    }

    /// Generated avatar used when the row has no photo.
    pub fn placeholder_avatar_url(&self) -> String {
        placeholder_avatar_url(self.name.as_deref(), self.is_male())
    }
}

/// Builds a ui-avatars URL with initials derived from `name`.
pub fn placeholder_avatar_url(name: Option<&str>, male: bool) -> String {
    let label = name.filter(|value| !value.is_empty()).unwrap_or("User");
    let background = if male {
        AVATAR_MALE_BG
    } else {
        AVATAR_FEMALE_BG
    };
    let params = [
        ("name", label),
        ("background", background),
        ("color", "fff"),
        ("size", "200"),
    ];
    match Url::parse_with_params(AVATAR_ENDPOINT, params) {
        Ok(url) => url.into(),
        Err(_) => AVATAR_ENDPOINT.to_string(),
    }
}

/// Returns the trimmed value, or `None` for blank input and the absent sentinel.
pub fn normalize_text(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == ABSENT_SENTINEL {
        None
    } else {
        Some(trimmed)
    }
}

fn normalize_owned(value: &str) -> Option<String> {
    normalize_text(value).map(str::to_string)
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = deserializer.deserialize_any(LooseTextVisitor)?;
    Ok(raw.as_deref().and_then(normalize_owned))
}

fn required_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = deserializer.deserialize_any(LooseTextVisitor)?;
    Ok(raw.map(|value| value.trim().to_string()).unwrap_or_default())
}

/// Accepts the scalar shapes spreadsheet exports produce for a text cell.
struct LooseTextVisitor;

impl<'de> Visitor<'de> for LooseTextVisitor {
    type Value = Option<String>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number, boolean or null")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(Some(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
        Ok(Some(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(Some(value.to_string()))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(Some(value.to_string()))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        // Sheets hand integral cells back as floats; `1.0` must compare equal to id "1".
        if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
            Ok(Some(format!("{}", value as i64)))
        } else {
            Ok(Some(value.to_string()))
        }
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
        Ok(Some(value.to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_text, PersonRecord};

    #[test]
    fn normalize_text_maps_sentinels_to_none() {
        assert_eq!(normalize_text(""), None);
        assert_eq!(normalize_text("   "), None);
        assert_eq!(normalize_text("-"), None);
        assert_eq!(normalize_text(" - "), None);
        assert_eq!(normalize_text(" Malang "), Some("Malang"));
        assert_eq!(normalize_text("--"), Some("--"));
    }

    #[test]
    fn numeric_cells_become_text() {
        let record: PersonRecord = serde_json::from_value(serde_json::json!({
            "id": 7,
            "nama": "Ali",
            "orang_tua": 2.0,
            "tahun_lahir": 1950,
            "no_hp": null
        }))
        .unwrap();

        assert_eq!(record.id, "7");
        assert_eq!(record.parent_ref.as_deref(), Some("2"));
        assert_eq!(record.birth_year.as_deref(), Some("1950"));
        assert_eq!(record.phone, None);
    }

    #[test]
    fn missing_id_deserializes_as_blank() {
        let record: PersonRecord =
            serde_json::from_value(serde_json::json!({ "nama": "Tanpa Id" })).unwrap();
        assert!(record.id.is_empty());
    }

    #[test]
    fn titled_name_respects_existing_honorific() {
        let male = PersonRecord::new("1", "Kyai Munajad")
            .with_gender("Laki-Laki")
            .with_death_year("1978");
        assert_eq!(male.titled_name(), "Alm. Kyai Munajad");

        let female = PersonRecord::new("2", "Siti").with_death_year("1995");
        assert_eq!(female.titled_name(), "Almh. Siti");

        let already = PersonRecord::new("3", "Almh. Siti").with_death_year("1995");
        assert_eq!(already.titled_name(), "Almh. Siti");

        let living = PersonRecord::new("4", "Ali").with_death_year("-");
        assert_eq!(living.titled_name(), "Ali");
    }

    #[test]
    fn placeholder_avatar_encodes_name_and_gender_colour() {
        let url = PersonRecord::new("1", "Siti Muhajat").placeholder_avatar_url();
        assert!(url.starts_with("https://ui-avatars.com/api/?name=Siti"));
        assert!(url.contains("background=E91E63"));

        let url = PersonRecord::new("2", "").with_gender("Laki-Laki").placeholder_avatar_url();
        assert!(url.contains("name=User"));
        assert!(url.contains("background=0D8ABC"));
    }

    #[test]
    fn male_tag_must_match_sheet_value_exactly() {
        assert!(PersonRecord::new("1", "Ali").with_gender("Laki-Laki").is_male());
        assert!(!PersonRecord::new("2", "Ali").with_gender("laki-laki").is_male());
        assert!(!PersonRecord::new("3", "Ali").with_gender("Pria").is_male());
        assert!(!PersonRecord::new("4", "Ali").is_male());

        let lowercase = PersonRecord::new("5", "Ali")
            .with_gender("laki-laki")
            .with_death_year("2001");
        assert_eq!(lowercase.titled_name(), "Almh. Ali");
    }
}
