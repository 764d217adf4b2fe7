//! Per-person detail projection for renderers.

use crate::model::person::placeholder_avatar_url;
use crate::model::tree::PersonNode;
use serde::Serialize;

/// Text shown for absent values.
pub const MISSING_VALUE: &str = "-";
/// Text shown when a person has no biography.
pub const MISSING_BIO: &str = "Tidak ada biografi.";

/// Living status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeStatus {
    Living,
    Deceased,
}

impl LifeStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Living => "Masih Hidup",
            Self::Deceased => "Alm/Almh",
        }
    }
}

/// Spouse section of the detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpouseDetail {
    pub name: String,
    pub photo_url: String,
}

/// Ready-to-display detail of one person; absent values are `-`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonDetail {
    pub id: String,
    pub name: String,
    pub gender: String,
    pub patronymic: String,
    pub birth_place: String,
    pub birth_year: String,
    pub address: String,
    pub phone: String,
    pub bio: String,
    pub status: LifeStatus,
    /// `"<place>, <year>"`, present only for deceased persons.
    pub death: Option<String>,
    pub photo_url: String,
    pub spouse: Option<SpouseDetail>,
    pub children: usize,
}

impl PersonDetail {
    pub fn from_node(node: &PersonNode) -> Self {
        let record = node.record();
        let or_missing =
            |value: &Option<String>| value.clone().unwrap_or_else(|| MISSING_VALUE.to_string());

        let status = if record.is_deceased() {
            LifeStatus::Deceased
        } else {
            LifeStatus::Living
        };
        let death = record.death_year.as_ref().map(|year| {
            format!(
                "{}, {year}",
                record.death_place.as_deref().unwrap_or(MISSING_VALUE)
            )
        });
        let spouse = node.spouse().map(|spouse| SpouseDetail {
            name: spouse.name.clone(),
            photo_url: spouse
                .photo
                .clone()
                .unwrap_or_else(|| placeholder_avatar_url(Some(spouse.name.as_str()), false)),
        });

        Self {
            id: node.id().to_string(),
            name: record.titled_name(),
            gender: or_missing(&record.gender),
            patronymic: or_missing(&record.patronymic),
            birth_place: or_missing(&record.birth_place),
            birth_year: or_missing(&record.birth_year),
            address: or_missing(&record.address),
            phone: or_missing(&record.phone),
            bio: record
                .bio
                .clone()
                .unwrap_or_else(|| MISSING_BIO.to_string()),
            status,
            death,
            photo_url: record
                .photo
                .clone()
                .unwrap_or_else(|| record.placeholder_avatar_url()),
            spouse,
            children: node.children().len(),
        }
    }
}
