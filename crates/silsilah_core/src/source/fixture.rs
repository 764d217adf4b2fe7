//! Embedded demo dataset used when no source is reachable.

use super::{DataAcquisitionError, DataSource};
use crate::model::person::PersonRecord;
use async_trait::async_trait;

/// Source id reported for fixture loads.
pub const FIXTURE_SOURCE_ID: &str = "fixture";

/// Always-available three-row dataset.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureSource;

#[async_trait]
impl DataSource for FixtureSource {
    fn source_id(&self) -> &str {
        FIXTURE_SOURCE_ID
    }

    async fn fetch_records(&self) -> Result<Vec<PersonRecord>, DataAcquisitionError> {
        Ok(fixture_records())
    }
}

/// Founding ancestor and two children.
pub fn fixture_records() -> Vec<PersonRecord> {
    let mut founder = PersonRecord::new("1", "Kyai Munajad")
        .with_gender("Laki-Laki")
        .with_parent_ref("-")
        .with_patronymic("-")
        .with_death_year("1978")
        .with_spouse("Nyai Munajad", None);
    founder.address = Some("Malang".to_string());
    founder.birth_year = Some("1900".to_string());
    founder.birth_place = Some("Malang".to_string());
    founder.death_place = Some("Malang".to_string());
    founder.bio = Some("Leluhur utama keluarga besar Bani Munajad.".to_string());

    let mut eldest = PersonRecord::new("2", "Siti Muhajat")
        .with_gender("Perempuan")
        .with_parent_ref("1")
        .with_patronymic("Alm. Kyai Munajad")
        .with_death_year("1995");
    eldest.birth_year = Some("1925".to_string());
    eldest.birth_place = Some("Malang".to_string());
    eldest.death_place = Some("Malang".to_string());
    eldest.bio = Some("Putri tertua dari Kyai Munajad.".to_string());

    let mut second = PersonRecord::new("3", "Suharah")
        .with_gender("Laki-Laki")
        .with_parent_ref("1")
        .with_patronymic("Alm. Kyai Munajad")
        .with_death_year("1998");
    second.address = Some("Kasikon".to_string());
    second.birth_year = Some("1928".to_string());
    second.birth_place = Some("Malang".to_string());
    second.death_place = Some("Malang".to_string());
    second.bio = Some("Anak kedua, tinggal di area Kasikon.".to_string());

    vec![founder, eldest, second]
}
