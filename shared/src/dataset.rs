//! Bundled reference soil samples
//!
//! Georeferenced samples from Kakamega and Siaya counties, used when no
//! sample database is configured.

use thiserror::Error;

use crate::models::SampleRecord;

const BUNDLED_SAMPLES_CSV: &str = include_str!("../data/soil_samples.csv");

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("invalid sample row {row}: {source}")]
    InvalidRow {
        row: usize,
        #[source]
        source: csv::Error,
    },
}

/// Parse sample records from CSV with a `latitude,longitude,ph,n,p,k` header.
/// Empty cells become `None`.
pub fn parse_samples_csv(data: &str) -> Result<Vec<SampleRecord>, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data.as_bytes());

    reader
        .deserialize::<SampleRecord>()
        .enumerate()
        .map(|(i, row)| row.map_err(|source| DatasetError::InvalidRow { row: i + 1, source }))
        .collect()
}

/// The samples shipped with the crate
pub fn bundled_samples() -> Result<Vec<SampleRecord>, DatasetError> {
    parse_samples_csv(BUNDLED_SAMPLES_CSV)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_samples_parse() {
        let samples = bundled_samples().unwrap();
        assert_eq!(samples.len(), 26);
        assert!(samples.iter().all(|s| s.coordinates().is_some()));
    }

    #[test]
    fn test_empty_cells_are_none() {
        let samples = parse_samples_csv("latitude,longitude,ph,n,p,k\n0.1,34.2,,5,,7\n").unwrap();
        assert_eq!(samples[0].ph, None);
        assert_eq!(samples[0].nitrogen, Some(5.0));
        assert_eq!(samples[0].reading().phosphorus, 0.0);
    }

    #[test]
    fn test_bad_row_reports_position() {
        let csv = "latitude,longitude,ph,n,p,k\n0.1,34.2,6,5,4,7\nx,34.2,6,5,4,7\n";
        let err = parse_samples_csv(csv).unwrap_err();
        assert!(matches!(err, DatasetError::InvalidRow { row: 2, .. }));
    }
}
