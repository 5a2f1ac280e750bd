use causal_sim::data::unit_record_schema;
use causal_sim::{DataTable, read_population, write_population};
use parquet::file::reader::{FileReader, SerializedFileReader};

use crate::utils::{population, scratch_dir};

#[test]
fn test_population_round_trip() {
    let dir = scratch_dir("parquet");
    let path = dir.join("population.parquet");
    let original = population(150, 4, 77);

    write_population(&path, &original).unwrap();
    let restored = read_population(&path).unwrap();

    assert_eq!(restored.len(), 4);
    assert_eq!(restored.units_per_replicate(), 150);
    assert_eq!(restored, original);
    for (a, b) in original.replicates().iter().zip(restored.replicates()) {
        assert_eq!(a.id(), b.id());
        assert_eq!(a.column("Z1").unwrap(), b.column("Z1").unwrap());
        assert_eq!(a.outcome(), b.outcome());
    }

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_file_layout() {
    let dir = scratch_dir("parquet_layout");
    let path = dir.join("population.parquet");
    write_population(&path, &population(40, 3, 5)).unwrap();

    let reader = SerializedFileReader::new(std::fs::File::open(&path).unwrap()).unwrap();
    let metadata = reader.metadata().file_metadata();
    assert_eq!(metadata.num_rows(), 120);

    let names: Vec<String> = metadata
        .schema_descr()
        .columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect();
    let expected: Vec<String> = unit_record_schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    assert_eq!(names, expected);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = scratch_dir("parquet_missing");
    assert!(read_population(&dir.join("absent.parquet")).is_err());
    std::fs::remove_dir_all(&dir).unwrap();
}
