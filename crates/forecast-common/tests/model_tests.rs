//! Integration tests for model identifiers and initialization times.

use forecast_common::{parse_initialization_time, time_stem, ModelId, ModelVariant};

// ============================================================================
// Directory layout
// ============================================================================

#[test]
fn test_distinct_identifiers_get_distinct_directories() {
    let ids = [
        "WeatherMesh",
        "WeatherMesh:deterministic",
        "WeatherMesh:ens:mean",
        "WeatherMesh:intracycle",
    ];

    let mut dirs: Vec<String> = ids
        .iter()
        .map(|id| ModelId::parse(id).unwrap().directory_name())
        .collect();
    dirs.sort();
    dirs.dedup();

    assert_eq!(dirs.len(), ids.len());
}

#[test]
fn test_directory_name_is_stable() {
    let a = ModelId::parse("WeatherMesh:ens:mean").unwrap();
    let b = ModelId::parse("WeatherMesh:ens:mean").unwrap();
    assert_eq!(a, b);
    assert_eq!(a.directory_name(), b.directory_name());
}

#[test]
fn test_directory_name_never_contains_separators() {
    for id in ["WeatherMesh", "WeatherMesh:ens:p10", "Other:x:y:z"] {
        let dir = ModelId::parse(id).unwrap().directory_name();
        assert!(!dir.contains(':'));
        assert!(!dir.contains('/'));
    }
}

// ============================================================================
// Variants
// ============================================================================

#[test]
fn test_ensemble_member_other_than_mean() {
    let model = ModelId::parse("WeatherMesh:ens:p03").unwrap();
    assert_eq!(model.variant(), &ModelVariant::Ensemble("p03".to_string()));
}

#[test]
fn test_variant_applies_to_any_base_model() {
    let model = ModelId::parse("Aurora:intracycle").unwrap();
    assert_eq!(model.base(), "Aurora");
    assert_eq!(model.variant(), &ModelVariant::Intracycle);
}

// ============================================================================
// Times
// ============================================================================

#[test]
fn test_equivalent_times_share_a_stem() {
    let utc = parse_initialization_time("2025-05-18T12:00:00Z").unwrap();
    let offset = parse_initialization_time("2025-05-18T07:00:00-05:00").unwrap();
    assert_eq!(time_stem(utc), time_stem(offset));
    assert_eq!(time_stem(utc), "2025051812");
}

#[test]
fn test_folded_identifier_cannot_alias_a_variant() {
    let intracycle = ModelId::parse("WeatherMesh:intracycle").unwrap();
    assert_eq!(intracycle.directory_name(), "WeatherMesh_intracycle");

    // The folded spelling would otherwise land in the intracycle directory.
    assert!(ModelId::parse("WeatherMesh_intracycle").is_err());
    assert!(ModelId::parse("WeatherMesh:ens_mean").is_err());
}
