use assert_matches::assert_matches;

use kira_kb_collector::config::ConfigLoader;
use kira_kb_collector::domain::Repository;
use kira_kb_collector::error::KiraError;

#[test]
fn resolve_from_file_applies_overrides() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("kira-kb.json");
    std::fs::write(
        &path,
        r#"{
            "pfams": ["PF00067", "pf00106"],
            "batch_size": 5,
            "timeout_secs": 90,
            "endpoints": { "rhea": "http://localhost:8890/sparql" }
        }"#,
    )
    .unwrap();

    let resolved = ConfigLoader::resolve(path.to_str()).unwrap();
    assert_eq!(resolved.schema_version, 1);
    assert_eq!(
        resolved
            .pfams
            .iter()
            .map(|id| id.as_str())
            .collect::<Vec<_>>(),
        ["PF00067", "PF00106"]
    );
    assert_eq!(resolved.batch_size, 5);
    assert_eq!(resolved.timeout.map(|t| t.as_secs()), Some(90));
    assert_eq!(
        resolved.endpoint(Repository::Rhea),
        "http://localhost:8890/sparql"
    );
    assert_eq!(
        resolved.endpoint(Repository::Uniprot),
        "https://sparql.uniprot.org/sparql"
    );
}

#[test]
fn explicit_missing_file_is_an_error() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("absent.json");
    assert_matches!(
        ConfigLoader::resolve(path.to_str()),
        Err(KiraError::ConfigRead(_))
    );
}

#[test]
fn invalid_values_are_rejected() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("bad.json");

    std::fs::write(&path, r#"{ "pfams": ["PFXXXXX"] }"#).unwrap();
    assert_matches!(
        ConfigLoader::resolve(path.to_str()),
        Err(KiraError::InvalidPfamId(_))
    );

    std::fs::write(&path, r#"{ "batch_size": 0 }"#).unwrap();
    assert_matches!(
        ConfigLoader::resolve(path.to_str()),
        Err(KiraError::InvalidBatchSize(0))
    );

    std::fs::write(&path, "{ not json").unwrap();
    assert_matches!(
        ConfigLoader::resolve(path.to_str()),
        Err(KiraError::ConfigParse(_))
    );
}
