use std::cell::RefCell;

use assert_matches::assert_matches;

use kira_kb_collector::app::{App, NullSink};
use kira_kb_collector::client::SparqlClient;
use kira_kb_collector::config::{Config, ConfigLoader, Endpoints};
use kira_kb_collector::domain::{Dataset, OutputFormat};
use kira_kb_collector::error::KiraError;
use kira_kb_collector::output::load_csv;
use kira_kb_collector::sparql::{Pattern, SelectQuery};
use kira_kb_collector::table::Table;

const UNIPROT: &str = "http://uniprot.test/sparql";
const RHEA: &str = "http://rhea.test/sparql";

/// Answers UniProt queries with two proteins and Rhea queries with two
/// participants per requested reaction.
#[derive(Default)]
struct FakeEndpoints {
    calls: RefCell<Vec<String>>,
    fail_rhea: bool,
}

impl FakeEndpoints {
    fn uniprot_cell(column: &str, row: usize) -> String {
        let proteins = ["P08684", "Q64459"];
        let reactions = ["10000", "10004"];
        match column {
            "protein" => format!("http://purl.uniprot.org/uniprot/{}", proteins[row]),
            "pfam" => "http://purl.uniprot.org/pfam/PF00067".to_string(),
            "reaction" => format!("http://rdf.rhea-db.org/{}", reactions[row]),
            other => format!("{other}-{row}"),
        }
    }

    fn rhea_rows(query: &SelectQuery) -> Vec<Vec<String>> {
        let reactions = query
            .patterns()
            .iter()
            .find_map(|pattern| match pattern {
                Pattern::Values { variable, terms } if variable == "reaction" => Some(terms),
                _ => None,
            })
            .cloned()
            .unwrap_or_default();
        let mut rows = Vec::new();
        for term in reactions {
            let id = term.trim_start_matches("rh:");
            for (side, chebi) in [("L", "15377"), ("R", "16526")] {
                rows.push(
                    query
                        .variables()
                        .iter()
                        .map(|column| match column.as_str() {
                            "reaction" => format!("http://rdf.rhea-db.org/{id}"),
                            "reaction_side" => format!("http://rdf.rhea-db.org/{id}_{side}"),
                            "reaction_side_order" => format!("[{side}]"),
                            "chebi" => format!("http://purl.obolibrary.org/obo/CHEBI_{chebi}"),
                            "smiles" => "O".to_string(),
                            other => other.to_string(),
                        })
                        .collect(),
                );
            }
        }
        rows
    }
}

impl SparqlClient for FakeEndpoints {
    fn select(&self, endpoint: &str, query: &SelectQuery) -> Result<Table, KiraError> {
        self.calls.borrow_mut().push(endpoint.to_string());
        let columns = query.variables().to_vec();
        let rows = match endpoint {
            UNIPROT => (0..2)
                .map(|row| {
                    columns
                        .iter()
                        .map(|column| Self::uniprot_cell(column, row))
                        .collect()
                })
                .collect(),
            RHEA if self.fail_rhea => {
                return Err(KiraError::SparqlStatus {
                    status: 503,
                    message: "unavailable".to_string(),
                });
            }
            RHEA => Self::rhea_rows(query),
            other => return Err(KiraError::SparqlHttp(format!("unexpected endpoint {other}"))),
        };
        Table::with_rows(columns, rows)
    }
}

fn app(client: FakeEndpoints, output_dir: &std::path::Path, batch_size: usize) -> App<FakeEndpoints> {
    let config = ConfigLoader::resolve_config(Config {
        batch_size: Some(batch_size),
        output_dir: Some(output_dir.to_str().unwrap().to_string()),
        endpoints: Endpoints {
            uniprot: Some(UNIPROT.to_string()),
            rhea: Some(RHEA.to_string()),
        },
        ..Config::default()
    })
    .unwrap();
    App::new(client, config)
}

#[test]
fn pfams_are_reduced_to_accessions() {
    let temp = tempfile::tempdir().unwrap();
    let app = app(FakeEndpoints::default(), temp.path(), 20);

    let table = app.collect(Dataset::Pfams, &NullSink).unwrap();

    assert_eq!(table.index(), Some("protein"));
    assert_eq!(table.column("protein").unwrap(), ["P08684", "Q64459"]);
    assert_eq!(table.column("pfam").unwrap(), ["PF00067", "PF00067"]);
}

#[test]
fn reactions_are_batched_and_joined() {
    let temp = tempfile::tempdir().unwrap();
    let app = app(FakeEndpoints::default(), temp.path(), 1);

    let table = app.collect(Dataset::Reactions, &NullSink).unwrap();

    // one UniProt query, then one Rhea query per reaction with batch size 1
    let calls = app_calls(&app);
    assert_eq!(calls, vec![UNIPROT, RHEA, RHEA]);

    assert_eq!(
        table.columns(),
        [
            "protein",
            "reaction",
            "reaction_side",
            "reaction_side_order",
            "chebi",
            "smiles"
        ]
    );
    assert_eq!(table.len(), 4);
    assert_eq!(
        table.rows()[0],
        [
            "P08684",
            "10000",
            "http://rdf.rhea-db.org/10000_L",
            "L",
            "CHEBI_15377",
            "O"
        ]
    );
    assert_eq!(table.rows()[3][1], "10004");
    assert_eq!(table.rows()[3][4], "CHEBI_16526");
}

#[test]
fn full_run_writes_every_dataset() {
    let temp = tempfile::tempdir().unwrap();
    let app = app(FakeEndpoints::default(), temp.path(), 20);

    let result = app.run(&Dataset::ALL, OutputFormat::Csv, &NullSink).unwrap();

    assert_eq!(result.items.len(), 5);
    for name in [
        "taxaNAT.csv",
        "namesNAT.csv",
        "pfams.csv",
        "sequencesNAT.csv",
        "reaction_dataNAT.csv",
    ] {
        assert!(temp.path().join(name).exists(), "{name} missing");
    }
    let taxa = load_csv(&temp.path().join("taxaNAT.csv")).unwrap();
    assert_eq!(
        taxa.columns(),
        ["protein", "organism", "kingdom", "superkingdom"]
    );
}

#[test]
fn rhea_failure_aborts_the_run() {
    let temp = tempfile::tempdir().unwrap();
    let client = FakeEndpoints {
        fail_rhea: true,
        ..FakeEndpoints::default()
    };
    let app = app(client, temp.path(), 20);

    let err = app
        .run(&[Dataset::Reactions, Dataset::Taxa], OutputFormat::Csv, &NullSink)
        .unwrap_err();

    assert_matches!(err, KiraError::SparqlStatus { status: 503, .. });
    assert!(!temp.path().join("reaction_dataNAT.csv").exists());
    assert!(!temp.path().join("taxaNAT.csv").exists());
}

fn app_calls(app: &App<FakeEndpoints>) -> Vec<String> {
    app.client().calls.borrow().clone()
}
