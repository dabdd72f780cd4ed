use std::time::{Duration, Instant};

use serde::Serialize;

use crate::batch::batched;
use crate::client::SparqlClient;
use crate::config::ResolvedConfig;
use crate::domain::{Dataset, OutputFormat, Repository, RheaId};
use crate::error::KiraError;
use crate::output;
use crate::rhea::{self, RheaQueryBuilder, RheaSearchConfig, RheaSearchFilter, RheaSelection};
use crate::sparql::{FeatureClauses, SelectQuery, build_query};
use crate::table::Table;
use crate::transform::{as_text, first_element, last_path_segment};
use crate::uniprot::{
    self, UniprotQueryBuilder, UniprotSearchConfig, UniprotSearchFilter, UniprotSelection,
};

const RHEA_FEATURES: [rhea::Feature; 4] = [
    rhea::Feature::Reaction,
    rhea::Feature::ReactionSide,
    rhea::Feature::Chebi,
    rhea::Feature::Smiles,
];

#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub started_at: String,
    pub items: Vec<DatasetResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetResult {
    pub dataset: Dataset,
    pub path: String,
    pub rows: usize,
    pub columns: Vec<String>,
    pub elapsed_ms: u128,
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
    pub elapsed: Option<Duration>,
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

pub struct LogSink;

impl ProgressSink for LogSink {
    fn event(&self, event: ProgressEvent) {
        match event.elapsed {
            Some(elapsed) => {
                tracing::info!(elapsed_ms = saturating_millis(elapsed), "{}", event.message)
            }
            None => tracing::info!("{}", event.message),
        }
    }
}

fn saturating_millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

pub struct NullSink;

impl ProgressSink for NullSink {
    fn event(&self, _event: ProgressEvent) {}
}

pub struct App<C: SparqlClient> {
    client: C,
    config: ResolvedConfig,
}

impl<C: SparqlClient> App<C> {
    pub fn new(client: C, config: ResolvedConfig) -> Self {
        Self { client, config }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    // The first failure aborts the remaining datasets.
    pub fn run(
        &self,
        datasets: &[Dataset],
        format: OutputFormat,
        sink: &dyn ProgressSink,
    ) -> Result<RunResult, KiraError> {
        let started_at = chrono::Utc::now().to_rfc3339();
        let mut items = Vec::with_capacity(datasets.len());
        for dataset in datasets {
            let start = Instant::now();
            sink.event(ProgressEvent {
                message: format!("phase=Resolve; fetching {dataset}"),
                elapsed: None,
            });
            let table = self.collect(*dataset, sink)?;

            let path = self.config.output_dir.join(dataset.file_name(format));
            sink.event(ProgressEvent {
                message: format!("phase=Store; writing {path}"),
                elapsed: None,
            });
            output::save(&table, path.as_std_path())?;

            let elapsed = start.elapsed();
            sink.event(ProgressEvent {
                message: format!("phase=Done; {dataset} rows={}", table.len()),
                elapsed: Some(elapsed),
            });
            items.push(DatasetResult {
                dataset: *dataset,
                path: path.to_string(),
                rows: table.len(),
                columns: table.columns().to_vec(),
                elapsed_ms: elapsed.as_millis(),
            });
        }
        Ok(RunResult { started_at, items })
    }

    pub fn collect(&self, dataset: Dataset, sink: &dyn ProgressSink) -> Result<Table, KiraError> {
        match dataset {
            Dataset::Taxa | Dataset::Names | Dataset::Sequences => {
                self.get_uniprot(uniprot_features(dataset), sink)
            }
            Dataset::Pfams => {
                let mut pfams = self.get_uniprot(uniprot_features(dataset), sink)?;
                pfams.map_column("pfam", last_path_segment)?;
                Ok(pfams)
            }
            Dataset::Reactions => self.collect_reactions(sink),
        }
    }

    pub fn preview(&self, dataset: Dataset) -> SelectQuery {
        build_query::<UniprotQueryBuilder>(&self.uniprot_config(uniprot_features(dataset)))
    }

    pub fn uniprot_config(&self, features: Vec<uniprot::Feature>) -> UniprotSearchConfig {
        let mut selection = vec![uniprot::Feature::Protein];
        selection.extend(features);
        UniprotSearchConfig::new(
            UniprotSelection::new(selection),
            UniprotSearchFilter::Pfams(self.config.pfams.clone()),
        )
    }

    pub fn rhea_configs(&self, reactions: Vec<RheaId>) -> Result<Vec<RheaSearchConfig>, KiraError> {
        Ok(batched(reactions, self.config.batch_size)?
            .map(|group| {
                RheaSearchConfig::new(
                    RheaSelection::new(RHEA_FEATURES.to_vec()),
                    RheaSearchFilter::Reactions(group),
                )
            })
            .collect())
    }

    pub fn get_uniprot(
        &self,
        features: Vec<uniprot::Feature>,
        sink: &dyn ProgressSink,
    ) -> Result<Table, KiraError> {
        let query = build_query::<UniprotQueryBuilder>(&self.uniprot_config(features));
        let mut table = self.select(Repository::Uniprot, &query, sink)?;
        table.map_column("protein", last_path_segment)?;
        table.set_index("protein")?;
        Ok(table)
    }

    fn collect_reactions(&self, sink: &dyn ProgressSink) -> Result<Table, KiraError> {
        let mut proteins = self.get_uniprot(vec![uniprot::Feature::Reaction], sink)?;
        proteins.map_column("reaction", |cell| as_text(&last_path_segment(cell)?))?;

        let reactions = proteins
            .unique("reaction")?
            .iter()
            .map(|id| id.parse())
            .collect::<Result<Vec<RheaId>, _>>()?;
        sink.event(ProgressEvent {
            message: format!("phase=Resolve; {} distinct reactions", reactions.len()),
            elapsed: None,
        });

        let rhea_data = self.fetch_rhea(reactions, sink)?;
        sink.event(ProgressEvent {
            message: "phase=Transform; joining proteins with reactions".to_string(),
            elapsed: None,
        });
        proteins.join(&rhea_data, "reaction")
    }

    pub fn fetch_rhea(
        &self,
        reactions: Vec<RheaId>,
        sink: &dyn ProgressSink,
    ) -> Result<Table, KiraError> {
        let configs = self.rhea_configs(reactions)?;
        let total = configs.len();
        let mut tables = Vec::with_capacity(total);
        for (idx, config) in configs.iter().enumerate() {
            sink.event(ProgressEvent {
                message: format!("phase=Fetch; rhea batch {}/{total}", idx + 1),
                elapsed: None,
            });
            let query = build_query::<RheaQueryBuilder>(config);
            tables.push(self.select(Repository::Rhea, &query, sink)?);
        }

        let mut rhea_data = if tables.is_empty() {
            Table::new(
                RHEA_FEATURES
                    .iter()
                    .flat_map(|feature| feature.columns())
                    .map(|column| column.to_string())
                    .collect(),
            )
        } else {
            Table::concat(tables)?
        };
        rhea_data.map_column("reaction", |cell| as_text(&last_path_segment(cell)?))?;
        rhea_data.map_column("chebi", last_path_segment)?;
        rhea_data.map_column("reaction_side_order", first_element)?;
        rhea_data.set_index("reaction")?;
        Ok(rhea_data)
    }

    fn select(
        &self,
        repository: Repository,
        query: &SelectQuery,
        sink: &dyn ProgressSink,
    ) -> Result<Table, KiraError> {
        sink.event(ProgressEvent {
            message: format!("sparql.request repository={repository}"),
            elapsed: None,
        });
        let start = Instant::now();
        let table = self
            .client
            .select(self.config.endpoint(repository), query)?;
        let latency = start.elapsed();
        sink.event(ProgressEvent {
            message: format!(
                "sparql.response repository={repository} rows={} latency_ms={}",
                table.len(),
                latency.as_millis()
            ),
            elapsed: Some(latency),
        });
        Ok(table)
    }
}

fn uniprot_features(dataset: Dataset) -> Vec<uniprot::Feature> {
    match dataset {
        Dataset::Taxa => vec![
            uniprot::Feature::Organism,
            uniprot::Feature::Kingdom,
            uniprot::Feature::Superkingdom,
        ],
        Dataset::Names => vec![uniprot::Feature::Name, uniprot::Feature::SubmittedName],
        Dataset::Pfams => vec![uniprot::Feature::Pfam],
        Dataset::Sequences => vec![uniprot::Feature::Sequence],
        Dataset::Reactions => vec![uniprot::Feature::Reaction],
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::config::{Config, ConfigLoader};

    struct RecordingClient {
        calls: RefCell<Vec<(String, SelectQuery)>>,
    }

    impl SparqlClient for RecordingClient {
        fn select(&self, endpoint: &str, query: &SelectQuery) -> Result<Table, KiraError> {
            self.calls
                .borrow_mut()
                .push((endpoint.to_string(), query.clone()));
            Ok(Table::new(
                query.variables().iter().map(|v| v.to_string()).collect(),
            ))
        }
    }

    fn app(batch_size: usize) -> App<RecordingClient> {
        let config = ConfigLoader::resolve_config(Config {
            batch_size: Some(batch_size),
            ..Config::default()
        })
        .unwrap();
        App::new(
            RecordingClient {
                calls: RefCell::new(Vec::new()),
            },
            config,
        )
    }

    #[test]
    fn rhea_configs_follow_batch_size() {
        let app = app(20);
        let ids = (0..45)
            .map(|n| (10000 + n).to_string().parse().unwrap())
            .collect::<Vec<RheaId>>();
        let sizes = app
            .rhea_configs(ids)
            .unwrap()
            .iter()
            .map(|config| match config.filter() {
                RheaSearchFilter::Reactions(ids) => ids.len(),
            })
            .collect::<Vec<_>>();
        assert_eq!(sizes, vec![20, 20, 5]);
    }

    #[test]
    fn no_reactions_skips_rhea() {
        let app = app(20);
        let table = app.collect(Dataset::Reactions, &NullSink).unwrap();
        let calls = app.client.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, uniprot::URL);
        assert!(table.is_empty());
        assert_eq!(table.index(), Some("protein"));
        assert!(table.columns().contains(&"chebi".to_string()));
    }

    #[test]
    fn elapsed_millis_saturate() {
        assert_eq!(saturating_millis(Duration::from_millis(1500)), 1500);
        assert_eq!(saturating_millis(Duration::MAX), u64::MAX);
    }

    #[test]
    fn preview_starts_with_protein() {
        let query = app(20).preview(Dataset::Taxa);
        assert_eq!(
            query.variables(),
            ["protein", "organism", "kingdom", "superkingdom"]
        );
    }
}
