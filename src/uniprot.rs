use crate::domain::{PfamId, UniprotId};
use crate::sparql::{
    FeatureClauses, Pattern, Prefix, QueryBuilder, SelectQuery, Triple, select_features,
};

pub const URL: &str = "https://sparql.uniprot.org/sparql";

pub const PREFIXES: &[Prefix] = &[
    Prefix::new("up", "http://purl.uniprot.org/core/"),
    Prefix::new("uniprotkb", "http://purl.uniprot.org/uniprot/"),
    Prefix::new("taxon", "http://purl.uniprot.org/taxonomy/"),
    Prefix::new("pfam", "http://purl.uniprot.org/pfam/"),
    Prefix::new("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    Prefix::new("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Protein,
    Organism,
    Kingdom,
    Superkingdom,
    Name,
    SubmittedName,
    Pfam,
    Sequence,
    Reaction,
}

impl FeatureClauses for Feature {
    fn columns(self) -> &'static [&'static str] {
        match self {
            Feature::Protein => &["protein"],
            Feature::Organism => &["organism"],
            Feature::Kingdom => &["kingdom"],
            Feature::Superkingdom => &["superkingdom"],
            Feature::Name => &["full_recommended_name"],
            Feature::SubmittedName => &["full_submitted_name"],
            Feature::Pfam => &["pfam"],
            Feature::Sequence => &["sequence"],
            Feature::Reaction => &["reaction"],
        }
    }

    fn patterns(self) -> Vec<Pattern> {
        match self {
            Feature::Protein => vec![Pattern::triple("?protein", "a", "up:Protein")],
            Feature::Organism => vec![
                Pattern::triple("?protein", "up:organism", "?taxon"),
                Pattern::triple("?taxon", "up:scientificName", "?organism"),
            ],
            Feature::Kingdom => vec![
                Pattern::triple("?protein", "up:organism", "?taxon"),
                ranked_lineage("kingdom", "up:Kingdom"),
            ],
            Feature::Superkingdom => vec![
                Pattern::triple("?protein", "up:organism", "?taxon"),
                ranked_lineage("superkingdom", "up:Superkingdom"),
            ],
            Feature::Name => vec![Pattern::Optional(vec![
                Triple::new("?protein", "up:recommendedName", "?recommended_name"),
                Triple::new("?recommended_name", "up:fullName", "?full_recommended_name"),
            ])],
            Feature::SubmittedName => vec![Pattern::Optional(vec![
                Triple::new("?protein", "up:submittedName", "?submitted_name"),
                Triple::new("?submitted_name", "up:fullName", "?full_submitted_name"),
            ])],
            Feature::Pfam => vec![
                Pattern::triple("?protein", "rdfs:seeAlso", "?pfam"),
                Pattern::triple(
                    "?pfam",
                    "up:database",
                    "<http://purl.uniprot.org/database/Pfam>",
                ),
            ],
            Feature::Sequence => vec![
                Pattern::triple("?protein", "up:sequence", "?isoform"),
                Pattern::triple("?isoform", "rdf:value", "?sequence"),
            ],
            Feature::Reaction => vec![
                Pattern::triple("?protein", "up:annotation", "?catalytic_annotation"),
                Pattern::triple(
                    "?catalytic_annotation",
                    "a",
                    "up:Catalytic_Activity_Annotation",
                ),
                Pattern::triple(
                    "?catalytic_annotation",
                    "up:catalyticActivity",
                    "?catalytic_activity",
                ),
                Pattern::triple(
                    "?catalytic_activity",
                    "up:catalyzedReaction",
                    "?reaction",
                ),
            ],
        }
    }
}

fn ranked_lineage(column: &str, rank: &str) -> Pattern {
    let ancestor = format!("?{column}_taxon");
    Pattern::Optional(vec![
        Triple::new("?taxon", "rdfs:subClassOf", ancestor.clone()),
        Triple::new(ancestor.clone(), "up:rank", rank),
        Triple::new(ancestor, "up:scientificName", format!("?{column}")),
    ])
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniprotSelection(Vec<Feature>);

impl UniprotSelection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self(features)
    }

    pub fn features(&self) -> &[Feature] {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UniprotSearchFilter {
    Pfams(Vec<PfamId>),
    Proteins(Vec<UniprotId>),
    Taxon(u32),
}

impl UniprotSearchFilter {
    fn patterns(&self) -> Vec<Pattern> {
        match self {
            UniprotSearchFilter::Pfams(pfams) => vec![
                Pattern::values(
                    "pfam_filter",
                    pfams.iter().map(|id| format!("pfam:{id}")).collect(),
                ),
                Pattern::triple("?protein", "rdfs:seeAlso", "?pfam_filter"),
            ],
            UniprotSearchFilter::Proteins(ids) => vec![Pattern::values(
                "protein",
                ids.iter().map(|id| format!("uniprotkb:{id}")).collect(),
            )],
            UniprotSearchFilter::Taxon(taxon) => vec![
                Pattern::values("taxon", vec![format!("taxon:{taxon}")]),
                Pattern::triple("?protein", "up:organism", "?taxon"),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniprotSearchConfig {
    selection: UniprotSelection,
    filter: UniprotSearchFilter,
}

impl UniprotSearchConfig {
    pub fn new(selection: UniprotSelection, filter: UniprotSearchFilter) -> Self {
        Self { selection, filter }
    }

    pub fn selection(&self) -> &UniprotSelection {
        &self.selection
    }

    pub fn filter(&self) -> &UniprotSearchFilter {
        &self.filter
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UniprotQueryBuilder;

impl QueryBuilder for UniprotQueryBuilder {
    type Config = UniprotSearchConfig;

    fn build(&self, config: &UniprotSearchConfig) -> SelectQuery {
        select_features(
            PREFIXES,
            config.filter().patterns(),
            config.selection().features(),
        )
    }
}
