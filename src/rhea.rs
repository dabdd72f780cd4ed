use crate::domain::RheaId;
use crate::sparql::{
    FeatureClauses, Pattern, Prefix, QueryBuilder, SelectQuery, Triple, select_features,
};

pub const URL: &str = "https://sparql.rhea-db.org/sparql";

pub const PREFIXES: &[Prefix] = &[
    Prefix::new("rh", "http://rdf.rhea-db.org/"),
    Prefix::new("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    Prefix::new("chebislash", "http://purl.obolibrary.org/obo/chebi/"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    Reaction,
    ReactionSide,
    Chebi,
    Smiles,
}

impl FeatureClauses for Feature {
    fn columns(self) -> &'static [&'static str] {
        match self {
            Feature::Reaction => &["reaction"],
            Feature::ReactionSide => &["reaction_side", "reaction_side_order"],
            Feature::Chebi => &["chebi"],
            Feature::Smiles => &["smiles"],
        }
    }

    fn patterns(self) -> Vec<Pattern> {
        match self {
            Feature::Reaction => vec![Pattern::triple("?reaction", "rdfs:subClassOf", "rh:Reaction")],
            Feature::ReactionSide => vec![
                Pattern::triple("?reaction", "rh:side", "?reaction_side"),
                Pattern::triple("?reaction_side", "rh:curatedOrder", "?reaction_side_order"),
            ],
            Feature::Chebi => participant_chain(),
            Feature::Smiles => {
                let mut patterns = participant_chain();
                patterns.push(Pattern::Optional(vec![Triple::new(
                    "?chebi",
                    "chebislash:smiles",
                    "?smiles",
                )]));
                patterns
            }
        }
    }
}

fn participant_chain() -> Vec<Pattern> {
    vec![
        Pattern::triple("?reaction", "rh:side", "?reaction_side"),
        Pattern::triple("?reaction_side", "rh:contains", "?participant"),
        Pattern::triple("?participant", "rh:compound", "?compound"),
        Pattern::triple("?compound", "rh:chebi", "?chebi"),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RheaSelection(Vec<Feature>);

impl RheaSelection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self(features)
    }

    pub fn features(&self) -> &[Feature] {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RheaSearchFilter {
    Reactions(Vec<RheaId>),
}

impl RheaSearchFilter {
    fn patterns(&self) -> Vec<Pattern> {
        match self {
            RheaSearchFilter::Reactions(ids) => vec![Pattern::values(
                "reaction",
                ids.iter().map(|id| format!("rh:{id}")).collect(),
            )],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RheaSearchConfig {
    selection: RheaSelection,
    filter: RheaSearchFilter,
}

impl RheaSearchConfig {
    pub fn new(selection: RheaSelection, filter: RheaSearchFilter) -> Self {
        Self { selection, filter }
    }

    pub fn selection(&self) -> &RheaSelection {
        &self.selection
    }

    pub fn filter(&self) -> &RheaSearchFilter {
        &self.filter
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RheaQueryBuilder;

impl QueryBuilder for RheaQueryBuilder {
    type Config = RheaSearchConfig;

    fn build(&self, config: &RheaSearchConfig) -> SelectQuery {
        select_features(
            PREFIXES,
            config.filter().patterns(),
            config.selection().features(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reaction_batch_query() {
        let config = RheaSearchConfig::new(
            RheaSelection::new(vec![
                Feature::Reaction,
                Feature::ReactionSide,
                Feature::Chebi,
                Feature::Smiles,
            ]),
            RheaSearchFilter::Reactions(vec!["10000".parse().unwrap(), "RHEA:10004".parse().unwrap()]),
        );
        let query = RheaQueryBuilder.build(&config);
        assert_eq!(
            query.variables(),
            ["reaction", "reaction_side", "reaction_side_order", "chebi", "smiles"]
        );
        let text = query.to_text();
        assert!(text.contains("VALUES ?reaction { rh:10000 rh:10004 }"));
        assert_eq!(text.matches("?reaction rh:side ?reaction_side .").count(), 1);
        assert_eq!(text.matches("?compound rh:chebi ?chebi .").count(), 1);
        assert!(text.contains("PREFIX rh: <http://rdf.rhea-db.org/>"));
    }
}
