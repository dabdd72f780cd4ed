use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prefix {
    pub name: &'static str,
    pub iri: &'static str,
}

impl Prefix {
    pub const fn new(name: &'static str, iri: &'static str) -> Self {
        Self { name, iri }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl Triple {
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    Triple(Triple),
    Optional(Vec<Triple>),
    Values { variable: String, terms: Vec<String> },
}

impl Pattern {
    pub fn triple(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Pattern::Triple(Triple::new(subject, predicate, object))
    }

    pub fn values(variable: impl Into<String>, terms: Vec<String>) -> Self {
        Pattern::Values {
            variable: variable.into(),
            terms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    prefixes: Vec<Prefix>,
    distinct: bool,
    variables: Vec<String>,
    patterns: Vec<Pattern>,
    limit: Option<usize>,
}

impl SelectQuery {
    pub fn builder() -> SelectQueryBuilder {
        SelectQueryBuilder::default()
    }

    pub fn prefixes(&self) -> &[Prefix] {
        &self.prefixes
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for prefix in &self.prefixes {
            out.push_str(&format!("PREFIX {}: <{}>\n", prefix.name, prefix.iri));
        }
        if !self.prefixes.is_empty() {
            out.push('\n');
        }

        out.push_str("SELECT ");
        if self.distinct {
            out.push_str("DISTINCT ");
        }
        if self.variables.is_empty() {
            out.push('*');
        } else {
            let projection = self
                .variables
                .iter()
                .map(|var| format!("?{var}"))
                .collect::<Vec<_>>()
                .join(" ");
            out.push_str(&projection);
        }
        out.push_str("\nWHERE {\n");
        for pattern in &self.patterns {
            render_pattern(&mut out, pattern);
        }
        out.push('}');
        if let Some(limit) = self.limit {
            out.push_str(&format!("\nLIMIT {limit}"));
        }
        out.push('\n');
        out
    }
}

impl fmt::Display for SelectQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

fn render_triple(out: &mut String, indent: &str, triple: &Triple) {
    out.push_str(&format!(
        "{indent}{} {} {} .\n",
        triple.subject, triple.predicate, triple.object
    ));
}

fn render_pattern(out: &mut String, pattern: &Pattern) {
    match pattern {
        Pattern::Triple(triple) => render_triple(out, "  ", triple),
        Pattern::Optional(triples) => {
            out.push_str("  OPTIONAL {\n");
            for triple in triples {
                render_triple(out, "    ", triple);
            }
            out.push_str("  }\n");
        }
        Pattern::Values { variable, terms } => {
            out.push_str(&format!("  VALUES ?{variable} {{ {} }}\n", terms.join(" ")));
        }
    }
}

/// Accumulates query parts. Repeated variables and patterns keep their first
/// position so overlapping feature mappings render once.
#[derive(Debug, Default)]
pub struct SelectQueryBuilder {
    prefixes: Vec<Prefix>,
    distinct: bool,
    variables: Vec<String>,
    patterns: Vec<Pattern>,
    limit: Option<usize>,
}

impl SelectQueryBuilder {
    pub fn prefixes(mut self, prefixes: &[Prefix]) -> Self {
        for prefix in prefixes {
            if !self.prefixes.iter().any(|known| known.name == prefix.name) {
                self.prefixes.push(*prefix);
            }
        }
        self
    }

    pub fn distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    pub fn variable(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        let name = name.trim_start_matches('?').to_string();
        if !self.variables.contains(&name) {
            self.variables.push(name);
        }
        self
    }

    pub fn pattern(mut self, pattern: Pattern) -> Self {
        if !self.patterns.contains(&pattern) {
            self.patterns.push(pattern);
        }
        self
    }

    pub fn patterns(self, patterns: impl IntoIterator<Item = Pattern>) -> Self {
        patterns
            .into_iter()
            .fold(self, |builder, pattern| builder.pattern(pattern))
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn build(self) -> SelectQuery {
        SelectQuery {
            prefixes: self.prefixes,
            distinct: self.distinct,
            variables: self.variables,
            patterns: self.patterns,
            limit: self.limit,
        }
    }
}

pub trait QueryBuilder {
    type Config;

    fn build(&self, config: &Self::Config) -> SelectQuery;
}

pub fn build_query<B>(config: &B::Config) -> SelectQuery
where
    B: QueryBuilder + Default,
{
    B::default().build(config)
}

pub trait FeatureClauses: Copy {
    fn columns(self) -> &'static [&'static str];

    fn patterns(self) -> Vec<Pattern>;
}

// Filter patterns come first, then each feature's columns and clauses in
// selection order.
pub fn select_features<F: FeatureClauses>(
    prefixes: &[Prefix],
    filter: Vec<Pattern>,
    features: &[F],
) -> SelectQuery {
    let builder = SelectQuery::builder()
        .prefixes(prefixes)
        .distinct(true)
        .patterns(filter);
    features
        .iter()
        .fold(builder, |builder, feature| {
            feature
                .columns()
                .iter()
                .fold(builder, |builder, column| builder.variable(*column))
                .patterns(feature.patterns())
        })
        .build()
}
