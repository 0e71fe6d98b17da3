use crate::record::SequenceRecord;
use anyhow::{bail, Context, Result};
use regex::Regex;
use std::collections::HashSet;
use thiserror::Error;

/// Raw filter configuration, as collected from the command line.
#[derive(Debug, Default, Clone)]
pub struct FilterOpts {
    pub query: Option<String>,
    pub filterfile: Option<String>,
    pub grep: bool,
    pub reverse: bool,
    pub length: Option<String>,
}

#[derive(Error, Debug)]
pub enum FilterErr {
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// An inclusive length interval `[min, max]`. `usize::MAX` stands in for an unbounded
/// maximum.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LengthRange {
    pub min: usize,
    pub max: usize,
}

impl Default for LengthRange {
    fn default() -> Self {
        LengthRange {
            min: 0,
            max: usize::MAX,
        }
    }
}

impl From<&str> for LengthRange {
    /// Parses `MIN-MAX`, `-MAX` or `MIN-`.
    ///
    /// Parsing is lenient: any bound which is missing or cannot be read as a number falls
    /// back to its default (0 and unbounded) with a warning, rather than failing. Only a
    /// leading `digits-digits` prefix is considered, so `10-20bp` reads as `10-20`.
    fn from(arg: &str) -> Self {
        let mut range = LengthRange::default();

        let digits = |s: &str| s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());

        let split = digits(arg);
        let Some(rest) = arg[split..].strip_prefix('-') else {
            warn!("Could not parse length range `{arg}`, no length bounds will be applied");
            return range;
        };

        let min = &arg[..split];
        if !min.is_empty() {
            match min.parse() {
                Ok(v) => range.min = v,
                Err(_) => warn!("Invalid minimum length `{min}`, using 0"),
            }
        }

        let max = &rest[..digits(rest)];
        if !max.is_empty() {
            match max.parse() {
                Ok(v) => range.max = v,
                Err(_) => warn!("Invalid maximum length `{max}`, using no maximum"),
            }
        }

        range
    }
}

impl LengthRange {
    pub fn contains(&self, len: usize) -> bool {
        (self.min <= len) && (len <= self.max)
    }
}

/// How identifiers are compared against the configured queries.
#[derive(Debug)]
pub enum IdentifierMatcher {
    /// Exact membership in a set of identifiers
    Exact(HashSet<String>),
    /// Regular expression search, succeeding if any pattern is found anywhere in the
    /// identifier. Patterns are compiled separately so that long query files are not
    /// bounded by the compiled size limit of a single combined regex.
    Grep(Vec<Regex>),
}

impl IdentifierMatcher {
    fn is_match(&self, id: &str) -> bool {
        match self {
            IdentifierMatcher::Exact(set) => set.contains(id),
            IdentifierMatcher::Grep(patterns) => patterns.iter().any(|re| re.is_match(id)),
        }
    }
}

#[derive(Debug)]
pub enum Predicate {
    Identifier {
        matcher: IdentifierMatcher,
        negate: bool,
    },
    Length(LengthRange),
}

impl Predicate {
    pub fn test(&self, record: &SequenceRecord) -> bool {
        match self {
            // negation only ever applies to the identifier test
            Predicate::Identifier { matcher, negate } => {
                matcher.is_match(record.identifier()) != *negate
            }
            Predicate::Length(range) => range.contains(record.seq_len()),
        }
    }
}

/// The complete filter for a run. A record is kept if every predicate accepts it.
#[derive(Debug)]
pub struct FilterSpec {
    predicates: Vec<Predicate>,
}

/// The first whitespace-delimited token of each non-blank line.
fn query_tokens(text: &str) -> impl Iterator<Item = &str> {
    text.lines().filter_map(|line| line.split_whitespace().next())
}

impl FilterSpec {
    pub fn new(opts: &FilterOpts) -> Result<Self> {
        let mut predicates = Vec::new();

        // empty values count as not given
        let query = opts.query.as_deref().filter(|q| !q.trim().is_empty());
        let filterfile = opts.filterfile.as_deref().filter(|f| !f.is_empty());
        let length = opts.length.as_deref().filter(|l| !l.trim().is_empty());

        let queries: Option<Vec<String>> = match (query, filterfile) {
            (Some(_), Some(_)) => bail!(FilterErr::Configuration(
                "only one of a query and a filter file may be given".to_string()
            )),
            (Some(query), None) => Some(query_tokens(query).take(1).map(String::from).collect()),
            (None, Some(path)) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Unable to read filter file {path}"))?;
                let tokens: Vec<String> = query_tokens(&text).map(String::from).collect();
                info!("Read {} queries from {path}", tokens.len());
                Some(tokens)
            }
            (None, None) => None,
        };

        if let Some(queries) = queries {
            let matcher = if opts.grep {
                let patterns = queries
                    .iter()
                    .map(|q| {
                        Regex::new(q).map_err(|e| {
                            FilterErr::Configuration(format!("invalid query pattern `{q}`: {e}"))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                IdentifierMatcher::Grep(patterns)
            } else {
                IdentifierMatcher::Exact(queries.into_iter().collect())
            };
            predicates.push(Predicate::Identifier {
                matcher,
                negate: opts.reverse,
            });
        }

        if let Some(length) = length {
            let range = LengthRange::from(length);
            debug!("Filtering lengths within [{}, {}]", range.min, range.max);
            predicates.push(Predicate::Length(range));
        }

        if predicates.is_empty() {
            bail!(FilterErr::Configuration(
                "you must specify a query and/or a length filter".to_string()
            ));
        }

        Ok(FilterSpec { predicates })
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn matches(&self, record: &SequenceRecord) -> bool {
        self.predicates.iter().all(|p| p.test(record))
    }
}
