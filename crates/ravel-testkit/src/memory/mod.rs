//! A store that answers queries from triples held in memory.

mod eval;
mod parse;

use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};
use ravel_core::{QueryResults, Store, StoreError, Triple, Uri};

use crate::scripted::RecordedQuery;

use eval::Evaluator;
use parse::{parse_clear, parse_query};

/// Triples per graph, in insertion order.
///
/// Queries see the union of their FROM graphs, or every graph when the query
/// names none. Under inference, `rdf:type` patterns also match the
/// `rdfs:subClassOf` closure of the visible data.
#[derive(Debug, Default)]
pub struct MemoryStore {
    graphs: RwLock<IndexMap<Uri, Vec<Triple>>>,
    log: Mutex<Vec<RecordedQuery>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, graph: impl Into<Uri>, triple: Triple) {
        let mut graphs = self.graphs.write();
        let triples = graphs.entry(graph.into()).or_default();
        if !triples.contains(&triple) {
            triples.push(triple);
        }
    }

    pub fn extend(&self, graph: impl Into<Uri>, triples: impl IntoIterator<Item = Triple>) {
        let graph = graph.into();
        for triple in triples {
            self.insert(graph.clone(), triple);
        }
    }

    pub fn triples(&self, graph: &Uri) -> Vec<Triple> {
        self.graphs.read().get(graph).cloned().unwrap_or_default()
    }

    /// Total number of triples across graphs.
    pub fn len(&self) -> usize {
        self.graphs.read().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every query received so far, oldest first.
    pub fn queries(&self) -> Vec<RecordedQuery> {
        self.log.lock().clone()
    }

    fn dataset(&self, from: &[Uri]) -> Vec<Triple> {
        let graphs = self.graphs.read();
        let mut triples: Vec<Triple> = Vec::new();
        let selected: Vec<&Vec<Triple>> = if from.is_empty() {
            graphs.values().collect()
        } else {
            from.iter().filter_map(|g| graphs.get(g)).collect()
        };
        for triple in selected.into_iter().flatten() {
            if !triples.contains(triple) {
                triples.push(triple.clone());
            }
        }
        triples
    }
}

impl Store for MemoryStore {
    fn execute(&self, query: &str, inference: bool) -> Result<QueryResults, StoreError> {
        tracing::trace!(query, inference, "memory store query");
        self.log.lock().push(RecordedQuery {
            text: query.to_owned(),
            inference,
        });
        let parsed = parse_query(query)?;
        let dataset = self.dataset(&parsed.from);
        Ok(Evaluator::new(&dataset, inference).evaluate(&parsed))
    }

    fn execute_update(&self, update: &str) -> Result<(), StoreError> {
        tracing::trace!(update, "memory store update");
        let mut graphs = self.graphs.write();
        match parse_clear(update)? {
            Some(graph) => {
                graphs.shift_remove(&graph);
            }
            None => graphs.clear(),
        }
        Ok(())
    }
}
