use std::collections::VecDeque;

use indexmap::IndexSet;

use crate::{Error, Result};

use super::pattern::{PatternTerm, StatementPattern};
use super::query::{QueryGraph, QueryId};

impl QueryGraph {
    /// Copy `root` together with every query it depends on, transitively.
    ///
    /// Walks the dependency graph with explicit processed/generated lists, so
    /// cycles terminate. Returns the copy of `root`; the originals are untouched.
    pub fn deep_clone(&mut self, root: QueryId) -> Result<QueryId> {
        self.get(root)?;

        let mut processed: Vec<QueryId> = Vec::new();
        let mut generated: Vec<QueryId> = Vec::new();
        let mut pending = VecDeque::from([root]);

        while let Some(original) = pending.pop_front() {
            if processed.contains(&original) {
                continue;
            }
            let name = format!("{}_copy", self.variable_name(original)?);
            let copy = self.allocate(&name);
            {
                let source = &self.nodes[original.index()];
                let (offset, limit, inference) = (source.offset, source.limit, source.inference);
                let target = &mut self.nodes[copy.index()];
                target.offset = offset;
                target.limit = limit;
                target.inference = inference;
            }
            processed.push(original);
            generated.push(copy);

            for &dependent in &self.nodes[original.index()].dependents {
                if !processed.contains(&dependent) {
                    pending.push_back(dependent);
                }
            }
        }

        for (original, copy) in processed.iter().zip(&generated) {
            let source = &self.nodes[original.index()];
            let patterns = source
                .patterns
                .iter()
                .map(|pattern| remap_pattern(pattern, &processed, &generated))
                .collect::<Result<Vec<_>>>()?;
            let dependents = source
                .dependents
                .iter()
                .map(|&d| remap(d, &processed, &generated))
                .collect::<Result<IndexSet<_>>>()?;

            let target = &mut self.nodes[copy.index()];
            target.patterns = patterns;
            target.dependents = dependents;
        }

        tracing::debug!(
            root = root.index(),
            copied = generated.len(),
            "cloned query component"
        );
        Ok(generated[0])
    }
}

fn remap(id: QueryId, processed: &[QueryId], generated: &[QueryId]) -> Result<QueryId> {
    processed
        .iter()
        .position(|&p| p == id)
        .map(|i| generated[i])
        .ok_or(Error::CycleDetected(id))
}

fn remap_pattern(
    pattern: &StatementPattern,
    processed: &[QueryId],
    generated: &[QueryId],
) -> Result<StatementPattern> {
    let object = match &pattern.object {
        PatternTerm::Query(id) => PatternTerm::Query(remap(*id, processed, generated)?),
        other => other.clone(),
    };
    Ok(StatementPattern {
        subject: remap(pattern.subject, processed, generated)?,
        predicate: pattern.predicate.clone(),
        object,
        filter: pattern.filter,
        sort: pattern.sort,
    })
}
