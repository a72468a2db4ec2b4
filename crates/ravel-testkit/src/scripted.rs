//! A store that replays canned answers.

use std::collections::VecDeque;

use parking_lot::Mutex;
use ravel_core::{QueryResults, Store, StoreError};

/// One call received by a test store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedQuery {
    pub text: String,
    pub inference: bool,
}

/// Answers queries from a FIFO of results, whatever the query says.
///
/// Running out of answers is a backend failure.
#[derive(Debug, Default)]
pub struct ScriptedStore {
    answers: Mutex<VecDeque<QueryResults>>,
    queries: Mutex<Vec<RecordedQuery>>,
    updates: Mutex<Vec<String>>,
}

impl ScriptedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue answers in the order queries will arrive.
    pub fn with_answers(answers: impl IntoIterator<Item = QueryResults>) -> Self {
        let store = Self::new();
        store.answers.lock().extend(answers);
        store
    }

    pub fn push(&self, answer: QueryResults) -> &Self {
        self.answers.lock().push_back(answer);
        self
    }

    pub fn queries(&self) -> Vec<RecordedQuery> {
        self.queries.lock().clone()
    }

    pub fn query_texts(&self) -> Vec<String> {
        self.queries.lock().iter().map(|q| q.text.clone()).collect()
    }

    pub fn updates(&self) -> Vec<String> {
        self.updates.lock().clone()
    }

    /// Answers not consumed yet.
    pub fn remaining(&self) -> usize {
        self.answers.lock().len()
    }
}

impl Store for ScriptedStore {
    fn execute(&self, query: &str, inference: bool) -> Result<QueryResults, StoreError> {
        self.queries.lock().push(RecordedQuery {
            text: query.to_owned(),
            inference,
        });
        self.answers
            .lock()
            .pop_front()
            .ok_or_else(|| StoreError::Backend(format!("no scripted answer for `{query}`")))
    }

    fn execute_update(&self, update: &str) -> Result<(), StoreError> {
        self.updates.lock().push(update.to_owned());
        Ok(())
    }
}
