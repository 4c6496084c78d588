use fieldwise::{async_trait, AsyncResolver, Entity, FieldGraph, Resolver, Result};

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

/// One resolver call, with the requested graph in its textual form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call<Id> {
    pub id: Id,
    pub graph: String,
}

/// In-memory resolver over fully loaded entities that records every call.
///
/// Answers hold exactly the requested graph. A gated directory records an
/// asynchronous call right away but answers only once [`open`](Self::open)
/// lets it through.
pub struct Directory<E: Entity> {
    records: Mutex<HashMap<E::Id, E>>,
    calls: Mutex<Vec<Call<E::Id>>>,
    failure: Mutex<Option<String>>,
    gate: Option<Arc<Semaphore>>,
}

impl<E: Entity> Directory<E> {
    pub fn new(records: impl IntoIterator<Item = E>) -> Directory<E> {
        Directory {
            records: Mutex::new(
                records
                    .into_iter()
                    .map(|record| (record.id().clone(), record))
                    .collect(),
            ),
            calls: Mutex::new(vec![]),
            failure: Mutex::new(None),
            gate: None,
        }
    }

    pub fn gated(records: impl IntoIterator<Item = E>) -> Directory<E> {
        Directory {
            gate: Some(Arc::new(Semaphore::new(0))),
            ..Directory::new(records)
        }
    }

    /// Lets `n` waiting or future asynchronous calls answer.
    pub fn open(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    pub fn insert(&self, record: E) {
        self.records
            .lock()
            .unwrap()
            .insert(record.id().clone(), record);
    }

    pub fn remove(&self, id: &E::Id) {
        self.records.lock().unwrap().remove(id);
    }

    /// Makes every following call fail with `message`.
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }

    pub fn calls(&self) -> Vec<Call<E::Id>> {
        self.calls.lock().unwrap().clone()
    }

    /// Requested graphs, in call order.
    pub fn graphs(&self) -> Vec<String> {
        self.calls().into_iter().map(|call| call.graph).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, id: &E::Id, graph: &FieldGraph<E::Field>) {
        self.calls.lock().unwrap().push(Call {
            id: id.clone(),
            graph: graph.to_string(),
        });
    }

    fn answer(&self, id: &E::Id, graph: &FieldGraph<E::Field>) -> Result<Option<E>> {
        if let Some(message) = &*self.failure.lock().unwrap() {
            fieldwise::bail!("{message}");
        }

        self.records
            .lock()
            .unwrap()
            .get(id)
            .map(|record| record.clone_graph(graph))
            .transpose()
    }
}

impl<E: Entity> Resolver<E> for Directory<E> {
    fn get(&self, id: &E::Id, graph: &FieldGraph<E::Field>) -> Result<Option<E>> {
        self.record(id, graph);
        self.answer(id, graph)
    }
}

#[async_trait]
impl<E: Entity + Send + 'static> AsyncResolver<E> for Directory<E> {
    async fn get(&self, id: &E::Id, graph: &FieldGraph<E::Field>) -> Result<Option<E>> {
        self.record(id, graph);

        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        self.answer(id, graph)
    }
}
