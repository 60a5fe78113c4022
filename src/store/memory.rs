use std::sync::Mutex;

use futures::future::{self, BoxFuture, FutureExt};
use mongodb::bson::Document;

use crate::prelude::*;
use super::{Collection, Filter};


/// A collection living entirely in process memory. Every call works on a
/// consistent snapshot since the whole operation happens under one lock.
pub(crate) struct MemoryCollection {
    name: String,
    docs: Mutex<Vec<Document>>,
}

impl MemoryCollection {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            docs: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Document>>> {
        self.docs.lock().map_err(|_| anyhow!("lock of collection '{}' is poisoned", self.name))
    }

    fn find_now(&self, filter: &Filter) -> Result<Vec<Document>> {
        let docs = self.lock()?;
        Ok(docs.iter().filter(|doc| filter.matches(doc)).cloned().collect())
    }

    fn insert_now(&self, new_docs: Vec<Document>) -> Result<()> {
        let mut docs = self.lock()?;

        // Mimic the unique index on `_id`. Checked before touching anything,
        // so a failing call inserts nothing.
        for (i, doc) in new_docs.iter().enumerate() {
            let Some(id) = doc.get("_id") else {
                bail!("document #{i} inserted into '{}' has no `_id`", self.name);
            };
            let duplicate = docs.iter().any(|d| d.get("_id") == Some(id))
                || new_docs[..i].iter().any(|d| d.get("_id") == Some(id));
            if duplicate {
                bail!("duplicate key error: `_id` {id} already exists in '{}'", self.name);
            }
        }

        docs.extend(new_docs);
        Ok(())
    }

    fn delete_now(&self, filter: &Filter) -> Result<u64> {
        let mut docs = self.lock()?;
        let before = docs.len();
        docs.retain(|doc| !filter.matches(doc));
        Ok((before - docs.len()) as u64)
    }
}

impl Collection for MemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    fn find<'a>(&'a self, filter: &'a Filter) -> BoxFuture<'a, Result<Vec<Document>>> {
        future::ready(self.find_now(filter)).boxed()
    }

    fn insert_many(&self, docs: Vec<Document>) -> BoxFuture<'_, Result<()>> {
        future::ready(self.insert_now(docs)).boxed()
    }

    fn delete_many<'a>(&'a self, filter: &'a Filter) -> BoxFuture<'a, Result<u64>> {
        future::ready(self.delete_now(filter)).boxed()
    }
}
