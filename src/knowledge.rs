//! Single-slot store for the text of the most recently uploaded document.
//!
//! The current value lives behind an `Arc`. A replacement is built in full
//! before the pointer is swapped, so readers always see either the previous
//! or the new value, never a mix of both.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// Where the current knowledge base text came from.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DocumentSource {
    pub id: Uuid,
    pub filename: String,
    pub page_count: usize,
    pub pages_with_text: usize,
    pub uploaded_at: DateTime<Utc>,
}

impl DocumentSource {
    pub fn new(filename: impl Into<String>, page_count: usize, pages_with_text: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename: filename.into(),
            page_count,
            pages_with_text,
            uploaded_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct KnowledgeBase {
    pub content: String,
    pub source: Option<DocumentSource>,
}

impl KnowledgeBase {
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct KnowledgeStore {
    current: RwLock<Arc<KnowledgeBase>>,
}

impl KnowledgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&self, text: impl Into<String>) {
        self.swap(KnowledgeBase {
            content: text.into(),
            source: None,
        });
    }

    pub fn replace_document(&self, text: impl Into<String>, source: DocumentSource) {
        self.swap(KnowledgeBase {
            content: text.into(),
            source: Some(source),
        });
    }

    pub fn read(&self) -> String {
        self.snapshot().content.clone()
    }

    pub fn snapshot(&self) -> Arc<KnowledgeBase> {
        Arc::clone(&*self.current.read())
    }

    pub fn is_empty(&self) -> bool {
        self.current.read().is_empty()
    }

    fn swap(&self, next: KnowledgeBase) {
        let next = Arc::new(next);
        let previous = std::mem::replace(&mut *self.current.write(), next);
        // Drop the old text outside the lock.
        drop(previous);
    }
}
