//! Annotation session
//!
//! One upload produces one session: the ordered list of pages it was
//! rasterized into. The registry holds at most one session at a time and a
//! new upload replaces it wholesale once its pages are on disk.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::storage::{drawing_file_name, page_file_name};

// ============================================================================
// Records
// ============================================================================

/// A rasterized page and its drawing layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRecord {
    /// 1-based page number
    pub index: usize,
    pub width: u32,
    pub height: u32,
    pub page_file: String,
    pub drawing_file: String,
}

impl PageRecord {
    pub fn new(index: usize, width: u32, height: u32) -> Self {
        Self {
            index,
            width,
            height,
            page_file: page_file_name(index),
            drawing_file: drawing_file_name(index),
        }
    }
}

/// The active upload
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: Uuid,
    /// File name as stored under the uploads directory
    pub source_name: String,
    /// Hex SHA-256 of the uploaded bytes
    pub source_sha256: String,
    pub created_at: DateTime<Utc>,
    pub preprocessed: bool,
    pub pages: Vec<PageRecord>,
}

impl Session {
    pub fn new(source_name: impl Into<String>, source: &[u8], preprocessed: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_name: source_name.into(),
            source_sha256: hex::encode(Sha256::digest(source)),
            created_at: Utc::now(),
            preprocessed,
            pages: Vec::new(),
        }
    }

    /// Append the next page; indices are assigned in order starting at 1
    pub fn push_page(&mut self, width: u32, height: u32) -> &PageRecord {
        let index = self.pages.len() + 1;
        self.pages.push(PageRecord::new(index, width, height));
        &self.pages[index - 1]
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Page file names in page order
    pub fn page_files(&self) -> Vec<String> {
        self.pages.iter().map(|p| p.page_file.clone()).collect()
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Holder of the current session
#[derive(Clone, Default)]
pub struct SessionRegistry {
    current: Arc<RwLock<Option<Session>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a new session, returning the one it replaced
    pub async fn replace(&self, session: Session) -> Option<Session> {
        let mut current = self.current.write().await;
        tracing::info!(
            session_id = %session.id,
            pages = session.page_count(),
            "Session replaced"
        );
        current.replace(session)
    }

    /// Drop the current session, e.g. once its pages have been deleted
    pub async fn clear(&self) -> Option<Session> {
        self.current.write().await.take()
    }

    /// Snapshot of the current session
    pub async fn current(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    /// Pages in the current session; zero when nothing has been uploaded
    pub async fn page_count(&self) -> usize {
        self.current
            .read()
            .await
            .as_ref()
            .map(Session::page_count)
            .unwrap_or(0)
    }
}
