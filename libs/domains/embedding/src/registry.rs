use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::error::EmbeddingResult;
use crate::knowledge_bank::{make_knowledge_bank, KnowledgeBank};
use crate::optimizer::{make_optimizer, GradientOptimizer};
use crate::session::decode_session_handle;

/// One live session: a knowledge bank plus its optional optimizer.
#[derive(Clone)]
pub struct Session {
    pub bank: Arc<dyn KnowledgeBank>,
    pub optimizer: Option<Arc<dyn GradientOptimizer>>,
}

/// Owns every session, keyed by session handle.
///
/// The registry itself is a plain map; the service serializes structural
/// access through its registry lock (shared for reads, exclusive for
/// insertion).
#[derive(Default)]
pub struct SessionRegistry {
    sessions: HashMap<String, Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotently create the session a handle describes and return it.
    ///
    /// The handle carries the full defining configuration, so a handle minted
    /// elsewhere is enough to rebuild the session (cold start). Repeat
    /// references return the existing entry unchanged; the configuration
    /// embedded in the handle is only read on first reference.
    pub fn get_or_create(&mut self, handle: &str) -> EmbeddingResult<Session> {
        if let Some(session) = self.sessions.get(handle) {
            return Ok(session.clone());
        }

        let (name, config) = decode_session_handle(handle)?;
        let bank = make_knowledge_bank(&config)?;
        let optimizer = match &config.gradient_descent {
            Some(gd) => Some(make_optimizer(config.embedding_dimension, gd)?),
            None => None,
        };

        info!(
            name = %name,
            embedding_dimension = config.embedding_dimension,
            has_optimizer = optimizer.is_some(),
            "Created embedding session"
        );

        let session = Session { bank, optimizer };
        self.sessions.insert(handle.to_string(), session.clone());
        Ok(session)
    }

    /// Locate an existing session without creating it.
    pub fn get(&self, handle: &str) -> Option<Session> {
        self.sessions.get(handle).cloned()
    }

    pub fn contains(&self, handle: &str) -> bool {
        self.sessions.contains_key(handle)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Install a prebuilt session, bypassing handle decoding.
    #[cfg(test)]
    pub(crate) fn insert(&mut self, handle: &str, session: Session) {
        self.sessions.insert(handle.to_string(), session);
    }
}
