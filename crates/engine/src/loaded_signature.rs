//! The signature object a load-signature job fills in.

use std::sync::{Arc, Mutex};

use signature::{FileSignature, SignatureIndex, SignatureLayout};

use crate::error::{EngineCode, JobError, JobResult, StateError};

/// Hand-off slot the load-signature job publishes into when it completes.
pub(crate) type Slot = Arc<Mutex<Option<FileSignature>>>;

/// A signature loaded from a signature stream.
///
/// Created together with its load-signature job by
/// [`begin_load_signature`](crate::begin_load_signature). Once that job is
/// done, [`build_hash_table`](Self::build_hash_table) must be called before
/// the signature can be used by [`begin_create_delta`](crate::begin_create_delta).
/// Delta jobs borrow the signature, so it outlives all of them.
#[derive(Debug)]
pub struct Signature {
    slot: Slot,
    index: Option<SignatureIndex>,
}

impl Signature {
    pub(crate) fn new() -> (Self, Slot) {
        let slot: Slot = Arc::new(Mutex::new(None));
        let signature = Self {
            slot: Arc::clone(&slot),
            index: None,
        };
        (signature, slot)
    }

    #[cfg(test)]
    pub(crate) fn from_file_signature(signature: FileSignature) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(signature))),
            index: None,
        }
    }

    /// Builds the weak checksum hash table over the loaded blocks.
    ///
    /// Fails with [`EngineCode::InputEnded`] when the load-signature job has
    /// not completed, and with [`StateError::HashTableAlreadyBuilt`] when
    /// called twice.
    pub fn build_hash_table(&mut self) -> JobResult<()> {
        if self.index.is_some() {
            return Err(StateError::HashTableAlreadyBuilt.into());
        }
        let loaded = self
            .slot
            .lock()
            .map_err(|_| JobError::internal("signature hand-off slot is poisoned"))?
            .take();
        let Some(signature) = loaded else {
            return Err(JobError::engine(
                EngineCode::InputEnded,
                "signature has not been loaded; finish its load job first",
            ));
        };
        self.index = Some(SignatureIndex::build(signature));
        Ok(())
    }

    /// Reports whether the hash table has been built.
    #[must_use]
    pub const fn is_built(&self) -> bool {
        self.index.is_some()
    }

    /// Returns the layout of a built signature.
    #[must_use]
    pub fn layout(&self) -> Option<SignatureLayout> {
        self.index.as_ref().map(SignatureIndex::layout)
    }

    /// Returns the number of blocks of a built signature.
    #[must_use]
    pub fn block_count(&self) -> Option<usize> {
        self.index.as_ref().map(SignatureIndex::len)
    }

    pub(crate) fn index(&self) -> JobResult<&SignatureIndex> {
        self.index
            .as_ref()
            .ok_or_else(|| StateError::HashTableNotBuilt.into())
    }
}
