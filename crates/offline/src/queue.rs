//! Durable FIFO of commands not yet confirmed by the remote.
//!
//! Every change is written through to the store before the call returns; if
//! the write fails the in-memory queue is rolled back so memory and disk never
//! disagree. Delivery is at-least-once: a command whose removal could not be
//! persisted stays at the head and will be sent again.
//!
//! Removal is persisted before the delivered command is folded into the
//! stored snapshot. If that second write fails, the command is in neither
//! document until the next refresh brings it back from the remote.

use std::collections::VecDeque;

use api_types::command::Command;

use crate::{
    error::StoreError,
    store::{LocalStore, QUEUE_KEY, load_json, save_json},
};

#[derive(Debug)]
pub struct MutationQueue<S> {
    store: S,
    entries: VecDeque<Command>,
}

impl<S: LocalStore> MutationQueue<S> {
    /// Restores the queue persisted in `store`, empty if there is none.
    pub fn load(store: S) -> Result<Self, StoreError> {
        let entries: Vec<Command> = load_json(&store, QUEUE_KEY)?.unwrap_or_default();
        Ok(Self {
            store,
            entries: entries.into(),
        })
    }

    /// Appends `command` and persists the whole queue.
    pub fn enqueue(&mut self, command: Command) -> Result<(), StoreError> {
        self.entries.push_back(command);
        if let Err(err) = self.persist() {
            self.entries.pop_back();
            return Err(err);
        }
        Ok(())
    }

    pub fn peek_head(&self) -> Option<&Command> {
        self.entries.front()
    }

    /// Drops the head after a confirmed delivery and persists the removal.
    pub fn remove_head(&mut self) -> Result<Option<Command>, StoreError> {
        let Some(head) = self.entries.pop_front() else {
            return Ok(None);
        };
        if let Err(err) = self.persist() {
            self.entries.push_front(head);
            return Err(err);
        }
        Ok(Some(head))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.entries.iter()
    }

    pub fn persist(&self) -> Result<(), StoreError> {
        save_json(&self.store, QUEUE_KEY, &self.entries)
    }
}
