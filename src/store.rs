use crate::models::{Application, Company, Contact, Interview};

/// One fetched collection plus its load state.
///
/// Replacement is wholesale and atomic: a commit either swaps the entire
/// item vector or leaves it untouched. Readers always see the last
/// committed snapshot, never a partial one.
pub struct Collection<T> {
    items: Vec<T>,
    loaded: bool,
    committed_seq: u64,
}

impl<T> Collection<T> {
    fn new() -> Self {
        Self {
            items: Vec::new(),
            loaded: false,
            committed_seq: 0,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Commit a fetch result. Only the newest ticket wins: a fetch that
    /// completes after a later-issued fetch has already committed is
    /// discarded, so a slow response can never overwrite a fresher one.
    /// Returns whether the snapshot was replaced.
    pub fn commit(&mut self, ticket: u64, items: Vec<T>) -> bool {
        if ticket <= self.committed_seq {
            return false;
        }
        self.items = items;
        self.loaded = true;
        self.committed_seq = ticket;
        true
    }
}

/// In-memory holder of the four raw collections as fetched from the API.
///
/// Collections load independently; no cross-collection consistency is
/// enforced here. Joining stale or missing references is the resolver's
/// job (see `resolve`).
pub struct EntityStore {
    next_ticket: u64,
    pub companies: Collection<Company>,
    pub contacts: Collection<Contact>,
    pub applications: Collection<Application>,
    pub interviews: Collection<Interview>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            next_ticket: 0,
            companies: Collection::new(),
            contacts: Collection::new(),
            applications: Collection::new(),
            interviews: Collection::new(),
        }
    }

    /// Issue a fetch ticket. Tickets are monotonic across the whole store,
    /// so ordering holds even when different collections are in flight.
    pub fn begin_fetch(&mut self) -> u64 {
        self.next_ticket += 1;
        self.next_ticket
    }
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}
