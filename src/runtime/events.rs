//! Service event payloads.

/// Events emitted from the service loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AwardEvent {
    /// The roster snapshot was swapped.
    RosterReplaced {
        /// Members in the new snapshot.
        members: usize,
    },
    /// Drafts were appended to the contact list.
    ContactsAdded {
        /// Drafts in this batch.
        added: usize,
        /// Drafts held after the batch.
        total: usize,
    },
    /// The contact list was emptied.
    ContactsCleared,
    /// A computation finished.
    ReportReady {
        /// Increments with every finished computation.
        generation: u64,
        /// Awards and variants with at least one level achieved.
        achieved: usize,
    },
}
