//! Per-table change generations published over a watch channel.
//!
//! Every committed write that changed rows bumps the counter of each table it
//! touched. Live queries compare counters to decide whether to re-run.

use tokio::sync::watch;

/// A table whose changes live queries can depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Notes,
    Tags,
    NoteTags,
}

impl Table {
    fn index(self) -> usize {
        match self {
            Self::Notes => 0,
            Self::Tags => 1,
            Self::NoteTags => 2,
        }
    }
}

/// Snapshot of the change counter of every table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Generations([u64; 3]);

impl Generations {
    /// Returns the counter for one table.
    pub fn get(&self, table: Table) -> u64 {
        self.0[table.index()]
    }

    fn bump(&mut self, table: Table) {
        self.0[table.index()] += 1;
    }

    /// Returns true if any of `tables` advanced between `earlier` and `self`.
    pub fn changed_since(&self, earlier: &Generations, tables: &[Table]) -> bool {
        tables.iter().any(|&t| self.get(t) != earlier.get(t))
    }
}

/// Publishes table generations to any number of live queries.
#[derive(Debug)]
pub struct ChangeTracker {
    sender: watch::Sender<Generations>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(Generations::default());
        Self { sender }
    }

    /// Subscribe to generation updates.
    pub fn subscribe(&self) -> watch::Receiver<Generations> {
        self.sender.subscribe()
    }

    /// Returns the current generations.
    pub fn current(&self) -> Generations {
        *self.sender.borrow()
    }

    /// Records a committed change to `tables`.
    ///
    /// Receivers observe one update per call, however many tables it names.
    pub fn notify(&self, tables: &[Table]) {
        if tables.is_empty() {
            return;
        }
        self.sender.send_modify(|generations| {
            for &table in tables {
                generations.bump(table);
            }
        });
        tracing::trace!(?tables, "tables changed");
    }
}

impl Default for ChangeTracker {
    fn default() -> Self {
        Self::new()
    }
}
