use std::sync::Arc;
use std::time::SystemTime;

use log::trace;

/// Identifier of a commit, unique within its store's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CommitId(u64);

impl CommitId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// An immutable snapshot of the document with metadata.
#[derive(Clone, Debug)]
pub struct Commit<T> {
    id: CommitId,
    parent: Option<CommitId>,
    time: SystemTime,
    message: String,
    state: T,
}

impl<T> Commit<T> {
    pub fn id(&self) -> CommitId {
        self.id
    }

    /// The commit this one was made on top of; `None` for the initial
    /// commit.
    pub fn parent(&self) -> Option<CommitId> {
        self.parent
    }

    pub fn time(&self) -> SystemTime {
        self.time
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The snapshotted document state.
    pub fn state(&self) -> &T {
        &self.state
    }
}

/// Options for [`UndoRedoStore`] construction.
#[derive(Clone, Debug)]
pub struct StoreOptions {
    /// Message of the synthetic initial commit.
    pub initial_message: String,
    /// Clock used for commit timestamps. Monotonicity is not required;
    /// the timestamps only feed human-readable presentation.
    pub clock: fn() -> SystemTime,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            initial_message: "created document".to_owned(),
            clock: SystemTime::now,
        }
    }
}

/// A value-semantic undo/redo store: a mutable scratch document, a head
/// commit, and linear undo/redo stacks of immutable snapshots.
///
/// Mutations through [`scratch_mut`](Self::scratch_mut) are untracked until
/// [`commit_scratch`](Self::commit_scratch) snapshots them. Undo and redo
/// move the head along the commit chain and re-seed scratch from the new
/// head. Every operation is total; out-of-range history jumps are no-ops.
///
/// # Examples
/// ```
/// use warpo::prelude::UndoRedoStore;
///
/// let mut store = UndoRedoStore::new(vec![1]);
/// store.scratch_mut().push(2);
/// store.commit_scratch("pushed 2");
///
/// store.undo();
/// assert_eq!(store.scratch(), &vec![1]);
/// store.redo();
/// assert_eq!(store.scratch(), &vec![1, 2]);
/// ```
#[derive(Debug)]
pub struct UndoRedoStore<T: Clone> {
    scratch: T,
    head: Arc<Commit<T>>,
    undo_stack: Vec<Arc<Commit<T>>>,
    redo_stack: Vec<Arc<Commit<T>>>,
    next_id: u64,
    options: StoreOptions,
}

impl<T: Clone> UndoRedoStore<T> {
    /// Create a store whose initial commit snapshots `initial`.
    pub fn new(initial: T) -> Self {
        Self::with_options(initial, StoreOptions::default())
    }

    pub fn with_options(initial: T, options: StoreOptions) -> Self {
        let head = Arc::new(Commit {
            id: CommitId(0),
            parent: None,
            time: (options.clock)(),
            message: options.initial_message.clone(),
            state: initial.clone(),
        });
        Self {
            scratch: initial,
            head,
            undo_stack: vec![],
            redo_stack: vec![],
            next_id: 1,
            options,
        }
    }

    /// The mutable working copy. Mutations are untracked until committed.
    pub fn scratch_mut(&mut self) -> &mut T {
        &mut self.scratch
    }

    pub fn scratch(&self) -> &T {
        &self.scratch
    }

    /// The commit the head pointer currently rests on.
    pub fn head(&self) -> &Commit<T> {
        &self.head
    }

    /// Snapshot scratch as a new commit on top of the head.
    ///
    /// The previous head moves onto the undo stack and the redo stack is
    /// cleared, and the new commit becomes the head.
    pub fn commit_scratch(&mut self, message: impl Into<String>) -> CommitId {
        let id = CommitId(self.next_id);
        self.next_id += 1;
        let commit = Arc::new(Commit {
            id,
            parent: Some(self.head.id),
            time: (self.options.clock)(),
            message: message.into(),
            state: self.scratch.clone(),
        });
        trace!("commit {:?} on top of {:?}", id, self.head.id);
        let previous_head = std::mem::replace(&mut self.head, commit);
        self.undo_stack.push(previous_head);
        self.redo_stack.clear();
        id
    }

    /// Step the head back one commit. No-op when there is nothing to undo.
    pub fn undo(&mut self) {
        self.undo_to(0);
    }

    /// Unwind the head to the `n`-th most recent undo entry in one step,
    /// equivalent to `n + 1` consecutive [`undo`](Self::undo) calls.
    /// Out-of-range `n` is a no-op.
    pub fn undo_to(&mut self, n: usize) {
        if n >= self.undo_stack.len() {
            return;
        }
        trace!("undoing {} commits from {:?}", n + 1, self.head.id);
        self.redo_stack.push(Arc::clone(&self.head));
        for _ in 0..n {
            if let Some(skipped) = self.undo_stack.pop() {
                self.redo_stack.push(skipped);
            }
        }
        if let Some(commit) = self.undo_stack.pop() {
            self.head = commit;
            self.scratch = self.head.state.clone();
        }
    }

    /// Step the head forward one commit. No-op when there is nothing to
    /// redo.
    pub fn redo(&mut self) {
        self.redo_to(0);
    }

    /// Re-apply the `n`-th most recent redo entry in one step, equivalent
    /// to `n + 1` consecutive [`redo`](Self::redo) calls. Out-of-range `n`
    /// is a no-op.
    pub fn redo_to(&mut self, n: usize) {
        if n >= self.redo_stack.len() {
            return;
        }
        trace!("redoing {} commits from {:?}", n + 1, self.head.id);
        self.undo_stack.push(Arc::clone(&self.head));
        for _ in 0..n {
            if let Some(skipped) = self.redo_stack.pop() {
                self.undo_stack.push(skipped);
            }
        }
        if let Some(commit) = self.redo_stack.pop() {
            self.head = commit;
            self.scratch = self.head.state.clone();
        }
    }

    /// Discard uncommitted scratch mutations, re-seeding scratch from the
    /// head snapshot.
    pub fn rollback(&mut self) {
        self.scratch = self.head.state.clone();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// The `i`-th most recent undo entry; `undo_entry(0)` is the commit
    /// [`undo`](Self::undo) would restore. Out-of-range returns `None`.
    pub fn undo_entry(&self, i: usize) -> Option<&Commit<T>> {
        entry_from_top(&self.undo_stack, i)
    }

    /// The `i`-th most recent redo entry; `redo_entry(0)` is the commit
    /// [`redo`](Self::redo) would restore. Out-of-range returns `None`.
    pub fn redo_entry(&self, i: usize) -> Option<&Commit<T>> {
        entry_from_top(&self.redo_stack, i)
    }
}

fn entry_from_top<T>(stack: &[Arc<Commit<T>>], i: usize) -> Option<&Commit<T>> {
    stack
        .len()
        .checked_sub(1 + i)
        .and_then(|j| stack.get(j))
        .map(Arc::as_ref)
}
