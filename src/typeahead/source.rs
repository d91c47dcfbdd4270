//! Where suggestions come from.
//!
//! A [`CandidateSource`] is either a finite list, ready at once, or the
//! receiving end of a channel fed by an asynchronous producer. Streaming items
//! are appended to a single backing sequence in arrival order, so every
//! filtered view derived from it observes exactly the items that end up in the
//! final set. The sequence is frozen once the producer finishes or fails.
//!
//! # Streaming
//!
//! ```rust
//! use bubbletea_typeahead::typeahead::{Candidate, CandidateSource};
//!
//! let (tx, source) = CandidateSource::channel();
//! tx.send(Candidate::record(1, "Apple")).unwrap();
//! tx.send(Candidate::record(2, "Banana")).unwrap();
//! drop(tx); // completes the stream
//! assert!(!source.is_ready());
//! ```
//!
//! The owning component pulls emissions through [`CandidateSource::pull`], a
//! command resolving to a `SourceMsg` that the runtime routes back into
//! `update`.

use super::types::{Candidate, SourceEvent, SourceMsg};
use crate::error::{Result, TypeaheadError};
use bubbletea_rs::{Cmd, Msg};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, watch, Mutex};

// Used to ensure that source messages are only received by the source that sent them.
static LAST_ID: AtomicUsize = AtomicUsize::new(0);

fn next_id() -> usize {
    LAST_ID.fetch_add(1, Ordering::Relaxed) + 1
}

/// Lifecycle of the backing sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceState {
    /// The producer may still append items.
    Streaming,
    /// All items have arrived.
    Complete,
    /// The producer failed; the items received so far are all there will be.
    Failed(String),
    /// The control let go of the stream before it finished.
    Released,
}

/// What applying a source message changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Progress {
    /// One item was appended; more may follow.
    Appended,
    /// The sequence is now frozen.
    Finished,
}

#[derive(Debug)]
struct StreamLink {
    rx: Arc<Mutex<mpsc::UnboundedReceiver<SourceEvent>>>,
    release: watch::Sender<bool>,
}

/// A finite or streaming set of candidates.
#[derive(Debug)]
pub struct CandidateSource {
    id: usize,
    items: Vec<Candidate>,
    state: SourceState,
    link: Option<StreamLink>,
}

/// Producer half of a streaming source.
///
/// Dropping the sender completes the stream.
#[derive(Debug, Clone)]
pub struct CandidateSender {
    tx: mpsc::UnboundedSender<SourceEvent>,
}

impl CandidateSender {
    /// Appends one candidate to the stream.
    ///
    /// # Errors
    ///
    /// [`TypeaheadError::SourceClosed`] once the control has released the stream.
    pub fn send(&self, candidate: impl Into<Candidate>) -> Result<()> {
        self.tx
            .send(SourceEvent::Item(candidate.into()))
            .map_err(|_| TypeaheadError::SourceClosed)
    }

    /// Ends the stream with a failure. Items already sent are kept.
    pub fn fail(self, reason: impl Into<String>) -> Result<()> {
        self.tx
            .send(SourceEvent::Failed(reason.into()))
            .map_err(|_| TypeaheadError::SourceClosed)
    }

    /// Whether the receiving control has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl CandidateSource {
    /// A finite source, ready immediately.
    pub fn from_list<I, C>(items: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Candidate>,
    {
        Self {
            id: next_id(),
            items: items.into_iter().map(Into::into).collect(),
            state: SourceState::Complete,
            link: None,
        }
    }

    /// A streaming source and the sender that feeds it.
    pub fn channel() -> (CandidateSender, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (release, _) = watch::channel(false);
        let source = Self {
            id: next_id(),
            items: Vec::new(),
            state: SourceState::Streaming,
            link: Some(StreamLink {
                rx: Arc::new(Mutex::new(rx)),
                release,
            }),
        };
        (CandidateSender { tx }, source)
    }

    /// Instance id carried by this source's messages.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Current lifecycle state.
    pub fn state(&self) -> &SourceState {
        &self.state
    }

    /// Whether the backing sequence is frozen and safe to snapshot.
    pub fn is_ready(&self) -> bool {
        matches!(self.state, SourceState::Complete | SourceState::Failed(_))
    }

    /// The backing sequence so far, in arrival order.
    pub fn items(&self) -> &[Candidate] {
        &self.items
    }

    /// A lazy view over the current backing sequence.
    ///
    /// Re-derived per call, so items that arrived since a previous call are
    /// included.
    pub fn filtered_view<'a, P>(&'a self, predicate: P) -> impl Iterator<Item = &'a Candidate> + 'a
    where
        P: Fn(&Candidate) -> bool + 'a,
    {
        self.items.iter().filter(move |c| predicate(c))
    }

    /// A command waiting for the next emission, or `None` when nothing more
    /// can arrive.
    pub fn pull(&self) -> Option<Cmd> {
        if self.state != SourceState::Streaming {
            return None;
        }
        let link = self.link.as_ref()?;
        let id = self.id;
        let rx = Arc::clone(&link.rx);
        let mut released = link.release.subscribe();

        Some(Box::pin(async move {
            let already_released = *released.borrow_and_update();
            if already_released {
                return None;
            }
            let mut rx = rx.lock().await;
            let event = tokio::select! {
                _ = released.changed() => None,
                event = rx.recv() => Some(event.unwrap_or(SourceEvent::Completed)),
            };
            event.map(|event| Box::new(SourceMsg { id, event }) as Msg)
        }))
    }

    /// Whether `msg` came from this source and the source still listens.
    pub(crate) fn accepts(&self, msg: &SourceMsg) -> bool {
        msg.id == self.id && self.state == SourceState::Streaming
    }

    /// Applies one emission to the backing sequence.
    pub(crate) fn apply(&mut self, event: SourceEvent) -> Progress {
        match event {
            SourceEvent::Item(candidate) => {
                self.items.push(candidate);
                Progress::Appended
            }
            SourceEvent::Completed => {
                tracing::debug!(source = self.id, items = self.items.len(), "candidate stream completed");
                self.state = SourceState::Complete;
                self.link = None;
                Progress::Finished
            }
            SourceEvent::Failed(reason) => {
                tracing::warn!(
                    source = self.id,
                    items = self.items.len(),
                    %reason,
                    "candidate stream failed, keeping partial set"
                );
                self.state = SourceState::Failed(reason);
                self.link = None;
                Progress::Finished
            }
        }
    }

    /// Stops listening to the producer.
    ///
    /// Any in-flight [`pull`](Self::pull) resolves to nothing and further sends
    /// fail with [`TypeaheadError::SourceClosed`].
    pub fn release(&mut self) {
        if let Some(link) = self.link.take() {
            link.release.send_replace(true);
            if let Ok(mut rx) = link.rx.try_lock() {
                rx.close();
            }
        }
        if self.state == SourceState::Streaming {
            self.state = SourceState::Released;
        }
    }
}

impl Drop for CandidateSource {
    fn drop(&mut self) {
        self.release();
    }
}
