//! Debounced query pipeline.
//!
//! Raw field text goes in through [`SuggestionPipeline::push_input`], which
//! returns a tick command. Each push bumps a tag; when the tick comes back only
//! the tick carrying the latest tag triggers a recompute, so a burst of
//! keystrokes yields one filter pass over the last text. This is the same
//! id/tag scheme the timer and cursor components use to drop stale ticks.
//!
//! A recompute scans the candidate source in order, keeps items that are not
//! excluded and whose normalized display text contains the normalized query,
//! and stops at the suggestion limit. While a streaming source is still open
//! the scan stays pending and resumes as items arrive; it publishes once the
//! limit is reached or the stream ends. A newer trigger replaces a pending scan
//! outright.
//!
//! The pipeline also holds the all-matches snapshot used for identity lookups,
//! and a FIFO of tasks waiting for that snapshot.

use super::source::CandidateSource;
use super::types::{same_identity, Candidate, DebounceMsg, FieldNames, Identity};
use crate::normalize::{contains_normalized, normalize};
use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};
use std::collections::VecDeque;
use std::ops::Deref;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

// Used to ensure that debounce ticks are only received by the pipeline that sent them.
static LAST_ID: AtomicUsize = AtomicUsize::new(0);

fn next_id() -> usize {
    LAST_ID.fetch_add(1, Ordering::Relaxed) + 1
}

/// An immutable, ranked list of matches.
///
/// Cloning is cheap; a published list is never modified in place.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchList(Arc<[Candidate]>);

impl MatchList {
    fn new(items: Vec<Candidate>) -> Self {
        Self(items.into())
    }
}

impl Default for MatchList {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Deref for MatchList {
    type Target = [Candidate];

    fn deref(&self) -> &[Candidate] {
        &self.0
    }
}

/// Decides whether a candidate may be suggested.
#[derive(Debug, Clone, Copy)]
pub struct MatchFilter<'a> {
    /// Field names for reading records.
    pub fields: &'a FieldNames,
    /// Identities already selected.
    pub excluded: &'a [Identity],
}

impl MatchFilter<'_> {
    /// True when `candidate` is not excluded and contains `query`.
    ///
    /// `query` must already be normalized.
    pub fn passes(&self, candidate: &Candidate, query: &str) -> bool {
        let identity = candidate.identity(self.fields);
        if self.excluded.iter().any(|e| same_identity(e, &identity)) {
            return false;
        }
        contains_normalized(&candidate.display_name(self.fields), query)
    }
}

/// Work waiting for the all-matches snapshot.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DeferredTask {
    /// Check an externally written value against the snapshot.
    ValidateValue,
    /// Typed text to commit by name.
    CommitText(String),
    /// Refresh the single-mode field text from the value.
    SyncDisplay,
}

#[derive(Debug, Clone)]
struct PendingQuery {
    query: String,
    scanned: usize,
    found: Vec<Candidate>,
}

/// Debounced, last-write-wins suggestion matching.
#[derive(Debug)]
pub struct SuggestionPipeline {
    id: usize,
    tag: usize,
    released: bool,
    type_delay: Duration,
    limit: Option<usize>,
    latest: String,
    pending: Option<PendingQuery>,
    matches: MatchList,
    snapshot: Option<Arc<[Candidate]>>,
    deferred: VecDeque<DeferredTask>,
    recomputes: usize,
}

impl SuggestionPipeline {
    /// A pipeline with the given debounce interval and bound (`None` = unbounded).
    pub fn new(type_delay: Duration, limit: Option<usize>) -> Self {
        Self {
            id: next_id(),
            tag: 0,
            released: false,
            type_delay,
            limit,
            latest: String::new(),
            pending: None,
            matches: MatchList::default(),
            snapshot: None,
            deferred: VecDeque::new(),
            recomputes: 0,
        }
    }

    /// Instance id carried by this pipeline's ticks.
    pub fn id(&self) -> usize {
        self.id
    }

    /// The latest published matches.
    pub fn matches(&self) -> MatchList {
        self.matches.clone()
    }

    /// The raw text most recently pushed.
    pub fn latest_input(&self) -> &str {
        &self.latest
    }

    /// Whether a triggered query is still waiting on the stream.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// How many recomputes have run.
    pub fn recomputes(&self) -> usize {
        self.recomputes
    }

    /// The full candidate set, once the source has finished.
    pub fn snapshot(&self) -> Option<&[Candidate]> {
        self.snapshot.as_deref()
    }

    /// Records new raw text and schedules a debounced recompute.
    ///
    /// Returns `None` after [`release`](Self::release).
    pub fn push_input(&mut self, raw: &str) -> Option<Cmd> {
        if self.released {
            return None;
        }
        self.tag = self.tag.wrapping_add(1);
        self.latest = raw.to_string();

        let id = self.id;
        let tag = self.tag;
        Some(bubbletea_tick(self.type_delay, move |_| {
            Box::new(DebounceMsg { id, tag }) as Msg
        }))
    }

    /// The tick the most recent push will deliver.
    #[cfg(test)]
    pub(crate) fn latest_tick(&self) -> DebounceMsg {
        DebounceMsg {
            id: self.id,
            tag: self.tag,
        }
    }

    /// Whether `msg` is the tick of the most recent push.
    pub(crate) fn accepts(&self, msg: &DebounceMsg) -> bool {
        !self.released && msg.id == self.id && msg.tag == self.tag
    }

    /// Starts a recompute for the latest input, replacing any pending one.
    ///
    /// Returns true if a new list was published.
    pub fn trigger(&mut self, source: &CandidateSource, filter: MatchFilter<'_>) -> bool {
        self.recomputes += 1;
        let query = normalize(&self.latest);
        tracing::debug!(pipeline = self.id, query = %query, "recomputing matches");
        self.pending = Some(PendingQuery {
            query,
            scanned: 0,
            found: Vec::new(),
        });
        self.advance(source, filter)
    }

    /// Resumes a pending scan after new items arrived.
    pub fn on_arrival(&mut self, source: &CandidateSource, filter: MatchFilter<'_>) -> bool {
        self.advance(source, filter)
    }

    /// Captures the finished source as the snapshot and settles any pending scan.
    pub fn on_complete(&mut self, source: &CandidateSource, filter: MatchFilter<'_>) -> bool {
        self.snapshot = Some(source.items().into());
        self.advance(source, filter)
    }

    fn advance(&mut self, source: &CandidateSource, filter: MatchFilter<'_>) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            return false;
        };

        let items = source.items();
        let mut full = self.limit.is_some_and(|limit| pending.found.len() >= limit);
        while !full && pending.scanned < items.len() {
            let candidate = &items[pending.scanned];
            pending.scanned += 1;
            if filter.passes(candidate, &pending.query) {
                pending.found.push(candidate.clone());
                full = self.limit.is_some_and(|limit| pending.found.len() >= limit);
            }
        }

        if !full && !source.is_ready() {
            return false;
        }

        if let Some(done) = self.pending.take() {
            tracing::debug!(pipeline = self.id, count = done.found.len(), "publishing matches");
            self.matches = MatchList::new(done.found);
        }
        true
    }

    /// Changes the debounce interval and the bound. Takes effect on the next
    /// push and trigger.
    pub fn configure(&mut self, type_delay: Duration, limit: Option<usize>) {
        self.type_delay = type_delay;
        self.limit = limit;
    }

    /// Queues work until the snapshot is ready.
    pub(crate) fn defer(&mut self, task: DeferredTask) {
        self.deferred.push_back(task);
    }

    /// Takes the oldest deferred task.
    pub(crate) fn take_deferred(&mut self) -> Option<DeferredTask> {
        self.deferred.pop_front()
    }

    /// Number of tasks waiting for the snapshot.
    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    /// Forgets everything derived from the previous source.
    ///
    /// Stale ticks are invalidated; deferred tasks are kept so they resolve
    /// against the new source.
    pub(crate) fn reset(&mut self) {
        self.tag = self.tag.wrapping_add(1);
        self.pending = None;
        self.matches = MatchList::default();
        self.snapshot = None;
    }

    /// Stops accepting ticks. Used on teardown.
    pub fn release(&mut self) {
        self.released = true;
        self.tag = self.tag.wrapping_add(1);
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typeahead::types::SourceEvent;
    use serde_json::json;

    fn fields() -> FieldNames {
        FieldNames::default()
    }

    fn fruit() -> CandidateSource {
        CandidateSource::from_list(["Apple", "Apricot", "Banana", "Cherry", "Pineapple"])
    }

    fn names(list: &MatchList) -> Vec<String> {
        list.iter().map(|c| c.display_name(&fields())).collect()
    }

    #[test]
    fn test_substring_match_in_source_order() {
        let f = fields();
        let source = fruit();
        let mut p = SuggestionPipeline::new(Duration::ZERO, None);
        let _ = p.push_input("ap");
        assert!(p.trigger(&source, MatchFilter { fields: &f, excluded: &[] }));
        assert_eq!(names(&p.matches()), vec!["Apple", "Apricot", "Pineapple"]);
    }

    #[test]
    fn test_limit_bounds_result() {
        let f = fields();
        let source = fruit();
        let mut p = SuggestionPipeline::new(Duration::ZERO, Some(2));
        let _ = p.push_input("");
        p.trigger(&source, MatchFilter { fields: &f, excluded: &[] });
        assert_eq!(names(&p.matches()), vec!["Apple", "Apricot"]);
    }

    #[test]
    fn test_excluded_identities_skipped() {
        let f = fields();
        let source = fruit();
        let mut p = SuggestionPipeline::new(Duration::ZERO, None);
        let _ = p.push_input("ap");
        let excluded = [json!("apple")];
        p.trigger(&source, MatchFilter { fields: &f, excluded: &excluded });
        assert_eq!(names(&p.matches()), vec!["Apricot", "Pineapple"]);
    }

    #[test]
    fn test_accent_insensitive_query() {
        let f = fields();
        let source = CandidateSource::from_list(["Café", "Tea"]);
        let mut p = SuggestionPipeline::new(Duration::ZERO, None);
        let _ = p.push_input("CAFE ");
        p.trigger(&source, MatchFilter { fields: &f, excluded: &[] });
        assert_eq!(names(&p.matches()), vec!["Café"]);
    }

    #[test]
    fn test_only_latest_tick_accepted() {
        let mut p = SuggestionPipeline::new(Duration::from_millis(50), None);
        let _ = p.push_input("a");
        let first = DebounceMsg { id: p.id(), tag: p.tag };
        let _ = p.push_input("ap");
        let _ = p.push_input("app");
        let last = DebounceMsg { id: p.id(), tag: p.tag };

        assert!(!p.accepts(&first));
        assert!(p.accepts(&last));
        assert_eq!(p.latest_input(), "app");
        assert!(!p.accepts(&DebounceMsg { id: p.id() + 1000, tag: p.tag }));
    }

    #[test]
    fn test_released_pipeline_ignores_input() {
        let mut p = SuggestionPipeline::new(Duration::ZERO, None);
        let _ = p.push_input("a");
        let tick = DebounceMsg { id: p.id(), tag: p.tag };
        p.release();
        assert!(!p.accepts(&tick));
        assert!(p.push_input("b").is_none());
    }

    #[test]
    fn test_pending_scan_waits_for_stream() {
        let f = fields();
        let (_tx, mut source) = CandidateSource::channel();
        let mut p = SuggestionPipeline::new(Duration::ZERO, Some(2));
        let _ = p.push_input("a");
        let filter = MatchFilter { fields: &f, excluded: &[] };

        assert!(!p.trigger(&source, filter));
        assert!(p.is_pending());

        source.apply(SourceEvent::Item("Apple".into()));
        assert!(!p.on_arrival(&source, filter));
        assert!(p.matches().is_empty());

        source.apply(SourceEvent::Item("Kiwi".into()));
        source.apply(SourceEvent::Item("Banana".into()));
        assert!(p.on_arrival(&source, filter));
        assert_eq!(names(&p.matches()), vec!["Apple", "Banana"]);
        assert!(!p.is_pending());
        assert!(p.snapshot().is_none());
    }

    #[test]
    fn test_completion_settles_pending_and_snapshots() {
        let f = fields();
        let (_tx, mut source) = CandidateSource::channel();
        let mut p = SuggestionPipeline::new(Duration::ZERO, Some(10));
        let _ = p.push_input("");
        let filter = MatchFilter { fields: &f, excluded: &[] };
        p.trigger(&source, filter);

        source.apply(SourceEvent::Item("Kiwi".into()));
        p.on_arrival(&source, filter);
        source.apply(SourceEvent::Completed);
        assert!(p.on_complete(&source, filter));
        assert_eq!(names(&p.matches()), vec!["Kiwi"]);
        assert_eq!(p.snapshot().map(|s| s.len()), Some(1));
    }

    #[test]
    fn test_newer_trigger_supersedes_pending() {
        let f = fields();
        let (_tx, mut source) = CandidateSource::channel();
        let mut p = SuggestionPipeline::new(Duration::ZERO, None);
        let filter = MatchFilter { fields: &f, excluded: &[] };

        let _ = p.push_input("app");
        p.trigger(&source, filter);
        let _ = p.push_input("ban");
        p.trigger(&source, filter);

        source.apply(SourceEvent::Item("Apple".into()));
        source.apply(SourceEvent::Item("Banana".into()));
        source.apply(SourceEvent::Completed);
        p.on_complete(&source, filter);
        assert_eq!(names(&p.matches()), vec!["Banana"]);
    }

    #[test]
    fn test_deferred_fifo() {
        let mut p = SuggestionPipeline::new(Duration::ZERO, None);
        p.defer(DeferredTask::CommitText("a".into()));
        p.defer(DeferredTask::SyncDisplay);
        assert_eq!(p.deferred_len(), 2);
        assert_eq!(p.take_deferred(), Some(DeferredTask::CommitText("a".into())));
        assert_eq!(p.take_deferred(), Some(DeferredTask::SyncDisplay));
        assert_eq!(p.take_deferred(), None);
    }

    #[test]
    fn test_published_list_is_a_snapshot() {
        let f = fields();
        let source = fruit();
        let mut p = SuggestionPipeline::new(Duration::ZERO, None);
        let _ = p.push_input("apple");
        p.trigger(&source, MatchFilter { fields: &f, excluded: &[] });
        let before = p.matches();
        let _ = p.push_input("cherry");
        p.trigger(&source, MatchFilter { fields: &f, excluded: &[] });
        assert_eq!(names(&before), vec!["Apple", "Pineapple"]);
        assert_eq!(names(&p.matches()), vec!["Cherry"]);
    }
}
