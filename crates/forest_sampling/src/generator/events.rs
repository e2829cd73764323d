//! Event types and sinks for observing generation runs.
//!
//! Events are emitted from the single-threaded post-pass in block order, so a
//! sink sees the same sequence whether or not blocks were sampled in parallel.
use crate::design::SamplingType;
use crate::error::{Error, GenerationWarning};
use crate::generator::result::BlockSamplingInfo;

/// Describes events emitted by a generation run.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum DesignEvent {
    /// Emitted once the design has been validated and sampling begins.
    RunStarted {
        sampling_type: SamplingType,
        block_count: usize,
        seed: u64,
    },

    /// Emitted for every block that produced points.
    BlockSampled {
        index: usize,
        info: BlockSamplingInfo,
        /// First plot number assigned to this block, if it produced any points.
        first_plot_number: Option<u32>,
    },

    /// Emitted for a block that was skipped.
    BlockSkipped {
        index: usize,
        block: String,
        error: Error,
    },

    /// Non-fatal warning for a block.
    Warning(GenerationWarning),

    /// Emitted after numbering and aggregation.
    RunFinished {
        total_points: usize,
        total_blocks: usize,
        skipped_blocks: usize,
    },
}

/// Discriminant of [`DesignEvent`], used by sinks to filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DesignEventKind {
    RunStarted,
    BlockSampled,
    BlockSkipped,
    Warning,
    RunFinished,
}

impl DesignEvent {
    pub fn kind(&self) -> DesignEventKind {
        match self {
            DesignEvent::RunStarted { .. } => DesignEventKind::RunStarted,
            DesignEvent::BlockSampled { .. } => DesignEventKind::BlockSampled,
            DesignEvent::BlockSkipped { .. } => DesignEventKind::BlockSkipped,
            DesignEvent::Warning(_) => DesignEventKind::Warning,
            DesignEvent::RunFinished { .. } => DesignEventKind::RunFinished,
        }
    }
}

/// A generic event sink that accepts [`DesignEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: DesignEvent);

    /// Whether the sink cares about events of `kind`. Lets the generator skip
    /// building events nobody reads.
    #[inline]
    fn wants(&self, _kind: DesignEventKind) -> bool {
        true
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: DesignEvent) {}

    #[inline]
    fn wants(&self, _kind: DesignEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(DesignEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(DesignEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(DesignEvent),
{
    #[inline]
    fn send(&mut self, event: DesignEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<DesignEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn into_inner(self) -> Vec<DesignEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[DesignEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: DesignEvent) {
        self.events.push(event);
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn into_inner(self) -> Vec<S> {
        self.sinks
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: DesignEvent) {
        let Some((last, rest)) = self.sinks.split_last_mut() else {
            return;
        };
        for sink in rest {
            if sink.wants(event.kind()) {
                sink.send(event.clone());
            }
        }
        if last.wants(event.kind()) {
            last.send(event);
        }
    }

    fn wants(&self, kind: DesignEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warning(block: &str) -> DesignEvent {
        DesignEvent::Warning(GenerationWarning::PartialGeneration {
            block: block.into(),
            requested: 5,
            achieved: 3,
            minimum: 5,
        })
    }

    #[test]
    fn unit_sink_wants_nothing() {
        assert!(!().wants(DesignEventKind::Warning));
    }

    #[test]
    fn vec_sink_collects_events() {
        let mut sink = VecSink::new();
        assert!(sink.is_empty());
        sink.send(warning("a"));
        sink.send(warning("b"));
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.as_slice()[1].kind(), DesignEventKind::Warning);
    }

    #[test]
    fn multi_sink_fans_out_events() {
        let mut multi = MultiSink::with_sinks(vec![VecSink::new(), VecSink::new()]);
        multi.send(warning("ctx"));
        let sinks = multi.into_inner();
        assert_eq!(sinks.len(), 2);
        assert_eq!(sinks[0].len(), 1);
        assert_eq!(sinks[1].len(), 1);
        assert_eq!(sinks[0].as_slice(), sinks[1].as_slice());
    }

    #[test]
    fn multi_sink_respects_member_filters() {
        struct OnlyFinished(usize);
        impl EventSink for OnlyFinished {
            fn send(&mut self, _event: DesignEvent) {
                self.0 += 1;
            }
            fn wants(&self, kind: DesignEventKind) -> bool {
                kind == DesignEventKind::RunFinished
            }
        }

        let mut multi = MultiSink::with_sinks(vec![OnlyFinished(0)]);
        assert!(!multi.wants(DesignEventKind::Warning));
        multi.send(warning("x"));
        multi.send(DesignEvent::RunFinished {
            total_points: 0,
            total_blocks: 0,
            skipped_blocks: 0,
        });
        assert_eq!(multi.into_inner()[0].0, 1);
    }

    #[test]
    fn fn_sink_invokes_callback() {
        let mut count = 0;
        let mut sink = FnSink::new(|_event| {
            count += 1;
        });
        sink.send(warning("ctx"));
        assert_eq!(count, 1);
    }
}
