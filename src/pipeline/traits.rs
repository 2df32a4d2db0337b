use crate::alignment::timing::AsrCursor;
use crate::types::{Chunk, TimeSpan, TimingSource};

/// One rung of the fallback ladder that times chunks from ASR evidence.
///
/// `cursor` is the explicit incremental state shared with the proportional
/// fallback; implementations that consume ASR words must advance it.
pub trait TimingResolver {
    fn resolve(&mut self, chunk: &Chunk, cursor: &mut AsrCursor) -> Option<TimeSpan>;

    fn source(&self) -> TimingSource;

    /// First ASR index already claimed by a chunk after `chunk`, if the
    /// resolver knows one. Fallback estimates must stay before it.
    fn next_anchor(&self, _chunk: &Chunk) -> Option<usize> {
        None
    }
}
