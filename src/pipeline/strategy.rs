use super::group::GroupedResult;
use super::job::JobStream;
use crate::error::Result;

/// Emission and output policy for one kind of run
///
/// `emit` decides which units of work exist; `output` performs the terminal
/// side effect on the grouped result. An `Err` from `emit` is reported by the
/// scheduler and the run continues with no jobs; an `Err` from `output` ends
/// the run.
pub trait Strategy<K, V>: Send + Sync {
    /// Short name used in logs and run reports
    fn name(&self) -> String;

    fn emit(&self) -> Result<JobStream<K, V>>;

    /// Report the grouped result. Must accept an empty result.
    fn output(&self, grouped: GroupedResult<K, V>) -> Result<()>;
}
