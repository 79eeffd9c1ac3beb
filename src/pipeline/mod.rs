//! Batch map-group-reduce pipeline
//!
//! A [`Strategy`] emits [`Job`]s, every job turns its input into [`Pair`]s,
//! the pairs are grouped by key into a [`GroupedResult`], and the strategy
//! reports that result. The [`Scheduler`] drives those four stages in order.

pub mod group;
pub mod job;
pub mod memory;
pub mod pair;
pub mod report;
pub mod scheduler;
pub mod stage;
pub mod strategy;

pub use group::GroupedResult;
pub use job::{BoxedJob, FnJob, Job, JobStream, PairStream};
pub use memory::{MemoryJob, MemoryStrategy, OutputSink};
pub use pair::Pair;
pub use report::{JobFailure, RunReport};
pub use scheduler::{FailurePolicy, Scheduler, SchedulerOptions};
pub use strategy::Strategy;
