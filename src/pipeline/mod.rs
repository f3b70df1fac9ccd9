//! The end-to-end seed pipeline
//!
//! One sequential producer (dump read → parse → assemble → chunk) feeds a
//! bounded pool of concurrent embed-and-store workers:
//!
//! ```text
//! dump file ──► WikimediaSource ──► ChunkSplitter ──► DispatchPool ──► workers
//!   (bz2)        (one article         (chunks in       (at most N      (embed,
//!                 at a time)           doc order)       in flight)      upsert)
//! ```
//!
//! Backpressure flows the other way: when all pool slots are taken the
//! producer stalls, so in-flight work stays bounded no matter how slow the
//! embedding service is. The run completes only after the pool has drained.

mod driver;
mod pool;
mod worker;

pub use driver::{PipelineError, RunReport, SeedPipeline};
pub use pool::DispatchPool;
pub use worker::RunCounters;
