pub mod item_ctx;
pub mod item_flow;
pub mod policy;

pub use item_ctx::ItemCtx;
pub use item_flow::{Completion, ItemFlow, ItemOutcome};
pub use policy::{PollPolicy, RetryPolicy};
