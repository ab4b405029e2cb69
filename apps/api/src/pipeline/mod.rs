//! The recruitment pipeline core: phases, session state, batch fan-out,
//! ranking, and the per-phase workflows that tie them to the evaluator.

pub mod batch;
pub mod handlers;
pub mod phase;
pub mod ranking;
pub mod session;
pub mod workflow;
