//! Planning and execution of reservation operations.
//!
//! Every mutating command follows the same two-phase shape: a planner
//! computes an [`OperationPlan`] against one service snapshot, and the
//! [`PlanExecutor`] applies the whole plan in a single transaction. The
//! split keeps the decision logic pure and testable, makes dry-run a
//! property of execution rather than of every command, and lets storage
//! re-validate the plan's preconditions at write time.

mod assign;
mod book;
mod executor;
mod plan;
mod promote;
mod service;

pub use assign::{plan_assign, plan_auto_assign, plan_auto_assign_pending, AssignRequest};
pub use book::{plan_booking, BookingOutcome, BookingRequest};
pub use executor::{ExecutionResult, PlanExecutor};
pub use plan::{OperationPlan, PlanAction};
pub use promote::plan_promote;
pub use service::{
    plan_cancel, plan_check_in, plan_save_blocks, plan_undo_check_in,
};
