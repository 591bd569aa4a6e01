//! Command implementations for the mesa CLI.

mod assign;
mod autoassign;
mod availability;
mod block;
mod book;
mod cancel;
mod checkin;
mod init;
mod list;
mod promote;
mod tables;
mod waitlist;

pub use assign::AssignCommand;
pub use autoassign::AutoAssignCommand;
pub use availability::AvailabilityCommand;
pub use block::BlockCommand;
pub use book::BookCommand;
pub use cancel::CancelCommand;
pub use checkin::CheckInCommand;
pub use init::InitCommand;
pub use list::ListCommand;
pub use promote::PromoteCommand;
pub use tables::TablesCommand;
pub use waitlist::WaitlistCommand;
