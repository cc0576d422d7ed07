pub mod approve_disposal_command;
pub mod create_disposal_command;
pub mod execute_disposal_command;
pub mod reject_disposal_command;

pub use approve_disposal_command::ApproveDisposalCommand;
pub use create_disposal_command::CreateDisposalCommand;
pub use execute_disposal_command::ExecuteDisposalCommand;
pub use reject_disposal_command::RejectDisposalCommand;
