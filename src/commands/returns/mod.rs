pub mod approve_return_command;
pub mod inspect_return_command;
pub mod reject_return_command;

pub use approve_return_command::ApproveReturnCommand;
pub use inspect_return_command::InspectReturnCommand;
pub use reject_return_command::RejectReturnCommand;
