pub mod activate_assignment_command;
pub mod approve_assignment_command;
pub mod cancel_assignment_command;
pub mod create_assignment_command;
pub mod return_assignment_command;

pub use activate_assignment_command::ActivateAssignmentCommand;
pub use approve_assignment_command::ApproveAssignmentCommand;
pub use cancel_assignment_command::CancelAssignmentCommand;
pub use create_assignment_command::CreateAssignmentCommand;
pub use return_assignment_command::{ReturnAssignmentCommand, ReturnAssignmentResult};
