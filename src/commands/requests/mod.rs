pub mod add_comment_command;
pub mod approve_request_command;
pub mod cancel_request_command;
pub mod complete_request_command;
pub mod reject_request_command;
pub mod request_changes_command;
pub mod start_review_command;
pub mod submit_request_command;
pub mod update_request_command;

pub use add_comment_command::AddCommentCommand;
pub use approve_request_command::ApproveRequestCommand;
pub use cancel_request_command::CancelRequestCommand;
pub use complete_request_command::CompleteRequestCommand;
pub use reject_request_command::RejectRequestCommand;
pub use request_changes_command::RequestChangesCommand;
pub use start_review_command::StartReviewCommand;
pub use submit_request_command::SubmitRequestCommand;
pub use update_request_command::UpdateRequestCommand;
