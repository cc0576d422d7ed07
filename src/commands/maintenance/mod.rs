pub mod cancel_maintenance_command;
pub mod complete_maintenance_command;
pub mod create_maintenance_command;
pub mod schedule_maintenance_command;
pub mod start_maintenance_command;

pub use cancel_maintenance_command::CancelMaintenanceCommand;
pub use complete_maintenance_command::CompleteMaintenanceCommand;
pub use create_maintenance_command::CreateMaintenanceCommand;
pub use schedule_maintenance_command::ScheduleMaintenanceCommand;
pub use start_maintenance_command::StartMaintenanceCommand;
