pub mod archive_warehouse_command;
pub mod create_warehouse_command;
pub mod replace_warehouse_command;

pub use archive_warehouse_command::ArchiveWarehouseCommand;
pub use create_warehouse_command::CreateWarehouseCommand;
pub use replace_warehouse_command::{ReplaceWarehouseCommand, WarehouseReplacement};
