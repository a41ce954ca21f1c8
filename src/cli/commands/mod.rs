mod init;
mod init_db;
mod load;
mod menu;
mod stats;

pub use init::cmd_init;
pub use init_db::cmd_init_db;
pub use load::cmd_load;
pub use menu::cmd_menu;
pub use stats::cmd_stats;
