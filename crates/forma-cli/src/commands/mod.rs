pub mod delete;
pub mod dispatch;
pub mod import;
pub mod list;
pub mod preview;
pub mod show;
