//! View Components
//!
//! Deterministic rendering driven by the sync engine's state snapshots.

mod auth_card;
mod create_task_modal;
mod sidebar_menu;
mod status_message;
mod task_board;
mod task_form;
mod task_item;

pub use auth_card::AuthCard;
pub use create_task_modal::CreateTaskModal;
pub use sidebar_menu::SidebarMenu;
pub use status_message::StatusMessage;
pub use task_board::TaskBoard;
