//! Custom widgets for the TUI

pub mod input_box;
pub mod message_list;
pub mod plan_panel;
pub mod spinner;

pub use input_box::InputBox;
pub use message_list::MessageList;
pub use plan_panel::PlanPanel;
pub use spinner::Spinner;
