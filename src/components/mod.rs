//! UI Components
//!
//! One module per view plus the small shared pieces they are built from.

mod delete_confirm_button;
mod toast_stack;
mod nav_bar;
mod login_form;
mod task_form;
mod kanban_board;
mod calendar_view;
mod timeline_view;
mod list_view;
mod project_tree;
mod notification_list;
mod messaging_view;
mod pomodoro_panel;
mod file_explorer;
mod file_details;
mod admin_console;
mod admin_users;
mod admin_settings;
mod settings_panel;

pub use delete_confirm_button::DeleteConfirmButton;
pub use toast_stack::ToastStack;
pub use nav_bar::NavBar;
pub use login_form::LoginForm;
pub use task_form::{TaskForm, TaskFormMode};
pub use kanban_board::{handle_card_drop, KanbanBoard};
pub use calendar_view::CalendarView;
pub use timeline_view::TimelineView;
pub use list_view::ListView;
pub use project_tree::ProjectTree;
pub use notification_list::NotificationList;
pub use messaging_view::MessagingView;
pub use pomodoro_panel::{start_pomodoro_clock, PomodoroPanel};
pub use file_explorer::FileExplorer;
pub use file_details::FileDetails;
pub use admin_console::{run_admin_call, AdminConsole};
pub use admin_users::{RoleTable, UserTable};
pub use admin_settings::SettingsTable;
pub use settings_panel::SettingsPanel;
