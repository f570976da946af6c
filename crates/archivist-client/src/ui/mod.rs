mod app;
mod channel_list;
mod chat;
mod main_view;
mod message;
mod search_bar;
mod search_results;
pub mod theme;
mod thread_panel;

pub use app::ArchivistApp;
