//! Shared message rendering used by the channel feed, search results and
//! the thread panel

use archivist_protocol::Message;
use chrono::{DateTime, Local, Utc};
use eframe::egui;

use super::theme;

/// Actions that can be triggered from a message
pub enum MessageAction {
    /// Open the thread rooted at this message
    OpenThread(Message),
}

/// Options for rendering a message
pub struct MessageRenderOptions {
    /// Whether to show the "N replies" link
    pub show_thread_indicator: bool,
    /// Prefix for egui IDs to avoid conflicts
    pub id_prefix: &'static str,
}

impl Default for MessageRenderOptions {
    fn default() -> Self {
        Self {
            show_thread_indicator: true,
            id_prefix: "chat",
        }
    }
}

fn to_datetime(timestamp: f64) -> Option<DateTime<Utc>> {
    let secs = timestamp.floor();
    let nanos = ((timestamp - secs) * 1e9) as u32;
    DateTime::from_timestamp(secs as i64, nanos)
}

/// The backend's rendering of the timestamp, or a local one when absent
pub fn display_time(message: &Message) -> String {
    if !message.formatted_timestamp.is_empty() {
        return message.formatted_timestamp.clone();
    }
    to_datetime(message.timestamp)
        .map(|t| t.with_timezone(&Local).format("%b %d, %Y %H:%M").to_string())
        .unwrap_or_default()
}

/// Format a full timestamp for tooltip
pub fn full_time(message: &Message) -> String {
    to_datetime(message.timestamp)
        .map(|t| t.with_timezone(&Local).format("%B %d, %Y at %I:%M:%S %p").to_string())
        .unwrap_or_else(|| message.timestamp.to_string())
}

pub fn replies_label(count: i64) -> String {
    match count {
        1 => "1 reply".to_string(),
        n => format!("{} replies", n),
    }
}

/// Render a single message. Returns an action if the user triggered one.
pub fn render_message(
    ui: &mut egui::Ui,
    message: &Message,
    options: &MessageRenderOptions,
) -> Option<MessageAction> {
    let mut action = None;

    ui.push_id(
        (options.id_prefix, &message.channel_id, &message.user_id, message.timestamp.to_bits()),
        |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(message.user.label()).strong().color(theme::AUTHOR));
                ui.label(
                    egui::RichText::new(display_time(message))
                        .small()
                        .color(theme::TEXT_MUTED),
                )
                .on_hover_text(full_time(message));
            });

            ui.indent("msg_content", |ui| {
                ui.label(&message.text);
            });

            if options.show_thread_indicator && message.has_replies() {
                let link = ui.add(
                    egui::Label::new(
                        egui::RichText::new(replies_label(message.thread_count))
                            .small()
                            .color(theme::TEXT_LINK),
                    )
                    .sense(egui::Sense::click()),
                );
                if link.on_hover_cursor(egui::CursorIcon::PointingHand).clicked() {
                    action = Some(MessageAction::OpenThread(message.clone()));
                }
            }
        },
    );

    ui.add_space(8.0);
    action
}
