use archivist_protocol::Message;
use eframe::egui;

use crate::chat::{ScrollAnchor, ScrollContainer, ScrollOutcome};
use crate::state::FeedStamp;
use crate::workspace::Workspace;

use super::message::{render_message, MessageAction, MessageRenderOptions};
use super::theme;

/// Geometry of the message `ScrollArea` after a layout pass. Offsets written
/// here are applied on the next frame.
struct Viewport {
    content: f32,
    visible: f32,
    top: f32,
    requested: Option<f32>,
}

impl ScrollContainer for Viewport {
    fn scroll_height(&self) -> f32 {
        self.content
    }

    fn client_height(&self) -> f32 {
        self.visible
    }

    fn scroll_top(&self) -> f32 {
        self.top
    }

    fn set_scroll_top(&mut self, offset: f32) {
        self.top = offset;
        self.requested = Some(offset);
    }
}

struct FeedSnapshot {
    channel_name: Option<String>,
    messages: Vec<Message>,
    stamp: FeedStamp,
    older_in_flight: bool,
    all_loaded: bool,
    initial_loading: bool,
}

pub struct ChatView {
    anchor: ScrollAnchor,
    next_offset: Option<f32>,
}

impl ChatView {
    pub fn new() -> Self {
        Self {
            anchor: ScrollAnchor::new(),
            next_offset: None,
        }
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        workspace: &Workspace,
        runtime: &tokio::runtime::Runtime,
    ) {
        let snapshot = runtime.block_on(async {
            let s = workspace.store().read().await;
            FeedSnapshot {
                channel_name: s.selected_channel().map(|c| c.name.clone()),
                messages: s.feed.messages.clone(),
                stamp: s.feed.stamp(),
                older_in_flight: s
                    .feed
                    .channel_id
                    .as_ref()
                    .is_some_and(|id| s.older_in_flight.contains(id)),
                all_loaded: s.feed.all_messages_loaded,
                initial_loading: s.feed.initial_loading,
            }
        });

        let Some(channel_name) = snapshot.channel_name else {
            ui.centered_and_justified(|ui| {
                ui.label("Select a channel to browse its history");
            });
            return;
        };

        ui.horizontal(|ui| {
            ui.heading(format!("# {}", channel_name));
        });
        ui.separator();

        if snapshot.initial_loading {
            ui.centered_and_justified(|ui| {
                ui.spinner();
            });
            return;
        }

        let mut action = None;
        let mut area = egui::ScrollArea::vertical()
            .id_salt("channel_messages")
            .auto_shrink([false, false]);
        if let Some(offset) = self.next_offset.take() {
            area = area.vertical_scroll_offset(offset);
        }

        let output = area.show(ui, |ui| {
            if snapshot.older_in_flight {
                ui.vertical_centered(|ui| ui.spinner());
            } else if snapshot.all_loaded {
                ui.vertical_centered(|ui| {
                    ui.label(
                        egui::RichText::new("Beginning of channel history")
                            .small()
                            .color(theme::TEXT_MUTED),
                    );
                });
            }

            if snapshot.messages.is_empty() {
                ui.label(egui::RichText::new("No messages").color(theme::TEXT_MUTED));
            }

            let options = MessageRenderOptions::default();
            for message in &snapshot.messages {
                if let Some(a) = render_message(ui, message, &options) {
                    action = Some(a);
                }
            }
        });

        let mut viewport = Viewport {
            content: output.content_size.y,
            visible: output.inner_rect.height(),
            top: output.state.offset.y,
            requested: None,
        };
        let outcome = self
            .anchor
            .reconcile(&mut viewport, snapshot.stamp, snapshot.older_in_flight);

        if let Some(offset) = viewport.requested {
            self.next_offset = Some(offset);
            ui.ctx().request_repaint();
        } else if outcome == ScrollOutcome::Idle
            && !snapshot.all_loaded
            && !snapshot.older_in_flight
            && self.anchor.should_load_older(&viewport)
        {
            self.anchor
                .record_before_prepend(&viewport, snapshot.stamp.generation);
            let workspace = workspace.clone();
            runtime.spawn(async move {
                if let Err(e) = workspace.load_older().await {
                    tracing::debug!("Older page failed: {}", e);
                }
            });
        }

        if let Some(MessageAction::OpenThread(parent)) = action {
            let workspace = workspace.clone();
            runtime.spawn(async move {
                if let Err(e) = workspace.open_thread(parent).await {
                    tracing::debug!("Thread failed: {}", e);
                }
            });
        }
    }
}

impl Default for ChatView {
    fn default() -> Self {
        Self::new()
    }
}
