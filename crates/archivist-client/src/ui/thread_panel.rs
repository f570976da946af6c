use archivist_protocol::MessageThread;
use eframe::egui;

use crate::workspace::Workspace;

use super::message::{render_message, MessageRenderOptions};
use super::theme;

pub struct ThreadPanel;

impl ThreadPanel {
    pub fn new() -> Self {
        Self
    }

    /// Show the thread panel next to the main content
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        workspace: &Workspace,
        runtime: &tokio::runtime::Runtime,
    ) {
        let (thread, loading): (Option<MessageThread>, bool) = runtime.block_on(async {
            let s = workspace.store().read().await;
            (s.thread.clone(), s.thread_loading)
        });

        let mut should_close = false;

        // Header with close button
        egui::TopBottomPanel::top("thread_header").show_inside(ui, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Thread");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("\u{2715}").clicked() {
                        should_close = true;
                    }
                });
            });
        });

        egui::CentralPanel::default().show_inside(ui, |ui| {
            let Some(thread) = thread else {
                if loading {
                    ui.centered_and_justified(|ui| {
                        ui.spinner();
                    });
                }
                return;
            };

            egui::ScrollArea::vertical()
                .id_salt("thread_messages")
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    let options = MessageRenderOptions {
                        show_thread_indicator: false,
                        id_prefix: "thread",
                    };
                    render_message(ui, &thread.parent_message, &options);

                    ui.horizontal(|ui| {
                        ui.label(
                            egui::RichText::new(super::message::replies_label(
                                thread.replies.len() as i64,
                            ))
                            .small()
                            .color(theme::TEXT_MUTED),
                        );
                    });
                    ui.separator();

                    for reply in &thread.replies {
                        render_message(ui, reply, &options);
                    }
                });
        });

        if should_close {
            let workspace = workspace.clone();
            runtime.spawn(async move { workspace.close_thread().await });
        }
    }
}

impl Default for ThreadPanel {
    fn default() -> Self {
        Self::new()
    }
}
