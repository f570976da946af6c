use archivist_protocol::Channel;
use eframe::egui;

use crate::workspace::Workspace;

use super::theme;

pub struct ChannelList;

/// What the user asked for in the sidebar this frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelListAction {
    Select(String),
    Logout,
    Reconnect,
}

impl ChannelList {
    pub fn new() -> Self {
        Self
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        workspace: &Workspace,
        runtime: &tokio::runtime::Runtime,
    ) {
        let (channels, selected, loading) = runtime.block_on(async {
            let s = workspace.store().read().await;
            (
                s.channels.clone(),
                s.selected_channel.clone(),
                s.channels_loading,
            )
        });

        let mut action = None;

        ui.vertical(|ui| {
            ui.add_space(8.0);
            ui.label(egui::RichText::new("CHANNELS").small().strong().color(theme::TEXT_MUTED));
            ui.add_space(4.0);

            if loading {
                ui.spinner();
            } else if channels.is_empty() {
                ui.label(egui::RichText::new("No channels").color(theme::TEXT_MUTED));
                if ui.button("Reconnect").clicked() {
                    action = Some(ChannelListAction::Reconnect);
                }
            }

            egui::ScrollArea::vertical()
                .id_salt("channel_list")
                .max_height(ui.available_height() - 40.0)
                .show(ui, |ui| {
                    for channel in &channels {
                        if self.channel_row(ui, channel, selected.as_deref() == Some(&channel.id)) {
                            action = Some(ChannelListAction::Select(channel.id.clone()));
                        }
                    }
                });

            ui.with_layout(egui::Layout::bottom_up(egui::Align::LEFT), |ui| {
                if ui.button("Log out").clicked() {
                    action = Some(ChannelListAction::Logout);
                }
            });
        });

        let Some(action) = action else {
            return;
        };
        let workspace = workspace.clone();
        runtime.spawn(async move {
            let result = match action {
                ChannelListAction::Select(id) => workspace.select_channel(&id).await.map(|_| ()),
                ChannelListAction::Logout => {
                    workspace.logout().await;
                    Ok(())
                }
                ChannelListAction::Reconnect => workspace.bootstrap().await,
            };
            if let Err(e) = result {
                tracing::debug!("Channel action failed: {}", e);
            }
        });
    }

    /// Returns true when clicked
    fn channel_row(&self, ui: &mut egui::Ui, channel: &Channel, is_selected: bool) -> bool {
        let text = egui::RichText::new(format!("# {}", channel.name));
        let response = ui.selectable_label(is_selected, text);
        let response = if channel.topic.is_empty() {
            response
        } else {
            response.on_hover_text(&channel.topic)
        };
        response.clicked()
    }
}

impl Default for ChannelList {
    fn default() -> Self {
        Self::new()
    }
}
