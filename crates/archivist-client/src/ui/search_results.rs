use archivist_protocol::SearchResult;
use eframe::egui;

use crate::search::SearchFilters;
use crate::workspace::Workspace;

use super::message::{render_message, MessageAction, MessageRenderOptions};
use super::theme;

struct ResultsSnapshot {
    results: Vec<SearchResult>,
    loading: bool,
    error: Option<String>,
    summary: String,
}

/// Human-readable summary of the active filters
fn describe(filters: &SearchFilters, channel: Option<&str>, user: Option<&str>) -> String {
    let mut parts = Vec::new();
    if !filters.query_text.is_empty() {
        parts.push(format!("\"{}\"", filters.query_text));
    }
    if let Some(name) = channel {
        parts.push(format!("in #{}", name));
    }
    if let Some(name) = user {
        parts.push(format!("from @{}", name));
    }
    if let Some(date) = filters.after_date {
        parts.push(format!("after {}", date));
    }
    if let Some(date) = filters.before_date {
        parts.push(format!("before {}", date));
    }
    parts.join(" ")
}

pub struct SearchResultsView;

impl SearchResultsView {
    pub fn new() -> Self {
        Self
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        workspace: &Workspace,
        runtime: &tokio::runtime::Runtime,
    ) {
        let snapshot = runtime.block_on(async {
            let s = workspace.store().read().await;
            let summary = s
                .search
                .filters
                .as_ref()
                .map(|f| {
                    let channel = f.channel_id.as_deref().and_then(|id| s.channel(id));
                    let user = f
                        .user_id
                        .as_deref()
                        .and_then(|id| s.users.iter().find(|u| u.id == id));
                    describe(f, channel.map(|c| c.name.as_str()), user.map(|u| u.name.as_str()))
                })
                .unwrap_or_default();
            ResultsSnapshot {
                results: s.search.results.clone(),
                loading: s.search.loading,
                error: s.search.error.clone(),
                summary,
            }
        });

        let mut close = false;
        ui.horizontal(|ui| {
            ui.heading("Search results");
            ui.label(egui::RichText::new(&snapshot.summary).color(theme::TEXT_MUTED));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("\u{2715}").on_hover_text("Back to channel").clicked() {
                    close = true;
                }
            });
        });
        ui.separator();

        let mut action = None;
        if snapshot.loading {
            ui.centered_and_justified(|ui| {
                ui.spinner();
            });
        } else if let Some(error) = &snapshot.error {
            ui.label(egui::RichText::new(format!("Search failed: {}", error)).color(theme::ERROR));
        } else if snapshot.results.is_empty() {
            ui.label(egui::RichText::new("No messages matched").color(theme::TEXT_MUTED));
        } else {
            egui::ScrollArea::vertical()
                .id_salt("search_results")
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    let options = MessageRenderOptions {
                        id_prefix: "search",
                        ..Default::default()
                    };
                    for result in &snapshot.results {
                        ui.label(
                            egui::RichText::new(format!("# {}", result.message.channel_name))
                                .small()
                                .color(theme::TEXT_MUTED),
                        );
                        if let Some(parent) = &result.parent_message {
                            let context = ui.add(
                                egui::Label::new(
                                    egui::RichText::new(format!(
                                        "reply to {}: {}",
                                        parent.user.label(),
                                        parent.text
                                    ))
                                    .small()
                                    .italics()
                                    .color(theme::TEXT_LINK),
                                )
                                .truncate()
                                .sense(egui::Sense::click()),
                            );
                            if context.clicked() {
                                action = Some(MessageAction::OpenThread((**parent).clone()));
                            }
                        }
                        if let Some(a) = render_message(ui, &result.message, &options) {
                            action = Some(a);
                        }
                        ui.separator();
                    }
                });
        }

        let workspace = workspace.clone();
        if close {
            runtime.spawn(async move { workspace.close_search().await });
        } else if let Some(MessageAction::OpenThread(parent)) = action {
            runtime.spawn(async move {
                if let Err(e) = workspace.open_thread(parent).await {
                    tracing::debug!("Thread failed: {}", e);
                }
            });
        }
    }
}

impl Default for SearchResultsView {
    fn default() -> Self {
        Self::new()
    }
}
