use eframe::egui;

use crate::config::ClientConfig;
use crate::state::ViewState;
use crate::workspace::Workspace;

use super::channel_list::ChannelList;
use super::chat::ChatView;
use super::search_bar::SearchBar;
use super::search_results::SearchResultsView;
use super::theme;
use super::thread_panel::ThreadPanel;

pub struct MainView {
    channel_list: ChannelList,
    search_bar: SearchBar,
    chat_view: ChatView,
    search_results: SearchResultsView,
    thread_panel: ThreadPanel,
}

impl MainView {
    pub fn new(config: &ClientConfig, runtime: tokio::runtime::Handle) -> Self {
        Self {
            channel_list: ChannelList::new(),
            search_bar: SearchBar::new(config, runtime),
            chat_view: ChatView::new(),
            search_results: SearchResultsView::new(),
            thread_panel: ThreadPanel::new(),
        }
    }

    pub fn show(
        &mut self,
        ctx: &egui::Context,
        workspace: &Workspace,
        runtime: &tokio::runtime::Runtime,
    ) {
        let (view, error, thread_visible) = runtime.block_on(async {
            let s = workspace.store().read().await;
            (
                s.view,
                s.error.clone(),
                s.is_thread_open() || s.thread_loading,
            )
        });

        // Channel list panel
        egui::SidePanel::left("channel_panel")
            .min_width(200.0)
            .max_width(300.0)
            .frame(egui::Frame::side_top_panel(&ctx.style()).fill(theme::BG_SECONDARY))
            .show(ctx, |ui| {
                self.channel_list.show(ui, workspace, runtime);
            });

        egui::TopBottomPanel::top("search_panel").show(ctx, |ui| {
            ui.add_space(4.0);
            self.search_bar.show(ui, workspace, runtime);
            ui.add_space(4.0);
        });

        // Thread overlay sits beside whichever content is primary
        if thread_visible {
            egui::SidePanel::right("thread_panel")
                .min_width(280.0)
                .max_width(420.0)
                .show(ctx, |ui| {
                    self.thread_panel.show(ui, workspace, runtime);
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| match view {
            ViewState::Channels => self.chat_view.show(ui, workspace, runtime),
            ViewState::Search => self.search_results.show(ui, workspace, runtime),
            ViewState::Error => {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        egui::RichText::new(
                            error.as_deref().unwrap_or("An unknown error occurred."),
                        )
                        .color(theme::ERROR),
                    );
                });
            }
        });
    }
}
