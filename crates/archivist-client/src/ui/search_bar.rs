//! Search input with filter suggestions. Enter submits, arrows move through
//! the suggestion list, and clicking anywhere else closes it.

use archivist_protocol::{Channel, User};
use eframe::egui;

use crate::config::ClientConfig;
use crate::search::{
    query, AutoSubmit, Catalog, KeyOutcome, SearchBox, SearchFilters, SearchKey, Suggestion,
};
use crate::workspace::Workspace;

use super::theme;

const KEY_MAP: [(egui::Key, SearchKey); 5] = [
    (egui::Key::Enter, SearchKey::Enter),
    (egui::Key::ArrowUp, SearchKey::ArrowUp),
    (egui::Key::ArrowDown, SearchKey::ArrowDown),
    (egui::Key::Tab, SearchKey::Tab),
    (egui::Key::Escape, SearchKey::Escape),
];

pub struct SearchBar {
    search_box: SearchBox,
    /// Present when searches run automatically after a typing pause
    auto_submit: Option<AutoSubmit>,
    input_id: egui::Id,
}

impl SearchBar {
    pub fn new(config: &ClientConfig, runtime: tokio::runtime::Handle) -> Self {
        Self {
            search_box: SearchBox::new(),
            auto_submit: config
                .auto_search
                .then(|| AutoSubmit::new(config.search_debounce(), runtime)),
            input_id: egui::Id::new("search_input"),
        }
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        workspace: &Workspace,
        runtime: &tokio::runtime::Runtime,
    ) {
        let (channels, users): (Vec<Channel>, Vec<User>) = runtime.block_on(async {
            let s = workspace.store().read().await;
            (s.channels.clone(), s.users.clone())
        });
        let catalog = Catalog::new(&channels, &users);

        let mut submit = None;
        let mut edited = false;

        // Keys are taken before the text field sees them
        let focused = ui.ctx().memory(|m| m.has_focus(self.input_id));
        if focused {
            for (egui_key, key) in KEY_MAP {
                let wanted = key == SearchKey::Enter || self.search_box.is_suggesting();
                if !wanted || !ui.input_mut(|i| i.consume_key(egui::Modifiers::NONE, egui_key)) {
                    continue;
                }
                match self.search_box.handle_key(key, catalog) {
                    KeyOutcome::Submit(filters) => submit = Some(filters),
                    KeyOutcome::Consumed => edited |= !self.search_box.is_suggesting(),
                    KeyOutcome::PassThrough => {}
                }
            }
        }

        let mut clear = false;
        let input = ui
            .horizontal(|ui| {
                let response = ui.add(
                    egui::TextEdit::singleline(self.search_box.text_mut())
                        .id(self.input_id)
                        .hint_text("Search  (in:#channel  from:@user  before:YYYY-MM-DD)")
                        .desired_width(ui.available_width() - 80.0),
                );
                if ui.button("Search").clicked() {
                    submit = Some(self.search_box.submit(catalog));
                }
                if ui.button("\u{2715}").on_hover_text("Clear search").clicked() {
                    clear = true;
                }
                response
            })
            .inner;

        if input.changed() {
            self.search_box.refresh(catalog);
            edited = true;
        }

        let (popup_rect, picked) = self.show_suggestions(ui, &input);
        edited |= picked;

        // Outside-click dismissal, checked only while the box is drawn
        if self.search_box.is_suggesting() {
            let pressed_at = ui.input(|i| {
                i.pointer
                    .any_pressed()
                    .then(|| i.pointer.interact_pos())
                    .flatten()
            });
            if let Some(pos) = pressed_at {
                let inside = input.rect.contains(pos) || popup_rect.is_some_and(|r| r.contains(pos));
                if !inside {
                    self.search_box.dismiss();
                }
            }
        }

        if edited {
            self.schedule_auto_submit(catalog, workspace);
        }

        if clear {
            self.search_box.clear();
            self.cancel_auto_submit();
            let workspace = workspace.clone();
            runtime.spawn(async move { workspace.close_search().await });
        } else if let Some(filters) = submit {
            self.cancel_auto_submit();
            let workspace = workspace.clone();
            runtime.spawn(async move { run_search(&workspace, filters).await });
        }
    }

    /// Draws the suggestion popup under the input. Returns its rect when open
    /// and whether a clicked suggestion edited the query this frame.
    fn show_suggestions(
        &mut self,
        ui: &egui::Ui,
        input: &egui::Response,
    ) -> (Option<egui::Rect>, bool) {
        if !self.search_box.is_suggesting() {
            return (None, false);
        }

        let active = self.search_box.active();
        let mut hovered = None;
        let mut picked = None;

        let area = egui::Area::new(egui::Id::new("search_suggestions"))
            .order(egui::Order::Foreground)
            .fixed_pos(input.rect.left_bottom())
            .show(ui.ctx(), |ui| {
                egui::Frame::popup(ui.style())
                    .fill(theme::BG_SECONDARY)
                    .show(ui, |ui| {
                        ui.set_min_width(input.rect.width());
                        for (i, suggestion) in self.search_box.suggestions().iter().enumerate() {
                            let mut label = suggestion.label();
                            if let Suggestion::User {
                                display_name: Some(display),
                                ..
                            } = suggestion
                            {
                                label = format!("{}  {}", label, display);
                            }
                            let row = ui.selectable_label(active == Some(i), label);
                            if row.hovered() {
                                hovered = Some(i);
                            }
                            if row.clicked() {
                                picked = Some(i);
                            }
                        }
                    });
            });

        if let Some(i) = hovered {
            self.search_box.hover(i);
        }
        let mut edited = false;
        if let Some(i) = picked {
            edited = self.pick(i);
            ui.ctx().memory_mut(|m| m.request_focus(self.input_id));
        }

        (Some(area.response.rect), edited)
    }

    /// Commit a clicked suggestion; true when the query is ready to search,
    /// the same as a keyboard commit
    fn pick(&mut self, index: usize) -> bool {
        self.search_box.select(index);
        !self.search_box.is_suggesting()
    }

    fn schedule_auto_submit(&mut self, catalog: Catalog<'_>, workspace: &Workspace) {
        let Some(auto_submit) = self.auto_submit.as_mut() else {
            return;
        };
        auto_submit.cancel();
        if self.search_box.is_suggesting() {
            return;
        }

        let filters = query::parse(self.search_box.text(), catalog);
        let workspace = workspace.clone();
        auto_submit.schedule(async move { run_search(&workspace, filters).await });
    }

    fn cancel_auto_submit(&mut self) {
        if let Some(auto_submit) = self.auto_submit.as_mut() {
            auto_submit.cancel();
        }
    }
}

async fn run_search(workspace: &Workspace, filters: SearchFilters) {
    if let Err(e) = workspace.submit_search(filters).await {
        tracing::debug!("Search not applied: {}", e);
    }
}
