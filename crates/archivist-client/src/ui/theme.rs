use eframe::egui::{self, Color32};

// Dark archive palette
pub const BG_PRIMARY: Color32 = Color32::from_rgb(54, 57, 63); // Message pane
pub const BG_SECONDARY: Color32 = Color32::from_rgb(47, 49, 54); // Sidebars
pub const BG_ACCENT: Color32 = Color32::from_rgb(64, 68, 75); // Hover and selection

pub const TEXT_NORMAL: Color32 = Color32::from_rgb(220, 221, 222);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(142, 146, 151);
pub const TEXT_LINK: Color32 = Color32::from_rgb(0, 175, 244);

pub const AUTHOR: Color32 = Color32::from_rgb(88, 101, 242);
pub const ERROR: Color32 = Color32::from_rgb(237, 66, 69);

pub fn apply(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = egui::vec2(8.0, 8.0);
    style.visuals.panel_fill = BG_PRIMARY;
    style.visuals.extreme_bg_color = BG_SECONDARY;
    style.visuals.override_text_color = Some(TEXT_NORMAL);
    style.visuals.selection.bg_fill = BG_ACCENT;
    ctx.set_style(style);
}
