use eframe::egui;

use crate::config::ClientConfig;
use crate::workspace::Workspace;

use super::main_view::MainView;
use super::theme;

pub struct ArchivistApp {
    workspace: Workspace,
    runtime: tokio::runtime::Runtime,
    main_view: MainView,
}

impl ArchivistApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: ClientConfig) -> Self {
        theme::apply(&cc.egui_ctx);

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .expect("Failed to create Tokio runtime");

        let workspace = Workspace::from_config(&config);
        let main_view = MainView::new(&config, runtime.handle().clone());

        // Load catalogs in background
        let bootstrap = workspace.clone();
        runtime.spawn(async move {
            if let Err(e) = bootstrap.bootstrap().await {
                tracing::error!("Failed to load workspace: {}", e);
            }
        });

        Self {
            workspace,
            runtime,
            main_view,
        }
    }
}

impl eframe::App for ArchivistApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Responses land in the store from background tasks
        ctx.request_repaint();

        self.main_view.show(ctx, &self.workspace, &self.runtime);
    }
}
