mod app;
mod backend;
mod chat;
mod config;
mod dispatch;
mod event;
mod headless;
mod markdown;
mod theme;

use app::ChatApp;
use backend::BackendClient;
use clap::Parser;
use config::{Cli, Command};
use dispatch::Dispatcher;
use eframe::egui;
use std::error::Error;
use std::sync::mpsc;
use theme::Theme;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = cli.backend_config()?;
    info!(
        base_url = %config.base_url,
        body_format = ?config.body_format,
        "starting modus-chat v{}",
        env!("CARGO_PKG_VERSION")
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("modus-runtime")
        .build()?;
    let client = BackendClient::new(&config)?;

    match cli.command {
        Some(Command::Ask { prompt }) => {
            return runtime.block_on(headless::ask(&client, prompt, &mut std::io::stdout()));
        }
        Some(Command::Solve { problem }) => {
            return runtime.block_on(headless::solve(&client, problem, &mut std::io::stdout()));
        }
        None => {}
    }

    let (tx, rx) = mpsc::channel();
    let dispatcher = Dispatcher::new(client, tx, runtime.handle().clone());

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 780.0])
            .with_min_inner_size([800.0, 520.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Modus Chat",
        native_options,
        Box::new(move |creation_context| {
            let theme = Theme::default();
            theme.apply_visuals(&creation_context.egui_ctx);
            let dispatcher = dispatcher.with_repaint(creation_context.egui_ctx.clone());
            Ok(Box::new(ChatApp::new(rx, dispatcher, theme)))
        }),
    )?;

    Ok(())
}
