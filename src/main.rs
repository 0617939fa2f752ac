use stockboard::application::client::SystemClient;
use stockboard::application::system::Application;
use stockboard::config::Config;
use stockboard::interfaces::ui::StockboardApp;

use anyhow::Context;
use tracing::{Level, error, info};
use tracing_subscriber::prelude::*;

// A writer that sends logs to the UI via a crossbeam channel
struct ChannelWriter {
    sender: crossbeam_channel::Sender<String>,
}

impl std::io::Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let msg = String::from_utf8_lossy(buf).to_string();
        let _ = self.sender.try_send(msg);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[derive(Clone)]
struct ChannelWriterFactory {
    sender: crossbeam_channel::Sender<String>,
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for ChannelWriterFactory {
    type Writer = ChannelWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ChannelWriter {
            sender: self.sender.clone(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let (log_tx, log_rx) = crossbeam_channel::unbounded();

    // Stdout + UI log panel
    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false).pretty();

    let ui_layer = tracing_subscriber::fmt::layer()
        .with_writer(ChannelWriterFactory { sender: log_tx })
        .with_ansi(false)
        .with_target(false);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .with(ui_layer)
        .init();

    info!("Initializing Stockboard...");

    // Fail before opening a window if the environment is unusable
    let config = Config::from_env().context("Failed to load config")?;

    // Tokio runtime on a background thread; the UI owns the main thread
    let (system_tx, system_rx) = crossbeam_channel::bounded(1);

    std::thread::spawn(move || {
        let rt = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                error!("Failed to build Tokio runtime: {}", e);
                return;
            }
        };

        rt.block_on(async move {
            info!("Background Runtime Started.");

            let app = match Application::build(config) {
                Ok(app) => app,
                Err(e) => {
                    error!("Failed to build application: {}", e);
                    return;
                }
            };
            app.spawn_reporter();

            let _ = system_tx.send(app.start());
            info!("Dashboard runtime running.");

            // Spawned tasks are detached; keep the runtime alive
            std::future::pending::<()>().await;
        });
    });

    info!("Waiting for runtime to boot...");
    let system_handle = system_rx
        .recv()
        .context("Background runtime exited before starting (see logs)")?;
    info!("Runtime connected. Launching UI.");

    let client = SystemClient::new(system_handle, log_rx);

    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Stock Price Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "Stockboard",
        native_options,
        Box::new(|_cc| Ok(Box::new(StockboardApp::new(client)))),
    )
    .map_err(|e| anyhow::anyhow!("Eframe error: {}", e))?;

    Ok(())
}
