// AURA Timeline Application
// Main entry point

use std::sync::Arc;

use anyhow::{Context, Result};

use aura_timeline::services::notification::{DesktopNotifier, Notifier};
use aura_timeline::services::schedule::{HttpScheduleClient, ScheduleApi};
use aura_timeline::services::settings::SettingsService;
use aura_timeline::ui::AuraApp;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    log::info!("Starting AURA timeline client");

    let settings = match SettingsService::new() {
        Ok(service) => service.load_or_default(),
        Err(err) => {
            log::warn!("No config directory available ({}); using defaults", err);
            Default::default()
        }
    };

    let api: Arc<dyn ScheduleApi> =
        Arc::new(HttpScheduleClient::new(&settings).context("Failed to set up API client")?);
    let notifier: Arc<dyn Notifier> =
        Arc::new(DesktopNotifier::new(settings.notifications_enabled));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("AURA Timeline")
            .with_inner_size([1100.0, 780.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "AURA Timeline",
        options,
        Box::new(move |_cc| Ok(Box::new(AuraApp::new(&settings, api, notifier)))),
    )
    .map_err(|err| anyhow::anyhow!("Failed to start the UI: {err}"))
}
