mod app;
mod error;
mod logging;
mod settings;
mod single_instance;

use std::process::ExitCode;

use log::{error, warn};
use zshup_core::ProvisionConfig;
use zshup_exec::SystemRunner;
use zshup_platform::{AppPaths, AppPathsError};

use crate::error::AppError;
use crate::settings::AppSettings;
use crate::single_instance::SingleInstance;

#[tokio::main]
async fn main() -> ExitCode {
    let paths = AppPaths::new();

    let (settings, settings_error) = match &paths {
        Ok(paths) => match AppSettings::load_from(&paths.settings_file()) {
            Ok(settings) => (settings, None),
            Err(error) => (AppSettings::default(), Some(error)),
        },
        Err(_) => (AppSettings::default(), None),
    };

    let log_file = paths.as_ref().ok().map(AppPaths::log_file);
    logging::init_logging(
        log_file.as_deref(),
        settings.debug_logging,
        settings.max_log_size_bytes,
    );

    if let Some(error) = settings_error {
        warn!("Ignoring settings: {error}");
    }

    match provision(paths, settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!("{error}");
            ExitCode::FAILURE
        }
    }
}

async fn provision(
    paths: Result<AppPaths, AppPathsError>,
    settings: AppSettings,
) -> Result<(), AppError> {
    let paths = paths?;
    let _instance = SingleInstance::acquire(&paths.lock_file())?;

    let config = ProvisionConfig::from_env()?
        .with_change_login_shell(settings.change_login_shell)
        .with_extra_plugins(settings.extra_plugins);

    app::run(&SystemRunner, &config).await
}
