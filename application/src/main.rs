use std::{fs::OpenOptions, process::ExitCode, sync::Mutex};

use application::{Args, Config, Console, Menu, Service};
use service::infra::Postgres;
use tracing as log;
use tracing_subscriber::{
    filter::filter_fn,
    layer::{Layer as _, SubscriberExt as _},
    util::SubscriberInitExt as _,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match start().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(()) => ExitCode::FAILURE,
    }
}

async fn start() -> Result<(), ()> {
    let Args { config } = Args::parse().map_err(|e| {
        eprintln!("failed to parse command line arguments: {e}");
    })?;

    let Config {
        postgres,
        console,
        log,
    } = Config::new(config).map_err(|e| {
        eprintln!("failed to load `Config`: {e}");
    })?;

    // Console belongs to a user, so the log goes to a file.
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log.file)
        .map_err(|e| {
            eprintln!("failed to open `{}` log file: {e}", log.file.display());
        })?;
    let level = log::Level::from(log.level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .with_filter(filter_fn(move |meta| {
                    meta.is_span() || level >= *meta.level()
                })),
        )
        .init();

    let db = Postgres::connect(&(&postgres).into(), postgres.retry())
        .await
        .map_err(|e| {
            log::error!("failed to connect to `Postgres`: {e}");
            eprintln!("failed to connect to the database: {}", e.as_ref());
        })?;

    let service = Service::new(db);
    Menu::new(service, Console::stdio(), console.page_size)
        .run().await.map_err(|e| {
        log::error!("console failed: {e}");
        eprintln!("console failed: {e}");
    })
}
