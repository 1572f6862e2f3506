use std::env;
use std::process::ExitCode;
use std::str::FromStr;

use google_sheets_tasks::adapters::block_store::memory::InMemoryBlockStore;
use google_sheets_tasks::adapters::config::app_config::CONFIG;
use google_sheets_tasks::application::flows::{
    read_sheet_flow, FlowShape, GoogleSheetsBlock, ReadSettings,
};
use google_sheets_tasks::prettyprint::TaskFormatter;
use tracing::{error, info, instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Registry};

const SAMPLE_BLOCK: &str = "sample-block";
const LOG_FILE: &str = "sheets_flow.log";

fn setup_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .event_format(TaskFormatter::new(true))
        .with_writer(std::io::stderr);

    let log_file_layer = tracing_subscriber::fmt::layer()
        .event_format(TaskFormatter::new(false))
        .with_writer(std::fs::File::create(LOG_FILE)?)
        .with_ansi(false);

    Registry::default()
        .with(
            tracing_subscriber::filter::Targets::new()
                .with_target("sheets_flow", tracing::Level::TRACE)
                .with_target("google_sheets_tasks", tracing::Level::TRACE),
        )
        .with(log_file_layer)
        .with(stderr_layer)
        .try_init()?;

    Ok(())
}

fn setup_panic_hook() {
    tracing::trace!("Setting panic hook");
    std::panic::set_hook(Box::new(|info| {
        tracing::error!("panic: {info}");
    }));
}

#[instrument]
async fn run(shape: FlowShape) -> Result<serde_json::Value, String> {
    let sheets = &CONFIG.sheets;
    let block = GoogleSheetsBlock {
        is_public_sheet: sheets.is_public_sheet,
        google_service_account: sheets
            .service_account()
            .map_err(|report| format!("{:?}", report))?,
        google_sheet_key: sheets.spreadsheet_id.clone(),
        google_sheet_name: sheets.sheet_name.clone(),
    };
    let settings = ReadSettings {
        first_row_header: sheets.first_row_header,
        on_bad_lines: sheets.on_bad_lines,
        clean: sheets.clean,
    };

    let store = InMemoryBlockStore::new();
    block
        .save(&store, SAMPLE_BLOCK, true)
        .await
        .map_err(|report| format!("{:?}", report))?;

    read_sheet_flow(&store, SAMPLE_BLOCK, shape, settings)
        .await
        .map_err(|report| format!("{:?}", report))
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = setup_tracing() {
        eprintln!("Failed to set up logging: {}", e);
        return ExitCode::FAILURE;
    }
    setup_panic_hook();

    let args: Vec<String> = env::args().collect();
    let shape = match args.get(1).map(|arg| FlowShape::from_str(arg)) {
        None => FlowShape::default(),
        Some(Ok(shape)) => shape,
        Some(Err(_)) => {
            eprintln!("Usage: {} [table|rows|columns]", args[0]);
            return ExitCode::FAILURE;
        }
    };

    info!(%shape, "Starting sheets flow");
    match run(shape).await {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("Failed to render the result: {}", e);
                ExitCode::FAILURE
            }
        },
        Err(report) => {
            error!("❌ Flow failed: {}", report);
            ExitCode::FAILURE
        }
    }
}
