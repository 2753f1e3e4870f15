use std::{io::Read, process};

use edicola::{
    application::{
        error::AppError,
        hydrate::{self, FragmentOutcome},
    },
    config,
    domain::blocks::{BlockConfig, QueryFilter},
    infra::{error::InfraError, telemetry, wp::WpClient},
};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(std::io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Hydrate(Box::<config::HydrateArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Hydrate(args) => run_hydrate(settings, *args).await,
        config::Command::Fetch(args) => run_fetch(settings, *args).await,
    }
}

fn build_client(settings: &config::Settings) -> Result<WpClient, AppError> {
    let site = settings
        .site
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("site url is not configured"))
        .map_err(AppError::from)?;

    WpClient::new(site).map_err(|err| AppError::validation(format!("invalid site url: {err}")))
}

async fn run_hydrate(
    settings: config::Settings,
    args: config::HydrateArgs,
) -> Result<(), AppError> {
    let client = build_client(&settings)?;

    let page = match args.input.as_ref() {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(|err| AppError::from(InfraError::Io(err)))?,
        None => read_stdin()?,
    };

    let outcome = hydrate::hydrate_page(&client, &page).await?;

    match args.output.as_ref() {
        Some(path) => tokio::fs::write(path, &outcome.html)
            .await
            .map_err(|err| AppError::from(InfraError::Io(err)))?,
        None => print!("{}", outcome.html),
    }

    info!(
        target: "edicola::hydrate",
        instances = outcome.instances,
        failed = outcome.failed,
        "Hydration completed"
    );

    Ok(())
}

async fn run_fetch(settings: config::Settings, args: config::FetchArgs) -> Result<(), AppError> {
    let client = build_client(&settings)?;
    let config = block_config_from(&args);

    let fragment = hydrate::load_fragment(&client, &config).await;
    println!("{}", fragment.html);

    if fragment.outcome == FragmentOutcome::Failed {
        warn!(target: "edicola::fetch", "Fetch completed with errors");
    }

    Ok(())
}

fn block_config_from(args: &config::FetchArgs) -> BlockConfig {
    // clap enforces category/tag exclusivity before we get here.
    let query = match (args.category, args.tag) {
        (Some(id), _) => QueryFilter::Category(id),
        (_, Some(id)) => QueryFilter::Tag(id),
        _ => QueryFilter::Recent,
    };

    BlockConfig {
        post_count: args.count,
        query,
        date_font_family: args.date_font_family.clone(),
        date_font_size: args.date_font_size.clone(),
        heading_font_family: args.heading_font_family.clone(),
        heading_font_size: args.heading_font_size.clone(),
        post_spacing: args.spacing.clone(),
        show_date: !args.hide_date,
        show_excerpt: args.show_excerpt,
    }
}

fn read_stdin() -> Result<String, AppError> {
    let mut page = String::new();
    std::io::stdin()
        .read_to_string(&mut page)
        .map_err(|err| AppError::from(InfraError::Io(err)))?;
    Ok(page)
}
