use lib::advisor_calendar::{advisor_store, models, run_tool};

use std::error::Error;

use advisor_store::{JsonFileStore, RestStore};
use clap::Parser;
use figment::{
    providers::{Env, Format, Json},
    Figment,
};
use log::{error, info};
use models::{Args, Config};
use run_tool::{run, RunOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    /* Setup logging */
    env_logger::builder()
        .target(env_logger::Target::Stdout)
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    let options = RunOptions {
        search: args.search.clone(),
        dry_run: args.dry_run,
    };

    let report = match &args.advisors_json_path {
        Some(advisors_json_path) => {
            let store = JsonFileStore::new(advisors_json_path);
            run(&store, &args.months, &options).await?
        }
        None => {
            let config: Config = Figment::new()
                .merge(Json::file(&args.config_json_path))
                .merge(Env::prefixed("ADV_"))
                .extract()?;
            info!(
                "Read config.json from {}",
                std::path::absolute(&args.config_json_path)?.display()
            );
            let store = RestStore::new(&config)?;
            run(&store, &args.months, &options).await?
        }
    };

    info!(
        "Done: {} updated, {} unchanged, {} failed, {} unreadable",
        report.updated.len(),
        report.unchanged.len(),
        report.failed.len(),
        report.rejected.len()
    );
    if !report.is_success() {
        for (id, err) in report.failed.iter() {
            error!("Advisor {} was not updated: {}", id, err);
        }
        for row in report.rejected.iter() {
            error!("Advisor row {:?} could not be read: {}", row.id, row.error);
        }
        return Err(format!(
            "{} advisor(s) were not updated, {} row(s) could not be read",
            report.failed.len(),
            report.rejected.len()
        )
        .into());
    }
    Ok(())
}
