use std::process;

use cricstats::{run_and_save, PipelineConfig, VERSION};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => match PipelineConfig::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("cannot load config {}: {}", path, e);
                process::exit(1);
            }
        },
        None => PipelineConfig::default(),
    };

    log::info!("cricstats {}", VERSION);
    match run_and_save(&config) {
        Ok(report) => {
            for stage in &report.stages {
                log::info!("{:<18} {:>6} rows {:>4} columns", stage.stage, stage.rows, stage.columns);
            }
            log::info!("{} players in every format", report.players.len());
        }
        Err(e) => {
            log::error!("{}", e);
            process::exit(1);
        }
    }
}
