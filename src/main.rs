use clap::Parser;
use dom_history::cli::commands::{cmd_capture, cmd_inspect, cmd_locate, cmd_replay, cmd_serialize};
use dom_history::cli::config::{Cli, Commands, attribute_order, load_config, log_level};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let (config, config_problem) = load_config(cli.config.as_deref());
    init_logging(&log_level(cli.verbose, &config));
    if let Some(problem) = config_problem {
        tracing::warn!("{}", problem);
    }

    let order = attribute_order(cli.sort_attributes, &config);

    match cli.command {
        Commands::Serialize {
            dump,
            include_attributes,
        } => {
            let include = include_attributes.unwrap_or(config.serialize.include_attributes);
            cmd_serialize(&dump, &include, order)?;
        }
        Commands::Inspect { dump } => {
            cmd_inspect(&dump, order)?;
        }
        Commands::Capture {
            dump,
            index,
            url,
            title,
            log,
        } => {
            let log = log.unwrap_or(config.history.log_path);
            cmd_capture(&dump, index, &url, &title, &log, order)?;
        }
        Commands::Locate { dump, element } => {
            if !cmd_locate(&dump, &element, order)? {
                std::process::exit(1);
            }
        }
        Commands::Replay { dump, log } => {
            let log = log.unwrap_or(config.history.log_path);
            cmd_replay(&dump, &log, order)?;
        }
    }

    Ok(())
}

fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}
