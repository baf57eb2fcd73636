use clap::Parser;
use page_accessibility::cli::commands::{cmd_analyze, cmd_score};
use page_accessibility::cli::config::{Cli, Commands, load_config};
use page_accessibility::cli::logging::init_logging;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Analyze {
            url,
            callback_url,
            task_id,
            website_id,
            enable_svg_ocr,
            output,
        } => {
            cmd_analyze(
                &url,
                callback_url.as_deref(),
                task_id.as_deref(),
                website_id.as_deref(),
                enable_svg_ocr,
                output.as_deref(),
                &config,
            )?;
        }
        Commands::Score {
            metrics,
            detected,
            output,
        } => {
            cmd_score(&metrics, detected, output.as_deref())?;
        }
    }

    Ok(())
}
