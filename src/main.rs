use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use lcsdl::{
    CrawlConfig, CrawlContext, OutputConfig, PageRenderer, Templates, crawl_week, publish_semester,
};

extern crate env_logger;
extern crate log;

use log::{LevelFilter, info};

/// Finds lecture recordings on the lecture capture server and writes them into
/// static per-unit HTML pages.
#[derive(Parser)]
#[command(version)]
struct Cli {
    /// Media server root, overriding ECHO_BASE_URL.
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the unit list and a fresh page for every unit of a semester.
    Semester {
        /// Two-digit year, e.g. 21.
        #[arg(value_parser = clap::value_parser!(u32).range(15..=99))]
        year: u32,
        /// Semester digit, e.g. 2.
        semester: String,
        #[arg(long, default_value = "unitList.html")]
        unit_list_file: PathBuf,
        #[arg(long, default_value = "unitListTemplate.html")]
        unit_list_template: PathBuf,
        #[arg(long, default_value = "unitTemplate.html")]
        unit_template: PathBuf,
        #[arg(long, default_value = "units")]
        unit_dir: PathBuf,
    },
    /// Append a week's lectures to the existing unit pages.
    Week {
        /// Two-digit year, e.g. 21.
        year: u32,
        /// ISO week number.
        week: u32,
        #[arg(long, default_value = "units")]
        unit_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    let mut crawl_config = CrawlConfig::new()?;
    if let Some(base_url) = &cli.base_url {
        crawl_config.set_base_url(base_url);
    }
    let ctx = CrawlContext::new(crawl_config)?;

    match cli.command {
        Command::Semester {
            year,
            semester,
            unit_list_file,
            unit_list_template,
            unit_template,
            unit_dir,
        } => {
            let output = OutputConfig {
                unit_list_file,
                unit_list_template,
                unit_template,
                unit_dir,
            };
            let templates = Templates::load(&output)
                .await
                .context("couldn't read page templates")?;
            let renderer = PageRenderer::new(output);
            let year = format!("{year:02}");
            let units = publish_semester(&ctx, &renderer, &templates, &year, &semester).await?;
            info!("Wrote {} unit pages", units.len());
        }
        Command::Week {
            year,
            week,
            unit_dir,
        } => {
            let renderer = PageRenderer::new(OutputConfig {
                unit_dir,
                ..OutputConfig::default()
            });
            let report = crawl_week(&ctx, &renderer, year, week).await?;
            info!(
                "Crawled {} days ({} skipped), appended {} lectures",
                report.days_crawled, report.days_skipped, report.lectures_appended
            );
        }
    }

    Ok(())
}
