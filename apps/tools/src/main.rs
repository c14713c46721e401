use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use server_api::{chart, renewable_share, svg, ApiContext, DEFAULT_CACHE_TTL};
use shared::{error::ApiException, protocol::ChartKind};
use storage::DataStore;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "static/archivo")]
    data_dir: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Per-source production totals.
    Summary {
        #[arg(long)]
        json: bool,
    },
    /// Renewable share of a total consumption figure.
    Share { total: String },
    /// Dump one chart as JSON, or as SVG with `--svg`.
    Chart {
        kind: String,
        #[arg(long)]
        svg: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let store = DataStore::open(&cli.data_dir).await?;
    let ctx = ApiContext::load(store, DEFAULT_CACHE_TTL).await?;

    match cli.command {
        Command::Summary { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(ctx.snapshot.as_ref())?);
            } else {
                for total in &ctx.snapshot.source_totals {
                    println!("{:<12} {:>14.2} TWh", total.source.label(), total.total_twh);
                }
                println!("renewable records: {}", ctx.snapshot.renewables.len());
            }
        }
        Command::Share { total } => {
            let response = renewable_share(&ctx, &total).map_err(ApiException::from)?;
            println!("{:.2}%", response.renewable_percentage);
        }
        Command::Chart { kind, svg: as_svg } => {
            let kind = kind.parse::<ChartKind>().map_err(ApiException::from)?;
            let spec = chart(&ctx, kind)
                .await
                .map_err(ApiException::from)
                .with_context(|| format!("failed to build {kind} chart"))?;
            if as_svg {
                println!("{}", svg::render_svg(&spec));
            } else {
                println!("{}", serde_json::to_string_pretty(&spec)?);
            }
        }
    }

    Ok(())
}
