use clap::Parser;
use merchant_extract::application::extractor::MerchantExtractor;
use merchant_extract::config::{
    DEFAULT_OUTPUT, DEFAULT_TIMEOUT_SECS, ExtractorConfig, GatewaySource,
};
use merchant_extract::domain::merchant::ExtractionReport;
use merchant_extract::domain::ports::{MerchantGatewayBox, ReportSink};
use merchant_extract::infrastructure::http::HttpMerchantGateway;
use merchant_extract::infrastructure::in_memory::InMemoryMerchantGateway;
use merchant_extract::interfaces::json::report_writer::JsonReportWriter;
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(author, version, about = "Extract merchant data and monthly payment summaries", long_about = None)]
struct Cli {
    /// Base URL of the merchant API; the scheme may be omitted
    #[arg(long, env = "PAYENGINE_BASE_URL")]
    base_url: Option<String>,

    /// API key sent as a Basic credential
    #[arg(long, env = "PAYENGINE_PRIVATE_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Output JSON file
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Per-request timeout in seconds
    #[arg(
        long,
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout_secs: u64,

    /// Replay recorded responses from a JSON fixture instead of calling the API
    #[arg(long, value_name = "FILE")]
    replay: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = ExtractorConfig::resolve(
        cli.base_url,
        cli.api_key,
        cli.timeout_secs,
        cli.replay,
        cli.output,
    )
    .into_diagnostic()?;

    let gateway: MerchantGatewayBox = match &config.source {
        GatewaySource::Http(gateway_config) => {
            let gateway = HttpMerchantGateway::new(gateway_config).into_diagnostic()?;
            info!("Merchant API host: {}", gateway.base_url());
            info!(
                "API key provided: {}",
                if gateway_config.api_key.is_some() { "yes" } else { "no" }
            );
            Box::new(gateway)
        }
        GatewaySource::Replay(path) => {
            info!("Replaying recorded responses from {}", path.display());
            Box::new(InMemoryMerchantGateway::from_file(path).into_diagnostic()?)
        }
    };

    let report = MerchantExtractor::new(gateway).run().await;

    let mut writer = JsonReportWriter::create(&config.output).into_diagnostic()?;
    writer.write_report(&report).into_diagnostic()?;
    info!("Data saved to {}", config.output.display());

    log_summary(&report, &config.output);
    Ok(())
}

fn log_summary(report: &ExtractionReport, output: &Path) {
    info!(
        status = ?report.status,
        total_merchants = report.total_merchants,
        output = %output.display(),
        "{}",
        report.message
    );

    if let Some(sample) = report.merchants.first() {
        let fetched: Vec<&str> = sample
            .fetched_resources()
            .iter()
            .map(|resource| resource.label())
            .collect();
        info!(
            "Sample merchant {}: fetched [{}]",
            sample.merchant_id.as_deref().unwrap_or("<no id>"),
            fetched.join(", ")
        );
    }
}
