use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use netframe::config::{InspectConfig, OutputFormat, Protocol};
use netframe::inspect::inspect;

/// Decode DNS messages, 802.11 frames and IPv6 packets given as hex
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Decoder to apply
    #[arg(short, long, value_enum)]
    protocol: Option<Protocol>,

    /// Output format
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Echo the input bytes as hex
    #[arg(long)]
    show_raw: bool,

    /// Hex-encoded input; read from stdin when omitted
    input: Option<String>,
}

fn load_config(args: &Args) -> Result<InspectConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => InspectConfig::from_file(path)?,
        None => InspectConfig::from_env()?,
    };
    if let Some(protocol) = args.protocol {
        config.protocol = protocol;
    }
    if let Some(output) = args.output {
        config.output = output;
    }
    config.show_raw |= args.show_raw;
    Ok(config)
}

fn read_input(args: &Args) -> std::io::Result<String> {
    match &args.input {
        Some(input) => Ok(input.clone()),
        None => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&args)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    debug!("Using configuration: {:?}", config);

    let text = read_input(&args)?;
    let hex_digits: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = hex::decode(&hex_digits)?;
    if bytes.len() > config.max_input_bytes {
        return Err(format!(
            "input of {} bytes exceeds the {} byte limit",
            bytes.len(),
            config.max_input_bytes
        )
        .into());
    }

    let inspection = inspect(config.protocol, &bytes, config.show_raw)?;
    match config.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&inspection)?),
        OutputFormat::Text => print!("{}", inspection),
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
