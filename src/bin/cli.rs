//! urlfetch CLI Client
//!
//! Command-line interface for the URL fetch service.

use std::io::{self, Write};
use std::process;

use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};
use urlfetch::{Address, ClientConfig, FetchCallId, FetchClient, FetchRequest, FetchResult};

/// urlfetch CLI
#[derive(Parser, Debug)]
#[command(name = "urlfetch-cli")]
#[command(about = "CLI for the asynchronous URL fetch service")]
#[command(version)]
struct Args {
    /// Service address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:10190")]
    server: Address,

    /// Max bytes per socket read
    #[arg(long, default_value = "1024")]
    chunk_size: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch a URL and wait for the result
    Fetch(RequestArgs),

    /// Start a fetch and print its call id
    Start(RequestArgs),

    /// Print the result of a started fetch
    Result {
        /// Fetch call id printed by `start`
        fid: FetchCallId,

        /// Return immediately if the fetch is not finished
        #[arg(long)]
        nowait: bool,
    },
}

#[derive(ClapArgs, Debug)]
struct RequestArgs {
    /// The URL to fetch
    url: String,

    /// HTTP method
    #[arg(short = 'X', long, default_value = "GET")]
    method: String,

    /// Request body
    #[arg(short, long, default_value = "")]
    data: String,

    /// Request header, "Name: value" (repeatable)
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    headers: Vec<(String, String)>,
}

impl RequestArgs {
    fn to_request(&self) -> FetchRequest {
        self.headers.iter().fold(
            FetchRequest::new(&self.url)
                .method(&self.method)
                .payload(self.data.as_bytes()),
            |req, (name, value)| req.header(name, value),
        )
    }
}

fn parse_header(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once(':')
        .ok_or_else(|| format!("expected \"Name: value\", got {:?}", s))?;

    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty header name in {:?}", s));
    }

    Ok((name.to_string(), value.trim().to_string()))
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    tracing::debug!("urlfetch CLI v{}", urlfetch::VERSION);
    tracing::debug!("Service address: {}", args.server);

    let config = ClientConfig::builder()
        .address(args.server.clone())
        .max_chunk_size(args.chunk_size)
        .build();
    let mut client = FetchClient::with_config(config);

    let outcome = run(&mut client, &args.command);

    if let Err(e) = client.close() {
        tracing::warn!("Failed to close connection: {}", e);
    }

    if let Err(e) = outcome {
        tracing::error!("{}", e);
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(client: &mut FetchClient, command: &Commands) -> urlfetch::Result<()> {
    match command {
        Commands::Fetch(req) => {
            let result = client.fetch(&req.to_request())?;
            print_result(&result)
        }
        Commands::Start(req) => {
            let fid = client.start_fetch(&req.to_request())?;
            println!("{}", fid);
            Ok(())
        }
        Commands::Result { fid, nowait } => {
            let result = client.get_result(fid, *nowait)?;
            print_result(&result)
        }
    }
}

fn print_result(result: &FetchResult) -> urlfetch::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out, "{}", result.status_code)?;
    for (name, value) in &result.headers {
        writeln!(out, "{}: {}", name, value)?;
    }
    writeln!(out)?;
    out.write_all(&result.body)?;
    out.flush()?;

    Ok(())
}
