//! # LNS Bridge CLI
//!
//! Command-line access to the network server REST API: nodes, uplink
//! payloads, downlinks and pushmode callbacks.

use anyhow::{bail, Context, Result};
use lns_bridge_client::{
    decode_payload, encode_payload, ApiResponse, Callback, Downlink, LnsClient, RetryPolicy,
};
use std::collections::HashMap;
use std::env;
use tracing_subscriber::EnvFilter;

mod config;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();

    let Some(command) = args.first() else {
        print_help();
        return Ok(());
    };
    let rest = &args[1..];

    match command.as_str() {
        "encode" => {
            let [text] = rest else {
                bail!("Usage: lns-bridge encode <text>");
            };
            println!("{}", encode_payload(text.as_bytes()));
        }
        "decode" => {
            let [encoded] = rest else {
                bail!("Usage: lns-bridge decode <base64>");
            };
            let bytes = decode_payload(encoded).context("Failed to decode")?;
            println!("{}", String::from_utf8_lossy(&bytes));
        }
        "nodes" => {
            let client = connect()?;
            print_response(&client.list_nodes().await?);
        }
        "latest" => {
            let [deveui] = rest else {
                bail!("Usage: lns-bridge latest <deveui>");
            };
            let client = connect()?;
            print_response(&client.get_latest_payload(deveui).await?);
        }
        "payloads" => {
            let [deveui] = rest else {
                bail!("Usage: lns-bridge payloads <deveui>");
            };
            let client = connect()?;
            print_response(&client.list_payloads(deveui).await?);
        }
        "send" => {
            let downlink = parse_downlink(rest)?;
            let client = connect()?;
            print_response(&client.send_data(&downlink).await?);
        }
        "register" => {
            let callback = parse_callback(rest)?;
            let client = connect()?;
            print_response(&client.register_callback(callback.as_ref()).await?);
        }
        "unregister" => {
            let client = connect()?;
            print_response(&client.unregister_callbacks().await?);
        }
        "help" | "--help" | "-h" => {
            print_help();
        }
        cmd => {
            eprintln!("Unknown command: {cmd}");
            print_help();
            std::process::exit(1);
        }
    }

    Ok(())
}

fn connect() -> Result<LnsClient> {
    let config = config::from_env()?;
    tracing::info!(base_url = %config.base_url, "Connecting to network server");
    LnsClient::new(config).context("Failed to create client")
}

/// Print JSON bodies pretty, anything else verbatim.
fn print_response(response: &ApiResponse) {
    match response.json() {
        Ok(value) if !value.is_null() => match serde_json::to_string_pretty(&value) {
            Ok(pretty) => println!("{pretty}"),
            Err(_) => println!("{}", response.body),
        },
        Ok(_) => {}
        Err(_) => println!("{}", response.body),
    }
}

/// Split arguments into positionals, `--key value` options and bare switches.
struct Args {
    positional: Vec<String>,
    options: HashMap<String, String>,
    switches: Vec<String>,
}

impl Args {
    fn parse(args: &[String], valued: &[&str], switches: &[&str]) -> Result<Self> {
        let mut parsed = Self {
            positional: Vec::new(),
            options: HashMap::new(),
            switches: Vec::new(),
        };

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            if valued.contains(&arg.as_str()) {
                let value = iter
                    .next()
                    .with_context(|| format!("{arg} requires a value"))?;
                parsed.options.insert(arg.clone(), value.clone());
            } else if switches.contains(&arg.as_str()) {
                parsed.switches.push(arg.clone());
            } else if arg.starts_with("--") {
                bail!("Unknown option: {arg}");
            } else {
                parsed.positional.push(arg.clone());
            }
        }

        Ok(parsed)
    }

    fn option(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }

    fn switch(&self, name: &str) -> bool {
        self.switches.iter().any(|s| s == name)
    }
}

fn parse_port(value: &str) -> Result<u16> {
    value
        .parse()
        .with_context(|| format!("Invalid port: {value}"))
}

fn parse_downlink(args: &[String]) -> Result<Downlink> {
    let args = Args::parse(args, &["--port", "--fcnt", "--confirmed"], &["--base64"])?;
    let [deveui, payload] = args.positional.as_slice() else {
        bail!(
            "Usage: lns-bridge send <deveui> <payload> [--port N] [--fcnt NAME] \
             [--confirmed true|false] [--base64]"
        );
    };

    let bytes = if args.switch("--base64") {
        decode_payload(payload).context("Invalid base64 payload")?
    } else {
        payload.as_bytes().to_vec()
    };

    let mut downlink = Downlink::new(deveui.clone(), bytes);
    if let Some(port) = args.option("--port") {
        downlink.port = Some(parse_port(port)?);
    }
    if let Some(fcnt) = args.option("--fcnt") {
        downlink.fcnt = Some(fcnt.to_string());
    }
    if let Some(confirmed) = args.option("--confirmed") {
        downlink.confirmed = Some(
            confirmed
                .parse()
                .with_context(|| format!("Invalid --confirmed value: {confirmed}"))?,
        );
    }

    Ok(downlink)
}

/// Callback from flags; `None` when no flag is given so the configured
/// default applies.
fn parse_callback(args: &[String]) -> Result<Option<Callback>> {
    let args = Args::parse(
        args,
        &["--host", "--port", "--path-prefix", "--auth"],
        &["--no-retry"],
    )?;
    if let Some(extra) = args.positional.first() {
        bail!("Unexpected argument: {extra}");
    }
    if args.options.is_empty() && args.switches.is_empty() {
        return Ok(None);
    }

    let mut callback = Callback::new(
        args.option("--host").unwrap_or_default(),
        args.option("--path-prefix").unwrap_or_default(),
    );
    if let Some(port) = args.option("--port") {
        callback.port = Some(parse_port(port)?);
    }
    if let Some(auth) = args.option("--auth") {
        callback.auth = Some(auth.to_string());
    }
    if args.switch("--no-retry") {
        callback.retry_policy = Some(RetryPolicy::NoRetry);
    }

    Ok(Some(callback))
}

fn print_help() {
    println!(
        r#"LNS Bridge CLI

USAGE:
    lns-bridge <COMMAND> [OPTIONS]

COMMANDS:
    nodes                      List nodes
    latest <deveui>            Show the latest uplink payload of a node
    payloads <deveui>          List uplink payloads of a node
    send <deveui> <payload>    Queue a downlink
        --port N               LoRaWAN port (default 1)
        --fcnt NAME            Frame counter name
        --confirmed true|false Confirmed downlink flag
        --base64               Payload argument is already base64
    register                   Start pushmode (uses LNS_CALLBACK without flags)
        --host H --path-prefix P [--port N] [--auth A] [--no-retry]
    unregister                 Stop pushmode
    encode <text>              Base64-encode a payload
    decode <base64>            Decode a base64 payload
    help                       Show this help message

ENVIRONMENT:
    LNS_BASE_URL, LNS_USERNAME, LNS_PASSWORD, LNS_TIMEOUT_SECS,
    LNS_CA_CERT, LNS_CALLBACK, RUST_LOG

EXAMPLES:
    lns-bridge send 70B3D57ED0001234 hello --port 2 --confirmed true
    lns-bridge register --host hooks.example.com --path-prefix /lns --port 443
"#
    );
}
