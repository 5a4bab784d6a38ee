use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use futures::StreamExt;
use sorng_rds::{
    AwsRegion, CancellationToken, Confirm, Invocation, NoSigning, ParamValue, RdsConfig, RdsError,
    RdsResult, RdsService,
};

mod cli_args;

use cli_args::Args;

/// Asks on the terminal before a mutating command runs.
struct PromptConfirm;

impl Confirm for PromptConfirm {
    fn confirm(&self, action: &str, target: &str) -> bool {
        eprint!("Run {} on '{}'? [y/N] ", action, target);
        if io::stderr().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim(), "y" | "Y" | "yes"),
            Err(_) => false,
        }
    }
}

fn parse_param(raw: &str) -> RdsResult<(String, ParamValue)> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| RdsError::Config(format!("parameter '{}' is not NAME=VALUE", raw)))?;
    let value = serde_json::from_str::<ParamValue>(value)
        .unwrap_or_else(|_| ParamValue::Text(value.to_string()));
    Ok((name.trim().to_string(), value))
}

fn load_config(args: &Args) -> RdsResult<RdsConfig> {
    let mut config = match args.config {
        Some(ref path) => RdsConfig::from_file(path)?,
        None => RdsConfig::default(),
    };
    config.apply_env();
    if let Some(ref region) = args.region {
        config.region = AwsRegion::new(region);
    }
    if let Some(ref url) = args.endpoint_url {
        config.endpoint_url = Some(url.clone());
    }
    if args.confirm {
        config.require_confirmation = true;
    }
    Ok(config)
}

fn invocation(args: &Args, command: &str) -> RdsResult<Invocation> {
    let mut inv = Invocation::new(command);
    for raw in &args.params {
        let (name, value) = parse_param(raw)?;
        inv = inv.param(name, value);
    }
    inv.select = args.select.clone();
    inv.pass_thru = args.pass_thru;
    inv.force = args.force;
    inv.no_auto_iteration = args.no_auto_iteration;
    inv.max_items = args.max_items;
    Ok(inv)
}

async fn run(args: Args) -> RdsResult<()> {
    let config = load_config(&args)?;
    log::warn!("requests are sent unsigned; point --endpoint-url at a signing proxy or emulator");
    let service = RdsService::from_config(config, Arc::new(NoSigning))?
        .with_confirm(Arc::new(PromptConfirm));

    if args.list {
        for info in service.commands() {
            println!("{}", serde_json::to_string(&info)?);
        }
        return Ok(());
    }

    let command = args
        .command
        .as_deref()
        .ok_or_else(|| RdsError::Config("no command given (try --list)".to_string()))?;
    let inv = invocation(&args, command)?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("interrupted; stopping before the next page");
            on_signal.cancel();
        }
    });

    let output = service.invoke_with_cancel(&inv, cancel)?;
    log::info!("{} [{}]", output.action(), output.id());
    let mut values = output.into_stream();
    while let Some(value) = values.next().await {
        println!("{}", serde_json::to_string(&value?)?);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
