use std::env;
use std::path::PathBuf;
use std::process;

use techportal_core::icons::{self, IconAsset};
use techportal_core::{PortalConfig, Result};

mod scenario;

use scenario::{Scenario, replay};

fn print_usage() {
    eprintln!("Usage: techportal <COMMAND> [OPTIONS]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  simulate <scenario.json>   Replay a recorded event scenario and print the final state");
    eprintln!("  assets <dir>               Check that every manifest icon exists in <dir>");
    eprintln!("  manifest-icons             Print the manifest `icons` array as JSON");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <FILE>     TOML configuration (simulate)");
    eprintln!("  --base <PREFIX>     src prefix for manifest entries (default: icons/)");
    eprintln!("  -h, --help          Show this help");
    eprintln!();
    eprintln!("Logging is controlled through RUST_LOG (default: info).");
}

/// Value following `flag`, if present. Exits when the flag has no value.
fn flag_value(args: &[String], flag: &str) -> Option<String> {
    let pos = args.iter().position(|a| a == flag)?;
    match args.get(pos + 1) {
        Some(value) => Some(value.clone()),
        None => {
            eprintln!("Error: {flag} requires a value");
            process::exit(2);
        }
    }
}

/// First argument that is neither a flag nor a flag's value.
fn positional(args: &[String]) -> Option<&String> {
    let mut i = 0;
    while i < args.len() {
        if args[i].starts_with('-') {
            i += 2;
            continue;
        }
        return Some(&args[i]);
    }
    None
}

async fn simulate(args: &[String]) -> Result<()> {
    let Some(path) = positional(args) else {
        eprintln!("Error: simulate requires a scenario file");
        process::exit(2);
    };
    let config = match flag_value(args, "--config") {
        Some(file) => PortalConfig::load(file)?,
        None => PortalConfig::default(),
    };

    let scenario = Scenario::from_json(&std::fs::read_to_string(path)?)?;
    log::info!("replaying {} steps from {path}", scenario.steps.len());
    let report = replay(&scenario, &config).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn check_assets(args: &[String]) {
    let Some(dir) = positional(args) else {
        eprintln!("Error: assets requires a directory");
        process::exit(2);
    };
    let dir = PathBuf::from(dir);
    let missing = icons::missing_in(&dir);
    let total = IconAsset::all().len();

    if missing.is_empty() {
        println!("all {total} icon assets present in {}", dir.display());
        return;
    }
    for asset in &missing {
        println!("missing: {} ({}px)", asset.file_name, asset.size);
    }
    eprintln!("{} of {total} icon assets missing", missing.len());
    process::exit(1);
}

fn print_manifest_icons(args: &[String]) -> Result<()> {
    let base = flag_value(args, "--base").unwrap_or_else(|| "icons/".to_string());
    println!(
        "{}",
        serde_json::to_string_pretty(&icons::manifest_icons(&base))?
    );
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        print_usage();
        return Ok(());
    }

    let rest = args.get(1..).unwrap_or_default();
    match args.first().map(String::as_str) {
        Some("simulate") => simulate(rest).await,
        Some("assets") => {
            check_assets(rest);
            Ok(())
        }
        Some("manifest-icons") => print_manifest_icons(rest),
        Some(other) => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(2);
        }
        None => {
            print_usage();
            process::exit(2);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn positional_skips_flag_values() {
        let a = args(&["--config", "portal.toml", "scenario.json"]);
        assert_eq!(positional(&a).map(String::as_str), Some("scenario.json"));
    }

    #[test]
    fn flag_value_reads_following_argument() {
        let a = args(&["scenario.json", "--config", "portal.toml"]);
        assert_eq!(flag_value(&a, "--config").as_deref(), Some("portal.toml"));
        assert_eq!(flag_value(&a, "--base"), None);
    }
}
