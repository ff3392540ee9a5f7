//! Vendors command - list configured vendor profiles.

use clap::Args;
use console::style;

use tally_core::Lane;

use super::load_config;

/// Arguments for the vendors command.
#[derive(Args)]
pub struct VendorsArgs {
    /// Print profiles as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: VendorsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&config.vendors)?);
        return Ok(());
    }

    println!("{}", style("Configured vendors:").bold());
    println!();

    for vendor in config.vendors.iter() {
        let lane = match vendor.lane {
            Lane::Structured => "structured (.csv)",
            Lane::Unstructured => "unstructured (.pdf)",
        };
        println!("  {:<10} {}", style(&vendor.id).cyan(), vendor.name);
        println!("  {:<10} lane: {}", "", lane);
        if let Some(catalog) = &vendor.catalog {
            let status = if catalog.exists() {
                style("found").green()
            } else {
                style("missing").yellow()
            };
            println!("  {:<10} catalog: {} [{}]", "", catalog.display(), status);
        }
        println!();
    }

    Ok(())
}
