//! `fuel-types`: fuel labels of the listing

use crate::context::Context;
use crate::OutputFormat;
use anyhow::Result;
use fuelscope_cli::output::Status;

pub fn run(ctx: &Context) -> Result<()> {
    let fuel_types = &ctx.session.engine().catalog().fuel_types;

    match ctx.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(fuel_types)?),
        OutputFormat::Text if fuel_types.is_empty() => Status::warning("The listing has no fuel types"),
        OutputFormat::Text => {
            for fuel in fuel_types {
                println!("{fuel}");
            }
        }
    }
    Ok(())
}
