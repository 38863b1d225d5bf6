//! `facets`: the values each filter offers under the current selections

use crate::context::Context;
use crate::{FilterArgs, OutputFormat};
use anyhow::Result;
use fuelscope_catalog::FilterState;
use fuelscope_cli::output::{format_count, Status};
use owo_colors::OwoColorize;
use serde::Serialize;

#[derive(Serialize)]
struct FacetsOutput<'a> {
    filters: &'a FilterState,
    matching: usize,
    #[serde(flatten)]
    catalog: &'a fuelscope_catalog::FacetCatalog,
}

pub fn run(ctx: &mut Context, filters: &FilterArgs) -> Result<()> {
    let engine = ctx.session.engine_mut();
    filters.apply(engine);

    let output = FacetsOutput {
        filters: engine.state(),
        matching: engine.filtered().len(),
        catalog: engine.catalog(),
    };

    if ctx.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let sections = [
        ("Brands", &output.catalog.brands),
        ("Provinces", &output.catalog.provinces),
        ("Municipalities", &output.catalog.municipalities),
        ("Localities", &output.catalog.localities),
        ("Fuel types", &output.catalog.fuel_types),
    ];

    for (title, values) in sections {
        Status::header(&format!("{} ({})", title, values.len()));
        if values.is_empty() {
            println!("{}", "none".dimmed());
        }
        for value in values {
            println!("{value}");
        }
    }

    println!();
    Status::info(&format!("{} matching", format_count(output.matching, "station", "stations")));
    Ok(())
}
