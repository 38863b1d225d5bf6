//! `list`: matching stations, nearest first when a position is given

use crate::context::Context;
use crate::{FilterArgs, OutputFormat};
use anyhow::Result;
use fuelscope_catalog::{FilterField, FixedLocation, LocateOutcome, Position, StationRecord};
use fuelscope_cli::output::{format_count, format_distance, format_price, Status};
use fuelscope_cli::table::Table;
use tracing::debug;

pub async fn run(
    ctx: &mut Context,
    filters: &FilterArgs,
    position: Option<(f64, f64)>,
    radius: Option<f64>,
    limit: Option<usize>,
) -> Result<()> {
    filters.apply(ctx.session.engine_mut());

    let stations = match position {
        Some((lat, lng)) => {
            let source = FixedLocation::new(Position::new(lat, lng));
            if let LocateOutcome::Applied { located, .. } = ctx.session.locate(&source).await? {
                debug!(located, "Ranked stations by distance");
            }
            ctx.session.within_radius(radius.unwrap_or(ctx.search.radius_km))?
        }
        None => ctx.session.engine().filtered().to_vec(),
    };

    let total = stations.len();
    let limit = limit.unwrap_or(ctx.search.limit);
    let shown: Vec<StationRecord> = stations.into_iter().take(limit).collect();

    if ctx.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&shown)?);
        return Ok(());
    }

    if shown.is_empty() {
        Status::warning("No stations match the current filters");
        return Ok(());
    }

    let fuel = ctx.session.engine().state().get(FilterField::FuelType);
    println!("{}", render(&shown, fuel, position.is_some()));

    println!();
    let summary = format!(
        "Showing {} of {}",
        shown.len(),
        format_count(total, "station", "stations")
    );
    Status::info(&summary);
    Ok(())
}

fn render(stations: &[StationRecord], fuel: Option<&str>, ranked: bool) -> String {
    let mut headers = vec!["Brand", "Address", "Locality", "Municipality", "Province"];
    if let Some(fuel) = fuel {
        headers.push(fuel);
    }
    if ranked {
        headers.push("Distance");
    }

    let mut table = Table::new(headers.iter().copied());
    for index in 5..headers.len() {
        table = table.align_right(index);
    }

    for station in stations {
        let mut row = vec![
            station.brand.clone(),
            station.address.clone().unwrap_or_default(),
            station.locality.clone(),
            station.municipality.clone(),
            station.province.clone(),
        ];
        if let Some(fuel) = fuel {
            row.push(format_price(station.price(fuel)));
        }
        if ranked {
            row.push(format_distance(station.distance_to_user));
        }
        table.push_row(row);
    }
    table.render()
}
