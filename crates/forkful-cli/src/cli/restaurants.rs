//! One-shot restaurant commands: search, nearby, show.

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use forkful_types::restaurant::{Restaurant, RestaurantList, RestaurantSearchParams};

use crate::state::AppState;

use super::display::{format_distance, render_restaurant_card};
use super::{Output, SearchArgs, spinner};

/// Search restaurants with structured filters.
///
/// # Examples
///
/// ```bash
/// forkful search ramen --location "Austin, TX" --sort-by rating
/// forkful search --lat 40.71 --lon -74.0 --categories pizza --json
/// ```
pub async fn search(state: &AppState, args: SearchArgs, out: Output) -> Result<()> {
    let params = RestaurantSearchParams {
        query: args.query,
        location: args.location,
        latitude: args.lat,
        longitude: args.lon,
        categories: args.categories,
        price: args.price,
        radius: args.radius,
        limit: args.limit,
        sort_by: args.sort_by,
    };

    let spinner = spinner(out, "Searching restaurants...");
    let result = state.client.search_restaurants(&params).await;
    spinner.finish_and_clear();
    let list = result.context("Restaurant search failed")?;

    print_list(&list, out)
}

/// List restaurants around a coordinate.
pub async fn nearby(
    state: &AppState,
    lat: f64,
    lon: f64,
    radius: u32,
    limit: u32,
    out: Output,
) -> Result<()> {
    let spinner = spinner(out, "Finding nearby restaurants...");
    let result = state
        .client
        .nearby_restaurants(lat, lon, Some(radius), Some(limit))
        .await;
    spinner.finish_and_clear();
    let list = result.context("Nearby lookup failed")?;

    print_list(&list, out)
}

/// Show one restaurant as a card.
pub async fn show(state: &AppState, restaurant_id: &str, include_reviews: bool, out: Output) -> Result<()> {
    let spinner = spinner(out, "Loading restaurant...");
    let result = state
        .client
        .restaurant_details(restaurant_id, include_reviews)
        .await;
    spinner.finish_and_clear();

    let restaurant = result.map_err(|e| {
        if e.is_not_found() {
            anyhow::anyhow!("Restaurant '{restaurant_id}' not found")
        } else {
            anyhow::Error::new(e).context("Failed to load restaurant")
        }
    })?;

    if out.json {
        println!("{}", serde_json::to_string_pretty(&restaurant)?);
        return Ok(());
    }

    println!();
    print!("{}", render_restaurant_card(&restaurant, None));
    println!();
    Ok(())
}

fn print_list(list: &RestaurantList, out: Output) -> Result<()> {
    if out.json {
        println!("{}", serde_json::to_string_pretty(list)?);
        return Ok(());
    }

    if list.restaurants.is_empty() {
        println!();
        println!("  {} No restaurants found", style("i").blue().bold());
        println!();
        return Ok(());
    }

    println!();
    println!("{}", restaurant_table(&list.restaurants));
    println!();
    if !out.quiet {
        println!(
            "  {} of {} restaurant{}. Details: {}",
            style(list.restaurants.len()).bold(),
            style(list.total).bold(),
            if list.total == 1 { "" } else { "s" },
            style("forkful show <ID>").yellow()
        );
        println!();
    }
    Ok(())
}

fn restaurant_table(restaurants: &[Restaurant]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("#").fg(Color::White),
        Cell::new("Name").fg(Color::White),
        Cell::new("Rating").fg(Color::White),
        Cell::new("Price").fg(Color::White),
        Cell::new("Categories").fg(Color::White),
        Cell::new("Distance").fg(Color::White),
        Cell::new("ID").fg(Color::White),
    ]);

    for (i, r) in restaurants.iter().enumerate() {
        let rating = r
            .rating
            .map(|v| format!("★ {v}"))
            .unwrap_or_else(|| "-".to_string());
        let categories = r
            .categories
            .iter()
            .map(|c| c.title.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let distance = r.distance.map(format_distance).unwrap_or_default();

        table.add_row(vec![
            Cell::new(i + 1).fg(Color::DarkGrey),
            Cell::new(&r.name).fg(Color::Cyan),
            Cell::new(rating).fg(Color::Yellow),
            Cell::new(r.price.as_deref().unwrap_or("")).fg(Color::Green),
            Cell::new(categories).fg(Color::White),
            Cell::new(distance).fg(Color::DarkGrey),
            Cell::new(&r.id).fg(Color::DarkGrey),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_renders_sparse_rows() {
        let restaurants: Vec<Restaurant> = serde_json::from_value(serde_json::json!([
            {"id": "a", "name": "Alpha", "rating": 4.0, "price": "$", "distance": 800.0},
            {"id": "b", "name": "Beta"}
        ]))
        .unwrap();
        let rendered = restaurant_table(&restaurants).to_string();
        assert!(rendered.contains("Alpha"));
        assert!(rendered.contains("0.8 km"));
        assert!(rendered.contains("Beta"));
    }
}
