//! Text renderers for restaurants and status lines.
//!
//! Every function returns a `String` so the chat loop and the one-shot
//! commands decide where it is printed. Missing fields are skipped, never
//! rendered as placeholders.

use std::fmt::Write;

use console::style;

use forkful_types::error::ApiError;
use forkful_types::location::Location;
use forkful_types::restaurant::{Restaurant, Review};

/// Reviews shown per card.
const MAX_REVIEWS: usize = 2;

/// Render a restaurant list: header and one card per entry, in order.
pub fn render_restaurant_list(restaurants: &[Restaurant]) -> String {
    if restaurants.is_empty() {
        return format!("  {}\n", style("No restaurants found").dim());
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {}",
        style(format!("Recommended Restaurants ({})", restaurants.len())).bold()
    );
    for (index, restaurant) in restaurants.iter().enumerate() {
        out.push('\n');
        out.push_str(&render_restaurant_card(restaurant, Some(index + 1)));
    }
    out
}

/// Render one restaurant card. `number` prefixes the name when the card is
/// part of a list, so `/details <n>` can refer to it.
pub fn render_restaurant_card(restaurant: &Restaurant, number: Option<usize>) -> String {
    let mut out = String::new();

    let title = match number {
        Some(n) => format!("{n}. {}", restaurant.name),
        None => restaurant.name.clone(),
    };
    let _ = write!(out, "  {}", style(title).cyan().bold());
    if restaurant.is_closed {
        let _ = write!(out, " {}", style("(closed)").red());
    }
    out.push('\n');

    let mut facts = Vec::new();
    if let Some(rating) = restaurant.rating {
        facts.push(format!("{} {rating}", style("★").yellow()));
    }
    if let Some(price) = &restaurant.price {
        facts.push(style(price).green().to_string());
    }
    if let Some(count) = restaurant.review_count {
        facts.push(format!("{count} reviews"));
    }
    if !facts.is_empty() {
        let _ = writeln!(out, "     {}", facts.join(" · "));
    }

    if !restaurant.categories.is_empty() {
        let titles: Vec<&str> = restaurant
            .categories
            .iter()
            .map(|c| c.title.as_str())
            .collect();
        let _ = writeln!(out, "     {}", style(titles.join(", ")).dim());
    }

    if let Some(address) = address_line(restaurant) {
        let _ = writeln!(out, "     📍 {address}");
    }
    if let Some(phone) = &restaurant.phone {
        let _ = writeln!(out, "     ☎ {phone}");
    }
    if let Some(image) = &restaurant.image_url {
        let _ = writeln!(out, "     🖼 {}", style(image).dim());
    }
    if let Some(summary) = &restaurant.menu_summary {
        let _ = writeln!(out, "     {}", style(summary).italic());
    }

    if !restaurant.reviews.is_empty() {
        let _ = writeln!(out, "     {}", style("Recent reviews:").bold());
        for review in restaurant.reviews.iter().take(MAX_REVIEWS) {
            out.push_str(&render_review(review));
        }
    }

    if let Some(url) = &restaurant.url {
        let _ = writeln!(out, "     {} {}", style("View on Yelp:").dim(), style(url).underlined());
    }
    out
}

/// "address1, city · 1.2 km", or `None` when there is no location at all.
fn address_line(restaurant: &Restaurant) -> Option<String> {
    let location = restaurant.location.as_ref()?;
    let mut line = [location.address1.as_deref(), location.city.as_deref()]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    if let Some(distance) = restaurant.distance {
        if !line.is_empty() {
            line.push_str(" · ");
        }
        line.push_str(&format_distance(distance));
    }
    (!line.is_empty()).then_some(line)
}

/// Meters to kilometers with one decimal.
pub fn format_distance(meters: f64) -> String {
    format!("{:.1} km", meters / 1000.0)
}

/// Five-star bar: a star is filled while its position is below the rating.
pub fn star_bar(rating: f64) -> String {
    (0..5)
        .map(|i| if (i as f64) < rating { '★' } else { '☆' })
        .collect()
}

fn render_review(review: &Review) -> String {
    let mut line = format!("       {} ", style(star_bar(review.rating)).yellow());
    line.push_str(&clamp_text(&review.text, 160));
    if let Some(author) = review.author() {
        let _ = write!(line, " {}", style(format!("({author})")).dim());
    }
    line.push('\n');
    line
}

/// Collapse whitespace and cut to `max` characters.
fn clamp_text(text: &str, max: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        return flat;
    }
    let cut: String = flat.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", cut.trim_end())
}

/// Numbered follow-up suggestions, or an empty string when there are none.
pub fn render_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        return String::new();
    }
    let mut out = format!("  {}\n", style("Suggestions:").dim());
    for (i, suggestion) in suggestions.iter().enumerate() {
        let _ = writeln!(out, "    {} {suggestion}", style(format!("[{}]", i + 1)).cyan());
    }
    let _ = writeln!(out, "  {}", style("Send one with /suggest <n>").dim());
    out
}

/// Inline banner for a failed backend call.
pub fn render_api_error(err: &ApiError) -> String {
    let hint = match err {
        ApiError::Transport(_) => "Is the backend running? Check --api-url or FORKFUL_API_URL.",
        ApiError::Timeout => "The backend took too long to answer. Try again.",
        ApiError::Status { status, .. } if *status >= 500 => "The backend hit an internal error.",
        ApiError::Status { .. } => "The backend rejected the request.",
        ApiError::Decode(_) => "The backend sent a response this client does not understand.",
    };
    format!(
        "  {} {err}\n  {}\n",
        style("!").red().bold(),
        style(hint).dim()
    )
}

/// One-line location status.
pub fn render_location(location: Option<&Location>) -> String {
    match location {
        Some(location) => format!("  📍 Location set: {}\n", style(location).green()),
        None => format!("  {}\n", style("📍 No location set").dim()),
    }
}

#[cfg(test)]
mod tests {
    use forkful_types::restaurant::{Category, RestaurantLocation, ReviewUser};

    use super::*;

    fn bare(name: &str) -> Restaurant {
        serde_json::from_value(serde_json::json!({"id": name.to_lowercase(), "name": name})).unwrap()
    }

    fn full() -> Restaurant {
        Restaurant {
            rating: Some(4.5),
            review_count: Some(120),
            price: Some("$$".to_string()),
            categories: vec![Category {
                alias: "italian".to_string(),
                title: "Italian".to_string(),
            }],
            location: Some(RestaurantLocation {
                address1: Some("123 Main St".to_string()),
                city: Some("Springfield".to_string()),
                ..Default::default()
            }),
            phone: Some("555-1234".to_string()),
            image_url: Some("https://img.example/luigi.jpg".to_string()),
            url: Some("https://yelp.example/luigi".to_string()),
            distance: Some(1234.0),
            reviews: vec![
                Review {
                    id: "r1".to_string(),
                    rating: 5.0,
                    text: "Great pasta".to_string(),
                    time_created: String::new(),
                    user: Some(ReviewUser {
                        name: Some("Alice".to_string()),
                        image_url: None,
                    }),
                    user_name: None,
                },
                Review {
                    id: "r2".to_string(),
                    rating: 3.0,
                    text: "Fine".to_string(),
                    time_created: String::new(),
                    user: None,
                    user_name: Some("Bob".to_string()),
                },
                Review {
                    id: "r3".to_string(),
                    rating: 1.0,
                    text: "Third review".to_string(),
                    time_created: String::new(),
                    user: None,
                    user_name: None,
                },
            ],
            ..bare("Luigi's")
        }
    }

    #[test]
    fn empty_list_says_none_found() {
        console::set_colors_enabled(false);
        assert!(render_restaurant_list(&[]).contains("No restaurants found"));
    }

    #[test]
    fn list_keeps_order_and_count() {
        console::set_colors_enabled(false);
        let out = render_restaurant_list(&[bare("Second"), bare("First")]);
        assert!(out.contains("Recommended Restaurants (2)"));
        let second = out.find("1. Second").unwrap();
        let first = out.find("2. First").unwrap();
        assert!(second < first);
    }

    #[test]
    fn bare_card_skips_missing_fields() {
        console::set_colors_enabled(false);
        let out = render_restaurant_card(&bare("Plain"), None);
        assert_eq!(out.trim(), "Plain");
        assert!(!out.contains('★'));
        assert!(!out.contains('☎'));
        assert!(!out.contains("📍"));
    }

    #[test]
    fn full_card_shows_every_field() {
        console::set_colors_enabled(false);
        let out = render_restaurant_card(&full(), None);
        assert!(out.contains("★ 4.5 · $$ · 120 reviews"));
        assert!(out.contains("Italian"));
        assert!(out.contains("123 Main St, Springfield · 1.2 km"));
        assert!(out.contains("☎ 555-1234"));
        assert!(out.contains("https://img.example/luigi.jpg"));
        assert!(out.contains("https://yelp.example/luigi"));
        assert!(out.contains("★★★★★ Great pasta (Alice)"));
        assert!(out.contains("★★★☆☆ Fine (Bob)"));
        assert!(!out.contains("Third review"));
    }

    #[test]
    fn address_line_with_only_distance() {
        let restaurant = Restaurant {
            location: Some(RestaurantLocation::default()),
            distance: Some(500.0),
            ..bare("Far")
        };
        assert_eq!(address_line(&restaurant).as_deref(), Some("0.5 km"));
        let no_location = Restaurant {
            distance: Some(500.0),
            ..bare("Nowhere")
        };
        assert!(address_line(&no_location).is_none());
    }

    #[test]
    fn star_bar_fills_partial_ratings() {
        assert_eq!(star_bar(4.5), "★★★★★");
        assert_eq!(star_bar(4.0), "★★★★☆");
        assert_eq!(star_bar(0.0), "☆☆☆☆☆");
    }

    #[test]
    fn long_review_text_is_clamped() {
        let text = "word ".repeat(100);
        let clamped = clamp_text(&text, 20);
        assert!(clamped.ends_with("..."));
        assert!(clamped.chars().count() <= 20);
    }

    #[test]
    fn suggestions_are_numbered() {
        console::set_colors_enabled(false);
        let out = render_suggestions(&["Cheaper?".to_string(), "Open late?".to_string()]);
        assert!(out.contains("[1] Cheaper?"));
        assert!(out.contains("[2] Open late?"));
        assert!(render_suggestions(&[]).is_empty());
    }

    #[test]
    fn api_error_banner_includes_status() {
        console::set_colors_enabled(false);
        let out = render_api_error(&ApiError::Status {
            status: 500,
            body: "Internal server error".to_string(),
        });
        assert!(out.contains("HTTP 500"));
        assert!(out.contains("internal error"));
    }
}
