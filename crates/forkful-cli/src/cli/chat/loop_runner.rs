//! Main chat loop orchestration.
//!
//! Wires the conversation manager and location provider to the terminal:
//! selects over key input, transcript changes, and finished background
//! work (sends, location lookups, restaurant lookups), so typing stays
//! responsive while requests are in flight.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use console::style;
use indicatif::ProgressStyle;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use forkful_core::conversation::{
    ConversationError, ConversationManager, ConversationOptions, FailurePolicy, InFlightPolicy,
};
use forkful_core::location::LocationProvider;
use forkful_infra::api::RestClient;
use forkful_infra::geo::Geolocator;
use forkful_types::chat::ChatResponse;
use forkful_types::error::{ApiError, GeolocationError};
use forkful_types::location::{Coordinates, Location};
use forkful_types::preferences::Preferences;
use forkful_types::restaurant::{Restaurant, RestaurantList};

use crate::cli::ChatArgs;
use crate::cli::display::{
    render_api_error, render_location, render_restaurant_card, render_restaurant_list,
    render_suggestions,
};
use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand, DetailsTarget, LocationAction, help_text};
use super::input::{ChatInput, InputEvent};
use super::renderer::TranscriptView;

type Manager = ConversationManager<RestClient>;
type Locator = LocationProvider<Geolocator>;

/// Work finished in the background.
enum Background {
    /// A send's outcome, tagged with the clear generation it started in.
    Reply {
        generation: u64,
        result: Result<ChatResponse, ConversationError>,
    },
    Located(Result<Coordinates, GeolocationError>),
    Details(Result<Restaurant, ApiError>),
    Nearby(Result<RestaurantList, ApiError>),
}

/// Whether the loop keeps going after a command.
#[derive(Debug, PartialEq)]
enum Flow {
    Continue,
    Exit,
}

/// Everything the chat loop owns besides the terminal.
struct ChatSession {
    client: Arc<RestClient>,
    manager: Arc<Manager>,
    locator: Arc<Locator>,
    preferences: Option<Preferences>,
    /// Restaurant pane: the most recent list shown.
    restaurants: Vec<Restaurant>,
    tasks: JoinSet<Background>,
    /// Details/nearby lookups in flight.
    lookups: usize,
    /// Bumped by `/clear`; replies from an older generation are dropped.
    generation: u64,
}

impl ChatSession {
    fn new(client: Arc<RestClient>, geolocator: Geolocator, args: &ChatArgs) -> Self {
        let options = ConversationOptions {
            failure_policy: if args.rollback_on_error {
                FailurePolicy::RollBack
            } else {
                FailurePolicy::KeepMessage
            },
            in_flight_policy: if args.cancel_superseded {
                InFlightPolicy::LatestWins
            } else {
                InFlightPolicy::Concurrent
            },
        };
        let locator = LocationProvider::new(geolocator);
        if let Some(location) = initial_location(args) {
            locator.set_manual_location(location);
        }

        Self {
            manager: Arc::new(ConversationManager::with_options(Arc::clone(&client), options)),
            client,
            locator: Arc::new(locator),
            preferences: preferences_from_args(args),
            restaurants: Vec::new(),
            tasks: JoinSet::new(),
            lookups: 0,
            generation: 0,
        }
    }

    /// Send a message in the background.
    fn send(&mut self, text: String) {
        let manager = Arc::clone(&self.manager);
        let location = self.locator.location();
        let preferences = self.preferences.clone();
        let generation = self.generation;
        self.tasks.spawn(async move {
            let result = manager.send_message(&text, location, preferences).await;
            Background::Reply { generation, result }
        });
    }

    fn detect_location(&mut self) {
        let locator = Arc::clone(&self.locator);
        self.tasks
            .spawn(async move { Background::Located(locator.get_current_location().await) });
    }

    fn fetch_details(&mut self, restaurant_id: String) {
        let client = Arc::clone(&self.client);
        self.lookups += 1;
        self.tasks.spawn(async move {
            Background::Details(client.restaurant_details(&restaurant_id, true).await)
        });
    }

    fn fetch_nearby(&mut self, at: Coordinates) {
        let client = Arc::clone(&self.client);
        self.lookups += 1;
        self.tasks.spawn(async move {
            Background::Nearby(
                client
                    .nearby_restaurants(at.latitude, at.longitude, None, None)
                    .await,
            )
        });
    }

    /// Spinner message while anything is pending.
    fn status_text(&self) -> Option<&'static str> {
        if self.manager.is_loading() {
            Some("Finding restaurants...")
        } else if self.locator.is_loading() {
            Some("Detecting location...")
        } else if self.lookups > 0 {
            Some("Loading...")
        } else {
            None
        }
    }

    /// Run a slash command. Returns the text to print.
    fn run_command(&mut self, command: ChatCommand) -> (Flow, String) {
        let output = match command {
            ChatCommand::Help => help_text(),
            ChatCommand::Exit => return (Flow::Exit, String::new()),
            ChatCommand::Clear => {
                // The discard request runs detached; its failure is only logged.
                drop(self.manager.clear_messages());
                self.restaurants.clear();
                self.generation += 1;
                format!("  {}\n", style("Conversation cleared.").dim())
            }
            ChatCommand::Location(action) => self.run_location(action),
            ChatCommand::Suggest(n) => {
                let state = self.manager.state();
                let suggestion = n.checked_sub(1).and_then(|i| state.suggestions().get(i)).cloned();
                match suggestion {
                    Some(text) => {
                        self.send(text);
                        String::new()
                    }
                    None => notice(&format!("No suggestion #{n}.")),
                }
            }
            ChatCommand::Details(DetailsTarget::Index(n)) => match n
                .checked_sub(1)
                .and_then(|i| self.restaurants.get(i))
            {
                Some(restaurant) => {
                    let id = restaurant.id.clone();
                    self.fetch_details(id);
                    String::new()
                }
                None => notice(&format!("No restaurant #{n} in the current list.")),
            },
            ChatCommand::Details(DetailsTarget::Id(id)) => {
                self.fetch_details(id);
                String::new()
            }
            ChatCommand::Nearby => match self.locator.location().and_then(|l| l.coordinates()) {
                Some(at) => {
                    self.fetch_nearby(at);
                    String::new()
                }
                None => notice("Nearby search needs coordinates. Use /location to detect them."),
            },
            ChatCommand::Restaurants => render_restaurant_list(&self.restaurants),
            ChatCommand::Session => {
                let state = self.manager.state();
                match &state.session_id {
                    Some(id) => format!(
                        "  Session {} · {} messages\n",
                        style(id).cyan(),
                        state.messages.len()
                    ),
                    None => notice("No session yet. It starts with your first message."),
                }
            }
            // Usage errors carry a sentence; unrecognized commands carry just the name.
            ChatCommand::Unknown(what) if what.contains(' ') => notice(&what),
            ChatCommand::Unknown(what) => format!(
                "  {} Unknown command: {}. Type /help for available commands.\n",
                style("?").yellow().bold(),
                style(what).dim()
            ),
        };
        (Flow::Continue, output)
    }

    fn run_location(&mut self, action: LocationAction) -> String {
        match action {
            LocationAction::Detect => {
                self.detect_location();
                String::new()
            }
            LocationAction::Set(address) => {
                self.locator
                    .set_manual_location(Location::from_address(address, None, None));
                render_location(self.locator.location().as_ref())
            }
            LocationAction::Clear => {
                self.locator.clear_location();
                render_location(None)
            }
            LocationAction::Show => render_location(self.locator.location().as_ref()),
        }
    }

    /// Apply a finished background task. Returns the text to print.
    fn handle_background(&mut self, done: Background) -> String {
        match done {
            Background::Reply { generation, .. } if generation != self.generation => {
                debug!(generation, "Dropping reply from before /clear");
                String::new()
            }
            Background::Reply {
                result: Ok(response),
                ..
            } => {
                let suggestions = render_suggestions(response.suggestions());
                let mut out = String::new();
                if let Some(list) = response.restaurants {
                    out.push('\n');
                    out.push_str(&render_restaurant_list(&list));
                    self.restaurants = list;
                }
                if !suggestions.is_empty() {
                    out.push('\n');
                    out.push_str(&suggestions);
                }
                out
            }
            Background::Reply {
                result: Err(ConversationError::Api(e)),
                ..
            } => render_api_error(&e),
            Background::Reply { result: Err(e), .. } => {
                debug!(reason = %e, "Send produced no reply");
                String::new()
            }
            Background::Located(Ok(_)) => render_location(self.locator.location().as_ref()),
            Background::Located(Err(e)) => notice(&format!("Could not get location: {e}")),
            Background::Details(result) => {
                self.lookups = self.lookups.saturating_sub(1);
                match result {
                    Ok(restaurant) => format!("\n{}", render_restaurant_card(&restaurant, None)),
                    Err(e) if e.is_not_found() => notice("Restaurant not found."),
                    Err(e) => render_api_error(&e),
                }
            }
            Background::Nearby(result) => {
                self.lookups = self.lookups.saturating_sub(1);
                match result {
                    Ok(list) => {
                        self.restaurants = list.restaurants;
                        format!("\n{}", render_restaurant_list(&self.restaurants))
                    }
                    Err(e) => render_api_error(&e),
                }
            }
        }
    }
}

fn notice(text: &str) -> String {
    format!("  {} {text}\n", style("!").yellow().bold())
}

/// Preferences sent with every message, if any were given.
fn preferences_from_args(args: &ChatArgs) -> Option<Preferences> {
    let mut preferences = Preferences::default();
    if let Some(cuisine) = &args.cuisine {
        preferences = preferences.with_cuisine(cuisine.clone());
    }
    if let Some(price_range) = &args.price_range {
        preferences = preferences.with_price_range(price_range.clone());
    }
    if !args.dietary.is_empty() {
        preferences = preferences.with_dietary(args.dietary.clone());
    }
    (!preferences.is_empty()).then_some(preferences)
}

/// Starting location from `--lat/--lon` or `--address`.
fn initial_location(args: &ChatArgs) -> Option<Location> {
    if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
        return Some(Location::from_coordinates(Coordinates::new(lat, lon)));
    }
    args.address
        .as_ref()
        .map(|address| Location::from_address(address.clone(), args.city.clone(), args.state.clone()))
}

/// Run the interactive chat loop.
pub async fn run_chat_loop(state: &AppState, args: ChatArgs) -> anyhow::Result<()> {
    if !console::Term::stdout().is_term() {
        anyhow::bail!("forkful chat needs an interactive terminal; use `forkful search` for scripted lookups");
    }

    let geolocator = Geolocator::from_config(&state.config);
    let source_name = geolocator.name();
    let mut session = ChatSession::new(Arc::clone(&state.client), geolocator, &args);

    print_welcome_banner(state.client.base_url().as_str(), source_name);
    info!(
        backend = %state.client.base_url(),
        location_source = source_name,
        "Chat session started"
    );

    let prompt = format!("  {} ", style("You >").green().bold());
    let mut input = ChatInput::new(prompt).context("Failed to initialize terminal input")?;
    let mut view = TranscriptView::new();
    let mut conversation = session.manager.subscribe();

    input.print(&view.update(&conversation.borrow_and_update().messages))?;
    if let Some(location) = session.locator.location() {
        input.print(&render_location(Some(&location)))?;
    }
    if args.detect_location {
        session.detect_location();
    }

    let spinner_style = ProgressStyle::default_spinner();
    let mut frame: u64 = 0;
    let mut ticker = tokio::time::interval(Duration::from_millis(100));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            event = input.next_event() => match event? {
                InputEvent::Eof => break,
                InputEvent::Interrupted => {
                    input.print(&format!(
                        "  {}",
                        style("Press Ctrl+D to exit, or keep chatting.").dim()
                    ))?;
                }
                InputEvent::Message(text) => {
                    if let Some(command) = commands::parse(&text) {
                        let (flow, output) = session.run_command(command);
                        if !output.is_empty() {
                            input.print(&output)?;
                        }
                        if flow == Flow::Exit {
                            break;
                        }
                    } else {
                        session.send(text);
                    }
                }
            },

            Ok(()) = conversation.changed() => {
                let messages = conversation.borrow_and_update().messages.clone();
                let output = view.update(&messages);
                if !output.is_empty() {
                    input.print(&output)?;
                }
            }

            Some(joined) = session.tasks.join_next() => match joined {
                Ok(done) => {
                    let output = session.handle_background(done);
                    if !output.is_empty() {
                        input.print(&output)?;
                    }
                }
                Err(e) => warn!(error = %e, "Background task failed"),
            },

            _ = ticker.tick() => {
                frame = frame.wrapping_add(1);
                let status = session.status_text().map(|message| {
                    format!(
                        "  {} {}",
                        style(spinner_style.get_tick_str(frame)).cyan(),
                        style(message).dim()
                    )
                });
                input.set_status(status)?;
            }
        }
    }

    session.tasks.abort_all();
    drop(input);
    println!("\n  {}", style("Session ended.").dim());
    Ok(())
}

#[cfg(test)]
mod tests {
    use forkful_infra::config::ClientConfig;
    use forkful_infra::geo::Unavailable;

    use super::*;

    fn session(args: &ChatArgs) -> ChatSession {
        let client = Arc::new(RestClient::new(&ClientConfig::default()).unwrap());
        ChatSession::new(client, Geolocator::Unavailable(Unavailable), args)
    }

    fn restaurant(id: &str) -> Restaurant {
        serde_json::from_value(serde_json::json!({"id": id, "name": id.to_uppercase()})).unwrap()
    }

    #[test]
    fn preferences_only_when_given() {
        assert!(preferences_from_args(&ChatArgs::default()).is_none());

        let args = ChatArgs {
            cuisine: Some("thai".to_string()),
            dietary: vec!["vegan".to_string()],
            ..Default::default()
        };
        let preferences = preferences_from_args(&args).unwrap();
        assert_eq!(preferences.cuisine(), Some("thai"));
        assert_eq!(preferences.len(), 2);
    }

    #[test]
    fn initial_location_prefers_coordinates() {
        let args = ChatArgs {
            lat: Some(40.7),
            lon: Some(-74.0),
            ..Default::default()
        };
        assert_eq!(
            initial_location(&args).and_then(|l| l.coordinates()),
            Some(Coordinates::new(40.7, -74.0))
        );

        let args = ChatArgs {
            address: Some("1 Main St".to_string()),
            city: Some("Springfield".to_string()),
            ..Default::default()
        };
        let location = initial_location(&args).unwrap();
        assert_eq!(location.address.as_deref(), Some("1 Main St"));
        assert_eq!(location.city.as_deref(), Some("Springfield"));
        assert!(initial_location(&ChatArgs::default()).is_none());
    }

    #[tokio::test]
    async fn options_follow_flags() {
        let args = ChatArgs {
            rollback_on_error: true,
            cancel_superseded: true,
            ..Default::default()
        };
        let options = session(&args).manager.options();
        assert_eq!(options.failure_policy, FailurePolicy::RollBack);
        assert_eq!(options.in_flight_policy, InFlightPolicy::LatestWins);
    }

    #[tokio::test]
    async fn exit_and_help_commands() {
        console::set_colors_enabled(false);
        let mut session = session(&ChatArgs::default());
        assert_eq!(session.run_command(ChatCommand::Exit).0, Flow::Exit);
        let (flow, output) = session.run_command(ChatCommand::Help);
        assert_eq!(flow, Flow::Continue);
        assert!(output.contains("/location"));
    }

    #[tokio::test]
    async fn clear_empties_restaurant_pane() {
        console::set_colors_enabled(false);
        let mut session = session(&ChatArgs::default());
        session.restaurants = vec![restaurant("a")];

        let (_, output) = session.run_command(ChatCommand::Clear);
        assert!(output.contains("Conversation cleared"));
        assert!(session.restaurants.is_empty());
        assert!(session.manager.messages().is_empty());
    }

    #[tokio::test]
    async fn details_index_out_of_range() {
        console::set_colors_enabled(false);
        let mut session = session(&ChatArgs::default());
        session.restaurants = vec![restaurant("a")];

        let (_, output) = session.run_command(ChatCommand::Details(DetailsTarget::Index(2)));
        assert!(output.contains("No restaurant #2"));
        assert_eq!(session.lookups, 0);
    }

    #[tokio::test]
    async fn nearby_without_coordinates_is_refused() {
        console::set_colors_enabled(false);
        let mut session = session(&ChatArgs::default());
        let (_, output) = session.run_command(ChatCommand::Nearby);
        assert!(output.contains("needs coordinates"));

        session.run_command(ChatCommand::Location(LocationAction::Set("1 Main St".to_string())));
        let (_, output) = session.run_command(ChatCommand::Nearby);
        assert!(output.contains("needs coordinates"));
        assert!(session.tasks.is_empty());
    }

    #[tokio::test]
    async fn suggest_without_reply_is_refused() {
        console::set_colors_enabled(false);
        let mut session = session(&ChatArgs::default());
        let (_, output) = session.run_command(ChatCommand::Suggest(1));
        assert!(output.contains("No suggestion #1"));
        assert!(session.tasks.is_empty());
    }

    #[tokio::test]
    async fn location_set_and_clear() {
        console::set_colors_enabled(false);
        let mut session = session(&ChatArgs::default());

        let (_, output) = session.run_command(ChatCommand::Location(LocationAction::Set(
            "123 Main St".to_string(),
        )));
        assert!(output.contains("Location set: 123 Main St"));

        let (_, output) = session.run_command(ChatCommand::Location(LocationAction::Clear));
        assert!(output.contains("No location set"));
        assert!(session.locator.location().is_none());
    }

    #[tokio::test]
    async fn detect_with_no_source_reports_unsupported() {
        console::set_colors_enabled(false);
        let mut session = session(&ChatArgs::default());
        session.run_command(ChatCommand::Location(LocationAction::Detect));

        let done = session.tasks.join_next().await.unwrap().unwrap();
        let output = session.handle_background(done);
        assert!(output.contains("Geolocation is not supported"));
        assert!(!session.locator.is_loading());
    }

    #[tokio::test]
    async fn reply_with_restaurants_fills_pane_in_order() {
        console::set_colors_enabled(false);
        let mut session = session(&ChatArgs::default());
        let response = ChatResponse {
            message: "Here you go".to_string(),
            session_id: "abc123".to_string(),
            restaurants: Some(vec![restaurant("b"), restaurant("a")]),
            suggestions: Some(vec!["Cheaper?".to_string()]),
            metadata: None,
        };

        let output = session.handle_background(Background::Reply {
            generation: 0,
            result: Ok(response),
        });
        let ids: Vec<_> = session.restaurants.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert!(output.contains("Recommended Restaurants (2)"));
        assert!(output.contains("[1] Cheaper?"));
    }

    #[tokio::test]
    async fn reply_without_restaurants_keeps_pane() {
        let mut session = session(&ChatArgs::default());
        session.restaurants = vec![restaurant("a")];
        let response = ChatResponse {
            message: "Anything else?".to_string(),
            session_id: "abc123".to_string(),
            restaurants: None,
            suggestions: None,
            metadata: None,
        };
        let output = session.handle_background(Background::Reply {
            generation: 0,
            result: Ok(response),
        });
        assert!(output.is_empty());
        assert_eq!(session.restaurants.len(), 1);
    }

    #[tokio::test]
    async fn failed_reply_shows_error_banner() {
        console::set_colors_enabled(false);
        let mut session = session(&ChatArgs::default());
        let output = session.handle_background(Background::Reply {
            generation: 0,
            result: Err(ConversationError::Api(ApiError::Timeout)),
        });
        assert!(output.contains("timed out"));

        let cancelled = session.handle_background(Background::Reply {
            generation: 0,
            result: Err(ConversationError::Cancelled),
        });
        assert!(cancelled.is_empty());
    }

    #[tokio::test]
    async fn reply_finished_before_clear_does_not_refill_pane() {
        console::set_colors_enabled(false);
        let mut session = session(&ChatArgs::default());
        let stale = Background::Reply {
            generation: session.generation,
            result: Ok(ChatResponse {
                message: "Try this".to_string(),
                session_id: "abc123".to_string(),
                restaurants: Some(vec![restaurant("stale-place")]),
                suggestions: Some(vec!["Cheaper?".to_string()]),
                metadata: None,
            }),
        };

        session.run_command(ChatCommand::Clear);
        let output = session.handle_background(stale);
        assert!(output.is_empty());
        assert!(session.restaurants.is_empty());

        let (_, listed) = session.run_command(ChatCommand::Restaurants);
        assert!(listed.contains("No restaurants found"));
    }
}
