//! Prompt loop that turns typed commands into dashboard actions.

use inquire::{InquireError, Text};
use weather_dashboard_core::{DashboardView, Tab, Unit, ViewController};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Search(String),
    Locate,
    Unit(Unit),
    Tab(Tab),
    QuickCity(String),
    ListCities,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  <location> | search <location>   show weather for a place
  locate                           use the configured position
  unit metric|imperial             switch units
  tab current|forecast             switch panels
  cities                           list quick-pick cities
  city <number|name>               pick a quick city
  help                             show this text
  quit                             leave";

/// Parses one input line. Bare text is a search.
pub fn parse_action(line: &str, quick_cities: &[String]) -> Result<Action, String> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match head.to_lowercase().as_str() {
        "" => Err("Type a location or `help`.".to_string()),
        "quit" | "exit" | "q" => Ok(Action::Quit),
        "help" | "?" => Ok(Action::Help),
        "locate" | "here" => Ok(Action::Locate),
        "cities" => Ok(Action::ListCities),
        "search" if rest.is_empty() => Err("Usage: search <location>".to_string()),
        "search" => Ok(Action::Search(rest.to_string())),
        "unit" | "units" => Unit::try_from(rest)
            .map(Action::Unit)
            .map_err(|e| e.to_string()),
        "tab" => match rest.to_lowercase().as_str() {
            "current" | "now" => Ok(Action::Tab(Tab::Current)),
            "forecast" => Ok(Action::Tab(Tab::Forecast)),
            _ => Err("Usage: tab current|forecast".to_string()),
        },
        "city" => quick_city(rest, quick_cities).map(Action::QuickCity),
        _ => Ok(Action::Search(line.to_string())),
    }
}

fn quick_city(arg: &str, quick_cities: &[String]) -> Result<String, String> {
    if let Ok(n) = arg.parse::<usize>() {
        return n
            .checked_sub(1)
            .and_then(|i| quick_cities.get(i))
            .cloned()
            .ok_or_else(|| format!("No quick city #{n}; there are {}.", quick_cities.len()));
    }
    quick_cities
        .iter()
        .find(|c| c.eq_ignore_ascii_case(arg))
        .cloned()
        .ok_or_else(|| format!("'{arg}' is not a quick city. Try `cities`."))
}

pub async fn run<V: DashboardView>(controller: &ViewController<V>) -> anyhow::Result<()> {
    println!("{HELP}");

    loop {
        let prompt = tokio::task::spawn_blocking(|| Text::new("weather>").prompt()).await?;
        let line = match prompt {
            Ok(line) => line,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e.into()),
        };

        let action = match parse_action(&line, controller.quick_cities()) {
            Ok(action) => action,
            Err(msg) => {
                println!("{msg}");
                continue;
            }
        };

        match action {
            Action::Search(location) => controller.search(&location).await,
            Action::Locate => controller.geolocate().await,
            Action::Unit(unit) => controller.toggle_unit(unit).await,
            Action::Tab(tab) => controller.switch_tab(tab).await,
            Action::QuickCity(city) => controller.select_quick_city(&city).await,
            Action::ListCities => {
                for (i, city) in controller.quick_cities().iter().enumerate() {
                    println!("  {}. {city}", i + 1);
                }
            }
            Action::Help => println!("{HELP}"),
            Action::Quit => break,
        }
    }

    Ok(())
}
