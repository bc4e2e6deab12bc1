//! deepdish CLI: chat with the `DeepDish` answer service

use clap::{Args, Parser, Subcommand};
use deepdish_engine::config::DEEPDISH_DIR;
use deepdish_engine::{
    resolve_city, Config, Coordinates, HttpAnswerService, HttpCityLocator, Sender, Session,
};
use std::error::Error;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the log filter.
const LOG_ENV: &str = "DEEPDISH_LOG";

/// Log file used while the TUI owns the terminal.
const LOG_FILE: &str = "deepdish.log";

/// Ask `DeepDish` about food, interactively or one question at a time
#[derive(Parser)]
#[command(name = "deepdish")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Flags layered over the config file.
#[derive(Args, Debug, Default)]
struct Overrides {
    /// Config file (default: .deepdish/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the answer service
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Your name, sent with each question
    #[arg(long, global = true)]
    name: Option<String>,

    /// Allergies, comma-separated (e.g. "peanuts,dairy")
    #[arg(long, global = true)]
    allergies: Option<String>,

    /// Your city, skips the location lookup
    #[arg(long, global = true)]
    city: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the chat TUI (default when no command specified)
    Chat,

    /// Ask one question and print the answer
    Ask {
        /// The question
        query: String,

        /// Print the answer at once instead of revealing it word by word
        #[arg(long)]
        no_reveal: bool,
    },

    /// Resolve coordinates to a city
    Locate {
        #[arg(long, allow_negative_numbers = true)]
        latitude: f64,

        #[arg(long, allow_negative_numbers = true)]
        longitude: f64,
    },

    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a default config file
    Init,
    /// Print the effective config as JSON
    Show,
}

impl Overrides {
    fn config_path(&self) -> Result<PathBuf, Box<dyn Error>> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => Ok(Config::default_path(&std::env::current_dir()?)),
        }
    }

    /// Load the config file (or defaults) and apply the flags.
    fn load(&self) -> Result<Config, Box<dyn Error>> {
        let mut config = Config::load_or_default(&self.config_path()?)?;
        self.apply(&mut config);
        Ok(config)
    }

    fn apply(&self, config: &mut Config) {
        if let Some(endpoint) = &self.endpoint {
            config.endpoint.clone_from(endpoint);
        }
        if let Some(name) = &self.name {
            config.profile.name = name.trim().to_string();
        }
        if let Some(allergies) = &self.allergies {
            config.profile.set_allergies_from_list(allergies);
        }
        if let Some(city) = &self.city {
            config.profile.set_city(Some(city));
        }
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let command = cli.command.unwrap_or(Commands::Chat);

    // The TUI owns the terminal, so its logs go to a file.
    let log_file = match command {
        Commands::Chat => Some(std::env::current_dir()?.join(DEEPDISH_DIR).join(LOG_FILE)),
        _ => None,
    };
    init_logging(log_file.as_deref())?;

    match command {
        Commands::Chat => {
            let config = cli.overrides.load()?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(deepdish_tui::run_tui(&config))
        }
        Commands::Ask { query, no_reveal } => {
            let mut config = cli.overrides.load()?;
            if no_reveal {
                config.reveal.enabled = false;
            }
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(cmd_ask(&config, &query))
        }
        Commands::Locate {
            latitude,
            longitude,
        } => {
            let config = cli.overrides.load()?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(cmd_locate(&config, Coordinates::new(latitude, longitude)));
            Ok(())
        }
        Commands::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(&cli.overrides.config_path()?),
            ConfigAction::Show => {
                let config = cli.overrides.load()?;
                println!("{}", serde_json::to_string_pretty(&config)?);
                Ok(())
            }
        },
    }
}

fn init_logging(log_file: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = fmt().with_env_filter(filter);

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

/// One question, answered on stdout as it is revealed.
async fn cmd_ask(config: &Config, query: &str) -> Result<(), Box<dyn Error>> {
    let mut profile = config.profile.clone();
    if profile.city.is_none() {
        if let Some(coords) = config.location {
            let locator = HttpCityLocator::new(&config.geocode_url);
            if let Some(city) = resolve_city(&locator, coords).await {
                profile.set_city(Some(&city));
            }
        }
    }

    info!(endpoint = %config.endpoint, "asking");
    let service = Arc::new(HttpAnswerService::new(&config.endpoint));
    let mut session = Session::new(service, config.reveal, &profile);
    if !session.submit(query) {
        return Err("Nothing to ask: the question is blank".into());
    }

    let mut stdout = std::io::stdout();
    let mut printed = 0;
    session
        .run_until_idle_with(|controller| {
            if let Some(buffer) = controller.reveal_buffer() {
                if buffer.len() > printed {
                    let _ = write!(stdout, "{}", &buffer[printed..]);
                    let _ = stdout.flush();
                    printed = buffer.len();
                }
            }
        })
        .await;

    let answer = session
        .history()
        .iter()
        .rev()
        .find(|m| m.sender == Sender::Bot)
        .map(|m| m.text.as_str())
        .unwrap_or_default();
    // The reveal buffer is always a prefix of the final answer.
    writeln!(stdout, "{}", answer.get(printed..).unwrap_or(answer))?;
    Ok(())
}

async fn cmd_locate(config: &Config, coords: Coordinates) {
    let locator = HttpCityLocator::new(&config.geocode_url);
    match resolve_city(&locator, coords).await {
        Some(city) => println!("{city}"),
        None => println!("unknown"),
    }
}

fn cmd_config_init(path: &Path) -> Result<(), Box<dyn Error>> {
    if path.exists() {
        return Err(format!("Config already exists at {}", path.display()).into());
    }
    Config::default().save(path)?;
    println!("Wrote {}", path.display());
    Ok(())
}
