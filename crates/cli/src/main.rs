// modernapp-prefs - inspect and edit the preference store from a shell
// Builds one store per invocation and hands it to the selected command.

mod exit_codes;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};

use exit_codes::{prefs_exit_code, EXIT_ERROR, EXIT_NOT_FOUND, EXIT_SUCCESS, EXIT_USAGE};
use modernapp_prefs::{
    sample_items, AppPreferences, BackendKind, PrefKind, PrefValue, PreferenceStore, PrefsError,
    StoreConfig,
};

#[derive(Parser)]
#[command(name = "modernapp-prefs")]
#[command(about = "Inspect and edit the modernapp preference store")]
#[command(version)]
struct Cli {
    /// TOML file with dir / namespace / backend
    #[arg(long, global = true, env = "MODERNAPP_PREFS_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the namespace (overrides config)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Namespace name (overrides config)
    #[arg(long, global = true)]
    namespace: Option<String>,

    /// Persistence backend (overrides config)
    #[arg(long, global = true, value_enum)]
    backend: Option<BackendArg>,

    /// More logging on stderr (-v info, -vv debug). RUST_LOG wins if set.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one value
    #[command(after_help = "\
Examples:
  modernapp-prefs get user_name --default 'John Doe'
  modernapp-prefs get notifications_enabled -t bool --default true")]
    Get {
        key: String,

        /// Expected value type
        #[arg(long = "type", short = 't', value_enum, default_value = "string")]
        kind: TypeArg,

        /// Printed when the key is absent (or holds another type)
        #[arg(long)]
        default: Option<String>,
    },

    /// Store one value
    Set {
        key: String,
        value: String,

        #[arg(long = "type", short = 't', value_enum, default_value = "string")]
        kind: TypeArg,
    },

    /// Delete one key
    Remove { key: String },

    /// Print every stored entry
    List {
        #[arg(long)]
        json: bool,
    },

    /// Delete every key except the ones passed with --keep
    Clear {
        /// Key to preserve (repeatable). Keeping first_launch forces it to false.
        #[arg(long = "keep")]
        keep: Vec<String>,
    },

    /// Restore app defaults; onboarding is not shown again
    Reset,

    /// Show (and optionally edit) the profile and settings fields
    Profile {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long, value_enum)]
        notifications: Option<Toggle>,

        #[arg(long, value_enum)]
        dark_mode: Option<Toggle>,

        #[arg(long)]
        json: bool,
    },

    /// Report whether this is the first launch, then record the launch
    Launch,

    /// Print the sample list items
    Items {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum BackendArg {
    Json,
    Sqlite,
    Memory,
}

impl From<BackendArg> for BackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Json => BackendKind::Json,
            BackendArg::Sqlite => BackendKind::Sqlite,
            BackendArg::Memory => BackendKind::Memory,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum TypeArg {
    Bool,
    String,
    Int,
    Float,
}

impl From<TypeArg> for PrefKind {
    fn from(arg: TypeArg) -> Self {
        match arg {
            TypeArg::Bool => PrefKind::Bool,
            TypeArg::String => PrefKind::String,
            TypeArg::Int => PrefKind::Int,
            TypeArg::Float => PrefKind::Float,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

impl Toggle {
    fn enabled(self) -> bool {
        matches!(self, Toggle::On)
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn not_found(key: &str) -> Self {
        Self {
            code: EXIT_NOT_FOUND,
            message: format!("no value stored for '{}'", key),
            hint: Some("pass --default to print a fallback instead".to_string()),
        }
    }

    pub fn output(err: io::Error) -> Self {
        Self { code: EXIT_ERROR, message: format!("cannot write output: {}", err), hint: None }
    }
}

impl From<PrefsError> for CliError {
    fn from(err: PrefsError) -> Self {
        let hint = match &err {
            PrefsError::Unsupported(_) => Some("rebuild with the default features".to_string()),
            PrefsError::ConfigRead(_) | PrefsError::ConfigParse(_) | PrefsError::ConfigValidation(_) => {
                Some("check the file passed with --config".to_string())
            }
            _ => None,
        };
        Self { code: prefs_exit_code(&err), message: err.to_string(), hint }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };

    // Logs go to stderr so stdout stays parseable
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    builder.parse_env(env_logger::Env::default());
    builder.target(env_logger::Target::Stderr);
    builder.init();
}

/// Config file (or defaults), then command-line overrides
fn resolve_config(cli: &Cli) -> Result<StoreConfig, PrefsError> {
    let mut config = match &cli.config {
        Some(path) => StoreConfig::load(path)?,
        None => StoreConfig::default(),
    };
    if let Some(dir) = &cli.dir {
        config.dir = dir.clone();
    }
    if let Some(namespace) = &cli.namespace {
        config.namespace = namespace.clone();
    }
    if let Some(backend) = cli.backend {
        config.backend = backend.into();
    }
    config.validate()?;
    Ok(config)
}

fn parse_value(kind: PrefKind, text: &str) -> Result<PrefValue, CliError> {
    PrefValue::parse(kind, text)
        .ok_or_else(|| CliError::args(format!("'{}' is not a valid {}", text, kind.name())))
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

fn run(cli: Cli, out: &mut dyn Write) -> Result<(), CliError> {
    let config = resolve_config(&cli)?;
    let store = Arc::new(PreferenceStore::open(&config)?);

    match cli.command {
        Commands::Get { key, kind, default } => cmd_get(&store, &key, kind.into(), default, out),
        Commands::Set { key, value, kind } => {
            let value = parse_value(kind.into(), &value)?;
            store.set(&key, value)?;
            Ok(())
        }
        Commands::Remove { key } => {
            store.remove(&key)?;
            Ok(())
        }
        Commands::List { json } => cmd_list(&store, json, out),
        Commands::Clear { keep } => {
            let keep: Vec<&str> = keep.iter().map(String::as_str).collect();
            store.clear_all(&keep)?;
            Ok(())
        }
        Commands::Reset => {
            AppPreferences::new(store).reset()?;
            Ok(())
        }
        Commands::Profile { name, email, notifications, dark_mode, json } => {
            let prefs = AppPreferences::new(store);
            if let Some(name) = name {
                prefs.set_user_name(&name)?;
            }
            if let Some(email) = email {
                prefs.set_user_email(&email)?;
            }
            if let Some(toggle) = notifications {
                prefs.set_notifications_enabled(toggle.enabled())?;
            }
            if let Some(toggle) = dark_mode {
                prefs.set_dark_mode_enabled(toggle.enabled())?;
            }
            cmd_profile(&prefs, json, out)
        }
        Commands::Launch => {
            let prefs = AppPreferences::new(store);
            let line = if prefs.is_first_launch() {
                format!("Welcome, {}!", prefs.user_name())
            } else {
                format!("Welcome back, {}.", prefs.user_name())
            };
            writeln!(out, "{}", line).map_err(CliError::output)?;
            prefs.mark_launched()?;
            Ok(())
        }
        Commands::Items { json } => cmd_items(json, out),
    }
}

fn cmd_get(
    store: &PreferenceStore,
    key: &str,
    kind: PrefKind,
    default: Option<String>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let value = match default {
        Some(text) => {
            let default = parse_value(kind, &text)?;
            match default {
                PrefValue::Bool(d) => PrefValue::Bool(store.get_bool(key, d)),
                PrefValue::Int(d) => PrefValue::Int(store.get_int(key, d)),
                PrefValue::Float(d) => PrefValue::Float(store.get_float(key, d)),
                PrefValue::String(d) => {
                    PrefValue::String(store.get_string(key, Some(d.as_str())).unwrap_or(d))
                }
            }
        }
        None => {
            let stored = store.get(key).ok_or_else(|| CliError::not_found(key))?;
            let fits = stored.kind() == kind
                || (kind == PrefKind::Float && stored.kind() == PrefKind::Int);
            if !fits {
                return Err(CliError::args(format!(
                    "'{}' holds a {}, not a {}",
                    key,
                    stored.kind().name(),
                    kind.name()
                )));
            }
            stored
        }
    };
    writeln!(out, "{}", value).map_err(CliError::output)
}

fn cmd_list(store: &PreferenceStore, json: bool, out: &mut dyn Write) -> Result<(), CliError> {
    let entries = store.snapshot();
    if json {
        let text = serde_json::to_string_pretty(&entries).map_err(PrefsError::from)?;
        return writeln!(out, "{}", text).map_err(CliError::output);
    }
    for (key, value) in &entries {
        writeln!(out, "{} = {} ({})", key, value, value.kind().name()).map_err(CliError::output)?;
    }
    Ok(())
}

fn cmd_profile(prefs: &AppPreferences, json: bool, out: &mut dyn Write) -> Result<(), CliError> {
    let profile = prefs.profile();
    if json {
        let text = serde_json::to_string_pretty(&profile).map_err(PrefsError::from)?;
        return writeln!(out, "{}", text).map_err(CliError::output);
    }
    let lines = [
        format!("name:          {}", profile.user_name),
        format!("email:         {}", profile.user_email),
        format!("notifications: {}", on_off(profile.notifications_enabled)),
        format!("dark mode:     {}", on_off(profile.dark_mode_enabled)),
        format!("first launch:  {}", if profile.first_launch { "yes" } else { "no" }),
    ];
    for line in lines {
        writeln!(out, "{}", line).map_err(CliError::output)?;
    }
    Ok(())
}

fn cmd_items(json: bool, out: &mut dyn Write) -> Result<(), CliError> {
    let items = sample_items();
    if json {
        let text = serde_json::to_string_pretty(&items).map_err(PrefsError::from)?;
        return writeln!(out, "{}", text).map_err(CliError::output);
    }
    for item in &items {
        writeln!(out, "{:<10} {}", item.title, item.description).map_err(CliError::output)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match run(cli, &mut out) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}
