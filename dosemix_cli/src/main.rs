use clap::{Args, Parser, Subcommand};
use dosemix_core::report::Report;
use dosemix_core::share::{render_qr, share_url_str};
use dosemix_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "dosemix")]
#[command(
    about = "Medication and fruit juice mixture calculator for small animals",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the mixture (default)
    Calc {
        #[command(flatten)]
        input: InputArgs,

        /// Output format (table, json, csv)
        #[arg(long)]
        format: Option<Format>,

        /// Fail on invalid or degenerate input instead of showing n/a
        #[arg(long)]
        strict: bool,
    },

    /// Print a shareable link for the inputs
    Link {
        #[command(flatten)]
        input: InputArgs,

        /// Base URL for the link (overrides share.base_url)
        #[arg(long)]
        base: Option<String>,

        /// Print only the URL, for piping into a clipboard tool
        #[arg(long, conflicts_with = "qr")]
        plain: bool,

        /// Also print the link as a QR code
        #[arg(long)]
        qr: bool,
    },

    /// Manage the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a config file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

/// Input values as freeform text; anything unparsable becomes NaN
#[derive(Args, Clone, Debug, Default)]
struct InputArgs {
    /// Shared link (or bare query string) to start from
    #[arg(long)]
    url: Option<String>,

    /// Drug concentration [mg/ml]
    #[arg(long, allow_hyphen_values = true)]
    concentration: Option<String>,

    /// Daily dose per body weight [mg/kg]
    #[arg(long, allow_hyphen_values = true)]
    daily_dose: Option<String>,

    /// Animal weight [g]
    #[arg(long, allow_hyphen_values = true)]
    weight: Option<String>,

    /// Treatment length [days]
    #[arg(long, allow_hyphen_values = true)]
    days: Option<String>,

    /// Smallest measurable daily mixture volume [ml]
    #[arg(long, allow_hyphen_values = true)]
    min_daily_dose: Option<String>,
}

impl InputArgs {
    fn overrides(&self) -> [(Field, Option<&str>); 5] {
        [
            (Field::ConcentrationMgMl, self.concentration.as_deref()),
            (Field::DailyDoseMgKgw, self.daily_dose.as_deref()),
            (Field::WeightG, self.weight.as_deref()),
            (Field::TreatmentLengthDays, self.days.as_deref()),
            (Field::MinDailyDoseMl, self.min_daily_dose.as_deref()),
        ]
    }

    /// Hydrate from `--url` (if any), then apply per-field flags
    fn resolve(&self, defaults: &DosageInput) -> DosageInput {
        let location = self
            .url
            .as_deref()
            .map(|url| MemoryLocation::with_query(query::query_of(url)));
        let mut session = DosageSession::start(Synchronizer::new(location), defaults);

        for (field, text) in self.overrides() {
            if let Some(text) = text {
                session.set_field(field, text);
            }
        }

        let input = *session.input();
        tracing::debug!(?input, "Resolved input");
        input
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        dosemix_core::logging::init_with_level("debug");
    } else {
        dosemix_core::logging::init();
    }

    if let Some(Commands::Config { action }) = &cli.command {
        return cmd_config(action, cli.config.as_deref());
    }

    let config = Config::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Calc {
            input,
            format,
            strict,
        }) => cmd_calc(&input, format, strict, &config),
        Some(Commands::Link {
            input,
            base,
            plain,
            qr,
        }) => cmd_link(&input, base, plain, qr, &config),
        Some(Commands::Config { .. }) => Ok(()),
        None => {
            // Default to "calc" with configured values
            cmd_calc(&InputArgs::default(), None, false, &config)
        }
    }
}

fn cmd_calc(
    input: &InputArgs,
    format: Option<Format>,
    strict: bool,
    config: &Config,
) -> Result<()> {
    let input = input.resolve(&config.defaults);
    let format = format.unwrap_or(config.display.format);

    let report = if strict {
        Report::checked(input)?
    } else {
        Report::new(input)
    };

    let rendered = report.render(format)?;
    print!("{}", rendered);
    if !rendered.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn cmd_link(
    input: &InputArgs,
    base: Option<String>,
    plain: bool,
    qr: bool,
    config: &Config,
) -> Result<()> {
    let input = input.resolve(&config.defaults);
    let base = base.unwrap_or_else(|| config.share.base_url.clone());
    let url = share_url_str(&base, &input)?;

    if plain {
        println!("{}", url);
        return Ok(());
    }

    println!("Link: {}", url);
    if qr {
        println!();
        println!("{}", render_qr(url.as_str())?);
    }
    Ok(())
}

fn cmd_config(action: &ConfigAction, path: Option<&Path>) -> Result<()> {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(Config::default_config_path);

    match action {
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                return Err(Error::Config(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                )));
            }
            Config::default().save_to(&path)?;
            println!("✓ Wrote default config to {}", path.display());
        }
        ConfigAction::Show => {
            let config = if path.exists() {
                Config::load_from(&path)?
            } else {
                Config::default()
            };
            println!("# {}", path.display());
            print!("{}", config.to_toml()?);
        }
    }
    Ok(())
}
