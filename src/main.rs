use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use kcc_dashboard::cli::{
    handle_add_command, handle_calendar_command, handle_classify_command,
    handle_dashboard_command, handle_edit_command, handle_import_command, handle_list_command,
    handle_show_command, handle_timeline_command, DashboardArgs, ListArgs,
};
use kcc_dashboard::config::{paths::DashboardPaths, settings::Settings};
use kcc_dashboard::services::Classifier;
use kcc_dashboard::storage::Storage;

/// Environment variable holding a tracing filter (e.g. "debug")
const LOG_ENV: &str = "KCC_LOG";

#[derive(Parser)]
#[command(
    name = "kccdash",
    version,
    about = "Customer dashboard for contract, construction and payment follow-up",
    long_about = "kccdash reads a snapshot of customer records and shows how many \
                  contracts are signed, completed, in progress or cancelled, what \
                  they are worth, and which customers still need a follow-up."
)]
struct Cli {
    /// Reference date for periods and statuses (YYYY-MM-DD, default: today)
    #[arg(long, global = true, env = "KCC_TODAY")]
    today: Option<NaiveDate>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,

    /// Performance, revenue and task figures for a period
    #[command(alias = "dash")]
    Dashboard(DashboardArgs),

    /// List customers, optionally drilled into a cohort or task
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one customer
    Show {
        /// Customer number (e.g. C-00042)
        customer_no: String,
    },

    /// Show which statuses a customer has
    Classify {
        /// Customer number
        customer_no: String,
    },

    /// Add a customer from key=value pairs
    Add {
        /// Fields, e.g. name=김철수 regDate=2025-06-01 finalQuote=12,000,000
        #[arg(required = true)]
        fields: Vec<String>,
    },

    /// Edit a customer with key=value pairs
    Edit {
        /// Customer number
        customer_no: String,
        /// Fields to change
        fields: Vec<String>,
    },

    /// Import a spreadsheet CSV export
    Import {
        /// Path to CSV file
        file: PathBuf,
    },

    /// Fixed construction dates for last, this and next month
    Timeline {
        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Month grid of fixed construction dates
    Calendar {
        /// Month to show (YYYY-MM, default: the reference month)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Show the change history
    History {
        /// Only entries for this customer
        customer_no: Option<String>,

        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = DashboardPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    init_tracing(cli.verbose, &settings);

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    let classifier = match cli.today {
        Some(today) => Classifier::new(today),
        None => Classifier::for_today(),
    };
    debug!(today = %classifier.today(), data_dir = %paths.data_dir().display(), "starting");

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing kccdash at: {}", paths.data_dir().display());
            let created = kcc_dashboard::storage::init::initialize_storage(&paths)?;
            settings.save(&paths)?;
            if created {
                println!("Initialization complete!");
                println!();
                println!("Run 'kccdash import <file.csv>' to load a spreadsheet export.");
            } else {
                println!("Already initialized.");
            }
        }
        Some(Commands::Config) => {
            println!("kccdash Configuration");
            println!("=====================");
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Customers file:   {}", paths.customers_file().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Dashboard range:  {} months", settings.dashboard_range_months);
            println!("  List range:       {} months", settings.list_range_months);
            println!("  Timeline limit:   {}", settings.timeline_limit);
            println!("  Calendar limit:   {}", settings.calendar_cell_limit);
            println!("  Log level:        {}", settings.log_level);
            println!();
            println!("Customers: {}", storage.customers.count()?);
        }
        Some(Commands::Dashboard(args)) => {
            handle_dashboard_command(&storage, &settings, &classifier, args)?;
        }
        Some(Commands::List(args)) => {
            handle_list_command(&storage, &settings, &classifier, args)?;
        }
        Some(Commands::Show { customer_no }) => {
            handle_show_command(&storage, &classifier, &customer_no)?;
        }
        Some(Commands::Classify { customer_no }) => {
            handle_classify_command(&storage, &classifier, &customer_no)?;
        }
        Some(Commands::Add { fields }) => {
            handle_add_command(&storage, &fields)?;
        }
        Some(Commands::Edit {
            customer_no,
            fields,
        }) => {
            handle_edit_command(&storage, &customer_no, &fields)?;
        }
        Some(Commands::Import { file }) => {
            handle_import_command(&storage, &file)?;
        }
        Some(Commands::Timeline { output }) => {
            handle_timeline_command(&storage, &settings, &classifier, output)?;
        }
        Some(Commands::Calendar { month }) => {
            handle_calendar_command(&storage, &settings, &classifier, month.as_deref())?;
        }
        Some(Commands::History { customer_no, limit }) => {
            let entries = match customer_no {
                Some(no) => storage.audit().history(&no)?,
                None => storage.audit().read_recent(limit)?,
            };
            if entries.is_empty() {
                println!("No history recorded.");
            }
            for entry in entries.iter().rev().take(limit) {
                println!("{}", entry.format_human_readable());
            }
        }
        None => {
            println!("kccdash - customer dashboard");
            println!();
            println!("Run 'kccdash --help' for usage information.");
            println!("Run 'kccdash dashboard' to see this period's figures.");
        }
    }

    Ok(())
}

/// Install the stderr log subscriber
///
/// `KCC_LOG` wins over `-v`, which wins over the configured level.
fn init_tracing(verbose: u8, settings: &Settings) {
    let filter = match std::env::var(LOG_ENV) {
        Ok(filter) if !filter.trim().is_empty() => EnvFilter::new(filter),
        _ => EnvFilter::new(match verbose {
            0 => settings.log_level.as_str(),
            1 => "info",
            2 => "debug",
            _ => "trace",
        }),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
