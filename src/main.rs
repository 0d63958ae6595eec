use chrono::Utc;
use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tuition_journal::application::payments::{PaymentService, RosterEntry};
use tuition_journal::application::roster::StudentRecordStore;
use tuition_journal::application::settings::{Session, SettingsStore};
use tuition_journal::config::JournalConfig;
use tuition_journal::domain::ports::KeyValueStoreBox;
use tuition_journal::domain::status::{OverduePolicy, StatusEngine};
use tuition_journal::domain::student::StudentId;
use tuition_journal::infrastructure::json_file::JsonFileStore;
use tuition_journal::interfaces::csv::roster_writer::RosterWriter;
use tuition_journal::interfaces::csv::student_reader::StudentReader;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON journal file (overrides JOURNAL_DATA_FILE)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Path to a RocksDB database (overrides JOURNAL_DB_PATH). Needs the
    /// `storage-rocksdb` feature.
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// Shared journal password
    #[arg(long, env = "JOURNAL_PASSWORD", global = true, hide_env_values = true)]
    password: Option<String>,

    /// Overdue comparison: `month-of-year` or `absolute`
    #[arg(long, global = true)]
    overdue_policy: Option<OverduePolicy>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the roster with each student's payment status
    List {
        /// Only students whose name contains this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one student and their payment history
    Show { id: String },
    /// Confirm payment of a student's current billing month
    Pay { id: String },
    /// Add a student billed from the current month
    Add { name: String, teacher: String },
    /// Add students from a `name,teacher` CSV file
    Import { file: PathBuf },
    /// Replace the roster with the starter students
    Seed,
    /// Delete a student
    Remove { id: String },
    /// Write the roster as CSV to stdout
    Export {
        #[arg(long)]
        search: Option<String>,
    },
    /// Change the shared password
    SetPassword { new_password: String },
    /// Show or change the theme color
    Theme { color: Option<String> },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = JournalConfig::from_env().into_diagnostic()?;
    if let Some(data) = cli.data {
        config.data_file = data;
    }
    if let Some(db_path) = cli.db_path {
        config.db_path = Some(db_path);
    }
    if let Some(policy) = cli.overdue_policy {
        config.overdue_policy = policy;
    }

    let (roster_backend, settings_backend) = open_backends(&config)?;
    let settings = SettingsStore::new(settings_backend);
    let service = PaymentService::new(
        StudentRecordStore::new(roster_backend),
        StatusEngine::new(config.overdue_policy),
    );

    settings.migrate_password().await.into_diagnostic()?;

    Session::new()
        .login(&settings, cli.password.as_deref().unwrap_or_default())
        .await
        .into_diagnostic()?;

    let now = Utc::now();
    match cli.command {
        Command::List { search } => {
            let roster = service.roster(now, search.as_deref()).await.into_diagnostic()?;
            print_roster(&roster);
        }
        Command::Show { id } => {
            let entry = service
                .student(&StudentId::from(id), now)
                .await
                .into_diagnostic()?;
            print_student(&entry);
        }
        Command::Pay { id } => {
            let id = StudentId::from(id);
            let entry = service.confirm_payment(&id, now).await.into_diagnostic()?;
            if let Some(event) = entry.record.history.last() {
                println!(
                    "Payment recorded for {}: {}. Next billing month: {} ({})",
                    entry.record.name,
                    event.month_index,
                    entry.record.current_month_index,
                    entry.status
                );
            }
        }
        Command::Add { name, teacher } => {
            let created = service
                .enroll([(name, teacher)], now)
                .await
                .into_diagnostic()?;
            for record in created {
                println!("Added {} ({})", record.name, record.id);
            }
        }
        Command::Import { file } => {
            let file = File::open(file).into_diagnostic()?;
            let mut students = Vec::new();
            for row in StudentReader::new(file).students() {
                match row {
                    Ok(student) => students.push((student.name, student.teacher)),
                    Err(e) => tracing::warn!(error = %e, "skipping unreadable student row"),
                }
            }
            let created = service.enroll(students, now).await.into_diagnostic()?;
            println!("Imported {} students", created.len());
        }
        Command::Seed => {
            let seeded = service.seed_defaults(now).await.into_diagnostic()?;
            println!("Seeded {} students", seeded.len());
        }
        Command::Remove { id } => {
            let removed = service
                .remove(&StudentId::from(id))
                .await
                .into_diagnostic()?;
            println!("Removed {}", removed.name);
        }
        Command::Export { search } => {
            let roster = service.roster(now, search.as_deref()).await.into_diagnostic()?;
            let stdout = io::stdout();
            let mut writer = RosterWriter::new(stdout.lock());
            writer.write_roster(&roster).into_diagnostic()?;
        }
        Command::SetPassword { new_password } => {
            settings.set_password(&new_password).await.into_diagnostic()?;
            println!("Password updated");
        }
        Command::Theme { color } => {
            if let Some(color) = color {
                settings.set_theme(&color).await.into_diagnostic()?;
            }
            println!("{}", settings.theme().await.into_diagnostic()?);
        }
    }

    Ok(())
}

/// Opens the configured backend once and hands out two handles over the
/// same state: one for the roster, one for settings.
#[cfg(feature = "storage-rocksdb")]
fn open_backends(config: &JournalConfig) -> Result<(KeyValueStoreBox, KeyValueStoreBox)> {
    use tuition_journal::infrastructure::rocksdb::RocksDBStore;

    if let Some(db_path) = &config.db_path {
        let store = RocksDBStore::open(db_path).into_diagnostic()?;
        tracing::debug!(path = %db_path.display(), "using RocksDB storage");
        return Ok((Box::new(store.clone()), Box::new(store)));
    }
    Ok(json_backends(config))
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_backends(config: &JournalConfig) -> Result<(KeyValueStoreBox, KeyValueStoreBox)> {
    if config.db_path.is_some() {
        tracing::warn!(
            "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to the JSON journal file."
        );
    }
    Ok(json_backends(config))
}

fn json_backends(config: &JournalConfig) -> (KeyValueStoreBox, KeyValueStoreBox) {
    let store = JsonFileStore::open(&config.data_file);
    tracing::debug!(path = %store.path().display(), "using JSON file storage");
    (Box::new(store.clone()), Box::new(store))
}

fn print_roster(roster: &[RosterEntry]) {
    if roster.is_empty() {
        println!("No students");
        return;
    }

    println!(
        "{:>3}  {:<28} {:<10} {:<15} {:<12} ID",
        "#", "Name", "Month", "Status", "Teacher"
    );
    for (idx, entry) in roster.iter().enumerate() {
        println!(
            "{:>3}  {:<28} {:<10} {:<15} {:<12} {}",
            idx + 1,
            entry.record.name,
            entry.record.current_month_index.name(),
            entry.status.label(),
            entry.record.teacher,
            entry.record.id
        );
    }
}

fn print_student(entry: &RosterEntry) {
    let record = &entry.record;
    println!("Name:    {}", record.name);
    println!("Teacher: {}", record.teacher);
    println!("Month:   {}", record.current_month_index);
    println!("Status:  {}", entry.status);
    println!("History:");
    if record.history.is_empty() {
        println!("  Tarix yo'q");
        return;
    }
    for event in record.history_newest_first() {
        println!(
            "  {} - {} ({})",
            event.month_index,
            event.status.label(),
            event.date.format("%Y-%m-%d %H:%M")
        );
    }
}
