use async_trait::async_trait;
use clap::{Parser, Subcommand};
use contact_tracker::enrichment::{EnrichmentConfig, GeminiClient};
use contact_tracker::{
    ContactLookup, ContactType, EnrichmentData, FileBackend, NewReport, ReportStore, RiskProvider,
    SecurityStatus,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Check phone numbers and emails for spam risk, backed by community reports
#[derive(Parser, Debug)]
#[command(name = "contact-tracker", version, about, long_about = None)]
struct Cli {
    /// Output machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    /// Path to the report store (default: ~/.config/contact-tracker/reports.json)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Look up a contact's spam/fraud risk
    Check {
        /// Phone number or email address to check
        contact: String,

        /// Override type detection (phone or email)
        #[arg(long, value_name = "TYPE")]
        r#type: Option<ContactType>,

        /// Enrichment model to use
        #[arg(long)]
        model: Option<String>,
    },
    /// Report an unauthorized contact
    Report {
        /// Phone number or email address being reported
        contact: String,

        /// Why this contact is being reported
        #[arg(long)]
        reason: String,

        /// Your name (optional, reports are anonymous by default)
        #[arg(long)]
        reporter: Option<String>,
    },
    /// List recent community reports
    Reports {
        /// Maximum number of reports to show
        #[arg(long, default_value_t = 6)]
        limit: usize,
    },
}

#[derive(Serialize)]
struct JsonOut<T: Serialize> {
    ok: bool,
    data: T,
}

/// Builds the Gemini client on first use, so contacts answered from local
/// reports never need an API key.
struct DeferredGemini {
    config: EnrichmentConfig,
}

#[async_trait]
impl RiskProvider for DeferredGemini {
    fn name(&self) -> &'static str {
        "gemini-enrichment"
    }

    async fn lookup(
        &self,
        contact: &str,
        contact_type: ContactType,
    ) -> contact_tracker::Result<EnrichmentData> {
        let client = GeminiClient::new(self.config.clone())?;
        client.lookup(contact, contact_type).await
    }
}

fn print_json<T: Serialize>(data: T) -> contact_tracker::Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(&JsonOut { ok: true, data })?
    );
    Ok(())
}

fn store_path(cli: &Cli) -> PathBuf {
    if let Some(path) = &cli.store {
        return path.clone();
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".config/contact-tracker/reports.json")
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Setup logging
    let directive = if cli.verbose {
        "contact_tracker=debug"
    } else {
        "contact_tracker=info"
    };
    // Logs go to stderr so --json output stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(directive)
        .with_writer(std::io::stderr)
        .init();

    let mut store = ReportStore::open(Box::new(FileBackend::new(store_path(&cli))));

    match &cli.command {
        Commands::Check { contact, r#type, model } => {
            let mut config = EnrichmentConfig::from_env();
            if let Some(model) = model {
                config = config.with_model(model);
            }

            let lookup = ContactLookup::new(Arc::new(DeferredGemini { config }));

            match lookup.search(&store, contact, *r#type).await {
                Ok(result) => {
                    if cli.json {
                        if let Err(e) = print_json(&result) {
                            eprintln!("❌ {}", e);
                            std::process::exit(3);
                        }
                    } else {
                        println!("{}", result);
                    }

                    // Exit code: 0 = safe, 1 = flagged, 2 = unknown
                    match result.status {
                        SecurityStatus::Safe => std::process::exit(0),
                        SecurityStatus::Flagged => std::process::exit(1),
                        SecurityStatus::Unknown => std::process::exit(2),
                    }
                }
                Err(e) => {
                    eprintln!("❌ Verification failed: {}", e);
                    eprintln!("Check your network connection and API configuration.");
                    std::process::exit(3);
                }
            }
        }
        Commands::Report { contact, reason, reporter } => {
            let new = NewReport {
                contact: contact.clone(),
                contact_type: ContactType::detect(contact),
                reason: reason.clone(),
                reporter_name: reporter.clone(),
            };

            match store.add(new) {
                Ok(report) => {
                    if cli.json {
                        if let Err(e) = print_json(&report) {
                            eprintln!("❌ {}", e);
                            std::process::exit(3);
                        }
                    } else {
                        println!(
                            "🚩 Reported {} ({}), id {}",
                            report.contact, report.contact_type, report.id
                        );
                        println!("{} contacts flagged so far", store.len());
                    }
                }
                Err(e) => {
                    eprintln!("❌ Failed to save report: {}", e);
                    std::process::exit(3);
                }
            }
        }
        Commands::Reports { limit } => {
            if cli.json {
                let shown: Vec<_> = store.reports().iter().take(*limit).collect();
                if let Err(e) = print_json(&shown) {
                    eprintln!("❌ {}", e);
                    std::process::exit(3);
                }
                return;
            }

            if store.is_empty() {
                println!("No reports yet. Help the community by reporting suspicious contacts.");
                return;
            }

            println!("Recent Community Reports ({} contacts flagged)\n", store.len());

            for report in store.reports().iter().take(*limit) {
                println!(
                    "  [{}] {}  ({})",
                    report.contact_type,
                    report.contact,
                    report.flagged_date()
                );
                println!("      \"{}\"", report.reason);
                println!(
                    "      Reported by {}",
                    report.reporter_name.as_deref().unwrap_or("Anonymous")
                );
                println!();
            }

            let hidden = store.len().saturating_sub(*limit);
            if hidden > 0 {
                println!("({} more not shown)", hidden);
            }
        }
    }
}
