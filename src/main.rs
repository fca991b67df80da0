mod airtable;
mod config;
mod contact;
mod content;
mod db;
mod error;
mod membership;
mod server;

use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use crate::airtable::{AirtableClient, RecordSource};
use crate::config::Settings;
use crate::content::similar::Keyworded;
use crate::content::{
    Article, Catalog, Collection, Event, GcMember, NewsroomPost, Podcast, PressArticle,
    TeamMember, Video,
};

#[derive(Parser)]
#[command(name = "vanguard_proxy", about = "Content proxy over Airtable for the Vanguard site")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Bind address (overrides VANGUARD_BIND)
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Fetch and print one normalized collection as JSON
    Fetch {
        #[arg(value_enum)]
        kind: Kind,
    },
    /// Print up to three records similar to one id
    Similar {
        #[arg(value_enum)]
        kind: SimilarKind,
        id: String,
    },
    /// List stored status checks
    Status,
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Events,
    Podcasts,
    Videos,
    Articles,
    Newsroom,
    Press,
    GcMembers,
    Team,
}

#[derive(Clone, Copy, ValueEnum)]
enum SimilarKind {
    Podcasts,
    Videos,
    Articles,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let mut settings = Settings::load()?;

    match cli.command {
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                settings.bind = bind;
            }
            server::serve(settings).await
        }
        Commands::Fetch { kind } => {
            let catalog = catalog(&settings);
            let t0 = Instant::now();
            let pb = spinner(&format!("Fetching {}...", kind.label()));
            let json = match kind {
                Kind::Events => to_json::<Event>(&catalog).await,
                Kind::Podcasts => to_json::<Podcast>(&catalog).await,
                Kind::Videos => to_json::<Video>(&catalog).await,
                Kind::Articles => to_json::<Article>(&catalog).await,
                Kind::Newsroom => to_json::<NewsroomPost>(&catalog).await,
                Kind::Press => to_json::<PressArticle>(&catalog).await,
                Kind::GcMembers => to_json::<GcMember>(&catalog).await,
                Kind::Team => to_json::<TeamMember>(&catalog).await,
            };
            pb.finish_and_clear();
            println!("{}", json?);
            eprintln!("Done in {:.1}s", t0.elapsed().as_secs_f64());
            Ok(())
        }
        Commands::Similar { kind, id } => {
            let catalog = catalog(&settings);
            let json = match kind {
                SimilarKind::Podcasts => similar_json::<Podcast>(&catalog, &id).await,
                SimilarKind::Videos => similar_json::<Video>(&catalog, &id).await,
                SimilarKind::Articles => similar_json::<Article>(&catalog, &id).await,
            };
            println!("{}", json?);
            Ok(())
        }
        Commands::Status => {
            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;
            let checks = db::list_status_checks(&conn)?;
            if checks.is_empty() {
                println!("No status checks recorded.");
                return Ok(());
            }
            println!("{:<36} | {:<24} | {}", "Id", "Client", "Timestamp");
            println!("{}", "-".repeat(90));
            for c in &checks {
                println!(
                    "{:<36} | {:<24} | {}",
                    c.id,
                    truncate(&c.client_name, 24),
                    c.timestamp.to_rfc3339()
                );
            }
            println!("\n{} status checks", checks.len());
            Ok(())
        }
    }
}

impl Kind {
    fn label(self) -> &'static str {
        match self {
            Kind::Events => "events",
            Kind::Podcasts => "podcasts",
            Kind::Videos => "videos",
            Kind::Articles => "articles",
            Kind::Newsroom => "newsroom posts",
            Kind::Press => "press articles",
            Kind::GcMembers => "GC members",
            Kind::Team => "team members",
        }
    }
}

fn catalog(settings: &Settings) -> Catalog {
    let source: Arc<dyn RecordSource> = Arc::new(AirtableClient::new(&settings.airtable));
    Catalog::new(source, Arc::new(settings.airtable.clone()))
}

async fn to_json<T: Collection>(catalog: &Catalog) -> anyhow::Result<String> {
    let items = catalog.list::<T>().await?;
    pretty(&items)
}

async fn similar_json<T: Collection + Keyworded>(
    catalog: &Catalog,
    id: &str,
) -> anyhow::Result<String> {
    let items = catalog.similar::<T>(id).await;
    pretty(&items)
}

fn pretty<T: Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn spinner(msg: &str) -> indicatif::ProgressBar {
    let pb = indicatif::ProgressBar::new_spinner();
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}
