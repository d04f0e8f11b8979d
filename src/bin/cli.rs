//! Diagnostic CLI for the suggestion core.
//!
//! Lets an operator probe backend health and run the suggestion
//! operations against ad-hoc input without the surrounding task service.

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

use tasksage::{ContextEntry, ContextSource, SuggestDomain, TaskDraft};

#[derive(Parser)]
#[command(name = "tasksage", version, about = "AI-assisted task suggestions")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check backend configuration and responsiveness
    Health,

    /// Analyze context lines read from stdin (one entry per line)
    Analyze {
        /// Source label applied to every entry
        #[arg(long, default_value = "note")]
        source: String,
    },

    /// Produce a full suggestion bundle for a task
    Suggest {
        /// Task title
        #[arg(long)]
        title: String,

        /// Task description
        #[arg(long, default_value = "")]
        description: String,

        /// Current priority (0-100)
        #[arg(long, default_value_t = 50)]
        priority: i32,

        /// Known category names
        #[arg(long = "category")]
        categories: Vec<String>,

        /// Context entry, repeatable
        #[arg(long = "context")]
        contexts: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let domain = SuggestDomain::from_env();

    match cli.command {
        Command::Health => {
            let health = domain.health().await;
            println!(
                "hosted backend:  {}",
                configured_label(health.hosted_configured)
            );
            println!(
                "local backend:   {}",
                configured_label(health.local_configured)
            );
            if health.responsive {
                println!("probe:           {}", "responsive".green());
            } else {
                println!("probe:           {}", "unresponsive".red());
                if let Some(detail) = health.detail {
                    println!("detail:          {detail}");
                }
            }
        }
        Command::Analyze { source } => {
            let source: ContextSource = source.parse()?;
            let entries: Vec<ContextEntry> = std::io::stdin()
                .lines()
                .map_while(Result::ok)
                .filter(|l| !l.trim().is_empty())
                .map(|l| ContextEntry::new(l, source))
                .collect();

            let analysis = domain.analyze_context(&entries).await;
            println!("{} ({})", "Context analysis".bold(), analysis.source);
            println!("{}", serde_json::to_string_pretty(&analysis.value)?);
        }
        Command::Suggest {
            title,
            description,
            priority,
            categories,
            contexts,
        } => {
            let task = TaskDraft::new(title, description).with_priority(priority);
            let entries: Vec<ContextEntry> = contexts
                .into_iter()
                .map(|c| ContextEntry::new(c, ContextSource::Note))
                .collect();

            let bundle = domain.suggest_all(&task, &entries, &categories).await?;
            println!("{} ({})", "Suggestions".bold(), bundle.source);
            println!("  priority:    {}", bundle.priority);
            println!(
                "  deadline:    {}",
                bundle.deadline.as_deref().unwrap_or("flexible")
            );
            println!("  category:    {}", bundle.category);
            println!("  tags:        {}", bundle.tags.join(", "));
            println!("  description: {}", bundle.enhanced_description);
        }
    }

    Ok(())
}

fn configured_label(configured: bool) -> String {
    if configured {
        "configured".green().to_string()
    } else {
        "not configured".yellow().to_string()
    }
}
