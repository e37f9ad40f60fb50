//! CampaignFlow board viewer.
//!
//! Loads the configured backend, fetches the board and prints each column.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use campaignflow::board::{Board, Notification};
use campaignflow::config::Config;
use campaignflow::filter::FilterCriteria;
use campaignflow::format::{initials, relative_due};
use campaignflow::store::build_store;
use campaignflow::task::{Platform, Priority};

#[derive(Parser, Debug)]
#[command(name = "campaignflow")]
#[command(version)]
#[command(about = "Print the campaign task board, optionally filtered")]
#[command(
    long_about = "Print the campaign task board, optionally filtered.\n\n\
    Environment variables:\n  \
    DATA_BACKEND         mock (default) or supabase\n  \
    SUPABASE_URL         Project URL for the supabase backend\n  \
    SUPABASE_ANON_KEY    Public API key for the supabase backend\n  \
    CAMPAIGNFLOW_CONFIG  Read settings from a JSON file instead"
)]
struct Args {
    /// Case-insensitive text matched against title and influencer handle
    #[arg(long)]
    search: Option<String>,

    /// Only show tasks with this priority (Low, Medium, High)
    #[arg(long)]
    priority: Option<Priority>,

    /// Only show tasks for this platform (Instagram, TikTok, YouTube)
    #[arg(long)]
    platform: Option<Platform>,

    /// Only show tasks assigned to this team member
    #[arg(long, value_name = "ASSIGNEE_ID")]
    assignee: Option<String>,
}

impl Args {
    fn criteria(self) -> FilterCriteria {
        FilterCriteria {
            search: self.search.unwrap_or_default(),
            priority: self.priority.into(),
            platform: self.platform.into(),
            assignee: self.assignee.into(),
        }
    }
}

fn report(notification: &Notification) {
    if notification.is_error() {
        eprintln!("error: {}", notification.message);
    } else {
        println!("{}", notification.message);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("campaignflow=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let criteria = args.criteria();
    let config = Config::from_env()?;
    tracing::info!(backend = config.backend.as_str(), "Starting CampaignFlow");

    let store = build_store(&config).await?;
    let (board, mut notifications) = Board::new(store);

    if let Err(err) = board.load().await {
        tracing::warn!(error = %err, "Board loaded without tasks");
    }
    while let Ok(notification) = notifications.try_recv() {
        report(&notification);
    }

    let today = chrono::Local::now().date_naive();
    let grouped = board.columns(&criteria).await;

    for column in &grouped.columns {
        println!("== {} ({})", column.title(), column.tasks.len());
        for task in &column.tasks {
            let assignees = task
                .assignees
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(|a| initials(&a.name))
                .collect::<Vec<_>>()
                .join(" ");
            println!(
                "  [{}] {} - {} ({}) {} {}",
                task.priority,
                task.title,
                task.influencer.handle,
                task.influencer.platform,
                relative_due(task.due_date, today),
                assignees
            );
        }
    }
    if !grouped.unknown.is_empty() {
        println!("== Unknown status ({})", grouped.unknown.len());
        for task in &grouped.unknown {
            println!("  {} [{}]", task.title, task.status);
        }
    }

    let assignees = board.assignees().await;
    if !assignees.is_empty() {
        let names: Vec<_> = assignees
            .iter()
            .map(|a| format!("{} ({})", a.name, a.id))
            .collect();
        println!("Assignees: {}", names.join(", "));
    }

    board.close();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaignflow::filter::Criterion;

    #[test]
    fn test_args_build_criteria() {
        let criteria = Args::try_parse_from(["campaignflow", "--search", "reel", "--platform", "TikTok"])
            .unwrap()
            .criteria();
        assert_eq!(criteria.search, "reel");
        assert_eq!(criteria.platform, Criterion::Only(Platform::TikTok));
        assert!(criteria.priority.is_all());
        assert!(criteria.assignee.is_all());
    }

    #[test]
    fn test_no_args_shows_everything() {
        let criteria = Args::try_parse_from(["campaignflow"]).unwrap().criteria();
        assert_eq!(criteria, FilterCriteria::default());
    }

    #[test]
    fn test_args_reject_unknown_values() {
        assert!(Args::try_parse_from(["campaignflow", "--priority", "Urgent"]).is_err());
        assert!(Args::try_parse_from(["campaignflow", "--search"]).is_err());
        assert!(Args::try_parse_from(["campaignflow", "--color", "red"]).is_err());
    }
}
