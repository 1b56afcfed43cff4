//! Command line entry point for pipewatch.

use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use colored::Colorize;

use pw_client::{GenerationApi, ServerConfig};
use pw_protocol::{GenerationRequest, TaskStatus};

#[derive(Parser)]
#[command(name = "pipewatch", version, about = "Watch video generation runs")]
struct Cli {
    /// Base URL of the generation backend.
    #[arg(long, global = true, default_value = "http://localhost:8000")]
    server: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start a generation run for an episode.
    Start {
        /// Episode identifier.
        #[arg(long)]
        episode: String,

        /// Visual style preset.
        #[arg(long)]
        style: Option<String>,

        /// Burn subtitles into the final edit.
        #[arg(long)]
        subtitles: bool,

        /// Open the live dashboard once the run is accepted.
        #[arg(long)]
        watch: bool,
    },

    /// Open the live dashboard for a running task.
    Watch {
        /// Task identifier.
        task_id: String,
    },

    /// Print the current status of a task.
    Status {
        /// Task identifier.
        task_id: String,
    },

    /// Print the final result of a completed task.
    Result {
        /// Task identifier.
        task_id: String,
    },

    /// Cancel a running task.
    Cancel {
        /// Task identifier.
        task_id: String,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::new(&cli.server).wrap_err("invalid --server URL")?;
    let api = GenerationApi::new(config);

    match cli.command {
        Command::Start {
            episode,
            style,
            subtitles,
            watch,
        } => {
            let mut request = GenerationRequest::for_episode(&episode);
            request.style = style;
            request.add_subtitles = subtitles.then_some(true);

            let response = api.start(&request).await?;
            println!(
                "{} task {} for episode {}",
                "started".green().bold(),
                response.task_id.cyan(),
                response.episode_id
            );

            if watch {
                pw_tui::run_watch(api, response.task_id, response.episode_id)
                    .await
                    .map_err(|e| color_eyre::eyre::eyre!(e))?;
            } else {
                println!("follow it with: pipewatch watch {}", response.task_id);
            }
        }

        Command::Watch { task_id } => {
            // The dashboard titles itself by episode, so resolve it first.
            let status = api.status(&task_id).await?;
            pw_tui::run_watch(api, task_id, status.episode_id)
                .await
                .map_err(|e| color_eyre::eyre::eyre!(e))?;
        }

        Command::Status { task_id } => {
            let status = api.status(&task_id).await?;
            println!(
                "{} {} {:>5.1}%  {}",
                status.task_id.cyan(),
                colorize_status(status.status),
                status.progress,
                status.message
            );
            if let Some(stage) = status.current_stage {
                println!("current stage: {}", stage.display_name());
            }
            if let Some(error) = status.error {
                println!("{} {error}", "error:".red());
            }
        }

        Command::Result { task_id } => {
            let result = api.result(&task_id).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }

        Command::Cancel { task_id } => {
            let response = api.cancel(&task_id).await?;
            println!(
                "{} task {}: {}",
                "cancelled".yellow().bold(),
                response.task_id.cyan(),
                response.message
            );
        }
    }

    Ok(())
}

fn colorize_status(status: TaskStatus) -> String {
    let text = format!("{status:?}").to_lowercase();
    match status {
        TaskStatus::Running => text.green().to_string(),
        TaskStatus::Completed => text.cyan().to_string(),
        TaskStatus::Failed => text.red().to_string(),
        TaskStatus::Cancelled => text.yellow().to_string(),
        TaskStatus::Idle => text.to_string(),
    }
}
