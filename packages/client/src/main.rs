//! Bugtrack terminal client
//!
//! Lists, reports and triages bugs on a Bugtrack server.

use anyhow::{bail, Context};
use bugtrack_client::api::DEFAULT_SERVER;
use bugtrack_client::detail::Navigation;
use bugtrack_client::render;
use bugtrack_client::{
    BugClient, BugDetail, BugStatus, CreateBugForm, Dashboard, Screenshot, SessionStore,
    SortDirection, SortField, TestCaseFilter,
};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use uuid::Uuid;

/// Bugtrack command line client
#[derive(Parser)]
#[command(name = "bugtrack")]
#[command(author = "Bugtrack Team")]
#[command(version = "0.1.0")]
#[command(about = "Report and triage bugs from the terminal")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Server URL
    #[arg(long, env = "BUGTRACK_SERVER", default_value = DEFAULT_SERVER)]
    server: String,

    /// Bearer token from a previous login
    #[arg(long, env = "BUGTRACK_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Serial,
    Date,
    Priority,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrderArg {
    Asc,
    Desc,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and print a token to export as BUGTRACK_TOKEN
    Login { email: String, password: String },

    /// Create an account and print its token
    Register {
        name: String,
        email: String,
        password: String,
    },

    /// Show the logged-in account
    Me,

    /// List bugs
    List {
        /// Case-insensitive filter on title and description
        #[arg(short, long, default_value = "")]
        search: String,

        #[arg(long, value_enum, default_value = "date")]
        sort: SortArg,

        #[arg(long, value_enum, default_value = "desc")]
        order: OrderArg,
    },

    /// Show one bug
    Show { id: String },

    /// Report a new bug
    Create {
        #[arg(short, long)]
        title: String,

        #[arg(short, long)]
        description: String,

        /// Steps to reproduce
        #[arg(long)]
        steps: Option<String>,

        /// 1 Low, 2 Medium, 3 High, 4 Critical, 5 Blocker
        #[arg(short, long, default_value = "2", value_parser = clap::value_parser!(i16).range(1..=5))]
        priority: i16,

        /// Image to attach (jpg, jpeg, png or gif)
        #[arg(long)]
        screenshot: Option<PathBuf>,
    },

    /// Change the status of a bug (open, in-progress, resolved, closed)
    Status { id: String, status: String },

    /// Assign a bug to a user
    Assign {
        id: String,

        /// User id; omit to unassign
        user_id: Option<Uuid>,
    },

    /// Delete a bug
    Delete {
        id: String,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },

    /// List manual test cases
    TestCases {
        /// all, passed, failed or pending
        #[arg(short, long, default_value = "all")]
        filter: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let session = SessionStore::new();
    let client = BugClient::new(&cli.server, session)?;

    if let Some(token) = &cli.token {
        if command_needs_session(&cli.command) {
            client
                .restore(token)
                .await
                .context("Saved token was rejected, please log in again")?;
        }
    }

    run(&cli, &client).await
}

fn command_needs_session(command: &Commands) -> bool {
    !matches!(
        command,
        Commands::Login { .. } | Commands::Register { .. } | Commands::TestCases { .. }
    )
}

async fn run(cli: &Cli, client: &BugClient) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Login { email, password } => {
            let session = client.login(email, password).await?;
            println!("{} {}", "Logged in as".green(), session.user.name.bold());
            println!("export BUGTRACK_TOKEN={}", session.token);
        }

        Commands::Register {
            name,
            email,
            password,
        } => {
            let session = client.register(name, email, password).await?;
            println!("{} {}", "Registered".green(), session.user.name.bold());
            println!("export BUGTRACK_TOKEN={}", session.token);
        }

        Commands::Me => {
            let user = client.me().await?;
            println!("{} <{}> ({})", user.name.bold(), user.email, user.role);
        }

        Commands::List {
            search,
            sort,
            order,
        } => {
            let mut dashboard = Dashboard::load(client).await;
            let field = match sort {
                SortArg::Serial => SortField::SerialNo,
                SortArg::Date => SortField::Date,
                SortArg::Priority => SortField::Priority,
            };
            let direction = match order {
                OrderArg::Asc => SortDirection::Asc,
                OrderArg::Desc => SortDirection::Desc,
            };
            dashboard.sort_by(field, direction);
            dashboard.set_search(search.as_str());
            render::print_dashboard(&dashboard);
        }

        Commands::Show { id } => {
            let view = BugDetail::load(client, id).await;
            match (&view.bug, &view.error) {
                (Some(bug), _) => render::print_bug(bug, client.base_url()),
                (None, Some(error)) => bail!("{}", error),
                (None, None) => bail!("Bug not found"),
            }
        }

        Commands::Create {
            title,
            description,
            steps,
            priority,
            screenshot,
        } => {
            let mut form = CreateBugForm::new(title.as_str(), description.as_str());
            form.steps = steps.clone().unwrap_or_default();
            form.priority = *priority;

            if let Some(path) = screenshot {
                let shot = Screenshot::from_path(path)
                    .await
                    .with_context(|| format!("Could not read {}", path.display()))?;
                println!(
                    "{} {} ({} bytes)",
                    "Attaching".dimmed(),
                    shot.file_name,
                    shot.data.len()
                );
                form.screenshot = Some(shot);
            }

            match form.submit(client).await {
                Some(bug) => {
                    println!("{}", "Bug reported".green());
                    render::print_bug(&bug, client.base_url());
                }
                None => bail!("{}", form.error.unwrap_or_default()),
            }
        }

        Commands::Status { id, status } => {
            let status: BugStatus = status.parse().map_err(anyhow::Error::msg)?;
            let mut view = BugDetail::load(client, id).await;
            if let Some(error) = view.error.take() {
                bail!("{}", error);
            }

            view.change_status(client, status).await;
            if let Some(error) = &view.error {
                bail!("{}", error);
            }
            println!("{} {}", "Status set to".green(), render::status_badge(status));
        }

        Commands::Assign { id, user_id } => {
            let mut view = BugDetail::load(client, id).await;
            if let Some(error) = view.error.take() {
                bail!("{}", error);
            }

            view.assign(client, *user_id).await;
            if let Some(error) = &view.error {
                bail!("{}", error);
            }
            match user_id {
                Some(user_id) => println!("{} {}", "Assigned to".green(), user_id),
                None => println!("{}", "Unassigned".green()),
            }
        }

        Commands::Delete { id, yes } => {
            let mut view = BugDetail::load(client, id).await;
            if let Some(error) = view.error.take() {
                bail!("{}", error);
            }

            view.request_delete();
            if !yes {
                println!(
                    "{}",
                    "Are you sure you want to delete this bug? Re-run with --yes to confirm."
                        .yellow()
                );
                view.cancel_delete();
                return Ok(());
            }

            match view.confirm_delete(client).await {
                Navigation::Dashboard => println!("{}", "Bug removed".green()),
                Navigation::Stay => bail!("{}", view.error.unwrap_or_default()),
            }
        }

        Commands::TestCases { filter } => {
            let filter: TestCaseFilter = filter.parse().map_err(anyhow::Error::msg)?;
            render::print_test_cases(&filter.apply());
        }
    }

    Ok(())
}
