use clap::{Parser, Subcommand};
use serde::Serialize;
use std::{io, path::PathBuf, process::ExitCode, sync::Arc, time::Duration};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ticketing_admin_console::{
    admin::{events::publish_checked, Notice},
    api::{AuthUser, CreateUser, LoginRequest, UpdateUser, UserRole},
    config::Config,
    dashboard::{DashboardRepository, DashboardStats},
    utils::storage::FileSessionStore,
    ApiClient, LoginRedirect, SessionGate,
};

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Parser)]
#[command(
    name = "ticketing-admin",
    version,
    about = "Administrative console for the ticketing platform"
)]
struct Cli {
    /// REST API base URL, including the `/api` prefix
    #[arg(long, global = true)]
    api_base_url: Option<String>,

    /// File holding the persisted session tokens
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in with an admin account
    Login {
        #[arg(long)]
        username: String,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the persisted session
    Logout,
    /// Show the signed-in identity
    Whoami,
    /// Summary statistics over users, events and bookings
    Dashboard {
        #[arg(long)]
        json: bool,
    },
    #[command(subcommand)]
    Users(UserCommand),
    #[command(subcommand)]
    Events(EventCommand),
    #[command(subcommand)]
    Tickets(TicketCommand),
    #[command(subcommand)]
    Bookings(BookingCommand),
}

#[derive(Subcommand)]
enum UserCommand {
    List,
    Show {
        id: String,
    },
    Create {
        #[arg(long)]
        email: String,
        #[arg(long)]
        full_name: String,
        #[arg(long, default_value = "end_user")]
        role: UserRole,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    SetActive {
        id: String,
        #[arg(action = clap::ArgAction::Set)]
        active: bool,
    },
    Role {
        id: String,
        role: UserRole,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand)]
enum EventCommand {
    List,
    Show { id: String },
    /// Publish an event; refused while it has no tickets
    Publish { id: String },
    Delete { id: String },
}

#[derive(Subcommand)]
enum TicketCommand {
    List {
        #[arg(long)]
        event: Option<String>,
    },
    Show {
        id: String,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand)]
enum BookingCommand {
    List {
        #[arg(long)]
        event: Option<String>,
    },
    Show {
        id: String,
    },
    Cancel {
        id: String,
    },
}

struct CliRedirect;

impl LoginRedirect for CliRedirect {
    fn redirect_to_login(&self) {
        eprintln!("Session ended. Run `ticketing-admin login` to sign in again.");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ticketing_admin_console=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::load()?.with_overrides(cli.api_base_url, cli.session_file)?;
    tracing::debug!(
        api_base_url = %config.api_base_url,
        session_file = %config.session_file.display(),
        "Loaded configuration from environment/.env"
    );

    let store = Arc::new(FileSessionStore::new(&config.session_file));
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()?;
    let api = ApiClient::with_http_client(&config.api_base_url, store, http)
        .with_redirect(Arc::new(CliRedirect));
    let gate = SessionGate::new(Arc::new(api));

    match run(&gate, cli.command).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(notice) => {
            eprintln!("{}", notice);
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run(gate: &SessionGate, command: Command) -> Result<(), Notice> {
    match command {
        Command::Login { username, password } => {
            let password = password_or_prompt(password)?;
            let user = gate
                .login(LoginRequest { username, password })
                .await
                .map_err(|e| Notice::failure("Sign in failed", &e))?;
            announce(Notice::success(format!("Signed in as {}", user.email)));
            Ok(())
        }
        Command::Logout => {
            gate.logout()
                .map_err(|e| Notice::failure("Failed to sign out", &e))?;
            announce(Notice::success("Signed out"));
            Ok(())
        }
        Command::Whoami => {
            let user = require_session(gate).await?;
            print_json(&user)
        }
        Command::Dashboard { json } => {
            require_session(gate).await?;
            let stats = DashboardRepository::new_with_client(gate.api().clone())
                .fetch_stats()
                .await
                .map_err(|e| Notice::failure("Failed to load dashboard statistics", &e))?;
            if json {
                print_json(&stats)
            } else {
                print_summary(&stats);
                Ok(())
            }
        }
        Command::Users(command) => {
            require_session(gate).await?;
            run_users(gate.api(), command).await
        }
        Command::Events(command) => {
            require_session(gate).await?;
            run_events(gate.api(), command).await
        }
        Command::Tickets(command) => {
            require_session(gate).await?;
            run_tickets(gate.api(), command).await
        }
        Command::Bookings(command) => {
            require_session(gate).await?;
            run_bookings(gate.api(), command).await
        }
    }
}

async fn run_users(api: &ApiClient, command: UserCommand) -> Result<(), Notice> {
    match command {
        UserCommand::List => {
            let users = api
                .list_users()
                .await
                .map_err(|e| Notice::failure("Failed to load users", &e))?;
            print_json(&users)
        }
        UserCommand::Show { id } => {
            let user = api
                .get_user(&id)
                .await
                .map_err(|e| Notice::failure("Failed to load user", &e))?;
            print_json(&user)
        }
        UserCommand::Create {
            email,
            full_name,
            role,
            password,
        } => {
            let password = password_or_prompt(password)?;
            let user = api
                .register_user(&CreateUser {
                    email,
                    password,
                    full_name,
                    role,
                })
                .await
                .map_err(|e| Notice::failure("Failed to create user", &e))?;
            announce(Notice::success(format!("User {} created", user.email)));
            print_json(&user)
        }
        UserCommand::SetActive { id, active } => {
            let update = UpdateUser {
                is_active: Some(active),
                ..Default::default()
            };
            let user = api
                .update_user(&id, &update)
                .await
                .map_err(|e| Notice::failure("Failed to update user", &e))?;
            print_json(&user)
        }
        UserCommand::Role { id, role } => {
            let user = api
                .update_user_role(&id, role)
                .await
                .map_err(|e| Notice::failure("Failed to update user role", &e))?;
            announce(Notice::success(format!("{} is now {}", user.email, user.role)));
            Ok(())
        }
        UserCommand::Delete { id } => {
            api.delete_user(&id)
                .await
                .map_err(|e| Notice::failure("Failed to delete user", &e))?;
            announce(Notice::success("User deleted"));
            Ok(())
        }
    }
}

async fn run_events(api: &ApiClient, command: EventCommand) -> Result<(), Notice> {
    match command {
        EventCommand::List => {
            let events = api
                .list_all_events()
                .await
                .map_err(|e| Notice::failure("Failed to load events", &e))?;
            print_json(&events)
        }
        EventCommand::Show { id } => {
            let event = api
                .get_event(&id)
                .await
                .map_err(|e| Notice::failure("Failed to load event", &e))?;
            print_json(&event)
        }
        EventCommand::Publish { id } => {
            let event = publish_checked(api, &id)
                .await
                .map_err(|e| Notice::failure("Failed to publish event", &e))?;
            announce(Notice::success(format!("Event \"{}\" published", event.name)));
            Ok(())
        }
        EventCommand::Delete { id } => {
            api.delete_event(&id)
                .await
                .map_err(|e| Notice::failure("Failed to delete event", &e))?;
            announce(Notice::success("Event deleted"));
            Ok(())
        }
    }
}

async fn run_tickets(api: &ApiClient, command: TicketCommand) -> Result<(), Notice> {
    match command {
        TicketCommand::List { event } => {
            let tickets = api
                .list_tickets(event.as_deref())
                .await
                .map_err(|e| Notice::failure("Failed to load tickets", &e))?;
            print_json(&tickets)
        }
        TicketCommand::Show { id } => {
            let ticket = api
                .get_ticket(&id)
                .await
                .map_err(|e| Notice::failure("Failed to load ticket", &e))?;
            print_json(&ticket)
        }
        TicketCommand::Delete { id } => {
            api.delete_ticket(&id)
                .await
                .map_err(|e| Notice::failure("Failed to delete ticket", &e))?;
            announce(Notice::success("Ticket deleted"));
            Ok(())
        }
    }
}

async fn run_bookings(api: &ApiClient, command: BookingCommand) -> Result<(), Notice> {
    match command {
        BookingCommand::List { event } => {
            let bookings = match event {
                Some(event_id) => api.list_event_bookings(&event_id).await,
                None => api.list_bookings().await,
            }
            .map_err(|e| Notice::failure("Failed to load bookings", &e))?;
            if bookings.is_empty() {
                announce(Notice::info("No bookings found"));
            }
            print_json(&bookings)
        }
        BookingCommand::Show { id } => {
            let booking = api
                .get_booking(&id)
                .await
                .map_err(|e| Notice::failure("Failed to load booking", &e))?;
            print_json(&booking)
        }
        BookingCommand::Cancel { id } => {
            let booking = api
                .cancel_booking(&id)
                .await
                .map_err(|e| Notice::failure("Failed to cancel booking", &e))?;
            announce(Notice::success(format!(
                "Booking {} is now {}",
                booking.id,
                booking.status.as_str()
            )));
            Ok(())
        }
    }
}

async fn require_session(gate: &SessionGate) -> Result<AuthUser, Notice> {
    let state = gate.initialize().await;
    state
        .user()
        .cloned()
        .ok_or_else(|| Notice::warning("Not signed in. Run `ticketing-admin login` first."))
}

fn password_or_prompt(password: Option<String>) -> Result<String, Notice> {
    if let Some(password) = password {
        return Ok(password);
    }
    eprint!("Password: ");
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .map_err(|e| Notice::error(format!("Failed to read password: {}", e)))?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        return Err(Notice::error("Password must not be empty"));
    }
    Ok(password)
}

fn announce(notice: Notice) {
    eprintln!("{}", notice);
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Notice> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| Notice::error(format!("Failed to render output: {}", e)))?;
    println!("{}", rendered);
    Ok(())
}

fn print_summary(stats: &DashboardStats) {
    println!("Users      {}", stats.total_users);
    println!("Events     {}", stats.total_events);
    println!("Bookings   {}", stats.total_bookings);
    println!("Revenue    {:.2}", stats.total_revenue);

    println!();
    println!("Events by category");
    for entry in &stats.events_by_category {
        println!("  {:<16} {}", entry.category, entry.count);
    }

    println!();
    println!("Revenue by month");
    for entry in &stats.revenue_by_month {
        println!("  {:<10} {:>12.2}", entry.month, entry.revenue);
    }

    println!();
    println!("Recent bookings");
    if stats.recent_bookings.is_empty() {
        println!("  (none)");
    }
    for booking in &stats.recent_bookings {
        println!(
            "  {}  {:<26} {:>10.2} {:<4} {}",
            booking.created_at.format("%Y-%m-%d %H:%M"),
            booking.id,
            booking.total_amount,
            booking.currency,
            booking.status.as_str()
        );
    }
}
