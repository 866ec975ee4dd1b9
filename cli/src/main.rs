//! Vesuvio command-line client
//!
//! ```sh
//! vesuvio register --name Ann --email ann@example.com --password secret
//! vesuvio login --email ann@example.com --password secret
//! vesuvio reserve --date 2025-12-25 --time 20:00 --people 2 --comment "window seat"
//! vesuvio my --status pending
//! vesuvio cancel 12
//!
//! # Administrators
//! vesuvio admin list --date 2025-12-25
//! vesuvio admin confirm 12
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use vesuvio::client::{default_session_path, ApiClient, ClientError, ReservationInput, Session};
use vesuvio::interfaces::http::modules::reservations::{AdminReservationDto, ReservationDto};

#[derive(Parser, Debug)]
#[command(name = "vesuvio", version, about = "Book a table at Vesuvio")]
struct Cli {
    /// Base URL of the reservation service.
    #[arg(long, env = "VESUVIO_URL", default_value = "http://127.0.0.1:8080")]
    server: String,

    /// Where the login session is stored.
    #[arg(long, env = "VESUVIO_SESSION")]
    session: Option<PathBuf>,

    /// Log level for client diagnostics.
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account and log in with it.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log in and remember the session.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session.
    Logout,
    /// Show who is logged in.
    Whoami,
    /// Book a table.
    Reserve {
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// HH:MM
        #[arg(long)]
        time: String,
        #[arg(long)]
        people: i32,
        #[arg(long)]
        comment: Option<String>,
    },
    /// List your reservations.
    My {
        /// pending, confirmed or cancelled
        #[arg(long)]
        status: Option<String>,
    },
    /// Cancel one of your reservations.
    Cancel { id: i32 },
    /// Administrator commands.
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Subcommand, Debug)]
enum AdminCommand {
    /// List all reservations.
    List {
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Confirm a pending reservation.
    Confirm { id: i32 },
    /// Cancel any reservation.
    Cancel { id: i32 },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", describe(&e));
            ExitCode::FAILURE
        }
    }
}

/// Text shown to the user for a failed action.
fn describe(err: &ClientError) -> String {
    match err {
        ClientError::Authentication(_) => "invalid credentials".to_string(),
        ClientError::Conflict(message) | ClientError::Validation(message) => message.clone(),
        ClientError::NotLoggedIn => "not logged in, run `vesuvio login` first".to_string(),
        ClientError::Transport(_) => "could not reach the reservation service".to_string(),
        ClientError::Session(e) => format!("could not store the session: {}", e),
        ClientError::Authorization(_)
        | ClientError::InvalidState(_)
        | ClientError::NotFound(_)
        | ClientError::Server { .. } => "the operation failed".to_string(),
    }
}

async fn run(cli: Cli) -> Result<(), ClientError> {
    let api = ApiClient::new(cli.server)?;
    let mut session = Session::load(cli.session.unwrap_or_else(default_session_path));

    match cli.command {
        Command::Register {
            name,
            email,
            password,
        } => {
            let user = api.register(&name, &email, &password).await?;
            println!("Registered {} <{}>", user.name, user.email);
            session.login(user)?;
        }
        Command::Login { email, password } => {
            let user = api.login(&email, &password).await?;
            println!("Welcome back, {}", user.name);
            session.login(user)?;
        }
        Command::Logout => {
            session.logout()?;
            println!("Logged out");
        }
        Command::Whoami => match session.user() {
            Some(user) => {
                let role = if user.is_admin { "administrator" } else { "customer" };
                println!("{} <{}> (id {}, {})", user.name, user.email, user.id, role);
            }
            None => println!("Not logged in"),
        },
        Command::Reserve {
            date,
            time,
            people,
            comment,
        } => {
            let input = ReservationInput {
                date,
                time,
                people,
                comment,
            };
            let created = api.create_reservation(&session, &input).await?;
            println!("Reservation #{} created ({})", created.id, created.status);
        }
        Command::My { status } => {
            let list = api.my_reservations(&session, status.as_deref()).await?;
            if list.is_empty() {
                println!("No reservations");
            }
            for r in &list {
                println!("{}", reservation_line(r));
            }
        }
        Command::Cancel { id } => {
            let r = api.cancel_reservation(&session, id).await?;
            println!("Reservation #{} is now {}", r.id, r.status);
        }
        Command::Admin(cmd) => run_admin(&api, &session, cmd).await?,
    }
    Ok(())
}

async fn run_admin(api: &ApiClient, session: &Session, cmd: AdminCommand) -> Result<(), ClientError> {
    match cmd {
        AdminCommand::List { date, status } => {
            let list = api
                .admin_reservations(session, date.as_deref(), status.as_deref())
                .await?;
            if list.is_empty() {
                println!("No reservations");
            }
            for r in &list {
                println!("{}", admin_line(r));
            }
        }
        AdminCommand::Confirm { id } => {
            let r = api.confirm_reservation(session, id).await?;
            println!("Reservation #{} is now {}", r.id, r.status);
        }
        AdminCommand::Cancel { id } => {
            let r = api.admin_cancel_reservation(session, id).await?;
            println!("Reservation #{} is now {}", r.id, r.status);
        }
    }
    Ok(())
}

fn reservation_line(r: &ReservationDto) -> String {
    let mut line = format!(
        "#{:<5} {} {}  {} people  {}",
        r.id, r.date, r.time, r.people, r.status
    );
    if let Some(comment) = &r.comment {
        line.push_str(&format!("  \"{}\"", comment));
    }
    line
}

fn admin_line(r: &AdminReservationDto) -> String {
    let owner = r
        .user
        .as_ref()
        .map(|u| format!("{} <{}>", u.name, u.email))
        .unwrap_or_else(|| format!("user {}", r.reservation.user_id));
    format!("{}  {}", reservation_line(&r.reservation), owner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_failures_read_as_invalid_credentials() {
        let msg = describe(&ClientError::Authentication("unknown user".into()));
        assert_eq!(msg, "invalid credentials");
    }

    #[test]
    fn conflicts_are_shown_verbatim() {
        let msg = describe(&ClientError::Conflict("email already exists".into()));
        assert_eq!(msg, "email already exists");
    }

    #[test]
    fn state_and_permission_errors_are_generic() {
        for err in [
            ClientError::Authorization("administrator role required".into()),
            ClientError::InvalidState("cannot confirm".into()),
            ClientError::NotFound("Not found".into()),
        ] {
            assert_eq!(describe(&err), "the operation failed");
        }
    }

    #[test]
    fn parses_admin_subcommands() {
        let cli = Cli::try_parse_from(["vesuvio", "admin", "list", "--status", "pending"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Admin(AdminCommand::List { date: None, status: Some(ref s) }) if s == "pending"
        ));
    }
}
