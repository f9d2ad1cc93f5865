use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};

use sms_console::{
    auth::{backend_from_config, AuthService, AuthSession},
    cli::{Cli, Commands},
    config::Config,
    forms::{FieldErrors, FieldValue, Form, LoginSchema, SendToManySchema, SendToOneSchema},
    sample_data,
    sms::{preview_csv, SmsClient},
    storage::LocalStorage,
    tui::{components::table_view::Pager, traits::Paginated, App},
};

const LOG_FILE: &str = "sms-console.log";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set default log level to INFO if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "sms_console=info");
    }
    init_logging(Commands::is_interactive(cli.command.as_ref()));

    let config = Config::from_env()?;
    config.validate()?;

    let storage = LocalStorage::open(&config.state_db_path)
        .await
        .with_context(|| format!("Failed to open state database {}", config.state_db_path.display()))?;

    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            info!("Launching console");
            match run_tui(config, storage).await {
                Ok(_) => info!("Console exited successfully"),
                Err(e) => {
                    error!("Console failed: {:#}", e);
                    return Err(e);
                }
            }
        }

        Commands::Login { email, password } => {
            let mut form = Form::<LoginSchema>::new();
            form.handle_change("email", FieldValue::Text(email));
            form.handle_change("password", FieldValue::Text(password));
            let credentials = form.validate().map_err(invalid)?;

            let backend = backend_from_config(&config)?;
            let auth = AuthService::new(storage);
            let response = auth.login(backend.as_ref(), &credentials).await?;
            if !response.success {
                bail!("{}", non_empty_or(&response.message, "Login failed. Please try again."));
            }
            match auth.session().await? {
                Some(session) => println!("Signed in as {}", describe_user(&session)),
                None => bail!("Login failed. Please try again."),
            }
        }

        Commands::Logout => {
            AuthService::new(storage).clear_auth().await?;
            println!("Signed out");
        }

        Commands::Whoami => match AuthService::new(storage).session().await? {
            Some(session) => println!("{}", describe_user(&session)),
            None => println!("Not signed in"),
        },

        Commands::Send { to, from, message } => {
            require_session(&AuthService::new(storage)).await?;

            let mut form = Form::<SendToOneSchema>::new();
            form.handle_change("from", FieldValue::Text(from));
            form.handle_change("to", FieldValue::Text(to));
            form.handle_change("text", FieldValue::Text(message));
            let payload = form.validate().map_err(invalid)?;

            let response = SmsClient::from_config(&config)?.send_sms(&payload).await?;
            if response.success {
                println!("SMS sent successfully to {}", payload.to);
            } else {
                bail!("{}", non_empty_or(&response.message, "Failed to send SMS"));
            }
        }

        Commands::SendBatch { file } => {
            require_session(&AuthService::new(storage)).await?;

            let mut form = Form::<SendToManySchema>::new();
            form.handle_change("file", FieldValue::File(Some(file)));
            let path: PathBuf = form.validate().map_err(invalid)?;

            let preview = preview_csv(&path).with_context(|| format!("Failed to read {}", path.display()))?;
            info!("Uploading {} with {} row(s)", path.display(), preview.rows);

            let response = SmsClient::from_config(&config)?.send_sms_batch(&path).await?;
            println!(
                "SMS campaign started! Total batches: {}, Total messages: {}",
                response.total_batches, response.total_messages
            );
        }

        Commands::Logs {
            page,
            page_size,
            status,
            query,
        } => {
            let status = status.as_deref().map(Commands::parse_status).transpose()?;
            let entries = sample_data::filter_logs(&sample_data::logs(), query.as_deref().unwrap_or(""), status);

            let mut pager = Pager::new(page_size.max(1));
            pager.set_total_count(entries.len());
            pager.set_current_page(Commands::parse_page(page, pager.get_total_pages())?);
            let descriptor = pager.descriptor();

            println!(
                "{:<4} {:<12} {:<36} {:<16} {:<12} {:<10} {}",
                "#", "Subaccount", "Date sent/received", "Destination", "Source", "Cost", "Status"
            );
            for (i, entry) in pager.slice(&entries).iter().enumerate() {
                println!(
                    "{:<4} {:<12} {:<36} {:<16} {:<12} {:<10} {}",
                    descriptor.row_number(i),
                    entry.subaccount,
                    entry.date_sent_received,
                    entry.destination,
                    entry.source,
                    entry.cost,
                    entry.status.as_str()
                );
            }
            println!("{} | {}", descriptor.total_label(), descriptor.page_label());
            info!("Listed logs page {} of {} ({} entries)", descriptor.page_index + 1, descriptor.page_count, entries.len());
        }
    }

    Ok(())
}

/// Log to stderr and a file; the interactive console logs to the file only
fn init_logging(interactive: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let file_appender = tracing_appender::rolling::never(".", LOG_FILE);
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_filter(EnvFilter::from_default_env());

    let stderr_layer = (!interactive).then(|| {
        fmt::layer()
            .with_writer(io::stderr)
            .with_filter(EnvFilter::from_default_env())
    });

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .init();
}

async fn run_tui(config: Config, storage: LocalStorage) -> Result<()> {
    let backend = backend_from_config(&config)?;
    let sms = SmsClient::from_config(&config)?;
    let mut app = App::new(config, storage, backend, sms).await?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

async fn require_session(auth: &AuthService) -> Result<AuthSession> {
    match auth.session().await? {
        Some(session) => Ok(session),
        None => bail!("Not signed in. Run `sms-console login` first."),
    }
}

fn describe_user(session: &AuthSession) -> String {
    match &session.user {
        Some(user) => format!("{} <{}>", user.name, user.email),
        None => "unknown user".to_string(),
    }
}

fn non_empty_or<'a>(message: &'a str, fallback: &'a str) -> &'a str {
    if message.is_empty() {
        fallback
    } else {
        message
    }
}

fn invalid(errors: FieldErrors) -> anyhow::Error {
    let details: Vec<String> = errors
        .iter()
        .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
        .collect();
    anyhow::anyhow!("Invalid input: {}", details.join("; "))
}
