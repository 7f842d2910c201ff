use doggo_discovery::config::{LoggingSettings, Settings};
use doggo_discovery::services::{CatalogApi, CatalogClient, RequestLog, TracingSink};
use doggo_discovery::ui::{self, Access, Flow, Intent, Notice, SearchPage, SEARCH_ROUTE};
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

type Input = Lines<BufReader<Stdin>>;

fn init_logging(settings: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    if settings.format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

fn prompt(label: &str) {
    print!("{}", label);
    let _ = std::io::stdout().flush();
}

fn print_notices(notices: Vec<Notice>) {
    for notice in notices {
        match notice {
            Notice::Info(message) => println!("{}", message),
            Notice::Error(message) => println!("! {}", message),
        }
    }
}

/// Ask for credentials until login succeeds. Returns false on end of input.
async fn login(client: &CatalogClient, input: &mut Input) -> std::io::Result<bool> {
    println!("== Doggo Discovery ==");

    loop {
        prompt("Name: ");
        let Some(name) = input.next_line().await? else { return Ok(false) };
        prompt("Email: ");
        let Some(email) = input.next_line().await? else { return Ok(false) };

        match client.login(name.trim(), email.trim()).await {
            Ok(()) => return Ok(true),
            Err(e) => {
                error!("Failed to login: {}", e);
                println!("Login failed. Please check your credentials.");
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load()?;
    init_logging(&settings.logging);

    info!("Starting Doggo Discovery against {}", settings.api.base_url);

    let request_log = Arc::new(
        RequestLog::new(settings.logging.request_log_capacity).with_sink(Arc::new(TracingSink)),
    );
    let client = Arc::new(CatalogClient::from_settings(&settings.api, request_log)?);
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    'session: loop {
        if ui::resolve(SEARCH_ROUTE, client.session_status()) == Access::RedirectToLogin
            && !login(&client, &mut input).await?
        {
            break;
        }

        let mut page = SearchPage::new(client.clone());
        let mut flow = page.load().await;
        print_notices(page.take_notices());
        println!("{}", page.render().await);

        while flow == Flow::Continue {
            prompt("> ");
            let Some(line) = input.next_line().await? else { break 'session };

            match line.parse::<Intent>() {
                Ok(intent) => flow = page.handle(intent).await,
                Err(ui::IntentParseError::Empty) => continue,
                Err(e) => {
                    println!("! {}", e);
                    continue;
                }
            }

            print_notices(page.take_notices());
            if flow == Flow::Continue {
                println!("{}", page.render().await);
            }
        }

        match flow {
            Flow::Quit => break,
            Flow::SessionExpired => println!("Your session has expired, please sign in again."),
            Flow::LoggedOut => println!("Signed out."),
            Flow::Continue => {}
        }
    }

    info!(
        "Exiting after {} catalog requests",
        client.request_log().len()
    );
    Ok(())
}
