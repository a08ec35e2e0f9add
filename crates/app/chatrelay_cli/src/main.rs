// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use chatrelay_client::{ChatSession, RelayClient};
use chatrelay_core::message::{ChatMessage, Sender};

use cli::{Cli, Commands};

mod cli;
mod logging;

const QUIT: &str = "/quit";

fn main() -> Result<()> {
    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<()> {
    logging::init()?;

    let args = Cli::parse();

    if let Commands::Version = args.command {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let client = RelayClient::new(&args.api_url, Duration::from_secs(args.timeout_secs))?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        match &args.command {
            Commands::Chat => chat(&client).await,
            Commands::Send { message } => send(&client, message).await,
            Commands::Status => status(&client).await,
            Commands::Version => Ok(()),
        }
    })
}

fn render(message: &ChatMessage) -> String {
    let who = match message.sender() {
        Sender::User => "you",
        Sender::Bot => "bot",
    };
    format!(
        "[{}] {}: {}",
        message.timestamp().format("%H:%M"),
        who,
        message.content()
    )
}

async fn chat(client: &RelayClient) -> Result<()> {
    let mut session = ChatSession::greeted();
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    for message in session.messages().iter() {
        stdout.write_all(format!("{}\n", render(message)).as_bytes()).await?;
    }
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        if line.trim() == QUIT {
            break;
        }

        session.set_draft(line);
        if session.send_draft(client).await?.is_none() {
            continue;
        }

        if let Some(reply) = session.messages().last() {
            stdout.write_all(format!("{}\n", render(reply)).as_bytes()).await?;
            stdout.flush().await?;
        }
    }

    log::info!("chat ended after {} messages", session.messages().len());
    Ok(())
}

async fn send(client: &RelayClient, message: &str) -> Result<()> {
    let mut session = ChatSession::new();

    if session.send_message(client, message).await?.is_none() {
        return Err(Error::Custom("message must not be blank".into()));
    }

    if let Some(reply) = session.messages().last() {
        println!("{}", reply.content());
    }
    Ok(())
}

async fn status(client: &RelayClient) -> Result<()> {
    println!("relay:       {}", client.base_url());

    let health = client.health().await?;
    println!("health:      {}", health.status);

    let status = client.status().await?;
    println!("status:      {}", status.status);
    println!(
        "environment: {}",
        status.environment.as_deref().unwrap_or("unknown")
    );
    println!("webhook:     {}", status.n8n_webhook_url);
    println!(
        "cors origin: {}",
        status.cors_origin.as_deref().unwrap_or("*")
    );
    println!("checked at:  {}", status.timestamp);
    Ok(())
}
