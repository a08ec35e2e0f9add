use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "chatrelay", version, about = "Chat with an n8n workflow through the relay")]
pub struct Cli {
    /// Base URL of the relay API.
    #[arg(
        long,
        global = true,
        env = "RELAY_API_URL",
        default_value = "http://localhost:3001"
    )]
    pub api_url: String,

    /// Seconds to wait for the relay before giving up on a message.
    #[arg(long, global = true, default_value_t = 15)]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive chat; one message per line, end with EOF or `/quit`.
    Chat,
    /// Send a single message and print the reply.
    Send {
        /// The message text.
        message: String,
    },
    /// Show relay status and health.
    Status,
    /// Print the program version.
    Version,
}
