mod console;

use clap::{Parser, Subcommand};

use snoobot_plugin::classify;

#[derive(Parser)]
#[command(name = "snoobot", about = "Reddit link expansion for chat channels")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read chat messages from stdin and print the bot's output
    Run {
        /// Channel the messages are sent to
        #[arg(short, long, default_value = "#snoobot")]
        channel: String,

        /// Nick of the sender
        #[arg(short, long, default_value = "user")]
        nick: String,

        /// Treat the sender as a channel operator
        #[arg(long)]
        op: bool,

        /// Treat messages as private messages to the bot
        #[arg(long)]
        private: bool,
    },
    /// Show which Reddit content a message refers to, without network access
    Classify {
        /// Message text
        text: String,
    },
    /// Check system health
    Health,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            channel,
            nick,
            op,
            private,
        } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(console::run_console(console::Session {
                channel,
                nick,
                op,
                private,
            }))?;
        }
        Commands::Classify { text } => {
            let links = classify::extract_links(&text, usize::MAX);
            let mut found = links
                .iter()
                .filter_map(|url| classify::classify_url(url))
                .collect::<Vec<_>>();
            found.extend(classify::find_mentions(&text));

            if found.is_empty() {
                println!("no Reddit content found");
            }
            for content in found {
                println!("{}", serde_json::to_string(&content)?);
            }
        }
        Commands::Health => {
            println!("snoobot is healthy");
            let config = snoobot_config::load_config().unwrap_or_default();
            println!("  app id: {}", config.reddit.app_id);
            println!("  user agent: {}", config.reddit.user_agent);
            println!("  slash mentions: {}", config.reddit.slash_info);
            println!("  command prefix: {}", config.bot.command_prefix);
            println!("  max message length: {}", config.bot.max_message_length);
            match config.database_path() {
                Ok(path) => println!("  database: {}", path.display()),
                Err(e) => println!("  database: unavailable ({e})"),
            }
        }
    }

    Ok(())
}
