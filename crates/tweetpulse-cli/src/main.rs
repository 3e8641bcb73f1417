use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tweetpulse_client::PostClient;
use tweetpulse_pipeline::{
    attach_sentiment, fetch_and_normalize, fetch_home_and_normalize, stream_to_file, summarize,
    table, NormalizedRecord, SentimentClassifier,
};

#[derive(Debug, Parser)]
#[command(name = "tweetpulse")]
#[command(about = "Collect, normalize, and score posts from the upstream timeline API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch a user's timeline and print the normalized table with summary stats
    Timeline {
        /// Screen name of the account to fetch
        #[arg(long)]
        user: String,

        /// Maximum number of posts to request
        #[arg(long, default_value_t = 200)]
        count: u32,

        /// Also classify each post's sentiment
        #[arg(long)]
        sentiment: bool,
    },
    /// Fetch the authenticated account's home timeline
    Home {
        /// Maximum number of posts to request
        #[arg(long, default_value_t = 50)]
        count: u32,
    },
    /// List accounts the given user follows
    Friends {
        /// Screen name of the account to inspect
        #[arg(long)]
        user: String,

        /// Maximum number of accounts to request
        #[arg(long, default_value_t = 20)]
        count: u32,
    },
    /// Stream posts matching keywords, appending raw messages to a file
    Stream {
        /// Comma-separated keywords to track
        #[arg(long, value_delimiter = ',', required = true)]
        track: Vec<String>,

        /// File raw messages are appended to
        #[arg(long, default_value = "stream.json")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = tweetpulse_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let client = PostClient::connect(&config).await?;

    match cli.command {
        Commands::Timeline {
            user,
            count,
            sentiment,
        } => {
            let mut records = fetch_and_normalize(&client, &user, count).await?;
            if sentiment {
                attach_sentiment(&mut records, &SentimentClassifier::new());
            }
            print_records(&records);
        }
        Commands::Home { count } => {
            let records = fetch_home_and_normalize(&client, count).await?;
            print_records(&records);
        }
        Commands::Friends { user, count } => {
            let friends = client.friends(&user, count).await?;
            for friend in friends {
                println!(
                    "{}\t{}\t{} followers",
                    friend.screen_name, friend.name, friend.followers_count
                );
            }
        }
        Commands::Stream { track, out } => {
            tracing::info!(keywords = ?track, sink = %out.display(), "starting stream");
            let state = stream_to_file(&client, &track, &out).await?;
            tracing::info!(?state, "stream session ended");
        }
    }

    Ok(())
}

fn print_records(records: &[NormalizedRecord]) {
    if records.is_empty() {
        println!("no posts returned");
        return;
    }

    println!("{}", table::render(records));

    match summarize(records) {
        Ok(summary) => {
            println!();
            println!(
                "The average length of a post is {:.0} characters.",
                summary.mean_length
            );
            println!("The most liked post has {} likes.", summary.max_likes);
            println!(
                "The most reposted post has {} reposts.",
                summary.max_reposts
            );
        }
        Err(err) => tracing::warn!(error = %err, "summary unavailable"),
    }
}
