//! A terminal front-end: collect a topic, a style and a maximum length, write
//! the article, then optionally save it and rate it.
//!
//! ```text
//! OPENAI_API_KEY=... cargo run --example article_writer -- \
//!     "秋の行楽スポット" --style 1 --max-length 300 --save . --rate 4,5,3
//! ```

// Note: This example uses blocking calls for simplicity such as `println`.
// In a real application, these should usually be replaced with async
// alternatives.

use clap::Parser;
use ghostwriter::{
    rating::LogSink, Config, GenerationRequest, InputError, Rating, Session,
    Style, SubmitError,
};
use std::path::PathBuf;

/// Ask the model for a short article with a title, a table of contents and a
/// body.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// What the article is about.
    #[arg(default_value = "")]
    topic: String,
    /// Style, either its number from `--list-styles` or the descriptor text.
    #[arg(short, long, default_value = "1")]
    style: String,
    /// Maximum body length in characters (100 to 1000, steps of 100).
    #[arg(short, long, default_value = "300")]
    max_length: String,
    /// Print the available styles and exit.
    #[arg(long)]
    list_styles: bool,
    /// Print the prompt instead of sending it.
    #[arg(long)]
    dry_run: bool,
    /// Save the article as `generated_article.txt` in this directory.
    #[arg(long)]
    save: Option<PathBuf>,
    /// Rate the article as readability,quality,creativity (each 1 to 5).
    #[arg(long, value_delimiter = ',', num_args = 3)]
    rate: Option<Vec<u8>>,
}

/// Resolve a style given by number (1-based) or by text.
fn style_text(arg: &str) -> String {
    match arg.trim().parse::<usize>() {
        Ok(n) if (1..=Style::ALL.len()).contains(&n) => {
            Style::ALL[n - 1].as_str().to_string()
        }
        _ => arg.to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "log")]
    env_logger::init();

    // Read the command line arguments.
    let args = Args::parse();

    if args.list_styles {
        for (i, style) in Style::ALL.iter().enumerate() {
            println!("{:>2}. {}", i + 1, style);
        }
        return Ok(());
    }

    let style = style_text(&args.style);

    // Input is checked before the key is looked for, so a missing topic is
    // reported as such even without a key.
    let request =
        match GenerationRequest::parse(&args.topic, &style, &args.max_length) {
            Ok(request) => request,
            Err(InputError::EmptyTopic) => {
                eprintln!("書かせる内容を入力してね！");
                std::process::exit(2);
            }
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(2);
            }
        };

    if args.dry_run {
        println!("{}", request.prompt());
        return Ok(());
    }

    // The key is resolved once, here, and shared by the client.
    let client = Config::from_env()?.client()?;
    let mut session = Session::new();

    println!("記事を生成中...");
    match session.submit_request(&client, &request).await {
        Ok(article) => println!("\n{}\n", article),
        Err(SubmitError::Input(e)) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
        Err(SubmitError::Service(e)) => {
            eprintln!("記事を生成できませんでした: {}", e);
            std::process::exit(1);
        }
    }

    if let (Some(dir), Some(download)) = (args.save, session.download()) {
        let path = download.save_to(dir)?;
        println!("Saved to {}", path.display());
    }

    if let Some(scores) = args.rate {
        let rating = Rating::new(scores[0], scores[1], scores[2])?;
        session.rate(&LogSink, rating);
        println!("📊 グラフ機能は現在開発中です。お楽しみに!");
    }

    Ok(())
}
