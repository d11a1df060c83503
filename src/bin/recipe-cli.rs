use clap::{Parser, Subcommand};
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::path::PathBuf;

use recipe_importer::recipe::input::guess_image_mime;

#[derive(Parser)]
#[command(name = "recipe-cli")]
#[command(about = "Submit recipes to a running recipe importer", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:5000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a recipe from photos and/or text and publish it
    Extract {
        /// Recipe photograph (repeatable)
        #[arg(short, long = "image")]
        images: Vec<PathBuf>,

        /// File containing pasted recipe text
        #[arg(short, long)]
        text_file: Option<PathBuf>,

        /// Recipe text given inline
        #[arg(long, conflicts_with = "text_file")]
        text: Option<String>,

        /// Link to where the recipe came from
        #[arg(short, long)]
        source: Option<String>,
    },
    /// Check server status and upstream configuration
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Extract {
            images,
            text_file,
            text,
            source,
        } => {
            let mut form = Form::new();
            for path in images {
                let bytes = tokio::fs::read(&path).await?;
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "image".to_string());
                let mime = guess_image_mime(&file_name).unwrap_or("application/octet-stream");
                form = form.part("images", Part::bytes(bytes).file_name(file_name).mime_str(mime)?);
            }
            let text = match text_file {
                Some(path) => Some(tokio::fs::read_to_string(path).await?),
                None => text,
            };
            if let Some(text) = text {
                form = form.text("text", text);
            }
            if let Some(source) = source {
                form = form.text("source_url", source);
            }

            let res = client.post(format!("{}/extract", base)).multipart(form).send().await?;
            print_response(res).await?;
        }
        Commands::Health => {
            let res = client.get(format!("{}/health", base)).send().await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    match serde_json::from_str::<Value>(&text) {
        Ok(json) if status.is_success() => println!("{}", serde_json::to_string_pretty(&json)?),
        Ok(json) => {
            let message = json["error"].as_str().unwrap_or("unknown error");
            eprintln!("Error ({}): {}", status, message);
            std::process::exit(1);
        }
        Err(_) => {
            eprintln!("Error: server returned status {}", status);
            eprintln!("Response: {}", text);
            std::process::exit(1);
        }
    }
    Ok(())
}
