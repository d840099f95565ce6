/// Reads a source file, asks the model for documentation, bugs, refactoring ideas and
/// tests, and writes the results next to the original.
///
/// Run with: cargo run --example improve-code -- [path/to/source]
use std::path::{Path, PathBuf};

use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;
use xai_client::{DevAssistant, XaiClient};

const DEFAULT_SOURCE: &str = "demos/project/src/user_management.js";

fn sibling(source: &Path, suffix: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "source".to_string());
    let name = match source.extension() {
        Some(ext) if suffix == "improved" => format!("{stem}.{suffix}.{}", ext.to_string_lossy()),
        _ => format!("{stem}.{suffix}"),
    };
    source.with_file_name(name)
}

fn as_comment_block(text: &str) -> String {
    let body: Vec<String> = text.lines().map(|line| format!(" * {line}")).collect();
    format!("/**\n{}\n */\n", body.join("\n"))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let source_path = PathBuf::from(
        std::env::args()
            .nth(1)
            .unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
    );
    let source_code = tokio::fs::read_to_string(&source_path).await?;

    let assistant = DevAssistant::new(XaiClient::from_env()?);

    println!("Starting code improvement process for {}...\n", source_path.display());

    println!("Step 1: Generating Documentation");
    let documentation = assistant.generate_documentation(&source_code).await?;
    println!("{documentation}");

    println!("\nStep 2: Finding Potential Bugs");
    let bugs = assistant.find_bugs(&source_code).await?;
    println!("{bugs}");

    println!("\nStep 3: Getting Refactoring Suggestions");
    let refactoring = assistant.suggest_refactoring(&source_code).await?;
    println!("{refactoring}");

    println!("\nStep 4: Generating Test Cases");
    let tests = assistant.generate_tests(&source_code).await?;
    println!("{tests}");

    let improved_path = sibling(&source_path, "improved");
    let improved = format!("{}\n{source_code}", as_comment_block(&documentation));
    tokio::fs::write(&improved_path, improved).await?;
    info!(path = %improved_path.display(), "wrote documented source");
    println!("\nDocumented code has been saved to: {}", improved_path.display());

    let tests_path = sibling(&source_path, "generated_tests.md");
    let report = format!(
        "# Generated tests for {}\n\n{tests}\n\n## Potential issues\n\n{bugs}\n\n## Refactoring suggestions\n\n{refactoring}\n",
        source_path.display()
    );
    tokio::fs::write(&tests_path, report).await?;
    println!("Test suggestions have been saved to: {}", tests_path.display());

    Ok(())
}
