/// Walks a tiny calculator through bug finding, refactoring, documentation and test
/// generation, one step at a time.
///
/// Run with: cargo run --example improve-calculator
use dotenv::dotenv;
use tracing_subscriber::EnvFilter;
use xai_client::{AnalysisTask, DevAssistant, XaiClient};

const ORIGINAL_CODE: &str = r#"
function calculate(num1, num2, operation) {
    if(operation == '+') return num1 + num2;
    if(operation == '-') return num1 - num2;
    if(operation == '*') return num1 * num2;
    if(operation == '/') return num1 / num2;
    return 'Invalid operation';
}"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let assistant = DevAssistant::new(XaiClient::from_env()?);

    if !assistant.client().check_connection().await {
        eprintln!("Warning: the API health check failed, continuing anyway.");
    }

    println!("Starting the AI-assisted code improvement process...\n");

    let steps = [
        (AnalysisTask::Bugs, "Checking for potential issues", "Potential issues found"),
        (AnalysisTask::Refactoring, "Getting improvement suggestions", "Suggested improvements"),
        (AnalysisTask::Documentation, "Generating documentation", "Generated documentation"),
        (AnalysisTask::Tests, "Creating test cases", "Generated test cases"),
    ];

    for (number, (task, action, label)) in steps.into_iter().enumerate() {
        println!("Step {}: {action}...", number + 1);
        match assistant.analyze(task, ORIGINAL_CODE).await {
            Ok(text) => {
                println!("\n{label}:");
                println!("{text}");
                println!("\n{}\n", "=".repeat(50));
            }
            Err(e) => eprintln!("Error during {task}: {e}"),
        }
    }

    println!("Use the feedback above to rewrite the calculator with input validation,");
    println!("a division-by-zero check and an explicit error for unknown operations.");

    Ok(())
}
