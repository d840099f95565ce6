/// Runs every analysis task against a small function, then produces a combined report
/// for a second snippet.
///
/// Needs `XAI_API_KEY` (a `.env` file works too).
/// Run with: cargo run --example practical-usage
use dotenv::dotenv;
use tracing_subscriber::EnvFilter;
use xai_client::{AnalysisTask, DevAssistant, XaiClient};

const SAMPLE_CODE: &str = r#"
function calculateTotal(items) {
    let total = 0;
    for(let i = 0; i < items.length; i++) {
        total += items[i].price * items[i].quantity;
    }
    return total;
}
"#;

const CURRENT_CODE: &str = r#"
function processUserData(data) {
    if(data.name != null) {
        let userInfo = {};
        userInfo.name = data.name;
        userInfo.age = data.age;
        return userInfo;
    }
}
"#;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let assistant = DevAssistant::new(XaiClient::from_env()?);

    let tasks = [
        (AnalysisTask::Documentation, "Documentation Generation", "Generated Documentation"),
        (AnalysisTask::Review, "Code Review", "Code Review Results"),
        (AnalysisTask::Tests, "Test Case Generation", "Generated Test Cases"),
        (AnalysisTask::Refactoring, "Refactoring Suggestions", "Refactoring Suggestions"),
        (AnalysisTask::Bugs, "Bug Finding", "Potential Bugs Found"),
    ];

    // A failed step is reported and the run moves on to the next one.
    for (task, heading, label) in tasks {
        println!("\n=== {heading} ===");
        match assistant.analyze(task, SAMPLE_CODE).await {
            Ok(text) => println!("{label}:\n{text}"),
            Err(e) => eprintln!("{heading} failed: {e}"),
        }
    }

    println!("\n=== Editor Integration Example ===");
    let report = assistant.improve(CURRENT_CODE).await?;

    println!("\nAnalysis Results:");
    println!("Documentation:\n{}", report.documentation);
    println!("Issues Found:\n{}", report.issues);
    println!("Suggested Improvements:\n{}", report.improvements);

    Ok(())
}
