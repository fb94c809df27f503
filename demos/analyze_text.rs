use triage_core::presenter::{present, View};
use triage_core::{AnalysisClient, ClientConfig, InputMode, TriageSession};

#[tokio::main]
async fn main() {
    triage_core::init_tracing();

    // 1. Point the client at the analysis service (TRIAGE_API_URL or localhost:8000)
    let config = match ClientConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            return;
        }
    };
    let client = match AnalysisClient::new(&config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error building client: {}", e);
            return;
        }
    };

    // 2. Fill in the text tab
    let session = TriageSession::new();
    let text = "Hi team, could you tell me the current status of ticket #4821? The customer is waiting on a reply.";
    if let Err(e) = session.set_mode(InputMode::Text).and_then(|_| session.set_text(text)) {
        eprintln!("Error preparing input: {}", e);
        return;
    }

    // 3. Submit and show whatever the presenter derives from the outcome
    println!("Submitting to {}...", client.analyze_url());
    let state = match session.submit(&client).await {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Error submitting: {}", e);
            return;
        }
    };

    match present(&state) {
        View::Result(view) => {
            println!("Category: {}", view.badge.label);
            println!("Reason: {}", view.reason);
            println!("Suggested reply:\n{}", view.response);
        }
        View::Error(message) => println!("Analysis failed: {}", message),
        View::Empty | View::Loading => {}
    }
}
