use clap::Parser;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use triage_core::clipboard::SystemClipboard;
use triage_core::presenter::{present, BadgeVariant, View};
use triage_core::{
    AnalysisClient, ClientConfig, FileOrigin, InputMode, RequestState, SelectedFile, TriageSession,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Classify an email and draft a reply", long_about = None)]
struct Args {
    /// Email body to analyze (read from stdin when neither --text nor --file is given)
    #[arg(short, long, conflicts_with = "file")]
    text: Option<String>,

    /// .txt or .pdf file to upload instead of text
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Service base URL (overrides TRIAGE_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Print the final request state as JSON
    #[arg(long)]
    json: bool,

    /// Copy the suggested reply to the clipboard
    #[arg(long)]
    copy: bool,

    /// With --copy on Linux, keep serving the clipboard for up to this many
    /// seconds unless a clipboard manager takes it over sooner
    #[arg(long, default_value_t = 30)]
    copy_hold_secs: u64,

    /// Only check that the service is up
    #[arg(long)]
    health: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    triage_core::init_tracing();
    let args = Args::parse();

    let config = match build_config(args.api_url.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let client = match AnalysisClient::new(&config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if args.health {
        return match client.health().await {
            Ok(status) if status.is_healthy() => {
                println!("{} is healthy", config.base_url);
                ExitCode::SUCCESS
            }
            Ok(status) => {
                eprintln!("{} reported status {:?}", config.base_url, status.status);
                ExitCode::FAILURE
            }
            Err(e) => {
                eprintln!("Error: {}", e.user_message());
                ExitCode::FAILURE
            }
        };
    }

    let session = TriageSession::new();
    if let Err(e) = load_input(&session, &args) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match session.can_submit() {
        Ok(true) => {}
        Ok(false) => {
            eprintln!("Error: No input text provided.");
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    }

    let state = match session.submit(&client).await {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&state) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error: {}", e),
        }
    } else {
        render(&state);
    }

    if args.copy {
        copy_reply(&session, Duration::from_secs(args.copy_hold_secs));
    }

    if matches!(state, RequestState::Failed { .. }) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn build_config(api_url: Option<&str>) -> Result<ClientConfig, triage_core::TriageError> {
    let config = ClientConfig::from_env()?;
    match api_url {
        Some(url) => config.with_base_url(url),
        None => Ok(config),
    }
}

fn load_input(session: &TriageSession, args: &Args) -> Result<(), triage_core::TriageError> {
    if let Some(path) = &args.file {
        let file = SelectedFile::from_path(path)?;
        if file.exceeds_size_hint() {
            tracing::warn!(name = %file.name, size = file.size(), "file is larger than the 10MB hint");
        }
        session.select_file(file, FileOrigin::Picker)?;
        return session.set_mode(InputMode::File);
    }

    let text = match &args.text {
        Some(t) => t.clone(),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    session.set_text(text)?;
    session.set_mode(InputMode::Text)
}

fn render(state: &RequestState) {
    match present(state) {
        View::Empty | View::Loading => {}
        View::Error(message) => eprintln!("Error: {}", message),
        View::Result(view) => {
            let marker = match view.badge.variant {
                BadgeVariant::Primary => "*",
                BadgeVariant::Secondary => "-",
            };
            println!("[{} {}]", marker, view.badge.label);
            println!("{}", view.reason);
            println!();
            println!("Suggested reply:");
            println!("{}", view.response);
        }
    }
}

fn copy_reply(session: &TriageSession, hold: Duration) {
    // The process exits right after this, so the write has to outlive us.
    let mut clipboard = match SystemClipboard::holding(hold) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(error = %e, "clipboard unavailable");
            return;
        }
    };
    match session.copy_response(&mut clipboard) {
        Ok(Some(_reset)) => eprintln!("Reply copied to clipboard."),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "copy failed"),
    }
}
