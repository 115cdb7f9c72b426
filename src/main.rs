use gemchat::chat::{ChatSession, FeedbackLabel, RecordingDisplay, TerminalDisplay};
use gemchat::cli::{
    Args, ChatConfig, ConfigDiscovery, ExecutionMode, InteractiveConfig, OneShotConfig,
    SessionArgs, resolve_api_key,
};
use gemchat::{ChatSystem, env};
use std::io::{self, Write};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let mode = args.mode();

    let verbose = match &mode {
        ExecutionMode::Interactive(config) => config.session.verbose,
        ExecutionMode::OneShot(config) => config.session.verbose,
        _ => false,
    };

    // Initialize logging on stderr so it never interleaves with the chat
    let default_filter = if verbose { "gemchat=debug" } else { "gemchat=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .init();

    match mode {
        ExecutionMode::Interactive(config) => run_interactive_mode(config).await,
        ExecutionMode::OneShot(config) => run_one_shot(config).await,
        ExecutionMode::ShowConfig => {
            ConfigDiscovery::show_discovery_info();
            Ok(())
        }
        ExecutionMode::InitConfig => {
            let path = ConfigDiscovery::create_default_user_config()?;
            println!("Configuration file: {:?}", path);
            Ok(())
        }
    }
}

/// Load configuration and build a session, or explain why not.
///
/// Returns `Ok(None)` when no API key is available: nothing may be
/// dispatched without one.
fn prepare_session(args: &SessionArgs) -> Result<Option<ChatSession>, Box<dyn std::error::Error>> {
    let config = match &args.config_override {
        Some(path) => {
            info!("Loading configuration override from: {:?}", path);
            ChatConfig::from_toml_file(path)?
        }
        None => ConfigDiscovery::discover_config()?,
    };

    let Some(api_key) = resolve_api_key(args.api_key.as_deref()) else {
        eprintln!("⚠️  Please enter your Gemini API key to use the chatbot.");
        eprintln!(
            "   Pass --api-key or set {}. Get a key from {}",
            env::API_KEY_ENV_VAR,
            env::API_KEY_HELP_URL
        );
        return Ok(None);
    };

    let mut system = ChatSystem::new(config)?;
    if let Some(path) = &args.feedback_log {
        system = system.with_feedback_log(path.clone());
    }

    Ok(Some(system.new_session(api_key)))
}

async fn run_one_shot(config: OneShotConfig) -> Result<(), Box<dyn std::error::Error>> {
    let Some(mut session) = prepare_session(&config.session)? else {
        std::process::exit(1);
    };

    // Seeds the persona without printing it
    session.start(&mut RecordingDisplay::default())?;

    let mut display = TerminalDisplay::stdout(false);
    session.submit(&config.prompt, &mut display).await?;
    Ok(())
}

async fn run_interactive_mode(config: InteractiveConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!("Running in interactive mode");

    let Some(mut session) = prepare_session(&config.session)? else {
        std::process::exit(1);
    };

    println!("🤖 gemchat: your friendly AI assistant powered by Google Gemini");
    println!("   Type /help for commands.\n");

    let mut display = TerminalDisplay::stdout(config.show_system);
    session.start(&mut display)?;

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        match input {
            "" => continue,
            "/quit" | "/exit" => break,
            "/help" => show_interactive_help(),
            "/status" => show_status(&session),
            "/clear" => session.clear(&mut display)?,
            "/good" => record_feedback(&session, FeedbackLabel::Good).await,
            "/bad" => record_feedback(&session, FeedbackLabel::NeedsImprovement).await,
            prompt => {
                println!();
                session.submit(prompt, &mut display).await?;
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}

async fn record_feedback(session: &ChatSession, label: FeedbackLabel) {
    match session.record_feedback(label).await {
        Ok(true) => println!("Thanks for your feedback!\n"),
        Ok(false) => println!("Nothing to rate yet.\n"),
        Err(e) => eprintln!("⚠️  {}\n", e.user_message()),
    }
}

fn show_interactive_help() {
    println!("📖 Commands:");
    println!("  /clear   - Clear the conversation and reset the rate limit");
    println!("  /good    - Mark the last reply as good");
    println!("  /bad     - Mark the last reply as needing improvement");
    println!("  /status  - Show rate limit usage");
    println!("  /help    - Show this help message");
    println!("  /quit    - Exit");
    println!("\n💡 Anything else is sent to the assistant.\n");
}

fn show_status(session: &ChatSession) {
    let status = session.rate_status();
    println!("\n📊 Session {}", session.id());
    println!("  Prompts: {}", session.conversation_count());
    println!(
        "  Rate limit: {} used, {} remaining in the current window",
        status.used_requests, status.available_requests
    );
    println!();
}
