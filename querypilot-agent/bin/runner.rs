use clap::Parser;
use querypilot_agent::{config, sql_generation::SqlGenerationAgent, Agent};
use querypilot_llm::openai::OpenAIClient;
use querypilot_tools::{DatabaseConfig, ToolExecutor};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to config file containing model and database settings
    #[arg(short, long)]
    config: PathBuf,

    /// Natural-language instruction, joined from all remaining words.
    /// The database can also be overridden via the DATABASE_URL
    /// environment variable.
    #[arg(required = true, trailing_var_arg = true)]
    instruction: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(true)
                .with_target(false),
        )
        .init();

    let args = Args::parse();
    let instruction = args.instruction.join(" ");

    let config = config::load_config(&args.config)?;

    let database = match std::env::var("DATABASE_URL") {
        Ok(url) => DatabaseConfig::from_url(&url)
            .map_err(|e| anyhow::anyhow!("Invalid DATABASE_URL: {}", e))?,
        Err(_) => config.database,
    };

    let mut client = OpenAIClient::new(&config.model.api_key)?.with_model(&config.model.model);
    if let Some(base_url) = &config.model.base_url {
        client = client.with_base_url(base_url);
    }
    let client: Arc<dyn querypilot_llm::client::LlmClient> = Arc::new(client);

    let tools = Arc::new(ToolExecutor::new(database));
    let agent = SqlGenerationAgent::new(client, tools);

    println!("Running agent: {}", agent.objective());
    println!("Instruction: {}\n", instruction);

    match agent.execute(&instruction).await {
        Ok(result) => println!("{}", result),
        Err(e) => println!("Error: {:#}", e),
    }

    Ok(())
}
