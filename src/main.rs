use aisql::ai_sql::{
    AiError, InteractiveMode, LoopExit, OpenAiCompletionClient, SchemaExtractor,
};
use aisql::cli::Args;
use aisql::config::Config;
use aisql::database::PostgreSQLClient;
use aisql::logging;
use clap::Parser;
use std::error::Error as StdError;
use std::process::ExitCode;
use tokio::io::BufReader;
use tracing::{debug, error, info};

/// Exit status for a session ended by Ctrl-C
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

async fn run(args: Args, config: Config) -> Result<LoopExit, Box<dyn StdError>> {
    let database = PostgreSQLClient::connect(&args.connection)
        .await
        .map_err(AiError::SchemaLoad)?;
    let schema = SchemaExtractor::extract(&database).await?;
    info!("Loaded schema snapshot with {} tables", schema.len());

    let client = OpenAiCompletionClient::new(args.api_key, config.completion)
        .map_err(|e| AiError::StartupConfig(e.to_string()))?;

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = std::io::stdout();
    let exit = InteractiveMode::new(stdin, stdout.lock(), &schema, &client, &database)
        .run(shutdown_signal())
        .await?;

    database.close().await;
    Ok(exit)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            return ExitCode::FAILURE;
        }
    };

    let log_guard = logging::init(&config.logging);
    debug!("Starting with {:?}", args);

    let result = run(args, config).await;

    let code = match result {
        Ok(LoopExit::EndOfInput) => ExitCode::SUCCESS,
        Ok(LoopExit::Interrupted) => {
            drop(log_guard);
            // The stdin reader may still be blocked; exit without waiting on it.
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
        Err(e) => {
            error!("{}", e);
            match e.downcast_ref::<AiError>() {
                Some(ai_error) => eprintln!("Error: {}", ai_error.user_message()),
                None => eprintln!("Error: {}", e),
            }
            ExitCode::FAILURE
        }
    };

    drop(log_guard);
    code
}
