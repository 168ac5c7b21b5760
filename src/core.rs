use clap::Parser;
use tracing::instrument::WithSubscriber;
use tracing::{debug, info, Dispatch};

use crate::cli::{process_args, Args};
use crate::client::send_request;
use crate::config::Config;
use crate::context::Environment;
use crate::errors::BbgurlError;
use crate::logging::{build_dispatch, LogTarget};
use crate::output::DestinationConfig;
use crate::progress::ProgressConfig;
use crate::signals::{self, Interrupt};
use crate::status::ExitStatus;
use crate::transfer::{run_transfer, TransferSettings};

/// Main entry point for the CLI.
///
/// Handles configuration loading, argument parsing and log setup, then
/// runs the request on a single-threaded runtime.
pub fn run(args: Vec<String>, env: Environment) -> ExitStatus {
    let config = match Config::load(&env) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Failed to load config: {}", e);
            Config::default()
        }
    };

    let merged_args = merge_default_options(args, &config);
    let traceback = merged_args.iter().any(|a| a == "--traceback");

    let parsed = match Args::try_parse_from(&merged_args) {
        Ok(args) => args,
        Err(e) => {
            e.print().ok();
            return if e.kind() == clap::error::ErrorKind::DisplayHelp
                || e.kind() == clap::error::ErrorKind::DisplayVersion
            {
                ExitStatus::Success
            } else {
                ExitStatus::Error
            };
        }
    };

    let dispatch = match build_dispatch(
        &LogTarget::from_args(&parsed),
        parsed.verbose,
        parsed.log_format.unwrap_or_default(),
    ) {
        Ok(dispatch) => dispatch,
        Err(e) => return handle_error(e, traceback),
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => return handle_error(e.into(), traceback),
    };

    let interrupt = signals::global().clone();
    let program = program(parsed, config, env, interrupt, dispatch.clone());

    match runtime.block_on(program.with_subscriber(dispatch)) {
        Ok(status) => status,
        Err(e) => handle_error(e, traceback),
    }
}

/// Send the request and stream the response to its destination
pub async fn program(
    args: Args,
    config: Config,
    env: Environment,
    interrupt: Interrupt,
    logger: Dispatch,
) -> Result<ExitStatus, BbgurlError> {
    debug!(?args, config_dir = %config.config_dir.display(), "Starting");

    let processed = process_args(&args, &config)?;

    let response = tokio::select! {
        biased;
        _ = interrupt.raised() => {
            info!("Interrupted before the response arrived");
            return Ok(ExitStatus::Interrupted);
        }
        response = send_request(&args, &processed) => response?,
    };

    let to_stdout = processed.sink.destination == DestinationConfig::Stdout;
    let progress_enabled = processed.progress && env.progress_allowed(to_stdout);
    if processed.progress && !progress_enabled {
        debug!("Progress bar needs an interactive stderr and a body not going to the terminal");
    }

    let settings = TransferSettings {
        interrupt,
        logger: Some(logger),
        progress: ProgressConfig::default(),
        smoothing_window: config.smoothing_window(),
    };

    let outcome = run_transfer(response, &processed.sink, progress_enabled, &settings).await?;
    Ok(ExitStatus::from(outcome))
}

/// Prepend `[defaults] options` from the config file to the command line
///
/// Only flags are taken; bare words would be read as URL parts.
fn merge_default_options(args: Vec<String>, config: &Config) -> Vec<String> {
    if config.default_options.is_empty() {
        return args;
    }

    let (flags, positional): (Vec<_>, Vec<_>) = config
        .default_options
        .iter()
        .partition(|opt| opt.starts_with('-'));

    if !positional.is_empty() {
        eprintln!("Warning: Positional arguments in default options are ignored: {:?}", positional);
        eprintln!("Use the --flag=value form for options that take a value.");
    }

    if flags.is_empty() {
        return args;
    }

    let mut merged = Vec::with_capacity(args.len() + flags.len());

    if let Some(program) = args.first() {
        merged.push(program.clone());
    }

    merged.extend(flags.into_iter().cloned());
    merged.extend(args.into_iter().skip(1));

    merged
}

fn handle_error(error: BbgurlError, traceback: bool) -> ExitStatus {
    if traceback {
        eprintln!("Error: {:?}", error);
    } else {
        eprintln!("Error: {}", error);
    }

    // All errors return the same exit code (1) following Unix conventions
    ExitStatus::Error
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn config_with(options: &[&str]) -> Config {
        Config {
            default_options: strings(options),
            ..Config::default()
        }
    }

    #[test]
    fn test_merge_without_defaults() {
        let args = strings(&["bbgurl", "http://example.com"]);
        assert_eq!(merge_default_options(args.clone(), &Config::default()), args);
    }

    #[test]
    fn test_merge_prepends_flags() {
        let merged = merge_default_options(
            strings(&["bbgurl", "-o", "out.json", "http://example.com"]),
            &config_with(&["--pretty", "--timeout=5"]),
        );
        assert_eq!(
            merged,
            strings(&["bbgurl", "--pretty", "--timeout=5", "-o", "out.json", "http://example.com"])
        );
    }

    #[test]
    fn test_merge_drops_positional() {
        let merged = merge_default_options(
            strings(&["bbgurl", "http://example.com"]),
            &config_with(&["http://other.example", "--pretty"]),
        );
        assert_eq!(merged, strings(&["bbgurl", "--pretty", "http://example.com"]));
    }

    #[test]
    fn test_command_line_overrides_defaults() {
        let merged = merge_default_options(
            strings(&["bbgurl", "--follow-redirect", "http://example.com"]),
            &config_with(&["--no-follow-redirect"]),
        );
        let args = Args::parse_from(merged);
        assert!(args.follows_redirects());
    }

    #[test]
    fn test_handle_error_status() {
        let status = handle_error(BbgurlError::Argument("Must specify a uri.".into()), false);
        assert_eq!(status, ExitStatus::Error);
    }

    #[test]
    fn test_program_interrupted_before_response() {
        let interrupt = Interrupt::new();
        interrupt.raise();

        // Port 9 (discard) on loopback; the interrupt wins before any connect result matters.
        let args = Args::parse_from(["bbgurl", "http://127.0.0.1:9/"]);
        let env = Environment {
            stdout_isatty: false,
            stderr_isatty: false,
            config_dir: None,
        };
        let status = tokio_test::block_on(program(args, Config::default(), env, interrupt, Dispatch::none())).unwrap();
        assert_eq!(status, ExitStatus::Interrupted);
    }

    #[tokio::test]
    async fn test_interrupt_after_completion_keeps_success() {
        use wiremock::matchers::method;
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("done"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("body.txt");
        let args = Args::parse_from(["bbgurl", &server.uri(), "-o", out.to_str().unwrap()]);
        let env = Environment {
            stdout_isatty: false,
            stderr_isatty: false,
            config_dir: None,
        };

        let interrupt = Interrupt::new();
        let status = program(args, Config::default(), env, interrupt.clone(), Dispatch::none())
            .await
            .unwrap();
        interrupt.raise();

        assert_eq!(status, ExitStatus::Success);
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "done");
    }
}
