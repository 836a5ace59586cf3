use std::ffi::{OsStr, OsString};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::PoisonError;

use clap::builder::{OsStringValueParser, PathBufValueParser};
use clap::{Arg, ArgAction, Command};
use logging::{
    CommandLineFlags, LoggingConfig, LoggingContext, LoggingError, Paths, SharedContext, SinkSet,
    log_info, log_warn,
};
use serde::Deserialize;
use thiserror::Error;

const PROGRAM_NAME: &str = "logp";

/// Exit status for configuration and resolution failures.
const EXIT_RESOLUTION: u8 = 1;
/// Exit status for command-line usage errors.
const EXIT_USAGE: u8 = 2;

#[derive(Debug, Error)]
enum FrontendError {
    #[error("failed to read config {path}: {source}", path = .path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {path}: {source}", path = .path.display())]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Logging(#[from] LoggingError),
    #[error("failed to write policy: {0}")]
    Output(#[from] io::Error),
}

/// Process configuration file. Only the `logging` section is read.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    logging: LoggingConfig,
}

struct ParsedArgs {
    flags: CommandLineFlags,
    name: String,
    config: Option<PathBuf>,
    home: Option<PathBuf>,
    logs: Option<PathBuf>,
    print_policy: bool,
    messages: Vec<String>,
}

fn clap_command() -> Command {
    Command::new(PROGRAM_NAME)
        .about("Resolve a logging policy from flags and a configuration file, then log messages through it.")
        .arg(
            Arg::new("stderr")
                .short('e')
                .long("stderr")
                .help("Log to stderr only; disables files and syslog.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .value_name("SELECTORS")
                .help("Enable debug output for comma-separated categories ('*' for all).")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("JSON configuration file with a 'logging' section.")
                .value_parser(PathBufValueParser::new()),
        )
        .arg(
            Arg::new("name")
                .long("name")
                .value_name("NAME")
                .help("Process name used for the syslog tag and default log file name."),
        )
        .arg(
            Arg::new("path.home")
                .long("path.home")
                .value_name("DIR")
                .help("Home directory; defaults to the executable's directory.")
                .value_parser(PathBufValueParser::new()),
        )
        .arg(
            Arg::new("path.logs")
                .long("path.logs")
                .value_name("DIR")
                .help("Log directory; defaults to <home>/logs.")
                .value_parser(PathBufValueParser::new()),
        )
        .arg(
            Arg::new("print-policy")
                .long("print-policy")
                .help("Print the effective policy as JSON to stdout.")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("messages")
                .value_name("MESSAGE")
                .help("Messages logged at info level in the 'main' category.")
                .action(ArgAction::Append)
                .num_args(0..)
                .value_parser(OsStringValueParser::new()),
        )
}

fn program_name_from(argv0: Option<&OsStr>) -> String {
    argv0
        .and_then(|arg| Path::new(arg).file_stem())
        .and_then(OsStr::to_str)
        .filter(|stem| !stem.is_empty())
        .unwrap_or(PROGRAM_NAME)
        .to_owned()
}

fn parse_args(args: Vec<OsString>) -> Result<ParsedArgs, clap::Error> {
    let default_name = program_name_from(args.first().map(OsString::as_os_str));
    let mut matches = clap_command().try_get_matches_from(args)?;

    let flags = CommandLineFlags::new(
        matches.get_flag("stderr"),
        matches.remove_one::<String>("debug").unwrap_or_default(),
    );
    let name = matches
        .remove_one::<String>("name")
        .unwrap_or(default_name);
    let messages = matches
        .remove_many::<OsString>("messages")
        .map(|values| {
            values
                .map(|value| value.to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();

    Ok(ParsedArgs {
        flags,
        name,
        config: matches.remove_one::<PathBuf>("config"),
        home: matches.remove_one::<PathBuf>("path.home"),
        logs: matches.remove_one::<PathBuf>("path.logs"),
        print_policy: matches.get_flag("print-policy"),
        messages,
    })
}

fn load_config(path: Option<&Path>) -> Result<LoggingConfig, FrontendError> {
    let Some(path) = path else {
        return Ok(LoggingConfig::default());
    };

    tracing::debug!(target: "logp::config", "loading configuration from {}", path.display());
    let text = fs::read_to_string(path).map_err(|source| FrontendError::ReadConfig {
        path: path.to_path_buf(),
        source,
    })?;
    let file: ConfigFile =
        serde_json::from_str(&text).map_err(|source| FrontendError::ParseConfig {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(file.logging)
}

fn run<Out>(parsed: ParsedArgs, stdout: &mut Out) -> Result<(), FrontendError>
where
    Out: Write,
{
    let mut paths = parsed.home.map_or_else(Paths::from_executable, Paths::new);
    if let Some(logs) = parsed.logs {
        paths = paths.with_logs(logs);
    }

    let selectors = parsed.flags.debug_selectors.clone();
    let mut context = LoggingContext::new(parsed.flags, paths, SinkSet::new());
    context.resolve_bootstrap(&parsed.name, &selectors)?;

    let shared: SharedContext = context.into_shared();
    if let Err(error) = logging::install(shared.clone()) {
        let context = shared.read().unwrap_or_else(PoisonError::into_inner);
        log_warn!(context, "log", "tracing bridge not installed: {error}");
    }

    let mut config = load_config(parsed.config.as_deref())?;
    shared
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .resolve_full(&parsed.name, &mut config)?;

    let context = shared.read().unwrap_or_else(PoisonError::into_inner);
    tracing::debug!(
        target: "logp::config",
        "effective level {}, files {}, syslog {}",
        context.policy().severity,
        context.policy().to_files,
        context.policy().to_syslog
    );
    for message in &parsed.messages {
        log_info!(context, "main", "{message}");
    }

    if parsed.print_policy {
        let json = serde_json::to_string_pretty(context.policy()).map_err(io::Error::other)?;
        writeln!(stdout, "{json}")?;
    }
    Ok(())
}

/// Parses `args`, resolves the logging policy and logs the positional
/// messages through it.
///
/// Help and version output go to `stdout`; diagnostics about the command line
/// or the configuration go to `stderr`.
#[must_use]
pub fn run_with<I, Out, Err>(args: I, stdout: &mut Out, stderr: &mut Err) -> ExitCode
where
    I: IntoIterator,
    I::Item: Into<OsString>,
    Out: Write,
    Err: Write,
{
    let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    if args.is_empty() {
        args.push(OsString::from(PROGRAM_NAME));
    }

    let parsed = match parse_args(args) {
        Ok(parsed) => parsed,
        Err(error) => {
            let rendered = error.render().to_string();
            if error.use_stderr() {
                let _ = write!(stderr, "{rendered}");
                return ExitCode::from(EXIT_USAGE);
            }
            let _ = write!(stdout, "{rendered}");
            return ExitCode::SUCCESS;
        }
    };

    match run(parsed, stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let _ = writeln!(stderr, "{PROGRAM_NAME}: {error}");
            ExitCode::from(EXIT_RESOLUTION)
        }
    }
}
