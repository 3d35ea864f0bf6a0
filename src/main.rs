use clap::{Parser, ValueEnum};
use jstream::{EngineConfig, JsonStream, NonFiniteNumbers, StreamError};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(ValueEnum, Debug, Clone, Copy)]
enum NonFinite {
    /// Store `null` in place of NaN and infinities
    Null,
    /// Fail the operation
    Reject,
}

impl From<NonFinite> for NonFiniteNumbers {
    fn from(choice: NonFinite) -> Self {
        match choice {
            NonFinite::Null => NonFiniteNumbers::StoreNull,
            NonFinite::Reject => NonFiniteNumbers::Reject,
        }
    }
}

/// Filters and reshapes a JSON document, e.g.
/// `jstream -i people.json 'filter -> age > 30' 'map -> senior = true'`
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Input document (reads stdin when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Pretty-print the result
    #[arg(long, default_value_t = false)]
    pretty: bool,

    /// How to store numbers JSON cannot represent
    #[arg(long, value_enum, default_value_t = NonFinite::Null)]
    non_finite: NonFinite,

    /// Operations to apply in order, each starting with `filter ->`,
    /// `map ->`, `append ->` or `rename ->`
    #[arg(required = true)]
    operations: Vec<String>,
}

fn run(args: Args) -> Result<(), StreamError> {
    let stream = match &args.input {
        Some(path) => JsonStream::from_path(path)?,
        None => JsonStream::from_reader(io::stdin().lock())?,
    };
    let config = EngineConfig::new().with_non_finite(args.non_finite.into());

    log::info!("Applying {} operation(s)", args.operations.len());
    let stream = stream.with_config(config).apply_all(&args.operations)?;
    stream.write_to(io::stdout().lock(), args.pretty)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("jstream=warn"))
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
