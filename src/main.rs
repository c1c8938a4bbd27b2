use std::process::ExitCode;

use clap::Parser;
use log::debug;

mod cli;
use crate::cli::Cli;
use crate::cli::Commands;
use crate::cli::Config;

mod error;
use crate::error::CliError;

mod key;
use crate::key::MemKey;

mod ops;

fn run(cli: Cli) -> Result<(), CliError> {
    let config = Config::load(cli.config.as_deref())?;
    debug!("CONFIG: {:?}", config);

    let chunks = config.chunk_config();

    match cli.command {
        Commands::Encrypt { key, input, output } => {
            let key = MemKey::from_args(&key, config.cipher)?;
            ops::encrypt_file(&key, chunks, &input, &output)?;
        }
        Commands::Decrypt { key, input, output } => {
            let key = MemKey::from_args(&key, config.cipher)?;
            ops::decrypt_file(&key, chunks, &input, &output)?;
        }
        Commands::Pack { tag_length, key, output, entries } => {
            let key = MemKey::from_opt_args(key, config.cipher)?;
            let tag_length = tag_length.unwrap_or(config.tag_length);
            ops::pack(&entries, tag_length, key.as_ref(), chunks, &output)?;
        }
        Commands::Unpack { key, input, dir } => {
            let key = MemKey::from_opt_args(key, config.cipher)?;
            for tag in ops::unpack(&input, &dir, key.as_ref(), chunks)? {
                println!("{}", tag);
            }
        }
        Commands::List { key, input } => {
            let key = MemKey::from_opt_args(key, config.cipher)?;
            for (tag, len) in ops::list(&input, key.as_ref(), chunks)? {
                println!("{:<20} {}", tag, len);
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    // Parse the cli
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("padtlv: {}", e);
            ExitCode::FAILURE
        }
    }
}
