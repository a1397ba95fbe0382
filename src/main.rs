use std::{fs, path::PathBuf, process::ExitCode};

use clap::{Parser, ValueEnum};
use inilex::{
    display_error,
    errors::errors::{Error, ErrorImpl},
    lexer::{
        lexer::{decode, Lexer, DEFAULT_CAPACITY},
        tokens::Token,
    },
    Position,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    /// Lex on a separate thread and drain the token stream
    Push,
    /// Step the lexer on demand from the main thread
    Pull,
}

#[derive(Parser)]
#[command(version, about = "Print the tokens of an INI file", long_about = None)]
struct Cli {
    /// Path to the file to lex
    #[arg(value_name = "FILE")]
    file: PathBuf,
    /// Capacity of the token buffer in push mode
    #[arg(short, long, default_value_t = DEFAULT_CAPACITY)]
    capacity: usize,
    /// How tokens are consumed
    #[arg(short, long, value_enum, default_value_t = Mode::Pull)]
    mode: Mode,
    /// Stop at the first lexical error
    #[arg(long, default_value_t = false)]
    strict: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let name = cli
        .file
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let bytes = match fs::read(&cli.file) {
        Ok(bytes) => bytes,
        Err(e) => {
            let error = Error::new(
                ErrorImpl::Io {
                    path: cli.file.display().to_string(),
                    message: e.to_string(),
                },
                Position::null(),
            );
            eprintln!("Error: {}", error.get_error());
            return ExitCode::FAILURE;
        }
    };
    let source = decode(&name, &bytes);

    let (lexer, stream) = Lexer::new(&name, &source, cli.capacity);
    let result = match cli.mode {
        Mode::Pull => print_tokens(lexer, cli.strict),
        Mode::Push => {
            let handle = lexer.spawn();
            let printed = print_tokens(stream.iter(), cli.strict);
            // hang up first so a producer blocked on a full buffer can stop
            drop(stream);

            match handle.join() {
                Ok(Ok(())) => printed,
                // expected when --strict stopped reading early
                Ok(Err(_)) if printed.is_err() => printed,
                Ok(Err(e)) => Err(e),
                Err(_) => Err(Error::new(ErrorImpl::LexerPanicked, Position::null())),
            }
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            display_error(&error, &source);
            ExitCode::FAILURE
        }
    }
}

fn print_tokens(tokens: impl IntoIterator<Item = Token>, strict: bool) -> Result<(), Error> {
    for token in tokens {
        println!("{}", token);

        if strict {
            if let Some(error) = Error::from_token(&token) {
                return Err(error);
            }
        }
    }

    Ok(())
}
