//! Symbolize addresses from a crash dump.
//!
//! Opens a minidump, lists its modules, then symbolizes every address given
//! on the command line in both trace styles. Arguments that are not hex
//! addresses are treated as symbol names and resolved instead.
//!
//! ## Usage:
//!
//! ```bash
//! cargo run --example symbolize_dump -- crash.dmp [--symbols DIR] [ADDRESS|SYMBOL]...
//!
//! # e.g.
//! cargo run --example symbolize_dump -- crash.dmp --symbols ./symbols 0x7ffc12345678 ntdll!RtlUserThreadStart
//! ```
//!
//! Logging follows `RUST_LOG` and `SYMBOLIZER_LOG_FORMAT`.

use std::path::PathBuf;
use std::process;

use symbolizer_core::{Address, Session, SymbolizerResult, TraceStyle};

fn parse_address(arg: &str) -> Option<Address>
{
    let digits = arg.strip_prefix("0x").or_else(|| arg.strip_prefix("0X"))?;
    u64::from_str_radix(&digits.replace('`', ""), 16).ok().map(Address::new)
}

fn run(dump: PathBuf, symbols: Option<PathBuf>, queries: &[String]) -> SymbolizerResult<()>
{
    let session = match symbols {
        Some(symbols) => Session::open_with_symbols(dump, symbols)?,
        None => Session::open(dump)?,
    };

    println!("Dump: {}", session.dump_path().display());
    if let Some(symbols) = session.symbol_path() {
        println!("Symbols: {}", symbols.display());
    }
    println!("\nModules:");
    for module in session.modules() {
        println!("  {module}");
    }

    println!();
    for query in queries {
        if let Some(address) = parse_address(query) {
            for style in TraceStyle::ALL {
                match session.symbolize_with(address, style) {
                    Ok(text) => println!("{address} [{style}] {text}"),
                    Err(e) => println!("{address} [{style}] <{e}>"),
                }
            }
            if let Ok(location) = session.source_location(address) {
                println!("{address} [source] {location}");
            }
        } else {
            match session.resolve(query) {
                Ok(address) => println!("{query} = {address}"),
                Err(e) => println!("{query} = <{e}>"),
            }
        }
    }

    Ok(())
}

fn main()
{
    let _guard = match symbolizer_utils::init_logging() {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {e}");
            None
        }
    };

    let mut args = std::env::args().skip(1);
    let Some(dump) = args.next() else {
        eprintln!("Usage: symbolize_dump <DUMP> [--symbols DIR] [ADDRESS|SYMBOL]...");
        process::exit(1);
    };

    let mut symbols = None;
    let mut queries = Vec::new();
    while let Some(arg) = args.next() {
        if arg == "--symbols" {
            let Some(dir) = args.next() else {
                eprintln!("Error: --symbols needs a path");
                process::exit(1);
            };
            symbols = Some(PathBuf::from(dir));
        } else {
            queries.push(arg);
        }
    }

    if let Err(e) = run(PathBuf::from(dump), symbols, &queries) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
