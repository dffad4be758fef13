//! Clap command tree definition.

use clap::{Arg, ArgAction, Command};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("gotthard")
        .about("Optimistic transactional key-value store")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("log")
                .long("log")
                .short('l')
                .value_name("FILE")
                .help("Write logs to FILE instead of stderr")
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::Count)
                .help("Increase log verbosity (-v debug, -vv trace)")
                .global(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("JSON output mode")
                .global(true),
        )
        .subcommand(build_serve())
        .subcommand(build_inc())
        .subcommand(build_txn())
}

// =========================================================================
// Server
// =========================================================================

fn build_serve() -> Command {
    Command::new("serve")
        .about("Run the store server")
        .arg(
            Arg::new("listen")
                .value_name("[HOST:]PORT")
                .help("Address to listen on (default: 127.0.0.1:1234)"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("FILE")
                .help("TOML configuration file"),
        )
}

// =========================================================================
// Clients
// =========================================================================

fn server_args(cmd: Command) -> Command {
    cmd.arg(Arg::new("host").required(true).help("Server hostname"))
        .arg(
            Arg::new("port")
                .required(true)
                .value_parser(clap::value_parser!(u16))
                .help("Server port"),
        )
}

fn build_inc() -> Command {
    server_args(Command::new("inc"))
        .about("Increment a shared counter from parallel clients")
        .arg(
            Arg::new("num-clients")
                .long("num-clients")
                .short('n')
                .value_parser(clap::value_parser!(usize))
                .default_value("2")
                .help("Number of parallel clients"),
        )
        .arg(
            Arg::new("count")
                .long("count")
                .short('c')
                .value_parser(clap::value_parser!(u64))
                .default_value("1000")
                .help("Number of +1 increments each client performs"),
        )
        .arg(
            Arg::new("key")
                .long("key")
                .short('k')
                .value_parser(clap::value_parser!(u32))
                .default_value("1")
                .help("Key holding the counter"),
        )
}

fn build_txn() -> Command {
    server_args(Command::new("txn"))
        .about("Submit one transaction and print the result")
        .after_help("Reads and writes are sent in the order they appear on the command line.")
        .arg(
            Arg::new("read")
                .long("read")
                .short('r')
                .action(ArgAction::Append)
                .value_name("KEY[=VALUE][@VERSION]")
                .help("Read KEY, optionally expecting VALUE and/or VERSION"),
        )
        .arg(
            Arg::new("write")
                .long("write")
                .short('w')
                .action(ArgAction::Append)
                .value_name("KEY=VALUE")
                .help("Write VALUE to KEY"),
        )
        .arg(
            Arg::new("reset")
                .long("reset")
                .action(ArgAction::SetTrue)
                .help("Clear the store before executing"),
        )
}
