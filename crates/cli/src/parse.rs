//! ArgMatches → CliAction conversion.
//!
//! Also parses the operation specs accepted by `txn`:
//! - `KEY` plain read
//! - `KEY=VALUE` read expecting VALUE
//! - `KEY@VERSION` read expecting VERSION
//! - `KEY=VALUE@VERSION` read expecting both

use std::path::PathBuf;

use clap::ArgMatches;
use gotthard_core::{Key, Operation, ReadOp, Value, Version};

/// The result of parsing the command line.
#[derive(Debug, PartialEq, Eq)]
pub enum CliAction {
    /// Run the server.
    Serve {
        listen: Option<String>,
        config: Option<PathBuf>,
    },
    /// Run the increment stress clients.
    Inc {
        addr: String,
        clients: usize,
        count: u64,
        key: Key,
    },
    /// Submit one transaction.
    Txn {
        addr: String,
        operations: Vec<Operation>,
        reset: bool,
    },
}

/// Convert top-level matches into an action.
pub fn matches_to_action(matches: &ArgMatches) -> Result<CliAction, String> {
    match matches.subcommand() {
        Some(("serve", sub)) => Ok(CliAction::Serve {
            listen: sub
                .get_one::<String>("listen")
                .map(|s| parse_listen(s))
                .transpose()?,
            config: sub.get_one::<String>("config").map(PathBuf::from),
        }),
        Some(("inc", sub)) => Ok(CliAction::Inc {
            addr: server_addr(sub)?,
            clients: sub.get_one::<usize>("num-clients").copied().unwrap_or(2),
            count: sub.get_one::<u64>("count").copied().unwrap_or(1000),
            key: Key::new(sub.get_one::<u32>("key").copied().unwrap_or(1)),
        }),
        Some(("txn", sub)) => parse_txn(sub),
        Some((other, _)) => Err(format!("unknown command '{}'", other)),
        None => Err("no command given".to_string()),
    }
}

fn server_addr(sub: &ArgMatches) -> Result<String, String> {
    let host = sub
        .get_one::<String>("host")
        .ok_or_else(|| "missing HOST".to_string())?;
    let port = sub
        .get_one::<u16>("port")
        .ok_or_else(|| "missing PORT".to_string())?;
    Ok(format!("{}:{}", host, port))
}

fn parse_txn(sub: &ArgMatches) -> Result<CliAction, String> {
    let mut indexed = Vec::new();
    collect_specs(sub, "read", parse_read_spec, &mut indexed)?;
    collect_specs(sub, "write", parse_write_spec, &mut indexed)?;
    if indexed.is_empty() {
        return Err("txn needs at least one --read or --write".to_string());
    }
    // Operations go out in the order they were given
    indexed.sort_by_key(|(index, _)| *index);

    Ok(CliAction::Txn {
        addr: server_addr(sub)?,
        operations: indexed.into_iter().map(|(_, op)| op).collect(),
        reset: sub.get_flag("reset"),
    })
}

fn collect_specs(
    sub: &ArgMatches,
    id: &str,
    parse: fn(&str) -> Result<Operation, String>,
    out: &mut Vec<(usize, Operation)>,
) -> Result<(), String> {
    let (Some(specs), Some(indices)) = (sub.get_many::<String>(id), sub.indices_of(id)) else {
        return Ok(());
    };
    for (index, spec) in indices.zip(specs) {
        out.push((index, parse(spec)?));
    }
    Ok(())
}

/// `PORT` or `HOST:PORT`; a bare port listens on 127.0.0.1.
pub fn parse_listen(s: &str) -> Result<String, String> {
    if let Ok(port) = s.parse::<u16>() {
        return Ok(format!("127.0.0.1:{}", port));
    }
    match s.rsplit_once(':') {
        Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok() => Ok(s.to_string()),
        _ => Err(format!("invalid listen address '{}', expected [HOST:]PORT", s)),
    }
}

fn parse_key(s: &str) -> Result<Key, String> {
    s.trim()
        .parse::<u32>()
        .map(Key::new)
        .map_err(|_| format!("invalid key '{}'", s))
}

/// Parse `KEY[=VALUE][@VERSION]` into a read.
///
/// A trailing `@` followed only by digits is a version; any other `@` is
/// part of the value.
pub fn parse_read_spec(spec: &str) -> Result<Operation, String> {
    let (body, version) = match spec.rsplit_once('@') {
        Some((body, digits)) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
            let version = digits
                .parse::<u64>()
                .map_err(|_| format!("invalid version in '{}'", spec))?;
            (body, Some(Version::new(version)))
        }
        _ => (spec, None),
    };
    let (key, value) = match body.split_once('=') {
        Some((key, value)) => (key, Some(Value::from(value))),
        None => (body, None),
    };

    Ok(Operation::Read(ReadOp {
        key: parse_key(key)?,
        expected_value: value,
        expected_version: version,
    }))
}

/// Parse `KEY=VALUE` into a write.
pub fn parse_write_spec(spec: &str) -> Result<Operation, String> {
    let (key, value) = spec
        .split_once('=')
        .ok_or_else(|| format!("invalid write '{}', expected KEY=VALUE", spec))?;
    Ok(Operation::write(parse_key(key)?, value))
}
