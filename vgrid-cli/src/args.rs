//! Command-line arguments.

use std::path::PathBuf;

use simplelog::LevelFilter;
use vgrid_lib::sort::SortSpec;

use crate::error::CliError;

pub const USAGE: &str = "usage: vgrid-cli <records.json> [--sort KEY[:desc]] [--filter KEY=V1,V2]... \
[--search TERM] [--scroll PX] [--height PX] [--width COLS] [--export FILE] [--log-level LEVEL]";

/// A `--filter KEY=V1,V2` argument. Values are matched against the display
/// text of the column's distinct values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterArg {
    pub key: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub path: PathBuf,
    pub sort: Option<SortSpec>,
    pub filters: Vec<FilterArg>,
    pub search: Option<String>,
    pub scroll: u32,
    pub height: Option<u32>,
    pub width: usize,
    pub export: Option<PathBuf>,
    pub log_level: LevelFilter,
}

impl Args {
    pub fn parse<I>(args: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let mut path = None;
        let mut parsed = Args {
            path: PathBuf::new(),
            sort: None,
            filters: Vec::new(),
            search: None,
            scroll: 0,
            height: None,
            width: 120,
            export: None,
            log_level: LevelFilter::Info,
        };

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--sort" => parsed.sort = Some(parse_sort(&value(&mut args, &arg)?)?),
                "--filter" => parsed.filters.push(parse_filter(&value(&mut args, &arg)?)?),
                "--search" => parsed.search = Some(value(&mut args, &arg)?),
                "--scroll" => parsed.scroll = number(&value(&mut args, &arg)?, &arg)?,
                "--height" => parsed.height = Some(number(&value(&mut args, &arg)?, &arg)?),
                "--width" => parsed.width = number::<usize>(&value(&mut args, &arg)?, &arg)?,
                "--export" => parsed.export = Some(PathBuf::from(value(&mut args, &arg)?)),
                "--log-level" => {
                    let level = value(&mut args, &arg)?;
                    parsed.log_level = level
                        .parse()
                        .map_err(|_| CliError::usage(format!("unknown log level '{}'", level)))?;
                }
                "-h" | "--help" => return Err(CliError::usage(USAGE)),
                flag if flag.starts_with("--") => {
                    return Err(CliError::usage(format!("unknown option '{}'\n{}", flag, USAGE)));
                }
                _ if path.is_none() => path = Some(PathBuf::from(arg)),
                _ => return Err(CliError::usage(format!("unexpected argument '{}'\n{}", arg, USAGE))),
            }
        }

        parsed.path = path.ok_or_else(|| CliError::usage(USAGE))?;
        Ok(parsed)
    }
}

fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, CliError> {
    args.next()
        .ok_or_else(|| CliError::usage(format!("{} needs a value", flag)))
}

fn number<T: std::str::FromStr>(text: &str, flag: &str) -> Result<T, CliError> {
    text.parse()
        .map_err(|_| CliError::usage(format!("{} expects a number, got '{}'", flag, text)))
}

fn parse_sort(text: &str) -> Result<SortSpec, CliError> {
    match text.rsplit_once(':') {
        Some((key, "desc")) => Ok(SortSpec::descending(key)),
        Some((key, "asc")) => Ok(SortSpec::ascending(key)),
        Some((_, direction)) => Err(CliError::usage(format!("unknown sort direction '{}'", direction))),
        None => Ok(SortSpec::ascending(text)),
    }
}

fn parse_filter(text: &str) -> Result<FilterArg, CliError> {
    let Some((key, values)) = text.split_once('=') else {
        return Err(CliError::usage(format!("filter '{}' is not KEY=V1,V2", text)));
    };
    if key.is_empty() {
        return Err(CliError::usage(format!("filter '{}' has no column", text)));
    }
    Ok(FilterArg {
        key: key.to_string(),
        values: values.split(',').map(str::to_string).collect(),
    })
}
