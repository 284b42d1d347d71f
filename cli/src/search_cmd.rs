use std::io::Read;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use dashboard_search_state::CodecConfig;
use dashboard_search_state::DEFAULT_SEPARATOR;
use dashboard_search_state::SearchCodec;
use dashboard_search_state::SearchState;
use tracing::debug;

/// Encode and decode the dashboard's URL search state.
///
/// Subcommands:
/// - `stringify`: JSON state to `?key=value&...`
/// - `parse`: search string (current or legacy format) to JSON
/// - `detect`: report which format a search string uses
/// - `check`: validate the substitution tables and type table
#[derive(Debug, Parser)]
#[command(name = "dashboard-search", version)]
pub struct SearchCli {
    #[clap(flatten)]
    pub codec: CodecArgs,

    /// Tracing filter for stderr output (overrides RUST_LOG), e.g. `debug`.
    #[arg(long, global = true, value_name = "FILTER")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub subcommand: SearchSubcommand,
}

#[derive(Debug, clap::Args)]
pub struct CodecArgs {
    /// Character joining nested key paths.
    #[arg(long, global = true, default_value_t = DEFAULT_SEPARATOR)]
    pub separator: char,

    /// Keep long key and value names instead of short codes.
    #[arg(long, global = true)]
    pub verbatim: bool,
}

#[derive(Debug, clap::Subcommand)]
pub enum SearchSubcommand {
    /// Serialize a JSON search state into a URL search string.
    Stringify(StringifyArgs),

    /// Decode a URL search string into JSON.
    Parse(ParseArgs),

    /// Print `legacy-json` or `current` for a search string.
    Detect(DetectArgs),

    /// Validate the codec tables and print a summary.
    Check,
}

#[derive(Debug, clap::Parser)]
pub struct StringifyArgs {
    /// JSON object to encode. Reads stdin when omitted or `-`.
    pub json: Option<String>,
}

#[derive(Debug, clap::Parser)]
pub struct ParseArgs {
    /// Search string to decode. Reads stdin when omitted or `-`.
    pub search: Option<String>,

    /// Print JSON on a single line.
    #[arg(long)]
    pub compact: bool,
}

#[derive(Debug, clap::Parser)]
pub struct DetectArgs {
    /// Search string to inspect. Reads stdin when omitted or `-`.
    pub search: Option<String>,
}

impl CodecArgs {
    pub fn config(&self) -> CodecConfig {
        let config = if self.verbatim {
            CodecConfig::verbatim()
        } else {
            CodecConfig::default()
        };
        config.with_separator(self.separator)
    }

    pub fn build(&self) -> Result<SearchCodec> {
        SearchCodec::new(self.config()).context("invalid codec configuration")
    }
}

impl SearchCli {
    pub fn run(self) -> Result<()> {
        let codec = self.codec.build()?;
        debug!(
            separator = %codec.separator(),
            minify = codec.config().minify,
            "codec ready"
        );

        match self.subcommand {
            SearchSubcommand::Stringify(args) => run_stringify(&codec, args),
            SearchSubcommand::Parse(args) => run_parse(&codec, args),
            SearchSubcommand::Detect(args) => run_detect(&codec, args),
            SearchSubcommand::Check => run_check(&codec),
        }
    }
}

fn read_input(arg: Option<String>) -> Result<String> {
    match arg {
        Some(value) if value != "-" => Ok(value),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf.trim_end_matches(['\n', '\r']).to_string())
        }
    }
}

fn run_stringify(codec: &SearchCodec, args: StringifyArgs) -> Result<()> {
    let input = read_input(args.json)?;
    let state: SearchState =
        serde_json::from_str(&input).context("input is not a valid search state object")?;
    println!("{}", codec.stringify(&state));
    Ok(())
}

fn run_parse(codec: &SearchCodec, args: ParseArgs) -> Result<()> {
    let input = read_input(args.search)?;
    let state = codec.parse(input.trim());
    let rendered = if args.compact {
        serde_json::to_string(&state)?
    } else {
        serde_json::to_string_pretty(&state)?
    };
    println!("{rendered}");
    Ok(())
}

fn run_detect(codec: &SearchCodec, args: DetectArgs) -> Result<()> {
    let input = read_input(args.search)?;
    println!("{}", codec.detect(input.trim()));
    Ok(())
}

fn run_check(codec: &SearchCodec) -> Result<()> {
    let config = codec.config();
    println!("separator: {}", config.separator);
    println!("minify: {}", config.minify);
    for (group, table) in config.effective_dictionaries().groups() {
        println!(
            "{:<13} {} keys, {} values, {} nested groups",
            format!("{}:", group.name()),
            table.keys.len(),
            table.values.len(),
            table.children.len()
        );
    }
    println!("type table: {} patterns", config.type_table.entries().len());
    println!("ok");
    Ok(())
}
