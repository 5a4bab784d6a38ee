use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "sorng-rds", version, about = "Run Amazon RDS commands")]
pub(crate) struct Args {
    /// Command to run, e.g. `DescribeDBClusters` or `describe-db-clusters`.
    pub command: Option<String>,

    /// Parameter as NAME=VALUE. VALUE is read as JSON when it parses,
    /// otherwise as text. Repeatable.
    #[arg(long = "param", short = 'p', value_name = "NAME=VALUE")]
    pub params: Vec<String>,

    /// `*` for whole responses, a response field, or `^Parameter`.
    #[arg(long, short = 's')]
    pub select: Option<String>,

    /// Echo the command's pass-thru parameter instead of the response.
    #[arg(long, action)]
    pub pass_thru: bool,

    /// Run mutating commands without asking.
    #[arg(long, short = 'f', action)]
    pub force: bool,

    /// Ask before every mutating command, whatever the config says.
    #[arg(long, action)]
    pub confirm: bool,

    /// Fetch a single page of a list command.
    #[arg(long, action)]
    pub no_auto_iteration: bool,

    /// Stop after this many output values.
    #[arg(long)]
    pub max_items: Option<usize>,

    /// Path to a YAML config file.
    #[arg(long, short = 'c')]
    pub config: Option<String>,

    #[arg(long, short = 'r')]
    pub region: Option<String>,

    /// Endpoint override, e.g. a local emulator or signing proxy.
    #[arg(long)]
    pub endpoint_url: Option<String>,

    /// List the available commands and exit.
    #[arg(long, short = 'l', action)]
    pub list: bool,
}
