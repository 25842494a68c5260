use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{StoreArgs, call, schema, serve, tools};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "ariadne", version, about = "Read-only MCP servers for OVSDB databases")]
struct Cli {
    /// Log at debug level regardless of RUST_LOG and the config file.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the MCP server for one database until SIGINT or SIGTERM.
    Serve {
        #[command(flatten)]
        store: StoreArgs,

        /// Transport: "http" or "stdio".
        #[arg(long, env = "ARIADNE_TRANSPORT")]
        transport: Option<ariadne_core::Transport>,

        /// HTTP listen host.
        #[arg(long, env = "ARIADNE_HOST")]
        host: Option<String>,

        /// HTTP listen port. Defaults to the database's port.
        #[arg(long, env = "ARIADNE_PORT")]
        port: Option<u16>,
    },

    /// Print the list tools a database exposes.
    Tools {
        /// Database: vswitch, ovn-nb, ovn-sb, ovn-ic-nb or ovn-ic-sb.
        #[arg(long, env = "ARIADNE_DATABASE", default_value = "vswitch")]
        database: ariadne_core::Database,

        /// Also print each tool's input schema.
        #[arg(long, default_value_t = false)]
        schemas: bool,
    },

    /// Run one tool against the store and print its result.
    Call {
        #[command(flatten)]
        store: StoreArgs,

        /// Tool name, e.g. list_bridges.
        tool: String,

        /// Tool arguments as a JSON object.
        #[arg(long, default_value = "{}")]
        args: String,
    },

    /// Print the table descriptors the server would use.
    Schema {
        #[command(flatten)]
        store: StoreArgs,

        /// Only this table.
        #[arg(long)]
        table: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Command::Serve {
            store,
            transport,
            host,
            port,
        } => {
            let mut config = store.load()?;
            init_tracing(&config.log.level, cli.verbose);
            serve::apply_listener_overrides(&mut config, transport, host, port);
            serve::run(config).await
        }
        Command::Tools { database, schemas } => {
            init_tracing("info", cli.verbose);
            tools::list(database, schemas)
        }
        Command::Call { store, tool, args } => {
            let config = store.load()?;
            init_tracing(&config.log.level, cli.verbose);
            call::run(config, &tool, &args).await
        }
        Command::Schema { store, table } => {
            let config = store.load()?;
            init_tracing(&config.log.level, cli.verbose);
            schema::print(config, table.as_deref()).await
        }
    }
}

/// Diagnostics go to stderr so the stdio transport owns stdout.
fn init_tracing(level: &str, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
