use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;

use privdns_toggle::config::{load_config, Config};
use privdns_toggle::dns::settings::{FileSettings, SystemDnsSettings};
use privdns_toggle::dns::DnsMode;
use privdns_toggle::tile::{TileHost, TileUpdate};

#[derive(Parser, Debug)]
#[command(
    name = "privdns-toggle",
    version,
    about = "Cycle the private DNS mode like a quick settings tile"
)]
struct Cli {
    #[arg(long, short, global = true, help = "YAML config file (defaults apply when omitted)")]
    config: Option<String>,
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tap the tile: apply the next mode
    Click,
    /// Tile became visible: show the current mode
    Refresh,
    /// Tile added to the panel
    Added,
    /// Print system settings and preferences (reads the simulated OS store, no permission gate)
    Status,
    Servers {
        #[command(subcommand)]
        command: ServerCommands,
    },
    /// Prefer automatic mode when leaving Off
    Auto {
        #[arg(value_enum)]
        state: Switch,
    },
    /// Overwrite the simulated system settings
    SetMode {
        #[arg(value_enum)]
        mode: ModeArg,
        specifier: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum ServerCommands {
    List,
    Add { hostname: String },
    Remove { position: usize },
    Move { from: usize, to: usize },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Switch {
    On,
    Off,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    Off,
    #[value(alias = "auto")]
    Opportunistic,
    #[value(alias = "private")]
    Hostname,
}

impl From<ModeArg> for DnsMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Off => DnsMode::Off,
            ModeArg::Opportunistic => DnsMode::Auto,
            ModeArg::Hostname => DnsMode::Private,
        }
    }
}

#[derive(Serialize)]
struct Status {
    mode: String,
    specifier: Option<String>,
    servers: Vec<String>,
    auto_mode: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let host = privdns_toggle::app::build_host(&config)?;
    run(&cli, &config, &host)
}

fn run(cli: &Cli, config: &Config, host: &TileHost) -> Result<()> {
    let prefs = host.engine().preferences();
    match &cli.command {
        Commands::Click => print_update(cli.json, &host.on_click()?),
        Commands::Refresh => print_update(cli.json, &host.on_start_listening()?),
        Commands::Added => print_update(cli.json, &host.on_tile_added()),
        Commands::Status => {
            let observed = FileSettings::new(config.settings_path.clone()).observe()?;
            let status = Status {
                mode: observed.mode.to_string(),
                specifier: observed.resolver,
                servers: prefs.resolver_list()?.entries().to_vec(),
                auto_mode: prefs.auto_mode()?,
            };
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!("mode:      {}", status.mode);
                println!("specifier: {}", status.specifier.as_deref().unwrap_or("-"));
                println!("auto mode: {}", if status.auto_mode { "on" } else { "off" });
                println!("servers:   {}", status.servers.join(", "));
            }
        }
        Commands::Servers { command } => {
            let list = match command {
                ServerCommands::List => prefs.resolver_list()?,
                ServerCommands::Add { hostname } => prefs.add_resolver(hostname)?,
                ServerCommands::Remove { position } => prefs.remove_resolver(*position)?,
                ServerCommands::Move { from, to } => prefs.move_resolver(*from, *to)?,
            };
            if cli.json {
                println!("{}", serde_json::to_string(list.entries())?);
            } else if list.is_unconfigured() && list.len() == 1 {
                println!(
                    "(no servers configured, {} is used)",
                    privdns_toggle::prefs::DEFAULT_RESOLVER
                );
            } else {
                for (i, server) in list.entries().iter().enumerate() {
                    println!("{i}: {server}");
                }
            }
        }
        Commands::Auto { state } => {
            prefs.set_auto_mode(matches!(state, Switch::On))?;
        }
        Commands::SetMode { mode, specifier } => {
            let mode = DnsMode::from(*mode);
            FileSettings::new(config.settings_path.clone()).apply(mode, specifier.as_deref())?;
            info!(mode = mode.as_str(), "system settings overwritten");
        }
    }
    Ok(())
}

fn print_update(json: bool, update: &TileUpdate) {
    if json {
        match serde_json::to_string(update) {
            Ok(s) => println!("{s}"),
            Err(e) => eprintln!("serialize failed: {e}"),
        }
        return;
    }
    if let Some(p) = &update.projection {
        let state = if p.active { "active" } else { "inactive" };
        println!("[{state}] {}", p.label);
    }
    if let Some(notice) = update.notice {
        eprintln!("notice: {}", notice.message());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_servers_add() {
        let cli =
            Cli::try_parse_from(["privdns-toggle", "servers", "add", "dns.quad9.net"]).unwrap();
        match cli.command {
            Commands::Servers {
                command: ServerCommands::Add { hostname },
            } => assert_eq!(hostname, "dns.quad9.net"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parse_set_mode_alias() {
        let cli =
            Cli::try_parse_from(["privdns-toggle", "set-mode", "private", "dns.google"]).unwrap();
        match cli.command {
            Commands::SetMode { mode, specifier } => {
                assert_eq!(DnsMode::from(mode), DnsMode::Private);
                assert_eq!(specifier.as_deref(), Some("dns.google"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["privdns-toggle", "click", "--json", "-c", "cfg.yaml"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.config.as_deref(), Some("cfg.yaml"));
    }

    #[test]
    fn auto_requires_state() {
        assert!(Cli::try_parse_from(["privdns-toggle", "auto"]).is_err());
        assert!(Cli::try_parse_from(["privdns-toggle", "auto", "on"]).is_ok());
    }
}
