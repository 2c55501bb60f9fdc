//! Command-line interface.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_blockchain_core::GameContract;
use game_core::{ActionRequest, ChainId, CharacterId, GameSnapshot, PowerId};
use ppp_client::{Client, SnapshotView};

#[derive(Debug, Parser)]
#[command(name = "puffpuff", version, about = "Puff Puff Pass game client")]
pub struct Cli {
    /// Also write logs to a file under PPP_LOG_DIR (default: platform cache dir)
    #[arg(long, global = true)]
    pub log_file: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the current game state
    State {
        /// Print the snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Poll and print the game state until interrupted
    Watch {
        /// Poll interval in milliseconds (default: GAME_POLL_INTERVAL_MS or 3000)
        #[arg(long)]
        interval_ms: Option<u64>,
    },

    /// Attack or heal with a character
    Play {
        /// Chain id to act on
        #[arg(long)]
        chain: ChainId,

        /// Character name or id (1-8)
        #[arg(long, value_parser = CharacterId::from_token)]
        character: CharacterId,

        /// Power name or id (1-2)
        #[arg(long, value_parser = PowerId::from_token)]
        power: Option<PowerId>,

        /// Heal instead of attacking
        #[arg(long)]
        heal: bool,
    },

    /// Restart the game by running the configured setup plan
    Setup,

    /// Refresh life (all configured chains unless --chain is given)
    RefreshLife {
        /// Chain id to refresh; repeatable
        #[arg(long = "chain")]
        chains: Vec<ChainId>,
    },
}

pub async fn run<C: GameContract + 'static>(command: Command, client: &Client<C>) -> Result<()> {
    match command {
        Command::State { json } => {
            let snapshot = client.snapshot().await.context("Failed to read game state")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                print_snapshot(client, &snapshot);
            }
        }
        Command::Watch { interval_ms } => watch(client, interval_ms).await?,
        Command::Play {
            chain,
            character,
            power,
            heal,
        } => {
            let request = action_request(chain, character, power, heal);
            let snapshot = client.play(&request).await.context("Play failed")?;
            print_snapshot(client, &snapshot);
        }
        Command::Setup => {
            let snapshot = client.restart().await.context("Setup failed")?;
            print_snapshot(client, &snapshot);
        }
        Command::RefreshLife { chains } => {
            let chains = (!chains.is_empty()).then_some(chains);
            let snapshot = client
                .refresh_life(chains.as_deref())
                .await
                .context("Life refresh failed")?;
            print_snapshot(client, &snapshot);
        }
    }

    Ok(())
}

fn action_request(
    chain: ChainId,
    character: CharacterId,
    power: Option<PowerId>,
    heal: bool,
) -> ActionRequest {
    let request = if heal {
        ActionRequest::heal(chain, character)
    } else {
        ActionRequest::attack(chain, character)
    };
    match power {
        Some(power) => request.with_power(power),
        None => request,
    }
}

async fn watch<C: GameContract + 'static>(client: &Client<C>, interval_ms: Option<u64>) -> Result<()> {
    let poller = match interval_ms {
        Some(0) => anyhow::bail!("--interval-ms must be greater than 0"),
        Some(ms) => client.poller_with_interval(Duration::from_millis(ms)),
        None => client.poller(),
    };
    let handle = poller.spawn();
    let mut updates = handle.subscribe();

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                match (&state.last_error, &state.latest) {
                    (Some(err), _) => eprintln!("poll #{} failed: {err}", state.polls),
                    (None, Some(snapshot)) => print_snapshot(client, snapshot),
                    (None, None) => {}
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, stopping poller");
                break;
            }
        }
    }

    handle.stop().await;
    Ok(())
}

fn print_snapshot<C: GameContract + 'static>(client: &Client<C>, snapshot: &GameSnapshot) {
    println!("{}", SnapshotView::new(snapshot, client.config()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_blockchain_core::FixtureContract;
    use game_core::GameConfig;

    fn play_request(command: Command) -> ActionRequest {
        match command {
            Command::Play {
                chain,
                character,
                power,
                heal,
            } => action_request(chain, character, power, heal),
            other => panic!("expected play, got {other:?}"),
        }
    }

    #[test]
    fn play_accepts_names_and_ids() {
        let cli = Cli::parse_from([
            "puffpuff",
            "play",
            "--chain",
            "11155420",
            "--character",
            "ALIENX",
            "--power",
            "1",
        ]);

        let request = play_request(cli.command);
        assert_eq!(request.chain, ChainId(11155420));
        assert_eq!(request.character, CharacterId::AlienX);
        assert_eq!(request.power, Some(PowerId::Buff));
        assert!(request.is_attack);
        assert!(!cli.log_file);
    }

    #[test]
    fn heal_without_power() {
        let cli = Cli::parse_from([
            "puffpuff", "play", "--chain", "421614", "--character", "2", "--heal",
        ]);
        let request = play_request(cli.command);
        assert!(!request.is_attack);
        assert_eq!(request.power_argument(), 0);
    }

    #[test]
    fn invalid_arguments_are_rejected() {
        assert!(Cli::try_parse_from(["puffpuff", "play", "--chain", "0", "--character", "1"]).is_err());
        assert!(Cli::try_parse_from(["puffpuff", "play", "--chain", "1", "--character", "9"]).is_err());
        assert!(
            Cli::try_parse_from([
                "puffpuff", "play", "--chain", "1", "--character", "1", "--power", "puff"
            ])
            .is_err()
        );
    }

    #[test]
    fn refresh_life_collects_repeated_chains() {
        let cli = Cli::parse_from([
            "puffpuff",
            "--log-file",
            "refresh-life",
            "--chain",
            "421614",
            "--chain",
            "11155420",
        ]);
        assert!(cli.log_file);
        match cli.command {
            Command::RefreshLife { chains } => {
                assert_eq!(chains, vec![ChainId(421614), ChainId(11155420)]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[tokio::test]
    async fn commands_run_against_the_fixture() {
        let config = GameConfig::default();
        let fixture = FixtureContract::in_progress(&config.chain_ids());
        let client = Client::builder()
            .contract(fixture.clone())
            .config(config)
            .build()
            .unwrap();

        run(Command::State { json: true }, &client).await.unwrap();
        run(Command::RefreshLife { chains: vec![] }, &client)
            .await
            .unwrap();
        run(
            Command::Play {
                chain: GameConfig::OPTIMISM_SEPOLIA,
                character: CharacterId::Sedusa,
                power: None,
                heal: true,
            },
            &client,
        )
        .await
        .unwrap();
        run(Command::Setup, &client).await.unwrap();

        // life refresh, play, then one setup per configured chain
        assert_eq!(fixture.sent_calls().len(), 4);
    }
}
