use std::sync::Arc;
use std::time::Duration;

use client_blockchain_core::{ContractCall, ErrorKind, FixtureContract};
use game_core::{ActionRequest, ChainId, CharacterId, GameConfig, PowerId};
use ppp_client::Client;

const ARB: ChainId = GameConfig::ARBITRUM_SEPOLIA;
const OP: ChainId = GameConfig::OPTIMISM_SEPOLIA;

fn client_for(fixture: &FixtureContract) -> Client<FixtureContract> {
    Client::builder()
        .contract(fixture.clone())
        .config(GameConfig::default())
        .build()
        .expect("default configuration is valid")
}

#[tokio::test]
async fn play_returns_the_state_after_the_action() {
    let fixture = FixtureContract::in_progress(&[ARB, OP]);
    let client = client_for(&fixture);

    let request = ActionRequest::attack(OP, CharacterId::AlienX).with_power(PowerId::Buff);
    let snapshot = client.play(&request).await.unwrap();

    assert_eq!(snapshot.characters[&OP][&CharacterId::AlienX].turns_left, 2);
    assert_eq!(snapshot.powers[&OP][&PowerId::Buff].power_left, 1);
    // other chain untouched
    assert_eq!(snapshot.characters[&ARB][&CharacterId::Bubbles].turns_left, 3);
    assert_eq!(fixture.sent_calls().len(), 1);
}

#[tokio::test]
async fn play_on_unconfigured_chain_sends_nothing() {
    let fixture = FixtureContract::in_progress(&[ARB, OP]);
    let client = client_for(&fixture);

    let err = client
        .play(&ActionRequest::attack(ChainId(84532), CharacterId::Bubbles))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert!(err.to_string().contains("84532"));
    assert!(fixture.sent_calls().is_empty());
}

#[tokio::test]
async fn read_only_client_rejects_mutations() {
    let fixture = FixtureContract::in_progress(&[ARB, OP]);
    let client = Client::builder()
        .contract(fixture.clone())
        .config(GameConfig::default())
        .read_only()
        .build()
        .unwrap();

    assert!(client.is_read_only());
    client.snapshot().await.expect("reads still work");

    let play = client
        .play(&ActionRequest::heal(ARB, CharacterId::Blossom))
        .await
        .unwrap_err();
    let restart = client.restart().await.unwrap_err();
    let refresh = client.refresh_life(None).await.unwrap_err();

    for err in [play, restart, refresh] {
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
    assert!(fixture.sent_calls().is_empty());
}

#[tokio::test]
async fn restart_runs_the_setup_plan_in_order() {
    let fixture = FixtureContract::new();
    let client = client_for(&fixture);

    let snapshot = client.restart().await.unwrap();

    assert!(snapshot.game_started);
    assert!(!snapshot.game_ended);
    assert_eq!(snapshot.current_turn, Some(ARB));

    let sent: Vec<_> = fixture
        .sent_calls()
        .into_iter()
        .map(|call| match call {
            ContractCall::Setup {
                chain, characters, ..
            } => (chain, characters),
            other => panic!("unexpected call: {other:?}"),
        })
        .collect();
    assert_eq!(
        sent,
        vec![
            (ARB, GameConfig::DEFAULT_ROSTERS[0]),
            (OP, GameConfig::DEFAULT_ROSTERS[1]),
        ]
    );
    assert_eq!(snapshot.available_characters(OP).count(), 4);
}

#[tokio::test]
async fn refresh_life_defaults_to_every_configured_chain() {
    let fixture = FixtureContract::in_progress(&[ARB, OP]);
    fixture.set_life(ARB, 10).set_life(OP, 20);
    let client = client_for(&fixture);

    let snapshot = client.refresh_life(None).await.unwrap();

    assert_eq!(
        fixture.sent_calls(),
        vec![ContractCall::RefreshLife {
            chains: vec![ARB, OP]
        }]
    );
    assert_eq!(snapshot.life_of(ARB), Some(100));
    assert_eq!(snapshot.life_of(OP), Some(100));
}

#[tokio::test]
async fn refresh_life_on_selected_chains() {
    let fixture = FixtureContract::in_progress(&[ARB, OP]);
    fixture.set_life(ARB, 10).set_life(OP, 20);
    let client = client_for(&fixture);

    let snapshot = client.refresh_life(Some(&[OP])).await.unwrap();

    assert_eq!(snapshot.life_of(ARB), Some(10));
    assert_eq!(snapshot.life_of(OP), Some(100));

    let err = client
        .refresh_life(Some(&[OP, ChainId(1)]))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(fixture.sent_calls().len(), 1);
}

#[tokio::test]
async fn failed_action_is_reported_without_a_follow_up_read() {
    let fixture = FixtureContract::in_progress(&[ARB, OP]);
    fixture.revert_action("playWithCharacter");
    let client = client_for(&fixture);
    let reads_before = fixture.read_count();

    let err = client
        .play(&ActionRequest::attack(ARB, CharacterId::Bubbles))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transaction);
    assert_eq!(fixture.read_count(), reads_before);
}

#[tokio::test(start_paused = true)]
async fn poller_follows_the_configured_chains() {
    let fixture = FixtureContract::in_progress(&[ARB, OP]);
    let client = client_for(&fixture);

    let handle = client.poller_with_interval(Duration::from_secs(1)).spawn();
    let mut updates = handle.subscribe();
    updates.changed().await.unwrap();

    let state = updates.borrow_and_update().clone();
    let snapshot = state.latest.expect("first poll publishes a snapshot");
    assert_eq!(snapshot.chains().collect::<Vec<_>>(), vec![ARB, OP]);
    assert!(state.last_error.is_none());

    let stopped = handle.stop().await;
    assert!(stopped.polls >= 1);
}

#[test]
fn builder_requires_contract_and_config() {
    let err = Client::<FixtureContract>::builder()
        .config(GameConfig::default())
        .build()
        .err()
        .unwrap();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    let err = Client::builder()
        .contract(FixtureContract::new())
        .build()
        .err()
        .unwrap();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn builder_rejects_invalid_configuration() {
    let mut config = GameConfig::default();
    config.chains.clear();

    let err = Client::builder()
        .contract(FixtureContract::new())
        .config(config)
        .build()
        .err()
        .unwrap();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn shared_contract_is_reused() {
    let fixture = Arc::new(FixtureContract::new());
    let client = Client::builder()
        .shared_contract(Arc::clone(&fixture))
        .config(GameConfig::default())
        .build()
        .unwrap();

    assert!(std::ptr::eq(client.contract(), fixture.as_ref()));
}
