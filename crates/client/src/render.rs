//! Plain-text rendering of a game snapshot.

use std::fmt;

use game_core::{ChainId, GameConfig, GameSnapshot};

/// Snapshot paired with the configuration that names its chains.
///
/// Mirrors the game board: status line, then per chain its resources and the
/// characters and powers that can still be used.
pub struct SnapshotView<'a> {
    snapshot: &'a GameSnapshot,
    config: &'a GameConfig,
}

impl<'a> SnapshotView<'a> {
    pub fn new(snapshot: &'a GameSnapshot, config: &'a GameConfig) -> Self {
        Self { snapshot, config }
    }

    fn label(&self, chain: ChainId) -> String {
        let name = self.config.chain_name(chain);
        if name == chain.to_string() {
            name
        } else {
            format!("{name} ({chain})")
        }
    }

    fn fmt_status(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot;
        if snapshot.game_ended {
            match snapshot.winner {
                Some(winner) => writeln!(f, "Game over. Winner: {}", self.label(winner))?,
                None => writeln!(f, "Game over. No winner recorded")?,
            }
        } else if snapshot.game_started {
            match snapshot.current_turn {
                Some(chain) => writeln!(f, "Game in progress. Turn: {}", self.label(chain))?,
                None => writeln!(f, "Game in progress. No turn assigned yet")?,
            }
        } else {
            writeln!(f, "Game not started")?;
        }
        Ok(())
    }

    fn fmt_chain(&self, f: &mut fmt::Formatter<'_>, chain: ChainId) -> fmt::Result {
        let snapshot = self.snapshot;
        let marker = if snapshot.is_turn_of(chain) { "  <- turn" } else { "" };

        writeln!(f)?;
        writeln!(f, "== {} =={marker}", self.label(chain))?;
        writeln!(
            f,
            "Life: {}  Chemical X: {}",
            snapshot.life_of(chain).unwrap_or_default(),
            snapshot.chemical_x_of(chain).unwrap_or_default()
        )?;

        writeln!(f, "Characters:")?;
        let mut any = false;
        for (id, state) in snapshot.available_characters(chain) {
            let stats = id.stats();
            writeln!(
                f,
                "  {:>1} {:<11} atk {:>2}  heal {:>2}  cost {}  turns left {}",
                id.id(),
                state.name,
                stats.attack,
                stats.heal,
                stats.cost,
                state.turns_left
            )?;
            any = true;
        }
        if !any {
            writeln!(f, "  (none)")?;
        }

        writeln!(f, "Powers:")?;
        let mut any = false;
        for (id, state) in snapshot.available_powers(chain) {
            let stats = id.stats();
            writeln!(
                f,
                "  {:>1} {:<11} atk x{}  heal x{}  cost {}  uses left {}",
                id.id(),
                state.name,
                stats.attack_multiplier,
                stats.heal_multiplier,
                stats.cost,
                state.power_left
            )?;
            any = true;
        }
        if !any {
            writeln!(f, "  (none)")?;
        }

        Ok(())
    }
}

impl fmt::Display for SnapshotView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_status(f)?;
        for chain in self.snapshot.chains() {
            self.fmt_chain(f, chain)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{CharacterId, CharacterState, PowerId, PowerState};
    use std::collections::BTreeMap;

    const ARB: ChainId = GameConfig::ARBITRUM_SEPOLIA;
    const OP: ChainId = GameConfig::OPTIMISM_SEPOLIA;

    fn snapshot() -> GameSnapshot {
        let mut snapshot = GameSnapshot {
            game_started: true,
            game_ended: false,
            winner: None,
            current_turn: Some(OP),
            chemical_x: BTreeMap::from([(ARB, 100), (OP, 90)]),
            life: BTreeMap::from([(ARB, 80), (OP, 100)]),
            characters: BTreeMap::new(),
            powers: BTreeMap::new(),
        };
        for chain in [ARB, OP] {
            snapshot.characters.insert(
                chain,
                CharacterId::all()
                    .map(|id| {
                        let turns = u64::from(id == CharacterId::AlienX && chain == OP) * 3;
                        (id, CharacterState::new(id, turns))
                    })
                    .collect(),
            );
            snapshot.powers.insert(
                chain,
                PowerId::all()
                    .map(|id| (id, PowerState::new(id, u64::from(id == PowerId::Buff))))
                    .collect(),
            );
        }
        snapshot
    }

    #[test]
    fn renders_turn_and_available_roster() {
        let config = GameConfig::default();
        let snapshot = snapshot();
        let text = SnapshotView::new(&snapshot, &config).to_string();

        assert!(text.starts_with("Game in progress. Turn: optimism-sepolia (11155420)"));
        assert!(text.contains("== optimism-sepolia (11155420) ==  <- turn"));
        assert!(text.contains("Life: 80  Chemical X: 100"));
        assert!(text.contains("AlienX"));
        assert!(text.contains("atk 25  heal 35  cost 6  turns left 3"));
        assert!(!text.contains("Bubbles"));
        assert!(text.contains("Buff"));
        assert!(!text.contains("Huff"));
        // Arbitrum has no characters left
        assert!(text.contains("(none)"));
    }

    #[test]
    fn renders_winner_once_ended() {
        let config = GameConfig::default();
        let mut snapshot = snapshot();
        snapshot.game_ended = true;
        snapshot.winner = Some(ARB);

        let text = SnapshotView::new(&snapshot, &config).to_string();
        assert!(text.starts_with("Game over. Winner: arbitrum-sepolia (421614)"));
    }
}
