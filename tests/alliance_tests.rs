//! Alliance integration tests.
//!
//! Membership, invitations, treasury and the consistency between player
//! records and the alliance collection, driven through `GameService`.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};

use card_arena::cards::{CardCatalog, CardDefinition, CardId, Rarity};
use card_arena::core::{EngineConfig, ManualClock, Player, PlayerId};
use card_arena::error::{EntityKind, GameError, StoreError};
use card_arena::store::{MemoryRepository, Repository};
use card_arena::{Alliance, AllianceId, GameService, LeaveOutcome};

/// Player store whose writes can be switched to fail.
#[derive(Default)]
struct FlakyRepository {
    inner: MemoryRepository<Player>,
    failing: AtomicBool,
}

impl FlakyRepository {
    fn fail_writes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::Other, "disk full").into());
        }
        Ok(())
    }
}

impl Repository<Player> for FlakyRepository {
    fn get(&self, key: &PlayerId) -> Option<Player> {
        self.inner.get(key)
    }

    fn put(&self, value: Player) -> Result<(), StoreError> {
        self.check()?;
        self.inner.put(value)
    }

    fn put_all(&self, values: Vec<Player>) -> Result<(), StoreError> {
        self.check()?;
        self.inner.put_all(values)
    }

    fn remove(&self, key: &PlayerId) -> Result<Option<Player>, StoreError> {
        self.check()?;
        self.inner.remove(key)
    }

    fn list_all(&self) -> Vec<Player> {
        self.inner.list_all()
    }
}

struct Harness {
    service: GameService,
    players: Arc<FlakyRepository>,
    alliances: Arc<MemoryRepository<Alliance>>,
    clock: Arc<ManualClock>,
}

impl Harness {
    fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    fn with_config(config: EngineConfig) -> Self {
        let catalog = CardCatalog::new(vec![
            CardDefinition::new("geodude", "Geodude", 30, Rarity::Common, "rock", 50),
            CardDefinition::new("onix", "Onix", 90, Rarity::Rare, "rock", 300),
        ])
        .unwrap();
        let players = Arc::new(FlakyRepository::default());
        let alliances = Arc::new(MemoryRepository::new());
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 11, 5, 18, 30, 0).unwrap(),
        ));
        let service = GameService::builder()
            .with_config(config)
            .with_catalog(catalog)
            .with_players(players.clone())
            .with_alliances(alliances.clone())
            .with_clock(clock.clone())
            .with_seed(7)
            .build();
        Self {
            service,
            players,
            alliances,
            clock,
        }
    }

    fn player(&self, id: &str) -> PlayerId {
        let pid = PlayerId::new(id);
        self.service.register(&pid, id).unwrap();
        pid
    }

    fn stored(&self, id: &PlayerId) -> Player {
        self.players.get(id).unwrap()
    }

    /// Found an alliance led by `leader` and bring `members` in.
    fn alliance(&self, name: &str, leader: &PlayerId, members: &[&PlayerId]) -> AllianceId {
        let alliance = self.service.alliance_create(name, leader).unwrap();
        for member in members {
            self.service.alliance_invite(&alliance.id, member, leader).unwrap();
            self.service.alliance_accept_invite(member).unwrap();
        }
        alliance.id
    }
}

// =============================================================================
// Creation Tests
// =============================================================================

#[test]
fn test_create_alliance() {
    let h = Harness::new();
    let brock = h.player("brock");

    let alliance = h.service.alliance_create("  Pewter Gym  ", &brock).unwrap();

    assert_eq!(alliance.name, "Pewter Gym");
    assert!(alliance.is_leader(&brock));
    assert_eq!(alliance.treasury, 0);
    assert_eq!(h.stored(&brock).alliance, Some(alliance.id));

    let profile = h.service.show_profile(&brock).unwrap();
    let summary = profile.alliance.unwrap();
    assert_eq!(summary.member_count, 1);
    assert!(summary.is_leader);
}

#[test]
fn test_create_rejections() {
    let h = Harness::new();
    let brock = h.player("brock");
    let misty = h.player("misty");

    assert!(matches!(
        h.service.alliance_create("   ", &brock),
        Err(GameError::InvalidName)
    ));

    h.service.alliance_create("Pewter Gym", &brock).unwrap();
    assert!(matches!(
        h.service.alliance_create("Another", &brock),
        Err(GameError::AlreadyMember)
    ));
    assert!(matches!(
        h.service.alliance_create("PEWTER GYM", &misty),
        Err(GameError::NameTaken(_))
    ));
    assert_eq!(h.alliances.len(), 1);
}

// =============================================================================
// Invitation Tests
// =============================================================================

#[test]
fn test_invite_and_accept() {
    let h = Harness::new();
    let brock = h.player("brock");
    let misty = h.player("misty");
    let id = h.service.alliance_create("Pewter Gym", &brock).unwrap().id;

    let invite = h.service.alliance_invite(&id, &misty, &brock).unwrap();
    assert_eq!(invite.alliance_name, "Pewter Gym");
    assert_eq!(h.service.alliance_pending_invite(&misty), Some(invite));

    let joined = h.service.alliance_accept_invite(&misty).unwrap();
    assert!(joined.is_member(&misty));
    assert_eq!(h.stored(&misty).alliance, Some(id));
    assert!(h.service.alliance_pending_invite(&misty).is_none());
}

#[test]
fn test_invite_rejections() {
    let h = Harness::new();
    let brock = h.player("brock");
    let misty = h.player("misty");
    let ash = h.player("ash");
    let id = h.alliance("Pewter Gym", &brock, &[&misty]);

    assert!(matches!(
        h.service.alliance_invite(&id, &ash, &misty),
        Err(GameError::NotLeader)
    ));
    assert!(matches!(
        h.service.alliance_invite(&id, &PlayerId::new("nobody"), &brock),
        Err(GameError::NotFound { kind: EntityKind::Player, .. })
    ));
    assert!(matches!(
        h.service.alliance_invite(&id, &misty, &brock),
        Err(GameError::AlreadyMember)
    ));
    assert!(matches!(
        h.service.alliance_invite(&AllianceId::new(), &ash, &brock),
        Err(GameError::NotFound { kind: EntityKind::Alliance, .. })
    ));
}

/// An invite older than the TTL is refused and consumed.
#[test]
fn test_expired_invite() {
    let h = Harness::new();
    let brock = h.player("brock");
    let misty = h.player("misty");
    let id = h.service.alliance_create("Pewter Gym", &brock).unwrap().id;

    h.service.alliance_invite(&id, &misty, &brock).unwrap();
    h.clock.advance(Duration::hours(24) + Duration::seconds(1));

    assert!(matches!(
        h.service.alliance_accept_invite(&misty),
        Err(GameError::InviteExpired)
    ));
    assert!(matches!(
        h.service.alliance_accept_invite(&misty),
        Err(GameError::NoPendingInvite)
    ));
    assert_eq!(h.stored(&misty).alliance, None);
}

#[test]
fn test_decline_invite() {
    let h = Harness::new();
    let brock = h.player("brock");
    let misty = h.player("misty");
    let id = h.service.alliance_create("Pewter Gym", &brock).unwrap().id;

    h.service.alliance_invite(&id, &misty, &brock).unwrap();
    assert!(h.service.alliance_decline_invite(&misty));
    assert!(!h.service.alliance_decline_invite(&misty));
    assert!(matches!(
        h.service.alliance_accept_invite(&misty),
        Err(GameError::NoPendingInvite)
    ));
}

/// Capacity is checked at invite time and again at accept time.
#[test]
fn test_capacity() {
    let h = Harness::with_config(EngineConfig::default().with_max_members(2));
    let brock = h.player("brock");
    let misty = h.player("misty");
    let ash = h.player("ash");
    let id = h.service.alliance_create("Pewter Gym", &brock).unwrap().id;

    h.service.alliance_invite(&id, &misty, &brock).unwrap();
    h.service.alliance_invite(&id, &ash, &brock).unwrap();
    h.service.alliance_accept_invite(&misty).unwrap();

    assert!(matches!(
        h.service.alliance_accept_invite(&ash),
        Err(GameError::AllianceFull)
    ));
    assert!(matches!(
        h.service.alliance_invite(&id, &ash, &brock),
        Err(GameError::AllianceFull)
    ));
    assert_eq!(h.alliances.get(&id).unwrap().member_count(), 2);
}

/// With the default limit an alliance holds ten, leader included.
#[test]
fn test_default_capacity_is_ten() {
    let h = Harness::new();
    let leader = h.player("giovanni");
    let grunts: Vec<PlayerId> = (1..=8).map(|i| h.player(&format!("grunt{i}"))).collect();
    let refs: Vec<&PlayerId> = grunts.iter().collect();
    let id = h.alliance("Team Rocket", &leader, &refs);
    assert_eq!(h.alliances.get(&id).unwrap().member_count(), 9);

    let jessie = h.player("jessie");
    let james = h.player("james");
    h.service.alliance_invite(&id, &jessie, &leader).unwrap();
    h.service.alliance_invite(&id, &james, &leader).unwrap();
    h.service.alliance_accept_invite(&jessie).unwrap();
    assert_eq!(h.alliances.get(&id).unwrap().member_count(), 10);

    assert!(matches!(
        h.service.alliance_accept_invite(&james),
        Err(GameError::AllianceFull)
    ));
    let meowth = h.player("meowth");
    assert!(matches!(
        h.service.alliance_invite(&id, &meowth, &leader),
        Err(GameError::AllianceFull)
    ));
    assert_eq!(h.alliances.get(&id).unwrap().member_count(), 10);
    assert_eq!(h.stored(&james).alliance, None);
    assert_eq!(h.stored(&meowth).alliance, None);
}

// =============================================================================
// Leaving Tests
// =============================================================================

#[test]
fn test_member_leaves() {
    let h = Harness::new();
    let brock = h.player("brock");
    let misty = h.player("misty");
    let id = h.alliance("Pewter Gym", &brock, &[&misty]);

    let outcome = h.service.alliance_leave(&misty).unwrap();
    assert!(matches!(outcome, LeaveOutcome::Left { .. }));
    assert_eq!(h.stored(&misty).alliance, None);
    assert!(!h.alliances.get(&id).unwrap().is_member(&misty));

    assert!(matches!(
        h.service.alliance_leave(&misty),
        Err(GameError::NotMember)
    ));
}

/// The leader leaving dissolves the alliance and clears every member.
#[test]
fn test_leader_leave_disbands() {
    let h = Harness::new();
    let brock = h.player("brock");
    let misty = h.player("misty");
    let ash = h.player("ash");
    let id = h.alliance("Pewter Gym", &brock, &[&misty, &ash]);

    let outcome = h.service.alliance_leave(&brock).unwrap();
    match outcome {
        LeaveOutcome::Disbanded { former_members, .. } => {
            assert_eq!(former_members, vec![brock.clone(), misty.clone(), ash.clone()]);
        }
        other => panic!("expected disband, got {:?}", other),
    }

    assert!(h.alliances.get(&id).is_none());
    for pid in [&brock, &misty, &ash] {
        assert_eq!(h.stored(pid).alliance, None);
    }
    // The name is free again.
    assert!(h.service.alliance_create("Pewter Gym", &misty).is_ok());
}

/// A reference to a vanished alliance is cleared on the next view.
#[test]
fn test_stale_reference_is_cleared() {
    let h = Harness::new();
    let misty = h.player("misty");
    let mut record = h.stored(&misty);
    record.alliance = Some(AllianceId::new());
    h.players.put(record).unwrap();

    assert!(matches!(
        h.service.alliance_show(&misty),
        Err(GameError::NotMember)
    ));
    assert_eq!(h.stored(&misty).alliance, None);
}

// =============================================================================
// Treasury Tests
// =============================================================================

#[test]
fn test_donate_and_withdraw() {
    let h = Harness::new();
    let brock = h.player("brock");
    let misty = h.player("misty");
    let id = h.alliance("Pewter Gym", &brock, &[&misty]);

    assert!(matches!(
        h.service.alliance_donate(&misty, 5),
        Err(GameError::BelowMinimum { minimum: 10, amount: 5 })
    ));

    let outcome = h.service.alliance_donate(&misty, 60).unwrap();
    assert_eq!(outcome.gold_left, 40);
    assert_eq!(outcome.alliance.treasury, 60);
    assert_eq!(outcome.alliance.stats.total_donations, 60);

    assert!(matches!(
        h.service.alliance_withdraw(&misty, 10),
        Err(GameError::NotLeader)
    ));
    assert!(matches!(
        h.service.alliance_withdraw(&brock, 61),
        Err(GameError::InsufficientFunds { required: 61, available: 60 })
    ));
    assert!(matches!(
        h.service.alliance_withdraw(&brock, 0),
        Err(GameError::BelowMinimum { .. })
    ));

    let outcome = h.service.alliance_withdraw(&brock, 60).unwrap();
    assert_eq!(outcome.gold_left, 160);
    assert_eq!(h.alliances.get(&id).unwrap().treasury, 0);

    // Gold only moved between wallets and the treasury.
    assert_eq!(h.stored(&brock).gold + h.stored(&misty).gold, 200);
}

#[test]
fn test_donate_without_alliance() {
    let h = Harness::new();
    let ash = h.player("ash");

    assert!(matches!(
        h.service.alliance_donate(&ash, 50),
        Err(GameError::NotMember)
    ));
    assert_eq!(h.stored(&ash).gold, 100);
}

// =============================================================================
// Power, Battle and Leaderboard Tests
// =============================================================================

#[test]
fn test_show_refreshes_power() {
    let h = Harness::new();
    let brock = h.player("brock");
    let misty = h.player("misty");
    h.alliance("Pewter Gym", &brock, &[&misty]);

    h.service.purchase(&brock, &CardId::new("geodude")).unwrap();
    h.service.purchase(&misty, &CardId::new("geodude")).unwrap();

    let view = h.service.alliance_show(&misty).unwrap();
    assert_eq!(view.members.len(), 2);
    assert!(view.members[0].is_leader);
    assert_eq!(view.alliance.stats.total_power, 60);
}

#[test]
fn test_battle_counts_for_alliances() {
    let h = Harness::new();
    let brock = h.player("brock");
    let misty = h.player("misty");
    let gym = h.alliance("Pewter Gym", &brock, &[]);
    let league = h.alliance("Cerulean", &misty, &[]);

    let report = h.service.battle(&brock, &misty).unwrap();
    let (winner, loser) = if report.attacker_won() {
        (gym, league)
    } else {
        (league, gym)
    };

    let winner = h.alliances.get(&winner).unwrap();
    let loser = h.alliances.get(&loser).unwrap();
    assert_eq!((winner.stats.total_battles, winner.stats.battles_won), (1, 1));
    assert_eq!((loser.stats.total_battles, loser.stats.battles_won), (1, 0));
}

#[test]
fn test_alliance_leaderboard() {
    let h = Harness::new();
    let brock = h.player("brock");
    let misty = h.player("misty");
    let mut record = h.stored(&misty);
    record.gold = 1000;
    h.players.put(record).unwrap();

    h.alliance("Pewter Gym", &brock, &[]);
    h.alliance("Cerulean", &misty, &[]);
    h.service.purchase(&misty, &CardId::new("onix")).unwrap();

    let board = h.service.alliance_leaderboard(10).unwrap();
    assert_eq!(board.len(), 2);
    assert_eq!(board[0].name, "Cerulean");
    assert_eq!(board[0].total_power, 90);
    assert_eq!(board[1].rank, 2);
    assert_eq!(h.service.alliance_leaderboard(1).unwrap().len(), 1);
}

// =============================================================================
// Rollback Tests
// =============================================================================

/// A failed player write undoes the alliance it would have pointed at.
#[test]
fn test_create_rolls_back_on_player_write_failure() {
    let h = Harness::new();
    let brock = h.player("brock");

    h.players.fail_writes(true);
    assert!(matches!(
        h.service.alliance_create("Pewter Gym", &brock),
        Err(GameError::Storage(_))
    ));
    h.players.fail_writes(false);

    assert!(h.alliances.is_empty());
    assert_eq!(h.stored(&brock).alliance, None);
    assert!(h.service.alliance_create("Pewter Gym", &brock).is_ok());
}

#[test]
fn test_accept_rolls_back_on_player_write_failure() {
    let h = Harness::new();
    let brock = h.player("brock");
    let misty = h.player("misty");
    let id = h.service.alliance_create("Pewter Gym", &brock).unwrap().id;
    h.service.alliance_invite(&id, &misty, &brock).unwrap();

    h.players.fail_writes(true);
    assert!(h.service.alliance_accept_invite(&misty).is_err());
    h.players.fail_writes(false);

    let alliance = h.alliances.get(&id).unwrap();
    assert_eq!(alliance.member_count(), 1);
    assert!(!alliance.is_member(&misty));
    assert_eq!(h.stored(&misty).alliance, None);
}

#[test]
fn test_disband_rolls_back_on_player_write_failure() {
    let h = Harness::new();
    let brock = h.player("brock");
    let misty = h.player("misty");
    let id = h.alliance("Pewter Gym", &brock, &[&misty]);

    h.players.fail_writes(true);
    assert!(h.service.alliance_leave(&brock).is_err());
    h.players.fail_writes(false);

    let alliance = h.alliances.get(&id).unwrap();
    assert_eq!(alliance.member_count(), 2);
    assert_eq!(h.stored(&brock).alliance, Some(id));
    assert_eq!(h.stored(&misty).alliance, Some(id));
}
