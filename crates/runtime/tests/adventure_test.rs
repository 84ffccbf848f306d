use std::sync::Arc;

use game_core::{ActorId, InputEvent, PartyMember, ReactionIcon, RoomLocation};
use runtime::{BufferMessenger, Session, SessionHandle};

const ALDRIC: u64 = 7;

fn toggle(actor: u64, icon: ReactionIcon) -> InputEvent {
    InputEvent {
        actor: ActorId(actor),
        toggled: icon,
        selected: vec![icon],
        message_ref: 0,
    }
}

fn confirm(actor: u64, numbers: &[u8]) -> InputEvent {
    let mut selected: Vec<ReactionIcon> =
        numbers.iter().map(|&n| ReactionIcon::Number(n)).collect();
    selected.push(ReactionIcon::Confirm);
    InputEvent {
        actor: ActorId(actor),
        toggled: ReactionIcon::Confirm,
        selected,
        message_ref: 0,
    }
}

fn cancel(actor: u64) -> InputEvent {
    InputEvent {
        actor: ActorId(actor),
        toggled: ReactionIcon::Cancel,
        selected: vec![ReactionIcon::Cancel],
        message_ref: 0,
    }
}

async fn start_session() -> (SessionHandle, Arc<BufferMessenger>, Session) {
    let messenger = Arc::new(BufferMessenger::new());
    let session = Session::builder()
        .messenger(messenger.clone())
        .floor("sunken vault")
        .party_member(PartyMember {
            actor: ActorId(ALDRIC),
            class: "warrior".into(),
            name: "Aldric".into(),
        })
        .build()
        .expect("session should build from the shipped catalog");
    (session.handle(), messenger, session)
}

/// End-to-end gameplay scenario:
/// 1. The warrior takes the torch from the antechamber floor
/// 2. Descends into the crypt (trap damage) and escapes a rat pack battle
/// 3. Talks the warden elder into the guardian duel and wins it
/// 4. Resumes the dialogue, receives the vault sigil
/// 5. Heals at the moss shrine
#[tokio::test]
async fn complete_adventure_scenario() {
    let (handle, messenger, session) = start_session().await;

    // ================================================================
    // PHASE 1: opening menu
    // ================================================================
    let opening = handle.snapshot().await.unwrap();
    assert!(opening.focus.is_some());
    assert!(!opening.battle_active);
    assert_eq!(opening.location, RoomLocation::new(0, 0));
    assert_eq!(opening.party[0].current_hp, 20);
    assert!(messenger.text().contains("What will Aldric do?"));

    // ================================================================
    // PHASE 2: pick up the torch
    // ================================================================
    handle.input(toggle(ALDRIC, ReactionIcon::Ground)).await.unwrap();
    assert!(messenger.text().contains("take torch"));
    handle.input(confirm(ALDRIC, &[1])).await.unwrap();
    assert!(messenger.text().contains("Aldric picks up the torch."));
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.party[0].items, vec!["torch".to_string()]);

    // ================================================================
    // PHASE 3: cancel is mutation-free
    // ================================================================
    let before = handle.snapshot().await.unwrap();
    handle.input(toggle(ALDRIC, ReactionIcon::Ground)).await.unwrap();
    handle.input(cancel(ALDRIC)).await.unwrap();
    let after = handle.snapshot().await.unwrap();
    assert_eq!(before, after);

    // ================================================================
    // PHASE 4: descend into the crypt, springing the trap
    // ================================================================
    handle.input(toggle(ALDRIC, ReactionIcon::Move)).await.unwrap();
    // Antechamber exits list: down, right.
    handle.input(confirm(ALDRIC, &[1])).await.unwrap();
    assert!(messenger.text().contains("Aldric heads down."));
    assert!(messenger.text().contains("Rusted spikes"));
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.location, RoomLocation::new(1, 0));
    assert_eq!(snapshot.party[0].current_hp, 19);

    // ================================================================
    // PHASE 5: the rat pack, escaped with a smoke bomb
    // ================================================================
    handle.input(toggle(ALDRIC, ReactionIcon::Battle)).await.unwrap();
    assert!(messenger.text().contains("Steel is drawn: rat-pack!"));
    let snapshot = handle.snapshot().await.unwrap();
    assert!(snapshot.battle_active);
    // Two rats share the warrior's slot and bite before he acts; the third
    // is out of range and hesitates.
    assert_eq!(snapshot.party[0].current_hp, 15);
    assert!(messenger.text().contains("hesitates"));
    // Narration arrives in generation order: the battle opener precedes the
    // rat turns, which precede the warrior's prompt.
    let text = messenger.text();
    let opener = text.find("Steel is drawn: rat-pack!").unwrap();
    let first_bite = text.find("Aldric takes 2 damage.").unwrap();
    let prompt = text.find("Aldric, choose an ability:").unwrap();
    assert!(opener < first_bite && first_bite < prompt);

    // An empty confirm on the ability menu re-prompts without mutating.
    handle.input(confirm(ALDRIC, &[])).await.unwrap();
    assert!(messenger.text().contains("pick exactly one option"));
    let still = handle.snapshot().await.unwrap();
    assert!(still.battle_active);
    assert_eq!(still.party[0].current_hp, 15);

    // Abilities listed: sword swing, shield up, smoke bomb, sidestep,
    // brand [torch]. The smoke bomb is a battlefield-scope retreat.
    handle.input(confirm(ALDRIC, &[3])).await.unwrap();
    assert!(messenger.text().contains("The battle breaks off."));
    let snapshot = handle.snapshot().await.unwrap();
    assert!(!snapshot.battle_active);
    assert_eq!(snapshot.party[0].current_hp, 15);

    // ================================================================
    // PHASE 6: east to the vault door
    // ================================================================
    handle.input(toggle(ALDRIC, ReactionIcon::Move)).await.unwrap();
    // Crypt exits list: up, right.
    handle.input(confirm(ALDRIC, &[2])).await.unwrap();
    assert!(messenger.text().contains("The vault door looms"));
    assert_eq!(
        handle.snapshot().await.unwrap().location,
        RoomLocation::new(1, 1)
    );

    // ================================================================
    // PHASE 7: the elder's challenge and the guardian duel
    // ================================================================
    handle.input(toggle(ALDRIC, ReactionIcon::Talk)).await.unwrap();
    handle.input(confirm(ALDRIC, &[1])).await.unwrap();
    assert!(messenger.text().contains("Beyond me sleeps the vault"));
    // Replies listed: the challenge, and asking who the elder is; the
    // sigil-bearer option is gated on an item the warrior lacks.
    assert!(messenger.text().contains("I am ready to face the guardian."));
    assert!(!messenger.text().contains("I carry the sigil."));

    handle.input(confirm(ALDRIC, &[1])).await.unwrap();
    assert!(messenger.text().contains("Steel is drawn: guardian-duel!"));
    assert!(handle.snapshot().await.unwrap().battle_active);

    // The warrior is NORMAL, the guardian SLOW: four sword swings (3 each)
    // fell the 12 hp guardian, eating three 4 hp crushes in between.
    for _ in 0..4 {
        handle.input(confirm(ALDRIC, &[1])).await.unwrap();
        handle.input(confirm(ALDRIC, &[1])).await.unwrap();
    }
    assert!(messenger.text().contains("tomb guardian falls!"));
    assert!(messenger.text().contains("the battle is won"));

    // Victory resumes the dialogue: the elder hands over the sigil.
    assert!(messenger.text().contains("The guardian rests at last"));
    assert!(messenger
        .text()
        .contains("warden elder hands Aldric the vault sigil."));
    let snapshot = handle.snapshot().await.unwrap();
    assert!(!snapshot.battle_active);
    assert_eq!(snapshot.party[0].current_hp, 3);
    assert_eq!(
        snapshot.party[0].items,
        vec!["torch".to_string(), "vault sigil".to_string()]
    );
    // The sigil's standing ward rides along as a passive effect.
    assert_eq!(snapshot.party[0].effects, vec!["ward-light".to_string()]);

    // ================================================================
    // PHASE 8: mending at the moss shrine
    // ================================================================
    handle.input(toggle(ALDRIC, ReactionIcon::Move)).await.unwrap();
    // Vault door exits list: up, left.
    handle.input(confirm(ALDRIC, &[1])).await.unwrap();
    assert_eq!(
        handle.snapshot().await.unwrap().location,
        RoomLocation::new(0, 1)
    );
    handle.input(toggle(ALDRIC, ReactionIcon::Interact)).await.unwrap();
    handle.input(confirm(ALDRIC, &[1])).await.unwrap();
    assert!(messenger.text().contains("Aldric recovers 3 hp"));
    assert_eq!(handle.snapshot().await.unwrap().party[0].current_hp, 6);

    // ================================================================
    // PHASE 9: a stranger's reactions are rejected
    // ================================================================
    let focus_before = handle.snapshot().await.unwrap().focus;
    handle.input(toggle(99, ReactionIcon::Pass)).await.unwrap();
    assert!(messenger.text().contains("it is not your turn"));
    assert_eq!(handle.snapshot().await.unwrap().focus, focus_before);

    session.shutdown().await.unwrap();
}

/// The crypt chest: key on the floor, offered to the lock, reward taken,
/// then a drop/pick-up round trip of the reward.
#[tokio::test]
async fn chest_and_ground_round_trip() {
    let (handle, messenger, session) = start_session().await;

    // Down into the crypt.
    handle.input(toggle(ALDRIC, ReactionIcon::Move)).await.unwrap();
    handle.input(confirm(ALDRIC, &[1])).await.unwrap();

    // The rusted key lies on the crypt floor.
    handle.input(toggle(ALDRIC, ReactionIcon::Ground)).await.unwrap();
    assert!(messenger.text().contains("take rusted key"));
    handle.input(confirm(ALDRIC, &[1])).await.unwrap();

    // Offer it to the sealed chest.
    handle.input(toggle(ALDRIC, ReactionIcon::Interact)).await.unwrap();
    assert!(messenger.text().contains("sealed chest"));
    handle.input(confirm(ALDRIC, &[1])).await.unwrap();
    assert!(messenger.text().contains("Offer which item?"));
    handle.input(confirm(ALDRIC, &[1])).await.unwrap();
    assert!(messenger.text().contains("the lid yields"));

    // The key is spent; the draught is held.
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.party[0].items, vec!["healing draught".to_string()]);

    // Drop the draught onto the crypt floor.
    handle.input(toggle(ALDRIC, ReactionIcon::Ground)).await.unwrap();
    assert!(messenger.text().contains("drop healing draught"));
    handle.input(confirm(ALDRIC, &[1])).await.unwrap();
    let dropped = handle.snapshot().await.unwrap();
    assert!(dropped.party[0].items.is_empty());

    // Straight back up: the round trip restores ownership exactly.
    handle.input(toggle(ALDRIC, ReactionIcon::Ground)).await.unwrap();
    assert!(messenger.text().contains("take healing draught"));
    handle.input(confirm(ALDRIC, &[1])).await.unwrap();
    let recovered = handle.snapshot().await.unwrap();
    assert_eq!(
        recovered.party[0].items,
        vec!["healing draught".to_string()]
    );

    session.shutdown().await.unwrap();
}
