//! Integration tests for the countdown lifecycle: expiry, cancellation
//! on win, and deferred removal. These use real time (seconds-scale
//! rounds), driving rooms through the shared registry exactly as the
//! gateway does.

use std::time::Duration;

use guessbound_protocol::{ConnectionId, Role, ServerEvent};
use guessbound_room::{
    Disposition, GameConfig, RoomCode, RoomRegistry, RoundTimer, SharedRegistry,
    schedule_removal,
};
use tokio::sync::mpsc;

fn ana() -> ConnectionId {
    ConnectionId::new(1)
}

fn bob() -> ConnectionId {
    ConnectionId::new(2)
}

fn drain(rx: &mut mpsc::UnboundedReceiver<ServerEvent>) -> Vec<ServerEvent> {
    let mut out = Vec::new();
    while let Ok(event) = rx.try_recv() {
        out.push(event);
    }
    out
}

/// Builds a registry with one room mid-round (word "cat", Ana explains,
/// Bob guesses) and arms the countdown. Returns Bob's receiving end.
async fn start_round(
    round_seconds: u64,
) -> (SharedRegistry, RoomCode, mpsc::UnboundedReceiver<ServerEvent>) {
    let config = GameConfig {
        round_seconds,
        ..GameConfig::default()
    };
    let registry = RoomRegistry::new(config).into_shared();

    let (code, rx_bob) = {
        let mut reg = registry.lock().await;
        let code = reg.create_room(Some("TIME")).unwrap();
        let (tx_ana, _rx_ana) = mpsc::unbounded_channel();
        let (tx_bob, rx_bob) = mpsc::unbounded_channel();
        reg.join(&code, ana(), "Ana", tx_ana).unwrap();
        reg.join(&code, bob(), "Bob", tx_bob).unwrap();

        let room = reg.room_mut(&code).unwrap();
        room.assign_role(ana(), "Ana", Role::Explainer).unwrap();
        room.start(ana());
        room.choose_custom_word(ana(), "cat").unwrap().unwrap();

        let timer = RoundTimer::spawn(registry.clone(), code.clone());
        reg.room_mut(&code).unwrap().set_timer(timer);
        (code, rx_bob)
    };

    (registry, code, rx_bob)
}

#[tokio::test]
async fn test_countdown_expires_reveals_word_and_removes_room() {
    let (registry, code, mut rx_bob) = start_round(2).await;

    tokio::time::sleep(Duration::from_millis(3200)).await;

    {
        let reg = registry.lock().await;
        assert!(reg.room(&code).is_none(), "room gone after timeout");
        assert_eq!(reg.room_count(), 0);
    }

    let events = drain(&mut rx_bob);
    assert!(events.iter().any(|e| matches!(
        e,
        ServerEvent::TimerUpdate { seconds: 1 }
    )));
    assert!(events.iter().any(|e| matches!(
        e,
        ServerEvent::TimerUpdate { seconds: 0 }
    )));
    assert!(events.iter().any(|e| matches!(
        e,
        ServerEvent::TimeUp { word, .. } if word == "cat"
    )));
}

#[tokio::test]
async fn test_win_stops_the_countdown() {
    let (registry, _code, mut rx_bob) = start_round(30).await;

    // Let at least one tick through, then win.
    tokio::time::sleep(Duration::from_millis(1300)).await;
    {
        let mut reg = registry.lock().await;
        let room = reg.room_of_mut(bob()).unwrap();
        let disposition = room.submit_chat(bob(), "cat").unwrap();
        assert_eq!(disposition, Disposition::RemoveAfterGrace);
    }

    // If the timer survived the win, more ticks would land here.
    tokio::time::sleep(Duration::from_millis(2300)).await;

    let events = drain(&mut rx_bob);
    let won_at = events
        .iter()
        .position(|e| matches!(e, ServerEvent::GameWon { .. }))
        .expect("win broadcast");
    assert!(
        !events[won_at..]
            .iter()
            .any(|e| matches!(e, ServerEvent::TimerUpdate { .. })),
        "no timer tick may follow the resolution"
    );
}

#[tokio::test]
async fn test_scheduled_removal_waits_for_the_grace_period() {
    let (registry, code, _rx_bob) = start_round(30).await;

    {
        let mut reg = registry.lock().await;
        let room = reg.room_of_mut(bob()).unwrap();
        room.submit_chat(bob(), "cat").unwrap();
    }
    schedule_removal(registry.clone(), code.clone(), Duration::from_millis(400));

    // Still there during the grace window…
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(registry.lock().await.room(&code).is_some());

    // …gone afterwards.
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(registry.lock().await.room(&code).is_none());
}

#[tokio::test]
async fn test_disconnect_mid_round_stops_the_countdown() {
    let (registry, code, mut rx_bob) = start_round(30).await;

    tokio::time::sleep(Duration::from_millis(1300)).await;
    {
        let mut reg = registry.lock().await;
        // Ana drops; the round loses a player and the room goes away.
        assert_eq!(reg.leave(ana()), Some(code.clone()));
        assert!(reg.room(&code).is_none());
    }

    tokio::time::sleep(Duration::from_millis(2300)).await;

    let events = drain(&mut rx_bob);
    let abort_at = events
        .iter()
        .position(|e| matches!(e, ServerEvent::GameAborted { .. }))
        .expect("abort broadcast");
    assert!(
        !events[abort_at..]
            .iter()
            .any(|e| matches!(e, ServerEvent::TimerUpdate { .. }))
    );
}
