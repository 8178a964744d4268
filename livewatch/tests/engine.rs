//! End-to-end engine tests over an in-memory transport.
//!
//! These drive the real monitor loop (timer, poll worker, tracker,
//! broadcaster) against a scripted Helix backend. Tests run with the tokio
//! clock paused, so multi-cycle scenarios complete instantly.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use helix_client::{HelixClient, Transport};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use url::Url;

use livewatch::config::{Settings, TransportKind};
use livewatch::monitor::{LiveMonitor, MonitorEvent};

/// Serves Helix responses from a mutable live set.
struct ScriptedTransport {
    live: Arc<Mutex<Vec<String>>>,
}

impl ScriptedTransport {
    fn new(live: &[&str]) -> (Arc<Self>, Arc<Mutex<Vec<String>>>) {
        let live = Arc::new(Mutex::new(
            live.iter().map(|s| s.to_string()).collect::<Vec<_>>(),
        ));
        (Arc::new(Self { live: live.clone() }), live)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str) -> helix_client::Result<String> {
        let url = Url::parse(url).unwrap();

        if url.path().ends_with("/users") {
            let records: Vec<String> = url
                .query_pairs()
                .filter(|(k, _)| k == "login")
                .map(|(_, login)| format!(r#"{{"id":"id-{login}","login":"{login}"}}"#))
                .collect();
            Ok(format!(r#"{{"data":[{}]}}"#, records.join(",")))
        } else {
            let live = self.live.lock().unwrap();
            let records: Vec<String> = live
                .iter()
                .map(|login| {
                    format!(r#"{{"user_id":"id-{login}","user_login":"{login}","type":"live"}}"#)
                })
                .collect();
            Ok(format!(r#"{{"data":[{}]}}"#, records.join(",")))
        }
    }
}

fn settings(channels: &str, interval: Duration) -> Settings {
    Settings {
        channels: channels.to_string(),
        client_id: "client".to_string(),
        token: "token".to_string(),
        poll_interval: interval,
        transport: TransportKind::Http,
        webhook_url: None,
    }
}

async fn next_event(rx: &mut broadcast::Receiver<MonitorEvent>) -> MonitorEvent {
    tokio::time::timeout(Duration::from_secs(30), rx.recv())
        .await
        .expect("timed out waiting for a monitor event")
        .expect("broadcast channel closed")
}

/// Consume events until `cycles` cycle-completed markers have passed,
/// returning only the transition events seen on the way.
async fn transitions_over(
    rx: &mut broadcast::Receiver<MonitorEvent>,
    cycles: usize,
) -> Vec<MonitorEvent> {
    let mut transitions = Vec::new();
    let mut completed = 0;

    while completed < cycles {
        match next_event(rx).await {
            MonitorEvent::CycleCompleted { .. } => completed += 1,
            event => transitions.push(event),
        }
    }

    transitions
}

#[tokio::test(start_paused = true)]
async fn test_transitions_across_cycles() {
    let (transport, live) = ScriptedTransport::new(&["alpha", "beta"]);
    let monitor = LiveMonitor::with_client(
        settings("Alpha beta gamma", Duration::from_millis(200)),
        Arc::new(HelixClient::new(transport)),
    );
    let mut rx = monitor.subscribe();
    let cancel = CancellationToken::new();
    let engine = tokio::spawn(monitor.run(cancel.clone()));

    // Cycle 1: both configured channels come online, exactly once.
    let first = transitions_over(&mut rx, 1).await;
    assert_eq!(first.len(), 2);
    assert!(matches!(&first[0], MonitorEvent::ChannelOnline { login, .. } if login == "alpha"));
    assert!(matches!(&first[1], MonitorEvent::ChannelOnline { login, url, .. }
        if login == "beta" && url == "https://twitch.tv/beta"));

    // Cycles 2-4: steady state, no transitions at all.
    assert!(transitions_over(&mut rx, 3).await.is_empty());

    // beta drops out of the live set: exactly one offline event.
    live.lock().unwrap().retain(|l| l != "beta");
    let dropped = transitions_over(&mut rx, 1).await;
    assert_eq!(dropped.len(), 1);
    assert!(matches!(&dropped[0], MonitorEvent::ChannelOffline { login, .. } if login == "beta"));

    // And only once.
    assert!(transitions_over(&mut rx, 2).await.is_empty());

    // beta comes back: one online event again.
    live.lock().unwrap().push("beta".to_string());
    let returned = transitions_over(&mut rx, 1).await;
    assert_eq!(returned.len(), 1);
    assert!(matches!(&returned[0], MonitorEvent::ChannelOnline { login, .. } if login == "beta"));

    // gamma never appeared in any result and never produced an event.
    cancel.cancel();
    engine.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_empty_watchlist_cycles_are_quiet() {
    let (transport, _live) = ScriptedTransport::new(&[]);
    let monitor = LiveMonitor::with_client(
        settings("", Duration::from_millis(100)),
        Arc::new(HelixClient::new(transport)),
    );
    let mut rx = monitor.subscribe();
    let cancel = CancellationToken::new();
    let engine = tokio::spawn(monitor.run(cancel.clone()));

    for _ in 0..3 {
        match next_event(&mut rx).await {
            MonitorEvent::CycleCompleted { live_count } => assert_eq!(live_count, 0),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    cancel.cancel();
    engine.await.unwrap();
}

/// Transport that counts requests and blocks until released.
struct GatedTransport {
    gate: Arc<tokio::sync::Semaphore>,
    requests: Arc<Mutex<usize>>,
}

#[async_trait]
impl Transport for GatedTransport {
    async fn get(&self, _url: &str) -> helix_client::Result<String> {
        *self.requests.lock().unwrap() += 1;
        let _permit = self.gate.acquire().await.unwrap();
        Ok(r#"{"data":[]}"#.to_string())
    }
}

#[tokio::test(start_paused = true)]
async fn test_slow_cycle_skips_ticks_instead_of_overlapping() {
    let gate = Arc::new(tokio::sync::Semaphore::new(0));
    let requests = Arc::new(Mutex::new(0));
    let transport = Arc::new(GatedTransport {
        gate: gate.clone(),
        requests: requests.clone(),
    });

    let monitor = LiveMonitor::with_client(
        settings("alpha", Duration::from_millis(100)),
        Arc::new(HelixClient::new(transport)),
    );
    let mut rx = monitor.subscribe();
    let cancel = CancellationToken::new();
    let engine = tokio::spawn(monitor.run(cancel.clone()));

    // Several poll intervals pass while the first cycle is stuck in its
    // request; no second worker may start.
    tokio::time::sleep(Duration::from_millis(550)).await;
    assert_eq!(*requests.lock().unwrap(), 1);

    // Release the request; the cycle completes and polling resumes.
    gate.add_permits(64);
    loop {
        if let MonitorEvent::CycleCompleted { .. } = next_event(&mut rx).await {
            break;
        }
    }

    cancel.cancel();
    engine.await.unwrap();
}
