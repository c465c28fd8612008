//! Notification stream dispatch.

mod common;

use autofit::clients::notifications::PlayerEvent;
use autofit::config::{AutofitConfig, FallbackPolicy, StartEvent};
use autofit::services::{Adjuster, Listener, SettingsSource};
use common::{FakeHost, FakeLookup};
use std::ops::ControlFlow;

const ON_PLAY: &str = r#"{"jsonrpc":"2.0","method":"Player.OnPlay","params":{"data":{"item":{"id":7,"type":"movie"},"player":{"playerid":1,"speed":1}},"sender":"xbmc"}}"#;
const ON_AV_START: &str = r#"{"jsonrpc":"2.0","method":"Player.OnAVStart","params":{"data":{"item":{"id":7,"type":"movie"},"player":{"playerid":1,"speed":1}},"sender":"xbmc"}}"#;
const ON_STOP: &str = r#"{"jsonrpc":"2.0","method":"Player.OnStop","params":{"data":{"end":true,"item":{"id":7,"type":"movie"}},"sender":"xbmc"}}"#;
const ON_QUIT: &str = r#"{"jsonrpc":"2.0","method":"System.OnQuit","params":{"data":{"exitcode":0},"sender":"xbmc"}}"#;

fn listener(start_event: StartEvent) -> Listener<FakeHost, FakeLookup> {
    let settings = AutofitConfig {
        start_event,
        fallback: FallbackPolicy::None,
        ..AutofitConfig::default()
    };
    Listener::new(
        Adjuster::new(FakeHost::playing_movie(), FakeLookup::ratio(2.39)),
        SettingsSource::Fixed(settings),
    )
}

#[tokio::test]
async fn test_first_frame_event_triggers_one_adjustment() {
    let mut listener = listener(StartEvent::AvStart);
    let stream = format!("{ON_PLAY}{ON_AV_START}{ON_STOP}{ON_QUIT}");

    let flow = listener.process(stream.as_bytes()).await;

    assert_eq!(flow, ControlFlow::Break(()));
    let host = listener.adjuster().host();
    assert_eq!(host.calls_to("Player.SetViewMode").len(), 1);
}

#[tokio::test]
async fn test_nominal_start_trigger_ignores_first_frame_event() {
    let mut listener = listener(StartEvent::Play);

    let flow = listener.process(ON_AV_START.as_bytes()).await;

    assert_eq!(flow, ControlFlow::Continue(()));
    assert_eq!(listener.adjuster().host().call_count(), 0);

    let flow = listener.handle(PlayerEvent::Started).await;
    assert_eq!(flow, ControlFlow::Continue(()));
    assert_eq!(
        listener
            .adjuster()
            .host()
            .calls_to("Player.SetViewMode")
            .len(),
        1
    );
}

#[tokio::test]
async fn test_stop_events_never_touch_the_host() {
    let mut listener = listener(StartEvent::AvStart);

    assert_eq!(
        listener.handle(PlayerEvent::Stopped).await,
        ControlFlow::Continue(())
    );
    assert_eq!(
        listener.handle(PlayerEvent::Ended).await,
        ControlFlow::Continue(())
    );
    assert_eq!(listener.adjuster().host().call_count(), 0);
}

#[tokio::test]
async fn test_closed_stream_without_quit_asks_for_reconnect() {
    let mut listener = listener(StartEvent::AvStart);

    let flow = listener.process(&b""[..]).await;

    assert_eq!(flow, ControlFlow::Continue(()));
}

#[test]
fn test_file_settings_keep_last_good_copy_when_file_is_missing() {
    let path = std::env::temp_dir().join("autofit-missing-config-does-not-exist.toml");
    let initial = AutofitConfig {
        target_ar: "2.35".to_string(),
        ..AutofitConfig::default()
    };
    let mut source = SettingsSource::file(Some(path), initial);

    assert_eq!(source.current().target_ar, "2.35");
}

#[test]
fn test_file_settings_are_reread_on_every_event() {
    let path = std::env::temp_dir().join(format!("autofit-settings-{}.toml", std::process::id()));
    std::fs::write(&path, "[autofit]\ntarget_ar = \"2.20\"\n").unwrap();
    let mut source = SettingsSource::file(Some(path.clone()), AutofitConfig::default());

    assert_eq!(source.current().target_ar, "2.20");

    std::fs::write(&path, "[autofit]\nenable_autofit = false\n").unwrap();
    let settings = source.current();
    assert!(!settings.enable_autofit);
    assert_eq!(settings.target_ar, "2.40");

    std::fs::remove_file(&path).unwrap();
}
