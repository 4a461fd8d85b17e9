use crate::e2e::helpers;

use axum::http::StatusCode;
use helpers::TestContext;
use pretty_assertions::assert_eq;
use test_context::test_context;
use tts_console::domain::speech::{SpeechServiceApi, VoiceList};

fn option_pairs(ctx: &TestContext) -> Vec<(String, String)> {
    ctx.service
        .snapshot()
        .voice_options
        .into_iter()
        .map(|option| (option.value, option.label))
        .collect()
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_list_one_option_per_voice_in_order(ctx: &mut TestContext) {
    ctx.stub.set_speakers(
        StatusCode::OK,
        r#"{"success":true,"speakers":[
            {"id":"v1","name":"Alice","language":["en"]},
            {"id":"v2","name":"Bob","language":["en"]}
        ]}"#,
    );

    let list = ctx.service.load_voices().await;

    assert!(matches!(list, VoiceList::Available(_)));
    assert_eq!(
        option_pairs(ctx),
        vec![
            ("v1".to_string(), "Alice".to_string()),
            ("v2".to_string(), "Bob".to_string())
        ]
    );
    assert_eq!(ctx.service.snapshot().selected_voice_id(), "v1");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_show_placeholder_when_listing_unsuccessful(ctx: &mut TestContext) {
    ctx.stub.set_speakers(StatusCode::OK, r#"{"success":false}"#);

    assert_eq!(ctx.service.load_voices().await, VoiceList::NoneAvailable);
    assert_eq!(
        option_pairs(ctx),
        vec![("default".to_string(), "No voices available".to_string())]
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_show_placeholder_when_listing_empty(ctx: &mut TestContext) {
    ctx.stub
        .set_speakers(StatusCode::OK, r#"{"success":true,"speakers":[]}"#);

    assert_eq!(ctx.service.load_voices().await, VoiceList::NoneAvailable);
    assert_eq!(ctx.service.snapshot().voice_options.len(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_parse_error_status_bodies(ctx: &mut TestContext) {
    ctx.stub.set_speakers(
        StatusCode::INTERNAL_SERVER_ERROR,
        r#"{"detail":"ElevenLabs API error: unauthorized"}"#,
    );

    assert_eq!(ctx.service.load_voices().await, VoiceList::NoneAvailable);
    assert!(ctx.notifier.alerts().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_load_error_for_malformed_body(ctx: &mut TestContext) {
    ctx.stub.set_speakers(StatusCode::OK, "<html>gateway</html>");

    assert_eq!(ctx.service.load_voices().await, VoiceList::LoadError);
    assert_eq!(
        option_pairs(ctx),
        vec![("default".to_string(), "Error loading voices".to_string())]
    );
    assert!(ctx.notifier.alerts().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_load_error_when_unreachable(ctx: &mut TestContext) {
    // Bind and drop a listener to get a port nothing is serving
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let service = ctx.service_for(&format!("http://{}", addr));

    assert_eq!(service.load_voices().await, VoiceList::LoadError);
    assert_eq!(service.snapshot().voice_options[0].label, "Error loading voices");
}
