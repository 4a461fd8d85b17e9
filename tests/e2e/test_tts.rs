use crate::e2e::helpers;

use axum::http::StatusCode;
use helpers::{StubReply, TestContext};
use pretty_assertions::assert_eq;
use test_context::test_context;
use tts_console::domain::speech::{SpeechServiceApi, SpeechServiceError};

const VOICES: &str = r#"{"success":true,"speakers":[{"id":"v1","name":"Alice"},{"id":"v2","name":"Bob"}]}"#;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_post_form_and_play_audio(ctx: &mut TestContext) {
    ctx.stub.set_speakers(StatusCode::OK, VOICES);
    ctx.stub.reply(StubReply::audio(b"ID3-hello-world"));
    ctx.service.load_voices().await;

    ctx.service.set_text("Hello world");
    let reference = ctx.service.submit().await.unwrap();

    let received = ctx.stub.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].content_type, "application/x-www-form-urlencoded");
    assert_eq!(
        received[0].body,
        "text=Hello+world&speaker_id=v1&language_id=en"
    );

    assert!(reference.path.starts_with(&ctx.audio_dir));
    assert_eq!(reference.path.extension().unwrap(), "mp3");
    assert_eq!(
        tokio::fs::read(&reference.path).await.unwrap(),
        b"ID3-hello-world"
    );

    let state = ctx.service.snapshot();
    assert!(state.audio.visible);
    assert!(state.audio.playing);
    assert_eq!(state.audio.source, Some(reference));
    assert!(state.trigger_enabled);
    assert_eq!(state.status.text, "Generation complete!");
    assert!(ctx.notifier.alerts().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_send_selected_voice(ctx: &mut TestContext) {
    ctx.stub.set_speakers(StatusCode::OK, VOICES);
    ctx.stub.reply(StubReply::audio(b"ID3"));
    ctx.service.load_voices().await;

    assert!(ctx.service.select_voice("2").is_some());
    ctx.service.set_text("Bonjour à tous");
    ctx.service.submit().await.unwrap();

    assert_eq!(
        ctx.stub.received()[0].body,
        "text=Bonjour+%C3%A0+tous&speaker_id=v2&language_id=en"
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_not_send_blank_text(ctx: &mut TestContext) {
    ctx.service.set_text("   \n");

    let result = ctx.service.submit().await;

    assert!(matches!(result, Err(SpeechServiceError::EmptyText)));
    assert!(ctx.stub.received().is_empty());
    assert_eq!(ctx.notifier.alerts(), vec!["Please enter some text".to_string()]);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_restore_ui_after_server_error(ctx: &mut TestContext) {
    ctx.stub.reply(StubReply::audio(b"ID3-first"));
    ctx.stub
        .reply(StubReply::error(StatusCode::INTERNAL_SERVER_ERROR));

    ctx.service.set_text("first");
    let first = ctx.service.submit().await.unwrap();
    let audio_before = ctx.service.snapshot().audio;

    ctx.service.set_text("second");
    let result = ctx.service.submit().await;

    assert!(matches!(result, Err(SpeechServiceError::Dependency(_))));
    let state = ctx.service.snapshot();
    assert!(state.trigger_enabled);
    assert!(!state.trigger_loading);
    assert!(!state.status.pulse);
    assert_eq!(state.status.text, "Error generating speech");
    assert_eq!(state.audio, audio_before);
    assert!(first.path.exists());
    assert_eq!(
        ctx.notifier.alerts(),
        vec!["Error generating speech. Please try again.".to_string()]
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_release_previous_audio_file(ctx: &mut TestContext) {
    ctx.stub.reply(StubReply::audio(b"ID3-one"));
    ctx.stub.reply(StubReply {
        status: StatusCode::OK,
        content_type: "audio/wav",
        body: b"RIFF-two".to_vec(),
    });

    ctx.service.set_text("again and again");
    let first = ctx.service.submit().await.unwrap();
    let second = ctx.service.submit().await.unwrap();

    assert!(!first.path.exists());
    assert!(second.path.exists());
    assert_eq!(second.path.extension().unwrap(), "wav");
    assert_eq!(ctx.stub.received().len(), 2);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_form_encode_like_a_browser(ctx: &mut TestContext) {
    ctx.stub.reply(StubReply::audio(b"ID3"));

    ctx.service.set_text("a*b~c 100%");
    ctx.service.submit().await.unwrap();

    assert_eq!(
        ctx.stub.received()[0].body,
        "text=a*b%7Ec+100%25&speaker_id=&language_id=en"
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_not_report_playing_when_output_cannot_start(ctx: &mut TestContext) {
    ctx.stub.reply(StubReply::audio(b"not audio at all"));
    let service = ctx.service_with_player(None);
    service.load_voices().await;

    service.set_text("Hello");
    let reference = service.submit().await.unwrap();

    let state = service.snapshot();
    assert_eq!(state.audio.source, Some(reference));
    assert!(state.audio.visible);
    assert!(!state.audio.playing);
    assert_eq!(state.status.text, "Generation complete!");
}
