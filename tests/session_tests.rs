use email_sender::app::App;
use email_sender::config::AppConfig;
use email_sender::recipients::RecipientList;
use email_sender::remote::SendStatus;
use email_sender::tea::message::{
    Message, NotificationLevel, NotificationMessage, RecipientsMessage, SendMessage,
};
use email_sender::tea::model::{Draft, SessionState};
use email_sender::tea::update::{MSG_SENDING, MSG_SEND_FAILED, MSG_STOPPED};
use email_sender::testing::{MockCall, MockMailService};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

fn status(total: u64, sent: u64, failed: u64, all: bool) -> SendStatus {
    SendStatus {
        total,
        sent,
        failed,
        all_emails_sent: all,
    }
}

fn loaded(addresses: &[&str]) -> Message {
    Message::Recipients(RecipientsMessage::Loaded {
        path: PathBuf::from("recipients.csv"),
        result: Ok(RecipientList::from_cells(
            addresses.iter().map(|a| Some(a.to_string())),
        )),
    })
}

fn app_with(mock: &MockMailService) -> App {
    App::new(&AppConfig::default(), Arc::new(mock.clone()), Draft::default())
}

/// Process messages until the model satisfies `done`
async fn process_until(app: &mut App, done: impl Fn(&App) -> bool) {
    while !done(app) {
        assert!(app.process_next().await, "message channel closed");
    }
}

#[tokio::test(start_paused = true)]
async fn test_send_and_poll_until_all_sent() {
    let mock = MockMailService::new().with_statuses([status(2, 1, 0, false), status(2, 2, 0, true)]);
    let mut app = app_with(&mock);

    app.dispatch(loaded(&["a@x.com", "b@y.com"]));
    assert_eq!(app.model().status, SendStatus::fresh(2));

    app.dispatch(Message::Send(SendMessage::Start));
    assert_eq!(app.model().session, SessionState::Starting);
    assert!(app.is_polling());

    process_until(&mut app, |app| app.model().session == SessionState::Sending).await;
    assert!(app.is_polling());
    assert_eq!(app.model().notification.as_ref().unwrap().message, MSG_SENDING);
    let sending_since = Instant::now();

    process_until(&mut app, |app| app.model().status.sent == 1).await;
    assert_eq!(sending_since.elapsed(), Duration::from_secs(5));
    assert!(app.model().is_sending());
    assert!(!app.model().all_sent);

    process_until(&mut app, |app| app.model().session == SessionState::Completed).await;
    assert_eq!(sending_since.elapsed(), Duration::from_secs(10));
    assert!(app.model().all_sent);
    assert!(!app.model().is_sending());
    assert!(!app.is_polling());

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(mock.poll_count(), 2);

    match &mock.calls()[0] {
        MockCall::StartSend(request) => {
            assert_eq!(request.recipients, vec!["a@x.com".to_string(), "b@y.com".to_string()]);
        }
        other => panic!("unexpected first call {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_polls_while_send_request_is_open() {
    let mock = MockMailService::new()
        .with_start_delay(Duration::from_secs(12))
        .with_statuses([status(2, 1, 0, false)]);
    let mut app = app_with(&mock);

    app.dispatch(loaded(&["a@x.com", "b@y.com"]));
    let started_at = Instant::now();
    app.dispatch(Message::Send(SendMessage::Start));

    tokio::time::sleep(Duration::from_secs(11)).await;
    app.drain_pending();

    assert_eq!(app.model().session, SessionState::Starting);
    assert!(app.is_polling());
    assert_eq!(mock.poll_count(), 2);
    assert_eq!(app.model().status.sent, 1);

    process_until(&mut app, |app| app.model().session == SessionState::Sending).await;
    assert_eq!(started_at.elapsed(), Duration::from_secs(12));
    assert_eq!(app.model().notification.as_ref().unwrap().message, MSG_SENDING);
    assert!(app.is_polling());
}

#[tokio::test(start_paused = true)]
async fn test_stop_while_send_request_is_open() {
    let mock = MockMailService::new().with_start_delay(Duration::from_secs(60));
    let mut app = app_with(&mock);

    app.dispatch(Message::Send(SendMessage::Start));
    app.dispatch(Message::Send(SendMessage::Stop));
    process_until(&mut app, |app| app.model().session == SessionState::Idle).await;
    assert!(!app.is_polling());
    assert!(mock.calls().contains(&MockCall::StopSend));
}

#[tokio::test(start_paused = true)]
async fn test_stop_releases_poller() {
    let mock = MockMailService::new().with_statuses([status(3, 1, 0, false)]);
    let mut app = app_with(&mock);

    app.dispatch(loaded(&["a@x.com", "b@y.com", "c@z.com"]));
    app.dispatch(Message::Send(SendMessage::Start));
    process_until(&mut app, |app| app.model().session == SessionState::Sending).await;
    process_until(&mut app, |app| app.model().status.sent == 1).await;

    app.dispatch(Message::Send(SendMessage::Stop));
    process_until(&mut app, |app| app.model().session == SessionState::Idle).await;
    assert!(!app.is_polling());
    assert_eq!(app.model().notification.as_ref().unwrap().message, MSG_STOPPED);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(mock.poll_count(), 1);
    assert!(mock.calls().contains(&MockCall::StopSend));
}

#[tokio::test(start_paused = true)]
async fn test_failed_stop_keeps_sending() {
    let mock = MockMailService::new().failing_stop();
    let mut app = app_with(&mock);

    app.dispatch(Message::Send(SendMessage::Start));
    process_until(&mut app, |app| app.model().session == SessionState::Sending).await;
    let shown = app.model().notification.clone();

    app.dispatch(Message::Send(SendMessage::Stop));
    process_until(&mut app, |_| mock.calls().contains(&MockCall::StopSend)).await;
    // Give the stop result time to arrive; the notification timer fires later
    tokio::time::sleep(Duration::from_millis(10)).await;
    app.drain_pending();

    assert_eq!(app.model().session, SessionState::Sending);
    assert_eq!(app.model().notification, shown);
    assert!(app.is_polling());
}

#[tokio::test(start_paused = true)]
async fn test_failed_start_returns_to_idle() {
    let mock = MockMailService::new().failing_start();
    let mut app = app_with(&mock);

    app.dispatch(Message::Send(SendMessage::Start));
    process_until(&mut app, |app| !app.model().is_sending()).await;

    assert_eq!(app.model().session, SessionState::Idle);
    let notification = app.model().notification.as_ref().unwrap();
    assert_eq!(notification.message, MSG_SEND_FAILED);
    assert_eq!(notification.level, NotificationLevel::Error);

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(mock.poll_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_notification_hides_after_two_seconds() {
    let mock = MockMailService::new();
    let mut app = app_with(&mock);

    let shown_at = Instant::now();
    app.dispatch(Message::Notification(NotificationMessage::Show(
        "first".to_string(),
        NotificationLevel::Info,
    )));
    process_until(&mut app, |app| app.model().notification.is_none()).await;
    assert_eq!(shown_at.elapsed(), Duration::from_millis(2000));
}

#[tokio::test(start_paused = true)]
async fn test_superseded_notification_keeps_its_own_window() {
    let mock = MockMailService::new();
    let mut app = app_with(&mock);

    app.dispatch(Message::Notification(NotificationMessage::Show(
        "first".to_string(),
        NotificationLevel::Info,
    )));
    tokio::time::sleep(Duration::from_millis(1500)).await;

    let second_at = Instant::now();
    app.dispatch(Message::Notification(NotificationMessage::Show(
        "second".to_string(),
        NotificationLevel::Info,
    )));

    // First timer fires at 2000ms and must leave the second one visible
    assert!(app.process_next().await);
    assert_eq!(app.model().notification.as_ref().unwrap().message, "second");

    process_until(&mut app, |app| app.model().notification.is_none()).await;
    assert_eq!(second_at.elapsed(), Duration::from_millis(2000));
}

#[tokio::test(start_paused = true)]
async fn test_teardown_stops_polling_for_good() {
    let mock = MockMailService::new();
    let mut app = app_with(&mock);

    app.dispatch(Message::Send(SendMessage::Start));
    process_until(&mut app, |app| app.model().session == SessionState::Sending).await;
    assert!(app.is_polling());

    app.shutdown();
    assert!(!app.is_polling());

    // Further messages do not bring the poller back
    app.dispatch(Message::Notification(NotificationMessage::Show(
        "late".to_string(),
        NotificationLevel::Info,
    )));
    assert!(!app.is_polling());
    drop(app);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(mock.poll_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_app_releases_poller() {
    let mock = MockMailService::new();
    let mut app = app_with(&mock);

    app.dispatch(Message::Send(SendMessage::Start));
    process_until(&mut app, |app| app.model().session == SessionState::Sending).await;
    drop(app);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(mock.poll_count(), 0);
}
