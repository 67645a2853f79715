//! End-to-end flows through the pipeline with a recording transport.

use std::sync::Arc;

use super::mock::{Call, MockTransport};
use super::*;

fn people() -> Catalog {
    Catalog::from_people(vec![
        Person::new("a", "Alice", "Bio A", "https://x/a.jpg"),
        Person::new("b", "Bob", "Bio B", ""),
    ])
    .unwrap()
}

fn pipeline() -> (Arc<MockTransport>, Pipeline) {
    let mock = Arc::new(MockTransport::new());
    let navigator = Navigator::new(Arc::new(people()), mock.clone());
    (mock, Pipeline::new(Arc::new(navigator)).with(LoggingMiddleware))
}

fn start() -> Event {
    Event::Start { chat_id: 10, user_id: 20 }
}

fn press(data: &str, message_id: i64) -> Event {
    Event::from_callback("cb".to_string(), 10, message_id, data).unwrap()
}

fn menu_labels(call: &Call) -> Vec<String> {
    match call {
        Call::Message { keyboard: Some(k), .. } => k.actions().map(|a| a.label.clone()).collect(),
        other => panic!("expected menu message, got {other:?}"),
    }
}

#[tokio::test]
async fn test_scenario_two_people() {
    let (mock, pipeline) = pipeline();

    // Start shows both people, one per row.
    assert_eq!(pipeline.dispatch(&start()).await.unwrap(), Screen::MainMenu);
    let sent = mock.sent();
    assert_eq!(menu_labels(&sent[0]), vec!["Alice", "Bob"]);
    let Call::Message { keyboard: Some(menu), .. } = &sent[0] else { unreachable!() };
    assert!(menu.rows().iter().all(|row| row.len() == 1));

    // Bob has no photo: text card with a back button.
    mock.clear();
    assert_eq!(pipeline.dispatch(&press("person:b", 101)).await.unwrap(), Screen::Detail);
    assert_eq!(
        mock.sent(),
        vec![Call::Message {
            chat_id: 10,
            text: "<b>Bob</b>\n\nBio B".to_string(),
            keyboard: Some(keyboard::back_menu()),
        }]
    );

    // Unknown person: notice only, nothing deleted.
    mock.clear();
    assert_eq!(pipeline.dispatch(&press("person:c", 102)).await.unwrap(), Screen::Unchanged);
    assert!(mock.deletes().is_empty());
    assert_eq!(mock.sent().len(), 1);

    // Back deletes the card and resends the menu.
    mock.clear();
    assert_eq!(pipeline.dispatch(&press("back", 102)).await.unwrap(), Screen::MainMenu);
    assert_eq!(mock.deletes(), vec![Call::Delete { chat_id: 10, message_id: 102 }]);
    assert_eq!(menu_labels(&mock.sent()[0]), vec!["Alice", "Bob"]);
}

#[tokio::test]
async fn test_select_back_select_matches_direct_select() {
    let (direct, pipeline_direct) = pipeline();
    pipeline_direct.dispatch(&start()).await.unwrap();
    direct.clear();
    pipeline_direct.dispatch(&press("person:a", 101)).await.unwrap();
    let direct_card = direct.sent();

    let (round, pipeline_round) = pipeline();
    pipeline_round.dispatch(&start()).await.unwrap();
    pipeline_round.dispatch(&press("person:a", 101)).await.unwrap();
    pipeline_round.dispatch(&press("back", 102)).await.unwrap();
    round.clear();
    pipeline_round.dispatch(&press("person:a", 103)).await.unwrap();
    let round_card = round.sent();

    assert_eq!(direct_card.len(), 1);
    assert_eq!(round_card, direct_card);
}

#[tokio::test]
async fn test_every_menu_entry_opens_its_card() {
    let (mock, pipeline) = pipeline();
    let catalog = people();

    for person in catalog.iter() {
        mock.clear();
        let action_id = keyboard::person_action_id(&person.key);
        pipeline.dispatch(&press(&action_id, 1)).await.unwrap();

        let expected = render::caption(person);
        let caption = match &mock.sent()[0] {
            Call::Photo { caption, .. } => caption.clone(),
            Call::Message { text, .. } => text.clone(),
            other => panic!("unexpected call {other:?}"),
        };
        assert_eq!(caption, expected);
    }
}

#[tokio::test]
async fn test_failed_event_does_not_affect_next_one() {
    let (mock, pipeline) = pipeline();
    mock.fail_next_messages(2);

    assert!(pipeline.dispatch(&press("person:b", 1)).await.is_err());
    assert_eq!(pipeline.dispatch(&press("person:b", 2)).await.unwrap(), Screen::Detail);
    assert_eq!(mock.sent().len(), 1);
}

#[tokio::test]
async fn test_concurrent_conversations() {
    let (mock, pipeline) = pipeline();
    let pipeline = Arc::new(pipeline);

    let mut tasks = Vec::new();
    for chat_id in 0..8 {
        let pipeline = pipeline.clone();
        tasks.push(tokio::spawn(async move {
            let event = Event::from_callback(format!("cb{chat_id}"), chat_id, 1, "person:a").unwrap();
            pipeline.dispatch(&event).await.unwrap()
        }));
    }
    for task in tasks {
        assert_eq!(task.await.unwrap(), Screen::Detail);
    }

    assert_eq!(mock.sent().len(), 8);
    assert_eq!(mock.deletes().len(), 8);
}
