use super::MessageStore;
use crate::domain::models::Message;
use crate::domain::models::MessageMeta;
use crate::domain::models::Role;

#[test]
fn it_appends_and_returns_indexes() {
    let mut store = MessageStore::default();

    let first = store.append(Message::user("hello"));
    let second = store.append(Message::placeholder());

    assert_eq!(first, 0);
    assert_eq!(second, 1);
    assert_eq!(store.len(), 2);
    assert!(!store.is_empty());
}

#[test]
fn it_rewrites_the_trailing_assistant_message_in_place() {
    let mut store = MessageStore::default();
    store.append(Message::user("hello"));
    let index = store.append(Message::placeholder());

    let meta = MessageMeta {
        title: Some("Counter".to_string()),
        description: None,
    };
    let rewritten = store.rewrite_assistant(index, "let x = 1;", "Working on it", meta.clone());

    assert!(rewritten);
    assert_eq!(store.len(), 2);

    let message = store.last().unwrap();
    assert_eq!(message.content, "let x = 1;");
    assert_eq!(message.commentary.as_deref(), Some("Working on it"));
    assert_eq!(message.meta, Some(meta));
}

#[test]
fn it_replaces_content_instead_of_appending() {
    let mut store = MessageStore::default();
    let index = store.append(Message::placeholder());

    store.rewrite_assistant(index, "first", "", MessageMeta::default());
    store.rewrite_assistant(index, "second", "", MessageMeta::default());

    assert_eq!(store.last().unwrap().content, "second");
}

#[test]
fn it_refuses_to_rewrite_user_messages() {
    let mut store = MessageStore::default();
    let index = store.append(Message::user("hello"));

    let rewritten = store.rewrite_assistant(index, "nope", "", MessageMeta::default());

    assert!(!rewritten);
    assert_eq!(store.last().unwrap().content, "hello");
}

#[test]
fn it_refuses_out_of_bounds_indexes() {
    let mut store = MessageStore::default();

    assert!(!store.rewrite_assistant(7, "nope", "", MessageMeta::default()));
}

#[test]
fn it_strips_commentary_and_meta_for_the_wire() {
    let mut store = MessageStore::default();
    store.append(Message::user("hello"));
    let index = store.append(Message::placeholder());
    store.rewrite_assistant(
        index,
        "let x = 1;",
        "Working on it",
        MessageMeta {
            title: Some("Counter".to_string()),
            description: Some("desc".to_string()),
        },
    );

    let wire = store.to_request_messages();

    assert_eq!(wire.len(), 2);
    assert_eq!(wire[0].role, Role::User);
    assert_eq!(wire[0].content, "hello");
    assert_eq!(wire[1].role, Role::Assistant);
    assert_eq!(wire[1].content, "let x = 1;");

    let payload = serde_json::to_string(&wire).unwrap();
    assert!(!payload.contains("commentary"));
    assert!(!payload.contains("Counter"));
}
