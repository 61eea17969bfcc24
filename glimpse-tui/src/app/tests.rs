use super::*;
use crate::auth::test_support::make_token;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use glimpse_types::Post;
use tempfile::TempDir;

/// Helper to create a KeyEvent
fn key_event(code: KeyCode) -> KeyEvent {
    let mut event = KeyEvent::new(code, KeyModifiers::empty());
    event.kind = KeyEventKind::Press;
    event
}

fn make_post(id: i64) -> Post {
    Post {
        id,
        content: format!("post {}", id),
        user_name: "ana".to_string(),
        user_image_url: "https://cdn.example/u/1.png".to_string(),
        image_urls: vec![],
    }
}

/// App over a temp session directory. The TempDir must stay alive for
/// the duration of the test.
fn test_app() -> (App, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let store = crate::session::SessionStore::with_dir(temp_dir.path());
    let app = App::new(crate::api::ApiClient::new("http://127.0.0.1:0"), store);
    (app, temp_dir)
}

fn seed_posts(app: &mut App, count: i64) {
    app.feed.posts = (1..=count).map(make_post).collect();
    for id in 1..=count {
        app.feed.likes.insert(
            id,
            glimpse_types::LikeState {
                liked: false,
                count: id,
            },
        );
        app.feed.comments.insert(id, Vec::new());
    }
    app.feed.loading = false;
    app.feed.list_state.select(Some(0));
}

fn store_valid_session(app: &App) {
    let token = make_token(&serde_json::json!({
        "userId": 42,
        "firstName": "Lina",
        "lastName": "Marchal"
    }));
    app.session_store.save_token(&token).unwrap();
}

fn type_comment(app: &mut App, text: &str) {
    for c in text.chars() {
        app.handle_key_event(key_event(KeyCode::Char(c))).unwrap();
    }
}

#[test]
fn test_escape_closes_comment_modal_first() {
    let (mut app, _dir) = test_app();
    seed_posts(&mut app, 1);
    app.open_comment_modal();
    assert!(app.composer.is_open());

    // Escape should close the modal, not exit the app
    app.handle_key_event(key_event(KeyCode::Esc)).unwrap();

    assert!(!app.composer.is_open(), "Comment modal should be closed");
    assert!(app.running, "App should still be running");
}

#[test]
fn test_escape_exits_app_when_no_modal() {
    let (mut app, _dir) = test_app();
    seed_posts(&mut app, 1);

    app.handle_key_event(key_event(KeyCode::Esc)).unwrap();

    assert!(!app.running, "App should stop running");
    assert!(app.cancel.is_cancelled(), "Quit should cancel pending loads");
}

#[test]
fn test_open_modal_requires_a_selected_post() {
    let (mut app, _dir) = test_app();

    app.handle_key_event(key_event(KeyCode::Char('c'))).unwrap();

    assert!(!app.composer.is_open());
    assert_eq!(app.input_mode, InputMode::Navigation);
}

#[test]
fn test_open_modal_scopes_to_selected_post() {
    let (mut app, _dir) = test_app();
    seed_posts(&mut app, 3);
    app.handle_key_event(key_event(KeyCode::Char('j'))).unwrap();

    app.handle_key_event(key_event(KeyCode::Char('c'))).unwrap();

    assert_eq!(app.composer.selected_post, Some(2));
    assert_eq!(app.input_mode, InputMode::Typing);
}

#[test]
fn test_navigation_stops_at_feed_edges() {
    let (mut app, _dir) = test_app();
    seed_posts(&mut app, 2);

    app.select_previous();
    assert_eq!(app.feed.list_state.selected(), Some(0));

    app.select_next();
    app.select_next();
    assert_eq!(app.feed.list_state.selected(), Some(1));
}

#[test]
fn test_blank_comment_is_a_noop() {
    let (mut app, _dir) = test_app();
    seed_posts(&mut app, 1);
    store_valid_session(&app);
    app.open_comment_modal();

    type_comment(&mut app, "   ");
    app.handle_key_event(key_event(KeyCode::Enter)).unwrap();

    assert!(app.feed.comments.get(&1).unwrap().is_empty());
    assert!(app.composer.is_open(), "Modal should stay open");
}

#[test]
fn test_comment_without_session_is_a_noop() {
    let (mut app, _dir) = test_app();
    seed_posts(&mut app, 1);
    app.open_comment_modal();

    type_comment(&mut app, "hello");
    app.handle_key_event(key_event(KeyCode::Enter)).unwrap();

    assert!(app.feed.comments.get(&1).unwrap().is_empty());
    assert!(app.composer.is_open(), "Modal should stay open");
    assert_eq!(
        app.composer.get_content(),
        "hello",
        "Input should be unchanged after an aborted submit"
    );
}

#[test]
fn test_comment_with_no_post_selected_is_a_noop() {
    let (mut app, _dir) = test_app();
    seed_posts(&mut app, 1);
    store_valid_session(&app);

    app.composer.textarea.insert_str("hello");
    app.composer.selected_post = None;
    app.submit_comment();

    assert!(app.feed.comments.get(&1).unwrap().is_empty());
}

#[test]
fn test_valid_comment_appends_exactly_one() {
    let (mut app, _dir) = test_app();
    seed_posts(&mut app, 2);
    store_valid_session(&app);
    app.open_comment_modal();

    type_comment(&mut app, "lovely shot");
    app.handle_key_event(key_event(KeyCode::Enter)).unwrap();

    let comments = app.feed.comments.get(&1).unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].content, "lovely shot");
    assert_eq!(comments[0].user_id, Some(42));
    assert_eq!(comments[0].user_name, "Lina Marchal");
    assert_eq!(comments[0].post_id, 1);

    // The other post's list is untouched, the input is cleared, and the
    // modal stays open
    assert!(app.feed.comments.get(&2).unwrap().is_empty());
    assert_eq!(app.composer.get_content(), "");
    assert!(app.composer.is_open());
}

#[test]
fn test_comment_ids_strictly_increase() {
    let (mut app, _dir) = test_app();
    seed_posts(&mut app, 1);
    store_valid_session(&app);
    app.open_comment_modal();

    for text in ["first", "second", "third"] {
        type_comment(&mut app, text);
        app.handle_key_event(key_event(KeyCode::Enter)).unwrap();
    }

    let comments = app.feed.comments.get(&1).unwrap();
    assert_eq!(comments.len(), 3);
    assert!(comments[0].id < comments[1].id);
    assert!(comments[1].id < comments[2].id);
}

#[test]
fn test_closing_modal_keeps_added_comments() {
    let (mut app, _dir) = test_app();
    seed_posts(&mut app, 1);
    store_valid_session(&app);
    app.open_comment_modal();

    type_comment(&mut app, "staying around");
    app.handle_key_event(key_event(KeyCode::Enter)).unwrap();
    app.handle_key_event(key_event(KeyCode::Esc)).unwrap();

    assert!(!app.composer.is_open());
    assert_eq!(app.feed.comments.get(&1).unwrap().len(), 1);
}

#[test]
fn test_like_toggle_flips_only_target_entry() {
    let (mut app, _dir) = test_app();
    seed_posts(&mut app, 3);

    let state = app.apply_like_toggle(2).unwrap();
    assert!(state.liked);
    assert_eq!(state.count, 3);

    assert_eq!(app.feed.likes.get(&1).unwrap().count, 1);
    assert!(!app.feed.likes.get(&1).unwrap().liked);
    assert_eq!(app.feed.likes.get(&3).unwrap().count, 3);
    assert!(!app.feed.likes.get(&3).unwrap().liked);

    // Toggling back restores the original count
    let state = app.apply_like_toggle(2).unwrap();
    assert!(!state.liked);
    assert_eq!(state.count, 2);
}

#[test]
fn test_like_toggle_on_unknown_post_is_a_noop() {
    let (mut app, _dir) = test_app();
    seed_posts(&mut app, 1);

    assert_eq!(app.apply_like_toggle(99), None);
    assert_eq!(app.feed.likes.get(&1).unwrap().count, 1);
}

#[test]
fn test_reload_key_returns_to_loading_state() {
    let (mut app, _dir) = test_app();
    seed_posts(&mut app, 1);
    assert!(!app.feed.loading);

    app.handle_key_event(key_event(KeyCode::Char('r'))).unwrap();

    assert!(app.feed.loading);
    assert!(app.feed.pending_load);
}

// Property-based tests
use proptest::prelude::*;

// For any feed and any single toggle, only the targeted post's like
// entry changes.
proptest! {
    #[test]
    fn prop_like_toggle_isolation(post_count in 1i64..20, target_index in 0i64..20) {
        let target = (target_index % post_count) + 1;

        let temp_dir = TempDir::new().unwrap();
        let store = crate::session::SessionStore::with_dir(temp_dir.path());
        let mut app = App::new(crate::api::ApiClient::new("http://127.0.0.1:0"), store);
        seed_posts(&mut app, post_count);

        let before = app.feed.likes.clone();
        app.apply_like_toggle(target);

        for id in 1..=post_count {
            let old = before.get(&id).unwrap();
            let new = app.feed.likes.get(&id).unwrap();
            if id == target {
                prop_assert_eq!(new.liked, !old.liked);
                prop_assert_eq!(new.count, old.count + 1);
            } else {
                prop_assert_eq!(new, old);
            }
        }
    }
}
