use std::time::Duration;

use tokio::sync::watch;
use tokio::time::sleep;

use critterkit_sdk::query::species_of;
use critterkit_sdk::{spawn_token_query, Account, Session, SessionAction};

mod common;
use common::{test_contract, wait_until, MockNode, QueryScript};

fn alice() -> Account {
    Account {
        address: "0xalice".to_string(),
        display_name: Some("alice".to_string()),
    }
}

#[tokio::test]
async fn no_query_runs_without_handle_and_account() {
    let node = MockNode::new();
    let session = Session::new();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (_view_rx, task) = spawn_token_query(&session, shutdown_rx);

    // Key changes, but the guard must hold the query back: no account yet.
    session.dispatch(SessionAction::WalletEnabled);
    session.dispatch(SessionAction::ActivityTick);
    sleep(Duration::from_millis(150)).await;
    assert_eq!(node.contract_calls(), 0);

    // Handle alone is still not enough.
    session.dispatch(SessionAction::SetHandle(test_contract(&node)));
    sleep(Duration::from_millis(150)).await;
    assert_eq!(node.contract_calls(), 0);

    shutdown_tx.send_replace(true);
    task.await.expect("worker stops");
}

#[tokio::test]
async fn ready_session_triggers_query() {
    let node = MockNode::new();
    node.script_query(QueryScript::ok(&["token-a", "token-b"]));
    let session = Session::new();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (view_rx, task) = spawn_token_query(&session, shutdown_rx);

    session.dispatch(SessionAction::SetHandle(test_contract(&node)));
    session.dispatch(SessionAction::SetAccount(alice()));

    let rx = view_rx.clone();
    wait_until("first token view", || rx.borrow().generation > 0).await;

    let view = view_rx.borrow().clone();
    assert_eq!(view.owner.as_deref(), Some("0xalice"));
    assert_eq!(view.tokens, vec!["token-a", "token-b"]);

    shutdown_tx.send_replace(true);
    task.await.expect("worker stops");
}

#[tokio::test]
async fn stale_query_never_overwrites_newer_result() {
    let node = MockNode::new();
    // Generation 1 answers slowly with the old list; generation 2 answers
    // immediately with the new one.
    node.script_query(QueryScript::ok_after(
        Duration::from_millis(200),
        &["old-token"],
    ));
    node.script_query(QueryScript::ok(&["old-token", "new-token"]));

    let session = Session::new();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (view_rx, task) = spawn_token_query(&session, shutdown_rx);

    session.dispatch(SessionAction::SetHandle(test_contract(&node)));
    session.dispatch(SessionAction::SetAccount(alice()));
    wait_until("generation 1 issued", || node.contract_calls() == 1).await;

    session.dispatch(SessionAction::ActivityTick);
    let rx = view_rx.clone();
    wait_until("generation 2 applied", || rx.borrow().generation == 2).await;
    assert_eq!(
        view_rx.borrow().tokens,
        vec!["old-token", "new-token"]
    );

    // Let the slow generation-1 answer arrive; it must be dropped.
    sleep(Duration::from_millis(300)).await;
    let view = view_rx.borrow().clone();
    assert_eq!(view.generation, 2);
    assert_eq!(view.tokens, vec!["old-token", "new-token"]);

    shutdown_tx.send_replace(true);
    task.await.expect("worker stops");
}

#[tokio::test]
async fn failed_query_keeps_previous_view() {
    let node = MockNode::new();
    node.script_query(QueryScript::ok(&["token-a"]));
    node.script_query(QueryScript::fail("node hiccup"));

    let session = Session::new();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (view_rx, task) = spawn_token_query(&session, shutdown_rx);

    session.dispatch(SessionAction::SetHandle(test_contract(&node)));
    session.dispatch(SessionAction::SetAccount(alice()));
    let rx = view_rx.clone();
    wait_until("first view applied", || rx.borrow().generation == 1).await;

    session.dispatch(SessionAction::ActivityTick);
    wait_until("failing query issued", || node.contract_calls() == 2).await;
    sleep(Duration::from_millis(150)).await;

    let view = view_rx.borrow().clone();
    assert_eq!(view.generation, 1, "failed query must not advance the view");
    assert_eq!(view.tokens, vec!["token-a"]);

    shutdown_tx.send_replace(true);
    task.await.expect("worker stops");
}

#[tokio::test]
async fn species_lookup_decodes_numeric_output() {
    let node = MockNode::new();
    node.script_query(QueryScript::value(serde_json::json!(16)));
    let contract = test_contract(&node);

    let species = species_of(&contract, &"00".repeat(32)).await.unwrap();
    assert_eq!(species, 16);
    assert_eq!(node.contract_calls(), 1);
}

#[tokio::test]
async fn account_switch_requeries_for_new_owner() {
    let node = MockNode::new();
    node.script_query(QueryScript::ok(&["alice-token"]));
    node.script_query(QueryScript::ok(&["bob-token"]));

    let session = Session::new();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (view_rx, task) = spawn_token_query(&session, shutdown_rx);

    session.dispatch(SessionAction::SetHandle(test_contract(&node)));
    session.dispatch(SessionAction::SetAccount(alice()));
    let rx = view_rx.clone();
    wait_until("alice view", || rx.borrow().generation == 1).await;

    session.dispatch(SessionAction::SetAccount(Account {
        address: "0xbob".to_string(),
        display_name: Some("bob".to_string()),
    }));
    let rx = view_rx.clone();
    wait_until("bob view", || rx.borrow().generation == 2).await;

    let view = view_rx.borrow().clone();
    assert_eq!(view.owner.as_deref(), Some("0xbob"));
    assert_eq!(view.tokens, vec!["bob-token"]);

    shutdown_tx.send_replace(true);
    task.await.expect("worker stops");
}
