//! Session state manager against the mock shop's cookie-backed sessions.

#![allow(clippy::unwrap_used)]

mod common;

use secrecy::SecretString;

use threadline_integration_tests::MockShop;
use threadline_storefront::session::{LOGIN_SUCCESS, LOGOUT_SUCCESS, REGISTER_SUCCESS};
use threadline_storefront::{Credentials, Registration, SessionState};

use common::{SHOPPER_EMAIL, SHOPPER_PASSWORD, notice_messages, storefront};

fn registration(email: &str) -> Registration {
    Registration {
        first_name: "Grace".to_string(),
        last_name: "Hopper".to_string(),
        username: "grace".to_string(),
        email: email.to_string(),
        password: SecretString::from("cobol-forever".to_string()),
        phone: Some("555-0100".to_string()),
    }
}

#[tokio::test]
async fn test_login_carries_session_cookie() {
    let shop = MockShop::start().await;
    let store = storefront(&shop);

    assert_eq!(store.session().bootstrap().await, SessionState::Anonymous);

    let identity = store
        .session()
        .login(Credentials::new(SHOPPER_EMAIL, SHOPPER_PASSWORD))
        .await
        .unwrap();
    assert_eq!(identity.first_name, "Ada");
    assert_eq!(store.session_view().heading(), "Welcome, Ada!");
    assert_eq!(notice_messages(&store), vec![LOGIN_SUCCESS]);

    // The cookie jar carries the server session into later calls.
    let check = store.api().check_session().await.unwrap();
    assert!(check.logged_in);
    assert_eq!(shop.session_count().await, 1);

    // A second client has its own jar and stays anonymous.
    let other = storefront(&shop);
    assert_eq!(other.session().bootstrap().await, SessionState::Anonymous);
}

#[tokio::test]
async fn test_login_failure_surfaces_server_message() {
    let shop = MockShop::start().await;
    let store = storefront(&shop);

    let err = store
        .session()
        .login(Credentials::new(SHOPPER_EMAIL, "not it"))
        .await
        .unwrap_err();

    assert_eq!(err.message(), "Invalid email or password");
    assert_eq!(store.session().current(), SessionState::Anonymous);
    assert_eq!(notice_messages(&store), vec!["Invalid email or password"]);
    assert_eq!(shop.actions().await, vec!["auth.php?login"]);
}

#[tokio::test]
async fn test_register_then_login() {
    let shop = MockShop::start().await;
    let store = storefront(&shop);

    store
        .session()
        .register(registration("grace@example.com"))
        .await
        .unwrap();
    assert_eq!(store.session().current(), SessionState::Anonymous);
    assert_eq!(notice_messages(&store), vec![REGISTER_SUCCESS]);

    let body = shop.requests().await.pop().unwrap().body;
    assert_eq!(body["first_name"], "Grace");
    assert_eq!(body["phone"], "555-0100");
    assert_eq!(body["password"], "cobol-forever");

    store
        .session()
        .login(Credentials::new("grace@example.com", "cobol-forever"))
        .await
        .unwrap();
    assert!(store.session().current().is_authenticated());
}

#[tokio::test]
async fn test_duplicate_registration() {
    let shop = MockShop::start().await;
    let store = storefront(&shop);

    store
        .session()
        .register(registration(SHOPPER_EMAIL))
        .await
        .unwrap_err();

    assert_eq!(notice_messages(&store), vec!["Email already registered"]);
    assert_eq!(store.session().current(), SessionState::Anonymous);
}

#[tokio::test]
async fn test_logout_ends_server_session() {
    let shop = MockShop::start().await;
    let store = storefront(&shop);
    store
        .session()
        .login(Credentials::new(SHOPPER_EMAIL, SHOPPER_PASSWORD))
        .await
        .unwrap();

    store.session().logout().await.unwrap();

    assert_eq!(store.session().current(), SessionState::Anonymous);
    assert_eq!(store.session_view().heading(), "Login Now");
    assert_eq!(notice_messages(&store), vec![LOGIN_SUCCESS, LOGOUT_SUCCESS]);
    assert!(!store.api().check_session().await.unwrap().logged_in);
}

#[tokio::test]
async fn test_failed_logout_keeps_stale_session() {
    let shop = MockShop::start().await;
    let store = storefront(&shop);
    store
        .session()
        .login(Credentials::new(SHOPPER_EMAIL, SHOPPER_PASSWORD))
        .await
        .unwrap();
    shop.set_fail_logout(true).await;

    store.session().logout().await.unwrap_err();

    assert!(store.session().current().is_authenticated());
    assert_eq!(
        notice_messages(&store),
        vec![LOGIN_SUCCESS, "Could not end session"]
    );
}

#[tokio::test]
async fn test_start_bootstraps_existing_server_session() {
    let shop = MockShop::start().await;
    let store = storefront(&shop);

    // Log in below the session manager, as another tab would.
    store
        .api()
        .login(Credentials::new(SHOPPER_EMAIL, SHOPPER_PASSWORD))
        .await
        .unwrap();
    assert_eq!(store.session().current(), SessionState::Anonymous);

    let state = store.start().await;

    assert_eq!(state.identity().unwrap().display_name(), "Ada");
    assert_eq!(store.featured_cards().len(), 3);
    assert!(store.notices().active().is_empty());

    // Bootstrap does not run twice.
    store.start().await;
    let checks = shop
        .actions()
        .await
        .into_iter()
        .filter(|a| a == "auth.php?check")
        .count();
    assert_eq!(checks, 1);
}
