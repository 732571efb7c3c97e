mod common;

use common::{spawn_app, spawn_app_with};
use taskboard::client::{ApiClient, ClientError, Session};
use taskboard::routes::{BoardRequest, TaskRequest};
use taskboard::store::TaskStatus;

#[tokio::test]
async fn client_walks_through_a_board() {
    let app = spawn_app().await;
    let client = ApiClient::new(&app.address);

    let session = client.signup("ann@x.io", "pw123456").await.unwrap();
    let board_id = session.board_id.expect("signup returns the default board");

    let identity = client.validate().await.unwrap();
    assert_eq!(identity.email, "ann@x.io");

    let board = client.get_board(board_id).await.unwrap();
    assert_eq!(board.tasks.len(), 3);

    let task = client
        .create_task(
            board_id,
            &TaskRequest {
                name: Some("Write docs".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(task.position, 4);
    assert_eq!(task.status, TaskStatus::InProgress);

    let task = client
        .update_task(
            task.id,
            &TaskRequest {
                name: Some("X".to_string()),
                description: None,
                status: Some("completed".to_string()),
                icon: Some("✓".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(task.status, TaskStatus::Completed);

    client.delete_task(task.id).await.unwrap();

    let renamed = client
        .update_board(
            board_id,
            &BoardRequest {
                name: Some("Renamed".to_string()),
                description: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Renamed");

    let second = client.create_board(&BoardRequest::default()).await.unwrap();
    let boards = client.list_boards().await.unwrap();
    assert_eq!(boards.len(), 2);
    assert_eq!(boards[0].board.id, second);
    assert_eq!(boards[0].task_count, 3);

    client.delete_board(second).await.unwrap();
    assert_eq!(client.list_boards().await.unwrap().len(), 1);
}

#[tokio::test]
async fn client_reports_api_errors() {
    let app = spawn_app().await;
    let client = ApiClient::new(&app.address);

    client.signup("ann@x.io", "pw123456").await.unwrap();
    client.logout();

    match client.login("ann@x.io", "wrong-pass").await {
        Err(ClientError::Api { status, code, .. }) => {
            assert_eq!(status, 401);
            assert_eq!(code, "INVALID_CREDENTIALS");
        }
        other => panic!("expected an API error, got {:?}", other),
    }
    assert!(client.session().is_none());

    client.login("ann@x.io", "pw123456").await.unwrap();
    let missing = client.get_board(uuid::Uuid::new_v4()).await.unwrap_err();
    assert_eq!(missing.status(), Some(404));
}

#[tokio::test]
async fn client_refreshes_an_expired_access_token_once() {
    let app = spawn_app_with(|s| s.jwt.access_token_expiry = -60).await;
    let client = ApiClient::new(&app.address);

    let session = client.signup("ann@x.io", "pw123456").await.unwrap();

    // Every access token this server issues is already expired, so the
    // refreshed one fails too and the session is dropped.
    let result = client.list_boards().await;
    assert!(matches!(result, Err(ClientError::SessionExpired)));
    assert!(client.session().is_none());

    // A server with a sane lifetime accepts the refreshed token.
    let app = spawn_app().await;
    let stale = ApiClient::new(&app.address);
    let fresh = stale.signup("bob@x.io", "pw123456").await.unwrap();
    let client = ApiClient::new(&app.address).with_session(Session {
        access_token: session.access_token,
        ..fresh.clone()
    });

    let boards = client.list_boards().await.unwrap();
    assert_eq!(boards.len(), 1);
    assert_ne!(client.session().unwrap().access_token, fresh.access_token);
}

#[tokio::test]
async fn client_logs_out_when_refresh_is_rejected() {
    let app = spawn_app().await;
    let client = ApiClient::new(&app.address).with_session(Session {
        access_token: "expired".to_string(),
        refresh_token: "revoked".to_string(),
        board_id: None,
    });

    let result = client.list_boards().await;

    assert!(matches!(result, Err(ClientError::SessionExpired)));
    assert!(client.session().is_none());
}
