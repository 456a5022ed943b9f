//! Inbound status changes.

mod helpers;

use uuid::Uuid;

use teamdrive_core::error::ErrorKind;
use teamdrive_core::events::StatusChangedEvent;
use teamdrive_entity::{MemberRole, NodeStatus, Visibility};
use teamdrive_events::StatusChangeHandler;

use helpers::Harness;

#[tokio::test]
async fn test_file_status_change() {
    let h = Harness::new();
    let alice = h.member(MemberRole::Member);
    let file = h.file(&alice, "a.txt", None, h.shared()).await;

    h.services
        .files
        .handle_status_changed(StatusChangedEvent {
            file_id: Some(file.id),
            project_id: None,
            status: "updating".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(h.get(file.id).await.unwrap().status, NodeStatus::Updating);
}

#[tokio::test]
async fn test_project_status_change_wins_over_file() {
    let h = Harness::new();
    let alice = h.member(MemberRole::Member);
    let a = h.file(&alice, "a.txt", None, h.shared()).await;
    let b = h.file(&alice, "b.txt", None, h.shared()).await;

    h.services
        .files
        .handle_status_changed(StatusChangedEvent {
            file_id: Some(Uuid::new_v4()),
            project_id: Some(h.project),
            status: "UPDATING".to_string(),
        })
        .await
        .unwrap();
    for id in [a.id, b.id] {
        assert_eq!(h.get(id).await.unwrap().status, NodeStatus::Updating);
    }
}

#[tokio::test]
async fn test_bad_status_changes() {
    let h = Harness::new();
    let err = h
        .services
        .files
        .handle_status_changed(StatusChangedEvent {
            file_id: Some(Uuid::new_v4()),
            project_id: None,
            status: "UPLOADED".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let err = h
        .services
        .files
        .handle_status_changed(StatusChangedEvent {
            file_id: None,
            project_id: None,
            status: "UPLOADED".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = h
        .services
        .files
        .handle_status_changed(StatusChangedEvent {
            file_id: None,
            project_id: Some(h.project),
            status: "ARCHIVED".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_status_changes_never_touch_folders() {
    let h = Harness::new();
    let alice = h.member(MemberRole::Member);
    let folder = h.folder(&alice, "Docs", None, Visibility::Team, vec![]).await;
    let file = h.file(&alice, "a.txt", Some(folder.id), h.shared()).await;

    h.services
        .files
        .handle_status_changed(StatusChangedEvent {
            file_id: None,
            project_id: Some(h.project),
            status: "UPDATING".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(h.get(file.id).await.unwrap().status, NodeStatus::Updating);
    assert_eq!(h.get(folder.id).await.unwrap().status, NodeStatus::Uploaded);

    let err = h
        .services
        .files
        .handle_status_changed(StatusChangedEvent {
            file_id: Some(folder.id),
            project_id: None,
            status: "UPDATING".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(h.get(folder.id).await.unwrap().status, NodeStatus::Uploaded);
}

#[tokio::test]
async fn test_status_change_cannot_return_to_pending() {
    let h = Harness::new();
    let alice = h.member(MemberRole::Member);
    let file = h.file(&alice, "a.txt", None, h.shared()).await;

    let err = h
        .services
        .files
        .handle_status_changed(StatusChangedEvent {
            file_id: Some(file.id),
            project_id: None,
            status: "PENDING".to_string(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(h.get(file.id).await.unwrap().status, NodeStatus::Uploaded);
}
