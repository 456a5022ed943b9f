//! Scoped listing, folder browsing and lookup.

mod helpers;

use std::collections::HashSet;

use uuid::Uuid;

use teamdrive_auth::RequestScope;
use teamdrive_core::error::ErrorKind;
use teamdrive_core::types::pagination::PageRequest;
use teamdrive_entity::{MemberRole, Node, Visibility};
use teamdrive_service::RequestContext;
use teamdrive_service::file::requests::{ListFilesRequest, LookupRequest};

use helpers::Harness;

fn shared_listing(h: &Harness, parent_id: Option<Uuid>, limit: u64) -> ListFilesRequest {
    ListFilesRequest {
        parent_id,
        project_id: Some(h.project),
        team_id: Some(h.team),
        limit,
        ..ListFilesRequest::default()
    }
}

#[tokio::test]
async fn test_member_listing_respects_visibility_exhaustively() {
    let h = Harness::new();
    let viewer = h.member(MemberRole::Member);
    let other = h.member(MemberRole::Member);

    let mut expected = HashSet::new();
    let mut hidden = HashSet::new();
    for visibility in [Visibility::Private, Visibility::Team, Visibility::Specific] {
        for owner in [&viewer, &other] {
            for listed in [false, true] {
                let node = h.file(owner, "f.txt", None, h.shared()).await;
                let allowed = if listed { vec![viewer.user_id] } else { vec![] };
                let node = h.set_access(&node, visibility, allowed).await;
                if node.visible_to(viewer.user_id) {
                    expected.insert(node.id);
                } else {
                    hidden.insert(node.id);
                }
            }
        }
    }
    // Other-owned: private twice, specific unlisted once.
    assert_eq!(hidden.len(), 3);

    let page = h
        .services
        .listing
        .list_files(&viewer, shared_listing(&h, None, 100))
        .await
        .unwrap();
    let returned: HashSet<Uuid> = page.data.iter().map(|n| n.id).collect();
    assert_eq!(returned, expected);
    assert!(page.data.iter().all(|n| {
        !(n.visibility == Visibility::Private && n.owner_id != viewer.user_id)
    }));
    assert_eq!(page.pagination.total_items, expected.len() as u64);

    let admin = h.member(MemberRole::Admin);
    let page = h
        .services
        .listing
        .list_files(&admin, shared_listing(&h, None, 100))
        .await
        .unwrap();
    assert_eq!(page.data.len(), expected.len() + hidden.len());
}

#[tokio::test]
async fn test_listing_orders_folders_first_and_paginates() {
    let h = Harness::new();
    let alice = h.member(MemberRole::Member);
    for i in 0..3 {
        h.file(&alice, &format!("{i}.txt"), None, h.shared()).await;
    }
    let folder = h.folder(&alice, "dir", None, Visibility::Private, vec![]).await;
    for i in 3..5 {
        h.file(&alice, &format!("{i}.txt"), None, h.shared()).await;
    }

    let first = h
        .services
        .listing
        .list_files(&alice, shared_listing(&h, None, 2))
        .await
        .unwrap();
    assert_eq!(first.data.len(), 2);
    assert_eq!(first.data[0].id, folder.id);
    assert_eq!(first.pagination.total_items, 6);
    assert_eq!(first.pagination.total_pages, 3);
    assert_eq!(first.pagination.current_page, 1);
    assert_eq!(first.pagination.limit, 2);

    let last = h
        .services
        .listing
        .list_files(
            &alice,
            ListFilesRequest {
                page: 3,
                ..shared_listing(&h, None, 2)
            },
        )
        .await
        .unwrap();
    assert_eq!(last.data.len(), 2);
    assert!(last.data.iter().all(Node::is_file));
}

#[tokio::test]
async fn test_personal_listing_is_owner_only() {
    let h = Harness::new();
    let alice = RequestContext::new(Uuid::new_v4());
    let bob = RequestContext::new(Uuid::new_v4());
    let mine = h.file(&alice, "mine.txt", None, RequestScope::personal()).await;
    h.file(&bob, "theirs.txt", None, RequestScope::personal()).await;
    let shared_member = h.member(MemberRole::Member);
    h.file(&shared_member, "project.txt", None, h.shared()).await;

    let page = h
        .services
        .listing
        .list_files(&alice, ListFilesRequest::default())
        .await
        .unwrap();
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].id, mine.id);
}

#[tokio::test]
async fn test_listing_scope_errors() {
    let h = Harness::new();
    let outsider = RequestContext::new(Uuid::new_v4());

    let err = h
        .services
        .listing
        .list_files(&outsider, shared_listing(&h, None, 10))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::BadRequest);

    let err = h
        .services
        .listing
        .list_files(
            &outsider,
            ListFilesRequest {
                team_id: Some(h.team),
                ..ListFilesRequest::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_get_folder_filters_children_for_members() {
    let h = Harness::new();
    let alice = h.member(MemberRole::Member);
    let bob = h.member(MemberRole::Member);
    let folder = h.folder(&alice, "Docs", None, Visibility::Team, vec![]).await;
    let private = h.file(&alice, "private.txt", Some(folder.id), h.shared()).await;
    let team = h.file(&alice, "team.txt", Some(folder.id), h.shared()).await;
    h.set_access(&team, Visibility::Team, vec![]).await;

    let contents = h
        .services
        .folders
        .get_folder(&bob, folder.id, h.shared(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(contents.folder.id, folder.id);
    let ids: Vec<Uuid> = contents.children.data.iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![team.id]);

    let contents = h
        .services
        .folders
        .get_folder(&alice, folder.id, h.shared(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(contents.children.pagination.total_items, 2);
    assert!(contents.children.data.iter().any(|n| n.id == private.id));

    let err = h
        .services
        .folders
        .get_folder(&bob, team.id, h.shared(), PageRequest::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::BadRequest);
}

#[tokio::test]
async fn test_lookup_omits_inaccessible_ids() {
    let h = Harness::new();
    let alice = h.member(MemberRole::Member);
    let bob = h.member(MemberRole::Member);
    let visible = h.file(&bob, "visible.txt", None, h.shared()).await;
    h.set_access(&visible, Visibility::Team, vec![]).await;
    let hidden = h.file(&bob, "hidden.txt", None, h.shared()).await;

    let nodes = h
        .services
        .listing
        .get_many_by_ids(
            &alice,
            LookupRequest {
                ids: vec![visible.id, hidden.id, Uuid::new_v4()],
                scope: h.shared(),
            },
        )
        .await
        .unwrap();
    let ids: Vec<Uuid> = nodes.iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![visible.id]);
}

#[tokio::test]
async fn test_huge_page_number_returns_an_empty_page() {
    let h = Harness::new();
    let alice = h.member(MemberRole::Member);
    h.file(&alice, "only.txt", None, h.shared()).await;

    let page = h
        .services
        .listing
        .list_files(
            &alice,
            ListFilesRequest {
                page: u64::MAX,
                ..shared_listing(&h, None, 100)
            },
        )
        .await
        .unwrap();
    assert!(page.data.is_empty());
    assert_eq!(page.pagination.total_items, 1);
    assert_eq!(page.pagination.current_page, u64::MAX);
}
