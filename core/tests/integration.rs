//! Full lifecycle tests against the live mock server.
//!
//! # Design
//! Each test starts its own mock server on a random port, then drives the
//! core `Client` over real HTTP through the default ureq transport.

use dataminded_core::{
    ApiError, ChapterAttributes, ChapterKind, ChapterMemberKind, ChapterRole, Client, Connection,
    MemberKey, MemberRole, NewChapterMember, ReadOutcome, UserAttributes, UserKind,
};

fn start_server() -> Client {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    Client::new(Connection::new("http://127.0.0.1", addr.port()))
}

fn user(name: &str) -> UserAttributes {
    UserAttributes {
        name: name.to_string(),
    }
}

#[test]
fn user_lifecycle() {
    let client = start_server();

    // Step 1: list — should be empty.
    let users = client.list::<UserKind>().unwrap();
    assert!(users.is_empty(), "expected empty list");

    // Step 2: create, then read back the same attributes.
    let created = client.create::<UserKind>(&user("u_k3x9a")).unwrap();
    assert_eq!(created.name, "u_k3x9a");
    let fetched = client.read::<UserKind>(&created.id).unwrap();
    assert_eq!(fetched, ReadOutcome::Found(created.clone()));

    // Step 3: reads are idempotent.
    let again = client.read::<UserKind>(&created.id).unwrap();
    assert_eq!(again, fetched);

    // Step 4: list contains exactly one entity with the marker name.
    let users = client.list::<UserKind>().unwrap();
    assert_eq!(users.iter().filter(|u| u.name == "u_k3x9a").count(), 1);

    // Step 5: update changes the name, never the id.
    let updated = client
        .update::<UserKind>(&created.id, &user("u_k3x9a-new"))
        .unwrap();
    assert_eq!(updated.id, created.id);
    let fetched = client.read::<UserKind>(&created.id).unwrap();
    assert_eq!(fetched.found().unwrap().name, "u_k3x9a-new");

    // Step 6: delete, then read reports not found.
    client.delete::<UserKind>(&created.id).unwrap();
    let outcome = client.read::<UserKind>(&created.id).unwrap();
    assert!(!outcome.exists());

    // Step 7: second delete is rejected.
    let err = client.delete::<UserKind>(&created.id).unwrap_err();
    assert!(matches!(err, ApiError::Rejected { status: 404, .. }));
}

#[test]
fn chapter_lifecycle() {
    let client = start_server();

    let created = client
        .create::<ChapterKind>(&ChapterAttributes {
            name: "abc12".to_string(),
        })
        .unwrap();
    assert_eq!(created.name, "abc12");

    let renamed = client
        .update::<ChapterKind>(
            &created.id,
            &ChapterAttributes {
                name: "abc12-new".to_string(),
            },
        )
        .unwrap();
    assert_eq!(renamed.id, created.id);
    assert_eq!(renamed.name, "abc12-new");

    let chapters = client.list::<ChapterKind>().unwrap();
    assert_eq!(chapters, vec![renamed]);

    client.delete::<ChapterKind>(&created.id).unwrap();
    assert_eq!(
        client.read::<ChapterKind>(&created.id).unwrap(),
        ReadOutcome::NotFound
    );
}

#[test]
fn never_created_ids_are_not_found() {
    let client = start_server();

    assert!(!client.read::<UserKind>(&23_061_914_1234).unwrap().exists());
    assert!(!client.read::<ChapterKind>(&5).unwrap().exists());
    assert!(!client
        .read::<ChapterMemberKind>(&MemberKey::new(5, 5))
        .unwrap()
        .exists());
}

#[test]
fn update_of_vanished_entity_is_an_error() {
    let client = start_server();

    let err = client.update::<UserKind>(&77, &user("ghost")).unwrap_err();
    assert!(matches!(err, ApiError::Vanished { kind: "user", .. }));
}

#[test]
fn names_with_special_characters_survive() {
    let client = start_server();

    let name = "quote \" backslash \\ newline \n tab \t";
    let created = client.create::<UserKind>(&user(name)).unwrap();
    assert_eq!(created.name, name);
    let fetched = client.read::<UserKind>(&created.id).unwrap();
    assert_eq!(fetched.found().unwrap().name, name);
}

#[test]
fn chapter_member_lifecycle() {
    let client = start_server();

    let member_user = client.create::<UserKind>(&user("user_abc12")).unwrap();
    let chapter = client
        .create::<ChapterKind>(&ChapterAttributes {
            name: "abc12".to_string(),
        })
        .unwrap();
    let key = MemberKey::new(chapter.id, member_user.id);

    // Create with the default role.
    let created = client
        .create::<ChapterMemberKind>(&NewChapterMember {
            key,
            role: ChapterRole::default(),
        })
        .unwrap();
    assert_eq!(created.key(), key);
    let fetched = client.read::<ChapterMemberKind>(&key).unwrap();
    assert_eq!(fetched.found().unwrap().role(), ChapterRole::Contributor);

    // A duplicate is rejected with both ids and the service's message.
    let err = client
        .create::<ChapterMemberKind>(&NewChapterMember {
            key,
            role: ChapterRole::Lead,
        })
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains(&format!("chapter member {key}")), "{message}");
    assert!(message.contains("already a member"), "{message}");

    // Promote to lead.
    client
        .update::<ChapterMemberKind>(
            &key,
            &MemberRole {
                role: ChapterRole::Lead,
            },
        )
        .unwrap();
    let fetched = client.read::<ChapterMemberKind>(&key).unwrap();
    assert_eq!(fetched.found().unwrap().role(), ChapterRole::Lead);

    // Listing, globally and per chapter.
    assert_eq!(client.list::<ChapterMemberKind>().unwrap().len(), 1);
    let in_chapter = client.list_chapter_members(chapter.id).unwrap();
    assert_eq!(in_chapter.len(), 1);
    assert_eq!(in_chapter[0].user_id, member_user.id);

    // Delete, then the membership is gone.
    client.delete::<ChapterMemberKind>(&key).unwrap();
    assert_eq!(
        client.read::<ChapterMemberKind>(&key).unwrap(),
        ReadOutcome::NotFound
    );
    let err = client.delete::<ChapterMemberKind>(&key).unwrap_err();
    assert!(err.to_string().contains(&format!("deleting chapter member {key}")));
}

#[test]
fn member_for_missing_user_is_rejected() {
    let client = start_server();

    let chapter = client
        .create::<ChapterKind>(&ChapterAttributes {
            name: "lonely".to_string(),
        })
        .unwrap();
    let err = client
        .create::<ChapterMemberKind>(&NewChapterMember {
            key: MemberKey::new(chapter.id, 404),
            role: ChapterRole::Lead,
        })
        .unwrap_err();
    assert_eq!(err.status(), Some(422));
}
