mod common;

use common::{seed_sample_users, test_service};
use futures_util::future::join_all;
use rstest::rstest;
use std::io;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;
use user_server::domain::error::DomainError;
use user_server::domain::validation::UserPayload;

fn payload<'a>(name: &'a str, email: &'a str, password: &'a str) -> UserPayload<'a> {
    UserPayload {
        name: Some(name),
        email: Some(email),
        password: Some(password),
    }
}

#[actix_web::test]
async fn created_user_reads_back_without_password() {
    let service = test_service().await;
    let created = service
        .create_user(payload("Test User", "testuser@example.com", "strongpass"))
        .await
        .expect("create");

    let fetched = service.get_user(created.id).await.expect("get");
    assert_eq!(fetched.name, "Test User");
    assert_eq!(fetched.email, "testuser@example.com");

    let json = serde_json::to_value(&fetched).expect("serialize");
    let keys: Vec<_> = json.as_object().expect("object").keys().cloned().collect();
    assert_eq!(keys.len(), 3);
    assert!(json.get("password").is_none());
}

#[actix_web::test]
async fn ids_are_assigned_monotonically() {
    let service = test_service().await;
    let users = seed_sample_users(&service).await;
    assert!(users.windows(2).all(|pair| pair[0].id < pair[1].id));
}

#[actix_web::test]
async fn concurrent_duplicate_emails_admit_one() {
    let service = test_service().await;
    let attempts = join_all((0..4).map(|i| {
        let service = service.clone();
        async move {
            let name = format!("Racer {}", i);
            service
                .create_user(UserPayload {
                    name: Some(name.as_str()),
                    email: Some("race@example.com"),
                    password: Some("strongpass"),
                })
                .await
        }
    }))
    .await;

    let created = attempts.iter().filter(|r| r.is_ok()).count();
    let conflicts = attempts
        .iter()
        .filter(|r| matches!(r, Err(DomainError::EmailAlreadyExists)))
        .count();
    assert_eq!(created, 1);
    assert_eq!(conflicts, 3);
    assert_eq!(service.list_users().await.expect("list").len(), 1);
}

#[actix_web::test]
async fn validation_runs_before_the_store() {
    let service = test_service().await;
    let err = service
        .create_user(payload("Bad Email", "notanemail", "123456"))
        .await
        .expect_err("invalid email");
    assert!(matches!(err, DomainError::InvalidInput(ref m) if m == "Invalid email format"));
    assert!(service.list_users().await.expect("list").is_empty());
}

#[actix_web::test]
async fn delete_then_get_is_not_found() {
    let service = test_service().await;
    let users = seed_sample_users(&service).await;
    let id = users[0].id;

    service.delete_user(id).await.expect("delete");
    assert!(matches!(
        service.get_user(id).await,
        Err(DomainError::UserNotFound(missing)) if missing == id
    ));
    assert!(matches!(
        service.delete_user(id).await,
        Err(DomainError::UserNotFound(_))
    ));
}

#[rstest]
#[case(UserPayload { name: Some("Valid"), email: Some("valid@example.com"), password: None })]
#[case(UserPayload { name: None, email: Some("bad"), password: None })]
#[case(UserPayload::default())]
#[actix_web::test]
async fn update_of_unknown_id_is_not_found(#[case] update: UserPayload<'static>) {
    let service = test_service().await;
    seed_sample_users(&service).await;

    let err = service.update_user(9_999, update).await.expect_err("missing");
    assert!(matches!(err, DomainError::UserNotFound(9_999)));
}

#[actix_web::test]
async fn update_changes_name_and_email_only() {
    let service = test_service().await;
    let users = seed_sample_users(&service).await;
    let john = &users[0];

    service
        .update_user(
            john.id,
            UserPayload {
                name: Some("Johnny Doe"),
                email: Some("johnny@example.com"),
                password: Some("ignored"),
            },
        )
        .await
        .expect("update");

    let fetched = service.get_user(john.id).await.expect("get");
    assert_eq!(fetched.name, "Johnny Doe");
    assert_eq!(fetched.email, "johnny@example.com");

    let outcome = service
        .login(Some("johnny@example.com"), Some(john.password))
        .await
        .expect("password unchanged");
    assert_eq!(outcome.user_id, john.id);
}

#[actix_web::test]
async fn update_to_taken_email_conflicts() {
    let service = test_service().await;
    let users = seed_sample_users(&service).await;

    let err = service
        .update_user(
            users[0].id,
            UserPayload {
                name: Some("John Doe"),
                email: Some(users[1].email),
                password: None,
            },
        )
        .await
        .expect_err("taken");
    assert!(matches!(err, DomainError::EmailAlreadyExists));
}

#[actix_web::test]
async fn search_matches_substrings() {
    let service = test_service().await;
    seed_sample_users(&service).await;

    let mut names: Vec<_> = service
        .search_users("oh")
        .await
        .expect("search")
        .into_iter()
        .map(|u| u.name)
        .collect();
    names.sort();
    assert_eq!(names, vec!["Bob Johnson", "John Doe"]);

    assert!(service.search_users("zzz").await.expect("search").is_empty());
}

#[actix_web::test]
async fn search_treats_wildcards_literally() {
    let service = test_service().await;
    seed_sample_users(&service).await;

    assert!(service.search_users("%").await.expect("search").is_empty());
    assert!(service.search_users("_").await.expect("search").is_empty());
}

#[actix_web::test]
async fn empty_search_is_invalid() {
    let service = test_service().await;
    let err = service.search_users("").await.expect_err("empty");
    assert!(
        matches!(err, DomainError::InvalidInput(ref m) if m == "Please provide a name to search")
    );
}

#[actix_web::test]
async fn login_outcomes() {
    let service = test_service().await;
    let users = seed_sample_users(&service).await;
    let jane = &users[1];

    let ok = service
        .login(Some(jane.email), Some(jane.password))
        .await
        .expect("login");
    assert_eq!(ok.user_id, jane.id);

    assert!(matches!(
        service.login(Some(jane.email), Some("wrongpass")).await,
        Err(DomainError::LoginFailed)
    ));
    assert!(matches!(
        service.login(Some("nobody@example.com"), Some("whatever")).await,
        Err(DomainError::LoginFailed)
    ));
    assert!(matches!(
        service.login(Some(jane.email), None).await,
        Err(DomainError::InvalidInput(_))
    ));
    assert!(matches!(
        service.login(Some(""), Some("secret456")).await,
        Err(DomainError::InvalidInput(_))
    ));
}

#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().expect("log buffer")).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("log buffer").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[actix_web::test]
async fn logs_carry_ids_not_emails_or_passwords() {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_max_level(tracing::Level::TRACE)
        .json()
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let service = test_service().await;
    let new_user = payload("Private Person", "private.person@example.com", "hunter2pass");
    let created = service.create_user(new_user).await.expect("create");
    let _ = service.create_user(new_user).await;
    let _ = service
        .login(Some("private.person@example.com"), Some("hunter2pass"))
        .await;
    let _ = service
        .login(Some("private.person@example.com"), Some("wrongpass"))
        .await;
    let _ = service
        .login(Some("unknown.person@example.com"), Some("wrongpass"))
        .await;

    let output = logs.contents();
    assert!(output.contains("user created"));
    assert!(output.contains(&format!("\"user_id\":{}", created.id)));
    for secret in [
        "private.person@example.com",
        "unknown.person@example.com",
        "hunter2pass",
        "wrongpass",
    ] {
        assert!(!output.contains(secret), "log output leaked {}", secret);
    }
}
