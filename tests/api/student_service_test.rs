//! StudentService against the in-memory repository

use super::{create_input, phone, student, TestStudentRepository};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use students_core::domain::{
    PatchPhoneNumberInput, PhoneNumber, StringUuid, StudentFilter, UpdateStudentInput,
};
use students_core::error::AppError;
use students_core::service::StudentService;

fn service() -> (Arc<TestStudentRepository>, StudentService<TestStudentRepository>) {
    let repo = Arc::new(TestStudentRepository::new());
    (repo.clone(), StudentService::new(repo))
}

#[tokio::test]
async fn test_create_then_get_returns_same_fields() {
    let (_, service) = service();
    let mut input = create_input("Ana Silva", "2024001");
    input.phone_numbers = vec![phone(51, 999_999_999, "mobile")];

    let created = service.create(input.clone()).await.unwrap();
    let fetched = service.get(created.id).await.unwrap();

    assert_eq!(fetched, created);
    assert_eq!(fetched.name, input.name);
    assert_eq!(fetched.enrollment, input.enrollment);
    assert_eq!(fetched.email, input.email);
    assert_eq!(fetched.course_curriculum, input.course_curriculum);
    assert_eq!(fetched.phone_numbers, input.phone_numbers);
    assert_eq!(fetched.classes, input.classes);
}

#[tokio::test]
async fn test_second_student_with_same_enrollment_conflicts() {
    let (repo, service) = service();
    let first = create_input("Ana", "2024001");
    service.create(first).await.unwrap();

    let mut duplicate = create_input("Bruno", "2024001");
    duplicate.email = "bruno@school.test".to_string();
    let result = service.create(duplicate).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert_eq!(repo.count().await, 1);
}

#[tokio::test]
async fn test_update_into_existing_email_conflicts() {
    let (_, service) = service();
    let ana = service.create(create_input("Ana", "1")).await.unwrap();
    let bruno = service.create(create_input("Bruno", "2")).await.unwrap();

    let result = service
        .update(
            bruno.id,
            UpdateStudentInput {
                email: Some(ana.email.clone()),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_list_by_name_is_case_sensitive_substring() {
    let (repo, service) = service();
    repo.add_student(student("Ana Silva", "1")).await;
    repo.add_student(student("Joana Ana", "2")).await;
    repo.add_student(student("Mariana", "3")).await;
    repo.add_student(student("Bruno", "4")).await;

    let found = service
        .list(StudentFilter {
            name: Some("Ana".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let names: Vec<&str> = found.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Ana Silva", "Joana Ana"]);
}

#[tokio::test]
async fn test_list_by_enrollment_and_email_is_exact() {
    let (repo, service) = service();
    repo.add_student(student("Ana", "2024001")).await;
    repo.add_student(student("Ana", "2024001-b")).await;

    let found = service
        .list(StudentFilter {
            enrollment: Some("2024001".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(found.len(), 1);

    let none = service
        .list(StudentFilter {
            enrollment: Some("2024001".to_string()),
            email: Some("2024001-b@school.test".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let (repo, service) = service();
    let created = service.create(create_input("Ana", "1")).await.unwrap();

    service.delete(created.id).await.unwrap();
    service.delete(created.id).await.unwrap();
    service.delete(StringUuid::new_v4()).await.unwrap();

    assert_eq!(repo.count().await, 0);
    assert!(matches!(
        service.get(created.id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_phone_lifecycle() {
    let (_, service) = service();
    let created = service.create(create_input("Ana", "1")).await.unwrap();

    let a = phone(51, 1111, "a");
    let b = phone(51, 2222, "b");
    let c = phone(51, 3333, "c");
    for (expected_index, p) in [&a, &b, &c].into_iter().enumerate() {
        let (index, _) = service
            .add_phone_number(created.id, p.clone())
            .await
            .unwrap();
        assert_eq!(index, expected_index);
    }

    service.remove_phone_number(created.id, 1).await.unwrap();
    let phones = service.list_phone_numbers(created.id).await.unwrap();
    assert_eq!(phones, vec![a.clone(), c.clone()]);

    let err = service.get_phone_number(created.id, 2).await.unwrap_err();
    assert!(matches!(err, AppError::IndexOutOfRange { index: 2, len: 2 }));
}

#[tokio::test]
async fn test_merge_keeps_values_sent_as_zero() {
    let (_, service) = service();
    let mut input = create_input("Ana", "1");
    input.phone_numbers = vec![phone(51, 999_999_999, "mobile")];
    let created = service.create(input).await.unwrap();

    service
        .merge_phone_number(
            created.id,
            0,
            PatchPhoneNumberInput {
                ddd: Some(0),
                number: Some(0),
                description: Some("home".to_string()),
            },
        )
        .await
        .unwrap();

    let stored = service.get_phone_number(created.id, 0).await.unwrap();
    assert_eq!(stored, phone(51, 999_999_999, "home"));
    assert_eq!(
        service.get(created.id).await.unwrap().classes,
        created.classes
    );
}

#[tokio::test]
async fn test_replace_persists_every_field() {
    let (_, service) = service();
    let mut input = create_input("Ana", "1");
    input.phone_numbers = vec![phone(51, 999_999_999, "mobile")];
    let created = service.create(input).await.unwrap();

    let replacement = PhoneNumber {
        ddd: 11,
        number: 0,
        description: None,
    };
    service
        .replace_phone_number(created.id, 0, replacement.clone())
        .await
        .unwrap();

    assert_eq!(
        service.list_phone_numbers(created.id).await.unwrap(),
        vec![replacement]
    );
}
