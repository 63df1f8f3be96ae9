mod common;

use common::{course, create_user, ctx_for, setup_app_data};
use coursehub_backend::coordinators::{CourseCoordinator, EnrollmentCoordinator};
use coursehub_backend::errors::ErrorKind;
use coursehub_backend::types::internal::context::RequestContext;

#[tokio::test]
async fn test_each_enrollment_bumps_course_counter() {
    let app_data = setup_app_data().await;
    let admin = create_user(&app_data, "admin", true).await;
    let u1 = create_user(&app_data, "u1", false).await;
    let u2 = create_user(&app_data, "u2", false).await;

    let courses = CourseCoordinator::new(app_data.clone());
    let enrollments = EnrollmentCoordinator::new(app_data.clone());

    let created = courses
        .create_course(&ctx_for(&admin), course("Counting", "Math", false))
        .await
        .unwrap();
    assert_eq!(created.enrollments, 0);

    enrollments.enroll(&ctx_for(&u1), created.id).await.unwrap();
    assert_eq!(courses.get_course(created.id).await.unwrap().enrollments, 1);

    enrollments.enroll(&ctx_for(&u2), created.id).await.unwrap();
    assert_eq!(courses.get_course(created.id).await.unwrap().enrollments, 2);
}

#[tokio::test]
async fn test_counter_tracks_enroll_and_unenroll_sequence() {
    let app_data = setup_app_data().await;
    let admin = create_user(&app_data, "admin", true).await;
    let courses = CourseCoordinator::new(app_data.clone());
    let enrollments = EnrollmentCoordinator::new(app_data.clone());

    let target = courses
        .create_course(&ctx_for(&admin), course("Target", "Math", false))
        .await
        .unwrap();

    let mut learners = Vec::new();
    for i in 0..4 {
        learners.push(create_user(&app_data, &format!("learner{}", i), false).await);
    }

    let mut ids = Vec::new();
    for learner in &learners {
        let enrolled = enrollments.enroll(&ctx_for(learner), target.id).await.unwrap();
        ids.push(enrolled.enrollment.id);
    }

    enrollments.unenroll(&ctx_for(&learners[1]), ids[1]).await.unwrap();
    enrollments.unenroll(&ctx_for(&learners[3]), ids[3]).await.unwrap();

    let rows = app_data
        .enrollment_store
        .list_by_course(&app_data.db, target.id)
        .await
        .unwrap();
    let current = courses.get_course(target.id).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(current.enrollments as usize, rows.len());

    // Re-enrolling after leaving is allowed
    enrollments.enroll(&ctx_for(&learners[1]), target.id).await.unwrap();
    assert_eq!(courses.get_course(target.id).await.unwrap().enrollments, 3);
}

#[tokio::test]
async fn test_duplicate_enrollment_leaves_counter_alone() {
    let app_data = setup_app_data().await;
    let admin = create_user(&app_data, "admin", true).await;
    let learner = create_user(&app_data, "learner", false).await;
    let courses = CourseCoordinator::new(app_data.clone());
    let enrollments = EnrollmentCoordinator::new(app_data.clone());

    let target = courses
        .create_course(&ctx_for(&admin), course("Once", "Math", false))
        .await
        .unwrap();

    enrollments.enroll(&ctx_for(&learner), target.id).await.unwrap();
    let err = enrollments.enroll(&ctx_for(&learner), target.id).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(courses.get_course(target.id).await.unwrap().enrollments, 1);
}

#[tokio::test]
async fn test_enrolling_in_missing_course_is_not_found() {
    let app_data = setup_app_data().await;
    let learner = create_user(&app_data, "learner", false).await;
    let enrollments = EnrollmentCoordinator::new(app_data.clone());

    let err = enrollments.enroll(&ctx_for(&learner), 4242).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_completion_follows_progress() {
    let app_data = setup_app_data().await;
    let admin = create_user(&app_data, "admin", true).await;
    let learner = create_user(&app_data, "learner", false).await;
    let courses = CourseCoordinator::new(app_data.clone());
    let enrollments = EnrollmentCoordinator::new(app_data.clone());
    let ctx = ctx_for(&learner);

    let target = courses
        .create_course(&ctx_for(&admin), course("Progress", "Math", false))
        .await
        .unwrap();
    let id = enrollments.enroll(&ctx, target.id).await.unwrap().enrollment.id;

    let done = enrollments.set_progress(&ctx, id, 100).await.unwrap();
    assert!(done.enrollment.completed);
    assert_eq!(done.enrollment.progress, 100);

    let back = enrollments.set_progress(&ctx, id, 50).await.unwrap();
    assert!(!back.enrollment.completed);
    assert_eq!(back.enrollment.progress, 50);

    for progress in [0, 1, 37, 99, 100] {
        let row = enrollments.set_progress(&ctx, id, progress).await.unwrap().enrollment;
        assert_eq!(row.completed, row.progress == 100);
    }
}

#[tokio::test]
async fn test_out_of_range_progress_is_rejected() {
    let app_data = setup_app_data().await;
    let admin = create_user(&app_data, "admin", true).await;
    let learner = create_user(&app_data, "learner", false).await;
    let courses = CourseCoordinator::new(app_data.clone());
    let enrollments = EnrollmentCoordinator::new(app_data.clone());
    let ctx = ctx_for(&learner);

    let target = courses
        .create_course(&ctx_for(&admin), course("Bounds", "Math", false))
        .await
        .unwrap();
    let id = enrollments.enroll(&ctx, target.id).await.unwrap().enrollment.id;
    enrollments.set_progress(&ctx, id, 40).await.unwrap();

    for bad in [-1, 101] {
        let err = enrollments.set_progress(&ctx, id, bad).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    let row = app_data.enrollment_store.require_by_id(&app_data.db, id).await.unwrap();
    assert_eq!(row.progress, 40);
}

#[tokio::test]
async fn test_other_users_cannot_touch_enrollment() {
    let app_data = setup_app_data().await;
    let admin = create_user(&app_data, "admin", true).await;
    let owner = create_user(&app_data, "owner", false).await;
    let stranger = create_user(&app_data, "stranger", false).await;
    let courses = CourseCoordinator::new(app_data.clone());
    let enrollments = EnrollmentCoordinator::new(app_data.clone());

    let target = courses
        .create_course(&ctx_for(&admin), course("Private", "Math", false))
        .await
        .unwrap();
    let id = enrollments.enroll(&ctx_for(&owner), target.id).await.unwrap().enrollment.id;

    let err = enrollments.set_progress(&ctx_for(&stranger), id, 10).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let err = enrollments.unenroll(&ctx_for(&stranger), id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let err = enrollments.complete(&RequestContext::for_api(None), id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthenticated);

    assert_eq!(courses.get_course(target.id).await.unwrap().enrollments, 1);
}

#[tokio::test]
async fn test_course_delete_removes_its_enrollments() {
    let app_data = setup_app_data().await;
    let admin = create_user(&app_data, "admin", true).await;
    let learner = create_user(&app_data, "learner", false).await;
    let courses = CourseCoordinator::new(app_data.clone());
    let enrollments = EnrollmentCoordinator::new(app_data.clone());

    let target = courses
        .create_course(&ctx_for(&admin), course("Doomed", "Math", false))
        .await
        .unwrap();
    enrollments.enroll(&ctx_for(&learner), target.id).await.unwrap();

    courses.delete_course(&ctx_for(&admin), target.id).await.unwrap();

    assert!(enrollments.list_mine(&ctx_for(&learner)).await.unwrap().is_empty());
    let err = courses.get_course(target.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
