mod common;

use common::{create_user, ctx_for, setup_app_data};
use coursehub_backend::coordinators::MessageCoordinator;
use coursehub_backend::errors::ErrorKind;
use coursehub_backend::types::internal::context::RequestContext;
use coursehub_backend::types::internal::message::{MessageStatus, NewMessage};

fn contact(subject: &str) -> NewMessage {
    NewMessage {
        user_id: None,
        name: "Visitor".to_string(),
        email: "visitor@example.com".to_string(),
        subject: subject.to_string(),
        body: "Is there a discount for students?".to_string(),
    }
}

#[tokio::test]
async fn test_admin_reply_to_anonymous_message_marks_replied() {
    let app_data = setup_app_data().await;
    let admin = create_user(&app_data, "admin", true).await;
    let messages = MessageCoordinator::new(app_data.clone());

    let message = messages
        .submit(&RequestContext::for_api(None), contact("Pricing"))
        .await
        .unwrap();
    assert_eq!(message.status, "unread");
    assert!(message.user_id.is_none());

    let reply = messages
        .add_reply(&ctx_for(&admin), message.id, "Yes, 20% off.".to_string())
        .await
        .unwrap();
    assert!(reply.is_admin);
    assert!(!reply.read);

    let thread = messages.open_message(&ctx_for(&admin), message.id).await.unwrap();
    assert_eq!(thread.message.status, "replied");
    assert_eq!(thread.replies.len(), 1);
}

#[tokio::test]
async fn test_admin_reply_flags_registered_sender() {
    let app_data = setup_app_data().await;
    let admin = create_user(&app_data, "admin", true).await;
    let sender = create_user(&app_data, "sender", false).await;
    let messages = MessageCoordinator::new(app_data.clone());

    // Submitting raises the flag and viewing own threads clears it
    let message = messages.submit(&ctx_for(&sender), contact("Refund")).await.unwrap();
    assert_eq!(message.user_id, Some(sender.id));
    messages.list_mine(&ctx_for(&sender)).await.unwrap();
    let fresh = app_data.user_store.require_by_id(&app_data.db, sender.id).await.unwrap();
    assert!(!fresh.has_unread_messages);

    messages
        .add_reply(&ctx_for(&admin), message.id, "Processed.".to_string())
        .await
        .unwrap();

    let flagged = app_data.user_store.require_by_id(&app_data.db, sender.id).await.unwrap();
    assert!(flagged.has_unread_messages);
    let stored = app_data.message_store.require_by_id(&app_data.db, message.id).await.unwrap();
    assert_eq!(stored.status, MessageStatus::Replied.as_str());

    // Viewing the thread acknowledges the reply
    let threads = messages.list_mine(&ctx_for(&sender)).await.unwrap();
    assert_eq!(threads.len(), 1);
    assert!(threads[0].replies.iter().all(|r| r.read));
    let cleared = app_data.user_store.require_by_id(&app_data.db, sender.id).await.unwrap();
    assert!(!cleared.has_unread_messages);
}

#[tokio::test]
async fn test_mark_reply_read_is_idempotent() {
    let app_data = setup_app_data().await;
    let admin = create_user(&app_data, "admin", true).await;
    let sender = create_user(&app_data, "sender", false).await;
    let messages = MessageCoordinator::new(app_data.clone());

    let message = messages.submit(&ctx_for(&sender), contact("Access")).await.unwrap();
    let reply = messages
        .add_reply(&ctx_for(&admin), message.id, "Try again now.".to_string())
        .await
        .unwrap();

    let first = messages.mark_reply_read(&ctx_for(&sender), reply.id).await.unwrap();
    let second = messages.mark_reply_read(&ctx_for(&sender), reply.id).await.unwrap();
    assert!(first.read);
    assert_eq!(first, second);

    let err = messages.mark_reply_read(&ctx_for(&sender), 9999).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_only_participants_can_reply() {
    let app_data = setup_app_data().await;
    let sender = create_user(&app_data, "sender", false).await;
    let stranger = create_user(&app_data, "stranger", false).await;
    let messages = MessageCoordinator::new(app_data.clone());

    let message = messages.submit(&ctx_for(&sender), contact("Mine")).await.unwrap();

    let own = messages
        .add_reply(&ctx_for(&sender), message.id, "Any update?".to_string())
        .await
        .unwrap();
    assert!(!own.is_admin);

    let err = messages
        .add_reply(&ctx_for(&stranger), message.id, "Hello".to_string())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let err = messages
        .add_reply(&ctx_for(&sender), 777, "Lost".to_string())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_inbox_is_admin_only_and_counts_unread() {
    let app_data = setup_app_data().await;
    let admin = create_user(&app_data, "admin", true).await;
    let user = create_user(&app_data, "user", false).await;
    let messages = MessageCoordinator::new(app_data.clone());
    let anonymous = RequestContext::for_api(None);

    let first = messages.submit(&anonymous, contact("One")).await.unwrap();
    messages.submit(&anonymous, contact("Two")).await.unwrap();

    let err = messages.list_all(&ctx_for(&user)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
    let err = messages.unread_count(&anonymous).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthenticated);

    assert_eq!(messages.unread_count(&ctx_for(&admin)).await.unwrap(), 2);
    messages.open_message(&ctx_for(&admin), first.id).await.unwrap();
    assert_eq!(messages.unread_count(&ctx_for(&admin)).await.unwrap(), 1);

    let pending = messages
        .set_status(&ctx_for(&admin), first.id, MessageStatus::Pending)
        .await
        .unwrap();
    assert_eq!(pending.status, "pending");

    messages.delete_message(&ctx_for(&admin), first.id).await.unwrap();
    assert_eq!(messages.list_all(&ctx_for(&admin)).await.unwrap().len(), 1);
}
