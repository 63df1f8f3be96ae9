use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Messages::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Messages::Id).integer().not_null().auto_increment().primary_key())
                    // Null for anonymous senders
                    .col(ColumnDef::new(Messages::UserId).integer().null())
                    .col(ColumnDef::new(Messages::Name).string().not_null())
                    .col(ColumnDef::new(Messages::Email).string().not_null())
                    .col(ColumnDef::new(Messages::Subject).string().not_null())
                    .col(ColumnDef::new(Messages::Body).text().not_null())
                    .col(ColumnDef::new(Messages::Status).string_len(16).not_null().default("unread"))
                    .col(ColumnDef::new(Messages::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_messages_user_id")
                    .table(Messages::Table)
                    .col(Messages::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_messages_status")
                    .table(Messages::Table)
                    .col(Messages::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MessageReplies::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(MessageReplies::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(MessageReplies::MessageId).integer().not_null())
                    .col(ColumnDef::new(MessageReplies::AuthorId).integer().not_null())
                    .col(ColumnDef::new(MessageReplies::Content).text().not_null())
                    .col(ColumnDef::new(MessageReplies::IsAdmin).boolean().not_null().default(false))
                    .col(ColumnDef::new(MessageReplies::Read).boolean().not_null().default(false))
                    .col(ColumnDef::new(MessageReplies::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_message_replies_message_id")
                    .table(MessageReplies::Table)
                    .col(MessageReplies::MessageId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MessageReplies::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Messages::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Messages {
    Table,
    Id,
    UserId,
    Name,
    Email,
    Subject,
    Body,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum MessageReplies {
    Table,
    Id,
    MessageId,
    AuthorId,
    Content,
    IsAdmin,
    Read,
    CreatedAt,
}
