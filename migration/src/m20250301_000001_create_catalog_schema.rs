use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Users. The store lowercases usernames into username_normalized and
        // emails in place, so both unique keys are case-insensitive.
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Users::Username).string().not_null())
                    .col(ColumnDef::new(Users::UsernameNormalized).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::FirstName).string().null())
                    .col(ColumnDef::new(Users::LastName).string().null())
                    .col(ColumnDef::new(Users::IsAdmin).boolean().not_null().default(false))
                    .col(ColumnDef::new(Users::IsProtected).boolean().not_null().default(false))
                    .col(ColumnDef::new(Users::HasUnreadMessages).boolean().not_null().default(false))
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Courses::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Courses::Title).string().not_null())
                    .col(ColumnDef::new(Courses::Description).text().not_null())
                    .col(ColumnDef::new(Courses::Price).integer().not_null())
                    .col(ColumnDef::new(Courses::Duration).string().not_null())
                    .col(ColumnDef::new(Courses::Level).string().not_null())
                    .col(ColumnDef::new(Courses::ImageUrl).string().not_null())
                    .col(ColumnDef::new(Courses::Instructor).string().not_null())
                    .col(ColumnDef::new(Courses::Category).string().not_null())
                    // JSON array of strings
                    .col(ColumnDef::new(Courses::Tags).text().not_null())
                    .col(ColumnDef::new(Courses::Featured).boolean().not_null().default(false))
                    .col(ColumnDef::new(Courses::Enrollments).integer().not_null().default(0))
                    .col(ColumnDef::new(Courses::Rating).integer().not_null().default(0))
                    .col(ColumnDef::new(Courses::Reviews).integer().not_null().default(0))
                    // JSON object: { "sections": [...] }
                    .col(ColumnDef::new(Courses::Content).text().not_null())
                    .col(ColumnDef::new(Courses::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Courses::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_courses_category")
                    .table(Courses::Table)
                    .col(Courses::Category)
                    .to_owned(),
            )
            .await?;

        // No foreign keys: cascades are handled by the application.
        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Enrollments::Id).integer().not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(Enrollments::UserId).integer().not_null())
                    .col(ColumnDef::new(Enrollments::CourseId).integer().not_null())
                    .col(ColumnDef::new(Enrollments::EnrolledAt).big_integer().not_null())
                    .col(ColumnDef::new(Enrollments::Completed).boolean().not_null().default(false))
                    .col(ColumnDef::new(Enrollments::Progress).integer().not_null().default(0))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_enrollments_user_id")
                    .table(Enrollments::Table)
                    .col(Enrollments::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_enrollments_course_id")
                    .table(Enrollments::Table)
                    .col(Enrollments::CourseId)
                    .to_owned(),
            )
            .await?;

        // One enrollment per (user, course)
        manager
            .create_index(
                Index::create()
                    .name("idx_enrollments_user_course")
                    .table(Enrollments::Table)
                    .col(Enrollments::UserId)
                    .col(Enrollments::CourseId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Enrollments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    UsernameNormalized,
    Email,
    PasswordHash,
    FirstName,
    LastName,
    IsAdmin,
    IsProtected,
    HasUnreadMessages,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Courses {
    Table,
    Id,
    Title,
    Description,
    Price,
    Duration,
    Level,
    ImageUrl,
    Instructor,
    Category,
    Tags,
    Featured,
    Enrollments,
    Rating,
    Reviews,
    Content,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Enrollments {
    Table,
    Id,
    UserId,
    CourseId,
    EnrolledAt,
    Completed,
    Progress,
}
