use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn id_column<T: IntoIden>(iden: T) -> ColumnDef {
    ColumnDef::new(iden)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AcademicYears::Table)
                    .if_not_exists()
                    .col(id_column(AcademicYears::Id))
                    .col(ColumnDef::new(AcademicYears::Name).string().not_null().unique_key())
                    .col(ColumnDef::new(AcademicYears::IsActive).boolean().not_null().default(false))
                    .col(ColumnDef::new(AcademicYears::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Subjects::Table)
                    .if_not_exists()
                    .col(id_column(Subjects::Id))
                    .col(ColumnDef::new(Subjects::Name).string().not_null())
                    .col(ColumnDef::new(Subjects::Code).string().not_null().unique_key())
                    .col(ColumnDef::new(Subjects::Description).string().null())
                    .col(ColumnDef::new(Subjects::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Levels::Table)
                    .if_not_exists()
                    .col(id_column(Levels::Id))
                    .col(ColumnDef::new(Levels::Name).string().not_null())
                    .col(ColumnDef::new(Levels::Code).string().not_null())
                    .col(ColumnDef::new(Levels::Category).string().not_null())
                    .col(ColumnDef::new(Levels::AcademicYear).string().not_null())
                    .col(ColumnDef::new(Levels::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TeacherEnrollments::Table)
                    .if_not_exists()
                    .col(id_column(TeacherEnrollments::Id))
                    .col(ColumnDef::new(TeacherEnrollments::TeacherId).string().not_null())
                    .col(ColumnDef::new(TeacherEnrollments::AcademicYear).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Classes::Table)
                    .if_not_exists()
                    .col(id_column(Classes::Id))
                    .col(ColumnDef::new(Classes::Name).string().not_null())
                    .col(ColumnDef::new(Classes::LevelId).integer().not_null())
                    .col(ColumnDef::new(Classes::AcademicYear).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Chapters::Table)
                    .if_not_exists()
                    .col(id_column(Chapters::Id))
                    .col(ColumnDef::new(Chapters::Name).string().not_null())
                    .col(ColumnDef::new(Chapters::SubjectId).integer().not_null())
                    .col(ColumnDef::new(Chapters::LevelId).integer().not_null())
                    .col(ColumnDef::new(Chapters::AcademicYear).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Lessons::Table)
                    .if_not_exists()
                    .col(id_column(Lessons::Id))
                    .col(ColumnDef::new(Lessons::ChapterId).integer().not_null())
                    .col(ColumnDef::new(Lessons::TeacherId).string().not_null())
                    .col(ColumnDef::new(Lessons::Title).string().not_null())
                    .col(ColumnDef::new(Lessons::Objectives).string().null())
                    .col(ColumnDef::new(Lessons::PlannedDate).string().not_null())
                    .col(ColumnDef::new(Lessons::PlannedDuration).integer().not_null())
                    .col(ColumnDef::new(Lessons::OrderIndex).integer().not_null().default(0))
                    .col(ColumnDef::new(Lessons::CompletedAt).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_lessons_chapter_id")
                            .from(Lessons::Table, Lessons::ChapterId)
                            .to(Chapters::Table, Chapters::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InspectorAssignments::Table)
                    .if_not_exists()
                    .col(id_column(InspectorAssignments::Id))
                    .col(ColumnDef::new(InspectorAssignments::InspectorId).string().not_null())
                    .col(ColumnDef::new(InspectorAssignments::TeacherId).string().not_null())
                    .col(ColumnDef::new(InspectorAssignments::AcademicYear).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SgAssignments::Table)
                    .if_not_exists()
                    .col(id_column(SgAssignments::Id))
                    .col(ColumnDef::new(SgAssignments::SgId).string().not_null())
                    .col(ColumnDef::new(SgAssignments::LevelId).integer().not_null())
                    .col(ColumnDef::new(SgAssignments::AcademicYear).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_levels_academic_year")
                    .table(Levels::Table)
                    .col(Levels::AcademicYear)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_chapters_academic_year")
                    .table(Chapters::Table)
                    .col(Chapters::AcademicYear)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SgAssignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InspectorAssignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Lessons::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Chapters::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Classes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TeacherEnrollments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Levels::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Subjects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AcademicYears::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum AcademicYears {
    Table,
    Id,
    Name,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Subjects {
    Table,
    Id,
    Name,
    Code,
    Description,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Levels {
    Table,
    Id,
    Name,
    Code,
    Category,
    AcademicYear,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TeacherEnrollments {
    Table,
    Id,
    TeacherId,
    AcademicYear,
}

#[derive(DeriveIden)]
enum Classes {
    Table,
    Id,
    Name,
    LevelId,
    AcademicYear,
}

#[derive(DeriveIden)]
enum Chapters {
    Table,
    Id,
    Name,
    SubjectId,
    LevelId,
    AcademicYear,
}

#[derive(DeriveIden)]
enum Lessons {
    Table,
    Id,
    ChapterId,
    TeacherId,
    Title,
    Objectives,
    PlannedDate,
    PlannedDuration,
    OrderIndex,
    CompletedAt,
}

#[derive(DeriveIden)]
enum InspectorAssignments {
    Table,
    Id,
    InspectorId,
    TeacherId,
    AcademicYear,
}

#[derive(DeriveIden)]
enum SgAssignments {
    Table,
    Id,
    SgId,
    LevelId,
    AcademicYear,
}
