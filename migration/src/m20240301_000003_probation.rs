use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum ProbationRecord {
    Table,
    Id,
    EmployeeId,
    StartDate,
    EndDate,
    Notes,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ProbationEvaluation {
    Table,
    Id,
    ProbationId,
    Evaluator,
    EvaluationDate,
    Rating,
    Recommendation,
    ExtensionDays,
    Comments,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Employee {
    Table,
    Id,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProbationRecord::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProbationRecord::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProbationRecord::EmployeeId).integer().not_null())
                    .col(ColumnDef::new(ProbationRecord::StartDate).date().not_null())
                    .col(ColumnDef::new(ProbationRecord::EndDate).date().not_null())
                    .col(ColumnDef::new(ProbationRecord::Notes).text())
                    .col(
                        ColumnDef::new(ProbationRecord::Status)
                            .string_len(32)
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(ProbationRecord::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProbationRecord::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_probation_record_employee")
                            .from(ProbationRecord::Table, ProbationRecord::EmployeeId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProbationEvaluation::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProbationEvaluation::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ProbationEvaluation::ProbationId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProbationEvaluation::Evaluator)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProbationEvaluation::EvaluationDate)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProbationEvaluation::Rating)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProbationEvaluation::Recommendation)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProbationEvaluation::ExtensionDays).integer())
                    .col(ColumnDef::new(ProbationEvaluation::Comments).text())
                    .col(
                        ColumnDef::new(ProbationEvaluation::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_probation_evaluation_record")
                            .from(ProbationEvaluation::Table, ProbationEvaluation::ProbationId)
                            .to(ProbationRecord::Table, ProbationRecord::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_probation_evaluation_record")
                    .table(ProbationEvaluation::Table)
                    .col(ProbationEvaluation::ProbationId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(ProbationEvaluation::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(ProbationRecord::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
