use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum JobRequisition {
    Table,
    Id,
    Title,
    Department,
    Positions,
    Justification,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum JobAnnouncement {
    Table,
    Id,
    RequisitionId,
    Title,
    Description,
    ClosingDate,
    Status,
    PublishedAt,
    ClosedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Candidate {
    Table,
    Id,
    AnnouncementId,
    FullName,
    Email,
    Phone,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Interview {
    Table,
    Id,
    CandidateId,
    ScheduledAt,
    Interviewer,
    Score,
    Feedback,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum JobOffer {
    Table,
    Id,
    CandidateId,
    SalaryCents,
    Currency,
    StartDate,
    Status,
    RespondedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(JobRequisition::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JobRequisition::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(JobRequisition::Title).string_len(256).not_null())
                    .col(ColumnDef::new(JobRequisition::Department).string_len(128))
                    .col(
                        ColumnDef::new(JobRequisition::Positions)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(JobRequisition::Justification).text())
                    .col(
                        ColumnDef::new(JobRequisition::Status)
                            .string_len(32)
                            .not_null()
                            .default("draft"),
                    )
                    .col(
                        ColumnDef::new(JobRequisition::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JobRequisition::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(JobAnnouncement::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JobAnnouncement::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(JobAnnouncement::RequisitionId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(JobAnnouncement::Title).string_len(256).not_null())
                    .col(ColumnDef::new(JobAnnouncement::Description).text())
                    .col(ColumnDef::new(JobAnnouncement::ClosingDate).date())
                    .col(
                        ColumnDef::new(JobAnnouncement::Status)
                            .string_len(32)
                            .not_null()
                            .default("draft"),
                    )
                    .col(ColumnDef::new(JobAnnouncement::PublishedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(JobAnnouncement::ClosedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(JobAnnouncement::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JobAnnouncement::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_announcement_requisition")
                            .from(JobAnnouncement::Table, JobAnnouncement::RequisitionId)
                            .to(JobRequisition::Table, JobRequisition::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Candidate::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Candidate::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Candidate::AnnouncementId).integer().not_null())
                    .col(ColumnDef::new(Candidate::FullName).string_len(256).not_null())
                    .col(ColumnDef::new(Candidate::Email).string_len(320).not_null())
                    .col(ColumnDef::new(Candidate::Phone).string_len(64))
                    .col(
                        ColumnDef::new(Candidate::Status)
                            .string_len(32)
                            .not_null()
                            .default("applied"),
                    )
                    .col(
                        ColumnDef::new(Candidate::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Candidate::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_candidate_announcement")
                            .from(Candidate::Table, Candidate::AnnouncementId)
                            .to(JobAnnouncement::Table, JobAnnouncement::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_candidate_announcement")
                    .table(Candidate::Table)
                    .col(Candidate::AnnouncementId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Interview::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Interview::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Interview::CandidateId).integer().not_null())
                    .col(
                        ColumnDef::new(Interview::ScheduledAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Interview::Interviewer).string_len(256).not_null())
                    .col(ColumnDef::new(Interview::Score).integer())
                    .col(ColumnDef::new(Interview::Feedback).text())
                    .col(
                        ColumnDef::new(Interview::Status)
                            .string_len(32)
                            .not_null()
                            .default("scheduled"),
                    )
                    .col(
                        ColumnDef::new(Interview::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Interview::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_interview_candidate")
                            .from(Interview::Table, Interview::CandidateId)
                            .to(Candidate::Table, Candidate::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(JobOffer::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JobOffer::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(JobOffer::CandidateId).integer().not_null())
                    .col(ColumnDef::new(JobOffer::SalaryCents).big_integer().not_null())
                    .col(
                        ColumnDef::new(JobOffer::Currency)
                            .string_len(3)
                            .not_null()
                            .default("USD"),
                    )
                    .col(ColumnDef::new(JobOffer::StartDate).date())
                    .col(
                        ColumnDef::new(JobOffer::Status)
                            .string_len(32)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(JobOffer::RespondedAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(JobOffer::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JobOffer::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_offer_candidate")
                            .from(JobOffer::Table, JobOffer::CandidateId)
                            .to(Candidate::Table, Candidate::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JobOffer::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Interview::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Candidate::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(JobAnnouncement::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(JobRequisition::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
