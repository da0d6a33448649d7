use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum LeaveType {
    Table,
    Id,
    Name,
    DaysAllowed,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum LeaveRequest {
    Table,
    Id,
    EmployeeId,
    LeaveTypeId,
    StartDate,
    EndDate,
    TotalDays,
    Reason,
    Status,
    ApprovedBy,
    ApprovedAt,
    Comments,
    RejectedBy,
    RejectedAt,
    RejectionReason,
    CreatedAt,
    UpdatedAt,
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
                    .table(LeaveType::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LeaveType::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LeaveType::Name)
                            .string_len(128)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(LeaveType::DaysAllowed)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(LeaveType::Description).text())
                    .col(
                        ColumnDef::new(LeaveType::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LeaveType::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LeaveRequest::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LeaveRequest::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LeaveRequest::EmployeeId).integer().not_null())
                    .col(ColumnDef::new(LeaveRequest::LeaveTypeId).integer().not_null())
                    .col(ColumnDef::new(LeaveRequest::StartDate).date().not_null())
                    .col(ColumnDef::new(LeaveRequest::EndDate).date().not_null())
                    .col(ColumnDef::new(LeaveRequest::TotalDays).integer().not_null())
                    .col(ColumnDef::new(LeaveRequest::Reason).text())
                    .col(
                        ColumnDef::new(LeaveRequest::Status)
                            .string_len(32)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(LeaveRequest::ApprovedBy).string_len(256))
                    .col(ColumnDef::new(LeaveRequest::ApprovedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(LeaveRequest::Comments).text())
                    .col(ColumnDef::new(LeaveRequest::RejectedBy).string_len(256))
                    .col(ColumnDef::new(LeaveRequest::RejectedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(LeaveRequest::RejectionReason).text())
                    .col(
                        ColumnDef::new(LeaveRequest::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LeaveRequest::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leave_request_employee")
                            .from(LeaveRequest::Table, LeaveRequest::EmployeeId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leave_request_leave_type")
                            .from(LeaveRequest::Table, LeaveRequest::LeaveTypeId)
                            .to(LeaveType::Table, LeaveType::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_leave_request_employee")
                    .table(LeaveRequest::Table)
                    .col(LeaveRequest::EmployeeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_leave_request_status")
                    .table(LeaveRequest::Table)
                    .col(LeaveRequest::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LeaveRequest::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LeaveType::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
