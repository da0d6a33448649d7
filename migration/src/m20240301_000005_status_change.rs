use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum StatusChange {
    Table,
    Id,
    EntityType,
    EntityId,
    FromStatus,
    ToStatus,
    Action,
    Actor,
    Note,
    ChangedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StatusChange::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StatusChange::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StatusChange::EntityType).string_len(64).not_null())
                    .col(ColumnDef::new(StatusChange::EntityId).integer().not_null())
                    .col(ColumnDef::new(StatusChange::FromStatus).string_len(32).not_null())
                    .col(ColumnDef::new(StatusChange::ToStatus).string_len(32).not_null())
                    .col(ColumnDef::new(StatusChange::Action).string_len(32).not_null())
                    .col(ColumnDef::new(StatusChange::Actor).string_len(256))
                    .col(ColumnDef::new(StatusChange::Note).text())
                    .col(
                        ColumnDef::new(StatusChange::ChangedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Entity rows are removed without touching history, so no foreign key here.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_status_change_entity")
                    .table(StatusChange::Table)
                    .col(StatusChange::EntityType)
                    .col(StatusChange::EntityId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StatusChange::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
