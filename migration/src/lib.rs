pub use sea_orm_migration::prelude::*;

mod m20240301_000001_people;
mod m20240301_000002_leave;
mod m20240301_000003_probation;
mod m20240301_000004_recruitment;
mod m20240301_000005_status_change;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_people::Migration),
            Box::new(m20240301_000002_leave::Migration),
            Box::new(m20240301_000003_probation::Migration),
            Box::new(m20240301_000004_recruitment::Migration),
            Box::new(m20240301_000005_status_change::Migration),
        ]
    }
}
