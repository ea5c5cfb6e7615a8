use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Orders {
    Table,
    Dob,
    EventParticipation,
    Activities,
    ActivityDescription,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let columns = [
            (
                "dob",
                ColumnDef::new(Orders::Dob)
                    .string()
                    .not_null()
                    .default("")
                    .to_owned(),
            ),
            (
                "event_participation",
                ColumnDef::new(Orders::EventParticipation)
                    .string_len(16)
                    .not_null()
                    .default("no")
                    .to_owned(),
            ),
            (
                "activities",
                ColumnDef::new(Orders::Activities)
                    .text()
                    .not_null()
                    .default("[]")
                    .to_owned(),
            ),
            (
                "activity_description",
                ColumnDef::new(Orders::ActivityDescription)
                    .text()
                    .null()
                    .to_owned(),
            ),
        ];

        for (name, mut column) in columns {
            if manager.has_column("orders", name).await? {
                continue;
            }
            manager
                .alter_table(
                    Table::alter()
                        .table(Orders::Table)
                        .add_column(&mut column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, _manager: &SchemaManager) -> Result<(), DbErr> {
        Ok(())
    }
}
