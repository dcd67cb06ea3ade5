use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Help offers name the offer they are drawn from instead of relying on
        // the volunteer's first offer. Older rows keep NULL here.
        match manager
            .alter_table(
                Table::alter()
                    .table(HelpOffers::Table)
                    .add_column(ColumnDef::new(HelpOffers::OfferId).string().null())
                    .to_owned(),
            )
            .await
        {
            Ok(_) => {}
            Err(e) if e.to_string().contains("duplicate column name") => {
                // Column already exists, continue
            }
            Err(e) => return Err(e),
        }

        manager
            .create_index(
                Index::create()
                    .name("idx_help_offers_offer")
                    .table(HelpOffers::Table)
                    .col(HelpOffers::OfferId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_help_offers_offer")
                    .table(HelpOffers::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(HelpOffers::Table)
                    .drop_column(HelpOffers::OfferId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum HelpOffers {
    Table,
    OfferId,
}
