use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).string().not_null().primary_key())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::PasswordSalt).string().not_null())
                    .col(ColumnDef::new(Users::UserType).string().not_null())
                    .col(ColumnDef::new(Users::Name).string().not_null())
                    .col(
                        ColumnDef::new(Users::Verified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Create requests table
        manager
            .create_table(
                Table::create()
                    .table(Requests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Requests::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Requests::Title).string().not_null())
                    .col(ColumnDef::new(Requests::Description).text().not_null())
                    .col(ColumnDef::new(Requests::Category).string().not_null())
                    .col(ColumnDef::new(Requests::Priority).string().not_null())
                    .col(
                        ColumnDef::new(Requests::QuantityAmount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Requests::QuantityUnit)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Requests::DeliveryLocation).string())
                    .col(ColumnDef::new(Requests::AuthorId).string().not_null())
                    .col(ColumnDef::new(Requests::AuthorName).string().not_null())
                    .col(
                        ColumnDef::new(Requests::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Requests::ImageUrl).string())
                    .col(
                        ColumnDef::new(Requests::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Requests::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_requests_author")
                            .from(Requests::Table, Requests::AuthorId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Create offers table
        manager
            .create_table(
                Table::create()
                    .table(Offers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Offers::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Offers::Title).string().not_null())
                    .col(ColumnDef::new(Offers::Description).text().not_null())
                    .col(ColumnDef::new(Offers::Category).string().not_null())
                    .col(
                        ColumnDef::new(Offers::QuantityAmount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Offers::QuantityUnit)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Offers::DeliveryLocation).string())
                    .col(ColumnDef::new(Offers::AuthorId).string().not_null())
                    .col(ColumnDef::new(Offers::AuthorName).string().not_null())
                    .col(
                        ColumnDef::new(Offers::Status)
                            .string()
                            .not_null()
                            .default("available"),
                    )
                    .col(ColumnDef::new(Offers::ImageUrl).string())
                    .col(
                        ColumnDef::new(Offers::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Offers::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_offers_author")
                            .from(Offers::Table, Offers::AuthorId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Create help_offers table
        manager
            .create_table(
                Table::create()
                    .table(HelpOffers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HelpOffers::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(HelpOffers::RequestId).string().not_null())
                    .col(ColumnDef::new(HelpOffers::RequestTitle).string().not_null())
                    .col(ColumnDef::new(HelpOffers::VolunteerId).string())
                    .col(ColumnDef::new(HelpOffers::VolunteerName).string())
                    .col(ColumnDef::new(HelpOffers::MilitaryId).string().not_null())
                    .col(ColumnDef::new(HelpOffers::MilitaryName).string().not_null())
                    .col(
                        ColumnDef::new(HelpOffers::AvailableQuantity)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(HelpOffers::DeliveryDate).string())
                    .col(
                        ColumnDef::new(HelpOffers::ContactInfo)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(HelpOffers::Message).text())
                    .col(
                        ColumnDef::new(HelpOffers::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(HelpOffers::AcceptedQuantity).big_integer())
                    .col(
                        ColumnDef::new(HelpOffers::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(HelpOffers::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_help_offers_request")
                            .from(HelpOffers::Table, HelpOffers::RequestId)
                            .to(Requests::Table, Requests::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Create help_requests table
        manager
            .create_table(
                Table::create()
                    .table(HelpRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(HelpRequests::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(HelpRequests::OfferId).string().not_null())
                    .col(ColumnDef::new(HelpRequests::OfferTitle).string().not_null())
                    .col(ColumnDef::new(HelpRequests::MilitaryId).string().not_null())
                    .col(
                        ColumnDef::new(HelpRequests::MilitaryName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(HelpRequests::CharityId).string().not_null())
                    .col(
                        ColumnDef::new(HelpRequests::CharityName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HelpRequests::RequestedQuantity)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HelpRequests::ContactInfo)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(HelpRequests::Message).text())
                    .col(
                        ColumnDef::new(HelpRequests::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(HelpRequests::ConfirmedQuantity).big_integer())
                    .col(
                        ColumnDef::new(HelpRequests::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(HelpRequests::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_help_requests_offer")
                            .from(HelpRequests::Table, HelpRequests::OfferId)
                            .to(Offers::Table, Offers::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Indexes for the browse filters
        manager
            .create_index(
                Index::create()
                    .name("idx_requests_author")
                    .table(Requests::Table)
                    .col(Requests::AuthorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_requests_status")
                    .table(Requests::Table)
                    .col(Requests::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_offers_author_created")
                    .table(Offers::Table)
                    .col(Offers::AuthorId)
                    .col(Offers::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_help_offers_request")
                    .table(HelpOffers::Table)
                    .col(HelpOffers::RequestId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_help_requests_offer")
                    .table(HelpRequests::Table)
                    .col(HelpRequests::OfferId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HelpRequests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(HelpOffers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Offers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Requests::Table).to_owned())
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
    Email,
    PasswordHash,
    PasswordSalt,
    UserType,
    Name,
    Verified,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Requests {
    Table,
    Id,
    Title,
    Description,
    Category,
    Priority,
    QuantityAmount,
    QuantityUnit,
    DeliveryLocation,
    AuthorId,
    AuthorName,
    Status,
    ImageUrl,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Offers {
    Table,
    Id,
    Title,
    Description,
    Category,
    QuantityAmount,
    QuantityUnit,
    DeliveryLocation,
    AuthorId,
    AuthorName,
    Status,
    ImageUrl,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum HelpOffers {
    Table,
    Id,
    RequestId,
    RequestTitle,
    VolunteerId,
    VolunteerName,
    MilitaryId,
    MilitaryName,
    AvailableQuantity,
    DeliveryDate,
    ContactInfo,
    Message,
    Status,
    AcceptedQuantity,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum HelpRequests {
    Table,
    Id,
    OfferId,
    OfferTitle,
    MilitaryId,
    MilitaryName,
    CharityId,
    CharityName,
    RequestedQuantity,
    ContactInfo,
    Message,
    Status,
    ConfirmedQuantity,
    CreatedAt,
    UpdatedAt,
}
