use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Movies::Table)
                    .if_not_exists()
                    .col(pk_auto(Movies::Id))
                    .col(string(Movies::Slug))
                    .col(string(Movies::Title))
                    .col(string(Movies::Year))
                    .col(string(Movies::Genre))
                    .col(text(Movies::Plot))
                    .col(string(Movies::Poster))
                    .col(string(Movies::TelegramLink))
                    .col(string(Movies::TeraboxLink))
                    .col(big_integer(Movies::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movies_slug_unique")
                    .table(Movies::Table)
                    .col(Movies::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Movies::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Movies {
    Table,
    Id,
    Slug,
    Title,
    Year,
    Genre,
    Plot,
    Poster,
    TelegramLink,
    TeraboxLink,
    CreatedAt,
}
