use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum ArguOpinion {
    Table,
    Id,
    ArguId,
    UserId,
    Side,
    Content,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Argu {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ArguOpinion::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ArguOpinion::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ArguOpinion::ArguId).integer().not_null())
                    .col(ColumnDef::new(ArguOpinion::UserId).integer().not_null())
                    .col(ColumnDef::new(ArguOpinion::Side).string_len(20).not_null())
                    .col(ColumnDef::new(ArguOpinion::Content).text().null())
                    .col(
                        ColumnDef::new(ArguOpinion::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ArguOpinion::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_argu_opinion_argu_id")
                            .from(ArguOpinion::Table, ArguOpinion::ArguId)
                            .to(Argu::Table, Argu::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_argu_opinion_user_id")
                            .from(ArguOpinion::Table, ArguOpinion::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_argu_opinion_argu_user")
                    .table(ArguOpinion::Table)
                    .col(ArguOpinion::ArguId)
                    .col(ArguOpinion::UserId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_argu_opinion_user_id")
                    .table(ArguOpinion::Table)
                    .col(ArguOpinion::UserId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ArguOpinion::Table).to_owned())
            .await
    }
}
