use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Argu {
    Table,
    Id,
    UserId,
    CategoryId,
    Title,
    Content,
    StartDate,
    EndDate,
    Status,
    IsHidden,
    ViewCount,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Argu::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Argu::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Argu::UserId).integer().not_null())
                    .col(ColumnDef::new(Argu::CategoryId).integer().not_null())
                    .col(ColumnDef::new(Argu::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Argu::Content).text().not_null())
                    .col(ColumnDef::new(Argu::StartDate).timestamp().not_null())
                    .col(ColumnDef::new(Argu::EndDate).timestamp().not_null())
                    .col(
                        ColumnDef::new(Argu::Status)
                            .string_len(20)
                            .not_null()
                            .default("SCHEDULED"),
                    )
                    .col(
                        ColumnDef::new(Argu::IsHidden)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Argu::ViewCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Argu::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Argu::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_argu_user_id")
                            .from(Argu::Table, Argu::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_argu_category_id")
                            .from(Argu::Table, Argu::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // The sweep filters on (status, start_date) and (status, end_date).
        for (name, cols) in [
            ("idx_argu_status_start", [Argu::Status, Argu::StartDate]),
            ("idx_argu_status_end", [Argu::Status, Argu::EndDate]),
            ("idx_argu_category_created", [Argu::CategoryId, Argu::CreatedAt]),
            ("idx_argu_user_created", [Argu::UserId, Argu::CreatedAt]),
        ] {
            let mut index = Index::create();
            index.name(name).table(Argu::Table).if_not_exists();
            for col in cols {
                index.col(col);
            }
            manager.create_index(index.to_owned()).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Argu::Table).to_owned())
            .await
    }
}
