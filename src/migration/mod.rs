use sea_orm_migration::prelude::*;

mod m20250101_000001_create_users_table;
mod m20250101_000002_create_admins_table;
mod m20250101_000003_create_categories_table;
mod m20250101_000004_create_argu_table;
mod m20250101_000005_create_comments_table;
mod m20250101_000006_create_argu_opinion_table;
mod m20250101_000007_create_likes_table;
mod m20250101_000008_create_bookmarks_table;
mod m20250101_000009_create_reports_table;
mod m20250101_000010_create_chat_messages_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_users_table::Migration),
            Box::new(m20250101_000002_create_admins_table::Migration),
            Box::new(m20250101_000003_create_categories_table::Migration),
            Box::new(m20250101_000004_create_argu_table::Migration),
            Box::new(m20250101_000005_create_comments_table::Migration),
            Box::new(m20250101_000006_create_argu_opinion_table::Migration),
            Box::new(m20250101_000007_create_likes_table::Migration),
            Box::new(m20250101_000008_create_bookmarks_table::Migration),
            Box::new(m20250101_000009_create_reports_table::Migration),
            Box::new(m20250101_000010_create_chat_messages_table::Migration),
        ]
    }
}
