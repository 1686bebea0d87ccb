use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InvitedMembers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InvitedMembers::MemberId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InvitedMembers::InviterId)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-invited-members-inviter")
                    .table(InvitedMembers::Table)
                    .col(InvitedMembers::InviterId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InvitedMembers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum InvitedMembers {
    Table,
    MemberId,
    InviterId,
}
