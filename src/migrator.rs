use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_categories_table::Migration),
            Box::new(m20240101_000003_create_locations_table::Migration),
            Box::new(m20240101_000004_create_items_table::Migration),
            Box::new(m20240101_000005_create_assignments_table::Migration),
            Box::new(m20240101_000006_create_item_returns_table::Migration),
            Box::new(m20240101_000007_create_maintenance_records_table::Migration),
            Box::new(m20240101_000008_create_disposals_table::Migration),
            Box::new(m20240101_000009_create_requests_table::Migration),
            Box::new(m20240101_000010_create_request_comments_table::Migration),
        ]
    }
}

mod m20240101_000001_create_users_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Users::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Users::Name).string().not_null())
                        .col(
                            ColumnDef::new(Users::Email)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(ColumnDef::new(Users::Role).string().not_null())
                        .col(
                            ColumnDef::new(Users::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Users::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Users::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Users {
        Table,
        Id,
        Name,
        Email,
        PasswordHash,
        Role,
        Active,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000002_create_categories_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_categories_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Categories::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Categories::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Categories::Code)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Categories::Name).string().not_null())
                        .col(ColumnDef::new(Categories::Description).string().null())
                        .col(
                            ColumnDef::new(Categories::DeletedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Categories::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Categories::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Categories::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Categories {
        Table,
        Id,
        Code,
        Name,
        Description,
        DeletedAt,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000003_create_locations_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_locations_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Locations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Locations::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Locations::Code)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Locations::Name).string().not_null())
                        .col(ColumnDef::new(Locations::Building).string().null())
                        .col(ColumnDef::new(Locations::Room).string().null())
                        .col(
                            ColumnDef::new(Locations::DeletedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Locations::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Locations::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Locations::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Locations {
        Table,
        Id,
        Code,
        Name,
        Building,
        Room,
        DeletedAt,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000004_create_items_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Items::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Items::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Items::PropertyNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(Items::SerialNumber)
                                .string()
                                .null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Items::Barcode).string().null().unique_key())
                        .col(ColumnDef::new(Items::QrCode).string().null())
                        .col(ColumnDef::new(Items::Name).string().not_null())
                        .col(ColumnDef::new(Items::Description).string().null())
                        .col(ColumnDef::new(Items::Status).string_len(32).not_null())
                        .col(ColumnDef::new(Items::Condition).string_len(32).not_null())
                        .col(
                            ColumnDef::new(Items::AcquisitionCost)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Items::AcquisitionDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Items::WarrantyExpiry)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(Items::CategoryId).uuid().not_null())
                        .col(ColumnDef::new(Items::LocationId).uuid().not_null())
                        .col(
                            ColumnDef::new(Items::DeletedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Items::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Items::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_items_category")
                                .from(Items::Table, Items::CategoryId)
                                .to(Categories::Table, Categories::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_items_location")
                                .from(Items::Table, Items::LocationId)
                                .to(Locations::Table, Locations::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_items_status")
                        .table(Items::Table)
                        .col(Items::Status)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Items::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Items {
        Table,
        Id,
        PropertyNumber,
        SerialNumber,
        Barcode,
        QrCode,
        Name,
        Description,
        Status,
        Condition,
        AcquisitionCost,
        AcquisitionDate,
        WarrantyExpiry,
        CategoryId,
        LocationId,
        DeletedAt,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(Iden)]
    enum Categories {
        Table,
        Id,
    }

    #[derive(Iden)]
    enum Locations {
        Table,
        Id,
    }
}

mod m20240101_000005_create_assignments_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_assignments_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Assignments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Assignments::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Assignments::ItemId).uuid().not_null())
                        .col(ColumnDef::new(Assignments::UserId).uuid().not_null())
                        .col(ColumnDef::new(Assignments::AssignedBy).uuid().not_null())
                        .col(
                            ColumnDef::new(Assignments::Status)
                                .string_len(32)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Assignments::AssignedDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Assignments::DueDate)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(Assignments::ApprovedBy).uuid().null())
                        .col(
                            ColumnDef::new(Assignments::ApprovedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Assignments::ActivatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Assignments::ReturnedDate)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Assignments::CancelledAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(Assignments::Notes).string().null())
                        .col(
                            ColumnDef::new(Assignments::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Assignments::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_assignments_item")
                                .from(Assignments::Table, Assignments::ItemId)
                                .to(Items::Table, Items::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_assignments_custodian")
                                .from(Assignments::Table, Assignments::UserId)
                                .to(Users::Table, Users::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_assignments_item_status")
                        .table(Assignments::Table)
                        .col(Assignments::ItemId)
                        .col(Assignments::Status)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Assignments::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Assignments {
        Table,
        Id,
        ItemId,
        UserId,
        AssignedBy,
        Status,
        AssignedDate,
        DueDate,
        ApprovedBy,
        ApprovedAt,
        ActivatedAt,
        ReturnedDate,
        CancelledAt,
        Notes,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(Iden)]
    enum Items {
        Table,
        Id,
    }

    #[derive(Iden)]
    enum Users {
        Table,
        Id,
    }
}

mod m20240101_000006_create_item_returns_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000006_create_item_returns_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ItemReturns::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ItemReturns::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ItemReturns::AssignmentId).uuid().not_null())
                        .col(
                            ColumnDef::new(ItemReturns::Status)
                                .string_len(32)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ItemReturns::ReturnDate)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ItemReturns::ConditionOnReturn)
                                .string_len(32)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(ItemReturns::IsDamaged)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(ItemReturns::IsLate)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(ItemReturns::DaysLate)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ItemReturns::PenaltyAmount)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(ItemReturns::InspectedBy).uuid().null())
                        .col(
                            ColumnDef::new(ItemReturns::InspectedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(ItemReturns::ReviewedBy).uuid().null())
                        .col(
                            ColumnDef::new(ItemReturns::ReviewedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(ItemReturns::Notes).string().null())
                        .col(
                            ColumnDef::new(ItemReturns::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ItemReturns::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_item_returns_assignment")
                                .from(ItemReturns::Table, ItemReturns::AssignmentId)
                                .to(Assignments::Table, Assignments::Id),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ItemReturns::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum ItemReturns {
        Table,
        Id,
        AssignmentId,
        Status,
        ReturnDate,
        ConditionOnReturn,
        IsDamaged,
        IsLate,
        DaysLate,
        PenaltyAmount,
        InspectedBy,
        InspectedAt,
        ReviewedBy,
        ReviewedAt,
        Notes,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(Iden)]
    enum Assignments {
        Table,
        Id,
    }
}

mod m20240101_000007_create_maintenance_records_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000007_create_maintenance_records_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(MaintenanceRecords::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MaintenanceRecords::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MaintenanceRecords::ItemId).uuid().not_null())
                        .col(
                            ColumnDef::new(MaintenanceRecords::Status)
                                .string_len(32)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRecords::MaintenanceType)
                                .string_len(32)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRecords::Priority)
                                .string_len(16)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRecords::Description)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRecords::ScheduledDate)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRecords::StartedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRecords::CompletedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRecords::ActualDurationHours)
                                .integer()
                                .null(),
                        )
                        .col(ColumnDef::new(MaintenanceRecords::Cost).decimal().null())
                        .col(
                            ColumnDef::new(MaintenanceRecords::PreStatus)
                                .string_len(32)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRecords::PreCondition)
                                .string_len(32)
                                .null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRecords::RequestedBy)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MaintenanceRecords::AssignedTo).uuid().null())
                        .col(ColumnDef::new(MaintenanceRecords::ApprovedBy).uuid().null())
                        .col(
                            ColumnDef::new(MaintenanceRecords::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaintenanceRecords::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_maintenance_item")
                                .from(MaintenanceRecords::Table, MaintenanceRecords::ItemId)
                                .to(Items::Table, Items::Id),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(MaintenanceRecords::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum MaintenanceRecords {
        Table,
        Id,
        ItemId,
        Status,
        MaintenanceType,
        Priority,
        Description,
        ScheduledDate,
        StartedAt,
        CompletedAt,
        ActualDurationHours,
        Cost,
        PreStatus,
        PreCondition,
        RequestedBy,
        AssignedTo,
        ApprovedBy,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(Iden)]
    enum Items {
        Table,
        Id,
    }
}

mod m20240101_000008_create_disposals_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000008_create_disposals_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Disposals::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Disposals::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Disposals::ItemId).uuid().not_null())
                        .col(ColumnDef::new(Disposals::Status).string_len(32).not_null())
                        .col(ColumnDef::new(Disposals::Reason).string().not_null())
                        .col(
                            ColumnDef::new(Disposals::DisposalMethod)
                                .string_len(32)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Disposals::Proceeds).decimal().null())
                        .col(ColumnDef::new(Disposals::RequestedBy).uuid().not_null())
                        .col(
                            ColumnDef::new(Disposals::RequestedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Disposals::ApprovedBy).uuid().null())
                        .col(
                            ColumnDef::new(Disposals::ApprovedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(Disposals::RejectedBy).uuid().null())
                        .col(
                            ColumnDef::new(Disposals::RejectedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(Disposals::RejectionReason).string().null())
                        .col(ColumnDef::new(Disposals::ExecutedBy).uuid().null())
                        .col(
                            ColumnDef::new(Disposals::ExecutedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(Disposals::Notes).string().null())
                        .col(
                            ColumnDef::new(Disposals::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Disposals::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_disposals_item")
                                .from(Disposals::Table, Disposals::ItemId)
                                .to(Items::Table, Items::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .name("idx_disposals_item_status")
                        .table(Disposals::Table)
                        .col(Disposals::ItemId)
                        .col(Disposals::Status)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Disposals::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Disposals {
        Table,
        Id,
        ItemId,
        Status,
        Reason,
        DisposalMethod,
        Proceeds,
        RequestedBy,
        RequestedAt,
        ApprovedBy,
        ApprovedAt,
        RejectedBy,
        RejectedAt,
        RejectionReason,
        ExecutedBy,
        ExecutedAt,
        Notes,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(Iden)]
    enum Items {
        Table,
        Id,
    }
}

mod m20240101_000009_create_requests_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000009_create_requests_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Requests::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Requests::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Requests::UserId).uuid().not_null())
                        .col(
                            ColumnDef::new(Requests::RequestType)
                                .string_len(32)
                                .not_null(),
                        )
                        .col(ColumnDef::new(Requests::ItemId).uuid().null())
                        .col(ColumnDef::new(Requests::Title).string().not_null())
                        .col(ColumnDef::new(Requests::Description).string().not_null())
                        .col(ColumnDef::new(Requests::Priority).string_len(16).not_null())
                        .col(ColumnDef::new(Requests::Status).string_len(32).not_null())
                        .col(ColumnDef::new(Requests::ReviewedBy).uuid().null())
                        .col(
                            ColumnDef::new(Requests::ReviewedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(Requests::ReviewNotes).string().null())
                        .col(
                            ColumnDef::new(Requests::CompletedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Requests::CancelledAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Requests::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Requests::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_requests_owner")
                                .from(Requests::Table, Requests::UserId)
                                .to(Users::Table, Users::Id),
                        )
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
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Requests::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Requests {
        Table,
        Id,
        UserId,
        RequestType,
        ItemId,
        Title,
        Description,
        Priority,
        Status,
        ReviewedBy,
        ReviewedAt,
        ReviewNotes,
        CompletedAt,
        CancelledAt,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(Iden)]
    enum Users {
        Table,
        Id,
    }
}

mod m20240101_000010_create_request_comments_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000010_create_request_comments_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(RequestComments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RequestComments::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(RequestComments::RequestId).uuid().not_null())
                        .col(ColumnDef::new(RequestComments::UserId).uuid().not_null())
                        .col(ColumnDef::new(RequestComments::Comment).string().not_null())
                        .col(
                            ColumnDef::new(RequestComments::IsInternal)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(RequestComments::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_request_comments_request")
                                .from(RequestComments::Table, RequestComments::RequestId)
                                .to(Requests::Table, Requests::Id),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(RequestComments::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum RequestComments {
        Table,
        Id,
        RequestId,
        UserId,
        Comment,
        IsInternal,
        CreatedAt,
    }

    #[derive(Iden)]
    enum Requests {
        Table,
        Id,
    }
}
