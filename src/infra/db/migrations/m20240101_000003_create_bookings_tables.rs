//! Migration: Create the bookings and booking_rooms tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bookings::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bookings::UserId).uuid().not_null())
                    .col(ColumnDef::new(Bookings::Status).string().not_null())
                    .col(
                        ColumnDef::new(Bookings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Bookings::StartDate).date().not_null())
                    .col(ColumnDef::new(Bookings::EndDate).date().not_null())
                    .col(
                        ColumnDef::new(Bookings::TotalPrice)
                            .decimal_len(18, 2)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bookings_requester")
                            .from(Bookings::Table, Bookings::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Overlap scan filters on (status, start_date, end_date)
        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_status_dates")
                    .table(Bookings::Table)
                    .col(Bookings::Status)
                    .col(Bookings::StartDate)
                    .col(Bookings::EndDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bookings_user")
                    .table(Bookings::Table)
                    .col(Bookings::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BookingRooms::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BookingRooms::BookingId).uuid().not_null())
                    .col(ColumnDef::new(BookingRooms::RoomId).uuid().not_null())
                    .col(
                        ColumnDef::new(BookingRooms::PriceAtBooking)
                            .decimal_len(18, 2)
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(BookingRooms::BookingId)
                            .col(BookingRooms::RoomId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_rooms_booking")
                            .from(BookingRooms::Table, BookingRooms::BookingId)
                            .to(Bookings::Table, Bookings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_rooms_room")
                            .from(BookingRooms::Table, BookingRooms::RoomId)
                            .to(Rooms::Table, Rooms::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_booking_rooms_room")
                    .table(BookingRooms::Table)
                    .col(BookingRooms::RoomId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BookingRooms::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Bookings {
    Table,
    Id,
    UserId,
    Status,
    CreatedAt,
    StartDate,
    EndDate,
    TotalPrice,
}

#[derive(Iden)]
enum BookingRooms {
    Table,
    BookingId,
    RoomId,
    PriceAtBooking,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Rooms {
    Table,
    Id,
}
