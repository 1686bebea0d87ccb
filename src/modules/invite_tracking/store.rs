//! Repository over the two persisted collections: per-inviter counters and
//! per-member join attributions.

use crate::db::entities::{invited_members, inviter_counters};
use crate::Error;
use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

pub async fn get_counter(
    db: &DatabaseConnection,
    user_id: i64,
) -> Result<Option<inviter_counters::Model>, Error> {
    Ok(inviter_counters::Entity::find_by_id(user_id).one(db).await?)
}

/// All counter rows in key order.
pub async fn all_counters(
    db: &DatabaseConnection,
) -> Result<Vec<inviter_counters::Model>, Error> {
    Ok(inviter_counters::Entity::find()
        .order_by_asc(inviter_counters::Column::UserId)
        .all(db)
        .await?)
}

pub async fn get_attribution(
    db: &DatabaseConnection,
    member_id: i64,
) -> Result<Option<invited_members::Model>, Error> {
    Ok(invited_members::Entity::find_by_id(member_id).one(db).await?)
}

/// Credit one attributed join to an inviter, creating the counter row on
/// first use.
pub async fn credit_join(db: &DatabaseConnection, inviter_id: i64) -> Result<(), Error> {
    let now = Utc::now();

    match get_counter(db, inviter_id).await? {
        Some(counter) => {
            let total = counter.total + 1;
            let weekly = counter.weekly + 1;

            let mut active: inviter_counters::ActiveModel = counter.into();
            active.total = Set(total);
            active.weekly = Set(weekly);
            active.updated_at = Set(now.into());
            active.update(db).await?;
        }
        None => {
            inviter_counters::ActiveModel {
                user_id: Set(inviter_id),
                total: Set(1),
                weekly: Set(1),
                updated_at: Set(now.into()),
            }
            .insert(db)
            .await?;
        }
    }

    Ok(())
}

/// Record which inviter a member joined through. At most one attribution per
/// member; a re-join overwrites the previous record.
pub async fn record_attribution(
    db: &DatabaseConnection,
    member_id: i64,
    inviter_id: i64,
) -> Result<(), Error> {
    invited_members::Entity::insert(invited_members::ActiveModel {
        member_id: Set(member_id),
        inviter_id: Set(inviter_id),
    })
    .on_conflict(
        OnConflict::column(invited_members::Column::MemberId)
            .update_column(invited_members::Column::InviterId)
            .to_owned(),
    )
    .exec(db)
    .await?;

    Ok(())
}

/// Persist a successfully attributed join: bump the inviter's counters, then
/// record the attribution.
///
/// The two writes are independent; a counter increment that lands without its
/// attribution row is tolerated (the next leave of that member finds no
/// record and does nothing).
pub async fn attribute_join(
    db: &DatabaseConnection,
    inviter_id: i64,
    member_id: i64,
) -> Result<(), Error> {
    credit_join(db, inviter_id).await?;
    record_attribution(db, member_id, inviter_id).await?;
    Ok(())
}

/// Reverse a member's join attribution, if one was recorded.
///
/// The attribution row is only deleted when a counter row was actually found
/// and decremented; a missing counter leaves the attribution in place.
pub async fn reverse_attribution(db: &DatabaseConnection, member_id: i64) -> Result<(), Error> {
    let Some(attribution) = get_attribution(db, member_id).await? else {
        return Ok(());
    };

    let Some(counter) = get_counter(db, attribution.inviter_id).await? else {
        return Ok(());
    };

    let total = (counter.total - 1).max(0);
    let weekly = (counter.weekly - 1).max(0);

    let mut active: inviter_counters::ActiveModel = counter.into();
    active.total = Set(total);
    active.weekly = Set(weekly);
    active.updated_at = Set(Utc::now().into());
    active.update(db).await?;

    invited_members::Entity::delete_by_id(member_id).exec(db).await?;

    Ok(())
}

/// Zero the weekly count on every counter row, leaving totals untouched.
pub async fn reset_weekly(db: &DatabaseConnection) -> Result<(), Error> {
    inviter_counters::Entity::update_many()
        .col_expr(inviter_counters::Column::Weekly, Expr::value(0))
        .col_expr(
            inviter_counters::Column::UpdatedAt,
            Expr::value(Utc::now()),
        )
        .exec(db)
        .await?;

    Ok(())
}
