//! SeaORM implementation of ReservationRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};
use tracing::debug;

use crate::domain::reservation::{
    NewReservation, Reservation, ReservationFilter, ReservationRepository, ReservationStatus,
};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::reservation;

pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

impl From<ReservationStatus> for reservation::Status {
    fn from(status: ReservationStatus) -> Self {
        match status {
            ReservationStatus::Pending => Self::Pending,
            ReservationStatus::Confirmed => Self::Confirmed,
            ReservationStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<reservation::Status> for ReservationStatus {
    fn from(status: reservation::Status) -> Self {
        match status {
            reservation::Status::Pending => Self::Pending,
            reservation::Status::Confirmed => Self::Confirmed,
            reservation::Status::Cancelled => Self::Cancelled,
        }
    }
}

fn model_to_domain(m: reservation::Model) -> Reservation {
    Reservation {
        id: m.id,
        user_id: m.user_id,
        date: m.date,
        time: m.time,
        people: m.people,
        comment: m.comment,
        status: m.status.into(),
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

// ── ReservationRepository impl ──────────────────────────────────

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn create(&self, r: NewReservation) -> DomainResult<Reservation> {
        debug!(user_id = r.user_id, date = %r.date, "Saving reservation");
        let now = Utc::now();
        let status = r.initial_status();

        let model = reservation::ActiveModel {
            id: NotSet,
            user_id: Set(r.user_id),
            date: Set(r.date),
            time: Set(r.time),
            people: Set(r.people),
            comment: Set(r.comment),
            status: Set(status.into()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let saved = model.insert(&self.db).await?;
        Ok(model_to_domain(saved))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Reservation>> {
        let model = reservation::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(model_to_domain))
    }

    async fn list(&self, filter: ReservationFilter) -> DomainResult<Vec<Reservation>> {
        let mut query = reservation::Entity::find();

        if let Some(user_id) = filter.user_id {
            query = query.filter(reservation::Column::UserId.eq(user_id));
        }
        if let Some(date) = filter.date {
            query = query.filter(reservation::Column::Date.eq(date));
        }
        if let Some(status) = filter.status {
            query = query.filter(reservation::Column::Status.eq(reservation::Status::from(status)));
        }

        let models = query
            .order_by_asc(reservation::Column::Date)
            .order_by_asc(reservation::Column::Time)
            .order_by_asc(reservation::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn update_status(
        &self,
        id: i32,
        expected: ReservationStatus,
        next: ReservationStatus,
    ) -> DomainResult<Option<Reservation>> {
        debug!(id, from = %expected, to = %next, "Updating reservation status");

        let result = reservation::Entity::update_many()
            .col_expr(
                reservation::Column::Status,
                Expr::value(reservation::Status::from(next)),
            )
            .col_expr(reservation::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(reservation::Column::Id.eq(id))
            .filter(reservation::Column::Status.eq(reservation::Status::from(expected)))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }
}
