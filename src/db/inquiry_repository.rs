// src/db/inquiry_repository.rs
// DOCUMENTATION: Database access layer for placement inquiries
// PURPOSE: Scoped listing, CRUD and partial updates

use crate::errors::ApiError;
use crate::models::*;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

const INQUIRY_SELECT: &str = r#"
    SELECT
        i.id, i.family_id, i.home_id, h.name AS home_name,
        i.status, i.urgency,
        i.contact_name, i.contact_email, i.contact_phone,
        i.care_recipient_name, i.care_recipient_age, i.care_needs,
        i.additional_info, i.preferred_contact_method,
        i.tour_date, i.internal_notes, i.assigned_to_id,
        i.created_at, i.updated_at,
        f.user_id AS family_user_id,
        o.user_id AS operator_user_id
    FROM inquiries i
    JOIN families f ON f.id = i.family_id
    JOIN homes h ON h.id = i.home_id
    JOIN operators o ON o.id = h.operator_id
"#;

/// Which inquiries a caller may list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InquiryScope {
    All,
    /// Inquiries sent by the family owned by this user
    FamilyUser(Uuid),
    /// Inquiries for homes operated by this user
    OperatorUser(Uuid),
}

pub struct InquiryRepository;

impl InquiryRepository {
    fn push_filters(
        qb: &mut QueryBuilder<'_, Postgres>,
        scope: InquiryScope,
        query: &InquiryListQuery,
    ) {
        qb.push(" WHERE 1 = 1");
        match scope {
            InquiryScope::All => {}
            InquiryScope::FamilyUser(user_id) => {
                qb.push(" AND f.user_id = ").push_bind(user_id);
            }
            InquiryScope::OperatorUser(user_id) => {
                qb.push(" AND o.user_id = ").push_bind(user_id);
            }
        }
        if let Some(status) = query.status {
            qb.push(" AND i.status = ").push_bind(status.as_str());
        }
        if let Some(home_id) = query.home_id {
            qb.push(" AND i.home_id = ").push_bind(home_id);
        }
    }

    /// Page of inquiries visible in `scope`, newest first, with the total count
    pub async fn list(
        pool: &PgPool,
        scope: InquiryScope,
        query: &InquiryListQuery,
        page: PageParams,
    ) -> Result<(Vec<Inquiry>, i64), ApiError> {
        let mut qb = QueryBuilder::new(INQUIRY_SELECT);
        Self::push_filters(&mut qb, scope, query);
        qb.push(" ORDER BY i.created_at DESC LIMIT ")
            .push_bind(page.limit)
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows: Vec<InquiryRow> = qb
            .build_query_as()
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to list inquiries: {}", e);
                ApiError::DatabaseError(e.to_string())
            })?;

        let mut count_qb = QueryBuilder::new(
            r#"
            SELECT COUNT(*)
            FROM inquiries i
            JOIN families f ON f.id = i.family_id
            JOIN homes h ON h.id = i.home_id
            JOIN operators o ON o.id = h.operator_id
            "#,
        );
        Self::push_filters(&mut count_qb, scope, query);
        let total: (i64,) = count_qb
            .build_query_as()
            .fetch_one(pool)
            .await
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        let inquiries = rows
            .into_iter()
            .map(InquiryRow::into_inquiry)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((inquiries, total.0))
    }

    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Inquiry, ApiError> {
        let row: InquiryRow = sqlx::query_as(&format!("{} WHERE i.id = $1", INQUIRY_SELECT))
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?
            .ok_or_else(|| ApiError::not_found("Inquiry"))?;
        row.into_inquiry()
    }

    pub async fn create(
        pool: &PgPool,
        family_id: Uuid,
        req: &CreateInquiryRequest,
    ) -> Result<Inquiry, ApiError> {
        let inserted: (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO inquiries (
                family_id, home_id, status, urgency,
                contact_name, contact_email, contact_phone,
                care_recipient_name, care_recipient_age, care_needs,
                additional_info, preferred_contact_method, tour_date,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, NOW(), NOW())
            RETURNING id
            "#,
        )
        .bind(family_id) // $1
        .bind(req.home_id) // $2
        .bind(InquiryStatus::New.as_str()) // $3
        .bind(req.urgency.unwrap_or(InquiryUrgency::Medium).as_str()) // $4
        .bind(&req.contact_name) // $5
        .bind(&req.contact_email) // $6
        .bind(&req.contact_phone) // $7
        .bind(&req.care_recipient_name) // $8
        .bind(req.care_recipient_age) // $9
        .bind(&req.care_needs) // $10
        .bind(&req.additional_info) // $11
        .bind(req.preferred_contact_method.unwrap_or(ContactMethod::Any).as_str()) // $12
        .bind(req.tour_date) // $13
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to create inquiry: {}", e);
            ApiError::DatabaseError(e.to_string())
        })?;

        let inquiry = Self::get_by_id(pool, inserted.0).await?;
        log::info!("Created inquiry {} for home {}", inquiry.id, inquiry.home_id);
        Ok(inquiry)
    }

    /// Apply only the fields present in `req`
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        req: &UpdateInquiryRequest,
    ) -> Result<Inquiry, ApiError> {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new("UPDATE inquiries SET ");
        {
            let mut set = qb.separated(", ");
            if let Some(status) = req.status {
                set.push("status = ").push_bind_unseparated(status.as_str());
            }
            if let Some(urgency) = req.urgency {
                set.push("urgency = ").push_bind_unseparated(urgency.as_str());
            }
            if let Some(assigned) = req.assigned_to_id {
                set.push("assigned_to_id = ").push_bind_unseparated(assigned);
            }
            if let Some(notes) = &req.internal_notes {
                set.push("internal_notes = ").push_bind_unseparated(notes.clone());
            }
            if let Some(tour_date) = req.tour_date {
                set.push("tour_date = ").push_bind_unseparated(tour_date);
            }
            if let Some(name) = &req.contact_name {
                set.push("contact_name = ").push_bind_unseparated(name.clone());
            }
            if let Some(email) = &req.contact_email {
                set.push("contact_email = ").push_bind_unseparated(email.clone());
            }
            if let Some(phone) = &req.contact_phone {
                set.push("contact_phone = ").push_bind_unseparated(phone.clone());
            }
            if let Some(name) = &req.care_recipient_name {
                set.push("care_recipient_name = ").push_bind_unseparated(name.clone());
            }
            if let Some(age) = req.care_recipient_age {
                set.push("care_recipient_age = ").push_bind_unseparated(age);
            }
            if let Some(needs) = &req.care_needs {
                set.push("care_needs = ").push_bind_unseparated(needs.clone());
            }
            if let Some(info) = &req.additional_info {
                set.push("additional_info = ").push_bind_unseparated(info.clone());
            }
            if let Some(method) = req.preferred_contact_method {
                set.push("preferred_contact_method = ")
                    .push_bind_unseparated(method.as_str());
            }
            set.push("updated_at = NOW()");
        }
        qb.push(" WHERE id = ").push_bind(id);

        let result = qb.build().execute(pool).await.map_err(|e| {
            log::error!("Failed to update inquiry {}: {}", id, e);
            ApiError::DatabaseError(e.to_string())
        })?;
        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("Inquiry"));
        }

        Self::get_by_id(pool, id).await
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM inquiries WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;
        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("Inquiry"));
        }
        log::info!("Deleted inquiry {}", id);
        Ok(())
    }
}
