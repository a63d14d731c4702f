use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::common::FieldCount;
use crate::dto::owner_dto::OwnerInput;
use crate::models::owner::Owner;
use crate::utils::errors::AppError;

/// Owner columns carrying a uniqueness constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerUniqueField {
    OwnerId,
    Contact,
    LicenseNumber,
}

impl OwnerUniqueField {
    fn column(self) -> &'static str {
        match self {
            Self::OwnerId => "owner_id",
            Self::Contact => "contact",
            Self::LicenseNumber => "license_number",
        }
    }
}

pub struct OwnerRepository {
    pool: PgPool,
}

impl OwnerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: &OwnerInput) -> Result<Owner, AppError> {
        let now = Utc::now();
        let owner = sqlx::query_as::<_, Owner>(
            r#"
            INSERT INTO owners (
                id, owner_id, name, contact, address, license_number, date_of_birth,
                gender, email, vehicles, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.owner_id)
        .bind(&input.name)
        .bind(&input.contact)
        .bind(&input.address)
        .bind(&input.license_number)
        .bind(input.date_of_birth)
        .bind(&input.gender)
        .bind(&input.email)
        .bind(input.vehicles.as_deref().unwrap_or_default())
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(owner)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Owner>, AppError> {
        let owner = sqlx::query_as::<_, Owner>("SELECT * FROM owners WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(owner)
    }

    pub async fn find_by_owner_id(&self, owner_id: &str) -> Result<Option<Owner>, AppError> {
        let owner = sqlx::query_as::<_, Owner>("SELECT * FROM owners WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(owner)
    }

    pub async fn find_all(&self) -> Result<Vec<Owner>, AppError> {
        let owners = sqlx::query_as::<_, Owner>("SELECT * FROM owners ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(owners)
    }

    /// Case-insensitive substring match on the name
    pub async fn search_by_name(&self, query: &str) -> Result<Vec<Owner>, AppError> {
        let pattern = format!("%{}%", escape_like(query));
        let owners = sqlx::query_as::<_, Owner>(
            "SELECT * FROM owners WHERE name ILIKE $1 ESCAPE '\\' ORDER BY name",
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(owners)
    }

    /// Value already used by another owner, optionally ignoring one row
    pub async fn exists(
        &self,
        field: OwnerUniqueField,
        value: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM owners WHERE {} = $1 AND ($2::uuid IS NULL OR id <> $2))",
            field.column()
        );
        let result: (bool,) = sqlx::query_as(&sql)
            .bind(value)
            .bind(exclude_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0)
    }

    /// Overwrite the required fields; `email` and `vehicles` only when given.
    /// Returns `false` when nothing differed.
    pub async fn update(&self, id: Uuid, input: &OwnerInput) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE owners
            SET owner_id = $2, name = $3, contact = $4, address = $5, license_number = $6,
                date_of_birth = $7, gender = $8,
                email = COALESCE($9, email),
                vehicles = COALESCE($10, vehicles),
                updated_at = NOW()
            WHERE id = $1
              AND (owner_id, name, contact, address, license_number, date_of_birth, gender,
                   email, vehicles)
                  IS DISTINCT FROM
                  ($2, $3, $4, $5, $6, $7, $8, COALESCE($9, email), COALESCE($10, vehicles))
            "#,
        )
        .bind(id)
        .bind(&input.owner_id)
        .bind(&input.name)
        .bind(&input.contact)
        .bind(&input.address)
        .bind(&input.license_number)
        .bind(input.date_of_birth)
        .bind(&input.gender)
        .bind(&input.email)
        .bind(&input.vehicles)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count_by_gender(&self) -> Result<Vec<FieldCount>, AppError> {
        let counts = sqlx::query_as::<_, FieldCount>(
            "SELECT gender AS key, COUNT(*) AS count FROM owners GROUP BY gender ORDER BY gender",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }

    /// Vehicles referencing the owner are detached by the foreign key
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM owners WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("Perera"), "Perera");
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }

    #[test]
    fn test_unique_columns() {
        assert_eq!(OwnerUniqueField::OwnerId.column(), "owner_id");
        assert_eq!(OwnerUniqueField::Contact.column(), "contact");
        assert_eq!(OwnerUniqueField::LicenseNumber.column(), "license_number");
    }
}
