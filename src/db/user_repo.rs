// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{common::error::AppError, models::user::UserSnapshot};

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Upsert oportunista do snapshot de exibição: sempre que a identidade
    // do ator é conhecida, o cache é atualizado com o que veio na sessão.
    pub async fn upsert_snapshot<'e, E>(
        &self,
        executor: E,
        snapshot: &UserSnapshot,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, first_name, last_name, image_url)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
            SET email      = EXCLUDED.email,
                first_name = EXCLUDED.first_name,
                last_name  = EXCLUDED.last_name,
                image_url  = EXCLUDED.image_url,
                updated_at = now()
            "#,
        )
        .bind(&snapshot.id)
        .bind(&snapshot.email)
        .bind(&snapshot.first_name)
        .bind(&snapshot.last_name)
        .bind(&snapshot.image_url)
        .execute(executor)
        .await?;

        Ok(())
    }
}
