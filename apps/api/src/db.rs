use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};
use tracing::info;

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Schema DDL, applied idempotently at startup.
///
/// Embeddings are stored as JSONB arrays: they are opaque numeric
/// fingerprints to this service, and NULL means "not computed".
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS candidates (
    id          UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    full_name   TEXT,
    email       TEXT UNIQUE,
    phone       TEXT,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS resumes (
    id            UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    candidate_id  UUID NOT NULL REFERENCES candidates(id) ON DELETE CASCADE,
    filename      TEXT NOT NULL,
    upload_path   TEXT NOT NULL,
    raw_text      TEXT NOT NULL,
    parsed_json   JSONB,
    embedding     JSONB,
    uploaded_at   TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS skills (
    id              UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    skill_name      TEXT NOT NULL UNIQUE,
    canonical_name  TEXT
);

CREATE TABLE IF NOT EXISTS resume_skills (
    id          UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    resume_id   UUID NOT NULL REFERENCES resumes(id) ON DELETE CASCADE,
    skill_id    UUID NOT NULL REFERENCES skills(id),
    confidence  DOUBLE PRECISION NOT NULL
);

CREATE TABLE IF NOT EXISTS jobs (
    id           UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    title        TEXT NOT NULL,
    description  TEXT,
    embedding    JSONB,
    created_at   TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE TABLE IF NOT EXISTS job_skills (
    id        UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    job_id    UUID NOT NULL REFERENCES jobs(id) ON DELETE CASCADE,
    skill_id  UUID NOT NULL REFERENCES skills(id)
);

CREATE TABLE IF NOT EXISTS rankings (
    id              UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    job_id          UUID NOT NULL REFERENCES jobs(id) ON DELETE CASCADE,
    resume_id       UUID NOT NULL REFERENCES resumes(id) ON DELETE CASCADE,
    score_semantic  DOUBLE PRECISION NOT NULL,
    score_skill     DOUBLE PRECISION NOT NULL,
    final_score     DOUBLE PRECISION NOT NULL,
    created_at      TIMESTAMPTZ NOT NULL DEFAULT now()
);
"#;

/// Creates all tables if they do not exist yet.
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    pool.execute(SCHEMA_SQL).await?;
    info!("Database schema initialized");
    Ok(())
}
