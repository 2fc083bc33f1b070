//! Chart persistence operations.

use anyhow::Result;
use sidstar_core::{Chart, ChartType};
use sqlx::SqlitePool;

const CHART_COLUMNS: &str = "id, airport_id, name, chart_type, map_url, map_url_no_alt, map_url_no_fix, map_url_clean, fixes";

/// Upsert a chart into the database.
pub async fn upsert_chart(pool: &SqlitePool, chart: &Chart) -> Result<()> {
    let fixes_json = serde_json::to_string(&chart.fixes)?;

    sqlx::query(
        r#"
        INSERT INTO charts (id, airport_id, name, chart_type, map_url, map_url_no_alt, map_url_no_fix, map_url_clean, fixes, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, CURRENT_TIMESTAMP)
        ON CONFLICT(id) DO UPDATE SET
            airport_id = ?2, name = ?3, chart_type = ?4, map_url = ?5,
            map_url_no_alt = ?6, map_url_no_fix = ?7, map_url_clean = ?8,
            fixes = ?9, updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(&chart.id)
    .bind(&chart.airport_id)
    .bind(&chart.name)
    .bind(chart.chart_type.as_str())
    .bind(&chart.map_url)
    .bind(&chart.map_url_no_alt)
    .bind(&chart.map_url_no_fix)
    .bind(&chart.map_url_clean)
    .bind(&fixes_json)
    .execute(pool)
    .await?;

    Ok(())
}

/// Load one chart by id.
pub async fn load_chart(pool: &SqlitePool, id: &str) -> Result<Option<Chart>> {
    let row = sqlx::query_as::<_, ChartRow>(&format!(
        "SELECT {CHART_COLUMNS} FROM charts WHERE id = ?1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(Chart::try_from).transpose()
}

/// Load every chart for an airport, ordered by type then name.
pub async fn load_charts_by_airport(pool: &SqlitePool, airport_id: &str) -> Result<Vec<Chart>> {
    let rows = sqlx::query_as::<_, ChartRow>(&format!(
        "SELECT {CHART_COLUMNS} FROM charts WHERE airport_id = ?1 ORDER BY chart_type, name"
    ))
    .bind(airport_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(|r| r.try_into()).collect()
}

/// Delete all charts. Returns the number removed.
pub async fn delete_all_charts(pool: &SqlitePool) -> Result<u64> {
    let result = sqlx::query("DELETE FROM charts").execute(pool).await?;
    Ok(result.rows_affected())
}

// Internal row type for SQLx
#[derive(sqlx::FromRow)]
struct ChartRow {
    id: String,
    airport_id: String,
    name: String,
    chart_type: String,
    map_url: String,
    map_url_no_alt: Option<String>,
    map_url_no_fix: Option<String>,
    map_url_clean: Option<String>,
    fixes: String,
}

impl TryFrom<ChartRow> for Chart {
    type Error = anyhow::Error;

    fn try_from(row: ChartRow) -> Result<Self> {
        let chart_type: ChartType = row.chart_type.parse()?;
        let fixes = serde_json::from_str(&row.fixes)?;

        Ok(Chart {
            id: row.id,
            airport_id: row.airport_id,
            name: row.name,
            chart_type,
            map_url: row.map_url,
            map_url_no_alt: row.map_url_no_alt,
            map_url_no_fix: row.map_url_no_fix,
            map_url_clean: row.map_url_clean,
            fixes,
        })
    }
}
