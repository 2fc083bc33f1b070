//! Shared application state: chart store plus a read-through DashMap cache.

use anyhow::Result;
use dashmap::DashMap;
use sidstar_core::Chart;
use std::time::Duration;

use crate::cache::{prune_cache, CachedChart};
use crate::config::Config;
use crate::persistence::{charts, Database};

/// Application state - thread-safe chart access for request handlers.
pub struct AppState {
    db: Database,
    config: Config,
    charts: DashMap<String, CachedChart>,
}

impl AppState {
    pub fn with_database(db: Database, config: Config) -> Self {
        Self {
            db,
            config,
            charts: DashMap::new(),
        }
    }

    fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.config.chart_cache_ttl_s)
    }

    /// Get a chart by id, serving from the cache while the entry is fresh.
    pub async fn get_chart(&self, chart_id: &str) -> Result<Option<Chart>> {
        if let Some(entry) = self.charts.get(chart_id) {
            if entry.is_fresh(self.cache_ttl()) {
                return Ok(Some(entry.chart.clone()));
            }
        }

        let Some(chart) = charts::load_chart(self.db.pool(), chart_id).await? else {
            self.charts.remove(chart_id);
            return Ok(None);
        };

        tracing::debug!("Cached chart {} ({} fixes)", chart.id, chart.fixes.len());
        self.charts
            .insert(chart.id.clone(), CachedChart::new(chart.clone()));
        prune_cache(
            &self.charts,
            self.config.chart_cache_max_entries,
            self.cache_ttl(),
        );

        Ok(Some(chart))
    }

    /// All charts for an airport. Listings always read the store.
    pub async fn charts_for_airport(&self, airport_id: &str) -> Result<Vec<Chart>> {
        charts::load_charts_by_airport(self.db.pool(), airport_id).await
    }

    /// Write a chart and refresh its cache entry.
    pub async fn save_chart(&self, chart: Chart) -> Result<()> {
        charts::upsert_chart(self.db.pool(), &chart).await?;
        self.charts.insert(chart.id.clone(), CachedChart::new(chart));
        Ok(())
    }

    pub fn cached_chart_count(&self) -> usize {
        self.charts.len()
    }
}
