//! Two-tier in-memory index of registered emails, consulted before the database.
//!
//! The cuckoo filter answers "definitely free" quickly; the moka cache answers
//! "definitely taken" for recently active accounts. Anything else goes to MySQL.

use anyhow::{Result, anyhow};
use autoscale_cuckoo_filter::CuckooFilter;
use futures_util::StreamExt;
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::sync::RwLock;
use std::time::Duration;

const FILTER_CAPACITY: usize = 10_000;
const FALSE_POSITIVE_RATE: f64 = 0.001;

static EMAIL_FILTER: Lazy<RwLock<CuckooFilter<String>>> =
    Lazy::new(|| RwLock::new(CuckooFilter::new(FILTER_CAPACITY, FALSE_POSITIVE_RATE)));

/// Entries present are taken.
static TAKEN_CACHE: Lazy<Cache<String, ()>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(50_000)
        .time_to_live(Duration::from_secs(86400))
        .build()
});

#[inline]
pub fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

fn might_exist(email: &str) -> bool {
    let email = email.to_owned();
    match EMAIL_FILTER.read() {
        Ok(filter) => filter.contains(&email),
        // a poisoned filter cannot prove absence
        Err(_) => true,
    }
}

fn add_to_filter<'a, I: IntoIterator<Item = &'a String>>(emails: I) {
    let mut filter = match EMAIL_FILTER.write() {
        Ok(f) => f,
        Err(poisoned) => poisoned.into_inner(),
    };
    for email in emails {
        filter.add(email);
    }
}

/// Record a newly created account.
pub async fn mark_taken(email: &str) {
    let email = normalize(email);
    add_to_filter(std::iter::once(&email));
    TAKEN_CACHE.insert(email, ()).await;
}

/// true  => email AVAILABLE
/// false => email TAKEN (or the lookup failed)
pub async fn is_available(email: &str, pool: &MySqlPool) -> bool {
    let email = normalize(email);

    if !might_exist(&email) {
        return true;
    }

    if TAKEN_CACHE.contains_key(&email) {
        return false;
    }

    let exists = sqlx::query_scalar::<_, i64>(
        "SELECT EXISTS(SELECT 1 FROM users WHERE email = ? LIMIT 1)",
    )
    .bind(&email)
    .fetch_one(pool)
    .await
    .map(|n| n != 0)
    .unwrap_or(true); // fail-safe

    if exists {
        TAKEN_CACHE.insert(email, ()).await;
    }

    !exists
}

/// Stream every email into the filter, and recently active ones into the cache.
pub async fn warmup(pool: &MySqlPool, recent_days: u32, batch_size: usize) -> Result<()> {
    let mut stream = sqlx::query_as::<_, (String, i64)>(
        r#"
        SELECT email,
               CAST(COALESCE(last_login_at >= NOW() - INTERVAL ? DAY, 0) AS SIGNED) AS recent
        FROM users
        "#,
    )
    .bind(recent_days)
    .fetch(pool);

    let mut batch = Vec::with_capacity(batch_size);
    let mut recent = Vec::new();
    let mut total = 0usize;

    while let Some(row) = stream.next().await {
        let (email, is_recent) = row.map_err(|e| anyhow!("DB row fetch failed: {}", e))?;
        let email = normalize(&email);
        if is_recent != 0 {
            recent.push(email.clone());
        }
        batch.push(email);
        total += 1;

        if batch.len() >= batch_size {
            add_to_filter(&batch);
            batch.clear();
        }
    }

    if !batch.is_empty() {
        add_to_filter(&batch);
    }

    let inserts: Vec<_> = recent
        .iter()
        .map(|e| TAKEN_CACHE.insert(e.clone(), ()))
        .collect();
    futures::future::join_all(inserts).await;

    log::info!(
        "Email index warmup complete: {} accounts, {} active in the last {} days",
        total,
        recent.len(),
        recent_days
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize("  Ana.K@Atelier.UZ "), "ana.k@atelier.uz");
    }

    #[actix_web::test]
    async fn marked_emails_hit_filter_and_cache() {
        mark_taken("Dilnoza@example.com").await;
        assert!(might_exist("dilnoza@example.com"));
        assert!(TAKEN_CACHE.contains_key("dilnoza@example.com"));
    }
}
