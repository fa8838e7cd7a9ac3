//! Daybook demo
//!
//! Seeds an in-memory store with a week of data, then prints a water
//! summary and walks the food list page by page.

use chrono::{Days, NaiveDate, Utc};
use daybook::config::Config;
use daybook::pagination::{Cursor, CursorCodec, CursorPaginator};
use daybook::range::{Clock, DateRangeResolver, SystemClock};
use daybook::source::{DataSource, FoodItem, InMemoryStore, NewEntry, NewFood};
use daybook::TrackedMetric;

const USER: &str = "demo-user";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();
    daybook::logging::init(&config.logging)?;

    tracing::info!("Daybook v{}", env!("CARGO_PKG_VERSION"));

    let clock = SystemClock::with_offset_minutes(config.clock.utc_offset_minutes);
    let today = clock.today();
    let store = InMemoryStore::new();

    seed(&store, today).await?;
    tracing::info!("Store stats: {}", store.stats().await);

    demo_water_summary(&store, &config, today).await?;
    demo_food_pages(&store).await?;

    tracing::info!("Demo complete");
    Ok(())
}

async fn seed(
    store: &InMemoryStore,
    today: NaiveDate,
) -> Result<(), Box<dyn std::error::Error>> {
    let now = Utc::now().timestamp_millis();

    // Skip every third day so the summary shows gap filling
    for back in 0..7u64 {
        if back % 3 == 2 {
            continue;
        }
        let date = today
            .checked_sub_days(Days::new(back))
            .ok_or("date out of range")?;
        let recorded_at = now - i64::try_from(back)? * 60_000;
        for (offset, ml) in [(0, 250.0), (1, 500.0)] {
            store
                .log_metric(
                    USER,
                    NewEntry::new(TrackedMetric::Water, date, ml, recorded_at + offset),
                )
                .await?;
        }
    }

    for (name, kcal) in [
        ("Oatmeal", 150.0),
        ("Banana", 105.0),
        ("Greek yogurt", 130.0),
        ("Chicken breast", 165.0),
        ("Brown rice", 216.0),
    ] {
        store
            .create_food(
                USER,
                NewFood {
                    name: name.to_string(),
                    kcal_per_serving: kcal,
                    serving_size: None,
                },
            )
            .await?;
    }

    Ok(())
}

async fn demo_water_summary(
    store: &InMemoryStore,
    config: &Config,
    today: NaiveDate,
) -> Result<(), Box<dyn std::error::Error>> {
    let metric = TrackedMetric::Water;
    let resolver = DateRangeResolver::new(config.ranges.policy_for(metric));
    let range = resolver.resolve(None, None, today)?;

    let records = store.metric_records(USER, metric, &range).await?;
    let series = metric.aggregator().aggregate(&range, &records);

    for point in &series.points {
        tracing::info!(
            date = %point.date,
            value = point.value.unwrap_or_default(),
            "{} ({})",
            metric,
            metric.unit()
        );
    }

    tracing::info!(
        range = %range,
        total = series.stats.total,
        average = series.stats.average,
        active_days = series.stats.active_days,
        "Water summary"
    );

    Ok(())
}

async fn demo_food_pages(store: &InMemoryStore) -> Result<(), Box<dyn std::error::Error>> {
    let limit = 2;
    let paginator = CursorPaginator::new(CursorCodec::ids());
    let fetch = CursorPaginator::fetch_limit(limit)?;

    let mut cursor: Option<Cursor> = None;
    let mut page_no = 1;
    loop {
        let after = paginator.codec().decode(cursor.as_ref().map(Cursor::as_str));
        let rows = store.foods_after(USER, after, fetch).await?;
        let page = paginator.paginate(rows, limit, FoodItem::cursor_key)?;

        let names: Vec<&str> = page.items.iter().map(|f| f.name.as_str()).collect();
        tracing::info!(page = page_no, has_more = page.has_more, "Foods: {}", names.join(", "));

        if !page.has_more {
            break;
        }
        cursor = page.next_cursor;
        page_no += 1;
    }

    Ok(())
}
