/// findex API demo
///
/// Walks through the main operations:
/// - Index creation and document indexing
/// - Search with filters, facets, sorting and highlighting
/// - Autocomplete, fuzzy and popular-query suggestions
/// - Search quality metrics

use chrono::{Duration, Utc};
use findex::analytics::events::ClickLog;
use findex::core::config::Config;
use findex::core::service::SearchService;
use findex::core::types::fields_from_json;
use findex::index::store::DocumentInput;
use findex::query::filter::Filter;
use findex::query::types::{FacetRequest, HighlightRequest, SearchQuery, SortSpec};
use findex::schema::schema::{FieldDefinition, IndexSettings};
use findex::search::suggest::SuggestionRequest;
use serde_json::json;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "findex=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::builder().default_limit(5).build()?;
    let service = SearchService::new(config)?;

    println!("Step 1: creating index...");
    let index = service.store().create_index(
        "products",
        vec![
            FieldDefinition::text("name").with_weight(3.0),
            FieldDefinition::text("description"),
            FieldDefinition::keyword("category"),
            FieldDefinition::number("price"),
        ],
        Some(
            IndexSettings::default()
                .with_stop_words(vec!["the", "a", "for"])
                .with_synonym("sneakers", vec!["shoes", "trainers"]),
        ),
    )?;
    println!("  created '{}' ({})\n", index.name, index.id);

    println!("Step 2: indexing documents...");
    let docs = vec![
        json!({"id": "1", "name": "Trail running shoes", "description": "Lightweight shoes for the trail", "category": "footwear", "price": 120.0}),
        json!({"id": "2", "name": "Road running shoes", "description": "Cushioned shoes for road running", "category": "footwear", "price": 95.0}),
        json!({"id": "3", "name": "Running shorts", "description": "Breathable shorts", "category": "apparel", "price": 35.0}),
        json!({"id": "4", "name": "Hiking boots", "description": "Waterproof boots for the mountains", "category": "footwear", "price": 180.0}),
        json!({"id": "5", "name": "Rain jacket", "description": "A packable jacket", "category": "apparel"}),
    ];
    let inputs = docs
        .into_iter()
        .filter_map(|mut doc| {
            let id = doc.as_object_mut()?.remove("id")?.as_str()?.to_string();
            Some(DocumentInput::new(id, fields_from_json(doc)?))
        })
        .collect();
    let bulk = service.store().bulk_index(&index.id, inputs)?;
    println!("  indexed {} documents, {} errors\n", bulk.indexed, bulk.errors.len());

    println!("Step 3: searching 'sneakers running'...");
    let query = SearchQuery::new(&index.id, "sneakers running")
        .with_filter(Filter::parse("price", "lte", json!(150)))
        .with_facet(FacetRequest::new("category"))
        .with_highlight(HighlightRequest::new(vec!["name", "description"]))
        .with_sort(SortSpec::asc("price"));
    let result = service.search_and_record(&query, Some("demo-user"))?;
    println!("  {} hits in {}ms (max score {:.3})", result.total_hits, result.took_ms, result.max_score);
    for hit in &result.hits {
        println!("  [{:.3}] {} {:?}", hit.score, hit.id, hit.highlights.get("name"));
    }
    if let Some(facets) = &result.facets {
        for (field, buckets) in facets {
            for bucket in buckets {
                println!("  facet {}={:?}: {}", field, bucket.value, bucket.count);
            }
        }
    }
    println!();

    println!("Step 4: suggestions...");
    service.search_and_record(&SearchQuery::new(&index.id, "running shoes"), Some("demo-user"))?;
    for prefix in ["run", "boot", "jaket"] {
        let suggestions = service.suggestions().suggest(&SuggestionRequest::new(&index.id, prefix))?;
        let texts: Vec<String> = suggestions
            .iter()
            .map(|s| format!("{} ({:?}, {:.2})", s.text, s.kind, s.score))
            .collect();
        println!("  '{}' -> {}", prefix, texts.join(", "));
    }
    println!();

    println!("Step 5: analytics...");
    service.search_and_record(&SearchQuery::new(&index.id, "kayak"), Some("demo-user"))?;
    service.analytics().log_click(ClickLog::new(&index.id, "running shoes", "2", 1));
    let now = Utc::now();
    let metrics = service
        .analytics()
        .compute_metrics(&index.id, now - Duration::hours(1), now + Duration::hours(1));
    println!(
        "  queries={} zero_result_rate={:.2} ctr={:.2}",
        metrics.total_queries, metrics.zero_result_rate, metrics.click_through_rate
    );
    println!("  recent for demo-user: {:?}", service.suggestions().get_recent_queries("demo-user", 10));

    let stats = service.store().get_index_stats(&index.id)?;
    println!("  index stats: {} docs, {} terms", stats.document_count, stats.total_terms);

    Ok(())
}
