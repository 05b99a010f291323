pub mod core;
pub mod analysis;
pub mod schema;
pub mod index;
pub mod scoring;
pub mod search;
pub mod query;
pub mod analytics;

/*
┌──────────────────────────────────────────────────────────────────────────────┐
│                            FINDEX ARCHITECTURE                               │
└──────────────────────────────────────────────────────────────────────────────┘

                      ┌──────────────────────────────────┐
                      │        struct SearchService      │
                      │  config: Config                  │
                      │  store: Arc<IndexStore>          │
                      │  engine: QueryEngine             │
                      │  suggestions: SuggestionEngine   │
                      │  analytics: AnalyticsTracker     │
                      └───────┬──────────┬──────────┬────┘
                              │          │          │
          ┌───────────────────┘          │          └──────────────────┐
          ▼                              ▼                             ▼
┌────────────────────┐   ┌──────────────────────────┐   ┌──────────────────────────┐
│ QueryEngine        │   │ SuggestionEngine         │   │ AnalyticsTracker         │
│ tokenize           │   │ Vocabulary (fst::Map)    │   │ Mutex<VecDeque<Event>>   │
│ synonyms           │   │ FuzzyAutomaton (DFA)     │   │ FIFO cap on append       │
│ Scorer (tf+prefix) │   │ PopularQueries (Mutex)   │   │ SearchQualityMetrics     │
│ filters, sort      │   └────────────┬─────────────┘   └──────────────────────────┘
│ facets, paginate   │                │                    (never reads the store)
│ Highlighter        │                │
└─────────┬──────────┘                │
          │ read_index                │ read_index
          ▼                           ▼
┌──────────────────────────────────────────────────────────────────────────────┐
│ IndexStore: RwLock<{ indices: id → (IndexDefinition, DocumentTable),         │
│                      names: name → id }>                                     │
└──────────────────────────────────────────────────────────────────────────────┘

Text analysis (analysis/): StandardTokenizer → StopWordFilter → MinLengthFilter
*/
