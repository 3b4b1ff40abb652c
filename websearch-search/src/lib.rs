//! WebSearch Search - web search provider adapters
//!
//! Each adapter implements [`websearch_core::SearchProvider`] over a vendor HTTP API and
//! reduces the vendor's hits to generic `{title, url, content}` items.

pub mod providers;

pub use providers::{
    SearchProviderFactory, SerperSearchProvider, TavilySearchProvider, DEFAULT_SERPER_URL,
    DEFAULT_TAVILY_URL,
};
