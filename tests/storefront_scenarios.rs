//! End-to-end storefront scenarios against the command router
//! Run with: cargo test --test storefront_scenarios

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Once;

use domain_store_bot::application::errors::StoreError;
use domain_store_bot::application::formatter::{EmptyContext, ReplyFormatter};
use domain_store_bot::application::messaging::{CommandRouter, MessageParser};
use domain_store_bot::domain::entities::{CatalogRecord, Event};
use domain_store_bot::domain::traits::CatalogStore;
use domain_store_bot::infrastructure::storage::MemoryCatalog;

static INIT: Once = Once::new();

fn ensure_init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

/// Store wrapper that counts every query
struct CountingStore {
    inner: MemoryCatalog,
    calls: AtomicUsize,
}

impl CountingStore {
    fn new(records: Vec<CatalogRecord>) -> Self {
        Self {
            inner: MemoryCatalog::from_records(records),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogStore for CountingStore {
    async fn list_all(&self) -> Result<Vec<CatalogRecord>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.list_all().await
    }

    async fn find_by_keyword(&self, keyword: &str) -> Result<Vec<CatalogRecord>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_keyword(keyword).await
    }
}

fn domains(names: &[String]) -> Vec<CatalogRecord> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| CatalogRecord::new(name.clone(), 1000 + i as u64 * 100))
        .collect()
}

fn numbered(count: usize) -> Vec<CatalogRecord> {
    let names: Vec<String> = (1..=count).map(|i| format!("domain{:02}.ru", i)).collect();
    domains(&names)
}

fn router(records: Vec<CatalogRecord>) -> CommandRouter<CountingStore> {
    ensure_init();
    CommandRouter::new(CountingStore::new(records), ReplyFormatter::default())
}

fn parse(text: &str) -> Event {
    MessageParser::default().parse(text)
}

#[tokio::test]
async fn start_with_twelve_records_shows_ten_and_overflow() {
    let router = router(numbered(12));
    let replies = router.route(&parse("/start")).await;

    assert_eq!(replies.len(), 11);
    for (i, reply) in replies[..10].iter().enumerate() {
        assert!(reply.text.contains(&format!("domain{:02}.ru", i + 1)));
        assert!(reply.text.contains("📝 Описание: Нет описания"));
        assert_eq!(
            reply.action.as_ref().map(|a| a.payload.clone()),
            Some(format!("buy_domain{:02}.ru", i + 1))
        );
    }
    assert_eq!(replies[10], ReplyFormatter::default().format_overflow_notice(12, 10));
    assert_eq!(router.catalog().store().calls(), 1);
}

#[tokio::test]
async fn start_returns_min_of_page_and_total() {
    for total in [1, 5, 9, 10, 11, 25] {
        let replies = router(numbered(total)).route(&parse("/start")).await;
        let cards = replies.iter().filter(|r| r.action.is_some()).count();
        let notices = replies.len() - cards;

        assert_eq!(cards, total.min(10), "total={}", total);
        assert_eq!(notices, usize::from(total > 10), "total={}", total);
    }
}

#[tokio::test]
async fn start_on_empty_catalog() {
    let replies = router(Vec::new()).route(&parse("/start")).await;
    assert_eq!(replies, vec![ReplyFormatter::default().format_empty(EmptyContext::Catalog)]);
}

#[tokio::test]
async fn search_without_args_is_usage_and_skips_store() {
    for text in ["/search", "/search    ", "/search\t"] {
        let router = router(numbered(3));
        let replies = router.route(&parse(text)).await;

        assert_eq!(replies, vec![ReplyFormatter::default().format_usage("search")], "{:?}", text);
        assert_eq!(router.catalog().store().calls(), 0);
    }
}

#[tokio::test]
async fn short_free_text_is_ignored_without_store_call() {
    for text in ["ab", "  ab ", "я", ""] {
        let router = router(numbered(3));
        assert!(router.route(&parse(text)).await.is_empty(), "{:?}", text);
        assert_eq!(router.catalog().store().calls(), 0);
    }
}

#[tokio::test]
async fn free_text_crimea_caps_at_five() {
    let mut names: Vec<String> = (1..=7).map(|i| format!("crimea{}.ru", i)).collect();
    names.push("sochi.ru".to_string());
    let router = router(domains(&names));

    let replies = router.route(&parse("crimea")).await;
    assert_eq!(replies.len(), 6);
    assert_eq!(replies[0].text, "🔍 Найдено 7 доменов по запросу 'crimea':");
    for (i, reply) in replies[1..].iter().enumerate() {
        assert!(reply.text.contains(&format!("crimea{}.ru", i + 1)));
        assert!(!reply.text.contains("Описание"));
    }
}

#[tokio::test]
async fn search_command_lists_every_match() {
    let names: Vec<String> = (1..=7).map(|i| format!("crimea{}.ru", i)).collect();
    let replies = router(domains(&names)).route(&parse("/search crimea")).await;
    assert_eq!(replies.len(), 8);
}

#[tokio::test]
async fn search_matches_exactly_the_names_containing_keyword() {
    let names: Vec<String> = ["krym.ru", "KRYM.ru", "big-krym.com", "sochi.ru", "kry.m"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let records = domains(&names);
    let router = router(records.clone());

    for keyword in ["krym", "KRYM", "ru", "m", "nothing"] {
        let found = router.catalog().search(keyword).await.unwrap();
        for record in &records {
            assert_eq!(found.contains(record), record.name.contains(keyword), "{} / {}", keyword, record.name);
        }
    }
}

#[tokio::test]
async fn free_text_is_lowercased_but_search_command_is_not() {
    let names = vec!["krym.ru".to_string()];

    let by_text = router(domains(&names)).route(&parse("KRYM")).await;
    assert_eq!(by_text.len(), 2);

    let by_command = router(domains(&names)).route(&parse("/search KRYM")).await;
    assert_eq!(by_command, vec![ReplyFormatter::default().format_empty(EmptyContext::Search("KRYM"))]);
}

#[tokio::test]
async fn buy_button_round_trips_names() {
    let router = router(Vec::new());
    for (payload, name) in [("buy_example.com", "example.com"), ("buy_my_domain.com", "my_domain.com")] {
        let replies = router.route(&Event::action(payload)).await;
        assert_eq!(replies, vec![ReplyFormatter::default().format_buy_ack(name)]);
        assert_eq!(replies[0].text, format!("Вы выбрали: {}. Свяжитесь с @admin@wwwrent.ru", name));
    }
    assert_eq!(router.catalog().store().calls(), 0);
}

#[tokio::test]
async fn card_payload_feeds_back_into_acknowledgment() {
    let names = vec!["my_shop_domain.ru".to_string()];
    let router = router(domains(&names));

    let cards = router.route(&parse("/start")).await;
    let payload = cards[0].action.as_ref().unwrap().payload.clone();
    let ack = router.route(&Event::action(payload)).await;
    assert!(ack[0].text.contains("Вы выбрали: my_shop_domain.ru."));
}

#[tokio::test]
async fn buy_command_ignores_arguments() {
    let router = router(numbered(2));
    let plain = router.route(&parse("/buy")).await;
    let with_args = router.route(&parse("/buy domain01.ru")).await;
    assert_eq!(plain, with_args);
    assert_eq!(router.catalog().store().calls(), 0);
}
