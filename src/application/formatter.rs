//! Response formatter - turns catalog records into chat replies
//!
//! Everything here is pure: the same input always renders the same bytes.

use crate::domain::entities::{command, CatalogRecord, Reply, ReplyAction};

/// Label of the button attached to every record
pub const BUY_LABEL: &str = "Купить";

/// Shown when a record has no description
pub const NO_DESCRIPTION: &str = "Нет описания";

/// Where the empty result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyContext<'a> {
    Catalog,
    Search(&'a str),
}

/// Formatter settings that vary per storefront
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyFormatter {
    contact: String,
    currency: String,
}

impl Default for ReplyFormatter {
    fn default() -> Self {
        Self::new("@admin@wwwrent.ru", "руб.")
    }
}

impl ReplyFormatter {
    pub fn new(contact: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            contact: contact.into(),
            currency: currency.into(),
        }
    }

    pub fn contact(&self) -> &str {
        &self.contact
    }

    /// Record card. Full detail is used for the catalog listing, the reduced
    /// one for search results.
    pub fn format_record(&self, record: &CatalogRecord, full: bool) -> Reply {
        let status = if record.indexed { "✅" } else { "❌" };
        let mut text = format!(
            "🔹 <b>{}</b>\n💰 Цена: {} {}\n🔍 Индексация: {}",
            escape_html(&record.name),
            record.price,
            escape_html(&self.currency),
            status,
        );

        if full {
            let description = record.description().unwrap_or(NO_DESCRIPTION);
            text.push_str(&format!(
                "\n🔗 Ссылки: {}\n📊 Трафик: ~{} посещений/мес\n📝 Описание: {}",
                record.backlinks,
                record.traffic,
                escape_html(description),
            ));
        }

        Reply::html(text).with_action(ReplyAction::buy(BUY_LABEL, &record.name))
    }

    pub fn format_empty(&self, context: EmptyContext<'_>) -> Reply {
        match context {
            EmptyContext::Catalog => Reply::plain("❌ Каталог пуст."),
            EmptyContext::Search(keyword) => {
                Reply::plain(format!("❌ Ничего не найдено по запросу '{}'.", keyword))
            }
        }
    }

    pub fn format_overflow_notice(&self, total: usize, shown: usize) -> Reply {
        Reply::plain(format!(
            "Всего в каталоге: {} доменов, показано {}. Используйте /search для поиска.",
            total, shown
        ))
    }

    pub fn format_search_header(&self, count: usize, keyword: &str) -> Reply {
        Reply::plain(format!("🔍 Найдено {} доменов по запросу '{}':", count, keyword))
    }

    /// Toast shown after a "buy" button press
    pub fn format_buy_ack(&self, name: &str) -> Reply {
        Reply::toast(format!("Вы выбрали: {}. Свяжитесь с {}", name, self.contact))
    }

    pub fn format_buy_instructions(&self) -> Reply {
        Reply::plain(format!(
            "💳 Как купить домен:\n\n\
             1. Выберите домен из каталога\n\
             2. Оплатите на наш счёт (уточните у менеджера)\n\
             3. После оплаты — мы передадим права на домен\n\n\
             Для связи: {}",
            self.contact
        ))
    }

    pub fn format_usage(&self, name: &str) -> Reply {
        let usage = command::find(name)
            .map(|c| c.usage.to_string())
            .unwrap_or_else(|| format!("/{}", name));
        Reply::plain(format!("🔍 Используйте: {}", usage))
    }

    pub fn format_help(&self) -> Reply {
        Reply::html(format!(
            "🤖 <b>Меню навигации бота</b>\n\n\
             🔹 <code>/start</code> — Показать каталог доменов (первые 10)\n\
             🔹 <code>/search слово</code> — Найти домены по ключевому слову\n\
             🔹 <code>/buy</code> — Инструкция по покупке домена\n\
             🔹 <code>/help</code> — Это меню (сейчас вы здесь)\n\n\
             🔍 <b>Как пользоваться:</b>\n\
             • Напишите любое слово (например, \"крым\") — бот найдёт похожие домены\n\
             • Нажмите \"Купить\" под доменом — получите инструкции\n\n\
             💳 <b>Оплата:</b>\n\
             После выбора домена свяжитесь с {}",
            escape_html(&self.contact)
        ))
    }

    pub fn format_failure(&self) -> Reply {
        Reply::plain("⚠️ Каталог временно недоступен. Попробуйте позже.")
    }
}

/// Escape text for Telegram's HTML parse mode
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
