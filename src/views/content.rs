use crate::entities::menu_item_entity;
use crate::models::{EventResponse, NewsResponse, PaginatedResponse};
use crate::services::PaymentSettings;
use crate::views::campaigns::{donation_form, payment_instructions};
use crate::views::components::{event_card, news_card, share_action};
use crate::views::layout::{PageContext, page};
use maud::{Markup, html};

/// Plain text with blank-line separated paragraphs.
pub fn paragraphs(text: &str) -> Markup {
    html! {
        @for paragraph in text.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
            p {
                @for (i, line) in paragraph.lines().enumerate() {
                    @if i > 0 { br; }
                    (line)
                }
            }
        }
    }
}

pub fn news_list_page(ctx: &PageContext, news: &PaginatedResponse<NewsResponse>) -> Markup {
    let content = html! {
        h1 { "Berita" }
        @if news.data.is_empty() {
            p.muted { "Belum ada berita." }
        } @else {
            div.cards {
                @for item in &news.data {
                    (news_card(item))
                }
            }
            nav.share aria-label="Halaman" {
                @if news.has_prev() {
                    a href={ "/news?page=" (news.page - 1) } { "← Sebelumnya" }
                }
                span.muted { "Halaman " (news.page) " dari " (news.total_pages) }
                @if news.has_next() {
                    a href={ "/news?page=" (news.page + 1) } { "Berikutnya →" }
                }
            }
        }
    };
    page(ctx, "Berita", content)
}

pub fn news_detail_page(ctx: &PageContext, item: &NewsResponse) -> Markup {
    let content = html! {
        article {
            h1 { (item.title) }
            p.muted { (item.created_at.format("%d %B %Y").to_string()) }
            @if let Some(src) = &item.image_url {
                img src=(src) alt=(item.title) style="width:100%;border-radius:12px";
            }
            (paragraphs(&item.body))
            (share_action(&ctx.absolute_url(), &item.title))
        }
        p { a href="/news" { "← Semua berita" } }
    };
    page(ctx, &item.title, content)
}

pub fn events_page(ctx: &PageContext, events: &[EventResponse]) -> Markup {
    let content = html! {
        h1 { "Agenda Masjid" }
        @if events.is_empty() {
            p.muted { "Belum ada agenda yang akan datang." }
        } @else {
            div.cards {
                @for event in events {
                    (event_card(event))
                }
            }
        }
    };
    page(ctx, "Agenda", content)
}

/// A menu-driven page at `/p/{slug}`, laid out by its template.
pub fn menu_page(
    ctx: &PageContext,
    item: &menu_item_entity::Model,
    payment: &PaymentSettings,
) -> Markup {
    let body = item.content.as_deref().unwrap_or("");
    let template = item.template.as_deref().unwrap_or("article");
    let content = html! {
        article {
            h1 { (item.label) }
            (paragraphs(body))
            @match template {
                "donation" => {
                    section {
                        h2 { "Salurkan donasi" }
                        (donation_form(None, Some(item.id), ctx))
                        (payment_instructions(payment))
                    }
                }
                "contact" => {
                    (share_action(&ctx.absolute_url(), &item.label))
                }
                _ => {}
            }
        }
    };
    page(ctx, &item.label, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::MenuType;
    use crate::views::layout::test_support::{context, menu_item};

    #[test]
    fn test_paragraphs_escape_and_split() {
        let html = paragraphs("Baris <satu>\nbaris dua\n\nParagraf kedua").into_string();
        assert_eq!(
            html,
            "<p>Baris &lt;satu&gt;<br>baris dua</p><p>Paragraf kedua</p>"
        );
    }

    #[test]
    fn test_donation_template_has_form() {
        let mut item = menu_item(9, "Infaq Jumat", "/p/infaq-jumat", 0);
        item.menu_type = MenuType::Page;
        item.slug = Some("infaq-jumat".to_string());
        item.template = Some("donation".to_string());
        item.content = Some("Infaq untuk operasional masjid.".to_string());
        let payment = PaymentSettings {
            qris_image: None,
            bank_account: Some("BSI 123".to_string()),
        };
        let html = menu_page(&context(vec![]), &item, &payment).into_string();
        assert!(html.contains(r#"name="menu_item_id" value="9""#));
        assert!(html.contains("BSI 123"));
    }
}
