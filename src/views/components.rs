use crate::entities::menu_item_entity;
use crate::models::{CampaignResponse, EventResponse, NewsResponse};
use crate::services::RunningTextSettings;
use crate::utils::money::format_rupiah;
use crate::views::icons::Icon;
use maud::{Markup, html};
use url::form_urlencoded::byte_serialize;

/// Scrolling announcement strip. Renders nothing when switched off or empty.
pub fn marquee(settings: &RunningTextSettings) -> Markup {
    if !settings.is_visible() {
        return html! {};
    }
    html! {
        div.marquee role="marquee" {
            span style={ "animation-duration:" (settings.speed) "s" } { (settings.text) }
        }
    }
}

/// Home page shortcut tiles, in the order the items are given.
pub fn quick_action_grid(items: &[menu_item_entity::Model]) -> Markup {
    html! {
        @if !items.is_empty() {
            nav.quick-actions aria-label="Menu cepat" {
                @for item in items {
                    a.quick-action href=(item.href) data-order=(item.sort_order) {
                        span.icon-badge style={ "background:" (item.color) } {
                            (Icon::from_name(&item.icon).render())
                        }
                        span { (item.label) }
                    }
                }
            }
        }
    }
}

pub fn progress_bar(percent: u8) -> Markup {
    let percent = percent.min(100);
    html! {
        div.progress role="progressbar" aria-valuemin="0" aria-valuemax="100" aria-valuenow=(percent) {
            div.progress-bar style={ "width:" (percent) "%" } {}
        }
    }
}

pub fn campaign_card(campaign: &CampaignResponse) -> Markup {
    html! {
        article.card {
            @if let Some(src) = &campaign.image_url {
                img src=(src) alt=(campaign.title) loading="lazy";
            }
            div.card-body {
                @if let Some(category) = &campaign.category {
                    span.muted { (category.name) }
                }
                h3 { a href={ "/campaigns/" (campaign.id) } { (campaign.title) } }
                (progress_bar(campaign.progress_percent))
                p.muted {
                    strong { (format_rupiah(campaign.current_amount)) }
                    " terkumpul dari " (format_rupiah(campaign.target_amount))
                    " (" (campaign.progress_percent) "%)"
                }
                @if !campaign.is_open {
                    p.muted { "Program telah berakhir" }
                }
            }
        }
    }
}

pub fn news_card(item: &NewsResponse) -> Markup {
    html! {
        article.card {
            @if let Some(src) = &item.image_url {
                img src=(src) alt=(item.title) loading="lazy";
            }
            div.card-body {
                @if item.is_featured {
                    span.muted { "Pilihan" }
                }
                h3 { a href={ "/news/" (item.id) } { (item.title) } }
                p.muted { (item.created_at.format("%d %b %Y").to_string()) }
                p { (item.excerpt(160)) }
            }
        }
    }
}

pub fn event_card(event: &EventResponse) -> Markup {
    html! {
        article.card {
            @if let Some(src) = &event.image_url {
                img src=(src) alt=(event.title) loading="lazy";
            }
            div.card-body {
                h3 { (event.title) }
                p.muted {
                    (Icon::Calendar.render()) " "
                    (event.date.format("%d %b %Y, %H:%M").to_string())
                }
                @if let Some(location) = &event.location {
                    p.muted { (Icon::MapPin.render()) " " (location) }
                }
                p { (event.description) }
            }
        }
    }
}

/// Share targets for a page. The copy button works without JavaScript frameworks:
/// it uses the clipboard API when present and otherwise shows the URL.
pub fn share_action(url: &str, title: &str) -> Markup {
    let encode = |value: &str| byte_serialize(value.as_bytes()).collect::<String>();
    let text = encode(&format!("{title} {url}"));
    let encoded_url = encode(url);
    let encoded_title = encode(title);
    html! {
        div.share {
            span.muted { (Icon::Share.render()) " Bagikan:" }
            a href={ "https://wa.me/?text=" (text) } target="_blank" rel="noopener" { "WhatsApp" }
            a href={ "https://www.facebook.com/sharer/sharer.php?u=" (encoded_url) } target="_blank" rel="noopener" { "Facebook" }
            a href={ "https://twitter.com/intent/tweet?url=" (encoded_url) "&text=" (encoded_title) } target="_blank" rel="noopener" { "X" }
            button type="button" data-url=(url)
                onclick="navigator.clipboard?navigator.clipboard.writeText(this.dataset.url).then(()=>{this.textContent='Tersalin'}):prompt('Salin tautan',this.dataset.url)" {
                (Icon::Link.render()) " Salin tautan"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::layout::test_support::menu_item;
    use chrono::Utc;

    #[test]
    fn test_marquee_hidden_when_inactive() {
        let settings = RunningTextSettings {
            text: "Kajian Ahad pagi".to_string(),
            speed: 30,
            is_active: false,
        };
        assert_eq!(marquee(&settings).into_string(), "");
    }

    #[test]
    fn test_marquee_hidden_when_text_empty() {
        let settings = RunningTextSettings {
            text: "  ".to_string(),
            speed: 30,
            is_active: true,
        };
        assert_eq!(marquee(&settings).into_string(), "");
    }

    #[test]
    fn test_marquee_renders_text_and_speed() {
        let settings = RunningTextSettings {
            text: "Kajian <Ahad> pagi".to_string(),
            speed: 12,
            is_active: true,
        };
        let html = marquee(&settings).into_string();
        assert!(html.contains("animation-duration:12s"));
        assert!(html.contains("Kajian &lt;Ahad&gt; pagi"));
    }

    #[test]
    fn test_quick_action_grid_keeps_given_order() {
        let items = vec![
            menu_item(7, "Infaq", "/p/infaq", 0),
            menu_item(2, "Zakat", "/zakat", 1),
            menu_item(5, "Agenda", "/events", 2),
        ];
        let html = quick_action_grid(&items).into_string();
        let infaq = html.find("Infaq").unwrap();
        let zakat = html.find("Zakat").unwrap();
        let agenda = html.find("Agenda").unwrap();
        assert!(infaq < zakat && zakat < agenda);
        assert!(html.contains(r#"data-icon="mosque""#));
    }

    #[test]
    fn test_progress_bar_is_capped() {
        let html = progress_bar(150).into_string();
        assert!(html.contains("width:100%"));
    }

    #[test]
    fn test_campaign_card_shows_amounts() {
        let campaign = CampaignResponse {
            id: 3,
            title: "Renovasi Wudhu".to_string(),
            slug: "renovasi-wudhu".to_string(),
            description: String::new(),
            image_url: None,
            target_amount: 10_000_000.0,
            current_amount: 2_500_000.0,
            progress_percent: 25,
            end_date: None,
            is_open: true,
            category: None,
            updated_at: Utc::now(),
        };
        let html = campaign_card(&campaign).into_string();
        assert!(html.contains("Rp 2.500.000"));
        assert!(html.contains(r#"href="/campaigns/3""#));
        assert!(html.contains("width:25%"));
    }

    #[test]
    fn test_share_links_are_encoded() {
        let html = share_action("https://masjid.example/campaigns/3", "Renovasi & Wudhu").into_string();
        assert!(html.contains("https://wa.me/?text=Renovasi+%26+Wudhu+https%3A%2F%2Fmasjid.example%2Fcampaigns%2F3"));
        assert!(html.contains("facebook.com/sharer/sharer.php?u=https%3A%2F%2Fmasjid.example%2Fcampaigns%2F3"));
    }
}
