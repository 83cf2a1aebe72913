use crate::models::{CampaignResponse, EventResponse, NewsResponse};
use crate::services::RunningTextSettings;
use crate::views::components::{campaign_card, event_card, marquee, news_card, quick_action_grid};
use crate::views::icons::Icon;
use crate::views::layout::{PageContext, page};
use maud::{Markup, html};

pub struct HomeData<'a> {
    pub banner: &'a RunningTextSettings,
    pub campaigns: &'a [CampaignResponse],
    pub news: &'a [NewsResponse],
    pub events: &'a [EventResponse],
}

pub fn home_page(ctx: &PageContext, data: HomeData<'_>) -> Markup {
    let content = html! {
        (marquee(data.banner))
        section {
            h1 { "Assalamu'alaikum" }
            p.muted { "Selamat datang di " (ctx.app_name) "." }
            (quick_action_grid(&ctx.menu))
        }
        section {
            h2 { (Icon::Clock.render()) " Jadwal Sholat" }
            p {
                a href="/prayer-times" { "Lihat jadwal sholat hari ini untuk lokasi Anda" }
            }
        }
        section {
            h2 { (Icon::HandCoins.render()) " Program Donasi" }
            @if data.campaigns.is_empty() {
                p.muted { "Belum ada program donasi yang aktif." }
            } @else {
                div.cards {
                    @for campaign in data.campaigns {
                        (campaign_card(campaign))
                    }
                }
                p { a href="/campaigns" { "Semua program →" } }
            }
        }
        section {
            h2 { (Icon::Calendar.render()) " Agenda Terdekat" }
            @if data.events.is_empty() {
                p.muted { "Belum ada agenda." }
            } @else {
                div.cards {
                    @for event in data.events {
                        (event_card(event))
                    }
                }
            }
        }
        section {
            h2 { (Icon::Newspaper.render()) " Berita" }
            @if data.news.is_empty() {
                p.muted { "Belum ada berita." }
            } @else {
                div.cards {
                    @for item in data.news {
                        (news_card(item))
                    }
                }
                p { a href="/news" { "Berita lainnya →" } }
            }
        }
    };
    page(ctx, "Beranda", content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::layout::test_support::{context, menu_item};

    #[test]
    fn test_home_without_content() {
        let banner = RunningTextSettings {
            text: "Info".to_string(),
            speed: 30,
            is_active: false,
        };
        let ctx = context(vec![menu_item(1, "Zakat", "/zakat", 0)]);
        let html = home_page(
            &ctx,
            HomeData {
                banner: &banner,
                campaigns: &[],
                news: &[],
                events: &[],
            },
        )
        .into_string();
        assert!(html.contains("Belum ada program donasi"));
        assert!(html.contains("quick-action"));
        assert!(!html.contains("class=\"marquee\""));
    }
}
