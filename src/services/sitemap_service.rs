use crate::entities::{campaign_entity, menu_item_entity, news_entity};
use crate::error::AppResult;
use crate::models::{ChangeFrequency, SURAH_COUNT, SitemapEntry};
use crate::services::{CampaignService, ContentService, MenuService};
use chrono::{DateTime, Utc};
use maud::html;
use std::collections::HashSet;

/// Public pages that always appear, in this order.
pub const STATIC_ROUTES: &[(&str, ChangeFrequency, f32)] = &[
    ("/", ChangeFrequency::Daily, 1.0),
    ("/campaigns", ChangeFrequency::Daily, 0.9),
    ("/zakat", ChangeFrequency::Monthly, 0.8),
    ("/prayer-times", ChangeFrequency::Daily, 0.8),
    ("/quran", ChangeFrequency::Monthly, 0.8),
    ("/news", ChangeFrequency::Daily, 0.8),
    ("/events", ChangeFrequency::Weekly, 0.7),
    ("/login", ChangeFrequency::Yearly, 0.3),
    ("/register", ChangeFrequency::Yearly, 0.3),
];

/// Paths never listed even if a menu item points at them.
const PRIVATE_PREFIXES: &[&str] = &["/api", "/admin", "/profile", "/logout", "/uploads"];

/// Everything the sitemap is built from, already loaded.
#[derive(Debug, Default)]
pub struct SitemapSources {
    pub campaigns: Vec<campaign_entity::Model>,
    pub news: Vec<news_entity::Model>,
    pub menu_items: Vec<menu_item_entity::Model>,
}

fn is_private(path: &str) -> bool {
    PRIVATE_PREFIXES
        .iter()
        .any(|p| path == *p || path.starts_with(&format!("{p}/")))
}

/// Internal path of a menu href, without query or fragment; `None` for external links.
fn internal_path(href: &str) -> Option<&str> {
    let href = href.trim();
    if !href.starts_with('/') || href.starts_with("//") {
        return None;
    }
    let end = href.find(['?', '#']).unwrap_or(href.len());
    let path = &href[..end];
    let path = if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    };
    (!path.is_empty()).then_some(path)
}

pub fn build_entries(
    base_url: &str,
    sources: &SitemapSources,
    now: DateTime<Utc>,
) -> Vec<SitemapEntry> {
    let base = base_url.trim_end_matches('/');
    let mut seen: HashSet<String> = HashSet::new();
    let mut entries = Vec::new();
    let mut push = |path: String,
                    last_modified: DateTime<Utc>,
                    change_frequency: ChangeFrequency,
                    priority: f32| {
        if seen.insert(path.clone()) {
            entries.push(SitemapEntry {
                url: format!("{base}{path}"),
                last_modified,
                change_frequency,
                priority,
            });
        }
    };

    for (path, freq, priority) in STATIC_ROUTES {
        push(path.to_string(), now, *freq, *priority);
    }
    for campaign in &sources.campaigns {
        push(
            format!("/campaigns/{}", campaign.id),
            campaign.updated_at,
            ChangeFrequency::Daily,
            0.8,
        );
    }
    for item in &sources.news {
        push(
            format!("/news/{}", item.id),
            item.created_at,
            ChangeFrequency::Monthly,
            0.6,
        );
    }
    for number in 1..=SURAH_COUNT {
        push(
            format!("/quran/{number}"),
            now,
            ChangeFrequency::Yearly,
            0.5,
        );
    }
    for item in sources.menu_items.iter().filter(|m| m.is_active) {
        if let Some(path) = internal_path(&item.href).filter(|p| !is_private(p)) {
            push(path.to_string(), item.updated_at, ChangeFrequency::Weekly, 0.6);
        }
    }

    entries
}

/// sitemaps.org `urlset` document.
pub fn render_xml(entries: &[SitemapEntry]) -> String {
    let body = html! {
        urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9" {
            @for entry in entries {
                url {
                    loc { (entry.url) }
                    lastmod { (entry.last_modified.format("%Y-%m-%d").to_string()) }
                    changefreq { (entry.change_frequency.as_str()) }
                    priority { (format!("{:.1}", entry.priority)) }
                }
            }
        }
    };
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}",
        body.into_string()
    )
}

pub fn render_robots(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    format!(
        "User-agent: *\nAllow: /\nDisallow: /admin\nDisallow: /api/\nDisallow: /profile\n\nSitemap: {base}/sitemap.xml\n"
    )
}

#[derive(Clone)]
pub struct SitemapService {
    base_url: String,
    campaigns: CampaignService,
    content: ContentService,
    menu: MenuService,
}

impl SitemapService {
    pub fn new(
        base_url: String,
        campaigns: CampaignService,
        content: ContentService,
        menu: MenuService,
    ) -> Self {
        Self {
            base_url,
            campaigns,
            content,
            menu,
        }
    }

    pub async fn entries(&self) -> AppResult<Vec<SitemapEntry>> {
        let sources = SitemapSources {
            campaigns: self.campaigns.list_for_sitemap().await?,
            news: self.content.list_news_for_sitemap().await?,
            menu_items: self.menu.list_active().await?,
        };
        Ok(build_entries(&self.base_url, &sources, Utc::now()))
    }

    pub async fn xml(&self) -> AppResult<String> {
        Ok(render_xml(&self.entries().await?))
    }

    pub fn robots(&self) -> String {
        render_robots(&self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::MenuType;

    fn menu_item(id: i64, href: &str) -> menu_item_entity::Model {
        let now = Utc::now();
        menu_item_entity::Model {
            id,
            label: format!("Menu {id}"),
            icon: "circle".to_string(),
            color: "#0f766e".to_string(),
            href: href.to_string(),
            sort_order: id as i32,
            is_active: true,
            menu_type: MenuType::Link,
            slug: None,
            template: None,
            content: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_static_routes_appear_once() {
        let sources = SitemapSources {
            menu_items: vec![
                menu_item(1, "/zakat"),
                menu_item(2, "/campaigns?category=masjid"),
                menu_item(3, "/p/infaq-jumat"),
                menu_item(4, "/p/infaq-jumat/"),
                menu_item(5, "https://wa.me/62812"),
                menu_item(6, "/admin"),
            ],
            ..Default::default()
        };
        let entries = build_entries("https://masjid.example/", &sources, Utc::now());

        for (path, _, _) in STATIC_ROUTES {
            let url = format!("https://masjid.example{path}");
            assert_eq!(
                entries.iter().filter(|e| e.url == url).count(),
                1,
                "{path} should appear exactly once"
            );
        }
        let pages: Vec<_> = entries
            .iter()
            .filter(|e| e.url.contains("/p/"))
            .collect();
        assert_eq!(pages.len(), 1);
        assert!(!entries.iter().any(|e| e.url.contains("wa.me")));
        assert!(!entries.iter().any(|e| e.url.ends_with("/admin")));
    }

    #[test]
    fn test_quran_chapters_listed() {
        let entries = build_entries("https://masjid.example", &SitemapSources::default(), Utc::now());
        assert_eq!(
            entries.len(),
            STATIC_ROUTES.len() + SURAH_COUNT as usize
        );
        assert!(entries.iter().any(|e| e.url == "https://masjid.example/quran/114"));
    }

    #[test]
    fn test_render_xml_escapes_urls() {
        let entries = vec![SitemapEntry {
            url: "https://masjid.example/?a=1&b=2".to_string(),
            last_modified: Utc::now(),
            change_frequency: ChangeFrequency::Daily,
            priority: 1.0,
        }];
        let xml = render_xml(&entries);
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<loc>https://masjid.example/?a=1&amp;b=2</loc>"));
        assert!(xml.contains("<changefreq>daily</changefreq>"));
        assert!(xml.contains("<priority>1.0</priority>"));
    }
}
